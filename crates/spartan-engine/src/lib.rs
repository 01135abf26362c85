//! spartan-engine: apply tippers to compilation units until nothing changes
//!
//! This crate provides:
//! - `CompilationUnit`: a tree plus its live/dead status and edit counters
//! - `Applicator`: one pre-order pass over a unit, one edit per visited node
//! - `Driver`: repeated passes over many units up to a fixed point or a ceiling
//! - `Cancellation`: cooperative stop signal polled between units

pub mod applicator;
pub mod cancel;
pub mod driver;
pub mod unit;

pub use applicator::{Applicator, ApplyError};
pub use cancel::{Cancellation, CancellationFlag, NeverCancel};
pub use driver::{run_one_pass, run_to_fixed_point, Driver, DriverConfig, PassContext, Summary, DEFAULT_PASS_CEILING};
pub use unit::{CompilationUnit, UnitStatus};
