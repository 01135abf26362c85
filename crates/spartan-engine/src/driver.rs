//! Multi-Pass Driver
//!
//! Each live unit gets one applicator pass per round. A unit whose pass
//! commits nothing is retired; the run ends when no unit is live, when the
//! pass ceiling is reached, or when the host cancels. Cancellation is polled
//! between units and never interrupts a unit mid-pass.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use spartan_core::{Event, EventSink};
use spartan_tippers::{Enablement, TipperRegistry};

use crate::applicator::{Applicator, ApplyError};
use crate::cancel::Cancellation;
use crate::unit::CompilationUnit;

pub const DEFAULT_PASS_CEILING: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DriverConfig {
    /// Safety valve against tippers that never settle
    pub pass_ceiling: usize,
    /// Process the live units of a pass on the rayon pool
    pub parallel: bool,
    /// Retire a unit as soon as a read-only probe finds nothing left to do,
    /// instead of waiting for an empty pass
    pub eager_fixed_point: bool,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            pass_ceiling: DEFAULT_PASS_CEILING,
            parallel: false,
            eager_fixed_point: true,
        }
    }
}

/// State of one run, discarded once the summary is built
#[derive(Debug, Clone)]
pub struct PassContext {
    /// Number of passes started so far
    pub pass: usize,
    pub pass_ceiling: usize,
    pub total_edits: usize,
    /// Edits committed to each unit during this run
    pub unit_edits: Vec<usize>,
    /// Indices of the units still live
    pub live: Vec<usize>,
}

impl PassContext {
    fn new(units: &[CompilationUnit], pass_ceiling: usize) -> Self {
        Self {
            pass: 0,
            pass_ceiling,
            total_edits: 0,
            unit_edits: vec![0; units.len()],
            live: units
                .iter()
                .enumerate()
                .filter(|(_, u)| u.is_live())
                .map(|(i, _)| i)
                .collect(),
        }
    }

    fn should_continue(&self) -> bool {
        self.pass < self.pass_ceiling && !self.live.is_empty()
    }
}

/// Outcome of a run; unit references are indices into the slice given to
/// the driver, and counts cover this run only
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    /// Edits committed to each unit by this run
    pub unit_edits: Vec<usize>,
    pub modified_units: Vec<usize>,
    pub untouched_units: Vec<usize>,
    /// Units still live when the run stopped
    pub still_live: Vec<usize>,
    pub passes_run: usize,
    pub total_edits: usize,
    pub tips_before: usize,
    pub tips_after: usize,
    pub was_cancelled: bool,
    /// The ceiling stopped the run while units were still live
    pub hit_ceiling: bool,
}

impl Summary {
    pub fn reached_fixed_point(&self) -> bool {
        self.still_live.is_empty()
    }
}

pub struct Driver<'r> {
    applicator: Applicator<'r>,
    config: DriverConfig,
}

impl<'r> Driver<'r> {
    pub fn new(registry: &'r TipperRegistry, enablement: &'r Enablement, config: DriverConfig) -> Self {
        Self {
            applicator: Applicator::new(registry, enablement),
            config,
        }
    }

    pub fn config(&self) -> &DriverConfig {
        &self.config
    }

    pub fn applicator(&self) -> Applicator<'r> {
        self.applicator
    }

    /// A single pass over one unit, for callers driving passes by hand
    pub fn run_one_pass(&self, unit: &mut CompilationUnit, sink: &EventSink) -> Result<usize, ApplyError> {
        self.applicator.apply_one_pass(unit, sink)
    }

    pub fn run_to_fixed_point(
        &self,
        units: &mut [CompilationUnit],
        cancel: &dyn Cancellation,
        sink: &EventSink,
    ) -> Result<Summary, ApplyError> {
        let tips_before: usize = units.iter().map(|u| self.applicator.count_tips(u)).sum();
        let mut ctx = PassContext::new(units, self.config.pass_ceiling);
        let mut was_cancelled = false;

        sink.fire(Event::RunStarted {
            units: units.len(),
            pass_ceiling: ctx.pass_ceiling,
        });

        while ctx.should_continue() {
            if cancel.is_cancelled() {
                was_cancelled = true;
                sink.fire(Event::Cancelled { pass: ctx.pass });
                break;
            }

            ctx.pass += 1;
            sink.fire(Event::PassStarted {
                pass: ctx.pass,
                live_units: ctx.live.len(),
            });

            let (unit_edits, interrupted) = if self.config.parallel {
                self.parallel_pass(units, ctx.pass, cancel, sink)?
            } else {
                self.sequential_pass(units, &ctx, cancel, sink)?
            };
            let mut edits = 0;
            for (i, count) in unit_edits {
                ctx.unit_edits[i] += count;
                edits += count;
            }
            ctx.total_edits += edits;
            ctx.live.retain(|&i| units[i].is_live());
            sink.fire(Event::PassFinished { pass: ctx.pass, edits });

            if interrupted {
                was_cancelled = true;
                sink.fire(Event::Cancelled { pass: ctx.pass });
                break;
            }
        }

        sink.fire(Event::RunFinished {
            passes: ctx.pass,
            edits: ctx.total_edits,
        });

        let (modified_units, untouched_units): (Vec<usize>, Vec<usize>) =
            (0..units.len()).partition(|&i| ctx.unit_edits[i] > 0);
        Ok(Summary {
            unit_edits: ctx.unit_edits,
            modified_units,
            untouched_units,
            hit_ceiling: !ctx.live.is_empty() && !was_cancelled,
            still_live: ctx.live,
            passes_run: ctx.pass,
            total_edits: ctx.total_edits,
            tips_before,
            tips_after: units.iter().map(|u| self.applicator.count_tips(u)).sum(),
            was_cancelled,
        })
    }

    /// One pass over one unit plus its live/dead transition
    fn step(&self, unit: &mut CompilationUnit, pass: usize, sink: &EventSink) -> Result<usize, ApplyError> {
        let edits = self.applicator.apply_one_pass(unit, sink)?;
        let exhausted = edits == 0 || (self.config.eager_fixed_point && !self.applicator.has_tips(unit));
        if exhausted {
            unit.retire();
            sink.fire(Event::UnitExhausted {
                unit: unit.name(),
                pass,
                edits: unit.total_edits(),
            });
        }
        Ok(edits)
    }

    /// Returns `(unit index, edits)` for each processed unit and whether
    /// cancellation cut the pass short
    fn sequential_pass(
        &self,
        units: &mut [CompilationUnit],
        ctx: &PassContext,
        cancel: &dyn Cancellation,
        sink: &EventSink,
    ) -> Result<(Vec<(usize, usize)>, bool), ApplyError> {
        let mut edits = Vec::with_capacity(ctx.live.len());
        for &i in &ctx.live {
            if cancel.is_cancelled() {
                return Ok((edits, true));
            }
            edits.push((i, self.step(&mut units[i], ctx.pass, sink)?));
        }
        Ok((edits, false))
    }

    fn parallel_pass(
        &self,
        units: &mut [CompilationUnit],
        pass: usize,
        cancel: &dyn Cancellation,
        sink: &EventSink,
    ) -> Result<(Vec<(usize, usize)>, bool), ApplyError> {
        let outcomes = units
            .par_iter_mut()
            .enumerate()
            .filter(|(_, unit)| unit.is_live())
            .map(|(i, unit)| {
                if cancel.is_cancelled() {
                    return Ok(None);
                }
                self.step(unit, pass, sink).map(|edits| Some((i, edits)))
            })
            .collect::<Result<Vec<_>, ApplyError>>()?;

        let interrupted = outcomes.iter().any(Option::is_none);
        Ok((outcomes.into_iter().flatten().collect(), interrupted))
    }
}

/// Run every unit to its fixed point with a freshly built driver
pub fn run_to_fixed_point(
    units: &mut [CompilationUnit],
    registry: &TipperRegistry,
    enablement: &Enablement,
    config: DriverConfig,
    cancel: &dyn Cancellation,
    sink: &EventSink,
) -> Result<Summary, ApplyError> {
    Driver::new(registry, enablement, config).run_to_fixed_point(units, cancel, sink)
}

/// A single pass over one unit
pub fn run_one_pass(
    unit: &mut CompilationUnit,
    registry: &TipperRegistry,
    enablement: &Enablement,
    sink: &EventSink,
) -> Result<usize, ApplyError> {
    Applicator::new(registry, enablement).apply_one_pass(unit, sink)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cancel::NeverCancel;
    use spartan_core::{RecordingListener, SyntaxTree};
    use std::sync::Arc;

    /// `{ ; ; }`: two tips in one pass
    fn empties(name: &str) -> CompilationUnit {
        let mut tree = SyntaxTree::new();
        let a = tree.empty_statement();
        let b = tree.empty_statement();
        let block = tree.block(vec![a, b]);
        tree.set_root(block);
        CompilationUnit::new(name, tree)
    }

    #[test]
    fn test_default_config() {
        let config = DriverConfig::default();
        assert_eq!(config.pass_ceiling, DEFAULT_PASS_CEILING);
        assert!(!config.parallel);
        assert!(config.eager_fixed_point);
    }

    #[test]
    fn test_lazy_fixed_point_needs_empty_pass() {
        let registry = TipperRegistry::new();
        let enablement = Enablement::all();
        let config = DriverConfig {
            eager_fixed_point: false,
            ..DriverConfig::default()
        };
        let mut units = vec![empties("a")];
        let summary = run_to_fixed_point(
            &mut units,
            &registry,
            &enablement,
            config,
            &NeverCancel,
            &EventSink::new(),
        )
        .unwrap();

        assert_eq!(summary.passes_run, 2);
        assert_eq!(summary.unit_edits, vec![2]);
        assert_eq!(summary.tips_before, 2);
        assert_eq!(summary.tips_after, 0);
        assert!(summary.reached_fixed_point());
    }

    #[test]
    fn test_event_order() {
        let registry = TipperRegistry::new();
        let enablement = Enablement::all();
        let recorder = Arc::new(RecordingListener::new());
        let sink = EventSink::with(recorder.clone());
        let driver = Driver::new(&registry, &enablement, DriverConfig::default());

        let mut units = vec![empties("a")];
        driver.run_to_fixed_point(&mut units, &NeverCancel, &sink).unwrap();

        let lines = recorder.lines();
        assert_eq!(lines.first().map(String::as_str), Some("1: run started: 1 unit(s), at most 20 pass(es)"));
        assert_eq!(lines[1], "2: pass 1 started: 1 live unit(s)");
        assert!(lines[2].contains("remove_empty_statement"));
        assert!(lines[3].contains("remove_empty_statement"));
        assert_eq!(lines[4], "5: a: fixed point in pass 1 after 2 edit(s)");
        assert_eq!(lines[5], "6: pass 1 finished: 2 edit(s)");
        assert_eq!(lines[6], "7: run finished: 1 pass(es), 2 edit(s)");
        assert_eq!(lines.len(), 7);
    }

    #[test]
    fn test_dead_units_are_not_revisited() {
        let registry = TipperRegistry::new();
        let enablement = Enablement::all();
        let driver = Driver::new(&registry, &enablement, DriverConfig::default());
        let sink = EventSink::new();

        let mut units = vec![empties("a")];
        driver.run_to_fixed_point(&mut units, &NeverCancel, &sink).unwrap();
        let again = driver.run_to_fixed_point(&mut units, &NeverCancel, &sink).unwrap();
        assert_eq!(again.passes_run, 0);
        assert_eq!(again.total_edits, 0);
        assert_eq!(again.unit_edits, vec![0]);
        assert!(again.modified_units.is_empty());
        assert_eq!(again.untouched_units, vec![0]);
        assert_eq!(units[0].total_edits(), 2);
    }
}
