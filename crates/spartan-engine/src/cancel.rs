//! Cooperative cancellation, polled by the driver between units

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

pub trait Cancellation: Sync {
    fn is_cancelled(&self) -> bool;
}

impl<F> Cancellation for F
where
    F: Fn() -> bool + Sync,
{
    fn is_cancelled(&self) -> bool {
        self()
    }
}

/// Never asks the driver to stop
#[derive(Debug, Default, Clone, Copy)]
pub struct NeverCancel;

impl Cancellation for NeverCancel {
    fn is_cancelled(&self) -> bool {
        false
    }
}

/// A flag the host can raise from any thread
#[derive(Debug, Default, Clone)]
pub struct CancellationFlag(Arc<AtomicBool>);

impl CancellationFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }
}

impl Cancellation for CancellationFlag {
    fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flag_is_shared() {
        let flag = CancellationFlag::new();
        let host = flag.clone();
        assert!(!flag.is_cancelled());
        host.cancel();
        assert!(flag.is_cancelled());
    }

    #[test]
    fn test_closure_and_never() {
        let polls = std::sync::atomic::AtomicUsize::new(0);
        let after_two = || polls.fetch_add(1, Ordering::SeqCst) >= 2;
        assert!(!after_two.is_cancelled());
        assert!(!after_two.is_cancelled());
        assert!(after_two.is_cancelled());
        assert!(!NeverCancel.is_cancelled());
    }
}
