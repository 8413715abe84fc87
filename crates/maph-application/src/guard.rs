//! Double-submit protection for screen actions.

use maph_core::MaphError;
use std::sync::atomic::{AtomicBool, Ordering};

/// Admits one submission at a time.
///
/// [`SubmitGuard::try_begin`] hands out a [`SubmitTicket`]; the guard stays
/// busy until the ticket is dropped, including on early returns.
#[derive(Debug, Default)]
pub struct SubmitGuard {
    busy: AtomicBool,
}

impl SubmitGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claims the guard, or fails with [`MaphError::Busy`] while a ticket is live.
    pub fn try_begin(&self) -> Result<SubmitTicket<'_>, MaphError> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| MaphError::Busy)?;
        Ok(SubmitTicket { guard: self })
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }
}

#[must_use = "the guard is released as soon as the ticket is dropped"]
#[derive(Debug)]
pub struct SubmitTicket<'a> {
    guard: &'a SubmitGuard,
}

impl Drop for SubmitTicket<'_> {
    fn drop(&mut self) {
        self.guard.busy.store(false, Ordering::Release);
    }
}
