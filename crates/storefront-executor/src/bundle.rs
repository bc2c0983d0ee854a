//! Page load output.

use storefront_core::TimingContext;

use crate::critical::CriticalData;
use crate::deferred::DeferredHandles;

/// What a page handler receives once the critical barrier releases.
///
/// Only exists when every critical request succeeded.
#[derive(Debug)]
pub struct LoadBundle {
    /// Resolved critical data.
    pub critical: CriticalData,
    /// Handles for deferred data still in flight.
    pub deferred: DeferredHandles,
    /// Lifecycle marks for this load.
    pub timing: TimingContext,
}

impl LoadBundle {
    pub fn into_parts(self) -> (CriticalData, DeferredHandles) {
        (self.critical, self.deferred)
    }
}
