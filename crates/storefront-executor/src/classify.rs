//! Request classification.

use crate::request::DataRequest;

/// Requests split by criticality, each side in declaration order.
#[derive(Debug, Default)]
pub struct Partition {
    pub critical: Vec<DataRequest>,
    pub deferred: Vec<DataRequest>,
}

/// Split requests into critical and deferred sets.
///
/// Stable: relative order is preserved within each side, and every input
/// request lands on exactly one side.
pub fn classify(requests: impl IntoIterator<Item = DataRequest>) -> Partition {
    let (critical, deferred) = requests.into_iter().partition(DataRequest::is_critical);
    Partition { critical, deferred }
}
