//! Critical set resolution.

use futures::future::join_all;
use serde::de::DeserializeOwned;
use serde_json::Value;
use storefront_data::{QueryError, QueryResult, QueryRunner};
use storefront_observability::StructuredLogger;

use crate::error::AggregateCriticalError;
use crate::request::DataRequest;

/// Resolved critical data, keyed by request name in declaration order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CriticalData {
    values: Vec<(String, Value)>,
}

impl CriticalData {
    /// Value of a request.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    /// Deserialize a request's value into `T`.
    pub fn decode<T: DeserializeOwned>(&self, name: &str) -> QueryResult<T> {
        let value = self
            .get(name)
            .ok_or_else(|| QueryError::Decode(format!("no critical data named '{}'", name)))?;
        T::deserialize(value).map_err(QueryError::from)
    }

    /// Remove and return a request's value.
    pub fn take(&mut self, name: &str) -> Option<Value> {
        let index = self.values.iter().position(|(n, _)| n == name)?;
        Some(self.values.remove(index).1)
    }

    /// Request names in declaration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.values.iter().map(|(n, _)| n.as_str())
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Run every critical request concurrently and wait for all of them.
///
/// All-or-nothing: any failure fails the whole set, attributed to the first
/// failing request in declaration order regardless of completion order.
pub async fn resolve_critical(
    runner: &dyn QueryRunner,
    logger: &StructuredLogger,
    critical: Vec<DataRequest>,
) -> Result<CriticalData, AggregateCriticalError> {
    let results = join_all(
        critical
            .iter()
            .map(|request| runner.run(request.query(), request.variables())),
    )
    .await;

    let mut values = Vec::with_capacity(critical.len());
    for (request, result) in critical.into_iter().zip(results) {
        match result {
            Ok(value) => values.push((request.name().to_string(), value)),
            Err(e) => {
                logger
                    .error_builder("critical request failed")
                    .field("request", request.name())
                    .field("kind", e.kind().name())
                    .field("error", e.to_string())
                    .emit();
                return Err(AggregateCriticalError::new(request.name(), e));
            }
        }
    }

    Ok(CriticalData { values })
}
