//! Fire-and-forget dispatch of deferred requests.

use std::sync::Arc;

use futures::future::join_all;
use serde_json::Value;
use storefront_data::QueryRunner;
use storefront_observability::StructuredLogger;

use crate::handle::PendingHandle;
use crate::request::DataRequest;

/// Handles of dispatched deferred requests, in declaration order.
#[derive(Debug, Clone, Default)]
pub struct DeferredHandles {
    handles: Vec<(String, PendingHandle)>,
}

impl DeferredHandles {
    /// Handle of a request.
    pub fn get(&self, name: &str) -> Option<&PendingHandle> {
        self.handles.iter().find(|(n, _)| n == name).map(|(_, h)| h)
    }

    /// Remove and return a request's handle.
    pub fn take(&mut self, name: &str) -> Option<PendingHandle> {
        let index = self.handles.iter().position(|(n, _)| n == name)?;
        Some(self.handles.remove(index).1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &PendingHandle)> {
        self.handles.iter().map(|(n, h)| (n.as_str(), h))
    }

    /// Request names in declaration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.handles.iter().map(|(n, _)| n.as_str())
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Wait for every handle to resolve.
    pub async fn settled(&self) -> Vec<(String, Option<Arc<Value>>)> {
        let values = join_all(self.handles.iter().map(|(_, h)| h.clone())).await;
        self.handles
            .iter()
            .map(|(n, _)| n.clone())
            .zip(values)
            .collect()
    }
}

/// Start every deferred request and return immediately.
///
/// Each request runs on its own task. A failure, or a panic inside the task,
/// resolves that request's handle to `None` and logs a warning; other requests
/// are unaffected. Must be called within a Tokio runtime.
pub fn dispatch_deferred(
    runner: &Arc<dyn QueryRunner>,
    logger: &StructuredLogger,
    deferred: Vec<DataRequest>,
) -> DeferredHandles {
    let handles = deferred
        .into_iter()
        .map(|request| {
            let name = request.name().to_string();
            let handle = spawn_request(runner.clone(), logger.clone(), request);
            (name, handle)
        })
        .collect();

    DeferredHandles { handles }
}

fn spawn_request(
    runner: Arc<dyn QueryRunner>,
    logger: StructuredLogger,
    request: DataRequest,
) -> PendingHandle {
    let name: Arc<str> = Arc::from(request.name());

    let task_logger = logger.clone();
    let task = tokio::spawn(async move {
        match runner.run(request.query(), request.variables()).await {
            Ok(value) => Some(Arc::new(value)),
            Err(e) => {
                task_logger
                    .warn_builder("deferred request failed")
                    .field("request", request.name())
                    .field("kind", e.kind().name())
                    .field("error", e.to_string())
                    .emit();
                None
            }
        }
    });

    let join_logger = logger.clone();
    let join_name = name.clone();
    PendingHandle::new(name, logger, async move {
        match task.await {
            Ok(resolution) => resolution,
            Err(e) => {
                join_logger
                    .warn_builder("deferred request aborted")
                    .field("request", join_name.as_ref())
                    .field("error", e.to_string())
                    .emit();
                None
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{query, MockRunner};
    use serde_json::json;
    use std::time::Duration;
    use storefront_data::QueryError;
    use storefront_observability::{LogLevel, MemorySink};

    fn deferred(name: &'static str) -> DataRequest {
        DataRequest::deferred(name, query(name))
    }

    fn setup(runner: MockRunner) -> (Arc<MockRunner>, Arc<dyn QueryRunner>, Arc<MemorySink>, StructuredLogger) {
        let runner = Arc::new(runner);
        let sink = Arc::new(MemorySink::new());
        let dyn_runner: Arc<dyn QueryRunner> = runner.clone();
        (runner, dyn_runner, sink.clone(), StructuredLogger::new(sink))
    }

    // === Dispatch ===

    #[tokio::test]
    async fn test_dispatch_returns_immediately() {
        let (_, runner, _, logger) = setup(MockRunner::new().ok_after("slow", 200, json!(1)));

        let started = std::time::Instant::now();
        let handles = dispatch_deferred(&runner, &logger, vec![deferred("slow")]);

        assert!(started.elapsed() < Duration::from_millis(100));
        assert!(!handles.get("slow").unwrap().is_resolved());
        assert_eq!(handles.get("slow").unwrap().clone().await, Some(Arc::new(json!(1))));
    }

    #[tokio::test]
    async fn test_progresses_without_being_polled() {
        let (mock, runner, _, logger) = setup(MockRunner::new().ok("a", json!(1)));

        let handles = dispatch_deferred(&runner, &logger, vec![deferred("a")]);
        tokio::time::sleep(Duration::from_millis(20)).await;

        assert_eq!(mock.completed(), 1);
        assert!(handles.get("a").unwrap().is_resolved());
    }

    #[tokio::test]
    async fn test_failure_is_isolated() {
        let (_, runner, sink, logger) = setup(
            MockRunner::new()
                .ok("a", json!("A"))
                .err("b", QueryError::Protocol)
                .ok_after("c", 10, json!("C")),
        );

        let handles = dispatch_deferred(&runner, &logger, vec![deferred("a"), deferred("b"), deferred("c")]);
        let settled = handles.settled().await;

        assert_eq!(
            settled,
            vec![
                ("a".to_string(), Some(Arc::new(json!("A")))),
                ("b".to_string(), None),
                ("c".to_string(), Some(Arc::new(json!("C")))),
            ]
        );
        let warnings = sink.at_level(LogLevel::Warn);
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].fields["request"], json!("b"));
        assert_eq!(warnings[0].fields["kind"], json!("protocol"));
    }

    #[tokio::test]
    async fn test_panic_resolves_to_none() {
        let (_, runner, sink, logger) = setup(MockRunner::new().panic("boom").ok("fine", json!(true)));

        let handles = dispatch_deferred(&runner, &logger, vec![deferred("boom"), deferred("fine")]);

        assert!(handles.get("boom").unwrap().clone().await.is_none());
        assert_eq!(handles.get("fine").unwrap().clone().await, Some(Arc::new(json!(true))));
        assert!(sink.contains("deferred request aborted"));
    }

    #[tokio::test]
    async fn test_each_request_runs_once_for_many_observers() {
        let (mock, runner, _, logger) = setup(MockRunner::new().ok_after("a", 10, json!(1)));

        let handles = dispatch_deferred(&runner, &logger, vec![deferred("a")]);
        let handle = handles.get("a").unwrap();
        let (x, y) = tokio::join!(handle.clone(), handle.clone());

        assert!(Arc::ptr_eq(&x.unwrap(), &y.unwrap()));
        assert_eq!(mock.call_count("a"), 1);
    }

    // === DeferredHandles ===

    #[tokio::test]
    async fn test_handles_order_and_take() {
        let (_, runner, _, logger) = setup(MockRunner::new().ok("a", json!(1)).ok("b", json!(2)));

        let mut handles = dispatch_deferred(&runner, &logger, vec![deferred("b"), deferred("a")]);

        assert_eq!(handles.names().collect::<Vec<_>>(), vec!["b", "a"]);
        assert_eq!(handles.iter().count(), 2);
        let b = handles.take("b").unwrap();
        assert_eq!(b.name(), "b");
        assert_eq!(handles.len(), 1);
        assert!(handles.get("b").is_none());
    }

    #[tokio::test]
    async fn test_dispatch_nothing() {
        let (_, runner, _, logger) = setup(MockRunner::new());
        let handles = dispatch_deferred(&runner, &logger, Vec::new());
        assert!(handles.is_empty());
    }
}
