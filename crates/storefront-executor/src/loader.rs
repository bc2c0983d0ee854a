//! Page load orchestration.

use std::sync::Arc;

use storefront_core::{LifecycleObserver, LoadPhase, TimingContext};
use storefront_data::QueryRunner;
use storefront_observability::StructuredLogger;

use crate::bundle::LoadBundle;
use crate::classify::classify;
use crate::critical::resolve_critical;
use crate::deferred::dispatch_deferred;
use crate::error::AggregateCriticalError;
use crate::request::LoadPlan;

/// Runs a page's load plan.
///
/// Deferred requests are dispatched before the critical barrier so their I/O
/// overlaps it. When the critical set fails, deferred tasks already in flight
/// run to completion and their results are dropped.
#[derive(Clone)]
pub struct PageLoader {
    runner: Arc<dyn QueryRunner>,
    logger: StructuredLogger,
    observer: Option<Arc<dyn LifecycleObserver>>,
    timing: TimingContext,
}

impl PageLoader {
    /// Create a loader.
    pub fn new(runner: Arc<dyn QueryRunner>, logger: StructuredLogger) -> Self {
        Self {
            runner,
            logger,
            observer: None,
            timing: TimingContext::new(),
        }
    }

    /// Mark phases relative to `timing`, usually the request's own clock.
    pub fn with_timing(mut self, timing: TimingContext) -> Self {
        self.timing = timing;
        self
    }

    /// Report lifecycle phases to `observer`.
    pub fn with_observer(mut self, observer: Arc<dyn LifecycleObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    pub fn logger(&self) -> &StructuredLogger {
        &self.logger
    }

    /// Load a page. Must be called within a Tokio runtime.
    pub async fn load(&self, plan: LoadPlan) -> Result<LoadBundle, AggregateCriticalError> {
        let mut timing = self.timing.clone();
        self.phase(&mut timing, LoadPhase::Start);

        let partition = classify(plan.into_requests());
        self.logger
            .debug_builder("page load started")
            .field_i64("critical", partition.critical.len() as i64)
            .field_i64("deferred", partition.deferred.len() as i64)
            .emit();

        let deferred = dispatch_deferred(&self.runner, &self.logger, partition.deferred);
        self.phase(&mut timing, LoadPhase::DeferredDispatched);

        let critical = match resolve_critical(self.runner.as_ref(), &self.logger, partition.critical).await {
            Ok(critical) => critical,
            Err(e) => {
                self.phase(&mut timing, LoadPhase::Error(e.request.clone()));
                return Err(e);
            }
        };
        self.phase(&mut timing, LoadPhase::CriticalResolved);

        self.logger
            .debug_builder("page load finished")
            .duration_ms("time_to_critical_ms", timing.time_to_critical().unwrap_or_default())
            .emit();
        self.phase(&mut timing, LoadPhase::Completion);

        Ok(LoadBundle {
            critical,
            deferred,
            timing,
        })
    }

    fn phase(&self, timing: &mut TimingContext, phase: LoadPhase) {
        timing.mark_phase(&phase);
        if let Some(observer) = &self.observer {
            observer.on_phase(phase, timing.elapsed());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{query, MockRunner};
    use crate::request::DataRequest;
    use serde_json::json;
    use std::sync::Mutex;
    use std::time::Duration;
    use storefront_data::{ErrorKind, QueryError};
    use storefront_observability::{LogLevel, MemorySink};

    #[derive(Default)]
    struct PhaseLog(Mutex<Vec<LoadPhase>>);

    impl LifecycleObserver for PhaseLog {
        fn on_phase(&self, phase: LoadPhase, _elapsed: Duration) {
            self.0.lock().unwrap().push(phase);
        }
    }

    fn loader(runner: MockRunner) -> (Arc<MockRunner>, Arc<MemorySink>, PageLoader) {
        let runner = Arc::new(runner);
        let sink = Arc::new(MemorySink::new());
        let logger = StructuredLogger::new(sink.clone()).with_min_level(LogLevel::Debug);
        let loader = PageLoader::new(runner.clone(), logger);
        (runner, sink, loader)
    }

    fn plan(requests: Vec<DataRequest>) -> LoadPlan {
        LoadPlan::from_requests(requests).unwrap()
    }

    // === Load ===

    #[tokio::test]
    async fn test_load_bundles_critical_and_deferred() {
        let (_, _, loader) = loader(
            MockRunner::new()
                .ok("featured", json!({ "collections": { "nodes": [{ "id": "c1" }] } }))
                .ok_after("recommended", 30, json!({ "products": { "nodes": [] } })),
        );

        let bundle = loader
            .load(plan(vec![
                DataRequest::critical("featuredCollection", query("featured")),
                DataRequest::deferred("recommendedProducts", query("recommended")),
            ]))
            .await
            .unwrap();

        assert_eq!(bundle.critical.names().collect::<Vec<_>>(), vec!["featuredCollection"]);
        let handle = bundle.deferred.get("recommendedProducts").unwrap();
        assert!(!handle.is_resolved());
        assert_eq!(
            handle.clone().await.unwrap().as_ref(),
            &json!({ "products": { "nodes": [] } })
        );
        assert!(bundle.timing.time_to_critical().is_some());
    }

    #[tokio::test]
    async fn test_deferred_failure_does_not_block_page() {
        let (_, sink, loader) = loader(
            MockRunner::new()
                .ok("featured", json!({ "id": "c1" }))
                .err("recommended", QueryError::http(500)),
        );

        let bundle = loader
            .load(plan(vec![
                DataRequest::critical("featuredCollection", query("featured")),
                DataRequest::deferred("recommendedProducts", query("recommended")),
            ]))
            .await
            .unwrap();

        assert!(bundle.critical.get("featuredCollection").is_some());
        assert!(bundle.deferred.get("recommendedProducts").unwrap().clone().await.is_none());
        assert!(sink.contains("recommendedProducts"));
    }

    #[tokio::test]
    async fn test_deferred_dispatched_before_critical_barrier() {
        let (runner, _, loader) = loader(
            MockRunner::new()
                .ok_after("critical", 30, json!(1))
                .ok("deferred", json!(2)),
        );

        let bundle = loader
            .load(plan(vec![
                DataRequest::critical("c", query("critical")),
                DataRequest::deferred("d", query("deferred")),
            ]))
            .await
            .unwrap();

        // The deferred request finished while the critical one was in flight.
        assert_eq!(runner.completed(), 2);
        assert!(bundle.deferred.get("d").unwrap().is_resolved());
    }

    #[tokio::test]
    async fn test_critical_failure_fails_load() {
        let observer = Arc::new(PhaseLog::default());
        let (_, _, loader) = loader(
            MockRunner::new()
                .err("product", QueryError::Protocol)
                .ok("reviews", json!([])),
        );
        let loader = loader.with_observer(observer.clone());

        let err = loader
            .load(plan(vec![
                DataRequest::deferred("reviews", query("reviews")),
                DataRequest::critical("product", query("product")),
            ]))
            .await
            .unwrap_err();

        assert_eq!(err.request, "product");
        assert_eq!(err.kind, ErrorKind::Protocol);
        assert_eq!(
            *observer.0.lock().unwrap(),
            vec![
                LoadPhase::Start,
                LoadPhase::DeferredDispatched,
                LoadPhase::Error("product".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_phases_marked_on_request_timing() {
        let mut request_timing = TimingContext::new();
        request_timing.mark("routed");
        let (_, _, loader) = loader(MockRunner::new().ok("featured", json!({})));
        let loader = loader.with_timing(request_timing.clone());

        let bundle = loader
            .load(plan(vec![DataRequest::critical("featuredCollection", query("featured"))]))
            .await
            .unwrap();

        let routed = request_timing.since_start("routed").unwrap();
        assert_eq!(bundle.timing.since_start("routed"), Some(routed));
        assert!(bundle.timing.time_to_critical().unwrap() >= routed);
    }

    #[tokio::test]
    async fn test_phases_on_success() {
        let observer = Arc::new(PhaseLog::default());
        let (_, sink, loader) = loader(MockRunner::new());
        let loader = loader.with_observer(observer.clone());

        let bundle = loader.load(LoadPlan::new()).await.unwrap();

        assert!(bundle.critical.is_empty());
        assert!(bundle.deferred.is_empty());
        assert_eq!(
            *observer.0.lock().unwrap(),
            vec![
                LoadPhase::Start,
                LoadPhase::DeferredDispatched,
                LoadPhase::CriticalResolved,
                LoadPhase::Completion,
            ]
        );
        assert!(sink.contains("page load finished"));
    }
}
