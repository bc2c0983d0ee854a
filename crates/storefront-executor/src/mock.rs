//! Scripted query runner for orchestration tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use storefront_data::{QueryDescriptor, QueryError, QueryResult, QueryRunner, Variables};

pub(crate) const ENDPOINT: &str = "https://shop.example.com/api/graphql.json";

/// Descriptor whose document doubles as the script key.
pub(crate) fn query(document: &'static str) -> QueryDescriptor {
    QueryDescriptor::new(ENDPOINT, document)
}

enum Reply {
    Result(QueryResult<Value>),
    Panic,
}

struct Script {
    delay: Duration,
    reply: Reply,
}

/// Runner answering by query document, after an optional delay.
#[derive(Default)]
pub(crate) struct MockRunner {
    scripts: HashMap<&'static str, Script>,
    calls: Mutex<Vec<String>>,
    completed: AtomicUsize,
}

impl MockRunner {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn ok(self, document: &'static str, value: Value) -> Self {
        self.script(document, Duration::ZERO, Reply::Result(Ok(value)))
    }

    pub(crate) fn ok_after(self, document: &'static str, ms: u64, value: Value) -> Self {
        self.script(document, Duration::from_millis(ms), Reply::Result(Ok(value)))
    }

    pub(crate) fn err(self, document: &'static str, error: QueryError) -> Self {
        self.script(document, Duration::ZERO, Reply::Result(Err(error)))
    }

    pub(crate) fn err_after(self, document: &'static str, ms: u64, error: QueryError) -> Self {
        self.script(document, Duration::from_millis(ms), Reply::Result(Err(error)))
    }

    pub(crate) fn panic(self, document: &'static str) -> Self {
        self.script(document, Duration::ZERO, Reply::Panic)
    }

    fn script(mut self, document: &'static str, delay: Duration, reply: Reply) -> Self {
        self.scripts.insert(document, Script { delay, reply });
        self
    }

    /// Documents run so far, in call order.
    pub(crate) fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub(crate) fn call_count(&self, document: &str) -> usize {
        self.calls().iter().filter(|c| c.as_str() == document).count()
    }

    /// Number of runs that reached their reply.
    pub(crate) fn completed(&self) -> usize {
        self.completed.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl QueryRunner for MockRunner {
    async fn run(&self, query: &QueryDescriptor, _variables: &Variables) -> QueryResult<Value> {
        self.calls.lock().unwrap().push(query.document.to_string());

        let Some(script) = self.scripts.get(query.document.as_ref()) else {
            return Err(QueryError::Connection(format!("unscripted query {}", query.document)));
        };
        if !script.delay.is_zero() {
            tokio::time::sleep(script.delay).await;
        }
        self.completed.fetch_add(1, Ordering::SeqCst);
        match &script.reply {
            Reply::Result(result) => result.clone(),
            Reply::Panic => panic!("runner panicked on {}", query.document),
        }
    }
}
