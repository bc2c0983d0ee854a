//! Single-resolution handles for deferred results.

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use futures::future::{BoxFuture, FutureExt, Shared};
use serde::de::DeserializeOwned;
use serde_json::Value;
use storefront_observability::StructuredLogger;

/// Eventually-available result of a deferred request.
///
/// Resolves exactly once, to `Some(value)` on success or `None` when the
/// request failed and its section should be omitted. Clones observe the same
/// resolution; awaiting a clone never re-runs the request.
pub struct PendingHandle<T = Value> {
    name: Arc<str>,
    logger: StructuredLogger,
    inner: Shared<BoxFuture<'static, Option<Arc<T>>>>,
}

impl<T> Clone for PendingHandle<T> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            logger: self.logger.clone(),
            inner: self.inner.clone(),
        }
    }
}

impl<T: Send + Sync + 'static> PendingHandle<T> {
    /// Wrap a future producing the resolution.
    pub fn new<F>(name: impl Into<Arc<str>>, logger: StructuredLogger, resolution: F) -> Self
    where
        F: Future<Output = Option<Arc<T>>> + Send + 'static,
    {
        Self {
            name: name.into(),
            logger,
            inner: resolution.boxed().shared(),
        }
    }

    /// A handle that is already resolved.
    pub fn ready(name: impl Into<Arc<str>>, value: Option<T>) -> Self {
        let value = value.map(Arc::new);
        let handle = Self::new(name, StructuredLogger::tracing(), async move { value });
        // Drive the ready future once so the resolution is observable immediately.
        let _ = handle.inner.clone().now_or_never();
        handle
    }

    /// Name of the request this handle belongs to.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether the handle has resolved.
    pub fn is_resolved(&self) -> bool {
        self.peek().is_some()
    }

    /// Non-blocking view of the resolution.
    ///
    /// The outer `None` means still pending; `Some(None)` means the request
    /// failed.
    pub fn peek(&self) -> Option<Option<Arc<T>>> {
        if let Some(value) = self.inner.peek() {
            return Some(value.clone());
        }
        self.inner.clone().now_or_never()
    }

    /// Invoke `callback` once with the resolution.
    ///
    /// The callback runs on a spawned task; must be called within a Tokio
    /// runtime.
    pub fn on_resolved<F>(&self, callback: F) -> tokio::task::JoinHandle<()>
    where
        F: FnOnce(Option<Arc<T>>) + Send + 'static,
    {
        let handle = self.clone();
        tokio::spawn(async move {
            callback(handle.await);
        })
    }

    /// Transform the resolved value, keeping the single-resolution guarantee.
    ///
    /// Returning `None` from `f` degrades the new handle to the failure sentinel.
    pub fn map<U, F>(&self, f: F) -> PendingHandle<U>
    where
        U: Send + Sync + 'static,
        F: FnOnce(Arc<T>) -> Option<U> + Send + 'static,
    {
        let source = self.clone();
        PendingHandle::new(self.name.clone(), self.logger.clone(), async move {
            source.await.and_then(f).map(Arc::new)
        })
    }
}

impl PendingHandle<Value> {
    /// Typed view of the resolved value.
    ///
    /// A shape mismatch resolves the typed handle to `None` and logs a warning.
    pub fn decode<U>(&self) -> PendingHandle<U>
    where
        U: DeserializeOwned + Send + Sync + 'static,
    {
        let name = self.name.clone();
        let logger = self.logger.clone();
        self.map(move |value| match U::deserialize(value.as_ref()) {
            Ok(decoded) => Some(decoded),
            Err(e) => {
                logger
                    .warn_builder("deferred data did not match expected shape")
                    .field("request", name.as_ref())
                    .field("error", e.to_string())
                    .emit();
                None
            }
        })
    }
}

impl<T> Future for PendingHandle<T> {
    type Output = Option<Arc<T>>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        self.inner.poll_unpin(cx)
    }
}

impl<T> fmt::Debug for PendingHandle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PendingHandle")
            .field("name", &self.name)
            .field("resolved", &self.inner.peek().is_some())
            .finish()
    }
}
