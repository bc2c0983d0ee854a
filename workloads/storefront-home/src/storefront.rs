//! Storefront wiring: executors, routing and per-request loaders.

use std::fmt;
use std::sync::Arc;

use anyhow::Context;
use async_trait::async_trait;
use serde_json::Value;
use storefront_core::{RequestContext, StorefrontConfig};
use storefront_data::{
    CustomApiClient, QueryDescriptor, QueryExecutor, QueryResult, QueryRunner, ReqwestTransport,
    Transport, Variables,
};
use storefront_executor::PageLoader;
use storefront_observability::StructuredLogger;

/// Routes each query to the executor owning its endpoint.
///
/// The commerce access token is only attached to commerce requests.
pub struct EndpointRouter {
    commerce_endpoint: String,
    commerce: QueryExecutor,
    custom: QueryExecutor,
}

#[async_trait]
impl QueryRunner for EndpointRouter {
    async fn run(&self, query: &QueryDescriptor, variables: &Variables) -> QueryResult<Value> {
        if query.endpoint == self.commerce_endpoint {
            self.commerce.run(query, variables).await
        } else {
            self.custom.run(query, variables).await
        }
    }
}

/// Entry point for page loads.
#[derive(Clone)]
pub struct Storefront {
    runner: Arc<dyn QueryRunner>,
    logger: StructuredLogger,
    commerce_endpoint: String,
    custom_endpoint: Option<String>,
    custom_api: CustomApiClient,
}

impl fmt::Debug for Storefront {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Storefront")
            .field("commerce_endpoint", &self.commerce_endpoint)
            .field("custom_endpoint", &self.custom_endpoint)
            .finish_non_exhaustive()
    }
}

impl Storefront {
    /// Wire a storefront over `transport`.
    pub fn new(
        transport: Arc<dyn Transport>,
        logger: StructuredLogger,
        commerce_endpoint: impl Into<String>,
        commerce_token: Option<(&str, &str)>,
        custom_endpoint: Option<String>,
    ) -> Self {
        let commerce_endpoint = commerce_endpoint.into();

        let mut commerce = QueryExecutor::new(transport.clone(), logger.clone());
        if let Some((header, token)) = commerce_token {
            commerce = commerce.with_default_header(header, token);
        }
        let custom = QueryExecutor::new(transport, logger.clone());
        let custom_api = CustomApiClient::from_executor(custom.clone());

        let runner = Arc::new(EndpointRouter {
            commerce_endpoint: commerce_endpoint.clone(),
            commerce,
            custom,
        });

        Self {
            runner,
            logger,
            commerce_endpoint,
            custom_endpoint,
            custom_api,
        }
    }

    /// Wire a storefront from configuration, using the reqwest transport.
    pub fn from_config(config: &StorefrontConfig) -> anyhow::Result<Self> {
        config.validate().context("invalid storefront configuration")?;
        let transport =
            ReqwestTransport::from_config(&config.transport).context("failed to build transport")?;
        let logger = StructuredLogger::from_config(&config.logging);

        Ok(Self::new(
            Arc::new(transport),
            logger,
            config.commerce.endpoint.clone(),
            config.commerce.token_pair(),
            config.custom_endpoint().map(str::to_string),
        ))
    }

    pub fn commerce_endpoint(&self) -> &str {
        &self.commerce_endpoint
    }

    pub fn custom_endpoint(&self) -> Option<&str> {
        self.custom_endpoint.as_deref()
    }

    /// Direct client for the custom backend.
    pub fn custom_api(&self) -> &CustomApiClient {
        &self.custom_api
    }

    /// Loader scoped to one request and page, timed from the request's arrival.
    pub fn loader(&self, ctx: &RequestContext, page: &str) -> PageLoader {
        let logger = self
            .logger
            .clone()
            .with_request_id(ctx.request_id.clone())
            .with_page(page);
        PageLoader::new(self.runner.clone(), logger).with_timing(ctx.timing.clone())
    }
}
