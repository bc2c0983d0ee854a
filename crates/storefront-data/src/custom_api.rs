//! Client for the custom (non-commerce) backend.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use storefront_observability::StructuredLogger;

use crate::catalog::{
    recommendations_variables, reviews_variables, CatalogQuery, ProductReviews, Recommendations,
};
use crate::envelope::Variables;
use crate::error::{QueryError, QueryResult};
use crate::executor::QueryExecutor;
use crate::query::QueryRunner;
use crate::transport::Transport;

/// Thin typed wrapper around [`QueryExecutor`] for the custom backend.
///
/// The endpoint is supplied per call. Calls are a single attempt with no
/// caching.
#[derive(Clone)]
pub struct CustomApiClient {
    executor: QueryExecutor,
}

impl CustomApiClient {
    /// Create a client over `transport`.
    pub fn new(transport: Arc<dyn Transport>, logger: StructuredLogger) -> Self {
        Self {
            executor: QueryExecutor::new(transport, logger),
        }
    }

    /// Create a client sharing an existing executor.
    pub fn from_executor(executor: QueryExecutor) -> Self {
        Self { executor }
    }

    /// Call an arbitrary query and decode `data` into `T`.
    pub async fn call<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        query: &str,
        variables: &Variables,
    ) -> QueryResult<T> {
        self.executor.execute_as(endpoint, query, variables).await
    }

    /// Call a catalog entry and decode `data` into `T`.
    pub async fn call_catalog<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        query: CatalogQuery,
        variables: &Variables,
    ) -> QueryResult<T> {
        let data = self.executor.run(&query.descriptor(endpoint), variables).await?;
        serde_json::from_value(data).map_err(QueryError::from)
    }

    /// Fetch a page of reviews for a product.
    pub async fn product_reviews(
        &self,
        endpoint: &str,
        product_id: &str,
        first: Option<u32>,
    ) -> QueryResult<ProductReviews> {
        let vars = reviews_variables(product_id, first);
        self.call_catalog(endpoint, CatalogQuery::ProductReviews, &vars).await
    }

    /// Fetch recommendations for a product, personalized when `user_id` is given.
    pub async fn ai_recommendations(
        &self,
        endpoint: &str,
        product_id: &str,
        user_id: Option<&str>,
    ) -> QueryResult<Recommendations> {
        let vars = recommendations_variables(product_id, user_id);
        self.call_catalog(endpoint, CatalogQuery::AiRecommendations, &vars).await
    }
}
