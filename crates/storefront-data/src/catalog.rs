//! Static query catalog for the custom backend.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::envelope::Variables;
use crate::query::QueryDescriptor;

/// Product reviews, paged.
pub const PRODUCT_REVIEWS_QUERY: &str = r#"
  query ProductReviews($productId: String!, $first: Int = 10) {
    reviews(productId: $productId, first: $first) {
      edges {
        node { id author rating title body createdAt verified }
      }
      averageRating
      totalCount
    }
  }
"#;

/// Model-generated recommendations for a product, optionally personalized.
pub const AI_RECOMMENDATIONS_QUERY: &str = r#"
  query AIRecommendations($productId: String!, $userId: String) {
    recommendations(productId: $productId, userId: $userId) {
      products { shopifyProductId score reason }
    }
  }
"#;

/// Default page size of the reviews query.
pub const DEFAULT_REVIEWS_PAGE: u32 = 10;

/// Named entries of the custom backend's query catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CatalogQuery {
    /// `ProductReviews(productId, first = 10)`.
    ProductReviews,
    /// `AIRecommendations(productId, userId?)`.
    AiRecommendations,
}

impl CatalogQuery {
    /// Every catalog entry.
    pub const ALL: [CatalogQuery; 2] = [Self::ProductReviews, Self::AiRecommendations];

    /// GraphQL operation name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::ProductReviews => "ProductReviews",
            Self::AiRecommendations => "AIRecommendations",
        }
    }

    /// Query document text.
    pub fn document(&self) -> &'static str {
        match self {
            Self::ProductReviews => PRODUCT_REVIEWS_QUERY,
            Self::AiRecommendations => AI_RECOMMENDATIONS_QUERY,
        }
    }

    /// Descriptor targeting `endpoint`.
    pub fn descriptor(&self, endpoint: impl Into<String>) -> QueryDescriptor {
        QueryDescriptor::new(endpoint, self.document()).with_operation(self.name())
    }
}

impl fmt::Display for CatalogQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned for an unknown catalog name.
#[derive(Debug, Clone, thiserror::Error)]
#[error("unknown catalog query: {0}")]
pub struct UnknownQuery(pub String);

impl FromStr for CatalogQuery {
    type Err = UnknownQuery;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ProductReviews" | "product_reviews" => Ok(Self::ProductReviews),
            "AIRecommendations" | "ai_recommendations" => Ok(Self::AiRecommendations),
            _ => Err(UnknownQuery(s.to_string())),
        }
    }
}

/// Variables for [`CatalogQuery::ProductReviews`].
pub fn reviews_variables(product_id: &str, first: Option<u32>) -> Variables {
    let mut vars = Variables::new();
    vars.insert("productId".to_string(), Value::from(product_id));
    if let Some(first) = first {
        vars.insert("first".to_string(), Value::from(first));
    }
    vars
}

/// Variables for [`CatalogQuery::AiRecommendations`].
pub fn recommendations_variables(product_id: &str, user_id: Option<&str>) -> Variables {
    let mut vars = Variables::new();
    vars.insert("productId".to_string(), Value::from(product_id));
    if let Some(user_id) = user_id {
        vars.insert("userId".to_string(), Value::from(user_id));
    }
    vars
}

/// `data` of the reviews query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductReviews {
    pub reviews: ReviewConnection,
}

/// A page of reviews plus aggregate rating.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewConnection {
    #[serde(default)]
    pub edges: Vec<ReviewEdge>,
    pub average_rating: f64,
    pub total_count: u32,
}

impl ReviewConnection {
    /// Review nodes in page order.
    pub fn nodes(&self) -> impl Iterator<Item = &Review> {
        self.edges.iter().map(|e| &e.node)
    }
}

/// Edge wrapper of the reviews connection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewEdge {
    pub node: Review,
}

/// Individual review.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: String,
    pub author: String,
    pub rating: u8,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
    pub created_at: String,
    #[serde(default)]
    pub verified: bool,
}

/// `data` of the recommendations query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendations {
    pub recommendations: RecommendationList,
}

/// Recommended products.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationList {
    #[serde(default)]
    pub products: Vec<Recommendation>,
}

/// One recommended product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    /// Commerce product ID the recommendation points at.
    #[serde(rename = "shopifyProductId", alias = "productId")]
    pub product_id: String,
    pub score: f64,
    #[serde(default)]
    pub reason: Option<String>,
}
