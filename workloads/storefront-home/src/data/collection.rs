//! Collection and image models.

use serde::{Deserialize, Serialize};

/// GraphQL `nodes` connection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Connection<T> {
    #[serde(default = "Vec::new")]
    pub nodes: Vec<T>,
}

/// Commerce image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Image {
    #[serde(default)]
    pub id: Option<String>,
    pub url: String,
    #[serde(default)]
    pub alt_text: Option<String>,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
}

impl Image {
    /// Alt text, falling back to `title`.
    pub fn alt_or<'a>(&'a self, title: &'a str) -> &'a str {
        self.alt_text.as_deref().filter(|a| !a.is_empty()).unwrap_or(title)
    }
}

/// Collection shown on the home page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Collection {
    pub id: String,
    pub title: String,
    pub handle: String,
    #[serde(default)]
    pub image: Option<Image>,
}

impl Collection {
    /// Storefront path of the collection.
    pub fn path(&self) -> String {
        format!("/collections/{}", self.handle)
    }
}

/// `data` of the featured collection query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeaturedCollectionData {
    pub collections: Connection<Collection>,
}

impl FeaturedCollectionData {
    /// Most recently updated collection, if any.
    pub fn into_featured(self) -> Option<Collection> {
        self.collections.nodes.into_iter().next()
    }
}
