//! Product models.

use serde::{Deserialize, Serialize};

use super::collection::{Connection, Image};

/// Monetary amount as returned by the commerce API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoneyV2 {
    /// Decimal string, e.g. `"1200.0"`.
    pub amount: String,
    pub currency_code: String,
}

impl MoneyV2 {
    /// Format with currency.
    pub fn format(&self) -> String {
        let amount: f64 = self.amount.parse().unwrap_or(0.0);
        match self.currency_code.as_str() {
            "USD" => format!("${:.2}", amount),
            "JPY" => format!("¥{:.0}", amount),
            "EUR" => format!("€{:.2}", amount),
            _ => format!("{:.2} {}", amount, self.currency_code),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceRange {
    pub min_variant_price: MoneyV2,
}

/// Product card on the home page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendedProduct {
    pub id: String,
    pub title: String,
    pub handle: String,
    pub price_range: PriceRange,
    #[serde(default)]
    pub featured_image: Option<Image>,
}

impl RecommendedProduct {
    /// Storefront path of the product.
    pub fn path(&self) -> String {
        format!("/products/{}", self.handle)
    }
}

/// `data` of the recommended products query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendedProducts {
    pub products: Connection<RecommendedProduct>,
}

/// Product detail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub title: String,
    pub handle: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub vendor: Option<String>,
    pub price_range: PriceRange,
    #[serde(default)]
    pub featured_image: Option<Image>,
}

/// `data` of the product query; `product` is null for unknown handles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductQueryData {
    pub product: Option<Product>,
}
