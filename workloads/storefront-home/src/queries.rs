//! Commerce query documents and variable helpers.

use serde_json::Value;
use storefront_core::RequestContext;
use storefront_data::Variables;

pub const FEATURED_COLLECTION_QUERY: &str = r#"
  fragment FeaturedCollection on Collection {
    id
    title
    image {
      id
      url
      altText
      width
      height
    }
    handle
  }
  query FeaturedCollection($country: CountryCode, $language: LanguageCode)
    @inContext(country: $country, language: $language) {
    collections(first: 1, sortKey: UPDATED_AT, reverse: true) {
      nodes {
        ...FeaturedCollection
      }
    }
  }
"#;

pub const RECOMMENDED_PRODUCTS_QUERY: &str = r#"
  fragment RecommendedProduct on Product {
    id
    title
    handle
    priceRange {
      minVariantPrice {
        amount
        currencyCode
      }
    }
    featuredImage {
      id
      url
      altText
      width
      height
    }
  }
  query RecommendedProducts($country: CountryCode, $language: LanguageCode)
    @inContext(country: $country, language: $language) {
    products(first: 4, sortKey: UPDATED_AT, reverse: true) {
      nodes {
        ...RecommendedProduct
      }
    }
  }
"#;

pub const PRODUCT_QUERY: &str = r#"
  query Product($handle: String!, $country: CountryCode, $language: LanguageCode)
    @inContext(country: $country, language: $language) {
    product(handle: $handle) {
      id
      title
      handle
      description
      vendor
      priceRange {
        minVariantPrice {
          amount
          currencyCode
        }
      }
      featuredImage {
        id
        url
        altText
        width
        height
      }
    }
  }
"#;

/// `country` / `language` variables from the buyer locale.
///
/// Unset locale parts are omitted so the API falls back to shop defaults.
pub fn locale_variables(ctx: &RequestContext) -> Variables {
    ctx.locale
        .variable_pairs()
        .into_iter()
        .map(|(key, value)| (key.to_string(), Value::from(value)))
        .collect()
}
