//! Home page: featured collection (critical), recommended products (deferred).

use anyhow::Context;
use storefront_core::RequestContext;
use storefront_data::QueryDescriptor;
use storefront_executor::{DataRequest, LoadPlan, PendingHandle, PlanError};

use crate::data::{Collection, FeaturedCollectionData, RecommendedProducts};
use crate::queries::{locale_variables, FEATURED_COLLECTION_QUERY, RECOMMENDED_PRODUCTS_QUERY};
use crate::storefront::Storefront;

pub const HOME_PAGE: &str = "home";
pub const FEATURED_COLLECTION: &str = "featuredCollection";
pub const RECOMMENDED_PRODUCTS: &str = "recommendedProducts";

/// Data handed to the home page template.
#[derive(Debug)]
pub struct HomeData {
    /// Most recently updated collection; `None` when the shop has none.
    pub featured_collection: Option<Collection>,
    /// Resolves to `None` when the recommendation query fails or returns an
    /// unexpected shape. Clones share one decoded value.
    pub recommended_products: PendingHandle<RecommendedProducts>,
}

/// Requests the home page needs.
pub fn home_plan(commerce_endpoint: &str, ctx: &RequestContext) -> Result<LoadPlan, PlanError> {
    let locale = locale_variables(ctx);
    LoadPlan::new()
        .with(
            DataRequest::critical(
                FEATURED_COLLECTION,
                QueryDescriptor::new(commerce_endpoint, FEATURED_COLLECTION_QUERY)
                    .with_operation("FeaturedCollection"),
            )
            .with_variables(locale.clone()),
        )?
        .with(
            DataRequest::deferred(
                RECOMMENDED_PRODUCTS,
                QueryDescriptor::new(commerce_endpoint, RECOMMENDED_PRODUCTS_QUERY)
                    .with_operation("RecommendedProducts"),
            )
            .with_variables(locale),
        )
}

impl Storefront {
    /// Load the home page.
    ///
    /// Fails only when the featured collection cannot be loaded.
    pub async fn home(&self, ctx: &RequestContext) -> anyhow::Result<HomeData> {
        let plan = home_plan(self.commerce_endpoint(), ctx)?;
        let mut bundle = self
            .loader(ctx, HOME_PAGE)
            .load(plan)
            .await
            .context("home page critical data failed")?;

        let featured: FeaturedCollectionData = bundle
            .critical
            .decode(FEATURED_COLLECTION)
            .context("unexpected featured collection shape")?;
        let recommended_products = bundle
            .deferred
            .take(RECOMMENDED_PRODUCTS)
            .context("recommended products were not dispatched")?
            .decode();

        Ok(HomeData {
            featured_collection: featured.into_featured(),
            recommended_products,
        })
    }
}
