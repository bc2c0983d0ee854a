//! Product page: product (critical), reviews and AI recommendations (deferred).

use anyhow::{anyhow, Context};
use storefront_core::RequestContext;
use storefront_data::{
    recommendations_variables, reviews_variables, CatalogQuery, ProductReviews, QueryDescriptor,
    Recommendations, DEFAULT_REVIEWS_PAGE,
};
use storefront_executor::{DataRequest, LoadPlan, PendingHandle, PlanError};

use crate::data::{Product, ProductQueryData};
use crate::queries::{locale_variables, PRODUCT_QUERY};
use crate::storefront::Storefront;

pub const PRODUCT_PAGE: &str = "product";
pub const PRODUCT: &str = "product";
pub const REVIEWS: &str = "reviews";
pub const RECOMMENDATIONS: &str = "recommendations";
/// Route parameter carrying the product handle (`/products/:handle`).
pub const HANDLE_PARAM: &str = "handle";

/// Data handed to the product page template.
#[derive(Debug)]
pub struct ProductData {
    pub product: Product,
    /// `None` when no custom backend is configured.
    pub reviews: Option<PendingHandle<ProductReviews>>,
    /// `None` when no custom backend is configured.
    pub recommendations: Option<PendingHandle<Recommendations>>,
}

/// Requests the product page needs.
///
/// The custom backend keys reviews and recommendations by product handle.
/// They are only requested when `custom_endpoint` is set.
pub fn product_plan(
    commerce_endpoint: &str,
    custom_endpoint: Option<&str>,
    handle: &str,
    user_id: Option<&str>,
    ctx: &RequestContext,
) -> Result<LoadPlan, PlanError> {
    let mut plan = LoadPlan::new();
    plan.push(
        DataRequest::critical(
            PRODUCT,
            QueryDescriptor::new(commerce_endpoint, PRODUCT_QUERY).with_operation("Product"),
        )
        .with_variable("handle", handle)
        .with_variables(locale_variables(ctx)),
    )?;

    if let Some(endpoint) = custom_endpoint {
        plan.push(
            DataRequest::deferred(REVIEWS, CatalogQuery::ProductReviews.descriptor(endpoint))
                .with_variables(reviews_variables(handle, Some(DEFAULT_REVIEWS_PAGE))),
        )?;
        plan.push(
            DataRequest::deferred(
                RECOMMENDATIONS,
                CatalogQuery::AiRecommendations.descriptor(endpoint),
            )
            .with_variables(recommendations_variables(handle, user_id)),
        )?;
    }

    Ok(plan)
}

impl Storefront {
    /// Load the product page for the `handle` route parameter.
    ///
    /// Fails when the parameter is missing, the product query fails or the
    /// handle is unknown.
    pub async fn product(
        &self,
        ctx: &RequestContext,
        user_id: Option<&str>,
    ) -> anyhow::Result<ProductData> {
        let handle = ctx
            .param(HANDLE_PARAM)
            .ok_or_else(|| anyhow!("missing route parameter: {}", HANDLE_PARAM))?;
        let plan = product_plan(
            self.commerce_endpoint(),
            self.custom_endpoint(),
            handle,
            user_id,
            ctx,
        )?;
        let mut bundle = self
            .loader(ctx, PRODUCT_PAGE)
            .load(plan)
            .await
            .context("product page critical data failed")?;

        let data: ProductQueryData = bundle
            .critical
            .decode(PRODUCT)
            .context("unexpected product shape")?;
        let product = data
            .product
            .ok_or_else(|| anyhow!("product not found: {}", handle))?;

        Ok(ProductData {
            product,
            reviews: bundle.deferred.take(REVIEWS).map(|h| h.decode()),
            recommendations: bundle.deferred.take(RECOMMENDATIONS).map(|h| h.decode()),
        })
    }
}
