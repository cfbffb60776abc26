use tracing::{debug, info, instrument, warn};

use crate::actor_framework::ResourceClient;
use crate::domain::{Product, ProductCreate, ProductPatch};
use crate::pricing::{
    self, BelowCostWarning, MassDiscountFailure, MassDiscountOutcome, MassDiscountPreviewItem,
};
use crate::product_actor::{ProductAction, ProductActionResult, ProductError};

/// Client for interacting with the Product actor.
#[derive(Clone)]
pub struct ProductClient {
    inner: ResourceClient<Product>,
}

crate::impl_basic_client!(ProductClient, Product, ProductError, product);

impl ProductClient {
    #[instrument(fields(product_name = %params.name), skip(self, params))]
    pub async fn create_product(&self, params: ProductCreate) -> Result<String, ProductError> {
        debug!("Sending request");
        self.inner.create(params).await.map_err(ProductError::from)
    }

    #[instrument(skip(self))]
    pub async fn update_product(&self, id: String, patch: ProductPatch) -> Result<Product, ProductError> {
        debug!("Sending request");
        self.inner.update(id, patch, None).await.map_err(ProductError::from)
    }

    #[instrument(skip(self))]
    pub async fn set_active(&self, id: String, is_active: bool) -> Result<Product, ProductError> {
        let patch = ProductPatch { is_active: Some(is_active), ..ProductPatch::default() };
        self.update_product(id, patch).await
    }

    #[instrument(skip(self))]
    pub async fn check_stock(&self, id: String) -> Result<u32, ProductError> {
        debug!("Sending request");
        match self.inner.perform_action(id, ProductAction::CheckStock, None).await? {
            ProductActionResult::CheckStock(level) => Ok(level),
            other => Err(unexpected(other)),
        }
    }

    /// Operator stock correction. Checkout never calls this.
    #[instrument(skip(self))]
    pub async fn adjust_stock(&self, id: String, delta: i64) -> Result<u32, ProductError> {
        debug!("Sending request");
        match self.inner.perform_action(id, ProductAction::AdjustStock(delta), None).await? {
            ProductActionResult::AdjustStock(level) => {
                info!(stock_level = level, "Stock adjusted");
                Ok(level)
            }
            other => Err(unexpected(other)),
        }
    }

    /// What a mass discount of `percent` would do, capped to `limit` rows.
    #[instrument(skip(self))]
    pub async fn preview_mass_discount(
        &self,
        percent: f64,
        limit: usize,
    ) -> Result<Vec<MassDiscountPreviewItem>, ProductError> {
        let products = self.list_products().await?;
        Ok(pricing::mass_discount_preview(&products, percent, limit))
    }

    /// Marks every active product down by `percent`.
    ///
    /// The percent is validated before any request is sent. Each product is
    /// updated on its own; failures are collected and the batch continues.
    /// Products ending up under their cost are reported as warnings.
    #[instrument(skip(self))]
    pub async fn apply_mass_discount(&self, percent: f64) -> Result<MassDiscountOutcome, ProductError> {
        pricing::validate_discount_percent(percent)?;

        let products = self.list_products().await?;
        let mut outcome = MassDiscountOutcome::default();

        for product in products.into_iter().filter(|product| product.is_active) {
            let action = ProductAction::ApplyDiscount(percent);

            match self.inner.perform_action(product.id.clone(), action, None).await {
                Ok(ProductActionResult::ApplyDiscount(updated)) => {
                    outcome.updated_count += 1;
                    if let Some(cost_price) = updated.cost_price.filter(|cost| updated.price < *cost) {
                        warn!(product_id = %updated.id, new_price = updated.price, cost_price, "Discounted below cost");
                        outcome.below_cost_warnings.push(BelowCostWarning {
                            product_id: updated.id.clone(),
                            name: updated.name.clone(),
                            new_price: updated.price,
                            cost_price,
                        });
                    }
                }
                Ok(other) => outcome.errors.push(failure(&product, unexpected(other))),
                Err(e) => {
                    let e = ProductError::from(e);
                    warn!(product_id = %product.id, error = %e, "Mass discount failed for product");
                    outcome.errors.push(failure(&product, e));
                }
            }
        }

        outcome.success = outcome.errors.is_empty();
        info!(
            updated = outcome.updated_count,
            failed = outcome.errors.len(),
            below_cost = outcome.below_cost_warnings.len(),
            "Mass discount applied"
        );
        Ok(outcome)
    }
}

fn failure(product: &Product, error: ProductError) -> MassDiscountFailure {
    MassDiscountFailure {
        product_id: product.id.clone(),
        name: product.name.clone(),
        error: error.to_string(),
    }
}

fn unexpected(result: ProductActionResult) -> ProductError {
    ProductError::ActorCommunicationError(format!("Unexpected result: {:?}", result))
}
