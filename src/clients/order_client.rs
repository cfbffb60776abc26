use chrono::Utc;
use tracing::{debug, error, info, instrument, warn};

use crate::actor_framework::ResourceClient;
use crate::clients::{CouponClient, CustomerClient, ProductClient};
use crate::domain::{
    CouponUse, Order, OrderCreate, OrderDraft, OrderItem, OrderPatch, OrderStatus,
};
use crate::order_actor::{OrderAction, OrderActionResult, OrderError, Transition};
use crate::pricing::{self, round_cents, NetAmount};

/// Client for interacting with the Order actor.
///
/// This client handles orchestration, validating the customer and products
/// and redeeming coupons before an order is stored.
#[derive(Clone)]
pub struct OrderClient {
    inner: ResourceClient<Order>,
    customer_client: CustomerClient,
    product_client: ProductClient,
    coupon_client: CouponClient,
}

crate::impl_client_methods!(OrderClient, Order, OrderError, order);

impl OrderClient {
    pub fn new(
        inner: ResourceClient<Order>,
        customer_client: CustomerClient,
        product_client: ProductClient,
        coupon_client: CouponClient,
    ) -> Self {
        Self {
            inner,
            customer_client,
            product_client,
            coupon_client,
        }
    }

    /// Places an order from a checkout or a manual sale.
    ///
    /// Steps: validate the draft, check the customer, snapshot product prices,
    /// redeem the coupon, then store header and items in one request. A
    /// redeemed coupon is released again when the final insert fails.
    #[instrument(
        fields(user_id = %draft.user_id, lines = draft.lines.len(), origin = ?draft.origin),
        skip(self, draft)
    )]
    pub async fn create_order(&self, draft: OrderDraft) -> Result<String, OrderError> {
        info!("Processing create_order request");
        validate_draft(&draft)?;

        // Step 1: Validate customer
        match self.customer_client.get_customer(draft.user_id.clone()).await {
            Ok(Some(customer)) => info!(customer_name = %customer.full_name, "Customer validation successful"),
            Ok(None) => {
                error!("Customer not found");
                return Err(OrderError::InvalidUser(draft.user_id.clone()));
            }
            Err(e) => {
                error!(error = %e, "Customer validation failed");
                return Err(OrderError::InvalidUser(format!("Customer validation failed: {}", e)));
            }
        }

        // Step 2: Snapshot product prices
        let mut items = Vec::with_capacity(draft.lines.len());
        for line in &draft.lines {
            let product = match self.product_client.get_product(line.product_id.clone()).await {
                Ok(Some(product)) if product.is_active => product,
                Ok(Some(_)) => {
                    error!(product_id = %line.product_id, "Product is inactive");
                    return Err(OrderError::InvalidProduct(format!("{} is not for sale", line.product_id)));
                }
                Ok(None) => {
                    error!(product_id = %line.product_id, "Product not found");
                    return Err(OrderError::InvalidProduct(line.product_id.clone()));
                }
                Err(e) => {
                    error!(error = %e, "Product validation failed");
                    return Err(OrderError::InvalidProduct(format!("Product validation failed: {}", e)));
                }
            };
            items.push(OrderItem {
                product_id: product.id,
                product_name: product.name,
                quantity: line.quantity,
                unit_price: product.price,
                total_price: product.price * f64::from(line.quantity),
                attributes: line.attributes.clone(),
            });
        }
        let subtotal = round_cents(items.iter().map(|item| item.total_price).sum());

        // Step 3: Redeem coupon
        let placed_at = draft.placed_at.unwrap_or_else(Utc::now);
        let coupon = match &draft.coupon_code {
            Some(code) => match self.coupon_client.redeem(code, subtotal, placed_at).await {
                Ok(applied) => Some(applied),
                Err(e) => {
                    error!(error = %e, "Coupon redemption failed");
                    return Err(OrderError::CouponRejected(e.to_string()));
                }
            },
            None => None,
        };

        // Step 4: Store header and items together
        let params = OrderCreate {
            user_id: draft.user_id,
            items,
            shipping_cost: draft.shipping_cost,
            discount_total: coupon.as_ref().map_or(0.0, |c| c.discount_amount),
            shipping_address: draft.shipping_address,
            payment_method: draft.payment_method,
            origin: draft.origin,
            notes: draft.notes,
            fee_rate: draft.fee_rate,
            coupon: coupon.clone(),
            placed_at: Some(placed_at),
        };

        match self.inner.create(params).await {
            Ok(id) => {
                info!(order_id = %id, subtotal, "Order created successfully");
                Ok(id)
            }
            Err(e) => {
                let e = OrderError::from(e);
                error!(error = %e, "Order insert failed");
                if let Some(applied) = coupon {
                    if let Err(release_error) = self.coupon_client.release(applied.coupon_id).await {
                        error!(error = %release_error, "Coupon release failed");
                    }
                }
                Err(e)
            }
        }
    }

    #[instrument(skip(self))]
    pub async fn list_orders_by_status(&self, status: OrderStatus) -> Result<Vec<Order>, OrderError> {
        let orders = self.list_orders().await?;
        Ok(orders.into_iter().filter(|order| order.status == status).collect())
    }

    /// Moves the order one step forward. `Ok(None)` when it was already
    /// delivered or cancelled.
    ///
    /// With `expected_revision`, the change is refused if someone else
    /// modified the order first.
    #[instrument(skip(self))]
    pub async fn advance_order(
        &self,
        id: String,
        expected_revision: Option<u64>,
    ) -> Result<Option<Transition>, OrderError> {
        debug!("Sending request");
        match self.inner.perform_action(id, OrderAction::Advance, expected_revision).await? {
            OrderActionResult::Advance(transition) => {
                if transition.is_none() {
                    warn!("Order is terminal, nothing to advance");
                }
                Ok(transition)
            }
            other => Err(unexpected(other)),
        }
    }

    #[instrument(skip(self))]
    pub async fn cancel_order(&self, id: String, expected_revision: Option<u64>) -> Result<Transition, OrderError> {
        debug!("Sending request");
        match self.inner.perform_action(id, OrderAction::Cancel, expected_revision).await? {
            OrderActionResult::Cancel(transition) => Ok(transition),
            other => Err(unexpected(other)),
        }
    }

    #[instrument(skip(self))]
    pub async fn link_payment(&self, id: String, method: String, payment_id: String) -> Result<u64, OrderError> {
        debug!("Sending request");
        let action = OrderAction::LinkPayment { method, payment_id };
        match self.inner.perform_action(id, action, None).await? {
            OrderActionResult::LinkPayment(revision) => Ok(revision),
            other => Err(unexpected(other)),
        }
    }

    #[instrument(skip(self))]
    pub async fn set_fee_rate(&self, id: String, fee_rate: Option<f64>) -> Result<u64, OrderError> {
        debug!("Sending request");
        if let Some(rate) = fee_rate {
            pricing::validate_fee_rate(rate)?;
        }
        match self.inner.perform_action(id, OrderAction::SetFeeRate(fee_rate), None).await? {
            OrderActionResult::SetFeeRate(revision) => Ok(revision),
            other => Err(unexpected(other)),
        }
    }

    #[instrument(skip(self, notes))]
    pub async fn update_notes(
        &self,
        id: String,
        notes: String,
        expected_revision: Option<u64>,
    ) -> Result<Order, OrderError> {
        debug!("Sending request");
        let patch = OrderPatch { notes: Some(notes), ..OrderPatch::default() };
        self.inner.update(id, patch, expected_revision).await.map_err(OrderError::from)
    }

    #[instrument(skip(self, patch))]
    pub async fn update_order(
        &self,
        id: String,
        patch: OrderPatch,
        expected_revision: Option<u64>,
    ) -> Result<Order, OrderError> {
        debug!("Sending request");
        self.inner.update(id, patch, expected_revision).await.map_err(OrderError::from)
    }

    /// Amount the merchant keeps after the card fee. `None` when the order has
    /// no fee rate recorded.
    #[instrument(skip(self))]
    pub async fn net_amount(&self, id: String) -> Result<Option<NetAmount>, OrderError> {
        Ok(self.require_order(id).await?.net_amount())
    }

    /// Every coupon redemption, read back from the orders that carry it.
    #[instrument(skip(self))]
    pub async fn coupon_uses(&self) -> Result<Vec<CouponUse>, OrderError> {
        let orders = self.list_orders().await?;
        Ok(orders
            .into_iter()
            .filter_map(|order| {
                order.coupon.map(|coupon| CouponUse {
                    coupon_id: coupon.coupon_id,
                    code: coupon.code,
                    order_id: order.id,
                    user_id: order.user_id,
                    discount_amount: coupon.discount_amount,
                    used_at: order.created_at,
                })
            })
            .collect())
    }
}

/// Checks the draft before any request is sent.
fn validate_draft(draft: &OrderDraft) -> Result<(), OrderError> {
    if draft.lines.is_empty() {
        return Err(OrderError::ValidationError("Order has no items".to_string()));
    }
    if let Some(line) = draft.lines.iter().find(|line| line.quantity == 0) {
        return Err(OrderError::ValidationError(format!(
            "Quantity for {} must be positive",
            line.product_id
        )));
    }
    if !(draft.shipping_cost >= 0.0) {
        return Err(OrderError::ValidationError("Shipping cost must not be negative".to_string()));
    }
    if let Some(rate) = draft.fee_rate {
        pricing::validate_fee_rate(rate)?;
    }
    Ok(())
}

fn unexpected(result: OrderActionResult) -> OrderError {
    OrderError::ActorCommunicationError(format!("Unexpected result: {:?}", result))
}
