use chrono::Utc;
use tracing::{debug, info};

use super::actions::{OrderAction, OrderActionResult, Transition};
use super::error::OrderError;
use crate::actor_framework::Entity;
use crate::domain::{Order, OrderCreate, OrderPatch, OrderStatus};
use crate::pricing::{self, round_cents};

impl Entity for Order {
    type Id = String;
    type CreateParams = OrderCreate;
    type Patch = OrderPatch;
    type Action = OrderAction;
    type ActionResult = OrderActionResult;
    type Error = OrderError;

    fn id(&self) -> &String {
        &self.id
    }

    /// Creates a new Order, header and items together.
    ///
    /// # Notes
    /// Line totals are recomputed from `unit_price * quantity` and the order
    /// starts in [`OrderStatus::Created`] at revision 1.
    fn from_create_params(id: String, params: OrderCreate) -> Result<Self, OrderError> {
        if params.items.is_empty() {
            return Err(OrderError::ValidationError("Order has no items".to_string()));
        }
        if params.shipping_cost < 0.0 || params.discount_total < 0.0 {
            return Err(OrderError::ValidationError("Amounts must not be negative".to_string()));
        }
        if let Some(rate) = params.fee_rate {
            pricing::validate_fee_rate(rate)?;
        }

        let mut items = params.items;
        for item in &mut items {
            if item.quantity == 0 {
                return Err(OrderError::ValidationError(format!(
                    "Quantity for {} must be positive",
                    item.product_id
                )));
            }
            if !(item.unit_price >= 0.0 && item.unit_price.is_finite()) {
                return Err(OrderError::ValidationError(format!(
                    "Unit price for {} must not be negative",
                    item.product_id
                )));
            }
            item.total_price = item.unit_price * f64::from(item.quantity);
        }

        let subtotal = round_cents(items.iter().map(|item| item.total_price).sum());
        let total = round_cents((subtotal + params.shipping_cost - params.discount_total).max(0.0));
        let now = Utc::now();

        Ok(Self {
            id,
            user_id: params.user_id,
            status: OrderStatus::Created,
            items,
            subtotal,
            shipping_cost: params.shipping_cost,
            discount_total: params.discount_total,
            total,
            shipping_address: params.shipping_address,
            payment_method: params.payment_method,
            payment_id: None,
            origin: params.origin,
            notes: params.notes,
            fee_rate: params.fee_rate,
            coupon: params.coupon,
            created_at: params.placed_at.unwrap_or(now),
            updated_at: now,
            revision: 1,
        })
    }

    fn revision(&self) -> Option<u64> {
        Some(self.revision)
    }

    /// Revision only moves when a field actually changes.
    fn on_update(&mut self, patch: OrderPatch) -> Result<(), OrderError> {
        let mut changed = false;
        if let Some(notes) = patch.notes {
            let notes = Some(notes).filter(|n| !n.trim().is_empty());
            if notes != self.notes {
                self.notes = notes;
                changed = true;
            }
        }
        if let Some(address) = patch.shipping_address {
            if self.shipping_address.as_ref() != Some(&address) {
                self.shipping_address = Some(address);
                changed = true;
            }
        }
        if changed {
            self.touch();
        }
        Ok(())
    }

    /// Orders are never removed; cancellation is a status.
    fn on_delete(&self) -> Result<(), OrderError> {
        Err(OrderError::ValidationError(format!(
            "Order {} cannot be deleted, cancel it instead",
            self.id
        )))
    }

    /// Handles order-specific actions.
    ///
    /// # Errors
    /// `Cancel` on a delivered or cancelled order and an out-of-range fee rate
    /// are rejected without changing the order.
    fn handle_action(&mut self, action: OrderAction) -> Result<OrderActionResult, OrderError> {
        match action {
            OrderAction::Advance => {
                let Some(next) = self.status.successor() else {
                    debug!(order_id = %self.id, status = %self.status, "Order already terminal");
                    return Ok(OrderActionResult::Advance(None));
                };
                Ok(OrderActionResult::Advance(Some(self.transition_to(next))))
            }
            OrderAction::Cancel => {
                if !self.status.can_cancel() {
                    return Err(OrderError::InvalidTransition { from: self.status, action: "cancel" });
                }
                Ok(OrderActionResult::Cancel(self.transition_to(OrderStatus::Cancelled)))
            }
            OrderAction::LinkPayment { method, payment_id } => {
                self.payment_method = Some(method);
                self.payment_id = Some(payment_id);
                self.touch();
                Ok(OrderActionResult::LinkPayment(self.revision))
            }
            OrderAction::SetFeeRate(rate) => {
                if let Some(rate) = rate {
                    pricing::validate_fee_rate(rate)?;
                }
                self.fee_rate = rate;
                self.touch();
                Ok(OrderActionResult::SetFeeRate(self.revision))
            }
        }
    }
}

impl Order {
    fn touch(&mut self) {
        self.revision += 1;
        self.updated_at = Utc::now();
    }

    fn transition_to(&mut self, next: OrderStatus) -> Transition {
        let from = self.status;
        self.status = next;
        self.touch();
        info!(order_id = %self.id, from = %from, to = %next, "Order status changed");
        Transition { from, to: next, revision: self.revision }
    }

    /// Fee breakdown of the total, only for orders with a known fee rate.
    #[must_use]
    pub fn net_amount(&self) -> Option<pricing::NetAmount> {
        self.fee_rate.map(|rate| pricing::calculate_net_amount(self.total, rate))
    }
}
