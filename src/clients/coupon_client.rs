use chrono::{DateTime, Utc};
use tracing::{debug, info, instrument, warn};

use crate::actor_framework::ResourceClient;
use crate::coupon_actor::{CouponAction, CouponActionResult, CouponError};
use crate::domain::{AppliedCoupon, Coupon, CouponCreate, CouponPatch};

/// Client for interacting with the Coupon actor.
#[derive(Clone)]
pub struct CouponClient {
    inner: ResourceClient<Coupon>,
}

crate::impl_basic_client!(CouponClient, Coupon, CouponError, coupon);

impl CouponClient {
    /// Codes are unique after normalisation; a taken code fails with
    /// [`CouponError::AlreadyExists`].
    #[instrument(fields(code = %params.code), skip(self, params))]
    pub async fn create_coupon(&self, params: CouponCreate) -> Result<String, CouponError> {
        debug!("Sending request");
        self.inner.create(params).await.map_err(CouponError::from)
    }

    #[instrument(skip(self))]
    pub async fn update_coupon(&self, id: String, patch: CouponPatch) -> Result<Coupon, CouponError> {
        debug!("Sending request");
        self.inner.update(id, patch, None).await.map_err(CouponError::from)
    }

    /// Looks a coupon up by code, ignoring case and surrounding spaces.
    #[instrument(skip(self))]
    pub async fn find_by_code(&self, code: &str) -> Result<Option<Coupon>, CouponError> {
        let code = code.trim().to_uppercase();
        let coupons = self.list_coupons().await?;
        Ok(coupons.into_iter().find(|coupon| coupon.code == code))
    }

    /// Consumes one use of `code` for an order of `subtotal`.
    #[instrument(skip(self))]
    pub async fn redeem(&self, code: &str, subtotal: f64, at: DateTime<Utc>) -> Result<AppliedCoupon, CouponError> {
        let coupon = self
            .find_by_code(code)
            .await?
            .ok_or_else(|| CouponError::NotFound(code.to_string()))?;

        let action = CouponAction::Redeem { subtotal, at };
        match self.inner.perform_action(coupon.id.clone(), action, None).await? {
            CouponActionResult::Redeem(discount_amount) => {
                info!(coupon_id = %coupon.id, discount_amount, "Coupon redeemed");
                Ok(AppliedCoupon { coupon_id: coupon.id, code: coupon.code, discount_amount })
            }
            other => Err(CouponError::ActorCommunicationError(format!("Unexpected result: {:?}", other))),
        }
    }

    /// Returns a use taken by [`CouponClient::redeem`] for an order that was
    /// never stored.
    #[instrument(skip(self))]
    pub async fn release(&self, coupon_id: String) -> Result<u32, CouponError> {
        warn!("Releasing coupon use");
        match self.inner.perform_action(coupon_id, CouponAction::Release, None).await? {
            CouponActionResult::Release(used_count) => Ok(used_count),
            other => Err(CouponError::ActorCommunicationError(format!("Unexpected result: {:?}", other))),
        }
    }
}
