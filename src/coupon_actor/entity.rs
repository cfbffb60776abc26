use super::actions::{CouponAction, CouponActionResult};
use super::error::CouponError;
use crate::actor_framework::Entity;
use crate::domain::{Coupon, CouponCreate, CouponKind, CouponPatch};

impl Entity for Coupon {
    type Id = String;
    type CreateParams = CouponCreate;
    type Patch = CouponPatch;
    type Action = CouponAction;
    type ActionResult = CouponActionResult;
    type Error = CouponError;

    fn id(&self) -> &String {
        &self.id
    }

    /// Codes are stored upper-cased, so this is the lookup key as well.
    fn unique_key(&self) -> Option<String> {
        Some(self.code.clone())
    }

    /// Codes are stored trimmed and upper-cased.
    fn from_create_params(id: String, params: CouponCreate) -> Result<Self, CouponError> {
        let code = params.code.trim().to_uppercase();
        if code.is_empty() {
            return Err(CouponError::ValidationError("Code required".to_string()));
        }
        match params.kind {
            CouponKind::Percentage(p) if !(p > 0.0 && p <= 100.0) => {
                return Err(CouponError::ValidationError(format!("Invalid percentage: {}", p)));
            }
            CouponKind::Fixed(amount) if !(amount > 0.0) => {
                return Err(CouponError::ValidationError(format!("Invalid amount: {}", amount)));
            }
            _ => {}
        }
        if params.expires_at.is_some_and(|expires| expires <= params.starts_at) {
            return Err(CouponError::ValidationError("Coupon expires before it starts".to_string()));
        }

        Ok(Self {
            id,
            code,
            kind: params.kind,
            max_uses: params.max_uses,
            used_count: 0,
            min_purchase: params.min_purchase,
            starts_at: params.starts_at,
            expires_at: params.expires_at,
            is_active: true,
        })
    }

    fn on_update(&mut self, patch: CouponPatch) -> Result<(), CouponError> {
        if let Some(Some(expires)) = patch.expires_at {
            if expires <= self.starts_at {
                return Err(CouponError::ValidationError("Coupon expires before it starts".to_string()));
            }
        }
        if let Some(max_uses) = patch.max_uses {
            self.max_uses = max_uses;
        }
        if let Some(min_purchase) = patch.min_purchase {
            self.min_purchase = min_purchase;
        }
        if let Some(expires_at) = patch.expires_at {
            self.expires_at = expires_at;
        }
        if let Some(is_active) = patch.is_active {
            self.is_active = is_active;
        }
        Ok(())
    }

    /// Used coupons stay for the history of the orders that carry them.
    fn on_delete(&self) -> Result<(), CouponError> {
        if self.used_count > 0 {
            return Err(CouponError::ValidationError(format!(
                "Coupon {} was used {} times, deactivate it instead",
                self.code, self.used_count
            )));
        }
        Ok(())
    }

    /// Handles redemption bookkeeping.
    ///
    /// # Errors
    /// `Redeem` fails for inactive, expired or exhausted coupons and when the
    /// subtotal is under the minimum purchase.
    fn handle_action(&mut self, action: CouponAction) -> Result<CouponActionResult, CouponError> {
        match action {
            CouponAction::Redeem { subtotal, at } => {
                if !self.is_active {
                    return Err(CouponError::Inactive(self.code.clone()));
                }
                if !self.is_within_window(at) {
                    return Err(CouponError::OutsideWindow(self.code.clone()));
                }
                if !self.has_uses_left() {
                    return Err(CouponError::Exhausted(self.code.clone()));
                }
                if let Some(minimum) = self.min_purchase {
                    if subtotal < minimum {
                        return Err(CouponError::BelowMinimum { code: self.code.clone(), minimum });
                    }
                }
                self.used_count += 1;
                Ok(CouponActionResult::Redeem(self.kind.discount_for(subtotal)))
            }
            CouponAction::Release => {
                self.used_count = self.used_count.saturating_sub(1);
                Ok(CouponActionResult::Release(self.used_count))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn coupon(kind: CouponKind) -> Coupon {
        let mut params = CouponCreate::new(" welcome10 ", kind);
        params.max_uses = Some(2);
        params.min_purchase = Some(50.0);
        Coupon::from_create_params("coupon_1".into(), params).unwrap()
    }

    fn redeem(coupon: &mut Coupon, subtotal: f64) -> Result<CouponActionResult, CouponError> {
        coupon.handle_action(CouponAction::Redeem { subtotal, at: Utc::now() })
    }

    #[test]
    fn test_code_is_normalized_and_kind_validated() {
        assert_eq!(coupon(CouponKind::Percentage(10.0)).code, "WELCOME10");
        let params = CouponCreate::new("X", CouponKind::Percentage(120.0));
        assert!(Coupon::from_create_params("c".into(), params).is_err());
        let mut params = CouponCreate::new("X", CouponKind::Fixed(10.0));
        params.expires_at = Some(params.starts_at - Duration::hours(1));
        assert!(Coupon::from_create_params("c".into(), params).is_err());
    }

    #[test]
    fn test_redeem_enforces_cap_and_minimum() {
        let mut coupon = coupon(CouponKind::Percentage(10.0));
        assert_eq!(
            redeem(&mut coupon, 40.0),
            Err(CouponError::BelowMinimum { code: "WELCOME10".into(), minimum: 50.0 })
        );
        assert_eq!(redeem(&mut coupon, 200.0), Ok(CouponActionResult::Redeem(20.0)));
        assert_eq!(redeem(&mut coupon, 80.0), Ok(CouponActionResult::Redeem(8.0)));
        assert_eq!(redeem(&mut coupon, 80.0), Err(CouponError::Exhausted("WELCOME10".into())));

        coupon.handle_action(CouponAction::Release).unwrap();
        assert!(redeem(&mut coupon, 80.0).is_ok());
    }

    #[test]
    fn test_inactive_or_expired_coupons_are_refused() {
        let mut coupon = coupon(CouponKind::Fixed(5.0));
        coupon.is_active = false;
        assert!(matches!(redeem(&mut coupon, 100.0), Err(CouponError::Inactive(_))));

        coupon.is_active = true;
        coupon.expires_at = Some(Utc::now() - Duration::minutes(1));
        assert!(matches!(redeem(&mut coupon, 100.0), Err(CouponError::OutsideWindow(_))));
    }

    #[test]
    fn test_used_coupons_cannot_be_deleted() {
        let mut coupon = coupon(CouponKind::Fixed(5.0));
        assert!(coupon.on_delete().is_ok());
        redeem(&mut coupon, 100.0).unwrap();
        assert!(coupon.on_delete().is_err());
    }
}
