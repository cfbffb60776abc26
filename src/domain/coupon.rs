use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// How a coupon reduces the order subtotal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum CouponKind {
    /// Percent of the subtotal, `0 < p <= 100`.
    Percentage(f64),
    /// Fixed amount, capped at the subtotal.
    Fixed(f64),
}

impl CouponKind {
    /// Discount this rule grants on `subtotal`, rounded to cents.
    #[must_use]
    pub fn discount_for(&self, subtotal: f64) -> f64 {
        let raw = match *self {
            Self::Percentage(percent) => subtotal * percent / 100.0,
            Self::Fixed(amount) => amount.min(subtotal),
        };
        crate::pricing::round_cents(raw.max(0.0))
    }
}

/// A discount rule with usage caps and a validity window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Coupon {
    pub id: String,
    pub code: String,
    pub kind: CouponKind,
    pub max_uses: Option<u32>,
    pub used_count: u32,
    pub min_purchase: Option<f64>,
    pub starts_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
    pub is_active: bool,
}

impl Coupon {
    #[must_use]
    pub fn is_within_window(&self, at: DateTime<Utc>) -> bool {
        at >= self.starts_at && self.expires_at.map_or(true, |expires| at <= expires)
    }

    #[must_use]
    pub fn has_uses_left(&self) -> bool {
        self.max_uses.map_or(true, |max| self.used_count < max)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CouponCreate {
    pub code: String,
    pub kind: CouponKind,
    pub max_uses: Option<u32>,
    pub min_purchase: Option<f64>,
    pub starts_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
}

impl CouponCreate {
    /// Coupon valid from now with no cap, minimum or expiry.
    pub fn new(code: impl Into<String>, kind: CouponKind) -> Self {
        Self {
            code: code.into(),
            kind,
            max_uses: None,
            min_purchase: None,
            starts_at: Utc::now(),
            expires_at: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct CouponPatch {
    pub max_uses: Option<Option<u32>>,
    pub min_purchase: Option<Option<f64>>,
    pub expires_at: Option<Option<DateTime<Utc>>>,
    pub is_active: Option<bool>,
}

/// One redemption of a coupon against one order, with the amount actually
/// granted at the time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CouponUse {
    pub coupon_id: String,
    pub code: String,
    pub order_id: String,
    pub user_id: String,
    pub discount_amount: f64,
    pub used_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_discount_for_kinds() {
        assert_eq!(CouponKind::Percentage(15.0).discount_for(200.0), 30.0);
        assert_eq!(CouponKind::Fixed(25.0).discount_for(200.0), 25.0);
        assert_eq!(CouponKind::Fixed(25.0).discount_for(10.0), 10.0);
    }

    #[test]
    fn test_window_and_caps() {
        let now = Utc::now();
        let coupon = Coupon {
            id: "coupon_1".into(),
            code: "WELCOME".into(),
            kind: CouponKind::Fixed(5.0),
            max_uses: Some(1),
            used_count: 0,
            min_purchase: None,
            starts_at: now - Duration::days(1),
            expires_at: Some(now + Duration::days(1)),
            is_active: true,
        };
        assert!(coupon.is_within_window(now));
        assert!(!coupon.is_within_window(now + Duration::days(2)));
        assert!(!coupon.is_within_window(now - Duration::days(2)));
        assert!(coupon.has_uses_left());
        assert!(!Coupon { used_count: 1, ..coupon }.has_uses_left());
    }
}
