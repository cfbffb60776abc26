use chrono::{DateTime, Utc};

#[derive(Debug, Clone, PartialEq)]
pub enum CouponAction {
    /// Consumes one use and returns the discount granted on `subtotal`.
    Redeem { subtotal: f64, at: DateTime<Utc> },
    /// Gives back a use whose order was never stored.
    Release,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CouponActionResult {
    /// Discount amount granted
    Redeem(f64),
    /// Uses counted after the release
    Release(u32),
}
