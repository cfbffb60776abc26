use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle status of an order.
///
/// The forward flow is `Created -> PendingPayment -> Paid -> Packing ->
/// Shipped -> Delivered`. `Cancelled` is reachable from any non-terminal
/// status. `Delivered` and `Cancelled` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    #[default]
    Created,
    PendingPayment,
    Paid,
    Packing,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    /// Every status, forward flow first.
    pub const ALL: [OrderStatus; 7] = [
        Self::Created,
        Self::PendingPayment,
        Self::Paid,
        Self::Packing,
        Self::Shipped,
        Self::Delivered,
        Self::Cancelled,
    ];

    /// Next status in the forward flow, `None` once terminal.
    #[must_use]
    pub fn successor(self) -> Option<Self> {
        match self {
            Self::Created => Some(Self::PendingPayment),
            Self::PendingPayment => Some(Self::Paid),
            Self::Paid => Some(Self::Packing),
            Self::Packing => Some(Self::Shipped),
            Self::Shipped => Some(Self::Delivered),
            Self::Delivered | Self::Cancelled => None,
        }
    }

    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Delivered | Self::Cancelled)
    }

    #[must_use]
    pub fn can_cancel(self) -> bool {
        !self.is_terminal()
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::PendingPayment => "pending_payment",
            Self::Paid => "paid",
            Self::Packing => "packing",
            Self::Shipped => "shipped",
            Self::Delivered => "delivered",
            Self::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| format!("Unknown order status: {}", s))
    }
}

/// Where the sale was recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderOrigin {
    #[default]
    Site,
    Manual,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ShippingAddress {
    pub recipient: String,
    pub street: String,
    pub number: String,
    pub complement: Option<String>,
    pub district: Option<String>,
    pub city: String,
    pub state: String,
    pub postal_code: String,
}

/// One order line. Prices are copied from the product when the order is
/// placed and never follow later catalog edits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    pub product_id: String,
    pub product_name: String,
    pub quantity: u32,
    pub unit_price: f64,
    pub total_price: f64,
    pub attributes: BTreeMap<String, String>,
}

/// Denormalized record of a coupon redemption against this order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppliedCoupon {
    pub coupon_id: String,
    pub code: String,
    pub discount_amount: f64,
}

/// Represents a customer order with its line items.
///
/// # Actor Framework
/// This struct implements the [`Entity`](crate::actor_framework::Entity) trait.
/// See [`crate::order_actor`] for the status transitions it accepts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: String,
    pub user_id: String,
    pub status: OrderStatus,
    pub items: Vec<OrderItem>,
    pub subtotal: f64,
    pub shipping_cost: f64,
    pub discount_total: f64,
    pub total: f64,
    pub shipping_address: Option<ShippingAddress>,
    pub payment_method: Option<String>,
    pub payment_id: Option<String>,
    pub origin: OrderOrigin,
    pub notes: Option<String>,
    /// Card processing fee, in percent of `total`.
    pub fee_rate: Option<f64>,
    pub coupon: Option<AppliedCoupon>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub revision: u64,
}

impl Order {
    /// Items quantity across all lines.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.items.iter().map(|item| item.quantity).sum()
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.status == OrderStatus::Cancelled
    }
}

/// Line requested by a checkout or manual sale, before prices are snapshotted.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderLine {
    pub product_id: String,
    pub quantity: u32,
    pub attributes: BTreeMap<String, String>,
}

impl OrderLine {
    pub fn new(product_id: impl Into<String>, quantity: u32) -> Self {
        Self {
            product_id: product_id.into(),
            quantity,
            attributes: BTreeMap::new(),
        }
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }
}

/// What a caller submits to place an order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct OrderDraft {
    pub user_id: String,
    pub lines: Vec<OrderLine>,
    pub shipping_cost: f64,
    pub shipping_address: Option<ShippingAddress>,
    pub payment_method: Option<String>,
    pub origin: OrderOrigin,
    pub notes: Option<String>,
    pub fee_rate: Option<f64>,
    pub coupon_code: Option<String>,
    /// Backdates manual sales; defaults to now.
    pub placed_at: Option<DateTime<Utc>>,
}

impl OrderDraft {
    pub fn new(user_id: impl Into<String>, lines: Vec<OrderLine>) -> Self {
        Self {
            user_id: user_id.into(),
            lines,
            ..Self::default()
        }
    }
}

/// Fully priced payload stored by the order actor in one request, header and
/// items together.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderCreate {
    pub user_id: String,
    pub items: Vec<OrderItem>,
    pub shipping_cost: f64,
    pub discount_total: f64,
    pub shipping_address: Option<ShippingAddress>,
    pub payment_method: Option<String>,
    pub origin: OrderOrigin,
    pub notes: Option<String>,
    pub fee_rate: Option<f64>,
    pub coupon: Option<AppliedCoupon>,
    pub placed_at: Option<DateTime<Utc>>,
}

/// Editable order fields outside the status flow.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct OrderPatch {
    pub notes: Option<String>,
    pub shipping_address: Option<ShippingAddress>,
}
