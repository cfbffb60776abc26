//! Report tabs of the back office: per-product, per-customer and sales
//! summaries over already fetched rows. Everything here is pure aggregation.

pub mod customers;
pub mod products;
pub mod sales;
pub mod sorting;

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

use crate::customer_actor::CustomerError;
use crate::domain::Order;
use crate::order_actor::OrderError;
use crate::product_actor::ProductError;

pub use customers::{customer_report, CustomerColumn, CustomerReportRow};
pub use products::{low_stock, product_report, ProductColumn, ProductReportRow};
pub use sales::{sales_summary, SalesSummary};
pub use sorting::{sort_rows, SortDirection, SortSpec, SortValue, Sortable};

/// A report could not fetch one of its tables.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ReportError {
    #[error("Orders unavailable: {0}")]
    Orders(#[from] OrderError),
    #[error("Products unavailable: {0}")]
    Products(#[from] ProductError),
    #[error("Customers unavailable: {0}")]
    Customers(#[from] CustomerError),
}

/// Inclusive time window; a missing bound is open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct DateRange {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

impl DateRange {
    pub fn between(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start: Some(start), end: Some(end) }
    }

    pub fn all() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        self.start.map_or(true, |start| at >= start) && self.end.map_or(true, |end| at <= end)
    }
}

pub(crate) fn orders_in_range<'a>(orders: &'a [Order], range: &'a DateRange) -> impl Iterator<Item = &'a Order> {
    orders.iter().filter(move |order| range.contains(order.created_at))
}

#[cfg(test)]
pub(crate) mod fixtures {
    use std::collections::BTreeMap;

    use chrono::{DateTime, TimeZone, Utc};

    use crate::domain::{Order, OrderItem, OrderOrigin, OrderStatus};

    pub fn day(d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, d, 12, 0, 0).unwrap()
    }

    pub fn item(product_id: &str, quantity: u32, unit_price: f64) -> OrderItem {
        OrderItem {
            product_id: product_id.to_string(),
            product_name: product_id.to_string(),
            quantity,
            unit_price,
            total_price: unit_price * f64::from(quantity),
            attributes: BTreeMap::new(),
        }
    }

    pub fn order(id: &str, user_id: &str, status: OrderStatus, created: u32, items: Vec<OrderItem>) -> Order {
        let subtotal: f64 = items.iter().map(|item| item.total_price).sum();
        Order {
            id: id.to_string(),
            user_id: user_id.to_string(),
            status,
            items,
            subtotal,
            shipping_cost: 0.0,
            discount_total: 0.0,
            total: subtotal,
            shipping_address: None,
            payment_method: None,
            payment_id: None,
            origin: OrderOrigin::Site,
            notes: None,
            fee_rate: None,
            coupon: None,
            created_at: day(created),
            updated_at: day(created),
            revision: 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::day;
    use super::*;

    #[test]
    fn test_range_bounds_are_inclusive() {
        let range = DateRange::between(day(5), day(10));
        assert!(range.contains(day(5)));
        assert!(range.contains(day(10)));
        assert!(!range.contains(day(11)));
        assert!(!range.contains(day(4)));
        assert!(DateRange::all().contains(day(1)));
    }
}
