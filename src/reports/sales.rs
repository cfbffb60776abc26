use std::collections::BTreeMap;

use serde::Serialize;

use super::{orders_in_range, DateRange};
use crate::domain::{Order, OrderStatus};
use crate::pricing::round_cents;

/// Headline numbers of the sales tab.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct SalesSummary {
    pub order_count: u32,
    pub cancelled_count: u32,
    /// Sum of non-cancelled order totals.
    pub gross_revenue: f64,
    pub discounts_given: f64,
    pub coupon_uses: u32,
    pub average_ticket: f64,
    /// Card fees of the orders that carry a fee rate.
    pub fees: f64,
    /// `gross_revenue - fees`.
    pub net_revenue: f64,
    pub by_status: BTreeMap<String, u32>,
}

pub fn sales_summary(orders: &[Order], range: &DateRange) -> SalesSummary {
    let mut summary = SalesSummary::default();
    for status in OrderStatus::ALL {
        summary.by_status.insert(status.to_string(), 0);
    }

    for order in orders_in_range(orders, range) {
        summary.order_count += 1;
        *summary.by_status.entry(order.status.to_string()).or_insert(0) += 1;
        if order.is_cancelled() {
            summary.cancelled_count += 1;
            continue;
        }
        summary.gross_revenue += order.total;
        summary.discounts_given += order.discount_total;
        if order.coupon.is_some() {
            summary.coupon_uses += 1;
        }
        if let Some(breakdown) = order.net_amount() {
            summary.fees += breakdown.tax;
        }
    }

    let paid_orders = summary.order_count - summary.cancelled_count;
    if paid_orders > 0 {
        summary.average_ticket = round_cents(summary.gross_revenue / f64::from(paid_orders));
    }
    summary.gross_revenue = round_cents(summary.gross_revenue);
    summary.discounts_given = round_cents(summary.discounts_given);
    summary.fees = round_cents(summary.fees);
    summary.net_revenue = round_cents(summary.gross_revenue - summary.fees);
    summary
}
