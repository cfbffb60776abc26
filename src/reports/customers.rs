use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::sorting::{SortValue, Sortable};
use super::{orders_in_range, DateRange};
use crate::domain::{Customer, Order};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CustomerReportRow {
    pub user_id: String,
    pub name: String,
    pub email: Option<String>,
    pub order_count: u32,
    /// Excludes cancelled orders.
    pub total_spent: f64,
    pub last_order: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CustomerColumn {
    Name,
    OrderCount,
    TotalSpent,
    LastOrder,
}

impl Sortable for CustomerReportRow {
    type Column = CustomerColumn;

    fn sort_value(&self, column: CustomerColumn) -> SortValue<'_> {
        match column {
            CustomerColumn::Name => SortValue::Text(&self.name),
            CustomerColumn::OrderCount => SortValue::Number(Some(f64::from(self.order_count))),
            CustomerColumn::TotalSpent => SortValue::Number(Some(self.total_spent)),
            CustomerColumn::LastOrder => SortValue::Date(Some(self.last_order)),
        }
    }
}

/// One row per customer with orders in `range`. Unknown profiles keep the
/// user id as their name.
pub fn customer_report(orders: &[Order], customers: &[Customer], range: &DateRange) -> Vec<CustomerReportRow> {
    let profiles: HashMap<&str, &Customer> = customers
        .iter()
        .map(|customer| (customer.id.as_str(), customer))
        .collect();

    let mut rows: Vec<CustomerReportRow> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for order in orders_in_range(orders, range) {
        let slot = *index.entry(order.user_id.as_str()).or_insert_with(|| {
            let profile = profiles.get(order.user_id.as_str());
            rows.push(CustomerReportRow {
                user_id: order.user_id.clone(),
                name: profile.map_or_else(|| order.user_id.clone(), |p| p.full_name.clone()),
                email: profile.map(|p| p.email.clone()),
                order_count: 0,
                total_spent: 0.0,
                last_order: order.created_at,
            });
            rows.len() - 1
        });

        let row = &mut rows[slot];
        row.order_count += 1;
        if !order.is_cancelled() {
            row.total_spent += order.total;
        }
        row.last_order = row.last_order.max(order.created_at);
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::OrderStatus;
    use crate::reports::fixtures::{day, item, order};
    use crate::reports::{sort_rows, SortDirection, SortSpec};

    fn customers() -> Vec<Customer> {
        let mut ana = Customer::new("Ana", "ana@example.com");
        ana.id = "c1".into();
        let mut bruno = Customer::new("Bruno", "bruno@example.com");
        bruno.id = "c2".into();
        vec![ana, bruno]
    }

    fn orders() -> Vec<Order> {
        vec![
            order("o1", "c1", OrderStatus::Paid, 9, vec![item("p", 1, 100.0)]),
            order("o2", "c2", OrderStatus::Delivered, 4, vec![item("p", 2, 100.0)]),
            order("o3", "c1", OrderStatus::Cancelled, 12, vec![item("p", 5, 100.0)]),
            order("o4", "c9", OrderStatus::Created, 6, vec![item("p", 1, 15.0)]),
        ]
    }

    #[test]
    fn test_spend_excludes_cancelled_orders() {
        let rows = customer_report(&orders(), &customers(), &DateRange::all());
        let ana = rows.iter().find(|row| row.user_id == "c1").unwrap();
        assert_eq!(ana.order_count, 2);
        assert_eq!(ana.total_spent, 100.0);
        assert_eq!(ana.last_order, day(12));
        assert_eq!(ana.email.as_deref(), Some("ana@example.com"));

        let unknown = rows.iter().find(|row| row.user_id == "c9").unwrap();
        assert_eq!(unknown.name, "c9");
        assert_eq!(unknown.email, None);
    }

    #[test]
    fn test_range_and_sorting() {
        let mut rows = customer_report(&orders(), &customers(), &DateRange::between(day(1), day(10)));
        assert_eq!(rows.iter().find(|row| row.user_id == "c1").unwrap().order_count, 1);

        sort_rows(&mut rows, SortSpec::new(CustomerColumn::TotalSpent, SortDirection::Descending));
        let ids: Vec<&str> = rows.iter().map(|row| row.user_id.as_str()).collect();
        assert_eq!(ids, vec!["c2", "c1", "c9"]);

        sort_rows(&mut rows, SortSpec::new(CustomerColumn::LastOrder, SortDirection::Ascending));
        assert_eq!(rows[0].user_id, "c2");
    }
}
