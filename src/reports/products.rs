use std::collections::HashMap;

use serde::Serialize;

use super::sorting::{SortValue, Sortable};
use super::{orders_in_range, DateRange};
use crate::domain::{Order, Product};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductReportRow {
    pub product_id: String,
    pub name: String,
    pub quantity: u64,
    pub revenue: f64,
    pub avg_price: f64,
    /// `None` when the product has no cost price.
    pub profit: Option<f64>,
    pub margin: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ProductColumn {
    Name,
    Quantity,
    Revenue,
    AvgPrice,
    Profit,
    Margin,
}

impl Sortable for ProductReportRow {
    type Column = ProductColumn;

    fn sort_value(&self, column: ProductColumn) -> SortValue<'_> {
        match column {
            ProductColumn::Name => SortValue::Text(&self.name),
            ProductColumn::Quantity => SortValue::Number(Some(self.quantity as f64)),
            ProductColumn::Revenue => SortValue::Number(Some(self.revenue)),
            ProductColumn::AvgPrice => SortValue::Number(Some(self.avg_price)),
            ProductColumn::Profit => SortValue::Number(self.profit),
            ProductColumn::Margin => SortValue::Number(self.margin),
        }
    }
}

/// Units sold, revenue and profitability per product, from the items of the
/// non-cancelled orders placed in `range`. Profit uses the product's current
/// cost price against the price snapshotted on each item.
///
/// Rows come out in order of first sale.
pub fn product_report(orders: &[Order], products: &[Product], range: &DateRange) -> Vec<ProductReportRow> {
    let costs: HashMap<&str, Option<f64>> = products
        .iter()
        .map(|product| (product.id.as_str(), product.cost_price))
        .collect();

    let mut rows: Vec<ProductReportRow> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for order in orders_in_range(orders, range).filter(|order| !order.is_cancelled()) {
        for item in &order.items {
            let slot = *index.entry(item.product_id.clone()).or_insert_with(|| {
                let has_cost = costs
                    .get(item.product_id.as_str())
                    .copied()
                    .flatten()
                    .is_some();
                rows.push(ProductReportRow {
                    product_id: item.product_id.clone(),
                    name: item.product_name.clone(),
                    quantity: 0,
                    revenue: 0.0,
                    avg_price: 0.0,
                    profit: has_cost.then_some(0.0),
                    margin: None,
                });
                rows.len() - 1
            });

            let row = &mut rows[slot];
            row.quantity += u64::from(item.quantity);
            row.revenue += item.total_price;
            if let (Some(profit), Some(Some(cost))) = (row.profit.as_mut(), costs.get(item.product_id.as_str())) {
                *profit += (item.unit_price - cost) * f64::from(item.quantity);
            }
        }
    }

    for row in &mut rows {
        if row.quantity > 0 {
            row.avg_price = row.revenue / row.quantity as f64;
        }
        row.margin = match row.profit {
            Some(profit) if row.revenue != 0.0 => Some(profit / row.revenue * 100.0),
            _ => None,
        };
    }
    rows
}

/// Active products at or below `threshold` units, lowest stock first.
pub fn low_stock(products: &[Product], threshold: u32) -> Vec<Product> {
    let mut low: Vec<Product> = products
        .iter()
        .filter(|product| product.is_active && product.stock_quantity <= threshold)
        .cloned()
        .collect();
    low.sort_by_key(|product| product.stock_quantity);
    low
}
