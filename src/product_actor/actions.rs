/// Custom actions for Product entities.
///
/// These actions represent domain-specific operations that can be performed
/// on a product beyond standard CRUD operations.
#[derive(Debug, Clone, PartialEq)]
pub enum ProductAction {
    /// Checks the current stock level without modifying it.
    CheckStock,
    /// Operator stock correction; positive adds, negative removes.
    ///
    /// # Errors
    /// Fails if the result would drop below zero.
    AdjustStock(i64),
    /// Marks the current price down by a percent, keeping the previous price
    /// as `original_price` when none is recorded yet.
    ApplyDiscount(f64),
}

/// Results from ProductActions - variants match 1:1 with ProductAction
#[derive(Debug, Clone, PartialEq)]
pub enum ProductActionResult {
    /// Current stock level
    CheckStock(u32),
    /// Stock level after the adjustment
    AdjustStock(u32),
    /// The updated product
    ApplyDiscount(Box<crate::domain::Product>),
}
