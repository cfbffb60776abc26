use serde::{Deserialize, Serialize};

use crate::pricing;

/// Represents a catalog product.
///
/// # Actor Framework
/// This struct implements the [`Entity`](crate::actor_framework::Entity) trait,
/// allowing it to be managed by a [`ResourceActor`](crate::actor_framework::ResourceActor).
///
/// See [`crate::product_actor`] for details on:
/// - Creation parameters ([`ProductCreate`])
/// - Update parameters ([`ProductPatch`])
/// - Custom actions ([`ProductAction`](crate::product_actor::ProductAction))
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub sku: Option<String>,
    pub price: f64,
    /// Reference price for the discount badge.
    pub original_price: Option<f64>,
    /// Only used for margin and below-cost warnings.
    pub cost_price: Option<f64>,
    pub stock_quantity: u32,
    pub is_active: bool,
    pub is_featured: bool,
    pub category: Option<String>,
    pub brand: Option<String>,
    pub color: Option<String>,
}

impl Product {
    /// Creates an active product with no classifiers.
    ///
    /// # Arguments
    /// * `id` - Unique identifier (typically set by the actor system)
    /// * `name` - Product name
    /// * `price` - Selling price
    /// * `stock_quantity` - Available stock
    pub fn new(id: impl Into<String>, name: impl Into<String>, price: f64, stock_quantity: u32) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            sku: None,
            price,
            original_price: None,
            cost_price: None,
            stock_quantity,
            is_active: true,
            is_featured: false,
            category: None,
            brand: None,
            color: None,
        }
    }

    pub fn with_cost(mut self, cost_price: f64) -> Self {
        self.cost_price = Some(cost_price);
        self
    }

    /// Percentage shown on the storefront badge, if any.
    #[must_use]
    pub fn discount_badge(&self) -> Option<u32> {
        self.original_price
            .and_then(|original| pricing::calculate_discount(self.price, original))
    }

    #[must_use]
    pub fn margin(&self) -> Option<f64> {
        pricing::calculate_margin(self.price, self.cost_price)
    }

    #[must_use]
    pub fn is_below_cost(&self) -> bool {
        pricing::is_below_cost(self.price, self.cost_price)
    }
}

/// DTO for product creation.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ProductCreate {
    pub name: String,
    pub sku: Option<String>,
    pub price: f64,
    pub original_price: Option<f64>,
    pub cost_price: Option<f64>,
    pub stock_quantity: u32,
    pub is_featured: bool,
    pub category: Option<String>,
    pub brand: Option<String>,
    pub color: Option<String>,
}

impl From<Product> for ProductCreate {
    fn from(product: Product) -> Self {
        Self {
            name: product.name,
            sku: product.sku,
            price: product.price,
            original_price: product.original_price,
            cost_price: product.cost_price,
            stock_quantity: product.stock_quantity,
            is_featured: product.is_featured,
            category: product.category,
            brand: product.brand,
            color: product.color,
        }
    }
}

// DTO for product updates. `Some(None)` clears an optional field.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub sku: Option<Option<String>>,
    pub price: Option<f64>,
    pub original_price: Option<Option<f64>>,
    pub cost_price: Option<Option<f64>>,
    pub is_active: Option<bool>,
    pub is_featured: Option<bool>,
    pub category: Option<Option<String>>,
    pub brand: Option<Option<String>>,
    pub color: Option<Option<String>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_discount_badge_needs_higher_original_price() {
        let mut product = Product::new("p1", "Shirt", 80.0, 3);
        assert_eq!(product.discount_badge(), None);

        product.original_price = Some(100.0);
        assert_eq!(product.discount_badge(), Some(20));

        product.original_price = Some(80.0);
        assert_eq!(product.discount_badge(), None);
    }

    #[test]
    fn test_margin_and_below_cost() {
        let product = Product::new("p1", "Mug", 50.0, 1).with_cost(60.0);
        assert!(product.is_below_cost());
        assert_eq!(product.margin(), Some(-20.0));
        assert_eq!(Product::new("p2", "Cap", 50.0, 1).margin(), None);
    }
}
