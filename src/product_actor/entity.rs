use super::actions::{ProductAction, ProductActionResult};
use super::error::ProductError;
use crate::actor_framework::Entity;
use crate::domain::{Product, ProductCreate, ProductPatch};
use crate::pricing;

impl Entity for Product {
    type Id = String;
    type CreateParams = ProductCreate;
    type Patch = ProductPatch;
    type Action = ProductAction;
    type ActionResult = ProductActionResult;
    type Error = ProductError;

    fn id(&self) -> &String {
        &self.id
    }

    /// Creates a new active Product from creation parameters.
    ///
    /// # Errors
    /// Rejects an empty name, a non-positive price, a negative cost and a
    /// malformed SKU.
    fn from_create_params(id: String, params: ProductCreate) -> Result<Self, ProductError> {
        if params.name.trim().is_empty() {
            return Err(ProductError::ValidationError("Name is required".to_string()));
        }
        pricing::validate_price(params.price)?;
        validate_cost(params.cost_price)?;
        if let Some(sku) = &params.sku {
            pricing::validate_sku(sku)?;
        }

        Ok(Self {
            id,
            name: params.name,
            sku: params.sku,
            price: params.price,
            original_price: params.original_price,
            cost_price: params.cost_price,
            stock_quantity: params.stock_quantity,
            is_active: true,
            is_featured: params.is_featured,
            category: params.category,
            brand: params.brand,
            color: params.color,
        })
    }

    /// Updates catalog fields. Every field is validated before any is written.
    fn on_update(&mut self, patch: ProductPatch) -> Result<(), ProductError> {
        if let Some(name) = &patch.name {
            if name.trim().is_empty() {
                return Err(ProductError::ValidationError("Name is required".to_string()));
            }
        }
        if let Some(price) = patch.price {
            pricing::validate_price(price)?;
        }
        if let Some(cost) = patch.cost_price {
            validate_cost(cost)?;
        }
        if let Some(Some(sku)) = &patch.sku {
            pricing::validate_sku(sku)?;
        }

        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(sku) = patch.sku {
            self.sku = sku;
        }
        if let Some(price) = patch.price {
            self.price = price;
        }
        if let Some(original_price) = patch.original_price {
            self.original_price = original_price;
        }
        if let Some(cost_price) = patch.cost_price {
            self.cost_price = cost_price;
        }
        if let Some(is_active) = patch.is_active {
            self.is_active = is_active;
        }
        if let Some(is_featured) = patch.is_featured {
            self.is_featured = is_featured;
        }
        if let Some(category) = patch.category {
            self.category = category;
        }
        if let Some(brand) = patch.brand {
            self.brand = brand;
        }
        if let Some(color) = patch.color {
            self.color = color;
        }
        Ok(())
    }

    /// Handles product-specific actions.
    ///
    /// # Actions
    /// - `CheckStock`: Returns the current stock level
    /// - `AdjustStock(delta)`: Adds or removes stock
    /// - `ApplyDiscount(percent)`: Marks the stored price down
    fn handle_action(&mut self, action: ProductAction) -> Result<ProductActionResult, ProductError> {
        match action {
            ProductAction::CheckStock => Ok(ProductActionResult::CheckStock(self.stock_quantity)),
            ProductAction::AdjustStock(delta) => {
                let adjusted = i64::from(self.stock_quantity) + delta;
                if adjusted < 0 {
                    return Err(ProductError::InsufficientStock {
                        requested: delta.unsigned_abs(),
                        available: self.stock_quantity,
                    });
                }
                self.stock_quantity = u32::try_from(adjusted).map_err(|_| {
                    ProductError::ValidationError(format!("Stock level {} is out of range", adjusted))
                })?;
                Ok(ProductActionResult::AdjustStock(self.stock_quantity))
            }
            ProductAction::ApplyDiscount(percent) => {
                pricing::validate_discount_percent(percent)?;
                let new_price = pricing::validate_price(pricing::discounted_price(self.price, percent))?;
                if self.original_price.is_none() {
                    self.original_price = Some(self.price);
                }
                self.price = new_price;
                Ok(ProductActionResult::ApplyDiscount(Box::new(self.clone())))
            }
        }
    }
}

fn validate_cost(cost: Option<f64>) -> Result<(), ProductError> {
    match cost {
        Some(cost) if cost < 0.0 => Err(ProductError::ValidationError(format!(
            "Cost price must not be negative, got {}",
            cost
        ))),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product() -> Product {
        let params = ProductCreate {
            name: "Linen Shirt".into(),
            sku: Some("SHIRT-LIN-01".into()),
            price: 120.0,
            cost_price: Some(70.0),
            stock_quantity: 4,
            ..ProductCreate::default()
        };
        Product::from_create_params("product_1".into(), params).unwrap()
    }

    #[test]
    fn test_create_validates_catalog_fields() {
        let product = product();
        assert!(product.is_active);
        assert_eq!(product.margin(), Some((120.0 - 70.0) / 120.0 * 100.0));

        let bad_price = ProductCreate { name: "X".into(), price: 0.0, ..ProductCreate::default() };
        assert!(matches!(
            Product::from_create_params("p".into(), bad_price),
            Err(ProductError::Pricing(_))
        ));
        let bad_sku = ProductCreate {
            name: "X".into(),
            price: 1.0,
            sku: Some("bad sku".into()),
            ..ProductCreate::default()
        };
        assert!(Product::from_create_params("p".into(), bad_sku).is_err());
    }

    #[test]
    fn test_update_is_all_or_nothing() {
        let mut product = product();
        let patch = ProductPatch {
            name: Some("Renamed".into()),
            price: Some(-1.0),
            ..ProductPatch::default()
        };
        assert!(product.on_update(patch).is_err());
        assert_eq!(product.name, "Linen Shirt");

        let patch = ProductPatch {
            is_active: Some(false),
            cost_price: Some(None),
            ..ProductPatch::default()
        };
        product.on_update(patch).unwrap();
        assert!(!product.is_active);
        assert_eq!(product.cost_price, None);
    }

    #[test]
    fn test_stock_adjustments_never_go_negative() {
        let mut product = product();
        assert_eq!(
            product.handle_action(ProductAction::AdjustStock(6)).unwrap(),
            ProductActionResult::AdjustStock(10)
        );
        assert_eq!(
            product.handle_action(ProductAction::AdjustStock(-11)),
            Err(ProductError::InsufficientStock { requested: 11, available: 10 })
        );
        assert_eq!(
            product.handle_action(ProductAction::CheckStock).unwrap(),
            ProductActionResult::CheckStock(10)
        );
    }

    #[test]
    fn test_discounted_price_keeps_first_original_price() {
        let mut product = product();
        product.handle_action(ProductAction::ApplyDiscount(10.0)).unwrap();
        product.handle_action(ProductAction::ApplyDiscount(10.0)).unwrap();
        assert_eq!(product.price, 97.2);
        assert_eq!(product.original_price, Some(120.0));
        assert_eq!(product.discount_badge(), Some(19));
    }

    #[test]
    fn test_discount_uses_stored_price() {
        let mut product = product();
        product
            .on_update(ProductPatch { price: Some(200.0), ..ProductPatch::default() })
            .unwrap();

        match product.handle_action(ProductAction::ApplyDiscount(20.0)).unwrap() {
            ProductActionResult::ApplyDiscount(updated) => assert_eq!(updated.price, 160.0),
            other => panic!("Unexpected result: {:?}", other),
        }
        assert_eq!(
            product.handle_action(ProductAction::ApplyDiscount(100.0)),
            Err(ProductError::Pricing(pricing::PricingError::InvalidPrice(0.0)))
        );
        assert_eq!(product.price, 160.0);
    }
}
