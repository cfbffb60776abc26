//! Side-effect-free price arithmetic: discount badges, margins, mass discount
//! previews and card fee breakdowns.

use serde::Serialize;
use thiserror::Error;

use crate::domain::Product;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum PricingError {
    #[error("Discount percent must be greater than 0 and at most 100, got {0}")]
    InvalidPercent(f64),
    #[error("Price must be greater than 0, got {0}")]
    InvalidPrice(f64),
    #[error("Fee rate must be between 0 and 100, got {0}")]
    InvalidFeeRate(f64),
    #[error("Invalid SKU: {0}")]
    InvalidSku(String),
}

/// Rounds a monetary amount to cents.
#[must_use]
pub fn round_cents(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

/// Whole percent off shown next to a product, `None` unless
/// `original_price > price > 0`. Always within `1..=99` so a real markdown
/// never displays as 0% or 100%.
#[must_use]
pub fn calculate_discount(price: f64, original_price: f64) -> Option<u32> {
    if !(price > 0.0 && original_price > price) {
        return None;
    }
    let percent = ((1.0 - price / original_price) * 100.0).round();
    Some(percent.clamp(1.0, 99.0) as u32)
}

/// Gross margin in percent of the selling price.
///
/// `None` when the cost is unknown or zero, or when the price is not positive.
#[must_use]
pub fn calculate_margin(price: f64, cost: Option<f64>) -> Option<f64> {
    match cost {
        Some(cost) if cost != 0.0 && price > 0.0 => Some((price - cost) / price * 100.0),
        _ => None,
    }
}

#[must_use]
pub fn is_below_cost(price: f64, cost: Option<f64>) -> bool {
    cost.is_some_and(|cost| price < cost)
}

/// `price` reduced by `percent`, rounded to cents and never negative.
#[must_use]
pub fn discounted_price(price: f64, percent: f64) -> f64 {
    round_cents(price * (1.0 - percent / 100.0)).max(0.0)
}

pub fn validate_discount_percent(percent: f64) -> Result<f64, PricingError> {
    if percent > 0.0 && percent <= 100.0 {
        Ok(percent)
    } else {
        Err(PricingError::InvalidPercent(percent))
    }
}

pub fn validate_price(price: f64) -> Result<f64, PricingError> {
    if price > 0.0 && price.is_finite() {
        Ok(price)
    } else {
        Err(PricingError::InvalidPrice(price))
    }
}

pub fn validate_fee_rate(rate: f64) -> Result<f64, PricingError> {
    if (0.0..=100.0).contains(&rate) {
        Ok(rate)
    } else {
        Err(PricingError::InvalidFeeRate(rate))
    }
}

/// SKUs are 3 to 32 characters of `A-Z`, `0-9` and inner dashes.
pub fn validate_sku(sku: &str) -> Result<(), PricingError> {
    let well_formed = (3..=32).contains(&sku.len())
        && sku.chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '-')
        && !sku.starts_with('-')
        && !sku.ends_with('-');
    if well_formed {
        Ok(())
    } else {
        Err(PricingError::InvalidSku(sku.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MassDiscountPreviewItem {
    pub product_id: String,
    pub name: String,
    pub current_price: f64,
    pub new_price: f64,
    pub cost_price: Option<f64>,
    pub below_cost: bool,
}

/// Preview of a mass discount over the active products, truncated to `limit`
/// rows. Truncation only affects what is displayed; applying the discount
/// still covers every active product.
#[must_use]
pub fn mass_discount_preview(products: &[Product], percent: f64, limit: usize) -> Vec<MassDiscountPreviewItem> {
    products
        .iter()
        .filter(|product| product.is_active)
        .take(limit)
        .map(|product| {
            let new_price = discounted_price(product.price, percent);
            MassDiscountPreviewItem {
                product_id: product.id.clone(),
                name: product.name.clone(),
                current_price: product.price,
                new_price,
                cost_price: product.cost_price,
                below_cost: is_below_cost(new_price, product.cost_price),
            }
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MassDiscountFailure {
    pub product_id: String,
    pub name: String,
    pub error: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BelowCostWarning {
    pub product_id: String,
    pub name: String,
    pub new_price: f64,
    pub cost_price: f64,
}

/// Result of applying a mass discount. Failed items do not stop the batch;
/// `success` is false when any item failed.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct MassDiscountOutcome {
    pub success: bool,
    pub updated_count: usize,
    pub errors: Vec<MassDiscountFailure>,
    pub below_cost_warnings: Vec<BelowCostWarning>,
}

/// Card processing fee split of an order total.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NetAmount {
    pub tax: f64,
    pub net: f64,
}

#[must_use]
pub fn calculate_net_amount(total: f64, fee_rate_percent: f64) -> NetAmount {
    let tax = total * fee_rate_percent / 100.0;
    NetAmount { tax, net: total - tax }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_margin_formula_and_guards() {
        for (price, cost) in [(100.0, 80.0), (50.0, 60.0), (19.9, 7.25)] {
            assert_eq!(calculate_margin(price, Some(cost)), Some((price - cost) / price * 100.0));
        }
        assert_eq!(calculate_margin(100.0, Some(0.0)), None);
        assert_eq!(calculate_margin(100.0, None), None);
        assert_eq!(calculate_margin(0.0, Some(10.0)), None);
    }

    #[test]
    fn test_discount_only_for_real_markdowns() {
        assert_eq!(calculate_discount(75.0, 100.0), Some(25));
        assert_eq!(calculate_discount(99.9, 100.0), Some(1));
        assert_eq!(calculate_discount(0.01, 100.0), Some(99));
        assert_eq!(calculate_discount(100.0, 100.0), None);
        assert_eq!(calculate_discount(120.0, 100.0), None);

        for original in [10.0, 59.9, 100.0, 1234.5] {
            for step in 1..100 {
                let price = original * f64::from(step) / 100.0;
                let percent = calculate_discount(price, original).unwrap();
                assert!((1..100).contains(&percent));
            }
        }
    }

    #[test]
    fn test_discounted_price_is_monotonic_and_non_negative() {
        for price in [0.0, 9.99, 100.0, 349.9] {
            let mut previous = f64::INFINITY;
            for percent in 0..=100 {
                let new_price = discounted_price(price, f64::from(percent));
                assert!(new_price >= 0.0);
                assert!(new_price <= previous);
                previous = new_price;
            }
        }
    }

    #[test]
    fn test_percent_validation() {
        assert!(validate_discount_percent(0.0).is_err());
        assert!(validate_discount_percent(101.0).is_err());
        assert!(validate_discount_percent(f64::NAN).is_err());
        assert_eq!(validate_discount_percent(100.0), Ok(100.0));
        assert_eq!(validate_discount_percent(0.5), Ok(0.5));
    }

    #[test]
    fn test_sku_and_price_validation() {
        assert!(validate_sku("TSHIRT-BLK-M").is_ok());
        assert!(validate_sku("AB").is_err());
        assert!(validate_sku("tshirt").is_err());
        assert!(validate_sku("-ABC").is_err());
        assert!(validate_price(0.0).is_err());
        assert!(validate_price(-5.0).is_err());
        assert!(validate_price(f64::INFINITY).is_err());
        assert_eq!(validate_price(12.5), Ok(12.5));
    }

    #[test]
    fn test_preview_flags_below_cost_and_truncates() {
        let products = vec![
            Product::new("1", "Boots", 100.0, 4).with_cost(80.0),
            Product::new("2", "Socks", 50.0, 9).with_cost(60.0),
        ];
        let preview = mass_discount_preview(&products, 10.0, 10);
        assert_eq!(preview.len(), 2);
        assert_eq!((preview[0].new_price, preview[0].below_cost), (90.0, false));
        assert_eq!((preview[1].new_price, preview[1].below_cost), (45.0, true));

        assert_eq!(mass_discount_preview(&products, 10.0, 1).len(), 1);
    }

    #[test]
    fn test_preview_skips_inactive_products() {
        let mut hidden = Product::new("1", "Old", 10.0, 0);
        hidden.is_active = false;
        let products = vec![hidden, Product::new("2", "New", 20.0, 1)];
        let preview = mass_discount_preview(&products, 50.0, 10);
        assert_eq!(preview.len(), 1);
        assert_eq!(preview[0].product_id, "2");
        assert!(!preview[0].below_cost);
    }

    #[test]
    fn test_net_amount() {
        assert_eq!(calculate_net_amount(1000.0, 10.0), NetAmount { tax: 100.0, net: 900.0 });

        let breakdown = calculate_net_amount(250.5, 3.0);
        assert!(approx(breakdown.tax, 7.515));
        assert!(approx(breakdown.net, 242.985));
    }
}
