//! Back-office core of a small storefront: orders, catalog, customers and
//! coupons, each table owned by its own actor, plus pricing rules and the
//! report tabs built on top of them.

pub mod actor_framework;
pub mod app_system;
#[macro_use]
pub mod clients;
pub mod config;
pub mod domain;
pub mod pricing;
pub mod reports;
pub mod settings;

pub mod coupon_actor;
pub mod customer_actor;
pub mod order_actor;
pub mod product_actor;

#[cfg(test)]
mod mock_framework;
