//! Typed handles over the table actors. Simple CRUD methods are generated by
//! the macros in [`macros`]; workflows spanning several tables live on the
//! client that owns the outcome.

#[macro_use]
pub mod macros;
pub mod coupon_client;
pub mod customer_client;
pub mod order_client;
pub mod product_client;
pub mod report_client;

pub use coupon_client::CouponClient;
pub use customer_client::CustomerClient;
pub use order_client::OrderClient;
pub use product_client::ProductClient;
pub use report_client::ReportClient;
