pub mod order;
pub mod product;
pub mod customer;
pub mod coupon;

pub use order::*;
pub use product::*;
pub use customer::*;
pub use coupon::*;
