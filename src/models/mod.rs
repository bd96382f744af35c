pub mod cart;
pub mod dashboard;
pub mod invoice;
pub mod product;
pub mod stock;
pub mod ticket;
pub mod user;
