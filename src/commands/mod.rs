pub mod auth_cmd;
pub mod cart_cmd;
pub mod dashboard_cmd;
pub mod invoice_cmd;
pub mod part_cmd;
pub mod product_cmd;
pub mod repair_cmd;
pub mod stock_cmd;
pub mod ticket_cmd;
pub mod user_cmd;
