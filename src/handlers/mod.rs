pub mod auth;
pub mod categories;
pub mod dashboard;
pub mod inventory;
pub mod sales;
pub mod transactions;
