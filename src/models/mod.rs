pub mod inventory;
pub mod sales;
pub mod user;

pub use inventory::{Category, Item};
pub use sales::{SaleRecord, Transaction, TransactionDisplay};
pub use user::User;
