use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A recorded sale. `item_id` is cleared when the item is deleted, which
/// detaches the sale from every owner.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Transaction {
    pub id: Uuid,
    pub item_id: Option<Uuid>,
    pub amount: Decimal,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, FromRow)]
pub struct TransactionDisplay {
    pub id: Uuid,
    pub item_id: Option<Uuid>,
    pub item_name: String,
    pub amount: Decimal,
    pub created_at: DateTime<Utc>,
}

/// Sale written by the stock-change recorder during an item edit.
#[derive(Debug, Clone, Serialize)]
pub struct SaleRecord {
    pub transaction_id: Uuid,
    pub units_sold: i64,
    pub amount: Decimal,
}
