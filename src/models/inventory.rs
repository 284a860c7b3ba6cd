use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Category {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Item {
    pub id: Uuid,
    pub user_id: Uuid,
    pub sn: Option<String>,
    pub name: String,
    pub category_id: Option<Uuid>,
    pub description: Option<String>,
    pub stock: i32,
    pub reorder_level: i32,
    pub price: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Item {
    /// Value of the units currently on hand.
    pub fn total_value(&self) -> Decimal {
        Decimal::from(self.stock) * self.price
    }
}

/// Item as listed to its owner, with the derived stock value.
#[derive(Debug, Serialize)]
pub struct ItemDisplay {
    #[serde(flatten)]
    pub item: Item,
    pub total_value: Decimal,
}

impl From<Item> for ItemDisplay {
    fn from(item: Item) -> Self {
        let total_value = item.total_value();
        Self { item, total_value }
    }
}
