use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::entity::invoices::InvoiceStatus;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Invoice {
    pub id: i64,
    pub invoice_number: Option<i64>,
    pub customer_name: String,
    pub customer_organization: String,
    pub customer_pid: String,
    pub customer_email: String,
    pub create_date: DateTime<Utc>,
    pub sent_date: Option<DateTime<Utc>>,
    pub due_date: Option<DateTime<Utc>>,
    pub current_status: InvoiceStatus,
    pub invoice_ocr: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct InvoiceRow {
    pub id: Uuid,
    pub invoice_id: i64,
    pub item_name: String,
    pub num_items: i32,
    /// Unit price in minor currency units (öre).
    pub item_price: i64,
    pub holding_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Holding {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub owner_name: String,
    pub item_name: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Orchestra {
    pub id: Uuid,
    pub name: String,
    pub contact_email: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Member {
    pub id: Uuid,
    pub orchestra_id: Uuid,
    pub full_name: String,
    pub email: String,
    pub approved: bool,
    pub created_at: DateTime<Utc>,
}
