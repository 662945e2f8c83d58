use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::{Invoice, InvoiceRow};

/// One line item of a generation request: what was bought, how many,
/// at which unit price, optionally tied to a holding.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct InvoiceRowInput {
    pub item_name: String,
    pub item_price: i64,
    #[serde(default = "default_num_items")]
    pub num_items: i32,
    pub holding_id: Option<Uuid>,
}

fn default_num_items() -> i32 {
    1
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct GenerateInvoiceRequest {
    pub customer_name: String,
    #[serde(default)]
    pub customer_organization: String,
    pub customer_pid: String,
    pub customer_email: String,
    pub rows: Vec<InvoiceRowInput>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct InvoiceWithRows {
    pub invoice: Invoice,
    pub rows: Vec<InvoiceRow>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct InvoiceList {
    pub items: Vec<Invoice>,
}
