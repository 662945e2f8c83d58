use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Invoice lifecycle. Stored as the one-letter codes of the billing
/// system this data was migrated from ("L" for late is uppercase there).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(1))")]
#[serde(rename_all = "snake_case")]
pub enum InvoiceStatus {
    #[sea_orm(string_value = "g")]
    Generated,
    #[sea_orm(string_value = "s")]
    Sent,
    #[sea_orm(string_value = "p")]
    Paid,
    #[sea_orm(string_value = "o")]
    Obliterated,
    #[sea_orm(string_value = "L")]
    Late,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "invoices")]
pub struct Model {
    /// Storage-assigned sequential id; the invoice number derives from it.
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub invoice_number: Option<i64>,
    pub customer_name: String,
    pub customer_organization: String,
    pub customer_pid: String,
    pub customer_email: String,
    pub create_date: DateTimeWithTimeZone,
    pub sent_date: Option<DateTimeWithTimeZone>,
    pub due_date: Option<DateTimeWithTimeZone>,
    pub current_status: InvoiceStatus,
    #[sea_orm(unique)]
    pub invoice_ocr: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::invoice_rows::Entity")]
    InvoiceRows,
}

impl Related<super::invoice_rows::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::InvoiceRows.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
