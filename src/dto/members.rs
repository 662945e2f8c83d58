use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::{Member, Orchestra};

#[derive(Debug, Deserialize, ToSchema)]
pub struct RegisterMemberRequest {
    pub orchestra_id: Uuid,
    pub full_name: String,
    pub email: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ApproveMembersRequest {
    pub member_ids: Vec<Uuid>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MemberList {
    pub items: Vec<Member>,
}

/// An invoice of the orchestra decorated with its payment reference.
#[derive(Debug, Serialize, ToSchema)]
pub struct OrchestraInvoiceSummary {
    pub invoice_id: i64,
    pub invoice_number: Option<i64>,
    pub invoice_ocr: Option<String>,
    pub payment_reference: Option<String>,
    pub current_status: crate::entity::invoices::InvoiceStatus,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrchestraInvoiceData {
    pub orchestra: Orchestra,
    pub approved_members: Vec<Member>,
    pub invoices: Vec<OrchestraInvoiceSummary>,
}
