use utoipa::{OpenApi, openapi::OpenApi as OpenApiSpec};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::{
        invoices::{GenerateInvoiceRequest, InvoiceList, InvoiceRowInput, InvoiceWithRows},
        members::{
            ApproveMembersRequest, MemberList, OrchestraInvoiceData, OrchestraInvoiceSummary,
            RegisterMemberRequest,
        },
    },
    entity::invoices::InvoiceStatus,
    models::{Holding, Invoice, InvoiceRow, Member, Orchestra},
    response::{ApiResponse, Meta},
    routes::{health, invoices, members, orchestras, params},
};

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        invoices::list_invoices,
        invoices::generate_invoice,
        invoices::get_invoice,
        invoices::send_invoice,
        members::register_member,
        members::register_success,
        orchestras::approve_members,
        orchestras::invoice_data
    ),
    components(
        schemas(
            Invoice,
            InvoiceRow,
            InvoiceStatus,
            Holding,
            Orchestra,
            Member,
            InvoiceRowInput,
            GenerateInvoiceRequest,
            InvoiceWithRows,
            InvoiceList,
            RegisterMemberRequest,
            ApproveMembersRequest,
            MemberList,
            OrchestraInvoiceSummary,
            OrchestraInvoiceData,
            params::Pagination,
            params::InvoiceListQuery,
            Meta,
            ApiResponse<Invoice>,
            ApiResponse<InvoiceWithRows>,
            ApiResponse<InvoiceList>,
            ApiResponse<Member>,
            ApiResponse<MemberList>,
            ApiResponse<OrchestraInvoiceData>
        )
    ),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Invoices", description = "Invoice generation and dispatch"),
        (name = "Members", description = "Orchestra member registration"),
        (name = "Orchestras", description = "Orchestra rosters and invoice data"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
