use chrono::{DateTime, Duration, Utc};
use sea_orm::ActiveValue::NotSet;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
};
use serde::Serialize;
use uuid::Uuid;

use crate::{
    dto::invoices::{GenerateInvoiceRequest, InvoiceList, InvoiceWithRows},
    entity::{
        holdings::{Entity as Holdings, Model as HoldingModel},
        invoice_rows::{
            ActiveModel as InvoiceRowActive, Column as RowCol, Entity as InvoiceRows,
            Model as InvoiceRowModel,
        },
        invoices::{
            ActiveModel as InvoiceActive, Column as InvoiceCol, Entity as Invoices, InvoiceStatus,
            Model as InvoiceModel,
        },
    },
    error::{AppError, AppResult},
    events::log_event,
    mail::OutgoingEmail,
    models::{Holding, Invoice, InvoiceRow},
    response::{ApiResponse, Meta},
    routes::params::{InvoiceListQuery, SortOrder},
    state::AppState,
};

/// Offset added to the storage id to form the customer-facing number.
pub const INVOICE_NUMBER_OFFSET: i64 = 100_000;

/// Days between dispatch and the payment deadline.
pub const PAYMENT_TERM_DAYS: i64 = 14;

pub async fn list_invoices(
    state: &AppState,
    query: InvoiceListQuery,
) -> AppResult<ApiResponse<InvoiceList>> {
    let (page, limit, offset) = query.pagination.normalize();
    let mut condition = Condition::all();
    if let Some(status) = query.status {
        condition = condition.add(InvoiceCol::CurrentStatus.eq(status));
    }

    let sort_order = query.sort_order.unwrap_or(SortOrder::Desc);

    let mut finder = Invoices::find().filter(condition);
    finder = match sort_order {
        SortOrder::Asc => finder.order_by_asc(InvoiceCol::CreateDate),
        SortOrder::Desc => finder.order_by_desc(InvoiceCol::CreateDate),
    };

    let total = finder.clone().count(&state.orm).await? as i64;

    let invoices = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(invoice_from_entity)
        .collect();

    let meta = Meta::new(page, limit, total);
    Ok(ApiResponse::success(
        "Ok",
        InvoiceList { items: invoices },
        Some(meta),
    ))
}

pub async fn get_invoice(state: &AppState, id: i64) -> AppResult<ApiResponse<InvoiceWithRows>> {
    let invoice = Invoices::find_by_id(id).one(&state.orm).await?;
    let invoice = match invoice {
        Some(i) => i,
        None => return Err(AppError::NotFound),
    };

    let rows = InvoiceRows::find()
        .filter(RowCol::InvoiceId.eq(invoice.id))
        .all(&state.orm)
        .await?
        .into_iter()
        .map(row_from_entity)
        .collect();

    Ok(ApiResponse::success(
        "OK",
        InvoiceWithRows {
            invoice: invoice_from_entity(invoice),
            rows,
        },
        Some(Meta::empty()),
    ))
}

/// Create an invoice with its rows in one transaction.
///
/// The invoice is inserted first so the database assigns its id, then
/// invoice_number (id + offset) and the derived OCR string are written
/// back before the rows go in.
pub async fn generate_invoice(
    state: &AppState,
    req: GenerateInvoiceRequest,
    now: DateTime<Utc>,
) -> AppResult<ApiResponse<InvoiceWithRows>> {
    if req.rows.is_empty() {
        return Err(AppError::BadRequest("Invoice has no rows".into()));
    }
    for input in &req.rows {
        if input.num_items <= 0 {
            return Err(AppError::BadRequest("Row has invalid quantity".into()));
        }
    }

    let txn = state.orm.begin().await?;

    // Referenced holdings must exist before any row points at them.
    for input in &req.rows {
        if let Some(holding_id) = input.holding_id {
            if Holdings::find_by_id(holding_id).one(&txn).await?.is_none() {
                return Err(AppError::BadRequest(format!(
                    "Unknown holding {holding_id}"
                )));
            }
        }
    }

    let invoice = InvoiceActive {
        id: NotSet,
        invoice_number: Set(None),
        customer_name: Set(req.customer_name),
        customer_organization: Set(req.customer_organization),
        customer_pid: Set(req.customer_pid),
        customer_email: Set(req.customer_email),
        create_date: Set(now.into()),
        sent_date: Set(None),
        due_date: Set(None),
        current_status: Set(InvoiceStatus::Generated),
        invoice_ocr: Set(None),
    }
    .insert(&txn)
    .await?;

    let number = invoice.id + INVOICE_NUMBER_OFFSET;
    let mut active: InvoiceActive = invoice.into();
    active.invoice_number = Set(Some(number));
    active.invoice_ocr = Set(Some(crate::ocr::invoice_ocr(number)));
    let invoice = active.update(&txn).await?;

    let mut rows: Vec<InvoiceRow> = Vec::new();
    for input in &req.rows {
        let row = InvoiceRowActive {
            id: Set(Uuid::new_v4()),
            invoice_id: Set(invoice.id),
            item_name: Set(input.item_name.clone()),
            num_items: Set(input.num_items),
            item_price: Set(input.item_price),
            holding_id: Set(input.holding_id),
            created_at: NotSet,
        }
        .insert(&txn)
        .await?;
        rows.push(row_from_entity(row));
    }

    txn.commit().await?;

    if let Err(err) = log_event(
        &state.pool,
        Some(invoice.id),
        "invoice_generated",
        Some(serde_json::json!({ "invoice_number": number, "rows": rows.len() })),
    )
    .await
    {
        tracing::warn!(error = %err, "event log failed");
    }

    Ok(ApiResponse::success(
        "Invoice generated",
        InvoiceWithRows {
            invoice: invoice_from_entity(invoice),
            rows,
        },
        Some(Meta::empty()),
    ))
}

/// Dispatch an invoice: stamp sent/due dates, mark it Sent, then mail
/// the rendered invoice to the customer. The status change is persisted
/// before the mail goes out, so a failed send leaves a Sent invoice.
pub async fn send_invoice(
    state: &AppState,
    id: i64,
    now: DateTime<Utc>,
) -> AppResult<ApiResponse<Invoice>> {
    let invoice = Invoices::find_by_id(id).one(&state.orm).await?;
    let invoice = match invoice {
        Some(i) => i,
        None => return Err(AppError::NotFound),
    };

    let mut active: InvoiceActive = invoice.into();
    active.sent_date = Set(Some(now.into()));
    active.due_date = Set(Some((now + Duration::days(PAYMENT_TERM_DAYS)).into()));
    active.current_status = Set(InvoiceStatus::Sent);
    let invoice = active.update(&state.orm).await?;

    let rows: Vec<(InvoiceRow, Option<Holding>)> = InvoiceRows::find()
        .filter(RowCol::InvoiceId.eq(invoice.id))
        .find_also_related(Holdings)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(|(row, holding)| (row_from_entity(row), holding.map(holding_from_entity)))
        .collect();

    let invoice = invoice_from_entity(invoice);
    let data = build_invoice_data(&invoice, &rows);

    let context = tera::Context::from_serialize(&data)?;
    let html = state.templates.render("invoice.html", &context)?;
    let subject = match invoice.invoice_number {
        Some(number) => format!("Invoice {number}"),
        None => "Invoice".to_string(),
    };

    state
        .mailer
        .send(&OutgoingEmail {
            from: state.settings.mail_from.clone(),
            to: invoice.customer_email.clone(),
            subject,
            html,
        })
        .await?;

    if let Err(err) = log_event(
        &state.pool,
        Some(invoice.id),
        "invoice_sent",
        Some(serde_json::json!({ "to": invoice.customer_email })),
    )
    .await
    {
        tracing::warn!(error = %err, "event log failed");
    }

    Ok(ApiResponse::success(
        "Invoice sent",
        invoice,
        Some(Meta::empty()),
    ))
}

/// Per-row slice of the mail payload.
#[derive(Debug, Serialize)]
pub struct RowDetails {
    pub item_name: String,
    pub num_items: i32,
    pub item_price: i64,
    pub row_total: i64,
    pub owner_id: Option<Uuid>,
    pub owner_name: Option<String>,
}

/// Flattened invoice payload fed to the mail template.
#[derive(Debug, Serialize)]
pub struct InvoiceData {
    pub customer_name: String,
    pub customer_organization: String,
    pub customer_pid: String,
    pub sent_date: Option<String>,
    pub due_date: Option<String>,
    pub invoice_number: Option<i64>,
    pub invoice_ocr: Option<String>,
    pub products: Vec<RowDetails>,
    pub invoice_total: i64,
}

/// Flatten an invoice and its rows (with resolved holdings) into the
/// template payload. The grand total accumulates over all rows.
pub fn build_invoice_data(invoice: &Invoice, rows: &[(InvoiceRow, Option<Holding>)]) -> InvoiceData {
    let mut products = Vec::with_capacity(rows.len());
    let mut invoice_total: i64 = 0;

    for (row, holding) in rows {
        let row_total = row.item_price * i64::from(row.num_items);
        invoice_total += row_total;
        products.push(RowDetails {
            item_name: row.item_name.clone(),
            num_items: row.num_items,
            item_price: row.item_price,
            row_total,
            owner_id: holding.as_ref().map(|h| h.owner_id),
            owner_name: holding.as_ref().map(|h| h.owner_name.clone()),
        });
    }

    InvoiceData {
        customer_name: invoice.customer_name.clone(),
        customer_organization: invoice.customer_organization.clone(),
        customer_pid: invoice.customer_pid.clone(),
        sent_date: invoice.sent_date.map(|d| d.format("%Y-%m-%d").to_string()),
        due_date: invoice.due_date.map(|d| d.format("%Y-%m-%d").to_string()),
        invoice_number: invoice.invoice_number,
        invoice_ocr: invoice.invoice_ocr.clone(),
        products,
        invoice_total,
    }
}

fn invoice_from_entity(model: InvoiceModel) -> Invoice {
    Invoice {
        id: model.id,
        invoice_number: model.invoice_number,
        customer_name: model.customer_name,
        customer_organization: model.customer_organization,
        customer_pid: model.customer_pid,
        customer_email: model.customer_email,
        create_date: model.create_date.with_timezone(&Utc),
        sent_date: model.sent_date.map(|d| d.with_timezone(&Utc)),
        due_date: model.due_date.map(|d| d.with_timezone(&Utc)),
        current_status: model.current_status,
        invoice_ocr: model.invoice_ocr,
    }
}

fn row_from_entity(model: InvoiceRowModel) -> InvoiceRow {
    InvoiceRow {
        id: model.id,
        invoice_id: model.invoice_id,
        item_name: model.item_name,
        num_items: model.num_items,
        item_price: model.item_price,
        holding_id: model.holding_id,
        created_at: model.created_at.with_timezone(&Utc),
    }
}

fn holding_from_entity(model: HoldingModel) -> Holding {
    Holding {
        id: model.id,
        owner_id: model.owner_id,
        owner_name: model.owner_name,
        item_name: model.item_name,
        created_at: model.created_at.with_timezone(&Utc),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_invoice() -> Invoice {
        Invoice {
            id: 5,
            invoice_number: Some(100005),
            customer_name: "Anna Andersson".into(),
            customer_organization: "Blåshjuden".into(),
            customer_pid: "9001011234".into(),
            customer_email: "anna@example.org".into(),
            create_date: Utc.with_ymd_and_hms(2026, 8, 29, 12, 0, 0).unwrap(),
            sent_date: Some(Utc.with_ymd_and_hms(2026, 8, 29, 12, 0, 0).unwrap()),
            due_date: Some(Utc.with_ymd_and_hms(2026, 9, 12, 12, 0, 0).unwrap()),
            current_status: InvoiceStatus::Sent,
            invoice_ocr: Some("1000054".into()),
        }
    }

    fn sample_row(item: &str, price: i64, qty: i32) -> InvoiceRow {
        InvoiceRow {
            id: Uuid::new_v4(),
            invoice_id: 5,
            item_name: item.into(),
            num_items: qty,
            item_price: price,
            holding_id: None,
            created_at: Utc.with_ymd_and_hms(2026, 8, 29, 12, 0, 0).unwrap(),
        }
    }

    #[test]
    fn invoice_total_accumulates_over_all_rows() {
        let invoice = sample_invoice();
        let rows = vec![
            (sample_row("Festival pass", 50_000, 2), None),
            (sample_row("Sheet music", 12_500, 1), None),
            (sample_row("T-shirt", 15_000, 3), None),
        ];

        let data = build_invoice_data(&invoice, &rows);
        assert_eq!(data.products.len(), 3);
        assert_eq!(data.products[0].row_total, 100_000);
        assert_eq!(data.invoice_total, 100_000 + 12_500 + 45_000);
    }

    #[test]
    fn holding_owner_is_flattened_into_the_row() {
        let invoice = sample_invoice();
        let owner_id = Uuid::new_v4();
        let holding = Holding {
            id: Uuid::new_v4(),
            owner_id,
            owner_name: "Bo Berg".into(),
            item_name: "Tuba".into(),
            created_at: Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap(),
        };
        let rows = vec![(sample_row("Tuba rental", 20_000, 1), Some(holding))];

        let data = build_invoice_data(&invoice, &rows);
        assert_eq!(data.products[0].owner_id, Some(owner_id));
        assert_eq!(data.products[0].owner_name.as_deref(), Some("Bo Berg"));
    }

    #[test]
    fn dates_are_rendered_as_plain_days() {
        let invoice = sample_invoice();
        let data = build_invoice_data(&invoice, &[]);
        assert_eq!(data.sent_date.as_deref(), Some("2026-08-29"));
        assert_eq!(data.due_date.as_deref(), Some("2026-09-12"));
        assert_eq!(data.invoice_total, 0);
    }
}
