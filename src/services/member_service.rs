use chrono::{DateTime, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use crate::{
    dto::members::{
        ApproveMembersRequest, MemberList, OrchestraInvoiceData, OrchestraInvoiceSummary,
        RegisterMemberRequest,
    },
    entity::{
        invoices::{Column as InvoiceCol, Entity as Invoices},
        members::{
            ActiveModel as MemberActive, Column as MemberCol, Entity as Members,
            Model as MemberModel,
        },
        orchestras::{Entity as Orchestras, Model as OrchestraModel},
    },
    error::{AppError, AppResult},
    models::{Member, Orchestra},
    ocr,
    response::{ApiResponse, Meta},
    state::AppState,
};

/// Register a new orchestra member. Members start unapproved and only
/// count towards invoicing once approved.
pub async fn register_member(
    state: &AppState,
    req: RegisterMemberRequest,
    now: DateTime<Utc>,
) -> AppResult<ApiResponse<Member>> {
    if Orchestras::find_by_id(req.orchestra_id)
        .one(&state.orm)
        .await?
        .is_none()
    {
        return Err(AppError::BadRequest(format!(
            "Unknown orchestra {}",
            req.orchestra_id
        )));
    }

    let member = MemberActive {
        id: Set(Uuid::new_v4()),
        orchestra_id: Set(req.orchestra_id),
        full_name: Set(req.full_name),
        email: Set(req.email),
        approved: Set(false),
        created_at: Set(now.into()),
    }
    .insert(&state.orm)
    .await?;

    Ok(ApiResponse::success(
        "Member registered",
        member_from_entity(member),
        Some(Meta::empty()),
    ))
}

/// Approve the listed members of one orchestra. Ids belonging to other
/// orchestras are ignored by the filter rather than rejected.
pub async fn approve_members(
    state: &AppState,
    orchestra_id: Uuid,
    req: ApproveMembersRequest,
) -> AppResult<ApiResponse<MemberList>> {
    let orchestra = Orchestras::find_by_id(orchestra_id).one(&state.orm).await?;
    if orchestra.is_none() {
        return Err(AppError::NotFound);
    }

    if req.member_ids.is_empty() {
        return Err(AppError::BadRequest("No member ids given".into()));
    }

    Members::update_many()
        .col_expr(MemberCol::Approved, Expr::value(true))
        .filter(
            Condition::all()
                .add(MemberCol::OrchestraId.eq(orchestra_id))
                .add(MemberCol::Id.is_in(req.member_ids.clone())),
        )
        .exec(&state.orm)
        .await?;

    let members = Members::find()
        .filter(
            Condition::all()
                .add(MemberCol::OrchestraId.eq(orchestra_id))
                .add(MemberCol::Id.is_in(req.member_ids)),
        )
        .order_by_asc(MemberCol::CreatedAt)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(member_from_entity)
        .collect();

    Ok(ApiResponse::success(
        "Members approved",
        MemberList { items: members },
        Some(Meta::empty()),
    ))
}

/// Everything needed to bill an orchestra: the approved roster plus the
/// invoices addressed to it, each with its bank payment reference.
pub async fn orchestra_invoice_data(
    state: &AppState,
    orchestra_id: Uuid,
) -> AppResult<ApiResponse<OrchestraInvoiceData>> {
    let orchestra = Orchestras::find_by_id(orchestra_id).one(&state.orm).await?;
    let orchestra = match orchestra {
        Some(o) => o,
        None => return Err(AppError::NotFound),
    };

    let approved_members = Members::find()
        .filter(
            Condition::all()
                .add(MemberCol::OrchestraId.eq(orchestra_id))
                .add(MemberCol::Approved.eq(true)),
        )
        .order_by_asc(MemberCol::CreatedAt)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(member_from_entity)
        .collect();

    let invoices = Invoices::find()
        .filter(InvoiceCol::CustomerOrganization.eq(orchestra.name.clone()))
        .order_by_desc(InvoiceCol::CreateDate)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(|invoice| OrchestraInvoiceSummary {
            invoice_id: invoice.id,
            invoice_number: invoice.invoice_number,
            invoice_ocr: invoice.invoice_ocr,
            payment_reference: invoice
                .invoice_number
                .map(|n| ocr::generate(n, state.settings.ocr_check_length)),
            current_status: invoice.current_status,
        })
        .collect();

    Ok(ApiResponse::success(
        "OK",
        OrchestraInvoiceData {
            orchestra: orchestra_from_entity(orchestra),
            approved_members,
            invoices,
        },
        Some(Meta::empty()),
    ))
}

fn member_from_entity(model: MemberModel) -> Member {
    Member {
        id: model.id,
        orchestra_id: model.orchestra_id,
        full_name: model.full_name,
        email: model.email,
        approved: model.approved,
        created_at: model.created_at.with_timezone(&Utc),
    }
}

fn orchestra_from_entity(model: OrchestraModel) -> Orchestra {
    Orchestra {
        id: model.id,
        name: model.name,
        contact_email: model.contact_email,
        created_at: model.created_at.with_timezone(&Utc),
    }
}
