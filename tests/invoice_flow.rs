use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{Duration, Utc};
use orchestra_invoicing_api::{
    db::{create_orm_conn, create_pool, run_migrations},
    dto::{
        invoices::{GenerateInvoiceRequest, InvoiceRowInput},
        members::{ApproveMembersRequest, RegisterMemberRequest},
    },
    entity::{
        holdings::ActiveModel as HoldingActive,
        invoices::{ActiveModel as InvoiceActive, InvoiceStatus},
        orchestras::ActiveModel as OrchestraActive,
    },
    mail::{MailError, Mailer, OutgoingEmail, build_templates},
    ocr,
    services::{invoice_service, member_service},
    state::{AppState, InvoiceSettings},
};
use sea_orm::ActiveValue::NotSet;
use sea_orm::{ActiveModelTrait, ConnectionTrait, Set, Statement};
use uuid::Uuid;

/// Mailer that keeps every message for assertions.
struct RecordingMailer {
    sent: Mutex<Vec<OutgoingEmail>>,
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, email: &OutgoingEmail) -> Result<(), MailError> {
        self.sent.lock().unwrap().push(email.clone());
        Ok(())
    }
}

// Integration flow: generate an invoice with three rows -> send it ->
// verify stamps, mail payload, and number/OCR uniqueness.
#[tokio::test]
async fn generate_send_and_uniqueness_flow() -> anyhow::Result<()> {
    // Allow skipping when no DB is configured in the environment.
    let database_url = match std::env::var("TEST_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
    {
        Ok(url) => url,
        Err(_) => {
            eprintln!(
                "Skipping test: set TEST_DATABASE_URL or DATABASE_URL to run integration flow tests."
            );
            return Ok(());
        }
    };

    let mailer = Arc::new(RecordingMailer {
        sent: Mutex::new(Vec::new()),
    });
    let state = setup_state(&database_url, mailer.clone()).await?;

    // Seed a holding one row will point at.
    let owner_id = Uuid::new_v4();
    let holding = HoldingActive {
        id: Set(Uuid::new_v4()),
        owner_id: Set(owner_id),
        owner_name: Set("Bo Berg".into()),
        item_name: Set("Tuba".into()),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    let request = GenerateInvoiceRequest {
        customer_name: "Anna Andersson".into(),
        customer_organization: "Blåshjuden".into(),
        customer_pid: "9001011234".into(),
        customer_email: "anna@example.org".into(),
        rows: vec![
            InvoiceRowInput {
                item_name: "Festival pass".into(),
                item_price: 50_000,
                num_items: 2,
                holding_id: None,
            },
            InvoiceRowInput {
                item_name: "Tuba rental".into(),
                item_price: 20_000,
                num_items: 1,
                holding_id: Some(holding.id),
            },
            InvoiceRowInput {
                item_name: "Sheet music".into(),
                item_price: 12_500,
                num_items: 1,
                holding_id: None,
            },
        ],
    };

    let generated = invoice_service::generate_invoice(&state, request, Utc::now()).await?;
    let generated = generated.data.unwrap();
    assert_eq!(generated.rows.len(), 3);

    let invoice = &generated.invoice;
    let number = invoice.invoice_number.expect("number assigned");
    assert_eq!(number, invoice.id + invoice_service::INVOICE_NUMBER_OFFSET);
    assert_eq!(invoice.invoice_ocr.as_deref(), Some(ocr::invoice_ocr(number).as_str()));
    assert_eq!(invoice.current_status, InvoiceStatus::Generated);
    assert!(invoice.sent_date.is_none());

    // Send it.
    let now = Utc::now();
    let sent = invoice_service::send_invoice(&state, invoice.id, now).await?;
    let sent = sent.data.unwrap();
    assert_eq!(sent.current_status, InvoiceStatus::Sent);
    // Postgres stores microseconds, so compare with a little slack.
    let sent_at = sent.sent_date.expect("sent date");
    let due_at = sent.due_date.expect("due date");
    assert!((sent_at - now).num_milliseconds().abs() < 1000);
    assert_eq!(due_at - sent_at, Duration::days(14));

    let mails = mailer.sent.lock().unwrap();
    assert_eq!(mails.len(), 1);
    assert_eq!(mails[0].to, "anna@example.org");
    assert!(mails[0].html.contains(&ocr::invoice_ocr(number)));
    assert!(mails[0].html.contains("Bo Berg"));
    drop(mails);

    // A second invoice with the same number must violate the unique constraint.
    let duplicate = InvoiceActive {
        id: NotSet,
        invoice_number: Set(Some(number)),
        customer_name: Set("Copycat".into()),
        customer_organization: Set(String::new()),
        customer_pid: Set("0000000000".into()),
        customer_email: Set("copy@example.org".into()),
        create_date: Set(Utc::now().into()),
        sent_date: Set(None),
        due_date: Set(None),
        current_status: Set(InvoiceStatus::Generated),
        invoice_ocr: Set(None),
    }
    .insert(&state.orm)
    .await;
    assert!(duplicate.is_err(), "duplicate invoice_number must fail");

    let duplicate_ocr = InvoiceActive {
        id: NotSet,
        invoice_number: Set(None),
        customer_name: Set("Copycat".into()),
        customer_organization: Set(String::new()),
        customer_pid: Set("0000000000".into()),
        customer_email: Set("copy@example.org".into()),
        create_date: Set(Utc::now().into()),
        sent_date: Set(None),
        due_date: Set(None),
        current_status: Set(InvoiceStatus::Generated),
        invoice_ocr: Set(Some(ocr::invoice_ocr(number))),
    }
    .insert(&state.orm)
    .await;
    assert!(duplicate_ocr.is_err(), "duplicate invoice_ocr must fail");

    Ok(())
}

// Membership flow: register -> approve -> orchestra invoice data carries
// payment references for invoices addressed to the orchestra.
#[tokio::test]
async fn membership_and_invoice_data_flow() -> anyhow::Result<()> {
    let database_url = match std::env::var("TEST_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
    {
        Ok(url) => url,
        Err(_) => {
            eprintln!(
                "Skipping test: set TEST_DATABASE_URL or DATABASE_URL to run integration flow tests."
            );
            return Ok(());
        }
    };

    let mailer = Arc::new(RecordingMailer {
        sent: Mutex::new(Vec::new()),
    });
    let state = setup_state(&database_url, mailer).await?;

    let orchestra = OrchestraActive {
        id: Set(Uuid::new_v4()),
        name: Set("Filiorkestern".into()),
        contact_email: Set(Some("styrelsen@example.org".into())),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    let registered = member_service::register_member(
        &state,
        RegisterMemberRequest {
            orchestra_id: orchestra.id,
            full_name: "Carl Cello".into(),
            email: "carl@example.org".into(),
        },
        Utc::now(),
    )
    .await?;
    let member = registered.data.unwrap();
    assert!(!member.approved);

    let approved = member_service::approve_members(
        &state,
        orchestra.id,
        ApproveMembersRequest {
            member_ids: vec![member.id],
        },
    )
    .await?;
    let approved = approved.data.unwrap();
    assert!(approved.items.iter().all(|m| m.approved));

    // An invoice addressed to the orchestra by name.
    let generated = invoice_service::generate_invoice(
        &state,
        GenerateInvoiceRequest {
            customer_name: "Filiorkestern c/o kassören".into(),
            customer_organization: "Filiorkestern".into(),
            customer_pid: "5560000000".into(),
            customer_email: "kassor@example.org".into(),
            rows: vec![InvoiceRowInput {
                item_name: "Membership fee".into(),
                item_price: 25_000,
                num_items: 1,
                holding_id: None,
            }],
        },
        Utc::now(),
    )
    .await?;
    let invoice = generated.data.unwrap().invoice;
    let number = invoice.invoice_number.unwrap();

    let data = member_service::orchestra_invoice_data(&state, orchestra.id).await?;
    let data = data.data.unwrap();
    assert_eq!(data.approved_members.len(), 1);
    assert_eq!(data.invoices.len(), 1);
    assert_eq!(
        data.invoices[0].payment_reference.as_deref(),
        Some(ocr::generate(number, state.settings.ocr_check_length).as_str())
    );

    Ok(())
}

async fn setup_state(
    database_url: &str,
    mailer: Arc<dyn Mailer>,
) -> anyhow::Result<AppState> {
    let pool = create_pool(database_url).await?;
    let orm = create_orm_conn(database_url).await?;
    run_migrations(&orm).await?;

    // Clean tables between runs
    let backend = orm.get_database_backend();
    orm.execute(Statement::from_string(
        backend,
        "TRUNCATE TABLE invoice_rows, invoices, holdings, members, orchestras, invoice_events RESTART IDENTITY CASCADE",
    ))
    .await?;

    Ok(AppState {
        pool,
        orm,
        mailer,
        templates: Arc::new(build_templates()?),
        settings: InvoiceSettings {
            ocr_check_length: orchestra_invoicing_api::ocr::CheckLength::Two,
            mail_from: "invoices@orchestra.example".into(),
        },
    })
}
