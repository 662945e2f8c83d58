use std::sync::Arc;

use crate::db::{DbPool, OrmConn};
use crate::mail::Mailer;
use crate::ocr::CheckLength;

/// Invoice-related settings threaded from config into the services.
#[derive(Debug, Clone)]
pub struct InvoiceSettings {
    pub ocr_check_length: CheckLength,
    pub mail_from: String,
}

#[derive(Clone)]
pub struct AppState {
    pub pool: DbPool,
    pub orm: OrmConn,
    pub mailer: Arc<dyn Mailer>,
    pub templates: Arc<tera::Tera>,
    pub settings: InvoiceSettings,
}
