use std::env;

use crate::ocr::CheckLength;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub ocr_check_length: CheckLength,
    pub mail_api_url: String,
    pub mail_api_key: Option<String>,
    pub mail_from: String,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = env::var("DATABASE_URL")?;
        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .ok()
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(3000);

        let ocr_check_length = match env::var("INVOICE_OCR_CHECK_LENGTH") {
            Ok(raw) => raw
                .parse::<u8>()
                .ok()
                .and_then(CheckLength::from_digits)
                .ok_or_else(|| {
                    anyhow::anyhow!("INVOICE_OCR_CHECK_LENGTH must be 1 or 2, got {raw:?}")
                })?,
            Err(_) => CheckLength::One,
        };

        let mail_api_url = env::var("MAIL_API_URL")
            .unwrap_or_else(|_| "https://api.resend.com/emails".to_string());
        let mail_api_key = env::var("MAIL_API_KEY").ok();
        let mail_from =
            env::var("MAIL_FROM").unwrap_or_else(|_| "invoices@orchestra.example".to_string());

        Ok(Self {
            database_url,
            host,
            port,
            ocr_check_length,
            mail_api_url,
            mail_api_key,
            mail_from,
        })
    }
}
