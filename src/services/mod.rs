pub mod invoice_service;
pub mod member_service;
