pub mod holdings;
pub mod invoice_rows;
pub mod invoices;
pub mod members;
pub mod orchestras;

pub use holdings::Entity as Holdings;
pub use invoice_rows::Entity as InvoiceRows;
pub use invoices::Entity as Invoices;
pub use members::Entity as Members;
pub use orchestras::Entity as Orchestras;
