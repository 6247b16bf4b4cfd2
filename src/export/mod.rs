//! Downloadable documents: HTML invoices and the order CSV

pub mod invoice;
pub mod report;

pub use invoice::{invoice_file_name, render_invoice};
pub use report::orders_csv;
