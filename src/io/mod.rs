pub mod audit_csv;
pub mod csv_write;
pub mod discover;
pub mod excel_write;
