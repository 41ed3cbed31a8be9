pub mod archive;
pub mod config;
pub mod csv;
pub mod http;
pub mod pdf_ledger;
pub mod scraping;
pub mod storage;
