pub mod certification_list;
mod html;
pub mod html_tables;
pub mod npoportal_detail;
pub mod tokyo_detail;

pub use certification_list::discover_ledger_url;
pub use html_tables::HtmlTables;
pub use npoportal_detail::NpoPortalDetailFetcher;
pub use tokyo_detail::TokyoDetailFetcher;
