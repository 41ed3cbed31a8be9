// ============================================================
// CSV INFRASTRUCTURE LAYER
// ============================================================
// Legacy-encoded export reading and quote-all UTF-8 output

mod csv_parser;
mod csv_writer;
mod org_export;

pub use csv_writer::write_rows;
pub use org_export::read_org_export;
