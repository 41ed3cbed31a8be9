// ============================================================
// REGISTRY RECORDS
// ============================================================
// One record type per source shape. Field order is the output column order.

mod all_org_row;
mod approved_row;
mod detail_information;
mod merged_row;
mod tokyo_information;

pub use all_org_row::AllOrgRow;
pub use approved_row::{ApprovedRow, LEDGER_HEADER_SENTINEL};
pub use detail_information::DetailInformation;
pub use merged_row::MergedOutputRow;
pub use tokyo_information::TokyoInformation;
