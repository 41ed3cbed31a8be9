pub mod org_lookup;
pub mod pipeline;
pub mod progress;
pub mod reconciliation;
pub mod tabular_extractor;
pub mod viewing_documents;
