pub mod documents;
pub mod error;
pub mod record;
pub mod records;
