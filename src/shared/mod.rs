pub mod text_format;
pub mod url;
