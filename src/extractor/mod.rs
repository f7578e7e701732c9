pub mod extractor;
pub mod isbn;
pub mod json;
pub mod validated;
