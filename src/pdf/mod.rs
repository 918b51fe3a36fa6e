//! PDF output: a graphics target writing content streams, and the spooler
//! turning printables into documents

pub mod canvas;
pub mod spool;

// Re-export commonly used items
pub use canvas::PdfCanvas;
pub use spool::{spool_document, MAX_PAGES};
