//! Direct Print Library
//!
//! Prints marked-up content on named printers without a print dialog.
//! This library provides functionality to:
//! - Split a content blob into tickets, each bound to a printer, region and scale
//! - Resolve printer names, including `\\machine\printer` share names
//! - Lay out markup and place it on the page (translate, clip, scale)
//! - Spool pages to PDF and hand them to CUPS or to spool directories
//! - Collect per-ticket failures into one report
//!
//! # Example
//!
//! ```no_run
//! use direct_print::backend::CupsBackend;
//! use direct_print::dispatch::PrintDispatcher;
//! use direct_print::registry::PrinterRegistry;
//! use direct_print::render::MarkupRenderer;
//! use direct_print::report::BatchReporter;
//! use direct_print::ticket::TicketBatch;
//!
//! let backend = CupsBackend::default();
//! let registry = PrinterRegistry::build(&backend).expect("No printers");
//! let renderer = MarkupRenderer::default();
//!
//! let batch = TicketBatch::from_spec("<b>Order 42</b>", "HP1", "default", "1;1")
//!     .expect("Invalid ticket");
//! let result = PrintDispatcher::new(&registry, &backend, &renderer).dispatch(batch);
//!
//! if let Some(message) = BatchReporter::report(&result) {
//!     eprintln!("{message}");
//! }
//! ```

pub mod backend;
pub mod dispatch;
pub mod error;
pub mod invocation;
pub mod job;
pub mod layout;
pub mod logging;
pub mod pdf;
pub mod registry;
pub mod render;
pub mod report;
pub mod ticket;
pub mod transform;

// Re-export commonly used items
pub use dispatch::{BatchResult, PrintDispatcher};
pub use error::{Error, Result};
pub use registry::{PrinterHandle, PrinterRegistry};
pub use report::BatchReporter;
pub use ticket::{Ticket, TicketBatch};
