//! Print services the dispatcher can drive
//!
//! Each backend provides both capabilities the pipeline needs: listing the
//! printers ([`PrinterEnumerator`](crate::registry::PrinterEnumerator)) and
//! accepting jobs ([`JobSubmitter`](crate::job::JobSubmitter)).

pub mod cups;
pub mod directory;

pub use cups::CupsBackend;
pub use directory::DirectoryBackend;

use std::fmt::Display;

use crate::error::Error;
use crate::registry::PrinterHandle;

/// Device-level failure for `printer`
pub(crate) fn aborted(printer: &PrinterHandle, reason: impl Display) -> Error {
    Error::PrintJobAborted {
        printer: printer.name.clone(),
        reason: reason.to_string(),
    }
}
