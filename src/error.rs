//! Error types for the direct-print library

use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the direct-print library
#[derive(Error, Debug)]
pub enum Error {
    /// The print service reported no installed printers
    #[error("Print service not available")]
    NoPrintersAvailable,

    /// The printer enumeration itself failed
    #[error("Could not list printers: {0}")]
    Enumeration(String),

    /// A required invocation parameter is absent or empty
    #[error("A required argument has not been found: {0}")]
    MissingArgument(String),

    /// A parameter could not be percent-decoded to UTF-8
    #[error("Invalid encoding in {0}")]
    InvalidEncoding(String),

    /// Region spec is neither "default" nor "x;y;width;height"
    #[error("Invalid region \"{0}\": expected \"default\" or \"x;y;width;height\"")]
    InvalidRegion(String),

    /// Scale spec is not "x;y"
    #[error("Invalid scale \"{0}\": expected \"x;y\"")]
    InvalidScale(String),

    /// Ticket start offsets break the batch invariants
    #[error("Invalid ticket boundary at offset {0}")]
    InvalidTicketBoundary(usize),

    /// No registered printer matches the ticket's printer name
    #[error("\"{0}\" Printer not found")]
    PrinterNotFound(String),

    /// The device (or its spooler) rejected the job
    #[error("\"{printer}\" Aborted print service: {reason}")]
    PrintJobAborted { printer: String, reason: String },

    /// The renderer could not lay out the content
    #[error("Layout error: {0}")]
    Layout(String),

    /// PDF processing error
    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// General error
    #[error("{0}")]
    General(String),
}

impl Error {
    /// Errors that concern a single ticket. The dispatcher records these and
    /// carries on with the next ticket; everything else stops the run.
    pub fn is_ticket_level(&self) -> bool {
        matches!(self, Error::PrinterNotFound(_) | Error::PrintJobAborted { .. })
    }
}
