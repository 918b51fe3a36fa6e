//! Sending every ticket of a batch to its printer

use tracing::{debug, error, info, warn};

use crate::error::{Error, Result};
use crate::job::{JobSubmitter, TicketPrintable};
use crate::registry::PrinterRegistry;
use crate::render::Renderer;
use crate::ticket::{Ticket, TicketBatch};

/// Outcome of one dispatch call
#[derive(Debug, Default)]
pub struct BatchResult {
    /// Printers that accepted a job, in dispatch order
    pub printed: Vec<String>,
    /// Distinct failure messages, in the order they first occurred
    pub failures: Vec<String>,
    /// Unexpected error that stopped the batch early
    pub fault: Option<Error>,
}

impl BatchResult {
    /// True when every ticket was printed
    pub fn is_success(&self) -> bool {
        self.failures.is_empty() && self.fault.is_none()
    }

    fn record_failure(&mut self, err: &Error) {
        let message = err.to_string();
        if self.failures.contains(&message) {
            debug!(%message, "failure already recorded");
        } else {
            self.failures.push(message);
        }
    }
}

/// Resolves each ticket's printer and submits the ticket as a one-page job
pub struct PrintDispatcher<'a, S: JobSubmitter, R: Renderer> {
    registry: &'a PrinterRegistry,
    submitter: &'a S,
    renderer: &'a R,
    title: String,
}

impl<'a, S: JobSubmitter, R: Renderer> PrintDispatcher<'a, S, R> {
    pub fn new(registry: &'a PrinterRegistry, submitter: &'a S, renderer: &'a R) -> Self {
        Self {
            registry,
            submitter,
            renderer,
            title: "direct-print".to_string(),
        }
    }

    /// Job title shown by the print service
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Process the tickets in order.
    ///
    /// A ticket whose printer is unknown or whose job the device aborts is
    /// recorded and the remaining tickets are still attempted. Any other error
    /// stops the batch; jobs already submitted stay submitted.
    pub fn dispatch(&self, batch: TicketBatch<'_>) -> BatchResult {
        let mut result = BatchResult::default();
        info!(tickets = batch.len(), "dispatching batch");

        for (index, (ticket, slice)) in batch.slices().enumerate() {
            match self.print_ticket(ticket, slice) {
                Ok(printer) => {
                    info!(ticket = index, %printer, "ticket printed");
                    result.printed.push(printer);
                }
                Err(err) if err.is_ticket_level() => {
                    warn!(ticket = index, error = %err, "ticket not printed");
                    result.record_failure(&err);
                }
                Err(err) => {
                    error!(ticket = index, error = %err, "batch stopped");
                    result.fault = Some(err);
                    break;
                }
            }
        }

        result
    }

    fn print_ticket(&self, ticket: &Ticket, slice: &str) -> Result<String> {
        let printer = self
            .registry
            .resolve(&ticket.printer_name)
            .ok_or_else(|| Error::PrinterNotFound(ticket.printer_name.clone()))?;

        let document = TicketPrintable::new(slice, ticket.region, ticket.scale, self.renderer);
        self.submitter.submit(printer, &self.title, &document)?;
        Ok(printer.name.clone())
    }
}
