//! Print jobs: the page callback contract and the submission capability

use tracing::{info, trace};

use crate::error::Result;
use crate::layout::{PageFormat, Region, Scale};
use crate::registry::PrinterHandle;
use crate::render::{GraphicsTarget, Renderer};
use crate::transform::RenderTransform;

/// Answer of a [`Printable`] when asked for a page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageStatus {
    /// The page was painted onto the target
    Exists,
    /// There is no page with that index; the document is complete
    NoSuchPage,
}

/// A document that paints itself page by page.
///
/// A submitter calls `print` with page indexes 0, 1, 2, ... until it gets
/// [`PageStatus::NoSuchPage`].
pub trait Printable {
    fn print(
        &self,
        target: &mut dyn GraphicsTarget,
        page: &PageFormat,
        page_index: usize,
    ) -> Result<PageStatus>;
}

/// Capability that sends a printable document to a device.
///
/// Blocks until the device accepts or rejects the job. Device-level failures
/// are reported as [`Error::PrintJobAborted`](crate::Error::PrintJobAborted).
pub trait JobSubmitter {
    fn submit(&self, printer: &PrinterHandle, title: &str, document: &dyn Printable) -> Result<()>;
}

/// One ticket's content as a single-page document
pub struct TicketPrintable<'a, R: Renderer> {
    content: &'a str,
    region: Option<Region>,
    scale: Scale,
    renderer: &'a R,
}

impl<'a, R: Renderer> TicketPrintable<'a, R> {
    pub fn new(content: &'a str, region: Option<Region>, scale: Scale, renderer: &'a R) -> Self {
        Self {
            content,
            region,
            scale,
            renderer,
        }
    }
}

impl<R: Renderer> Printable for TicketPrintable<'_, R> {
    fn print(
        &self,
        target: &mut dyn GraphicsTarget,
        page: &PageFormat,
        page_index: usize,
    ) -> Result<PageStatus> {
        // Always exactly one page; content that does not fit is clipped
        if page_index >= 1 {
            return Ok(PageStatus::NoSuchPage);
        }

        let transform = RenderTransform::for_page(self.region, self.scale, page);
        trace!(?transform, "painting ticket");
        transform.apply(target);

        let surface = self
            .renderer
            .layout(self.content, transform.region().width, 1.0)?;
        let (width, height) = self.renderer.extent(&surface);
        if transform.clips_content(width, height) {
            info!(width, height, region = ?transform.region(), "ticket content clipped to its region");
        }
        self.renderer.paint(&surface, target);
        Ok(PageStatus::Exists)
    }
}
