//! Printers backed by directories: every job becomes a PDF file
//!
//! Each sub-directory of the root is one printer, named after the directory.
//! Useful on machines without a print service and for checking output before
//! it reaches paper.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Local;
use tracing::info;

use crate::error::{Error, Result};
use crate::job::{JobSubmitter, Printable};
use crate::layout::PageFormat;
use crate::pdf::spool_document;
use crate::registry::{PrinterEnumerator, PrinterHandle};

use super::aborted;

#[derive(Debug, Clone)]
pub struct DirectoryBackend {
    root: PathBuf,
    page: PageFormat,
}

impl DirectoryBackend {
    pub fn new(root: impl Into<PathBuf>, page: PageFormat) -> Self {
        Self {
            root: root.into(),
            page,
        }
    }

    /// PDF files spooled into `dir`, oldest first
    pub fn spooled_jobs(dir: &Path) -> Result<Vec<PathBuf>> {
        let mut jobs: Vec<PathBuf> = fs::read_dir(dir)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| path.extension().is_some_and(|ext| ext == "pdf"))
            .collect();
        jobs.sort();
        Ok(jobs)
    }
}

impl PrinterEnumerator for DirectoryBackend {
    fn enumerate(&self) -> Result<Vec<(String, PrinterHandle)>> {
        let entries = fs::read_dir(&self.root)
            .map_err(|e| Error::Enumeration(format!("{}: {e}", self.root.display())))?;

        let mut printers = Vec::new();
        for entry in entries {
            let entry = entry?;
            if !entry.file_type()?.is_dir() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().into_owned();
            let device = entry.path().display().to_string();
            printers.push((name.clone(), PrinterHandle::new(name, device, self.page)));
        }
        printers.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(printers)
    }
}

impl JobSubmitter for DirectoryBackend {
    fn submit(&self, printer: &PrinterHandle, title: &str, document: &dyn Printable) -> Result<()> {
        let dir = Path::new(&printer.device);
        if !dir.is_dir() {
            return Err(aborted(printer, format!("{} is not a directory", dir.display())));
        }

        let pdf = spool_document(document, &printer.page, title)?;

        let stamp = Local::now().format("%Y%m%dT%H%M%S");
        let path = (1..)
            .map(|seq| dir.join(format!("{stamp}-{seq:03}.pdf")))
            .find(|path| !path.exists())
            .ok_or_else(|| aborted(printer, "no free file name"))?;

        fs::write(&path, pdf).map_err(|e| aborted(printer, format!("{}: {e}", path.display())))?;
        info!(printer = %printer.name, path = %path.display(), "job spooled to directory");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::job::TicketPrintable;
    use crate::layout::Scale;
    use crate::render::MarkupRenderer;
    use tempfile::TempDir;

    #[test]
    fn test_enumerate_lists_subdirectories() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        fs::create_dir(temp_dir.path().join("Zebra")).unwrap();
        fs::create_dir(temp_dir.path().join("HP1")).unwrap();
        fs::write(temp_dir.path().join("README"), "not a printer").unwrap();

        let backend = DirectoryBackend::new(temp_dir.path(), PageFormat::letter());
        let printers = backend.enumerate().unwrap();
        let names: Vec<&str> = printers.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["HP1", "Zebra"]);
        assert_eq!(printers[0].1.page, PageFormat::letter());
    }

    #[test]
    fn test_enumerate_missing_root() {
        let backend = DirectoryBackend::new("/nonexistent/direct-print-root", PageFormat::letter());
        assert!(matches!(backend.enumerate(), Err(Error::Enumeration(_))));
    }

    #[test]
    fn test_submit_writes_pdf_per_job() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let printer_dir = temp_dir.path().join("HP1");
        fs::create_dir(&printer_dir).unwrap();

        let backend = DirectoryBackend::new(temp_dir.path(), PageFormat::letter());
        let (_, handle) = backend.enumerate().unwrap().remove(0);
        let renderer = MarkupRenderer::default();
        let printable = TicketPrintable::new("AB", None, Scale::identity(), &renderer);

        backend.submit(&handle, "first", &printable).unwrap();
        backend.submit(&handle, "second", &printable).unwrap();

        let jobs = DirectoryBackend::spooled_jobs(&printer_dir).unwrap();
        assert_eq!(jobs.len(), 2);
        for job in jobs {
            assert!(fs::read(job).unwrap().starts_with(b"%PDF"));
        }
    }

    #[test]
    fn test_submit_to_vanished_directory_aborts() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let handle = PrinterHandle::new(
            "Gone",
            temp_dir.path().join("Gone").display().to_string(),
            PageFormat::letter(),
        );
        let backend = DirectoryBackend::new(temp_dir.path(), PageFormat::letter());
        let renderer = MarkupRenderer::default();
        let printable = TicketPrintable::new("AB", None, Scale::identity(), &renderer);

        let result = backend.submit(&handle, "job", &printable);
        assert!(matches!(
            result,
            Err(Error::PrintJobAborted { ref printer, .. }) if printer == "Gone"
        ));
    }
}
