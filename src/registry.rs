//! Snapshot of the printers available on this machine

use std::collections::BTreeMap;

use tracing::debug;

use crate::error::{Error, Result};
use crate::layout::PageFormat;

/// A printable device as reported by the print service
#[derive(Debug, Clone, PartialEq)]
pub struct PrinterHandle {
    /// Display name the printer is registered under
    pub name: String,
    /// Backend-specific address (queue name, spool directory, ...)
    pub device: String,
    /// Paper and imageable area of the device
    pub page: PageFormat,
}

impl PrinterHandle {
    pub fn new(name: impl Into<String>, device: impl Into<String>, page: PageFormat) -> Self {
        Self {
            name: name.into(),
            device: device.into(),
            page,
        }
    }
}

/// Capability that lists the installed printers as `(name, handle)` pairs
pub trait PrinterEnumerator {
    fn enumerate(&self) -> Result<Vec<(String, PrinterHandle)>>;
}

/// Name → printer mapping, built once per run and read-only afterwards
#[derive(Debug, Clone)]
pub struct PrinterRegistry {
    printers: BTreeMap<String, PrinterHandle>,
}

impl PrinterRegistry {
    /// Query the print service once and keep the result.
    ///
    /// Fails with [`Error::NoPrintersAvailable`] when nothing is installed.
    pub fn build(enumerator: &dyn PrinterEnumerator) -> Result<Self> {
        Self::from_printers(enumerator.enumerate()?)
    }

    pub fn from_printers<I>(printers: I) -> Result<Self>
    where
        I: IntoIterator<Item = (String, PrinterHandle)>,
    {
        let printers: BTreeMap<String, PrinterHandle> = printers.into_iter().collect();
        if printers.is_empty() {
            return Err(Error::NoPrintersAvailable);
        }
        debug!(count = printers.len(), "printer registry built");
        Ok(Self { printers })
    }

    /// Look a printer up by name.
    ///
    /// An exact match always wins. Otherwise, if the name is qualified with a
    /// machine (`\\machine\printer`, `host/printer`), the part after the last
    /// separator is tried. Unqualified names get no second chance.
    pub fn resolve(&self, name: &str) -> Option<&PrinterHandle> {
        if let Some(handle) = self.printers.get(name) {
            return Some(handle);
        }

        let index = name.rfind(|c: char| c == '\\' || c == '/')?;
        let short = &name[index + 1..];
        let handle = self.printers.get(short);
        if handle.is_some() {
            debug!(requested = name, resolved = short, "printer resolved by share name");
        }
        handle
    }

    /// Registered printer names, sorted
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.printers.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.printers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.printers.is_empty()
    }
}
