//! Decoding of the four positional invocation parameters
//!
//! Callers (launchers, URL handlers, shell scripts) pass every parameter
//! percent-encoded, with `+` standing for a space.

use percent_encoding::percent_decode_str;

use crate::error::{Error, Result};
use crate::ticket::TicketBatch;

/// Parameters as received, still encoded
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawInvocation {
    pub content: Option<String>,
    pub printer: Option<String>,
    pub region: Option<String>,
    pub scale: Option<String>,
}

/// Decoded parameters, ready for splitting into tickets
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub content: String,
    pub printer: String,
    pub region: String,
    pub scale: String,
}

impl RawInvocation {
    /// Take the parameters positionally: content, printer, region, scale
    pub fn from_args<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut args = args.into_iter().map(Into::into);
        Self {
            content: args.next(),
            printer: args.next(),
            region: args.next(),
            scale: args.next(),
        }
    }

    pub fn decode(&self) -> Result<Invocation> {
        let content = required("content", self.content.as_deref())?;
        if content.is_empty() {
            return Err(Error::MissingArgument("content".to_string()));
        }

        Ok(Invocation {
            content: decode_argument("content", content)?,
            printer: decode_argument("printer", required("printer", self.printer.as_deref())?)?,
            region: decode_argument("region", required("region", self.region.as_deref())?)?,
            scale: decode_argument("scale", required("scale", self.scale.as_deref())?)?,
        })
    }
}

impl Invocation {
    pub fn batch(&self) -> Result<TicketBatch<'_>> {
        TicketBatch::from_spec(&self.content, &self.printer, &self.region, &self.scale)
    }
}

fn required<'a>(name: &str, value: Option<&'a str>) -> Result<&'a str> {
    value.ok_or_else(|| Error::MissingArgument(name.to_string()))
}

/// `+` becomes a space, then `%XX` escapes are decoded; the bytes must be UTF-8
pub fn decode_argument(name: &str, raw: &str) -> Result<String> {
    let spaced = raw.replace('+', " ");
    percent_decode_str(&spaced)
        .decode_utf8()
        .map(|decoded| decoded.into_owned())
        .map_err(|_| Error::InvalidEncoding(name.to_string()))
}
