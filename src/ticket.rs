//! Tickets: splitting one content blob into independently addressed print units

use crate::error::{Error, Result};
use crate::layout::{Region, Scale};

/// Region spec meaning "use the printer's imageable area"
pub const DEFAULT_REGION: &str = "default";

/// One unit of printable content bound to a printer, page region and scale
#[derive(Debug, Clone, PartialEq)]
pub struct Ticket {
    /// Byte offset into the content blob where this ticket begins
    pub start_offset: usize,
    /// Target printer, possibly UNC-qualified (`\\machine\printer`)
    pub printer_name: String,
    /// Explicit page sub-area; `None` uses the device's imageable area
    pub region: Option<Region>,
    pub scale: Scale,
}

/// Parse a region spec: `"default"` or `"x;y;width;height"`
pub fn parse_region(spec: &str) -> Result<Option<Region>> {
    if spec == DEFAULT_REGION {
        return Ok(None);
    }

    let values = parse_numbers(spec, 4).ok_or_else(|| Error::InvalidRegion(spec.to_string()))?;
    Ok(Some(Region::new(values[0], values[1], values[2], values[3])))
}

/// Parse a scale spec: `"x;y"`
pub fn parse_scale(spec: &str) -> Result<Scale> {
    let values = parse_numbers(spec, 2).ok_or_else(|| Error::InvalidScale(spec.to_string()))?;
    Ok(Scale::new(values[0], values[1]))
}

/// Split a `;`-delimited list of exactly `arity` finite numbers.
/// Trailing empty fields (`"1;2;"`) are ignored.
fn parse_numbers(spec: &str, arity: usize) -> Option<Vec<f64>> {
    let mut fields: Vec<&str> = spec.split(';').map(str::trim).collect();
    while fields.len() > 1 && fields.last().is_some_and(|f| f.is_empty()) {
        fields.pop();
    }
    if fields.len() != arity {
        return None;
    }

    fields
        .into_iter()
        .map(|field| field.parse::<f64>().ok().filter(|v| v.is_finite()))
        .collect()
}

/// Divide a content blob into tickets.
///
/// Every invocation currently carries a single printer/region/scale triple, so
/// the result is one ticket covering the whole blob. Callers must still treat
/// the result as an ordered sequence.
pub fn split(
    content: &str,
    printer_name: &str,
    region_spec: &str,
    scale_spec: &str,
) -> Result<Vec<Ticket>> {
    if content.is_empty() {
        return Err(Error::MissingArgument("content".to_string()));
    }

    let region = parse_region(region_spec)?;
    let scale = parse_scale(scale_spec)?;

    Ok(vec![Ticket {
        start_offset: 0,
        printer_name: printer_name.to_string(),
        region,
        scale,
    }])
}

/// A content blob together with the tickets that partition it.
///
/// Consumed by a single dispatch call.
#[derive(Debug)]
pub struct TicketBatch<'a> {
    content: &'a str,
    tickets: Vec<Ticket>,
}

impl<'a> TicketBatch<'a> {
    /// Pair `content` with `tickets`, checking that the first ticket starts at
    /// 0, offsets strictly increase, and every offset is a char boundary
    /// inside the blob.
    pub fn new(content: &'a str, tickets: Vec<Ticket>) -> Result<Self> {
        // Slices must cover the whole blob
        if tickets.is_empty() && !content.is_empty() {
            return Err(Error::InvalidTicketBoundary(0));
        }

        let mut previous: Option<usize> = None;
        for ticket in &tickets {
            let start = ticket.start_offset;
            let ordered = match previous {
                None => start == 0,
                Some(prev) => start > prev,
            };
            if !ordered || start >= content.len() || !content.is_char_boundary(start) {
                return Err(Error::InvalidTicketBoundary(start));
            }
            previous = Some(start);
        }

        Ok(Self { content, tickets })
    }

    /// Split `content` and wrap the result in a batch
    pub fn from_spec(
        content: &'a str,
        printer_name: &str,
        region_spec: &str,
        scale_spec: &str,
    ) -> Result<Self> {
        let tickets = split(content, printer_name, region_spec, scale_spec)?;
        Self::new(content, tickets)
    }

    pub fn content(&self) -> &'a str {
        self.content
    }

    pub fn tickets(&self) -> &[Ticket] {
        &self.tickets
    }

    pub fn len(&self) -> usize {
        self.tickets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tickets.is_empty()
    }

    /// Each ticket paired with its slice `[start, next start)`; the last
    /// slice runs to the end of the blob.
    pub fn slices(&self) -> impl Iterator<Item = (&Ticket, &'a str)> + '_ {
        let content = self.content;
        self.tickets.iter().enumerate().map(move |(i, ticket)| {
            let end = self
                .tickets
                .get(i + 1)
                .map_or(content.len(), |next| next.start_offset);
            (ticket, &content[ticket.start_offset..end])
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn ticket(start: usize, printer: &str) -> Ticket {
        Ticket {
            start_offset: start,
            printer_name: printer.to_string(),
            region: None,
            scale: Scale::identity(),
        }
    }

    #[test]
    fn test_parse_region_default() {
        assert_eq!(parse_region("default").unwrap(), None);
    }

    #[test]
    fn test_parse_region_values() {
        let cases = [
            ("0;0;200;100", Region::new(0.0, 0.0, 200.0, 100.0)),
            ("10.5;20.25;300;400.75", Region::new(10.5, 20.25, 300.0, 400.75)),
            (" 1 ; 2 ; 3 ; 4 ", Region::new(1.0, 2.0, 3.0, 4.0)),
            ("-5;-6;0;0", Region::new(-5.0, -6.0, 0.0, 0.0)),
            ("1;2;3;4;", Region::new(1.0, 2.0, 3.0, 4.0)),
        ];
        for (spec, expected) in cases {
            assert_eq!(parse_region(spec).unwrap(), Some(expected), "spec {spec}");
        }
    }

    #[test]
    fn test_parse_region_wrong_arity() {
        for spec in ["1;2;3", "1;2;3;4;5", "", "Default", "1;;3;4"] {
            let result = parse_region(spec);
            assert!(
                matches!(result, Err(Error::InvalidRegion(ref s)) if s == spec),
                "spec {spec:?} gave {result:?}"
            );
        }
    }

    #[test]
    fn test_parse_region_non_numeric() {
        assert!(matches!(parse_region("a;2;3;4"), Err(Error::InvalidRegion(_))));
        assert!(matches!(parse_region("1;2;NaN;4"), Err(Error::InvalidRegion(_))));
        assert!(matches!(parse_region("1;2;inf;4"), Err(Error::InvalidRegion(_))));
    }

    #[test]
    fn test_parse_scale() {
        assert_eq!(parse_scale("1;1").unwrap(), Scale::new(1.0, 1.0));
        assert_eq!(parse_scale("0.75;1.5").unwrap(), Scale::new(0.75, 1.5));
        assert_eq!(parse_scale("0;0").unwrap(), Scale::new(0.0, 0.0));
    }

    #[test]
    fn test_parse_scale_malformed() {
        for spec in ["1", "1;2;3", "x;1", "", "default"] {
            assert!(
                matches!(parse_scale(spec), Err(Error::InvalidScale(_))),
                "spec {spec:?}"
            );
        }
    }

    #[test]
    fn test_split_single_ticket() {
        let tickets = split("AB", "HP1", "default", "1;1").unwrap();
        assert_eq!(
            tickets,
            vec![Ticket {
                start_offset: 0,
                printer_name: "HP1".to_string(),
                region: None,
                scale: Scale::new(1.0, 1.0),
            }]
        );
    }

    #[test]
    fn test_split_rejects_empty_content() {
        assert!(matches!(
            split("", "HP1", "default", "1;1"),
            Err(Error::MissingArgument(_))
        ));
    }

    #[test]
    fn test_split_propagates_parse_errors() {
        assert!(matches!(
            split("AB", "HP1", "1;2;3", "1;1"),
            Err(Error::InvalidRegion(_))
        ));
        assert!(matches!(
            split("AB", "HP1", "default", "1"),
            Err(Error::InvalidScale(_))
        ));
    }

    #[test]
    fn test_batch_slices_cover_content() {
        let content = "first<hr>second<hr>third";
        let batch = TicketBatch::new(
            content,
            vec![ticket(0, "A"), ticket(9, "B"), ticket(19, "C")],
        )
        .unwrap();

        let slices: Vec<(&str, &str)> = batch
            .slices()
            .map(|(t, s)| (t.printer_name.as_str(), s))
            .collect();
        assert_eq!(
            slices,
            vec![("A", "first<hr>"), ("B", "second<hr>"), ("C", "third")]
        );
        assert_eq!(slices.iter().map(|(_, s)| *s).collect::<String>(), content);
    }

    #[test]
    fn test_batch_single_ticket_slice_is_whole_blob() {
        let batch = TicketBatch::from_spec("AB", "HP1", "default", "1;1").unwrap();
        let slices: Vec<&str> = batch.slices().map(|(_, s)| s).collect();
        assert_eq!(slices, vec!["AB"]);
    }

    #[test]
    fn test_batch_rejects_bad_boundaries() {
        let cases = vec![
            vec![ticket(1, "A")],
            vec![ticket(0, "A"), ticket(0, "B")],
            vec![ticket(0, "A"), ticket(3, "B"), ticket(2, "C")],
            vec![ticket(0, "A"), ticket(10, "B")],
            Vec::new(),
        ];
        for tickets in cases {
            assert!(matches!(
                TicketBatch::new("abcdef", tickets),
                Err(Error::InvalidTicketBoundary(_))
            ));
        }
    }

    #[test]
    fn test_batch_without_tickets_covers_only_empty_content() {
        assert!(matches!(
            TicketBatch::new("AB", Vec::new()),
            Err(Error::InvalidTicketBoundary(0))
        ));
        let batch = TicketBatch::new("", Vec::new()).unwrap();
        assert_eq!(batch.slices().count(), 0);
    }

    #[test]
    fn test_batch_rejects_split_inside_character() {
        // 'é' is two bytes; offset 2 lands inside it
        let result = TicketBatch::new("aé", vec![ticket(0, "A"), ticket(2, "B")]);
        assert!(matches!(result, Err(Error::InvalidTicketBoundary(2))));
    }
}
