//! Spooling printables into PDF documents using lopdf

use lopdf::{Dictionary, Document, Object, ObjectId, Stream, StringFormat};
use tracing::debug;

use crate::error::{Error, Result};
use crate::job::{PageStatus, Printable};
use crate::layout::PageFormat;
use crate::render::FontFace;

use super::canvas::{font_resource, PdfCanvas};

/// Upper bound on pages asked of one printable
pub const MAX_PAGES: usize = 1024;

/// Render `document` page by page and serialize the result as a PDF.
///
/// Pages are requested with indexes 0, 1, 2, ... until the printable answers
/// [`PageStatus::NoSuchPage`].
pub fn spool_document(document: &dyn Printable, page: &PageFormat, title: &str) -> Result<Vec<u8>> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let resources_id = add_font_resources(&mut doc);

    let mut kids = Vec::new();
    for page_index in 0.. {
        if page_index == MAX_PAGES {
            return Err(Error::General(format!(
                "\"{title}\" produced more than {MAX_PAGES} pages"
            )));
        }

        let mut canvas = PdfCanvas::new(page);
        if document.print(&mut canvas, page, page_index)? == PageStatus::NoSuchPage {
            break;
        }

        let content_id = doc.add_object(Stream::new(Dictionary::new(), canvas.finish()));

        let mut page_dict = Dictionary::new();
        page_dict.set("Type", Object::Name(b"Page".to_vec()));
        page_dict.set("Parent", Object::Reference(pages_id));
        page_dict.set("Contents", Object::Reference(content_id));
        page_dict.set("Resources", Object::Reference(resources_id));
        kids.push(Object::Reference(doc.add_object(Object::Dictionary(page_dict))));
    }

    if kids.is_empty() {
        return Err(Error::General(format!("\"{title}\" has no pages")));
    }
    debug!(title, pages = kids.len(), "document spooled");

    let mut pages = Dictionary::new();
    pages.set("Type", Object::Name(b"Pages".to_vec()));
    pages.set("Count", Object::Integer(kids.len() as i64));
    pages.set("Kids", Object::Array(kids));
    pages.set(
        "MediaBox",
        Object::Array(vec![
            Object::Integer(0),
            Object::Integer(0),
            Object::Real(page.width as f32),
            Object::Real(page.height as f32),
        ]),
    );
    doc.objects.insert(pages_id, Object::Dictionary(pages));

    let mut catalog = Dictionary::new();
    catalog.set("Type", Object::Name(b"Catalog".to_vec()));
    catalog.set("Pages", Object::Reference(pages_id));
    let catalog_id = doc.add_object(Object::Dictionary(catalog));

    let mut info = Dictionary::new();
    info.set("Title", text_string(title));
    info.set("Producer", text_string(concat!("direct-print ", env!("CARGO_PKG_VERSION"))));
    info.set(
        "CreationDate",
        Object::String(
            chrono::Local::now().format("D:%Y%m%d%H%M%S").to_string().into_bytes(),
            StringFormat::Literal,
        ),
    );
    let info_id = doc.add_object(Object::Dictionary(info));

    doc.trailer.set("Root", Object::Reference(catalog_id));
    doc.trailer.set("Info", Object::Reference(info_id));

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes)?;
    Ok(bytes)
}

/// Helvetica and Helvetica-Bold, two of the 14 standard PDF fonts, so nothing
/// needs embedding
fn add_font_resources(doc: &mut Document) -> ObjectId {
    let mut fonts = Dictionary::new();
    for (face, base_font) in [
        (FontFace::Regular, "Helvetica"),
        (FontFace::Bold, "Helvetica-Bold"),
    ] {
        let mut font = Dictionary::new();
        font.set("Type", Object::Name(b"Font".to_vec()));
        font.set("Subtype", Object::Name(b"Type1".to_vec()));
        font.set("BaseFont", Object::Name(base_font.as_bytes().to_vec()));
        font.set("Encoding", Object::Name(b"WinAnsiEncoding".to_vec()));
        let font_id = doc.add_object(Object::Dictionary(font));
        fonts.set(font_resource(face), Object::Reference(font_id));
    }

    let mut resources = Dictionary::new();
    resources.set("Font", Object::Dictionary(fonts));
    doc.add_object(Object::Dictionary(resources))
}

/// PDF text string: plain bytes for ASCII, UTF-16BE with a byte order mark
/// otherwise
fn text_string(s: &str) -> Object {
    if s.is_ascii() {
        return Object::String(s.as_bytes().to_vec(), StringFormat::Literal);
    }
    let mut bytes = vec![0xFE, 0xFF];
    for unit in s.encode_utf16() {
        bytes.extend_from_slice(&unit.to_be_bytes());
    }
    Object::String(bytes, StringFormat::Hexadecimal)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{Region, Scale};
    use crate::job::TicketPrintable;
    use crate::render::{GraphicsTarget, MarkupRenderer};

    struct Pages(usize);

    impl Printable for Pages {
        fn print(
            &self,
            target: &mut dyn GraphicsTarget,
            _: &PageFormat,
            page_index: usize,
        ) -> Result<PageStatus> {
            if page_index >= self.0 {
                return Ok(PageStatus::NoSuchPage);
            }
            target.fill_rect(Region::new(0.0, 0.0, 10.0, 10.0));
            Ok(PageStatus::Exists)
        }
    }

    fn first_page_content(bytes: &[u8]) -> String {
        let doc = Document::load_mem(bytes).unwrap();
        let pages = doc.get_pages();
        let page_id = *pages.values().next().unwrap();
        String::from_utf8(doc.get_page_content(page_id).unwrap()).unwrap()
    }

    #[test]
    fn test_ticket_spools_to_single_page() {
        let renderer = MarkupRenderer::default();
        let printable = TicketPrintable::new(
            "<b>Hello</b> world",
            Some(Region::new(10.0, 20.0, 200.0, 100.0)),
            Scale::new(0.5, 0.5),
            &renderer,
        );

        let bytes = spool_document(&printable, &PageFormat::letter(), "ticket").unwrap();
        assert!(bytes.starts_with(b"%PDF-1.5"));

        let doc = Document::load_mem(&bytes).unwrap();
        assert_eq!(doc.get_pages().len(), 1);

        let content = first_page_content(&bytes);
        let translate = content.find("1 0 0 1 10 20 cm").unwrap();
        let clip = content.find("0 0 200 100 re W n").unwrap();
        let scale = content.find("0.5 0 0 0.5 0 0 cm").unwrap();
        let text = content.find("(Hello) Tj").unwrap();
        assert!(translate < clip && clip < scale && scale < text);
        assert!(content.contains("/F2 10 Tf"));
        assert!(content.contains("( world) Tj") || content.contains("(world) Tj"));
    }

    #[test]
    fn test_multi_page_printable() {
        let bytes = spool_document(&Pages(3), &PageFormat::a4(), "three").unwrap();
        let doc = Document::load_mem(&bytes).unwrap();
        assert_eq!(doc.get_pages().len(), 3);
    }

    #[test]
    fn test_printable_without_pages_is_error() {
        let result = spool_document(&Pages(0), &PageFormat::letter(), "empty");
        assert!(matches!(result, Err(Error::General(_))));
    }

    #[test]
    fn test_runaway_printable_is_stopped() {
        let result = spool_document(&Pages(usize::MAX), &PageFormat::letter(), "endless");
        assert!(matches!(result, Err(Error::General(ref m)) if m.contains("more than")));
    }

    #[test]
    fn test_text_string_encoding() {
        assert!(matches!(
            text_string("ticket"),
            Object::String(ref b, StringFormat::Literal) if b == b"ticket"
        ));
        assert!(matches!(
            text_string("é"),
            Object::String(ref b, StringFormat::Hexadecimal) if b == &[0xFE, 0xFF, 0x00, 0xE9]
        ));
    }
}
