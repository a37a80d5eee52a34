//! The catalog being built
//!
//! Pages are appended in order and never revisited. Serializing seals the
//! document: the page tree, catalog and info dictionary are written once
//! and any later write fails with [`CatalogError::Sealed`].

use std::collections::BTreeMap;
use std::path::Path;

use lopdf::{Dictionary, Document, Object, ObjectId, Stream, StringFormat};

use crate::images::EncodedImage;
use crate::layout::Rect;
use crate::render::PageCanvas;
use crate::text::BuiltinFont;
use crate::types::{CatalogError, Result};

const PRODUCER: &str = concat!("pdf-catalog ", env!("CARGO_PKG_VERSION"));

/// Where one product card landed
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlotRecord {
    pub product_index: usize,
    pub page_number: usize,
    pub slot_index: usize,
    pub rect: Rect,
}

pub struct CatalogDocument {
    doc: Document,
    pages_id: ObjectId,
    page_ids: Vec<ObjectId>,
    font_ids: BTreeMap<BuiltinFont, ObjectId>,
    slots: Vec<SlotRecord>,
    title: String,
    page_width: f32,
    page_height: f32,
    sealed: bool,
}

impl CatalogDocument {
    pub fn new(title: &str, page_width: f32, page_height: f32) -> Self {
        let mut doc = Document::with_version("1.7");
        let pages_id = doc.new_object_id();
        Self {
            doc,
            pages_id,
            page_ids: Vec::new(),
            font_ids: BTreeMap::new(),
            slots: Vec::new(),
            title: title.to_string(),
            page_width,
            page_height,
            sealed: false,
        }
    }

    pub fn page_count(&self) -> usize {
        self.page_ids.len()
    }

    pub fn is_sealed(&self) -> bool {
        self.sealed
    }

    /// Card positions in drawing order
    pub fn slots(&self) -> &[SlotRecord] {
        &self.slots
    }

    pub(crate) fn record_slot(&mut self, record: SlotRecord) {
        self.slots.push(record);
    }

    /// Append a finished page; returns its 1-based page number
    pub fn add_page(&mut self, canvas: PageCanvas) -> Result<usize> {
        if self.sealed {
            return Err(CatalogError::Sealed);
        }

        let mut fonts = Dictionary::new();
        for font in canvas.fonts() {
            let font_id = self.font_id(*font);
            fonts.set(font.resource_name(), Object::Reference(font_id));
        }

        let mut xobjects = Dictionary::new();
        for (name, id) in canvas.images() {
            xobjects.set(name.as_bytes(), Object::Reference(*id));
        }

        let mut states = Dictionary::new();
        for (name, alpha) in canvas.alphas() {
            states.set(
                name.as_bytes(),
                Object::Dictionary(Dictionary::from_iter(vec![
                    ("Type", Object::Name(b"ExtGState".to_vec())),
                    ("ca", Object::Real(*alpha)),
                    ("CA", Object::Real(*alpha)),
                ])),
            );
        }

        let mut resources = Dictionary::new();
        if !fonts.is_empty() {
            resources.set("Font", Object::Dictionary(fonts));
        }
        if !xobjects.is_empty() {
            resources.set("XObject", Object::Dictionary(xobjects));
        }
        if !states.is_empty() {
            resources.set("ExtGState", Object::Dictionary(states));
        }

        let content_id = self
            .doc
            .add_object(Stream::new(Dictionary::new(), canvas.into_content()));

        let page_id = self.doc.add_object(Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Page".to_vec())),
            ("Parent", Object::Reference(self.pages_id)),
            (
                "MediaBox",
                Object::Array(vec![
                    Object::Integer(0),
                    Object::Integer(0),
                    Object::Real(self.page_width),
                    Object::Real(self.page_height),
                ]),
            ),
            ("Contents", Object::Reference(content_id)),
            ("Resources", Object::Dictionary(resources)),
        ]));

        self.page_ids.push(page_id);
        Ok(self.page_ids.len())
    }

    /// Store an image XObject (plus its soft mask) and return its id
    pub fn embed_image(&mut self, image: &EncodedImage) -> Result<ObjectId> {
        if self.sealed {
            return Err(CatalogError::Sealed);
        }

        let mut dict = Dictionary::from_iter(vec![
            ("Type", Object::Name(b"XObject".to_vec())),
            ("Subtype", Object::Name(b"Image".to_vec())),
            ("Width", Object::Integer(image.width_px as i64)),
            ("Height", Object::Integer(image.height_px as i64)),
            ("ColorSpace", Object::Name(b"DeviceRGB".to_vec())),
            ("BitsPerComponent", Object::Integer(8)),
            ("Filter", Object::Name(b"DCTDecode".to_vec())),
        ]);

        if let Some(alpha) = &image.alpha {
            let mask = Stream::new(
                Dictionary::from_iter(vec![
                    ("Type", Object::Name(b"XObject".to_vec())),
                    ("Subtype", Object::Name(b"Image".to_vec())),
                    ("Width", Object::Integer(image.width_px as i64)),
                    ("Height", Object::Integer(image.height_px as i64)),
                    ("ColorSpace", Object::Name(b"DeviceGray".to_vec())),
                    ("BitsPerComponent", Object::Integer(8)),
                ]),
                alpha.clone(),
            );
            let mask_id = self.doc.add_object(mask);
            dict.set("SMask", Object::Reference(mask_id));
        }

        // Already JPEG encoded; must not be deflated again
        let stream = Stream::new(dict, image.jpeg.clone()).with_compression(false);
        Ok(self.doc.add_object(stream))
    }

    fn font_id(&mut self, font: BuiltinFont) -> ObjectId {
        if let Some(id) = self.font_ids.get(&font) {
            return *id;
        }
        let id = self.doc.add_object(Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Font".to_vec())),
            ("Subtype", Object::Name(b"Type1".to_vec())),
            ("BaseFont", Object::Name(font.base_name().as_bytes().to_vec())),
            ("Encoding", Object::Name(b"WinAnsiEncoding".to_vec())),
        ]));
        self.font_ids.insert(font, id);
        id
    }

    /// Write the page tree, catalog and info dictionary, then compress
    fn seal(&mut self) {
        if self.sealed {
            return;
        }

        let count = self.page_ids.len() as i64;
        let kids = self
            .page_ids
            .iter()
            .map(|id| Object::Reference(*id))
            .collect();
        let pages_dict = Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Pages".to_vec())),
            ("Kids", Object::Array(kids)),
            ("Count", Object::Integer(count)),
        ]);
        self.doc
            .objects
            .insert(self.pages_id, Object::Dictionary(pages_dict));

        let catalog_id = self.doc.add_object(Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Catalog".to_vec())),
            ("Pages", Object::Reference(self.pages_id)),
        ]));
        self.doc.trailer.set("Root", catalog_id);

        let info_id = self.doc.add_object(Dictionary::from_iter(vec![
            ("Title", text_string(&self.title)),
            ("Producer", text_string(PRODUCER)),
        ]));
        self.doc.trailer.set("Info", info_id);

        self.doc.compress();
        self.sealed = true;
        log::debug!("Sealed catalog with {} pages", count);
    }

    /// Serialize to PDF bytes. The document is sealed from here on.
    pub fn to_bytes(&mut self) -> Result<Vec<u8>> {
        self.seal();
        let mut buffer = Vec::new();
        self.doc.save_to(&mut buffer)?;
        Ok(buffer)
    }

    pub fn save(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let bytes = self.to_bytes()?;
        std::fs::write(path, bytes)?;
        Ok(())
    }
}

/// PDF text string, UTF-16BE with byte order mark when not plain ASCII
fn text_string(text: &str) -> Object {
    if text.is_ascii() {
        return Object::String(text.as_bytes().to_vec(), StringFormat::Literal);
    }
    let mut bytes = vec![0xFE, 0xFF];
    for unit in text.encode_utf16() {
        bytes.extend_from_slice(&unit.to_be_bytes());
    }
    Object::String(bytes, StringFormat::Hexadecimal)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Rgb;
    use crate::constants::{PAGE_HEIGHT_PT, PAGE_WIDTH_PT};

    fn page_with_text(text: &str) -> PageCanvas {
        let mut canvas = PageCanvas::new();
        canvas.text(BuiltinFont::Helvetica, 12.0, Rgb::BLACK, 50.0, 50.0, text);
        canvas
    }

    #[test]
    fn test_pages_are_numbered_in_order() {
        let mut doc = CatalogDocument::new("Test", PAGE_WIDTH_PT, PAGE_HEIGHT_PT);
        assert_eq!(doc.add_page(page_with_text("one")).unwrap(), 1);
        assert_eq!(doc.add_page(page_with_text("two")).unwrap(), 2);
        assert_eq!(doc.page_count(), 2);
    }

    #[test]
    fn test_serialized_document_reloads() {
        let mut doc = CatalogDocument::new("Catalogue été", PAGE_WIDTH_PT, PAGE_HEIGHT_PT);
        doc.add_page(page_with_text("Couverture")).unwrap();
        doc.add_page(page_with_text("Produits")).unwrap();
        let bytes = doc.to_bytes().unwrap();

        let reloaded = Document::load_mem(&bytes).unwrap();
        assert_eq!(reloaded.get_pages().len(), 2);
    }

    #[test]
    fn test_sealed_document_rejects_writes() {
        let mut doc = CatalogDocument::new("Test", PAGE_WIDTH_PT, PAGE_HEIGHT_PT);
        doc.add_page(page_with_text("one")).unwrap();
        doc.to_bytes().unwrap();
        assert!(doc.is_sealed());
        assert!(matches!(
            doc.add_page(page_with_text("late")),
            Err(CatalogError::Sealed)
        ));
        // Serializing again is fine
        assert!(doc.to_bytes().is_ok());
    }
}
