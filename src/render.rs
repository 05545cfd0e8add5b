use crate::content::{standard_resource_name, PdfCanvas, RenderedPage};
use crate::error::Result;
use crate::font::{Font, FontRegistry};
use crate::image::Image;
use crate::info::Info;
use crate::page::Page;
use crate::refs::{ObjectReferences, RefType};
use id_arena::{Arena, Id};
use miniz_oxide::deflate::{compress_to_vec_zlib, CompressionLevel};
use pdf_writer::{Filter, Finish, Name, Pdf, Ref};
use std::collections::{BTreeSet, HashMap};
use std::io::Write;
use std::path::Path;

/// Turns composed pages into a PDF document.
///
/// Fonts and images are registered up front. The font registry doubles as the
/// measurer handed to [`Composer`](crate::Composer), so text is drawn with the
/// same metrics it was fitted with.
#[derive(Default)]
pub struct PdfRenderer {
    fonts: FontRegistry,
    images: Arena<Image>,
    image_names: HashMap<String, Id<Image>>,
    info: Option<Info>,
}

impl PdfRenderer {
    pub fn new() -> PdfRenderer {
        PdfRenderer::default()
    }

    /// Register a TrueType or OpenType font under `family`
    pub fn register_font<S: ToString>(&mut self, family: S, bytes: Vec<u8>) -> Result<Id<Font>> {
        self.fonts.register(family, bytes)
    }

    pub fn register_font_file<S: ToString, P: AsRef<Path>>(&mut self, family: S, path: P) -> Result<Id<Font>> {
        self.fonts.register_file(family, path)
    }

    /// Register an image that pages refer to by `name`, such as a page
    /// background. Registering a name again replaces the earlier image.
    pub fn register_image<S: ToString>(&mut self, name: S, image: Image) -> Id<Image> {
        let id = self.images.alloc(image);
        self.image_names.insert(name.to_string(), id);
        id
    }

    pub fn register_image_file<S: ToString, P: AsRef<Path>>(&mut self, name: S, path: P) -> Result<Id<Image>> {
        let image = Image::from_path(path)?;
        Ok(self.register_image(name, image))
    }

    pub fn fonts(&self) -> &FontRegistry {
        &self.fonts
    }

    pub fn set_info(&mut self, info: Info) {
        self.info = Some(info);
    }

    /// Render `pages` into the bytes of a PDF file
    pub fn render(&self, pages: &[Page]) -> Result<Vec<u8>> {
        let names: HashMap<String, usize> = self
            .image_names
            .iter()
            .map(|(name, id)| (name.clone(), id.index()))
            .collect();

        let mut canvas = PdfCanvas::new(&self.fonts, &names);
        for page in pages {
            page.draw_on(&mut canvas)?;
        }
        let rendered = canvas.pages;

        let mut refs = ObjectReferences::new();
        let catalog_id = refs.gen(RefType::Catalog);
        let page_tree_id = refs.gen(RefType::PageTree);

        let mut writer = Pdf::new();
        if let Some(info) = &self.info {
            info.write(&mut refs, &mut writer);
        }

        let page_refs: Vec<Ref> = (0..rendered.len()).map(|i| refs.gen(RefType::Page(i))).collect();
        writer
            .pages(page_tree_id)
            .count(page_refs.len() as i32)
            .kids(page_refs.iter().copied());

        for (id, font) in self.fonts.fonts.iter() {
            font.write(&mut refs, id, &mut writer);
        }

        // only images some page draws are embedded
        let used_images: BTreeSet<usize> = rendered.iter().flat_map(|p| p.images.iter().copied()).collect();
        for (id, image) in self.images.iter() {
            if used_images.contains(&id.index()) {
                image.write(&mut refs, id.index(), &mut writer);
            }
        }

        let standard_fonts: BTreeSet<&'static str> = rendered
            .iter()
            .flat_map(|p| p.standard_fonts.iter().copied())
            .collect();
        for base in standard_fonts {
            let id = refs.gen(RefType::StandardFont(base));
            writer
                .type1_font(id)
                .base_font(Name(base.as_bytes()))
                .encoding_predefined(Name(b"WinAnsiEncoding"));
        }

        for (index, page) in rendered.iter().enumerate() {
            write_page(&mut refs, index, page, &mut writer);
        }

        let mut catalog = writer.catalog(catalog_id);
        catalog.pages(page_tree_id);
        catalog.finish();

        log::debug!("rendered {} pages", rendered.len());
        Ok(writer.finish())
    }

    /// Render `pages` and write the PDF to `w`
    pub fn write<W: Write>(&self, pages: &[Page], mut w: W) -> Result<()> {
        let bytes = self.render(pages)?;
        w.write_all(&bytes)?;
        Ok(())
    }
}

fn write_page(refs: &mut ObjectReferences, index: usize, rendered: &RenderedPage, writer: &mut Pdf) {
    let Some(id) = refs.get(RefType::Page(index)) else {
        return;
    };
    let parent = refs.get_or_gen(RefType::PageTree);
    let content_id = refs.gen(RefType::ContentForPage(index));

    let mut page = writer.page(id);
    page.media_box(pdf_writer::Rect::new(0.0, 0.0, *rendered.width, *rendered.height));
    page.parent(parent);

    let mut resources = page.resources();
    let mut fonts = resources.fonts();
    for &font in rendered.fonts.iter() {
        if let Some(font_id) = refs.get(RefType::Font(font)) {
            fonts.pair(Name(format!("F{font}").as_bytes()), font_id);
        }
    }
    for &base in rendered.standard_fonts.iter() {
        if let Some(font_id) = refs.get(RefType::StandardFont(base)) {
            fonts.pair(Name(standard_resource_name(base).as_bytes()), font_id);
        }
    }
    fonts.finish();

    let mut xobjects = resources.x_objects();
    for &image in rendered.images.iter() {
        if let Some(image_id) = refs.get(RefType::Image(image)) {
            xobjects.pair(Name(format!("I{image}").as_bytes()), image_id);
        }
    }
    xobjects.finish();
    resources.finish();

    page.contents(content_id);
    page.finish();

    let compressed = compress_to_vec_zlib(&rendered.content, CompressionLevel::DefaultLevel as u8);
    writer.stream(content_id, &compressed).filter(Filter::FlateDecode);
}
