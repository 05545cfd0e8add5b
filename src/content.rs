//! Content stream rendering: a [`Canvas`] that writes PDF operators.

use crate::colour::Colour;
use crate::error::Result;
use crate::font::{standard, FontRegistry};
use crate::geometry::Align;
use crate::layout::{unit_width, wrap_lines, Measure, FIT_EPSILON};
use crate::page::*;
use crate::rect::Rect;
use crate::units::Pt;
use std::collections::{BTreeSet, HashMap, HashSet};
use std::io::Write;
use std::ops::Range;

/// Bezier control point distance for a quarter circle of radius 1
const KAPPA: f32 = 0.552_284_8;

/// Ascender and descender of the standard Helvetica faces, in thousandths of an em
const STANDARD_ASCENT: f32 = 718.0;
const STANDARD_DESCENT: f32 = -207.0;

/// The content of one finished page
pub(crate) struct RenderedPage {
    pub width: Pt,
    pub height: Pt,
    pub content: Vec<u8>,
    /// Indices of registered fonts used on the page
    pub fonts: BTreeSet<usize>,
    /// Base names of standard fonts used on the page
    pub standard_fonts: BTreeSet<&'static str>,
    /// Indices of images used on the page
    pub images: BTreeSet<usize>,
}

/// A font as selected in the content stream
#[derive(Copy, Clone, PartialEq, Debug)]
enum Selected {
    Embedded(usize),
    Standard(&'static str),
}

impl Selected {
    fn resource_name(self) -> String {
        match self {
            Selected::Embedded(index) => format!("F{index}"),
            Selected::Standard(base) => standard_resource_name(base),
        }
    }
}

pub(crate) fn standard_resource_name(base: &str) -> String {
    format!("S{}", base.replace('-', ""))
}

/// Writes pages as PDF content streams, measuring with the same registry the
/// layout was fitted against
pub(crate) struct PdfCanvas<'a> {
    fonts: &'a FontRegistry,
    images: &'a HashMap<String, usize>,
    current: Option<RenderedPage>,
    pub pages: Vec<RenderedPage>,
    warned: HashSet<String>,
}

impl<'a> PdfCanvas<'a> {
    pub fn new(fonts: &'a FontRegistry, images: &'a HashMap<String, usize>) -> Self {
        PdfCanvas {
            fonts,
            images,
            current: None,
            pages: Vec::new(),
            warned: HashSet::new(),
        }
    }

    fn page(&mut self) -> &mut RenderedPage {
        self.current.get_or_insert_with(|| RenderedPage {
            width: Pt::ZERO,
            height: Pt::ZERO,
            content: Vec::new(),
            fonts: BTreeSet::new(),
            standard_fonts: BTreeSet::new(),
            images: BTreeSet::new(),
        })
    }

    fn warn_once(&mut self, key: String, message: impl FnOnce() -> String) {
        if self.warned.insert(key) {
            log::warn!("{}", message());
        }
    }

    fn select(&mut self, family: &str) -> Selected {
        match self.fonts.id(family) {
            Some(id) => {
                self.page().fonts.insert(id.index());
                Selected::Embedded(id.index())
            }
            None => {
                let base = standard::base_font(family);
                self.warn_once(format!("font:{family}"), || {
                    format!("font family `{family}` is not registered, using {base}")
                });
                self.page().standard_fonts.insert(base);
                Selected::Standard(base)
            }
        }
    }

    /// Ascent and descent of `family` at `size`
    fn vertical_metrics(&self, family: &str, size: Pt) -> (Pt, Pt) {
        match self.fonts.get(family) {
            Some(font) => (font.ascent(size), font.descent(size)),
            None => (size * (STANDARD_ASCENT / 1000.0), size * (STANDARD_DESCENT / 1000.0)),
        }
    }

    fn encode(&self, selected: Selected, text: &str) -> Vec<u8> {
        let mut out = Vec::new();
        match selected {
            Selected::Embedded(index) => {
                out.push(b'<');
                if let Some(font) = self.fonts.fonts.iter().find(|(id, _)| id.index() == index).map(|(_, f)| f) {
                    for ch in text.chars() {
                        out.extend(format!("{:04x}", font.glyph_id(ch)).bytes());
                    }
                }
                out.push(b'>');
            }
            Selected::Standard(_) => {
                out.push(b'(');
                for byte in standard::encode(text) {
                    match byte {
                        b'(' | b')' | b'\\' => out.extend([b'\\', byte]),
                        32..=126 => out.push(byte),
                        _ => out.extend(format!("\\{byte:03o}").bytes()),
                    }
                }
                out.push(b')');
            }
        }
        out
    }
}

#[allow(clippy::write_with_newline)]
fn write_fill_colour(content: &mut Vec<u8>, colour: Colour) -> std::io::Result<()> {
    match colour {
        Colour::RGB { r, g, b } => write!(content, "{r} {g} {b} rg\n"),
        Colour::Grey { g } => write!(content, "{g} g\n"),
    }
}

#[allow(clippy::write_with_newline)]
fn write_stroke_colour(content: &mut Vec<u8>, colour: Colour) -> std::io::Result<()> {
    match colour {
        Colour::RGB { r, g, b } => write!(content, "{r} {g} {b} RG\n"),
        Colour::Grey { g } => write!(content, "{g} G\n"),
    }
}

/// Append a rectangle path, with rounded corners when `radius` is positive
#[allow(clippy::write_with_newline)]
fn write_rect_path(content: &mut Vec<u8>, rect: &Rect, radius: Pt) -> std::io::Result<()> {
    let (x1, y1, x2, y2) = (*rect.x1, *rect.y1, *rect.x2, *rect.y2);
    let r = radius.0.min(rect.width().0 / 2.0).min(rect.height().0 / 2.0);
    if r <= 0.0 {
        return write!(content, "{x1} {y1} {} {} re\n", x2 - x1, y2 - y1);
    }

    let k = r * KAPPA;
    write!(content, "{} {y1} m\n", x1 + r)?;
    write!(content, "{} {y1} l\n", x2 - r)?;
    write!(content, "{} {y1} {x2} {} {x2} {} c\n", x2 - r + k, y1 + r - k, y1 + r)?;
    write!(content, "{x2} {} l\n", y2 - r)?;
    write!(content, "{x2} {} {} {y2} {} {y2} c\n", y2 - r + k, x2 - r + k, x2 - r)?;
    write!(content, "{} {y2} l\n", x1 + r)?;
    write!(content, "{} {y2} {x1} {} {x1} {} c\n", x1 + r - k, y2 - r + k, y2 - r)?;
    write!(content, "{x1} {} l\n", y1 + r)?;
    write!(content, "{x1} {} {} {y1} {} {y1} c\n", y1 + r - k, x1 + r - k, x1 + r)?;
    write!(content, "h\n")
}

impl Canvas for PdfCanvas<'_> {
    fn begin_page(&mut self, width: Pt, height: Pt) -> Result<()> {
        let page = self.page();
        page.width = width;
        page.height = height;
        Ok(())
    }

    #[allow(clippy::write_with_newline)]
    fn draw_image(&mut self, image: &ImageLayout) -> Result<()> {
        let Some(&index) = self.images.get(&image.name) else {
            let name = image.name.clone();
            self.warn_once(format!("image:{name}"), || format!("image `{name}` is not registered, skipped"));
            return Ok(());
        };

        let page = self.page();
        page.images.insert(index);
        let content = &mut page.content;
        write!(content, "q\n")?;
        write!(
            content,
            "{} 0 0 {} {} {} cm\n",
            image.rect.width(),
            image.rect.height(),
            image.rect.x1,
            image.rect.y1
        )?;
        write!(content, "/I{index} Do\n")?;
        write!(content, "Q\n")?;
        Ok(())
    }

    #[allow(clippy::write_with_newline)]
    fn draw_shape(&mut self, shape: &ShapeLayout) -> Result<()> {
        let content = &mut self.page().content;
        write!(content, "q\n")?;
        write!(content, "{} w\n", shape.line_width)?;
        if let Some(stroke) = shape.stroke {
            write_stroke_colour(content, stroke)?;
        }
        if let Some(fill) = shape.fill {
            write_fill_colour(content, fill)?;
        }
        write_rect_path(content, &shape.rect, shape.radius)?;
        let paint = match (shape.fill.is_some(), shape.stroke.is_some()) {
            (true, true) => "B",
            (true, false) => "f",
            (false, true) => "S",
            (false, false) => "n",
        };
        write!(content, "{paint}\n")?;
        write!(content, "Q\n")?;
        Ok(())
    }

    #[allow(clippy::write_with_newline)]
    fn draw_text(&mut self, run: &TextRun) -> Result<()> {
        if run.text.is_empty() {
            return Ok(());
        }

        let rect = run.rect;
        let width = rect.width();
        let font = run.font.clone().with_bold(&run.bold_family);
        let lines = wrap_lines(self.fonts, &run.text, &font, width + Pt(FIT_EPSILON));
        let (ascent, descent) = self.vertical_metrics(&run.font.family, run.font.size);
        let leading = run.font.leading;

        let first_baseline = match run.valign {
            VAlign::Top => rect.y2 - ascent,
            VAlign::Middle => {
                let centre = rect.y1 + rect.height() / 2.0;
                centre + leading * ((lines.len().saturating_sub(1)) as f32 / 2.0) - (ascent + descent) / 2.0
            }
        };

        // lay out every segment first: (font, x, y, text range)
        let mut segments: Vec<(Selected, Pt, Pt, Range<usize>)> = Vec::new();
        let space = self.fonts.text_width(" ", &run.font);
        for (i, line) in lines.iter().enumerate() {
            let y = first_baseline - leading * i as f32;
            let slack = (width - line.width).max(Pt::ZERO);
            let gaps = line.words.len().saturating_sub(1);

            let (mut x, gap) = match run.align {
                Align::Start => (rect.x1, space),
                Align::Center => (rect.x1 + slack / 2.0, space),
                Align::End => (rect.x1 + slack, space),
                Align::Justify if !line.ends_block && gaps > 0 => (rect.x1, space + slack / gaps as f32),
                Align::Justify => (rect.x1, space),
            };

            for word in line.words.iter() {
                for (range, bold) in run.text.runs(word.clone()) {
                    let selected = self.select(font.family_for(bold));
                    let advance = unit_width(self.fonts, &run.text, range.clone(), &font);
                    segments.push((selected, x, y, range));
                    x += advance;
                }
                x += gap;
            }
        }

        let mut encoded: Vec<(Selected, Pt, Pt, Vec<u8>)> = Vec::with_capacity(segments.len());
        for (selected, x, y, range) in segments {
            encoded.push((selected, x, y, self.encode(selected, &run.text.as_str()[range])));
        }

        let content = &mut self.page().content;
        write!(content, "q\n")?;
        write_rect_path(content, &rect, Pt::ZERO)?;
        write!(content, "W n\n")?;
        write_fill_colour(content, run.colour)?;
        write!(content, "BT\n")?;
        let mut current: Option<Selected> = None;
        for (selected, x, y, bytes) in encoded {
            if current != Some(selected) {
                write!(content, "/{} {} Tf\n", selected.resource_name(), run.font.size)?;
                current = Some(selected);
            }
            write!(content, "1 0 0 1 {x} {y} Tm\n")?;
            content.write_all(&bytes)?;
            write!(content, " Tj\n")?;
        }
        write!(content, "ET\n")?;
        write!(content, "Q\n")?;
        Ok(())
    }

    fn draw_table(&mut self, layout: &TableLayout) -> Result<()> {
        let table = &layout.table;
        for (r, row) in table.rows.iter().enumerate() {
            for (c, cell) in row.iter().enumerate() {
                let Some(rect) = table.cell_rect(r, c) else {
                    continue;
                };
                let header = cell.style == crate::layout::CellStyle::Header;
                self.draw_shape(&ShapeLayout {
                    rect,
                    radius: Pt::ZERO,
                    stroke: Some(layout.rule),
                    fill: header.then_some(layout.header_fill),
                    line_width: Pt(0.5),
                })?;
                self.draw_text(&TextRun {
                    rect: rect.inset(table.cell_padding.x.into(), table.cell_padding.y.into()),
                    text: cell.text.clone(),
                    font: table.font.clone(),
                    bold_family: layout.bold_family.clone(),
                    colour: if header { layout.header_text } else { layout.data_text },
                    align: Align::Center,
                    valign: VAlign::Middle,
                })?;
            }
        }
        Ok(())
    }

    fn end_page(&mut self) -> Result<()> {
        if let Some(page) = self.current.take() {
            self.pages.push(page);
        }
        Ok(())
    }
}
