//! The geometry registry: named boxes and tables of a fixed page template.
//!
//! Geometry is pure configuration. Boxes and tables are authored in millimetres,
//! anchored at their top-left corner with `y` measured down from the top of the
//! page, and never change once loaded. A registry is either deserialized from
//! JSON or taken from [`Registry::builtin`].
//!
//! ```
//! use report_flow::Registry;
//!
//! let json = r#"{
//!     "page_width": 190.5,
//!     "page_height": 275.0,
//!     "bold_family": "Helvetica-Bold",
//!     "boxes": {
//!         "body": {
//!             "x": 12.7, "y": 20.0, "width": 165.0, "height": 200.0,
//!             "padding": { "x": 3.4, "y": 2.0 },
//!             "font": { "family": "Helvetica", "size": 10.0, "leading": 12.0 },
//!             "align": "justify"
//!         }
//!     }
//! }"#;
//! let registry = Registry::from_json(json).expect("valid registry");
//! assert_eq!(registry.box_spec("body").expect("box exists").id, "body");
//! ```

use crate::colour::ColourRole;
use crate::error::{ReportError, Result};
use crate::rect::Rect;
use crate::units::*;
use serde::Deserialize;
use std::collections::HashMap;
use std::io::Read;

/// Horizontal alignment of text inside a box
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Align {
    #[default]
    Start,
    Center,
    End,
    /// Stretch word spacing so every line but the last of a paragraph fills the box
    Justify,
}

/// Inner spacing between a box's edges and its text
#[derive(Debug, Default, Clone, Copy, PartialEq, Deserialize)]
pub struct Padding {
    /// Applied to both the left and the right edge
    #[serde(default)]
    pub x: Mm,
    /// Applied to both the top and the bottom edge
    #[serde(default)]
    pub y: Mm,
}

impl Padding {
    pub fn symmetric(x: Mm, y: Mm) -> Padding {
        Padding { x, y }
    }
}

/// A font configuration: which registered family, at what size, with what line pitch
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FontSpec {
    pub family: String,
    pub size: Pt,
    /// Distance between consecutive baselines
    pub leading: Pt,
    /// Family that bold spans are set in. Filled from the registry's
    /// `bold_family` when a box or table is loaded without one.
    #[serde(default)]
    pub bold: Option<String>,
}

impl FontSpec {
    pub fn new<S: ToString>(family: S, size: Pt, leading: Pt) -> FontSpec {
        FontSpec {
            family: family.to_string(),
            size,
            leading,
            bold: None,
        }
    }

    pub fn with_bold<S: ToString>(mut self, family: S) -> FontSpec {
        self.bold = Some(family.to_string());
        self
    }

    /// The family a span is set in: the bold family for bold spans when there
    /// is one, the regular family otherwise
    pub fn family_for(&self, bold: bool) -> &str {
        match (bold, self.bold.as_deref()) {
            (true, Some(family)) => family,
            _ => &self.family,
        }
    }

    /// This font with the family used for a bold or regular span
    pub fn styled(&self, bold: bool) -> FontSpec {
        FontSpec {
            family: self.family_for(bold).to_string(),
            size: self.size,
            leading: self.leading,
            bold: self.bold.clone(),
        }
    }

    /// The same font at another size, with the leading scaled in proportion
    pub fn with_size(&self, size: Pt) -> FontSpec {
        let leading = if *self.size > 0.0 {
            self.leading * (size / self.size)
        } else {
            size
        };
        FontSpec {
            family: self.family.clone(),
            size,
            leading,
            bold: self.bold.clone(),
        }
    }
}

/// A named rectangle on a page template, with the style of the text poured into it
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BoxSpec {
    /// Filled in from the registry key when loaded
    #[serde(skip)]
    pub id: String,
    pub x: Mm,
    pub y: Mm,
    pub width: Mm,
    pub height: Mm,
    #[serde(default)]
    pub padding: Padding,
    pub font: FontSpec,
    #[serde(default)]
    pub colour: ColourRole,
    #[serde(default)]
    pub align: Align,
    /// Bold lead-in drawn in front of the value, e.g. `Name:`
    #[serde(default)]
    pub caption: Option<String>,
    /// Heading used on continuation pages when this box's content overflows
    #[serde(default)]
    pub title: Option<String>,
}

impl BoxSpec {
    pub fn new<S: ToString>(id: S, x: Mm, y: Mm, width: Mm, height: Mm, font: FontSpec) -> BoxSpec {
        BoxSpec {
            id: id.to_string(),
            x,
            y,
            width,
            height,
            padding: Padding::default(),
            font,
            colour: ColourRole::default(),
            align: Align::default(),
            caption: None,
            title: None,
        }
    }

    pub fn with_padding(mut self, x: Mm, y: Mm) -> BoxSpec {
        self.padding = Padding::symmetric(x, y);
        self
    }

    pub fn with_colour(mut self, colour: ColourRole) -> BoxSpec {
        self.colour = colour;
        self
    }

    pub fn with_align(mut self, align: Align) -> BoxSpec {
        self.align = align;
        self
    }

    pub fn with_caption<S: ToString>(mut self, caption: S) -> BoxSpec {
        self.caption = Some(caption.to_string());
        self
    }

    pub fn with_title<S: ToString>(mut self, title: S) -> BoxSpec {
        self.title = Some(title.to_string());
        self
    }

    /// The whole box in PDF space, padding included
    pub fn frame(&self, page_height: Pt) -> Rect {
        Rect::from_top(page_height, self.x, self.y, self.width, self.height)
    }

    /// The area text may occupy: the frame minus padding
    pub fn content(&self, page_height: Pt) -> Rect {
        self.frame(page_height)
            .inset(self.padding.x.into(), self.padding.y.into())
    }

    pub fn usable_width(&self) -> Pt {
        let width: Pt = self.width.into();
        let padding: Pt = self.padding.x.into();
        (width - padding * 2.0).max(Pt::ZERO)
    }

    pub fn usable_height(&self) -> Pt {
        let height: Pt = self.height.into();
        let padding: Pt = self.padding.y.into();
        (height - padding * 2.0).max(Pt::ZERO)
    }

    /// The continuation heading for this box: its title, or failing that its id
    pub fn section_title(&self) -> &str {
        self.title.as_deref().unwrap_or(&self.id)
    }
}

fn default_header_columns() -> usize {
    1
}

/// A fixed grid: origin, uniform row height and ordered column widths
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TableSpec {
    #[serde(skip)]
    pub id: String,
    pub x: Mm,
    pub y: Mm,
    pub row_height: Mm,
    pub columns: Vec<Mm>,
    /// How many leading columns of every row are styled as header cells
    #[serde(default = "default_header_columns")]
    pub header_columns: usize,
    pub font: FontSpec,
    #[serde(default)]
    pub cell_padding: Padding,
}

impl TableSpec {
    pub fn width(&self) -> Mm {
        Mm(self.columns.iter().map(|c| c.0).sum())
    }
}

/// The registry of every box and table of a template, plus its page size
#[derive(Debug, Clone, Deserialize)]
pub struct Registry {
    pub page_width: Mm,
    pub page_height: Mm,
    /// Family used for bold formatting hints
    pub bold_family: String,
    #[serde(default)]
    pub boxes: HashMap<String, BoxSpec>,
    #[serde(default)]
    pub tables: HashMap<String, TableSpec>,
}

impl Registry {
    pub fn new<S: ToString>(page_width: Mm, page_height: Mm, bold_family: S) -> Registry {
        Registry {
            page_width,
            page_height,
            bold_family: bold_family.to_string(),
            boxes: HashMap::new(),
            tables: HashMap::new(),
        }
    }

    /// Load a registry from JSON text
    pub fn from_json(json: &str) -> Result<Registry> {
        let registry: Registry = serde_json::from_str(json)?;
        Ok(registry.with_ids())
    }

    /// Load a registry from a JSON stream
    pub fn from_reader<R: Read>(reader: R) -> Result<Registry> {
        let registry: Registry = serde_json::from_reader(reader)?;
        Ok(registry.with_ids())
    }

    fn with_ids(mut self) -> Registry {
        let bold = self.bold_family.clone();
        for (id, spec) in self.boxes.iter_mut() {
            spec.id = id.clone();
            spec.font.bold.get_or_insert_with(|| bold.clone());
        }
        for (id, spec) in self.tables.iter_mut() {
            spec.id = id.clone();
            spec.font.bold.get_or_insert_with(|| bold.clone());
        }
        self
    }

    /// Add or replace a box, keyed by its id
    pub fn insert_box(&mut self, mut spec: BoxSpec) {
        spec.font.bold.get_or_insert_with(|| self.bold_family.clone());
        self.boxes.insert(spec.id.clone(), spec);
    }

    /// Add or replace a table, keyed by its id
    pub fn insert_table(&mut self, mut spec: TableSpec) {
        spec.font.bold.get_or_insert_with(|| self.bold_family.clone());
        self.tables.insert(spec.id.clone(), spec);
    }

    pub fn box_spec(&self, id: &str) -> Result<&BoxSpec> {
        self.boxes
            .get(id)
            .ok_or_else(|| ReportError::UnknownBox(id.to_string()))
    }

    pub fn table_spec(&self, id: &str) -> Result<&TableSpec> {
        self.tables
            .get(id)
            .ok_or_else(|| ReportError::UnknownTable(id.to_string()))
    }

    pub fn page_size(&self) -> (Pt, Pt) {
        (self.page_width.into(), self.page_height.into())
    }

    pub fn page_rect(&self) -> Rect {
        let (width, height) = self.page_size();
        Rect {
            x1: Pt::ZERO,
            y1: Pt::ZERO,
            x2: width,
            y2: height,
        }
    }

    /// The built-in eight page report template (190.5 mm x 275 mm)
    pub fn builtin() -> Registry {
        crate::template::builtin_registry()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn usable_area_subtracts_padding_on_both_sides() {
        let spec = BoxSpec::new(
            "b",
            Mm(0.0),
            Mm(0.0),
            Pt(100.0).into(),
            Pt(50.0).into(),
            FontSpec::new("Mono", Pt(10.0), Pt(12.0)),
        )
        .with_padding(Pt(5.0).into(), Pt(10.0).into());

        assert!((*spec.usable_width() - 90.0).abs() < 1e-3);
        assert!((*spec.usable_height() - 30.0).abs() < 1e-3);

        let content = spec.content(Pt(200.0));
        assert!((*content.width() - 90.0).abs() < 1e-3);
        assert!(spec.frame(Pt(200.0)).contains(&content));
    }

    #[test]
    fn with_size_scales_leading() {
        let font = FontSpec::new("Mono", Pt(10.0), Pt(12.0));
        let smaller = font.with_size(Pt(5.0));
        assert_eq!(smaller.size, Pt(5.0));
        assert_eq!(smaller.leading, Pt(6.0));
    }

    #[test]
    fn bold_spans_use_the_bold_family_when_known() {
        let font = FontSpec::new("Regular", Pt(10.0), Pt(12.0));
        assert_eq!(font.styled(true).family, "Regular");

        let font = font.with_bold("Bold");
        assert_eq!(font.styled(true).family, "Bold");
        assert_eq!(font.styled(false).family, "Regular");
        assert_eq!(font.with_size(Pt(5.0)).family_for(true), "Bold");

        let mut registry = Registry::new(Mm(100.0), Mm(100.0), "Heavy");
        registry.insert_box(BoxSpec::new("a", Mm(0.0), Mm(0.0), Mm(10.0), Mm(10.0), FontSpec::new("Regular", Pt(10.0), Pt(12.0))));
        registry.insert_box(BoxSpec::new("b", Mm(0.0), Mm(0.0), Mm(10.0), Mm(10.0), font));
        assert_eq!(registry.box_spec("a").unwrap().font.family_for(true), "Heavy");
        assert_eq!(registry.box_spec("b").unwrap().font.family_for(true), "Bold");
    }

    #[test]
    fn json_registry_fills_ids_and_defaults() {
        let json = r#"{
            "page_width": 100.0,
            "page_height": 200.0,
            "bold_family": "Bold",
            "boxes": {
                "a": { "x": 1, "y": 2, "width": 3, "height": 4,
                       "font": { "family": "Regular", "size": 9, "leading": 10 },
                       "colour": "accent", "caption": "A:" }
            },
            "tables": {
                "t": { "x": 0, "y": 0, "row_height": 10, "columns": [10, 20],
                       "font": { "family": "Regular", "size": 9, "leading": 10 } }
            }
        }"#;
        let registry = Registry::from_json(json).expect("valid json");

        let a = registry.box_spec("a").expect("box a");
        assert_eq!(a.id, "a");
        assert_eq!(a.colour, ColourRole::Accent);
        assert_eq!(a.align, Align::Start);
        assert_eq!(a.caption.as_deref(), Some("A:"));
        assert_eq!(a.section_title(), "a");
        assert_eq!(a.font.family_for(true), "Bold");
        assert_eq!(a.font.family_for(false), "Regular");

        let t = registry.table_spec("t").expect("table t");
        assert_eq!(t.id, "t");
        assert_eq!(t.font.bold.as_deref(), Some("Bold"));
        assert_eq!(t.header_columns, 1);
        assert_eq!(t.width(), Mm(30.0));
    }

    #[test]
    fn unknown_identifiers_are_configuration_errors() {
        let registry = Registry::new(Mm(100.0), Mm(100.0), "Bold");
        assert!(matches!(
            registry.box_spec("missing"),
            Err(ReportError::UnknownBox(id)) if id == "missing"
        ));
        assert!(matches!(
            registry.table_spec("missing"),
            Err(ReportError::UnknownTable(_))
        ));
    }

    #[test]
    fn malformed_json_is_reported() {
        assert!(matches!(
            Registry::from_json("{ not json"),
            Err(ReportError::Config(_))
        ));
    }
}
