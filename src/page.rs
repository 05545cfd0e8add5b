use crate::colour::Colour;
use crate::error::Result;
use crate::geometry::{Align, FontSpec};
use crate::layout::Table;
use crate::rect::Rect;
use crate::text::TextUnit;
use crate::units::Pt;

/// Vertical placement of text inside its box
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
pub enum VAlign {
    /// First baseline hangs from the top edge
    #[default]
    Top,
    /// The block of lines is centred, used for single-line labels
    Middle,
}

/// Text that has already been fitted to its box
#[derive(Clone, PartialEq, Debug)]
pub struct TextRun {
    /// The area the text may occupy, padding already removed
    pub rect: Rect,
    pub text: TextUnit,
    pub font: FontSpec,
    /// Family used for the text unit's bold spans
    pub bold_family: String,
    pub colour: Colour,
    pub align: Align,
    pub valign: VAlign,
}

/// A full-bleed or positioned image, referred to by the name it was registered under
#[derive(Clone, PartialEq, Debug)]
pub struct ImageLayout {
    pub name: String,
    pub rect: Rect,
}

/// A rectangle or rounded rectangle, stroked and/or filled
#[derive(Clone, PartialEq, Debug)]
pub struct ShapeLayout {
    pub rect: Rect,
    /// Corner radius; zero draws square corners
    pub radius: Pt,
    pub stroke: Option<Colour>,
    pub fill: Option<Colour>,
    pub line_width: Pt,
}

/// A built table together with its palette
#[derive(Clone, PartialEq, Debug)]
pub struct TableLayout {
    pub table: Table,
    pub bold_family: String,
    pub header_fill: Colour,
    pub header_text: Colour,
    pub data_text: Colour,
    pub rule: Colour,
}

/// One drawing instruction, in painting order
#[derive(Clone, PartialEq, Debug)]
pub enum DrawOp {
    Image(ImageLayout),
    Shape(ShapeLayout),
    Text(TextRun),
    Table(TableLayout),
}

/// The drawing backend a [`Page`] is replayed onto
pub trait Canvas {
    fn begin_page(&mut self, width: Pt, height: Pt) -> Result<()>;
    fn draw_image(&mut self, image: &ImageLayout) -> Result<()>;
    fn draw_shape(&mut self, shape: &ShapeLayout) -> Result<()>;
    fn draw_text(&mut self, run: &TextRun) -> Result<()>;
    fn draw_table(&mut self, table: &TableLayout) -> Result<()>;
    fn end_page(&mut self) -> Result<()>;
}

/// A laid out page: its size and the ordered instructions that paint it
#[derive(Clone, PartialEq, Debug)]
pub struct Page {
    pub width: Pt,
    pub height: Pt,
    /// Human readable name, used in log messages
    pub label: String,
    pub ops: Vec<DrawOp>,
}

impl Page {
    pub fn new<S: ToString>(width: Pt, height: Pt, label: S) -> Page {
        Page {
            width,
            height,
            label: label.to_string(),
            ops: Vec::default(),
        }
    }

    pub fn media_box(&self) -> Rect {
        Rect {
            x1: Pt::ZERO,
            y1: Pt::ZERO,
            x2: self.width,
            y2: self.height,
        }
    }

    pub fn add_image(&mut self, image: ImageLayout) {
        self.ops.push(DrawOp::Image(image));
    }

    pub fn add_shape(&mut self, shape: ShapeLayout) {
        self.ops.push(DrawOp::Shape(shape));
    }

    pub fn add_text(&mut self, run: TextRun) {
        self.ops.push(DrawOp::Text(run));
    }

    pub fn add_table(&mut self, table: TableLayout) {
        self.ops.push(DrawOp::Table(table));
    }

    /// The text runs of the page, in painting order
    pub fn text_runs(&self) -> impl Iterator<Item = &TextRun> {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Text(run) => Some(run),
            _ => None,
        })
    }

    /// Replay the page onto `canvas`
    pub fn draw_on<C: Canvas + ?Sized>(&self, canvas: &mut C) -> Result<()> {
        canvas.begin_page(self.width, self.height)?;
        for op in self.ops.iter() {
            match op {
                DrawOp::Image(image) => canvas.draw_image(image)?,
                DrawOp::Shape(shape) => canvas.draw_shape(shape)?,
                DrawOp::Text(run) => canvas.draw_text(run)?,
                DrawOp::Table(table) => canvas.draw_table(table)?,
            }
        }
        canvas.end_page()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colour::colours;

    #[derive(Default)]
    struct Recorder {
        calls: Vec<&'static str>,
    }

    impl Canvas for Recorder {
        fn begin_page(&mut self, _: Pt, _: Pt) -> Result<()> {
            self.calls.push("begin");
            Ok(())
        }
        fn draw_image(&mut self, _: &ImageLayout) -> Result<()> {
            self.calls.push("image");
            Ok(())
        }
        fn draw_shape(&mut self, _: &ShapeLayout) -> Result<()> {
            self.calls.push("shape");
            Ok(())
        }
        fn draw_text(&mut self, _: &TextRun) -> Result<()> {
            self.calls.push("text");
            Ok(())
        }
        fn draw_table(&mut self, _: &TableLayout) -> Result<()> {
            self.calls.push("table");
            Ok(())
        }
        fn end_page(&mut self) -> Result<()> {
            self.calls.push("end");
            Ok(())
        }
    }

    #[test]
    fn replays_in_painting_order() {
        let mut page = Page::new(Pt(100.0), Pt(200.0), "test");
        page.add_image(ImageLayout {
            name: "bg".to_string(),
            rect: page.media_box(),
        });
        page.add_shape(ShapeLayout {
            rect: page.media_box(),
            radius: Pt(4.0),
            stroke: Some(colours::ACCENT),
            fill: None,
            line_width: Pt(1.0),
        });
        page.add_text(TextRun {
            rect: page.media_box(),
            text: "hello".into(),
            font: FontSpec::new("Mono", Pt(10.0), Pt(12.0)),
            bold_family: "Mono".to_string(),
            colour: colours::BODY,
            align: Align::Start,
            valign: VAlign::Top,
        });

        let mut recorder = Recorder::default();
        page.draw_on(&mut recorder).unwrap();
        assert_eq!(recorder.calls, vec!["begin", "image", "shape", "text", "end"]);
        assert_eq!(page.text_runs().count(), 1);
    }
}
