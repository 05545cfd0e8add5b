//! The page composer: turns box and table identifiers plus content into draw
//! instructions on a [`Page`], fitting the content on the way.

use crate::colour::{colours, ColourRole};
use crate::error::Result;
use crate::geometry::{BoxSpec, Registry};
use crate::layout::{build_table, fit_single_line, split, FitResult, Measure};
use crate::options::RenderOptions;
use crate::page::*;
use crate::text::TextUnit;
use crate::units::Pt;

/// Composes pages of one template. Holds only shared references, so one
/// composer can lay out any number of records.
pub struct Composer<'a, M: Measure + ?Sized> {
    pub registry: &'a Registry,
    pub measurer: &'a M,
    pub options: &'a RenderOptions,
}

impl<'a, M: Measure + ?Sized> Composer<'a, M> {
    pub fn new(registry: &'a Registry, measurer: &'a M, options: &'a RenderOptions) -> Self {
        Composer {
            registry,
            measurer,
            options,
        }
    }

    /// A blank page of the template's size with `background` painted over the
    /// whole media box
    pub fn page<S: ToString>(&self, label: S, background: &str) -> Page {
        let (width, height) = self.registry.page_size();
        let mut page = Page::new(width, height, label);
        page.add_image(ImageLayout {
            name: background.to_string(),
            rect: page.media_box(),
        });
        page
    }

    /// The text unit for `value` in box `box_id`, with the box's caption in
    /// front of it when it has one
    pub fn unit(&self, box_id: &str, value: &str) -> Result<TextUnit> {
        let spec = self.registry.box_spec(box_id)?;
        Ok(match spec.caption.as_deref() {
            Some(caption) => TextUnit::captioned(caption, value),
            None => TextUnit::new(value),
        })
    }

    /// Fit `value` onto one line of `box_id`, shrinking or truncating it as needed
    pub fn label(&self, page: &mut Page, box_id: &str, value: &str) -> Result<()> {
        let unit = self.unit(box_id, value)?;
        self.label_unit(page, box_id, &unit)
    }

    pub(crate) fn label_unit(&self, page: &mut Page, box_id: &str, unit: &TextUnit) -> Result<()> {
        let spec = self.registry.box_spec(box_id)?;
        if unit.is_empty() {
            return Ok(());
        }
        let fitted = fit_single_line(self.measurer, spec, unit, self.options);
        if fitted.text.is_empty() {
            log::warn!("label `{}` does not fit its box, skipped", box_id);
            return Ok(());
        }
        let mut run = self.run(spec, fitted.text);
        run.font = spec.font.with_size(fitted.size);
        run.valign = VAlign::Middle;
        page.add_text(run);
        Ok(())
    }

    /// Pour `unit` into `box_id`: draw the part that fits and hand back the split
    pub fn text(&self, page: &mut Page, box_id: &str, unit: &TextUnit) -> Result<FitResult> {
        let spec = self.registry.box_spec(box_id)?;
        let result = split(self.measurer, spec, unit);
        self.place(page, spec, &result.fitted);
        Ok(result)
    }

    /// Draw already fitted text into `spec`
    pub(crate) fn place(&self, page: &mut Page, spec: &BoxSpec, fitted: &TextUnit) {
        if !fitted.is_empty() {
            page.add_text(self.run(spec, fitted.clone()));
        }
    }

    /// Draw table `table_id` with `rows`. Returns whether anything was drawn;
    /// a table without rows is omitted.
    pub fn table(&self, page: &mut Page, table_id: &str, rows: &[Vec<TextUnit>]) -> Result<bool> {
        let spec = self.registry.table_spec(table_id)?;
        let (_, height) = self.registry.page_size();
        let Some(table) = build_table(spec, height, rows) else {
            return Ok(false);
        };
        page.add_table(TableLayout {
            table,
            bold_family: self.registry.bold_family.clone(),
            header_fill: colours::ACCENT,
            header_text: ColourRole::Inverse.colour(),
            data_text: ColourRole::Body.colour(),
            rule: colours::ACCENT,
        });
        Ok(true)
    }

    /// Stroke the frame of `box_id` with rounded corners
    pub fn outline(&self, page: &mut Page, box_id: &str, radius: Pt) -> Result<()> {
        let spec = self.registry.box_spec(box_id)?;
        let (_, height) = self.registry.page_size();
        page.add_shape(ShapeLayout {
            rect: spec.frame(height),
            radius,
            stroke: Some(colours::ACCENT),
            fill: None,
            line_width: Pt(0.75),
        });
        Ok(())
    }

    fn run(&self, spec: &BoxSpec, text: TextUnit) -> TextRun {
        let (_, height) = self.registry.page_size();
        TextRun {
            rect: spec.content(height),
            text,
            font: spec.font.clone(),
            bold_family: spec.font.family_for(true).to_string(),
            colour: spec.colour.colour(),
            align: spec.align,
            valign: VAlign::Top,
        }
    }
}
