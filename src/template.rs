//! Geometry of the built-in eight page report template.
//!
//! Coordinates are millimetres from the top-left corner of a 190.5 mm x 275 mm
//! page, matching the background artwork the template was drawn over. Font sizes
//! and leading are in points.

use crate::colour::ColourRole;
use crate::geometry::*;
use crate::units::*;

pub(crate) const REGULAR: &str = "RedHatDisplay";
pub(crate) const BOLD: &str = "RedHatDisplayBold";

const PAGE_WIDTH: Mm = Mm(190.5);
const PAGE_HEIGHT: Mm = Mm(275.0);
const PADDING_X: Mm = Mm(3.4);
const PADDING_Y: Mm = Mm(2.0);

/// Column widths shared by the variant tables
const VARIANT_COLUMNS: [f32; 6] = [24.384, 35.899, 25.061, 24.892, 26.416, 27.432];
const CNV_COLUMNS: [f32; 5] = [30.0, 50.0, 32.0, 26.0, 26.0];

#[allow(clippy::too_many_arguments)]
fn field(id: &str, x: f32, y: f32, w: f32, h: f32, size: f32, leading: f32, bold: bool) -> BoxSpec {
    let family = if bold { BOLD } else { REGULAR };
    BoxSpec::new(
        id,
        Mm(x),
        Mm(y),
        Mm(w),
        Mm(h),
        FontSpec::new(family, Pt(size), Pt(leading)),
    )
}

#[allow(clippy::too_many_arguments)]
fn caption_line(id: &str, x: f32, y: f32, w: f32, h: f32, size: f32, leading: f32, caption: &str) -> BoxSpec {
    field(id, x, y, w, h, size, leading, false)
        .with_colour(ColourRole::Accent)
        .with_caption(caption)
}

fn table(id: &str, y: f32, row_height: f32, columns: &[f32]) -> TableSpec {
    TableSpec {
        id: id.to_string(),
        x: Mm(12.53),
        y: Mm(y),
        row_height: Mm(row_height),
        columns: columns.iter().copied().map(Mm).collect(),
        header_columns: 1,
        font: FontSpec::new(REGULAR, Pt(10.0), Pt(12.0)),
        cell_padding: Padding::symmetric(Pt(2.0).into(), Pt(1.0).into()),
    }
}

pub(crate) fn builtin_registry() -> Registry {
    let mut registry = Registry::new(PAGE_WIDTH, PAGE_HEIGHT, BOLD);

    let boxes = [
        // cover
        field("p1.name", 26.05, 135.16, 140.10, 8.00, 16.0, 19.0, true)
            .with_colour(ColourRole::Accent)
            .with_caption("Name:"),
        field("p1.birth", 24.89, 148.75, 140.10, 6.00, 14.0, 15.0, true)
            .with_colour(ColourRole::Accent)
            .with_caption("Date of birth:"),
        field("p1.code", 24.89, 155.73, 140.10, 6.00, 14.0, 15.0, true)
            .with_colour(ColourRole::Accent)
            .with_caption("ID code:"),
        // header, pages 2 onwards
        field("header.name", 72.25, 13.72, 101.00, 6.00, 14.0, 16.0, true)
            .with_colour(ColourRole::Accent)
            .with_caption("Name:"),
        caption_line("header.birth", 72.25, 19.16, 101.00, 6.00, 11.0, 13.0, "Date of birth:"),
        caption_line("header.sex", 72.25, 23.82, 101.00, 6.00, 11.0, 13.0, "Sex:"),
        caption_line("header.code", 72.25, 28.81, 101.00, 6.00, 11.0, 13.0, "ID code:"),
        caption_line("header.entry", 72.25, 33.55, 101.00, 6.00, 11.0, 13.0, "Entry date:"),
        caption_line("header.release", 72.25, 38.21, 101.00, 6.00, 11.0, 13.0, "Release date:"),
        // page 2
        field("p2.requester", 13.61, 78.01, 164.91, 4.23, 12.0, 11.0, false).with_caption("Requester:"),
        field("p2.sample", 13.61, 82.24, 164.97, 4.23, 12.0, 11.0, false).with_caption("Sample:"),
        field("p2.clinical", 13.61, 86.48, 169.16, 11.10, 10.0, 11.0, false)
            .with_padding(Mm(1.2), Mm(0.5))
            .with_align(Align::Justify)
            .with_caption("Clinical indication:")
            .with_title("Clinical indication"),
        field("p2.exam", 13.61, 99.18, 160.91, 4.23, 12.0, 11.0, false).with_caption("Exam:"),
        field("p2.results", 12.99, 128.00, 164.02, 11.10, 10.5, 13.0, false)
            .with_padding(PADDING_X, PADDING_Y)
            .with_align(Align::Justify)
            .with_title("Results"),
        field("p2.condition", 39.40, 172.16, 135.25, 4.30, 10.0, 12.0, false).with_caption("Condition:"),
        field("p2.interpretation", 13.08, 200.14, 163.63, 34.30, 10.0, 10.5, false)
            .with_padding(PADDING_X, Mm(0.0))
            .with_align(Align::Justify)
            .with_title("Interpretation"),
        // page 3
        field("p3.interpretation", 12.70, 72.22, 165.10, 83.33, 10.0, 10.5, false)
            .with_padding(PADDING_X, Mm(0.0))
            .with_align(Align::Justify)
            .with_title("Interpretation"),
        field("p3.additional", 12.77, 181.90, 164.38, 22.04, 10.0, 11.0, false)
            .with_padding(PADDING_X, Mm(0.0))
            .with_align(Align::Justify)
            .with_title("Additional findings"),
        // page 4
        field("p4.genes", 12.90, 82.99, 164.24, 47.00, 9.0, 11.0, false)
            .with_padding(Mm(3.4), Mm(0.0))
            .with_align(Align::Justify)
            .with_title("Analysed genes"),
        // page 5
        field("p5.notes", 13.33, 84.00, 164.34, 43.50, 9.0, 9.7, false)
            .with_padding(Mm(1.8), Mm(1.0))
            .with_title("Secondary findings"),
        field("p5.recommendations", 13.44, 146.42, 164.53, 17.37, 9.3, 10.0, false)
            .with_padding(Mm(2.2), Mm(0.8))
            .with_align(Align::Justify)
            .with_title("Recommendations"),
        field("p5.metrics.title", 15.13, 189.19, 117.07, 4.67, 11.0, 13.0, true)
            .with_colour(ColourRole::Accent)
            .with_caption("Nuclear DNA"),
        field("p5.metrics.label_mean", 15.13, 192.20, 119.06, 4.80, 9.3, 10.0, true)
            .with_colour(ColourRole::Accent)
            .with_caption("Mean coverage of the target region:"),
        field("p5.metrics.label_50x", 15.13, 198.55, 119.06, 4.80, 9.3, 10.0, true)
            .with_colour(ColourRole::Accent)
            .with_caption("Target region covered at 50x or more (%):"),
        caption_line(
            "p5.metrics.note",
            15.13,
            204.00,
            118.88,
            3.80,
            8.0,
            8.6,
            "Target region: coding regions and splice sites of the analysed genes.",
        ),
        field("p5.metrics.mean", 156.49, 191.70, 20.00, 5.00, 9.8, 10.0, false).with_align(Align::Center),
        field("p5.metrics.50x", 156.49, 203.25, 20.00, 5.00, 9.8, 10.0, false).with_align(Align::Center),
        // page 6
        field("p6.methodology", 13.11, 75.99, 163.84, 38.53, 10.5, 11.5, false)
            .with_padding(Mm(1.2), Mm(1.0))
            .with_align(Align::Justify)
            .with_title("Methodology"),
        // footer, every page
        field("footer.analyst", 27.21, 248.70, 145.14, 4.10, 9.0, 10.0, true)
            .with_colour(ColourRole::Accent)
            .with_caption("Analyst:"),
        field("footer.tech", 27.21, 252.40, 145.14, 4.10, 9.0, 10.0, true)
            .with_colour(ColourRole::Accent)
            .with_caption("Technician:"),
        field("footer.md", 27.21, 256.10, 145.14, 4.10, 9.0, 10.0, true)
            .with_colour(ColourRole::Accent)
            .with_caption("Physician:"),
        field("footer.director", 27.21, 259.81, 145.14, 4.10, 9.0, 10.0, true)
            .with_colour(ColourRole::Accent)
            .with_caption("Technical director:"),
        // continuation pages
        field("continuation.title", 12.70, 64.00, 165.10, 8.00, 12.0, 14.0, true).with_colour(ColourRole::Accent),
        field("continuation.body", 12.70, 75.93, 165.10, 170.00, 10.0, 10.5, false)
            .with_padding(PADDING_X, PADDING_Y)
            .with_align(Align::Justify),
    ];
    for spec in boxes {
        registry.insert_box(spec);
    }

    registry.insert_table(table("results", 151.72, 14.20, &VARIANT_COLUMNS));
    registry.insert_table(table("vus", 217.00, 17.00, &VARIANT_COLUMNS));
    registry.insert_table(table("cnv", 140.00, 12.00, &CNV_COLUMNS));

    registry
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_box_lies_on_the_page() {
        let registry = builtin_registry();
        let (_, height) = registry.page_size();
        let page = registry.page_rect();
        for spec in registry.boxes.values() {
            assert!(
                page.contains(&spec.frame(height)),
                "{} falls off the page",
                spec.id
            );
        }
        for spec in registry.tables.values() {
            let width: Pt = spec.width().into();
            assert!(*width < *page.width(), "{} is wider than the page", spec.id);
        }
    }

    #[test]
    fn continuation_body_stays_clear_of_the_footer() {
        let registry = builtin_registry();
        let body = registry.box_spec("continuation.body").expect("body box");
        let footer = registry.box_spec("footer.analyst").expect("footer box");
        assert!(body.y.0 + body.height.0 <= footer.y.0);
    }
}
