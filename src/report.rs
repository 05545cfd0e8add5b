//! The report assembler: the fixed eight page sequence of the built-in template,
//! followed by continuation pages for whatever overflowed.

use crate::compose::Composer;
use crate::error::Result;
use crate::layout::Measure;
use crate::overflow::{OverflowQueue, Slot, CONTINUATION_BODY};
use crate::page::Page;
use crate::record::{Record, Row, RowSchema};
use crate::text::TextUnit;
use crate::units::Pt;

/// A multi-line field and the chain of boxes it flows through
struct Field<'r> {
    keys: &'r [&'r str],
    boxes: &'r [&'r str],
}

const CLINICAL: Field<'static> = Field {
    keys: &["clinical_indication"],
    boxes: &["p2.clinical"],
};
const RESULTS: Field<'static> = Field {
    keys: &["main_result_intro"],
    boxes: &["p2.results"],
};
const INTERPRETATION: Field<'static> = Field {
    keys: &["interpretation_text"],
    boxes: &["p2.interpretation", "p3.interpretation"],
};
const ADDITIONAL: Field<'static> = Field {
    keys: &["additional_findings_p3", "additional_findings_text"],
    boxes: &["p3.additional"],
};
const GENES: Field<'static> = Field {
    keys: &["genes_analyzed_p4", "genes_analyzed_list"],
    boxes: &["p4.genes"],
};
const NOTES: Field<'static> = Field {
    keys: &["notes_text"],
    boxes: &["p5.notes"],
};
const RECOMMENDATIONS: Field<'static> = Field {
    keys: &["recommendations_text"],
    boxes: &["p5.recommendations"],
};
const METHODOLOGY: Field<'static> = Field {
    keys: &["methodology_text"],
    boxes: &["p6.methodology"],
};

fn background(index: usize) -> String {
    format!("page-{index}")
}

/// Lay out `record` on the built-in template.
///
/// Pages one to seven are always produced. Fields that overflow the last box
/// of their chain continue on extra pages in the order they overflowed; when
/// nothing overflows, the template's closing page ends the document instead.
pub fn assemble<M: Measure + ?Sized>(record: &Record, composer: &Composer<M>) -> Result<Vec<Page>> {
    let mut queue = OverflowQueue::new();
    let mut pages = Vec::with_capacity(8);

    let slot = |field: &Field| -> Result<Slot> {
        let first = *field.boxes.first().unwrap_or(&"");
        let title = composer.registry.box_spec(first)?.section_title().to_string();
        let value = record.first_text(field.keys);
        Ok(Slot::new(title, field.boxes.iter(), composer.unit(first, &value)?))
    };

    // cover
    let mut page = composer.page("cover", &background(1));
    composer.label(&mut page, "p1.name", &record.text("patient_name"))?;
    composer.label(
        &mut page,
        "p1.birth",
        &record.first_text(&["patient_birth_date_cover", "patient_birth_date"]),
    )?;
    composer.label(
        &mut page,
        "p1.code",
        &record.first_text(&["patient_code_cover", "patient_code"]),
    )?;
    footer(composer, &mut page, record)?;
    pages.push(page);

    // request and main results
    let mut interpretation = slot(&INTERPRETATION)?;
    let mut page = composer.page("page 2", &background(2));
    header(composer, &mut page, record)?;
    composer.label(
        &mut page,
        "p2.requester",
        &record.first_text(&["requester_display", "requester_name"]),
    )?;
    composer.label(
        &mut page,
        "p2.sample",
        &record.first_text(&["sample_display", "sample_description"]),
    )?;
    composer.fill(&mut page, &mut slot(&CLINICAL)?, &mut queue)?;
    composer.label(&mut page, "p2.exam", &record.text("exam_name"))?;
    composer.fill(&mut page, &mut slot(&RESULTS)?, &mut queue)?;
    composer.label(&mut page, "p2.condition", &record.text("main_condition"))?;
    composer.table(&mut page, "results", &variant_cells(&record.rows(&RowSchema::VARIANTS)))?;
    composer.fill(&mut page, &mut interpretation, &mut queue)?;
    footer(composer, &mut page, record)?;
    pages.push(page);

    // interpretation continued, additional findings
    let mut page = composer.page("page 3", &background(3));
    header(composer, &mut page, record)?;
    composer.fill(&mut page, &mut interpretation, &mut queue)?;
    composer.fill(&mut page, &mut slot(&ADDITIONAL)?, &mut queue)?;
    composer.table(&mut page, "vus", &variant_cells(&record.rows(&RowSchema::VUS)))?;
    footer(composer, &mut page, record)?;
    pages.push(page);

    // analysed genes and copy-number variants
    let mut page = composer.page("page 4", &background(4));
    header(composer, &mut page, record)?;
    composer.fill(&mut page, &mut slot(&GENES)?, &mut queue)?;
    composer.table(&mut page, "cnv", &cnv_cells(&record.rows(&RowSchema::CNV)))?;
    footer(composer, &mut page, record)?;
    pages.push(page);

    // notes, recommendations, coverage metrics
    let mut page = composer.page("page 5", &background(5));
    header(composer, &mut page, record)?;
    composer.fill(&mut page, &mut slot(&NOTES)?, &mut queue)?;
    // recommendations are only printed on administrator records
    if record.flag("is_admin") {
        composer.fill(&mut page, &mut slot(&RECOMMENDATIONS)?, &mut queue)?;
    }
    for id in [
        "p5.metrics.title",
        "p5.metrics.label_mean",
        "p5.metrics.label_50x",
        "p5.metrics.note",
    ] {
        composer.label(&mut page, id, "")?;
    }
    composer.label(&mut page, "p5.metrics.mean", &record.text("metrics_coverage_mean"))?;
    composer.label(&mut page, "p5.metrics.50x", &record.text("metrics_coverage_50x"))?;
    footer(composer, &mut page, record)?;
    pages.push(page);

    // methodology
    let mut page = composer.page("page 6", &background(6));
    header(composer, &mut page, record)?;
    composer.fill(&mut page, &mut slot(&METHODOLOGY)?, &mut queue)?;
    footer(composer, &mut page, record)?;
    pages.push(page);

    let mut page = composer.page("page 7", &background(7));
    header(composer, &mut page, record)?;
    footer(composer, &mut page, record)?;
    pages.push(page);

    log::debug!("{} fields overflowed the fixed pages", queue.len());
    let continuation = composer.continuation_pages(&mut queue, |page| {
        header(composer, page, record)?;
        footer(composer, page, record)?;
        composer.outline(page, CONTINUATION_BODY, Pt(6.0))
    })?;

    if continuation.is_empty() {
        let mut page = composer.page("closing", &background(8));
        header(composer, &mut page, record)?;
        footer(composer, &mut page, record)?;
        pages.push(page);
    } else {
        pages.extend(continuation);
    }

    log::debug!("assembled {} pages", pages.len());
    Ok(pages)
}

/// The patient header of every page after the cover
fn header<M: Measure + ?Sized>(composer: &Composer<M>, page: &mut Page, record: &Record) -> Result<()> {
    for (id, key) in [
        ("header.name", "patient_name"),
        ("header.birth", "patient_birth_date"),
        ("header.sex", "patient_sex"),
        ("header.code", "patient_code"),
        ("header.entry", "exam_entry_date"),
        ("header.release", "exam_release_date"),
    ] {
        composer.label(page, id, &record.text(key))?;
    }
    Ok(())
}

/// The signatories, on every page
fn footer<M: Measure + ?Sized>(composer: &Composer<M>, page: &mut Page, record: &Record) -> Result<()> {
    for (id, who) in [
        ("footer.analyst", "analyst"),
        ("footer.tech", "lab_tech"),
        ("footer.md", "geneticist"),
        ("footer.director", "director"),
    ] {
        let name = format!("{who}_name");
        let registry = format!("{who}_registry");
        composer.label(page, id, &record.joined(&[&name, &registry]))?;
    }
    Ok(())
}

fn cell(row: &Row, column: &str) -> String {
    row.get(column).map(|s| s.trim().to_string()).unwrap_or_default()
}

/// Two values stacked on one cell, the first optionally bold
fn stacked(first: &str, second: &str, bold: bool) -> TextUnit {
    let unit = match (first.is_empty(), second.is_empty()) {
        (_, true) => TextUnit::new(first),
        (true, false) => TextUnit::new(second),
        (false, false) => TextUnit::new(format!("{first}\n{second}")),
    };
    if bold && !first.is_empty() {
        unit.with_bold(0..first.len())
    } else {
        unit
    }
}

/// Gene and transcript, cDNA and protein change, dbSNP, zygosity, inheritance,
/// classification
fn variant_cells(rows: &[Row]) -> Vec<Vec<TextUnit>> {
    rows.iter()
        .map(|row| {
            vec![
                stacked(&cell(row, "gene"), &cell(row, "transcript"), true),
                stacked(&cell(row, "variant_c"), &cell(row, "variant_p"), false),
                TextUnit::new(cell(row, "dbsnp")),
                TextUnit::new(cell(row, "zygosity")),
                TextUnit::new(cell(row, "inheritance")),
                TextUnit::new(cell(row, "classification")),
            ]
        })
        .collect()
}

fn cnv_cells(rows: &[Row]) -> Vec<Vec<TextUnit>> {
    rows.iter()
        .map(|row| {
            ["event", "coordinate", "cytoband", "zygosity", "classification"]
                .iter()
                .map(|column| TextUnit::new(cell(row, column)))
                .collect()
        })
        .collect()
}
