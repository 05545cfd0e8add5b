use report_flow::*;
use std::io::Read;

fn paragraphs(count: usize, words: usize) -> String {
    (0..count)
        .map(|_| lipsum::lipsum(words))
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn continuation_titles(pages: &[Page], prefixes: &[&str]) -> Vec<String> {
    pages
        .iter()
        .flat_map(|page| page.text_runs())
        .map(|run| run.text.as_str().to_string())
        .filter(|text| prefixes.iter().any(|p| text.starts_with(p)))
        .collect()
}

#[test]
fn overflowing_fields_continue_in_overflow_order() {
    let renderer = PdfRenderer::new();
    let registry = Registry::builtin();
    let options = RenderOptions::default();
    let composer = Composer::new(&registry, renderer.fonts(), &options);

    let record = Record::new()
        .with("patient_name", "JANE DOE")
        .with("clinical_indication", paragraphs(6, 60))
        .with("methodology_text", paragraphs(30, 80));
    let pages = assemble(&record, &composer).unwrap();
    assert!(pages.len() > 8);

    let titles = continuation_titles(&pages[7..], &["Clinical indication", "Methodology"]);
    assert_eq!(titles.first().map(String::as_str), Some("Clinical indication"));

    let first_methodology = titles
        .iter()
        .position(|t| t.starts_with("Methodology"))
        .unwrap();
    assert!(titles[..first_methodology]
        .iter()
        .all(|t| t.starts_with("Clinical indication")));
    assert!(titles[first_methodology..]
        .iter()
        .all(|t| t.starts_with("Methodology")));
    assert_eq!(titles[first_methodology], "Methodology");
    assert!(titles
        .last()
        .unwrap()
        .ends_with("(continued)"));
}

#[test]
fn every_text_run_stays_on_its_page() {
    let renderer = PdfRenderer::new();
    let registry = Registry::builtin();
    let options = RenderOptions::default();
    let composer = Composer::new(&registry, renderer.fonts(), &options);

    let record = Record::new()
        .with("patient_name", lipsum::lipsum(40))
        .with("interpretation_text", paragraphs(20, 90))
        .with("notes_text", paragraphs(8, 70))
        .with("main_gene", "GAA")
        .with("main_variant_c", "c.-32-13T>G")
        .with("main_zygosity", "Heterozygous")
        .with(
            "vus_variant_extra_rows_text",
            "TTN; NM_001267550.2; c.100A>G; p.(Lys34Glu); rs1; Het; AD; VUS",
        );
    let pages = assemble(&record, &composer).unwrap();

    for page in pages.iter() {
        let media = page.media_box();
        for run in page.text_runs() {
            assert!(
                media.contains(&run.rect),
                "text run {:?} leaves page {}",
                run.rect,
                page.label
            );
        }
    }

    let tables = pages
        .iter()
        .flat_map(|p| p.ops.iter())
        .filter(|op| matches!(op, DrawOp::Table(_)))
        .count();
    assert_eq!(tables, 2);
}

#[test]
fn short_records_end_with_the_closing_page() {
    let renderer = PdfRenderer::new();
    let registry = Registry::builtin();
    let options = RenderOptions::default();
    let composer = Composer::new(&registry, renderer.fonts(), &options);

    let record = Record::from_json(
        r#"{
            "patient_name": "JANE DOE",
            "patient_code": 12345,
            "clinical_indication": "Proximal weakness.",
            "main_variant_rows": [
                {"gene": "GAA", "transcript": "NM_000152.5", "classification": "Pathogenic"}
            ]
        }"#,
    )
    .unwrap();
    let pages = assemble(&record, &composer).unwrap();
    assert_eq!(pages.len(), 8);
    assert!(pages[1]
        .text_runs()
        .any(|run| run.text.as_str() == "Clinical indication: Proximal weakness."));
}

#[test]
fn renders_a_pdf_file() {
    let renderer = PdfRenderer::new();
    let registry = Registry::builtin();
    let options = RenderOptions::default();
    let composer = Composer::new(&registry, renderer.fonts(), &options);

    let record = Record::new()
        .with("patient_name", "JANE DOE")
        .with("interpretation_text", paragraphs(12, 80));
    let pages = assemble(&record, &composer).unwrap();

    let mut file = tempfile::NamedTempFile::new().unwrap();
    renderer.write(&pages, file.as_file_mut()).unwrap();

    let mut bytes = Vec::new();
    file.reopen().unwrap().read_to_end(&mut bytes).unwrap();
    assert!(bytes.starts_with(b"%PDF-"));
    let text = String::from_utf8_lossy(&bytes);
    assert!(text.contains(&format!("/Count {}", pages.len())));
    assert!(text.trim_end().ends_with("%%EOF"));
}

#[test]
fn custom_geometry_splits_across_calls() {
    let registry = Registry::from_json(
        r#"{
            "page_width": 100.0,
            "page_height": 100.0,
            "bold_family": "Helvetica-Bold",
            "boxes": {
                "body": {
                    "x": 10.0, "y": 10.0, "width": 80.0, "height": 20.0,
                    "font": {"family": "Helvetica", "size": 10.0, "leading": 12.0}
                }
            }
        }"#,
    )
    .unwrap();
    let fonts = FontRegistry::new();
    let options = RenderOptions::default();
    let composer = Composer::new(&registry, &fonts, &options);

    let text = TextUnit::new(paragraphs(4, 50));
    let mut remainder = text.clone();
    let mut parts = Vec::new();
    while !remainder.is_empty() {
        let mut page = composer.page("body", "none");
        let result = composer.text(&mut page, "body", &remainder).unwrap();
        assert!(result.made_progress(&remainder));
        parts.push(result.fitted.as_str().to_string());
        remainder = result.remainder;
    }

    assert!(parts.len() > 1);
    let words: Vec<&str> = parts.iter().flat_map(|p| p.split_whitespace()).collect();
    assert_eq!(words, text.as_str().split_whitespace().collect::<Vec<_>>());
}
