use report_flow::layout::{fit_single_line, wrap_lines, Measure};
use report_flow::*;

/// Width of `unit[range]` set run by run, bold runs in `bold_family`
fn drawn_width(fonts: &FontRegistry, unit: &TextUnit, range: std::ops::Range<usize>, font: &FontSpec, bold_family: &str) -> Pt {
    unit.runs(range)
        .into_iter()
        .map(|(run, bold)| {
            let family = if bold { bold_family } else { font.family.as_str() };
            let spec = FontSpec::new(family, font.size, font.leading);
            fonts.text_width(&unit.as_str()[run], &spec)
        })
        .sum()
}

#[test]
fn captioned_labels_fit_with_a_bold_caption() {
    let fonts = FontRegistry::new();
    let registry = Registry::builtin();
    let options = RenderOptions::default();
    let spec = registry.box_spec("p2.requester").unwrap();

    for n in 1..90 {
        let unit = TextUnit::captioned("Requester:", &"m".repeat(n));
        let fitted = fit_single_line(&fonts, spec, &unit, &options);
        if fitted.text.is_empty() {
            continue;
        }
        let font = spec.font.with_size(fitted.size);
        let width = drawn_width(&fonts, &fitted.text, 0..fitted.text.len(), &font, &registry.bold_family);
        assert!(
            width <= spec.usable_width() + Pt(0.01),
            "{n} characters draw {}pt wide in {}pt",
            *width,
            *spec.usable_width()
        );
    }
}

#[test]
fn captioned_paragraphs_draw_within_their_box() {
    let fonts = FontRegistry::new();
    let registry = Registry::builtin();
    let options = RenderOptions::default();
    let composer = Composer::new(&registry, &fonts, &options);

    for n in 1..80 {
        let value = vec!["mmm"; n].join(" ");
        let unit = TextUnit::captioned("Clinical indication:", &value);
        let mut page = composer.page("p2", "page-2");
        composer.text(&mut page, "p2.clinical", &unit).unwrap();

        for run in page.text_runs() {
            let font = run.font.clone().with_bold(&run.bold_family);
            let width = run.rect.width();
            let lines = wrap_lines(&fonts, &run.text, &font, width + Pt(0.01));
            assert!(
                run.font.leading * lines.len() as f32 <= run.rect.height() + Pt(0.01),
                "{n} words wrap to {} lines",
                lines.len()
            );

            let space = fonts.text_width(" ", &run.font);
            for line in lines.iter() {
                let gaps = line.words.len().saturating_sub(1) as f32;
                let natural = line
                    .words
                    .iter()
                    .map(|w| drawn_width(&fonts, &run.text, w.clone(), &run.font, &run.bold_family))
                    .sum::<Pt>()
                    + space * gaps;
                assert!(natural <= width + Pt(0.01), "{n} words: line of {}pt", *natural);
            }
        }
    }
}
