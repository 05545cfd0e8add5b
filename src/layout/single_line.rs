use super::measure::{measure, Measure};
use super::FIT_EPSILON;
use crate::geometry::BoxSpec;
use crate::options::RenderOptions;
use crate::text::TextUnit;
use crate::units::Pt;

/// A label fitted onto one line of its box
#[derive(Debug, Clone, PartialEq)]
pub struct SingleLine {
    pub text: TextUnit,
    pub size: Pt,
    /// Whether characters were removed to make it fit
    pub truncated: bool,
}

/// Fit `unit` onto a single line of `spec`.
///
/// The font shrinks from the box's size in `options.shrink_step` steps while the
/// text is too wide, but never below `options.min_font_size`; a box whose size is
/// already below that floor is not shrunk at all. If it still
/// overflows at the floor, characters come off the end and the ellipsis goes on
/// until it fits; when not even the bare ellipsis fits, the text is empty.
pub fn fit_single_line<M: Measure + ?Sized>(
    measurer: &M,
    spec: &BoxSpec,
    unit: &TextUnit,
    options: &RenderOptions,
) -> SingleLine {
    let usable = spec.usable_width() + Pt(FIT_EPSILON);
    let floor = options.min_font_size;
    let width_at = |text: &TextUnit, size: Pt| {
        // unwrapped: only explicit newlines break the line
        measure(measurer, text, &spec.font.with_size(size), Pt(f32::INFINITY)).width
    };

    // a box configured below the floor keeps its size and is never shrunk
    let mut size = spec.font.size;
    while width_at(unit, size) > usable && size > floor {
        size = if *options.shrink_step > 0.0 {
            (size - options.shrink_step).max(floor)
        } else {
            floor
        };
    }

    if width_at(unit, size) <= usable {
        return SingleLine {
            text: unit.clone(),
            size,
            truncated: false,
        };
    }

    let source = unit.as_str();
    let mut ends: Vec<usize> = source.char_indices().map(|(i, _)| i).collect();
    ends.reverse();
    for end in ends {
        let kept = source[..end].trim_end().len();
        let candidate = unit.slice(0..kept).appended(&options.ellipsis);
        if width_at(&candidate, size) <= usable {
            log::debug!(
                "truncated `{}` to {} bytes at {}pt",
                spec.id,
                kept,
                *size
            );
            return SingleLine {
                text: candidate,
                size,
                truncated: true,
            };
        }
    }

    log::debug!("`{}` is too narrow for an ellipsis", spec.id);
    SingleLine {
        text: TextUnit::empty(),
        size,
        truncated: true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::FontSpec;
    use crate::layout::Monospace;
    use crate::units::Mm;

    fn label(width: f32, size: f32) -> BoxSpec {
        BoxSpec::new(
            "label",
            Mm(0.0),
            Mm(0.0),
            Pt(width).into(),
            Pt(20.0).into(),
            FontSpec::new("Mono", Pt(size), Pt(size)),
        )
    }

    #[test]
    fn fits_without_change_at_the_box_size() {
        let m = Monospace::default();
        let fitted = fit_single_line(&m, &label(200.0, 14.0), &"Jane".into(), &RenderOptions::default());
        assert_eq!(fitted.size, Pt(14.0));
        assert_eq!(fitted.text.as_str(), "Jane");
        assert!(!fitted.truncated);
    }

    #[test]
    fn shrinks_before_truncating() {
        // 14 characters at half an em: 98pt at 14pt, 70pt at 10pt, 73.5pt at 10.5pt
        let m = Monospace::default();
        let fitted = fit_single_line(
            &m,
            &label(72.0, 14.0),
            &"Jonathan Smith".into(),
            &RenderOptions::default(),
        );
        assert_eq!(fitted.size, Pt(10.0));
        assert_eq!(fitted.text.as_str(), "Jonathan Smith");
        assert!(!fitted.truncated);
    }

    #[test]
    fn truncates_with_an_ellipsis_at_the_floor() {
        let m = Monospace::default();
        let name = "A".repeat(60);
        let fitted = fit_single_line(&m, &label(72.0, 14.0), &name.as_str().into(), &RenderOptions::default());
        assert_eq!(fitted.size, Pt(6.0));
        assert!(fitted.truncated);
        assert!(fitted.text.as_str().ends_with("..."));
        // 3pt per character at 6pt: 21 letters plus the ellipsis fill 72pt
        assert_eq!(fitted.text.as_str().len(), 24);
    }

    #[test]
    fn truncation_keeps_caption_bold() {
        let m = Monospace::default();
        let unit = TextUnit::captioned("Name:", &"B".repeat(40));
        let fitted = fit_single_line(&m, &label(72.0, 14.0), &unit, &RenderOptions::default());
        assert!(fitted.truncated);
        assert_eq!(fitted.text.bold_spans(), &[0..5]);
    }

    #[test]
    fn empty_when_not_even_the_ellipsis_fits() {
        let m = Monospace::default();
        let fitted = fit_single_line(&m, &label(5.0, 14.0), &"Jonathan".into(), &RenderOptions::default());
        assert!(fitted.text.is_empty());
        assert!(fitted.size >= Pt(6.0));
    }

    #[test]
    fn boxes_set_below_the_floor_keep_their_size() {
        let m = Monospace::default();
        let fitted = fit_single_line(&m, &label(200.0, 4.0), &"x".into(), &RenderOptions::default());
        assert_eq!(fitted.size, Pt(4.0));
        assert!(!fitted.truncated);

        // too wide at 4pt: no shrinking below the configured size, straight to truncation
        let fitted = fit_single_line(&m, &label(20.0, 4.0), &"x".repeat(20).as_str().into(), &RenderOptions::default());
        assert_eq!(fitted.size, Pt(4.0));
        assert!(fitted.truncated);
    }

    /// Regular glyphs advance half an em, glyphs of the `Bold` family a whole em
    struct Weighted;

    impl Measure for Weighted {
        fn text_width(&self, text: &str, font: &FontSpec) -> Pt {
            let advance = if font.family == "Bold" { 1.0 } else { 0.5 };
            font.size * (advance * text.chars().count() as f32)
        }
    }

    #[test]
    fn bold_captions_shrink_the_label() {
        // "Name: JO" at 10pt: 40pt all regular, 65pt with the caption in bold
        let mut spec = label(50.0, 10.0);
        spec.font = spec.font.with_bold("Bold");
        let unit = TextUnit::captioned("Name:", "JO");
        let fitted = fit_single_line(&Weighted, &spec, &unit, &RenderOptions::default());

        assert!(!fitted.truncated);
        assert_eq!(fitted.size, Pt(7.5));
        let width = measure(&Weighted, &fitted.text, &spec.font.with_size(fitted.size), Pt(f32::INFINITY)).width;
        assert!(width <= spec.usable_width());
    }
}
