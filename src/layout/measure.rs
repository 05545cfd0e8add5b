use crate::geometry::FontSpec;
use crate::text::TextUnit;
use crate::units::Pt;
use std::ops::Range;

/// The text-shaping capability layout decisions are made against. Implemented by
/// the [`FontRegistry`](crate::FontRegistry) for real font metrics, and by
/// [`Monospace`] where a fixed advance is good enough.
pub trait Measure {
    /// Width of `text` set on a single line in `font`. Newlines are not expected.
    fn text_width(&self, text: &str, font: &FontSpec) -> Pt;
}

impl<M: Measure + ?Sized> Measure for &M {
    fn text_width(&self, text: &str, font: &FontSpec) -> Pt {
        (**self).text_width(text, font)
    }
}

/// Every character advances by the same fraction of the font size
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Monospace {
    /// Advance of one character, in ems
    pub advance: f32,
}

impl Default for Monospace {
    fn default() -> Self {
        Monospace { advance: 0.5 }
    }
}

impl Measure for Monospace {
    fn text_width(&self, text: &str, font: &FontSpec) -> Pt {
        font.size * (self.advance * text.chars().count() as f32)
    }
}

/// One wrapped line: the byte ranges of its words in the source text
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    pub words: Vec<Range<usize>>,
    /// Natural width: the words plus one space between each pair
    pub width: Pt,
    /// Whether this line ends its paragraph or is followed by an inline break.
    /// Justified text leaves such lines ragged.
    pub ends_block: bool,
}

impl Line {
    /// The line's text, words joined by single spaces
    pub fn text<'t>(&self, source: &'t str) -> String {
        self.words
            .iter()
            .map(|w| &source[w.clone()])
            .collect::<Vec<&'t str>>()
            .join(" ")
    }
}

/// Result of measuring a text against a width
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Measurement {
    /// Height of the wrapped text: line count times leading
    pub height: Pt,
    /// Width of the widest source line when set without wrapping
    pub width: Pt,
    pub lines: usize,
}

/// Width of the byte `range` of `unit` on one line. Bold spans are measured in
/// the font's bold family, exactly as they are drawn.
pub fn unit_width<M: Measure + ?Sized>(
    measurer: &M,
    unit: &TextUnit,
    range: Range<usize>,
    font: &FontSpec,
) -> Pt {
    unit.runs(range)
        .into_iter()
        .map(|(run, bold)| {
            let text = &unit.as_str()[run];
            if bold && font.bold.is_some() {
                measurer.text_width(text, &font.styled(true))
            } else {
                measurer.text_width(text, font)
            }
        })
        .sum()
}

/// Measure `unit` wrapped to `max_width`. Empty text has zero height.
pub fn measure<M: Measure + ?Sized>(
    measurer: &M,
    unit: &TextUnit,
    font: &FontSpec,
    max_width: Pt,
) -> Measurement {
    let lines = wrap_lines(measurer, unit, font, max_width);
    let space = measurer.text_width(" ", font);

    let mut width = Pt::ZERO;
    let mut offset = 0usize;
    for source_line in unit.as_str().split('\n') {
        let words = word_ranges(source_line, offset);
        offset += source_line.len() + 1;

        let gaps = words.len().saturating_sub(1) as f32;
        let natural = words
            .into_iter()
            .map(|w| unit_width(measurer, unit, w, font))
            .sum::<Pt>()
            + space * gaps;
        width = width.max(natural);
    }

    Measurement {
        height: font.leading * lines.len() as f32,
        width,
        lines: lines.len(),
    }
}

/// Wrap `unit` into lines no wider than `max_width`.
///
/// This is the single wrapping rule shared by measurement and drawing:
///
/// 1. a newline is a hard break; whitespace-only source lines separate
///    paragraphs and produce no line of their own;
/// 2. words (runs of non-whitespace) are packed greedily, one space apart;
/// 3. a word that is wider than `max_width` on its own is broken at character
///    boundaries, at least one character per line, so no line ever exceeds the width
///    unless a single character does.
///
/// Bold spans are measured in the font's bold family.
pub fn wrap_lines<M: Measure + ?Sized>(
    measurer: &M,
    unit: &TextUnit,
    font: &FontSpec,
    max_width: Pt,
) -> Vec<Line> {
    let text = unit.as_str();
    let space = measurer.text_width(" ", font);
    let mut lines: Vec<Line> = Vec::new();

    let mut offset = 0usize;
    for source_line in text.split('\n') {
        let base = offset;
        offset += source_line.len() + 1;

        let words = word_ranges(source_line, base);
        if words.is_empty() {
            continue;
        }

        let mut current: Vec<Range<usize>> = Vec::new();
        let mut current_width = Pt::ZERO;
        for word in words {
            let word_width = unit_width(measurer, unit, word.clone(), font);

            if word_width > max_width {
                if !current.is_empty() {
                    lines.push(Line {
                        words: std::mem::take(&mut current),
                        width: current_width,
                        ends_block: false,
                    });
                    current_width = Pt::ZERO;
                }
                let mut pieces = break_word(measurer, unit, word, font, max_width);
                // the last piece stays open so following words can join it
                if let Some((piece, width)) = pieces.pop() {
                    for (piece, width) in pieces {
                        lines.push(Line {
                            words: vec![piece],
                            width,
                            ends_block: false,
                        });
                    }
                    current.push(piece);
                    current_width = width;
                }
                continue;
            }

            let candidate = if current.is_empty() {
                word_width
            } else {
                current_width + space + word_width
            };
            if candidate <= max_width || current.is_empty() {
                current.push(word);
                current_width = candidate;
            } else {
                lines.push(Line {
                    words: std::mem::take(&mut current),
                    width: current_width,
                    ends_block: false,
                });
                current.push(word);
                current_width = word_width;
            }
        }

        if !current.is_empty() {
            lines.push(Line {
                words: current,
                width: current_width,
                ends_block: true,
            });
        }
    }

    lines
}

/// Byte ranges of the whitespace-separated words of `line`, offset by `base`
fn word_ranges(line: &str, base: usize) -> Vec<Range<usize>> {
    let mut words = Vec::new();
    let mut start: Option<usize> = None;
    for (i, ch) in line.char_indices() {
        match (ch.is_whitespace(), start) {
            (true, Some(s)) => {
                words.push(base + s..base + i);
                start = None;
            }
            (false, None) => start = Some(i),
            _ => {}
        }
    }
    if let Some(s) = start {
        words.push(base + s..base + line.len());
    }
    words
}

/// Break an over-wide word into pieces that each fit `max_width`, taking at least
/// one character per piece
fn break_word<M: Measure + ?Sized>(
    measurer: &M,
    unit: &TextUnit,
    word: Range<usize>,
    font: &FontSpec,
    max_width: Pt,
) -> Vec<(Range<usize>, Pt)> {
    let text = unit.as_str();
    let mut pieces = Vec::new();
    let mut start = word.start;
    while start < word.end {
        let boundaries: Vec<usize> = text[start..word.end]
            .char_indices()
            .skip(1)
            .map(|(i, _)| start + i)
            .chain(std::iter::once(word.end))
            .collect();

        // largest boundary whose piece still fits, never fewer than one character
        let fitting = boundaries
            .partition_point(|&end| unit_width(measurer, unit, start..end, font) <= max_width);
        let end = boundaries[fitting.saturating_sub(1)];

        pieces.push((start..end, unit_width(measurer, unit, start..end, font)));
        start = end;
    }
    pieces
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mono() -> (Monospace, FontSpec) {
        // 5pt per character, 12pt lines
        (
            Monospace { advance: 0.5 },
            FontSpec::new("Mono", Pt(10.0), Pt(12.0)),
        )
    }

    #[test]
    fn empty_text_has_zero_height() {
        let (m, font) = mono();
        let measured = measure(&m, &"".into(), &font, Pt(100.0));
        assert_eq!(measured.height, Pt::ZERO);
        assert_eq!(measured.lines, 0);
    }

    #[test]
    fn wraps_at_whitespace_only() {
        let (m, font) = mono();
        let text = "aaaa bbbb cccc";
        // room for 9 characters: "aaaa bbbb" is exactly 45pt
        let lines = wrap_lines(&m, &text.into(), &font, Pt(45.5));
        let texts: Vec<String> = lines.iter().map(|l| l.text(text)).collect();
        assert_eq!(texts, vec!["aaaa bbbb", "cccc"]);
        assert!(lines[1].ends_block);
        assert!(!lines[0].ends_block);

        let measured = measure(&m, &text.into(), &font, Pt(45.5));
        assert_eq!(measured.height, Pt(24.0));
        assert_eq!(measured.width, Pt(70.0));
    }

    #[test]
    fn blank_lines_separate_paragraphs_without_taking_space() {
        let (m, font) = mono();
        let text = "one\n\n  \ntwo\nthree";
        let lines = wrap_lines(&m, &text.into(), &font, Pt(100.0));
        let texts: Vec<String> = lines.iter().map(|l| l.text(text)).collect();
        assert_eq!(texts, vec!["one", "two", "three"]);
        assert!(lines.iter().all(|l| l.ends_block));
    }

    #[test]
    fn overwide_words_break_by_character() {
        let (m, font) = mono();
        let text = "abcdefghij xy";
        // 4 characters per line
        let lines = wrap_lines(&m, &text.into(), &font, Pt(20.5));
        let texts: Vec<String> = lines.iter().map(|l| l.text(text)).collect();
        assert_eq!(texts, vec!["abcd", "efgh", "ij", "xy"]);
        assert!(lines.iter().all(|l| *l.width <= 20.5));
    }

    #[test]
    fn tail_of_broken_word_shares_its_line() {
        let (m, font) = mono();
        let text = "abcdef g";
        let lines = wrap_lines(&m, &text.into(), &font, Pt(20.5));
        let texts: Vec<String> = lines.iter().map(|l| l.text(text)).collect();
        assert_eq!(texts, vec!["abcd", "ef g"]);
    }

    /// Regular glyphs advance half an em, bold ones a whole em
    struct Weighted;

    impl Measure for Weighted {
        fn text_width(&self, text: &str, font: &FontSpec) -> Pt {
            let advance = if font.family == "Bold" { 1.0 } else { 0.5 };
            font.size * (advance * text.chars().count() as f32)
        }
    }

    #[test]
    fn bold_spans_are_measured_in_the_bold_family() {
        let font = FontSpec::new("Mono", Pt(10.0), Pt(12.0)).with_bold("Bold");
        let unit = TextUnit::captioned("Name:", "ab");

        // "Name:" is 5 bold characters, then a regular space and "ab"
        assert_eq!(unit_width(&Weighted, &unit, 0..unit.len(), &font), Pt(65.0));
        let measured = measure(&Weighted, &unit, &font, Pt(f32::INFINITY));
        assert_eq!(measured.width, Pt(65.0));

        // the bold caption fills a 60pt line on its own
        let lines = wrap_lines(&Weighted, &unit, &font, Pt(60.0));
        let texts: Vec<String> = lines.iter().map(|l| l.text(unit.as_str())).collect();
        assert_eq!(texts, vec!["Name:", "ab"]);
        assert_eq!(lines[0].width, Pt(50.0));

        // without a bold family everything is regular
        let plain = FontSpec::new("Mono", Pt(10.0), Pt(12.0));
        assert_eq!(unit_width(&Weighted, &unit, 0..unit.len(), &plain), Pt(40.0));
    }

    #[test]
    fn multibyte_words_keep_char_boundaries() {
        let (m, font) = mono();
        let text = "ççççç";
        let lines = wrap_lines(&m, &text.into(), &font, Pt(10.5));
        let texts: Vec<String> = lines.iter().map(|l| l.text(text)).collect();
        assert_eq!(texts, vec!["çç", "çç", "ç"]);
    }
}
