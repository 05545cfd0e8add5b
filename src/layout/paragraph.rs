use super::measure::{measure, Measure};
use super::FIT_EPSILON;
use crate::geometry::BoxSpec;
use crate::text::TextUnit;
use crate::units::Pt;
use std::ops::Range;

/// The outcome of splitting a text unit against a box
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FitResult {
    /// The part that fits the box
    pub fitted: TextUnit,
    /// Everything that is carried forward to the next box
    pub remainder: TextUnit,
}

impl FitResult {
    /// Whether nothing was carried forward
    pub fn is_complete(&self) -> bool {
        self.remainder.is_empty()
    }

    /// Whether splitting `input` got anywhere: something was placed and the
    /// remainder is strictly shorter than the input
    pub fn made_progress(&self, input: &TextUnit) -> bool {
        !self.fitted.is_empty() && self.remainder.len() < input.len()
    }
}

/// Byte ranges of the paragraphs of `text`, trimmed of surrounding whitespace.
/// Paragraphs are separated by one or more blank lines.
pub fn paragraph_ranges(text: &str) -> Vec<Range<usize>> {
    let mut paragraphs = Vec::new();
    let mut current: Option<Range<usize>> = None;

    let mut offset = 0usize;
    for line in text.split('\n') {
        let start = offset;
        offset += line.len() + 1;

        let trimmed = line.trim();
        if trimmed.is_empty() {
            if let Some(p) = current.take() {
                paragraphs.push(p);
            }
            continue;
        }

        let first = start + (line.len() - line.trim_start().len());
        let last = start + line.trim_end().len();
        match current.as_mut() {
            Some(p) => p.end = last,
            None => current = Some(first..last),
        }
    }
    if let Some(p) = current {
        paragraphs.push(p);
    }
    paragraphs
}

/// Whether all of `unit` fits inside the usable area of `spec`
pub fn fits<M: Measure + ?Sized>(measurer: &M, spec: &BoxSpec, unit: &TextUnit) -> bool {
    let height = measure(measurer, unit, &spec.font, spec.usable_width()).height;
    height <= spec.usable_height() + Pt(FIT_EPSILON)
}

fn range_fits<M: Measure + ?Sized>(measurer: &M, spec: &BoxSpec, unit: &TextUnit, range: Range<usize>) -> bool {
    fits(measurer, spec, &unit.slice(range))
}

/// Split `unit` into the largest prefix that fits `spec` and the remainder.
///
/// Whole paragraphs are preferred. When not even the first paragraph fits, it is
/// broken after the last word that fits, and when not even its first word fits,
/// that word is cut at a character boundary. Paragraphs after the one being
/// broken are always carried forward whole.
///
/// When nothing fits at all (a box shorter than one line), the fitted part is
/// empty and the remainder is the whole input.
pub fn split<M: Measure + ?Sized>(measurer: &M, spec: &BoxSpec, unit: &TextUnit) -> FitResult {
    if fits(measurer, spec, unit) {
        return FitResult {
            fitted: unit.clone(),
            remainder: TextUnit::empty(),
        };
    }

    let text = unit.as_str();
    let paragraphs = paragraph_ranges(text);
    let Some(first) = paragraphs.first().cloned() else {
        // whitespace only, which always fits
        return FitResult {
            fitted: unit.clone(),
            remainder: TextUnit::empty(),
        };
    };

    // paragraph level
    let accepted = paragraphs
        .iter()
        .take_while(|p| range_fits(measurer, spec, unit, first.start..p.end))
        .count();
    if accepted == paragraphs.len() {
        return FitResult {
            fitted: unit.clone(),
            remainder: TextUnit::empty(),
        };
    }
    if accepted > 0 {
        let fitted_end = paragraphs[accepted - 1].end;
        let rest_start = paragraphs[accepted].start;
        log::debug!(
            "`{}`: {} of {} paragraphs fit",
            spec.id,
            accepted,
            paragraphs.len()
        );
        return FitResult {
            fitted: unit.slice(first.start..fitted_end),
            remainder: unit.slice(rest_start..text.len()),
        };
    }

    // word level, inside the first paragraph
    let breaks = word_breaks(text, &first);
    let fitting = breaks.partition_point(|&b| {
        let end = first.start + text[first.start..b].trim_end().len();
        range_fits(measurer, spec, unit, first.start..end)
    });
    if fitting > 0 {
        let at = breaks[fitting - 1];
        let fitted_end = first.start + text[first.start..at].trim_end().len();
        log::debug!("`{}`: first paragraph broken at byte {}", spec.id, at);
        return FitResult {
            fitted: unit.slice(first.start..fitted_end),
            remainder: unit.slice(at..text.len()),
        };
    }

    // character level, inside the first word
    let word_end = text[first.clone()]
        .find(char::is_whitespace)
        .map(|i| first.start + i)
        .unwrap_or(first.end);
    let cuts: Vec<usize> = text[first.start..word_end]
        .char_indices()
        .skip(1)
        .map(|(i, _)| first.start + i)
        .collect();
    let fitting = cuts.partition_point(|&c| range_fits(measurer, spec, unit, first.start..c));
    if fitting > 0 {
        let at = cuts[fitting - 1];
        log::debug!("`{}`: first word cut at byte {}", spec.id, at);
        return FitResult {
            fitted: unit.slice(first.start..at),
            remainder: unit.slice(at..text.len()),
        };
    }

    log::debug!("`{}`: nothing fits", spec.id);
    FitResult {
        fitted: TextUnit::empty(),
        remainder: unit.clone(),
    }
}

/// Candidate breakpoints inside `paragraph`: the end of every whitespace run.
/// The paragraph end is left out; the whole paragraph is already known not to fit.
fn word_breaks(text: &str, paragraph: &Range<usize>) -> Vec<usize> {
    let mut breaks = Vec::new();
    let mut in_space = false;
    for (i, ch) in text[paragraph.clone()].char_indices() {
        let space = ch.is_whitespace();
        if in_space && !space {
            breaks.push(paragraph.start + i);
        }
        in_space = space;
    }
    breaks
}
