use std::ops::Range;

/// A unit of text poured into one box: zero or more paragraphs separated by blank
/// lines, plus bold spans that the layout engine carries along but never interprets.
///
/// A single newline inside a paragraph is an inline line break. Text units are
/// never edited in place: fitting produces new units that share nothing with the
/// original, with their bold spans rebased onto the new text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextUnit {
    text: String,
    /// Byte ranges into `text`, sorted and non-overlapping
    bold: Vec<Range<usize>>,
}

impl TextUnit {
    /// Create a unit from raw text, normalizing newlines and expanding tabs
    pub fn new<S: AsRef<str>>(text: S) -> TextUnit {
        const TABSIZE: usize = 4;

        let text = text
            .as_ref()
            .replace("\r\n", "\n")
            .replace('\r', "\n")
            .replace('\t', &" ".repeat(TABSIZE));
        TextUnit {
            text,
            bold: Vec::new(),
        }
    }

    pub fn empty() -> TextUnit {
        TextUnit::default()
    }

    /// `caption value`, with the caption marked bold. An empty caption yields the
    /// plain value; an empty value yields the caption alone.
    pub fn captioned(caption: &str, value: &str) -> TextUnit {
        let caption = caption.trim();
        let value = value.trim();
        match (caption.is_empty(), value.is_empty()) {
            (true, _) => TextUnit::new(value),
            (false, true) => {
                let unit = TextUnit::new(caption);
                let end = unit.len();
                unit.with_bold(0..end)
            }
            (false, false) => {
                let unit = TextUnit::new(format!("{caption} {value}"));
                unit.with_bold(0..caption.len())
            }
        }
    }

    /// Mark a byte range as bold. Ranges are clamped to the text and snapped
    /// outwards to character boundaries.
    pub fn with_bold(mut self, range: Range<usize>) -> TextUnit {
        let mut start = range.start.min(self.text.len());
        let mut end = range.end.min(self.text.len());
        while !self.text.is_char_boundary(start) {
            start -= 1;
        }
        while !self.text.is_char_boundary(end) {
            end += 1;
        }
        if start < end {
            self.bold.push(start..end);
            self.bold.sort_by_key(|r| r.start);
            self.bold = merge(std::mem::take(&mut self.bold));
        }
        self
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn bold_spans(&self) -> &[Range<usize>] {
        &self.bold
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    /// Whitespace-only text counts as empty: it draws nothing and always fits
    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }

    /// Whether the byte at `offset` falls inside a bold span
    pub fn is_bold_at(&self, offset: usize) -> bool {
        self.bold.iter().any(|r| r.contains(&offset))
    }

    /// A new unit holding `range` of this one, with bold spans clipped and rebased
    pub fn slice(&self, range: Range<usize>) -> TextUnit {
        let Range { start, end } = range;
        let bold = self
            .bold
            .iter()
            .filter(|r| r.start < end && r.end > start)
            .map(|r| r.start.max(start) - start..r.end.min(end) - start)
            .collect();
        TextUnit {
            text: self.text[start..end].to_string(),
            bold,
        }
    }

    /// A new unit with `suffix` appended as plain text
    pub fn appended(&self, suffix: &str) -> TextUnit {
        let mut text = String::with_capacity(self.text.len() + suffix.len());
        text.push_str(&self.text);
        text.push_str(suffix);
        TextUnit {
            text,
            bold: self.bold.clone(),
        }
    }

    /// Split `range` of the text into runs of equal boldness
    pub fn runs(&self, range: Range<usize>) -> Vec<(Range<usize>, bool)> {
        let mut runs: Vec<(Range<usize>, bool)> = Vec::new();
        let mut current: Option<(usize, bool)> = None;
        for (i, _) in self.text[range.clone()].char_indices() {
            let offset = range.start + i;
            let bold = self.is_bold_at(offset);
            match current {
                Some((_, b)) if b == bold => {}
                Some((start, b)) => {
                    runs.push((start..offset, b));
                    current = Some((offset, bold));
                }
                None => current = Some((offset, bold)),
            }
        }
        if let Some((start, b)) = current {
            runs.push((start..range.end, b));
        }
        runs
    }
}

impl From<&str> for TextUnit {
    fn from(s: &str) -> Self {
        TextUnit::new(s)
    }
}

impl From<String> for TextUnit {
    fn from(s: String) -> Self {
        TextUnit::new(s)
    }
}

fn merge(ranges: Vec<Range<usize>>) -> Vec<Range<usize>> {
    let mut merged: Vec<Range<usize>> = Vec::with_capacity(ranges.len());
    for r in ranges {
        match merged.last_mut() {
            Some(last) if r.start <= last.end => last.end = last.end.max(r.end),
            _ => merged.push(r),
        }
    }
    merged
}
