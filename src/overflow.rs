//! Chained boxes and continuation pages.
//!
//! A [`Slot`] owns the text of one field and the chain of boxes it may fill, in
//! document order. Each [`Composer::fill`] places as much of the pending text as
//! fits into the next box of the chain and keeps the rest. Whatever is left after
//! the last box becomes an [`OverflowItem`] on the [`OverflowQueue`], and
//! [`Composer::continuation_pages`] drains the queue onto generic continuation
//! pages once the fixed pages are done.

use crate::compose::Composer;
use crate::error::{ReportError, Result};
use crate::layout::{split, Measure};
use crate::page::Page;
use crate::text::TextUnit;
use std::collections::VecDeque;

/// Box that heads every continuation page
pub const CONTINUATION_TITLE: &str = "continuation.title";
/// Box that holds the carried text on continuation pages
pub const CONTINUATION_BODY: &str = "continuation.body";

/// A field's text and the boxes it flows through
#[derive(Debug, Clone, PartialEq)]
pub struct Slot {
    pub title: String,
    boxes: Vec<String>,
    pending: TextUnit,
    cursor: usize,
}

impl Slot {
    pub fn new<S, I>(title: S, boxes: I, text: TextUnit) -> Slot
    where
        S: ToString,
        I: IntoIterator,
        I::Item: ToString,
    {
        Slot {
            title: title.to_string(),
            boxes: boxes.into_iter().map(|b| b.to_string()).collect(),
            pending: text,
            cursor: 0,
        }
    }

    /// The text not yet placed
    pub fn pending(&self) -> &TextUnit {
        &self.pending
    }

    /// The box the next fill goes into
    pub fn next_box(&self) -> Option<&str> {
        self.boxes.get(self.cursor).map(String::as_str)
    }

    pub fn is_exhausted(&self) -> bool {
        self.cursor >= self.boxes.len()
    }
}

/// Text left over after a field's last box, waiting for continuation pages
#[derive(Debug, Clone, PartialEq)]
pub struct OverflowItem {
    pub title: String,
    pub body: TextUnit,
}

/// First in, first out
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OverflowQueue {
    items: VecDeque<OverflowItem>,
}

impl OverflowQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, item: OverflowItem) {
        self.items.push_back(item);
    }

    pub fn pop(&mut self) -> Option<OverflowItem> {
        self.items.pop_front()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &OverflowItem> {
        self.items.iter()
    }
}

impl<'a, M: Measure + ?Sized> Composer<'a, M> {
    /// Place the slot's pending text into the next box of its chain on `page`.
    ///
    /// After the last box, a non-empty remainder is pushed onto `queue` and the
    /// slot is left with nothing pending. Filling an exhausted slot is an error.
    pub fn fill(&self, page: &mut Page, slot: &mut Slot, queue: &mut OverflowQueue) -> Result<()> {
        let Some(box_id) = slot.next_box() else {
            return Err(ReportError::ExhaustedSlot(slot.title.clone()));
        };
        let result = self.text(page, box_id, &slot.pending)?;
        slot.cursor += 1;
        slot.pending = result.remainder;

        if slot.is_exhausted() && !slot.pending.is_empty() {
            log::debug!(
                "`{}` overflows its last box by {} bytes",
                slot.title,
                slot.pending.len()
            );
            queue.push(OverflowItem {
                title: slot.title.clone(),
                body: std::mem::take(&mut slot.pending),
            });
        }
        Ok(())
    }

    /// Drain `queue` onto continuation pages, in the order items were pushed.
    ///
    /// Every page is created with the continuation background and handed to
    /// `decorate` (for headers and footers) before the item's title and the next
    /// part of its body are placed. The title gets the continued suffix on every
    /// page after an item's first. An item whose next split would place nothing
    /// is abandoned with a warning, so the loop always ends.
    pub fn continuation_pages<F>(&self, queue: &mut OverflowQueue, mut decorate: F) -> Result<Vec<Page>>
    where
        F: FnMut(&mut Page) -> Result<()>,
    {
        let body_spec = self.registry.box_spec(CONTINUATION_BODY)?;
        self.registry.box_spec(CONTINUATION_TITLE)?;

        let mut pages = Vec::new();
        while let Some(item) = queue.pop() {
            let mut body = item.body;
            let mut part = 0usize;
            while !body.is_empty() {
                let result = split(self.measurer, body_spec, &body);
                if !result.made_progress(&body) {
                    log::warn!(
                        "`{}` cannot be placed on a continuation page, {} bytes dropped",
                        item.title,
                        body.len()
                    );
                    break;
                }

                let title = if part == 0 {
                    item.title.clone()
                } else {
                    format!("{} {}", item.title, self.options.continued_suffix)
                };
                let mut page = self.page(
                    format!("continuation: {title}"),
                    &self.options.continuation_background,
                );
                decorate(&mut page)?;
                self.label_unit(&mut page, CONTINUATION_TITLE, &TextUnit::new(&title))?;
                self.place(&mut page, body_spec, &result.fitted);
                pages.push(page);

                body = result.remainder;
                part += 1;
            }
            log::debug!("`{}` took {} continuation pages", item.title, part);
        }
        Ok(pages)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{BoxSpec, FontSpec, Registry};
    use crate::layout::Monospace;
    use crate::options::RenderOptions;
    use crate::units::*;

    /// Boxes of `lines` 12pt lines, 30 monospace characters wide
    fn registry(lines: usize) -> Registry {
        let mut registry = Registry::new(Mm(200.0), Mm(300.0), "Bold");
        let font = FontSpec::new("Mono", Pt(10.0), Pt(12.0));
        let boxed = |id: &str, y: f32, lines: usize| {
            BoxSpec::new(
                id,
                Mm(10.0),
                Mm(y),
                Pt(150.5).into(),
                Pt(lines as f32 * 12.0 + 1.0).into(),
                font.clone(),
            )
        };
        registry.insert_box(boxed("a", 10.0, 1));
        registry.insert_box(boxed("b", 30.0, 1));
        registry.insert_box(boxed(CONTINUATION_TITLE, 50.0, 1));
        registry.insert_box(boxed(CONTINUATION_BODY, 70.0, lines));
        registry
    }

    fn page_texts(page: &Page) -> Vec<String> {
        page.text_runs().map(|r| r.text.as_str().to_string()).collect()
    }

    #[test]
    fn remainders_flow_down_the_chain_then_queue() {
        let registry = registry(2);
        let options = RenderOptions::default();
        let m = Monospace::default();
        let composer = Composer::new(&registry, &m, &options);
        let mut queue = OverflowQueue::new();

        let mut slot = Slot::new("Notes", ["a", "b"], TextUnit::new("one\n\ntwo\n\nthree"));
        let mut first = composer.page("1", "bg");
        composer.fill(&mut first, &mut slot, &mut queue).unwrap();
        assert_eq!(slot.pending().as_str(), "two\n\nthree");
        assert!(queue.is_empty());

        let mut second = composer.page("2", "bg");
        composer.fill(&mut second, &mut slot, &mut queue).unwrap();
        assert!(slot.is_exhausted());
        assert!(slot.pending().is_empty());
        assert_eq!(page_texts(&first), vec!["one"]);
        assert_eq!(page_texts(&second), vec!["two"]);

        let item = queue.pop().expect("queued remainder");
        assert_eq!(item.title, "Notes");
        assert_eq!(item.body.as_str(), "three");

        assert!(matches!(
            composer.fill(&mut second, &mut slot, &mut queue),
            Err(ReportError::ExhaustedSlot(_))
        ));
    }

    #[test]
    fn fitting_text_queues_nothing() {
        let registry = registry(2);
        let options = RenderOptions::default();
        let m = Monospace::default();
        let composer = Composer::new(&registry, &m, &options);
        let mut queue = OverflowQueue::new();

        let mut slot = Slot::new("Empty", ["a"], TextUnit::empty());
        let mut page = composer.page("1", "bg");
        composer.fill(&mut page, &mut slot, &mut queue).unwrap();
        assert!(queue.is_empty());
        assert!(composer.continuation_pages(&mut queue, |_| Ok(())).unwrap().is_empty());
    }

    #[test]
    fn continuation_titles_repeat_with_suffix() {
        let registry = registry(2);
        let options = RenderOptions::default();
        let m = Monospace::default();
        let composer = Composer::new(&registry, &m, &options);

        let mut queue = OverflowQueue::new();
        queue.push(OverflowItem {
            title: "First".to_string(),
            body: TextUnit::new("p1\n\np2\n\np3\n\np4\n\np5"),
        });
        queue.push(OverflowItem {
            title: "Second".to_string(),
            body: TextUnit::new("q1"),
        });

        let mut decorated = 0;
        let pages = composer
            .continuation_pages(&mut queue, |_| {
                decorated += 1;
                Ok(())
            })
            .unwrap();
        assert_eq!(pages.len(), 4);
        assert_eq!(decorated, 4);
        assert!(queue.is_empty());

        assert_eq!(page_texts(&pages[0]), vec!["First", "p1\n\np2"]);
        assert_eq!(page_texts(&pages[1]), vec!["First (continued)", "p3\n\np4"]);
        assert_eq!(page_texts(&pages[2]), vec!["First (continued)", "p5"]);
        assert_eq!(page_texts(&pages[3]), vec!["Second", "q1"]);
    }

    #[test]
    fn unplaceable_items_are_abandoned() {
        let registry = registry(0);
        let options = RenderOptions::default();
        let m = Monospace::default();
        let composer = Composer::new(&registry, &m, &options);

        let mut queue = OverflowQueue::new();
        queue.push(OverflowItem {
            title: "Stuck".to_string(),
            body: TextUnit::new("never fits"),
        });
        let pages = composer.continuation_pages(&mut queue, |_| Ok(())).unwrap();
        assert!(pages.is_empty());
        assert!(queue.is_empty());
    }

    #[test]
    fn long_text_ends_in_finitely_many_pages() {
        let registry = registry(5);
        let options = RenderOptions::default();
        let m = Monospace::default();
        let composer = Composer::new(&registry, &m, &options);

        let mut queue = OverflowQueue::new();
        let body = TextUnit::new(lipsum::lipsum(2000));
        queue.push(OverflowItem {
            title: "Long".to_string(),
            body: body.clone(),
        });
        let pages = composer.continuation_pages(&mut queue, |_| Ok(())).unwrap();
        assert!(pages.len() > 1);

        let placed: usize = pages
            .iter()
            .flat_map(|p| p.text_runs().skip(1))
            .map(|r| r.text.as_str().split_whitespace().count())
            .sum();
        assert_eq!(placed, body.as_str().split_whitespace().count());
    }
}
