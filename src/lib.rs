//! Lay clinical report records out on a fixed, multi-page PDF template.
//!
//! A [`Registry`] describes the template: named boxes and tables at fixed
//! positions. A [`Composer`] fits text into those boxes, shrinking single line
//! labels and splitting long fields across a chain of boxes. [`assemble`] runs
//! the built-in page sequence for a [`Record`], adding continuation pages for
//! anything that did not fit. Finally a [`PdfRenderer`] draws the pages.
//!
//! ```
//! use report_flow::{assemble, Composer, PdfRenderer, Record, Registry, RenderOptions};
//!
//! let record = Record::new()
//!     .with("patient_name", "Jane Doe")
//!     .with("interpretation_text", "No pathogenic variants were identified.");
//!
//! let renderer = PdfRenderer::new();
//! let registry = Registry::builtin();
//! let options = RenderOptions::default();
//! let composer = Composer::new(&registry, renderer.fonts(), &options);
//!
//! let pages = assemble(&record, &composer)?;
//! let pdf = renderer.render(&pages)?;
//! assert!(pdf.starts_with(b"%PDF"));
//! # Ok::<(), report_flow::ReportError>(())
//! ```

mod colour;
pub use colour::*;

mod compose;
pub use compose::*;

mod content;

mod error;
pub use error::*;

mod font;
pub use font::*;

mod geometry;
pub use geometry::*;

mod image;
pub use self::image::*;

mod info;
pub use info::*;

pub mod layout;

mod options;
pub use options::*;

mod overflow;
pub use overflow::*;

mod page;
pub use page::*;

mod record;
pub use record::*;

mod rect;
pub use rect::*;

pub(crate) mod refs;

mod render;
pub use render::*;

mod report;
pub use report::*;

mod template;

mod text;
pub use text::*;

mod units;
pub use units::*;

/// Re-export PDF-writer functionality
pub use pdf_writer;
