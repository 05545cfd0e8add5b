//! Text fitting: measuring, wrapping, shrinking and splitting text against boxes.
//!
//! Everything here is a pure function of its inputs. Nothing is drawn; callers
//! take the fitted text and hand it to a [`Canvas`](crate::Canvas) through a
//! [`Page`](crate::Page).
//!
//! - [`measure`] and [`wrap_lines`] implement the one wrapping rule that both
//!   fitting and drawing use
//! - [`fit_single_line`] shrinks, then truncates, a label to one line
//! - [`fits`] and [`split`] decide how much of a multi-paragraph text a box holds
//! - [`build_table`] lays cell values onto a fixed grid
//!
//! # Example
//!
//! ```
//! use report_flow::layout::{split, Monospace};
//! use report_flow::{BoxSpec, FontSpec, Mm, Pt, TextUnit};
//!
//! let spec = BoxSpec::new("body", Mm(0.0), Mm(0.0), Mm(50.0), Mm(10.0),
//!     FontSpec::new("Helvetica", Pt(10.0), Pt(12.0)));
//! let text = TextUnit::new("First paragraph.\n\nSecond paragraph.\n\nThird paragraph.");
//!
//! let result = split(&Monospace::default(), &spec, &text);
//! assert_eq!(result.fitted.as_str(), "First paragraph.\n\nSecond paragraph.");
//! assert_eq!(result.remainder.as_str(), "Third paragraph.");
//! ```

mod measure;
mod paragraph;
mod single_line;
mod table;

pub use measure::*;
pub use paragraph::*;
pub use single_line::*;
pub use table::*;

/// Slack allowed when comparing measured lengths against box sizes
pub(crate) const FIT_EPSILON: f32 = 0.01;
