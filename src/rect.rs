use crate::units::*;

/// A rectangle, specified by two opposite corners in PDF space (origin at the
/// bottom-left of the page, y growing upwards).
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct Rect {
    /// The x-coordinate of the lower-left corner.
    pub x1: Pt,
    /// The y-coordinate of the lower-left corner.
    pub y1: Pt,
    /// The x-coordinate of the upper-right corner.
    pub x2: Pt,
    /// The y-coordinate of the upper-right corner.
    pub y2: Pt,
}

impl Rect {
    /// Build a rectangle from a top-left anchored box, as template geometry is
    /// authored: `y` is measured downwards from the top of a page `page_height` tall.
    pub fn from_top<L: Into<Pt>>(page_height: Pt, x: L, y: L, width: L, height: L) -> Rect {
        let (x, y, width, height) = (x.into(), y.into(), width.into(), height.into());
        Rect {
            x1: x,
            y1: page_height - y - height,
            x2: x + width,
            y2: page_height - y,
        }
    }

    pub fn width(&self) -> Pt {
        self.x2 - self.x1
    }

    pub fn height(&self) -> Pt {
        self.y2 - self.y1
    }

    /// Shrink the rectangle by `dx` on the left and right and `dy` on the top and bottom.
    /// Never produces a negative size.
    pub fn inset(&self, dx: Pt, dy: Pt) -> Rect {
        let dx = dx.min(self.width() / 2.0);
        let dy = dy.min(self.height() / 2.0);
        Rect {
            x1: self.x1 + dx,
            y1: self.y1 + dy,
            x2: self.x2 - dx,
            y2: self.y2 - dy,
        }
    }

    /// Whether `other` lies entirely inside this rectangle, allowing for a little
    /// floating point slack
    pub fn contains(&self, other: &Rect) -> bool {
        const SLACK: f32 = 0.01;
        *other.x1 >= *self.x1 - SLACK
            && *other.y1 >= *self.y1 - SLACK
            && *other.x2 <= *self.x2 + SLACK
            && *other.y2 <= *self.y2 + SLACK
    }
}

impl From<Rect> for pdf_writer::Rect {
    fn from(r: Rect) -> Self {
        pdf_writer::Rect {
            x1: r.x1.into(),
            y1: r.y1.into(),
            x2: r.x2.into(),
            y2: r.y2.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn top_anchored_boxes_flip_into_pdf_space() {
        let r = Rect::from_top(Pt(100.0), Pt(10.0), Pt(20.0), Pt(30.0), Pt(40.0));
        assert_eq!(
            r,
            Rect {
                x1: Pt(10.0),
                y1: Pt(40.0),
                x2: Pt(40.0),
                y2: Pt(80.0),
            }
        );
        assert_eq!(r.width(), Pt(30.0));
        assert_eq!(r.height(), Pt(40.0));
    }

    #[test]
    fn inset_never_inverts() {
        let r = Rect {
            x1: Pt(0.0),
            y1: Pt(0.0),
            x2: Pt(10.0),
            y2: Pt(4.0),
        };
        let inner = r.inset(Pt(2.0), Pt(5.0));
        assert_eq!(inner.width(), Pt(6.0));
        assert_eq!(inner.height(), Pt(0.0));
        assert!(r.contains(&inner));
    }
}
