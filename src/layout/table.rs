use crate::geometry::{FontSpec, Padding, TableSpec};
use crate::rect::Rect;
use crate::text::TextUnit;
use crate::units::*;

/// How a cell is drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellStyle {
    /// Accent fill with inverse text
    Header,
    /// Body text on the page background
    Data,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    pub text: TextUnit,
    pub style: CellStyle,
}

/// A grid ready to draw: fixed column widths, uniform row height, styled cells
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub id: String,
    /// The outline of the whole grid in PDF space
    pub rect: Rect,
    pub columns: Vec<Pt>,
    pub row_height: Pt,
    pub font: FontSpec,
    pub cell_padding: Padding,
    pub rows: Vec<Vec<Cell>>,
}

impl Table {
    /// The rectangle of the cell at `row`, `column`, or `None` if out of range
    pub fn cell_rect(&self, row: usize, column: usize) -> Option<Rect> {
        if row >= self.rows.len() || column >= self.columns.len() {
            return None;
        }
        let x1 = self.rect.x1 + self.columns[..column].iter().copied().sum::<Pt>();
        let y2 = self.rect.y2 - self.row_height * row as f32;
        Some(Rect {
            x1,
            y1: y2 - self.row_height,
            x2: x1 + self.columns[column],
            y2,
        })
    }
}

/// Lay `rows` onto the grid of `spec`.
///
/// Every row is cut or padded to the number of columns; the first
/// `header_columns` cells of each row get the header style. Rows whose cells are
/// all empty are dropped, and when no row is left there is no table.
pub fn build_table(spec: &TableSpec, page_height: Pt, rows: &[Vec<TextUnit>]) -> Option<Table> {
    let width = spec.columns.len();
    let rows: Vec<Vec<Cell>> = rows
        .iter()
        .filter(|row| row.iter().take(width).any(|cell| !cell.is_empty()))
        .map(|row| {
            (0..width)
                .map(|column| Cell {
                    text: row.get(column).cloned().unwrap_or_default(),
                    style: if column < spec.header_columns {
                        CellStyle::Header
                    } else {
                        CellStyle::Data
                    },
                })
                .collect()
        })
        .collect();

    if rows.is_empty() {
        log::debug!("table `{}` has no rows, omitted", spec.id);
        return None;
    }

    let row_height: Pt = spec.row_height.into();
    let rect = Rect::from_top(
        page_height,
        spec.x.into(),
        spec.y.into(),
        spec.width().into(),
        row_height * rows.len() as f32,
    );

    Some(Table {
        id: spec.id.clone(),
        rect,
        columns: spec.columns.iter().copied().map(Pt::from).collect(),
        row_height,
        font: spec.font.clone(),
        cell_padding: spec.cell_padding,
        rows,
    })
}
