//! Canvas → terminal cells.
//!
//! Each terminal cell shows two vertically stacked canvas pixels with the
//! upper half block `▀`: foreground is the upper pixel, background the lower
//! one. A canvas of `cols x 2*rows` pixels therefore fills `cols x rows`
//! cells.

use crate::types::{Cell, CellChange};

use super::canvas::Canvas;

pub const UPPER_HALF: char = '\u{2580}';

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellGrid {
    pub cols: usize,
    pub rows: usize,
    pub cells: Vec<Vec<Cell>>,
}

impl CellGrid {
    pub fn from_canvas(canvas: &Canvas) -> CellGrid {
        let cols = canvas.w;
        let rows = canvas.h.div_ceil(2);
        let cells = (0..rows)
            .map(|r| {
                (0..cols)
                    .map(|x| {
                        let top = canvas.get(x, 2 * r);
                        let bottom = if 2 * r + 1 < canvas.h {
                            canvas.get(x, 2 * r + 1)
                        } else {
                            canvas.background
                        };
                        if top == bottom {
                            Cell { ch: ' ', fg: top, bg: top }
                        } else {
                            Cell { ch: UPPER_HALF, fg: top, bg: bottom }
                        }
                    })
                    .collect()
            })
            .collect();
        CellGrid { cols, rows, cells }
    }
}

/// Cells that differ between two grids of the same size.
pub fn diff(prev: &CellGrid, next: &CellGrid) -> Vec<CellChange> {
    let mut changes = Vec::new();
    for (y, (prev_row, next_row)) in prev.cells.iter().zip(next.cells.iter()).enumerate() {
        for (x, (prev_cell, next_cell)) in prev_row.iter().zip(next_row.iter()).enumerate() {
            if prev_cell != next_cell {
                changes.push(CellChange {
                    x: x as u16,
                    y: y as u16,
                    cell: *next_cell,
                });
            }
        }
    }
    changes
}

/// Plain-text rendering: `#` for pixels that differ from the background,
/// `.` otherwise. One line per canvas row.
pub fn to_ascii(canvas: &Canvas) -> String {
    let mut out = String::with_capacity((canvas.w + 1) * canvas.h);
    for y in 0..canvas.h {
        for x in 0..canvas.w {
            let px = canvas.get(x, y);
            out.push(if px == canvas.background {
                '.'
            } else if px.luma() >= 96 {
                '#'
            } else {
                '+'
            });
        }
        out.push('\n');
    }
    out
}

/// Same as `to_ascii` but keeps only the rows and columns in `every`-th steps,
/// for printing a large canvas in a terminal.
pub fn to_ascii_sampled(canvas: &Canvas, every_x: usize, every_y: usize) -> String {
    let (sx, sy) = (every_x.max(1), every_y.max(1));
    let mut small = Canvas::new(canvas.w.div_ceil(sx), canvas.h.div_ceil(sy), canvas.background);
    for y in 0..small.h {
        for x in 0..small.w {
            small.arr[y * small.w + x] = canvas.get(x * sx, y * sy);
        }
    }
    to_ascii(&small)
}
