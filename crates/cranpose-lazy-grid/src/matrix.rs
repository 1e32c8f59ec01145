//! Sparse placement matrix for lazy grids.
//!
//! The matrix maps `(line, track)` to the item occupying that cell. Lines are
//! filled strictly in increasing order and placement is append-only: once an
//! item has a cell it keeps it until the matrix is reset or truncated.
//!
//! Filling only queries spans through [`GridItemProvider::span`]; no item is
//! measured here.

use crate::item_provider::{GridItemProvider, GridSpan};
use smallvec::{smallvec, SmallVec};

/// Content of one matrix cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum GridCell {
    /// No item covers this cell yet.
    #[default]
    Empty,
    /// Origin (top-left) cell of the item with this index.
    Item(usize),
    /// Cell covered by a spanning item whose origin is elsewhere.
    Continuation(usize),
}

impl GridCell {
    #[inline]
    pub fn is_empty(&self) -> bool {
        matches!(self, GridCell::Empty)
    }

    /// Index of the item covering this cell, origin or continuation.
    #[inline]
    pub fn item_index(&self) -> Option<usize> {
        match *self {
            GridCell::Empty => None,
            GridCell::Item(index) | GridCell::Continuation(index) => Some(index),
        }
    }
}

/// One line of the matrix. Most grids have few tracks, so rows stay inline.
pub type GridRow = SmallVec<[GridCell; 8]>;

/// Where an item was placed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GridPlacement {
    /// Line holding the origin cell.
    pub line: usize,
    /// Track holding the origin cell.
    pub track: usize,
    /// Sanitized span of the item.
    pub span: GridSpan,
}

impl GridPlacement {
    /// Last line the item covers.
    #[inline]
    pub fn last_line(&self) -> usize {
        self.line + self.span.main - 1
    }

    /// Returns true if the item covers `line`.
    #[inline]
    pub fn covers_line(&self, line: usize) -> bool {
        line >= self.line && line <= self.last_line()
    }
}

/// Line/track occupancy of every item placed so far.
///
/// `rows` may run ahead of `closed_lines`: a tall item placed on line `L`
/// reserves continuation cells on the lines after it, but those lines are
/// only *closed* once the filler has tried to put items on them.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GridMatrix {
    cross_count: usize,
    rows: Vec<GridRow>,
    closed_lines: usize,
    placements: Vec<GridPlacement>,
}

impl GridMatrix {
    pub fn new(cross_count: usize) -> Self {
        Self {
            cross_count: cross_count.max(1),
            ..Default::default()
        }
    }

    /// Number of tracks on the cross axis.
    #[inline]
    pub fn cross_count(&self) -> usize {
        self.cross_count
    }

    /// Number of closed (fully filled) lines.
    #[inline]
    pub fn line_count(&self) -> usize {
        self.closed_lines
    }

    /// Number of items that have a cell.
    #[inline]
    pub fn placed_count(&self) -> usize {
        self.placements.len()
    }

    /// Returns true once every item is placed and every reserved line is closed.
    pub fn is_complete(&self, items_count: usize) -> bool {
        self.placements.len() >= items_count && self.rows.len() <= self.closed_lines
    }

    /// Clears everything and switches to `cross_count` tracks.
    pub fn reset(&mut self, cross_count: usize) {
        self.cross_count = cross_count.max(1);
        self.rows.clear();
        self.closed_lines = 0;
        self.placements.clear();
    }

    /// Returns the closed row at `line`.
    pub fn row(&self, line: usize) -> Option<&[GridCell]> {
        if line < self.closed_lines {
            self.rows.get(line).map(|row| row.as_slice())
        } else {
            None
        }
    }

    /// Returns the cell at `(line, track)`, or `Empty` outside the matrix.
    pub fn cell(&self, line: usize, track: usize) -> GridCell {
        self.rows
            .get(line)
            .and_then(|row| row.get(track))
            .copied()
            .unwrap_or_default()
    }

    /// Returns the placement of `index` if it has been placed.
    #[inline]
    pub fn placement(&self, index: usize) -> Option<GridPlacement> {
        self.placements.get(index).copied()
    }

    /// Returns the origin line of `index` if it has been placed.
    #[inline]
    pub fn line_of(&self, index: usize) -> Option<usize> {
        self.placements.get(index).map(|p| p.line)
    }

    /// Lowest item index whose origin cell is on `line`.
    pub fn first_item_on_line(&self, line: usize) -> Option<usize> {
        self.row(line)?
            .iter()
            .filter_map(|cell| match cell {
                GridCell::Item(index) => Some(*index),
                _ => None,
            })
            .min()
    }

    /// Distinct items covering `line` (origins and continuations), ascending.
    pub fn items_on_line(&self, line: usize) -> SmallVec<[usize; 8]> {
        let mut items: SmallVec<[usize; 8]> = SmallVec::new();
        if let Some(row) = self.row(line) {
            for index in row.iter().filter_map(GridCell::item_index) {
                if !items.contains(&index) {
                    items.push(index);
                }
            }
        }
        items.sort_unstable();
        items
    }

    /// Closes the next line, placing as many items on it as fit.
    ///
    /// Returns the index of the closed line, or `None` once every item is
    /// placed and no reserved line remains.
    pub fn fill_line<P>(&mut self, provider: &P) -> Option<usize>
    where
        P: GridItemProvider + ?Sized,
    {
        let items_count = provider.item_count();
        let line = self.closed_lines;
        if self.placements.len() >= items_count && self.rows.len() <= line {
            return None;
        }
        self.ensure_rows(line + 1);

        let mut cursor = 0;
        while self.placements.len() < items_count {
            let index = self.placements.len();
            let requested = provider.span(index);
            let span = requested.sanitized(self.cross_count);
            if span != requested {
                log::debug!(
                    "LazyGrid: item {} span {}x{} adjusted to {}x{} for {} tracks",
                    index,
                    requested.main,
                    requested.cross,
                    span.main,
                    span.cross,
                    self.cross_count
                );
            }
            match self.find_run(line, cursor, span) {
                Some(track) => {
                    self.place(index, line, track, span);
                    cursor = track + span.cross;
                }
                None => break,
            }
        }

        self.closed_lines += 1;
        Some(line)
    }

    /// Fills lines until `line` is closed. Returns false if the items ran out first.
    pub fn fill_to_line<P>(&mut self, line: usize, provider: &P) -> bool
    where
        P: GridItemProvider + ?Sized,
    {
        while self.closed_lines <= line {
            if self.fill_line(provider).is_none() {
                return false;
            }
        }
        true
    }

    /// Fills lines until `index` is placed and returns its origin line.
    pub fn fill_to_item<P>(&mut self, index: usize, provider: &P) -> Option<usize>
    where
        P: GridItemProvider + ?Sized,
    {
        if index >= provider.item_count() {
            return None;
        }
        while self.placements.len() <= index {
            self.fill_line(provider)?;
        }
        self.line_of(index)
    }

    /// Discards the line holding `index` and every line after it.
    ///
    /// The cut walks back past spanning items that reach into the line from
    /// above, so no surviving item loses cells. Returns the first discarded
    /// line, or `None` if `index` was never placed.
    pub fn truncate_from_item(&mut self, index: usize) -> Option<usize> {
        let mut line = self.line_of(index)?;
        loop {
            let reaching_from = self.rows.get(line).and_then(|row| {
                row.iter()
                    .filter_map(GridCell::item_index)
                    .filter_map(|origin| self.line_of(origin))
                    .filter(|&origin_line| origin_line < line)
                    .min()
            });
            match reaching_from {
                Some(earlier) => line = earlier,
                None => break,
            }
        }

        let first_item = self
            .rows
            .get(line)
            .and_then(|row| {
                row.iter()
                    .filter_map(|cell| match cell {
                        GridCell::Item(index) => Some(*index),
                        _ => None,
                    })
                    .min()
            })
            .unwrap_or(index);

        self.placements.truncate(first_item);
        self.rows.truncate(line);
        self.closed_lines = self.closed_lines.min(line);
        Some(line)
    }

    fn ensure_rows(&mut self, count: usize) {
        while self.rows.len() < count {
            self.rows.push(smallvec![GridCell::Empty; self.cross_count]);
        }
    }

    /// First track at or after `from` where `span` fits on every covered line.
    fn find_run(&self, line: usize, from: usize, span: GridSpan) -> Option<usize> {
        let last_start = self.cross_count.checked_sub(span.cross)?;
        (from..=last_start).find(|&track| self.is_region_empty(line, track, span))
    }

    fn is_region_empty(&self, line: usize, track: usize, span: GridSpan) -> bool {
        (line..line + span.main)
            .all(|l| (track..track + span.cross).all(|t| self.cell(l, t).is_empty()))
    }

    fn place(&mut self, index: usize, line: usize, track: usize, span: GridSpan) {
        self.ensure_rows(line + span.main);
        for l in line..line + span.main {
            for t in track..track + span.cross {
                self.rows[l][t] = if l == line && t == track {
                    GridCell::Item(index)
                } else {
                    GridCell::Continuation(index)
                };
            }
        }
        self.placements.push(GridPlacement { line, track, span });
    }
}
