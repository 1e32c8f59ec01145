//! Item provider trait for lazy grids.
//!
//! This module defines the [`GridItemProvider`] trait which tells the grid how
//! many items exist and how many lines/tracks each one spans. Measurement is
//! a separate callback handed to [`measure_lazy_grid`](crate::measure_lazy_grid).

/// Number of lines (main axis) and tracks (cross axis) an item occupies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct GridSpan {
    /// Lines covered along the main axis.
    pub main: usize,
    /// Tracks covered along the cross axis.
    pub cross: usize,
}

impl Default for GridSpan {
    fn default() -> Self {
        Self::SINGLE
    }
}

impl GridSpan {
    /// A regular 1×1 item.
    pub const SINGLE: GridSpan = GridSpan { main: 1, cross: 1 };

    /// Creates a span of `main` lines by `cross` tracks.
    pub const fn new(main: usize, cross: usize) -> Self {
        Self { main, cross }
    }

    /// An item covering `cross` tracks on a single line.
    pub const fn cross(cross: usize) -> Self {
        Self { main: 1, cross }
    }

    /// An item covering `main` lines in a single track.
    pub const fn main(main: usize) -> Self {
        Self { main, cross: 1 }
    }

    /// Returns true if the item covers more than one cell.
    pub fn is_irregular(&self) -> bool {
        self.main > 1 || self.cross > 1
    }

    /// Raises zero spans to one and clamps the cross span to `cross_count`.
    pub(crate) fn sanitized(self, cross_count: usize) -> Self {
        let cross_count = cross_count.max(1);
        Self {
            main: self.main.max(1),
            cross: self.cross.clamp(1, cross_count),
        }
    }
}

/// Provides the item facts a lazy grid needs before measuring anything.
///
/// This follows the shape of `LazyLayoutItemProvider`: the count is mandatory,
/// everything else has a default. Grids whose items never span more than one
/// cell don't need to override [`span`](Self::span).
pub trait GridItemProvider {
    /// The total number of items in the grid (visible or not).
    fn item_count(&self) -> usize;

    /// Returns the span of the item at `index`.
    ///
    /// Defaults to a regular 1×1 item.
    fn span(&self, index: usize) -> GridSpan {
        let _ = index;
        GridSpan::SINGLE
    }
}

/// A provider where every item is a regular 1×1 cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct UniformGridItems {
    count: usize,
}

impl UniformGridItems {
    pub fn new(count: usize) -> Self {
        Self { count }
    }
}

impl GridItemProvider for UniformGridItems {
    fn item_count(&self) -> usize {
        self.count
    }
}

/// A provider backed by a span lookup closure.
pub struct SpannedGridItems<F> {
    count: usize,
    span_of: F,
}

impl<F> SpannedGridItems<F>
where
    F: Fn(usize) -> GridSpan,
{
    pub fn new(count: usize, span_of: F) -> Self {
        Self { count, span_of }
    }
}

impl<F> GridItemProvider for SpannedGridItems<F>
where
    F: Fn(usize) -> GridSpan,
{
    fn item_count(&self) -> usize {
        self.count
    }

    fn span(&self, index: usize) -> GridSpan {
        (self.span_of)(index)
    }
}
