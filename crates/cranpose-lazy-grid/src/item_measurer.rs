//! Line measurement for lazy grids.
//!
//! [`GridItemMeasurer`] is the per-pass view of the persistent matrix and
//! height cache. It places lines on demand, measures the items terminating on
//! a line when that line's height is first needed, and memoizes every item
//! length for the rest of the pass.

use std::collections::HashMap;

use crate::config::GridMeasureConfig;
use crate::constraints::Constraints;
use crate::item_provider::GridItemProvider;
use crate::line_heights::LineHeightCache;
use crate::matrix::GridMatrix;

/// Maximum lines to measure per pass as a safety limit.
///
/// Guards against zero-height content, where filling a viewport would
/// otherwise measure every line of the grid. Only the window solver's
/// advance and fill loops stop at the cap; every other walk is bounded by
/// the viewport or an item's span.
pub(crate) const MAX_LINES_PER_PASS: usize = 10_000;

pub(crate) struct GridItemMeasurer<'a, P: ?Sized, F> {
    matrix: &'a mut GridMatrix,
    heights: &'a mut LineHeightCache,
    provider: &'a P,
    config: &'a GridMeasureConfig,
    measure_fn: F,
    lengths: HashMap<usize, f32>,
    lines_measured: usize,
}

impl<'a, P, F> GridItemMeasurer<'a, P, F>
where
    P: GridItemProvider + ?Sized,
    F: FnMut(usize, Constraints) -> f32,
{
    pub fn new(
        matrix: &'a mut GridMatrix,
        heights: &'a mut LineHeightCache,
        provider: &'a P,
        config: &'a GridMeasureConfig,
        measure_fn: F,
    ) -> Self {
        Self {
            matrix,
            heights,
            provider,
            config,
            measure_fn,
            lengths: HashMap::new(),
            lines_measured: 0,
        }
    }

    #[inline]
    pub fn items_count(&self) -> usize {
        self.provider.item_count()
    }

    #[inline]
    pub fn config(&self) -> &GridMeasureConfig {
        self.config
    }

    #[inline]
    pub fn line_gap(&self) -> f32 {
        self.config.line_gap()
    }

    #[inline]
    pub fn matrix(&self) -> &GridMatrix {
        &*self.matrix
    }

    /// Number of items measured so far in this pass.
    #[inline]
    pub fn items_measured(&self) -> usize {
        self.lengths.len()
    }

    #[inline]
    pub fn lines_measured(&self) -> usize {
        self.lines_measured
    }

    /// Returns true once the per-pass line budget is spent.
    #[inline]
    pub fn is_over_budget(&self) -> bool {
        self.lines_measured >= MAX_LINES_PER_PASS
    }

    #[inline]
    pub fn average_line_height(&self) -> f32 {
        self.heights.average_or_default()
    }

    /// Number of lines in the height cache and the sum of their heights.
    #[inline]
    pub fn measured_lines(&self) -> (usize, f32) {
        (self.heights.len(), self.heights.total())
    }

    /// Places lines until `line` exists. Returns false past the last line.
    pub fn ensure_line(&mut self, line: usize) -> bool {
        self.matrix.fill_to_line(line, self.provider)
    }

    /// Places lines until `index` has a cell and returns its origin line.
    pub fn ensure_item(&mut self, index: usize) -> Option<usize> {
        self.matrix.fill_to_item(index, self.provider)
    }

    /// Height of `line` if it is already known, without measuring.
    #[inline]
    pub fn cached_height(&self, line: usize) -> Option<f32> {
        self.heights.get(line)
    }

    /// Height of `line`, placing and measuring it if needed.
    ///
    /// Returns `None` if the grid has no such line.
    pub fn line_height(&mut self, line: usize) -> Option<f32> {
        if let Some(height) = self.heights.get(line) {
            return Some(height);
        }
        if !self.ensure_line(line) {
            return None;
        }
        self.measure_lines_through(line);
        self.heights.get(line)
    }

    /// Main-axis length of an item, measuring it once per pass.
    pub fn item_length(&mut self, index: usize) -> f32 {
        if let Some(&length) = self.lengths.get(&index) {
            return length;
        }
        let Some(placement) = self.matrix.placement(index) else {
            return 0.0;
        };
        let cross_size = self.config.tracks.span_size(
            placement.track,
            placement.span.cross,
            self.config.track_gap(),
        );
        let constraints = Constraints::for_cell(self.config.axis, cross_size);
        let raw = (self.measure_fn)(index, constraints);
        let length = if raw.is_finite() && raw >= 0.0 {
            raw
        } else {
            log::warn!(
                "LazyGrid: item {} measured to invalid length {}, using 0",
                index,
                raw
            );
            0.0
        };
        self.lengths.insert(index, length);
        length
    }

    /// Main-axis extent of the lines an item spans, inner gaps included.
    pub fn item_extent(&mut self, index: usize) -> Option<f32> {
        let placement = self.matrix.placement(index)?;
        let gap = self.line_gap();
        let mut extent = 0.0;
        for line in placement.line..=placement.last_line() {
            if line > placement.line {
                extent += gap;
            }
            extent += self.line_height(line)?;
        }
        Some(extent)
    }

    /// Distance from the leading edge of `from` to the leading edge of `to`.
    ///
    /// Measures every line in between. `from` must not be after `to`.
    pub fn distance(&mut self, from: usize, to: usize) -> f32 {
        let gap = self.line_gap();
        let mut distance = 0.0;
        for line in from..to {
            distance += self.line_height(line).unwrap_or(0.0) + gap;
        }
        distance
    }

    /// Like [`distance`](Self::distance), but unmeasured lines count as the
    /// average height instead of being measured.
    pub fn estimated_distance(&self, from: usize, to: usize) -> f32 {
        let gap = self.line_gap();
        let average = self.average_line_height();
        (from..to)
            .map(|line| self.heights.get(line).unwrap_or(average) + gap)
            .sum()
    }

    /// Measures `line` and any earlier line it depends on.
    ///
    /// A line's height depends on every line spanned by the items ending on
    /// it, so the range is widened back to the earliest such origin first.
    fn measure_lines_through(&mut self, line: usize) {
        let mut first = line;
        loop {
            let mut reach = first;
            for l in first..=line {
                if self.heights.contains(l) {
                    continue;
                }
                for index in self.matrix.items_on_line(l) {
                    if let Some(placement) = self.matrix.placement(index) {
                        if placement.last_line() == l {
                            reach = reach.min(placement.line);
                        }
                    }
                }
            }
            if reach == first {
                break;
            }
            first = reach;
        }

        for l in first..=line {
            if !self.heights.contains(l) {
                self.measure_line(l);
            }
        }
    }

    fn measure_line(&mut self, line: usize) {
        let gap = self.line_gap();
        let mut height: f32 = 0.0;
        for index in self.matrix.items_on_line(line) {
            let Some(placement) = self.matrix.placement(index) else {
                continue;
            };
            if placement.last_line() != line {
                continue;
            }
            let length = self.item_length(index);
            let earlier: f32 = (placement.line..line)
                .map(|l| self.heights.get(l).unwrap_or(0.0) + gap)
                .sum();
            height = height.max(length - earlier);
        }

        self.lines_measured += 1;
        if self.lines_measured == MAX_LINES_PER_PASS {
            log::warn!(
                "LazyGrid: measured {} lines in one pass, the window stops growing here. \
                 Items may have zero or near-zero size.",
                MAX_LINES_PER_PASS
            );
        }
        let height = self.heights.raise(line, height);
        log::trace!("LazyGrid: line {} measured to {}", line, height);
    }
}
