//! Viewport window solving.
//!
//! A window is described by an anchor: a line and the offset of its leading
//! edge relative to the viewport's leading edge. The solvers normalize the
//! anchor so it names the first line touching the viewport, then fill lines
//! forward until the viewport is covered.

use crate::constraints::Constraints;
use crate::item_measurer::GridItemMeasurer;
use crate::item_provider::GridItemProvider;

/// Leading edge of `line` at `offset` from the viewport's leading edge.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct LineAnchor {
    pub line: usize,
    pub offset: f32,
}

impl LineAnchor {
    pub fn new(line: usize, offset: f32) -> Self {
        Self { line, offset }
    }

    pub fn shifted(self, delta: f32) -> Self {
        Self {
            line: self.line,
            offset: self.offset + delta,
        }
    }
}

/// Lines covering the viewport after a solve.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct GridWindow {
    /// First line touching the viewport and its leading edge.
    pub first: LineAnchor,
    /// Last line touching the viewport.
    pub last_line: usize,
    /// Trailing edge of `last_line`.
    pub trailing_edge: f32,
    /// The last line of the grid is inside the window.
    pub reach_end: bool,
    /// The end was reached and the last line's trailing edge is inside the viewport.
    pub offset_end: bool,
}

impl GridWindow {
    pub fn reach_start(&self) -> bool {
        self.first.line == 0 && self.first.offset >= 0.0
    }
}

/// Solves the window after a negative (forward) delta.
pub(crate) fn measure_forward<P, F>(
    measurer: &mut GridItemMeasurer<'_, P, F>,
    anchor: LineAnchor,
    main_size: f32,
) -> GridWindow
where
    P: GridItemProvider + ?Sized,
    F: FnMut(usize, Constraints) -> f32,
{
    let anchor = advance(measurer, anchor);
    let anchor = retreat(measurer, anchor);
    fill_and_clamp(measurer, anchor, main_size)
}

/// Solves the window after a positive (backward) delta.
///
/// Only lines that are already placed can be revealed above the anchor.
pub(crate) fn measure_backward<P, F>(
    measurer: &mut GridItemMeasurer<'_, P, F>,
    anchor: LineAnchor,
    main_size: f32,
) -> GridWindow
where
    P: GridItemProvider + ?Sized,
    F: FnMut(usize, Constraints) -> f32,
{
    let anchor = retreat(measurer, anchor);
    let anchor = advance(measurer, anchor);
    fill_and_clamp(measurer, anchor, main_size)
}

/// Recomputes the window for an unchanged offset (after a jump, a reset or a
/// property change).
pub(crate) fn measure_on_offset<P, F>(
    measurer: &mut GridItemMeasurer<'_, P, F>,
    anchor: LineAnchor,
    main_size: f32,
) -> GridWindow
where
    P: GridItemProvider + ?Sized,
    F: FnMut(usize, Constraints) -> f32,
{
    measure_backward(measurer, anchor, main_size)
}

/// Moves the anchor forward past lines that end at or above the viewport's
/// leading edge. The gap after a line never keeps it in the window.
fn advance<P, F>(measurer: &mut GridItemMeasurer<'_, P, F>, mut anchor: LineAnchor) -> LineAnchor
where
    P: GridItemProvider + ?Sized,
    F: FnMut(usize, Constraints) -> f32,
{
    let gap = measurer.line_gap();
    if !measurer.ensure_line(anchor.line) {
        let last = measurer.matrix().line_count().saturating_sub(1);
        log::debug!(
            "LazyGrid: anchor line {} no longer exists, using line {}",
            anchor.line,
            last
        );
        anchor = LineAnchor::new(last, 0.0);
    }
    while !measurer.is_over_budget() {
        let Some(height) = measurer.line_height(anchor.line) else {
            break;
        };
        if anchor.offset + height > 0.0 || !measurer.ensure_line(anchor.line + 1) {
            break;
        }
        anchor.offset += height + gap;
        anchor.line += 1;
    }
    anchor
}

/// Moves the anchor back while the previous line would still reach into the
/// viewport, stopping at line 0.
fn retreat<P, F>(measurer: &mut GridItemMeasurer<'_, P, F>, mut anchor: LineAnchor) -> LineAnchor
where
    P: GridItemProvider + ?Sized,
    F: FnMut(usize, Constraints) -> f32,
{
    let gap = measurer.line_gap();
    while anchor.offset - gap > 0.0 && anchor.line > 0 {
        anchor.line -= 1;
        let height = measurer.line_height(anchor.line).unwrap_or(0.0);
        anchor.offset -= height + gap;
    }
    if anchor.line == 0 && anchor.offset > 0.0 {
        anchor.offset = 0.0;
    }
    anchor
}

fn fill_and_clamp<P, F>(
    measurer: &mut GridItemMeasurer<'_, P, F>,
    anchor: LineAnchor,
    main_size: f32,
) -> GridWindow
where
    P: GridItemProvider + ?Sized,
    F: FnMut(usize, Constraints) -> f32,
{
    let mut window = fill(measurer, anchor, main_size);
    if window.reach_end && window.trailing_edge < main_size && !measurer.config().can_over_scroll {
        let shift = main_size - window.trailing_edge;
        log::trace!("LazyGrid: pinning last line, shifting window by {}", shift);
        let anchor = retreat(measurer, window.first.shifted(shift));
        window = fill(measurer, anchor, main_size);
    }
    window.offset_end = window.reach_end && window.trailing_edge <= main_size;
    window
}

fn fill<P, F>(
    measurer: &mut GridItemMeasurer<'_, P, F>,
    anchor: LineAnchor,
    main_size: f32,
) -> GridWindow
where
    P: GridItemProvider + ?Sized,
    F: FnMut(usize, Constraints) -> f32,
{
    let gap = measurer.line_gap();
    let mut last_line = anchor.line;
    let mut trailing_edge = anchor.offset;
    let mut leading_edge = anchor.offset;
    let mut line = anchor.line;
    loop {
        if measurer.is_over_budget() {
            break;
        }
        let Some(height) = measurer.line_height(line) else {
            break;
        };
        last_line = line;
        trailing_edge = leading_edge + height;
        leading_edge = trailing_edge + gap;
        line += 1;
        if leading_edge >= main_size {
            break;
        }
    }
    let reach_end = !measurer.ensure_line(last_line + 1);
    GridWindow {
        first: anchor,
        last_line,
        trailing_edge,
        reach_end,
        offset_end: false,
    }
}
