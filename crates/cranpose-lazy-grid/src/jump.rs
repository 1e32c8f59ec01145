//! Jump and alignment resolution for lazy grids.
//!
//! Turns "bring item X to alignment Y" into an anchor for the window solver
//! (`JumpTo`) or into the delta an animation should travel (`AnimateTo`).

use crate::constraints::Constraints;
use crate::item_measurer::GridItemMeasurer;
use crate::item_provider::GridItemProvider;
use crate::state::ScrollAlign;
use crate::window::LineAnchor;

/// Where the target's leading line should sit, or `None` to stay put.
struct JumpTarget {
    line: usize,
    position: f32,
}

/// Resolves a jump to `index` into a new window anchor.
///
/// `current` is the anchor the window had before the jump; it is returned
/// unchanged when `Auto` finds the item already fully visible or the grid is
/// empty.
pub(crate) fn resolve_jump<P, F>(
    measurer: &mut GridItemMeasurer<'_, P, F>,
    current: LineAnchor,
    index: usize,
    align: ScrollAlign,
    extra_offset: f32,
    main_size: f32,
) -> LineAnchor
where
    P: GridItemProvider + ?Sized,
    F: FnMut(usize, Constraints) -> f32,
{
    match target(measurer, current, index, align, main_size) {
        Some(target) => LineAnchor::new(target.line, target.position + extra_offset),
        None => current,
    }
}

/// Delta that brings `index` into place from `current` without moving anything.
///
/// Lines between the window and the target that were never measured count as
/// the average line height.
pub(crate) fn animate_delta<P, F>(
    measurer: &mut GridItemMeasurer<'_, P, F>,
    current: LineAnchor,
    index: usize,
    align: ScrollAlign,
    main_size: f32,
) -> f32
where
    P: GridItemProvider + ?Sized,
    F: FnMut(usize, Constraints) -> f32,
{
    match target(measurer, current, index, align, main_size) {
        Some(target) => target.position - line_position(measurer, current, target.line),
        None => 0.0,
    }
}

fn target<P, F>(
    measurer: &mut GridItemMeasurer<'_, P, F>,
    current: LineAnchor,
    index: usize,
    align: ScrollAlign,
    main_size: f32,
) -> Option<JumpTarget>
where
    P: GridItemProvider + ?Sized,
    F: FnMut(usize, Constraints) -> f32,
{
    let items_count = measurer.items_count();
    if items_count == 0 {
        return None;
    }
    let clamped = index.min(items_count - 1);
    if clamped != index {
        log::debug!(
            "LazyGrid: scroll target {} out of range, using {}",
            index,
            clamped
        );
    }
    let line = measurer.ensure_item(clamped)?;
    let extent = measurer.item_extent(clamped).unwrap_or(0.0);

    let align = match align {
        ScrollAlign::Auto => {
            let position = line_position(measurer, current, line);
            if position >= 0.0 && position + extent <= main_size {
                return None;
            } else if position < 0.0 {
                ScrollAlign::Start
            } else {
                ScrollAlign::End
            }
        }
        other => other,
    };
    let align = feasible_align(measurer, clamped, line, extent, align, main_size);

    let position = match align {
        ScrollAlign::Start | ScrollAlign::Auto => 0.0,
        ScrollAlign::End => main_size - extent,
        ScrollAlign::Center => (main_size - extent) / 2.0,
    };
    log::trace!(
        "LazyGrid: target {} on line {} aligned {:?} at {}",
        clamped,
        line,
        align,
        position
    );
    Some(JumpTarget { line, position })
}

/// Downgrades an alignment the content cannot satisfy.
///
/// `Center` becomes `Start` without enough content before the item, or
/// `End` without enough after it. `End` becomes `Start` when all content is
/// shorter than the viewport.
fn feasible_align<P, F>(
    measurer: &mut GridItemMeasurer<'_, P, F>,
    index: usize,
    line: usize,
    extent: f32,
    align: ScrollAlign,
    main_size: f32,
) -> ScrollAlign
where
    P: GridItemProvider + ?Sized,
    F: FnMut(usize, Constraints) -> f32,
{
    let mut align = align;
    if align == ScrollAlign::Center {
        let needed = (main_size - extent) / 2.0;
        if content_before(measurer, line, needed) < needed {
            log::debug!("LazyGrid: cannot center item {}, aligning to start", index);
            return ScrollAlign::Start;
        }
        if content_after(measurer, index, needed) < needed {
            log::debug!("LazyGrid: cannot center item {}, aligning to end", index);
            align = ScrollAlign::End;
        }
    }
    if align == ScrollAlign::End && content_shorter_than(measurer, main_size) {
        log::debug!("LazyGrid: content shorter than viewport, aligning item {} to start", index);
        return ScrollAlign::Start;
    }
    align
}

/// Content before `line`, walking back until `limit` is reached.
fn content_before<P, F>(measurer: &mut GridItemMeasurer<'_, P, F>, line: usize, limit: f32) -> f32
where
    P: GridItemProvider + ?Sized,
    F: FnMut(usize, Constraints) -> f32,
{
    let gap = measurer.line_gap();
    let mut content = 0.0;
    let mut l = line;
    while l > 0 && content < limit {
        l -= 1;
        content += measurer.line_height(l).unwrap_or(0.0) + gap;
    }
    content
}

/// Content after the last line of `index`, walking forward until `limit` is reached.
fn content_after<P, F>(measurer: &mut GridItemMeasurer<'_, P, F>, index: usize, limit: f32) -> f32
where
    P: GridItemProvider + ?Sized,
    F: FnMut(usize, Constraints) -> f32,
{
    let Some(placement) = measurer.matrix().placement(index) else {
        return 0.0;
    };
    let gap = measurer.line_gap();
    let mut content = 0.0;
    let mut l = placement.last_line() + 1;
    while content < limit {
        let Some(height) = measurer.line_height(l) else {
            break;
        };
        content += gap + height;
        l += 1;
    }
    content
}

fn content_shorter_than<P, F>(measurer: &mut GridItemMeasurer<'_, P, F>, main_size: f32) -> bool
where
    P: GridItemProvider + ?Sized,
    F: FnMut(usize, Constraints) -> f32,
{
    let gap = measurer.line_gap();
    let mut content = 0.0;
    let mut line = 0;
    while let Some(height) = measurer.line_height(line) {
        if line > 0 {
            content += gap;
        }
        content += height;
        if content >= main_size {
            return false;
        }
        line += 1;
    }
    true
}

/// Current leading edge of `line` relative to the viewport, as seen from `anchor`.
pub(crate) fn line_position<P, F>(
    measurer: &GridItemMeasurer<'_, P, F>,
    anchor: LineAnchor,
    line: usize,
) -> f32
where
    P: GridItemProvider + ?Sized,
    F: FnMut(usize, Constraints) -> f32,
{
    if line >= anchor.line {
        anchor.offset + measurer.estimated_distance(anchor.line, line)
    } else {
        anchor.offset - measurer.estimated_distance(line, anchor.line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GridMeasureConfig;
    use crate::item_provider::UniformGridItems;
    use crate::line_heights::LineHeightCache;
    use crate::matrix::GridMatrix;

    fn jump(
        count: usize,
        current: LineAnchor,
        index: usize,
        align: ScrollAlign,
        main_size: f32,
    ) -> LineAnchor {
        let items = UniformGridItems::new(count);
        let config = GridMeasureConfig::default();
        let mut matrix = GridMatrix::new(2);
        let mut heights = LineHeightCache::new();
        let mut measurer =
            GridItemMeasurer::new(&mut matrix, &mut heights, &items, &config, |_, _| 100.0);
        resolve_jump(&mut measurer, current, index, align, 0.0, main_size)
    }

    #[test]
    fn start_puts_line_at_leading_edge() {
        let anchor = jump(100, LineAnchor::new(0, 0.0), 90, ScrollAlign::Start, 250.0);
        assert_eq!(anchor, LineAnchor::new(45, 0.0));
    }

    #[test]
    fn end_puts_line_at_trailing_edge() {
        let anchor = jump(100, LineAnchor::new(0, 0.0), 90, ScrollAlign::End, 250.0);
        assert_eq!(anchor, LineAnchor::new(45, 150.0));
    }

    #[test]
    fn center_uses_midpoint() {
        let anchor = jump(100, LineAnchor::new(0, 0.0), 40, ScrollAlign::Center, 300.0);
        assert_eq!(anchor, LineAnchor::new(20, 100.0));
    }

    #[test]
    fn center_near_start_downgrades_to_start() {
        let anchor = jump(100, LineAnchor::new(10, 0.0), 0, ScrollAlign::Center, 300.0);
        assert_eq!(anchor, LineAnchor::new(0, 0.0));
    }

    #[test]
    fn center_near_end_downgrades_to_end() {
        // 50 lines; the last line has nothing after it.
        let anchor = jump(100, LineAnchor::new(0, 0.0), 99, ScrollAlign::Center, 300.0);
        assert_eq!(anchor, LineAnchor::new(49, 200.0));
    }

    #[test]
    fn end_with_short_content_downgrades_to_start() {
        let anchor = jump(4, LineAnchor::new(0, 0.0), 3, ScrollAlign::End, 500.0);
        assert_eq!(anchor, LineAnchor::new(1, 0.0));
    }

    #[test]
    fn auto_keeps_visible_item_and_moves_hidden_one() {
        let current = LineAnchor::new(10, 0.0);
        assert_eq!(jump(100, current, 21, ScrollAlign::Auto, 300.0), current);
        assert_eq!(
            jump(100, current, 2, ScrollAlign::Auto, 300.0),
            LineAnchor::new(1, 0.0)
        );
        assert_eq!(
            jump(100, current, 60, ScrollAlign::Auto, 300.0),
            LineAnchor::new(30, 200.0)
        );
    }

    #[test]
    fn out_of_range_index_is_clamped() {
        let anchor = jump(10, LineAnchor::new(0, 0.0), 500, ScrollAlign::Start, 250.0);
        assert_eq!(anchor, LineAnchor::new(4, 0.0));
    }

    #[test]
    fn animate_reports_distance_to_target() {
        let items = UniformGridItems::new(100);
        let config = GridMeasureConfig::default();
        let mut matrix = GridMatrix::new(2);
        let mut heights = LineHeightCache::new();
        let mut measurer =
            GridItemMeasurer::new(&mut matrix, &mut heights, &items, &config, |_, _| 100.0);
        measurer.line_height(0);
        let delta = animate_delta(
            &mut measurer,
            LineAnchor::new(0, 0.0),
            20,
            ScrollAlign::Start,
            300.0,
        );
        assert_eq!(delta, -1000.0);
    }
}
