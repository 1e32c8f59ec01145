//! Skip-ahead estimation for large scroll deltas.
//!
//! When a delta travels past every measured line by more than a viewport,
//! measuring each line on the way would cost O(distance). Instead the landing
//! line is estimated from the average line height and the delta becomes a
//! jump; the window solver then measures only the lines around the landing
//! point. Skipped lines are still placed, which only queries spans.

use crate::constraints::Constraints;
use crate::item_measurer::GridItemMeasurer;
use crate::item_provider::GridItemProvider;
use crate::state::{GridCommand, ScrollAlign};
use crate::window::LineAnchor;

/// Tries to turn a forward (negative) delta into a jump.
///
/// `anchor` is the window anchor with the delta already applied.
pub(crate) fn skip_forward<P, F>(
    measurer: &mut GridItemMeasurer<'_, P, F>,
    anchor: LineAnchor,
    main_size: f32,
) -> Option<GridCommand>
where
    P: GridItemProvider + ?Sized,
    F: FnMut(usize, Constraints) -> f32,
{
    let gap = measurer.line_gap();
    let mut line = anchor.line;
    let mut offset = anchor.offset;
    while let Some(height) = measurer.cached_height(line) {
        if offset + height > 0.0 {
            return None;
        }
        offset += height + gap;
        line += 1;
    }

    let remaining = -offset;
    if remaining <= main_size || !measurer.ensure_line(line) {
        return None;
    }
    let stride = measurer.average_line_height() + gap;
    if stride <= 0.0 {
        return None;
    }

    let mut target = line + (remaining / stride).floor() as usize;
    if !measurer.ensure_line(target) {
        target = measurer.matrix().line_count().saturating_sub(1);
    }
    let leftover = remaining - (target - line) as f32 * stride;
    let (origin_line, index) = landing_item(measurer, target)?;
    let leftover = leftover + (target - origin_line) as f32 * stride;

    log::debug!(
        "LazyGrid: skipping {} lines forward to line {} (item {}), leftover {}",
        origin_line - anchor.line,
        origin_line,
        index,
        leftover
    );
    Some(GridCommand::JumpTo {
        index,
        align: ScrollAlign::Start,
        extra_offset: -leftover,
    })
}

/// Tries to turn a backward (positive) delta into a jump.
///
/// `anchor` is the window anchor with the delta already applied.
pub(crate) fn skip_backward<P, F>(
    measurer: &mut GridItemMeasurer<'_, P, F>,
    anchor: LineAnchor,
    main_size: f32,
) -> Option<GridCommand>
where
    P: GridItemProvider + ?Sized,
    F: FnMut(usize, Constraints) -> f32,
{
    let gap = measurer.line_gap();
    let mut line = anchor.line;
    let mut offset = anchor.offset;
    while offset - gap > 0.0 && line > 0 {
        let Some(height) = measurer.cached_height(line - 1) else {
            break;
        };
        line -= 1;
        offset -= height + gap;
    }

    if offset <= main_size || line == 0 {
        return None;
    }
    let stride = measurer.average_line_height() + gap;
    if stride <= 0.0 {
        return None;
    }

    let lines = ((offset - main_size) / stride).floor() as usize + 1;
    if lines >= line {
        log::debug!("LazyGrid: skipping {} lines back reaches the first line", lines);
        return Some(GridCommand::JumpTo {
            index: 0,
            align: ScrollAlign::Start,
            extra_offset: 0.0,
        });
    }

    let target = line - lines;
    let (origin_line, index) = landing_item(measurer, target)?;
    let leading_edge = offset - (line - origin_line) as f32 * stride;
    let span_lines = measurer
        .matrix()
        .placement(index)
        .map_or(1, |placement| placement.span.main);
    let estimated_extent = span_lines as f32 * stride - gap;
    let extra_offset = leading_edge + estimated_extent - main_size;

    log::debug!(
        "LazyGrid: skipping {} lines back to line {} (item {}), extra offset {}",
        line - origin_line,
        origin_line,
        index,
        extra_offset
    );
    Some(GridCommand::JumpTo {
        index,
        align: ScrollAlign::End,
        extra_offset,
    })
}

/// First item whose origin is on the earliest line reaching into `line`.
///
/// A line holding only continuations lands on the line of the spanning item.
fn landing_item<P, F>(measurer: &GridItemMeasurer<'_, P, F>, line: usize) -> Option<(usize, usize)>
where
    P: GridItemProvider + ?Sized,
    F: FnMut(usize, Constraints) -> f32,
{
    let matrix = measurer.matrix();
    let covering = *matrix.items_on_line(line).first()?;
    let origin_line = matrix.line_of(covering)?;
    let index = matrix.first_item_on_line(origin_line)?;
    Some((origin_line, index))
}
