//! Core measurement algorithm for lazy grids.
//!
//! [`measure_lazy_grid`] runs one layout pass: it reconciles structural
//! changes, consumes the pending command or scroll delta, solves the window and
//! commits the realized range and per-item geometry back into the state.

use std::mem;

use web_time::{Duration, Instant};

use crate::config::GridMeasureConfig;
use crate::constraints::Constraints;
use crate::item_measurer::GridItemMeasurer;
use crate::item_provider::GridItemProvider;
use crate::jump;
use crate::measured_item::{GridMeasureMode, GridMeasureResult, GridMeasuredItem};
use crate::skip;
use crate::state::{GridCommand, GridLayoutState, ScrollAlign};
use crate::viewport::ViewportHandler;
use crate::window::{self, GridWindow, LineAnchor};

/// Passes slower than one 60 Hz frame are reported at debug level.
const FRAME_BUDGET: Duration = Duration::from_micros(16_667);

/// Measures a lazy grid and returns the items to place.
///
/// This is the main entry point for lazy grid layout. It:
/// 1. Resets placement when the track count or item count changed
/// 2. Consumes the pending jump/animate command or scroll delta
/// 3. Converts large deltas into estimated jumps
/// 4. Fills lines until the viewport is covered, pinning the end if needed
/// 5. Measures beyond-bounds lines for prefetching
/// 6. Commits the window to `state` and emits item geometry
///
/// # Arguments
/// * `state` - The grid's persistent layout state
/// * `provider` - Item count and span lookup
/// * `viewport_size` - Main-axis size of the viewport
/// * `config` - Orientation, gaps, tracks and scrolling options
/// * `measure_item` - Measures the item at an index under the given
///   constraints and returns its main-axis length
pub fn measure_lazy_grid<P, F>(
    state: &mut GridLayoutState,
    provider: &P,
    viewport_size: f32,
    config: &GridMeasureConfig,
    measure_item: F,
) -> GridMeasureResult
where
    P: GridItemProvider + ?Sized,
    F: FnMut(usize, Constraints) -> f32,
{
    let started = Instant::now();
    let items_count = provider.item_count();
    let cross_count = config.cross_count();

    // 1. Reconcile structural changes
    sync_structure(state, items_count, cross_count);

    // Empty list - reset scroll position to 0
    if items_count == 0 {
        if !state.command.is_none() {
            log::debug!("LazyGrid: dropping {:?} on empty grid", state.command);
        }
        state.command = GridCommand::None;
        state.pending_delta = 0.0;
        state.restored_anchor = None;
        state.start_index = 0;
        state.end_index = 0;
        state.start_main_line_index = 0;
        state.end_main_line_index = 0;
        state.current_offset = 0.0;
        state.reach_start = true;
        state.reach_end = true;
        state.offset_end = true;
        return GridMeasureResult {
            viewport_size,
            reach_start: true,
            reach_end: true,
            offset_end: true,
            ..Default::default()
        };
    }

    // Zero/negative viewport - preserve existing scroll state
    if viewport_size <= 0.0 || viewport_size.is_nan() {
        log::trace!("LazyGrid: no viewport ({}), keeping position", viewport_size);
        return GridMeasureResult {
            start_index: state.start_index,
            end_index: state.end_index,
            start_main_line_index: state.start_main_line_index,
            end_main_line_index: state.end_main_line_index,
            current_offset: state.current_offset,
            viewport_size,
            reach_start: state.reach_start,
            reach_end: state.reach_end,
            offset_end: state.offset_end,
            ..Default::default()
        };
    }

    // 2. Viewport handling - detect and handle infinite viewports
    let viewport = ViewportHandler::new(
        viewport_size,
        state.line_heights.average_or_default(),
        config.line_gap(),
    );
    let main_size = viewport.effective_size();
    log::trace!(
        "LazyGrid: measuring {} items in {} tracks, viewport {} (infinite: {})",
        items_count,
        cross_count,
        main_size,
        viewport.is_infinite()
    );

    // 3. Consume one-shot inputs
    let restored = state.restored_anchor.take();
    let command = mem::take(&mut state.command);
    let delta = mem::take(&mut state.pending_delta);
    let mut current = LineAnchor::new(state.start_main_line_index, state.current_offset);

    let mut measurer = GridItemMeasurer::new(
        &mut state.matrix,
        &mut state.line_heights,
        provider,
        config,
        measure_item,
    );

    // Put the anchor item back before any command sees the window
    if let Some((index, offset)) = restored {
        current = jump::resolve_jump(
            &mut measurer,
            current,
            index,
            ScrollAlign::Start,
            offset,
            main_size,
        );
    }

    // 4. Solve the window
    let (mode, window, target_delta) = match command {
        GridCommand::JumpTo {
            index,
            align,
            extra_offset,
        } => {
            if delta != 0.0 {
                log::debug!("LazyGrid: jump to {} discards scroll delta {}", index, delta);
            }
            let anchor = jump::resolve_jump(
                &mut measurer,
                current,
                index,
                align,
                extra_offset,
                main_size,
            );
            let window = window::measure_on_offset(&mut measurer, anchor, main_size);
            (GridMeasureMode::Jump, window, None)
        }
        GridCommand::AnimateTo { index, align } => {
            let (mode, window) = match restored {
                Some(_) => (
                    GridMeasureMode::Jump,
                    window::measure_on_offset(&mut measurer, current, main_size),
                ),
                None => scroll(&mut measurer, current, delta, main_size),
            };
            let target = jump::animate_delta(&mut measurer, window.first, index, align, main_size);
            (mode, window, Some(target))
        }
        GridCommand::None if restored.is_some() => {
            let window = window::measure_on_offset(&mut measurer, current, main_size);
            (GridMeasureMode::Jump, window, None)
        }
        GridCommand::None => {
            let (mode, window) = scroll(&mut measurer, current, delta, main_size);
            (mode, window, None)
        }
    };
    log::trace!("LazyGrid: {:?} pass, window {:?}", mode, window);

    // 5. Realized range
    let first = window.first;
    let (start_index, end_index) = realized_range(&measurer, &window);
    let start_main_line_index = measurer.matrix().line_of(start_index).unwrap_or(first.line);
    let current_offset = first.offset - measurer.distance(start_main_line_index, first.line);

    // 6. Beyond-bounds lines
    let mut prefetch_items = Vec::new();
    for line in window.last_line + 1..=window.last_line + config.beyond_bounds_line_count {
        if measurer.line_height(line).is_none() {
            break;
        }
        for index in measurer.matrix().items_on_line(line) {
            if index > end_index && !prefetch_items.contains(&index) {
                prefetch_items.push(index);
            }
        }
    }

    // 7. Geometry
    let visible_items = place_items(
        &mut measurer,
        config,
        start_index..=end_index,
        LineAnchor::new(start_main_line_index, current_offset),
        window.last_line,
        main_size,
    );

    let total_content_size = estimate_total_content_size(&measurer, items_count, cross_count);
    let items_measured = measurer.items_measured();
    let lines_measured = measurer.lines_measured();
    drop(measurer);

    // 8. Commit
    state.start_index = start_index;
    state.end_index = end_index;
    state.start_main_line_index = start_main_line_index;
    state.end_main_line_index = window.last_line;
    state.current_offset = current_offset;
    state.reach_start = window.reach_start();
    state.reach_end = window.reach_end;
    state.offset_end = window.offset_end;

    let elapsed = started.elapsed();
    log::trace!(
        "LazyGrid: items {}..={} lines {}..={} offset {} ({} items / {} lines measured in {:?})",
        start_index,
        end_index,
        start_main_line_index,
        window.last_line,
        current_offset,
        items_measured,
        lines_measured,
        elapsed
    );
    if elapsed > FRAME_BUDGET {
        log::debug!(
            "LazyGrid: slow {:?} pass took {:?} ({} items measured)",
            mode,
            elapsed,
            items_measured
        );
    }

    GridMeasureResult {
        visible_items,
        prefetch_items,
        start_index,
        end_index,
        start_main_line_index,
        end_main_line_index: window.last_line,
        current_offset,
        viewport_size: main_size,
        total_content_size,
        reach_start: state.reach_start,
        reach_end: state.reach_end,
        offset_end: state.offset_end,
        mode,
        target_delta,
    }
}

/// Applies `delta` to the window, skipping ahead when it travels far past
/// the measured lines.
fn scroll<P, F>(
    measurer: &mut GridItemMeasurer<'_, P, F>,
    current: LineAnchor,
    delta: f32,
    main_size: f32,
) -> (GridMeasureMode, GridWindow)
where
    P: GridItemProvider + ?Sized,
    F: FnMut(usize, Constraints) -> f32,
{
    let anchor = current.shifted(delta);
    if delta == 0.0 {
        return (
            GridMeasureMode::OnOffset,
            window::measure_on_offset(measurer, anchor, main_size),
        );
    }

    let skipped = if delta < 0.0 {
        skip::skip_forward(measurer, anchor, main_size)
    } else {
        skip::skip_backward(measurer, anchor, main_size)
    };
    if let Some(GridCommand::JumpTo {
        index,
        align,
        extra_offset,
    }) = skipped
    {
        let anchor = jump::resolve_jump(measurer, anchor, index, align, extra_offset, main_size);
        return (
            GridMeasureMode::Skip,
            window::measure_on_offset(measurer, anchor, main_size),
        );
    }

    if delta < 0.0 {
        (
            GridMeasureMode::Forward,
            window::measure_forward(measurer, anchor, main_size),
        )
    } else {
        (
            GridMeasureMode::Backward,
            window::measure_backward(measurer, anchor, main_size),
        )
    }
}

/// Lowest and highest item touching the window's lines.
fn realized_range<P, F>(
    measurer: &GridItemMeasurer<'_, P, F>,
    window: &GridWindow,
) -> (usize, usize)
where
    P: GridItemProvider + ?Sized,
    F: FnMut(usize, Constraints) -> f32,
{
    let matrix = measurer.matrix();
    let mut range: Option<(usize, usize)> = None;
    for line in window.first.line..=window.last_line {
        for index in matrix.items_on_line(line) {
            range = Some(match range {
                Some((start, end)) => (start.min(index), end.max(index)),
                None => (index, index),
            });
        }
    }
    range.unwrap_or((0, 0))
}

/// Emits geometry for every item in `range`.
///
/// `start` is the leading edge of the line holding the first item; every
/// other item in the range starts on that line or a later one up to `last_line`.
fn place_items<P, F>(
    measurer: &mut GridItemMeasurer<'_, P, F>,
    config: &GridMeasureConfig,
    range: std::ops::RangeInclusive<usize>,
    start: LineAnchor,
    last_line: usize,
    main_size: f32,
) -> Vec<GridMeasuredItem>
where
    P: GridItemProvider + ?Sized,
    F: FnMut(usize, Constraints) -> f32,
{
    let gap = config.line_gap();
    let track_gap = config.track_gap();

    let mut line_offsets = Vec::with_capacity(last_line.saturating_sub(start.line) + 1);
    let mut leading_edge = start.offset;
    for line in start.line..=last_line.max(start.line) {
        line_offsets.push(leading_edge);
        leading_edge += measurer.line_height(line).unwrap_or(0.0) + gap;
    }

    let mut items = Vec::with_capacity(range.clone().count());
    for index in range {
        let Some(placement) = measurer.matrix().placement(index) else {
            continue;
        };
        let main_offset = match line_offsets.get(placement.line.saturating_sub(start.line)) {
            Some(&offset) => offset,
            None => start.offset + measurer.distance(start.line, placement.line),
        };
        let main_axis_size = measurer.item_length(index);
        let main_axis_offset = if config.reverse_layout {
            main_size - main_offset - main_axis_size
        } else {
            main_offset
        };
        items.push(GridMeasuredItem {
            index,
            line: placement.line,
            track: placement.track,
            span: placement.span,
            main_axis_offset,
            cross_axis_offset: config.tracks.offset(placement.track, track_gap),
            main_axis_size,
            cross_axis_size: config
                .tracks
                .span_size(placement.track, placement.span.cross, track_gap),
            axis: config.axis,
        });
    }
    items
}

/// Estimates total content size from measured lines plus the average for the rest.
fn estimate_total_content_size<P, F>(
    measurer: &GridItemMeasurer<'_, P, F>,
    items_count: usize,
    cross_count: usize,
) -> f32
where
    P: GridItemProvider + ?Sized,
    F: FnMut(usize, Constraints) -> f32,
{
    let matrix = measurer.matrix();
    let cross_count = cross_count.max(1);
    let unplaced = items_count.saturating_sub(matrix.placed_count());
    let lines = matrix.line_count() + (unplaced + cross_count - 1) / cross_count;
    if lines == 0 {
        return 0.0;
    }
    let (measured, measured_total) = measurer.measured_lines();
    let unmeasured = lines.saturating_sub(measured);
    measured_total
        + unmeasured as f32 * measurer.average_line_height()
        + measurer.line_gap() * (lines - 1) as f32
}

/// Detects track-count and item-count changes and resets placement accordingly.
fn sync_structure(state: &mut GridLayoutState, items_count: usize, cross_count: usize) {
    let updated_from = state.children_updated_from.take();
    if !state.initialized {
        state.matrix.reset(cross_count);
        state.line_heights.clear();
        state.initialized = true;
    } else if state.cross_count != cross_count {
        log::debug!(
            "LazyGrid: track count changed {} -> {}, resetting placement",
            state.cross_count,
            cross_count
        );
        full_reset(state, items_count, cross_count);
    } else if let Some(from) = updated_from {
        partial_reset(state, items_count, from);
    } else if state.children_count != items_count {
        log::debug!(
            "LazyGrid: item count changed {} -> {}, resetting placement",
            state.children_count,
            items_count
        );
        full_reset(state, items_count, cross_count);
    }
    state.cross_count = cross_count;
    state.children_count = items_count;
}

fn full_reset(state: &mut GridLayoutState, items_count: usize, cross_count: usize) {
    state.matrix.reset(cross_count);
    state.line_heights.clear();
    restore_anchor_item(state, items_count);
}

/// Discards the lines from the first one touched by item `from`.
fn partial_reset(state: &mut GridLayoutState, items_count: usize, from: usize) {
    let placed = state.matrix.placed_count();
    let mut from = from.min(items_count);
    if state.children_count != items_count && placed > 0 {
        // The last line may have room for new items; reopen it.
        from = from.min(placed - 1);
    }
    if from >= placed {
        return;
    }
    let Some(line) = state.matrix.truncate_from_item(from) else {
        return;
    };
    state.line_heights.truncate(line);
    log::debug!(
        "LazyGrid: items from {} changed, discarding lines from {}",
        from,
        line
    );
    if line <= state.start_main_line_index {
        restore_anchor_item(state, items_count);
    }
}

/// Records the current start item so the visible content stays in place
/// after placement is rebuilt.
///
/// The anchor is applied at the start of the next window solve, before any
/// queued command, so `AnimateTo` and `Auto` jumps are resolved against the
/// restored window rather than the top of the grid.
fn restore_anchor_item(state: &mut GridLayoutState, items_count: usize) {
    // A reset during a pass that never solved a window keeps the earlier anchor.
    let (start_index, offset) = state
        .restored_anchor
        .take()
        .unwrap_or((state.start_index, state.current_offset));
    let anchor_offset = offset + mem::take(&mut state.pending_delta);
    state.start_main_line_index = 0;
    state.current_offset = 0.0;
    if items_count == 0 {
        state.restored_anchor = None;
        return;
    }
    let index = start_index.min(items_count - 1);
    log::debug!(
        "LazyGrid: restoring item {} at offset {} after reset",
        index,
        anchor_offset
    );
    state.restored_anchor = Some((index, anchor_offset));
}
