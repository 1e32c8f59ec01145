//! End-to-end scenarios for lazy grid measurement.
//!
//! Every test drives the public API the way a host would: queue scrolls and
//! jumps on a `GridLayoutState`, run `measure_lazy_grid` and inspect the
//! committed window.

use cranpose_lazy_grid::*;

fn tracks(count: usize) -> GridMeasureConfig {
    GridMeasureConfig::default().with_tracks(GridTracks::fixed(count, 100.0 * count as f32, 0.0))
}

/// Spans used by the irregular scenarios: some wide items, some tall ones.
fn irregular_span(index: usize) -> GridSpan {
    if index % 7 == 3 {
        GridSpan::cross(2)
    } else if index % 11 == 5 {
        GridSpan::main(2)
    } else {
        GridSpan::SINGLE
    }
}

fn irregular_length(index: usize) -> f32 {
    if index % 11 == 5 {
        150.0
    } else {
        60.0 + (index % 5) as f32 * 10.0
    }
}

fn measure_irregular(state: &mut GridLayoutState, viewport: f32) -> GridMeasureResult {
    let items = SpannedGridItems::new(200, irregular_span);
    measure_lazy_grid(state, &items, viewport, &tracks(3), |index, _| {
        irregular_length(index)
    })
}

fn assert_start_cell_is_origin(state: &GridLayoutState) {
    let start = state.start_index();
    let placement = state
        .matrix()
        .placement(start)
        .expect("start item must be placed");
    assert_eq!(placement.line, state.start_main_line_index());
    assert_eq!(
        state
            .matrix()
            .cell(state.start_main_line_index(), placement.track),
        GridCell::Item(start)
    );
}

#[test]
fn start_cell_is_an_item_after_every_pass() {
    let mut state = GridLayoutState::new();
    measure_irregular(&mut state, 300.0);
    assert_start_cell_is_origin(&state);

    for delta in [-35.0, -140.0, -75.0, -610.0, 220.0, -3000.0, 1800.0, 45.0] {
        state.dispatch_scroll_delta(delta);
        measure_irregular(&mut state, 300.0);
        assert_start_cell_is_origin(&state);
    }

    for (index, align) in [
        (120, ScrollAlign::Center),
        (5, ScrollAlign::End),
        (199, ScrollAlign::Start),
        (60, ScrollAlign::Auto),
    ] {
        state.scroll_to_item(index, align);
        measure_irregular(&mut state, 300.0);
        assert_start_cell_is_origin(&state);
    }
}

#[test]
fn zero_delta_pass_leaves_matrix_and_heights_unchanged() {
    let mut state = GridLayoutState::new();
    measure_irregular(&mut state, 300.0);
    state.dispatch_scroll_delta(-500.0);
    measure_irregular(&mut state, 300.0);

    let matrix = state.matrix().clone();
    let heights = state.line_heights().clone();
    let result = measure_irregular(&mut state, 300.0);

    assert_eq!(result.mode, GridMeasureMode::OnOffset);
    assert_eq!(state.matrix(), &matrix);
    assert_eq!(state.line_heights(), &heights);
}

#[test]
fn forward_then_backward_restores_position() {
    let mut state = GridLayoutState::new();
    measure_irregular(&mut state, 300.0);
    state.dispatch_scroll_delta(-230.0);
    measure_irregular(&mut state, 300.0);

    let start_index = state.start_index();
    let start_line = state.start_main_line_index();
    let offset = state.current_offset();

    state.dispatch_scroll_delta(-270.0);
    let result = measure_irregular(&mut state, 300.0);
    assert_eq!(result.mode, GridMeasureMode::Forward);
    assert_ne!(
        (state.start_main_line_index(), state.current_offset()),
        (start_line, offset)
    );

    state.dispatch_scroll_delta(270.0);
    let result = measure_irregular(&mut state, 300.0);
    assert_eq!(result.mode, GridMeasureMode::Backward);
    assert_eq!(state.start_index(), start_index);
    assert_eq!(state.start_main_line_index(), start_line);
    assert_eq!(state.current_offset(), offset);
}

#[test]
fn small_steps_match_single_delta() {
    let mut stepped = GridLayoutState::new();
    let mut single = GridLayoutState::new();
    measure_irregular(&mut stepped, 300.0);
    measure_irregular(&mut single, 300.0);

    for _ in 0..6 {
        stepped.dispatch_scroll_delta(-50.0);
        measure_irregular(&mut stepped, 300.0);
    }
    single.dispatch_scroll_delta(-300.0);
    measure_irregular(&mut single, 300.0);

    assert_eq!(stepped.start_index(), single.start_index());
    assert_eq!(stepped.current_offset(), single.current_offset());
}

#[test]
fn command_is_cleared_after_consuming_pass() {
    let mut state = GridLayoutState::new();
    state.scroll_to_item(50, ScrollAlign::Start);
    assert!(state.has_pending_command());
    measure_irregular(&mut state, 300.0);
    assert!(!state.has_pending_command());

    state.animate_scroll_to_item(150, ScrollAlign::End);
    let result = measure_irregular(&mut state, 300.0);
    assert!(!state.has_pending_command());
    assert!(result.target_delta.is_some_and(|delta| delta < 0.0));
}

#[test]
fn offset_end_tracks_pinned_last_line() {
    let items = UniformGridItems::new(20);
    let config = tracks(2);
    let mut state = GridLayoutState::new();

    let result = measure_lazy_grid(&mut state, &items, 300.0, &config, |_, _| 100.0);
    assert!(!result.offset_end);
    assert!(result.can_scroll_forward());

    state.dispatch_scroll_delta(-5000.0);
    let result = measure_lazy_grid(&mut state, &items, 300.0, &config, |_, _| 100.0);
    assert!(result.reach_end);
    assert!(result.offset_end);
    assert_eq!(result.end_index, 19);
    assert_eq!(result.start_main_line_index, 7);
    assert_eq!(result.current_offset, 0.0);
    let last = result.visible_items.last().unwrap();
    assert_eq!(last.main_axis_offset + last.main_axis_size, 300.0);

    // One pixel back the end is no longer pinned.
    state.dispatch_scroll_delta(1.0);
    let result = measure_lazy_grid(&mut state, &items, 300.0, &config, |_, _| 100.0);
    assert!(result.reach_end);
    assert!(!result.offset_end);
}

#[test]
fn over_scroll_lets_last_line_leave_trailing_edge() {
    let items = UniformGridItems::new(20);
    let config = tracks(2).with_over_scroll(true);
    let mut state = GridLayoutState::new();
    measure_lazy_grid(&mut state, &items, 300.0, &config, |_, _| 100.0);

    state.dispatch_scroll_delta(-850.0);
    let result = measure_lazy_grid(&mut state, &items, 300.0, &config, |_, _| 100.0);
    assert_eq!(result.start_main_line_index, 8);
    assert_eq!(result.current_offset, -50.0);
    assert!(result.offset_end);
}

#[test]
fn three_tracks_fill_viewport_from_top() {
    let items = UniformGridItems::new(10);
    let mut state = GridLayoutState::new();
    let result = measure_lazy_grid(&mut state, &items, 250.0, &tracks(3), |_, _| 100.0);

    assert_eq!(result.start_index, 0);
    assert_eq!(result.start_main_line_index, 0);
    assert!(result.end_index >= 8);
    assert_eq!(result.visible_items.len(), result.end_index + 1);
    assert!(result.reach_start);
}

#[test]
fn wide_item_shares_first_line() {
    let items = SpannedGridItems::new(10, |i| {
        if i == 1 {
            GridSpan::cross(2)
        } else {
            GridSpan::SINGLE
        }
    });
    let mut state = GridLayoutState::new();
    let result = measure_lazy_grid(&mut state, &items, 500.0, &tracks(3), |_, _| 100.0);

    assert_eq!(
        state.matrix().row(0).unwrap(),
        &[
            GridCell::Item(0),
            GridCell::Item(1),
            GridCell::Continuation(1)
        ]
    );
    let wide = &result.visible_items[1];
    assert_eq!(wide.cross_axis_offset, 100.0);
    assert_eq!(wide.cross_axis_size, 200.0);
}

#[test]
fn no_cell_is_claimed_twice() {
    let mut state = GridLayoutState::new();
    measure_irregular(&mut state, 300.0);
    state.scroll_to_item(199, ScrollAlign::End);
    measure_irregular(&mut state, 300.0);

    let matrix = state.matrix();
    let mut owners = std::collections::HashMap::new();
    for index in 0..matrix.placed_count() {
        let placement = matrix.placement(index).unwrap();
        assert!(!placement.covers_line(placement.last_line() + 1));
        for line in placement.line..=placement.last_line() {
            assert!(placement.covers_line(line));
            for track in placement.track..placement.track + placement.span.cross {
                assert!(
                    owners.insert((line, track), index).is_none(),
                    "cell ({line}, {track}) claimed twice"
                );
                assert_eq!(matrix.cell(line, track).item_index(), Some(index));
            }
        }
    }
}

#[test]
fn jump_to_item_ninety_aligns_its_line() {
    let items = UniformGridItems::new(100);
    let mut state = GridLayoutState::new();
    measure_lazy_grid(&mut state, &items, 250.0, &tracks(2), |_, _| 100.0);

    state.scroll_to_item(90, ScrollAlign::Start);
    let result = measure_lazy_grid(&mut state, &items, 250.0, &tracks(2), |_, _| 100.0);

    assert_eq!(result.mode, GridMeasureMode::Jump);
    assert_eq!(result.start_index, 90);
    assert_eq!(result.start_main_line_index, 45);
    assert_eq!(result.current_offset, 0.0);
}

#[test]
fn large_delta_skips_to_estimated_line() {
    let items = UniformGridItems::new(100);
    let config = tracks(2);
    let mut state = GridLayoutState::new();
    measure_lazy_grid(&mut state, &items, 400.0, &config, |_, _| 200.0);
    let measured_before = state.line_heights().len();

    state.dispatch_scroll_delta(-8000.0);
    let result = measure_lazy_grid(&mut state, &items, 400.0, &config, |_, _| 200.0);

    assert_eq!(result.mode, GridMeasureMode::Skip);
    assert_eq!(result.start_index, 80);
    assert_eq!(result.start_main_line_index, 40);
    assert_eq!(result.current_offset, 0.0);
    // Only the lines around the landing point were measured.
    assert!(state.line_heights().len() <= measured_before + 4);
}

#[test]
fn skip_estimate_is_corrected_by_measurement() {
    let items = UniformGridItems::new(100);
    let config = tracks(2);
    let length = |index: usize, _| if index % 2 == 0 { 190.0 } else { 210.0 };
    let mut state = GridLayoutState::new();
    measure_lazy_grid(&mut state, &items, 400.0, &config, length);

    state.dispatch_scroll_delta(-8000.0);
    let result = measure_lazy_grid(&mut state, &items, 400.0, &config, length);

    // Lines are 210 px: 8000 = 38 * 210 + 20.
    let items_per_viewport = (400.0_f32 / 210.0).ceil() as usize * 2;
    assert!(result.start_index.abs_diff(80) <= items_per_viewport);
    assert_eq!(result.start_index, 76);
    assert_eq!(result.current_offset, -20.0);

    state.dispatch_scroll_delta(8000.0);
    let result = measure_lazy_grid(&mut state, &items, 400.0, &config, length);
    assert_eq!(result.mode, GridMeasureMode::Skip);
    assert_eq!(result.start_index, 0);
    assert_eq!(result.current_offset, 0.0);
    assert!(result.reach_start);
}

#[test]
fn track_count_change_keeps_visual_anchor() {
    let items = UniformGridItems::new(300);
    let mut state = GridLayoutState::new();
    measure_lazy_grid(&mut state, &items, 400.0, &tracks(3), |_, _| 100.0);
    state.scroll_to_item_with_offset(150, ScrollAlign::Start, -40.0);
    measure_lazy_grid(&mut state, &items, 400.0, &tracks(3), |_, _| 100.0);
    assert_eq!(state.start_index(), 150);

    let result = measure_lazy_grid(&mut state, &items, 400.0, &tracks(5), |_, _| 100.0);
    assert_eq!(result.start_index, 150);
    assert_eq!(result.start_main_line_index, 30);
    assert_eq!(result.current_offset, -40.0);
    assert_eq!(state.cross_count(), 5);
}

#[test]
fn adaptive_tracks_follow_cross_size() {
    let items = UniformGridItems::new(50);
    let config =
        GridMeasureConfig::default().with_tracks(GridTracks::adaptive(120.0, 500.0, 10.0));
    let mut state = GridLayoutState::new();
    let mut widths = Vec::new();
    let result = measure_lazy_grid(&mut state, &items, 300.0, &config, |_, constraints| {
        widths.push(constraints.max_width);
        100.0
    });

    assert_eq!(config.cross_count(), 3);
    assert_eq!(result.visible_items[3].line, 1);
    assert!(widths.iter().all(|&width| width >= 120.0));
}
