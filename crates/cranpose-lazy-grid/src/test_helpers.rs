//! Shared fixtures for unit tests.

use crate::config::{GridMeasureConfig, GridTracks};
use crate::item_provider::UniformGridItems;
use crate::measure::measure_lazy_grid;
use crate::measured_item::GridMeasureResult;
use crate::state::GridLayoutState;

/// Config with `cross_count` equal tracks sharing `cross_size`.
pub fn uniform_config(cross_count: usize, cross_size: f32) -> GridMeasureConfig {
    GridMeasureConfig::default().with_tracks(GridTracks::fixed(cross_count, cross_size, 0.0))
}

/// Runs one pass over `count` regular items that all measure `line_height`.
///
/// Tracks are 100 px wide.
pub fn measure_fixed(
    state: &mut GridLayoutState,
    count: usize,
    cross_count: usize,
    line_height: f32,
    viewport_size: f32,
) -> GridMeasureResult {
    let items = UniformGridItems::new(count);
    let config = uniform_config(cross_count, 100.0 * cross_count as f32);
    measure_lazy_grid(state, &items, viewport_size, &config, |_, _| line_height)
}
