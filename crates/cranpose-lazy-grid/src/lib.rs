//! Virtualized irregular-grid layout for Cranpose.
//!
//! Lays out a potentially unbounded list of items on a grid whose items may
//! span several tracks (columns of a vertical grid) and several lines, while
//! only ever measuring the items around the viewport.
//!
//! # Architecture
//!
//! - [`GridLayoutState`] - Persistent state for one grid: placement, line
//!   heights, the realized window and pending scroll/jump requests
//! - [`GridItemProvider`] - Item count and span lookup
//! - [`GridMatrix`] - Sparse `(line, track)` placement of items
//! - [`LineHeightCache`] - Heights of the lines measured so far
//! - [`measure_lazy_grid`] - One layout pass: resets, jumps, skip-ahead,
//!   window filling and geometry
//!
//! # Example
//!
//! ```rust
//! use cranpose_lazy_grid::{
//!     measure_lazy_grid, GridLayoutState, GridMeasureConfig, GridTracks, ScrollAlign,
//!     UniformGridItems,
//! };
//!
//! let mut state = GridLayoutState::new();
//! let items = UniformGridItems::new(1_000);
//! let config = GridMeasureConfig::default().with_tracks(GridTracks::fixed(3, 300.0, 0.0));
//!
//! state.scroll_to_item(500, ScrollAlign::Center);
//! let result = measure_lazy_grid(&mut state, &items, 400.0, &config, |_, _| 80.0);
//! assert!(result.start_index <= 500 && 500 <= result.end_index);
//!
//! state.dispatch_scroll_delta(-120.0);
//! let result = measure_lazy_grid(&mut state, &items, 400.0, &config, |_, _| 80.0);
//! for item in result.item_infos() {
//!     let _ = (item.index, item.x, item.y, item.width, item.height);
//! }
//! ```

mod axis;
mod config;
mod constraints;
mod item_measurer;
mod item_provider;
mod jump;
mod line_heights;
mod matrix;
mod measure;
mod measured_item;
mod skip;
mod state;
mod viewport;
mod window;

#[cfg(test)]
mod test_helpers;

pub use axis::Axis;
pub use config::*;
pub use constraints::Constraints;
pub use item_provider::*;
pub use line_heights::*;
pub use matrix::*;
pub use measure::measure_lazy_grid;
pub use measured_item::*;
pub use state::*;
