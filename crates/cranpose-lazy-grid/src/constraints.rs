//! Constraints handed to the item measurement callback.

use crate::axis::Axis;

/// Constraints used when measuring a grid item.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Constraints {
    pub min_width: f32,
    pub max_width: f32,
    pub min_height: f32,
    pub max_height: f32,
}

impl Constraints {
    /// Constraints for a grid cell: tight on the cross axis, unbounded on the main axis.
    ///
    /// The item decides its own main-axis length; the grid decides how wide
    /// (or tall, for horizontal grids) the spanned tracks are.
    pub fn for_cell(axis: Axis, cross_size: f32) -> Self {
        let cross_size = cross_size.max(0.0);
        let (min_width, min_height) = axis.to_size(0.0, cross_size);
        let (max_width, max_height) = axis.to_size(f32::INFINITY, cross_size);
        Self {
            min_width,
            max_width,
            min_height,
            max_height,
        }
    }
}
