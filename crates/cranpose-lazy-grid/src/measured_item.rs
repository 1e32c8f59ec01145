//! Measured item representation for lazy grids.
//!
//! Contains the geometry of each realized item and the result of a pass.

use crate::axis::Axis;
use crate::item_provider::GridSpan;

/// A realized grid item with its resolved geometry.
#[derive(Clone, Debug, PartialEq)]
pub struct GridMeasuredItem {
    /// Index in the data source.
    pub index: usize,

    /// Line holding the item's origin cell.
    pub line: usize,

    /// Track holding the item's origin cell.
    pub track: usize,

    /// Lines and tracks covered by the item.
    pub span: GridSpan,

    /// Offset of the item's main-axis leading edge in viewport coordinates.
    ///
    /// Already mirrored for reversed layouts.
    pub main_axis_offset: f32,

    /// Offset of the item's cross-axis leading edge.
    pub cross_axis_offset: f32,

    /// Measured length on the main axis.
    pub main_axis_size: f32,

    /// Length of the spanned tracks on the cross axis.
    pub cross_axis_size: f32,

    pub axis: Axis,
}

impl GridMeasuredItem {
    /// Converts to x/y/width/height in viewport coordinates.
    pub fn to_item_info(&self) -> GridItemInfo {
        let (x, y) = self.axis.to_xy(self.main_axis_offset, self.cross_axis_offset);
        let (width, height) = self.axis.to_size(self.main_axis_size, self.cross_axis_size);
        GridItemInfo {
            index: self.index,
            x,
            y,
            width,
            height,
        }
    }
}

/// Geometry of a realized item, for placement by the host.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridItemInfo {
    pub index: usize,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// Path a layout pass took.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum GridMeasureMode {
    /// Nothing to lay out: no items or no viewport.
    #[default]
    Empty,
    /// The window was recomputed for the current offset.
    OnOffset,
    /// A negative delta moved the window toward later items.
    Forward,
    /// A positive delta moved the window toward earlier items.
    Backward,
    /// A pending jump placed the window.
    Jump,
    /// A large delta was converted to an estimated jump.
    Skip,
}

/// Result of measuring a lazy grid.
#[derive(Clone, Debug, Default)]
pub struct GridMeasureResult {
    /// Items from `start_index` through `end_index`, in index order.
    pub visible_items: Vec<GridMeasuredItem>,

    /// Items on the beyond-bounds lines after the window.
    pub prefetch_items: Vec<usize>,

    pub start_index: usize,
    pub end_index: usize,
    pub start_main_line_index: usize,
    pub end_main_line_index: usize,

    /// Offset of the start line's leading edge relative to the viewport.
    pub current_offset: f32,

    /// Main-axis viewport size used for this pass.
    pub viewport_size: f32,

    /// Estimated total content size (measured lines plus the average for the rest).
    pub total_content_size: f32,

    pub reach_start: bool,
    pub reach_end: bool,
    pub offset_end: bool,

    pub mode: GridMeasureMode,

    /// Delta that brings an `AnimateTo` target into place.
    pub target_delta: Option<f32>,
}

impl GridMeasureResult {
    /// Returns true if content lies past the trailing edge.
    pub fn can_scroll_forward(&self) -> bool {
        !self.offset_end
    }

    /// Returns true if content lies before the leading edge.
    pub fn can_scroll_backward(&self) -> bool {
        !self.reach_start
    }

    pub fn item_infos(&self) -> impl Iterator<Item = GridItemInfo> + '_ {
        self.visible_items.iter().map(GridMeasuredItem::to_item_info)
    }
}
