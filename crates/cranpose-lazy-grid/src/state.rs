//! Lazy grid state management.
//!
//! [`GridLayoutState`] is the persistent record of one grid instance. The host
//! owns it, queues scrolls and jumps on it between passes, and hands it to
//! [`measure_lazy_grid`](crate::measure_lazy_grid) by `&mut` once per layout
//! pass. Everything derived (placement, line heights, the realized window) is
//! written back by the pass.

use crate::line_heights::LineHeightCache;
use crate::matrix::GridMatrix;

/// How a scrolled-to item is aligned inside the viewport.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ScrollAlign {
    /// Item leading edge at the viewport leading edge.
    Start,
    /// Item midpoint at the viewport midpoint.
    Center,
    /// Item trailing edge at the viewport trailing edge.
    End,
    /// Leave the item alone if it is fully visible, otherwise the nearest of
    /// `Start`/`End`.
    #[default]
    Auto,
}

/// One-shot request consumed by the next layout pass.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum GridCommand {
    #[default]
    None,
    /// Move the window so `index` satisfies `align`, then shift by `extra_offset`.
    JumpTo {
        index: usize,
        align: ScrollAlign,
        extra_offset: f32,
    },
    /// Report the delta that would bring `index` into place without moving.
    AnimateTo { index: usize, align: ScrollAlign },
}

impl GridCommand {
    #[inline]
    pub fn is_none(&self) -> bool {
        matches!(self, GridCommand::None)
    }

    /// Target item of the command, if any.
    pub fn index(&self) -> Option<usize> {
        match *self {
            GridCommand::None => None,
            GridCommand::JumpTo { index, .. } | GridCommand::AnimateTo { index, .. } => Some(index),
        }
    }
}

/// Persistent layout state of one lazy grid.
#[derive(Clone, Debug, Default)]
pub struct GridLayoutState {
    pub(crate) cross_count: usize,
    pub(crate) children_count: usize,
    pub(crate) matrix: GridMatrix,
    pub(crate) line_heights: LineHeightCache,

    pub(crate) start_index: usize,
    pub(crate) end_index: usize,
    pub(crate) start_main_line_index: usize,
    pub(crate) end_main_line_index: usize,
    pub(crate) current_offset: f32,

    pub(crate) command: GridCommand,
    pub(crate) pending_delta: f32,
    /// Items from this index onward changed since the last pass.
    pub(crate) children_updated_from: Option<usize>,
    /// Item and offset to put back at the leading edge after a reset.
    pub(crate) restored_anchor: Option<(usize, f32)>,

    pub(crate) reach_start: bool,
    pub(crate) reach_end: bool,
    pub(crate) offset_end: bool,
    pub(crate) initialized: bool,
}

impl GridLayoutState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a state whose first pass starts at `index`.
    pub fn with_initial_item(index: usize) -> Self {
        let mut state = Self::default();
        state.scroll_to_item(index, ScrollAlign::Start);
        state
    }

    /// Dispatches a raw scroll delta.
    ///
    /// The delta is added to the offset of the leading line on the next pass:
    /// negative values reveal later items, positive values earlier ones.
    /// Returns the total delta waiting to be consumed.
    pub fn dispatch_scroll_delta(&mut self, delta: f32) -> f32 {
        if delta.is_finite() {
            self.pending_delta += delta;
        } else {
            log::warn!("LazyGrid: dropping non-finite scroll delta {}", delta);
        }
        self.pending_delta
    }

    /// Peeks at the pending scroll delta without consuming it.
    #[inline]
    pub fn peek_scroll_delta(&self) -> f32 {
        self.pending_delta
    }

    /// Scrolls so `index` is placed according to `align` on the next pass.
    pub fn scroll_to_item(&mut self, index: usize, align: ScrollAlign) {
        self.scroll_to_item_with_offset(index, align, 0.0);
    }

    /// Like [`scroll_to_item`](Self::scroll_to_item) with an extra shift applied
    /// after alignment (positive moves the item toward the trailing edge).
    pub fn scroll_to_item_with_offset(
        &mut self,
        index: usize,
        align: ScrollAlign,
        extra_offset: f32,
    ) {
        let extra_offset = if extra_offset.is_finite() {
            extra_offset
        } else {
            log::warn!("LazyGrid: dropping non-finite jump offset {}", extra_offset);
            0.0
        };
        self.set_command(GridCommand::JumpTo {
            index,
            align,
            extra_offset,
        });
    }

    /// Asks the next pass for the delta that would bring `index` into place.
    ///
    /// The window does not move; read
    /// [`GridMeasureResult::target_delta`](crate::GridMeasureResult::target_delta)
    /// and feed it to an animation.
    pub fn animate_scroll_to_item(&mut self, index: usize, align: ScrollAlign) {
        self.set_command(GridCommand::AnimateTo { index, align });
    }

    /// Tells the grid that items from `index` onward changed.
    ///
    /// If the track count is unchanged the next pass keeps placement and line
    /// heights of the lines before the first affected line.
    pub fn notify_children_updated(&mut self, index: usize) {
        self.children_updated_from = Some(match self.children_updated_from {
            Some(current) => current.min(index),
            None => index,
        });
    }

    /// Returns true if a jump or animate request waits for the next pass.
    #[inline]
    pub fn has_pending_command(&self) -> bool {
        !self.command.is_none()
    }

    #[inline]
    pub fn pending_command(&self) -> GridCommand {
        self.command
    }

    /// First realized item.
    #[inline]
    pub fn start_index(&self) -> usize {
        self.start_index
    }

    /// Last realized item.
    #[inline]
    pub fn end_index(&self) -> usize {
        self.end_index
    }

    #[inline]
    pub fn start_main_line_index(&self) -> usize {
        self.start_main_line_index
    }

    #[inline]
    pub fn end_main_line_index(&self) -> usize {
        self.end_main_line_index
    }

    /// Offset of the leading edge of the start line relative to the viewport.
    #[inline]
    pub fn current_offset(&self) -> f32 {
        self.current_offset
    }

    #[inline]
    pub fn reach_start(&self) -> bool {
        self.reach_start
    }

    #[inline]
    pub fn reach_end(&self) -> bool {
        self.reach_end
    }

    #[inline]
    pub fn offset_end(&self) -> bool {
        self.offset_end
    }

    #[inline]
    pub fn cross_count(&self) -> usize {
        self.cross_count
    }

    #[inline]
    pub fn children_count(&self) -> usize {
        self.children_count
    }

    /// Current placement matrix.
    #[inline]
    pub fn matrix(&self) -> &GridMatrix {
        &self.matrix
    }

    /// Heights of the lines measured so far.
    #[inline]
    pub fn line_heights(&self) -> &LineHeightCache {
        &self.line_heights
    }

    /// Average measured line height, or the default estimate.
    pub fn average_line_height(&self) -> f32 {
        self.line_heights.average_or_default()
    }

    pub fn can_scroll_backward(&self) -> bool {
        !self.reach_start
    }

    pub fn can_scroll_forward(&self) -> bool {
        !self.offset_end
    }

    fn set_command(&mut self, command: GridCommand) {
        if !self.command.is_none() {
            log::debug!(
                "LazyGrid: {:?} replaces pending {:?}",
                command,
                self.command
            );
        }
        self.command = command;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deltas_accumulate_until_consumed() {
        let mut state = GridLayoutState::new();
        state.dispatch_scroll_delta(-10.0);
        assert_eq!(state.dispatch_scroll_delta(-5.5), -15.5);
        assert_eq!(state.dispatch_scroll_delta(f32::NAN), -15.5);
        assert_eq!(state.peek_scroll_delta(), -15.5);
    }

    #[test]
    fn last_command_wins() {
        let mut state = GridLayoutState::new();
        assert!(!state.has_pending_command());
        state.scroll_to_item(5, ScrollAlign::Center);
        state.animate_scroll_to_item(7, ScrollAlign::End);
        assert!(state.has_pending_command());
        assert_eq!(
            state.pending_command(),
            GridCommand::AnimateTo {
                index: 7,
                align: ScrollAlign::End
            }
        );
        assert_eq!(state.pending_command().index(), Some(7));
    }

    #[test]
    fn initial_item_queues_start_jump() {
        let state = GridLayoutState::with_initial_item(12);
        assert_eq!(
            state.pending_command(),
            GridCommand::JumpTo {
                index: 12,
                align: ScrollAlign::Start,
                extra_offset: 0.0
            }
        );
    }

    #[test]
    fn children_updates_keep_lowest_index() {
        let mut state = GridLayoutState::new();
        state.notify_children_updated(9);
        state.notify_children_updated(4);
        state.notify_children_updated(6);
        assert_eq!(state.children_updated_from, Some(4));
    }
}
