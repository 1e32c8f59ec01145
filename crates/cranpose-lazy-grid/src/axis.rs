/// Scrolling direction of a lazy grid.
///
/// The main axis is the one the grid scrolls along; the cross axis is split
/// into tracks (columns for a vertical grid, rows for a horizontal one).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Axis {
    /// Horizontal main axis.
    /// Main axis: left to right
    /// Cross axis: top to bottom
    Horizontal,

    /// Vertical main axis.
    /// Main axis: top to bottom
    /// Cross axis: left to right
    #[default]
    Vertical,
}

impl Axis {
    /// Maps a (main, cross) pair to (x, y).
    #[inline]
    pub fn to_xy(self, main: f32, cross: f32) -> (f32, f32) {
        match self {
            Axis::Vertical => (cross, main),
            Axis::Horizontal => (main, cross),
        }
    }

    /// Maps a (main, cross) extent to (width, height).
    #[inline]
    pub fn to_size(self, main: f32, cross: f32) -> (f32, f32) {
        // Same mapping as positions; kept separate for readability at call sites.
        self.to_xy(main, cross)
    }
}
