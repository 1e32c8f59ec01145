//! Measurement configuration for lazy grids.

use crate::axis::Axis;
use smallvec::SmallVec;

/// Cross-axis lengths of the grid tracks (columns of a vertical grid).
#[derive(Clone, Debug, PartialEq)]
pub struct GridTracks {
    sizes: SmallVec<[f32; 8]>,
}

impl Default for GridTracks {
    fn default() -> Self {
        Self::new([0.0, 0.0])
    }
}

impl GridTracks {
    /// Creates tracks with explicit lengths.
    ///
    /// Negative or non-finite lengths become zero. An empty list yields a
    /// single zero-length track so the grid always has at least one.
    pub fn new(sizes: impl IntoIterator<Item = f32>) -> Self {
        let mut sizes: SmallVec<[f32; 8]> = sizes
            .into_iter()
            .map(|size| if size.is_finite() { size.max(0.0) } else { 0.0 })
            .collect();
        if sizes.is_empty() {
            sizes.push(0.0);
        }
        Self { sizes }
    }

    /// `count` equal tracks sharing `available` cross space.
    ///
    /// Track lengths are whole pixels; the leftover pixels go one each to the
    /// leading tracks.
    pub fn fixed(count: usize, available: f32, spacing: f32) -> Self {
        let count = count.max(1);
        let spacing = spacing.max(0.0);
        let usable = (available - spacing * count.saturating_sub(1) as f32).max(0.0);
        if !usable.is_finite() {
            log::warn!("LazyGrid: unbounded cross axis, tracks collapse to zero");
            return Self::new(std::iter::repeat(0.0).take(count));
        }
        let base = (usable / count as f32).floor();
        let remainder = (usable - base * count as f32).floor() as usize;
        Self::new((0..count).map(|track| if track < remainder { base + 1.0 } else { base }))
    }

    /// As many tracks of at least `min_size` as fit in `available`.
    pub fn adaptive(min_size: f32, available: f32, spacing: f32) -> Self {
        let spacing = spacing.max(0.0);
        let count = if min_size > 0.0 && available.is_finite() {
            (((available + spacing) / (min_size + spacing)).floor() as usize).max(1)
        } else {
            1
        };
        Self::fixed(count, available, spacing)
    }

    /// Number of tracks.
    #[inline]
    pub fn count(&self) -> usize {
        self.sizes.len()
    }

    /// Length of `track`, zero past the last track.
    #[inline]
    pub fn size(&self, track: usize) -> f32 {
        self.sizes.get(track).copied().unwrap_or(0.0)
    }

    /// Cross-axis offset of the leading edge of `track`.
    pub fn offset(&self, track: usize, spacing: f32) -> f32 {
        let track = track.min(self.sizes.len());
        self.sizes[..track].iter().sum::<f32>() + spacing * track as f32
    }

    /// Length covered by `span` tracks starting at `track`, gaps included.
    pub fn span_size(&self, track: usize, span: usize, spacing: f32) -> f32 {
        let end = (track + span).min(self.sizes.len());
        let start = track.min(end);
        let tracks = end - start;
        self.sizes[start..end].iter().sum::<f32>() + spacing * tracks.saturating_sub(1) as f32
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.sizes
    }
}

/// Configuration for lazy grid measurement.
#[derive(Clone, Debug)]
pub struct GridMeasureConfig {
    /// Scroll direction.
    pub axis: Axis,

    /// Whether lines are laid out from the trailing edge (bottom/right).
    pub reverse_layout: bool,

    /// Gap between consecutive lines.
    pub main_axis_spacing: f32,

    /// Gap between adjacent tracks.
    pub cross_axis_spacing: f32,

    /// Cross-axis track lengths. The track count is `tracks.count()`.
    pub tracks: GridTracks,

    /// Allows the last line to move past the trailing edge instead of being
    /// pinned to it.
    pub can_over_scroll: bool,

    /// Lines to place and measure past the viewport for prefetching.
    pub beyond_bounds_line_count: usize,
}

impl Default for GridMeasureConfig {
    fn default() -> Self {
        Self {
            axis: Axis::Vertical,
            reverse_layout: false,
            main_axis_spacing: 0.0,
            cross_axis_spacing: 0.0,
            tracks: GridTracks::default(),
            can_over_scroll: false,
            beyond_bounds_line_count: 1,
        }
    }
}

impl GridMeasureConfig {
    pub fn with_tracks(mut self, tracks: GridTracks) -> Self {
        self.tracks = tracks;
        self
    }

    pub fn with_spacing(mut self, main_axis: f32, cross_axis: f32) -> Self {
        self.main_axis_spacing = main_axis;
        self.cross_axis_spacing = cross_axis;
        self
    }

    pub fn with_axis(mut self, axis: Axis) -> Self {
        self.axis = axis;
        self
    }

    pub fn reversed(mut self, reverse_layout: bool) -> Self {
        self.reverse_layout = reverse_layout;
        self
    }

    pub fn with_over_scroll(mut self, can_over_scroll: bool) -> Self {
        self.can_over_scroll = can_over_scroll;
        self
    }

    pub fn with_beyond_bounds_lines(mut self, count: usize) -> Self {
        self.beyond_bounds_line_count = count;
        self
    }

    /// Number of tracks on the cross axis.
    #[inline]
    pub fn cross_count(&self) -> usize {
        self.tracks.count()
    }

    /// Main-axis gap with negative values treated as zero.
    #[inline]
    pub(crate) fn line_gap(&self) -> f32 {
        sanitize_spacing(self.main_axis_spacing)
    }

    #[inline]
    pub(crate) fn track_gap(&self) -> f32 {
        sanitize_spacing(self.cross_axis_spacing)
    }
}

fn sanitize_spacing(spacing: f32) -> f32 {
    if spacing.is_finite() {
        spacing.max(0.0)
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_tracks_distribute_remainder_to_leading_tracks() {
        let tracks = GridTracks::fixed(3, 100.0, 0.0);
        assert_eq!(tracks.as_slice(), &[34.0, 33.0, 33.0]);

        let spaced = GridTracks::fixed(3, 110.0, 5.0);
        assert_eq!(spaced.as_slice(), &[34.0, 33.0, 33.0]);
        assert_eq!(spaced.offset(2, 5.0), 77.0);
        assert_eq!(spaced.span_size(1, 2, 5.0), 71.0);
    }

    #[test]
    fn adaptive_tracks_fit_minimum_size() {
        let tracks = GridTracks::adaptive(100.0, 350.0, 10.0);
        assert_eq!(tracks.count(), 3);
        assert!(tracks.as_slice().iter().all(|&size| size >= 100.0));

        assert_eq!(GridTracks::adaptive(500.0, 100.0, 0.0).count(), 1);
        assert_eq!(GridTracks::adaptive(0.0, 100.0, 0.0).count(), 1);
    }

    #[test]
    fn explicit_tracks_are_sanitized() {
        let tracks = GridTracks::new([10.0, -1.0, f32::NAN]);
        assert_eq!(tracks.as_slice(), &[10.0, 0.0, 0.0]);
        assert_eq!(GridTracks::new(Vec::<f32>::new()).count(), 1);
        assert_eq!(tracks.size(7), 0.0);
    }

    #[test]
    fn builder_helpers_set_fields() {
        let config = GridMeasureConfig::default()
            .with_tracks(GridTracks::fixed(4, 400.0, 0.0))
            .with_spacing(8.0, -2.0)
            .with_axis(Axis::Horizontal)
            .reversed(true)
            .with_over_scroll(true);
        assert_eq!(config.cross_count(), 4);
        assert_eq!(config.line_gap(), 8.0);
        assert_eq!(config.track_gap(), 0.0);
        assert_eq!(config.axis, Axis::Horizontal);
        assert!(config.reverse_layout);
        assert!(config.can_over_scroll);
        assert_eq!(GridMeasureConfig::default().cross_count(), 2);
    }
}
