//! Resolved main-axis lengths of measured lines.

/// Line length used when nothing has been measured yet.
///
/// Matches the lazy list item estimate so both layouts guess the same way.
pub const DEFAULT_LINE_HEIGHT_ESTIMATE: f32 = 48.0;

/// Sparse cache of line heights keyed by line index.
///
/// Heights only grow while the cache is alive. Entries are dropped by
/// [`clear`](Self::clear) on a full reset or [`truncate`](Self::truncate) on a
/// partial one.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LineHeightCache {
    heights: Vec<Option<f32>>,
    measured: usize,
    total: f32,
}

impl LineHeightCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Height of `line` if it has been measured.
    #[inline]
    pub fn get(&self, line: usize) -> Option<f32> {
        self.heights.get(line).copied().flatten()
    }

    #[inline]
    pub fn contains(&self, line: usize) -> bool {
        self.get(line).is_some()
    }

    /// Number of measured lines.
    #[inline]
    pub fn len(&self) -> usize {
        self.measured
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.measured == 0
    }

    /// Records `height` for `line`, keeping the larger of the old and new value.
    ///
    /// Returns the stored height.
    pub fn raise(&mut self, line: usize, height: f32) -> f32 {
        let height = if height.is_finite() { height.max(0.0) } else { 0.0 };
        if self.heights.len() <= line {
            self.heights.resize(line + 1, None);
        }
        match self.heights[line] {
            Some(current) if current >= height => current,
            Some(current) => {
                self.total += height - current;
                self.heights[line] = Some(height);
                height
            }
            None => {
                self.total += height;
                self.measured += 1;
                self.heights[line] = Some(height);
                height
            }
        }
    }

    /// Sum of all measured heights.
    #[inline]
    pub fn total(&self) -> f32 {
        self.total
    }

    /// Drops every entry from `line` onward.
    pub fn truncate(&mut self, line: usize) {
        if line >= self.heights.len() {
            return;
        }
        self.heights.truncate(line);
        self.measured = self.heights.iter().flatten().count();
        self.total = self.heights.iter().flatten().sum();
    }

    pub fn clear(&mut self) {
        self.heights.clear();
        self.measured = 0;
        self.total = 0.0;
    }

    /// Average measured height, if any line has been measured.
    pub fn average(&self) -> Option<f32> {
        if self.measured == 0 {
            None
        } else {
            Some(self.total / self.measured as f32)
        }
    }

    /// Average measured height, or [`DEFAULT_LINE_HEIGHT_ESTIMATE`] when empty.
    pub fn average_or_default(&self) -> f32 {
        self.average().unwrap_or(DEFAULT_LINE_HEIGHT_ESTIMATE)
    }

    /// Iterates over `(line, height)` for every measured line.
    pub fn iter(&self) -> impl Iterator<Item = (usize, f32)> + '_ {
        self.heights
            .iter()
            .enumerate()
            .filter_map(|(line, height)| height.map(|h| (line, h)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_cache_uses_default_estimate() {
        let cache = LineHeightCache::new();
        assert!(cache.is_empty());
        assert_eq!(cache.average(), None);
        assert_eq!(cache.average_or_default(), DEFAULT_LINE_HEIGHT_ESTIMATE);
    }

    #[test]
    fn raise_keeps_max_and_tracks_average() {
        let mut cache = LineHeightCache::new();
        cache.raise(0, 100.0);
        cache.raise(3, 200.0);
        assert_eq!(cache.raise(0, 50.0), 100.0);
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get(1), None);
        assert_eq!(cache.average(), Some(150.0));

        cache.raise(0, 140.0);
        assert_eq!(cache.average(), Some(170.0));
    }

    #[test]
    fn truncate_recomputes_totals() {
        let mut cache = LineHeightCache::new();
        for line in 0..5 {
            cache.raise(line, (line as f32 + 1.0) * 10.0);
        }
        cache.truncate(2);
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.average(), Some(15.0));
        assert!(!cache.contains(2));
        assert_eq!(cache.iter().collect::<Vec<_>>(), vec![(0, 10.0), (1, 20.0)]);
    }

    #[test]
    fn invalid_heights_become_zero() {
        let mut cache = LineHeightCache::new();
        assert_eq!(cache.raise(0, f32::NAN), 0.0);
        assert_eq!(cache.raise(1, -4.0), 0.0);
        assert_eq!(cache.average(), Some(0.0));
    }
}
