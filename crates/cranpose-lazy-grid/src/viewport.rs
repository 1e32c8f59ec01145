//! Viewport handling for lazy grid measurement.
//!
//! This module handles viewport size validation and the infinite viewport fallback.

/// Maximum reasonable viewport size before treating as infinite.
const MAX_REASONABLE_VIEWPORT: f32 = 100_000.0;

/// Number of lines to show in the infinite viewport fallback case.
const INFINITE_VIEWPORT_LINE_COUNT: f32 = 20.0;

/// Validates the main-axis viewport size and provides the size to fill.
///
/// A grid placed in an unconstrained parent receives an infinite (or absurdly
/// large) main size; filling it would realize every item, so a size of a few
/// average lines is used instead.
#[derive(Clone, Copy, Debug)]
pub(crate) struct ViewportHandler {
    effective_size: f32,
    is_infinite: bool,
}

impl ViewportHandler {
    /// # Arguments
    /// * `viewport_size` - Raw main-axis size from the host
    /// * `average_line_height` - Current average line height from the cache
    /// * `spacing` - Gap between lines
    pub fn new(viewport_size: f32, average_line_height: f32, spacing: f32) -> Self {
        let is_infinite = viewport_size.is_infinite() || viewport_size > MAX_REASONABLE_VIEWPORT;

        let effective_size = if is_infinite {
            let estimated_size = (average_line_height + spacing) * INFINITE_VIEWPORT_LINE_COUNT;
            log::warn!(
                "LazyGrid: Detected infinite viewport ({}), using fallback size {}. \
                 Consider wrapping the grid in a constrained container.",
                viewport_size,
                estimated_size
            );
            estimated_size
        } else {
            viewport_size
        };

        Self {
            effective_size,
            is_infinite,
        }
    }

    #[inline]
    pub fn effective_size(&self) -> f32 {
        self.effective_size
    }

    #[inline]
    pub fn is_infinite(&self) -> bool {
        self.is_infinite
    }
}
