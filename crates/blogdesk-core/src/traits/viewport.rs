//! Viewport observation primitive.

use tokio::sync::mpsc;

/// Options forwarded to the observation primitive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObserveOptions {
    /// Margin grown around the viewport before intersection is computed.
    pub root_margin_px: u32,
    /// Fraction of the element that must be visible.
    pub threshold: f32,
}

impl Default for ObserveOptions {
    fn default() -> Self {
        Self {
            root_margin_px: 600,
            threshold: 0.01,
        }
    }
}

/// One observation reported for the watched element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntersectionEntry {
    pub is_intersecting: bool,
    pub ratio: f32,
}

impl IntersectionEntry {
    pub fn visible(ratio: f32) -> Self {
        Self {
            is_intersecting: true,
            ratio,
        }
    }

    pub fn hidden() -> Self {
        Self {
            is_intersecting: false,
            ratio: 0.0,
        }
    }
}

/// Watches a single element and reports when it meets the viewport.
pub trait ViewportObserver: Send + 'static {
    /// Begin observing.
    ///
    /// Returns `None` when the environment cannot observe the viewport.
    fn observe(
        &mut self,
        options: &ObserveOptions,
    ) -> Option<mpsc::UnboundedReceiver<IntersectionEntry>>;

    /// Stop observing and release the underlying resources.
    fn disconnect(&mut self);
}
