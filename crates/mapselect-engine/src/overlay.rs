// Imports
use crate::feature::Feature;
use crate::widgetflags::WidgetFlags;

/// How an overlay feature should be drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayStyle {
    /// A candidate presented for disambiguation.
    Choose,
    /// A buffer zone preview.
    Buffer,
}

/// The temporary overlay layer for previews during the buffer flow.
#[derive(Debug, Default)]
pub struct OverlayLayer {
    features: Vec<(Feature, OverlayStyle)>,
}

impl OverlayLayer {
    pub fn features(&self) -> &[(Feature, OverlayStyle)] {
        &self.features
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn clear(&mut self) -> WidgetFlags {
        let mut widget_flags = WidgetFlags::default();
        if !self.features.is_empty() {
            self.features.clear();
            widget_flags.overlay_modified = true;
            widget_flags.redraw = true;
        }
        widget_flags
    }

    /// Replace the overlay content with a single preview feature.
    pub fn set_preview(&mut self, feature: Feature, style: OverlayStyle) -> WidgetFlags {
        let mut widget_flags = self.clear();
        self.features.push((feature, style));
        widget_flags.overlay_modified = true;
        widget_flags.redraw = true;
        widget_flags
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{Geometry, Point};

    fn feature(id: &str) -> Feature {
        Feature::new(id, Geometry::Point(Point::new(0.0, 0.0)))
    }

    #[test]
    fn set_preview_replaces_previous_content() {
        let mut overlay = OverlayLayer::default();
        assert!(!overlay.clear().overlay_modified);

        overlay.set_preview(feature("a"), OverlayStyle::Choose);
        let flags = overlay.set_preview(feature("b"), OverlayStyle::Buffer);

        assert!(flags.overlay_modified);
        assert_eq!(overlay.features().len(), 1);
        assert_eq!(overlay.features()[0].0.id, "b");
        assert_eq!(overlay.features()[0].1, OverlayStyle::Buffer);

        assert!(overlay.clear().overlay_modified);
        assert!(overlay.is_empty());
    }
}
