// Screen-to-viewbox mapping for the map surface.

use crate::model::{Point, VIEWBOX_H, VIEWBOX_W};
use web_sys::Element;
use yew::NodeRef;

/// On-screen placement of the map surface, captured from its bounding
/// client rect. The rect already reflects zoom, scroll and device
/// pixel ratio, so mapping through it is transform-independent.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SurfaceTransform {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl SurfaceTransform {
    /// Maps client (screen) coordinates into the fixed viewbox space.
    /// A degenerate surface maps everything to the origin.
    pub fn to_viewbox(&self, client_x: f64, client_y: f64) -> Point {
        if self.width <= 0.0 || self.height <= 0.0 {
            return Point::default();
        }
        Point {
            x: (client_x - self.left) / self.width * VIEWBOX_W,
            y: (client_y - self.top) / self.height * VIEWBOX_H,
        }
    }

    /// Inverse of `to_viewbox`.
    pub fn to_screen(&self, p: Point) -> (f64, f64) {
        (
            self.left + p.x / VIEWBOX_W * self.width,
            self.top + p.y / VIEWBOX_H * self.height,
        )
    }
}

/// Reads the current surface placement off the rendered map element.
/// Before the node is mounted this returns the degenerate transform.
pub fn capture(node: &NodeRef) -> SurfaceTransform {
    let Some(el) = node.cast::<Element>() else {
        return SurfaceTransform::default();
    };
    let rect = el.get_bounding_client_rect();
    SurfaceTransform {
        left: rect.left(),
        top: rect.top(),
        width: rect.width(),
        height: rect.height(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unmounted_surface_maps_to_origin() {
        let t = SurfaceTransform::default();
        let p = t.to_viewbox(412.0, 99.0);
        assert_eq!(p.x, 0.0);
        assert_eq!(p.y, 0.0);
    }

    #[test]
    fn maps_corners_to_viewbox_extent() {
        let t = SurfaceTransform {
            left: 10.0,
            top: 20.0,
            width: 800.0,
            height: 1200.0,
        };
        let origin = t.to_viewbox(10.0, 20.0);
        assert_eq!(origin.x, 0.0);
        assert_eq!(origin.y, 0.0);
        let far = t.to_viewbox(810.0, 1220.0);
        assert!((far.x - VIEWBOX_W).abs() < 1e-9);
        assert!((far.y - VIEWBOX_H).abs() < 1e-9);
    }

    #[test]
    fn inverse_consistent_at_any_scale() {
        // Same surface at 1x and at a zoomed-in 2.5x rect.
        for scale in [1.0, 2.5, 0.25] {
            let t = SurfaceTransform {
                left: -35.0,
                top: 120.0,
                width: 640.0 * scale,
                height: 970.0 * scale,
            };
            let (sx, sy) = (200.0, 300.0);
            let p = t.to_viewbox(sx, sy);
            let (bx, by) = t.to_screen(p);
            assert!((bx - sx).abs() < 1e-9);
            assert!((by - sy).abs() < 1e-9);
        }
    }
}
