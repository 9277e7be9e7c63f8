use crate::config::DiagramConfig;
use crate::geometry::{Point, fmt_num};
use serde::{Deserialize, Serialize};

/// Uniform scale followed by a translation: `screen = diagram * k + (x, y)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZoomTransform {
    pub k: f64,
    pub x: f64,
    pub y: f64,
}

impl Default for ZoomTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl ZoomTransform {
    pub const IDENTITY: ZoomTransform = ZoomTransform {
        k: 1.0,
        x: 0.0,
        y: 0.0,
    };

    pub fn new(k: f64, x: f64, y: f64) -> Self {
        Self { k, x, y }
    }

    pub fn apply(&self, p: Point) -> Point {
        Point::new(p.x * self.k + self.x, p.y * self.k + self.y)
    }

    pub fn invert(&self, p: Point) -> Point {
        Point::new((p.x - self.x) / self.k, (p.y - self.y) / self.k)
    }

    /// Value for the wrapping group's `transform` attribute.
    pub fn to_svg(&self) -> String {
        format!(
            "translate({},{}) scale({})",
            fmt_num(self.x),
            fmt_num(self.y),
            fmt_num(self.k)
        )
    }
}

/// Pan/zoom state of one rendered diagram. Every scale request is clamped
/// to `[min_scale, max_scale]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoomBehavior {
    pub min_scale: f64,
    pub max_scale: f64,
    transform: ZoomTransform,
}

impl ZoomBehavior {
    pub fn new(min_scale: f64, max_scale: f64) -> Self {
        Self {
            min_scale,
            max_scale,
            transform: ZoomTransform::IDENTITY,
        }
    }

    /// Starts at the diagram's initial view so the first gesture continues
    /// from what is on screen.
    pub fn from_config(config: &DiagramConfig) -> Self {
        let (x, y) = config.initial_translate;
        let mut zoom = Self::new(config.min_scale, config.max_scale);
        zoom.transform = ZoomTransform::new(zoom.constrain(config.initial_scale), x, y);
        zoom
    }

    pub fn transform(&self) -> ZoomTransform {
        self.transform
    }

    pub fn constrain(&self, k: f64) -> f64 {
        if k.is_nan() {
            return self.transform.k;
        }
        k.max(self.min_scale).min(self.max_scale)
    }

    /// Sets the scale, keeping the diagram point under `anchor` (screen
    /// coordinates) in place.
    pub fn scale_to(&mut self, k: f64, anchor: Point) -> ZoomTransform {
        let k = self.constrain(k);
        let fixed = self.transform.invert(anchor);
        self.transform = ZoomTransform::new(k, anchor.x - fixed.x * k, anchor.y - fixed.y * k);
        self.transform
    }

    pub fn scale_by(&mut self, factor: f64, anchor: Point) -> ZoomTransform {
        let k = self.transform.k * factor;
        self.scale_to(k, anchor)
    }

    /// Pans by a screen-space delta.
    pub fn translate_by(&mut self, dx: f64, dy: f64) -> ZoomTransform {
        self.transform.x += dx;
        self.transform.y += dy;
        self.transform
    }

    pub fn reset(&mut self, transform: ZoomTransform) {
        self.transform = ZoomTransform {
            k: self.constrain(transform.k),
            ..transform
        };
    }
}
