use serde::{Deserialize, Serialize};

/// Geometry and interaction constants of the job diagram.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiagramConfig {
    /// Fixed canvas height.
    pub height: f64,
    /// Used when the host cannot report a usable width.
    pub fallback_width: f64,
    /// Horizontal offset of both Bezier control points from the parent.
    pub link_control_offset: f64,
    pub node_radius: f64,
    pub label_offset: f64,
    pub label_dy: f64,
    pub label_rotation_deg: f64,
    pub min_scale: f64,
    pub max_scale: f64,
    pub initial_translate: (f64, f64),
    pub initial_scale: f64,
}

impl Default for DiagramConfig {
    fn default() -> Self {
        Self {
            height: 400.0,
            fallback_width: 800.0,
            link_control_offset: 100.0,
            node_radius: 2.5,
            label_offset: 8.0,
            label_dy: 3.0,
            label_rotation_deg: -40.0,
            min_scale: 0.5,
            max_scale: 4.0,
            initial_translate: (100.0, 0.0),
            initial_scale: 0.8,
        }
    }
}

impl DiagramConfig {
    /// Picks the measured container width, or the fallback when the host
    /// reported nothing usable.
    pub fn resolve_width(&self, measured: Option<f64>) -> f64 {
        match measured {
            Some(width) if width.is_finite() && width > 0.0 => width,
            _ => self.fallback_width,
        }
    }

    /// Replaces a scale extent that cannot be clamped against (inverted,
    /// non-finite or non-positive bounds) with the default one.
    pub fn validated(mut self) -> Self {
        let (min, max) = (self.min_scale, self.max_scale);
        let usable = min.is_finite() && max.is_finite() && min > 0.0 && min <= max;
        if !usable {
            let defaults = Self::default();
            tracing::error!(
                "Invalid diagram scale extent [{}, {}], using [{}, {}]",
                min,
                max,
                defaults.min_scale,
                defaults.max_scale
            );
            self.min_scale = defaults.min_scale;
            self.max_scale = defaults.max_scale;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config: DiagramConfig = serde_json::from_str(r#"{"height": 600}"#).unwrap();
        assert_eq!(config.height, 600.0);
        assert_eq!(config.max_scale, 4.0);
        assert_eq!(config.initial_translate, (100.0, 0.0));
    }

    #[test]
    fn test_resolve_width() {
        let config = DiagramConfig::default();
        assert_eq!(config.resolve_width(Some(1024.0)), 1024.0);
        assert_eq!(config.resolve_width(Some(0.0)), 800.0);
        assert_eq!(config.resolve_width(Some(f64::NAN)), 800.0);
        assert_eq!(config.resolve_width(None), 800.0);
    }

    #[test]
    fn test_validated_restores_default_extent() {
        let inverted: DiagramConfig = serde_json::from_str(r#"{"min_scale": 5}"#).unwrap();
        let config = inverted.validated();
        assert_eq!((config.min_scale, config.max_scale), (0.5, 4.0));

        let negative = DiagramConfig {
            min_scale: -1.0,
            ..Default::default()
        };
        assert_eq!(negative.validated().min_scale, 0.5);

        let custom = DiagramConfig {
            min_scale: 1.0,
            max_scale: 2.0,
            height: 300.0,
            ..Default::default()
        };
        assert_eq!(custom.clone().validated(), custom);
    }
}
