#[cfg(test)]
mod tests {
    use std::f64::consts::PI;
    use std::time::Duration;

    use crate::config::{OrbitCenter, OrbitConfig};
    use crate::constants::*;
    use crate::error::ConfigError;
    use crate::state::LightFrame;
    use crate::types::Vector3;

    fn sample_config() -> OrbitConfig {
        OrbitConfig {
            horizontal_lap_ms: 1000.0,
            vertical_lap_ms: 1000.0,
            min_vertical_angle: 0.0,
            max_vertical_angle: PI / 2.0,
            tick_interval_ms: 250.0,
            center: OrbitCenter { x: 0.0, y: 0.0 },
            radius: 1.0,
        }
    }

    // ---- Vector3 ----

    #[test]
    fn test_vector3_exposes_components_unchanged() {
        let v = Vector3::new(0.25, -1.5, 3.0);
        assert_eq!(v.x(), 0.25);
        assert_eq!(v.y(), -1.5);
        assert_eq!(v.z(), 3.0);
    }

    #[test]
    fn test_vector3_value_equality() {
        assert_eq!(Vector3::new(1.0, 2.0, 3.0), Vector3::new(1.0, 2.0, 3.0));
        assert_ne!(Vector3::new(1.0, 2.0, 3.0), Vector3::new(1.0, 2.0, 3.5));
        assert_ne!(Vector3::new(1.0, 2.0, 3.0), Vector3::new(3.0, 2.0, 1.0));
    }

    #[test]
    fn test_vector3_glam_conversions() {
        let v = Vector3::new(0.5, 0.25, 0.125);
        let single: glam::Vec3 = v.into();
        assert_eq!(single, glam::Vec3::new(0.5, 0.25, 0.125));

        let double: glam::DVec3 = v.into();
        assert_eq!(Vector3::from(double), v);
        assert_eq!(v.to_f32_array(), [0.5, 0.25, 0.125]);
    }

    #[test]
    fn test_light_frame_json() {
        let frame = LightFrame {
            tick: 3,
            position: Vector3::new(1.0, 0.0, 0.5),
        };
        let json = serde_json::to_string(&frame).unwrap();
        assert_eq!(json, r#"{"tick":3,"position":{"x":1.0,"y":0.0,"z":0.5}}"#);
        let back: LightFrame = serde_json::from_str(&json).unwrap();
        assert_eq!(back, frame);
    }

    // ---- Configuration ----

    #[test]
    fn test_default_config_is_valid() {
        let config = OrbitConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.tick_interval_ms, DEFAULT_TICK_INTERVAL_MS);
        assert_eq!(config.center.x, DEFAULT_CENTER_X);
    }

    #[test]
    fn test_sample_config_is_valid() {
        assert!(sample_config().validate().is_ok());
    }

    #[test]
    fn test_rejects_non_positive_durations() {
        let mut config = sample_config();
        config.tick_interval_ms = 0.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NonPositive {
                field: "tick_interval_ms",
                ..
            })
        ));

        let mut config = sample_config();
        config.horizontal_lap_ms = -5.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NonPositive {
                field: "horizontal_lap_ms",
                ..
            })
        ));

        let mut config = sample_config();
        config.vertical_lap_ms = f64::NAN;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NonPositive {
                field: "vertical_lap_ms",
                ..
            })
        ));
    }

    #[test]
    fn test_rejects_non_positive_radius() {
        let mut config = sample_config();
        config.radius = 0.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NonPositive { field: "radius", .. })
        ));
    }

    #[test]
    fn test_rejects_bad_vertical_range() {
        let mut config = sample_config();
        config.min_vertical_angle = -0.1;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NegativeMinAngle(_))
        ));

        let mut config = sample_config();
        config.min_vertical_angle = 1.0;
        config.max_vertical_angle = 1.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::EmptyVerticalRange { .. })
        ));
    }

    #[test]
    fn test_partial_json_takes_defaults() {
        let config = OrbitConfig::from_json_str(r#"{"radius": 0.4, "center": {"x": 0.1, "y": 0.9}}"#)
            .unwrap();
        assert_eq!(config.radius, 0.4);
        assert_eq!(config.center, OrbitCenter { x: 0.1, y: 0.9 });
        assert_eq!(config.horizontal_lap_ms, DEFAULT_HORIZONTAL_LAP_MS);
        assert_eq!(config.max_vertical_angle, DEFAULT_MAX_VERTICAL_ANGLE);

        let config = OrbitConfig::from_json_str(r#"{"center": {"x": 0.1}}"#).unwrap();
        assert_eq!(
            config.center,
            OrbitCenter {
                x: 0.1,
                y: DEFAULT_CENTER_Y
            }
        );
    }

    #[test]
    fn test_json_rejects_invalid_values() {
        let err = OrbitConfig::from_json_str(r#"{"tick_interval_ms": -1}"#).unwrap_err();
        assert!(matches!(err, ConfigError::NonPositive { .. }));
        assert!(err.to_string().contains("tick_interval_ms"));

        let err = OrbitConfig::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_tick_interval_duration() {
        assert_eq!(sample_config().tick_interval(), Duration::from_millis(250));

        let mut config = sample_config();
        config.tick_interval_ms = -3.0;
        assert_eq!(config.tick_interval(), Duration::ZERO);
    }
}
