//! Heat-overlay intensity for the map.
//!
//! A coarse step function, not a continuous normalization: each AQI bucket
//! selects one intensity and the gradient stop painted at that intensity.

/// A gradient stop: AQI values up to `max_aqi` render at `intensity` in `color`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeatStop {
    pub max_aqi: f64,
    pub intensity: f64,
    pub color: &'static str,
}

/// Heat gradient in ascending order. The last stop catches everything above 300.
pub static HEAT_GRADIENT: &[HeatStop] = &[
    HeatStop { max_aqi: 50.0, intensity: 0.2, color: "green" },
    HeatStop { max_aqi: 100.0, intensity: 0.4, color: "yellow" },
    HeatStop { max_aqi: 200.0, intensity: 0.7, color: "orange" },
    HeatStop { max_aqi: 300.0, intensity: 0.85, color: "purple" },
    HeatStop { max_aqi: f64::INFINITY, intensity: 1.0, color: "red" },
];

fn stop_for(aqi: f64) -> &'static HeatStop {
    HEAT_GRADIENT
        .iter()
        .find(|s| aqi <= s.max_aqi)
        .unwrap_or(&HEAT_GRADIENT[HEAT_GRADIENT.len() - 1])
}

/// Maps an AQI to one of {0.2, 0.4, 0.7, 0.85, 1.0}.
pub fn heat_intensity(aqi: f64) -> f64 {
    stop_for(aqi).intensity
}

/// Gradient color for an intensity produced by [`heat_intensity`].
pub fn heat_color(intensity: f64) -> &'static str {
    HEAT_GRADIENT
        .iter()
        .find(|s| intensity <= s.intensity)
        .unwrap_or(&HEAT_GRADIENT[HEAT_GRADIENT.len() - 1])
        .color
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_breakpoints() {
        assert_eq!(heat_intensity(0.0), 0.2);
        assert_eq!(heat_intensity(50.0), 0.2);
        assert_eq!(heat_intensity(51.0), 0.4);
        assert_eq!(heat_intensity(100.0), 0.4);
        assert_eq!(heat_intensity(150.0), 0.7);
        assert_eq!(heat_intensity(200.0), 0.7);
        assert_eq!(heat_intensity(300.0), 0.85);
        assert_eq!(heat_intensity(301.0), 1.0);
    }

    #[test]
    fn test_monotonic_non_decreasing() {
        let mut prev = heat_intensity(-10.0);
        let mut aqi = -10.0;
        while aqi < 600.0 {
            let next = heat_intensity(aqi);
            assert!(next >= prev, "intensity dropped at aqi {}", aqi);
            prev = next;
            aqi += 0.5;
        }
    }

    #[test]
    fn test_colors_follow_intensity() {
        assert_eq!(heat_color(heat_intensity(42.0)), "green");
        assert_eq!(heat_color(heat_intensity(120.0)), "orange");
        assert_eq!(heat_color(heat_intensity(250.0)), "purple");
        assert_eq!(heat_color(heat_intensity(450.0)), "red");
    }
}
