/// Timing curves, named after their config spelling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Easing {
    Linear,
    InQuad,
    #[default]
    OutQuad,
    InOutQuad,
    OutCubic,
}

impl Easing {
    pub const NAMES: [&'static str; 5] = ["linear", "in_quad", "out_quad", "in_out_quad", "out_cubic"];

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "linear" => Some(Self::Linear),
            "in_quad" => Some(Self::InQuad),
            "out_quad" => Some(Self::OutQuad),
            "in_out_quad" => Some(Self::InOutQuad),
            "out_cubic" => Some(Self::OutCubic),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Linear => "linear",
            Self::InQuad => "in_quad",
            Self::OutQuad => "out_quad",
            Self::InOutQuad => "in_out_quad",
            Self::OutCubic => "out_cubic",
        }
    }

    /// Map linear progress `t` in `0..=1` onto the curve.
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::InQuad => t * t,
            Self::OutQuad => -t * (t - 2.0),
            Self::InOutQuad => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
                }
            }
            Self::OutCubic => 1.0 - (1.0 - t).powi(3),
        }
    }
}

impl std::fmt::Display for Easing {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Easing; 5] = [
        Easing::Linear,
        Easing::InQuad,
        Easing::OutQuad,
        Easing::InOutQuad,
        Easing::OutCubic,
    ];

    #[test]
    fn test_endpoints() {
        for easing in ALL {
            assert!(easing.apply(0.0).abs() < 1e-6, "{easing} at 0");
            assert!((easing.apply(1.0) - 1.0).abs() < 1e-6, "{easing} at 1");
        }
    }

    #[test]
    fn test_out_quad_decelerates() {
        assert!((Easing::OutQuad.apply(0.5) - 0.75).abs() < 1e-6);
        assert!(Easing::OutQuad.apply(0.25) > 0.25);
    }

    #[test]
    fn test_progress_is_clamped() {
        assert_eq!(Easing::OutQuad.apply(-1.0), 0.0);
        assert_eq!(Easing::OutQuad.apply(3.0), 1.0);
    }

    #[test]
    fn test_names_round_trip() {
        for name in Easing::NAMES {
            assert_eq!(Easing::from_name(name).map(Easing::name), Some(name));
        }
        assert_eq!(Easing::from_name("bounce"), None);
    }
}
