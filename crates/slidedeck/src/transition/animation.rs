use super::easing::Easing;

/// How long a property animation runs and along which curve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Timing {
    /// Seconds.
    pub duration: f64,
    pub easing: Easing,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            duration: 0.3,
            easing: Easing::OutQuad,
        }
    }
}

/// One interpolation from `from` to `to`, anchored at frame time `start`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Animation {
    from: f32,
    to: f32,
    start: f64,
    timing: Timing,
}

impl Animation {
    pub fn new(from: f32, to: f32, start: f64, timing: Timing) -> Self {
        Self {
            from,
            to,
            start,
            timing,
        }
    }

    pub fn progress(&self, now: f64) -> f32 {
        if self.timing.duration <= 0.0 {
            return 1.0;
        }
        ((now - self.start) / self.timing.duration).clamp(0.0, 1.0) as f32
    }

    pub fn value_at(&self, now: f64) -> f32 {
        let t = self.timing.easing.apply(self.progress(now));
        self.from + (self.to - self.from) * t
    }

    pub fn is_complete(&self, now: f64) -> bool {
        self.progress(now) >= 1.0
    }

    pub fn target(&self) -> f32 {
        self.to
    }
}

/// A scalar property that may be driven by at most one animation.
///
/// Starting an animation or setting the value replaces whatever animation was
/// in flight.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnimatedValue {
    value: f32,
    animation: Option<Animation>,
}

impl AnimatedValue {
    pub fn new(value: f32) -> Self {
        Self {
            value,
            animation: None,
        }
    }

    pub fn get(&self) -> f32 {
        self.value
    }

    pub fn set(&mut self, value: f32) {
        self.value = value;
        self.animation = None;
    }

    pub fn animate_to(&mut self, target: f32, timing: Timing, now: f64) {
        self.animation = Some(Animation::new(self.value, target, now, timing));
    }

    pub fn is_animating(&self) -> bool {
        self.animation.is_some()
    }

    /// Advance to frame time `now` and return the new value.
    pub fn tick(&mut self, now: f64) -> f32 {
        if let Some(animation) = self.animation {
            self.value = animation.value_at(now);
            if animation.is_complete(now) {
                self.value = animation.target();
                self.animation = None;
            }
        }
        self.value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-5
    }

    #[test]
    fn test_animation_interpolates() {
        let timing = Timing {
            duration: 1.0,
            easing: Easing::Linear,
        };
        let anim = Animation::new(1.0, 0.0, 10.0, timing);
        assert!(approx(anim.value_at(10.0), 1.0));
        assert!(approx(anim.value_at(10.5), 0.5));
        assert!(approx(anim.value_at(11.0), 0.0));
        assert!(approx(anim.value_at(20.0), 0.0));
        assert!(approx(anim.value_at(5.0), 1.0));
        assert!(anim.is_complete(11.0));
        assert!(!anim.is_complete(10.9));
    }

    #[test]
    fn test_zero_duration_jumps_to_target() {
        let timing = Timing {
            duration: 0.0,
            easing: Easing::OutQuad,
        };
        let anim = Animation::new(0.0, -1.0, 3.0, timing);
        assert!(approx(anim.value_at(3.0), -1.0));
    }

    #[test]
    fn test_animated_value_finishes_on_target() {
        let mut value = AnimatedValue::new(1.0);
        value.animate_to(0.0, Timing::default(), 0.0);
        assert!(value.is_animating());
        let mid = value.tick(0.15);
        assert!(mid > 0.0 && mid < 1.0);
        assert_eq!(value.tick(0.3), 0.0);
        assert!(!value.is_animating());
        assert_eq!(value.tick(5.0), 0.0);
    }

    #[test]
    fn test_last_writer_wins() {
        let mut value = AnimatedValue::new(0.0);
        value.animate_to(-1.0, Timing::default(), 0.0);
        value.tick(0.1);
        value.set(1.0);
        assert!(!value.is_animating());
        value.animate_to(0.0, Timing::default(), 0.1);
        assert!(approx(value.tick(0.1), 1.0));
        assert_eq!(value.tick(0.4), 0.0);
    }
}
