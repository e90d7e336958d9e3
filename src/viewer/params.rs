/// A bounded, steppable control value. `value` always stays inside
/// `[min, max]`; `step` is the granularity UI sliders snap to.
#[derive(Debug, Clone, Copy)]
pub struct RangeParam {
    pub min: f32,
    pub max: f32,
    pub step: f32,
    value: f32,
}

impl RangeParam {
    pub fn new(min: f32, max: f32, step: f32, value: f32) -> Self {
        Self {
            min,
            max,
            step,
            value: value.clamp(min, max),
        }
    }

    /// Clamp `v` into the range and store it. Returns the stored value.
    pub fn set(&mut self, v: f32) -> f32 {
        self.value = v.clamp(self.min, self.max);
        self.value
    }

    pub fn value(&self) -> f32 {
        self.value
    }
}

/// Range constants for one slider.
#[derive(Debug, Clone, Copy)]
pub struct ParamRange {
    pub min: f32,
    pub max: f32,
    pub step: f32,
}

impl ParamRange {
    pub fn with_value(&self, value: f32) -> RangeParam {
        RangeParam::new(self.min, self.max, self.step, value)
    }
}

pub const SPEED_RANGE: ParamRange = ParamRange {
    min: 0.0,
    max: 5.0,
    step: 0.1,
};
pub const DIRECTION_RANGE: ParamRange = ParamRange {
    min: 0.0,
    max: std::f32::consts::TAU,
    step: 0.01,
};
pub const HEIGHT_RANGE: ParamRange = ParamRange {
    min: -3.0,
    max: 0.9,
    step: 0.01,
};
pub const TILT_RANGE: ParamRange = ParamRange {
    min: -0.5,
    max: 1.0,
    step: 0.01,
};
pub const SCALE_RANGE: ParamRange = ParamRange {
    min: 5.0,
    max: 10.0,
    step: 0.1,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn in_bounds_value_round_trips() {
        let mut p = SPEED_RANGE.with_value(1.0);
        assert_eq!(p.set(2.5), 2.5);
        assert_eq!(p.value(), 2.5);
        assert_eq!(p.set(2.5), 2.5);
    }

    #[test]
    fn out_of_bounds_values_clamp() {
        let mut p = SCALE_RANGE.with_value(7.0);
        assert_eq!(p.set(99.0), 10.0);
        assert_eq!(p.set(-99.0), 5.0);
    }

    #[test]
    fn initial_value_clamps_too() {
        let p = TILT_RANGE.with_value(3.0);
        assert_eq!(p.value(), 1.0);
    }
}
