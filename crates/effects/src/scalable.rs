//! Level-scaled magnitudes.

/// One control point of a [`Curve`].
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CurveKey {
    pub time: f32,
    pub value: f32,
}

impl CurveKey {
    pub const fn new(time: f32, value: f32) -> Self {
        Self { time, value }
    }
}

/// Piecewise-linear curve. Queries outside the key range clamp to the first
/// or last key.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Curve {
    keys: Vec<CurveKey>,
}

impl Curve {
    /// Builds a curve from keys in any order. Keys with a NaN time are
    /// dropped.
    pub fn new(keys: impl IntoIterator<Item = CurveKey>) -> Self {
        let mut keys: Vec<CurveKey> = keys.into_iter().filter(|key| !key.time.is_nan()).collect();
        keys.sort_by(|a, b| a.time.total_cmp(&b.time));
        Self { keys }
    }

    pub fn keys(&self) -> &[CurveKey] {
        &self.keys
    }

    /// Evaluates the curve at `time`. An empty curve evaluates to `1.0`; a NaN
    /// `time` clamps to the first key.
    pub fn evaluate(&self, time: f32) -> f32 {
        let (Some(first), Some(last)) = (self.keys.first(), self.keys.last()) else {
            return 1.0;
        };
        if time.is_nan() || time <= first.time {
            return first.value;
        }
        if time >= last.time {
            return last.value;
        }

        let upper = self.keys.partition_point(|key| key.time <= time);
        let (a, b) = (self.keys[upper - 1], self.keys[upper]);
        let span = b.time - a.time;
        if span <= 0.0 {
            return b.value;
        }
        a.value + (b.value - a.value) * ((time - a.time) / span)
    }
}

/// A base value optionally multiplied by a curve sampled at the effect level.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScalableFloat {
    pub base_value: f32,
    pub curve: Option<Curve>,
}

impl ScalableFloat {
    pub const fn constant(base_value: f32) -> Self {
        Self {
            base_value,
            curve: None,
        }
    }

    pub fn with_curve(mut self, curve: Curve) -> Self {
        self.curve = Some(curve);
        self
    }

    pub fn get_value(&self, level: i32) -> f32 {
        match &self.curve {
            Some(curve) => self.base_value * curve.evaluate(level as f32),
            None => self.base_value,
        }
    }
}

impl From<f32> for ScalableFloat {
    fn from(base_value: f32) -> Self {
        Self::constant(base_value)
    }
}

impl From<f64> for ScalableFloat {
    fn from(base_value: f64) -> Self {
        Self::constant(base_value as f32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp() -> Curve {
        Curve::new([
            CurveKey::new(5.0, 2.0),
            CurveKey::new(1.0, 0.5),
            CurveKey::new(3.0, 1.0),
        ])
    }

    #[test]
    fn keys_are_sorted() {
        let times: Vec<f32> = ramp().keys().iter().map(|key| key.time).collect();
        assert_eq!(times, vec![1.0, 3.0, 5.0]);
    }

    #[test]
    fn interpolates_between_keys() {
        let curve = ramp();
        assert_eq!(curve.evaluate(1.0), 0.5);
        assert_eq!(curve.evaluate(2.0), 0.75);
        assert_eq!(curve.evaluate(3.0), 1.0);
        assert_eq!(curve.evaluate(4.0), 1.5);
    }

    #[test]
    fn clamps_outside_key_range() {
        let curve = ramp();
        assert_eq!(curve.evaluate(-10.0), 0.5);
        assert_eq!(curve.evaluate(99.0), 2.0);
        assert_eq!(Curve::default().evaluate(3.0), 1.0);
    }

    #[test]
    fn nan_time_clamps_to_first_key() {
        let curve = Curve::new([CurveKey::new(1.0, 0.5), CurveKey::new(3.0, 1.0)]);
        assert_eq!(curve.evaluate(f32::NAN), 0.5);
        assert_eq!(Curve::default().evaluate(f32::NAN), 1.0);
    }

    #[test]
    fn scalable_float_scales_by_level() {
        let value = ScalableFloat::constant(0.4).with_curve(ramp());
        assert_eq!(value.get_value(1), 0.2);
        assert_eq!(value.get_value(5), 0.8);
        assert_eq!(ScalableFloat::from(0.25).get_value(7), 0.25);
    }
}
