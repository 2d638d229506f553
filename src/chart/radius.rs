const RADIUS_EXPONENT: f64 = 0.5;
pub const MIN_RADIUS: f32 = 3.0;

/// Square-root scale from a monetary value to a bubble radius, so bubble area tracks value.
///
/// The domain is fixed at load time to `[0, max latest-year expenditures]` and is not
/// re-normalized when the scaling variable or year changes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RadiusScale {
    domain_max: f64,
    out_min: f32,
    out_max: f32,
}

impl RadiusScale {
    pub fn new(domain_max: f64, canvas_height: f32) -> Self {
        Self {
            domain_max,
            out_min: MIN_RADIUS,
            out_max: (canvas_height / 7.5).max(MIN_RADIUS),
        }
    }

    pub fn domain_max(&self) -> f64 {
        self.domain_max
    }

    pub fn range(&self) -> (f32, f32) {
        (self.out_min, self.out_max)
    }

    pub fn radius(&self, value: f64) -> f32 {
        if !(self.domain_max > 0.0) || !(value > 0.0) {
            return self.out_min;
        }

        let t = (value / self.domain_max).powf(RADIUS_EXPONENT) as f32;
        self.out_min + (self.out_max - self.out_min) * t
    }

    /// Repulsive charge for a bubble of the given radius.
    pub fn charge(radius: f32) -> f32 {
        -(radius * radius) / 8.0
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn zero_maps_to_the_minimum_radius() {
        let scale = RadiusScale::new(1_000.0, 750.0);
        assert_eq!(scale.radius(0.0), MIN_RADIUS);
        assert_eq!(scale.range(), (3.0, 100.0));
    }

    #[test]
    fn domain_maximum_maps_to_the_maximum_radius() {
        let scale = RadiusScale::new(400.0, 750.0);
        assert!((scale.radius(400.0) - 100.0).abs() < 1e-4);
        assert!((scale.radius(100.0) - (3.0 + 97.0 * 0.5)).abs() < 1e-4);
    }

    #[test]
    fn degenerate_domain_and_negative_values_do_not_panic() {
        let empty = RadiusScale::new(0.0, 750.0);
        assert_eq!(empty.radius(50.0), MIN_RADIUS);

        let scale = RadiusScale::new(10.0, 750.0);
        assert_eq!(scale.radius(-5.0), MIN_RADIUS);
        assert_eq!(scale.radius(f64::NAN), MIN_RADIUS);
    }

    #[test]
    fn charge_is_negative_radius_squared_over_eight() {
        assert_eq!(RadiusScale::charge(4.0), -2.0);
        assert_eq!(RadiusScale::charge(0.0), 0.0);
    }

    proptest! {
        #[test]
        fn radius_is_monotonic(
            max in 1.0..1e9f64,
            a in -1e3..1e9f64,
            b in -1e3..1e9f64,
        ) {
            let scale = RadiusScale::new(max, 667.0);
            let (low, high) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(scale.radius(low) <= scale.radius(high));
            prop_assert!(scale.radius(low) >= MIN_RADIUS);
        }
    }
}
