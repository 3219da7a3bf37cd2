//! Progress fraction for live feedback.

use crate::config::Thresholds;
use crate::exercise::Direction;

/// Linear position of `angle` between the `down` and `up` thresholds.
///
/// Returns 0 at or beyond `down`, 1 at or beyond `up`, and interpolates in
/// between. For [`Direction::Falling`] the band runs from the larger `down`
/// threshold towards the smaller `up` threshold. Non-finite angles yield 0.
#[must_use]
pub fn progress_fraction(angle: f64, thresholds: Thresholds, direction: Direction) -> f64 {
    if !angle.is_finite() {
        return 0.0;
    }
    let Thresholds { down, up } = thresholds;
    let fraction = match direction {
        Direction::Rising => (angle - down) / (up - down),
        Direction::Falling => (down - angle) / (down - up),
    };
    if fraction.is_nan() {
        return 0.0;
    }
    fraction.clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SQUAT: Thresholds = Thresholds::new(100.0, 150.0);
    const PULL_UP: Thresholds = Thresholds::new(145.0, 95.0);

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_rising_interpolation() {
        assert!(close(progress_fraction(100.0, SQUAT, Direction::Rising), 0.0));
        assert!(close(progress_fraction(125.0, SQUAT, Direction::Rising), 0.5));
        assert!(close(progress_fraction(150.0, SQUAT, Direction::Rising), 1.0));
    }

    #[test]
    fn test_rising_clamps_outside_band() {
        assert!(close(progress_fraction(40.0, SQUAT, Direction::Rising), 0.0));
        assert!(close(progress_fraction(400.0, SQUAT, Direction::Rising), 1.0));
    }

    #[test]
    fn test_falling_interpolation() {
        assert!(close(progress_fraction(145.0, PULL_UP, Direction::Falling), 0.0));
        assert!(close(progress_fraction(120.0, PULL_UP, Direction::Falling), 0.5));
        assert!(close(progress_fraction(95.0, PULL_UP, Direction::Falling), 1.0));
        assert!(close(progress_fraction(180.0, PULL_UP, Direction::Falling), 0.0));
        assert!(close(progress_fraction(10.0, PULL_UP, Direction::Falling), 1.0));
    }

    #[test]
    fn test_always_in_unit_interval() {
        let mut angle = -1_000.0;
        while angle <= 1_000.0 {
            for (thresholds, direction) in [
                (SQUAT, Direction::Rising),
                (PULL_UP, Direction::Falling),
            ] {
                let p = progress_fraction(angle, thresholds, direction);
                assert!((0.0..=1.0).contains(&p), "{p} out of range for {angle}");
            }
            angle += 7.5;
        }
        assert!(close(progress_fraction(f64::NAN, SQUAT, Direction::Rising), 0.0));
        assert!(close(progress_fraction(f64::INFINITY, SQUAT, Direction::Rising), 0.0));
    }

    #[test]
    fn test_monotone_within_band() {
        let mut previous = 0.0;
        for step in 0..=50 {
            let angle = 100.0 + f64::from(step);
            let p = progress_fraction(angle, SQUAT, Direction::Rising);
            assert!(p >= previous);
            previous = p;
        }
    }
}
