use crate::config::band_thresholds::{MODERATE_MAX, STRONG_MAX};
use crate::types::ColorBand;

/// Classify a delta into its severity band. None (and NaN) map to no band.
/// Zero counts as batter-favoring.
pub fn classify(delta: Option<f64>) -> Option<ColorBand> {
    let d = delta.filter(|d| !d.is_nan())?;
    let band = if d <= -STRONG_MAX {
        ColorBand::DarkRed
    } else if d <= -MODERATE_MAX {
        ColorBand::MediumRed
    } else if d < 0.0 {
        ColorBand::LightRed
    } else if d <= MODERATE_MAX {
        ColorBand::LightGreen
    } else if d <= STRONG_MAX {
        ColorBand::MediumGreen
    } else {
        ColorBand::DarkGreen
    };
    Some(band)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn band(d: f64) -> ColorBand {
        classify(Some(d)).unwrap()
    }

    #[test]
    fn null_and_nan_have_no_band() {
        assert_eq!(classify(None), None);
        assert_eq!(classify(Some(f64::NAN)), None);
    }

    #[test]
    fn boundaries() {
        assert_eq!(band(-45.0), ColorBand::DarkRed);
        assert_eq!(band(-44.999), ColorBand::MediumRed);
        assert_eq!(band(-20.0), ColorBand::MediumRed);
        assert_eq!(band(-19.999), ColorBand::LightRed);
        assert_eq!(band(-0.0001), ColorBand::LightRed);
        assert_eq!(band(0.0), ColorBand::LightGreen);
        assert_eq!(band(20.0), ColorBand::LightGreen);
        assert_eq!(band(20.0001), ColorBand::MediumGreen);
        assert_eq!(band(45.0), ColorBand::MediumGreen);
        assert_eq!(band(45.0001), ColorBand::DarkGreen);
    }

    #[test]
    fn negative_zero_is_batter_favoring() {
        assert_eq!(band(-0.0), ColorBand::LightGreen);
    }

    #[test]
    fn extremes_land_in_outer_bands() {
        assert_eq!(band(f64::MIN), ColorBand::DarkRed);
        assert_eq!(band(f64::NEG_INFINITY), ColorBand::DarkRed);
        assert_eq!(band(f64::MAX), ColorBand::DarkGreen);
        assert_eq!(band(f64::INFINITY), ColorBand::DarkGreen);
    }

    #[test]
    fn bands_are_monotonic_across_a_sweep() {
        let mut prev = band(-100.0);
        let mut d = -100.0;
        while d <= 100.0 {
            let b = band(d);
            assert!(b >= prev, "band went backwards at {d}");
            prev = b;
            d += 0.25;
        }
        assert_eq!(prev, ColorBand::DarkGreen);
    }
}
