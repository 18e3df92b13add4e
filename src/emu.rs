//! English Metric Unit constants and conversions.
//!
//! All position and size values in slide markup are EMUs. Conversions from
//! inches or points happen at the CLI boundary, never inside the mutators.

/// EMUs per inch.
pub const PER_INCH: i64 = 914_400;

/// EMUs per point.
pub const PER_PT: i64 = 12_700;

/// EMUs per pixel at 96 DPI.
pub const PER_PX: i64 = 9_525;

/// Standard 16:9 slide width (13.333").
pub const SLIDE_WIDTH_16_9: i64 = 12_192_000;

/// Standard 16:9 slide height (7.5").
pub const SLIDE_HEIGHT_16_9: i64 = 6_858_000;

/// Convert inches to EMUs, rounding to the nearest unit.
pub fn from_inches(inches: f64) -> i64 {
    (inches * PER_INCH as f64).round() as i64
}

/// Convert points to EMUs, rounding to the nearest unit.
pub fn from_points(pt: f64) -> i64 {
    (pt * PER_PT as f64).round() as i64
}

/// Convert EMUs to inches for display.
pub fn to_inches(emu: i64) -> f64 {
    emu as f64 / PER_INCH as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inch_round_trip() {
        assert_eq!(from_inches(1.0), PER_INCH);
        assert_eq!(from_inches(0.5), 457_200);
        assert!((to_inches(PER_INCH) - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_points() {
        assert_eq!(from_points(1.0), PER_PT);
        assert_eq!(from_points(18.0), 228_600);
    }
}
