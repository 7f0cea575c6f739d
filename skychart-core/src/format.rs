//! Text formatting for chart captions, legends and output file names.
//!
//! Every number printed on a chart goes through one of these functions so the
//! rounding is explicit and tested instead of depending on `{}` formatting of
//! floats.
//!
//! # Rounding rules
//!
//! | Function | Rule |
//! |----------|------|
//! | [`format_ra`] | truncate hours and minutes, round seconds half up, carry `60s → 1m`, `60m → 1h`, `24h → 0h` |
//! | [`format_dec`] | truncate degrees and arcminutes, round arcseconds half up, carry `60" → 1'`, `60' → 1°` |
//! | [`format_magnitude`] | one decimal, half away from zero, never prints `-0.0` |
//! | [`format_arcmin_label`] | exact: whole arcminutes below 1°, otherwise degrees and arcminutes |
//!
//! ```
//! use skychart_core::format::{format_coordinates, format_magnitude, RaUnits};
//! use skychart_core::SkyPoint;
//!
//! let m42 = SkyPoint::from_degrees(83.8221, -5.3911);
//! assert_eq!(format_coordinates(m42, &RaUnits::HMS), "5h35m17s -5°23'28\"");
//! assert_eq!(format_magnitude(4.25), "4.3");
//! ```

use crate::constants::RAD_TO_DEG;
use crate::field::SkyPoint;

/// Unit suffixes for right ascension. Localised per chart language.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RaUnits {
    pub hours: &'static str,
    pub minutes: &'static str,
    pub seconds: &'static str,
}

impl RaUnits {
    pub const HMS: Self = Self {
        hours: "h",
        minutes: "m",
        seconds: "s",
    };
}

impl Default for RaUnits {
    fn default() -> Self {
        Self::HMS
    }
}

/// Splits a non-negative value into whole units, whole sixtieths and rounded
/// 3600ths, with carries applied. The first component is not wrapped.
fn sexagesimal_rounded(value: f64) -> (u32, u32, u32) {
    let mut whole = value.trunc() as u32;
    let minutes_f = (value - whole as f64) * 60.0;
    let mut minutes = minutes_f.trunc() as u32;
    let mut seconds = ((minutes_f - minutes as f64) * 60.0 + 0.5).floor() as u32;
    if seconds >= 60 {
        minutes += 1;
        seconds = 0;
    }
    if minutes >= 60 {
        whole += 1;
        minutes = 0;
    }
    (whole, minutes, seconds)
}

/// Right ascension (radians) as `5h35m17s`.
pub fn format_ra(ra: f64, units: &RaUnits) -> String {
    let hours = crate::angle::wrap_0_2pi(ra) * RAD_TO_DEG / 15.0;
    let (mut h, m, s) = sexagesimal_rounded(hours);
    if h >= 24 {
        h = 0;
    }
    format!(
        "{h}{}{m}{}{s}{}",
        units.hours, units.minutes, units.seconds
    )
}

/// Declination (radians) as `-5°23'28"`. The sign is always printed.
pub fn format_dec(dec: f64) -> String {
    let sign = if dec < 0.0 { '-' } else { '+' };
    let (d, m, s) = sexagesimal_rounded(dec.abs() * RAD_TO_DEG);
    format!("{sign}{d}°{m}'{s}\"")
}

/// Right ascension and declination separated by a space.
pub fn format_coordinates(point: SkyPoint, units: &RaUnits) -> String {
    format!("{} {}", format_ra(point.ra, units), format_dec(point.dec))
}

/// Magnitude with one decimal, rounded half away from zero.
///
/// The binary value is rounded, so `2.25` (exact) prints `2.3` while `1.15`
/// (stored slightly below) prints `1.1`.
pub fn format_magnitude(mag: f64) -> String {
    let tenths = (mag * 10.0).round();
    if tenths == 0.0 {
        return "0.0".to_string();
    }
    format!("{:.1}", tenths / 10.0)
}

/// Integer magnitude label used by the magnitude scale.
pub fn format_magnitude_label(mag: i32) -> String {
    mag.to_string()
}

/// Ruler label for a whole number of arcminutes: `30'`, `1°`, `1°30'`.
pub fn format_arcmin_label(arcmin: u32) -> String {
    let (degrees, minutes) = (arcmin / 60, arcmin % 60);
    match (degrees, minutes) {
        (0, m) => format!("{m}'"),
        (d, 0) => format!("{d}°"),
        (d, m) => format!("{d}°{m}'"),
    }
}

/// File name for one chart of a batch: `m31.svg`.
pub fn batch_file_name(catalog: &str, number: &str, extension: &str) -> String {
    let stem: String = catalog
        .chars()
        .chain(number.chars())
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect();
    format!("{stem}.{}", extension.trim_start_matches('.'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::angle::{to_radians_dms, to_radians_hms};
    use crate::Sign;

    #[test]
    fn test_format_ra_rounds_seconds() {
        let ra = to_radians_hms(5.0, 35.0, 17.3);
        assert_eq!(format_ra(ra, &RaUnits::HMS), "5h35m17s");
        let ra = to_radians_hms(5.0, 35.0, 17.6);
        assert_eq!(format_ra(ra, &RaUnits::HMS), "5h35m18s");
    }

    #[test]
    fn test_format_ra_carries() {
        let ra = to_radians_hms(5.0, 59.0, 59.7);
        assert_eq!(format_ra(ra, &RaUnits::HMS), "6h0m0s");
        let ra = to_radians_hms(23.0, 59.0, 59.9);
        assert_eq!(format_ra(ra, &RaUnits::HMS), "0h0m0s");
    }

    #[test]
    fn test_format_ra_localised_units() {
        let units = RaUnits {
            hours: "u",
            ..RaUnits::HMS
        };
        assert_eq!(format_ra(to_radians_hms(12.0, 0.0, 0.0), &units), "12u0m0s");
    }

    #[test]
    fn test_format_dec_sign_and_carry() {
        let dec = to_radians_dms(5.0, 23.0, 28.0, Sign::Minus);
        assert_eq!(format_dec(dec), "-5°23'28\"");
        assert_eq!(format_dec(0.0), "+0°0'0\"");
        let dec = to_radians_dms(41.0, 59.0, 59.8, Sign::Plus);
        assert_eq!(format_dec(dec), "+42°0'0\"");
    }

    #[test]
    fn test_format_magnitude() {
        assert_eq!(format_magnitude(5.0), "5.0");
        assert_eq!(format_magnitude(2.25), "2.3");
        assert_eq!(format_magnitude(-1.25), "-1.3");
        assert_eq!(format_magnitude(-0.04), "0.0");
        assert_eq!(format_magnitude(11.96), "12.0");
    }

    #[test]
    fn test_format_arcmin_label() {
        assert_eq!(format_arcmin_label(1), "1'");
        assert_eq!(format_arcmin_label(30), "30'");
        assert_eq!(format_arcmin_label(60), "1°");
        assert_eq!(format_arcmin_label(1200), "20°");
        assert_eq!(format_arcmin_label(90), "1°30'");
    }

    #[test]
    fn test_batch_file_name() {
        assert_eq!(batch_file_name("M", "31", "svg"), "m31.svg");
        assert_eq!(batch_file_name("M", "101", ".png"), "m101.png");
    }
}
