//! Sexagesimal conversions and right-ascension wrapping.
//!
//! Catalogs and users give positions in base-60 notation; everything else in
//! the workspace works in radians. Right ascension uses the 24h ↔ 2π scale,
//! declination the 90° ↔ π/2 scale with an explicit [`Sign`] (so that
//! `-00° 30'` keeps its sign even though the degree field is zero).
//!
//! | Function | Direction |
//! |----------|-----------|
//! | [`to_radians_hms`] / [`from_radians_hms`] | hours-minutes-seconds ↔ radians |
//! | [`to_radians_dms`] / [`from_radians_dms`] | signed degrees-minutes-seconds ↔ radians |
//! | [`parse_hms`] / [`parse_dms`] | `"05:35:17.3"`, `"5h35m17s"`, `"-05:23:28"`, `"-5°23'28\""` → radians |
//! | [`wrap_0_2pi`] | any angle → `[0, 2π)` |
//!
//! The inverse conversions snap the seconds component to 1e-9 before
//! splitting into fields, so values produced by the forward conversion come
//! back with exact minutes rather than `29m 59.999999999s`.

use crate::constants::{DEG_TO_RAD, HOUR_TO_RAD, RAD_TO_DEG, TWOPI};
use crate::errors::AngleError;

const SECONDS_SNAP: f64 = 1e9;

/// Sign of a declination, kept separately from the degree field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sign {
    Plus,
    Minus,
}

impl Sign {
    #[inline]
    pub fn factor(self) -> f64 {
        match self {
            Self::Plus => 1.0,
            Self::Minus => -1.0,
        }
    }

    #[inline]
    pub fn as_char(self) -> char {
        match self {
            Self::Plus => '+',
            Self::Minus => '-',
        }
    }
}

/// Right ascension split into hours, minutes and seconds of time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hms {
    pub hours: u32,
    pub minutes: u32,
    pub seconds: f64,
}

/// Declination split into sign, degrees, arcminutes and arcseconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dms {
    pub sign: Sign,
    pub degrees: u32,
    pub minutes: u32,
    pub seconds: f64,
}

/// Converts hours, minutes and seconds of right ascension to radians.
#[inline]
pub fn to_radians_hms(hours: f64, minutes: f64, seconds: f64) -> f64 {
    (hours + minutes / 60.0 + seconds / 3600.0) * HOUR_TO_RAD
}

/// Converts an unsigned degree/minute/second triple plus sign to radians.
#[inline]
pub fn to_radians_dms(degrees: f64, minutes: f64, seconds: f64, sign: Sign) -> f64 {
    sign.factor() * (degrees.abs() + minutes / 60.0 + seconds / 3600.0) * DEG_TO_RAD
}

/// Splits a right ascension (radians) into hours, minutes and seconds.
///
/// The angle is wrapped into `[0, 2π)` first, so the hour field is always
/// in `0..24`.
pub fn from_radians_hms(ra: f64) -> Hms {
    let total = snap(wrap_0_2pi(ra) / HOUR_TO_RAD * 3600.0) % 86_400.0;
    let (major, minutes, seconds) = split_seconds(total);
    Hms {
        hours: major,
        minutes,
        seconds,
    }
}

/// Splits a declination (radians) into sign, degrees, arcminutes and arcseconds.
pub fn from_radians_dms(dec: f64) -> Dms {
    let sign = if dec < 0.0 { Sign::Minus } else { Sign::Plus };
    let total = snap(dec.abs() * RAD_TO_DEG * 3600.0);
    let (major, minutes, seconds) = split_seconds(total);
    Dms {
        sign,
        degrees: major,
        minutes,
        seconds,
    }
}

#[inline]
fn snap(seconds: f64) -> f64 {
    libm::round(seconds * SECONDS_SNAP) / SECONDS_SNAP
}

fn split_seconds(total: f64) -> (u32, u32, f64) {
    let major = libm::floor(total / 3600.0);
    let rest = total - major * 3600.0;
    let minutes = libm::floor(rest / 60.0);
    let seconds = rest - minutes * 60.0;
    (major as u32, minutes as u32, seconds.max(0.0))
}

/// Wraps an angle to `[0, 2π)` radians.
///
/// Tiny negative inputs would otherwise round up to exactly `2π`; those map
/// to `0.0`.
#[inline]
pub fn wrap_0_2pi(x: f64) -> f64 {
    let w = libm::fmod(x, TWOPI);
    let w = if w < 0.0 { w + TWOPI } else { w };
    if w >= TWOPI {
        0.0
    } else {
        w
    }
}

/// Parses right ascension text such as `05:35:17.3` or `5h35m17.3s`.
pub fn parse_hms(s: &str) -> Result<f64, AngleError> {
    let (sign, parts) = split_sexagesimal(s, "HMS", &[':', 'h', 'm', 's', ' '])?;
    if sign == Sign::Minus {
        return Err(AngleError::out_of_range("hours", s));
    }
    let (h, m, sec) = fields(s, "HMS", &parts)?;
    if !(0.0..24.0).contains(&h) {
        return Err(AngleError::out_of_range("hours", s));
    }
    Ok(to_radians_hms(h, m, sec))
}

/// Parses declination text such as `-05:23:28` or `-5°23'28"`.
pub fn parse_dms(s: &str) -> Result<f64, AngleError> {
    let (sign, parts) = split_sexagesimal(s, "DMS", &[':', '°', '\'', '"', 'd', 'm', 's', ' '])?;
    let (d, m, sec) = fields(s, "DMS", &parts)?;
    if d > 90.0 {
        return Err(AngleError::out_of_range("degrees", s));
    }
    let rad = to_radians_dms(d, m, sec, sign);
    if rad.abs() > 90.0 * DEG_TO_RAD + 1e-12 {
        return Err(AngleError::out_of_range("degrees", s));
    }
    Ok(rad)
}

fn split_sexagesimal<'a>(
    s: &'a str,
    kind: &'static str,
    separators: &[char],
) -> Result<(Sign, Vec<&'a str>), AngleError> {
    let trimmed = s.trim();
    let sign = if trimmed.starts_with('-') {
        Sign::Minus
    } else {
        Sign::Plus
    };
    let body = trimmed.trim_start_matches(['+', '-']);
    let parts: Vec<&str> = body
        .split(separators)
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect();
    if parts.is_empty() {
        return Err(AngleError::malformed(kind, s, "empty string"));
    }
    if parts.len() > 3 {
        return Err(AngleError::malformed(
            kind,
            s,
            "too many components (max 3)",
        ));
    }
    Ok((sign, parts))
}

fn fields(s: &str, kind: &'static str, parts: &[&str]) -> Result<(f64, f64, f64), AngleError> {
    let mut values = [0.0f64; 3];
    for (i, part) in parts.iter().enumerate() {
        let v = part
            .parse::<f64>()
            .map_err(|_| AngleError::malformed(kind, s, format!("invalid component '{part}'")))?;
        if !v.is_finite() || v < 0.0 {
            return Err(AngleError::malformed(kind, s, format!("invalid component '{part}'")));
        }
        values[i] = v;
    }
    if parts.len() > 1 && values[0].fract() != 0.0 {
        return Err(AngleError::malformed(
            kind,
            s,
            "cannot mix a fractional leading field with minutes/seconds",
        ));
    }
    if values[1] >= 60.0 {
        return Err(AngleError::out_of_range("minutes", s));
    }
    if values[2] >= 60.0 {
        return Err(AngleError::out_of_range("seconds", s));
    }
    Ok((values[0], values[1], values[2]))
}
