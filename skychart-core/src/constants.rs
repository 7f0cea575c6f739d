#[allow(clippy::excessive_precision)]
#[allow(clippy::approx_constant)]
pub const PI: f64 = 3.141592653589793238462643;

#[allow(clippy::excessive_precision)]
#[allow(clippy::approx_constant)]
pub const HALF_PI: f64 = 1.5707963267948966192313216;

#[allow(clippy::excessive_precision)]
#[allow(clippy::approx_constant)]
pub const TWOPI: f64 = 6.283185307179586476925287;

#[allow(clippy::excessive_precision)]
pub const DEG_TO_RAD: f64 = 1.745329251994329576923691e-2;

#[allow(clippy::excessive_precision)]
pub const RAD_TO_DEG: f64 = 57.29577951308232087679815;

/// Radians per hour of right ascension (2π / 24).
#[allow(clippy::excessive_precision)]
pub const HOUR_TO_RAD: f64 = 0.2617993877991494365385536;

#[allow(clippy::excessive_precision)]
pub const ARCMIN_TO_RAD: f64 = 2.908882086657215961539535e-4;

#[allow(clippy::excessive_precision)]
pub const MILLIARCSEC_TO_RAD: f64 = 4.848136811095359935899141e-9;

/// Reference epoch of the star catalog positions, as a Julian year.
pub const J2000_YEAR: f64 = 2000.0;
