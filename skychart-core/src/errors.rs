//! Error types for field construction and angle parsing.
//!
//! | Type | Raised by | Meaning |
//! |------|-----------|---------|
//! | [`FieldError`] | [`Field::new`](crate::Field::new) | Degenerate radius or out-of-domain centre |
//! | [`AngleError`] | [`angle::parse_hms`](crate::angle::parse_hms), [`angle::parse_dms`](crate::angle::parse_dms) | Malformed sexagesimal text |
//!
//! Every variant names the parameter or input text that caused it so the
//! caller can report it without extra context.

use thiserror::Error;

/// A chart field that cannot be projected.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FieldError {
    #[error("Invalid field radius {radius} rad: {message}")]
    InvalidRadius { radius: f64, message: String },

    #[error("Invalid field centre {parameter} = {value}: {message}")]
    InvalidCenter {
        parameter: &'static str,
        value: f64,
        message: String,
    },

    #[error("Non-finite field parameter: {parameter}")]
    NotFinite { parameter: &'static str },
}

pub type FieldResult<T> = Result<T, FieldError>;

impl FieldError {
    pub fn invalid_radius(radius: f64, message: impl Into<String>) -> Self {
        Self::InvalidRadius {
            radius,
            message: message.into(),
        }
    }

    pub fn invalid_center(parameter: &'static str, value: f64, message: impl Into<String>) -> Self {
        Self::InvalidCenter {
            parameter,
            value,
            message: message.into(),
        }
    }

    pub fn not_finite(parameter: &'static str) -> Self {
        Self::NotFinite { parameter }
    }
}

/// Sexagesimal text that could not be turned into an angle.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AngleError {
    #[error("Malformed {kind} angle '{input}': {message}")]
    Malformed {
        kind: &'static str,
        input: String,
        message: String,
    },

    #[error("{component} out of range in '{input}'")]
    OutOfRange {
        component: &'static str,
        input: String,
    },
}

impl AngleError {
    pub fn malformed(kind: &'static str, input: &str, message: impl Into<String>) -> Self {
        Self::Malformed {
            kind,
            input: input.to_string(),
            message: message.into(),
        }
    }

    pub fn out_of_range(component: &'static str, input: &str) -> Self {
        Self::OutOfRange {
            component,
            input: input.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_radius_names_value() {
        let err = FieldError::invalid_radius(-0.5, "radius must be positive");
        let msg = err.to_string();
        assert!(msg.contains("-0.5"));
        assert!(msg.contains("radius must be positive"));
    }

    #[test]
    fn test_invalid_center_names_parameter() {
        let err = FieldError::invalid_center("dec", 2.0, "outside [-pi/2, pi/2]");
        assert!(err.to_string().contains("dec"));
    }

    #[test]
    fn test_malformed_angle_names_input() {
        let err = AngleError::malformed("HMS", "12:xx:00", "invalid minutes");
        assert!(err.to_string().contains("12:xx:00"));
    }
}
