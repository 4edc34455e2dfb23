use crate::prelude::{ValidationError, ValidationResult};
use std::fmt;
use std::str::FromStr;

/// Operator-editable run parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamField {
    PopulationSize,
    TransmissionRate,
    RecoveryRate,
    MovementSpeed,
    Duration,
}

/// Inclusive domain of a field, plus whether it only takes whole numbers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldBounds {
    pub min: f64,
    pub max: f64,
    pub integer: bool,
}

impl ParamField {
    pub const ALL: [ParamField; 5] = [
        ParamField::PopulationSize,
        ParamField::TransmissionRate,
        ParamField::RecoveryRate,
        ParamField::MovementSpeed,
        ParamField::Duration,
    ];

    /// Query-string key expected by the stream endpoint.
    pub fn wire_name(self) -> &'static str {
        match self {
            ParamField::PopulationSize => "populationSize",
            ParamField::TransmissionRate => "transmissionRate",
            ParamField::RecoveryRate => "recoveryRate",
            ParamField::MovementSpeed => "movementSpeed",
            ParamField::Duration => "duration",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ParamField::PopulationSize => "Population size",
            ParamField::TransmissionRate => "Transmission rate",
            ParamField::RecoveryRate => "Recovery rate",
            ParamField::MovementSpeed => "Movement speed",
            ParamField::Duration => "Duration",
        }
    }

    pub fn bounds(self) -> FieldBounds {
        match self {
            ParamField::PopulationSize => FieldBounds {
                min: 1.0,
                max: 5000.0,
                integer: true,
            },
            ParamField::TransmissionRate | ParamField::RecoveryRate => FieldBounds {
                min: 0.0,
                max: 1.0,
                integer: false,
            },
            ParamField::MovementSpeed => FieldBounds {
                min: 0.0,
                max: 50.0,
                integer: false,
            },
            ParamField::Duration => FieldBounds {
                min: 1.0,
                max: 100_000.0,
                integer: true,
            },
        }
    }

    /// Checks `value` against the field's domain and returns it unchanged on success.
    pub fn validate(self, value: f64) -> ValidationResult<f64> {
        let field = self.wire_name();
        if !value.is_finite() {
            return Err(ValidationError::NonFinite { field });
        }
        let bounds = self.bounds();
        if bounds.integer && value.fract() != 0.0 {
            return Err(ValidationError::NotAnInteger { field, value });
        }
        if value < bounds.min || value > bounds.max {
            return Err(ValidationError::OutOfRange {
                field,
                value,
                min: bounds.min,
                max: bounds.max,
            });
        }
        Ok(value)
    }

    /// Parses operator text as a decimal number and validates it.
    pub fn parse_value(self, input: &str) -> ValidationResult<f64> {
        let value = input
            .trim()
            .parse::<f64>()
            .map_err(|_| ValidationError::NotANumber {
                field: self.wire_name(),
                input: input.to_string(),
            })?;
        self.validate(value)
    }
}

impl fmt::Display for ParamField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_name())
    }
}

impl FromStr for ParamField {
    type Err = ValidationError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        let name = name.trim();
        ParamField::ALL
            .into_iter()
            .find(|field| {
                let wire = field.wire_name();
                wire == name || wire.eq_ignore_ascii_case(&name.replace('_', ""))
            })
            .ok_or_else(|| ValidationError::UnknownField(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_names_accept_wire_and_snake_case() {
        assert_eq!(
            "populationSize".parse::<ParamField>(),
            Ok(ParamField::PopulationSize)
        );
        assert_eq!(
            "movement_speed".parse::<ParamField>(),
            Ok(ParamField::MovementSpeed)
        );
        assert_eq!(
            "contactRadius".parse::<ParamField>(),
            Err(ValidationError::UnknownField("contactRadius".into()))
        );
    }

    #[test]
    fn rates_are_bounded_to_unit_interval() {
        assert_eq!(ParamField::RecoveryRate.validate(0.0), Ok(0.0));
        assert_eq!(ParamField::RecoveryRate.validate(1.0), Ok(1.0));
        assert!(matches!(
            ParamField::TransmissionRate.validate(1.2),
            Err(ValidationError::OutOfRange { max, .. }) if max == 1.0
        ));
    }

    #[test]
    fn integer_fields_reject_fractions_and_nan() {
        assert!(matches!(
            ParamField::PopulationSize.validate(12.5),
            Err(ValidationError::NotAnInteger { .. })
        ));
        assert!(matches!(
            ParamField::Duration.validate(f64::NAN),
            Err(ValidationError::NonFinite { .. })
        ));
        assert!(matches!(
            ParamField::PopulationSize.validate(0.0),
            Err(ValidationError::OutOfRange { .. })
        ));
    }

    #[test]
    fn parse_value_rejects_garbage_text() {
        assert_eq!(ParamField::MovementSpeed.parse_value(" 2.5 "), Ok(2.5));
        assert!(matches!(
            ParamField::MovementSpeed.parse_value("fast"),
            Err(ValidationError::NotANumber { .. })
        ));
        assert!(matches!(
            ParamField::MovementSpeed.parse_value("inf"),
            Err(ValidationError::NonFinite { .. })
        ));
    }
}
