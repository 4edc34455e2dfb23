use crate::params::fields::ParamField;
use crate::prelude::ValidationResult;
use log::debug;
use serde::{Deserialize, Serialize};

/// Run configuration sent with every stream request.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct SimulationParameters {
    pub population_size: u32,
    pub transmission_rate: f64,
    pub recovery_rate: f64,
    pub movement_speed: f64,
    pub duration: u32,
}

impl Default for SimulationParameters {
    fn default() -> Self {
        Self {
            population_size: 200,
            transmission_rate: 0.2,
            recovery_rate: 0.05,
            movement_speed: 3.0,
            duration: 300,
        }
    }
}

impl SimulationParameters {
    pub fn value(&self, field: ParamField) -> f64 {
        match field {
            ParamField::PopulationSize => f64::from(self.population_size),
            ParamField::TransmissionRate => self.transmission_rate,
            ParamField::RecoveryRate => self.recovery_rate,
            ParamField::MovementSpeed => self.movement_speed,
            ParamField::Duration => f64::from(self.duration),
        }
    }

    /// Checks every field, reporting the first one out of its domain.
    pub fn validate(&self) -> ValidationResult<()> {
        for field in ParamField::ALL {
            field.validate(self.value(field))?;
        }
        Ok(())
    }

    /// Query pairs for the stream endpoint, numbers rendered as decimal strings.
    pub fn to_query(&self) -> Vec<(&'static str, String)> {
        ParamField::ALL
            .into_iter()
            .map(|field| (field.wire_name(), self.value(field).to_string()))
            .collect()
    }

    // Callers validate first; integer fields are whole and within u32 by then.
    fn assign(&mut self, field: ParamField, value: f64) {
        match field {
            ParamField::PopulationSize => self.population_size = value as u32,
            ParamField::TransmissionRate => self.transmission_rate = value,
            ParamField::RecoveryRate => self.recovery_rate = value,
            ParamField::MovementSpeed => self.movement_speed = value,
            ParamField::Duration => self.duration = value as u32,
        }
    }
}

/// Holds the operator's current parameters. Only validated values are ever stored.
#[derive(Debug, Clone, Default)]
pub struct ParameterStore {
    current: SimulationParameters,
}

impl ParameterStore {
    pub fn new(initial: SimulationParameters) -> ValidationResult<Self> {
        initial.validate()?;
        Ok(Self { current: initial })
    }

    pub fn set(&mut self, field: ParamField, value: f64) -> ValidationResult<()> {
        let value = field.validate(value)?;
        self.current.assign(field, value);
        debug!("parameter {} set to {}", field, value);
        Ok(())
    }

    pub fn set_text(&mut self, field: ParamField, input: &str) -> ValidationResult<()> {
        let value = field.parse_value(input)?;
        self.set(field, value)
    }

    /// Snapshot used to build the next connection request.
    pub fn get(&self) -> SimulationParameters {
        self.current
    }

    pub fn value(&self, field: ParamField) -> f64 {
        self.current.value(field)
    }
}
