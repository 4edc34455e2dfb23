use sirstream::{ParamField, SimulationParameters, ValidationError};

/// Raw text of each parameter input, validated on display and applied on start.
#[derive(Debug, Clone)]
pub struct ParameterForm {
    values: Vec<(ParamField, String)>,
}

impl ParameterForm {
    pub fn new(initial: &SimulationParameters) -> Self {
        Self {
            values: ParamField::ALL
                .into_iter()
                .map(|field| (field, initial.value(field).to_string()))
                .collect(),
        }
    }

    pub fn fields(&self) -> impl Iterator<Item = (ParamField, &str)> {
        self.values
            .iter()
            .map(|(field, value)| (*field, value.as_str()))
    }

    pub fn update_field(&mut self, field: ParamField, value: String) {
        if let Some(slot) = self.values.iter_mut().find(|slot| slot.0 == field) {
            slot.1 = value;
        }
    }

    pub fn problem(&self, field: ParamField) -> Option<ValidationError> {
        self.fields()
            .find(|(f, _)| *f == field)
            .and_then(|(_, value)| field.parse_value(value).err())
    }

    pub fn step_hint(field: ParamField) -> &'static str {
        match field {
            ParamField::TransmissionRate | ParamField::RecoveryRate => "0..1, step 0.05",
            ParamField::MovementSpeed => "0..50",
            ParamField::PopulationSize => "whole number, 1..5000",
            ParamField::Duration => "whole number of steps",
        }
    }
}
