mod electrolyte;

pub use electrolyte::{
    ADVANCED_ELECTROLYTE_COLUMNS, ElectrolyteTable, advanced_electrolyte_model,
    advanced_electrolyte_model_from_str,
};

use crate::domain::{ParamError, ParamResult, ParameterValue, StageKind};
use crate::parameters::{ParameterSet, ParameterView};
use crate::pipeline::Stage;
use indexmap::IndexMap;
use serde_json::Value;
use std::fs;
use std::path::Path;

/// Stage that contributes a fixed mapping and ignores prior parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct DirectEntry {
    parameters: ParameterSet,
    source: String,
}

impl DirectEntry {
    pub fn new(parameters: ParameterSet, source: impl Into<String>) -> Self {
        Self {
            parameters,
            source: source.into(),
        }
    }

    pub fn parameters(&self) -> &ParameterSet {
        &self.parameters
    }

    /// Loads a flat JSON object of numeric parameters.
    pub fn from_json_file(path: impl AsRef<Path>, source: impl Into<String>) -> ParamResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|error| {
            ParamError::io_system(
                "IO.PARAMETER_FILE",
                format!("failed to read parameter file '{}': {}", path.display(), error),
            )
        })?;
        let parameters = parse_parameter_json(&content).map_err(|error| {
            ParamError::input_validation(
                error.placeholder(),
                format!("{} in '{}'", error.message(), path.display()),
            )
        })?;
        Ok(Self::new(parameters, source))
    }
}

impl Stage for DirectEntry {
    fn source(&self) -> &str {
        &self.source
    }

    fn kind(&self) -> StageKind {
        StageKind::DirectEntry
    }

    fn run(&self, _parameters: ParameterView<'_>) -> ParamResult<ParameterSet> {
        Ok(self.parameters.clone())
    }
}

pub fn parse_parameter_json(content: &str) -> ParamResult<ParameterSet> {
    let entries: IndexMap<String, Value> = serde_json::from_str(content).map_err(|error| {
        ParamError::input_validation(
            "INPUT.PARAMETER_JSON",
            format!(
                "parameter JSON must be an object of key/number pairs: {}",
                error
            ),
        )
    })?;

    let mut parameters = ParameterSet::new();
    for (key, value) in entries {
        let number = value.as_f64().ok_or_else(|| {
            ParamError::input_validation(
                "INPUT.PARAMETER_JSON",
                format!("parameter '{}' must be a number, got {}", key, value),
            )
        })?;
        parameters.insert(key, ParameterValue::Number(number));
    }
    Ok(parameters)
}

pub fn standard_defaults() -> DirectEntry {
    let parameters = ParameterSet::new()
        .with("Negative electrode cation signed stoichiometry", -1.0)
        .with("Negative electrode electrons in reaction", 1.0)
        .with("Positive electrode cation signed stoichiometry", -1.0)
        .with("Positive electrode electrons in reaction", 1.0)
        .with("Number of cells connected in series to make a battery", 1.0)
        .with("Number of electrodes connected in parallel to make a cell", 1.0);
    DirectEntry::new(
        parameters,
        "Standard defaults for parameters that are not explicitly set by the user",
    )
}

pub fn temperatures(temperature: f64) -> DirectEntry {
    let parameters = ParameterSet::new()
        .with("Reference temperature [K]", temperature)
        .with("Ambient temperature [K]", temperature)
        .with("Initial temperature [K]", temperature);
    DirectEntry::new(
        parameters,
        format!("All 'temperature' parameters set to {} [K]", temperature),
    )
}

pub fn constant_electrolyte(concentration: f64) -> DirectEntry {
    let parameters = ParameterSet::new()
        .with("Initial concentration in electrolyte [mol.m-3]", concentration)
        .with("Typical electrolyte concentration [mol.m-3]", concentration);
    DirectEntry::new(
        parameters,
        format!("Electrolyte concentration set to {} [mol.m-3]", concentration),
    )
}
