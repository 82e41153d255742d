use std::fmt;
use thiserror::Error;

/// Errors that can occur while loading a constants table.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Could not read constants file '{path}': {message}")]
    Io { path: String, message: String },

    #[error("Failed to parse constants TOML: {0}")]
    Parse(String),

    #[error("Invalid constants table: {0}")]
    Invalid(String),
}

/// Errors that can occur when converting a custom user format into a `Recipe`.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RecipeConversionError {
    #[error("Unknown ingredient '{0}'")]
    UnknownIngredient(String),

    #[error("Ingredient '{name}' has a non-numeric amount: {found}")]
    NonNumericAmount { name: String, found: String },

    #[error("Invalid custom data: {0}")]
    ValidationError(String),
}

/// The tempering input a violation refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TemperingField {
    EggMass,
    EggTemp,
    LiquidMass,
    LiquidTemp,
    BatchCount,
}

impl fmt::Display for TemperingField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TemperingField::EggMass => "egg_mass",
            TemperingField::EggTemp => "egg_temp",
            TemperingField::LiquidMass => "liquid_mass",
            TemperingField::LiquidTemp => "liquid_temp",
            TemperingField::BatchCount => "batch_count",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "code", rename_all = "snake_case")]
pub enum ViolationCode {
    OutOfRange { min: f64, max: f64 },
    NotFinite,
}

/// A single field-level violation.
#[derive(Error, Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[error("{field}: {}", describe(.code, .value))]
pub struct FieldViolation {
    pub field: TemperingField,
    pub code: ViolationCode,
    pub value: f64,
}

fn describe(code: &ViolationCode, value: &f64) -> String {
    match code {
        ViolationCode::OutOfRange { min, max } => {
            format!("{} is outside [{}, {}]", value, min, max)
        }
        ViolationCode::NotFinite => format!("{} is not a finite number", value),
    }
}

fn join_violations(violations: &[FieldViolation]) -> String {
    violations
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

/// Malformed or out-of-range tempering inputs. Lists every violated field.
#[derive(Error, Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[error("Invalid tempering input: {}", join_violations(.violations))]
pub struct TemperingValidationError {
    pub violations: Vec<FieldViolation>,
}

impl TemperingValidationError {
    /// Whether the given field is among the violations.
    pub fn has(&self, field: TemperingField) -> bool {
        self.violations.iter().any(|v| v.field == field)
    }
}
