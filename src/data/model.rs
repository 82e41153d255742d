use crate::error::RecipeConversionError;
use crate::recipe::{IntoRecipe, ProcessOptions, Recipe};
use crate::tempering::TemperingInput;
use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Liquid temperature for the tempering step when a request asks for a plan but
/// leaves the temperature out.
pub const DEFAULT_LIQUID_TEMP_C: f64 = 90.0;

/// Tempering batches used when neither the request nor the caller names a count.
pub const DEFAULT_BATCH_COUNT: u32 = 6;

/// One evaluation request, matching the JSON the tools read and write.
///
/// The recipe is a plain name → grams map so requests stay editable by hand.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct EvaluationRequest {
    pub recipe: AHashMap<String, f64>,
    #[serde(default = "default_temperature")]
    pub temperature_c: f64,
    #[serde(default)]
    pub options: ProcessOptions,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tempering: Option<TemperingInput>,
}

fn default_temperature() -> f64 {
    30.0
}

impl EvaluationRequest {
    /// Load a request from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, Box<dyn std::error::Error>> {
        let content = fs::read_to_string(path)?;
        let data = serde_json::from_str(&content)?;
        Ok(data)
    }

    /// Load a JSON array of requests, as written by `recipe-gen`.
    pub fn batch_from_file(path: impl AsRef<Path>) -> Result<Vec<Self>, Box<dyn std::error::Error>> {
        let content = fs::read_to_string(path)?;
        let data = serde_json::from_str(&content)?;
        Ok(data)
    }

    /// The classic recipe at 30 °C with a six-batch tempering plan.
    pub fn default() -> Self {
        let recipe = Recipe::classic();
        Self {
            recipe: recipe.iter().map(|(ingredient, grams)| (ingredient.name().to_string(), grams)).collect(),
            temperature_c: default_temperature(),
            options: ProcessOptions::default(),
            tempering: Some(TemperingInput::from_recipe(&recipe, 20.0, DEFAULT_LIQUID_TEMP_C, DEFAULT_BATCH_COUNT)),
        }
    }

    pub fn to_recipe(&self) -> Result<Recipe, RecipeConversionError> {
        self.recipe.clone().into_recipe()
    }

    /// Replaces the batch count of the tempering plan, deriving the plan from the
    /// recipe first when the request carries none.
    pub fn set_batch_count(&mut self, batch_count: u32) -> Result<(), RecipeConversionError> {
        let mut input = self.tempering_input(batch_count)?;
        input.batch_count = batch_count;
        self.tempering = Some(input);
        Ok(())
    }

    /// The explicit tempering input, or one derived from the recipe.
    pub fn tempering_input(&self, batch_count: u32) -> Result<TemperingInput, RecipeConversionError> {
        match &self.tempering {
            Some(input) => Ok(*input),
            None => Ok(TemperingInput::from_recipe(
                &self.to_recipe()?,
                self.options.effective_egg_temp_c(),
                DEFAULT_LIQUID_TEMP_C,
                batch_count,
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_request_uses_defaults() {
        let request: EvaluationRequest =
            serde_json::from_str(r#"{"recipe": {"flour": 500, "Eggs": 95}}"#).unwrap();
        assert_eq!(request.temperature_c, 30.0);
        assert_eq!(request.options, ProcessOptions::default());
        assert!(request.tempering.is_none());
        let recipe = request.to_recipe().unwrap();
        assert_eq!(recipe.eggs(), 95.0);
    }

    #[test]
    fn test_default_request_is_classic() {
        let request = EvaluationRequest::default();
        assert_eq!(request.to_recipe().unwrap(), Recipe::classic());
        assert_eq!(request.tempering_input(6).unwrap().batch_count, 6);
    }

    #[test]
    fn test_batch_count_overrides_explicit_plan() {
        let mut request = EvaluationRequest::default();
        let before = request.tempering.unwrap();
        request.set_batch_count(3).unwrap();

        let after = request.tempering_input(DEFAULT_BATCH_COUNT).unwrap();
        assert_eq!(after.batch_count, 3);
        assert_eq!(after.liquid_mass_g, before.liquid_mass_g);
        assert_eq!(after.egg_temp_c, before.egg_temp_c);
    }

    #[test]
    fn test_batch_count_derives_missing_plan() {
        let mut request: EvaluationRequest =
            serde_json::from_str(r#"{"recipe": {"flour": 500, "eggs": 95, "honey": 155}}"#).unwrap();
        request.set_batch_count(4).unwrap();

        let input = request.tempering.unwrap();
        assert_eq!(input.batch_count, 4);
        assert_eq!(input.liquid_mass_g, 155.0);
        assert_eq!(input.liquid_temp_c, DEFAULT_LIQUID_TEMP_C);
    }
}
