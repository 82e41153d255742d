//! The public entry points, bound to one constants table.

use crate::constants::PhysicalConstants;
use crate::decision::{Decision, ProcessDecisionMapper};
use crate::error::{ConfigError, TemperingValidationError};
use crate::optimizer::{WorkPlan, WorkPlanOptimizer};
use crate::recipe::{ProcessOptions, Recipe};
use crate::tempering::{TemperingBatchPlan, TemperingInput, TemperingSimulator};
use crate::viscosity::{ViscosityModel, ViscosityResult};
use std::path::Path;

/// Owns a validated constants table and exposes the four engine operations.
///
/// The engine holds no mutable state, so one instance can serve any number of
/// threads.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DoughEngine {
    constants: PhysicalConstants,
}

pub struct DoughEngineBuilder {
    constants: PhysicalConstants,
}

impl DoughEngineBuilder {
    pub fn new() -> Self {
        Self {
            constants: PhysicalConstants::default(),
        }
    }

    pub fn constants(mut self, constants: PhysicalConstants) -> Self {
        self.constants = constants;
        self
    }

    pub fn constants_file(mut self, path: &Path) -> Result<Self, ConfigError> {
        self.constants = PhysicalConstants::load_from_toml(path)?;
        Ok(self)
    }

    /// Overrides honey's specific heat, the one value known to differ between
    /// calibrations (2.2 or 3.35 kJ/kg·K).
    pub fn honey_specific_heat(mut self, kj_per_kg_k: f64) -> Self {
        self.constants.specific_heat.honey = kj_per_kg_k;
        self
    }

    pub fn build(self) -> Result<DoughEngine, ConfigError> {
        self.constants.validate()?;
        Ok(DoughEngine {
            constants: self.constants,
        })
    }
}

impl Default for DoughEngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl DoughEngine {
    pub fn builder() -> DoughEngineBuilder {
        DoughEngineBuilder::new()
    }

    pub fn constants(&self) -> &PhysicalConstants {
        &self.constants
    }

    pub fn compute_viscosity(&self, recipe: &Recipe, temperature_c: f64, options: &ProcessOptions) -> ViscosityResult {
        ViscosityModel::new(&self.constants).compute(recipe, temperature_c, options)
    }

    pub fn simulate_tempering(&self, input: &TemperingInput) -> Result<TemperingBatchPlan, TemperingValidationError> {
        TemperingSimulator::new(&self.constants).simulate(input)
    }

    pub fn find_optimal_work_plan(&self, recipe: &Recipe, options: &ProcessOptions) -> WorkPlan {
        WorkPlanOptimizer::new(&self.constants).find_optimal_work_plan(recipe, options)
    }

    pub fn decide(&self, recipe: &Recipe, options: &ProcessOptions) -> Decision {
        ProcessDecisionMapper::new(&self.constants).decide(recipe, options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_rejects_invalid_constants() {
        let mut constants = PhysicalConstants::default();
        constants.packing.max_fraction = 0.0;
        assert!(DoughEngine::builder().constants(constants).build().is_err());
    }

    #[test]
    fn test_builder_honey_override() {
        let engine = DoughEngine::builder().honey_specific_heat(3.35).build().unwrap();
        assert_eq!(engine.constants().specific_heat.honey, 3.35);
        assert_ne!(engine, DoughEngine::default());
    }

    #[test]
    fn test_engine_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<DoughEngine>();
    }
}
