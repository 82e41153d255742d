//! Heat-tempering of eggs with a hot honey/butter liquid, poured in batches.

pub mod schedule;
pub mod validation;

use crate::constants::{
    COAGULATION_CEILING_C, COAGULATION_WARNING_MARGIN_C, EPSILON, PhysicalConstants, SpecificHeats,
};
use crate::error::TemperingValidationError;
use crate::recipe::Recipe;
use serde::{Deserialize, Serialize};

/// Composition of the hot liquid, in grams.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LiquidBreakdown {
    pub butter: f64,
    pub sugar: f64,
    pub honey: f64,
    pub soda: f64,
}

impl LiquidBreakdown {
    /// Everything in the recipe that is melted together before the eggs.
    pub fn from_recipe(recipe: &Recipe) -> Self {
        Self {
            butter: recipe.butter(),
            sugar: recipe.sugar(),
            honey: recipe.honey(),
            soda: recipe.soda(),
        }
    }

    pub fn total(&self) -> f64 {
        self.parts().iter().sum()
    }

    /// Mass-weighted specific heat, or the fallback when the breakdown is empty.
    pub fn specific_heat(&self, heats: &SpecificHeats) -> f64 {
        let total = self.total();
        if total <= EPSILON {
            return heats.liquid_fallback;
        }
        let weighted: f64 = [heats.butter, heats.sugar, heats.honey, heats.soda]
            .iter()
            .zip(self.parts())
            .map(|(c, mass)| c * mass)
            .sum();
        weighted / total
    }

    fn parts(&self) -> [f64; 4] {
        [
            sanitize(self.butter),
            sanitize(self.sugar),
            sanitize(self.honey),
            sanitize(self.soda),
        ]
    }
}

fn sanitize(mass: f64) -> f64 {
    if mass.is_finite() && mass > 0.0 { mass } else { 0.0 }
}

/// Inputs for one tempering simulation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TemperingInput {
    pub egg_mass_g: f64,
    pub egg_temp_c: f64,
    pub liquid_mass_g: f64,
    pub liquid_temp_c: f64,
    pub batch_count: u32,
    #[serde(default)]
    pub liquid_breakdown: Option<LiquidBreakdown>,
}

impl TemperingInput {
    pub fn new(egg_mass_g: f64, egg_temp_c: f64, liquid_mass_g: f64, liquid_temp_c: f64, batch_count: u32) -> Self {
        Self {
            egg_mass_g,
            egg_temp_c,
            liquid_mass_g,
            liquid_temp_c,
            batch_count,
            liquid_breakdown: None,
        }
    }

    /// Eggs and hot liquid taken from a recipe.
    pub fn from_recipe(recipe: &Recipe, egg_temp_c: f64, liquid_temp_c: f64, batch_count: u32) -> Self {
        let breakdown = LiquidBreakdown::from_recipe(recipe);
        Self {
            egg_mass_g: recipe.eggs(),
            egg_temp_c,
            liquid_mass_g: breakdown.total(),
            liquid_temp_c,
            batch_count,
            liquid_breakdown: Some(breakdown),
        }
    }

    pub fn with_breakdown(mut self, breakdown: LiquidBreakdown) -> Self {
        self.liquid_breakdown = Some(breakdown);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SafetyStatus {
    Safe,
    Warning,
    Danger,
}

impl SafetyStatus {
    /// Classify a peak temperature against the coagulation ceiling.
    pub fn classify(max_temp_c: f64) -> Self {
        if max_temp_c > COAGULATION_CEILING_C {
            SafetyStatus::Danger
        } else if max_temp_c > COAGULATION_CEILING_C - COAGULATION_WARNING_MARGIN_C {
            SafetyStatus::Warning
        } else {
            SafetyStatus::Safe
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SafetyStatus::Safe => "safe",
            SafetyStatus::Warning => "warning",
            SafetyStatus::Danger => "danger",
        }
    }
}

/// One pour. Temperatures are bulk values unless noted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TemperingBatch {
    pub batch_number: u32,
    pub percentage_of_liquid: f64,
    /// The same share in hundredths of a percent; sums to exactly 10 000.
    pub percentage_hundredths: u32,
    pub liquid_mass_g: f64,
    pub temp_before_c: f64,
    pub temp_after_c: f64,
    /// Where the pour first meets the bowl.
    pub contact_temp_c: f64,
    pub mixture_mass_g: f64,
    /// Heat capacity of the bowl after this pour, kJ/K.
    pub heat_capacity_kj_per_k: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemperingBatchPlan {
    pub batches: Vec<TemperingBatch>,
    pub liquid_specific_heat: f64,
    pub final_temp_c: f64,
    pub max_batch_temp_c: f64,
    /// Zero-based index of the batch that reached `max_batch_temp_c`.
    pub critical_batch_index: usize,
    pub safety_status: SafetyStatus,
}

impl TemperingBatchPlan {
    pub fn critical_batch(&self) -> Option<&TemperingBatch> {
        self.batches.get(self.critical_batch_index)
    }
}

/// Simulates the batch-wise heat balance against one constants table.
#[derive(Debug, Clone, Copy)]
pub struct TemperingSimulator<'a> {
    constants: &'a PhysicalConstants,
}

impl<'a> TemperingSimulator<'a> {
    pub fn new(constants: &'a PhysicalConstants) -> Self {
        Self { constants }
    }

    pub fn simulate(&self, input: &TemperingInput) -> Result<TemperingBatchPlan, TemperingValidationError> {
        validation::validate(input)?;

        let heats = &self.constants.specific_heat;
        let contact_fraction = self.constants.tempering.contact_fraction;
        let liquid_specific_heat = input
            .liquid_breakdown
            .map_or(heats.liquid_fallback, |b| b.specific_heat(heats));

        let mut mass_g = input.egg_mass_g;
        let mut capacity = input.egg_mass_g / 1000.0 * heats.eggs;
        let mut temp_c = input.egg_temp_c;
        let mut batches = Vec::with_capacity(input.batch_count as usize);

        for (index, units) in schedule::ramped_schedule(input.batch_count as usize)
            .into_iter()
            .enumerate()
        {
            let batch_mass_g = input.liquid_mass_g * units as f64 / schedule::SCHEDULE_TOTAL as f64;
            let batch_capacity = batch_mass_g / 1000.0 * liquid_specific_heat;

            let contact_capacity = capacity * contact_fraction;
            let contact_temp_c = heat_balance(
                contact_capacity,
                temp_c,
                batch_capacity,
                input.liquid_temp_c,
            );
            let new_temp_c = heat_balance(capacity, temp_c, batch_capacity, input.liquid_temp_c);

            let temp_before_c = temp_c;
            mass_g += batch_mass_g;
            capacity += batch_capacity;
            temp_c = new_temp_c;

            tracing::trace!(
                batch = index + 1,
                batch_mass_g,
                contact_temp_c,
                bulk_temp_c = temp_c,
                "Poured tempering batch"
            );

            batches.push(TemperingBatch {
                batch_number: index as u32 + 1,
                percentage_of_liquid: schedule::to_percent(units),
                percentage_hundredths: units,
                liquid_mass_g: batch_mass_g,
                temp_before_c,
                temp_after_c: new_temp_c,
                contact_temp_c,
                mixture_mass_g: mass_g,
                heat_capacity_kj_per_k: capacity,
            });
        }

        let (critical_batch_index, max_batch_temp_c) = batches
            .iter()
            .enumerate()
            .fold((0, f64::NEG_INFINITY), |(best_i, best_t), (i, b)| {
                if b.contact_temp_c > best_t {
                    (i, b.contact_temp_c)
                } else {
                    (best_i, best_t)
                }
            });
        let safety_status = SafetyStatus::classify(max_batch_temp_c);

        if safety_status != SafetyStatus::Safe {
            tracing::warn!(
                max_batch_temp_c,
                batch = critical_batch_index + 1,
                ?safety_status,
                "Tempering approaches the coagulation ceiling"
            );
        }

        Ok(TemperingBatchPlan {
            batches,
            liquid_specific_heat,
            final_temp_c: temp_c,
            max_batch_temp_c,
            critical_batch_index,
            safety_status,
        })
    }
}

/// `T = (C_a * T_a + C_b * T_b) / (C_a + C_b)` for heat capacities `C`.
pub fn heat_balance(capacity_a: f64, temp_a: f64, capacity_b: f64, temp_b: f64) -> f64 {
    let total = capacity_a + capacity_b;
    if total <= EPSILON {
        return temp_a;
    }
    (capacity_a * temp_a + capacity_b * temp_b) / total
}

#[cfg(test)]
mod tests {
    use super::*;

    fn simulate(input: TemperingInput) -> TemperingBatchPlan {
        let constants = PhysicalConstants::default();
        TemperingSimulator::new(&constants).simulate(&input).unwrap()
    }

    #[test]
    fn test_three_batches_overheat() {
        let plan = simulate(TemperingInput::new(200.0, 20.0, 300.0, 90.0, 3));
        assert!(plan.max_batch_temp_c > COAGULATION_CEILING_C, "{}", plan.max_batch_temp_c);
        assert_eq!(plan.safety_status, SafetyStatus::Danger);
        assert_eq!(plan.critical_batch_index, 2);
        assert_eq!(plan.batches.len(), 3);
    }

    #[test]
    fn test_more_batches_run_cooler() {
        let three = simulate(TemperingInput::new(200.0, 20.0, 300.0, 90.0, 3));
        let six = simulate(TemperingInput::new(200.0, 20.0, 300.0, 90.0, 6));
        assert!(three.max_batch_temp_c - six.max_batch_temp_c > 3.0);
        assert_ne!(six.safety_status, SafetyStatus::Danger);
        // Same total heat either way.
        assert!((three.final_temp_c - six.final_temp_c).abs() < 1e-9);
    }

    #[test]
    fn test_bulk_temperature_rises_monotonically() {
        let plan = simulate(TemperingInput::new(150.0, 18.0, 400.0, 95.0, 5));
        for batch in &plan.batches {
            assert!(batch.temp_after_c > batch.temp_before_c);
            assert!(batch.contact_temp_c >= batch.temp_after_c);
            assert!(batch.contact_temp_c < 95.0);
        }
        let last = plan.batches.last().unwrap();
        assert!((last.mixture_mass_g - 550.0).abs() < 1e-9);
    }

    #[test]
    fn test_breakdown_changes_specific_heat() {
        let breakdown = LiquidBreakdown {
            butter: 120.0,
            sugar: 150.0,
            honey: 155.0,
            soda: 5.0,
        };
        let heats = SpecificHeats::default();
        let expected = (120.0 * 2.05 + 150.0 * 1.25 + 155.0 * 2.2 + 5.0 * 1.0) / 430.0;
        assert!((breakdown.specific_heat(&heats) - expected).abs() < 1e-12);

        let plan = simulate(TemperingInput::new(200.0, 20.0, 300.0, 90.0, 3).with_breakdown(breakdown));
        assert!((plan.liquid_specific_heat - expected).abs() < 1e-12);
    }

    #[test]
    fn test_empty_breakdown_uses_fallback() {
        let heats = SpecificHeats::default();
        assert_eq!(LiquidBreakdown::default().specific_heat(&heats), heats.liquid_fallback);
    }

    #[test]
    fn test_invalid_input_is_returned_not_panicked() {
        let constants = PhysicalConstants::default();
        let input = TemperingInput::new(200.0, 20.0, 300.0, 40.0, 1);
        let err = TemperingSimulator::new(&constants).simulate(&input).unwrap_err();
        assert_eq!(err.violations.len(), 2);
    }

    #[test]
    fn test_safety_classification() {
        assert_eq!(SafetyStatus::classify(60.0), SafetyStatus::Safe);
        assert_eq!(SafetyStatus::classify(65.0), SafetyStatus::Safe);
        assert_eq!(SafetyStatus::classify(66.5), SafetyStatus::Warning);
        assert_eq!(SafetyStatus::classify(68.0), SafetyStatus::Warning);
        assert_eq!(SafetyStatus::classify(68.1), SafetyStatus::Danger);
    }

    #[test]
    fn test_from_recipe_uses_hot_ingredients() {
        let input = TemperingInput::from_recipe(&Recipe::classic(), 20.0, 80.0, 4);
        assert_eq!(input.egg_mass_g, 95.0);
        assert_eq!(input.liquid_mass_g, 430.0);
        assert!(input.liquid_breakdown.is_some());
    }
}
