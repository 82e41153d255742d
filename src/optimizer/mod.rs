//! Temperature search for the most workable dough, plus the corrective plan when
//! no temperature gets there.
//!
//! The search is a fixed coarse grid followed by a finer grid around the coarse
//! optimum, so every call evaluates a bounded number of points. It always returns
//! the best point found; whether that point is good enough is for [`crate::decision`].

pub mod band;
pub mod correction;
pub mod cost;

pub use band::ViscosityBand;
pub use correction::Correction;
pub use cost::CostBreakdown;

use crate::constants::PhysicalConstants;
use crate::decision::Status;
use crate::numeric::{grid, round_to};
use crate::recipe::{ProcessOptions, Recipe};
use crate::viscosity::{DoughState, ViscosityModel};
use correction::{flour_correction, liquid_correction};
use cost::evaluate_cost;
use serde::{Deserialize, Serialize};

/// Best working point found by the search.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlanA {
    pub optimal_temp_c: f64,
    pub eta_at_optimal: f64,
    pub band: ViscosityBand,
    pub hydration_pct: f64,
    pub packing_effective: f64,
    pub cost: CostBreakdown,
}

/// A recipe correction and where the corrected dough works best.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlanB {
    pub correction: Correction,
    pub suggested_temp_c: f64,
    pub eta_at_suggested: f64,
    pub band_at_suggested: ViscosityBand,
}

impl PlanB {
    pub fn delta_flour_grams(&self) -> Option<f64> {
        match self.correction {
            Correction::AddFlour { grams, .. } => Some(grams),
            Correction::AddLiquid { .. } => None,
        }
    }

    pub fn delta_liquid_ml(&self) -> Option<f64> {
        match self.correction {
            Correction::AddLiquid { ml } => Some(ml),
            Correction::AddFlour { .. } => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WorkPlan {
    pub plan_a: PlanA,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plan_b: Option<PlanB>,
    /// A sticky dough close enough to target to be worked with care.
    pub operational_override: bool,
    pub evaluated_points: usize,
}

impl WorkPlan {
    /// Status implied by the band, after the operational override.
    pub fn status(&self) -> Status {
        match self.plan_a.band.status() {
            Status::Wait if self.operational_override => Status::Go,
            status => status,
        }
    }
}

/// Unrounded result of one search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchOutcome {
    pub state: DoughState,
    pub cost: CostBreakdown,
    pub evaluated_points: usize,
}

/// Whether a sticky dough is close enough to target to work anyway.
pub fn operational_override(
    band: ViscosityBand,
    hydration_pct: f64,
    viscosity_cp: f64,
    constants: &PhysicalConstants,
) -> bool {
    let decision = &constants.decision;
    band == ViscosityBand::Sticky
        && (hydration_pct - constants.correction.target_hydration_pct).abs() <= decision.override_window_pct
        && viscosity_cp >= decision.override_viscosity_ratio * constants.bands.optimal_min
}

#[derive(Debug, Clone, Copy)]
pub struct WorkPlanOptimizer<'a> {
    constants: &'a PhysicalConstants,
    model: ViscosityModel<'a>,
}

impl<'a> WorkPlanOptimizer<'a> {
    pub fn new(constants: &'a PhysicalConstants) -> Self {
        Self {
            constants,
            model: ViscosityModel::new(constants),
        }
    }

    pub fn find_optimal_work_plan(&self, recipe: &Recipe, options: &ProcessOptions) -> WorkPlan {
        let outcome = self.search(recipe, options);
        let state = &outcome.state;
        let eta = state.viscosity_cp();
        let band = ViscosityBand::classify(eta, &self.constants.bands);

        let plan_b = match band {
            ViscosityBand::Optimal => None,
            _ => self.corrective_plan(recipe, options, state, band),
        };
        let operational_override = operational_override(band, state.hydration_pct(), eta, self.constants);

        tracing::debug!(
            temperature_c = state.temperature_c,
            viscosity_cp = eta,
            %band,
            operational_override,
            has_plan_b = plan_b.is_some(),
            "Work plan found"
        );

        WorkPlan {
            plan_a: PlanA {
                optimal_temp_c: round_to(state.temperature_c, 2),
                eta_at_optimal: round_to(eta, 0),
                band,
                hydration_pct: round_to(state.hydration_pct(), 1),
                packing_effective: round_to(state.packing_effective(), 4),
                cost: outcome.cost,
            },
            plan_b,
            operational_override,
            evaluated_points: outcome.evaluated_points,
        }
    }

    /// Coarse grid over the search range, then a finer grid around its best point.
    /// Ties keep the colder temperature.
    pub fn search(&self, recipe: &Recipe, options: &ProcessOptions) -> SearchOutcome {
        let search = &self.constants.search;
        let mut best: Option<(DoughState, CostBreakdown)> = None;
        let mut evaluated_points = 0;

        let mut consider = |temp: f64, best: &mut Option<(DoughState, CostBreakdown)>| {
            let state = self.model.evaluate(recipe, temp, options);
            let cost = evaluate_cost(&state, self.constants);
            evaluated_points += 1;
            tracing::trace!(temp, viscosity_cp = state.viscosity_cp(), cost = cost.total, "Grid point");

            let better = best.as_ref().is_none_or(|(current, current_cost)| {
                cost.total < current_cost.total
                    || (cost.total == current_cost.total && temp < current.temperature_c)
            });
            if better {
                *best = Some((state, cost));
            }
        };

        for temp in grid(search.min_temp_c, search.max_temp_c, search.coarse_step_c) {
            consider(temp, &mut best);
        }

        if let Some(coarse) = best.as_ref().map(|(state, _)| state.temperature_c) {
            let low = (coarse - search.refine_window_c).max(search.min_temp_c);
            let high = (coarse + search.refine_window_c).min(search.max_temp_c);
            for temp in grid(low, high, search.refine_step_c) {
                consider(temp, &mut best);
            }
        }

        let (state, cost) = best.unwrap_or_else(|| {
            // Degenerate search range; evaluate its lower bound.
            let state = self.model.evaluate(recipe, search.min_temp_c, options);
            (state, evaluate_cost(&state, self.constants))
        });

        SearchOutcome {
            state,
            cost,
            evaluated_points: evaluated_points.max(1),
        }
    }

    fn corrective_plan(
        &self,
        recipe: &Recipe,
        options: &ProcessOptions,
        state: &DoughState,
        band: ViscosityBand,
    ) -> Option<PlanB> {
        let correction = if band.is_wet_side() {
            flour_correction(recipe, state, options, self.constants)
        } else if band.is_stiff_side() {
            liquid_correction(recipe, state, self.constants)
        } else {
            None
        }?;
        Some(self.plan_for(recipe, options, correction))
    }

    /// A liquid-addition plan regardless of band, for doughs that are simply too dry.
    /// Water content does not depend on temperature, so any evaluation point will do.
    pub fn liquid_plan(&self, recipe: &Recipe, options: &ProcessOptions) -> Option<PlanB> {
        let state = self
            .model
            .evaluate(recipe, self.constants.viscosity.reference_temp_c, options);
        liquid_correction(recipe, &state, self.constants).map(|c| self.plan_for(recipe, options, c))
    }

    fn plan_for(&self, recipe: &Recipe, options: &ProcessOptions, correction: Correction) -> PlanB {
        let corrected = correction.apply(recipe, self.constants);
        let outcome = self.search(&corrected, options);
        let eta = outcome.state.viscosity_cp();

        PlanB {
            correction,
            suggested_temp_c: round_to(outcome.state.temperature_c, 2),
            eta_at_suggested: round_to(eta, 0),
            band_at_suggested: ViscosityBand::classify(eta, &self.constants.bands),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recipe::Ingredient;

    #[test]
    fn test_classic_recipe_is_optimal_near_room_temperature() {
        let constants = PhysicalConstants::default();
        let plan = WorkPlanOptimizer::new(&constants).find_optimal_work_plan(&Recipe::classic(), &ProcessOptions::default());
        assert_eq!(plan.plan_a.band, ViscosityBand::Optimal);
        assert!(plan.plan_b.is_none());
        assert!(!plan.operational_override);
        assert_eq!(plan.status(), Status::Go);
        assert!(plan.plan_a.optimal_temp_c >= 28.0 && plan.plan_a.optimal_temp_c <= 36.0);
    }

    #[test]
    fn test_search_point_budget() {
        let constants = PhysicalConstants::default();
        let outcome = WorkPlanOptimizer::new(&constants).search(&Recipe::classic(), &ProcessOptions::default());
        assert!(outcome.evaluated_points >= 55);
        assert!(outcome.evaluated_points <= 55 + 9);
    }

    #[test]
    fn test_refined_point_is_on_the_fine_grid() {
        let constants = PhysicalConstants::default();
        let outcome = WorkPlanOptimizer::new(&constants).search(&Recipe::classic(), &ProcessOptions::default());
        let steps = (outcome.state.temperature_c - 18.0) / 0.25;
        assert!((steps - steps.round()).abs() < 1e-9);
    }

    #[test]
    fn test_flour_heavy_recipe_gets_liquid_plan() {
        let constants = PhysicalConstants::default();
        let recipe = Recipe::classic().with(Ingredient::Flour, 2000.0);
        let plan = WorkPlanOptimizer::new(&constants).find_optimal_work_plan(&recipe, &ProcessOptions::default());
        assert_eq!(plan.plan_a.band, ViscosityBand::TooStiff);
        let plan_b = plan.plan_b.expect("liquid plan");
        assert!(plan_b.delta_liquid_ml().is_some_and(|ml| ml > 0.0));
        assert!(plan_b.delta_flour_grams().is_none());
    }

    #[test]
    fn test_override_rule() {
        let constants = PhysicalConstants::default();
        assert!(operational_override(ViscosityBand::Sticky, 25.0, 11000.0, &constants));
        assert!(!operational_override(ViscosityBand::Sticky, 27.0, 11000.0, &constants));
        assert!(!operational_override(ViscosityBand::Sticky, 24.0, 9000.0, &constants));
        assert!(!operational_override(ViscosityBand::Stiff, 24.0, 25000.0, &constants));
    }
}
