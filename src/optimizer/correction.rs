//! Inverse computations behind planB: how much flour or liquid moves the dough
//! back toward the target band.

use crate::constants::{EPSILON, PhysicalConstants};
use crate::numeric::safe_div;
use crate::recipe::{Ingredient, ProcessOptions, Recipe};
use crate::viscosity::{DoughState, ViscosityModel};
use crate::viscosity::packing::invert_krieger_dougherty;
use serde::{Deserialize, Serialize};

/// A single corrective addition.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Correction {
    AddFlour { grams: f64, volume_ml: f64 },
    AddLiquid { ml: f64 },
}

impl Correction {
    /// The recipe after the correction is applied. Added liquid is modelled as beaten
    /// egg carrying the same amount of water.
    pub fn apply(&self, recipe: &Recipe, constants: &PhysicalConstants) -> Recipe {
        match *self {
            Correction::AddFlour { grams, .. } => recipe.adding(Ingredient::Flour, grams),
            Correction::AddLiquid { ml } => {
                let water = ml * constants.correction.liquid_efficiency * constants.density.water;
                let eggs = safe_div(water, constants.composition.egg_water);
                recipe.adding(Ingredient::Eggs, eggs)
            }
        }
    }
}

/// Volume of the recipe from true densities, in cm³.
pub fn estimated_volume(recipe: &Recipe, constants: &PhysicalConstants) -> f64 {
    let d = &constants.density;
    safe_div(recipe.flour(), d.flour_true)
        + safe_div(recipe.butter(), d.butter_true)
        + safe_div(recipe.sugar(), d.sugar_true)
        + safe_div(recipe.honey(), d.honey_true)
        + safe_div(recipe.eggs(), d.eggs_true)
        + safe_div(recipe.soda(), d.soda_true)
}

/// Bisection stops once the flour bracket is narrower than this (grams).
const FLOUR_TOLERANCE_G: f64 = 0.05;

/// Flour needed to bring the dough at `state` up to the target midpoint viscosity.
///
/// The Krieger–Dougherty inversion gives a first estimate, which holds the matrix
/// viscosity and network factor fixed. Added flour also binds water and shifts
/// hydration, so the estimate only narrows the bracket for a bisection against the
/// full model at the state's own temperature. The result is rounded to whole grams
/// and held to operator-practical limits.
pub fn flour_correction(
    recipe: &Recipe,
    state: &DoughState,
    options: &ProcessOptions,
    constants: &PhysicalConstants,
) -> Option<Correction> {
    let limits = &constants.correction;
    let estimate = packing_estimate(recipe, state, constants)?;

    let ceiling = (recipe.flour() * limits.flour_max_fraction).floor();
    let upper = limits.flour_max_g.min(ceiling);
    if upper < 1.0 {
        tracing::debug!(estimate, ceiling, "Flour correction below practical limits; omitted");
        return None;
    }

    let needed = bisect_flour(recipe, state.temperature_c, options, constants, estimate, upper);
    let grams = needed.round().max(limits.flour_min_g).min(upper);
    tracing::debug!(estimate, needed, grams, "Flour correction");

    Some(Correction::AddFlour {
        grams,
        volume_ml: safe_div(grams, constants.density.flour_bulk).round(),
    })
}

/// Added flour (g) that closes the effective packing shortfall at the midpoint,
/// or `None` when the dough is already at or above it.
fn packing_estimate(recipe: &Recipe, state: &DoughState, constants: &PhysicalConstants) -> Option<f64> {
    let dough = &state.dough;
    let packing = &constants.packing;

    let carrier = dough.matrix_cp * dough.network.factor;
    if carrier <= EPSILON {
        return None;
    }
    let relative_target = constants.bands.target_mid() / carrier;
    let target_effective = invert_krieger_dougherty(relative_target, packing);
    let shortfall = target_effective - dough.packing_effective;
    if shortfall <= EPSILON || dough.compaction <= EPSILON {
        return None;
    }

    let total_volume = estimated_volume(recipe, constants);
    if total_volume <= EPSILON {
        return None;
    }
    let flour_volume = safe_div(recipe.flour(), constants.density.flour_true);
    let current = flour_volume / total_volume;
    let target = (current + shortfall / dough.compaction).min(packing.max_fraction);
    if target <= current {
        return None;
    }

    let added_volume = (target * total_volume - flour_volume) / (1.0 - target);
    let grams = added_volume * constants.density.flour_true;
    (grams > 0.0).then_some(grams)
}

/// Smallest addition in `[0, upper]` that lifts viscosity to the midpoint, or `upper`
/// when even that falls short.
fn bisect_flour(
    recipe: &Recipe,
    temperature_c: f64,
    options: &ProcessOptions,
    constants: &PhysicalConstants,
    estimate: f64,
    upper: f64,
) -> f64 {
    let model = ViscosityModel::new(constants);
    let mid = constants.bands.target_mid();
    let reaches = |grams: f64| {
        let corrected = recipe.adding(Ingredient::Flour, grams);
        model.evaluate(&corrected, temperature_c, options).viscosity_cp() >= mid
    };

    if !reaches(upper) {
        return upper;
    }
    let (mut low, mut high) = (0.0, upper);
    if estimate < upper {
        if reaches(estimate) {
            high = estimate;
        } else {
            low = estimate;
        }
    }
    while high - low > FLOUR_TOLERANCE_G {
        let trial = 0.5 * (low + high);
        if reaches(trial) {
            high = trial;
        } else {
            low = trial;
        }
    }
    0.5 * (low + high)
}

/// Liquid needed to raise hydration at `state` to the target percentage.
pub fn liquid_correction(recipe: &Recipe, state: &DoughState, constants: &PhysicalConstants) -> Option<Correction> {
    let limits = &constants.correction;
    let target_water = limits.target_hydration_pct / 100.0 * recipe.flour();
    let missing = target_water - state.dough.water_total;
    if missing <= EPSILON {
        return None;
    }

    let ml = safe_div(missing / constants.density.water, limits.liquid_efficiency).ceil();
    (ml > 0.0).then_some(Correction::AddLiquid { ml })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state_for(recipe: &Recipe, constants: &PhysicalConstants, temp: f64) -> DoughState {
        ViscosityModel::new(constants).evaluate(recipe, temp, &ProcessOptions::default())
    }

    fn scaled(recipe: &Recipe, factor: f64) -> Recipe {
        recipe
            .iter()
            .fold(Recipe::new(), |acc, (ingredient, grams)| acc.with(ingredient, grams * factor))
    }

    fn flour_grams(recipe: &Recipe, state: &DoughState, constants: &PhysicalConstants) -> f64 {
        match flour_correction(recipe, state, &ProcessOptions::default(), constants) {
            Some(Correction::AddFlour { grams, .. }) => grams,
            other => panic!("expected a flour correction, got {other:?}"),
        }
    }

    #[test]
    fn test_wet_dough_gets_flour_within_limits() {
        let constants = PhysicalConstants::default();
        let recipe = Recipe::classic().with(Ingredient::Eggs, 160.0);
        let state = state_for(&recipe, &constants, 40.0);
        let Some(Correction::AddFlour { grams, volume_ml }) =
            flour_correction(&recipe, &state, &ProcessOptions::default(), &constants)
        else {
            panic!("expected a flour correction");
        };
        assert!((10.0..=60.0).contains(&grams), "grams {grams}");
        assert_eq!(grams.fract(), 0.0);
        assert!(volume_ml > grams);
    }

    #[test]
    fn test_flour_brings_dough_toward_midpoint_at_same_temperature() {
        let constants = PhysicalConstants::default();
        let mid = constants.bands.target_mid();
        let recipe = Recipe::classic().with(Ingredient::Eggs, 108.0);
        let state = state_for(&recipe, &constants, 22.0);
        assert!(state.viscosity_cp() < constants.bands.optimal_min);

        let grams = flour_grams(&recipe, &state, &constants);
        assert!(grams < 60.0, "grams {grams}");

        let corrected = state_for(&recipe.adding(Ingredient::Flour, grams), &constants, 22.0);
        let before = (state.viscosity_cp() / mid).ln().abs();
        let after = (corrected.viscosity_cp() / mid).ln().abs();
        assert!(after < before, "{after} >= {before}");
        assert!(corrected.viscosity_cp() >= constants.bands.optimal_min);
        assert!(corrected.viscosity_cp() <= constants.bands.optimal_max);
    }

    #[test]
    fn test_flour_capped_at_absolute_limit() {
        let constants = PhysicalConstants::default();
        let recipe = scaled(&Recipe::classic().with(Ingredient::Eggs, 160.0), 1.5);
        assert_eq!(recipe.flour(), 750.0);
        let state = state_for(&recipe, &constants, 25.0);
        assert_eq!(flour_grams(&recipe, &state, &constants), 80.0);
    }

    #[test]
    fn test_flour_capped_by_share_of_flour() {
        let constants = PhysicalConstants::default();
        let recipe = scaled(&Recipe::classic().with(Ingredient::Eggs, 160.0), 0.12);
        let state = state_for(&recipe, &constants, 25.0);
        // floor(0.12 * 60 g)
        assert_eq!(flour_grams(&recipe, &state, &constants), 7.0);
    }

    #[test]
    fn test_small_flour_need_is_raised_to_minimum() {
        let constants = PhysicalConstants::default();
        let recipe = Recipe::classic();
        let state = state_for(&recipe, &constants, 30.0);
        assert!(state.viscosity_cp() < constants.bands.target_mid());
        assert_eq!(flour_grams(&recipe, &state, &constants), 10.0);
    }

    #[test]
    fn test_firm_dough_needs_no_flour() {
        let constants = PhysicalConstants::default();
        let recipe = Recipe::classic().with(Ingredient::Flour, 900.0);
        let state = state_for(&recipe, &constants, 30.0);
        assert!(flour_correction(&recipe, &state, &ProcessOptions::default(), &constants).is_none());
    }

    #[test]
    fn test_dry_dough_gets_liquid() {
        let constants = PhysicalConstants::default();
        let recipe = Recipe::classic().with(Ingredient::Flour, 900.0);
        let state = state_for(&recipe, &constants, 30.0);
        let Some(Correction::AddLiquid { ml }) = liquid_correction(&recipe, &state, &constants) else {
            panic!("expected a liquid correction");
        };
        let expected = ((0.24 * 900.0 - state.dough.water_total) / 0.85).ceil();
        assert_eq!(ml, expected);
    }

    #[test]
    fn test_well_hydrated_dough_needs_no_liquid() {
        let constants = PhysicalConstants::default();
        let recipe = Recipe::classic().with(Ingredient::Eggs, 200.0);
        let state = state_for(&recipe, &constants, 30.0);
        assert!(liquid_correction(&recipe, &state, &constants).is_none());
    }

    #[test]
    fn test_applied_liquid_reaches_target_hydration() {
        let constants = PhysicalConstants::default();
        let recipe = Recipe::classic().with(Ingredient::Flour, 900.0);
        let state = state_for(&recipe, &constants, 30.0);
        let correction = liquid_correction(&recipe, &state, &constants).expect("liquid");
        let corrected = correction.apply(&recipe, &constants);
        let after = state_for(&corrected, &constants, 30.0);
        assert!(after.hydration_pct() >= 24.0);
        assert!(after.hydration_pct() < 24.5);
    }

    #[test]
    fn test_zero_flour_cannot_be_corrected_with_flour() {
        let constants = PhysicalConstants::default();
        let recipe = Recipe::classic().with(Ingredient::Flour, 0.0);
        let state = state_for(&recipe, &constants, 30.0);
        assert!(flour_correction(&recipe, &state, &ProcessOptions::default(), &constants).is_none());
    }
}
