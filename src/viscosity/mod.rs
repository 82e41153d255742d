//! Dough viscosity as a function of recipe, temperature and caramelization.
//!
//! The model chains three phases (see [`phases`]) and finishes with a Krieger–Dougherty
//! packing correction and a structural network factor. Values are kept unrounded
//! internally; [`ViscosityResult`] is the rounded, presentation-ready view.

pub mod mixing;
pub mod packing;
pub mod phases;

use crate::constants::{EPSILON, PhysicalConstants};
use crate::numeric::{grid, round_to};
use crate::recipe::{ProcessOptions, Recipe};
use phases::{DoughPhase, EmulsionPhase, SyrupPhase, dough_phase, emulsion_phase, syrup_phase};
use serde::{Deserialize, Serialize};

/// Unrounded outcome of running all three phases at one temperature.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DoughState {
    pub temperature_c: f64,
    pub syrup: SyrupPhase,
    pub emulsion: EmulsionPhase,
    pub dough: DoughPhase,
}

impl DoughState {
    pub fn viscosity_cp(&self) -> f64 {
        self.dough.viscosity_cp
    }

    pub fn hydration_pct(&self) -> f64 {
        self.dough.hydration_pct
    }

    pub fn packing_effective(&self) -> f64 {
        self.dough.packing_effective
    }
}

/// Intermediate values per phase, attached when [`ProcessOptions::debug`] is set.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhaseTrace {
    pub syrup: SyrupPhase,
    pub emulsion: EmulsionPhase,
    pub dough: DoughPhase,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ViscosityComponents {
    /// Brix of the dough's aqueous phase.
    pub brix: f64,
    /// Brix of the syrup before eggs and flour.
    pub syrup_brix: f64,
    pub hydration_pct: f64,
    pub packing_fraction: f64,
    pub packing_fraction_effective: f64,
    pub relative_viscosity: f64,
    pub network_factor: f64,
    pub effective_temp_c: f64,
    pub matrix_viscosity_cp: f64,
    pub free_water_g: f64,
    pub bound_water_g: f64,
    pub evaporated_water_g: f64,
}

/// The temperature in the classic working window closest to the target midpoint.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WorkTarget {
    pub optimal_temp_c: f64,
    pub eta_at_optimal: f64,
    pub target_range_cp: (f64, f64),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViscosityResult {
    pub value_cp: f64,
    pub temperature_c: f64,
    pub components: ViscosityComponents,
    pub work_target: WorkTarget,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phases: Option<PhaseTrace>,
}

/// Computes dough viscosity against one constants table.
#[derive(Debug, Clone, Copy)]
pub struct ViscosityModel<'a> {
    constants: &'a PhysicalConstants,
}

impl<'a> ViscosityModel<'a> {
    pub fn new(constants: &'a PhysicalConstants) -> Self {
        Self { constants }
    }

    /// Rounded viscosity result, including the classic-window work target.
    pub fn compute(&self, recipe: &Recipe, temperature_c: f64, options: &ProcessOptions) -> ViscosityResult {
        let temperature_c = self.sanitize_temperature(temperature_c);
        let bands = &self.constants.bands;
        let target_range_cp = (bands.optimal_min, bands.optimal_max);

        if recipe.total_mass() <= EPSILON {
            tracing::warn!("Recipe has no mass; returning a zeroed viscosity result");
            return ViscosityResult {
                value_cp: 0.0,
                temperature_c: round_to(temperature_c, 2),
                components: ViscosityComponents::default(),
                work_target: WorkTarget {
                    optimal_temp_c: round_to(self.constants.search.classic_min_c, 2),
                    eta_at_optimal: 0.0,
                    target_range_cp,
                },
                phases: None,
            };
        }
        if recipe.has_invalid_masses() {
            tracing::warn!("Recipe contains negative or non-finite masses; treating them as zero");
        }

        let state = self.evaluate(recipe, temperature_c, options);
        let work_target = self.work_target(recipe, options);

        ViscosityResult {
            value_cp: round_to(state.viscosity_cp(), 0),
            temperature_c: round_to(temperature_c, 2),
            components: components(&state),
            work_target,
            phases: options.debug.then_some(PhaseTrace {
                syrup: state.syrup,
                emulsion: state.emulsion,
                dough: state.dough,
            }),
        }
    }

    /// Runs the three phases without rounding.
    pub fn evaluate(&self, recipe: &Recipe, temperature_c: f64, options: &ProcessOptions) -> DoughState {
        let temperature_c = self.sanitize_temperature(temperature_c);
        let syrup = syrup_phase(recipe, temperature_c, &options.caramelization, self.constants);
        let emulsion = emulsion_phase(recipe, &syrup, options.effective_egg_temp_c(), self.constants);
        let dough = dough_phase(recipe, &syrup, &emulsion, self.constants);

        tracing::debug!(
            temperature_c,
            syrup_brix = syrup.mix.brix,
            emulsion_temp_c = emulsion.effective_temp_c,
            hydration_pct = dough.hydration_pct,
            packing = dough.packing_effective,
            viscosity_cp = dough.viscosity_cp,
            "Evaluated dough phases"
        );

        DoughState {
            temperature_c,
            syrup,
            emulsion,
            dough,
        }
    }

    /// Scans the classic working window for the temperature closest to the target midpoint.
    pub fn work_target(&self, recipe: &Recipe, options: &ProcessOptions) -> WorkTarget {
        let search = &self.constants.search;
        let bands = &self.constants.bands;
        let mid = bands.target_mid();

        let mut best: Option<(f64, f64, f64)> = None;
        for temp in grid(search.classic_min_c, search.classic_max_c, search.classic_step_c) {
            let eta = self.evaluate(recipe, temp, options).viscosity_cp();
            let distance = (eta.max(EPSILON) / mid).ln().abs();
            if best.is_none_or(|(_, _, d)| distance < d) {
                best = Some((temp, eta, distance));
            }
        }
        let (temp, eta) = best.map_or((search.classic_min_c, 0.0), |(t, e, _)| (t, e));

        WorkTarget {
            optimal_temp_c: round_to(temp, 2),
            eta_at_optimal: round_to(eta, 0),
            target_range_cp: (bands.optimal_min, bands.optimal_max),
        }
    }

    fn sanitize_temperature(&self, temperature_c: f64) -> f64 {
        if temperature_c.is_finite() {
            temperature_c
        } else {
            tracing::warn!(
                "Non-finite temperature {}; using the reference temperature",
                temperature_c
            );
            self.constants.viscosity.reference_temp_c
        }
    }
}

fn components(state: &DoughState) -> ViscosityComponents {
    let dough = &state.dough;
    ViscosityComponents {
        brix: round_to(dough.mix.brix, 1),
        syrup_brix: round_to(state.syrup.mix.brix, 1),
        hydration_pct: round_to(dough.hydration_pct, 1),
        packing_fraction: round_to(dough.packing_fraction, 4),
        packing_fraction_effective: round_to(dough.packing_effective, 4),
        relative_viscosity: round_to(dough.relative_viscosity, 3),
        network_factor: round_to(dough.network.factor, 3),
        effective_temp_c: round_to(state.emulsion.effective_temp_c, 2),
        matrix_viscosity_cp: round_to(dough.matrix_cp, 0),
        free_water_g: round_to(dough.free_water, 1),
        bound_water_g: round_to(dough.bound_water, 1),
        evaporated_water_g: round_to(state.syrup.pools.evaporated, 1),
    }
}
