//! Objective minimised by the temperature search.

use crate::constants::{EPSILON, PhysicalConstants, SearchSettings};
use crate::viscosity::DoughState;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CostBreakdown {
    /// `|ln(eta / eta_mid)|`
    pub target: f64,
    pub stickiness: f64,
    pub crack: f64,
    pub room_bias: f64,
    pub total: f64,
}

/// Grows as the dough thins below the sticky threshold and as the temperature nears
/// the top of the search range.
pub fn stickiness_risk(viscosity_cp: f64, temp_c: f64, sticky_below_cp: f64, search: &SearchSettings) -> f64 {
    let thin = (sticky_below_cp / viscosity_cp.max(EPSILON)).ln().max(0.0);
    let heat = ((temp_c - search.sticky_heat_onset_c) / search.sticky_heat_span_c.max(EPSILON)).max(0.0);
    thin + heat
}

/// Grows when the dough is too dry or packed too tightly.
pub fn crack_risk(hydration_pct: f64, packing_effective: f64, search: &SearchSettings) -> f64 {
    let dry = ((search.crack_hydration_pct - hydration_pct) / search.crack_hydration_span_pct.max(EPSILON))
        .max(0.0);
    let packed = ((packing_effective - search.crack_packing) / search.crack_packing_span.max(EPSILON)).max(0.0);
    dry + packed
}

/// Quadratic pull toward the comfortable working range.
pub fn room_bias(temp_c: f64, search: &SearchSettings) -> f64 {
    let distance = if temp_c < search.room_min_c {
        search.room_min_c - temp_c
    } else if temp_c > search.room_max_c {
        temp_c - search.room_max_c
    } else {
        0.0
    };
    search.room_bias_weight * distance * distance
}

pub fn evaluate_cost(state: &DoughState, constants: &PhysicalConstants) -> CostBreakdown {
    let search = &constants.search;
    let bands = &constants.bands;
    let eta = state.viscosity_cp().max(EPSILON);

    let target = (eta / bands.target_mid()).ln().abs();
    let stickiness = stickiness_risk(eta, state.temperature_c, bands.optimal_min, search);
    let crack = crack_risk(state.hydration_pct(), state.packing_effective(), search);
    let room_bias = room_bias(state.temperature_c, search);

    CostBreakdown {
        target,
        stickiness,
        crack,
        room_bias,
        total: target + search.stickiness_weight * stickiness + search.crack_weight * crack + room_bias,
    }
}
