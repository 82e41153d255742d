//! Aqueous/fat log-mixing shared by every phase.

use crate::constants::{BrixPoint, PhysicalConstants};
use crate::numeric::safe_div;
use itertools::Itertools;
use serde::{Deserialize, Serialize};

/// Upper end of the Brix scale the reference table is read on.
const MAX_BRIX: f64 = 100.0;

/// Reference viscosity (cP) for a Brix value, interpolated linearly in log-viscosity.
/// Values beyond the table ends are held at the end points.
pub fn brix_reference_viscosity(table: &[BrixPoint], brix: f64) -> f64 {
    let (first, last) = match (table.first(), table.last()) {
        (Some(first), Some(last)) => (first, last),
        _ => return 1.0,
    };
    if brix <= first.brix {
        return first.viscosity_cp;
    }
    if brix >= last.brix {
        return last.viscosity_cp;
    }
    table
        .iter()
        .tuple_windows()
        .find(|(_, hi)| brix <= hi.brix)
        .map(|(lo, hi)| {
            let t = (brix - lo.brix) / (hi.brix - lo.brix);
            let ln = lo.viscosity_cp.ln() + t * (hi.viscosity_cp.ln() - lo.viscosity_cp.ln());
            ln.exp()
        })
        .unwrap_or(last.viscosity_cp)
}

/// `eta(T) = eta_ref * exp(-k * (T - T_ref))`.
pub fn arrhenius(reference_cp: f64, k: f64, temp_c: f64, reference_temp_c: f64) -> f64 {
    reference_cp * (-k * (temp_c - reference_temp_c)).exp()
}

/// Dissolved-sugar share of the sugar + free water mass, in percent.
pub fn brix(dissolved_sugar: f64, free_water: f64) -> f64 {
    let liquid = dissolved_sugar + free_water;
    (safe_div(dissolved_sugar, liquid) * 100.0).clamp(0.0, MAX_BRIX)
}

/// What goes into the continuous (non-flour) phase, in grams.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LiquidPhase {
    pub sugar: f64,
    pub free_water: f64,
    pub fat: f64,
    /// Volume (cm³) of other dissolved or suspended solids counted with the aqueous side.
    pub other_volume: f64,
}

/// Result of mixing an aqueous and a fat phase at one temperature.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhaseMix {
    pub brix: f64,
    pub aqueous_cp: f64,
    pub fat_cp: f64,
    pub aqueous_volume: f64,
    pub fat_volume: f64,
    pub aqueous_fraction: f64,
    pub fat_fraction: f64,
    pub viscosity_cp: f64,
}

impl PhaseMix {
    pub fn total_volume(&self) -> f64 {
        self.aqueous_volume + self.fat_volume
    }
}

/// Volume-fraction log-mixing: `ln eta = phi_aq * ln eta_aq + phi_fat * ln eta_fat`.
pub fn log_mix(liquid: &LiquidPhase, temp_c: f64, constants: &PhysicalConstants) -> PhaseMix {
    let calibration = &constants.viscosity;
    let density = &constants.density;

    let brix = brix(liquid.sugar, liquid.free_water);
    let aqueous_cp = arrhenius(
        brix_reference_viscosity(&calibration.brix_table, brix),
        calibration.aqueous_arrhenius_k,
        temp_c,
        calibration.reference_temp_c,
    );
    let fat_cp = arrhenius(
        calibration.fat_reference_cp,
        calibration.fat_arrhenius_k,
        temp_c,
        calibration.reference_temp_c,
    );

    let aqueous_volume = safe_div(liquid.free_water, density.water)
        + safe_div(liquid.sugar, density.sugar_true)
        + liquid.other_volume;
    let fat_volume = safe_div(liquid.fat, density.fat_true);
    let total = aqueous_volume + fat_volume;
    let aqueous_fraction = safe_div(aqueous_volume, total);
    let fat_fraction = safe_div(fat_volume, total);

    let ln_mix = aqueous_fraction * aqueous_cp.ln() + fat_fraction * fat_cp.ln();

    PhaseMix {
        brix,
        aqueous_cp,
        fat_cp,
        aqueous_volume,
        fat_volume,
        aqueous_fraction,
        fat_fraction,
        viscosity_cp: ln_mix.exp(),
    }
}
