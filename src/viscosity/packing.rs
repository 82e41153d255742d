//! Suspension terms: Krieger–Dougherty and the structural network factor.

use crate::constants::{Network, Packing};
use serde::{Deserialize, Serialize};

/// Soften a raw packing fraction by fat and sugar mass fractions and clamp it below
/// the singularity.
pub fn effective_packing(phi: f64, fat_fraction: f64, sugar_fraction: f64, packing: &Packing) -> f64 {
    let softened = phi * compaction_factor(fat_fraction, sugar_fraction, packing);
    softened.clamp(0.0, packing.clamp_ratio * packing.max_fraction)
}

/// How much of a raw packing change shows up in the effective packing fraction.
pub fn compaction_factor(fat_fraction: f64, sugar_fraction: f64, packing: &Packing) -> f64 {
    (1.0 - packing.fat_softening * fat_fraction - packing.sugar_softening * sugar_fraction)
        .max(0.0)
}

/// `eta_rel = (1 - phi/phi_max)^(-[eta] * phi_max)`.
pub fn krieger_dougherty(phi_effective: f64, packing: &Packing) -> f64 {
    let ceiling = packing.clamp_ratio * packing.max_fraction;
    let phi = phi_effective.clamp(0.0, ceiling);
    let exponent = -packing.intrinsic_viscosity * packing.max_fraction;
    (1.0 - phi / packing.max_fraction).powf(exponent)
}

/// The packing fraction at which Krieger–Dougherty yields `relative` (clamped to the
/// same range the forward relation accepts).
pub fn invert_krieger_dougherty(relative: f64, packing: &Packing) -> f64 {
    if !(relative > 1.0) {
        return 0.0;
    }
    let exponent = -1.0 / (packing.intrinsic_viscosity * packing.max_fraction);
    let phi = packing.max_fraction * (1.0 - relative.powf(exponent));
    phi.clamp(0.0, packing.clamp_ratio * packing.max_fraction)
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NetworkStrength {
    pub hydration_term: f64,
    pub dilution_term: f64,
    pub egg_term: f64,
    pub strength: f64,
    pub factor: f64,
}

/// Gluten-like network: strongest near the ideal hydration, weakened by sugar and fat
/// dilution, reinforced by egg.
pub fn network_factor(
    hydration_pct: f64,
    sugar_fraction: f64,
    fat_fraction: f64,
    egg_fraction: f64,
    network: &Network,
) -> NetworkStrength {
    let z = (hydration_pct - network.ideal_hydration_pct) / network.hydration_width_pct.max(1e-6);
    let hydration_term = (-0.5 * z * z).exp();
    let dilution_term = (1.0
        - network.sugar_dampening * sugar_fraction
        - network.fat_dampening * fat_fraction)
        .clamp(0.0, 1.0);
    let egg_term = 1.0 + network.egg_boost * egg_fraction.max(0.0);
    let strength = hydration_term * dilution_term * egg_term;
    NetworkStrength {
        hydration_term,
        dilution_term,
        egg_term,
        strength,
        factor: 1.0 + network.strength * strength,
    }
}
