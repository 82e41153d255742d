//! Calibration tables for the dough model.
//!
//! Everything in [`PhysicalConstants`] is empirical calibration, not derived physics,
//! and can be overridden from TOML. The few values that are safety limits rather than
//! calibration live in plain `const`s and cannot be configured.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Egg proteins set irreversibly above this temperature (°C).
pub const COAGULATION_CEILING_C: f64 = 68.0;

/// A tempering run within this many degrees below the ceiling is reported as a warning.
pub const COAGULATION_WARNING_MARGIN_C: f64 = 3.0;

/// Hard ceiling for any reported viscosity (cP).
pub const ETA_CAP_CP: f64 = 300_000.0;

/// Floor substituted for any denominator that could reach zero.
pub const EPSILON: f64 = 1e-9;

/// Upper bound on points in any one temperature grid, so a search always terminates quickly.
pub const MAX_GRID_POINTS: f64 = 10_000.0;

/// Reported hydration for a recipe that carries water but no flour.
pub const HYDRATION_CAP_PCT: f64 = 999.9;

/// The complete calibration table threaded through every component.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct PhysicalConstants {
    pub composition: Composition,
    pub specific_heat: SpecificHeats,
    pub density: Densities,
    pub viscosity: ViscosityCalibration,
    pub packing: Packing,
    pub network: Network,
    pub bands: BandThresholds,
    pub search: SearchSettings,
    pub decision: DecisionThresholds,
    pub correction: CorrectionLimits,
    pub tempering: TemperingSettings,
}

/// Mass fractions of the ingredients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Composition {
    pub egg_water: f64,
    pub honey_water: f64,
    pub butter_water: f64,
    pub honey_sugar: f64,
    pub butter_fat: f64,
    pub egg_solids: f64,
    /// Grams of water one gram of flour binds.
    pub flour_absorption: f64,
}

impl Default for Composition {
    fn default() -> Self {
        Self {
            egg_water: 0.75,
            honey_water: 0.18,
            butter_water: 0.16,
            honey_sugar: 0.80,
            butter_fat: 0.82,
            egg_solids: 0.25,
            flour_absorption: 0.16,
        }
    }
}

/// Specific heats in kJ/(kg·K).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpecificHeats {
    pub butter: f64,
    pub sugar: f64,
    /// 3.35 is the other commonly quoted calibration.
    pub honey: f64,
    pub soda: f64,
    pub eggs: f64,
    /// Used for the hot liquid when no composition breakdown is known.
    pub liquid_fallback: f64,
}

impl Default for SpecificHeats {
    fn default() -> Self {
        Self {
            butter: 2.05,
            sugar: 1.25,
            honey: 2.2,
            soda: 1.0,
            eggs: 3.2,
            liquid_fallback: 2.3,
        }
    }
}

/// True (particle) and bulk densities in g/cm³.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Densities {
    pub flour_true: f64,
    pub flour_bulk: f64,
    pub butter_true: f64,
    pub fat_true: f64,
    pub sugar_true: f64,
    pub honey_true: f64,
    pub eggs_true: f64,
    pub egg_solids_true: f64,
    pub soda_true: f64,
    pub water: f64,
}

impl Default for Densities {
    fn default() -> Self {
        Self {
            flour_true: 1.45,
            flour_bulk: 0.55,
            butter_true: 0.91,
            fat_true: 0.92,
            sugar_true: 1.59,
            honey_true: 1.42,
            eggs_true: 1.03,
            egg_solids_true: 1.1,
            soda_true: 2.2,
            water: 1.0,
        }
    }
}

/// One point of the Brix → viscosity reference curve at the reference temperature.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BrixPoint {
    pub brix: f64,
    pub viscosity_cp: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViscosityCalibration {
    pub reference_temp_c: f64,
    /// Must be strictly increasing in both columns.
    pub brix_table: Vec<BrixPoint>,
    pub aqueous_arrhenius_k: f64,
    pub fat_reference_cp: f64,
    pub fat_arrhenius_k: f64,
    pub dough_matrix_scale: f64,
    pub tightening_min: f64,
    pub tightening_max: f64,
    /// Egg mass fraction at which emulsion tightening saturates.
    pub tightening_saturation: f64,
}

impl Default for ViscosityCalibration {
    fn default() -> Self {
        let table = [
            (0.0, 0.89),
            (20.0, 1.95),
            (40.0, 6.2),
            (50.0, 15.4),
            (60.0, 58.0),
            (65.0, 140.0),
            (70.0, 480.0),
            (75.0, 2000.0),
            (80.0, 9000.0),
            (85.0, 45000.0),
            (90.0, 250000.0),
        ];
        Self {
            reference_temp_c: 25.0,
            brix_table: table
                .iter()
                .map(|&(brix, viscosity_cp)| BrixPoint { brix, viscosity_cp })
                .collect(),
            aqueous_arrhenius_k: 0.065,
            fat_reference_cp: 60.0,
            fat_arrhenius_k: 0.03,
            dough_matrix_scale: 0.2,
            tightening_min: 1.05,
            tightening_max: 1.15,
            tightening_saturation: 0.3,
        }
    }
}

/// Krieger–Dougherty parameters and packing softening.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Packing {
    pub max_fraction: f64,
    pub intrinsic_viscosity: f64,
    pub fat_softening: f64,
    pub sugar_softening: f64,
    /// Effective packing is clamped to this share of `max_fraction`.
    pub clamp_ratio: f64,
}

impl Default for Packing {
    fn default() -> Self {
        Self {
            max_fraction: 0.60,
            intrinsic_viscosity: 2.5,
            fat_softening: 0.5,
            sugar_softening: 0.3,
            clamp_ratio: 0.98,
        }
    }
}

/// Structural network factor `1 + strength * net`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Network {
    pub ideal_hydration_pct: f64,
    pub hydration_width_pct: f64,
    pub strength: f64,
    pub sugar_dampening: f64,
    pub fat_dampening: f64,
    pub egg_boost: f64,
}

impl Default for Network {
    fn default() -> Self {
        Self {
            ideal_hydration_pct: 24.0,
            hydration_width_pct: 3.0,
            strength: 0.6,
            sugar_dampening: 0.8,
            fat_dampening: 1.2,
            egg_boost: 1.5,
        }
    }
}

/// Viscosity band edges in cP.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BandThresholds {
    pub too_wet_below: f64,
    pub optimal_min: f64,
    pub optimal_max: f64,
    pub stiff_max: f64,
}

impl BandThresholds {
    /// Geometric mean of the optimal band.
    pub fn target_mid(&self) -> f64 {
        (self.optimal_min * self.optimal_max).sqrt()
    }
}

impl Default for BandThresholds {
    fn default() -> Self {
        Self {
            too_wet_below: 7000.0,
            optimal_min: 12000.0,
            optimal_max: 20000.0,
            stiff_max: 30000.0,
        }
    }
}

/// Temperature search grids and cost weights.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    pub min_temp_c: f64,
    pub max_temp_c: f64,
    pub coarse_step_c: f64,
    pub refine_window_c: f64,
    pub refine_step_c: f64,
    pub stickiness_weight: f64,
    pub crack_weight: f64,
    pub sticky_heat_onset_c: f64,
    pub sticky_heat_span_c: f64,
    pub crack_hydration_pct: f64,
    pub crack_hydration_span_pct: f64,
    pub crack_packing: f64,
    pub crack_packing_span: f64,
    pub room_min_c: f64,
    pub room_max_c: f64,
    pub room_bias_weight: f64,
    pub classic_min_c: f64,
    pub classic_max_c: f64,
    pub classic_step_c: f64,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            min_temp_c: 18.0,
            max_temp_c: 45.0,
            coarse_step_c: 0.5,
            refine_window_c: 1.0,
            refine_step_c: 0.25,
            stickiness_weight: 0.6,
            crack_weight: 0.5,
            sticky_heat_onset_c: 35.0,
            sticky_heat_span_c: 10.0,
            crack_hydration_pct: 20.0,
            crack_hydration_span_pct: 5.0,
            crack_packing: 0.45,
            crack_packing_span: 0.1,
            room_min_c: 28.0,
            room_max_c: 36.0,
            room_bias_weight: 0.005,
            classic_min_c: 35.0,
            classic_max_c: 40.0,
            classic_step_c: 0.5,
        }
    }
}

/// Hydration gates of the decision mapper, in percent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecisionThresholds {
    pub critical_high_pct: f64,
    pub critical_low_pct: f64,
    pub heavy_min_pct: f64,
    pub override_window_pct: f64,
    /// Share of `optimal_min` a sticky dough must still reach to be overridden.
    pub override_viscosity_ratio: f64,
}

impl Default for DecisionThresholds {
    fn default() -> Self {
        Self {
            critical_high_pct: 35.0,
            critical_low_pct: 15.0,
            heavy_min_pct: 31.0,
            override_window_pct: 2.0,
            override_viscosity_ratio: 0.85,
        }
    }
}

/// Operator-practical limits for corrective deltas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CorrectionLimits {
    pub flour_min_g: f64,
    pub flour_max_g: f64,
    pub flour_max_fraction: f64,
    pub target_hydration_pct: f64,
    pub liquid_efficiency: f64,
}

impl Default for CorrectionLimits {
    fn default() -> Self {
        Self {
            flour_min_g: 10.0,
            flour_max_g: 80.0,
            flour_max_fraction: 0.12,
            target_hydration_pct: 24.0,
            liquid_efficiency: 0.85,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemperingSettings {
    /// Share of the bowl the incoming pour first meets.
    pub contact_fraction: f64,
}

impl Default for TemperingSettings {
    fn default() -> Self {
        Self {
            contact_fraction: 0.25,
        }
    }
}

impl PhysicalConstants {
    /// Load a constants table from a TOML file.
    pub fn load_from_toml(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::parse_toml(&content)
    }

    /// Parse a (possibly partial) constants table. Missing keys keep their defaults.
    pub fn parse_toml(content: &str) -> Result<Self, ConfigError> {
        let constants: PhysicalConstants =
            toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;
        constants.validate()?;
        Ok(constants)
    }

    /// Reject tables the model cannot evaluate safely.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let table = &self.viscosity.brix_table;
        if table.len() < 2 {
            return Err(ConfigError::Invalid(
                "brix_table needs at least two points".to_string(),
            ));
        }
        if table.iter().any(|p| !(p.viscosity_cp > 0.0)) {
            return Err(ConfigError::Invalid(
                "brix_table viscosities must be positive".to_string(),
            ));
        }
        let monotone = table
            .windows(2)
            .all(|w| w[1].brix > w[0].brix && w[1].viscosity_cp > w[0].viscosity_cp);
        if !monotone {
            return Err(ConfigError::Invalid(
                "brix_table must be strictly increasing".to_string(),
            ));
        }

        let packing = &self.packing;
        if !(packing.max_fraction > 0.0 && packing.max_fraction < 1.0) {
            return Err(ConfigError::Invalid(format!(
                "packing.max_fraction must lie in (0, 1), got {}",
                packing.max_fraction
            )));
        }
        if !(packing.intrinsic_viscosity > 0.0) {
            return Err(ConfigError::Invalid(
                "packing.intrinsic_viscosity must be positive".to_string(),
            ));
        }
        if !(packing.clamp_ratio > 0.0 && packing.clamp_ratio < 1.0) {
            return Err(ConfigError::Invalid(
                "packing.clamp_ratio must lie in (0, 1)".to_string(),
            ));
        }

        let bands = &self.bands;
        if !(0.0 < bands.too_wet_below
            && bands.too_wet_below < bands.optimal_min
            && bands.optimal_min < bands.optimal_max
            && bands.optimal_max < bands.stiff_max)
        {
            return Err(ConfigError::Invalid(
                "band thresholds must be positive and strictly increasing".to_string(),
            ));
        }

        let search = &self.search;
        if !(search.min_temp_c < search.max_temp_c
            && search.coarse_step_c > 0.0
            && search.refine_step_c > 0.0
            && search.classic_min_c <= search.classic_max_c
            && search.classic_step_c > 0.0)
        {
            return Err(ConfigError::Invalid(
                "search ranges must be ordered and steps positive".to_string(),
            ));
        }
        if !(search.refine_window_c.is_finite() && search.refine_window_c >= 0.0) {
            return Err(ConfigError::Invalid(format!(
                "search.refine_window_c must be finite and non-negative, got {}",
                search.refine_window_c
            )));
        }
        let grids = [
            ("coarse", search.max_temp_c - search.min_temp_c, search.coarse_step_c),
            ("refine", 2.0 * search.refine_window_c, search.refine_step_c),
            ("classic", search.classic_max_c - search.classic_min_c, search.classic_step_c),
        ];
        for (name, span, step) in grids {
            if !(span / step <= MAX_GRID_POINTS) {
                return Err(ConfigError::Invalid(format!(
                    "{} search grid exceeds {} points",
                    name, MAX_GRID_POINTS
                )));
            }
        }

        let contact = self.tempering.contact_fraction;
        if !(contact > 0.0 && contact <= 1.0) {
            return Err(ConfigError::Invalid(format!(
                "tempering.contact_fraction must lie in (0, 1], got {}",
                contact
            )));
        }

        if !(self.specific_heat.liquid_fallback > 0.0 && self.specific_heat.eggs > 0.0) {
            return Err(ConfigError::Invalid(
                "specific heats of eggs and the fallback liquid must be positive".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        assert!(PhysicalConstants::default().validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let constants = PhysicalConstants::parse_toml(
            r#"
            [specific_heat]
            honey = 3.35
            "#,
        )
        .unwrap();
        assert_eq!(constants.specific_heat.honey, 3.35);
        assert_eq!(constants.specific_heat.butter, 2.05);
        assert_eq!(constants.packing, Packing::default());
    }

    #[test]
    fn test_rejects_non_monotone_brix_table() {
        let err = PhysicalConstants::parse_toml(
            r#"
            [viscosity]
            brix_table = [
                { brix = 0.0, viscosity_cp = 1.0 },
                { brix = 50.0, viscosity_cp = 0.5 },
            ]
            "#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("strictly increasing"));
    }

    #[test]
    fn test_rejects_bad_packing() {
        let err = PhysicalConstants::parse_toml("[packing]\nmax_fraction = 1.2\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_rejects_unbounded_search_grids() {
        let err = PhysicalConstants::parse_toml("[search]\ncoarse_step_c = 1e-12\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(ref m) if m.contains("coarse")));

        let err = PhysicalConstants::parse_toml("[search]\nrefine_window_c = nan\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(ref m) if m.contains("refine_window_c")));

        let err = PhysicalConstants::parse_toml("[search]\nrefine_window_c = -1.0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));

        let err = PhysicalConstants::parse_toml("[search]\nmax_temp_c = inf\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_target_mid_is_geometric_mean() {
        let mid = BandThresholds::default().target_mid();
        assert!((mid - 15491.933).abs() < 1e-3);
    }

    #[test]
    fn test_safety_constants() {
        assert_eq!(COAGULATION_CEILING_C, 68.0);
        assert!(COAGULATION_WARNING_MARGIN_C > 0.0);
    }
}
