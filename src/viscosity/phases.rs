//! The three chained phases: syrup, emulsion, dough.
//!
//! Each phase takes the previous one's output explicitly. In particular the water pools
//! left after caramelization travel from the syrup phase into the dough phase as a
//! value, so the evaporation is applied exactly once.

use super::mixing::{LiquidPhase, PhaseMix, log_mix};
use super::packing::{
    NetworkStrength, compaction_factor, effective_packing, krieger_dougherty, network_factor,
};
use crate::constants::{EPSILON, ETA_CAP_CP, HYDRATION_CAP_PCT, PhysicalConstants};
use crate::numeric::safe_div;
use crate::recipe::{CaramelizationOptions, Recipe};
use crate::tempering::LiquidBreakdown;
use serde::{Deserialize, Serialize};

/// Water carried by each ingredient (g), after any caramelization.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct WaterPools {
    pub honey: f64,
    pub butter: f64,
    pub eggs: f64,
    /// Water driven off the honey and butter pools during pre-heating.
    pub evaporated: f64,
}

impl WaterPools {
    pub fn from_recipe(recipe: &Recipe, evaporation_fraction: f64, constants: &PhysicalConstants) -> Self {
        let composition = &constants.composition;
        let honey = recipe.honey() * composition.honey_water;
        let butter = recipe.butter() * composition.butter_water;
        let keep = 1.0 - evaporation_fraction.clamp(0.0, 1.0);
        Self {
            honey: honey * keep,
            butter: butter * keep,
            eggs: recipe.eggs() * composition.egg_water,
            evaporated: (honey + butter) * (1.0 - keep),
        }
    }

    /// Water available before the eggs go in.
    pub fn syrup_water(&self) -> f64 {
        self.honey + self.butter
    }

    pub fn total(&self) -> f64 {
        self.honey + self.butter + self.eggs
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SyrupPhase {
    pub temperature_c: f64,
    pub pools: WaterPools,
    pub sugar: f64,
    pub fat: f64,
    pub mix: PhaseMix,
}

/// Butter, sugar and honey only.
pub fn syrup_phase(
    recipe: &Recipe,
    temperature_c: f64,
    caramelization: &CaramelizationOptions,
    constants: &PhysicalConstants,
) -> SyrupPhase {
    let composition = &constants.composition;
    let pools = WaterPools::from_recipe(recipe, caramelization.effective_evaporation(), constants);
    let sugar = recipe.sugar() + recipe.honey() * composition.honey_sugar;
    let fat = recipe.butter() * composition.butter_fat;

    let mix = log_mix(&syrup_liquid(recipe, &pools, sugar, fat, constants), temperature_c, constants);

    SyrupPhase {
        temperature_c,
        pools,
        sugar,
        fat,
        mix,
    }
}

fn syrup_liquid(
    recipe: &Recipe,
    pools: &WaterPools,
    sugar: f64,
    fat: f64,
    constants: &PhysicalConstants,
) -> LiquidPhase {
    LiquidPhase {
        sugar,
        free_water: pools.syrup_water(),
        fat,
        other_volume: safe_div(recipe.soda(), constants.density.soda_true),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EmulsionPhase {
    pub liquid_mass: f64,
    pub liquid_specific_heat: f64,
    pub effective_temp_c: f64,
    pub egg_fraction: f64,
    pub tightening: f64,
    pub mix: PhaseMix,
    pub viscosity_cp: f64,
}

/// Eggs go into the warm syrup; the blend settles at a heat-balanced temperature.
pub fn emulsion_phase(
    recipe: &Recipe,
    syrup: &SyrupPhase,
    egg_temp_c: f64,
    constants: &PhysicalConstants,
) -> EmulsionPhase {
    let heats = &constants.specific_heat;
    let breakdown = LiquidBreakdown::from_recipe(recipe);
    let liquid_mass = (breakdown.total() - syrup.pools.evaporated).max(0.0);
    let liquid_specific_heat = breakdown.specific_heat(heats);
    let eggs = recipe.eggs();

    let liquid_capacity = liquid_mass * liquid_specific_heat;
    let egg_capacity = eggs * heats.eggs;
    let capacity = liquid_capacity + egg_capacity;
    let effective_temp_c = if capacity > EPSILON {
        (liquid_capacity * syrup.temperature_c + egg_capacity * egg_temp_c) / capacity
    } else {
        syrup.temperature_c
    };

    let calibration = &constants.viscosity;
    let egg_fraction = safe_div(eggs, liquid_mass + eggs);
    let saturation = (egg_fraction / calibration.tightening_saturation.max(EPSILON)).clamp(0.0, 1.0);
    let tightening =
        calibration.tightening_min + (calibration.tightening_max - calibration.tightening_min) * saturation;

    let mix = log_mix(
        &syrup_liquid(recipe, &syrup.pools, syrup.sugar, syrup.fat, constants),
        effective_temp_c,
        constants,
    );

    EmulsionPhase {
        liquid_mass,
        liquid_specific_heat,
        effective_temp_c,
        egg_fraction,
        tightening,
        mix,
        viscosity_cp: mix.viscosity_cp * tightening,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DoughPhase {
    pub water_total: f64,
    pub bound_water: f64,
    pub free_water: f64,
    pub hydration_pct: f64,
    pub total_mass: f64,
    pub flour_volume: f64,
    pub continuous_volume: f64,
    pub packing_fraction: f64,
    pub packing_effective: f64,
    pub compaction: f64,
    pub fat_fraction: f64,
    pub sugar_fraction: f64,
    pub egg_fraction: f64,
    pub relative_viscosity: f64,
    pub network: NetworkStrength,
    pub mix: PhaseMix,
    pub matrix_cp: f64,
    pub viscosity_cp: f64,
}

/// Flour goes in at the emulsion temperature, binds water, and packs.
pub fn dough_phase(
    recipe: &Recipe,
    syrup: &SyrupPhase,
    emulsion: &EmulsionPhase,
    constants: &PhysicalConstants,
) -> DoughPhase {
    let composition = &constants.composition;
    let density = &constants.density;
    let flour = recipe.flour();

    // Pools already carry the caramelization loss.
    let water_total = syrup.pools.total();
    let bound_water = water_total.min(flour * composition.flour_absorption);
    let free_water = water_total - bound_water;

    let liquid = LiquidPhase {
        sugar: syrup.sugar,
        free_water,
        fat: syrup.fat,
        other_volume: safe_div(recipe.soda(), density.soda_true)
            + safe_div(recipe.eggs() * composition.egg_solids, density.egg_solids_true),
    };
    let mix = log_mix(&liquid, emulsion.effective_temp_c, constants);

    let flour_volume = safe_div(flour, density.flour_true);
    let continuous_volume = mix.total_volume() + safe_div(bound_water, density.water);
    let packing_fraction = safe_div(flour_volume, flour_volume + continuous_volume);

    let total_mass = (recipe.total_mass() - syrup.pools.evaporated).max(0.0);
    let fat_fraction = safe_div(syrup.fat, total_mass);
    let sugar_fraction = safe_div(syrup.sugar, total_mass);
    let egg_fraction = safe_div(recipe.eggs(), total_mass);

    let compaction = compaction_factor(fat_fraction, sugar_fraction, &constants.packing);
    let packing_effective =
        effective_packing(packing_fraction, fat_fraction, sugar_fraction, &constants.packing);
    let relative_viscosity = krieger_dougherty(packing_effective, &constants.packing);

    let hydration_pct = hydration_pct(water_total, flour);
    let network = network_factor(
        hydration_pct,
        sugar_fraction,
        fat_fraction,
        egg_fraction,
        &constants.network,
    );

    let matrix_cp =
        mix.viscosity_cp * constants.viscosity.dough_matrix_scale * emulsion.tightening;

    let viscosity_cp = if total_mass <= EPSILON {
        0.0
    } else if flour > EPSILON && continuous_volume <= EPSILON {
        // Dry flour with nothing to carry it.
        ETA_CAP_CP
    } else {
        let raw = matrix_cp * relative_viscosity * network.factor;
        if raw.is_finite() { raw.min(ETA_CAP_CP) } else { ETA_CAP_CP }
    };

    DoughPhase {
        water_total,
        bound_water,
        free_water,
        hydration_pct,
        total_mass,
        flour_volume,
        continuous_volume,
        packing_fraction,
        packing_effective,
        compaction,
        fat_fraction,
        sugar_fraction,
        egg_fraction,
        relative_viscosity,
        network,
        mix,
        matrix_cp,
        viscosity_cp,
    }
}

/// Water from eggs, honey and butter relative to flour, in percent.
pub fn hydration_pct(water: f64, flour: f64) -> f64 {
    if flour > EPSILON {
        (water / flour * 100.0).min(HYDRATION_CAP_PCT)
    } else if water > EPSILON {
        HYDRATION_CAP_PCT
    } else {
        0.0
    }
}
