//! Common test fixtures for recipes, engines and tempering inputs.
use medovik::prelude::*;

/// The classic recipe as a JSON evaluation request.
#[allow(dead_code)]
pub const CLASSIC_REQUEST_JSON: &str = r#"{
    "recipe": {
        "flour": 500,
        "butter": 120,
        "sugar": 150,
        "honey": 155,
        "eggs": 95,
        "soda": 5
    },
    "temperature_c": 30.0,
    "options": {
        "caramelization": { "enabled": false },
        "egg_temp_c": 20.0
    },
    "tempering": {
        "egg_mass_g": 200.0,
        "egg_temp_c": 20.0,
        "liquid_mass_g": 300.0,
        "liquid_temp_c": 90.0,
        "batch_count": 6
    }
}"#;

#[allow(dead_code)]
pub fn engine() -> DoughEngine {
    DoughEngine::builder()
        .build()
        .expect("default constants are valid")
}

#[allow(dead_code)]
pub fn defaults() -> ProcessOptions {
    ProcessOptions::default()
}

/// 500 g flour, 120 g butter, 150 g sugar, 155 g honey, 95 g eggs, 5 g soda.
#[allow(dead_code)]
pub fn classic_recipe() -> Recipe {
    Recipe::classic()
}

/// Slightly too much egg: sticky at its best temperature but close to target.
#[allow(dead_code)]
pub fn nearly_workable_recipe() -> Recipe {
    Recipe::classic().with(Ingredient::Eggs, 108.0)
}

/// Sticky and too far from target to be worked as-is.
#[allow(dead_code)]
pub fn sticky_recipe() -> Recipe {
    Recipe::classic().with(Ingredient::Eggs, 115.0)
}

/// Hydration around 51 %.
#[allow(dead_code)]
pub fn soaked_recipe() -> Recipe {
    Recipe::classic().with(Ingredient::Eggs, 280.0)
}

/// Flour far in excess: packing close to its maximum.
#[allow(dead_code)]
pub fn flour_heavy_recipe() -> Recipe {
    Recipe::classic().with(Ingredient::Flour, 2000.0)
}

/// 200 g eggs at 20 °C against 300 g of liquid at 90 °C.
#[allow(dead_code)]
pub fn hot_pour(batch_count: u32) -> TemperingInput {
    TemperingInput::new(200.0, 20.0, 300.0, 90.0, batch_count)
}
