use super::definition::{Ingredient, Recipe};
use crate::error::RecipeConversionError;
use ahash::AHashMap;
use std::collections::HashMap;

/// A trait for custom data models that can be converted into a [`Recipe`].
///
/// This is the extension point for feeding the engine from whatever format an
/// upstream parser produces. Unknown ingredient names are rejected; masses are
/// taken as-is and sanitised by the recipe itself.
///
/// # Example
///
/// ```rust
/// use medovik::error::RecipeConversionError;
/// use medovik::recipe::{Ingredient, IntoRecipe, Recipe};
///
/// struct Line { name: String, grams: f64 }
/// struct ParsedCard { lines: Vec<Line> }
///
/// impl IntoRecipe for ParsedCard {
///     fn into_recipe(self) -> Result<Recipe, RecipeConversionError> {
///         let mut recipe = Recipe::new();
///         for line in self.lines {
///             let ingredient = Ingredient::from_name(&line.name)
///                 .ok_or_else(|| RecipeConversionError::UnknownIngredient(line.name.clone()))?;
///             recipe = recipe.adding(ingredient, line.grams);
///         }
///         Ok(recipe)
///     }
/// }
///
/// let card = ParsedCard { lines: vec![Line { name: "flour".into(), grams: 500.0 }] };
/// assert_eq!(card.into_recipe().unwrap().flour(), 500.0);
/// ```
pub trait IntoRecipe {
    /// Consumes the object and converts it into a recipe.
    fn into_recipe(self) -> Result<Recipe, RecipeConversionError>;
}

impl IntoRecipe for Recipe {
    fn into_recipe(self) -> Result<Recipe, RecipeConversionError> {
        Ok(self)
    }
}

impl IntoRecipe for AHashMap<String, f64> {
    fn into_recipe(self) -> Result<Recipe, RecipeConversionError> {
        from_pairs(self)
    }
}

impl IntoRecipe for HashMap<String, f64> {
    fn into_recipe(self) -> Result<Recipe, RecipeConversionError> {
        from_pairs(self)
    }
}

impl IntoRecipe for serde_json::Value {
    fn into_recipe(self) -> Result<Recipe, RecipeConversionError> {
        let object = match self {
            serde_json::Value::Object(map) => map,
            other => {
                return Err(RecipeConversionError::ValidationError(format!(
                    "expected an object of ingredient masses, found {}",
                    other
                )));
            }
        };
        let mut pairs = Vec::with_capacity(object.len());
        for (name, value) in object {
            let grams = value
                .as_f64()
                .ok_or_else(|| RecipeConversionError::NonNumericAmount {
                    name: name.clone(),
                    found: value.to_string(),
                })?;
            pairs.push((name, grams));
        }
        from_pairs(pairs)
    }
}

fn from_pairs(
    pairs: impl IntoIterator<Item = (String, f64)>,
) -> Result<Recipe, RecipeConversionError> {
    pairs.into_iter().try_fold(Recipe::new(), |recipe, (name, grams)| {
        let ingredient = Ingredient::from_name(&name)
            .ok_or(RecipeConversionError::UnknownIngredient(name))?;
        Ok(recipe.adding(ingredient, grams))
    })
}
