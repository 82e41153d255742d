use serde::{Deserialize, Serialize};
use std::fmt;

/// The ingredients the dough model knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Ingredient {
    Flour,
    Butter,
    Sugar,
    Honey,
    Eggs,
    Soda,
}

impl Ingredient {
    pub const ALL: [Ingredient; 6] = [
        Ingredient::Flour,
        Ingredient::Butter,
        Ingredient::Sugar,
        Ingredient::Honey,
        Ingredient::Eggs,
        Ingredient::Soda,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Ingredient::Flour => "flour",
            Ingredient::Butter => "butter",
            Ingredient::Sugar => "sugar",
            Ingredient::Honey => "honey",
            Ingredient::Eggs => "eggs",
            Ingredient::Soda => "soda",
        }
    }

    /// Resolve a user-facing name, case-insensitively, including a few common aliases.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "flour" => Some(Ingredient::Flour),
            "butter" => Some(Ingredient::Butter),
            "sugar" => Some(Ingredient::Sugar),
            "honey" => Some(Ingredient::Honey),
            "eggs" | "egg" => Some(Ingredient::Eggs),
            "soda" | "baking_soda" => Some(Ingredient::Soda),
            _ => None,
        }
    }
}

impl fmt::Display for Ingredient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Ingredient masses in grams.
///
/// The engine never mutates a recipe it is given; corrections are expressed as new
/// recipes via [`Recipe::with`]. Negative, `NaN` and infinite masses read back as zero.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Recipe {
    flour: f64,
    butter: f64,
    sugar: f64,
    honey: f64,
    eggs: f64,
    soda: f64,
}

impl Recipe {
    pub fn new() -> Self {
        Self::default()
    }

    /// The classically proportioned honey-cake dough.
    pub fn classic() -> Self {
        Self::new()
            .with(Ingredient::Flour, 500.0)
            .with(Ingredient::Butter, 120.0)
            .with(Ingredient::Sugar, 150.0)
            .with(Ingredient::Honey, 155.0)
            .with(Ingredient::Eggs, 95.0)
            .with(Ingredient::Soda, 5.0)
    }

    /// Returns a copy with one ingredient replaced.
    pub fn with(mut self, ingredient: Ingredient, grams: f64) -> Self {
        *self.slot_mut(ingredient) = grams;
        self
    }

    /// Returns a copy with `delta` grams added to one ingredient.
    pub fn adding(self, ingredient: Ingredient, delta: f64) -> Self {
        let current = self.grams(ingredient);
        self.with(ingredient, current + delta)
    }

    /// Sanitised mass of an ingredient.
    pub fn grams(&self, ingredient: Ingredient) -> f64 {
        let raw = match ingredient {
            Ingredient::Flour => self.flour,
            Ingredient::Butter => self.butter,
            Ingredient::Sugar => self.sugar,
            Ingredient::Honey => self.honey,
            Ingredient::Eggs => self.eggs,
            Ingredient::Soda => self.soda,
        };
        if raw.is_finite() && raw > 0.0 { raw } else { 0.0 }
    }

    pub fn flour(&self) -> f64 {
        self.grams(Ingredient::Flour)
    }

    pub fn butter(&self) -> f64 {
        self.grams(Ingredient::Butter)
    }

    pub fn sugar(&self) -> f64 {
        self.grams(Ingredient::Sugar)
    }

    pub fn honey(&self) -> f64 {
        self.grams(Ingredient::Honey)
    }

    pub fn eggs(&self) -> f64 {
        self.grams(Ingredient::Eggs)
    }

    pub fn soda(&self) -> f64 {
        self.grams(Ingredient::Soda)
    }

    pub fn total_mass(&self) -> f64 {
        Ingredient::ALL.iter().map(|&i| self.grams(i)).sum()
    }

    /// Whether any stored mass had to be sanitised to zero.
    pub fn has_invalid_masses(&self) -> bool {
        Ingredient::ALL.iter().any(|&i| {
            let raw = self.raw(i);
            !raw.is_finite() || raw < 0.0
        })
    }

    /// Iterates over `(ingredient, grams)` pairs in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (Ingredient, f64)> + '_ {
        Ingredient::ALL.iter().map(move |&i| (i, self.grams(i)))
    }

    fn raw(&self, ingredient: Ingredient) -> f64 {
        match ingredient {
            Ingredient::Flour => self.flour,
            Ingredient::Butter => self.butter,
            Ingredient::Sugar => self.sugar,
            Ingredient::Honey => self.honey,
            Ingredient::Eggs => self.eggs,
            Ingredient::Soda => self.soda,
        }
    }

    fn slot_mut(&mut self, ingredient: Ingredient) -> &mut f64 {
        match ingredient {
            Ingredient::Flour => &mut self.flour,
            Ingredient::Butter => &mut self.butter,
            Ingredient::Sugar => &mut self.sugar,
            Ingredient::Honey => &mut self.honey,
            Ingredient::Eggs => &mut self.eggs,
            Ingredient::Soda => &mut self.soda,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_masses_read_as_zero() {
        let recipe = Recipe::new()
            .with(Ingredient::Flour, f64::NAN)
            .with(Ingredient::Butter, -20.0)
            .with(Ingredient::Honey, f64::INFINITY)
            .with(Ingredient::Sugar, 100.0);
        assert_eq!(recipe.flour(), 0.0);
        assert_eq!(recipe.butter(), 0.0);
        assert_eq!(recipe.honey(), 0.0);
        assert_eq!(recipe.total_mass(), 100.0);
        assert!(recipe.has_invalid_masses());
    }

    #[test]
    fn test_with_returns_new_recipe() {
        let base = Recipe::classic();
        let richer = base.adding(Ingredient::Flour, 40.0);
        assert_eq!(base.flour(), 500.0);
        assert_eq!(richer.flour(), 540.0);
    }

    #[test]
    fn test_ingredient_aliases() {
        assert_eq!(Ingredient::from_name(" Egg "), Some(Ingredient::Eggs));
        assert_eq!(Ingredient::from_name("BAKING_SODA"), Some(Ingredient::Soda));
        assert_eq!(Ingredient::from_name("milk"), None);
    }
}
