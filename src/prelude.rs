//! Prelude module for convenient imports
//!
//! Re-exports the engine, its inputs and its results.
//!
//! # Example
//!
//! ```rust
//! use medovik::prelude::*;
//!
//! let engine = DoughEngine::default();
//! let decision = engine.decide(&Recipe::classic(), &ProcessOptions::default());
//! assert_eq!(decision.status, Status::Go);
//! ```

// Engine
pub use crate::engine::{DoughEngine, DoughEngineBuilder};

// Inputs
pub use crate::constants::PhysicalConstants;
pub use crate::recipe::{CaramelizationOptions, Ingredient, IntoRecipe, ProcessOptions, Recipe};
pub use crate::tempering::{LiquidBreakdown, TemperingInput};

// Results
pub use crate::decision::{Decision, DecisionReason, Severity, Status};
pub use crate::optimizer::{Correction, PlanA, PlanB, ViscosityBand, WorkPlan};
pub use crate::tempering::{SafetyStatus, TemperingBatch, TemperingBatchPlan};
pub use crate::viscosity::{ViscosityComponents, ViscosityResult, WorkTarget};

// Error types
pub use crate::error::{ConfigError, RecipeConversionError, TemperingValidationError};

// Report formatting
pub use crate::trace::ReportFormatter;
