//! # Medovik - Honey-Cake Dough Process Engine
//!
//! **Medovik** models the rheology of laminated honey-cake dough and turns it into
//! process guidance. Given ingredient masses and a few process options it answers
//! four questions:
//!
//! 1.  **How thick is the dough?** [`viscosity::ViscosityModel`] chains a syrup, an
//!     emulsion and a dough phase, then applies a Krieger–Dougherty packing term and a
//!     structural network factor.
//! 2.  **How do I temper the eggs safely?** [`tempering::TemperingSimulator`] splits the
//!     hot liquid into ramped batches and tracks the temperature the eggs meet against
//!     the coagulation ceiling.
//! 3.  **At what temperature should I work it?** [`optimizer::WorkPlanOptimizer`]
//!     searches a temperature grid and, if no temperature is good enough, proposes a
//!     flour or liquid correction.
//! 4.  **Go, wait or stop?** [`decision::ProcessDecisionMapper`] applies hydration gates
//!     before falling back to the optimizer's verdict.
//!
//! Every operation is a pure function of its inputs and one [`constants::PhysicalConstants`]
//! table. [`engine::DoughEngine`] binds the table and exposes the four operations.
//!
//! ## Quick Start
//!
//! ```rust
//! use medovik::prelude::*;
//! use ahash::AHashMap;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! // Recipes can come from any name -> grams map.
//! let mut grams = AHashMap::new();
//! for (name, mass) in [("flour", 500.0), ("butter", 120.0), ("sugar", 150.0),
//!                      ("honey", 155.0), ("eggs", 95.0), ("soda", 5.0)] {
//!     grams.insert(name.to_string(), mass);
//! }
//! let recipe = grams.into_recipe()?;
//!
//! let engine = DoughEngine::builder().build()?;
//! let options = ProcessOptions::default();
//!
//! let viscosity = engine.compute_viscosity(&recipe, 30.0, &options);
//! println!("{} cP at 30 °C", viscosity.value_cp);
//!
//! let plan = engine.simulate_tempering(&TemperingInput::from_recipe(&recipe, 20.0, 90.0, 6))?;
//! println!("{}", ReportFormatter::format_tempering(&plan));
//!
//! let decision = engine.decide(&recipe, &options);
//! println!("{}", ReportFormatter::format_decision(&decision));
//! # Ok(())
//! # }
//! ```

pub mod constants;
pub mod data;
pub mod decision;
pub mod engine;
pub mod error;
mod numeric;
pub mod optimizer;
pub mod prelude;
pub mod recipe;
pub mod tempering;
pub mod trace;
pub mod viscosity;

#[cfg(feature = "python-bindings")]
mod python;

pub use engine::{DoughEngine, DoughEngineBuilder};
