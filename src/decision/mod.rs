//! Maps a recipe to GO / WAIT / STOP.
//!
//! Gates are checked in order and the first match wins:
//!
//! 1. hydration at or above the critical-high limit stops the process outright;
//! 2. hydration below the critical-low limit waits for added liquid;
//! 3. hydration in the heavy-but-normal band waits for a rest;
//! 4. otherwise the optimizer's band decides, after the operational override.
//!
//! Every call is independent. Nothing is remembered between decisions.

use crate::constants::PhysicalConstants;
use crate::optimizer::{ViscosityBand, WorkPlan, WorkPlanOptimizer};
use crate::recipe::{ProcessOptions, Recipe};
use crate::viscosity::phases::{WaterPools, hydration_pct};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Status {
    Go,
    Wait,
    Stop,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Status::Go => "GO",
            Status::Wait => "WAIT",
            Status::Stop => "STOP",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Advisory,
    Warning,
    Critical,
}

/// Which gate produced the decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "gate", rename_all = "snake_case")]
pub enum DecisionReason {
    HydrationCriticalHigh,
    HydrationCriticalLow,
    HeavyButNormal,
    OperationalOverride,
    Band { band: ViscosityBand },
}

impl DecisionReason {
    pub fn message(&self) -> &'static str {
        match self {
            DecisionReason::HydrationCriticalHigh => {
                "Hydration is at or above the critical limit; the dough cannot be rolled"
            }
            DecisionReason::HydrationCriticalLow => {
                "Hydration is below the critical limit; add liquid before working the dough"
            }
            DecisionReason::HeavyButNormal => {
                "Hydration is high but normal for a heavy dough; rest it before rolling"
            }
            DecisionReason::OperationalOverride => {
                "Slightly sticky but close to target; workable with a lightly floured surface"
            }
            DecisionReason::Band { band } => match band {
                ViscosityBand::TooWet => "Dough is too wet at every working temperature",
                ViscosityBand::Sticky => "Dough is sticky; correct it or cool it before rolling",
                ViscosityBand::Optimal => "Dough is in the optimal range",
                ViscosityBand::Stiff => "Dough is stiff; correct it or warm it before rolling",
                ViscosityBand::TooStiff => "Dough is too stiff at every working temperature",
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Decision {
    pub status: Status,
    pub severity: Severity,
    pub reason: DecisionReason,
    pub message: String,
    pub hydration_pct: f64,
    pub band: ViscosityBand,
    pub plan: WorkPlan,
    /// Set when a sticky WAIT was lifted to GO.
    pub operational_override: bool,
}

#[derive(Debug, Clone, Copy)]
pub struct ProcessDecisionMapper<'a> {
    constants: &'a PhysicalConstants,
    optimizer: WorkPlanOptimizer<'a>,
}

impl<'a> ProcessDecisionMapper<'a> {
    pub fn new(constants: &'a PhysicalConstants) -> Self {
        Self {
            constants,
            optimizer: WorkPlanOptimizer::new(constants),
        }
    }

    pub fn decide(&self, recipe: &Recipe, options: &ProcessOptions) -> Decision {
        let thresholds = &self.constants.decision;
        let pools = WaterPools::from_recipe(
            recipe,
            options.caramelization.effective_evaporation(),
            self.constants,
        );
        let hydration = hydration_pct(pools.total(), recipe.flour());
        let mut plan = self.optimizer.find_optimal_work_plan(recipe, options);

        let (status, severity, reason) = if hydration >= thresholds.critical_high_pct {
            (Status::Stop, Severity::Critical, DecisionReason::HydrationCriticalHigh)
        } else if hydration < thresholds.critical_low_pct {
            if plan.plan_b.is_none_or(|b| b.delta_liquid_ml().is_none()) {
                plan.plan_b = self.optimizer.liquid_plan(recipe, options);
            }
            (Status::Wait, Severity::Warning, DecisionReason::HydrationCriticalLow)
        } else if hydration >= thresholds.heavy_min_pct {
            (Status::Wait, Severity::Advisory, DecisionReason::HeavyButNormal)
        } else {
            let band = plan.plan_a.band;
            match plan.status() {
                Status::Go if plan.operational_override => {
                    (Status::Go, Severity::Advisory, DecisionReason::OperationalOverride)
                }
                Status::Go => (Status::Go, Severity::Info, DecisionReason::Band { band }),
                Status::Wait => (Status::Wait, Severity::Warning, DecisionReason::Band { band }),
                Status::Stop => (Status::Stop, Severity::Critical, DecisionReason::Band { band }),
            }
        };

        // The override only counts when the band gate is the one that decided.
        let operational_override = reason == DecisionReason::OperationalOverride;
        if operational_override {
            tracing::info!(
                hydration_pct = hydration,
                viscosity_cp = plan.plan_a.eta_at_optimal,
                "Sticky dough accepted under operational override"
            );
        }
        tracing::debug!(%status, ?severity, ?reason, hydration_pct = hydration, "Decision made");

        Decision {
            status,
            severity,
            reason,
            message: reason.message().to_string(),
            hydration_pct: crate::numeric::round_to(hydration, 1),
            band: plan.plan_a.band,
            plan,
            operational_override,
        }
    }
}
