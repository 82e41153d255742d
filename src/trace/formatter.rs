use crate::decision::Decision;
use crate::optimizer::{Correction, PlanB};
use crate::recipe::CaramelizationOptions;
use crate::tempering::{SafetyStatus, TemperingBatchPlan};
use crate::viscosity::{PhaseTrace, ViscosityResult};

/// Formats engine results into human-readable text.
pub struct ReportFormatter;

impl ReportFormatter {
    pub fn format_viscosity(result: &ViscosityResult) -> String {
        let c = &result.components;
        let mut out = String::new();
        out.push_str(&format!("Viscosity at {:.1} °C: {} cP\n", result.temperature_c, Self::format_cp(result.value_cp)));
        out.push_str(&format!(
            "  hydration {:.1} %, brix {:.1}, packing {:.4} (effective {:.4})\n",
            c.hydration_pct, c.brix, c.packing_fraction, c.packing_fraction_effective
        ));
        out.push_str(&format!(
            "  relative viscosity {:.3}, network factor {:.3}\n",
            c.relative_viscosity, c.network_factor
        ));
        let (low, high) = result.work_target.target_range_cp;
        out.push_str(&format!(
            "  classic window: {:.1} °C gives {} cP (target {}-{} cP)",
            result.work_target.optimal_temp_c,
            Self::format_cp(result.work_target.eta_at_optimal),
            Self::format_cp(low),
            Self::format_cp(high)
        ));
        if let Some(phases) = &result.phases {
            out.push('\n');
            out.push_str(&Self::format_phase_trace(phases));
        }
        out
    }

    /// One block per phase, in the order the dough is built.
    pub fn format_phase_trace(trace: &PhaseTrace) -> String {
        let syrup = &trace.syrup;
        let emulsion = &trace.emulsion;
        let dough = &trace.dough;
        let mut out = String::new();

        out.push_str(&format!("[syrup] {:.2} °C\n", syrup.temperature_c));
        out.push_str(&format!(
            "  water {:.1} g (evaporated {:.1} g), brix {:.1}, {:.1} cP\n",
            syrup.pools.syrup_water(),
            syrup.pools.evaporated,
            syrup.mix.brix,
            syrup.mix.viscosity_cp
        ));
        out.push_str(&format!("[emulsion] {:.2} °C\n", emulsion.effective_temp_c));
        out.push_str(&format!(
            "  egg fraction {:.3}, tightening {:.3}, {:.1} cP\n",
            emulsion.egg_fraction, emulsion.tightening, emulsion.viscosity_cp
        ));
        out.push_str(&format!("[dough] hydration {:.1} %\n", dough.hydration_pct));
        out.push_str(&format!(
            "  water {:.1} g = {:.1} g bound + {:.1} g free\n",
            dough.water_total, dough.bound_water, dough.free_water
        ));
        out.push_str(&format!(
            "  packing {:.4} -> {:.4}, relative {:.3}, network {:.3}\n",
            dough.packing_fraction, dough.packing_effective, dough.relative_viscosity, dough.network.factor
        ));
        out.push_str(&format!(
            "  matrix {:.1} cP -> {} cP",
            dough.matrix_cp,
            Self::format_cp(dough.viscosity_cp.round())
        ));
        out
    }

    pub fn format_decision(decision: &Decision) -> String {
        let plan_a = &decision.plan.plan_a;
        let mut out = String::new();
        out.push_str(&format!("{} ({:?}): {}\n", decision.status, decision.severity, decision.message));
        out.push_str(&format!(
            "  hydration {:.1} %, band {}, best at {:.2} °C with {} cP",
            decision.hydration_pct,
            decision.band,
            plan_a.optimal_temp_c,
            Self::format_cp(plan_a.eta_at_optimal)
        ));
        if decision.operational_override {
            out.push_str("\n  operational override: sticky band accepted");
        }
        if let Some(plan_b) = &decision.plan.plan_b {
            out.push('\n');
            out.push_str(&Self::format_plan_b(plan_b));
        }
        out
    }

    pub fn format_plan_b(plan_b: &PlanB) -> String {
        let action = match plan_b.correction {
            Correction::AddFlour { grams, volume_ml } => {
                format!("add {:.0} g flour (about {:.0} mL)", grams, volume_ml)
            }
            Correction::AddLiquid { ml } => format!("add {:.0} mL liquid", ml),
        };
        format!(
            "  plan B: {}, then work at {:.2} °C ({} cP, {})",
            action,
            plan_b.suggested_temp_c,
            Self::format_cp(plan_b.eta_at_suggested),
            plan_b.band_at_suggested
        )
    }

    /// The pre-heat that was assumed, as clamped by the model.
    pub fn format_caramelization(options: &CaramelizationOptions) -> String {
        if !options.enabled {
            return "pre-heat: off".to_string();
        }
        format!(
            "pre-heat: {:.1} °C for {:.1} min, {:.0} % of the honey and butter water evaporated",
            options.effective_temp_c(),
            options.effective_minutes(),
            options.effective_evaporation() * 100.0
        )
    }

    pub fn format_tempering(plan: &TemperingBatchPlan) -> String {
        let mut out = String::new();
        out.push_str(&format!("{:>5} {:>8} {:>9} {:>9} {:>9} {:>9}\n", "batch", "share", "liquid g", "before", "after", "contact"));
        for batch in &plan.batches {
            out.push_str(&format!(
                "{:>5} {:>7.2}% {:>9.1} {:>9.2} {:>9.2} {:>9.2}\n",
                batch.batch_number,
                batch.percentage_of_liquid,
                batch.liquid_mass_g,
                batch.temp_before_c,
                batch.temp_after_c,
                batch.contact_temp_c
            ));
        }
        let marker = match plan.safety_status {
            SafetyStatus::Safe => "",
            SafetyStatus::Warning | SafetyStatus::Danger => "!",
        };
        out.push_str(&format!(
            "final {:.2} °C, peak {:.2} °C at batch {}: {}{}",
            plan.final_temp_c,
            plan.max_batch_temp_c,
            plan.critical_batch().map_or(0, |batch| batch.batch_number),
            plan.safety_status.label(),
            marker
        ));
        out
    }

    /// Whole centipoise with thousands separators.
    fn format_cp(value: f64) -> String {
        let digits = format!("{}", value.round().abs() as i64);
        let grouped = digits
            .as_bytes()
            .rchunks(3)
            .rev()
            .map(|chunk| String::from_utf8_lossy(chunk).into_owned())
            .collect::<Vec<_>>()
            .join(",");
        if value < 0.0 { format!("-{}", grouped) } else { grouped }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_cp_groups_thousands() {
        assert_eq!(ReportFormatter::format_cp(15147.0), "15,147");
        assert_eq!(ReportFormatter::format_cp(300000.0), "300,000");
        assert_eq!(ReportFormatter::format_cp(999.0), "999");
        assert_eq!(ReportFormatter::format_cp(0.0), "0");
    }

    #[test]
    fn test_caramelization_line_uses_clamped_values() {
        let options = CaramelizationOptions {
            preheat_temp_c: 130.0,
            preheat_minutes: 1.0,
            ..CaramelizationOptions::enabled()
        };
        assert_eq!(
            ReportFormatter::format_caramelization(&options),
            "pre-heat: 110.0 °C for 1.5 min, 8 % of the honey and butter water evaporated"
        );
        assert_eq!(
            ReportFormatter::format_caramelization(&CaramelizationOptions::default()),
            "pre-heat: off"
        );
    }
}
