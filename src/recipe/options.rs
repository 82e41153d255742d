use serde::{Deserialize, Serialize};

pub const CARAMELIZATION_TEMP_RANGE_C: (f64, f64) = (105.0, 110.0);
pub const CARAMELIZATION_MINUTES_RANGE: (f64, f64) = (1.5, 3.0);
pub const EVAPORATION_FRACTION_RANGE: (f64, f64) = (0.05, 0.10);

/// Default starting temperature of the eggs (°C).
pub const DEFAULT_EGG_TEMP_C: f64 = 20.0;

/// Pre-heating the honey/butter pool before the eggs go in.
///
/// Only `evaporation_fraction` feeds the model; temperature and time are carried so a
/// presentation layer can show what was assumed. Values outside the documented ranges
/// are clamped when read.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaramelizationOptions {
    pub enabled: bool,
    pub preheat_temp_c: f64,
    pub preheat_minutes: f64,
    pub evaporation_fraction: f64,
}

impl Default for CaramelizationOptions {
    fn default() -> Self {
        Self {
            enabled: false,
            preheat_temp_c: 107.5,
            preheat_minutes: 2.0,
            evaporation_fraction: 0.08,
        }
    }
}

impl CaramelizationOptions {
    pub fn enabled() -> Self {
        Self {
            enabled: true,
            ..Self::default()
        }
    }

    /// Fraction of each water pool removed, or zero when disabled.
    pub fn effective_evaporation(&self) -> f64 {
        if !self.enabled {
            return 0.0;
        }
        clamp_or_default(
            self.evaporation_fraction,
            EVAPORATION_FRACTION_RANGE,
            Self::default().evaporation_fraction,
        )
    }

    pub fn effective_temp_c(&self) -> f64 {
        clamp_or_default(
            self.preheat_temp_c,
            CARAMELIZATION_TEMP_RANGE_C,
            Self::default().preheat_temp_c,
        )
    }

    pub fn effective_minutes(&self) -> f64 {
        clamp_or_default(
            self.preheat_minutes,
            CARAMELIZATION_MINUTES_RANGE,
            Self::default().preheat_minutes,
        )
    }
}

/// Per-call process options. Every field has a documented default.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessOptions {
    pub caramelization: CaramelizationOptions,
    pub egg_temp_c: f64,
    /// Attach intermediate phase values to viscosity results.
    pub debug: bool,
}

impl Default for ProcessOptions {
    fn default() -> Self {
        Self {
            caramelization: CaramelizationOptions::default(),
            egg_temp_c: DEFAULT_EGG_TEMP_C,
            debug: false,
        }
    }
}

impl ProcessOptions {
    pub fn with_caramelization(mut self, caramelization: CaramelizationOptions) -> Self {
        self.caramelization = caramelization;
        self
    }

    pub fn with_egg_temp(mut self, egg_temp_c: f64) -> Self {
        self.egg_temp_c = egg_temp_c;
        self
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Egg temperature, falling back to the default when not finite.
    pub fn effective_egg_temp_c(&self) -> f64 {
        if self.egg_temp_c.is_finite() {
            self.egg_temp_c
        } else {
            DEFAULT_EGG_TEMP_C
        }
    }
}

fn clamp_or_default(value: f64, (min, max): (f64, f64), default: f64) -> f64 {
    if value.is_finite() {
        value.clamp(min, max)
    } else {
        default
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_caramelization_removes_nothing() {
        let options = CaramelizationOptions {
            enabled: false,
            evaporation_fraction: 0.1,
            ..Default::default()
        };
        assert_eq!(options.effective_evaporation(), 0.0);
    }

    #[test]
    fn test_out_of_range_fraction_is_clamped() {
        let options = CaramelizationOptions {
            evaporation_fraction: 0.5,
            ..CaramelizationOptions::enabled()
        };
        assert_eq!(options.effective_evaporation(), 0.10);

        let options = CaramelizationOptions {
            evaporation_fraction: f64::NAN,
            ..CaramelizationOptions::enabled()
        };
        assert_eq!(options.effective_evaporation(), 0.08);
    }

    #[test]
    fn test_options_deserialize_with_defaults() {
        let options: ProcessOptions =
            serde_json::from_str(r#"{ "caramelization": { "enabled": true } }"#).unwrap();
        assert!(options.caramelization.enabled);
        assert_eq!(options.egg_temp_c, DEFAULT_EGG_TEMP_C);
        assert!(!options.debug);
    }
}
