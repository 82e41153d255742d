use super::TemperingInput;
use crate::error::{FieldViolation, TemperingField, TemperingValidationError, ViolationCode};

pub const EGG_MASS_RANGE_G: (f64, f64) = (1.0, 1000.0);
pub const EGG_TEMP_RANGE_C: (f64, f64) = (0.0, 30.0);
pub const LIQUID_MASS_RANGE_G: (f64, f64) = (1.0, 5000.0);
pub const LIQUID_TEMP_RANGE_C: (f64, f64) = (60.0, 120.0);
pub const BATCH_COUNT_RANGE: (u32, u32) = (2, 10);

/// Checks every field and reports all violations at once.
pub fn validate(input: &TemperingInput) -> Result<(), TemperingValidationError> {
    let checks = [
        (TemperingField::EggMass, input.egg_mass_g, EGG_MASS_RANGE_G),
        (TemperingField::EggTemp, input.egg_temp_c, EGG_TEMP_RANGE_C),
        (TemperingField::LiquidMass, input.liquid_mass_g, LIQUID_MASS_RANGE_G),
        (TemperingField::LiquidTemp, input.liquid_temp_c, LIQUID_TEMP_RANGE_C),
        (
            TemperingField::BatchCount,
            input.batch_count as f64,
            (BATCH_COUNT_RANGE.0 as f64, BATCH_COUNT_RANGE.1 as f64),
        ),
    ];

    let violations: Vec<FieldViolation> = checks
        .into_iter()
        .filter_map(|(field, value, range)| check(field, value, range))
        .collect();

    if violations.is_empty() {
        Ok(())
    } else {
        Err(TemperingValidationError { violations })
    }
}

fn check(field: TemperingField, value: f64, (min, max): (f64, f64)) -> Option<FieldViolation> {
    let code = if !value.is_finite() {
        ViolationCode::NotFinite
    } else if value < min || value > max {
        ViolationCode::OutOfRange { min, max }
    } else {
        return None;
    };
    Some(FieldViolation { field, code, value })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> TemperingInput {
        TemperingInput::new(200.0, 20.0, 300.0, 90.0, 4)
    }

    #[test]
    fn test_valid_input_passes() {
        assert!(validate(&valid()).is_ok());
    }

    #[test]
    fn test_every_violation_is_listed() {
        let input = TemperingInput {
            egg_mass_g: 0.0,
            egg_temp_c: f64::NAN,
            liquid_temp_c: 150.0,
            batch_count: 11,
            ..valid()
        };
        let err = validate(&input).unwrap_err();
        let fields: Vec<_> = err.violations.iter().map(|v| v.field).collect();
        assert_eq!(
            fields,
            vec![
                TemperingField::EggMass,
                TemperingField::EggTemp,
                TemperingField::LiquidTemp,
                TemperingField::BatchCount,
            ]
        );
        assert_eq!(err.violations[1].code, ViolationCode::NotFinite);
        assert!(!err.has(TemperingField::LiquidMass));
        assert!(err.to_string().contains("liquid_temp"));
    }

    #[test]
    fn test_bounds_are_inclusive() {
        let input = TemperingInput::new(1000.0, 0.0, 5000.0, 120.0, 10);
        assert!(validate(&input).is_ok());
        let input = TemperingInput::new(1.0, 30.0, 1.0, 60.0, 2);
        assert!(validate(&input).is_ok());
    }
}
