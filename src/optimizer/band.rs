use crate::constants::BandThresholds;
use crate::decision::Status;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Five ordered consistency bands, wettest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ViscosityBand {
    TooWet,
    Sticky,
    Optimal,
    Stiff,
    TooStiff,
}

impl ViscosityBand {
    pub fn classify(viscosity_cp: f64, thresholds: &BandThresholds) -> Self {
        if viscosity_cp < thresholds.too_wet_below {
            ViscosityBand::TooWet
        } else if viscosity_cp < thresholds.optimal_min {
            ViscosityBand::Sticky
        } else if viscosity_cp <= thresholds.optimal_max {
            ViscosityBand::Optimal
        } else if viscosity_cp <= thresholds.stiff_max {
            ViscosityBand::Stiff
        } else {
            ViscosityBand::TooStiff
        }
    }

    pub fn status(self) -> Status {
        match self {
            ViscosityBand::Optimal => Status::Go,
            ViscosityBand::Sticky | ViscosityBand::Stiff => Status::Wait,
            ViscosityBand::TooWet | ViscosityBand::TooStiff => Status::Stop,
        }
    }

    pub fn is_wet_side(self) -> bool {
        matches!(self, ViscosityBand::TooWet | ViscosityBand::Sticky)
    }

    pub fn is_stiff_side(self) -> bool {
        matches!(self, ViscosityBand::Stiff | ViscosityBand::TooStiff)
    }

    pub fn label(self) -> &'static str {
        match self {
            ViscosityBand::TooWet => "too-wet",
            ViscosityBand::Sticky => "sticky",
            ViscosityBand::Optimal => "optimal",
            ViscosityBand::Stiff => "stiff",
            ViscosityBand::TooStiff => "too-stiff",
        }
    }
}

impl fmt::Display for ViscosityBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_band_edges() {
        let t = BandThresholds::default();
        assert_eq!(ViscosityBand::classify(6999.0, &t), ViscosityBand::TooWet);
        assert_eq!(ViscosityBand::classify(7000.0, &t), ViscosityBand::Sticky);
        assert_eq!(ViscosityBand::classify(12000.0, &t), ViscosityBand::Optimal);
        assert_eq!(ViscosityBand::classify(20000.0, &t), ViscosityBand::Optimal);
        assert_eq!(ViscosityBand::classify(20001.0, &t), ViscosityBand::Stiff);
        assert_eq!(ViscosityBand::classify(30000.0, &t), ViscosityBand::Stiff);
        assert_eq!(ViscosityBand::classify(30001.0, &t), ViscosityBand::TooStiff);
    }

    #[test]
    fn test_band_status_mapping() {
        assert_eq!(ViscosityBand::Optimal.status(), Status::Go);
        assert_eq!(ViscosityBand::Sticky.status(), Status::Wait);
        assert_eq!(ViscosityBand::Stiff.status(), Status::Wait);
        assert_eq!(ViscosityBand::TooWet.status(), Status::Stop);
        assert_eq!(ViscosityBand::TooStiff.status(), Status::Stop);
    }

    #[test]
    fn test_band_sides() {
        assert!(ViscosityBand::TooWet.is_wet_side());
        assert!(ViscosityBand::Sticky.is_wet_side());
        assert!(ViscosityBand::Stiff.is_stiff_side());
        assert!(!ViscosityBand::Optimal.is_wet_side());
        assert!(!ViscosityBand::Optimal.is_stiff_side());
    }

    #[test]
    fn test_bands_are_ordered() {
        assert!(ViscosityBand::TooWet < ViscosityBand::Sticky);
        assert!(ViscosityBand::Stiff < ViscosityBand::TooStiff);
        assert_eq!(
            serde_json::to_string(&ViscosityBand::TooStiff).unwrap(),
            "\"too-stiff\""
        );
    }
}
