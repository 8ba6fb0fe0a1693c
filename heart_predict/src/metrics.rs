//! Values derived from a profile for the insight charts.

use std::fmt;

use crate::profile::HealthProfile;

pub const DAYS_IN_MONTH: u32 = 30;
pub const NORMAL_BMI: f64 = 25.0;
pub const RECOMMENDED_SLEEP_HOURS: f64 = 8.0;

// a BMI this close below a cut-off is treated as sitting on it, so that
// e.g. 81 / 1.8^2 (24.999999999999996 in f64) buckets as Overweight
const BMI_TOLERANCE: f64 = 1e-9;

pub fn bmi(weight: f64, height: f64) -> f64 {
    weight / height.powi(2)
}

/// Good days in the last month turned into poor days, the unit the
/// prediction service works in.
pub fn poor_days(good_days: u32) -> u32 {
    DAYS_IN_MONTH - good_days.min(DAYS_IN_MONTH)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BmiCategory {
    Underweight,
    Normal,
    Overweight,
    Obese,
}

impl BmiCategory {
    /// Lower cut-offs of Normal, Overweight and Obese.
    pub const CUTOFFS: [f64; 3] = [18.5, 25.0, 30.0];

    pub fn from_bmi(bmi: f64) -> BmiCategory {
        let at_least = |cutoff: f64| bmi >= cutoff - BMI_TOLERANCE;
        if at_least(Self::CUTOFFS[2]) {
            BmiCategory::Obese
        } else if at_least(Self::CUTOFFS[1]) {
            BmiCategory::Overweight
        } else if at_least(Self::CUTOFFS[0]) {
            BmiCategory::Normal
        } else {
            BmiCategory::Underweight
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            BmiCategory::Underweight => "Underweight",
            BmiCategory::Normal => "Normal",
            BmiCategory::Overweight => "Overweight",
            BmiCategory::Obese => "Obese",
        }
    }
}

impl fmt::Display for BmiCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Good and poor physical/mental days, in chart order.
pub fn health_days(profile: &HealthProfile) -> [(&'static str, u32); 4] {
    let physical = profile.physical_health_days.min(DAYS_IN_MONTH);
    let mental = profile.mental_health_days.min(DAYS_IN_MONTH);
    [
        ("Good Physical Health", physical),
        ("Poor Physical Health", poor_days(physical)),
        ("Good Mental Health", mental),
        ("Poor Mental Health", poor_days(mental)),
    ]
}

/// Labels of the risk flags that are set, in a fixed order.
pub fn risk_factors(profile: &HealthProfile) -> Vec<&'static str> {
    [
        ("Alcohol Drinker", profile.alcohol_drinkers),
        ("Diabetes", profile.had_diabetes),
        ("Skin Cancer", profile.had_skin_cancer),
        ("Kidney Disease", profile.had_kidney_disease),
        ("High Risk Last Year", profile.high_risk_last_year),
    ]
    .into_iter()
    .filter_map(|(label, present)| present.then_some(label))
    .collect()
}
