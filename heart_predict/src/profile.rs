//! The health profile collected from the user and the per-field editors
//! that keep it within the ranges of its input controls.

use std::fmt;
use std::str::FromStr;

use heart_client::PredictionRequest;
use rand::Rng;
use thiserror::Error;

use crate::metrics::poor_days;

pub const HEIGHT_RANGE: (f64, f64) = (1.0, 2.5);
pub const WEIGHT_RANGE: (f64, f64) = (30.0, 300.0);
pub const HEALTH_DAYS_RANGE: (u32, u32) = (0, 30);
pub const SLEEP_HOURS_RANGE: (u32, u32) = (0, 24);

// randomize() draws from narrower, more plausible ranges than the controls allow
pub const RANDOM_HEIGHT_RANGE: (f64, f64) = (1.5, 2.0);
pub const RANDOM_WEIGHT_RANGE: (f64, f64) = (50.0, 100.0);
pub const RANDOM_SLEEP_HOURS_RANGE: (u32, u32) = (4, 12);

#[derive(Debug, Error, PartialEq)]
pub enum ProfileError {
    #[error("unknown field '{0}'")]
    UnknownField(String),
    #[error("'{value}' is not a valid value for {field}")]
    InvalidValue { field: &'static str, value: String },
    #[error("'{value}' is not one of: {choices}")]
    UnknownChoice { value: String, choices: String },
}

/// A closed set of labelled options, as shown in a select box.
pub trait Choice: Copy + 'static {
    const ALL: &'static [Self];

    fn label(&self) -> &'static str;

    fn labels() -> Vec<&'static str> {
        Self::ALL.iter().map(|c| c.label()).collect()
    }
}

fn parse_choice<T: Choice>(raw: &str) -> Result<T, ProfileError> {
    let raw = raw.trim();
    T::ALL
        .iter()
        .find(|c| c.label().eq_ignore_ascii_case(raw))
        .copied()
        .ok_or_else(|| ProfileError::UnknownChoice {
            value: String::from(raw),
            choices: T::labels().join(" | "),
        })
}

fn random_choice<T: Choice, R: Rng>(rng: &mut R) -> T {
    T::ALL[rng.gen_range(0..T::ALL.len())]
}

macro_rules! choice_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $label:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant),+
        }

        impl Choice for $name {
            const ALL: &'static [Self] = &[$($name::$variant),+];

            fn label(&self) -> &'static str {
                match self {
                    $($name::$variant => $label),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        }

        impl FromStr for $name {
            type Err = ProfileError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                parse_choice(s)
            }
        }
    };
}

choice_enum!(
    /// Biological sex.
    Sex {
        Male => "Male",
        Female => "Female",
    }
);

choice_enum!(
    AgeCategory {
        Age18To24 => "Age 18 to 24",
        Age25To29 => "Age 25 to 29",
        Age30To34 => "Age 30 to 34",
        Age35To39 => "Age 35 to 39",
        Age40To44 => "Age 40 to 44",
        Age45To49 => "Age 45 to 49",
        Age50To54 => "Age 50 to 54",
        Age55To59 => "Age 55 to 59",
        Age60To64 => "Age 60 to 64",
        Age65To69 => "Age 65 to 69",
        Age70To74 => "Age 70 to 74",
        Age75To79 => "Age 75 to 79",
        Age80OrOlder => "Age 80 or older",
    }
);

choice_enum!(
    RaceEthnicity {
        WhiteNonHispanic => "White only, Non-Hispanic",
        BlackNonHispanic => "Black only, Non-Hispanic",
        Hispanic => "Hispanic",
        Other => "Other",
    }
);

choice_enum!(
    /// Self-reported health status.
    GeneralHealth {
        Excellent => "Excellent",
        VeryGood => "Very good",
        Good => "Good",
        Fair => "Fair",
        Poor => "Poor",
    }
);

choice_enum!(
    SmokerStatus {
        EveryDay => "Current smoker - now smokes every day",
        SomeDays => "Current smoker - now smokes some days",
        Former => "Former smoker",
        Never => "Never smoked",
    }
);

choice_enum!(
    ECigaretteUsage {
        Never => "Never used e-cigarettes in my entire life",
        EveryDay => "Use e-cigarettes every day",
        SomeDays => "Use e-cigarettes some days",
        Former => "Former e-cigarette user",
    }
);

/// Every editable field of a HealthProfile, in form order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Height,
    Weight,
    PhysicalHealthDays,
    MentalHealthDays,
    SleepHours,
    Sex,
    AgeCategory,
    RaceEthnicity,
    GeneralHealth,
    SmokerStatus,
    ECigaretteUsage,
    AlcoholDrinkers,
    HadDiabetes,
    HadSkinCancer,
    HadKidneyDisease,
    HighRiskLastYear,
}

/// What kind of control edits a field, and what it accepts.
#[derive(Debug, Clone, PartialEq)]
pub enum Bounds {
    Decimal { min: f64, max: f64 },
    Count { min: u32, max: u32 },
    Choice(Vec<&'static str>),
    Flag,
}

impl fmt::Display for Bounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Bounds::Decimal { min, max } => write!(f, "{:.1} - {:.1}", min, max),
            Bounds::Count { min, max } => write!(f, "{} - {}", min, max),
            Bounds::Choice(labels) => f.write_str(&labels.join(" | ")),
            Bounds::Flag => f.write_str("yes | no"),
        }
    }
}

impl Field {
    pub const ALL: [Field; 16] = [
        Field::Height,
        Field::Weight,
        Field::PhysicalHealthDays,
        Field::MentalHealthDays,
        Field::SleepHours,
        Field::Sex,
        Field::AgeCategory,
        Field::RaceEthnicity,
        Field::GeneralHealth,
        Field::SmokerStatus,
        Field::ECigaretteUsage,
        Field::AlcoholDrinkers,
        Field::HadDiabetes,
        Field::HadSkinCancer,
        Field::HadKidneyDisease,
        Field::HighRiskLastYear,
    ];

    /// Name used on the command line.
    pub fn name(&self) -> &'static str {
        match self {
            Field::Height => "height",
            Field::Weight => "weight",
            Field::PhysicalHealthDays => "physical_health_days",
            Field::MentalHealthDays => "mental_health_days",
            Field::SleepHours => "sleep_hours",
            Field::Sex => "sex",
            Field::AgeCategory => "age_category",
            Field::RaceEthnicity => "race_ethnicity",
            Field::GeneralHealth => "general_health",
            Field::SmokerStatus => "smoker_status",
            Field::ECigaretteUsage => "e_cigarette_usage",
            Field::AlcoholDrinkers => "alcohol_drinkers",
            Field::HadDiabetes => "had_diabetes",
            Field::HadSkinCancer => "had_skin_cancer",
            Field::HadKidneyDisease => "had_kidney_disease",
            Field::HighRiskLastYear => "high_risk_last_year",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Field::Height => "Height (m)",
            Field::Weight => "Weight (kg)",
            Field::PhysicalHealthDays => "Physical Health Days",
            Field::MentalHealthDays => "Mental Health Days",
            Field::SleepHours => "Sleep Hours",
            Field::Sex => "Sex",
            Field::AgeCategory => "Age Category",
            Field::RaceEthnicity => "Race/Ethnicity",
            Field::GeneralHealth => "General Health",
            Field::SmokerStatus => "Smoker Status",
            Field::ECigaretteUsage => "E-Cigarette Usage",
            Field::AlcoholDrinkers => "Alcohol Drinker",
            Field::HadDiabetes => "Had Diabetes",
            Field::HadSkinCancer => "Had Skin Cancer",
            Field::HadKidneyDisease => "Had Kidney Disease",
            Field::HighRiskLastYear => "High Risk Last Year",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Field::Height => "Your height in meters",
            Field::Weight => "Your weight in kilograms",
            Field::PhysicalHealthDays => {
                "Number of days physical health was good in the past 30 days"
            }
            Field::MentalHealthDays => "Number of days mental health was good in the past 30 days",
            Field::SleepHours => "Average hours of sleep per 24-hour period",
            Field::Sex => "Biological sex",
            Field::AgeCategory => "Age group",
            Field::RaceEthnicity => "Racial or ethnic background",
            Field::GeneralHealth => "Self-reported health status",
            Field::SmokerStatus => "Current smoking habits",
            Field::ECigaretteUsage => "Current or past e-cigarette use",
            Field::AlcoholDrinkers => "Whether you consume alcohol",
            Field::HadDiabetes => "If you have been diagnosed with diabetes",
            Field::HadSkinCancer => "If you have been diagnosed with skin cancer",
            Field::HadKidneyDisease => "If you have been diagnosed with kidney disease",
            Field::HighRiskLastYear => {
                "If you were told you're at high risk for heart disease or stroke in the past year"
            }
        }
    }

    pub fn bounds(&self) -> Bounds {
        match self {
            Field::Height => Bounds::Decimal {
                min: HEIGHT_RANGE.0,
                max: HEIGHT_RANGE.1,
            },
            Field::Weight => Bounds::Decimal {
                min: WEIGHT_RANGE.0,
                max: WEIGHT_RANGE.1,
            },
            Field::PhysicalHealthDays | Field::MentalHealthDays => Bounds::Count {
                min: HEALTH_DAYS_RANGE.0,
                max: HEALTH_DAYS_RANGE.1,
            },
            Field::SleepHours => Bounds::Count {
                min: SLEEP_HOURS_RANGE.0,
                max: SLEEP_HOURS_RANGE.1,
            },
            Field::Sex => Bounds::Choice(Sex::labels()),
            Field::AgeCategory => Bounds::Choice(AgeCategory::labels()),
            Field::RaceEthnicity => Bounds::Choice(RaceEthnicity::labels()),
            Field::GeneralHealth => Bounds::Choice(GeneralHealth::labels()),
            Field::SmokerStatus => Bounds::Choice(SmokerStatus::labels()),
            Field::ECigaretteUsage => Bounds::Choice(ECigaretteUsage::labels()),
            Field::AlcoholDrinkers
            | Field::HadDiabetes
            | Field::HadSkinCancer
            | Field::HadKidneyDisease
            | Field::HighRiskLastYear => Bounds::Flag,
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Field {
    type Err = ProfileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Field::ALL
            .iter()
            .find(|field| field.name().eq_ignore_ascii_case(s))
            .copied()
            .ok_or_else(|| ProfileError::UnknownField(String::from(s)))
    }
}

fn parse_decimal(field: Field, raw: &str, range: (f64, f64)) -> Result<f64, ProfileError> {
    // f64::clamp sends an overflowed +-inf to the matching end
    match raw.parse::<f64>() {
        Ok(value) if !value.is_nan() => Ok(value.clamp(range.0, range.1)),
        _ => Err(ProfileError::InvalidValue {
            field: field.name(),
            value: String::from(raw),
        }),
    }
}

fn parse_count(field: Field, raw: &str, range: (u32, u32)) -> Result<u32, ProfileError> {
    match raw.parse::<i64>() {
        Ok(value) => Ok(value.clamp(range.0 as i64, range.1 as i64) as u32),
        Err(_) if is_integer(raw) => Ok(if raw.starts_with('-') { range.0 } else { range.1 }),
        Err(_) => Err(ProfileError::InvalidValue {
            field: field.name(),
            value: String::from(raw),
        }),
    }
}

/// Signed run of digits, whatever its size.
fn is_integer(raw: &str) -> bool {
    let digits = raw.strip_prefix(['-', '+']).unwrap_or(raw);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

fn parse_flag(field: Field, raw: &str) -> Result<bool, ProfileError> {
    match raw.to_ascii_lowercase().as_str() {
        "true" | "yes" | "y" | "1" => Ok(true),
        "false" | "no" | "n" | "0" => Ok(false),
        _ => Err(ProfileError::InvalidValue {
            field: field.name(),
            value: String::from(raw),
        }),
    }
}

fn yes_no(flag: bool) -> String {
    String::from(if flag { "yes" } else { "no" })
}

/// The sixteen attributes sent to the prediction service. Health day
/// counts are *good* days here; to_request() converts them.
#[derive(Debug, Clone, PartialEq)]
pub struct HealthProfile {
    pub height: f64,
    pub weight: f64,
    pub physical_health_days: u32,
    pub mental_health_days: u32,
    pub sleep_hours: u32,
    pub sex: Sex,
    pub age_category: AgeCategory,
    pub race_ethnicity: RaceEthnicity,
    pub general_health: GeneralHealth,
    pub smoker_status: SmokerStatus,
    pub e_cigarette_usage: ECigaretteUsage,
    pub alcohol_drinkers: bool,
    pub had_diabetes: bool,
    pub had_skin_cancer: bool,
    pub had_kidney_disease: bool,
    pub high_risk_last_year: bool,
}

impl Default for HealthProfile {
    fn default() -> Self {
        HealthProfile {
            height: 1.75,
            weight: 70.5,
            physical_health_days: 28,
            mental_health_days: 29,
            sleep_hours: 7,
            sex: Sex::Male,
            age_category: AgeCategory::Age30To34,
            race_ethnicity: RaceEthnicity::WhiteNonHispanic,
            general_health: GeneralHealth::VeryGood,
            smoker_status: SmokerStatus::Never,
            e_cigarette_usage: ECigaretteUsage::Never,
            alcohol_drinkers: false,
            had_diabetes: false,
            had_skin_cancer: false,
            had_kidney_disease: false,
            high_risk_last_year: false,
        }
    }
}

impl HealthProfile {
    /// Draws every field independently and uniformly, using the thread rng.
    pub fn randomize() -> HealthProfile {
        HealthProfile::randomize_with(&mut rand::thread_rng())
    }

    pub fn randomize_with<R: Rng>(rng: &mut R) -> HealthProfile {
        HealthProfile {
            height: rng.gen_range(RANDOM_HEIGHT_RANGE.0..=RANDOM_HEIGHT_RANGE.1),
            weight: rng.gen_range(RANDOM_WEIGHT_RANGE.0..=RANDOM_WEIGHT_RANGE.1),
            physical_health_days: rng.gen_range(HEALTH_DAYS_RANGE.0..=HEALTH_DAYS_RANGE.1),
            mental_health_days: rng.gen_range(HEALTH_DAYS_RANGE.0..=HEALTH_DAYS_RANGE.1),
            sleep_hours: rng.gen_range(RANDOM_SLEEP_HOURS_RANGE.0..=RANDOM_SLEEP_HOURS_RANGE.1),
            sex: random_choice(rng),
            age_category: random_choice(rng),
            race_ethnicity: random_choice(rng),
            general_health: random_choice(rng),
            smoker_status: random_choice(rng),
            e_cigarette_usage: random_choice(rng),
            alcohol_drinkers: rng.gen_bool(0.5),
            had_diabetes: rng.gen_bool(0.5),
            had_skin_cancer: rng.gen_bool(0.5),
            had_kidney_disease: rng.gen_bool(0.5),
            high_risk_last_year: rng.gen_bool(0.5),
        }
    }

    /// Pulls every numeric field back inside its control range.
    pub fn clamped(mut self) -> HealthProfile {
        self.height = self.height.clamp(HEIGHT_RANGE.0, HEIGHT_RANGE.1);
        self.weight = self.weight.clamp(WEIGHT_RANGE.0, WEIGHT_RANGE.1);
        self.physical_health_days = self
            .physical_health_days
            .clamp(HEALTH_DAYS_RANGE.0, HEALTH_DAYS_RANGE.1);
        self.mental_health_days = self
            .mental_health_days
            .clamp(HEALTH_DAYS_RANGE.0, HEALTH_DAYS_RANGE.1);
        self.sleep_hours = self
            .sleep_hours
            .clamp(SLEEP_HOURS_RANGE.0, SLEEP_HOURS_RANGE.1);
        self
    }

    /// Edits a single field from user text. Numbers outside the control
    /// range are clamped rather than rejected.
    pub fn set(&mut self, field: Field, raw: &str) -> Result<(), ProfileError> {
        let raw = raw.trim();
        match field {
            Field::Height => self.height = parse_decimal(field, raw, HEIGHT_RANGE)?,
            Field::Weight => self.weight = parse_decimal(field, raw, WEIGHT_RANGE)?,
            Field::PhysicalHealthDays => {
                self.physical_health_days = parse_count(field, raw, HEALTH_DAYS_RANGE)?
            }
            Field::MentalHealthDays => {
                self.mental_health_days = parse_count(field, raw, HEALTH_DAYS_RANGE)?
            }
            Field::SleepHours => self.sleep_hours = parse_count(field, raw, SLEEP_HOURS_RANGE)?,
            Field::Sex => self.sex = raw.parse()?,
            Field::AgeCategory => self.age_category = raw.parse()?,
            Field::RaceEthnicity => self.race_ethnicity = raw.parse()?,
            Field::GeneralHealth => self.general_health = raw.parse()?,
            Field::SmokerStatus => self.smoker_status = raw.parse()?,
            Field::ECigaretteUsage => self.e_cigarette_usage = raw.parse()?,
            Field::AlcoholDrinkers => self.alcohol_drinkers = parse_flag(field, raw)?,
            Field::HadDiabetes => self.had_diabetes = parse_flag(field, raw)?,
            Field::HadSkinCancer => self.had_skin_cancer = parse_flag(field, raw)?,
            Field::HadKidneyDisease => self.had_kidney_disease = parse_flag(field, raw)?,
            Field::HighRiskLastYear => self.high_risk_last_year = parse_flag(field, raw)?,
        }
        Ok(())
    }

    /// Display value of a field, formatted the way its control shows it.
    pub fn get(&self, field: Field) -> String {
        match field {
            Field::Height => format!("{:.2}", self.height),
            Field::Weight => format!("{:.1}", self.weight),
            Field::PhysicalHealthDays => self.physical_health_days.to_string(),
            Field::MentalHealthDays => self.mental_health_days.to_string(),
            Field::SleepHours => self.sleep_hours.to_string(),
            Field::Sex => self.sex.to_string(),
            Field::AgeCategory => self.age_category.to_string(),
            Field::RaceEthnicity => self.race_ethnicity.to_string(),
            Field::GeneralHealth => self.general_health.to_string(),
            Field::SmokerStatus => self.smoker_status.to_string(),
            Field::ECigaretteUsage => self.e_cigarette_usage.to_string(),
            Field::AlcoholDrinkers => yes_no(self.alcohol_drinkers),
            Field::HadDiabetes => yes_no(self.had_diabetes),
            Field::HadSkinCancer => yes_no(self.had_skin_cancer),
            Field::HadKidneyDisease => yes_no(self.had_kidney_disease),
            Field::HighRiskLastYear => yes_no(self.high_risk_last_year),
        }
    }

    /// Builds the wire payload. The service wants *poor* health days, so
    /// both day counts are sent as 30 minus the collected good days.
    pub fn to_request(&self) -> PredictionRequest {
        PredictionRequest {
            height_in_meters: self.height,
            weight_in_kilograms: self.weight,
            physical_health_days: poor_days(self.physical_health_days),
            mental_health_days: poor_days(self.mental_health_days),
            sleep_hours: self.sleep_hours,
            sex: self.sex.label().to_string(),
            age_category: self.age_category.label().to_string(),
            race_ethnicity_category: self.race_ethnicity.label().to_string(),
            general_health: self.general_health.label().to_string(),
            smoker_status: self.smoker_status.label().to_string(),
            e_cigarette_usage: self.e_cigarette_usage.label().to_string(),
            alcohol_drinkers: self.alcohol_drinkers,
            had_diabetes: self.had_diabetes,
            had_skin_cancer: self.had_skin_cancer,
            had_kidney_disease: self.had_kidney_disease,
            high_risk_last_year: self.high_risk_last_year,
        }
    }
}
