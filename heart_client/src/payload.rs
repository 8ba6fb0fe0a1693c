
use serde::{Deserialize, Serialize};

/// Body of a `POST /predict` request, keyed the way the prediction
/// service expects (PascalCase). Day counts here are *poor* days.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PredictionRequest {
    pub height_in_meters: f64,
    pub weight_in_kilograms: f64,
    pub physical_health_days: u32,
    pub mental_health_days: u32,
    pub sleep_hours: u32,
    pub sex: String,
    pub age_category: String,
    pub race_ethnicity_category: String,
    pub general_health: String,
    pub smoker_status: String,
    pub e_cigarette_usage: String,
    pub alcohol_drinkers: bool,
    pub had_diabetes: bool,
    pub had_skin_cancer: bool,
    pub had_kidney_disease: bool,
    pub high_risk_last_year: bool,
}

/// The only field of the service response this client relies on.
/// Anything else in the body is ignored.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PredictionResponse {
    #[serde(rename = "Prediction")]
    pub prediction: String,
}
