use heart_client::Predictor;
use log::{debug, error, info};

use crate::profile::{Field, HealthProfile, ProfileError};
use crate::render::render;
use crate::ui::Ui;

pub const CONNECTION_ERROR_PREFIX: &str = "Error connecting to the prediction server";

/// Result of the most recent submit. Only shown until the next interaction.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Success { prediction: String },
    Failure { message: String },
}

/// Form state for one user. Starts at the defaults; randomize() replaces
/// every field at once and that draw stays in place until edited, edit()
/// changes one field on top of it.
#[derive(Debug, Clone, Default)]
pub struct Session {
    profile: HealthProfile,
    outcome: Option<Outcome>,
}

impl Session {
    pub fn new() -> Session {
        Default::default()
    }

    pub fn profile(&self) -> &HealthProfile {
        &self.profile
    }

    pub fn outcome(&self) -> Option<&Outcome> {
        self.outcome.as_ref()
    }

    pub fn randomize(&mut self) -> &HealthProfile {
        self.profile = HealthProfile::randomize().clamped();
        info!("Randomized inputs: {:?}", &self.profile);
        self.outcome = None;
        &self.profile
    }

    pub fn edit(&mut self, field: Field, raw: &str) -> Result<(), ProfileError> {
        self.profile.set(field, raw)?;
        debug!("Set {} to {}", field, self.profile.get(field));
        self.outcome = None;
        Ok(())
    }

    /// Back to the form defaults, dropping any outcome.
    pub fn reset(&mut self) {
        *self = Session::new();
    }

    /// Sends the current profile once and keeps whatever came back. Any
    /// failure is collapsed into a single message.
    pub async fn submit<P: Predictor>(&mut self, predictor: &mut P) -> &Outcome {
        let request = self.profile.to_request();
        let outcome = match predictor.predict(&request).await {
            Ok(response) => {
                info!("Prediction for current profile: {}", response.prediction);
                Outcome::Success {
                    prediction: response.prediction,
                }
            }
            Err(e) => {
                error!("Prediction request failed: {}", e);
                Outcome::Failure {
                    message: format!("{}: {}", CONNECTION_ERROR_PREFIX, e),
                }
            }
        };
        self.outcome.insert(outcome)
    }

    pub fn view(&self) -> Ui {
        render(self)
    }
}
