
use config::{Config, ConfigError};
use log::{debug, info};
use thiserror::Error;

use heart_client::{PredictionClient, TransportError};

mod heart_config;
pub mod metrics;
pub mod profile;
pub mod render;
pub mod session;
pub mod ui;

pub use crate::heart_config::{DisplayConfig, HeartConfig, ServiceConfig};
pub use crate::profile::{Field, HealthProfile, ProfileError};
pub use crate::render::render;
pub use crate::session::{Outcome, Session};
pub use crate::ui::Ui;

#[derive(Debug, Error)]
pub enum ManagerError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Transport(#[from] TransportError),
}

/// Ties a form session to the prediction service it submits to.
///
/// This struct is intended to be provided a Config item shaped like
/// heart_config.rs (see ../config/heart_config.json for an example). It
/// owns one Session and one PredictionClient; every interaction goes
/// through the session and view() always reflects the latest state.
pub struct PredictionManager {
    client: PredictionClient,
    session: Session,
    heart_config: HeartConfig,
}

impl PredictionManager {
    pub fn new(config: Config) -> Result<PredictionManager, ManagerError> {
        PredictionManager::from_heart_config(config.try_deserialize()?)
    }

    pub fn from_heart_config(heart_config: HeartConfig) -> Result<PredictionManager, ManagerError> {
        let client = PredictionClient::new(&heart_config.service.base_url)?;
        info!("Using prediction service at {}", client.base_url());
        Ok(PredictionManager {
            client,
            session: Session::new(),
            heart_config,
        })
    }

    pub fn config(&self) -> &HeartConfig {
        &self.heart_config
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn randomize(&mut self) -> &HealthProfile {
        self.session.randomize()
    }

    pub fn edit(&mut self, field: Field, raw: &str) -> Result<(), ProfileError> {
        self.session.edit(field, raw)
    }

    /// Parses a `field=value` pair, as given on the command line.
    pub fn edit_assignment(&mut self, assignment: &str) -> Result<(), ProfileError> {
        let (name, value) = assignment
            .split_once('=')
            .ok_or_else(|| ProfileError::UnknownField(String::from(assignment)))?;
        let field: Field = name.parse()?;
        self.edit(field, value)
    }

    pub fn reset(&mut self) {
        debug!("Resetting session to defaults");
        self.session.reset();
    }

    /// Submits the current profile. One call, one request.
    pub async fn predict(&mut self) -> &Outcome {
        self.session.submit(&mut self.client).await
    }

    pub fn view(&self) -> Ui {
        self.session.view()
    }

    /// Raw body of the last service response, for troubleshooting.
    pub fn get_last_resp_text(&self) -> &str {
        self.client.get_last_resp_text()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manager() -> PredictionManager {
        let config = Config::builder()
            .set_override("service.base_url", "http://127.0.0.1:9/")
            .unwrap()
            .build()
            .unwrap();
        PredictionManager::new(config).unwrap()
    }

    #[test]
    fn builds_from_config() {
        let manager = manager();
        assert_eq!(manager.config().service.base_url, "http://127.0.0.1:9/");
        assert!(manager.session().outcome().is_none());
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        let heart_config = HeartConfig {
            service: ServiceConfig {
                base_url: String::from("::not-a-url"),
            },
            ..Default::default()
        };
        assert!(matches!(
            PredictionManager::from_heart_config(heart_config),
            Err(ManagerError::Transport(TransportError::Url(_)))
        ));
    }

    #[test]
    fn edit_assignment_splits_on_equals() {
        let mut manager = manager();
        manager.edit_assignment("sleep_hours=10").unwrap();
        manager.edit_assignment("race_ethnicity=Other").unwrap();
        assert_eq!(manager.session().profile().sleep_hours, 10);
        assert_eq!(
            manager.session().profile().race_ethnicity,
            profile::RaceEthnicity::Other
        );
        assert!(manager.edit_assignment("sleep_hours").is_err());
        assert!(manager.edit_assignment("shoe_size=44").is_err());
    }

    #[test]
    fn reset_after_randomize() {
        let mut manager = manager();
        manager.randomize();
        manager.reset();
        assert_eq!(manager.session().profile(), &HealthProfile::default());
    }
}
