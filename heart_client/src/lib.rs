use log::{debug, error, info, warn};
use reqwest::Client;
use url::Url;

mod error;
mod payload;

pub use crate::error::TransportError;
pub use crate::payload::{PredictionRequest, PredictionResponse};

pub const DEFAULT_BASE_URL: &str = "https://heart-disease-predictor-latest.onrender.com/";
pub const PREDICT_ENDPOINT: &str = "predict";

// how much of a response body makes it into debug logs
const LOGGED_BODY_CHARS: usize = 1024;

/// Basic set of public functions required to use this client.
///
/// The session only ever talks to a `Predictor`, so anything that can
/// turn a request into a response (or a failure) can stand in for the
/// real service.
#[allow(async_fn_in_trait)]
pub trait Predictor {
    async fn predict(
        &mut self,
        request: &PredictionRequest,
    ) -> Result<PredictionResponse, TransportError>;
}

/// This struct submits health profiles to the remote prediction service.
///
/// One call to predict() is exactly one POST to `{base_url}/predict`: no
/// retries, and no timeout beyond what reqwest applies by default. The
/// raw body of the most recent response is kept around and can be read
/// back via get_last_resp_text().
pub struct PredictionClient {
    client: Client,
    base_url: Url,
    last_api_resp_url: String,
    last_api_resp_text: String,
}

impl PredictionClient {
    pub fn new(base_url: &str) -> Result<PredictionClient, TransportError> {
        let client = Client::builder().build()?;
        PredictionClient::with_client(client, base_url)
    }

    /// Same as new(), but reuses an already configured reqwest client.
    pub fn with_client(client: Client, base_url: &str) -> Result<PredictionClient, TransportError> {
        let mut base_url = Url::parse(base_url)?;
        // the base is a directory: "https://host/api" must become "https://host/api/"
        // or the join below would replace the last segment
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Ok(PredictionClient {
            client,
            base_url,
            last_api_resp_url: String::new(),
            last_api_resp_text: String::new(),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn build_api_url(&self, endpoint: &str) -> Result<Url, TransportError> {
        Ok(self.base_url.join(endpoint)?)
    }

    /// Returns the text of the last response body (empty before the first call).
    pub fn get_last_resp_text(&self) -> &str {
        &self.last_api_resp_text
    }

    /// Returns the final url of the last response, after redirects.
    pub fn get_last_resp_url(&self) -> &str {
        &self.last_api_resp_url
    }

    async fn post_predict(
        &mut self,
        request: &PredictionRequest,
    ) -> Result<PredictionResponse, TransportError> {
        let url = self.build_api_url(PREDICT_ENDPOINT)?;

        debug!("Prediction service requesting from: {}", &url);
        debug!("Prediction payload: {:?}", request);

        let response = self.client.post(url).json(request).send().await?;
        let status = response.status();

        self.last_api_resp_url = response.url().to_string();
        self.last_api_resp_text = response.text().await?;

        debug!(
            "Got api response: {}",
            self.last_api_resp_text
                .chars()
                .take(LOGGED_BODY_CHARS)
                .collect::<String>()
        );

        if !status.is_success() {
            warn!(
                "Prediction service at {} responded with {}",
                &self.last_api_resp_url, status
            );
            return Err(TransportError::Status {
                status: status.as_u16(),
                body: self.last_api_resp_text.clone(),
            });
        }

        let response: PredictionResponse = serde_json::from_str(&self.last_api_resp_text)?;
        info!("Got prediction: {}", response.prediction);
        Ok(response)
    }
}

impl Predictor for PredictionClient {
    async fn predict(
        &mut self,
        request: &PredictionRequest,
    ) -> Result<PredictionResponse, TransportError> {
        match self.post_predict(request).await {
            Ok(response) => Ok(response),
            Err(e) => {
                error!("Unable to obtain prediction: {}", e);
                Err(e)
            }
        }
    }
}
