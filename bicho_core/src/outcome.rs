use std::future::Future;

use bicho_shared::{ApiError, SpinRequest, SpinResponse};

#[derive(thiserror::Error, Debug)]
pub enum OutcomeError {
    #[error("outcome request failed: {0}")]
    Transport(String),
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// The remote server that decides every spin.
pub trait OutcomeSource {
    /// One attempt per call; callers never retry.
    fn request_outcome(&self, bet: f64) -> impl Future<Output = Result<SpinResponse, OutcomeError>>;
}

/// Posts `{"bet": ..}` to the game endpoint.
#[cfg(feature = "http")]
#[derive(Clone)]
pub struct HttpOutcomeSource {
    client: reqwest::Client,
    endpoint: String,
}

#[cfg(feature = "http")]
impl HttpOutcomeSource {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[cfg(feature = "http")]
impl From<reqwest::Error> for OutcomeError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            OutcomeError::Api(ApiError::Invalid(err.to_string()))
        } else {
            OutcomeError::Transport(err.to_string())
        }
    }
}

#[cfg(feature = "http")]
impl OutcomeSource for HttpOutcomeSource {
    async fn request_outcome(&self, bet: f64) -> Result<SpinResponse, OutcomeError> {
        let resp = self
            .client
            .post(&self.endpoint)
            .json(&SpinRequest { bet })
            .send()
            .await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(ApiError::Status(status.as_u16()).into());
        }
        Ok(resp.json::<SpinResponse>().await?)
    }
}
