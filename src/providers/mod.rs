mod completion;
mod movie_db;

pub use completion::*;
pub use movie_db::*;

use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;

pub const MOVIE_DB: &str = "movie db";
pub const COMPLETION: &str = "completion provider";

#[derive(thiserror::Error, Debug)]
pub enum ProviderError {
    #[error("request to {provider} failed: {source}")]
    Request {
        provider: &'static str,
        #[source]
        source: reqwest::Error,
    },
    #[error("{provider} answered {status}: {detail}")]
    Status {
        provider: &'static str,
        status: StatusCode,
        detail: String,
    },
    #[error("{provider} sent a body that could not be decoded: {source}")]
    Decode {
        provider: &'static str,
        #[source]
        source: reqwest::Error,
    },
    #[error("{provider} returned no completion text")]
    EmptyCompletion { provider: &'static str },
}

/// Decodes a successful response body, or turns a non-2xx answer into
/// `ProviderError::Status` carrying whatever message the provider sent.
async fn read_json<T: DeserializeOwned>(
    provider: &'static str,
    response: Response,
    error_detail: fn(&serde_json::Value) -> Option<String>,
) -> Result<T, ProviderError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        let detail = serde_json::from_str::<serde_json::Value>(&body)
            .ok()
            .as_ref()
            .and_then(error_detail)
            .unwrap_or(body);
        return Err(ProviderError::Status {
            provider,
            status,
            detail,
        });
    }
    response
        .json::<T>()
        .await
        .map_err(|source| ProviderError::Decode { provider, source })
}

/// A zero timeout means "not set", reqwest defaults then apply.
fn request_timeout(timeout_seconds: Option<u64>) -> Option<Duration> {
    timeout_seconds
        .filter(|seconds| *seconds > 0)
        .map(Duration::from_secs)
}

fn build_http_client(timeout_seconds: Option<u64>) -> Result<reqwest::Client, reqwest::Error> {
    let mut builder = reqwest::Client::builder();
    if let Some(timeout) = request_timeout(timeout_seconds) {
        builder = builder.timeout(timeout);
    }
    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_timeout_is_treated_as_unset() {
        assert_eq!(request_timeout(Some(0)), None);
        assert_eq!(request_timeout(None), None);
        assert_eq!(request_timeout(Some(7)), Some(Duration::from_secs(7)));
    }
}
