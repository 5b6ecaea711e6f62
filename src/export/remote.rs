//! Full-dataset download.

use super::{Artifact, ALL_DATA_FILE_NAME, CSV_MIME};
use std::io::Read;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_ALL_DATA_URL: &str =
    "https://raw.githubusercontent.com/esnt/Data/main/Names/popular_names.csv";

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("{url} answered with HTTP status {status}")]
    Status { url: String, status: u16 },
    #[error("Could not reach {url}: {message}")]
    Transport { url: String, message: String },
    #[error("Failed reading response from {url}: {source}")]
    Body {
        url: String,
        #[source]
        source: std::io::Error,
    },
}

/// The complete raw dataset served from a fixed URL.
#[derive(Debug, Clone)]
pub struct RemoteDataset {
    url: String,
    timeout: Duration,
}

impl RemoteDataset {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            url: url.into(),
            timeout,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Blocking GET; the body is returned untouched.
    pub fn fetch(&self) -> Result<Vec<u8>, FetchError> {
        tracing::info!(url = %self.url, "fetching full dataset");

        let agent = ureq::AgentBuilder::new().timeout(self.timeout).build();
        let response = match agent.get(&self.url).call() {
            Ok(response) => response,
            Err(ureq::Error::Status(status, _)) => {
                tracing::warn!(url = %self.url, status, "full dataset request rejected");
                return Err(FetchError::Status {
                    url: self.url.clone(),
                    status,
                });
            }
            Err(ureq::Error::Transport(transport)) => {
                tracing::warn!(url = %self.url, error = %transport, "full dataset request failed");
                return Err(FetchError::Transport {
                    url: self.url.clone(),
                    message: transport.to_string(),
                });
            }
        };

        let mut bytes = Vec::new();
        response
            .into_reader()
            .read_to_end(&mut bytes)
            .map_err(|source| FetchError::Body {
                url: self.url.clone(),
                source,
            })?;

        tracing::info!(url = %self.url, bytes = bytes.len(), "full dataset fetched");
        Ok(bytes)
    }

    /// Fetch and wrap the body as the "Download All Name Data" artifact.
    pub fn fetch_artifact(&self) -> Result<Artifact, FetchError> {
        let bytes = self.fetch()?;
        Ok(Artifact::new(ALL_DATA_FILE_NAME, CSV_MIME, bytes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_url_is_transport_error() {
        let remote = RemoteDataset::new("not a url", Duration::from_secs(1));
        let err = remote.fetch().unwrap_err();

        match err {
            FetchError::Transport { url, .. } => assert_eq!(url, "not a url"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_refused_connection_is_reported() {
        // Port 9 (discard) is not expected to be listening.
        let remote = RemoteDataset::new("http://127.0.0.1:9/names.csv", Duration::from_secs(2));
        assert!(remote.fetch_artifact().is_err());
    }
}
