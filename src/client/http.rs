//! HTTP extraction of delimited text

use crate::dataset::Dataset;
use crate::error::{Error, Result};
use crate::etl::Extractor;
use crate::storage::parse_csv;
use reqwest::Client;
use std::time::Duration;
use url::Url;

/// Default bound on a single GET request
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(5);

/// Fetches a CSV document with a single GET request
///
/// # Example
/// ```no_run
/// use simple_pipeline::client::HttpCsvSource;
/// use std::time::Duration;
///
/// # async fn example() -> simple_pipeline::error::Result<()> {
/// let source = HttpCsvSource::try_new(
///     "https://example.com/us-counties.csv",
///     Duration::from_secs(5),
/// )?;
/// let dataset = source.fetch().await?;
/// println!("{} rows", dataset.row_count());
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct HttpCsvSource {
    client: Client,
    url: Url,
}

impl HttpCsvSource {
    /// Build a source for `url` whose requests give up after `timeout`
    ///
    /// # Errors
    /// Returns [`Error::Network`] if the URL is malformed or the client cannot be built
    pub fn try_new(url: &str, timeout: Duration) -> Result<Self> {
        let network_err = |reason: String| Error::Network {
            url: url.to_string(),
            reason,
        };
        let parsed = Url::parse(url).map_err(|e| network_err(format!("invalid URL: {e}")))?;
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| network_err(e.to_string()))?;
        Ok(Self {
            client,
            url: parsed,
        })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    /// GET the document, decode it as UTF-8 and parse it as CSV
    ///
    /// # Errors
    /// - [`Error::Network`] on connection failure, timeout or a non-2xx status
    /// - [`Error::Parse`] if the body is not UTF-8 or not well-formed CSV
    pub async fn fetch(&self) -> Result<Dataset> {
        let network_err = |reason: String| Error::Network {
            url: self.url.to_string(),
            reason,
        };

        log::debug!("GET {}", self.url);
        let response = self
            .client
            .get(self.url.clone())
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    network_err("request timed out".to_string())
                } else {
                    network_err(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(network_err(format!("unexpected status {status}")));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| network_err(e.to_string()))?;
        log::debug!("Received {} byte(s) from {}", body.len(), self.url);

        let text = std::str::from_utf8(&body).map_err(|e| Error::Parse {
            origin: self.url.to_string(),
            reason: format!("body is not valid UTF-8: {e}"),
        })?;
        parse_csv(text.as_bytes(), self.url.as_str())
    }
}

impl Extractor for HttpCsvSource {
    async fn extract(&self) -> Result<Dataset> {
        log::info!("Fetching CSV from {}", self.url);
        self.fetch().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Value;

    #[tokio::test]
    async fn test_fetch_csv() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/counties.csv")
            .with_status(200)
            .with_header("content-type", "text/csv")
            .with_body("fips,name\n1001,\"Autauga, AL\"\n")
            .create_async()
            .await;

        let source =
            HttpCsvSource::try_new(&format!("{}/counties.csv", server.url()), DEFAULT_HTTP_TIMEOUT)
                .unwrap();
        let dataset = source.fetch().await.unwrap();

        mock.assert_async().await;
        assert_eq!(dataset.row_count(), 1);
        assert_eq!(
            dataset.require("name").unwrap().values()[0],
            Value::from("Autauga, AL")
        );
    }

    #[tokio::test]
    async fn test_non_success_status_is_network_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/missing.csv")
            .with_status(404)
            .create_async()
            .await;

        let source =
            HttpCsvSource::try_new(&format!("{}/missing.csv", server.url()), DEFAULT_HTTP_TIMEOUT)
                .unwrap();
        let err = source.fetch().await.unwrap_err();
        assert!(matches!(err, Error::Network { ref reason, .. } if reason.contains("404")));
    }

    #[tokio::test]
    async fn test_invalid_utf8_is_parse_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/latin1.csv")
            .with_status(200)
            .with_body(b"name\n\xe9t\xe9\n".to_vec())
            .create_async()
            .await;

        let source =
            HttpCsvSource::try_new(&format!("{}/latin1.csv", server.url()), DEFAULT_HTTP_TIMEOUT)
                .unwrap();
        assert!(matches!(
            source.fetch().await,
            Err(Error::Parse { .. })
        ));
    }

    #[test]
    fn test_invalid_url() {
        let err = HttpCsvSource::try_new("not a url", DEFAULT_HTTP_TIMEOUT).unwrap_err();
        assert!(matches!(err, Error::Network { .. }));
    }
}
