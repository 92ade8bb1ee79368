//! Minimal HTTP transport used by the URL-backed providers.

use crate::Error;
use futures_util::{Stream, StreamExt};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Client;
use serde::Serialize;
use std::collections::BTreeMap;
use std::pin::Pin;
use std::time::Duration;

/// Raw body fragments of a streaming response.
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<bytes::Bytes, reqwest::Error>> + Send>>;

/// Posts JSON bodies, either reading one decoded JSON reply or handing back the
/// raw response body as a byte stream.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    headers: HeaderMap,
}

impl HttpTransport {
    /// Create a transport sending `headers` with every request.
    ///
    /// The timeout, if any, covers the whole exchange including body streaming.
    pub fn new(headers: &BTreeMap<String, String>, timeout: Option<Duration>) -> Result<Self, Error> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        Ok(Self {
            client,
            headers: Self::header_map(headers)?,
        })
    }

    fn header_map(headers: &BTreeMap<String, String>) -> Result<HeaderMap, Error> {
        let mut map = HeaderMap::new();
        for (name, value) in headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| Error::config(format!("Invalid header name '{name}': {e}")))?;
            let value = HeaderValue::from_str(value)
                .map_err(|e| Error::config(format!("Invalid value for header '{name}': {e}")))?;
            map.insert(name, value);
        }
        Ok(map)
    }

    async fn send<B: Serialize + ?Sized>(&self, url: &str, body: &B) -> Result<reqwest::Response, Error> {
        let response = self
            .client
            .post(url)
            .headers(self.headers.clone())
            .json(body)
            .send()
            .await
            .map_err(|e| Error::from_transport(url, e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
                body,
            });
        }

        Ok(response)
    }

    /// POST `body` to `url` and decode the JSON reply.
    pub async fn post_json<B: Serialize + ?Sized>(
        &self,
        url: &str,
        body: &B,
    ) -> Result<serde_json::Value, Error> {
        let response = self.send(url, body).await?;
        let bytes = response
            .bytes()
            .await
            .map_err(|e| Error::from_transport(url, e))?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// POST `body` to `url` and return the response body as raw fragments.
    ///
    /// Connection and status failures are reported here; read failures arrive
    /// later as `Err` items of the stream.
    pub async fn post_stream<B: Serialize + ?Sized>(
        &self,
        url: &str,
        body: &B,
    ) -> Result<ByteStream, Error> {
        let response = self.send(url, body).await?;
        Ok(response.bytes_stream().boxed())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_invalid_header() {
        let mut headers = BTreeMap::new();
        headers.insert("bad header".to_string(), "v".to_string());

        let err = HttpTransport::new(&headers, None).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_accepts_empty_headers() {
        assert!(HttpTransport::new(&BTreeMap::new(), Some(Duration::from_secs(5))).is_ok());
    }
}
