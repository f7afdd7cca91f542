//! HTTP transport with streaming, content-encoding-aware decompression.
//!
//! Requests advertise `Accept-Encoding: gzip, deflate` and the response body
//! is decoded according to the encoding the server actually declared, so the
//! bytes that reach disk are always the original file contents. Manifest
//! fetches buffer the whole body; file fetches stream straight to disk to
//! bound memory on large binary assets.
//!
//! This layer performs no retries. Trying the next candidate remote is the
//! installer's decision, not the transport's.

use std::collections::HashMap;
use std::path::Path;

use async_compression::tokio::bufread::{GzipDecoder, ZlibDecoder};
use bytes::Bytes;
use futures::TryStreamExt;
use reqwest::header;
use thiserror::Error;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio_util::io::StreamReader;

/// Errors surfaced by a single HTTP operation.
#[derive(Error, Debug)]
pub enum TransportError {
    /// Network-level failure: DNS, connection reset, malformed proxy URL.
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("HTTP {status} from {url}")]
    Status {
        /// Requested URL.
        url: String,
        /// The response status code.
        status: reqwest::StatusCode,
    },

    /// Reading, decoding, or writing the body failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl TransportError {
    /// Whether this failure is in the client error range (400-499), the one
    /// class of failure the installer recovers from by advancing to the
    /// next candidate remote.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::Status { status, .. } if status.is_client_error())
    }
}

/// Opaque per-host credentials attached to outgoing requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BasicAuth {
    /// Login name.
    pub username: String,
    /// Password or token.
    pub password: String,
}

/// Declared content encoding of a response body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Encoding {
    Gzip,
    Deflate,
    Identity,
}

fn content_encoding(response: &reqwest::Response) -> Encoding {
    match response
        .headers()
        .get(header::CONTENT_ENCODING)
        .and_then(|value| value.to_str().ok())
    {
        Some(value) if value.eq_ignore_ascii_case("gzip") => Encoding::Gzip,
        Some(value) if value.eq_ignore_ascii_case("deflate") => Encoding::Deflate,
        _ => Encoding::Identity,
    }
}

/// A shared HTTP client for one install request tree.
#[derive(Debug)]
pub struct Transport {
    client: reqwest::Client,
    auth: HashMap<String, BasicAuth>,
}

impl Transport {
    /// Build a transport, optionally routing every request through `proxy`.
    ///
    /// No timeout is imposed here; the network stack's defaults apply.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Http`] when the proxy URL is malformed or
    /// the underlying client cannot be constructed.
    pub fn new(
        proxy: Option<&str>,
        auth: HashMap<String, BasicAuth>,
    ) -> Result<Self, TransportError> {
        let mut builder = reqwest::Client::builder().user_agent(crate::USER_AGENT);
        if let Some(proxy) = proxy {
            builder = builder.proxy(reqwest::Proxy::all(proxy)?);
        }
        Ok(Self {
            client: builder.build()?,
            auth,
        })
    }

    fn request(&self, url: &str) -> reqwest::RequestBuilder {
        let mut request = self
            .client
            .get(url)
            .header(header::ACCEPT_ENCODING, "gzip, deflate");
        if let Some(credentials) = self.credentials_for(url) {
            request = request.basic_auth(&credentials.username, Some(&credentials.password));
        }
        request
    }

    fn credentials_for(&self, url: &str) -> Option<&BasicAuth> {
        let parsed = reqwest::Url::parse(url).ok()?;
        self.auth.get(parsed.host_str()?)
    }

    /// Fetch `url` and return the decoded body as text.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Status`] on a non-success response, or
    /// [`TransportError::Io`] when the body is not valid UTF-8 after
    /// decoding.
    pub async fn get_text(&self, url: &str) -> Result<String, TransportError> {
        let response = self.request(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status {
                url: url.to_string(),
                status,
            });
        }

        let encoding = content_encoding(&response);
        let body = response.bytes().await?;
        let decoded = decode(encoding, &body).await?;
        String::from_utf8(decoded)
            .map_err(|err| std::io::Error::new(std::io::ErrorKind::InvalidData, err).into())
    }

    /// Stream `url` to `dest`, decoding on the fly, without buffering the
    /// whole body in memory.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Status`] on a non-success response, or
    /// [`TransportError::Io`] when writing the destination file fails.
    pub async fn download(&self, url: &str, dest: &Path) -> Result<(), TransportError> {
        let response = self.request(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status {
                url: url.to_string(),
                status,
            });
        }

        let encoding = content_encoding(&response);
        let stream = response.bytes_stream().map_err(std::io::Error::other);
        let reader = StreamReader::new(stream);
        let mut file = tokio::fs::File::create(dest).await?;

        match encoding {
            Encoding::Gzip => {
                let mut decoder = GzipDecoder::new(reader);
                tokio::io::copy(&mut decoder, &mut file).await?;
            }
            Encoding::Deflate => {
                let mut decoder = ZlibDecoder::new(reader);
                tokio::io::copy(&mut decoder, &mut file).await?;
            }
            Encoding::Identity => {
                let mut plain = reader;
                tokio::io::copy(&mut plain, &mut file).await?;
            }
        }

        file.flush().await?;
        Ok(())
    }
}

async fn decode(encoding: Encoding, body: &Bytes) -> std::io::Result<Vec<u8>> {
    let mut decoded = Vec::new();
    match encoding {
        Encoding::Gzip => {
            let mut decoder = GzipDecoder::new(&body[..]);
            decoder.read_to_end(&mut decoded).await?;
        }
        Encoding::Deflate => {
            let mut decoder = ZlibDecoder::new(&body[..]);
            decoder.read_to_end(&mut decoded).await?;
        }
        Encoding::Identity => decoded.extend_from_slice(body),
    }
    Ok(decoded)
}
