//! Remote reachability check for URI assets
//!
//! Images are fetched in full with GET; everything else only needs a HEAD.
//! Redirects are followed and only a final 200 counts as reachable.

use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

/// HTTP method used for the check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeMethod {
    Get,
    Head,
}

/// Reports the final HTTP status of a remote resource
#[async_trait]
pub trait RemoteProbe: Send + Sync {
    /// Final status code after redirects, or a transport error message
    async fn status(&self, uri: &str, method: ProbeMethod) -> Result<u16, String>;
}

/// reqwest-backed probe used by the running server
#[derive(Debug, Clone)]
pub struct HttpProbe {
    client: reqwest::Client,
}

impl HttpProbe {
    /// Build a probe; `timeout` of `None` keeps reqwest's default (no timeout)
    pub fn new(timeout: Option<Duration>) -> Result<Self, reqwest::Error> {
        let mut builder = reqwest::Client::builder()
            .user_agent(concat!("signage-server/", env!("CARGO_PKG_VERSION")));
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
        })
    }
}

#[async_trait]
impl RemoteProbe for HttpProbe {
    async fn status(&self, uri: &str, method: ProbeMethod) -> Result<u16, String> {
        let request = match method {
            ProbeMethod::Get => self.client.get(uri),
            ProbeMethod::Head => self.client.head(uri),
        };

        let response = request.send().await.map_err(|e| e.to_string())?;
        let status = response.status().as_u16();
        debug!("Probe {:?} {} -> {} (final url {})", method, uri, status, response.url());

        if method == ProbeMethod::Get {
            // Read the body so the image is known to be retrievable in full
            response.bytes().await.map_err(|e| e.to_string())?;
        }

        Ok(status)
    }
}
