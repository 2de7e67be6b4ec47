use async_trait::async_trait;
use gloo_net::http::Request;
use serde_json::Value;

use crate::error::TransportError;

#[async_trait(?Send)]
pub trait HttpTransport {
    async fn get_json(&self, endpoint: &str, query: &[(&str, &str)])
        -> Result<Value, TransportError>;
}

/// Browser `fetch` through `gloo-net`. No timeout or retry beyond what the
/// browser does.
#[derive(Debug, Clone, Copy, Default)]
pub struct GlooTransport;

#[async_trait(?Send)]
impl HttpTransport for GlooTransport {
    async fn get_json(
        &self,
        endpoint: &str,
        query: &[(&str, &str)],
    ) -> Result<Value, TransportError> {
        let resp = Request::get(endpoint)
            .query(query.iter().copied())
            .send()
            .await
            .map_err(|e| TransportError::Request(e.to_string()))?;

        if !resp.ok() {
            return Err(TransportError::Status(resp.status()));
        }

        resp.json::<Value>()
            .await
            .map_err(|e| TransportError::Decode(e.to_string()))
    }
}
