use std::time::Duration;

use crate::app::ports::HttpClientPort;
use crate::error::Result;
use async_trait::async_trait;

/// HEAD probes over reqwest; redirects are followed like a browser would
pub struct ReqwestHttp {
    client: reqwest::Client,
}

impl ReqwestHttp {
    pub fn new(timeout: Option<Duration>) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
        })
    }
}

#[async_trait]
impl HttpClientPort for ReqwestHttp {
    async fn head(&self, url: &str) -> std::result::Result<u16, String> {
        let resp = self.client.head(url).send().await.map_err(|e| e.to_string())?;
        Ok(resp.status().as_u16())
    }
}
