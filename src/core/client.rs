use crate::core::{ConfigProvider, Series};
use crate::utils::error::{EtlError, Result};
use reqwest::Client;

/// Posts the market form once and decodes the series list.
pub struct MarketClient {
    client: Client,
}

impl MarketClient {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
        }
    }

    pub async fn fetch<C: ConfigProvider>(&self, config: &C) -> Result<Vec<Series>> {
        let endpoint = config.endpoint();
        let mut request = self.client.post(endpoint);

        for (key, value) in config.headers() {
            request = request.header(key, value);
        }

        if let Some(timeout) = config.timeout() {
            request = request.timeout(timeout);
        }

        tracing::debug!("POST {} with payload {:?}", endpoint, config.payload());

        let response = request.form(config.payload()).send().await?;
        let status = response.status();
        tracing::debug!("API response status: {}", status);

        if !status.is_success() {
            tracing::error!("Failed to retrieve content, status code: {}", status.as_u16());
            return Err(EtlError::ApiStatusError {
                status: status.as_u16(),
                endpoint: endpoint.to_string(),
            });
        }

        // 先取原始內容，方便在 debug 日誌看到完整回應
        let body = response.text().await?;
        tracing::debug!("Response from server: {}", body);

        let series: Vec<Series> = serde_json::from_str(&body)?;
        Ok(series)
    }
}

impl Default for MarketClient {
    fn default() -> Self {
        Self::new()
    }
}
