use std::sync::Arc;

use async_trait::async_trait;
use log::*;
use reqwest::{header::RETRY_AFTER, Client, Url};

use crate::{
    accrual::{classify_response, AccrualClientConfig, AccrualClientError, AccrualResult, AccrualService},
    db_types::OrderNumber,
};

#[derive(Clone)]
pub struct AccrualClient {
    base_url: Url,
    client: Arc<Client>,
}

impl std::fmt::Debug for AccrualClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "AccrualClient ({})", self.base_url)
    }
}

impl AccrualClient {
    pub fn new(config: AccrualClientConfig) -> Result<Self, AccrualClientError> {
        let mut address = config.address.trim().to_string();
        if !address.contains("://") {
            address = format!("http://{address}");
        }
        if !address.ends_with('/') {
            address.push('/');
        }
        let base_url = Url::parse(&address)
            .map_err(|e| AccrualClientError::Initialization(format!("{} is not a valid URL. {e}", config.address)))?;
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| AccrualClientError::Initialization(e.to_string()))?;
        info!("🌐️ Accrual client targeting {base_url} with a {}ms timeout", config.timeout.as_millis());
        Ok(Self { base_url, client: Arc::new(client) })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// The full URL of the status endpoint for `number`.
    pub fn order_url(&self, number: &OrderNumber) -> Result<Url, AccrualClientError> {
        if !number.is_well_formed() {
            return Err(AccrualClientError::InvalidRequest(format!("{number} is not a valid order number")));
        }
        self.base_url
            .join(&format!("api/orders/{}", number.as_str()))
            .map_err(|e| AccrualClientError::InvalidRequest(e.to_string()))
    }
}

#[async_trait]
impl AccrualService for AccrualClient {
    async fn query(&self, number: &OrderNumber) -> Result<AccrualResult, AccrualClientError> {
        let url = self.order_url(number)?;
        trace!("🌐️ Querying {url}");
        let response = match self.client.get(url).send().await {
            Ok(r) => r,
            Err(e) => {
                debug!("🌐️ Accrual query for {number} failed. {e}");
                return Ok(AccrualResult::Unavailable(e.to_string()));
            },
        };
        let status = response.status().as_u16();
        let retry_after = response.headers().get(RETRY_AFTER).and_then(|v| v.to_str().ok()).map(String::from);
        let body = match response.bytes().await {
            Ok(b) => b,
            Err(e) => {
                debug!("🌐️ Could not read the accrual response for {number}. {e}");
                return Ok(AccrualResult::Unavailable(e.to_string()));
            },
        };
        let result = classify_response(status, retry_after.as_deref(), &body);
        trace!("🌐️ Accrual service replied {status} for {number}: {result:?}");
        Ok(result)
    }
}
