//! Async accessors over the core's build/parse pairs.
//!
//! Every accessor runs the same loop: build the request, execute it through
//! the `Transport`, ask the `RetryPolicy` what to do on a failure, and
//! finally parse the response. Calls share nothing, so concurrent calls
//! each carry their own retry count.

use greentrade_core::{
    AnalyticsSummary, ApiError, ClientConfig, ConfigError, GreenTradeClient, HttpRequest, HttpResponse, NewProduct,
    NewSupplier, Product, ProductFilter, ProductUpdate, RetryDecision, RetryPolicy, Supplier,
};
use tracing::{debug, instrument, warn};

use crate::transport::{Transport, UreqTransport};

#[derive(Debug, Clone)]
pub struct ApiClient<T = UreqTransport> {
    core: GreenTradeClient,
    transport: T,
    retry: RetryPolicy,
}

impl ApiClient<UreqTransport> {
    pub fn new(config: &ClientConfig) -> Self {
        Self::with_transport(config, UreqTransport::new(config.timeout))
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self::new(&ClientConfig::from_env()?))
    }
}

impl<T: Transport> ApiClient<T> {
    pub fn with_transport(config: &ClientConfig, transport: T) -> Self {
        Self {
            core: GreenTradeClient::new(&config.base_url),
            transport,
            retry: config.retry,
        }
    }

    pub fn base_url(&self) -> &str {
        self.core.base_url()
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    #[instrument(skip(self))]
    pub async fn fetch_analytics_summary(&self) -> Result<AnalyticsSummary, ApiError> {
        let response = self.send(self.core.build_fetch_analytics_summary()).await?;
        self.core.parse_fetch_analytics_summary(response)
    }

    #[instrument(skip(self))]
    pub async fn list_suppliers(&self) -> Result<Vec<Supplier>, ApiError> {
        let response = self.send(self.core.build_list_suppliers()).await?;
        self.core.parse_list_suppliers(response)
    }

    #[instrument(skip(self))]
    pub async fn get_supplier(&self, id: i64) -> Result<Supplier, ApiError> {
        let response = self.send(self.core.build_get_supplier(id)).await?;
        self.core.parse_get_supplier(response)
    }

    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn create_supplier(&self, input: &NewSupplier) -> Result<Supplier, ApiError> {
        let request = self.core.build_create_supplier(input)?;
        let response = self.send(request).await?;
        self.core.parse_create_supplier(response)
    }

    #[instrument(skip(self))]
    pub async fn list_products(&self, filter: &ProductFilter) -> Result<Vec<Product>, ApiError> {
        let response = self.send(self.core.build_list_products(filter)).await?;
        self.core.parse_list_products(response)
    }

    #[instrument(skip(self, input), fields(supplier_id = input.supplier_id))]
    pub async fn create_product(&self, input: &NewProduct) -> Result<Product, ApiError> {
        let request = self.core.build_create_product(input)?;
        let response = self.send(request).await?;
        self.core.parse_create_product(response)
    }

    #[instrument(skip(self, input))]
    pub async fn update_product(&self, id: i64, input: &ProductUpdate) -> Result<Product, ApiError> {
        let request = self.core.build_update_product(id, input)?;
        let response = self.send(request).await?;
        self.core.parse_update_product(response)
    }

    #[instrument(skip(self))]
    pub async fn delete_product(&self, id: i64) -> Result<(), ApiError> {
        let response = self.send(self.core.build_delete_product(id)).await?;
        self.core.parse_delete_product(response)
    }

    /// Executes `request`, retrying transient failures per the policy.
    /// Returns the first response received, whatever its status.
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        let mut attempt = 1;
        loop {
            debug!(method = %request.method, url = %request.url, attempt, "sending request");
            let err = match self.transport.execute(request.clone()).await {
                Ok(response) => {
                    debug!(status = response.status, attempt, "response received");
                    return Ok(response);
                }
                Err(e) => ApiError::from(e),
            };
            match self.retry.decide(attempt, &err) {
                RetryDecision::RetryAfter(delay) => {
                    warn!(error = %err, attempt, ?delay, "transient failure, retrying");
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                RetryDecision::GiveUp => {
                    debug!(error = %err, attempt, "giving up");
                    return Err(err);
                }
            }
        }
    }
}
