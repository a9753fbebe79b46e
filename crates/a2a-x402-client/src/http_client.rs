use std::time::Duration;

use a2a_x402::{
    routes, AgentError, AgentIdentity, AnalyticsResponse, BalanceInfo, BulkTasksResponse,
    DepositInstructions, HealthStatus, PaymentRequiredBody, PremiumTaskResponse, PricingResponse,
    PurchaseAccessResponse, TaskList, UsdcAmount, WithdrawInstructions, AGENT_ADDRESS_HEADER,
    PAYMENT_REQUIRED_STATUS,
};
use reqwest::{Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::receipt::PaymentReceipt;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Result of a call to a payment-gated endpoint.
#[derive(Debug, Clone, PartialEq)]
pub enum PremiumOutcome<T> {
    /// The call was charged (or access was already held) and returned data.
    Granted {
        body: T,
        receipt: Option<PaymentReceipt>,
    },
    /// The server answered 402: balance or task access is insufficient.
    PaymentRequired(PaymentRequiredBody),
}

impl<T> PremiumOutcome<T> {
    pub fn is_payment_required(&self) -> bool {
        matches!(self, PremiumOutcome::PaymentRequired(_))
    }

    /// The response body, or `None` on 402.
    pub fn into_granted(self) -> Option<T> {
        match self {
            PremiumOutcome::Granted { body, .. } => Some(body),
            PremiumOutcome::PaymentRequired(_) => None,
        }
    }
}

#[derive(Serialize)]
struct AmountRequest {
    amount_usdc: UsdcAmount,
}

/// HTTP client for the A2A Marketplace API.
///
/// Every call is a single request: no retries and no caching. Premium
/// calls carry the agent's address in `X-Agent-Address` and come back as
/// [`PremiumOutcome`] so a 402 can be reported without being treated as a
/// failure. Any other non-success status surfaces as [`AgentError::ApiError`].
pub struct MarketplaceClient {
    http: reqwest::Client,
    base_url: String,
    identity: AgentIdentity,
}

impl MarketplaceClient {
    pub fn new(base_url: &str, identity: AgentIdentity) -> Result<Self, AgentError> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .map_err(|e| AgentError::HttpError(format!("failed to build HTTP client: {e}")))?;
        Self::with_http_client(base_url, identity, http)
    }

    /// Create a client with a custom reqwest::Client.
    pub fn with_http_client(
        base_url: &str,
        identity: AgentIdentity,
        http: reqwest::Client,
    ) -> Result<Self, AgentError> {
        url::Url::parse(base_url)
            .map_err(|e| AgentError::InvalidUrl(format!("{base_url}: {e}")))?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            identity,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Checksummed agent address.
    pub fn address(&self) -> String {
        self.identity.address_string()
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = self.url(path);
        tracing::debug!(%method, %url, "marketplace request");
        self.http.request(method, url)
    }

    /// Request carrying the identifying header.
    fn agent_request(&self, method: Method, path: &str) -> RequestBuilder {
        self.request(method, path)
            .header(AGENT_ADDRESS_HEADER, self.address())
    }

    async fn send(req: RequestBuilder) -> Result<Response, AgentError> {
        req.send()
            .await
            .map_err(|e| AgentError::HttpError(format!("request failed: {e}")))
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, AgentError> {
        let resp = Self::send(self.request(Method::GET, path)).await?;
        decode(resp).await
    }

    async fn post_json<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, AgentError> {
        let resp = Self::send(self.request(Method::POST, path).json(body)).await?;
        decode(resp).await
    }

    // --- Balance management ---

    pub async fn check_balance(&self) -> Result<BalanceInfo, AgentError> {
        self.get_json(&routes::balance(&self.address())).await
    }

    /// Ask the marketplace for the approve + deposit transactions that fund
    /// the prepaid balance. Nothing is submitted on-chain.
    pub async fn deposit_balance(
        &self,
        amount: UsdcAmount,
    ) -> Result<DepositInstructions, AgentError> {
        if amount.is_zero() {
            return Err(AgentError::InvalidAmount("deposit amount must be positive".to_string()));
        }

        let instructions: DepositInstructions = self
            .post_json(routes::DEPOSIT, &AmountRequest { amount_usdc: amount })
            .await?;

        if instructions.transactions.len() < 2 {
            return Err(AgentError::MalformedResponse(format!(
                "expected approve and deposit transactions, got {}",
                instructions.transactions.len()
            )));
        }

        Ok(instructions)
    }

    pub async fn withdraw_balance(
        &self,
        amount: UsdcAmount,
    ) -> Result<WithdrawInstructions, AgentError> {
        if amount.is_zero() {
            return Err(AgentError::InvalidAmount("withdraw amount must be positive".to_string()));
        }

        self.post_json(routes::WITHDRAW, &AmountRequest { amount_usdc: amount })
            .await
    }

    // --- Premium (charged) calls ---

    /// Call a payment-gated endpoint.
    ///
    /// `GET` sends no body; any other method sends `body` as JSON, or `{}`.
    pub async fn call_premium_api<T: DeserializeOwned>(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<&serde_json::Value>,
    ) -> Result<PremiumOutcome<T>, AgentError> {
        let mut req = self.agent_request(method.clone(), endpoint);
        if method != Method::GET {
            let empty = serde_json::Value::Object(serde_json::Map::new());
            req = req.json(body.unwrap_or(&empty));
        }

        let resp = Self::send(req).await?;

        if resp.status().as_u16() == PAYMENT_REQUIRED_STATUS {
            let text = resp
                .text()
                .await
                .map_err(|e| AgentError::HttpError(format!("failed to read 402 body: {e}")))?;
            let body = serde_json::from_str::<PaymentRequiredBody>(&text).unwrap_or_else(|e| {
                tracing::debug!(error = %e, "402 body is not the marketplace's JSON shape");
                PaymentRequiredBody {
                    message: Some(text),
                    ..Default::default()
                }
            });
            tracing::warn!(
                endpoint,
                required = body.required().unwrap_or("?"),
                "payment required"
            );
            return Ok(PremiumOutcome::PaymentRequired(body));
        }

        let receipt = PaymentReceipt::from_headers(resp.headers());
        if let Some(ref r) = receipt {
            tracing::debug!(
                endpoint,
                cost = r.call_cost_usdc.as_deref().unwrap_or("-"),
                remaining = r.remaining_balance_usdc.as_deref().unwrap_or("-"),
                "premium call charged"
            );
        }

        let body = decode(resp).await?;
        Ok(PremiumOutcome::Granted { body, receipt })
    }

    /// Full task details. Requires access purchased for this task.
    pub async fn view_premium_task(
        &self,
        task_id: u64,
    ) -> Result<PremiumOutcome<PremiumTaskResponse>, AgentError> {
        self.call_premium_api(Method::GET, &routes::premium_task(task_id), None)
            .await
    }

    /// Get the transaction that buys one-time access to a task.
    pub async fn purchase_task_access(
        &self,
        task_id: u64,
    ) -> Result<PurchaseAccessResponse, AgentError> {
        let req = self
            .agent_request(Method::POST, &routes::purchase_access(task_id))
            .json(&serde_json::json!({}));
        let resp = Self::send(req).await?;
        decode(resp).await
    }

    /// All tasks at once, charged per call.
    pub async fn get_bulk_tasks(&self) -> Result<PremiumOutcome<BulkTasksResponse>, AgentError> {
        self.call_premium_api(Method::GET, routes::BULK_TASKS, None)
            .await
    }

    /// Earnings and usage statistics for this agent, charged per call.
    pub async fn get_analytics(&self) -> Result<PremiumOutcome<AnalyticsResponse>, AgentError> {
        self.call_premium_api(Method::GET, &routes::analytics(&self.address()), None)
            .await
    }

    // --- Free calls ---

    pub async fn list_tasks(&self) -> Result<TaskList, AgentError> {
        self.get_json(routes::TASKS).await
    }

    pub async fn get_pricing(&self) -> Result<PricingResponse, AgentError> {
        self.get_json(routes::PRICING).await
    }

    pub async fn health(&self) -> Result<HealthStatus, AgentError> {
        self.get_json(routes::HEALTH).await
    }
}

/// Map non-success statuses to [`AgentError::ApiError`], then parse JSON.
async fn decode<T: DeserializeOwned>(resp: Response) -> Result<T, AgentError> {
    let status = resp.status();
    let text = resp
        .text()
        .await
        .map_err(|e| AgentError::HttpError(format!("failed to read response body: {e}")))?;

    if !status.is_success() {
        return Err(AgentError::ApiError {
            status: status.as_u16(),
            message: error_message(&text),
        });
    }

    Ok(serde_json::from_str(&text)?)
}

/// The marketplace reports failures as `{"error": "..."}`.
fn error_message(text: &str) -> String {
    serde_json::from_str::<serde_json::Value>(text)
        .ok()
        .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(str::to_string))
        .unwrap_or_else(|| text.to_string())
}
