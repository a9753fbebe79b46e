use a2a_x402::{
    AgentError, AgentIdentity, AnalyticsResponse, BalanceInfo, BulkTasksResponse,
    DepositInstructions, HealthStatus, PremiumTaskResponse, PricingResponse,
    PurchaseAccessResponse, TaskList, UsdcAmount, WithdrawInstructions,
};
use reqwest::Method;
use serde::de::DeserializeOwned;

use crate::http_client::{MarketplaceClient, PremiumOutcome};
use crate::report;

/// Demo agent: runs marketplace calls and prints the results.
///
/// Premium calls return `Ok(None)` after printing the 402 notice when the
/// prepaid balance (or task access) is insufficient.
pub struct X402Agent {
    client: MarketplaceClient,
}

impl X402Agent {
    pub fn new(api_url: &str, identity: AgentIdentity) -> Result<Self, AgentError> {
        let client = MarketplaceClient::new(api_url, identity)?;
        Ok(Self::from_client(client))
    }

    pub fn from_client(client: MarketplaceClient) -> Self {
        println!("{}", report::agent_initialized(&client.address()));
        Self { client }
    }

    pub fn address(&self) -> String {
        self.client.address()
    }

    // --- Balance management ---

    pub async fn check_balance(&self) -> Result<BalanceInfo, AgentError> {
        let data = self.client.check_balance().await?;
        println!("{}", report::balance(&data));
        Ok(data)
    }

    pub async fn deposit_balance(
        &self,
        amount: UsdcAmount,
    ) -> Result<DepositInstructions, AgentError> {
        let data = self.client.deposit_balance(amount).await?;
        println!("{}", report::deposit(&amount.to_string(), &data));
        Ok(data)
    }

    pub async fn withdraw_balance(
        &self,
        amount: UsdcAmount,
    ) -> Result<WithdrawInstructions, AgentError> {
        let data = self.client.withdraw_balance(amount).await?;
        println!("{}", report::withdraw(&data));
        Ok(data)
    }

    // --- Premium calls ---

    /// Call any premium endpoint; prints the 402 notice and returns `None`
    /// when payment is required.
    pub async fn call_premium_api<T: DeserializeOwned>(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<&serde_json::Value>,
    ) -> Result<Option<T>, AgentError> {
        let outcome = self.client.call_premium_api(method, endpoint, body).await?;
        Ok(self.granted_or_report(outcome))
    }

    fn granted_or_report<T>(&self, outcome: PremiumOutcome<T>) -> Option<T> {
        match outcome {
            PremiumOutcome::Granted { body, receipt } => {
                if let Some(ref receipt) = receipt {
                    println!("{}", report::receipt(receipt));
                }
                Some(body)
            }
            PremiumOutcome::PaymentRequired(required) => {
                println!("{}", report::payment_required(&required));
                None
            }
        }
    }

    pub async fn view_premium_task(
        &self,
        task_id: u64,
    ) -> Result<Option<PremiumTaskResponse>, AgentError> {
        println!("{}", report::premium_task_header(task_id));
        let outcome = self.client.view_premium_task(task_id).await?;
        let result = self.granted_or_report(outcome);
        if let Some(ref task) = result {
            println!("{}", report::premium_task(task));
        }
        Ok(result)
    }

    pub async fn purchase_task_access(
        &self,
        task_id: u64,
    ) -> Result<PurchaseAccessResponse, AgentError> {
        println!("{}", report::purchase_header(task_id));
        let data = self.client.purchase_task_access(task_id).await?;
        println!("{}", report::purchase_access(&data));
        Ok(data)
    }

    pub async fn get_bulk_tasks(&self) -> Result<Option<BulkTasksResponse>, AgentError> {
        println!("{}", report::bulk_header());
        let outcome = self.client.get_bulk_tasks().await?;
        let result = self.granted_or_report(outcome);
        if let Some(ref bulk) = result {
            println!("{}", report::bulk_tasks(bulk));
        }
        Ok(result)
    }

    pub async fn get_analytics(&self) -> Result<Option<AnalyticsResponse>, AgentError> {
        println!("{}", report::analytics_header());
        let outcome = self.client.get_analytics().await?;
        let result = self.granted_or_report(outcome);
        if let Some(ref analytics) = result {
            println!("{}", report::analytics(analytics));
        }
        Ok(result)
    }

    // --- Free calls ---

    pub async fn list_tasks(&self) -> Result<TaskList, AgentError> {
        let data = self.client.list_tasks().await?;
        println!("{}", report::task_list(&data));
        Ok(data)
    }

    pub async fn get_pricing(&self) -> Result<PricingResponse, AgentError> {
        let data = self.client.get_pricing().await?;
        println!("{}", report::pricing(&data));
        Ok(data)
    }

    pub async fn health(&self) -> Result<HealthStatus, AgentError> {
        let data = self.client.health().await?;
        println!("{}", report::health(&data));
        Ok(data)
    }
}
