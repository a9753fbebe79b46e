//! Text rendering of marketplace responses for the demo agent.

use std::fmt::Write;

use a2a_x402::{
    AnalyticsResponse, BalanceInfo, BulkTasksResponse, DepositInstructions, HealthStatus,
    PaymentRequiredBody, PremiumTaskResponse, PricingResponse, PurchaseAccessResponse, TaskList,
    WithdrawInstructions,
};

use crate::receipt::PaymentReceipt;

/// Transaction calldata is cut to the selector plus the first argument.
const CALLDATA_PREVIEW_CHARS: usize = 66;
const DESCRIPTION_PREVIEW_CHARS: usize = 50;
/// Bulk listings only show the first few tasks.
const BULK_PREVIEW_TASKS: usize = 3;

/// First `max` characters of `s`, on a char boundary.
pub fn truncate_chars(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

pub fn agent_initialized(address: &str) -> String {
    format!("🤖 Agent initialized: {address}")
}

pub fn balance(info: &BalanceInfo) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "\n💰 Balance Info:");
    let _ = writeln!(out, "   X402 Balance: {} USDC", info.x402_balance_usdc);
    let _ = writeln!(out, "   Wallet USDC: {} USDC", info.wallet_usdc);
    let _ = write!(out, "   Total API Calls: {}", info.total_api_calls);
    out
}

pub fn deposit(amount: &str, data: &DepositInstructions) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "\n📥 Deposit Instructions:");
    let _ = writeln!(out, "   Amount: {amount} USDC");
    if let Some(tx) = data.approval() {
        let _ = writeln!(out, "\n   Step 1: Approve USDC");
        let _ = writeln!(out, "   To: {}", tx.to);
        let _ = writeln!(out, "   Data: {}...", truncate_chars(&tx.data, CALLDATA_PREVIEW_CHARS));
    }
    if let Some(tx) = data.deposit() {
        let _ = writeln!(out, "\n   Step 2: Deposit Balance");
        let _ = writeln!(out, "   To: {}", tx.to);
        let _ = writeln!(out, "   Data: {}...", truncate_chars(&tx.data, CALLDATA_PREVIEW_CHARS));
    }
    out.trim_end().to_string()
}

pub fn withdraw(data: &WithdrawInstructions) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "\n📤 Withdraw Instructions:");
    let _ = writeln!(out, "   Amount: {} USDC", data.amount_usdc);
    let _ = writeln!(out, "   Contract: {}", data.contract);
    let _ = write!(out, "   Call: {}({})", data.function, data.params.join(", "));
    out
}

pub fn payment_required(body: &PaymentRequiredBody) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "\n⚠️  402 Payment Required");
    if let Some(required) = body.required() {
        let _ = writeln!(out, "   Required: {required} USDC");
    }
    if let Some(ref current) = body.current_balance_usdc {
        let _ = writeln!(out, "   Current Balance: {current} USDC");
    }
    if let Some(ref deficit) = body.deficit_usdc {
        let _ = writeln!(out, "   Deficit: {deficit} USDC");
    }
    if body.required().is_none() {
        if let Some(ref message) = body.message {
            let _ = writeln!(out, "   {message}");
        }
    }
    if body.is_task_access() {
        let endpoint = body.purchase_endpoint.as_deref().unwrap_or("purchase-access");
        let _ = write!(out, "\n   💡 Purchase task access via {endpoint}");
    } else {
        let _ = write!(out, "\n   💡 Deposit more USDC to access this endpoint");
    }
    out
}

/// One line summarizing what a premium call was charged.
pub fn receipt(receipt: &PaymentReceipt) -> String {
    let mut out = format!("   🧾 Receipt ({})", receipt.protocol);
    if let Some(ref cost) = receipt.call_cost_usdc {
        let _ = write!(out, " - cost: {cost} USDC");
    }
    if let Some(ref remaining) = receipt
        .remaining_balance_usdc
        .as_ref()
        .or(receipt.agent_balance_usdc.as_ref())
    {
        let _ = write!(out, " - balance: {remaining} USDC");
    }
    out
}

pub fn premium_task_header(task_id: u64) -> String {
    format!("\n🔍 Accessing Premium Task #{task_id}...")
}

pub fn premium_task(result: &PremiumTaskResponse) -> String {
    let task = &result.task;
    let mut out = String::new();
    let _ = writeln!(out, "\n✅ Premium Task Details:");
    let _ = writeln!(out, "   ID: {}", task.id);
    let _ = writeln!(out, "   Description: {}", task.description);
    let _ = writeln!(out, "   Reward: {} USDC", task.reward_usdc);
    let _ = writeln!(out, "   Status: {}", task.status);
    let _ = writeln!(out, "   Poster: {}", task.poster);
    let _ = writeln!(out, "\n   Charged: View access fee");
    let _ = write!(
        out,
        "   Remaining Balance: {} USDC",
        result.access_info.remaining_balance_usdc
    );
    out
}

pub fn purchase_header(task_id: u64) -> String {
    format!("\n💳 Purchasing access to Task #{task_id}...")
}

pub fn purchase_access(data: &PurchaseAccessResponse) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "   Execute this transaction:");
    let _ = writeln!(out, "   To: {}", data.transaction.to);
    let _ = writeln!(
        out,
        "   Data: {}...",
        truncate_chars(&data.transaction.data, CALLDATA_PREVIEW_CHARS)
    );
    let _ = write!(out, "\n   After purchase: {}", data.after_purchase);
    out
}

pub fn bulk_header() -> String {
    "\n📊 Fetching bulk tasks (premium)...".to_string()
}

pub fn bulk_tasks(result: &BulkTasksResponse) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "\n✅ Bulk Tasks Retrieved:");
    let _ = writeln!(out, "   Total Tasks: {}", result.total);
    let _ = writeln!(out, "   Charged: {} USDC", result.charged_usdc);
    let _ = writeln!(out, "   Remaining: {} USDC", result.remaining_balance_usdc);

    for task in result.tasks.iter().take(BULK_PREVIEW_TASKS) {
        let _ = writeln!(
            out,
            "\n   Task #{}: {}...",
            task.id,
            truncate_chars(&task.description, DESCRIPTION_PREVIEW_CHARS)
        );
        let _ = writeln!(out, "      Reward: {} USDC", task.reward_usdc);
        let _ = writeln!(out, "      Status: {}", task.status);
    }
    out.trim_end().to_string()
}

pub fn analytics_header() -> String {
    "\n📈 Fetching Analytics (premium)...".to_string()
}

pub fn analytics(result: &AnalyticsResponse) -> String {
    let stats = &result.stats;
    let mut out = String::new();
    let _ = writeln!(out, "\n✅ Agent Analytics:");
    let _ = writeln!(out, "   Total Earnings: {} USDC", stats.total_earnings_usdc);
    let _ = writeln!(out, "   Tasks Completed: {}", stats.tasks_completed);
    let _ = writeln!(out, "   X402 Balance: {} USDC", stats.x402_balance_usdc);
    let _ = writeln!(out, "   API Calls Made: {}", stats.api_calls_made);
    let _ = writeln!(out, "\n   Charged: {} USDC", result.charged_usdc);
    let _ = write!(out, "   Remaining: {} USDC", result.remaining_balance_usdc);
    out
}

pub fn task_list(data: &TaskList) -> String {
    format!("\n📋 Tasks (Free API):\n   Total: {}", data.total)
}

pub fn pricing(data: &PricingResponse) -> String {
    let mut out = String::new();
    let _ = write!(out, "\n💵 X402 Pricing:");
    for (service, info) in data.pricing.iter() {
        let _ = write!(
            out,
            "\n   {service}: {} USDC - {}",
            info.cost_usdc, info.description
        );
    }
    out
}

pub fn health(data: &HealthStatus) -> String {
    let mut out = String::new();
    let _ = write!(out, "\n🩺 Marketplace: {}", data.status);
    if let Some(ref network) = data.network {
        let _ = write!(out, "\n   Network: {network}");
    }
    if let Some(ref marketplace) = data.marketplace {
        let _ = write!(out, "\n   Contract: {marketplace}");
    }
    out
}
