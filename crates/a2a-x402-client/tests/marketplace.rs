//! Request formation and response handling against a mock marketplace.

use a2a_x402_client::{
    AgentError, AgentIdentity, MarketplaceClient, PremiumOutcome, UsdcAmount, X402Agent,
};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// Hardhat account #0, publicly documented.
const TEST_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
const TEST_ADDRESS: &str = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266";

fn client_for(server: &MockServer) -> MarketplaceClient {
    let identity = AgentIdentity::from_private_key(TEST_KEY).unwrap();
    MarketplaceClient::new(&server.uri(), identity).unwrap()
}

fn insufficient_balance() -> serde_json::Value {
    json!({
        "error": "Payment Required",
        "message": "Insufficient balance for this operation",
        "required_usdc": "0.2",
        "current_balance_usdc": "0.0",
        "deficit_usdc": "0.2",
        "deposit_endpoint": "/api/x402/deposit"
    })
}

#[tokio::test]
async fn check_balance_uses_agent_address_in_path() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("/api/x402/balance/{TEST_ADDRESS}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "address": TEST_ADDRESS,
            "x402_balance_usdc": "1.25",
            "wallet_usdc": "40.0",
            "total_api_calls": "12",
            "deposit_instructions": {
                "method": "Call depositBalance(amount) on contract",
                "contract": "0xmarket",
                "note": "Approve USDC first, then deposit"
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let balance = client_for(&server).check_balance().await.unwrap();
    assert_eq!(balance.x402_balance_usdc, "1.25");
    assert_eq!(balance.total_api_calls, "12");
    assert_eq!(
        balance.deposit_instructions.unwrap().contract.as_deref(),
        Some("0xmarket")
    );
}

#[tokio::test]
async fn deposit_posts_amount_as_number() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/x402/deposit"))
        .and(body_json(json!({ "amount_usdc": 1.5 })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": "Execute these transactions in order",
            "amount_usdc": "1.5",
            "transactions": [
                { "step": 1, "to": "0xusdc", "data": "0x095ea7b3", "description": "Approve 1.5 USDC" },
                { "step": 2, "to": "0xmarket", "data": "0xabcdef01", "description": "Deposit 1.5 USDC" }
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let amount = UsdcAmount::parse("1.5").unwrap();
    let deposit = client_for(&server).deposit_balance(amount).await.unwrap();
    assert_eq!(deposit.approval().unwrap().to, "0xusdc");
    assert_eq!(deposit.deposit().unwrap().to, "0xmarket");
}

#[tokio::test]
async fn deposit_rejects_zero_without_a_request() {
    let server = MockServer::start().await;
    let err = client_for(&server)
        .deposit_balance(UsdcAmount::ZERO)
        .await
        .unwrap_err();
    assert!(matches!(err, AgentError::InvalidAmount(_)));
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn withdraw_rejects_zero_without_a_request() {
    let server = MockServer::start().await;
    let err = client_for(&server)
        .withdraw_balance(UsdcAmount::ZERO)
        .await
        .unwrap_err();
    assert!(matches!(err, AgentError::InvalidAmount(_)));
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn deposit_with_missing_steps_is_malformed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/x402/deposit"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "amount_usdc": "1",
            "transactions": [{ "to": "0xusdc", "data": "0x" }]
        })))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .deposit_balance(UsdcAmount::parse("1").unwrap())
        .await
        .unwrap_err();
    assert!(matches!(err, AgentError::MalformedResponse(_)));
}

#[tokio::test]
async fn withdraw_returns_contract_call() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/x402/withdraw"))
        .and(body_json(json!({ "amount_usdc": 0.5 })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": "Call withdrawBalance() on contract",
            "amount_usdc": "0.5",
            "contract": "0xmarket",
            "function": "withdrawBalance",
            "params": ["500000"]
        })))
        .mount(&server)
        .await;

    let withdraw = client_for(&server)
        .withdraw_balance(UsdcAmount::parse("0.5").unwrap())
        .await
        .unwrap();
    assert_eq!(withdraw.function, "withdrawBalance");
    assert_eq!(withdraw.params, vec!["500000".to_string()]);
}

#[tokio::test]
async fn premium_call_sends_agent_header_and_reads_receipt() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/x402/tasks/bulk"))
        .and(header("X-Agent-Address", TEST_ADDRESS))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("X-Payment-Protocol", "x402")
                .insert_header("X-Call-Cost", "0.2")
                .insert_header("X-Remaining-Balance", "0.8")
                .set_body_json(json!({
                    "message": "Bulk task query (premium)",
                    "total": 2,
                    "tasks": [
                        { "id": 1, "description": "Summarize a paper", "reward_usdc": "3.0", "status": 0 },
                        { "id": 2, "description": "Label images", "reward_usdc": "1.0", "status": 1 }
                    ],
                    "charged_usdc": "0.2",
                    "remaining_balance_usdc": "0.8"
                })),
        )
        .expect(1)
        .mount(&server)
        .await;

    match client_for(&server).get_bulk_tasks().await.unwrap() {
        PremiumOutcome::Granted { body, receipt } => {
            assert_eq!(body.total, "2");
            assert_eq!(body.tasks[1].description, "Label images");
            let receipt = receipt.expect("charged call should carry a receipt");
            assert_eq!(receipt.protocol, "x402");
            assert_eq!(receipt.call_cost_usdc.as_deref(), Some("0.2"));
            assert_eq!(receipt.remaining_balance_usdc.as_deref(), Some("0.8"));
        }
        PremiumOutcome::PaymentRequired(_) => panic!("expected a granted response"),
    }
}

#[tokio::test]
async fn payment_required_is_not_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("/api/x402/analytics/{TEST_ADDRESS}")))
        .respond_with(ResponseTemplate::new(402).set_body_json(insufficient_balance()))
        .mount(&server)
        .await;

    match client_for(&server).get_analytics().await.unwrap() {
        PremiumOutcome::PaymentRequired(body) => {
            assert_eq!(body.required_usdc.as_deref(), Some("0.2"));
            assert_eq!(body.deficit_usdc.as_deref(), Some("0.2"));
        }
        PremiumOutcome::Granted { .. } => panic!("expected 402"),
    }
}

#[tokio::test]
async fn payment_required_with_plain_text_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/x402/tasks/bulk"))
        .respond_with(ResponseTemplate::new(402).set_body_string("Payment Required"))
        .mount(&server)
        .await;

    let outcome = client_for(&server).get_bulk_tasks().await.unwrap();
    match outcome {
        PremiumOutcome::PaymentRequired(body) => {
            assert_eq!(body.message.as_deref(), Some("Payment Required"));
        }
        PremiumOutcome::Granted { .. } => panic!("expected 402"),
    }
}

#[tokio::test]
async fn premium_task_access_required() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/x402/tasks/7/premium"))
        .and(header("X-Agent-Address", TEST_ADDRESS))
        .respond_with(ResponseTemplate::new(402).set_body_json(json!({
            "error": "Task Access Required",
            "message": "Purchase access to view full task details",
            "task_id": "7",
            "access_fee_usdc": "0.1",
            "current_balance_usdc": "0.0",
            "purchase_endpoint": "/api/x402/tasks/7/purchase-access"
        })))
        .mount(&server)
        .await;

    let outcome = client_for(&server).view_premium_task(7).await.unwrap();
    assert!(outcome.is_payment_required());
}

#[tokio::test]
async fn premium_task_granted() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/x402/tasks/3/premium"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": "Premium task details",
            "task": {
                "id": "3",
                "description": "Audit a contract",
                "reward_usdc": "25.0",
                "poster": "0xposter",
                "assignee": "0x0000000000000000000000000000000000000000",
                "status": 1,
                "proof_uri": "",
                "deadline": "2026-11-01T00:00:00.000Z",
                "created_at": "2026-10-01T00:00:00.000Z"
            },
            "access_info": {
                "agent": TEST_ADDRESS,
                "access_granted": true,
                "remaining_balance_usdc": "0.9"
            }
        })))
        .mount(&server)
        .await;

    let task = client_for(&server)
        .view_premium_task(3)
        .await
        .unwrap()
        .into_granted()
        .unwrap();
    assert_eq!(task.task.reward_usdc, "25.0");
    assert_eq!(task.task.status, "1");
    assert!(task.access_info.access_granted);
}

#[tokio::test]
async fn purchase_access_posts_with_agent_header() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/x402/tasks/4/purchase-access"))
        .and(header("X-Agent-Address", TEST_ADDRESS))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": "Execute this transaction to purchase access",
            "task_id": "4",
            "agent": TEST_ADDRESS,
            "transaction": {
                "to": "0xmarket",
                "data": "0x5c1ae5d40000000000000000000000000000000000000000000000000000000000000004",
                "description": "Purchase access to task #4"
            },
            "after_purchase": "Access /api/x402/tasks/4/premium to view details"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let purchase = client_for(&server).purchase_task_access(4).await.unwrap();
    assert_eq!(purchase.task_id, "4");
    assert_eq!(purchase.transaction.to, "0xmarket");
}

#[tokio::test]
async fn generic_premium_post_sends_empty_object_by_default() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/x402/custom"))
        .and(header("X-Agent-Address", TEST_ADDRESS))
        .and(body_json(json!({})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "ok": true })))
        .expect(1)
        .mount(&server)
        .await;

    let outcome: PremiumOutcome<serde_json::Value> = client_for(&server)
        .call_premium_api(reqwest::Method::POST, "/api/x402/custom", None)
        .await
        .unwrap();
    assert_eq!(outcome.into_granted(), Some(json!({ "ok": true })));
}

#[tokio::test]
async fn free_calls_do_not_identify_the_agent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/tasks"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "total": "1",
            "tasks": [{
                "id": 1,
                "poster": "0xposter",
                "worker": null,
                "description": "Write docs",
                "reward": "2.0",
                "deadline": "2026-11-01T00:00:00.000Z",
                "status": "Open",
                "proofURI": null
            }]
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("/api/x402/balance/{TEST_ADDRESS}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "address": TEST_ADDRESS,
            "x402_balance_usdc": "0.0",
            "wallet_usdc": "5.0",
            "total_api_calls": "0"
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/x402/deposit"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "amount_usdc": "1.0",
            "transactions": [
                { "step": 1, "to": "0xusdc", "data": "0x095ea7b3" },
                { "step": 2, "to": "0xmarket", "data": "0xb6b55f25" }
            ]
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/x402/pricing"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "pricing": { "api_call": { "cost_usdc": "0.01", "description": "Standard API call charge" } }
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let tasks = client.list_tasks().await.unwrap();
    assert_eq!(tasks.total, "1");
    client.check_balance().await.unwrap();
    client
        .deposit_balance(UsdcAmount::parse("1").unwrap())
        .await
        .unwrap();
    client.get_pricing().await.unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 4);
    for request in &requests {
        assert!(
            !request.headers.contains_key("x-agent-address"),
            "{} {} identified the agent",
            request.method,
            request.url.path()
        );
    }
}

#[tokio::test]
async fn premium_post_sends_caller_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/x402/custom"))
        .and(header("X-Agent-Address", TEST_ADDRESS))
        .and(body_json(json!({ "query": "open", "limit": 5 })))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("X-Payment-Protocol", "x402")
                .insert_header("X-Call-Cost", "0.01")
                .set_body_json(json!({ "results": [] })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let body = json!({ "query": "open", "limit": 5 });
    let agent = X402Agent::from_client(client_for(&server));
    let result: Option<serde_json::Value> = agent
        .call_premium_api(reqwest::Method::POST, "/api/x402/custom", Some(&body))
        .await
        .unwrap();
    assert_eq!(result, Some(json!({ "results": [] })));
}

#[tokio::test]
async fn pricing_and_health() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/x402/pricing"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "protocol": "x402",
            "token": "USDC",
            "pricing": {
                "premium_task_access": { "cost_usdc": "0.1", "description": "Access full task details before accepting" },
                "api_call": { "cost_usdc": "0.01", "description": "Standard API call charge" }
            },
            "contract_settings": { "default_access_fee_usdc": "0.1", "api_call_cost_usdc": "0.01" }
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "ok",
            "network": "Base Sepolia"
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let pricing = client.get_pricing().await.unwrap();
    assert_eq!(pricing.pricing.get("api_call").unwrap().cost_usdc, "0.01");
    assert_eq!(client.health().await.unwrap().status, "ok");
}

#[tokio::test]
async fn error_status_surfaces_server_message() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/x402/pricing"))
        .respond_with(
            ResponseTemplate::new(500).set_body_json(json!({ "error": "contract call reverted" })),
        )
        .mount(&server)
        .await;

    let err = client_for(&server).get_pricing().await.unwrap_err();
    match err {
        AgentError::ApiError { status, message } => {
            assert_eq!(status, 500);
            assert_eq!(message, "contract call reverted");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn malformed_json_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/tasks"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let err = client_for(&server).list_tasks().await.unwrap_err();
    assert!(matches!(err, AgentError::SerdeError(_)));
}

#[tokio::test]
async fn unreachable_server_is_an_http_error() {
    let server = MockServer::start().await;
    let uri = server.uri();
    drop(server);

    let identity = AgentIdentity::from_private_key(TEST_KEY).unwrap();
    let client = MarketplaceClient::new(&uri, identity).unwrap();
    let err = client.health().await.unwrap_err();
    assert!(matches!(err, AgentError::HttpError(_)));
}

#[tokio::test]
async fn agent_returns_none_on_payment_required() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/x402/tasks/bulk"))
        .respond_with(ResponseTemplate::new(402).set_body_json(insufficient_balance()))
        .mount(&server)
        .await;

    let agent = X402Agent::from_client(client_for(&server));
    assert_eq!(agent.address(), TEST_ADDRESS);
    assert!(agent.get_bulk_tasks().await.unwrap().is_none());
}
