//! Tests against the live QBMS test endpoint.
//!
//! Ignored by default. Run with credentials for a PTC merchant account:
//!
//! ```text
//! QBMS_LOGIN=app.example.com QBMS_TICKET=TGT-1-abc cargo test --test remote_gateway_test -- --ignored
//! ```

use std::time::{SystemTime, UNIX_EPOCH};

use qbms_gateway::{CreditCard, GatewayClient, GatewayConfig, GatewayResponse, RequestOptions};

fn remote_client() -> Option<GatewayClient> {
    let login = std::env::var("QBMS_LOGIN").ok()?;
    let ticket = std::env::var("QBMS_TICKET").ok()?;

    let _ = tracing_subscriber::fmt().with_env_filter("qbms_gateway=debug").try_init();

    Some(GatewayClient::new(GatewayConfig::new(login, ticket, true)).unwrap())
}

fn unique_customer_id(prefix: &str) -> String {
    let secs = SystemTime::now().duration_since(UNIX_EPOCH).unwrap().as_secs();
    format!("{prefix}-{secs}")
}

fn card(number: &str) -> CreditCard {
    CreditCard::new(number, 9, 2035, "Longbob Longsen")
}

fn text<'a>(response: &'a GatewayResponse, key: &str) -> Option<&'a str> {
    response.param(key).and_then(|v| v.as_str())
}

async fn create_entry(client: &GatewayClient, customer_id: &str) -> String {
    let response = client
        .create_wallet_entry(
            &RequestOptions::new()
                .customer_id(customer_id)
                .credit_card(card("5105105105105100"))
                .credit_card_address("1133 Sonora Ct.")
                .credit_card_postal_code("94086"),
        )
        .await
        .unwrap();
    assert!(response.success, "create failed: {}", response.message);
    text(&response, "wallet_entry_id").unwrap().to_owned()
}

#[tokio::test]
#[ignore = "requires QBMS_LOGIN and QBMS_TICKET"]
async fn test_remote_create_update_and_get() {
    let Some(client) = remote_client() else { return };
    let customer_id = unique_customer_id("Test2");
    let wallet_entry_id = create_entry(&client, &customer_id).await;

    let lookup = RequestOptions::new().customer_id(&customer_id).wallet_entry_id(&wallet_entry_id);
    let response = client.get_wallet_entry(&lookup).await.unwrap();
    assert!(response.success);
    assert_eq!(text(&response, "credit_card_address"), Some("1133 Sonora Ct."));
    assert_eq!(text(&response, "masked_credit_card_number"), Some("************5100"));

    let update = RequestOptions::new()
        .customer_id(&customer_id)
        .wallet_entry_id(&wallet_entry_id)
        .credit_card(CreditCard::new("5105105105105100", 9, 2011, "Longbob Shortsen"))
        .credit_card_address("1135 Sonora Ct.");
    assert!(client.update_wallet_entry(&update).await.unwrap().success);

    let response = client.get_wallet_entry(&lookup).await.unwrap();
    assert_eq!(text(&response, "credit_card_address"), Some("1135 Sonora Ct."));
    assert_eq!(text(&response, "credit_card_postal_code"), Some("94086"));
    assert_eq!(text(&response, "name_on_card"), Some("Longbob Shortsen"));
}

#[tokio::test]
#[ignore = "requires QBMS_LOGIN and QBMS_TICKET"]
async fn test_remote_create_and_delete() {
    let Some(client) = remote_client() else { return };
    let customer_id = unique_customer_id("Test2");
    let wallet_entry_id = create_entry(&client, &customer_id).await;

    let lookup = RequestOptions::new().customer_id(&customer_id).wallet_entry_id(&wallet_entry_id);
    assert!(client.delete_wallet_entry(&lookup).await.unwrap().success);

    let response = client.get_wallet_entry(&lookup).await.unwrap();
    assert!(!response.success);
    assert_eq!(response.message, "No wallet-related records found in database.");
    assert_eq!(response.status_code(), Some("10315"));
}

#[tokio::test]
#[ignore = "requires QBMS_LOGIN and QBMS_TICKET"]
async fn test_remote_short_wallet_entry_id() {
    let Some(client) = remote_client() else { return };

    let response = client
        .get_wallet_entry(&RequestOptions::new().customer_id("bad").wallet_entry_id("worse"))
        .await
        .unwrap();

    assert!(!response.success);
    assert_eq!(
        response.message,
        "The string worse in the field WalletEntryID is too short. The minimum length is 24."
    );
    assert_eq!(response.status_code(), Some("10307"));
}

#[tokio::test]
#[ignore = "requires QBMS_LOGIN and QBMS_TICKET"]
async fn test_remote_invalid_card_number() {
    let Some(client) = remote_client() else { return };

    let response = client
        .create_wallet_entry(
            &RequestOptions::new()
                .customer_id(unique_customer_id("Test"))
                .credit_card(card("ABCD"))
                .credit_card_address("1133 Sonora Ct.")
                .credit_card_postal_code("94086"),
        )
        .await
        .unwrap();

    assert!(!response.success);
    assert_eq!(response.status_code(), Some("10309"));
}

#[tokio::test]
#[ignore = "requires QBMS_LOGIN and QBMS_TICKET"]
async fn test_remote_authorize_capture_and_void() {
    let Some(client) = remote_client() else { return };
    let customer_id = unique_customer_id("Test3");
    let wallet_entry_id = create_entry(&client, &customer_id).await;

    let payment = RequestOptions::new()
        .customer_id(&customer_id)
        .wallet_entry_id(&wallet_entry_id)
        .amount(100_u32);

    let auth = client.authorize_wallet_entry(&payment).await.unwrap();
    assert!(auth.success, "authorize failed: {}", auth.message);
    let capture = client.capture(None, auth.authorization.as_deref().unwrap()).await.unwrap();
    assert!(capture.success, "capture failed: {}", capture.message);

    let charge = client.charge_wallet_entry(&payment).await.unwrap();
    assert!(charge.success, "charge failed: {}", charge.message);
    let void = client.void(charge.authorization.as_deref().unwrap()).await.unwrap();
    assert!(void.success, "void failed: {}", void.message);
}
