mod common;

use inboxwatch_core::{Credential, MailError, MailProvider, Mailbox, ProviderKind};
use inboxwatch_providers::MailTmProvider;
use serde_json::json;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn provider(server: &MockServer) -> MailTmProvider {
    let config = common::mock_config(&server.uri());
    MailTmProvider::new(common::http_client(), &config.providers.mail_tm)
}

fn token_mailbox() -> Mailbox {
    Mailbox::new(
        ProviderKind::MailTm,
        "someone@mail.test".into(),
        Some(Credential::Token("tok-123".into())),
    )
}

#[tokio::test]
async fn create_registers_account_and_stores_token() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/domains"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "hydra:member": [{ "domain": "mail.test", "isActive": true }]
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/accounts"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "id": "acc-1" })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "token": "tok-123" })))
        .expect(1)
        .mount(&server)
        .await;

    let mailbox = provider(&server).create_mailbox().await.unwrap();

    assert_eq!(mailbox.provider, ProviderKind::MailTm);
    assert!(mailbox.address.ends_with("@mail.test"));
    assert_eq!(mailbox.local_part().len(), 10);
    assert_eq!(mailbox.token(), Some("tok-123"));
}

#[tokio::test]
async fn create_fails_when_account_registration_rejected() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/domains"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "hydra:member": [{ "domain": "mail.test" }]
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/accounts"))
        .respond_with(ResponseTemplate::new(422).set_body_string("address taken"))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "token": "never" })))
        .expect(0)
        .mount(&server)
        .await;

    let err = provider(&server).create_mailbox().await.unwrap_err();
    assert!(err.is_provider_failure(), "{err}");
}

#[tokio::test]
async fn create_fails_without_token_or_domains() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/domains"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "hydra:member": [] })))
        .mount(&server)
        .await;

    let err = provider(&server).create_mailbox().await.unwrap_err();
    assert!(matches!(err, MailError::ProviderUnavailable { .. }));

    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/domains"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "hydra:member": [{ "domain": "mail.test" }]
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/accounts"))
        .respond_with(ResponseTemplate::new(201))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "no token here" })))
        .mount(&server)
        .await;

    let err = provider(&server).create_mailbox().await.unwrap_err();
    assert!(err.is_provider_failure());
}

#[tokio::test]
async fn list_sends_bearer_token() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/messages"))
        .and(header("Authorization", "Bearer tok-123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "hydra:member": [
                { "id": "m1", "subject": "Welcome", "intro": "Confirm your account" },
                { "subject": "no id, skipped" },
                { "id": "m2", "subject": "Second" }
            ]
        })))
        .mount(&server)
        .await;

    let messages = provider(&server).list_messages(&token_mailbox()).await.unwrap();

    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0].id, "m1");
    assert_eq!(messages[0].content, "Confirm your account");
    assert_eq!(messages[1].content, "Second");
}

#[tokio::test]
async fn list_transient_failure_is_empty() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/messages"))
        .respond_with(ResponseTemplate::new(500).set_body_string("{\"detail\":\"busy\"}"))
        .mount(&server)
        .await;

    let messages = provider(&server).list_messages(&token_mailbox()).await.unwrap();
    assert!(messages.is_empty());
}

#[tokio::test]
async fn list_malformed_json_is_empty() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/messages"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let messages = provider(&server).list_messages(&token_mailbox()).await.unwrap();
    assert!(messages.is_empty());
}

#[tokio::test]
async fn list_non_success_without_body_propagates() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/messages"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&server)
        .await;

    let err = provider(&server).list_messages(&token_mailbox()).await.unwrap_err();
    assert!(matches!(
        err,
        MailError::ProviderUnavailable { provider: ProviderKind::MailTm, .. }
    ));
}

#[tokio::test]
async fn read_concatenates_fragments_and_markup() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/messages/m1"))
        .and(header("Authorization", "Bearer tok-123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "m1",
            "text": "Hello\n",
            "html": ["<p>part one</p>", "<p>part two</p>"]
        })))
        .mount(&server)
        .await;

    let content = provider(&server).read_message(&token_mailbox(), "m1").await.unwrap();
    assert_eq!(content, "Hello\n\n<p>part one</p><p>part two</p>");
}

#[tokio::test]
async fn read_substitutes_empty_for_absent_fields() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/messages/m2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "m2",
            "text": "plain only",
            "html": null
        })))
        .mount(&server)
        .await;

    let content = provider(&server).read_message(&token_mailbox(), "m2").await.unwrap();
    assert_eq!(content, "plain only\n");
}

#[tokio::test]
async fn read_missing_message_is_not_found() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/messages/gone"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let err = provider(&server).read_message(&token_mailbox(), "gone").await.unwrap_err();
    assert!(matches!(err, MailError::MessageNotFound { ref id, .. } if id == "gone"));
}

#[tokio::test]
async fn read_transient_failure_is_empty() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/messages/m1"))
        .respond_with(ResponseTemplate::new(503).set_body_string("{\"detail\":\"busy\"}"))
        .mount(&server)
        .await;

    let content = provider(&server).read_message(&token_mailbox(), "m1").await.unwrap();
    assert_eq!(content, "\n");
}

#[tokio::test]
async fn read_non_success_without_body_propagates() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/messages/m1"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let err = provider(&server).read_message(&token_mailbox(), "m1").await.unwrap_err();
    assert!(matches!(
        err,
        MailError::ProviderUnavailable { provider: ProviderKind::MailTm, .. }
    ));
}
