use salesops::rules::{RuleDraft, RuleTestRequest, RuleType};
use salesops::SalesOps;
use serde_json::json;
use std::cell::Cell;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client(server: &MockServer) -> SalesOps {
    SalesOps::new(&server.uri()).unwrap()
}

fn rule_json(id: i64, active: bool) -> serde_json::Value {
    json!({
        "id": id,
        "name": "Large order approval",
        "description": "Orders above 100 units need a manager",
        "conditions": {"min_quantity": 100},
        "actions": {"require_approval": true},
        "priority": 3,
        "rule_type": "quantity",
        "is_active": active,
        "created_at": "2024-04-01T09:00:00"
    })
}

#[tokio::test]
async fn test_list_and_get_rules() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/rules"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([rule_json(1, true), rule_json(2, false)])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/rules/2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(rule_json(2, false)))
        .mount(&server)
        .await;

    let api = client(&server);
    let rules = api.rules().list().await.unwrap();
    assert_eq!(rules.len(), 2);
    assert_eq!(rules[0].rule_type, RuleType::Quantity);

    let rule = api.rules().get(2).await.unwrap();
    assert!(!rule.is_active);
    assert_eq!(rule.conditions["min_quantity"], 100);
}

#[tokio::test]
async fn test_create_rule_from_draft() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/rules"))
        .and(body_json(json!({
            "name": "VIP customers",
            "description": "",
            "conditions": r#"{"customer_domain": "vip.com"}"#,
            "actions": "notify sales lead",
            "priority": 10,
            "rule_type": "customer",
            "is_active": true
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": 9})))
        .expect(1)
        .mount(&server)
        .await;

    let mut draft = RuleDraft::new();
    draft.name = "VIP customers".into();
    draft.conditions = r#"{"customer_domain": "vip.com"}"#.into();
    draft.actions = "notify sales lead".into();
    draft.rule_type = RuleType::Customer;
    draft.set_priority_input("42");

    let created = client(&server).rules().create(&draft.to_new_rule()).await.unwrap();
    assert_eq!(created["id"], 9);
}

#[tokio::test]
async fn test_update_rule_sends_all_fields() {
    let server = MockServer::start().await;
    let rule: salesops::rules::Rule = serde_json::from_value(rule_json(4, true)).unwrap();
    let actions_text = serde_json::to_string_pretty(&json!({"require_approval": true})).unwrap();

    Mock::given(method("PUT"))
        .and(path("/api/rules/4"))
        .and(body_json(json!({
            "name": "Large order approval",
            "description": "Orders above 100 units need a manager",
            "conditions": r#"{"min_quantity": 150}"#,
            "actions": actions_text,
            "priority": 3,
            "rule_type": "quantity",
            "is_active": true
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 4})))
        .expect(1)
        .mount(&server)
        .await;

    let mut draft = RuleDraft::from_rule(&rule);
    draft.conditions = r#"{"min_quantity": 150}"#.into();
    client(&server).rules().update(4, &draft.to_update()).await.unwrap();
}

#[tokio::test]
async fn test_toggle_sends_only_active_flag() {
    let server = MockServer::start().await;
    let rule: salesops::rules::Rule = serde_json::from_value(rule_json(5, true)).unwrap();

    Mock::given(method("PUT"))
        .and(path("/api/rules/5"))
        .and(body_json(json!({"is_active": false})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 5, "is_active": false})))
        .expect(1)
        .mount(&server)
        .await;

    client(&server).rules().toggle(&rule).await.unwrap();
}

#[tokio::test]
async fn test_declined_delete_sends_nothing() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/api/rules/6"))
        .respond_with(ResponseTemplate::new(204))
        .expect(0)
        .mount(&server)
        .await;

    let asked = Cell::new(None::<String>);
    let decline = |prompt: &str| {
        asked.set(Some(prompt.to_string()));
        false
    };

    let deleted = client(&server).rules().delete_confirmed(6, &decline).await.unwrap();
    assert!(!deleted);
    assert_eq!(
        asked.take().as_deref(),
        Some("Are you sure you want to delete this rule?")
    );
}

#[tokio::test]
async fn test_confirmed_delete() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/api/rules/6"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let accept = |_: &str| true;
    let deleted = client(&server).rules().delete_confirmed(6, &accept).await.unwrap();
    assert!(deleted);
}

#[tokio::test]
async fn test_rule_dry_run_and_stats() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/rules/test"))
        .and(body_json(json!({
            "conditions": {"min_quantity": 100},
            "test_metrics": {"total_quantity": 120}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"matches": true})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/rules/stats"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"total_rules": 4, "active_rules": 3})))
        .mount(&server)
        .await;

    let api = client(&server);
    let request = RuleTestRequest {
        conditions: json!({"min_quantity": 100}),
        test_metrics: json!({"total_quantity": 120}),
    };
    let result = api.rules().test(&request).await.unwrap();
    assert_eq!(result["matches"], true);

    let stats = api.rules().stats().await.unwrap();
    assert_eq!(stats["active_rules"], 3);
}

#[tokio::test]
async fn test_rule_validation_error_message() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/rules"))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({"detail": "name must not be empty"})))
        .mount(&server)
        .await;

    let err = client(&server)
        .rules()
        .create(&RuleDraft::new().to_new_rule())
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(422));
    assert!(err.to_string().contains("name must not be empty"));
}
