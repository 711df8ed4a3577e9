use std::time::Duration;

use crate::helpers::{spawn_app, submission};
use wiremock::matchers::{any, body_json, header, method, path};
use wiremock::{Mock, ResponseTemplate};

#[tokio::test]
async fn run_returns_200_and_subscribes_to_the_channel() {
    let app = spawn_app().await;

    Mock::given(method("PUT"))
        .and(path("/channels/mktg/add_subscriber"))
        .and(header("API-KEY", "test-api-key"))
        .and(body_json(serde_json::json!({
            "email": "ursula@example.com",
            "first_name": "Ursula",
            "last_name": "Le Guin"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "bmid": "abc123" })))
        .expect(1)
        .mount(&app.bigmarker_server)
        .await;

    let response = app.run_bigmarker(&submission("mktg", serde_json::json!({}))).await;

    assert_eq!(200, response.status().as_u16());
    let outcome: serde_json::Value = response.json().await.unwrap();
    assert_eq!(
        outcome,
        serde_json::json!({
            "results": [
                { "target": "channel", "status": "delivered", "reference": "abc123", "stored": true }
            ]
        })
    );
    assert_eq!(app.stored_field(42, "bmid").await, Some("abc123".to_string()));
}

#[tokio::test]
async fn run_without_required_fields_sends_nothing() {
    let app = spawn_app().await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&app.bigmarker_server)
        .await;

    let mut without_api_key = submission("mktg", serde_json::json!({ "webinar": "W1" }));
    without_api_key["form_settings"]["bigmarker_api_key"] = serde_json::json!("");
    let mut without_email = submission("mktg", serde_json::json!({ "webinar": "W1" }));
    without_email["fields"]["email"]["value"] = serde_json::json!("");
    let mut without_firstname = submission("mktg", serde_json::json!({ "webinar": "W1" }));
    without_firstname["fields"]
        .as_object_mut()
        .unwrap()
        .remove("firstname");
    let mut without_lastname = submission("mktg", serde_json::json!({ "webinar": "W1" }));
    without_lastname["fields"]["lastname"] = serde_json::json!("   ");

    let test_cases = vec![
        (without_api_key, "missing the API key"),
        (without_email, "empty email"),
        (without_firstname, "missing first name"),
        (without_lastname, "blank last name"),
    ];

    for (body, description) in test_cases {
        let response = app.run_bigmarker(&body).await;

        assert_eq!(
            200,
            response.status().as_u16(),
            "The API did not return 200 OK when the payload was {}.",
            description
        );
        let outcome: serde_json::Value = response.json().await.unwrap();
        assert_eq!(
            outcome,
            serde_json::json!({ "results": [] }),
            "The submission was relayed when the payload was {}.",
            description
        );
    }
}

#[tokio::test]
async fn run_registers_for_the_webinar_with_attribution() {
    let app = spawn_app().await;

    Mock::given(method("PUT"))
        .and(path("/conferences/register"))
        .and(body_json(serde_json::json!({
            "id": "W1",
            "email": "ursula@example.com",
            "first_name": "Ursula",
            "last_name": "Le Guin",
            "utm_bmcr_source": "fb",
            "custom_user_id": 42
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "conference_url": "https://www.bigmarker.com/acme/W1"
        })))
        .expect(1)
        .mount(&app.bigmarker_server)
        .await;

    let response = app
        .run_bigmarker(&submission(
            "",
            serde_json::json!({ "webinar": "W1", "utm_bmcr_source": "fb" }),
        ))
        .await;

    assert_eq!(200, response.status().as_u16());
    assert_eq!(
        app.stored_field(42, "bigmarker_conference_url").await,
        Some("https://www.bigmarker.com/acme/W1".to_string())
    );
}

#[tokio::test]
async fn anonymous_submissions_are_relayed_without_a_user_id() {
    let app = spawn_app().await;

    Mock::given(path("/conferences/register"))
        .and(body_json(serde_json::json!({
            "id": "W1",
            "email": "ursula@example.com",
            "first_name": "Ursula",
            "last_name": "Le Guin"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "conference_url": "https://www.bigmarker.com/acme/W1"
        })))
        .expect(1)
        .mount(&app.bigmarker_server)
        .await;

    let mut body = submission("", serde_json::json!({ "webinar": "W1" }));
    body["user"] = serde_json::json!({ "id": 0 });
    let response = app.run_bigmarker(&body).await;

    assert_eq!(200, response.status().as_u16());
    let outcome: serde_json::Value = response.json().await.unwrap();
    assert_eq!(outcome["results"][0]["stored"], false);
}

#[tokio::test]
async fn remote_errors_are_reported_but_the_submission_succeeds() {
    let app = spawn_app().await;

    Mock::given(path("/channels/mktg/add_subscriber"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(serde_json::json!({ "error": "invalid key" })),
        )
        .expect(1)
        .mount(&app.bigmarker_server)
        .await;

    let response = app.run_bigmarker(&submission("mktg", serde_json::json!({}))).await;

    assert_eq!(200, response.status().as_u16());
    let outcome: serde_json::Value = response.json().await.unwrap();
    assert_eq!(
        outcome["results"][0],
        serde_json::json!({ "target": "channel", "status": "failed", "error": "invalid key" })
    );
    assert_eq!(app.stored_field(42, "bmid").await, None);
}

#[tokio::test]
async fn a_slow_channel_does_not_prevent_the_webinar_registration() {
    let app = spawn_app().await;

    Mock::given(path("/channels/mktg/add_subscriber"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(180)))
        .expect(1)
        .mount(&app.bigmarker_server)
        .await;
    Mock::given(path("/conferences/register"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&app.bigmarker_server)
        .await;

    let response = app
        .run_bigmarker(&submission("mktg", serde_json::json!({ "webinar": "W1" })))
        .await;

    assert_eq!(200, response.status().as_u16());
    let outcome: serde_json::Value = response.json().await.unwrap();
    assert_eq!(outcome["results"][0]["target"], "channel");
    assert_eq!(outcome["results"][0]["status"], "failed");
    assert_eq!(outcome["results"][1]["target"], "conference");
    assert_eq!(outcome["results"][1]["status"], "delivered");
}

#[tokio::test]
async fn run_returns_404_for_an_unknown_action() {
    let app = spawn_app().await;

    let response = app
        .run_action("mailchimp", &submission("mktg", serde_json::json!({})))
        .await;

    assert_eq!(404, response.status().as_u16());
}

#[tokio::test]
async fn unknown_actions_are_reported_before_the_body_is_read() {
    let app = spawn_app().await;

    let response = app
        .api_client
        .post(&format!("{}/actions/mailchimp/run", &app.address))
        .header("Content-Type", "application/json")
        .body("{ not json")
        .send()
        .await
        .expect("Failed to execute request.");

    assert_eq!(404, response.status().as_u16());
}

#[tokio::test]
async fn run_returns_400_for_a_body_that_is_not_json() {
    let app = spawn_app().await;

    let response = app
        .api_client
        .post(&format!("{}/actions/bigmarker/run", &app.address))
        .header("Content-Type", "application/json")
        .body("{ not json")
        .send()
        .await
        .expect("Failed to execute request.");

    assert_eq!(400, response.status().as_u16());
}

#[tokio::test]
async fn run_returns_400_when_fields_are_missing() {
    let app = spawn_app().await;

    let response = app
        .run_bigmarker(&serde_json::json!({
            "form_settings": { "bigmarker_api_key": "test-api-key" }
        }))
        .await;

    assert_eq!(400, response.status().as_u16());
}
