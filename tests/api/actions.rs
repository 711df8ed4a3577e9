use crate::helpers::spawn_app;

#[tokio::test]
async fn actions_lists_bigmarker_with_its_settings() {
    let app = spawn_app().await;

    let response = app.get_actions().await;

    assert_eq!(200, response.status().as_u16());
    let actions: serde_json::Value = response.json().await.unwrap();
    assert_eq!(actions[0]["name"], "bigmarker");
    assert_eq!(actions[0]["label"], "BigMarker");
    assert_eq!(actions[0]["settings"]["controls"][0]["name"], "bigmarker_api_key");
    assert_eq!(actions[0]["settings"]["controls"][1]["name"], "bigmarker_channel");
}

#[tokio::test]
async fn export_removes_bigmarker_settings() {
    let app = spawn_app().await;

    let response = app
        .export_action(
            "bigmarker",
            &serde_json::json!({
                "id": "3f2a1c",
                "settings": {
                    "form_name": "Webinar signup",
                    "submit_actions": ["bigmarker"],
                    "bigmarker_api_key": "test-api-key",
                    "bigmarker_channel": "mktg"
                }
            }),
        )
        .await;

    assert_eq!(200, response.status().as_u16());
    let exported: serde_json::Value = response.json().await.unwrap();
    assert_eq!(
        exported,
        serde_json::json!({
            "id": "3f2a1c",
            "settings": {
                "form_name": "Webinar signup",
                "submit_actions": ["bigmarker"]
            }
        })
    );
}

#[tokio::test]
async fn export_returns_404_for_an_unknown_action() {
    let app = spawn_app().await;

    let response = app
        .export_action("mailchimp", &serde_json::json!({ "settings": {} }))
        .await;

    assert_eq!(404, response.status().as_u16());
}
