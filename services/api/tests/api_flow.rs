//! The HTTP surface exercised in-process against in-memory storage.

mod common;

use axum::http::StatusCode;
use common::{app, send, send_text, signed_in, signup_body, FakeTranslator};
use serde_json::json;

#[tokio::test]
async fn signup_login_and_repeat_completion_award_stars_once() {
    let app = app(FakeTranslator::online()).await;

    let (status, profile) = send(&app, "POST", "/auth/signup", Some(signup_body("Mona", 6, "1234", "1234"))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(profile["name"], "Mona");
    assert!(profile.get("pin").is_none());

    let (status, login) = send(
        &app,
        "POST",
        "/auth/login",
        Some(json!({ "name": "  MONA ", "pin": "1234" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(login["totalStars"], 0);

    let (status, first) = send(&app, "POST", "/stories/1/complete", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first["firstCompletion"], true);
    assert_eq!(first["starsAwarded"], 3);
    assert_eq!(first["totalStars"], 3);

    let (_, again) = send(&app, "POST", "/stories/1/complete", None).await;
    assert_eq!(again["firstCompletion"], false);
    assert_eq!(again["starsAwarded"], 0);
    assert_eq!(again["totalStars"], 3);

    let (status, progress) = send(&app, "GET", "/progress", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(progress["totalStars"], 3);
    assert_eq!(progress["completedCount"], 1);
    assert_eq!(progress["completed"][0]["storyId"], 1);
}

#[tokio::test]
async fn profile_routes_require_login() {
    let app = app(FakeTranslator::online()).await;

    let (status, _) = send(&app, "GET", "/progress", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    signed_in(&app).await;
    let (status, _) = send(&app, "POST", "/auth/logout", None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&app, "POST", "/stories/2/complete", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn wrong_pin_and_missing_profile_are_rejected() {
    let app = app(FakeTranslator::online()).await;

    let (status, _) = send(&app, "POST", "/auth/login", Some(json!({ "name": "Mona", "pin": "1234" }))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    send(&app, "POST", "/auth/signup", Some(signup_body("Mona", 6, "1234", "1234"))).await;
    let (status, _) = send(&app, "POST", "/auth/login", Some(json!({ "name": "Mona", "pin": "4321" }))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn invalid_signup_reports_every_rule() {
    let app = app(FakeTranslator::online()).await;

    let (status, body) =
        send_text(&app, "POST", "/auth/signup", Some(signup_body("A", 6, "12a4", "9999"))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body,
        "name must be at least 2 characters long; PINs do not match; PIN must be exactly 4 digits"
    );

    let (status, body) = send_text(
        &app,
        "POST",
        "/auth/signup",
        Some(json!({ "name": "", "pin": "", "confirmPin": "" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body,
        "name is required; age is required; pin is required; confirmPin is required"
    );
}

#[tokio::test]
async fn out_of_range_or_textual_ages_reach_validation() {
    let app = app(FakeTranslator::online()).await;

    let (status, body) = send_text(
        &app,
        "POST",
        "/auth/signup",
        Some(json!({ "name": "Mona", "age": 300, "pin": "1234", "confirmPin": "1234" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, "age must be between 4 and 10 (got 300)");

    let (status, profile) = send(
        &app,
        "POST",
        "/auth/signup",
        Some(json!({ "name": "Mona", "age": "6", "pin": "1234", "confirmPin": "1234" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(profile["age"], 6);
}

#[tokio::test]
async fn story_cards_and_progress_show_per_story_state() {
    let app = app(FakeTranslator::online()).await;

    let (_, stories) = send(&app, "GET", "/stories", None).await;
    assert!(stories[0].get("stars").is_none());
    assert!(stories[0].get("completed").is_none());

    signed_in(&app).await;
    send(&app, "POST", "/stories/2/complete", None).await;

    let (_, stories) = send(&app, "GET", "/stories", None).await;
    assert_eq!(stories[0]["completed"], false);
    assert_eq!(stories[0]["stars"], 0);
    assert_eq!(stories[1]["completed"], true);
    assert_eq!(stories[1]["stars"], 3);

    let (_, story) = send(&app, "GET", "/stories/2", None).await;
    assert_eq!(story["stars"], 3);

    let (status, progress) = send(&app, "GET", "/progress", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(progress["totalStories"], 3);
    assert_eq!(progress["percentComplete"], 33);
    assert_eq!(progress["stories"].as_array().map(Vec::len), Some(3));
    assert_eq!(progress["stories"][1], json!({ "storyId": 2, "completed": true, "stars": 3 }));
    assert_eq!(progress["stories"][2]["completed"], false);
}

#[tokio::test]
async fn unknown_story_is_not_found() {
    let app = app(FakeTranslator::online()).await;
    signed_in(&app).await;

    let (status, _) = send(&app, "GET", "/stories/99", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, "POST", "/stories/99/complete", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, progress) = send(&app, "GET", "/progress", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(progress["completedCount"], 0);
}

#[tokio::test]
async fn unknown_language_code_is_a_bad_request() {
    let app = app(FakeTranslator::online()).await;

    let (status, _) = send(&app, "GET", "/stories?lang=fr", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, "PUT", "/language", Some(json!({ "language": "klingon" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn switching_to_arabic_builds_the_story_mirror() {
    let remote = FakeTranslator::online();
    let app = app(remote.clone()).await;

    let (status, stories) = send(&app, "GET", "/stories?lang=ar", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stories[0]["title"], "Bunny's Big Day");

    let (status, switched) = send(&app, "PUT", "/language", Some(json!({ "language": "ar" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(switched["language"], "ar");
    assert_eq!(switched["mirrorReady"], true);

    // The stored preference now picks the language when none is given.
    let (_, story) = send(&app, "GET", "/stories/1", None).await;
    assert_eq!(story["title"], "[ar] Bunny's Big Day");
    assert_eq!(story["audioUrl"], "stories/bunny.mp3");

    // A second switch reuses the installed mirror.
    let calls = remote.calls();
    send(&app, "PUT", "/language", Some(json!({ "language": "ar" }))).await;
    assert_eq!(remote.calls(), calls);

    let (_, language) = send(&app, "GET", "/language", None).await;
    assert_eq!(language["language"], "ar");
}

#[tokio::test]
async fn offline_switch_keeps_english_and_translation_falls_back() {
    let app = app(FakeTranslator::offline()).await;

    let (status, switched) = send(&app, "PUT", "/language", Some(json!({ "language": "ar" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(switched["mirrorReady"], false);

    let (_, story) = send(&app, "GET", "/stories/2?lang=ar", None).await;
    assert_eq!(story["title"], "Bear's Honey Hunt");

    let (status, translated) = send(
        &app,
        "POST",
        "/translate",
        Some(json!({ "text": "Hello friend", "target": "ar" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(translated["text"], "Hello friend");
    assert_eq!(translated["source"], "fallback");
}

#[tokio::test]
async fn ui_strings_come_from_the_dictionary() {
    let remote = FakeTranslator::online();
    let app = app(remote.clone()).await;

    let (status, table) = send(&app, "GET", "/ui-strings?lang=ar", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(table["nav-home"], "الرئيسية");

    let (_, translated) = send(
        &app,
        "POST",
        "/translate",
        Some(json!({ "text": "nav-stories", "target": "ar" })),
    )
    .await;
    assert_eq!(translated["text"], "القصص");
    assert_eq!(translated["source"], "ui_dictionary");
    assert_eq!(remote.calls(), 0);
}

#[tokio::test]
async fn openapi_document_is_served() {
    let app = app(FakeTranslator::online()).await;

    let (status, doc) = send(&app, "GET", "/api-docs/openapi.json", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(doc["paths"]["/stories/{id}/complete"].is_object());
}
