use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use ellarises::config::Config;
use http_body_util::BodyExt;
use tower::ServiceExt;

async fn spawn_app() -> Router {
    let mut config = Config::default();
    config.database.url = "sqlite::memory:".to_string();
    config.server.secure_cookies = false;

    let state = ellarises::api::create_app_state_from_config(config)
        .await
        .expect("Failed to create app state");
    ellarises::api::router(state).await
}

/// Signs in and returns the session cookie to replay on later requests.
async fn login(app: &Router, username: &str, password: &str) -> String {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/login")
                .header(
                    header::CONTENT_TYPE,
                    mime::APPLICATION_WWW_FORM_URLENCODED.as_ref(),
                )
                .body(Body::from(format!(
                    "username={username}&password={password}"
                )))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .expect("login should set a session cookie");
    cookie
        .to_str()
        .unwrap()
        .split(';')
        .next()
        .unwrap()
        .to_string()
}

async fn get_with(app: &Router, cookie: &str, uri: &str) -> axum::response::Response {
    app.clone()
        .oneshot(
            Request::builder()
                .uri(uri)
                .header(header::COOKIE, cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap()
}

async fn post_form(app: &Router, cookie: &str, uri: &str, body: &str) -> axum::response::Response {
    app.clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header(header::COOKIE, cookie)
                .header(
                    header::CONTENT_TYPE,
                    mime::APPLICATION_WWW_FORM_URLENCODED.as_ref(),
                )
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}

#[tokio::test]
async fn test_anonymous_requests_redirect_to_login() {
    let app = spawn_app().await;

    for uri in ["/participants", "/events", "/surveys", "/milestones", "/donations", "/dashboard"] {
        let response = app
            .clone()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER, "{uri}");
        assert_eq!(
            response.headers().get(header::LOCATION).unwrap(),
            "/login",
            "{uri}"
        );
    }
}

#[tokio::test]
async fn test_invalid_credentials_get_one_generic_message() {
    let app = spawn_app().await;

    // Wrong password for a real user and a lookup miss must be
    // indistinguishable.
    for body in ["username=admin&password=wrong", "username=nobody&password=x"] {
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/login")
                    .header(
                        header::CONTENT_TYPE,
                        mime::APPLICATION_WWW_FORM_URLENCODED.as_ref(),
                    )
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let json = body_json(response).await;
        assert_eq!(json["error"], "Invalid username or password");
    }
}

#[tokio::test]
async fn test_login_then_dashboard() {
    let app = spawn_app().await;
    let cookie = login(&app, "admin", "admin123").await;

    let response = get_with(&app, &cookie, "/dashboard").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["data"]["user"]["username"], "admin");
    assert_eq!(json["data"]["user"]["role"], "M");
    assert_eq!(json["data"]["counts"]["participants"], 0);
}

#[tokio::test]
async fn test_logout_destroys_the_session() {
    let app = spawn_app().await;
    let cookie = login(&app, "admin", "admin123").await;

    let response = get_with(&app, &cookie, "/logout").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let response = get_with(&app, &cookie, "/participants").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers().get(header::LOCATION).unwrap(), "/login");
}

#[tokio::test]
async fn test_common_users_read_but_never_write() {
    let app = spawn_app().await;
    let cookie = login(&app, "user", "user123").await;

    let response = get_with(&app, &cookie, "/participants").await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = post_form(
        &app,
        &cookie,
        "/participants/save",
        "email=p@x.com&first_name=Pat&last_name=Lee",
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = get_with(&app, &cookie, "/participants/edit").await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = post_form(&app, &cookie, "/participants/delete/p@x.com", "").await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_participant_crud_roundtrip() {
    let app = spawn_app().await;
    let cookie = login(&app, "admin", "admin123").await;

    let response = post_form(
        &app,
        &cookie,
        "/participants/save",
        "email=maria@x.com&first_name=Maria&last_name=Lopez&city=Provo&state=UT",
    )
    .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        response.headers().get(header::LOCATION).unwrap(),
        "/participants"
    );

    let response = get_with(&app, &cookie, "/participants/edit/maria@x.com").await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["first_name"], "Maria");
    assert_eq!(json["data"]["city"], "Provo");
    assert_eq!(json["data"]["phone"], serde_json::Value::Null);

    // Re-key the record through the original-key marker
    let response = post_form(
        &app,
        &cookie,
        "/participants/save",
        "original_email=maria@x.com&email=maria@y.org&first_name=Maria&last_name=Lopez",
    )
    .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let response = get_with(&app, &cookie, "/participants/edit/maria@x.com").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = get_with(&app, &cookie, "/participants/edit/maria@y.org").await;
    assert_eq!(response.status(), StatusCode::OK);

    // Delete, then delete again: both succeed
    for _ in 0..2 {
        let response = post_form(&app, &cookie, "/participants/delete/maria@y.org", "").await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
    }

    let response = get_with(&app, &cookie, "/participants/edit/maria@y.org").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_donation_save_strips_currency_symbol() {
    let app = spawn_app().await;
    let cookie = login(&app, "admin", "admin123").await;

    let response = post_form(
        &app,
        &cookie,
        "/donations/save",
        "participant_email=d@x.com&donated_on=2024-03-01&amount=%2450.00",
    )
    .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let response = get_with(&app, &cookie, "/donations").await;
    let json = body_json(response).await;
    assert_eq!(json["data"][0]["amount"], 50.0);
    assert_eq!(json["data"][0]["participant_email"], "d@x.com");
}

#[tokio::test]
async fn test_donation_save_rejects_blank_date_and_bad_amount() {
    let app = spawn_app().await;
    let cookie = login(&app, "admin", "admin123").await;

    let response = post_form(
        &app,
        &cookie,
        "/donations/save",
        "participant_email=d@x.com&donated_on=&amount=10",
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = post_form(
        &app,
        &cookie,
        "/donations/save",
        "participant_email=d@x.com&donated_on=2024-03-01&amount=fifty",
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_milestone_edit_moves_the_composite_key() {
    let app = spawn_app().await;
    let cookie = login(&app, "admin", "admin123").await;

    let response = post_form(
        &app,
        &cookie,
        "/milestones/save",
        "participant_email=a@x.com&achieved_on=2024-01-01&title=First+class",
    )
    .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let response = post_form(
        &app,
        &cookie,
        "/milestones/save",
        "original_email=a@x.com&original_date=2024-01-01&participant_email=a@x.com&achieved_on=2024-02-01&title=First+class",
    )
    .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let response = get_with(&app, &cookie, "/milestones/edit/a@x.com/2024-01-01").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = get_with(&app, &cookie, "/milestones/edit/a@x.com/2024-02-01").await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["title"], "First class");
}

#[tokio::test]
async fn test_search_filters_across_columns() {
    let app = spawn_app().await;
    let cookie = login(&app, "admin", "admin123").await;

    for body in [
        "email=alice@x.com&first_name=Alice&last_name=Au&city=Provo",
        "email=bob@x.com&first_name=Bob&last_name=Baker&city=Orem",
    ] {
        let response = post_form(&app, &cookie, "/participants/save", body).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
    }

    // Case-insensitive match against a single column
    let response = get_with(&app, &cookie, "/participants?search=PROVO").await;
    let json = body_json(response).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 1);
    assert_eq!(json["data"][0]["email"], "alice@x.com");

    // Empty term returns the same set as the unfiltered list
    let response = get_with(&app, &cookie, "/participants?search=").await;
    let json = body_json(response).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 2);

    let response = get_with(&app, &cookie, "/participants").await;
    let json = body_json(response).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 2);

    // A term matching nothing returns an empty sequence
    let response = get_with(&app, &cookie, "/participants?search=zzzzz").await;
    let json = body_json(response).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_event_occurrence_needs_existing_template() {
    let app = spawn_app().await;
    let cookie = login(&app, "admin", "admin123").await;

    let response = post_form(
        &app,
        &cookie,
        "/events/occurrences/save",
        "template_name=Art+Night&starts_at=2024-06-23T10:00",
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = post_form(
        &app,
        &cookie,
        "/events/save",
        "name=Art+Night&event_type=Workshop&recurrence=weekly&default_capacity=25",
    )
    .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let response = post_form(
        &app,
        &cookie,
        "/events/occurrences/save",
        "template_name=Art+Night&starts_at=2024-06-23T10:00&location=Center",
    )
    .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    // Stored canonically, formatted only for display
    let response = get_with(&app, &cookie, "/events/occurrences").await;
    let json = body_json(response).await;
    assert_eq!(json["data"][0]["starts_at"], "2024-06-23 10:00");
    assert_eq!(json["data"][0]["starts_at_display"], "6/23/2024 10:00");
}

#[tokio::test]
async fn test_survey_blank_scores_store_as_null() {
    let app = spawn_app().await;
    let cookie = login(&app, "admin", "admin123").await;

    let response = post_form(
        &app,
        &cookie,
        "/surveys/save",
        "participant_email=s@x.com&event_name=Art+Night&occurrence_start=2024-06-23T10:00&satisfaction_score=4.5&usefulness_score=&overall_score=5",
    )
    .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let response = get_with(&app, &cookie, "/surveys").await;
    let json = body_json(response).await;
    let survey = &json["data"][0];
    assert_eq!(survey["satisfaction_score"], 4.5);
    assert_eq!(survey["usefulness_score"], serde_json::Value::Null);
    assert_eq!(survey["instructor_score"], serde_json::Value::Null);
    assert_eq!(survey["overall_score"], 5.0);
    assert_eq!(survey["occurrence_start"], "2024-06-23 10:00");
    assert_eq!(survey["occurrence_start_display"], "6/23/2024 10:00");
}

#[tokio::test]
async fn test_root_redirects_by_session_state() {
    let app = spawn_app().await;

    let response = app
        .clone()
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers().get(header::LOCATION).unwrap(), "/login");

    let cookie = login(&app, "admin", "admin123").await;
    let response = get_with(&app, &cookie, "/").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        response.headers().get(header::LOCATION).unwrap(),
        "/dashboard"
    );
}

#[tokio::test]
async fn test_teapot() {
    let app = spawn_app().await;

    let response = app
        .clone()
        .oneshot(Request::builder().uri("/tea").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::IM_A_TEAPOT);
}
