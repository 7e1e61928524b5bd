use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use recs_api::build_router;
use recs_app::infrastructure::db::{create_connection, run_migrations, UserRepository};
use recs_app::{AppConfig, AppContext, Clients};
use serde_json::Value;
use tower::ServiceExt;

async fn test_context() -> AppContext {
    let db = create_connection("sqlite::memory:").await.unwrap();
    run_migrations(&db).await.unwrap();
    AppContext::new(AppConfig::for_tests(), db, Clients::offline())
}

async fn send(app: &Router, request: Request<Body>) -> Response {
    app.clone().oneshot(request).await.unwrap()
}

fn get(uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).unwrap()
}

fn post_form(uri: &str, body: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

async fn body_text(response: Response) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

async fn body_json(response: Response) -> Value {
    serde_json::from_str(&body_text(response).await).unwrap()
}

fn location(response: &Response) -> &str {
    response.headers()[header::LOCATION].to_str().unwrap()
}

fn session_cookie(response: &Response) -> String {
    let raw = response.headers()[header::SET_COOKIE].to_str().unwrap();
    raw.split(';').next().unwrap().to_string()
}

#[tokio::test]
async fn test_health_reports_database() {
    let app = build_router(test_context().await);
    let response = send(&app, get("/health", None)).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
    assert_eq!(json["database"], "ok");
}

#[tokio::test]
async fn test_static_pages_render() {
    let app = build_router(test_context().await);

    let index = send(&app, get("/", None)).await;
    assert_eq!(index.status(), StatusCode::OK);
    assert!(body_text(index).await.contains("action=\"/create-trip\""));

    let how = send(&app, get("/how-it-works", None)).await;
    assert_eq!(how.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_unknown_paths_and_trips_are_404() {
    let app = build_router(test_context().await);

    assert_eq!(send(&app, get("/nope", None)).await.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        send(&app, get("/trip/missing-trip", None)).await.status(),
        StatusCode::NOT_FOUND
    );
}

#[tokio::test]
async fn test_destination_search_validates_query_and_source() {
    let ctx = test_context().await;
    ctx.maintenance.seed().await.unwrap();
    let app = build_router(ctx);

    let short = send(&app, get("/api/destinations/database?query=a", None)).await;
    assert_eq!(short.status(), StatusCode::BAD_REQUEST);
    let json = body_json(short).await;
    assert_eq!(json["status"], "error");
    assert_eq!(json["results"], serde_json::json!([]));

    let unknown = send(&app, get("/api/destinations/bing?query=Lisbon", None)).await;
    assert_eq!(unknown.status(), StatusCode::NOT_FOUND);

    let found = send(&app, get("/api/destinations/database?query=lisb", None)).await;
    assert_eq!(found.status(), StatusCode::OK);
    let json = body_json(found).await;
    assert_eq!(json["status"], "success");
    assert_eq!(json["results"][0]["name"], "Lisbon");
    assert_eq!(json["results"][0]["source"], "database");
}

#[tokio::test]
async fn test_admin_dashboard_is_available_in_debug() {
    let app = build_router(test_context().await);
    let response = send(&app, get("/admin", None)).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_empty_destination_goes_back_home() {
    let app = build_router(test_context().await);
    let response = send(&app, post_form("/create-trip", "destination=+", None)).await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/");
}

#[tokio::test]
async fn test_my_trips_requires_login() {
    let app = build_router(test_context().await);
    let response = send(&app, get("/my-trips", None)).await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert!(location(&response).starts_with("/auth/login?next="));
}

#[tokio::test]
async fn test_wizard_creates_trip_and_signs_in() {
    let app = build_router(test_context().await);

    let step_one = send(&app, post_form("/create-trip", "destination=Lisbon", None)).await;
    assert_eq!(location(&step_one), "/user-info");
    let cookie = session_cookie(&step_one);

    let form = send(&app, get("/user-info", Some(&cookie))).await;
    assert_eq!(form.status(), StatusCode::OK);
    assert!(body_text(form).await.contains("Lisbon"));

    let done = send(
        &app,
        post_form("/complete-trip", "name=Ana&email=ana%40example.com", Some(&cookie)),
    )
    .await;
    assert_eq!(done.status(), StatusCode::SEE_OTHER);
    let trip_path = location(&done).to_string();
    assert!(trip_path.starts_with("/trip/lisbon-"));
    // Signing in issues a fresh session id.
    let cookie = session_cookie(&done);

    let trips = send(&app, get("/my-trips", Some(&cookie))).await;
    assert_eq!(trips.status(), StatusCode::OK);
    assert!(body_text(trips).await.contains(&trip_path));

    let page = send(&app, get(&trip_path, Some(&cookie))).await;
    assert_eq!(page.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_login_link_signs_in_once() {
    let app = build_router(test_context().await);

    let requested = send(&app, post_form("/auth/login", "email=bo%40example.com", None)).await;
    assert_eq!(requested.status(), StatusCode::OK);
    let page = body_text(requested).await;

    let prefix = "http://recs.test/auth/verify/";
    let start = page.find(prefix).unwrap() + prefix.len();
    let token: String = page[start..]
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric())
        .collect();
    let verify_path = format!("/auth/verify/{token}");

    let verified = send(&app, get(&verify_path, None)).await;
    assert_eq!(verified.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&verified), "/my-trips");

    let reused = send(&app, get(&verify_path, None)).await;
    assert_eq!(reused.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&reused), "/auth/login");
}

#[tokio::test]
async fn test_confirmed_recommendations_are_saved() {
    let ctx = test_context().await;
    let owner = UserRepository::new(ctx.db.clone())
        .create("owner@example.com", Some("Owner"))
        .await
        .unwrap();
    let trip = ctx
        .create_trip
        .create_trip_for_user(&owner, "Athens", "Owner")
        .await
        .unwrap();
    let app = build_router(ctx.clone());

    let body = "recommendations%5B%5D=Ancient+Agora&place_types%5B%5D=Historical+Site\
&website_urls%5B%5D=&descriptions%5B%5D=Go+early&recommender_name=Bo";
    let response = send(&app, post_form(&format!("/trip/{}/save", trip.slug), body, None)).await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), format!("/trip/{}/thank-you", trip.slug));

    let saved = ctx.manage_trips.recommendations_for(&trip).await.unwrap();
    assert_eq!(saved.len(), 1);
    assert_eq!(saved[0].activity_name, "Ancient Agora");
    assert_eq!(saved[0].author_name.as_deref(), Some("Bo"));
}

#[tokio::test]
async fn test_save_email_answers_json_to_xhr() {
    let ctx = test_context().await;
    let owner = UserRepository::new(ctx.db.clone())
        .create("owner@example.com", Some("Owner"))
        .await
        .unwrap();
    let trip = ctx
        .create_trip
        .create_trip_for_user(&owner, "Rome", "Owner")
        .await
        .unwrap();
    let app = build_router(ctx);
    let uri = format!("/trip/{}/save-email", trip.slug);

    let mut ok = post_form(&uri, "email=fan%40example.com", None);
    ok.headers_mut()
        .insert("x-requested-with", "XMLHttpRequest".parse().unwrap());
    let response = send(&app, ok).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["success"], true);

    let mut bad = post_form(&uri, "email=", None);
    bad.headers_mut()
        .insert("x-requested-with", "XMLHttpRequest".parse().unwrap());
    let response = send(&app, bad).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["success"], false);
    assert_eq!(json["error"], "Please provide an email address");
}

#[tokio::test]
async fn test_transcribe_without_audio_is_rejected() {
    let app = build_router(test_context().await);
    let boundary = "XBOUNDARY";
    let body = format!(
        "--{boundary}\r\nContent-Disposition: form-data; name=\"destination\"\r\n\r\nAthens\r\n--{boundary}--\r\n"
    );
    let request = Request::builder()
        .method("POST")
        .uri("/api/transcribe")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={boundary}"),
        )
        .body(Body::from(body))
        .unwrap();

    let response = send(&app, request).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["status"], "error");
}

#[tokio::test]
async fn test_transcribe_accepts_recordings_over_two_megabytes() {
    let app = build_router(test_context().await);
    let boundary = "XBOUNDARY";
    let mut body = format!(
        "--{boundary}\r\nContent-Disposition: form-data; name=\"destination\"\r\n\r\nAthens\r\n\
         --{boundary}\r\nContent-Disposition: form-data; name=\"audio\"; filename=\"memo.webm\"\r\n\
         Content-Type: audio/webm\r\n\r\n"
    )
    .into_bytes();
    body.extend(std::iter::repeat(0x1a_u8).take(3 * 1024 * 1024));
    body.extend(format!("\r\n--{boundary}--\r\n").into_bytes());

    let request = Request::builder()
        .method("POST")
        .uri("/api/transcribe")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={boundary}"),
        )
        .body(Body::from(body))
        .unwrap();

    // The offline context has no transcription key, so reaching that check means the
    // whole upload was read.
    let response = send(&app, request).await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_json(response).await["error"], "API key not configured");
}
