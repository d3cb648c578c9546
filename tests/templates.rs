use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
    response::Html,
    routing::get,
};
use axum_errhandler::{
    CaughtError, Config, ErrorHandlerLayer, HttpError, TemplateContext, TemplateEngine,
    TemplateError,
};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

const BROWSER_ACCEPT: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,image/apng,*/*;q=0.8,application/signed-exchange;v=b3;q=0.9";

#[derive(Debug, thiserror::Error)]
#[error("bad thing happens")]
struct BadThing;

async fn panics() -> &'static str {
    panic!("i'm panic")
}

fn new_app(config: Config) -> Router {
    Router::new()
        .route("/user", get(|| async { Html("John<br />Doe") }))
        .route("/err", get(|| async { Err::<(), _>(CaughtError::other(BadThing)) }))
        .route(
            "/400",
            get(|| async {
                Err::<(), _>(
                    HttpError::new(400, "Bad request").with_data(json!({ "Field": "Not empty" })),
                )
            }),
        )
        .route("/panic", get(panics))
        .layer(ErrorHandlerLayer::new(config))
}

fn with_templates(use_template: bool) -> Router {
    new_app(Config::builder().use_template(use_template).build())
}

async fn browse(app: Router, path: &str) -> (StatusCode, Option<String>, String) {
    let request = Request::get(path)
        .header(header::ACCEPT, BROWSER_ACCEPT)
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .map(|v| v.to_str().unwrap().to_string());
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, content_type, String::from_utf8(bytes.to_vec()).unwrap())
}

#[tokio::test]
async fn test_view_normal_condition() {
    let (status, _, body) = browse(with_templates(false), "/user").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "John<br />Doe");
}

#[tokio::test]
async fn test_view_without_templates_answers_json() {
    let (status, content_type, body) = browse(with_templates(false), "/err").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(content_type.as_deref(), Some("application/json"));
    assert_eq!(
        serde_json::from_str::<Value>(&body).unwrap(),
        json!({ "message": "bad thing happens", "error": "bad thing happens" })
    );

    let (status, _, body) = browse(with_templates(false), "/400").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        serde_json::from_str::<Value>(&body).unwrap(),
        json!({ "message": "Bad request", "error": { "Field": "Not empty" } })
    );

    let (status, _, body) = browse(with_templates(false), "/panic").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        serde_json::from_str::<Value>(&body).unwrap(),
        json!({ "message": "i'm panic", "error": "i'm panic" })
    );
}

#[tokio::test]
async fn test_view_template() {
    let (status, content_type, body) = browse(with_templates(true), "/err").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(content_type.as_deref(), Some("text/html; charset=utf-8"));
    assert_eq!(body, "bad thing happens<br />bad thing happens");

    let (status, _, body) = browse(with_templates(true), "/400").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, "Bad request<br />Not empty");

    let (status, _, body) = browse(with_templates(true), "/panic").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, "i&#39;m panic<br />i&#39;m panic");
}

#[tokio::test]
async fn test_template_ignored_for_non_html_clients() {
    let request = Request::get("/400")
        .header(header::ACCEPT, "*/*")
        .body(Body::empty())
        .unwrap();
    let response = with_templates(true).oneshot(request).await.unwrap();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(&bytes[..], b"Bad request");
}

/// Renders the context as JSON so tests can see exactly what was passed in
struct Recording;

impl TemplateEngine for Recording {
    fn render(&self, name: &str, context: &TemplateContext) -> Result<String, TemplateError> {
        let context = serde_json::to_value(context).map_err(|e| TemplateError::render(name, e))?;
        Ok(json!({ "name": name, "context": context }).to_string())
    }
}

#[tokio::test]
async fn test_custom_engine_receives_context() {
    let app = new_app(
        Config::builder()
            .use_template(true)
            .templates(Recording)
            .template_name("errors/page")
            .build(),
    );

    let (status, _, body) = browse(app, "/400").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let rendered: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(
        rendered,
        json!({
            "name": "errors/page",
            "context": { "Message": "Bad request", "Data": { "Field": "Not empty" } }
        })
    );
}

#[tokio::test]
async fn test_missing_template_falls_back_to_plain_text() {
    // the built-in page only knows the "error" template
    let app = new_app(
        Config::builder()
            .use_template(true)
            .template_name("missing")
            .build(),
    );

    let (status, content_type, body) = browse(app, "/400").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(content_type.as_deref(), Some("text/plain; charset=utf-8"));
    assert_eq!(body, "Bad request");
}
