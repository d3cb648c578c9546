//! Demo server: JSON API under `/api`, HTML pages elsewhere.
//!
//! ```sh
//! cargo run --example server
//! curl -H 'Accept: application/json' localhost:3000/api/err-403
//! curl -H 'Accept: text/html' localhost:3000/custom
//! ```

use askama::Template;
use axum::{
    Json, Router,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
};
use axum_errhandler::{CaughtError, Config, ErrorHandlerLayer, Fallback, HttpError, RequestHead};
use serde::Serialize;
use serde_json::{Value, json};
use tower_http::trace::TraceLayer;

#[derive(Template)]
#[template(
    source = "<h1>{{ status }}</h1><p>{{ message }}</p><p>{{ reason }}</p><pre>{{ data }}</pre>",
    ext = "html"
)]
struct UnauthorizedPage<'a> {
    status: u16,
    message: &'a str,
    reason: &'a str,
    data: String,
}

#[derive(Serialize)]
struct Person {
    #[serde(rename = "FirstName")]
    first_name: &'static str,
    #[serde(rename = "LastName")]
    last_name: &'static str,
}

fn data() -> Value {
    json!({ "firstName": "John", "lastName": "Doe" })
}

async fn index() -> Html<String> {
    Html(format!("<p>{}</p>", data()))
}

async fn api_index() -> Json<Value> {
    Json(data())
}

async fn api_panic() -> Json<Value> {
    panic!("winter is coming to the api")
}

async fn web_panic() -> Html<&'static str> {
    panic!("winter is coming to the web")
}

async fn forbidden() -> Result<(), HttpError> {
    Err(HttpError::new(403, "Cannot access this"))
}

async fn custom() -> Result<(), HttpError> {
    Err(HttpError::new(401, "unauthorized").with_data(Person {
        first_name: "John",
        last_name: "Wick",
    }))
}

fn handle_error(_head: &RequestHead, error: &CaughtError, fallback: Fallback) -> Option<Response> {
    let CaughtError::Http(error) = error else {
        return Some(fallback.respond());
    };
    if error.status_code() != StatusCode::UNAUTHORIZED {
        return Some(fallback.respond());
    }

    let page = UnauthorizedPage {
        status: error.status_code().as_u16(),
        message: error.message(),
        reason: "Please login first",
        data: error.data().map(Value::to_string).unwrap_or_default(),
    };
    match page.render() {
        Ok(html) => Some((error.status_code(), Html(html)).into_response()),
        Err(err) => {
            tracing::error!(error = %err, "Failed to render unauthorized page");
            Some(fallback.respond())
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "axum_errhandler=debug,tower_http=debug,info".into());
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let config = Config::builder()
        .use_template(true)
        .log(true)
        .handler(handle_error)
        .build();

    let api = Router::new()
        .route("/", get(api_index))
        .route("/panic", get(api_panic))
        .route("/err-403", get(forbidden));

    let app = Router::new()
        .nest("/api", api)
        .route("/", get(index))
        .route("/panic", get(web_panic))
        .route("/err-403", get(forbidden))
        .route("/custom", get(custom))
        .layer(ErrorHandlerLayer::new(config))
        .layer(TraceLayer::new_for_http());

    let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await?;
    tracing::info!("Listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}
