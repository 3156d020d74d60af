//! Bundled OpenAPI document and the Swagger UI viewer

use std::sync::Arc;

use anyhow::Context;
use axum::{
    extract::Path,
    http::header,
    response::{Html, IntoResponse, Response},
    routing::get,
    Json, Router,
};
use jobtrack_common::Error;
use serde_json::Value;
use utoipa_swagger_ui::Config;

/// Mount point of the documentation viewer
pub const DOCS_PATH: &str = "/api-docs";

/// Path the raw document is served from, as JSON
pub const OPENAPI_JSON_PATH: &str = "/api-docs/openapi.json";

const OPENAPI_YAML: &str = include_str!("../docs/openapi.yaml");

/// Viewer assets resolve against this base, so the index renders the same
/// with or without the trailing slash.
const ASSET_BASE: &str = r#"<base href="/api-docs/">"#;

/// Parse the bundled document. Done once, at composition time.
pub fn load_openapi() -> anyhow::Result<Value> {
    serde_yaml::from_str(OPENAPI_YAML).context("bundled OpenAPI document is not valid YAML")
}

/// Routes serving the viewer, its assets and the document
pub fn router(openapi: Value) -> Router {
    let config = Arc::new(Config::new([OPENAPI_JSON_PATH]));
    let openapi = Arc::new(openapi);

    let index_handler = {
        let config = config.clone();
        move || {
            let config = config.clone();
            async move { index(config) }
        }
    };

    Router::new()
        .route(
            OPENAPI_JSON_PATH,
            get(move || {
                let openapi = openapi.clone();
                async move { Json(openapi.as_ref().clone()) }
            }),
        )
        .route(DOCS_PATH, get(index_handler.clone()))
        .route("/api-docs/", get(index_handler))
        .route(
            "/api-docs/{*asset}",
            get(move |Path(asset): Path<String>| {
                let config = config.clone();
                async move { asset_file(&asset, config) }
            }),
        )
}

fn index(config: Arc<Config<'static>>) -> Result<Html<String>, Error> {
    let page = swagger_file("index.html", config)?
        .ok_or_else(|| Error::Internal("viewer index is missing".to_string()))?;
    let page = String::from_utf8_lossy(&page.1);
    Ok(Html(with_asset_base(&page)))
}

fn asset_file(asset: &str, config: Arc<Config<'static>>) -> Result<Response, Error> {
    if asset.is_empty() || asset == "index.html" {
        return Ok(index(config).into_response());
    }
    let (content_type, bytes) = swagger_file(asset, config)?
        .ok_or_else(|| Error::NotFound("Route does not exist".to_string()))?;
    Ok(([(header::CONTENT_TYPE, content_type)], bytes).into_response())
}

fn swagger_file(
    path: &str,
    config: Arc<Config<'static>>,
) -> Result<Option<(String, Vec<u8>)>, Error> {
    match utoipa_swagger_ui::serve(path, config) {
        Ok(file) => Ok(file.map(|file| (file.content_type, file.bytes.into_owned()))),
        Err(e) => Err(Error::Internal(format!("failed to serve viewer asset: {}", e))),
    }
}

fn with_asset_base(page: &str) -> String {
    match page.find("<head>") {
        Some(at) => {
            let split = at + "<head>".len();
            format!("{}{}{}", &page[..split], ASSET_BASE, &page[split..])
        }
        None => format!("{}{}", ASSET_BASE, page),
    }
}
