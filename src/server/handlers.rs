use axum::{
    extract::{Query, State},
    http::header,
    response::{Html, Json, Response},
};
use rust_embed::RustEmbed;
use serde::Deserialize;

use crate::lookup::{lookup, PlaceInfo};

use super::state::AppState;

#[derive(RustEmbed)]
#[folder = "frontend/"]
struct Asset;

#[derive(Debug, Deserialize)]
pub struct InfoQuery {
    pub city: Option<String>,
    pub country: Option<String>,
}

/// GET /api/info?city=&country= - the place-info fallback chain.
pub async fn get_place_info(
    State(state): State<AppState>,
    Query(query): Query<InfoQuery>,
) -> Json<PlaceInfo> {
    let info = lookup(
        &state.dataset,
        &state.wiki,
        query.city.as_deref(),
        query.country.as_deref(),
    )
    .await;

    tracing::info!(kind = ?info.kind, name = %info.name, "place info lookup");
    Json(info)
}

/// GET /api/config - bootstrap values the frontend needs before rendering.
pub async fn get_frontend_config(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "title": "WanderPixie",
        "tile_key": state.settings.tile_key(),
    }))
}

pub async fn index_html() -> Html<Vec<u8>> {
    Html(Asset::get("index.html").unwrap().data.into_owned())
}

pub async fn style_css() -> Response {
    let content = Asset::get("style.css").unwrap().data;
    Response::builder()
        .header(header::CONTENT_TYPE, "text/css")
        .body(content.into_owned().into())
        .unwrap()
}

pub async fn script_js() -> Response {
    let content = Asset::get("script.js").unwrap().data;
    Response::builder()
        .header(header::CONTENT_TYPE, "application/javascript")
        .body(content.into_owned().into())
        .unwrap()
}
