use axum::{
    Json, Router,
    http::StatusCode,
    routing::{get, post},
};
use box_packer::catalog::CATALOG;
use box_packer::types::{BoxTemplate, PackedBox, deserialize_u32_from_number};
use box_packer::{PackError, Parcel, pack};
use serde::{Deserialize, Serialize};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

#[derive(Deserialize, Serialize)]
struct PackRequest {
    items: Vec<ItemRequest>,
}

#[derive(Deserialize, Serialize)]
struct ItemRequest {
    #[serde(flatten)]
    parcel: Parcel,
    #[serde(default = "default_qty", deserialize_with = "deserialize_u32_from_number")]
    qty: u32,
}

fn default_qty() -> u32 {
    1
}

#[derive(Serialize)]
struct PackResponse<'a> {
    boxes: Vec<PackedBox<'a, Parcel>>,
    box_count: usize,
}

fn validate(req: PackRequest) -> Result<Vec<Parcel>, String> {
    let mut parcels = Vec::new();
    for item in req.items {
        let p = &item.parcel;
        if p.width == 0 || p.height == 0 || p.depth == 0 {
            return Err(format!("item {} has a zero dimension", p));
        }
        if item.qty == 0 {
            return Err(format!("item {} has zero quantity", p));
        }
        parcels.extend(std::iter::repeat_n(item.parcel, item.qty as usize));
    }
    Ok(parcels)
}

fn pack_response(parcels: &[Parcel]) -> Result<serde_json::Value, (StatusCode, String)> {
    let boxes = pack(parcels).map_err(|e| match e {
        PackError::ItemTooBig { .. } => (StatusCode::UNPROCESSABLE_ENTITY, e.to_string()),
    })?;
    let response = PackResponse {
        box_count: boxes.len(),
        boxes,
    };
    serde_json::to_value(&response).map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))
}

async fn pack_items(
    Json(req): Json<PackRequest>,
) -> Result<Json<serde_json::Value>, (StatusCode, String)> {
    tracing::info!(
        body = serde_json::to_string(&req).unwrap_or_default(),
        "POST /pack"
    );

    let parcels = validate(req).map_err(|e| (StatusCode::BAD_REQUEST, e))?;
    let response = pack_response(&parcels).inspect_err(|(status, msg)| {
        tracing::warn!(status = status.as_u16(), error = %msg, "pack failed");
    })?;

    Ok(Json(response))
}

async fn catalog() -> Json<&'static [BoxTemplate]> {
    Json(CATALOG.as_slice())
}

#[tokio::main]
async fn main() {
    let _sentry = std::env::var("SENTRY_DSN").ok().map(|dsn| {
        sentry::init((
            dsn,
            sentry::ClientOptions {
                release: sentry::release_name!(),
                ..Default::default()
            },
        ))
    });

    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open("development.log")
        .expect("failed to open development.log");

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_target(false)
        .with_ansi(false)
        .with_max_level(Level::INFO)
        .init();

    let port = std::env::var("PORT").unwrap_or_else(|_| "3001".to_string());
    let addr = format!("0.0.0.0:{port}");

    let app = Router::new()
        .route("/up", get(|| async { "ok" }))
        .route("/catalog", get(catalog))
        .route("/pack", post(pack_items))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        );

    let listener = tokio::net::TcpListener::bind(&addr).await.unwrap();
    eprintln!("Listening on {addr}");
    axum::serve(listener, app).await.unwrap();
}
