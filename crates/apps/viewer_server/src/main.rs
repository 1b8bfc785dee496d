use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use axum::body::Body;
use axum::extract::{Path as AxumPath, State};
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use clap::Parser;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use formats::{DataDir, TileKind, ENTITIES_FILE_NAME, INFO_FILE_NAME};

/// Serves a generated map directory (viewer page plus `data/`) for local preview.
#[derive(Debug, Parser)]
#[command(name = "viewer_server")]
struct Args {
    /// Output directory containing the viewer page and its `data/` folder.
    #[arg(long, env = "VIEWER_ROOT", default_value = ".")]
    root: PathBuf,

    /// Address to listen on.
    #[arg(long, env = "VIEWER_ADDR", default_value = "127.0.0.1:8080")]
    addr: SocketAddr,
}

#[derive(Clone)]
struct AppState {
    data_root: PathBuf,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let data_root = args.root.join("data");
    log_data_summary(&data_root);

    let state = AppState { data_root };

    let app = Router::new()
        .route("/healthz", get(healthz))
        .route("/data/info.json", get(get_info))
        .route("/data/entities.json", get(get_entities))
        .route("/data/:layer/:level/:file", get(get_tile))
        .fallback_service(ServeDir::new(&args.root))
        .layer(CorsLayer::new().allow_origin(Any))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let listener = match tokio::net::TcpListener::bind(args.addr).await {
        Ok(listener) => listener,
        Err(err) => {
            error!("failed to bind {}: {err}", args.addr);
            std::process::exit(1);
        }
    };

    info!(
        "viewer server listening on http://{} (root {})",
        args.addr,
        args.root.display()
    );
    if let Err(err) = axum::serve(listener, app).await {
        error!("server error: {err}");
        std::process::exit(1);
    }
}

fn log_data_summary(data_root: &Path) {
    match DataDir::load(data_root) {
        Ok(dir) => {
            let info = dir.info();
            info!(
                "loaded {}: {} mip levels, {} level-0 tiles, spawn ({}, {})",
                data_root.join(INFO_FILE_NAME).display(),
                info.level_count(),
                info.region_count(0),
                info.spawn.x,
                info.spawn.z
            );
            match dir.load_entities() {
                Ok(entities) => info!("{} signs", entities.signs.len()),
                Err(err) => warn!("{err}"),
            }
        }
        Err(err) => warn!("viewer data not loadable yet: {err}"),
    }
}

async fn healthz() -> Response {
    (StatusCode::OK, "ok").into_response()
}

async fn get_info(State(state): State<AppState>) -> Response {
    let path = state.data_root.join(INFO_FILE_NAME);
    serve_file(&path, "application/json").await
}

async fn get_entities(State(state): State<AppState>) -> Response {
    let path = state.data_root.join(ENTITIES_FILE_NAME);
    serve_file(&path, "application/json").await
}

async fn get_tile(
    State(state): State<AppState>,
    AxumPath((layer, level, file)): AxumPath<(String, usize, String)>,
) -> Response {
    match tile_path(&state.data_root, &layer, level, &file) {
        Some(path) => serve_file(&path, "image/png").await,
        None => (StatusCode::NOT_FOUND, "not found").into_response(),
    }
}

/// Maps a tile request onto the data directory, rejecting anything that is
/// not a well-formed tile name so requests cannot escape the root.
fn tile_path(data_root: &Path, layer: &str, level: usize, file: &str) -> Option<PathBuf> {
    let kind = TileKind::from_str(layer).filter(|k| k.dir_name() == layer)?;
    let coords = formats::parse_tile_file_name(file)?;
    Some(data_root.join(formats::tile_relative_path(kind, level, coords)))
}

async fn serve_file(path: &Path, content_type: &str) -> Response {
    match tokio::fs::read(path).await {
        Ok(data) => {
            let mut headers = HeaderMap::new();
            headers.insert(
                http::header::CONTENT_TYPE,
                HeaderValue::from_str(content_type)
                    .unwrap_or_else(|_| HeaderValue::from_static("application/octet-stream")),
            );
            (StatusCode::OK, headers, Body::from(data)).into_response()
        }
        Err(err) => {
            warn!("file read failed: {path:?} -> {err}");
            (StatusCode::NOT_FOUND, "not found").into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tile_requests_map_to_generator_layout() {
        let root = Path::new("/srv/world/data");
        assert_eq!(
            tile_path(root, "map", 2, "r.-3.4.png"),
            Some(root.join("map/2/r.-3.4.png"))
        );
        assert_eq!(
            tile_path(root, "light", 0, "r.0.0.png"),
            Some(root.join("light/0/r.0.0.png"))
        );
    }

    #[test]
    fn malformed_tile_requests_are_rejected() {
        let root = Path::new("/srv/world/data");
        assert_eq!(tile_path(root, "terrain", 0, "r.0.0.png"), None);
        assert_eq!(tile_path(root, "MAP", 0, "r.0.0.png"), None);
        assert_eq!(tile_path(root, "map", 0, "..%2Finfo.json"), None);
        assert_eq!(tile_path(root, "map", 0, "r.0.0.png.bak"), None);
    }

    #[test]
    fn explicit_args_override_env_and_defaults() {
        let args = Args::try_parse_from(["viewer_server", "--root", "out", "--addr", "0.0.0.0:9000"])
            .expect("parse args");
        assert_eq!(args.root, PathBuf::from("out"));
        assert_eq!(args.addr.port(), 9000);
    }

    fn find_arg<'a>(cmd: &'a clap::Command, id: &str) -> &'a clap::Arg {
        cmd.get_arguments()
            .find(|a| a.get_id() == id)
            .unwrap_or_else(|| panic!("missing arg {id}"))
    }

    fn defaults(arg: &clap::Arg) -> Vec<Option<&str>> {
        arg.get_default_values().iter().map(|v| v.to_str()).collect()
    }

    #[test]
    fn args_declare_env_fallbacks_and_defaults() {
        use clap::CommandFactory;
        use std::ffi::OsStr;

        let cmd = Args::command();

        let root = find_arg(&cmd, "root");
        assert_eq!(root.get_env(), Some(OsStr::new("VIEWER_ROOT")));
        assert_eq!(defaults(root), [Some(".")]);

        let addr = find_arg(&cmd, "addr");
        assert_eq!(addr.get_env(), Some(OsStr::new("VIEWER_ADDR")));
        assert_eq!(defaults(addr), [Some("127.0.0.1:8080")]);
    }
}
