use log::info;
use std::convert::Infallible;
use std::net::SocketAddr;
use std::path::PathBuf;
use warp::http::StatusCode;
use warp::Filter;

use crate::record::{self, ReadError};

const INDEX_HTML: &str = include_str!("webui/index.html");

/// Start the result browser over the given output directory.
pub async fn start_server(addr: SocketAddr, output_dir: PathBuf) {
    info!("serving results from {:?} on http://{}", output_dir, addr);
    warp::serve(routes(output_dir)).run(addr).await;
}

/// All routes: the HTML page, the listing API, and the fetch API.
pub fn routes(
    output_dir: PathBuf,
) -> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone {
    index_endpoint()
        .or(files_endpoint(output_dir.clone()))
        .or(file_endpoint(output_dir))
}

/// GET / - browsable page listing runs
fn index_endpoint() -> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone {
    warp::path::end().and(warp::get()).map(|| warp::reply::html(INDEX_HTML))
}

/// GET /api/files - JSON array of run summaries, newest first
fn files_endpoint(
    output_dir: PathBuf,
) -> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone {
    warp::path!("api" / "files")
        .and(warp::get())
        .and(with_dir(output_dir))
        .and_then(list_files)
}

/// GET /api/file/<filename> - one full run record
fn file_endpoint(
    output_dir: PathBuf,
) -> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone {
    warp::path!("api" / "file" / String)
        .and(warp::get())
        .and(with_dir(output_dir))
        .and_then(fetch_file)
}

fn with_dir(
    dir: PathBuf,
) -> impl Filter<Extract = (PathBuf,), Error = Infallible> + Clone {
    warp::any().map(move || dir.clone())
}

async fn list_files(dir: PathBuf) -> Result<impl warp::Reply, Infallible> {
    let summaries = record::list_records(&dir);
    Ok(warp::reply::json(&summaries))
}

async fn fetch_file(filename: String, dir: PathBuf) -> Result<impl warp::Reply, Infallible> {
    let (body, status) = match record::read_record(&dir, &filename) {
        Ok(run) => (serde_json::to_value(&run).unwrap_or_default(), StatusCode::OK),
        Err(e @ ReadError::NotFound(_)) => (
            serde_json::json!({"error": e.to_string()}),
            StatusCode::NOT_FOUND,
        ),
        Err(e) => (
            serde_json::json!({"error": e.to_string()}),
            StatusCode::INTERNAL_SERVER_ERROR,
        ),
    };

    Ok(warp::reply::with_status(warp::reply::json(&body), status))
}
