//! HTTP CRUD API over squares and polygons.
//!
//! Creating a square evaluates it against every stored polygon and returns it with the
//! intersected polygon ids filled in.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use log::{error, info};
use serde_json::json;
use tokio::sync::Mutex;

use shapes_core::{
    MemoryRepo, Polygon, PolygonLister, PolygonService, ShapeError, ShapeId, Square, SquareService,
};

use crate::snapshot::{self, Snapshot};

pub type Polygons = PolygonService<Arc<MemoryRepo<Polygon>>>;
pub type Squares = SquareService<Arc<MemoryRepo<Square>>, Arc<Polygons>>;

/// Server configuration
#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub port: u16,
    /// Snapshot file; loaded at startup and rewritten after every change.
    pub data: Option<PathBuf>,
}

pub struct AppState {
    pub polygons: Arc<Polygons>,
    pub squares: Squares,
    pub data: Option<PathBuf>,
    /// Held from reading the stores until the snapshot file is replaced.
    snapshot_writes: Mutex<()>,
}

impl AppState {
    pub fn new(snapshot: Snapshot, data: Option<PathBuf>) -> Result<Self, ShapeError> {
        let load = |e| ShapeError::persistence("failed to load snapshot", e);
        let polygons = Arc::new(PolygonService::new(Arc::new(MemoryRepo::from_items(snapshot.polygons).map_err(load)?)));
        let squares = SquareService::new(Arc::new(MemoryRepo::from_items(snapshot.squares).map_err(load)?), polygons.clone());
        Ok(AppState { polygons, squares, data, snapshot_writes: Mutex::new(()) })
    }

    pub fn snapshot(&self) -> Result<Snapshot, ShapeError> {
        Ok(Snapshot {
            squares: self.squares.list()?,
            polygons: self.polygons.list()?,
        })
    }

    /// Rewrite the snapshot file, if there is one.
    async fn persist(&self) -> Result<(), ApiError> {
        let Some(path) = self.data.clone() else {
            return Ok(());
        };
        let _guard = self.snapshot_writes.lock().await;
        let snapshot = self.snapshot()?;
        tokio::task::spawn_blocking(move || snapshot::save(&path, &snapshot))
            .await
            .map_err(|e| ApiError::internal(format!("snapshot task failed: {}", e)))?
            .map_err(|e| ApiError::internal(format!("failed to write snapshot: {:#}", e)))
    }
}

/// Error body returned by every handler: `{"error": "<message>"}`.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    fn internal(message: String) -> Self {
        ApiError { status: StatusCode::INTERNAL_SERVER_ERROR, message }
    }
}

impl From<ShapeError> for ApiError {
    fn from(e: ShapeError) -> Self {
        let status = match e {
            ShapeError::CoordinateFormat(_) | ShapeError::MissingId | ShapeError::InvalidLogLevel(_) => {
                StatusCode::BAD_REQUEST
            }
            ShapeError::NotFound(_) => StatusCode::NOT_FOUND,
            ShapeError::Persistence(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        ApiError { status, message: e.to_string() }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            error!("{}", self.message);
        }
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

type ApiResult<T> = Result<T, ApiError>;

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/squares", get(list_squares).post(create_square))
        .route("/squares/:id", get(get_square).put(update_square).delete(delete_square))
        .route("/polygons", get(list_polygons).post(create_polygon))
        .route("/polygons/:id", get(get_polygon).put(update_polygon).delete(delete_polygon))
        .with_state(state)
}

/// Run the HTTP server
pub async fn run_server(config: ServerConfig) -> anyhow::Result<()> {
    let snapshot = match &config.data {
        Some(path) => snapshot::load(path)?,
        None => Snapshot::default(),
    };
    let app = router(Arc::new(AppState::new(snapshot, config.data)?));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    info!("Listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn list_squares(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<Square>>> {
    Ok(Json(state.squares.list()?))
}

async fn get_square(State(state): State<Arc<AppState>>, Path(id): Path<ShapeId>) -> ApiResult<Json<Square>> {
    Ok(Json(state.squares.get(id)?))
}

async fn create_square(
    State(state): State<Arc<AppState>>,
    Json(square): Json<Square>,
) -> ApiResult<(StatusCode, Json<Square>)> {
    let created = state.squares.create(square)?;
    state.persist().await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn update_square(
    State(state): State<Arc<AppState>>,
    Path(id): Path<ShapeId>,
    Json(square): Json<Square>,
) -> ApiResult<Json<Square>> {
    let updated = state.squares.update(Square { id: Some(id), ..square })?;
    state.persist().await?;
    Ok(Json(updated))
}

async fn delete_square(State(state): State<Arc<AppState>>, Path(id): Path<ShapeId>) -> ApiResult<StatusCode> {
    state.squares.delete(id)?;
    state.persist().await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn list_polygons(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<Polygon>>> {
    Ok(Json(state.polygons.list()?))
}

async fn get_polygon(State(state): State<Arc<AppState>>, Path(id): Path<ShapeId>) -> ApiResult<Json<Polygon>> {
    Ok(Json(state.polygons.get(id)?))
}

async fn create_polygon(
    State(state): State<Arc<AppState>>,
    Json(polygon): Json<Polygon>,
) -> ApiResult<(StatusCode, Json<Polygon>)> {
    let created = state.polygons.create(polygon)?;
    state.persist().await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn update_polygon(
    State(state): State<Arc<AppState>>,
    Path(id): Path<ShapeId>,
    Json(polygon): Json<Polygon>,
) -> ApiResult<Json<Polygon>> {
    let updated = state.polygons.update(Polygon { id: Some(id), ..polygon })?;
    state.persist().await?;
    Ok(Json(updated))
}

async fn delete_polygon(State(state): State<Arc<AppState>>, Path(id): Path<ShapeId>) -> ApiResult<StatusCode> {
    state.polygons.delete(id)?;
    state.persist().await?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;

    fn state(data: Option<PathBuf>) -> Arc<AppState> {
        Arc::new(AppState::new(Snapshot::default(), data).unwrap())
    }

    fn square() -> Square {
        Square::new(&[0, 10, 10, 0], &[0, 0, 10, 10])
    }

    #[test(tokio::test)]
    async fn test_create_square_flow() {
        let state = state(None);
        let (status, Json(a)) = create_polygon(State(state.clone()), Json(Polygon::new(&[5, 30, 30], &[5, 5, 30])))
            .await
            .unwrap();
        assert_eq!(status, StatusCode::CREATED);
        create_polygon(State(state.clone()), Json(Polygon::new(&[21, 30, 25], &[0, 0, 8]))).await.unwrap();

        let (status, Json(created)) = create_square(State(state.clone()), Json(square())).await.unwrap();
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created.polygons, vec![a.id.unwrap()]);

        let Json(fetched) = get_square(State(state.clone()), Path(created.id.unwrap())).await.unwrap();
        assert_eq!(fetched, created);
        let Json(all) = list_squares(State(state)).await.unwrap();
        assert_eq!(all, vec![created]);
    }

    #[test(tokio::test)]
    async fn test_error_statuses() {
        let state = state(None);
        let bad = Square { x_points: "1,,3".to_string(), ..square() };
        let err = create_square(State(state.clone()), Json(bad)).await.unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert!(err.message.starts_with("invalid X/Y coordinate format"), "{}", err.message);

        let err = get_square(State(state.clone()), Path(7)).await.unwrap_err();
        assert_eq!(err.status, StatusCode::NOT_FOUND);
        let err = update_polygon(State(state.clone()), Path(7), Json(Polygon::new(&[1], &[1]))).await.unwrap_err();
        assert_eq!(err.status, StatusCode::NOT_FOUND);
        let err = delete_polygon(State(state), Path(7)).await.unwrap_err();
        assert_eq!(err.status, StatusCode::NOT_FOUND);
    }

    #[test(tokio::test)]
    async fn test_update_and_delete() {
        let state = state(None);
        let (_, Json(created)) = create_square(State(state.clone()), Json(square())).await.unwrap();
        let id = created.id.unwrap();
        let moved = Square { id: None, ..Square::new(&[1, 2, 2, 1], &[1, 1, 2, 2]) };
        let Json(updated) = update_square(State(state.clone()), Path(id), Json(moved)).await.unwrap();
        assert_eq!(updated.id, Some(id));
        assert_eq!(updated.x_points, "1,2,2,1");

        let status = delete_square(State(state.clone()), Path(id)).await.unwrap();
        assert_eq!(status, StatusCode::NO_CONTENT);
        let Json(all) = list_squares(State(state)).await.unwrap();
        assert!(all.is_empty());
    }

    #[test(tokio::test)]
    async fn test_persists_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("db.json.gz");
        let state = state(Some(path.clone()));
        create_polygon(State(state.clone()), Json(Polygon::new(&[5, 6, 7], &[5, 6, 5]))).await.unwrap();
        create_square(State(state.clone()), Json(square())).await.unwrap();

        let reloaded = snapshot::load(&path).unwrap();
        assert_eq!(reloaded, state.snapshot().unwrap());
        assert_eq!(reloaded.squares[0].polygons, vec![1]);

        // A restarted server continues the id sequence.
        let restarted = Arc::new(AppState::new(reloaded, None).unwrap());
        let (_, Json(next)) = create_polygon(State(restarted), Json(Polygon::new(&[1], &[1]))).await.unwrap();
        assert_eq!(next.id, Some(2));
    }

    #[test(tokio::test(flavor = "multi_thread", worker_threads = 8))]
    async fn test_concurrent_writes_all_reach_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("db.json");
        let state = Arc::new(AppState::new(Snapshot::default(), Some(path.clone())).unwrap());

        let tasks: Vec<_> = (0..64)
            .map(|i| {
                let state = state.clone();
                tokio::spawn(async move {
                    create_polygon(State(state), Json(Polygon::new(&[i, i + 1, i + 2], &[0, 1, 0]))).await
                })
            })
            .collect();
        for task in tasks {
            let result = task.await.unwrap();
            assert!(result.is_ok(), "{:?}", result.err());
        }

        let on_disk = snapshot::load(&path).unwrap();
        assert_eq!(on_disk.polygons.len(), 64);
        assert_eq!(on_disk, state.snapshot().unwrap());
    }
}
