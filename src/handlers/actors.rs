use crate::errors::ServiceError;
use crate::handlers::AppState;
use crate::queries::actor_queries::{ActorDetailQuery, TopFiveActorsQuery};
use crate::queries::Query as _;
use axum::{
    extract::{Path, State},
    response::IntoResponse,
    routing::get,
    Json, Router,
};

async fn top_five_actors(State(state): State<AppState>) -> Result<impl IntoResponse, ServiceError> {
    let actors = TopFiveActorsQuery.execute(&state.db).await?;
    Ok(Json(actors))
}

async fn actor_detail(
    State(state): State<AppState>,
    Path(actor_id): Path<i32>,
) -> Result<impl IntoResponse, ServiceError> {
    let detail = ActorDetailQuery { actor_id }.execute(&state.db).await?;
    Ok(Json(detail))
}

pub fn actor_routes() -> Router<AppState> {
    Router::new()
        .route("/topFiveActors", get(top_five_actors))
        .route("/actor/:id", get(actor_detail))
}
