use super::common::TableParams;
use crate::errors::ServiceError;
use crate::handlers::AppState;
use crate::queries::film_queries::{FilmDetailQuery, FilmsTableQuery, TopFiveFilmsQuery};
use crate::queries::Query as _;
use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    routing::get,
    Json, Router,
};

async fn top_five_movies(State(state): State<AppState>) -> Result<impl IntoResponse, ServiceError> {
    let films = TopFiveFilmsQuery.execute(&state.db).await?;
    Ok(Json(films))
}

async fn film_detail(
    State(state): State<AppState>,
    Path(film_id): Path<i32>,
) -> Result<impl IntoResponse, ServiceError> {
    let detail = FilmDetailQuery { film_id }.execute(&state.db).await?;
    Ok(Json(detail))
}

async fn films_table(
    State(state): State<AppState>,
    Query(params): Query<TableParams>,
) -> Result<impl IntoResponse, ServiceError> {
    let page = FilmsTableQuery {
        page: params.page(),
        search: params.search,
    }
    .execute(&state.db)
    .await?;
    Ok(Json(page))
}

pub fn film_routes() -> Router<AppState> {
    Router::new()
        .route("/topFiveMovies", get(top_five_movies))
        .route("/film/:id", get(film_detail))
        .route("/filmsTable", get(films_table))
}
