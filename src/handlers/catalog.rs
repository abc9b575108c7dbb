use axum::{
    extract::{Query, State},
    Json,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};
use serde::{Deserialize, Serialize};

use crate::entities::{movie, show, theater};
use crate::error::{AppError, AppResult};
use crate::utils::jwt::verify_token;
use crate::AppState;

/// List all movies
pub async fn list_movies(State(state): State<AppState>) -> AppResult<Json<Vec<movie::Model>>> {
    let movies = movie::Entity::find().all(&state.db).await?;
    Ok(Json(movies))
}

#[derive(Debug, Deserialize)]
pub struct CreateMovieRequest {
    pub title: String,
    pub poster: String,
    pub genre: String,
    pub duration: String,
    #[serde(default)]
    pub rating: f64,
    pub description: String,
    pub release_date: NaiveDate,
}

/// Create a movie. Shares its path with the open listing, so the staff
/// check happens here rather than in a router layer. The header is taken
/// as an `Option` so a missing or malformed one maps to 401, not the
/// extractor's 400.
pub async fn create_movie(
    State(state): State<AppState>,
    auth: Option<TypedHeader<Authorization<Bearer>>>,
    Json(payload): Json<CreateMovieRequest>,
) -> AppResult<Json<movie::Model>> {
    let TypedHeader(auth) = auth
        .ok_or_else(|| AppError::Unauthorized("Missing authorization header".to_string()))?;
    let claims = verify_token(auth.token(), &state.config.jwt_secret)?;
    if !claims.role.is_staff() {
        return Err(AppError::Forbidden("Staff access required".to_string()));
    }

    if payload.title.trim().is_empty() {
        return Err(AppError::BadRequest("Title required".to_string()));
    }

    let existing = movie::Entity::find()
        .filter(movie::Column::Title.eq(&payload.title))
        .one(&state.db)
        .await?;

    if existing.is_some() {
        return Err(AppError::BadRequest("Movie already exists".to_string()));
    }

    let new_movie = movie::ActiveModel {
        title: Set(payload.title),
        poster: Set(payload.poster),
        genre: Set(payload.genre),
        duration: Set(payload.duration),
        rating: Set(payload.rating),
        description: Set(payload.description),
        release_date: Set(payload.release_date),
        ..Default::default()
    };

    let movie = new_movie.insert(&state.db).await?;
    Ok(Json(movie))
}

/// List all theaters
pub async fn list_theaters(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<theater::Model>>> {
    let theaters = theater::Entity::find().all(&state.db).await?;
    Ok(Json(theaters))
}

#[derive(Debug, Deserialize)]
pub struct ShowQuery {
    pub movie_id: Option<i32>,
}

#[derive(Debug, Serialize)]
pub struct ShowResponse {
    pub id: i32,
    pub movie: i32,
    pub theater: i32,
    pub time: String,
    pub price: Decimal,
    pub movie_title: String,
    pub theater_name: String,
}

/// List shows, optionally filtered by movie
pub async fn list_shows(
    State(state): State<AppState>,
    Query(query): Query<ShowQuery>,
) -> AppResult<Json<Vec<ShowResponse>>> {
    let mut finder = show::Entity::find();
    if let Some(movie_id) = query.movie_id {
        finder = finder.filter(show::Column::MovieId.eq(movie_id));
    }

    let shows = finder.all(&state.db).await?;
    let movies = movie::Entity::find().all(&state.db).await?;
    let theaters = theater::Entity::find().all(&state.db).await?;

    let responses: Vec<ShowResponse> = shows
        .into_iter()
        .map(|s| {
            let movie = movies.iter().find(|m| m.id == s.movie_id);
            let theater = theaters.iter().find(|t| t.id == s.theater_id);

            ShowResponse {
                id: s.id,
                movie: s.movie_id,
                theater: s.theater_id,
                time: s.time,
                price: s.price,
                movie_title: movie.map(|m| m.title.clone()).unwrap_or_default(),
                theater_name: theater.map(|t| t.name.clone()).unwrap_or_default(),
            }
        })
        .collect();

    Ok(Json(responses))
}
