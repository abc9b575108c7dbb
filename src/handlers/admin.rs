use argon2::{
    password_hash::{rand_core::OsRng, PasswordHasher, SaltString},
    Argon2,
};
use axum::{extract::State, Extension, Json};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};
use serde::Deserialize;
use uuid::Uuid;

use crate::entities::booking::{self, BookingStatus};
use crate::entities::user::{self, UserRole};
use crate::entities::{movie, show, theater};
use crate::error::{AppError, AppResult};
use crate::utils::analytics::{summarize, AnalyticsSummary};
use crate::utils::jwt::Claims;
use crate::AppState;

/// Scoped analytics: admins aggregate across all theaters, theater
/// managers only across their own. Full-table scans, no windowing.
pub async fn analytics(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> AppResult<Json<AnalyticsSummary>> {
    let (confirmed, shows, movies) = if claims.role == UserRole::Admin {
        let shows = show::Entity::find().all(&state.db).await?;
        let movies = movie::Entity::find().all(&state.db).await?;
        let confirmed = booking::Entity::find()
            .filter(booking::Column::Status.eq(BookingStatus::Confirmed))
            .all(&state.db)
            .await?;
        (confirmed, shows, movies)
    } else {
        let theater = theater::Entity::find()
            .filter(theater::Column::ManagerId.eq(claims.sub))
            .one(&state.db)
            .await?
            .ok_or_else(|| AppError::BadRequest("No theater associated".to_string()))?;

        let shows = show::Entity::find()
            .filter(show::Column::TheaterId.eq(theater.id))
            .all(&state.db)
            .await?;

        let show_ids: Vec<i32> = shows.iter().map(|s| s.id).collect();
        let confirmed = booking::Entity::find()
            .filter(booking::Column::Status.eq(BookingStatus::Confirmed))
            .filter(booking::Column::ShowId.is_in(show_ids))
            .all(&state.db)
            .await?;

        // Only movies screened at this theater are in scope
        let mut movie_ids: Vec<i32> = shows.iter().map(|s| s.movie_id).collect();
        movie_ids.sort_unstable();
        movie_ids.dedup();
        let movies = movie::Entity::find()
            .filter(movie::Column::Id.is_in(movie_ids))
            .all(&state.db)
            .await?;

        (confirmed, shows, movies)
    };

    Ok(Json(summarize(&confirmed, &shows, &movies)))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTheaterAdminRequest {
    pub username: String,
    pub password: String,
    pub theater_name: String,
    pub city: String,
    #[serde(default = "default_screens")]
    pub screens: i32,
}

fn default_screens() -> i32 {
    1
}

/// Create a theater manager account together with the theater they manage
pub async fn create_theater_admin(
    State(state): State<AppState>,
    Json(payload): Json<CreateTheaterAdminRequest>,
) -> AppResult<Json<serde_json::Value>> {
    if payload.username.trim().is_empty() || payload.password.is_empty() {
        return Err(AppError::BadRequest(
            "Username and password required".to_string(),
        ));
    }

    let existing = user::Entity::find()
        .filter(user::Column::Username.eq(&payload.username))
        .one(&state.db)
        .await?;

    if existing.is_some() {
        return Err(AppError::BadRequest("Username already exists".to_string()));
    }

    let existing_theater = theater::Entity::find()
        .filter(theater::Column::Name.eq(&payload.theater_name))
        .one(&state.db)
        .await?;

    if existing_theater.is_some() {
        return Err(AppError::BadRequest("Theater already exists".to_string()));
    }

    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let password_hash = argon2
        .hash_password(payload.password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))?
        .to_string();

    let manager = user::ActiveModel {
        id: Set(Uuid::new_v4()),
        username: Set(payload.username.clone()),
        email: Set(String::new()),
        password_hash: Set(password_hash),
        role: Set(UserRole::TheaterManager),
        ..Default::default()
    };

    let manager = manager.insert(&state.db).await?;

    let new_theater = theater::ActiveModel {
        name: Set(payload.theater_name.clone()),
        city: Set(payload.city.clone()),
        screens: Set(payload.screens),
        manager_id: Set(Some(manager.id)),
        ..Default::default()
    };

    let theater = new_theater.insert(&state.db).await?;

    tracing::info!(
        theater = %theater.name,
        manager = %manager.username,
        "Theater admin created"
    );

    Ok(Json(serde_json::json!({
        "success": true,
        "theater_id": theater.id,
    })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payment::PaymentClient;
    use crate::Config;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase};

    fn test_state(db: DatabaseConnection) -> AppState {
        AppState {
            db,
            config: Config {
                database_url: String::new(),
                jwt_secret: "test-secret".to_string(),
                jwt_expiration_hours: 1,
                server_host: "127.0.0.1".to_string(),
                server_port: 0,
                razorpay_key_id: "key".to_string(),
                razorpay_key_secret: "secret".to_string(),
                razorpay_base_url: "http://127.0.0.1:0".to_string(),
            },
            payments: PaymentClient::new("key", "secret", "http://127.0.0.1:0"),
        }
    }

    fn claims_for(role: UserRole) -> Claims {
        let now = chrono::Utc::now().timestamp();
        Claims {
            sub: Uuid::new_v4(),
            username: "staff".to_string(),
            role,
            exp: now + 3600,
            iat: now,
        }
    }

    fn a_movie(id: i32, title: &str) -> movie::Model {
        movie::Model {
            id,
            title: title.to_string(),
            poster: String::new(),
            genre: "Action".to_string(),
            duration: "2h".to_string(),
            rating: 4.0,
            description: String::new(),
            release_date: NaiveDate::from_ymd_opt(2023, 1, 1).unwrap(),
        }
    }

    fn a_show(id: i32, movie_id: i32, theater_id: i32) -> show::Model {
        show::Model {
            id,
            movie_id,
            theater_id,
            time: "10:00 AM".to_string(),
            price: Decimal::from(250),
        }
    }

    fn a_theater(id: i32, manager_id: Uuid) -> theater::Model {
        theater::Model {
            id,
            name: "PVR Phoenix".to_string(),
            city: "Lucknow".to_string(),
            screens: 4,
            manager_id: Some(manager_id),
        }
    }

    fn confirmed(show_id: i32, amount: i64) -> booking::Model {
        booking::Model {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            show_id,
            seats: "A1".to_string(),
            amount: Decimal::from(amount),
            status: BookingStatus::Confirmed,
            transaction_id: None,
            created_at: chrono::Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn manager_without_theater_gets_error_before_aggregating() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<theater::Model>::new()])
            .into_connection();
        let state = test_state(db);

        let err = analytics(
            State(state.clone()),
            Extension(claims_for(UserRole::TheaterManager)),
        )
        .await
        .unwrap_err();

        match err {
            AppError::BadRequest(msg) => assert_eq!(msg, "No theater associated"),
            other => panic!("expected BadRequest, got {other:?}"),
        }

        // Only the theater lookup ran; no booking or movie scan followed
        assert_eq!(state.db.into_transaction_log().len(), 1);
    }

    #[tokio::test]
    async fn admin_aggregates_across_all_theaters() {
        // Query order in the admin branch: shows, movies, confirmed bookings
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![a_show(10, 1, 1), a_show(11, 2, 2)]])
            .append_query_results([vec![a_movie(1, "Pathaan"), a_movie(2, "Jawan")]])
            .append_query_results([vec![
                confirmed(10, 500),
                confirmed(10, 250),
                confirmed(11, 300),
            ]])
            .into_connection();
        let state = test_state(db);

        let Json(summary) = analytics(State(state), Extension(claims_for(UserRole::Admin)))
            .await
            .unwrap();

        assert_eq!(summary.total_revenue, Decimal::from(1050));
        assert_eq!(summary.total_bookings, 3);
        assert_eq!(summary.movie_popularity[0].bookings, 2);
        assert_eq!(summary.movie_popularity[1].bookings, 1);
    }

    #[tokio::test]
    async fn manager_scope_covers_only_their_theater() {
        let claims = claims_for(UserRole::TheaterManager);

        // Query order in the manager branch: theater, its shows, confirmed
        // bookings on those shows, movies screened there
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![a_theater(1, claims.sub)]])
            .append_query_results([vec![a_show(10, 1, 1), a_show(11, 2, 1)]])
            .append_query_results([vec![confirmed(10, 400)]])
            .append_query_results([vec![a_movie(1, "Pathaan"), a_movie(2, "Jawan")]])
            .into_connection();
        let state = test_state(db);

        let Json(summary) = analytics(State(state.clone()), Extension(claims))
            .await
            .unwrap();

        assert_eq!(summary.total_revenue, Decimal::from(400));
        assert_eq!(summary.total_bookings, 1);
        // Jawan screens at this theater with no bookings: still reported
        assert_eq!(summary.movie_popularity[1].name, "Jawan");
        assert_eq!(summary.movie_popularity[1].bookings, 0);

        // The booking query restricts to the theater's shows
        let log = format!("{:?}", state.db.into_transaction_log());
        assert!(log.contains("theater_id"));
        assert!(log.contains("show_id"));
    }
}
