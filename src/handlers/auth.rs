use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use axum::{extract::State, Json};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entities::theater;
use crate::entities::user::{self, UserRole};
use crate::error::{AppError, AppResult};
use crate::utils::jwt::create_token;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserInfo,
}

#[derive(Debug, Serialize)]
pub struct UserInfo {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub role: UserRole,
    pub is_superuser: bool,
    pub is_staff: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub managed_theater: Option<ManagedTheater>,
}

#[derive(Debug, Serialize)]
pub struct ManagedTheater {
    pub id: i32,
    pub name: String,
}

impl UserInfo {
    fn from_user(user: &user::Model, managed_theater: Option<ManagedTheater>) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
            role: user.role.clone(),
            is_superuser: user.role == UserRole::Admin,
            is_staff: user.role.is_staff(),
            managed_theater,
        }
    }
}

/// Register a new customer account
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> AppResult<Json<AuthResponse>> {
    if payload.username.trim().is_empty() || payload.password.is_empty() {
        return Err(AppError::BadRequest(
            "Username and password required".to_string(),
        ));
    }

    // Check if username already exists
    let existing = user::Entity::find()
        .filter(user::Column::Username.eq(&payload.username))
        .one(&state.db)
        .await?;

    if existing.is_some() {
        return Err(AppError::BadRequest("Username already exists".to_string()));
    }

    // Hash password
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let password_hash = argon2
        .hash_password(payload.password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))?
        .to_string();

    // Create user
    let new_user = user::ActiveModel {
        id: Set(Uuid::new_v4()),
        username: Set(payload.username.clone()),
        email: Set(payload.email.clone()),
        password_hash: Set(password_hash),
        role: Set(UserRole::Customer),
        ..Default::default()
    };

    let user = new_user.insert(&state.db).await?;

    // Generate token
    let token = create_token(
        user.id,
        &user.username,
        user.role.clone(),
        &state.config.jwt_secret,
        state.config.jwt_expiration_hours,
    )?;

    Ok(Json(AuthResponse {
        user: UserInfo::from_user(&user, None),
        token,
    }))
}

/// Login with username and password
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    // Find user by username
    let user = user::Entity::find()
        .filter(user::Column::Username.eq(&payload.username))
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Invalid credentials".to_string()))?;

    // Verify password
    let parsed_hash = PasswordHash::new(&user.password_hash)
        .map_err(|e| AppError::Internal(format!("Failed to parse password hash: {}", e)))?;

    Argon2::default()
        .verify_password(payload.password.as_bytes(), &parsed_hash)
        .map_err(|_| AppError::Unauthorized("Invalid credentials".to_string()))?;

    // Theater managers get their theater injected for the admin console
    let managed_theater = theater::Entity::find()
        .filter(theater::Column::ManagerId.eq(user.id))
        .one(&state.db)
        .await?
        .map(|t| ManagedTheater {
            id: t.id,
            name: t.name,
        });

    // Generate token
    let token = create_token(
        user.id,
        &user.username,
        user.role.clone(),
        &state.config.jwt_secret,
        state.config.jwt_expiration_hours,
    )?;

    Ok(Json(AuthResponse {
        user: UserInfo::from_user(&user, managed_theater),
        token,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payment::PaymentClient;
    use crate::Config;
    use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase};

    fn test_config() -> Config {
        Config {
            database_url: String::new(),
            jwt_secret: "test-secret".to_string(),
            jwt_expiration_hours: 1,
            server_host: "127.0.0.1".to_string(),
            server_port: 0,
            razorpay_key_id: "key".to_string(),
            razorpay_key_secret: "secret".to_string(),
            razorpay_base_url: "http://127.0.0.1:0".to_string(),
        }
    }

    fn test_state(db: DatabaseConnection) -> AppState {
        AppState {
            db,
            config: test_config(),
            payments: PaymentClient::new("key", "secret", "http://127.0.0.1:0"),
        }
    }

    fn existing_user(username: &str, password_hash: &str) -> user::Model {
        user::Model {
            id: Uuid::new_v4(),
            username: username.to_string(),
            email: String::new(),
            password_hash: password_hash.to_string(),
            role: UserRole::Customer,
            created_at: chrono::Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn duplicate_username_creates_no_second_row() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![existing_user("alice", "hash")]])
            .into_connection();
        let state = test_state(db);

        let err = register(
            State(state.clone()),
            Json(RegisterRequest {
                username: "alice".to_string(),
                password: "pw".to_string(),
                email: String::new(),
            }),
        )
        .await
        .unwrap_err();

        match err {
            AppError::BadRequest(msg) => assert_eq!(msg, "Username already exists"),
            other => panic!("expected BadRequest, got {other:?}"),
        }

        // Only the lookup ran; no insert was attempted
        assert_eq!(state.db.into_transaction_log().len(), 1);
    }

    #[tokio::test]
    async fn login_with_wrong_password_issues_no_token() {
        let salt = SaltString::generate(&mut OsRng);
        let password_hash = Argon2::default()
            .hash_password(b"correct-password", &salt)
            .unwrap()
            .to_string();

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![existing_user("bob", &password_hash)]])
            .into_connection();
        let state = test_state(db);

        let err = login(
            State(state),
            Json(LoginRequest {
                username: "bob".to_string(),
                password: "wrong-password".to_string(),
            }),
        )
        .await
        .unwrap_err();

        match err {
            AppError::Unauthorized(msg) => assert_eq!(msg, "Invalid credentials"),
            other => panic!("expected Unauthorized, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn login_with_unknown_username_is_unauthorized() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<user::Model>::new()])
            .into_connection();
        let state = test_state(db);

        let err = login(
            State(state),
            Json(LoginRequest {
                username: "nobody".to_string(),
                password: "pw".to_string(),
            }),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, AppError::Unauthorized(_)));
    }
}
