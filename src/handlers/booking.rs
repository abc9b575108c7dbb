use axum::{extract::State, Extension, Json};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, EntityTrait, Set};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entities::booking::{self, BookingStatus};
use crate::entities::{movie, show, theater};
use crate::error::{AppError, AppResult};
use crate::payment::{to_minor_units, OrderRequest, PaymentOrder};
use crate::utils::jwt::Claims;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateBookingRequest {
    pub show: i32,
    pub seats: String,
    pub amount: Decimal,
}

#[derive(Debug, Serialize)]
pub struct BookingView {
    pub id: Uuid,
    pub show: i32,
    pub seats: String,
    pub amount: Decimal,
    pub status: BookingStatus,
    pub transaction_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub movie_title: String,
    pub theater_name: String,
    pub time: String,
}

#[derive(Debug, Serialize)]
pub struct CreateBookingResponse {
    pub booking: BookingView,
    pub payment_order: PaymentOrder,
}

/// Create a booking and request a payment order from the gateway.
///
/// The booking row is committed before the gateway call; a gateway failure
/// leaves it persisted with status PENDING and no payment order. Repeated
/// submissions create distinct bookings and distinct gateway orders.
pub async fn create_booking(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<CreateBookingRequest>,
) -> AppResult<Json<CreateBookingResponse>> {
    // Validate before persisting anything
    let show = show::Entity::find_by_id(payload.show)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::BadRequest("Invalid show".to_string()))?;

    if payload.seats.trim().is_empty() {
        return Err(AppError::BadRequest("At least one seat required".to_string()));
    }

    if payload.amount <= Decimal::ZERO {
        return Err(AppError::BadRequest("Amount must be positive".to_string()));
    }

    // Minor-currency-unit conversion for the gateway (INR -> paise)
    let amount_minor = to_minor_units(payload.amount)
        .ok_or_else(|| AppError::BadRequest("Invalid amount".to_string()))?;

    let new_booking = booking::ActiveModel {
        id: Set(Uuid::new_v4()),
        user_id: Set(claims.sub),
        show_id: Set(show.id),
        seats: Set(payload.seats.trim().to_string()),
        amount: Set(payload.amount),
        status: Set(BookingStatus::Pending),
        transaction_id: Set(None),
        ..Default::default()
    };

    let booking = new_booking.insert(&state.db).await?;

    // No compensating rollback: a gateway error surfaces as a 400 while the
    // PENDING booking above stays committed.
    let payment_order = state
        .payments
        .create_order(&OrderRequest {
            amount: amount_minor,
            currency: "INR".to_string(),
            receipt: format!("receipt_{}", booking.id),
        })
        .await?;

    let movie = movie::Entity::find_by_id(show.movie_id).one(&state.db).await?;
    let theater = theater::Entity::find_by_id(show.theater_id)
        .one(&state.db)
        .await?;

    Ok(Json(CreateBookingResponse {
        booking: BookingView {
            id: booking.id,
            show: booking.show_id,
            seats: booking.seats,
            amount: booking.amount,
            status: booking.status,
            transaction_id: booking.transaction_id,
            created_at: booking.created_at.with_timezone(&Utc),
            movie_title: movie.map(|m| m.title).unwrap_or_default(),
            theater_name: theater.map(|t| t.name).unwrap_or_default(),
            time: show.time,
        },
        payment_order,
    }))
}
