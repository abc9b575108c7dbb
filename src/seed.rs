use argon2::{
    password_hash::{rand_core::OsRng, PasswordHasher, SaltString},
    Argon2,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use uuid::Uuid;

use crate::entities::user::{self, UserRole};
use crate::entities::{movie, show, theater};
use crate::error::{AppError, AppResult};

/// Seed the admin account if it doesn't exist
pub async fn seed_admin(db: &DatabaseConnection) -> AppResult<()> {
    let admin_username = "admin";

    let existing = user::Entity::find()
        .filter(user::Column::Username.eq(admin_username))
        .one(db)
        .await?;

    if existing.is_none() {
        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();
        let password_hash = argon2
            .hash_password(b"admin123", &salt)
            .map_err(|e| AppError::Internal(format!("Failed to hash admin password: {}", e)))?
            .to_string();

        let admin = user::ActiveModel {
            id: Set(Uuid::new_v4()),
            username: Set(admin_username.to_string()),
            email: Set("admin@moviebooking.com".to_string()),
            password_hash: Set(password_hash),
            role: Set(UserRole::Admin),
            ..Default::default()
        };

        admin.insert(db).await?;
        tracing::info!("Admin account created: {}", admin_username);
    }

    Ok(())
}

/// Seed sample movies, theaters, and shows. Idempotent: movies are keyed by
/// title, theaters by name, shows by (movie, theater, time).
pub async fn seed_catalog(db: &DatabaseConnection) -> AppResult<()> {
    let movies_data: [(&str, &str, &str, &str, f64, &str, (i32, u32, u32)); 3] = [
        (
            "Pathaan",
            "https://picsum.photos/seed/pathaan/400/600",
            "Action, Thriller",
            "2h 26m",
            4.5,
            "An Indian spy takes on mercenaries with nefarious plans.",
            (2023, 1, 25),
        ),
        (
            "Jawan",
            "https://picsum.photos/seed/jawan/400/600",
            "Action, Drama",
            "2h 49m",
            4.8,
            "A man set to rectify the wrongs in the society.",
            (2023, 9, 7),
        ),
        (
            "Animal",
            "https://picsum.photos/seed/animal/400/600",
            "Action, Crime",
            "3h 21m",
            4.2,
            "The complex relationship between a father and son.",
            (2023, 12, 1),
        ),
    ];

    let mut movies = Vec::new();
    for (title, poster, genre, duration, rating, description, (y, m, d)) in movies_data {
        let release_date = NaiveDate::from_ymd_opt(y, m, d)
            .ok_or_else(|| AppError::Internal("Invalid seed release date".to_string()))?;

        let existing = movie::Entity::find()
            .filter(movie::Column::Title.eq(title))
            .one(db)
            .await?;

        let model = match existing {
            Some(m) => m,
            None => {
                let new_movie = movie::ActiveModel {
                    title: Set(title.to_string()),
                    poster: Set(poster.to_string()),
                    genre: Set(genre.to_string()),
                    duration: Set(duration.to_string()),
                    rating: Set(rating),
                    description: Set(description.to_string()),
                    release_date: Set(release_date),
                    ..Default::default()
                };
                new_movie.insert(db).await?
            }
        };
        movies.push(model);
    }

    let theaters_data = [("PVR Phoenix", "Lucknow", 4), ("Inox Riverside", "Kanpur", 6)];

    let mut theaters = Vec::new();
    for (name, city, screens) in theaters_data {
        let existing = theater::Entity::find()
            .filter(theater::Column::Name.eq(name))
            .one(db)
            .await?;

        let model = match existing {
            Some(t) => t,
            None => {
                let new_theater = theater::ActiveModel {
                    name: Set(name.to_string()),
                    city: Set(city.to_string()),
                    screens: Set(screens),
                    manager_id: Set(None),
                    ..Default::default()
                };
                new_theater.insert(db).await?
            }
        };
        theaters.push(model);
    }

    let times = ["10:00 AM", "01:30 PM", "05:00 PM", "08:15 PM", "11:30 PM"];
    let prices = [250, 300, 350, 400, 450];

    for movie in &movies {
        for theater in &theaters {
            for (time, price) in times.iter().zip(prices) {
                let existing = show::Entity::find()
                    .filter(show::Column::MovieId.eq(movie.id))
                    .filter(show::Column::TheaterId.eq(theater.id))
                    .filter(show::Column::Time.eq(*time))
                    .one(db)
                    .await?;

                if existing.is_none() {
                    let new_show = show::ActiveModel {
                        movie_id: Set(movie.id),
                        theater_id: Set(theater.id),
                        time: Set(time.to_string()),
                        price: Set(Decimal::from(price)),
                        ..Default::default()
                    };
                    new_show.insert(db).await?;
                }
            }
        }
    }

    tracing::info!("Catalog seeding complete");
    Ok(())
}
