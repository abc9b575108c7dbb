use rust_decimal::Decimal;
use serde::Serialize;

use crate::entities::{booking, movie, show};

#[derive(Debug, Serialize)]
pub struct MovieStat {
    pub name: String,
    pub bookings: u64,
}

#[derive(Debug, Serialize)]
pub struct AnalyticsSummary {
    pub total_revenue: Decimal,
    pub total_bookings: u64,
    pub movie_popularity: Vec<MovieStat>,
}

/// Aggregate revenue, booking count, and per-movie popularity over
/// already-scoped datasets. `confirmed` must contain only CONFIRMED
/// bookings within the caller's scope; `movies` the movies in scope.
/// Movies with zero bookings still appear with a count of 0.
pub fn summarize(
    confirmed: &[booking::Model],
    shows: &[show::Model],
    movies: &[movie::Model],
) -> AnalyticsSummary {
    let total_revenue: Decimal = confirmed.iter().map(|b| b.amount).sum();
    let total_bookings = confirmed.len() as u64;

    let movie_popularity = movies
        .iter()
        .map(|m| {
            let count = confirmed
                .iter()
                .filter(|b| {
                    shows
                        .iter()
                        .any(|s| s.id == b.show_id && s.movie_id == m.id)
                })
                .count() as u64;

            MovieStat {
                name: m.title.clone(),
                bookings: count,
            }
        })
        .collect();

    AnalyticsSummary {
        total_revenue,
        total_bookings,
        movie_popularity,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::booking::BookingStatus;
    use chrono::{NaiveDate, Utc};
    use uuid::Uuid;

    fn movie(id: i32, title: &str) -> movie::Model {
        movie::Model {
            id,
            title: title.to_string(),
            poster: "https://example.com/poster.jpg".to_string(),
            genre: "Action, Thriller".to_string(),
            duration: "2h 26m".to_string(),
            rating: 4.5,
            description: "".to_string(),
            release_date: NaiveDate::from_ymd_opt(2023, 1, 25).unwrap(),
        }
    }

    fn show(id: i32, movie_id: i32, theater_id: i32) -> show::Model {
        show::Model {
            id,
            movie_id,
            theater_id,
            time: "10:00 AM".to_string(),
            price: Decimal::from(250),
        }
    }

    fn confirmed_booking(show_id: i32, amount: i64) -> booking::Model {
        booking::Model {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            show_id,
            seats: "A1,A2".to_string(),
            amount: Decimal::from(amount),
            status: BookingStatus::Confirmed,
            transaction_id: None,
            created_at: Utc::now().into(),
        }
    }

    #[test]
    fn revenue_is_sum_of_confirmed_amounts() {
        let movies = vec![movie(1, "Pathaan"), movie(2, "Jawan")];
        let shows = vec![show(10, 1, 1), show(11, 2, 1)];
        let bookings = vec![
            confirmed_booking(10, 500),
            confirmed_booking(10, 250),
            confirmed_booking(11, 300),
        ];

        let summary = summarize(&bookings, &shows, &movies);

        assert_eq!(summary.total_revenue, Decimal::from(1050));
        assert_eq!(summary.total_bookings, 3);
    }

    #[test]
    fn per_movie_counts_follow_shows() {
        let movies = vec![movie(1, "Pathaan"), movie(2, "Jawan")];
        let shows = vec![show(10, 1, 1), show(11, 1, 2), show(12, 2, 1)];
        let bookings = vec![
            confirmed_booking(10, 500),
            confirmed_booking(11, 250),
            confirmed_booking(12, 300),
        ];

        let summary = summarize(&bookings, &shows, &movies);

        assert_eq!(summary.movie_popularity[0].name, "Pathaan");
        assert_eq!(summary.movie_popularity[0].bookings, 2);
        assert_eq!(summary.movie_popularity[1].bookings, 1);
    }

    #[test]
    fn zero_booking_movies_appear_with_zero() {
        let movies = vec![movie(1, "Pathaan"), movie(2, "Animal")];
        let shows = vec![show(10, 1, 1), show(11, 2, 1)];
        let bookings = vec![confirmed_booking(10, 400)];

        let summary = summarize(&bookings, &shows, &movies);

        assert_eq!(summary.movie_popularity.len(), 2);
        assert_eq!(summary.movie_popularity[1].name, "Animal");
        assert_eq!(summary.movie_popularity[1].bookings, 0);
    }

    #[test]
    fn empty_scope_yields_zero_totals() {
        let summary = summarize(&[], &[], &[]);

        assert_eq!(summary.total_revenue, Decimal::ZERO);
        assert_eq!(summary.total_bookings, 0);
        assert!(summary.movie_popularity.is_empty());
    }
}
