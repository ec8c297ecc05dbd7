//! Schedule Repository
//!
//! Weekly recurring hours (up to seven rows per restaurant) and
//! date-specific overrides.

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{ScheduleOverride, WeeklyHoursRow};
use chrono::NaiveDate;
use shared::models::{HoursSpan, WeeklyHours};
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

const WEEKLY_TABLE: &str = "weekly_hours";
const OVERRIDE_TABLE: &str = "schedule_override";

#[derive(Clone)]
pub struct ScheduleRepository {
    base: BaseRepository,
}

impl ScheduleRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    fn parse_restaurant(&self, restaurant_id: &str) -> RepoResult<RecordId> {
        restaurant_id
            .parse()
            .map_err(|_| RepoError::Validation(format!("Invalid restaurant ID: {}", restaurant_id)))
    }

    // ── Weekly hours ────────────────────────────────────────────────

    /// Load the weekly schedule; weekdays without a stored row are closed
    pub async fn get_weekly(&self, restaurant_id: &str) -> RepoResult<WeeklyHours> {
        let restaurant = self.parse_restaurant(restaurant_id)?;
        let rows: Vec<WeeklyHoursRow> = self
            .base
            .db()
            .query("SELECT * FROM weekly_hours WHERE restaurant = $restaurant ORDER BY weekday")
            .bind(("restaurant", restaurant))
            .await?
            .take(0)?;

        let mut weekly = WeeklyHours::default();
        for row in rows {
            if let Some(day) = weekly.days.get_mut(row.weekday as usize) {
                *day = row.hours;
            }
        }
        Ok(weekly)
    }

    /// Replace the full weekly schedule (seven entries, Monday first)
    pub async fn set_weekly(&self, restaurant_id: &str, weekly: &WeeklyHours) -> RepoResult<()> {
        let restaurant = self.parse_restaurant(restaurant_id)?;

        self.base
            .db()
            .query("DELETE weekly_hours WHERE restaurant = $restaurant")
            .bind(("restaurant", restaurant.clone()))
            .await?;

        for (weekday, hours) in weekly.days.iter().enumerate() {
            let row = WeeklyHoursRow {
                id: None,
                restaurant: restaurant.clone(),
                weekday: weekday as u8,
                hours: *hours,
            };
            let _created: Option<WeeklyHoursRow> =
                self.base.db().create(WEEKLY_TABLE).content(row).await?;
        }
        Ok(())
    }

    // ── Overrides ───────────────────────────────────────────────────

    /// All overrides of a restaurant, soonest first
    pub async fn list_overrides(&self, restaurant_id: &str) -> RepoResult<Vec<ScheduleOverride>> {
        let restaurant = self.parse_restaurant(restaurant_id)?;
        let overrides: Vec<ScheduleOverride> = self
            .base
            .db()
            .query("SELECT * FROM schedule_override WHERE restaurant = $restaurant ORDER BY date")
            .bind(("restaurant", restaurant))
            .await?
            .take(0)?;
        Ok(overrides)
    }

    /// The override for one date, if any
    pub async fn find_override(
        &self,
        restaurant_id: &str,
        date: NaiveDate,
    ) -> RepoResult<Option<ScheduleOverride>> {
        let restaurant = self.parse_restaurant(restaurant_id)?;
        let mut result = self
            .base
            .db()
            .query(
                "SELECT * FROM schedule_override WHERE restaurant = $restaurant AND date = $date LIMIT 1",
            )
            .bind(("restaurant", restaurant))
            .bind(("date", date))
            .await?;
        let overrides: Vec<ScheduleOverride> = result.take(0)?;
        Ok(overrides.into_iter().next())
    }

    /// Create or replace the override for a date
    pub async fn set_override(
        &self,
        restaurant_id: &str,
        date: NaiveDate,
        hours: HoursSpan,
    ) -> RepoResult<ScheduleOverride> {
        let restaurant = self.parse_restaurant(restaurant_id)?;

        // One override per (restaurant, date) — replace in place
        self.base
            .db()
            .query("DELETE schedule_override WHERE restaurant = $restaurant AND date = $date")
            .bind(("restaurant", restaurant.clone()))
            .bind(("date", date))
            .await?;

        let row = ScheduleOverride {
            id: None,
            restaurant,
            date,
            hours,
        };
        let created: Option<ScheduleOverride> =
            self.base.db().create(OVERRIDE_TABLE).content(row).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create schedule override".to_string()))
    }

    /// Remove the override for a date
    pub async fn remove_override(&self, restaurant_id: &str, date: NaiveDate) -> RepoResult<bool> {
        let existing = self.find_override(restaurant_id, date).await?;
        if existing.is_none() {
            return Ok(false);
        }
        let restaurant = self.parse_restaurant(restaurant_id)?;
        self.base
            .db()
            .query("DELETE schedule_override WHERE restaurant = $restaurant AND date = $date")
            .bind(("restaurant", restaurant))
            .bind(("date", date))
            .await?;
        Ok(true)
    }
}
