//! Schedule Resolver
//!
//! Answers "is this restaurant open at date D, and during which window?".
//! Overrides win outright over the weekly schedule for their date. An
//! unresolvable date (no override, no weekly row) resolves to closed,
//! never to open, so a schedule gap can't silently accept bookings.

use crate::db::repository::ScheduleRepository;
use chrono::{Datelike, NaiveDate};
use shared::error::AppResult;
use shared::models::{HoursSpan, ResolvedHours, WeeklyHours};

/// Resolve one date against a weekly schedule and an optional override
///
/// Pure core of the resolver; the service below feeds it from the store.
pub fn resolve_hours(
    weekly: &WeeklyHours,
    override_hours: Option<HoursSpan>,
    date: NaiveDate,
) -> ResolvedHours {
    let span = override_hours.unwrap_or_else(|| weekly.get(date.weekday()));
    ResolvedHours::from_span(span)
}

/// Schedule resolution backed by the catalog store
#[derive(Clone)]
pub struct ScheduleService {
    repo: ScheduleRepository,
}

impl ScheduleService {
    pub fn new(repo: ScheduleRepository) -> Self {
        Self { repo }
    }

    pub fn repo(&self) -> &ScheduleRepository {
        &self.repo
    }

    /// The resolved open window (or closed marker) for one date
    pub async fn resolved_hours(
        &self,
        restaurant_id: &str,
        date: NaiveDate,
    ) -> AppResult<ResolvedHours> {
        let override_hours = self
            .repo
            .find_override(restaurant_id, date)
            .await?
            .map(|o| o.hours);

        // Skip the weekly lookup when an override decides the day
        let weekly = match override_hours {
            Some(_) => WeeklyHours::default(),
            None => self.repo.get_weekly(restaurant_id).await?,
        };

        Ok(resolve_hours(&weekly, override_hours, date))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Weekday;
    use shared::types::TimeOfDay;

    fn t(s: &str) -> TimeOfDay {
        s.parse().unwrap()
    }

    fn open_weekly() -> WeeklyHours {
        let mut weekly = WeeklyHours::default();
        for day in [
            Weekday::Mon,
            Weekday::Tue,
            Weekday::Wed,
            Weekday::Thu,
            Weekday::Fri,
        ] {
            weekly.set(day, HoursSpan::new(t("11:00"), t("22:00")));
        }
        weekly
    }

    #[test]
    fn test_weekly_fallback() {
        // 2023-12-25 is a Monday
        let date = NaiveDate::from_ymd_opt(2023, 12, 25).unwrap();
        let resolved = resolve_hours(&open_weekly(), None, date);
        assert_eq!(
            resolved,
            ResolvedHours::Open {
                open: t("11:00"),
                close: t("22:00")
            }
        );
    }

    #[test]
    fn test_override_wins_over_weekly() {
        let date = NaiveDate::from_ymd_opt(2023, 12, 24).unwrap();
        let resolved = resolve_hours(
            &open_weekly(),
            Some(HoursSpan::new(t("11:00"), t("15:00"))),
            date,
        );
        assert_eq!(
            resolved,
            ResolvedHours::Open {
                open: t("11:00"),
                close: t("15:00")
            }
        );
    }

    #[test]
    fn test_closed_override_beats_open_monday() {
        // Christmas Day override 00:00–00:00 closes an otherwise open Monday
        let date = NaiveDate::from_ymd_opt(2023, 12, 25).unwrap();
        let resolved = resolve_hours(&open_weekly(), Some(HoursSpan::CLOSED), date);
        assert_eq!(resolved, ResolvedHours::Closed);
    }

    #[test]
    fn test_missing_weekday_defaults_to_closed() {
        // Saturday has no entry in open_weekly()
        let date = NaiveDate::from_ymd_opt(2023, 12, 30).unwrap();
        assert_eq!(date.weekday(), Weekday::Sat);
        let resolved = resolve_hours(&open_weekly(), None, date);
        assert_eq!(resolved, ResolvedHours::Closed);
    }
}
