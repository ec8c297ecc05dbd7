//! 时间工具函数 — 业务时区转换
//!
//! 预订的日期/时段是餐厅本地时间；与「现在」比较时统一换算到餐厅时区。

use chrono::{NaiveDate, TimeZone};
use chrono_tz::Tz;
use shared::error::{AppError, AppResult};
use shared::types::TimeOfDay;

/// 解析日期字符串 (YYYY-MM-DD)
pub fn parse_date(date: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map_err(|_| AppError::validation(format!("Invalid date format: {}", date)))
}

/// 解析 IANA 时区名，失败时回退到给定默认值
pub fn parse_timezone(name: &str, fallback: Tz) -> Tz {
    name.parse().unwrap_or_else(|_| {
        tracing::warn!("Unknown timezone '{}', falling back to {}", name, fallback);
        fallback
    })
}

/// 预订时间是否已经到达 (餐厅时区)
///
/// DST gap fallback: 如果本地时间不存在 (夏令时跳跃)，fallback 到 UTC。
pub fn visit_started(date: NaiveDate, slot: TimeOfDay, tz: Tz) -> bool {
    let naive = date.and_hms_opt(slot.hour() as u32, slot.minute() as u32, 0)
        .expect("TimeOfDay is always a valid clock time");
    let visit_millis = tz
        .from_local_datetime(&naive)
        .latest()
        .map(|dt| dt.timestamp_millis())
        .unwrap_or_else(|| naive.and_utc().timestamp_millis());
    shared::util::now_millis() >= visit_millis
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date() {
        assert!(parse_date("2023-12-25").is_ok());
        assert!(parse_date("25/12/2023").is_err());
        assert!(parse_date("2023-13-01").is_err());
    }

    #[test]
    fn test_parse_timezone_fallback() {
        assert_eq!(
            parse_timezone("Europe/Madrid", chrono_tz::UTC),
            chrono_tz::Europe::Madrid
        );
        assert_eq!(parse_timezone("Mars/Olympus", chrono_tz::UTC), chrono_tz::UTC);
    }

    #[test]
    fn test_visit_started() {
        let past = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
        let future = NaiveDate::from_ymd_opt(2100, 1, 1).unwrap();
        let slot: TimeOfDay = "19:00".parse().unwrap();
        assert!(visit_started(past, slot, chrono_tz::Europe::Madrid));
        assert!(!visit_started(future, slot, chrono_tz::Europe::Madrid));
    }
}
