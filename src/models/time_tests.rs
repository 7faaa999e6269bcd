#[cfg(test)]
mod tests {
    use crate::models::time::{hhmm, resolve_utc, weekday_index, Interval};
    use chrono::{DateTime, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
    use proptest::prelude::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn wall(h: u32, min: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, min, 0).unwrap()
    }

    fn at(h: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, h, min, 0).unwrap()
    }

    #[test]
    fn test_interval_new_rejects_inverted_and_empty() {
        assert!(Interval::new(at(10, 0), at(11, 0)).is_some());
        assert!(Interval::new(at(11, 0), at(10, 0)).is_none());
        assert!(Interval::new(at(10, 0), at(10, 0)).is_none());
    }

    #[test]
    fn test_from_start_spans_requested_minutes() {
        let iv = Interval::from_start(at(9, 0), 45);
        assert_eq!(iv.end, at(9, 45));
        assert_eq!(iv.duration_minutes(), 45);
    }

    #[test]
    fn test_overlapping_intervals_detected() {
        let a = Interval::from_start(at(10, 0), 60);
        let b = Interval::from_start(at(10, 30), 60);
        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
    }

    #[test]
    fn test_touching_endpoints_do_not_overlap() {
        let first = Interval::from_start(at(13, 0), 60);
        let second = Interval::from_start(at(14, 0), 60);
        assert!(!first.overlaps(&second));
        assert!(!second.overlaps(&first));
    }

    #[test]
    fn test_nested_interval_overlaps() {
        let outer = Interval::from_start(at(9, 0), 180);
        let inner = Interval::from_start(at(10, 0), 30);
        assert!(outer.overlaps(&inner));
        assert!(inner.overlaps(&outer));
    }

    #[test]
    fn test_contains_is_inclusive_start_exclusive_end() {
        let iv = Interval::from_start(at(10, 0), 30);
        assert!(iv.contains(at(10, 0)));
        assert!(iv.contains(at(10, 29)));
        assert!(!iv.contains(at(10, 30)));
        assert!(!iv.contains(at(9, 59)));
    }

    #[test]
    fn test_weekday_index_starts_at_sunday() {
        // 2024-01-07 was a Sunday.
        assert_eq!(weekday_index(date(2024, 1, 7)), 0);
        assert_eq!(weekday_index(date(2024, 1, 8)), 1);
        assert_eq!(weekday_index(date(2024, 1, 13)), 6);
    }

    #[test]
    fn test_resolve_utc_combines_date_and_wall_clock() {
        let instant = resolve_utc(date(2024, 3, 15), wall(18, 30));
        assert_eq!(instant, Utc.with_ymd_and_hms(2024, 3, 15, 18, 30, 0).unwrap());
    }

    #[derive(serde::Serialize, serde::Deserialize)]
    struct Wrapper {
        #[serde(with = "hhmm")]
        t: NaiveTime,
    }

    #[test]
    fn test_hhmm_serializes_without_seconds() {
        let json = serde_json::to_string(&Wrapper { t: wall(9, 5) }).unwrap();
        assert_eq!(json, r#"{"t":"09:05"}"#);
    }

    #[test]
    fn test_hhmm_accepts_both_forms() {
        let short: Wrapper = serde_json::from_str(r#"{"t":"14:30"}"#).unwrap();
        assert_eq!(short.t, wall(14, 30));

        let long: Wrapper = serde_json::from_str(r#"{"t":"14:30:00"}"#).unwrap();
        assert_eq!(long.t, wall(14, 30));
    }

    #[test]
    fn test_hhmm_rejects_invalid_times() {
        assert!(serde_json::from_str::<Wrapper>(r#"{"t":"25:00"}"#).is_err());
        assert!(serde_json::from_str::<Wrapper>(r#"{"t":"oops"}"#).is_err());
    }

    proptest! {
        #[test]
        fn test_overlap_is_symmetric(
            s1 in 0i64..10_000,
            d1 in 1i64..500,
            s2 in 0i64..10_000,
            d2 in 1i64..500,
        ) {
            let base = at(0, 0);
            let a = Interval {
                start: base + Duration::minutes(s1),
                end: base + Duration::minutes(s1 + d1),
            };
            let b = Interval {
                start: base + Duration::minutes(s2),
                end: base + Duration::minutes(s2 + d2),
            };
            prop_assert_eq!(a.overlaps(&b), b.overlaps(&a));
        }

        #[test]
        fn test_later_intervals_never_overlap(
            s1 in 0i64..5_000,
            d1 in 1i64..500,
            gap in 0i64..500,
            d2 in 1i64..500,
        ) {
            let base = at(0, 0);
            let a = Interval {
                start: base + Duration::minutes(s1),
                end: base + Duration::minutes(s1 + d1),
            };
            let b = Interval {
                start: a.end + Duration::minutes(gap),
                end: a.end + Duration::minutes(gap + d2),
            };
            prop_assert!(!a.overlaps(&b));
            prop_assert!(!b.overlaps(&a));
        }
    }
}
