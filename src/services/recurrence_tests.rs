#[cfg(test)]
mod tests {
    use crate::api::*;
    use crate::db::repositories::LocalRepository;
    use crate::external::{AutoApproveAuthorizer, StaticTokenProvider};
    use crate::services::bookings::book_reading;
    use crate::services::error::SchedulingError;
    use crate::services::recurrence::*;
    use chrono::{NaiveDate, TimeZone, Utc};
    use rust_decimal::Decimal;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn weekly(max: u32) -> RecurringPattern {
        RecurringPattern {
            frequency: RecurrenceFrequency::Weekly,
            end_date: None,
            max_occurrences: Some(max),
            day_of_week: None,
            day_of_month: None,
        }
    }

    fn monthly(max: u32) -> RecurringPattern {
        RecurringPattern {
            frequency: RecurrenceFrequency::Monthly,
            end_date: None,
            max_occurrences: Some(max),
            day_of_week: None,
            day_of_month: None,
        }
    }

    // ==================== Occurrence Dates ====================

    #[test]
    fn test_weekly_series_includes_anchor() {
        // 2024-01-01 is a Monday.
        let dates = occurrence_dates(date(2024, 1, 1), &weekly(4)).unwrap();
        assert_eq!(
            dates,
            vec![
                date(2024, 1, 1),
                date(2024, 1, 8),
                date(2024, 1, 15),
                date(2024, 1, 22),
            ]
        );
    }

    #[test]
    fn test_biweekly_advances_fourteen_days() {
        let pattern = RecurringPattern {
            frequency: RecurrenceFrequency::Biweekly,
            ..weekly(3)
        };
        let dates = occurrence_dates(date(2024, 1, 1), &pattern).unwrap();
        assert_eq!(
            dates,
            vec![date(2024, 1, 1), date(2024, 1, 15), date(2024, 1, 29)]
        );
    }

    #[test]
    fn test_monthly_clamps_without_compounding() {
        let dates = occurrence_dates(date(2024, 1, 31), &monthly(4)).unwrap();
        // February clamps to the leap day, but March returns to the 31st.
        assert_eq!(
            dates,
            vec![
                date(2024, 1, 31),
                date(2024, 2, 29),
                date(2024, 3, 31),
                date(2024, 4, 30),
            ]
        );
    }

    #[test]
    fn test_monthly_clamp_in_common_year() {
        let dates = occurrence_dates(date(2023, 1, 31), &monthly(2)).unwrap();
        assert_eq!(dates, vec![date(2023, 1, 31), date(2023, 2, 28)]);
    }

    #[test]
    fn test_monthly_crosses_year_boundary() {
        let dates = occurrence_dates(date(2023, 11, 15), &monthly(4)).unwrap();
        assert_eq!(
            dates,
            vec![
                date(2023, 11, 15),
                date(2023, 12, 15),
                date(2024, 1, 15),
                date(2024, 2, 15),
            ]
        );
    }

    #[test]
    fn test_end_date_terminates_series() {
        let pattern = RecurringPattern {
            end_date: Some(date(2024, 1, 20)),
            max_occurrences: None,
            ..weekly(0)
        };
        let dates = occurrence_dates(date(2024, 1, 1), &pattern).unwrap();
        assert_eq!(
            dates,
            vec![date(2024, 1, 1), date(2024, 1, 8), date(2024, 1, 15)]
        );
    }

    #[test]
    fn test_earliest_bound_wins() {
        let pattern = RecurringPattern {
            end_date: Some(date(2024, 12, 31)),
            ..weekly(2)
        };
        let dates = occurrence_dates(date(2024, 1, 1), &pattern).unwrap();
        assert_eq!(dates.len(), 2);

        let pattern = RecurringPattern {
            end_date: Some(date(2024, 1, 10)),
            ..weekly(50)
        };
        let dates = occurrence_dates(date(2024, 1, 1), &pattern).unwrap();
        assert_eq!(dates.len(), 2);
    }

    #[test]
    fn test_unbounded_series_caps_at_named_constant() {
        let pattern = RecurringPattern {
            max_occurrences: None,
            ..weekly(0)
        };
        let dates = occurrence_dates(date(2024, 1, 1), &pattern).unwrap();
        assert_eq!(dates.len(), MAX_RECURRENCE_OCCURRENCES as usize);
    }

    #[test]
    fn test_single_occurrence_is_just_the_anchor() {
        let dates = occurrence_dates(date(2024, 1, 1), &weekly(1)).unwrap();
        assert_eq!(dates, vec![date(2024, 1, 1)]);
    }

    #[test]
    fn test_zero_occurrences_rejected() {
        let result = occurrence_dates(date(2024, 1, 1), &weekly(0));
        assert!(matches!(result, Err(SchedulingError::Validation(_))));
    }

    #[test]
    fn test_day_of_week_anchor_must_match() {
        let mut pattern = weekly(4);
        pattern.day_of_week = Some(1);
        assert!(occurrence_dates(date(2024, 1, 1), &pattern).is_ok());

        // 2024-01-01 is a Monday (1), not a Tuesday (2).
        pattern.day_of_week = Some(2);
        let result = occurrence_dates(date(2024, 1, 1), &pattern);
        assert!(matches!(result, Err(SchedulingError::Validation(_))));

        pattern.day_of_week = Some(7);
        let result = occurrence_dates(date(2024, 1, 1), &pattern);
        assert!(matches!(result, Err(SchedulingError::Validation(_))));
    }

    #[test]
    fn test_day_of_month_anchor_must_match() {
        let mut pattern = monthly(4);
        pattern.day_of_month = Some(31);
        assert!(occurrence_dates(date(2024, 1, 31), &pattern).is_ok());
        // A clamped anchor still matches: the 31st in February is the 29th.
        assert!(occurrence_dates(date(2024, 2, 29), &pattern).is_ok());

        let result = occurrence_dates(date(2024, 1, 15), &pattern);
        assert!(matches!(result, Err(SchedulingError::Validation(_))));

        pattern.day_of_month = Some(0);
        let result = occurrence_dates(date(2024, 1, 31), &pattern);
        assert!(matches!(result, Err(SchedulingError::Validation(_))));
    }

    // ==================== Expansion ====================

    fn auth() -> StaticTokenProvider {
        StaticTokenProvider::new("tok_test")
    }

    fn template_input(pattern: RecurringPattern) -> BookingInput {
        BookingInput {
            client_id: ClientId(10),
            reader_id: ReaderId(1),
            package_id: None,
            reading_type: ReadingType::Chat,
            // 2024-01-01 10:00 UTC, a Monday.
            scheduled_at: Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap(),
            duration_minutes: 30,
            price: Decimal::new(3000, 2),
            time_zone: "UTC".to_string(),
            special_requests: None,
            recurrence: Some(pattern),
        }
    }

    #[tokio::test]
    async fn test_expansion_books_the_rest_of_the_series() {
        let repo = LocalRepository::new();
        let template = book_reading(
            &repo,
            &auth(),
            &AutoApproveAuthorizer,
            template_input(weekly(4)),
        )
        .await
        .unwrap();
        assert!(template.recurrence.is_some());

        let report = expand_recurring_booking(&repo, &auth(), &AutoApproveAuthorizer, &template)
            .await
            .unwrap();

        assert_eq!(report.booked.len(), 3);
        assert!(report.skipped.is_empty());
        assert_eq!(repo.booking_count(), 4);

        for (instance, week) in report.booked.iter().zip([8, 15, 22]) {
            assert_eq!(
                instance.scheduled_at,
                Utc.with_ymd_and_hms(2024, 1, week, 10, 0, 0).unwrap()
            );
            assert_eq!(instance.status, ReadingStatus::Pending);
            assert_eq!(instance.price, template.price);
            // Instances are plain bookings, not further templates.
            assert!(instance.recurrence.is_none());
        }
    }

    #[tokio::test]
    async fn test_conflicting_occurrence_is_skipped_not_fatal() {
        let repo = LocalRepository::new();

        // Another client already owns the third Monday's window.
        let mut blocker = template_input(weekly(1));
        blocker.client_id = ClientId(99);
        blocker.recurrence = None;
        blocker.scheduled_at = Utc.with_ymd_and_hms(2024, 1, 15, 10, 0, 0).unwrap();
        book_reading(&repo, &auth(), &AutoApproveAuthorizer, blocker)
            .await
            .unwrap();

        let template = book_reading(
            &repo,
            &auth(),
            &AutoApproveAuthorizer,
            template_input(weekly(4)),
        )
        .await
        .unwrap();

        let report = expand_recurring_booking(&repo, &auth(), &AutoApproveAuthorizer, &template)
            .await
            .unwrap();

        assert_eq!(report.booked.len(), 2);
        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.skipped[0].date, date(2024, 1, 15));
        assert!(!report.skipped[0].reason.is_empty());

        // The occurrence after the skipped one was still booked.
        assert!(report
            .booked
            .iter()
            .any(|b| b.scheduled_at == Utc.with_ymd_and_hms(2024, 1, 22, 10, 0, 0).unwrap()));
    }

    #[tokio::test]
    async fn test_expansion_requires_a_pattern() {
        let repo = LocalRepository::new();
        let mut plain = template_input(weekly(4));
        plain.recurrence = None;
        let stored = book_reading(&repo, &auth(), &AutoApproveAuthorizer, plain)
            .await
            .unwrap();

        let result =
            expand_recurring_booking(&repo, &auth(), &AutoApproveAuthorizer, &stored).await;
        assert!(matches!(result, Err(SchedulingError::Validation(_))));
    }
}
