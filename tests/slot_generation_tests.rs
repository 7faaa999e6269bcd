//! Integration tests for slot generation.
//!
//! These exercise the full path from weekly availability templates through
//! the service layer to concrete dated slots, including the carve-outs
//! produced by real bookings.

mod support;

use arcana_rust::api::{ReaderId, ReadingType};
use arcana_rust::db::repositories::LocalRepository;
use arcana_rust::external::{AutoApproveAuthorizer, StaticTokenProvider};
use arcana_rust::services;

use support::{
    at, chat_booking_input, chat_package, day, flat_rate_card, hm, price, weekday_window,
};

const READER: ReaderId = ReaderId(7);

fn auth() -> StaticTokenProvider {
    StaticTokenProvider::new("tok_test")
}

fn seed_reader(repo: &LocalRepository, per_minute: &str) {
    repo.seed_rate_card(flat_rate_card(READER, per_minute));
}

#[tokio::test]
async fn test_template_generates_slots_across_week() {
    let repo = LocalRepository::new();
    seed_reader(&repo, "2.00");

    // Monday 09:00-12:00 and Wednesday 14:00-16:00
    services::set_reader_availability(
        &repo,
        READER,
        vec![
            weekday_window(READER, 1, hm(9, 0), hm(12, 0)),
            weekday_window(READER, 3, hm(14, 0), hm(16, 0)),
        ],
    )
    .await
    .unwrap();

    let slots = services::get_available_time_slots(
        &repo,
        READER,
        ReadingType::Chat,
        day(2024, 1, 8),
        day(2024, 1, 14),
        60,
    )
    .await
    .unwrap();

    let starts: Vec<_> = slots.iter().map(|s| (s.date, s.start_time)).collect();
    assert_eq!(
        starts,
        vec![
            (day(2024, 1, 8), hm(9, 0)),
            (day(2024, 1, 8), hm(10, 0)),
            (day(2024, 1, 8), hm(11, 0)),
            (day(2024, 1, 10), hm(14, 0)),
            (day(2024, 1, 10), hm(15, 0)),
        ]
    );
    assert!(slots.iter().all(|s| s.available));
    assert!(slots.iter().all(|s| s.price == price("120.00")));
    assert!(slots.iter().all(|s| s.duration_minutes == 60));
}

#[tokio::test]
async fn test_booked_window_removed_from_following_query() {
    let repo = LocalRepository::new();
    seed_reader(&repo, "1.50");
    services::set_reader_availability(
        &repo,
        READER,
        vec![weekday_window(READER, 1, hm(9, 0), hm(12, 0))],
    )
    .await
    .unwrap();

    services::book_reading(
        &repo,
        &auth(),
        &AutoApproveAuthorizer,
        chat_booking_input(1, READER, at(2024, 1, 8, 10, 0), 60, "90.00"),
    )
    .await
    .unwrap();

    let slots = services::get_available_time_slots(
        &repo,
        READER,
        ReadingType::Chat,
        day(2024, 1, 8),
        day(2024, 1, 8),
        60,
    )
    .await
    .unwrap();

    let starts: Vec<_> = slots.iter().map(|s| s.start_time).collect();
    assert_eq!(starts, vec![hm(9, 0), hm(11, 0)]);
}

#[tokio::test]
async fn test_cancelled_booking_frees_its_window() {
    let repo = LocalRepository::new();
    seed_reader(&repo, "1.50");
    services::set_reader_availability(
        &repo,
        READER,
        vec![weekday_window(READER, 1, hm(9, 0), hm(12, 0))],
    )
    .await
    .unwrap();

    let booked = services::book_reading(
        &repo,
        &auth(),
        &AutoApproveAuthorizer,
        chat_booking_input(1, READER, at(2024, 1, 8, 10, 0), 60, "90.00"),
    )
    .await
    .unwrap();
    services::cancel_reading(&repo, booked.id.unwrap(), "client emergency".to_string())
        .await
        .unwrap();

    let slots = services::get_available_time_slots(
        &repo,
        READER,
        ReadingType::Chat,
        day(2024, 1, 8),
        day(2024, 1, 8),
        60,
    )
    .await
    .unwrap();

    assert_eq!(slots.len(), 3);
}

#[tokio::test]
async fn test_break_minutes_space_out_slots() {
    let repo = LocalRepository::new();
    seed_reader(&repo, "1.00");

    let mut window = weekday_window(READER, 1, hm(9, 0), hm(12, 0));
    window.break_minutes = Some(15);
    services::set_reader_availability(&repo, READER, vec![window])
        .await
        .unwrap();

    let slots = services::get_available_time_slots(
        &repo,
        READER,
        ReadingType::Chat,
        day(2024, 1, 8),
        day(2024, 1, 8),
        45,
    )
    .await
    .unwrap();

    let starts: Vec<_> = slots.iter().map(|s| s.start_time).collect();
    assert_eq!(starts, vec![hm(9, 0), hm(10, 0), hm(11, 0)]);
}

#[tokio::test]
async fn test_package_price_wins_over_rate_card() {
    let repo = LocalRepository::new();
    seed_reader(&repo, "2.00");
    repo.seed_package(chat_package(41, READER, 60, "50.00"));

    services::set_reader_availability(
        &repo,
        READER,
        vec![weekday_window(READER, 1, hm(9, 0), hm(11, 0))],
    )
    .await
    .unwrap();

    let slots = services::get_available_time_slots(
        &repo,
        READER,
        ReadingType::Chat,
        day(2024, 1, 8),
        day(2024, 1, 8),
        60,
    )
    .await
    .unwrap();

    assert_eq!(slots.len(), 2);
    assert!(slots.iter().all(|s| s.price == price("50.00")));
}

#[tokio::test]
async fn test_window_limited_to_listed_reading_types() {
    let repo = LocalRepository::new();
    seed_reader(&repo, "1.00");

    let mut window = weekday_window(READER, 1, hm(9, 0), hm(11, 0));
    window.reading_types = vec![ReadingType::Video];
    services::set_reader_availability(&repo, READER, vec![window])
        .await
        .unwrap();

    let chat = services::get_available_time_slots(
        &repo,
        READER,
        ReadingType::Chat,
        day(2024, 1, 8),
        day(2024, 1, 8),
        30,
    )
    .await
    .unwrap();
    assert!(chat.is_empty());

    let video = services::get_available_time_slots(
        &repo,
        READER,
        ReadingType::Video,
        day(2024, 1, 8),
        day(2024, 1, 8),
        30,
    )
    .await
    .unwrap();
    assert_eq!(video.len(), 4);
}

#[tokio::test]
async fn test_two_windows_on_the_same_day() {
    let repo = LocalRepository::new();
    seed_reader(&repo, "1.00");

    services::set_reader_availability(
        &repo,
        READER,
        vec![
            weekday_window(READER, 1, hm(9, 0), hm(10, 30)),
            weekday_window(READER, 1, hm(13, 0), hm(14, 30)),
        ],
    )
    .await
    .unwrap();

    let slots = services::get_available_time_slots(
        &repo,
        READER,
        ReadingType::Chat,
        day(2024, 1, 8),
        day(2024, 1, 8),
        45,
    )
    .await
    .unwrap();

    let starts: Vec<_> = slots.iter().map(|s| s.start_time).collect();
    assert_eq!(starts, vec![hm(9, 0), hm(9, 45), hm(13, 0), hm(13, 45)]);
}

#[tokio::test]
async fn test_trailing_remainder_shorter_than_duration_dropped() {
    let repo = LocalRepository::new();
    seed_reader(&repo, "1.00");

    services::set_reader_availability(
        &repo,
        READER,
        vec![weekday_window(READER, 1, hm(9, 0), hm(10, 10))],
    )
    .await
    .unwrap();

    let slots = services::get_available_time_slots(
        &repo,
        READER,
        ReadingType::Chat,
        day(2024, 1, 8),
        day(2024, 1, 8),
        30,
    )
    .await
    .unwrap();

    let starts: Vec<_> = slots.iter().map(|s| s.start_time).collect();
    assert_eq!(starts, vec![hm(9, 0), hm(9, 30)]);
}

#[tokio::test]
async fn test_replacing_template_moves_the_slots() {
    let repo = LocalRepository::new();
    seed_reader(&repo, "1.00");

    services::set_reader_availability(
        &repo,
        READER,
        vec![weekday_window(READER, 1, hm(9, 0), hm(11, 0))],
    )
    .await
    .unwrap();
    // Replace Monday with Tuesday
    services::set_reader_availability(
        &repo,
        READER,
        vec![weekday_window(READER, 2, hm(9, 0), hm(11, 0))],
    )
    .await
    .unwrap();

    let monday = services::get_available_time_slots(
        &repo,
        READER,
        ReadingType::Chat,
        day(2024, 1, 8),
        day(2024, 1, 8),
        60,
    )
    .await
    .unwrap();
    assert!(monday.is_empty());

    let tuesday = services::get_available_time_slots(
        &repo,
        READER,
        ReadingType::Chat,
        day(2024, 1, 9),
        day(2024, 1, 9),
        60,
    )
    .await
    .unwrap();
    assert_eq!(tuesday.len(), 2);
}
