//! End-to-end booking flow across the feature stores.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)] // Test code

use chrono::{NaiveDate, TimeZone, Utc};
use cineplex_api::{
    ChatResponse, Cinema, CinemaId, CityWithCount, LoginResponse, Money, MovieId,
    MovieWithShowtimes, ShowtimeId, ShowtimeSlot, UserId, UserProfile,
};
use cineplex_booking::chat::{self, ChatAction};
use cineplex_booking::location::{self, LocationFilterAction};
use cineplex_booking::selection::{self, BookingContext, SeatSelectionAction, SelectionPhase};
use cineplex_booking::session::{MemoryStorage, Session};
use cineplex_booking::{BookingEnvironment, SeatClass, SeatId, SeatStatus};
use cineplex_testing::{ApiCall, MockCinemaApi, init_test_tracing, test_clock};
use std::sync::Arc;
use std::time::Duration;

const SHOWTIME: ShowtimeId = ShowtimeId::new(501);

fn seat(label: &str) -> SeatId {
    label.parse().unwrap()
}

fn api() -> MockCinemaApi {
    let today = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
    MockCinemaApi::new()
        .with_cities(Ok(vec![CityWithCount {
            city: "Đà Nẵng".to_string(),
            count: 1,
        }]))
        .with_cinemas(
            "Đà Nẵng",
            Ok(vec![Cinema {
                cinema_id: CinemaId::new(3),
                name: "CGV Vĩnh Trung Plaza".to_string(),
                city: "Đà Nẵng".to_string(),
            }]),
        )
        .with_showtimes(
            CinemaId::new(3),
            today,
            Ok(vec![MovieWithShowtimes {
                movie_id: MovieId::new(42),
                title: "Mai".to_string(),
                genre: Some("Tâm lý".to_string()),
                duration_minutes: Some(131),
                rating: Some(8.4),
                age_rating: Some("T18".to_string()),
                poster_url: None,
                features: vec!["2D".to_string(), "IMAX".to_string()],
                times: vec![ShowtimeSlot {
                    showtime_id: SHOWTIME,
                    start_time: Utc.with_ymd_and_hms(2025, 1, 1, 13, 0, 0).unwrap(),
                    ticket_price: "90000.00".parse().unwrap(),
                }],
            }]),
        )
        .with_occupied(SHOWTIME, Ok(vec!["A1".to_string(), "A2".to_string()]))
}

fn env(api: &MockCinemaApi) -> BookingEnvironment {
    BookingEnvironment::new(Arc::new(api.clone()), Arc::new(test_clock()))
}

#[tokio::test]
async fn from_city_list_to_checkout() {
    init_test_tracing();
    let api = api();
    let env = env(&api);

    // Filter down to a showtime.
    let filter = location::store(env.clone());
    filter.send(LocationFilterAction::Start).await.unwrap();
    filter.settled_within(Duration::from_secs(2)).await.unwrap();

    let mut handoffs = filter.subscribe_actions();
    filter
        .send(LocationFilterAction::SelectShowtime {
            movie_id: MovieId::new(42),
            showtime_id: SHOWTIME,
            format: "IMAX".to_string(),
        })
        .await
        .unwrap();
    let context = match handoffs.recv().await.unwrap() {
        LocationFilterAction::ShowtimeSelected { context } => context,
        other => panic!("unexpected action: {other:?}"),
    };
    filter.shutdown();
    assert_eq!(context.cinema_name, "CGV Vĩnh Trung Plaza");
    assert_eq!(context.format, "IMAX");

    // Pick seats.
    let seats = selection::store(Some(context), env);
    assert_eq!(seats.state(|s| s.phase()).await, SelectionPhase::Loading);
    seats.send(SeatSelectionAction::LoadOccupied).await.unwrap();
    seats.settled().await;
    assert_eq!(seats.state(|s| s.seat_status(seat("A1"))).await, SeatStatus::Occupied);

    for label in ["A1", "E5", "E6", "F5", "F6", "G5", "G6", "H5", "H6", "J1"] {
        seats.send(SeatSelectionAction::Toggle { seat: seat(label) }).await.unwrap();
    }
    let (label, total) = seats.state(|s| (s.selection_label(), s.total())).await;
    assert_eq!(label, "8/8");
    assert_eq!(total, Money::from_major(720_000).unwrap());
    assert_eq!(seats.state(|s| s.seat_status(seat("J1"))).await, SeatStatus::Available(SeatClass::Vip));

    let mut checkouts = seats.subscribe_actions();
    seats.send(SeatSelectionAction::Checkout).await.unwrap();
    let request = match checkouts.recv().await.unwrap() {
        SeatSelectionAction::CheckoutRequested { request } => request,
        other => panic!("unexpected action: {other:?}"),
    };
    assert_eq!(request.seats.first(), Some(&seat("E5")));
    assert_eq!(request.seats.len(), 8);
    assert_eq!(request.total, Money::from_major(720_000).unwrap());

    assert_eq!(
        api.calls(),
        vec![
            ApiCall::Cities,
            ApiCall::Cinemas("Đà Nẵng".to_string()),
            ApiCall::Showtimes(CinemaId::new(3), NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()),
            ApiCall::OccupiedSeats(SHOWTIME),
        ]
    );
}

#[tokio::test]
async fn leaving_the_page_discards_late_occupied_seats() {
    let api = api();
    let store = selection::store(None, env(&api));
    store
        .send(SeatSelectionAction::ChangeContext {
            context: Some(BookingContext {
                movie_id: MovieId::new(42),
                movie_title: "Mai".to_string(),
                showtime_id: SHOWTIME,
                start_time: Utc.with_ymd_and_hms(2025, 1, 1, 13, 0, 0).unwrap(),
                ticket_price: Money::from_major(90_000).unwrap(),
                cinema_name: "CGV Vĩnh Trung Plaza".to_string(),
                format: "2D".to_string(),
            }),
        })
        .await
        .unwrap();

    // The current-thread test runtime has not polled the fetch yet.
    store.shutdown();
    store.settled().await;

    assert_eq!(api.calls(), vec![ApiCall::OccupiedSeats(SHOWTIME)]);
    assert!(store.state(|s| s.is_loading() && s.occupied().is_empty()).await);
    assert!(store.send(SeatSelectionAction::Reset).await.is_err());
}

#[tokio::test]
async fn chat_uses_the_session_token() {
    let api = api()
        .with_login(Ok(LoginResponse {
            token: Some("tok-7".to_string()),
            message: Some("Đăng nhập thành công".to_string()),
        }))
        .with_profile(
            "tok-7",
            Ok(UserProfile {
                user_id: UserId::new(7),
                username: "Minh".to_string(),
                email: "minh@example.com".to_string(),
                phone: None,
            }),
        )
        .with_chat(Ok(ChatResponse {
            reply: "Bạn có thể xem **Mai** lúc 13:00.".to_string(),
        }));
    let env = env(&api);
    let session = Arc::new(Session::from_env(&env, MemoryStorage::new()));
    let chat = chat::store(env);

    // Signed out: local notice only.
    chat.send(ChatAction::Send {
        text: "Có phim gì?".to_string(),
        token: session.token(),
    })
    .await
    .unwrap();
    chat.settled().await;
    assert_eq!(api.count(|call| matches!(call, ApiCall::Chat { .. })), 0);

    session.login("minh@example.com", "secret").await.unwrap();
    assert!(session.is_authenticated());

    chat.send(ChatAction::Send {
        text: "Có phim gì?".to_string(),
        token: session.token(),
    })
    .await
    .unwrap();
    chat.settled().await;

    let last = chat.state(|s| s.messages().last().cloned()).await.unwrap();
    assert_eq!(last.text, "Bạn có thể xem **Mai** lúc 13:00.");
    assert_eq!(
        api.count(|call| matches!(call, ApiCall::Chat { token, history_len: 3, .. } if token == "tok-7")),
        1
    );
}
