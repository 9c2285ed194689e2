//! Command-line walk through the booking flow.
//!
//! Loads cities, cinemas and today's showtimes, then opens the first
//! showtime's seat map. Pass a city name to start there instead of the
//! first city.
//!
//! ```text
//! CINEPLEX_API_URL=http://localhost:5001/api cargo run --bin cineplex -- "Hà Nội"
//! ```

use anyhow::{Context, bail};
use cineplex_booking::location::{self, LocationFilterAction, LocationFilterState};
use cineplex_booking::selection::{self, SeatSelectionAction};
use cineplex_booking::session::{FileStorage, MemoryStorage, Session, TokenStorage};
use cineplex_booking::{BookingEnvironment, ClientConfig, SeatStatus, seat};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    let config = ClientConfig::from_env().context("invalid configuration")?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.log_level.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(api_url = %config.api_url, "Configuration loaded");
    let env = BookingEnvironment::from_config(&config).context("failed to build API client")?;

    match &config.storage_path {
        Some(path) => report_session(&Session::from_env(&env, FileStorage::new(path))).await,
        None => report_session(&Session::from_env(&env, MemoryStorage::new())).await,
    }

    let filter = location::store(env.clone());
    filter.send(LocationFilterAction::Start).await?;
    filter.settled().await;

    if let Some(city) = std::env::args().nth(1) {
        filter.send(LocationFilterAction::SelectCity { city }).await?;
        filter.settled().await;
    }

    let summary = filter.state(describe_filter).await;
    println!("{summary}");

    let pick = filter
        .state(|state| {
            let movie = state.showtimes().items().first()?;
            let slot = movie.times.first()?;
            let format = movie.features.first().cloned().unwrap_or_default();
            Some((movie.movie_id, slot.showtime_id, format))
        })
        .await;
    let Some((movie_id, showtime_id, format)) = pick else {
        bail!("no showtimes to book");
    };

    let context = filter
        .state(|state| state.booking_context(movie_id, showtime_id, &format))
        .await
        .context("showtime vanished from the list")?;
    filter.shutdown();

    let seats = selection::store(Some(context), env);
    seats.send(SeatSelectionAction::LoadOccupied).await?;
    seats.settled().await;

    let map = seats.state(|state| render_seat_map(&state.seat_map())).await;
    println!("{map}");
    Ok(())
}

async fn report_session<S: TokenStorage>(session: &Session<S>) {
    match session.restore().await {
        Ok(Some(user)) => info!(name = %user.name, "Signed in"),
        Ok(None) => info!("Browsing signed out"),
        Err(e) => info!(error = %e, "Stored session expired"),
    }
}

fn describe_filter(state: &LocationFilterState) -> String {
    let mut out = String::new();
    let date = state.date().map_or_else(|| "-".to_string(), |d| d.to_string());
    out.push_str(&format!(
        "{} / {} / {date}\n",
        state.selected_city().unwrap_or("-"),
        state.selected_cinema().map_or("-", |c| c.name.as_str()),
    ));
    for movie in state.showtimes().items() {
        let times: Vec<String> = movie
            .times
            .iter()
            .map(|slot| format!("{} ({})", slot.start_time.format("%H:%M"), slot.ticket_price))
            .collect();
        out.push_str(&format!("  {} [{}]: {}\n", movie.title, movie.features.join(", "), times.join(", ")));
    }
    if state.showtimes().items().is_empty() {
        out.push_str("  no showtimes\n");
    }
    out
}

fn render_seat_map(map: &[(seat::SeatId, SeatStatus)]) -> String {
    let mut out = String::new();
    for row in seat::ROWS {
        out.push(row);
        out.push(' ');
        for (_, status) in map.iter().filter(|(seat, _)| seat.row() == row) {
            out.push(match status {
                SeatStatus::Occupied => 'x',
                SeatStatus::Selected => '*',
                SeatStatus::Available(seat::SeatClass::Vip) => 'V',
                SeatStatus::Available(seat::SeatClass::Standard) => '.',
            });
        }
        out.push('\n');
    }
    out
}
