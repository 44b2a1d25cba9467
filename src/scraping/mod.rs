pub mod base;
pub mod esky_flights;
pub mod eventbrite_events;
pub mod fetch;

use crate::config::AppConfig;
use crate::models::{EventRecord, FlightQuote, SearchRequest};
use crate::pricing;

use fetch::PageFetcher;

pub struct SearchOutcome {
    pub flights: Vec<FlightQuote>,
    pub events: Vec<EventRecord>,
    pub flights_url: String,
    pub events_url: String,
}

/// Runs both site pipelines concurrently and joins the results. The
/// pipelines share nothing: each owns its browser session and returns its
/// own value, so no locking is involved. A failed pipeline contributes an
/// empty list, never an error.
pub async fn run_search(config: &AppConfig, request: &SearchRequest) -> SearchOutcome {
    let flights_url = esky_flights::build_search_url(request);
    let events_url =
        eventbrite_events::build_events_url(&request.destination_city, &request.departure_date);

    let (flights, events) = tokio::join!(
        search_flights(config, &flights_url),
        search_events(config, &events_url),
    );

    SearchOutcome {
        flights,
        events,
        flights_url,
        events_url,
    }
}

async fn search_flights(config: &AppConfig, url: &str) -> Vec<FlightQuote> {
    log::info!("searching flights: {url}");
    let html = match fetch_page(config, url, false).await {
        Some(html) => html,
        None => return Vec::new(),
    };

    let offers = esky_flights::parse_flight_prices(&html);
    log::info!("found {} flight offers", offers.len());
    pricing::process_flight_prices(offers)
}

async fn search_events(config: &AppConfig, url: &str) -> Vec<EventRecord> {
    log::info!("searching events: {url}");
    let html = match fetch_page(config, url, true).await {
        Some(html) => html,
        None => return Vec::new(),
    };

    let events = eventbrite_events::parse_events(&html);
    log::info!("found {} events", events.len());
    events
}

async fn fetch_page(config: &AppConfig, url: &str, scroll: bool) -> Option<String> {
    let fetcher = match PageFetcher::connect(config).await {
        Ok(fetcher) => fetcher,
        Err(err) => {
            log::error!("browser session unavailable: {err:#}");
            return None;
        }
    };

    let html = if scroll {
        fetcher.fetch_scrolled(url).await
    } else {
        fetcher.fetch(url).await
    };
    fetcher.close().await;
    html
}
