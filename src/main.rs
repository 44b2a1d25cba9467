use anyhow::Result;
use env_logger::Env;

use travel_scout::config::AppConfig;
use travel_scout::db::Store;
use travel_scout::{display, input, scraping};

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let config = AppConfig::load();
    let store = Store::open_default()?;

    let request = input::collect_search_request()?;

    println!("\nSearching for flights...");
    println!(
        "From: {} ({})",
        request.departure_city, request.departure_code
    );
    println!(
        "To: {} ({})",
        request.destination_city, request.destination_code
    );
    println!("Departure: {}", request.departure_date);
    println!(
        "Return: {}",
        request.return_date.as_deref().unwrap_or("One-way")
    );
    println!("Passengers: {}", request.seats);

    let outcome = scraping::run_search(&config, &request).await;

    println!("\nSearched: {}", outcome.flights_url);
    println!("Searched: {}", outcome.events_url);

    if outcome.flights.is_empty() {
        println!("\nNo flights found");
    } else {
        println!("\nPrices found:");
        for (index, quote) in outcome.flights.iter().enumerate() {
            println!("{}. {}", index + 1, quote.original_text);
        }
        store.save_flight_quotes(&request, &outcome.flights)?;
        println!("\nPrices saved to database!");
    }

    if outcome.events.is_empty() {
        println!("\nNo events found");
    } else {
        store.save_events(&request.destination_city, &outcome.events)?;
        println!("Found {} events in {}", outcome.events.len(), request.destination_city);
    }

    println!(
        "\n{}",
        display::render_trip_summary(&request, &outcome.flights, &outcome.events)
    );

    let recent_flights = store.recent_flights(5, Some(&request.destination_city), None)?;
    println!("\n{}", display::render_flight_table(&recent_flights));

    let recent_events = store.recent_events(10, Some(&request.destination_city))?;
    println!("\n{}", display::render_event_table(&recent_events));

    let latest = store.recent_flights(5, None, None)?;
    if !latest.is_empty() {
        println!("\nRecent searches:");
        println!("{}", display::render_recent_searches(&latest));
    }

    println!("\nDone!");
    Ok(())
}
