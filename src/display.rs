use chrono::{DateTime, NaiveDate, Utc};

use crate::db::{SavedEvent, SavedFlight};
use crate::models::{EventRecord, FlightQuote, SearchRequest};

const TITLE_WIDTH: usize = 50;
const LOCATION_WIDTH: usize = 30;

pub fn render_flight_table(rows: &[SavedFlight]) -> String {
    if rows.is_empty() {
        return "No flight data found.".to_string();
    }

    let headers = [
        "From",
        "Code",
        "To",
        "Code",
        "Departure",
        "Return",
        "Price",
        "Seats",
    ];
    let cells: Vec<Vec<String>> = rows
        .iter()
        .map(|row| {
            vec![
                row.departure_city.clone(),
                row.departure_code.clone(),
                row.destination_city.clone(),
                row.destination_code.clone(),
                format_date(&row.departure_date),
                row.return_date
                    .as_deref()
                    .map(format_date)
                    .unwrap_or_else(|| "One-way".to_string()),
                format!("{} {}", format_amount(row.price), row.currency),
                row.seats.to_string(),
            ]
        })
        .collect();

    format!(
        "Flight Search Results:\n{}\nTotal flights found: {}",
        render_table(&headers, &cells),
        rows.len()
    )
}

pub fn render_event_table(rows: &[SavedEvent]) -> String {
    if rows.is_empty() {
        return "No event data found.".to_string();
    }

    let headers = ["City", "Event", "Date & Time", "Location", "Price"];
    let cells: Vec<Vec<String>> = rows
        .iter()
        .map(|row| {
            vec![
                row.city.clone(),
                truncate(&row.title, TITLE_WIDTH),
                row.datetime_text.clone(),
                truncate(&row.location_text, LOCATION_WIDTH),
                row.price_text.clone(),
            ]
        })
        .collect();

    format!(
        "Event Search Results:\n{}\nTotal events found: {}",
        render_table(&headers, &cells),
        rows.len()
    )
}

/// One-row roll-up of the current search: cheapest quote plus a sample
/// event. Quotes arrive sorted ascending, so the first one is the cheapest.
pub fn render_trip_summary(
    request: &SearchRequest,
    flights: &[FlightQuote],
    events: &[EventRecord],
) -> String {
    let cheapest = flights
        .first()
        .map(|quote| format!("{} {}", format_amount(quote.amount), quote.currency))
        .unwrap_or_else(|| "None found".to_string());
    let example_event = events
        .first()
        .map(|event| truncate(&event.title, TITLE_WIDTH))
        .unwrap_or_else(|| "No events found".to_string());

    let headers = [
        "Destination",
        "Departure",
        "Return",
        "Cheapest Flight",
        "Events Found",
        "Example Event",
    ];
    let cells = vec![vec![
        request.destination_city.clone(),
        format_date(&request.departure_date),
        request
            .return_date
            .as_deref()
            .map(format_date)
            .unwrap_or_else(|| "One-way".to_string()),
        cheapest,
        events.len().to_string(),
        example_event,
    ]];

    format!(
        "=== Travel Plan Summary ===\n{}",
        render_table(&headers, &cells)
    )
}

/// Compact one-per-line recap of previously saved searches.
pub fn render_recent_searches(rows: &[SavedFlight]) -> String {
    rows.iter()
        .enumerate()
        .map(|(index, flight)| {
            format!(
                "{}. {} to {} - {} {} - {} (searched {})",
                index + 1,
                flight.departure_city,
                flight.destination_city,
                format_amount(flight.price),
                flight.currency,
                format_date(&flight.departure_date),
                format_search_date(&flight.search_date),
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn format_search_date(stamp: &DateTime<Utc>) -> String {
    stamp.format("%b %d, %Y %H:%M").to_string()
}

fn format_date(iso: &str) -> String {
    NaiveDate::parse_from_str(iso, "%Y-%m-%d")
        .map(|date| date.format("%b %d, %Y").to_string())
        .unwrap_or_else(|_| iso.to_string())
}

fn format_amount(amount: f64) -> String {
    let rendered = format!("{amount:.2}");
    let (int_part, frac_part) = rendered.split_once('.').unwrap_or((rendered.as_str(), "00"));

    let digits: Vec<char> = int_part.chars().collect();
    let mut grouped = String::new();
    for (index, digit) in digits.iter().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(*digit);
    }

    format!("{grouped}.{frac_part}")
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let clipped: String = text.chars().take(max).collect();
    format!("{clipped}...")
}

fn render_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|header| header.chars().count()).collect();
    for row in rows {
        for (index, cell) in row.iter().enumerate() {
            widths[index] = widths[index].max(cell.chars().count());
        }
    }

    let mut lines = Vec::with_capacity(rows.len() + 1);
    let header_line: Vec<String> = headers
        .iter()
        .enumerate()
        .map(|(index, header)| format!("{header:<width$}", width = widths[index]))
        .collect();
    lines.push(header_line.join("  ").trim_end().to_string());

    for row in rows {
        let line: Vec<String> = row
            .iter()
            .enumerate()
            .map(|(index, cell)| format!("{cell:<width$}", width = widths[index]))
            .collect();
        lines.push(line.join("  ").trim_end().to_string());
    }

    lines.join("\n")
}
