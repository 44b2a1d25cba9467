use anyhow::Result;
use chrono::{Local, NaiveDate};
use dialoguer::Input;
use thiserror::Error;

use crate::models::SearchRequest;

#[derive(Debug, Error, PartialEq)]
pub enum DateError {
    #[error("use YYYY-MM-DD format")]
    Format,
    #[error("date has passed")]
    Past,
    #[error("return date must be after departure date")]
    BeforeDeparture,
}

const AIRPORT_CODES: [(&str, &str); 10] = [
    ("malaga", "AGP"),
    ("riga", "RIX"),
    ("new york", "NYC"),
    ("los angeles", "LAX"),
    ("london", "LON"),
    ("paris", "PAR"),
    ("tokyo", "TYO"),
    ("sydney", "SYD"),
    ("berlin", "BER"),
    ("madrid", "MAD"),
];

/// Known cities map to their metro code; anything else falls back to the
/// first three letters uppercased.
pub fn airport_code(city: &str) -> String {
    let lowered = city.trim().to_lowercase();
    if let Some((_, code)) = AIRPORT_CODES.iter().find(|(name, _)| *name == lowered) {
        return (*code).to_string();
    }
    city.trim().to_uppercase().chars().take(3).collect()
}

pub fn validate_travel_date(input: &str) -> Result<NaiveDate, DateError> {
    let date = NaiveDate::parse_from_str(input, "%Y-%m-%d").map_err(|_| DateError::Format)?;
    if date < Local::now().date_naive() {
        return Err(DateError::Past);
    }
    Ok(date)
}

pub fn validate_return_date(input: &str, departure: NaiveDate) -> Result<NaiveDate, DateError> {
    let date = validate_travel_date(input)?;
    if date < departure {
        return Err(DateError::BeforeDeparture);
    }
    Ok(date)
}

/// Prompts until every field validates; dialoguer re-asks on rejection.
pub fn collect_search_request() -> Result<SearchRequest> {
    println!("Enter travel details:");

    let departure_city: String = Input::new()
        .with_prompt("Departure city")
        .validate_with(|input: &String| {
            if input.trim().is_empty() {
                Err("city is required")
            } else {
                Ok(())
            }
        })
        .interact_text()?;

    let destination_city: String = Input::new()
        .with_prompt("Destination city")
        .validate_with(|input: &String| {
            if input.trim().is_empty() {
                Err("city is required")
            } else {
                Ok(())
            }
        })
        .interact_text()?;

    let departure_date: String = Input::new()
        .with_prompt("Departure date (YYYY-MM-DD)")
        .validate_with(|input: &String| {
            validate_travel_date(input.trim())
                .map(|_| ())
                .map_err(|err| err.to_string())
        })
        .interact_text()?;
    let departure_date = departure_date.trim().to_string();
    let departure = validate_travel_date(&departure_date)
        .map_err(|err| anyhow::anyhow!("departure date rejected: {err}"))?;

    let return_date: String = Input::new()
        .with_prompt("Return date (YYYY-MM-DD, empty for one-way)")
        .allow_empty(true)
        .validate_with(move |input: &String| {
            if input.trim().is_empty() {
                return Ok(());
            }
            validate_return_date(input.trim(), departure)
                .map(|_| ())
                .map_err(|err| err.to_string())
        })
        .interact_text()?;
    let return_date = {
        let trimmed = return_date.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    };

    let seats: u8 = Input::new()
        .with_prompt("Number of passengers (1-9)")
        .validate_with(|input: &u8| {
            if (1..=9).contains(input) {
                Ok(())
            } else {
                Err("number of passengers must be between 1 and 9")
            }
        })
        .interact_text()?;

    let departure_city = departure_city.trim().to_string();
    let destination_city = destination_city.trim().to_string();

    Ok(SearchRequest {
        departure_code: airport_code(&departure_city),
        destination_code: airport_code(&destination_city),
        departure_city,
        destination_city,
        departure_date,
        return_date,
        seats,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_cities_use_the_table() {
        assert_eq!(airport_code("Malaga"), "AGP");
        assert_eq!(airport_code("new YORK"), "NYC");
        assert_eq!(airport_code("  riga "), "RIX");
    }

    #[test]
    fn unknown_cities_fall_back_to_prefix() {
        assert_eq!(airport_code("Boise"), "BOI");
        assert_eq!(airport_code("ny"), "NY");
    }

    #[test]
    fn rejects_non_iso_dates() {
        assert_eq!(validate_travel_date("01-09-2026"), Err(DateError::Format));
        assert_eq!(validate_travel_date("tomorrow"), Err(DateError::Format));
    }

    #[test]
    fn rejects_past_dates() {
        assert_eq!(validate_travel_date("2000-01-01"), Err(DateError::Past));
    }

    #[test]
    fn accepts_future_dates() {
        assert_eq!(
            validate_travel_date("2100-01-02"),
            Ok(NaiveDate::from_ymd_opt(2100, 1, 2).expect("valid date"))
        );
    }

    #[test]
    fn return_date_must_not_precede_departure() {
        let departure = NaiveDate::from_ymd_opt(2100, 6, 10).expect("valid date");
        assert_eq!(
            validate_return_date("2100-06-09", departure),
            Err(DateError::BeforeDeparture)
        );
        assert!(validate_return_date("2100-06-10", departure).is_ok());
    }
}
