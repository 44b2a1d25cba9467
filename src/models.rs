use serde::{Deserialize, Serialize};

pub const NO_DATE: &str = "No date";
pub const NO_LOCATION: &str = "No location";
pub const UNKNOWN_PRICE: &str = "Unknown";

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct SearchRequest {
    pub departure_city: String,
    pub departure_code: String,
    pub destination_city: String,
    pub destination_code: String,
    pub departure_date: String, // YYYY-MM-DD
    pub return_date: Option<String>,
    pub seats: u8,
}

/// Raw offer as it appears on the flight results page, before normalization.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct FlightOffer {
    pub price_text: String, // "245 USD"
    pub link: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct FlightQuote {
    pub amount: f64,
    pub currency: String,
    pub original_text: String,
    pub link: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct EventRecord {
    pub event_id: Option<String>,
    pub title: String,
    pub datetime_text: String,
    pub location_text: String,
    pub price_text: String,
    pub url: String, // canonical absolute form, dedup key within one pass
}
