use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::{FlightOffer, FlightQuote};

static CURRENCY_CODE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(USD|EUR|GBP|JPY|RUB|INR)\b").expect("currency code regex"));

const CURRENCY_SYMBOLS: [(char, &str); 6] = [
    ('$', "USD"),
    ('€', "EUR"),
    ('£', "GBP"),
    ('¥', "JPY"),
    ('₽', "RUB"),
    ('₹', "INR"),
];

fn is_price_sentinel(text: &str) -> bool {
    text.is_empty()
        || text.eq_ignore_ascii_case("free")
        || text.eq_ignore_ascii_case("unknown")
        || text.eq_ignore_ascii_case("no price")
}

/// Turns free-text price into a comparable amount. Sentinels and anything
/// that fails numeric parsing collapse to 0.0; callers drop amounts <= 0.
pub fn clean_price(text: &str) -> f64 {
    if is_price_sentinel(text) {
        return 0.0;
    }

    let mut cleaned: String = text
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == ',')
        .collect();

    // Both separators present: comma is a thousands separator. Comma alone:
    // decimal separator. Not locale-aware; "1,234" parses as 1.234.
    if cleaned.contains(',') && cleaned.contains('.') {
        cleaned = cleaned.replace(',', "");
    } else if cleaned.contains(',') {
        cleaned = cleaned.replace(',', ".");
    }

    cleaned.parse::<f64>().unwrap_or(0.0)
}

/// ISO-like currency code for a price string, or "" when undetectable.
pub fn clean_currency(text: &str) -> String {
    if is_price_sentinel(text) {
        return String::new();
    }

    for ch in text.chars() {
        if let Some((_, code)) = CURRENCY_SYMBOLS.iter().find(|(symbol, _)| *symbol == ch) {
            return (*code).to_string();
        }
    }

    if let Some(caps) = CURRENCY_CODE_RE.captures(text) {
        return caps[1].to_string();
    }

    String::new()
}

/// Batch entry point: normalize raw offers into quotes, drop entries whose
/// cleaned amount is not positive, and sort ascending by amount. The sort is
/// stable, so equal amounts keep their input order.
pub fn process_flight_prices(offers: Vec<FlightOffer>) -> Vec<FlightQuote> {
    let mut quotes: Vec<FlightQuote> = offers
        .into_iter()
        .filter_map(|offer| {
            let amount = clean_price(&offer.price_text);
            if amount <= 0.0 {
                return None;
            }
            let currency = clean_currency(&offer.price_text);
            Some(FlightQuote {
                amount,
                currency,
                original_text: offer.price_text,
                link: offer.link,
            })
        })
        .collect();

    quotes.sort_by(|a, b| a.amount.total_cmp(&b.amount));
    quotes
}
