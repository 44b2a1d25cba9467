use std::collections::HashSet;

use anyhow::{Context, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};

use super::base;
use crate::models::{EventRecord, NO_DATE, NO_LOCATION, UNKNOWN_PRICE};

const ORIGIN: &str = "https://www.eventbrite.com";
const CARD_SCAN_LIMIT: usize = 100;

static CARD_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("section[class*='event-card']").expect("event card selector"));
static DETAIL_LINK_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("a[href*='/e/']").expect("event detail link selector"));
static HEADING_SELECTORS: Lazy<Vec<Selector>> = Lazy::new(|| {
    vec![
        Selector::parse("h3").expect("event title h3 selector"),
        Selector::parse("h2").expect("event title h2 selector"),
    ]
});
static DATE_FRAGMENT_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("p").expect("event date fragment selector"));
static LOCATION_SELECTORS: Lazy<Vec<Selector>> = Lazy::new(|| {
    vec![
        Selector::parse("p[class*='event-card__clamp-line']").expect("event location selector"),
        Selector::parse("div[data-subcontent]").expect("event subcontent selector"),
    ]
});
static PRICE_FRAGMENT_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("p, span, div").expect("event price fragment selector"));

static EVENT_ID_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"/e/([^/?]+)").expect("event id regex"));
static WEEKDAY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(?:Mon|Tue|Wed|Thu|Fri|Sat|Sun)\b").expect("weekday regex"));
static CLOCK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b\d{1,2}:\d{2}").expect("clock regex"));
static DOLLAR_PRICE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$[\d,.]+").expect("dollar price regex"));

pub fn build_events_url(city: &str, start_date: &str) -> String {
    let slug = city.trim().to_lowercase().replace(' ', "-");
    format!("{ORIGIN}/d/{slug}/events/?start_date={start_date}")
}

/// Extracts event records from a listing page. Scans the first 100 candidate
/// cards in document order; a failure inside one card is logged and skipped
/// without aborting the batch.
pub fn parse_events(html: &str) -> Vec<EventRecord> {
    let document = Html::parse_document(html);
    // The listing markup repeats card fragments, so one pass shares a
    // seen-URL set and each event comes out once.
    let mut seen_urls: HashSet<String> = HashSet::new();
    let mut events = Vec::new();

    for card in document.select(&CARD_SELECTOR).take(CARD_SCAN_LIMIT) {
        match parse_event_card(card, &mut seen_urls) {
            Ok(Some(event)) => events.push(event),
            Ok(None) => {}
            Err(err) => log::warn!("skipping event card: {err:#}"),
        }
    }

    events
}

fn parse_event_card(
    card: ElementRef<'_>,
    seen_urls: &mut HashSet<String>,
) -> Result<Option<EventRecord>> {
    let href = match base::first_attr(&card, &DETAIL_LINK_SELECTOR, "href") {
        Some(href) => href,
        None => return Ok(None),
    };
    let url = base::join_url(ORIGIN, &href).context("event detail link")?;
    if !seen_urls.insert(url.clone()) {
        return Ok(None);
    }

    let event_id = EVENT_ID_RE.captures(&url).map(|caps| caps[1].to_string());

    // Title is mandatory; a card with a link but no heading text yields
    // nothing (its URL still counts as seen).
    let title = match detect_title(card) {
        Some(title) => title,
        None => return Ok(None),
    };

    let datetime_text = first_datetime_fragment(fragment_texts(card, &DATE_FRAGMENT_SELECTOR))
        .unwrap_or_else(|| NO_DATE.to_string());
    let location_text = detect_location(card).unwrap_or_else(|| NO_LOCATION.to_string());
    let price_text = first_price_fragment(fragment_texts(card, &PRICE_FRAGMENT_SELECTOR))
        .unwrap_or_else(|| UNKNOWN_PRICE.to_string());

    Ok(Some(EventRecord {
        event_id,
        title,
        datetime_text,
        location_text,
        price_text,
        url,
    }))
}

fn detect_title(card: ElementRef<'_>) -> Option<String> {
    HEADING_SELECTORS
        .iter()
        .find_map(|selector| base::first_text(&card, selector))
}

fn detect_location(card: ElementRef<'_>) -> Option<String> {
    LOCATION_SELECTORS
        .iter()
        .find_map(|selector| base::first_text(&card, selector))
}

fn fragment_texts(card: ElementRef<'_>, selector: &Selector) -> Vec<String> {
    card.select(selector)
        .map(base::inner_text)
        .filter(|text| !text.is_empty())
        .collect()
}

/// First fragment naming a weekday or containing an H:MM clock, verbatim.
/// The listing markup has no stable structure for dates, so detection goes
/// by text shape.
fn first_datetime_fragment<I>(fragments: I) -> Option<String>
where
    I: IntoIterator<Item = String>,
{
    fragments
        .into_iter()
        .find(|text| WEEKDAY_RE.is_match(text) || CLOCK_RE.is_match(text))
}

/// First dollar-prefixed numeric token in any fragment. Event prices stay
/// display text; they never pass through the flight price normalizer.
fn first_price_fragment<I>(fragments: I) -> Option<String>
where
    I: IntoIterator<Item = String>,
{
    for text in fragments {
        if !text.contains('$') {
            continue;
        }
        if let Some(found) = DOLLAR_PRICE_RE.find(&text) {
            return Some(found.as_str().to_string());
        }
    }
    None
}
