use once_cell::sync::Lazy;
use scraper::{Html, Selector};

use super::base;
use crate::models::{FlightOffer, SearchRequest};

const ORIGIN: &str = "https://www.esky.com";

static FLIGHT_BLOCK_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("so-fsr-flight-block").expect("flight block selector"));
static AMOUNT_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("span.amount").expect("flight amount selector"));
static CURRENCY_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("span.currency").expect("flight currency selector"));
static OFFER_LINK_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("a").expect("flight offer link selector"));

pub fn build_search_url(request: &SearchRequest) -> String {
    format!(
        "{ORIGIN}/flights/search/ap/{}/ap/{}?departureDate={}&returnDate={}&pa={}",
        request.departure_code,
        request.destination_code,
        request.departure_date,
        request.return_date.as_deref().unwrap_or(""),
        request.seats,
    )
}

/// One offer per result block, in document order, no dedup. A block missing
/// either the amount or the currency label contributes nothing.
pub fn parse_flight_prices(html: &str) -> Vec<FlightOffer> {
    let document = Html::parse_document(html);
    let mut offers = Vec::new();

    for block in document.select(&FLIGHT_BLOCK_SELECTOR) {
        let amount = match base::first_text(&block, &AMOUNT_SELECTOR) {
            Some(text) => text,
            None => continue,
        };
        let currency = match base::first_text(&block, &CURRENCY_SELECTOR) {
            Some(text) => text,
            None => continue,
        };

        let link =
            base::absolute_url(ORIGIN, base::first_attr(&block, &OFFER_LINK_SELECTOR, "href"));

        offers.push(FlightOffer {
            price_text: format!("{amount} {currency}"),
            link,
        });
    }

    offers
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_HTML: &str = r#"
    <html><body>
    <so-fsr-flight-block>
        <div class="offer">
            <a href="/flights/offer/abc123">Details</a>
            <span class="amount"> 245 </span>
            <span class="currency">USD</span>
        </div>
    </so-fsr-flight-block>
    <so-fsr-flight-block>
        <div class="offer">
            <span class="amount">199</span>
        </div>
    </so-fsr-flight-block>
    <so-fsr-flight-block>
        <div class="offer">
            <a href="https://partner.example.com/offer/9">Details</a>
            <span class="amount">1,050</span>
            <span class="currency">EUR</span>
        </div>
    </so-fsr-flight-block>
    </body></html>
    "#;

    #[test]
    fn parses_offers_in_document_order() {
        let offers = parse_flight_prices(SAMPLE_HTML);
        assert_eq!(offers.len(), 2, "block without currency must be skipped");

        assert_eq!(offers[0].price_text, "245 USD");
        assert_eq!(
            offers[0].link.as_deref(),
            Some("https://www.esky.com/flights/offer/abc123")
        );

        assert_eq!(offers[1].price_text, "1,050 EUR");
        assert_eq!(
            offers[1].link.as_deref(),
            Some("https://partner.example.com/offer/9")
        );
    }

    #[test]
    fn block_without_link_yields_no_link() {
        let html = r#"
        <so-fsr-flight-block>
            <span class="amount">80</span>
            <span class="currency">GBP</span>
        </so-fsr-flight-block>
        "#;
        let offers = parse_flight_prices(html);
        assert_eq!(offers.len(), 1);
        assert_eq!(offers[0].price_text, "80 GBP");
        assert!(offers[0].link.is_none());
    }

    #[test]
    fn empty_or_unrelated_html_yields_nothing() {
        assert!(parse_flight_prices("").is_empty());
        assert!(parse_flight_prices("<html><body><p>maintenance</p></body></html>").is_empty());
    }

    #[test]
    fn builds_round_trip_search_url() {
        let request = SearchRequest {
            departure_city: "Riga".to_string(),
            departure_code: "RIX".to_string(),
            destination_city: "Malaga".to_string(),
            destination_code: "AGP".to_string(),
            departure_date: "2026-09-01".to_string(),
            return_date: Some("2026-09-08".to_string()),
            seats: 2,
        };
        assert_eq!(
            build_search_url(&request),
            "https://www.esky.com/flights/search/ap/RIX/ap/AGP?departureDate=2026-09-01&returnDate=2026-09-08&pa=2"
        );
    }

    #[test]
    fn one_way_search_url_has_empty_return_date() {
        let request = SearchRequest {
            departure_city: "Riga".to_string(),
            departure_code: "RIX".to_string(),
            destination_city: "London".to_string(),
            destination_code: "LON".to_string(),
            departure_date: "2026-09-01".to_string(),
            return_date: None,
            seats: 1,
        };
        assert!(build_search_url(&request).contains("returnDate=&pa=1"));
    }
}
