use chrono::{DateTime, Utc};
use rusqlite::{params, params_from_iter, Connection};

use crate::models::{EventRecord, FlightQuote, SearchRequest};
use crate::utils;

pub struct Store {
    conn: Connection,
}

/// Flight row as stored, with the capture timestamp the store assigned.
#[derive(Debug, Clone)]
pub struct SavedFlight {
    pub departure_city: String,
    pub departure_code: String,
    pub destination_city: String,
    pub destination_code: String,
    pub departure_date: String,
    pub return_date: Option<String>,
    pub price: f64,
    pub currency: String,
    pub seats: i64,
    pub search_date: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct SavedEvent {
    pub city: String,
    pub title: String,
    pub datetime_text: String,
    pub location_text: String,
    pub price_text: String,
    pub url: String,
    pub search_date: DateTime<Utc>,
}

impl Store {
    pub fn open_default() -> rusqlite::Result<Self> {
        let path = utils::database_path();
        utils::ensure_parent(&path);
        Self::from_connection(Connection::open(path)?)
    }

    pub fn open_in_memory() -> rusqlite::Result<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> rusqlite::Result<Self> {
        let store = Self { conn };
        store.init_schema()?;
        Ok(store)
    }

    fn init_schema(&self) -> rusqlite::Result<()> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS flight_tickets(
                id INTEGER PRIMARY KEY,
                departure_city TEXT NOT NULL,
                departure_code TEXT NOT NULL,
                destination_city TEXT NOT NULL,
                destination_code TEXT NOT NULL,
                departure_date TEXT NOT NULL,
                return_date TEXT,
                price REAL NOT NULL,
                currency TEXT NOT NULL,
                seats INTEGER NOT NULL,
                search_date TEXT NOT NULL
            );
            CREATE TABLE IF NOT EXISTS events(
                id INTEGER PRIMARY KEY,
                city TEXT NOT NULL,
                event_id TEXT,
                title TEXT NOT NULL,
                datetime TEXT NOT NULL,
                location TEXT NOT NULL,
                price TEXT NOT NULL,
                url TEXT NOT NULL,
                search_date TEXT NOT NULL
            );",
        )?;
        Ok(())
    }

    /// Append-only: every search stores a fresh batch of rows stamped with
    /// one capture time. Nothing is updated or deduplicated here.
    pub fn save_flight_quotes(
        &self,
        request: &SearchRequest,
        quotes: &[FlightQuote],
    ) -> rusqlite::Result<usize> {
        let now = Utc::now();
        let mut stmt = self.conn.prepare(
            "INSERT INTO flight_tickets
             (departure_city, departure_code, destination_city, destination_code,
              departure_date, return_date, price, currency, seats, search_date)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        )?;

        for quote in quotes {
            stmt.execute(params![
                request.departure_city,
                request.departure_code,
                request.destination_city,
                request.destination_code,
                request.departure_date,
                request.return_date,
                quote.amount,
                quote.currency,
                request.seats,
                now,
            ])?;
        }

        Ok(quotes.len())
    }

    pub fn save_events(&self, city: &str, events: &[EventRecord]) -> rusqlite::Result<usize> {
        let now = Utc::now();
        let mut stmt = self.conn.prepare(
            "INSERT INTO events
             (city, event_id, title, datetime, location, price, url, search_date)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        )?;

        for event in events {
            stmt.execute(params![
                city,
                event.event_id,
                event.title,
                event.datetime_text,
                event.location_text,
                event.price_text,
                event.url,
                now,
            ])?;
        }

        Ok(events.len())
    }

    pub fn recent_flights(
        &self,
        limit: u32,
        destination: Option<&str>,
        departure: Option<&str>,
    ) -> rusqlite::Result<Vec<SavedFlight>> {
        let mut query = String::from(
            "SELECT departure_city, departure_code, destination_city, destination_code,
                    departure_date, return_date, price, currency, seats, search_date
             FROM flight_tickets",
        );

        let mut conditions: Vec<&str> = Vec::new();
        let mut bound: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();
        if let Some(destination) = destination {
            conditions.push("destination_city LIKE ?");
            bound.push(Box::new(format!("%{destination}%")));
        }
        if let Some(departure) = departure {
            conditions.push("departure_city LIKE ?");
            bound.push(Box::new(format!("%{departure}%")));
        }
        if !conditions.is_empty() {
            query.push_str(" WHERE ");
            query.push_str(&conditions.join(" AND "));
        }
        query.push_str(" ORDER BY search_date DESC, price ASC LIMIT ?");
        bound.push(Box::new(limit));

        let mut stmt = self.conn.prepare(&query)?;
        let rows = stmt.query_map(params_from_iter(bound.iter().map(|p| p.as_ref())), |row| {
            Ok(SavedFlight {
                departure_city: row.get(0)?,
                departure_code: row.get(1)?,
                destination_city: row.get(2)?,
                destination_code: row.get(3)?,
                departure_date: row.get(4)?,
                return_date: row.get(5)?,
                price: row.get(6)?,
                currency: row.get(7)?,
                seats: row.get(8)?,
                search_date: row.get(9)?,
            })
        })?;

        let mut out = Vec::new();
        for row in rows {
            out.push(row?);
        }
        Ok(out)
    }

    pub fn recent_events(
        &self,
        limit: u32,
        city: Option<&str>,
    ) -> rusqlite::Result<Vec<SavedEvent>> {
        let mut query = String::from(
            "SELECT city, title, datetime, location, price, url, search_date FROM events",
        );

        let mut bound: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();
        if let Some(city) = city {
            query.push_str(" WHERE city LIKE ?");
            bound.push(Box::new(format!("%{city}%")));
        }
        query.push_str(" ORDER BY search_date DESC LIMIT ?");
        bound.push(Box::new(limit));

        let mut stmt = self.conn.prepare(&query)?;
        let rows = stmt.query_map(params_from_iter(bound.iter().map(|p| p.as_ref())), |row| {
            Ok(SavedEvent {
                city: row.get(0)?,
                title: row.get(1)?,
                datetime_text: row.get(2)?,
                location_text: row.get(3)?,
                price_text: row.get(4)?,
                url: row.get(5)?,
                search_date: row.get(6)?,
            })
        })?;

        let mut out = Vec::new();
        for row in rows {
            out.push(row?);
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{EventRecord, FlightOffer};
    use crate::pricing;

    fn sample_request() -> SearchRequest {
        SearchRequest {
            departure_city: "Riga".to_string(),
            departure_code: "RIX".to_string(),
            destination_city: "Malaga".to_string(),
            destination_code: "AGP".to_string(),
            departure_date: "2026-09-01".to_string(),
            return_date: None,
            seats: 2,
        }
    }

    fn sample_event(url: &str) -> EventRecord {
        EventRecord {
            event_id: Some("show-1".to_string()),
            title: "Flamenco Evening".to_string(),
            datetime_text: "Sat, Sep 5 · 8:00 PM".to_string(),
            location_text: "Old Town".to_string(),
            price_text: "$15".to_string(),
            url: url.to_string(),
        }
    }

    #[test]
    fn saves_and_reads_back_flight_quotes() {
        let store = Store::open_in_memory().expect("open store");
        let quotes = pricing::process_flight_prices(vec![
            FlightOffer {
                price_text: "245 USD".to_string(),
                link: None,
            },
            FlightOffer {
                price_text: "199 EUR".to_string(),
                link: None,
            },
        ]);

        let saved = store
            .save_flight_quotes(&sample_request(), &quotes)
            .expect("save quotes");
        assert_eq!(saved, 2);

        let rows = store.recent_flights(10, None, None).expect("query flights");
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].price, 199.0);
        assert_eq!(rows[0].currency, "EUR");
        assert_eq!(rows[0].destination_code, "AGP");
        assert_eq!(rows[1].price, 245.0);
    }

    #[test]
    fn destination_filter_narrows_results() {
        let store = Store::open_in_memory().expect("open store");
        let quotes = pricing::process_flight_prices(vec![FlightOffer {
            price_text: "100 USD".to_string(),
            link: None,
        }]);
        store
            .save_flight_quotes(&sample_request(), &quotes)
            .expect("save quotes");

        assert_eq!(
            store
                .recent_flights(10, Some("mala"), None)
                .expect("filtered query")
                .len(),
            1
        );
        assert!(store
            .recent_flights(10, Some("tokyo"), None)
            .expect("filtered query")
            .is_empty());
    }

    #[test]
    fn repeated_saves_append_rows() {
        let store = Store::open_in_memory().expect("open store");
        let events = vec![sample_event("https://www.eventbrite.com/e/show-1")];

        store.save_events("Malaga", &events).expect("first save");
        store.save_events("Malaga", &events).expect("second save");

        let rows = store.recent_events(10, None).expect("query events");
        assert_eq!(rows.len(), 2, "persistence is append-only");
        assert_eq!(rows[0].title, "Flamenco Evening");
    }

    #[test]
    fn city_filter_is_case_insensitive_like() {
        let store = Store::open_in_memory().expect("open store");
        store
            .save_events(
                "New York",
                &[sample_event("https://www.eventbrite.com/e/show-2")],
            )
            .expect("save events");

        assert_eq!(
            store
                .recent_events(10, Some("new york"))
                .expect("query events")
                .len(),
            1
        );
        assert!(store
            .recent_events(10, Some("berlin"))
            .expect("query events")
            .is_empty());
    }
}
