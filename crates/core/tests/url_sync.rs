//! Debounced query-string sync driven through a `FilterSession`.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use solidarity_core::dimension::Dimension;
use solidarity_core::session::{DebouncedUrlSync, FilterSession, UrlSink, URL_SYNC_DELAY};
use solidarity_core::url_state;

#[derive(Default)]
struct Location {
    writes: Mutex<Vec<String>>,
}

impl Location {
    fn writes(&self) -> Vec<String> {
        self.writes.lock().unwrap().clone()
    }
}

impl UrlSink for Location {
    fn replace_query(&self, query: &str) {
        self.writes.lock().unwrap().push(query.to_string());
    }
}

fn session(query: &str) -> (FilterSession, Arc<Location>) {
    let location = Arc::new(Location::default());
    let sync = DebouncedUrlSync::spawn(location.clone(), URL_SYNC_DELAY);
    (FilterSession::load(query, sync), location)
}

#[tokio::test(start_paused = true)]
async fn loading_from_the_url_does_not_write_back() {
    let (session, location) = session("?country=fr&search=dock");
    assert_eq!(session.state().countries, vec!["fr"]);
    assert_eq!(session.state().search, "dock");

    tokio::time::sleep(URL_SYNC_DELAY * 2).await;
    assert!(location.writes().is_empty());
}

#[tokio::test(start_paused = true)]
async fn separated_transitions_write_separately() {
    let (mut session, location) = session("");

    session.toggle(Dimension::Type, "Arrest");
    tokio::time::sleep(URL_SYNC_DELAY + Duration::from_millis(1)).await;
    session.toggle(Dimension::Type, "Arrest");
    tokio::time::sleep(URL_SYNC_DELAY + Duration::from_millis(1)).await;

    assert_eq!(location.writes(), vec!["type=Arrest".to_string(), String::new()]);
}

#[tokio::test(start_paused = true)]
async fn written_query_restores_the_latest_state() {
    let (mut session, location) = session("");

    session.set_search_text("  port strike");
    session.toggle(Dimension::Group, "Dockers Union");
    session.toggle(Dimension::Country, "de");
    let expected = session.state().clone();
    session.close().await;

    let writes = location.writes();
    assert_eq!(writes.len(), 1);
    assert_eq!(url_state::decode(&writes[0]), expected);
}
