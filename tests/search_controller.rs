use marquee::api::parse_search_response;
use marquee::domain::MediaType;
use marquee::notify::{NotificationBus, NotificationKind};
use marquee::search::{SearchController, SearchFilter, SearchPhase, SearchRequest, SettledOutcome};
use std::time::Duration;

const MATRIX_PAGE: &str = r#"{
    "page": 1,
    "total_pages": 2,
    "total_results": 3,
    "results": [
        {"id": 603, "media_type": "movie", "title": "The Matrix", "release_date": "1999-03-30", "vote_average": 8.2},
        {"id": 1273, "media_type": "tv", "name": "The Matrix Files", "first_air_date": "2003-01-01"},
        {"id": 6384, "media_type": "person", "name": "Keanu Reeves", "known_for_department": "Acting"},
        {"id": 9, "media_type": "collection", "name": "Ignored"}
    ]
}"#;

const API_KEY_MISSING: &str = r#"{"error":"TMDB API key not configured"}"#;

fn controller() -> SearchController {
    SearchController::new(Duration::from_millis(500))
}

fn ready_bus() -> NotificationBus {
    let mut bus = NotificationBus::new();
    bus.mark_ready();
    bus
}

fn respond(controller: &mut SearchController, request: &SearchRequest, status: u16, body: &str, bus: &mut NotificationBus) {
    let parsed = parse_search_response(status, body.as_bytes(), &request.key);
    let _ = controller.on_response(&request.key, parsed, bus);
}

fn count(bus: &NotificationBus, title: &str) -> usize {
    bus.history().iter().filter(|n| n.title == title).count()
}

#[test]
fn rapid_edits_promote_only_the_final_query() {
    let mut search = controller();

    let first = search.set_query("Mat").unwrap();
    let mut tickets = vec![first];
    for c in "rix".chars() {
        tickets.push(search.push_char(c).unwrap());
    }
    assert_eq!(search.phase(), SearchPhase::Typing);

    let (last, earlier) = tickets.split_last().unwrap();
    for ticket in earlier {
        assert!(search.on_timer(ticket.id).is_none());
    }
    let request = search.on_timer(last.id).unwrap();
    assert!(search.on_timer(last.id).is_none());

    assert_eq!(request.key.query, "Matrix");
    assert_eq!(request.key.page, 1);
    assert_eq!(search.committed_query(), "Matrix");
    assert_eq!(search.phase(), SearchPhase::Committed);
}

#[test]
fn empty_submit_does_nothing() {
    let mut search = controller();
    let mut bus = ready_bus();

    assert!(search.submit(&mut bus).is_none());
    search.set_query("   ");
    assert!(search.submit(&mut bus).is_none());

    assert!(bus.history().is_empty());
    assert!(search.in_flight().is_none());
    assert_eq!(search.committed_query(), "");
}

#[test]
fn submit_bypasses_the_debounce() {
    let mut search = controller();
    let mut bus = ready_bus();

    let ticket = search.set_query("  dune ").unwrap();
    let request = search.submit(&mut bus).unwrap();

    assert_eq!(request.key.query, "dune");
    assert_eq!(search.committed_query(), "dune");
    assert!(!search.is_debounce_pending());
    assert!(search.on_timer(ticket.id).is_none());
    assert_eq!(count(&bus, "Searching"), 1);

    // Submitting the same text again still fetches.
    let again = search.submit(&mut bus).unwrap();
    assert_ne!(again.key, request.key);
    assert_eq!(count(&bus, "Searching"), 2);
}

#[test]
fn missing_api_key_is_reported_once_per_session() {
    let mut search = controller();
    let mut bus = ready_bus();

    search.set_query("alien");
    let first = search.submit(&mut bus).unwrap();
    respond(&mut search, &first, 503, API_KEY_MISSING, &mut bus);

    assert_eq!(search.phase(), SearchPhase::Settled(SettledOutcome::Error));
    assert!(search.last_error().is_some_and(|e| e.is_configuration()));

    let second = search.submit(&mut bus).unwrap();
    respond(&mut search, &second, 503, API_KEY_MISSING, &mut bus);

    let config_errors: Vec<_> = bus
        .history()
        .iter()
        .filter(|n| n.kind == NotificationKind::Error)
        .collect();
    assert_eq!(config_errors.len(), 1);
    assert_eq!(config_errors[0].title, "TMDB API key not configured");
    assert_eq!(search.raw_query(), "alien");
}

#[test]
fn other_failures_are_reported_every_time() {
    let mut search = controller();
    let mut bus = ready_bus();

    search.set_query("alien");
    for _ in 0..2 {
        let request = search.submit(&mut bus).unwrap();
        respond(&mut search, &request, 500, "", &mut bus);
    }

    assert_eq!(count(&bus, "Search failed"), 2);
}

#[test]
fn results_are_announced_once_per_query_and_count() {
    let mut search = controller();
    let mut bus = ready_bus();

    let ticket = search.set_query("matrix").unwrap();
    let request = search.on_timer(ticket.id).unwrap();
    respond(&mut search, &request, 200, MATRIX_PAGE, &mut bus);

    assert_eq!(search.results().len(), 3);
    assert_eq!(search.total_results(), 3);
    assert_eq!(count(&bus, "Results found"), 1);

    search.set_filter(SearchFilter::Movie);
    assert_eq!(search.visible_results().len(), 1);
    assert_eq!(search.visible_results()[0].media_type, MediaType::Movie);
    search.cycle_filter();
    search.cycle_filter();
    assert_eq!(search.active_filter(), SearchFilter::All);
    assert!(search.in_flight().is_none());

    // A resubmit that lands on the same pair stays quiet.
    let request = search.submit(&mut bus).unwrap();
    respond(&mut search, &request, 200, MATRIX_PAGE, &mut bus);
    assert_eq!(count(&bus, "Results found"), 1);
}

#[test]
fn superseded_response_does_not_overwrite_newer_query() {
    let mut search = controller();
    let mut bus = ready_bus();

    let ticket = search.set_query("matrix").unwrap();
    let old = search.on_timer(ticket.id).unwrap();
    let ticket = search.set_query("zzz").unwrap();
    let new = search.on_timer(ticket.id).unwrap();

    respond(&mut search, &old, 200, MATRIX_PAGE, &mut bus);
    assert!(search.results().is_empty());
    assert_eq!(search.in_flight(), Some(&new.key));

    let empty = r#"{"page":1,"total_pages":0,"total_results":0,"results":[]}"#;
    respond(&mut search, &new, 200, empty, &mut bus);
    assert_eq!(search.phase(), SearchPhase::Settled(SettledOutcome::Results));
    assert_eq!(count(&bus, "No results"), 1);
}

#[test]
fn next_page_appends_results() {
    let mut search = controller();
    let mut bus = ready_bus();

    let ticket = search.set_query("matrix").unwrap();
    let first = search.on_timer(ticket.id).unwrap();
    assert!(search.next_page().is_none());
    respond(&mut search, &first, 200, MATRIX_PAGE, &mut bus);

    let second = search.next_page().unwrap();
    assert_eq!(second.key.page, 2);
    assert!(search.next_page().is_none());

    let page_two = r#"{"page":2,"total_pages":2,"total_results":3,"results":[
        {"id": 603, "media_type": "movie", "title": "The Matrix"},
        {"id": 604, "media_type": "movie", "title": "The Matrix Reloaded"}
    ]}"#;
    respond(&mut search, &second, 200, page_two, &mut bus);

    assert_eq!(search.current_page(), 2);
    assert_eq!(search.results().len(), 4);
    assert!(search.next_page().is_none());
    assert_eq!(count(&bus, "Results found"), 1);
}

#[test]
fn clear_returns_to_idle() {
    let mut search = controller();
    let mut bus = ready_bus();

    search.set_query("matrix");
    search.set_filter(SearchFilter::Tv);
    let request = search.submit(&mut bus).unwrap();
    search.clear();
    respond(&mut search, &request, 200, MATRIX_PAGE, &mut bus);

    assert_eq!(search.phase(), SearchPhase::Idle);
    assert_eq!(search.raw_query(), "");
    assert_eq!(search.active_filter(), SearchFilter::All);
    assert!(search.results().is_empty());
}
