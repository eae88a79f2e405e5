use marquee::api::{HttpRequest, RequestKind};
use marquee::app::{handle_event, Action, AppState, Event, InputMode, ViewMode};
use marquee::domain::{MediaType, NewFavorite};
use marquee::notify::NotificationKind;
use marquee::storage::FAVORITES_KEY;
use marquee::worker::{WorkerMessage, WorkerResponse};
use marquee::{Config, Theme};

const DUNE_PAGE: &str = r#"{
    "page": 1,
    "total_pages": 1,
    "total_results": 3,
    "results": [
        {"id": 438631, "media_type": "movie", "title": "Dune", "release_date": "2021-09-15", "vote_average": 7.8},
        {"id": 90228, "media_type": "tv", "name": "Dune: Prophecy", "first_air_date": "2024-11-17"},
        {"id": 1190668, "media_type": "person", "name": "Timothée Chalamet", "known_for_department": "Acting"}
    ]
}"#;

const DUNE_DETAILS: &str = r#"{
    "id": 438631,
    "title": "Dune",
    "release_date": "2021-09-15",
    "runtime": 155,
    "genres": [{"id": 878, "name": "Science Fiction"}, {"id": 12, "name": "Adventure"}],
    "overview": "Paul Atreides arrives on Arrakis."
}"#;

fn state() -> AppState {
    let config = Config {
        api_key: Some("test-key".to_string()),
        ..Config::default()
    };
    AppState::new(&config, Theme::default())
}

fn send(state: &mut AppState, event: Event) -> Vec<Action> {
    handle_event(state, &event).unwrap().1
}

fn web_requests(actions: &[Action]) -> Vec<&HttpRequest> {
    actions
        .iter()
        .filter_map(|action| match action {
            Action::WebRequest(request) => Some(request),
            _ => None,
        })
        .collect()
}

fn stored_values(actions: &[Action]) -> Vec<&str> {
    actions
        .iter()
        .filter_map(|action| match action {
            Action::PostToWorker(WorkerMessage::StoreEntry { key, value, .. }) if key == FAVORITES_KEY => {
                Some(value.as_str())
            }
            _ => None,
        })
        .collect()
}

fn respond(state: &mut AppState, request: &HttpRequest, status: u16, body: &str) -> Vec<Action> {
    send(
        state,
        Event::WebResponse {
            status,
            body: body.as_bytes().to_vec(),
            context: request.context.clone(),
        },
    )
}

/// Grants permissions and completes the favorites load with nothing stored.
fn started() -> AppState {
    let mut state = state();
    send(&mut state, Event::PermissionsResult { granted: true });
    send(
        &mut state,
        Event::WorkerResponse(WorkerResponse::EntryLoaded {
            key: FAVORITES_KEY.to_string(),
            value: None,
        }),
    );
    state
}

/// Types `query` into the search bar and fires every debounce timer.
fn search_for(state: &mut AppState, query: &str) -> HttpRequest {
    send(state, Event::StartTyping);
    let mut timers = Vec::new();
    for c in query.chars() {
        for action in send(state, Event::Char(c)) {
            if let Action::SetTimeout { seconds } = action {
                timers.push(seconds);
            }
        }
    }

    let mut requests = Vec::new();
    for seconds in timers {
        let actions = send(state, Event::TimerFired { elapsed: seconds });
        requests.extend(web_requests(&actions).into_iter().cloned());
    }
    assert_eq!(requests.len(), 1, "exactly one search per burst of typing");
    requests.remove(0)
}

#[test]
fn granting_permissions_loads_favorites_and_genres() {
    let mut state = state();

    let actions = send(&mut state, Event::PermissionsResult { granted: true });

    assert!(state.permissions_granted);
    assert!(state.notifications.is_ready());
    assert!(actions.iter().any(|action| matches!(
        action,
        Action::PostToWorker(WorkerMessage::LoadEntry { key, .. }) if key == FAVORITES_KEY
    )));
    let kinds: Vec<_> = web_requests(&actions)
        .into_iter()
        .filter_map(|request| RequestKind::from_context(&request.context))
        .collect();
    assert_eq!(
        kinds,
        vec![RequestKind::Genres(MediaType::Movie), RequestKind::Genres(MediaType::Tv)]
    );
}

#[test]
fn denied_permissions_do_nothing() {
    let mut state = state();

    let (render, actions) = handle_event(&mut state, &Event::PermissionsResult { granted: false }).unwrap();

    assert!(!render);
    assert!(actions.is_empty());
    assert!(!state.permissions_granted);
}

#[test]
fn typing_debounces_into_a_single_search() {
    let mut state = started();

    let request = search_for(&mut state, "dune");

    assert!(request.url.contains("search/multi"));
    assert!(request.url.contains("query=dune"));
    assert_eq!(state.search.committed_query(), "dune");

    let actions = respond(&mut state, &request, 200, DUNE_PAGE);

    assert_eq!(state.search.results().len(), 3);
    assert!(actions.iter().any(|action| matches!(action, Action::SetTimeout { .. })));
    let toasts: Vec<_> = state.notifications.toasts().collect();
    assert_eq!(toasts.len(), 1);
    assert_eq!(toasts[0].notification.kind, NotificationKind::Success);
}

#[test]
fn toasts_are_dismissed_by_their_timer() {
    let mut state = started();
    let request = search_for(&mut state, "dune");
    let actions = respond(&mut state, &request, 200, DUNE_PAGE);
    let seconds = actions
        .iter()
        .find_map(|action| match action {
            Action::SetTimeout { seconds } => Some(*seconds),
            _ => None,
        })
        .unwrap();

    let (render, _) = handle_event(&mut state, &Event::TimerFired { elapsed: seconds }).unwrap();

    assert!(render);
    assert_eq!(state.notifications.toasts().count(), 0);
}

#[test]
fn adding_a_person_is_persisted_through_the_worker() {
    let mut state = started();
    let request = search_for(&mut state, "dune");
    respond(&mut state, &request, 200, DUNE_PAGE);
    send(&mut state, Event::StopTyping);

    send(&mut state, Event::KeyDown);
    send(&mut state, Event::KeyDown);
    let actions = send(&mut state, Event::AddFavorite);

    assert!(state.favorites.is_favorite(1_190_668, MediaType::Person));
    let stored = stored_values(&actions);
    assert_eq!(stored.len(), 1);
    assert!(stored[0].contains("Timothée Chalamet"));
}

#[test]
fn adding_a_movie_fetches_runtime_and_genres_first() {
    let mut state = started();
    let request = search_for(&mut state, "dune");
    respond(&mut state, &request, 200, DUNE_PAGE);
    send(&mut state, Event::StopTyping);

    let actions = send(&mut state, Event::AddFavorite);
    let details = web_requests(&actions);
    assert_eq!(details.len(), 1);
    assert!(details[0].url.contains("movie/438631"));
    assert!(!state.favorites.is_favorite(438_631, MediaType::Movie));

    // A second press while the fetch is out does not fetch again.
    assert!(web_requests(&send(&mut state, Event::AddFavorite)).is_empty());

    let details = details[0].clone();
    let actions = respond(&mut state, &details, 200, DUNE_DETAILS);

    let favorite = state.favorites.get(438_631, MediaType::Movie).unwrap();
    assert_eq!(favorite.runtime_minutes, Some(155));
    assert_eq!(
        favorite.genres.as_deref(),
        Some(&["Science Fiction".to_string(), "Adventure".to_string()][..])
    );
    assert_eq!(stored_values(&actions).len(), 1);
}

#[test]
fn failed_enrichment_adds_nothing() {
    let mut state = started();
    let request = search_for(&mut state, "dune");
    respond(&mut state, &request, 200, DUNE_PAGE);
    send(&mut state, Event::StopTyping);

    let actions = send(&mut state, Event::AddFavorite);
    let details = web_requests(&actions)[0].clone();
    respond(&mut state, &details, 404, r#"{"status_code":34,"status_message":"Not found"}"#);

    assert!(state.favorites.is_empty());
    assert!(state
        .notifications
        .history()
        .iter()
        .any(|n| n.kind == NotificationKind::Error && n.title == "Could not add favorite"));
}

#[test]
fn missing_api_key_settles_search_without_a_request() {
    let mut state = AppState::new(&Config::default(), Theme::default());
    send(&mut state, Event::PermissionsResult { granted: true });

    send(&mut state, Event::StartTyping);
    for c in "alien".chars() {
        send(&mut state, Event::Char(c));
    }
    let actions = send(&mut state, Event::Submit);

    assert!(web_requests(&actions).is_empty());
    assert!(state.search.last_error().is_some_and(|e| e.is_configuration()));
    assert_eq!(state.input_mode, InputMode::Normal);
}

#[test]
fn favorites_view_filters_locally() {
    let stored = r#"[
        {"id":1190668,"mediaType":"person","title":"Timothée Chalamet","addedAt":"2024-01-01T00:00:00Z"},
        {"id":438631,"mediaType":"movie","title":"Dune","addedAt":"2024-01-02T00:00:00Z","runtime":155,"genres":["Adventure"]}
    ]"#;
    let mut state = state();
    send(&mut state, Event::PermissionsResult { granted: true });
    send(
        &mut state,
        Event::WorkerResponse(WorkerResponse::EntryLoaded {
            key: FAVORITES_KEY.to_string(),
            value: Some(stored.to_string()),
        }),
    );

    send(&mut state, Event::ShowFavorites);
    assert_eq!(state.view_mode, ViewMode::Favorites);
    assert_eq!(state.visible_favorites().len(), 2);

    send(&mut state, Event::StartTyping);
    for c in "dun".chars() {
        send(&mut state, Event::Char(c));
    }
    let titles: Vec<&str> = state.visible_favorites().iter().map(|f| f.title.as_str()).collect();
    assert_eq!(titles, vec!["Dune"]);

    send(&mut state, Event::ClearInput);
    send(&mut state, Event::StopTyping);
    send(&mut state, Event::CycleFilter);
    send(&mut state, Event::CycleFilter);
    send(&mut state, Event::CycleFilter);
    let people = state.visible_favorites();
    assert_eq!(people.len(), 1);
    assert_eq!(people[0].media_type, MediaType::Person);
}

#[test]
fn viewmodel_reflects_results_and_favorites() {
    let mut state = started();
    let request = search_for(&mut state, "dune");
    respond(&mut state, &request, 200, DUNE_PAGE);
    send(&mut state, Event::StopTyping);
    send(&mut state, Event::KeyDown);
    send(&mut state, Event::KeyDown);
    send(&mut state, Event::AddFavorite);

    let vm = state.compute_viewmodel(40, 120);

    assert_eq!(vm.display_items.len(), 3);
    assert_eq!(vm.selected_index, 2);
    assert!(vm.display_items[2].is_selected);
    assert!(vm.display_items[2].is_favorite);
    assert!(!vm.display_items[0].is_favorite);
    assert_eq!(vm.display_items[0].year, "2021");
    assert!(vm.empty_state.is_none());
    assert!(vm.header.title.contains("Search"));
    assert!(vm.search_bar.is_some_and(|bar| bar.query == "dune"));
    assert!(!vm.toasts.is_empty());
}

#[test]
fn worker_error_before_load_runs_from_memory() {
    let mut state = state();
    send(&mut state, Event::PermissionsResult { granted: true });

    send(
        &mut state,
        Event::WorkerResponse(WorkerResponse::Error {
            message: "disk full".to_string(),
        }),
    );

    assert!(state.favorites.is_initialized());
    assert!(state.favorites.is_empty());
}

#[test]
fn manual_prune_is_silent_but_persisted() {
    let mut state = started();
    state
        .favorites
        .add(NewFavorite::new(1399, MediaType::Tv, "Game of Thrones"), &mut state.notifications)
        .unwrap();
    state
        .favorites
        .add(NewFavorite::new(287, MediaType::Person, "Brad Pitt"), &mut state.notifications)
        .unwrap();
    let before = state.notifications.history().len();

    let actions = send(&mut state, Event::PruneFavorites);

    assert_eq!(state.notifications.history().len(), before);
    assert!(!state.favorites.is_favorite(1399, MediaType::Tv));
    assert!(state.favorites.is_favorite(287, MediaType::Person));
    let stored = stored_values(&actions);
    assert_eq!(stored.len(), 1);
    assert!(!stored[0].contains("Game of Thrones"));
}
