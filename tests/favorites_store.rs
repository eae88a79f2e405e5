use marquee::domain::{FavoriteItem, MediaType, NewFavorite};
use marquee::favorites::{AddOutcome, FavoritesStore};
use marquee::notify::{NotificationBus, NotificationKind};
use marquee::storage::{KeyValueStore, MemoryStore, FAVORITES_KEY};

fn complete(id: u64, media_type: MediaType, title: &str) -> NewFavorite {
    NewFavorite::new(id, media_type, title).with_details(100, vec!["Drama".to_string()])
}

fn ready_bus() -> NotificationBus {
    let mut bus = NotificationBus::new();
    bus.mark_ready();
    bus
}

fn loaded(memory: &MemoryStore, bus: &mut NotificationBus) -> FavoritesStore {
    let mut store = FavoritesStore::new(Box::new(memory.clone()));
    store.load(bus);
    store
}

fn persisted(memory: &MemoryStore) -> Vec<FavoriteItem> {
    let raw = memory.peek(FAVORITES_KEY).unwrap_or_else(|| "[]".to_string());
    serde_json::from_str(&raw).unwrap()
}

#[test]
fn adding_the_same_key_twice_keeps_one_item() {
    let memory = MemoryStore::new();
    let mut bus = ready_bus();
    let mut store = loaded(&memory, &mut bus);

    let fight_club = complete(550, MediaType::Movie, "Fight Club");
    assert_eq!(store.add(fight_club.clone(), &mut bus).unwrap(), AddOutcome::Added);
    assert_eq!(store.add(fight_club, &mut bus).unwrap(), AddOutcome::AlreadyPresent);

    assert_eq!(store.len(), 1);
    let history = bus.history();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].kind, NotificationKind::Success);
    assert_eq!(history[1].kind, NotificationKind::Info);
    assert_eq!(history[1].title, "Already in favorites");
    assert_eq!(persisted(&memory).len(), 1);
}

#[test]
fn many_adds_never_duplicate_a_key() {
    let memory = MemoryStore::new();
    let mut bus = ready_bus();
    let mut store = loaded(&memory, &mut bus);

    let kinds = [MediaType::Movie, MediaType::Tv, MediaType::Person];
    for round in 0..3 {
        for id in 1..=5 {
            let media_type = kinds[(id as usize + round) % kinds.len()];
            store.add(complete(id, media_type, "x"), &mut bus).unwrap();
        }
    }

    let mut keys: Vec<_> = store.items().iter().map(FavoriteItem::key).collect();
    let total = keys.len();
    keys.sort();
    keys.dedup();
    assert_eq!(keys.len(), total);
    assert_eq!(total, 15);
}

#[test]
fn removing_a_missing_key_is_silent() {
    let memory = MemoryStore::new();
    let mut bus = ready_bus();
    let mut store = loaded(&memory, &mut bus);
    store.add(complete(1, MediaType::Movie, "Heat"), &mut bus).unwrap();
    let before = store.items().to_vec();
    let notifications = bus.history().len();

    assert!(store.remove(1, MediaType::Tv, &mut bus).is_none());
    assert!(store.remove(2, MediaType::Movie, &mut bus).is_none());

    assert_eq!(store.items(), before.as_slice());
    assert_eq!(bus.history().len(), notifications);
}

#[test]
fn reloading_reproduces_the_persisted_items() {
    let memory = MemoryStore::new();
    let mut bus = ready_bus();
    let mut store = loaded(&memory, &mut bus);
    store.add(complete(603, MediaType::Movie, "The Matrix"), &mut bus).unwrap();
    store.add(complete(1396, MediaType::Tv, "Breaking Bad"), &mut bus).unwrap();
    store.add(NewFavorite::new(287, MediaType::Person, "Brad Pitt"), &mut bus).unwrap();
    store.remove(1396, MediaType::Tv, &mut bus);

    let mut reopened = FavoritesStore::new(Box::new(memory.clone()));
    let report = reopened.load(&mut ready_bus());

    assert_eq!(report.loaded, 2);
    assert_eq!(report.pruned, 0);
    assert_eq!(reopened.items(), store.items());
}

#[test]
fn incomplete_persisted_movie_is_pruned_on_load() {
    let raw = r#"[
        {"id":550,"mediaType":"movie","title":"Fight Club","addedAt":"2024-03-01T10:00:00Z","runtime":139},
        {"id":603,"mediaType":"movie","title":"The Matrix","addedAt":"2024-03-02T10:00:00Z","runtime":136,"genres":["Action"]},
        {"id":287,"mediaType":"person","title":"Brad Pitt","addedAt":"2024-03-03T10:00:00Z"}
    ]"#;
    let memory = MemoryStore::with_entry(FAVORITES_KEY, raw);
    let mut bus = ready_bus();

    let mut store = FavoritesStore::new(Box::new(memory.clone()));
    let report = store.load(&mut bus);

    assert_eq!(report.pruned, 1);
    assert!(report.persisted);
    assert!(!store.is_favorite(550, MediaType::Movie));
    assert!(store.is_favorite(603, MediaType::Movie));
    assert!(store.is_favorite(287, MediaType::Person));

    let saved = persisted(&memory);
    assert_eq!(saved.len(), 2);
    assert!(saved.iter().all(|item| item.id != 550));
    assert!(bus.history().is_empty());
}

#[test]
fn prune_keeps_people_and_complete_titles() {
    let memory = MemoryStore::new();
    let mut bus = ready_bus();
    let mut store = loaded(&memory, &mut bus);

    store.add(NewFavorite::new(1, MediaType::Movie, "No details"), &mut bus).unwrap();
    let mut runtime_only = NewFavorite::new(2, MediaType::Tv, "Runtime only");
    runtime_only.runtime_minutes = Some(45);
    store.add(runtime_only, &mut bus).unwrap();
    store.add(complete(3, MediaType::Tv, "Complete"), &mut bus).unwrap();
    store.add(NewFavorite::new(4, MediaType::Person, "Someone"), &mut bus).unwrap();
    let notifications = bus.history().len();

    assert_eq!(store.prune_incomplete(), 2);

    let ids: Vec<u64> = store.items().iter().map(|item| item.id).collect();
    assert_eq!(ids, vec![3, 4]);
    assert!(store.items().iter().all(FavoriteItem::is_complete));
    assert_eq!(bus.history().len(), notifications);
    assert_eq!(persisted(&memory).len(), 2);
}

#[test]
fn clear_empties_the_store_with_one_notification() {
    let memory = MemoryStore::new();
    let mut bus = ready_bus();
    let mut store = loaded(&memory, &mut bus);
    for id in 1..=3 {
        store.add(complete(id, MediaType::Movie, "x"), &mut bus).unwrap();
    }
    let before = bus.history().len();

    assert_eq!(store.clear(&mut bus), 3);

    assert!(store.is_empty());
    assert_eq!(bus.history().len(), before + 1);
    let last = &bus.history()[before];
    assert_eq!(last.kind, NotificationKind::Success);
    assert_eq!(last.title, "Favorites cleared");
    assert!(persisted(&memory).is_empty());
}

#[test]
fn additions_before_load_merge_after_persisted_items() {
    let raw = r#"[
        {"id":603,"mediaType":"movie","title":"The Matrix","addedAt":"2024-03-02T10:00:00Z","runtime":136,"genres":["Action"]}
    ]"#;
    let memory = MemoryStore::with_entry(FAVORITES_KEY, raw);
    let mut bus = NotificationBus::new();
    let mut store = FavoritesStore::new(Box::new(memory.clone()));

    store.add(complete(27205, MediaType::Movie, "Inception"), &mut bus).unwrap();
    let mut shadow = complete(603, MediaType::Movie, "Matrix (pre-load)");
    shadow.runtime_minutes = Some(1);
    store.add(shadow, &mut bus).unwrap();
    assert!(bus.pending().is_empty());
    assert!(memory.peek(FAVORITES_KEY).is_some_and(|v| !v.contains("Inception")));

    let report = store.load(&mut bus);

    assert_eq!(report.merged, 1);
    let titles: Vec<&str> = store.items().iter().map(|item| item.title.as_str()).collect();
    assert_eq!(titles, vec!["The Matrix", "Inception"]);
    assert_eq!(persisted(&memory).len(), 2);

    // Queued store notifications reach the bus only after load, still buffered until ready.
    assert_eq!(bus.pending().len(), 2);
    bus.mark_ready();
    assert_eq!(bus.history().len(), 2);
}

#[test]
fn malformed_document_starts_empty_and_is_rewritten() {
    let memory = MemoryStore::with_entry(FAVORITES_KEY, "{definitely not an array");
    let mut bus = ready_bus();

    let mut store = FavoritesStore::new(Box::new(memory.clone()));
    let report = store.load(&mut bus);

    assert!(store.is_empty());
    assert!(store.is_initialized());
    assert!(report.persisted);
    assert_eq!(memory.get(FAVORITES_KEY).unwrap().as_deref(), Some("[]"));
}

#[test]
fn counts_follow_media_types() {
    let memory = MemoryStore::new();
    let mut bus = ready_bus();
    let mut store = loaded(&memory, &mut bus);
    store.add(complete(1, MediaType::Movie, "a"), &mut bus).unwrap();
    store.add(complete(2, MediaType::Movie, "b"), &mut bus).unwrap();
    store.add(complete(2, MediaType::Tv, "c"), &mut bus).unwrap();
    store.add(NewFavorite::new(2, MediaType::Person, "d"), &mut bus).unwrap();

    let counts = store.counts();
    assert_eq!((counts.movie, counts.tv, counts.person), (2, 1, 1));
    assert_eq!(counts.total(), store.len());
    assert_eq!(store.by_type(MediaType::Movie).len(), 2);
}
