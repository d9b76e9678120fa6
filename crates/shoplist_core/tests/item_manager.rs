mod common;

use common::FlakyStore;
use shoplist_core::{
    CheckedState, ItemCommand, ItemManager, KvStore, ListManager, MemoryKvStore, MoveDirection,
    RouteParam, ShoppingItem, SqliteKvStore, SyncOutcome,
};

fn open<'a>(store: &'a MemoryKvStore, list_id: &str) -> ItemManager<&'a MemoryKvStore> {
    let mut manager = ItemManager::new(
        store,
        &RouteParam::Single(list_id.to_string()),
        Some("今日の買い物"),
    );
    manager.load();
    manager
}

fn item_ids<S: KvStore>(manager: &ItemManager<S>) -> Vec<i64> {
    manager.items().iter().map(|item| item.id).collect()
}

fn stored_items(store: &impl KvStore, list_id: &str) -> Vec<ShoppingItem> {
    let raw = store
        .get_item(&format!("shopping_items_{list_id}"))
        .unwrap()
        .unwrap();
    serde_json::from_str(&raw).unwrap()
}

fn stored_checked(store: &impl KvStore, list_id: &str) -> CheckedState {
    let raw = store
        .get_item(&format!("checked_items_{list_id}"))
        .unwrap()
        .unwrap();
    serde_json::from_str(&raw).unwrap()
}

#[test]
fn first_open_seeds_default_items() {
    let store = MemoryKvStore::new();
    let mut manager = ItemManager::new(&store, &RouteParam::from(1_i64), None);
    assert!(manager.is_loading());

    assert_eq!(manager.load(), SyncOutcome::Persisted);
    assert!(!manager.is_loading());

    let names: Vec<&str> = manager.items().iter().map(|i| i.name.as_str()).collect();
    assert_eq!(names, vec!["牛乳", "パン", "卵", "りんご", "トマト"]);
    assert_eq!(stored_items(&store, "1"), manager.items());
    assert_eq!(manager.checked_count(), 0);
    assert!(!store.contains_key("checked_items_1"));
}

#[test]
fn title_falls_back_when_name_is_blank_or_missing() {
    let store = MemoryKvStore::new();
    let blank = ItemManager::new(&store, &RouteParam::Missing, Some("  "));
    assert_eq!(blank.title(), "買い物リスト");
    let missing = ItemManager::new(&store, &RouteParam::Missing, None);
    assert_eq!(missing.title(), "買い物リスト");
    let named = ItemManager::new(&store, &RouteParam::Missing, Some(" 週末の準備 "));
    assert_eq!(named.title(), "週末の準備");
}

#[test]
fn multi_valued_route_id_uses_first_value() {
    let store = MemoryKvStore::new();
    let mut manager = ItemManager::new(
        &store,
        &RouteParam::Multi(vec!["5".to_string(), "6".to_string()]),
        None,
    );
    manager.load();

    assert_eq!(manager.list_id(), "5");
    assert!(store.contains_key("shopping_items_5"));
    assert!(!store.contains_key("shopping_items_6"));
}

#[test]
fn empty_multi_valued_route_uses_undefined_keys() {
    let store = MemoryKvStore::new();
    let mut manager = ItemManager::new(&store, &RouteParam::Multi(Vec::new()), None);
    manager.load();

    assert_eq!(manager.list_id(), "undefined");
    assert!(store.contains_key("shopping_items_undefined"));
}

#[test]
fn toggle_checked_flips_and_persists_whole_map() {
    let store = MemoryKvStore::new();
    let mut manager = open(&store, "1");

    assert_eq!(manager.toggle_checked(2), SyncOutcome::Persisted);
    assert!(manager.is_checked(2));
    manager.toggle_checked(4);
    manager.toggle_checked(2);

    let expected: CheckedState = [(2, false), (4, true)].into_iter().collect();
    assert_eq!(manager.checked(), &expected);
    assert_eq!(stored_checked(&store, "1"), expected);
    assert_eq!(manager.checked_count(), 1);
    assert_eq!(manager.progress_label(), "1/5 完了");
}

#[test]
fn toggle_unknown_item_is_noop() {
    let store = MemoryKvStore::new();
    let mut manager = open(&store, "1");

    assert_eq!(manager.toggle_checked(99), SyncOutcome::NoWrite);
    assert!(manager.checked().is_empty());
}

#[test]
fn checked_count_is_derived_from_saved_state() {
    let store = MemoryKvStore::new();
    store
        .set_item("checked_items_1", r#"{"1":true,"2":false,"3":true}"#)
        .unwrap();
    let manager = open(&store, "1");

    assert_eq!(manager.checked_count(), 2);
}

#[test]
fn reset_all_checked_clears_state_even_in_sort_mode() {
    let store = MemoryKvStore::new();
    let mut manager = open(&store, "1");
    manager.toggle_checked(1);
    manager.toggle_checked(3);
    manager.toggle_sort_mode();

    assert_eq!(manager.reset_all_checked(), SyncOutcome::Persisted);
    assert_eq!(manager.checked_count(), 0);
    assert!(stored_checked(&store, "1").is_empty());
}

#[test]
fn remove_item_also_removes_checked_entry() {
    let store = MemoryKvStore::new();
    store
        .set_item("checked_items_1", r#"{"1":true,"2":true}"#)
        .unwrap();
    let mut manager = open(&store, "1");

    assert_eq!(manager.remove(2), SyncOutcome::Persisted);

    let expected: CheckedState = [(1, true)].into_iter().collect();
    assert_eq!(manager.checked(), &expected);
    assert_eq!(stored_checked(&store, "1"), expected);
    assert_eq!(item_ids(&manager), vec![1, 3, 4, 5]);
    assert_eq!(stored_items(&store, "1"), manager.items());
}

#[test]
fn add_rename_and_reorder_items() {
    let store = MemoryKvStore::new();
    let mut manager = open(&store, "2");

    manager.dispatch(ItemCommand::Add);
    let added = manager.items().last().unwrap();
    assert_eq!((added.id, added.name.as_str()), (6, "新しい商品 6"));

    assert_eq!(
        manager.dispatch(ItemCommand::Rename {
            id: 6,
            text: "   ".to_string()
        }),
        SyncOutcome::NoWrite
    );
    manager.dispatch(ItemCommand::Rename {
        id: 6,
        text: " バター ".to_string(),
    });
    assert_eq!(manager.items()[5].name, "バター");

    manager.dispatch(ItemCommand::ToggleSortMode);
    assert_eq!(
        manager.dispatch(ItemCommand::Reorder {
            index: 5,
            direction: MoveDirection::Down
        }),
        SyncOutcome::NoWrite
    );
    manager.dispatch(ItemCommand::Reorder {
        index: 5,
        direction: MoveDirection::Up,
    });
    assert_eq!(item_ids(&manager), vec![1, 2, 3, 4, 6, 5]);
    assert_eq!(stored_items(&store, "2"), manager.items());
}

#[test]
fn add_after_i64_max_item_id_does_not_overflow() {
    let store = MemoryKvStore::new();
    store
        .set_item(
            "shopping_items_1",
            &format!(r#"[{{"id":{},"name":"牛乳"}}]"#, i64::MAX),
        )
        .unwrap();
    let mut manager = open(&store, "1");

    assert_eq!(manager.add(), SyncOutcome::Persisted);
    assert_eq!(item_ids(&manager), vec![i64::MAX, 1]);
    assert_eq!(stored_items(&store, "1"), manager.items());
}

#[test]
fn sort_mode_hides_check_and_edit_commands() {
    let store = MemoryKvStore::new();
    let mut manager = open(&store, "1");
    manager.begin_edit(1);
    manager.toggle_sort_mode();

    assert_eq!(manager.session().draft(), None);
    assert_eq!(manager.toggle_checked(1), SyncOutcome::Blocked);
    assert_eq!(manager.add(), SyncOutcome::Blocked);
    assert_eq!(manager.remove(1), SyncOutcome::Blocked);
    assert_eq!(manager.save_edit(), SyncOutcome::Blocked);

    manager.toggle_sort_mode();
    assert_eq!(manager.reorder(0, MoveDirection::Down), SyncOutcome::Blocked);
}

#[test]
fn edit_flow_commits_trimmed_text() {
    let store = MemoryKvStore::new();
    let mut manager = open(&store, "1");

    manager.dispatch(ItemCommand::BeginEdit { id: 3 });
    manager.dispatch(ItemCommand::EditText {
        text: " 卵 10個 ".to_string(),
    });
    assert_eq!(manager.dispatch(ItemCommand::SaveEdit), SyncOutcome::Persisted);
    assert_eq!(manager.items()[2].name, "卵 10個");

    manager.dispatch(ItemCommand::BeginEdit { id: 3 });
    manager.dispatch(ItemCommand::EditText {
        text: "捨てる".to_string(),
    });
    manager.dispatch(ItemCommand::CancelEdit);
    assert_eq!(manager.items()[2].name, "卵 10個");
}

#[test]
fn checked_read_failure_yields_empty_state() {
    let store = MemoryKvStore::new();
    store.set_item("checked_items_1", "[broken").unwrap();
    let manager = open(&store, "1");

    assert!(manager.checked().is_empty());
    assert_eq!(manager.checked_count(), 0);
}

#[test]
fn write_failure_keeps_in_memory_state() {
    let store = FlakyStore::new();
    let mut manager = ItemManager::new(&store, &RouteParam::from(1_i64), None);
    manager.load();
    store.fail_writes.set(true);

    assert_eq!(manager.toggle_checked(1), SyncOutcome::WriteFailed);
    assert!(manager.is_checked(1));
    assert_eq!(manager.remove(1), SyncOutcome::WriteFailed);
    assert_eq!(item_ids(&manager), vec![2, 3, 4, 5]);
}

#[test]
fn unreadable_store_seeds_items_and_finishes_loading() {
    let store = FlakyStore::new();
    store.fail_reads.set(true);
    let mut manager = ItemManager::new(&store, &RouteParam::from(1_i64), None);

    assert_eq!(manager.load(), SyncOutcome::Persisted);
    assert!(!manager.is_loading());
    assert_eq!(item_ids(&manager), vec![1, 2, 3, 4, 5]);
}

#[test]
fn state_round_trips_through_sqlite_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("shoplist.db");

    let (items, checked) = {
        let store = SqliteKvStore::open(&path).unwrap();
        let mut manager = ItemManager::new(&store, &RouteParam::from(3_i64), None);
        manager.load();
        manager.add();
        manager.toggle_checked(6);
        manager.toggle_checked(2);
        manager.toggle_sort_mode();
        manager.reorder(0, MoveDirection::Down);
        (manager.items().to_vec(), manager.checked().clone())
    };

    let store = SqliteKvStore::open(&path).unwrap();
    let mut reloaded = ItemManager::new(&store, &RouteParam::from(3_i64), None);
    assert_eq!(reloaded.load(), SyncOutcome::NoWrite);
    assert_eq!(reloaded.items(), items.as_slice());
    assert_eq!(reloaded.checked(), &checked);
    assert_eq!(reloaded.checked_count(), 2);
}

#[test]
fn deleting_a_list_removes_what_its_detail_screen_wrote() {
    let store = MemoryKvStore::new();
    let mut lists = ListManager::new(&store);
    lists.load();

    let route = lists.open(2).unwrap();
    {
        let mut detail = ItemManager::for_route(&store, &route);
        detail.load();
        assert_eq!(detail.title(), "週末の準備");
        detail.toggle_checked(1);
    }
    assert!(store.contains_key("shopping_items_2"));
    assert!(store.contains_key("checked_items_2"));

    lists.remove(2);
    assert_eq!(store.keys(), vec!["shopping_lists".to_string()]);
}
