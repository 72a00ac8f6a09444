mod common;

use common::TempDb;
use std::time::Duration;
use trackani::db::ListFilter;
use trackani::validate::{self, ItemKey};
use trackani::{TrackaniError, UserId};
use trackani_schema::{
    AddFavoriteRequest, AddListEntryRequest, ItemType, ListStatus, UpdateListEntryRequest,
};

fn favorite(item_id: &str, item_type: &str) -> validate::NewFavorite {
    validate::new_favorite(AddFavoriteRequest {
        item_id: Some(item_id.to_string()),
        item_type: Some(item_type.to_string()),
    })
    .expect("valid favorite")
}

fn entry(item_id: &str, item_type: &str, status: Option<&str>) -> validate::NewListEntry {
    validate::new_list_entry(AddListEntryRequest {
        item_id: Some(item_id.to_string()),
        item_type: Some(item_type.to_string()),
        status: status.map(str::to_string),
        ..Default::default()
    })
    .expect("valid list entry")
}

fn key(item_id: &str, item_type: ItemType) -> ItemKey {
    ItemKey {
        item_id: item_id.to_string(),
        item_type,
    }
}

#[tokio::test]
async fn favorites_are_unique_per_user_and_item() {
    let tmp = TempDb::new("db-favorites");
    let db = tmp.spawn().await;
    let alice = UserId::new("alice");
    let bob = UserId::new("bob");

    assert!(db.list_favorites(&alice).await.unwrap().is_empty());

    let created = db.add_favorite(&alice, favorite("1", "anime")).await.unwrap();
    assert!(created.id > 0);
    assert_eq!(created.user_id, "alice");
    assert_eq!(created.item_id, "1");
    assert_eq!(created.item_type, ItemType::Anime);

    // Same key again => Conflict.
    let err = db
        .add_favorite(&alice, favorite("1", "anime"))
        .await
        .unwrap_err();
    assert!(matches!(err, TrackaniError::Conflict(ref m) if m == "Already in favorites"));

    // Same item id with the other item type is a different key.
    db.add_favorite(&alice, favorite("1", "manga")).await.unwrap();

    // Another user never conflicts with alice.
    db.add_favorite(&bob, favorite("1", "anime")).await.unwrap();

    let alice_favorites = db.list_favorites(&alice).await.unwrap();
    assert_eq!(alice_favorites.len(), 2);
    assert!(alice_favorites.iter().all(|f| f.user_id == "alice"));
    // Newest first.
    assert_eq!(alice_favorites[0].item_type, ItemType::Manga);
    assert_eq!(alice_favorites[1].id, created.id);

    assert_eq!(db.list_favorites(&bob).await.unwrap().len(), 1);
}

#[tokio::test]
async fn removing_a_favorite_returns_it_once() {
    let tmp = TempDb::new("db-favorite-remove");
    let db = tmp.spawn().await;
    let alice = UserId::new("alice");
    let bob = UserId::new("bob");

    let created = db.add_favorite(&alice, favorite("7", "manga")).await.unwrap();
    assert!(db.has_favorite(&alice, key("7", ItemType::Manga)).await.unwrap());
    assert!(!db.has_favorite(&bob, key("7", ItemType::Manga)).await.unwrap());

    // Bob cannot remove alice's record.
    let err = db
        .remove_favorite(&bob, key("7", ItemType::Manga))
        .await
        .unwrap_err();
    assert!(matches!(err, TrackaniError::NotFound(_)));

    let removed = db
        .remove_favorite(&alice, key("7", ItemType::Manga))
        .await
        .unwrap();
    assert_eq!(removed, created);
    assert!(!db.has_favorite(&alice, key("7", ItemType::Manga)).await.unwrap());

    let err = db
        .remove_favorite(&alice, key("7", ItemType::Manga))
        .await
        .unwrap_err();
    assert!(matches!(err, TrackaniError::NotFound(ref m) if m == "Favorite not found"));
}

#[tokio::test]
async fn list_entries_default_status_and_conflict() {
    let tmp = TempDb::new("db-list-add");
    let db = tmp.spawn().await;
    let alice = UserId::new("alice");

    let anime = db.add_entry(&alice, entry("1", "anime", None)).await.unwrap();
    assert_eq!(anime.status, ListStatus::PlanToWatch);
    assert_eq!(anime.progress, 0);
    assert_eq!(anime.rating, None);
    assert_eq!(anime.notes, None);
    assert_eq!(anime.added_at, anime.updated_at);

    let manga = db.add_entry(&alice, entry("1", "manga", None)).await.unwrap();
    assert_eq!(manga.status, ListStatus::PlanToRead);

    let err = db
        .add_entry(&alice, entry("1", "anime", Some("watching")))
        .await
        .unwrap_err();
    assert!(matches!(err, TrackaniError::Conflict(ref m) if m == "Item already in list"));

    let fetched = db.get_entry(&alice, key("1", ItemType::Anime)).await.unwrap();
    assert_eq!(fetched, anime);

    let err = db
        .get_entry(&UserId::new("bob"), key("1", ItemType::Anime))
        .await
        .unwrap_err();
    assert!(matches!(err, TrackaniError::NotFound(_)));
}

#[tokio::test]
async fn update_touches_only_supplied_fields() {
    let tmp = TempDb::new("db-list-update");
    let db = tmp.spawn().await;
    let alice = UserId::new("alice");

    let created = db
        .add_entry(
            &alice,
            validate::new_list_entry(AddListEntryRequest {
                item_id: Some("5".to_string()),
                item_type: Some("manga".to_string()),
                progress: Some(3),
                rating: Some(7),
                notes: Some("slow start".to_string()),
                ..Default::default()
            })
            .unwrap(),
        )
        .await
        .unwrap();

    tokio::time::sleep(Duration::from_millis(10)).await;

    let patch = validate::list_entry_patch(UpdateListEntryRequest {
        progress: Some(10),
        ..Default::default()
    })
    .unwrap();
    let updated = db
        .update_entry(&alice, key("5", ItemType::Manga), patch)
        .await
        .unwrap();

    assert_eq!(updated.id, created.id);
    assert_eq!(updated.progress, 10);
    assert_eq!(updated.status, ListStatus::PlanToRead);
    assert_eq!(updated.rating, Some(7));
    assert_eq!(updated.notes.as_deref(), Some("slow start"));
    assert_eq!(updated.added_at, created.added_at);
    assert!(updated.updated_at > updated.added_at);

    // Explicit nulls clear the optional fields.
    let patch = validate::list_entry_patch(UpdateListEntryRequest {
        status: Some("reading".to_string()),
        rating: Some(None),
        notes: Some(None),
        ..Default::default()
    })
    .unwrap();
    let cleared = db
        .update_entry(&alice, key("5", ItemType::Manga), patch)
        .await
        .unwrap();
    assert_eq!(cleared.status, ListStatus::Reading);
    assert_eq!(cleared.progress, 10);
    assert_eq!(cleared.rating, None);
    assert_eq!(cleared.notes, None);
    assert!(cleared.updated_at >= updated.updated_at);

    // Missing key => NotFound.
    let err = db
        .update_entry(
            &alice,
            key("5", ItemType::Anime),
            validate::list_entry_patch(UpdateListEntryRequest::default()).unwrap(),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, TrackaniError::NotFound(ref m) if m == "Item not found in list"));
}

#[tokio::test]
async fn list_filters_ordering_and_removal() {
    let tmp = TempDb::new("db-list-filter");
    let db = tmp.spawn().await;
    let alice = UserId::new("alice");
    let bob = UserId::new("bob");

    db.add_entry(&alice, entry("1", "anime", Some("watching")))
        .await
        .unwrap();
    db.add_entry(&alice, entry("2", "anime", Some("completed")))
        .await
        .unwrap();
    db.add_entry(&alice, entry("3", "manga", Some("reading")))
        .await
        .unwrap();
    db.add_entry(&bob, entry("4", "anime", Some("watching")))
        .await
        .unwrap();

    tokio::time::sleep(Duration::from_millis(10)).await;
    // Touch the oldest entry so it becomes the most recently updated.
    db.update_entry(
        &alice,
        key("1", ItemType::Anime),
        validate::list_entry_patch(UpdateListEntryRequest {
            progress: Some(2),
            ..Default::default()
        })
        .unwrap(),
    )
    .await
    .unwrap();

    let all = db.list_entries(&alice, ListFilter::default()).await.unwrap();
    let ids: Vec<&str> = all.iter().map(|e| e.item_id.as_str()).collect();
    assert_eq!(ids, ["1", "3", "2"]);

    let anime = db
        .list_entries(
            &alice,
            ListFilter {
                item_type: Some(ItemType::Anime),
                status: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(anime.len(), 2);

    let watching = db
        .list_entries(
            &alice,
            ListFilter {
                item_type: Some(ItemType::Anime),
                status: Some(ListStatus::Watching),
            },
        )
        .await
        .unwrap();
    assert_eq!(watching.len(), 1);
    assert_eq!(watching[0].item_id, "1");

    let removed = db
        .remove_entry(&alice, key("2", ItemType::Anime))
        .await
        .unwrap();
    assert_eq!(removed.status, ListStatus::Completed);
    let err = db
        .get_entry(&alice, key("2", ItemType::Anime))
        .await
        .unwrap_err();
    assert!(matches!(err, TrackaniError::NotFound(_)));
    let err = db
        .remove_entry(&alice, key("2", ItemType::Anime))
        .await
        .unwrap_err();
    assert!(matches!(err, TrackaniError::NotFound(_)));
}

#[tokio::test]
async fn stats_count_only_present_statuses() {
    let tmp = TempDb::new("db-list-stats");
    let db = tmp.spawn().await;
    let alice = UserId::new("alice");

    assert!(db.list_stats(&alice, ItemType::Anime).await.unwrap().is_empty());

    db.add_entry(&alice, entry("1", "anime", Some("watching")))
        .await
        .unwrap();
    db.add_entry(&alice, entry("2", "anime", Some("watching")))
        .await
        .unwrap();
    db.add_entry(&alice, entry("3", "anime", Some("completed")))
        .await
        .unwrap();
    // Other type and other user do not count.
    db.add_entry(&alice, entry("4", "manga", Some("dropped")))
        .await
        .unwrap();
    db.add_entry(&UserId::new("bob"), entry("5", "anime", Some("dropped")))
        .await
        .unwrap();

    let stats = db.list_stats(&alice, ItemType::Anime).await.unwrap();
    assert_eq!(stats.len(), 2);
    assert_eq!(stats.get(&ListStatus::Watching), Some(&2));
    assert_eq!(stats.get(&ListStatus::Completed), Some(&1));
    assert_eq!(stats.get(&ListStatus::Dropped), None);
}
