//! Integration tests for the document store backends
//!
//! The memory store tests always run. The MongoDB test needs a reachable server
//! (`DATABASE_URL`) and is ignored by default.

use common::{
    DocumentId, DocumentStore, Filter, FindQuery, Projection, StoreError, Update,
    database::{DatabaseConfig, connect, health_check},
    memory::MemoryStore,
    store::Document,
};
use serde_json::{Value, json};

fn doc(value: Value) -> Document {
    match value {
        Value::Object(map) => map,
        _ => panic!("not an object"),
    }
}

async fn seeded_foods(store: &dyn DocumentStore) -> Vec<String> {
    let mut ids = Vec::new();
    for name in ["Chicken Biryani", "Beef Ramen", "Veggie Biryani", "Fish Tacos"] {
        let outcome = store
            .insert_one(
                "foods",
                doc(json!({"foodName": name, "quantity": 10, "userEmail": "chef@dish.io"})),
            )
            .await
            .expect("insert food");
        ids.push(outcome.inserted_id);
    }
    ids
}

#[tokio::test]
async fn test_find_preserves_insertion_order_with_window() {
    let store = MemoryStore::new();
    let ids = seeded_foods(&store).await;

    let window = store
        .find("foods", FindQuery::new(Filter::All).skip(1).limit(Some(2)))
        .await
        .unwrap();

    let returned: Vec<&str> = window.iter().map(|d| d["_id"].as_str().unwrap()).collect();
    assert_eq!(returned, vec![ids[1].as_str(), ids[2].as_str()]);
}

#[tokio::test]
async fn test_case_insensitive_search_with_projection() {
    let store = MemoryStore::new();
    seeded_foods(&store).await;

    let query = FindQuery::new(Filter::contains_ignore_case("foodName", "BIRYANI"))
        .project(Projection::fields(&["foodName"]));
    let found = store.find("foods", query).await.unwrap();

    assert_eq!(found.len(), 2);
    for item in &found {
        assert!(item["foodName"].as_str().unwrap().contains("Biryani"));
        assert!(item.get("userEmail").is_none());
        assert!(item.get("_id").is_some());
    }
}

#[tokio::test]
async fn test_upsert_creates_then_matches() {
    let store = MemoryStore::new();
    let id = DocumentId::new();

    let first = store
        .update_one(
            "foods",
            Filter::Id(id),
            Update::Increment {
                field: "orders".to_string(),
                by: 1,
            },
            true,
        )
        .await
        .unwrap();
    assert_eq!(first.upserted_count, 1);
    assert_eq!(first.upserted_id.as_deref(), Some(id.to_hex().as_str()));

    let second = store
        .update_one(
            "foods",
            Filter::Id(id),
            Update::Increment {
                field: "orders".to_string(),
                by: 1,
            },
            true,
        )
        .await
        .unwrap();
    assert_eq!((second.matched_count, second.modified_count), (1, 1));

    let stored = store.find_one("foods", Filter::Id(id)).await.unwrap().unwrap();
    assert_eq!(stored["orders"], json!(2));
}

#[tokio::test]
async fn test_upsert_on_foreign_id_conflicts() {
    let store = MemoryStore::new();
    let ids = seeded_foods(&store).await;
    let id: DocumentId = ids[0].parse().unwrap();

    let result = store
        .update_one(
            "foods",
            Filter::Id(id).and(Filter::eq("userEmail", "intruder@dish.io")),
            Update::Set(doc(json!({"foodName": "Hijacked"}))),
            true,
        )
        .await;

    assert!(matches!(result, Err(StoreError::Conflict(_))));
    let stored = store.find_one("foods", Filter::Id(id)).await.unwrap().unwrap();
    assert_eq!(stored["foodName"], json!("Chicken Biryani"));
}

#[tokio::test]
async fn test_delete_missing_reports_zero() {
    let store = MemoryStore::new();
    seeded_foods(&store).await;

    let outcome = store
        .delete_one("foods", Filter::Id(DocumentId::new()))
        .await
        .unwrap();
    assert_eq!(outcome.deleted_count, 0);
    assert_eq!(store.estimated_count("foods").await.unwrap(), 4);
}

#[tokio::test]
#[ignore = "requires a running MongoDB server"]
async fn test_mongo_round_trip() -> Result<(), Box<dyn std::error::Error>> {
    let config = DatabaseConfig {
        database_name: "dishDynamoDB_test".to_string(),
        ..DatabaseConfig::from_env()
    };
    let store = connect(&config).await?;
    assert!(health_check(store.as_ref()).await?, "store health check failed");

    let inserted = store
        .insert_one("foods", doc(json!({"foodName": "Integration Soup", "quantity": 1})))
        .await?;
    let id: DocumentId = inserted.inserted_id.parse()?;

    let updated = store
        .update_one(
            "foods",
            Filter::Id(id),
            Update::Set(doc(json!({"quantity": 3}))),
            false,
        )
        .await?;
    assert_eq!(updated.modified_count, 1);

    let stored = store.find_one("foods", Filter::Id(id)).await?.expect("stored");
    assert_eq!(stored["_id"], json!(id.to_hex()));
    assert_eq!(stored["quantity"], json!(3));

    let deleted = store.delete_one("foods", Filter::Id(id)).await?;
    assert_eq!(deleted.deleted_count, 1);

    Ok(())
}
