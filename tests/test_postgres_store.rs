//! Material facade over the PostgreSQL document table.
//! Skipped unless DATABASE_URL points at a reachable database.

use materiales_service::app::error::RepositoryError;
use materiales_service::{MaterialId, MaterialService, PostgresDocumentStore};
use serde_json::json;
use std::env;
use std::sync::Arc;

const COLLECTION: &str = "materiales_test";

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_postgres_round_trip() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();
    let Ok(database_url) = env::var("DATABASE_URL") else {
        eprintln!("DATABASE_URL not set; skipping postgres test");
        return Ok(());
    };

    let store = PostgresDocumentStore::connect(&database_url).await?;
    store.clear_collection(COLLECTION).await?;
    let materials = MaterialService::with_collection(Arc::new(store.clone()), COLLECTION);
    materials.ping().await?;

    for id in [10, 2, 1] {
        materials
            .create(&json!({"id": id, "nombre": format!("m{}", id), "costo": id * 2}))
            .await?;
    }
    let ids: Vec<String> = materials
        .list()
        .await?
        .into_iter()
        .map(|r| r.id.to_string())
        .collect();
    assert_eq!(ids, vec!["1", "2", "10"]);

    let two = MaterialId::from(2i64);
    materials.update(&two, &json!({"costo": 12})).await?;
    let read = materials.get(&two).await?;
    assert_eq!(read.get("costo"), Some(&json!(12)));
    assert_eq!(read.get("nombre"), Some(&json!("m2")));

    let err = materials
        .update(&MaterialId::from(99i64), &json!({"costo": 1}))
        .await
        .unwrap_err();
    assert!(matches!(err, RepositoryError::NotFound(_)));

    materials.delete(&two).await?;
    materials.delete(&two).await?;
    assert_eq!(materials.list().await?.len(), 2);

    store.clear_collection(COLLECTION).await?;
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_postgres_string_ids_sort_bytewise() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();
    let Ok(database_url) = env::var("DATABASE_URL") else {
        eprintln!("DATABASE_URL not set; skipping postgres test");
        return Ok(());
    };

    let collection = "materiales_test_str";
    let store = PostgresDocumentStore::connect(&database_url).await?;
    store.clear_collection(collection).await?;
    let materials = MaterialService::with_collection(Arc::new(store.clone()), collection);

    for id in ["b", "B", "a", "10", "2"] {
        materials.create(&json!({"id": id})).await?;
    }
    let ids: Vec<String> = materials
        .list()
        .await?
        .into_iter()
        .map(|r| r.id.to_string())
        .collect();
    // byte order, independent of the database collation
    assert_eq!(ids, vec!["10", "2", "B", "a", "b"]);

    store.clear_collection(collection).await?;
    Ok(())
}
