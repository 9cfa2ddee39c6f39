//! Material facade over the in-memory document store:
//! 1) Create two materials, list them back in id order.
//! 2) Merge-update one and check untouched fields survive.
//! 3) Delete the other and check only the first remains.
//! Then the error categories: invalid input, not found, transport.

use materiales_service::app::error::RepositoryError;
use materiales_service::{DocumentStore, MaterialId, MaterialService, MemoryStore, MATERIALS_COLLECTION};
use serde_json::json;
use std::sync::Arc;

fn service() -> (Arc<MemoryStore>, MaterialService) {
    let store = Arc::new(MemoryStore::new());
    let service = MaterialService::new(store.clone());
    (store, service)
}

#[tokio::test]
async fn test_create_list_update_delete() -> Result<(), Box<dyn std::error::Error>> {
    let (store, materials) = service();

    materials
        .create(&json!({"id": 1, "nombre": "Cemento", "costo": 10}))
        .await?;
    materials
        .create(&json!({"id": 2, "nombre": "Arena", "costo": 5}))
        .await?;

    let listed = materials.list().await?;
    let ids: Vec<&str> = listed.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["1", "2"]);
    assert_eq!(listed[0].get("nombre"), Some(&json!("Cemento")));
    assert_eq!(listed[1].get("costo"), Some(&json!(5)));

    let one = MaterialId::from(1i64);
    materials.update(&one, &json!({"costo": 12})).await?;
    let updated = materials.get(&one).await?;
    assert_eq!(updated.get("costo"), Some(&json!(12)));
    assert_eq!(updated.get("nombre"), Some(&json!("Cemento")));

    materials.delete(&MaterialId::from(2i64)).await?;
    let remaining = materials.list().await?;
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].id.as_str(), "1");
    assert_eq!(store.len(MATERIALS_COLLECTION).await, 1);

    Ok(())
}

#[tokio::test]
async fn test_list_orders_numeric_ids_numerically() -> Result<(), Box<dyn std::error::Error>> {
    let (_store, materials) = service();
    for id in [10, 2, 1] {
        materials.create(&json!({"id": id, "nombre": format!("m{}", id)})).await?;
    }
    let ids: Vec<String> = materials
        .list()
        .await?
        .into_iter()
        .map(|r| r.id.to_string())
        .collect();
    assert_eq!(ids, vec!["1", "2", "10"]);
    Ok(())
}

#[tokio::test]
async fn test_create_replaces_existing_document() -> Result<(), Box<dyn std::error::Error>> {
    let (store, materials) = service();
    materials
        .create(&json!({"id": "cem-01", "nombre": "Cemento", "unidad": "saco"}))
        .await?;
    let record = materials
        .create(&json!({"id": "cem-01", "nombre": "Cemento gris"}))
        .await?;
    assert_eq!(record.id.as_str(), "cem-01");

    let read = materials.get(&MaterialId::parse("cem-01")?).await?;
    assert_eq!(read.get("nombre"), Some(&json!("Cemento gris")));
    assert_eq!(read.get("unidad"), None);
    assert_eq!(store.len(MATERIALS_COLLECTION).await, 1);
    Ok(())
}

#[tokio::test]
async fn test_invalid_input_never_reaches_the_store() {
    let (store, materials) = service();

    for bad in [
        json!({"nombre": "sin id"}),
        json!({"id": null, "nombre": "x"}),
        json!({"id": "a/b"}),
        json!({"id": "  "}),
        json!([1, 2, 3]),
    ] {
        let err = materials.create(&bad).await.unwrap_err();
        assert!(
            matches!(err, RepositoryError::InvalidInput(_)),
            "{} gave {:?}",
            bad,
            err
        );
    }
    assert_eq!(store.len(MATERIALS_COLLECTION).await, 0);
}

#[tokio::test]
async fn test_string_ids_are_keys_verbatim() -> Result<(), Box<dyn std::error::Error>> {
    let (store, materials) = service();
    materials.create(&json!({"id": "1", "nombre": "Arena"})).await?;

    for padded in [" 9", "9 ", "\t9"] {
        let err = materials
            .create(&json!({"id": padded, "nombre": "Grava"}))
            .await
            .unwrap_err();
        assert!(
            matches!(err, RepositoryError::InvalidInput(_)),
            "{:?} gave {:?}",
            padded,
            err
        );
    }
    assert_eq!(store.len(MATERIALS_COLLECTION).await, 1);

    let created = materials.create(&json!({"id": "9", "nombre": "Grava"})).await?;
    assert_eq!(created.id.as_str(), "9");

    let listed = materials.list().await?;
    let ids: Vec<&str> = listed.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["1", "9"]);

    let err = materials
        .update(&MaterialId::parse("9")?, &json!({"id": " 9", "costo": 1}))
        .await
        .unwrap_err();
    assert!(matches!(err, RepositoryError::InvalidInput(_)));
    Ok(())
}

#[tokio::test]
async fn test_integers_beyond_i64_are_rejected() -> Result<(), Box<dyn std::error::Error>> {
    let (store, materials) = service();

    let err = materials.create(&json!({"id": u64::MAX})).await.unwrap_err();
    assert!(matches!(err, RepositoryError::InvalidInput(_)));
    let err = materials
        .create(&json!({"id": 1, "stock": u64::MAX}))
        .await
        .unwrap_err();
    assert!(matches!(err, RepositoryError::InvalidInput(_)));
    assert_eq!(store.len(MATERIALS_COLLECTION).await, 0);

    materials.create(&json!({"id": i64::MAX, "stock": i64::MIN})).await?;
    let read = materials.get(&MaterialId::from(i64::MAX)).await?;
    assert_eq!(read.get("stock"), Some(&json!(i64::MIN)));
    Ok(())
}

#[tokio::test]
async fn test_update_rules() -> Result<(), Box<dyn std::error::Error>> {
    let (_store, materials) = service();
    materials.create(&json!({"id": 7, "nombre": "Grava"})).await?;
    let seven = MaterialId::from(7i64);

    let err = materials.update(&seven, &json!({})).await.unwrap_err();
    assert!(matches!(err, RepositoryError::InvalidInput(_)));

    let err = materials
        .update(&seven, &json!({"id": 8, "nombre": "otro"}))
        .await
        .unwrap_err();
    assert!(matches!(err, RepositoryError::InvalidInput(_)));

    // same id is tolerated and the stored id keeps its type
    materials
        .update(&seven, &json!({"id": "7", "costo": 3}))
        .await?;
    let read = materials.get(&seven).await?;
    assert_eq!(read.get("costo"), Some(&json!(3)));
    assert_eq!(read.to_json()["id"], json!("7"));

    let err = materials
        .update(&MaterialId::from(99i64), &json!({"costo": 1}))
        .await
        .unwrap_err();
    assert!(err.is_not_found());
    Ok(())
}

#[tokio::test]
async fn test_get_missing_and_delete_missing() -> Result<(), Box<dyn std::error::Error>> {
    let (_store, materials) = service();
    let missing = MaterialId::parse("no-existe")?;

    let err = materials.get(&missing).await.unwrap_err();
    assert!(err.is_not_found());

    materials.delete(&missing).await?;
    materials.delete(&missing).await?;
    Ok(())
}

#[tokio::test]
async fn test_store_failure_surfaces_as_transport() -> Result<(), Box<dyn std::error::Error>> {
    let (store, materials) = service();
    materials.create(&json!({"id": 1, "nombre": "Cemento"})).await?;

    store.set_simulate_failure(true);
    assert!(matches!(
        materials.list().await,
        Err(RepositoryError::Transport(_))
    ));
    assert!(matches!(
        materials.create(&json!({"id": 2})).await,
        Err(RepositoryError::Transport(_))
    ));
    assert!(matches!(
        materials.update(&MaterialId::from(1i64), &json!({"costo": 1})).await,
        Err(RepositoryError::Transport(_))
    ));
    assert!(matches!(
        materials.delete(&MaterialId::from(1i64)).await,
        Err(RepositoryError::Transport(_))
    ));
    assert!(materials.ping().await.is_err());

    store.set_simulate_failure(false);
    assert_eq!(materials.list().await?.len(), 1);
    Ok(())
}

#[tokio::test]
async fn test_collections_are_isolated() -> Result<(), Box<dyn std::error::Error>> {
    let store = Arc::new(MemoryStore::new());
    let materials = MaterialService::new(store.clone());
    let archive = MaterialService::with_collection(store.clone(), "materiales_archivo");
    assert_eq!(archive.collection(), "materiales_archivo");

    materials.create(&json!({"id": 1, "nombre": "Cemento"})).await?;
    assert!(archive.list().await?.is_empty());
    assert_eq!(materials.backend_name(), store.backend_name());
    Ok(())
}
