//! End-to-end tests of the mapping layer over the in-memory backend.

use serde::{Deserialize, Serialize};
use tessera::bson::{Bson, Uuid, doc};
use tessera::{memory::InMemoryBackend, prelude::*};

fn store() -> Store {
    Store::new(InMemoryBackend::new())
}

#[tokio::test]
async fn create_persists_immediately() {
    let store = store();
    let tickets = store.collection("tickets");

    let ticket = tickets
        .create(Criteria::new().with("status", "open"))
        .await
        .unwrap();

    // The document is visible through an independent handle right away.
    assert_eq!(tickets.count(Criteria::new()).await.unwrap(), 1);
    let reattached = tickets.record(ticket.id());
    assert!(reattached.exists().await.unwrap());
    assert_eq!(
        reattached.get("status").await.unwrap(),
        Some(Bson::String("open".to_string()))
    );
}

#[tokio::test]
async fn field_access_round_trips_through_the_backend() {
    let store = store();
    let tickets = store.collection("tickets");
    let ticket = tickets.create(Criteria::new()).await.unwrap();

    ticket.set("assignee", "alice").await.unwrap();
    ticket
        .set_many(doc! { "priority": 2, "status": "open" })
        .await
        .unwrap();

    // A second handle to the same id observes the writes: the handles cache
    // nothing.
    let other = tickets.record(ticket.id());
    assert_eq!(other.get_as::<String>("assignee").await.unwrap(), Some("alice".to_string()));
    assert_eq!(other.get_as::<i32>("priority").await.unwrap(), Some(2));
    assert_eq!(other.get("missing").await.unwrap(), None);

    let snapshot = other.load().await.unwrap();
    assert_eq!(snapshot.get_str("status").unwrap(), "open");
}

#[tokio::test]
async fn finders_translate_criteria() {
    let store = store();
    let tickets = store.collection("tickets");

    for status in ["open", "open", "closed"] {
        tickets
            .create(Criteria::new().with("status", status))
            .await
            .unwrap();
    }

    let open = tickets
        .find(Criteria::new().with("status", "open"))
        .await
        .unwrap();
    assert_eq!(open.len(), 2);

    let all = tickets.find(Criteria::new()).await.unwrap();
    assert_eq!(all.len(), 3);

    let capped = tickets.find(Criteria::new().limit(1)).await.unwrap();
    assert_eq!(capped.len(), 1);

    let closed = tickets
        .find_first(Criteria::new().with("status", "closed"))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(
        closed.get("status").await.unwrap(),
        Some(Bson::String("closed".to_string()))
    );

    assert!(
        tickets
            .find_first(Criteria::new().with("status", "reopened"))
            .await
            .unwrap()
            .is_none()
    );
}

#[tokio::test]
async fn find_or_create_is_an_upsert() {
    let store = store();
    let sessions = store.collection("sessions");

    let first = sessions
        .find_or_create(Criteria::new().with("user", "alice"))
        .await
        .unwrap();
    assert_eq!(sessions.count(Criteria::new()).await.unwrap(), 1);
    assert_eq!(
        first.get("user").await.unwrap(),
        Some(Bson::String("alice".to_string()))
    );

    // A second call finds the existing record instead of inserting.
    let second = sessions
        .find_or_create(Criteria::new().with("user", "alice"))
        .await
        .unwrap();
    assert_eq!(first.id(), second.id());
    assert_eq!(sessions.count(Criteria::new()).await.unwrap(), 1);

    // An existing match is never modified.
    first.set("token", "abc").await.unwrap();
    let third = sessions
        .find_or_create(Criteria::new().with("user", "alice"))
        .await
        .unwrap();
    assert_eq!(
        third.get("token").await.unwrap(),
        Some(Bson::String("abc".to_string()))
    );
}

#[tokio::test]
async fn deleted_records_report_missing() {
    let store = store();
    let tickets = store.collection("tickets");
    let ticket = tickets.create(Criteria::new().with("status", "open")).await.unwrap();

    let stale = tickets.record(ticket.id());
    ticket.delete().await.unwrap();

    assert!(!stale.exists().await.unwrap());
    assert_eq!(stale.get("status").await.unwrap(), None);
    assert!(matches!(
        stale.load().await.unwrap_err(),
        MapperError::RecordNotFound(_, _)
    ));
    assert!(matches!(
        stale.set("status", "closed").await.unwrap_err(),
        MapperError::RecordNotFound(_, _)
    ));
}

#[tokio::test]
async fn clear_empties_a_collection() {
    let store = store();
    let tickets = store.collection("tickets");

    for _ in 0..3 {
        tickets.create(Criteria::new()).await.unwrap();
    }
    assert_eq!(tickets.count(Criteria::new()).await.unwrap(), 3);

    tickets.clear().await.unwrap();
    assert_eq!(tickets.count(Criteria::new()).await.unwrap(), 0);
    assert!(
        store
            .list_collections()
            .await
            .unwrap()
            .contains(&"tickets".to_string())
    );
}

#[derive(Debug, Clone, Serialize, Deserialize, Model)]
#[model(collection = "users")]
struct User {
    id: Uuid,
    name: String,
    age: i32,
}

#[tokio::test]
async fn models_round_trip() {
    let store = store();
    let users = store.model::<User>();
    assert_eq!(users.name(), "users");

    let alice = User { id: Uuid::new(), name: "Alice".to_string(), age: 30 };
    users.save(&alice).await.unwrap();

    let fetched = users.fetch(alice.id).await.unwrap().unwrap();
    assert_eq!(fetched.name, "Alice");
    assert_eq!(fetched.age, 30);

    let found = users
        .find_first(Criteria::new().with("name", "Alice"))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found.id, alice.id);

    users.delete(alice.id).await.unwrap();
    assert!(users.fetch(alice.id).await.unwrap().is_none());
}

#[tokio::test]
async fn model_updates_overwrite_fields() {
    let store = store();
    let users = store.model::<User>();

    let mut bob = User { id: Uuid::new(), name: "Bob".to_string(), age: 41 };
    users.save(&bob).await.unwrap();

    bob.age = 42;
    users.update(&bob).await.unwrap();

    let fetched = users.fetch(bob.id).await.unwrap().unwrap();
    assert_eq!(fetched.age, 42);
}

#[tokio::test]
async fn find_or_insert_keeps_the_existing_model() {
    let store = store();
    let users = store.model::<User>();

    let alice = User { id: Uuid::new(), name: "Alice".to_string(), age: 30 };
    users.save(&alice).await.unwrap();

    let replacement = User { id: Uuid::new(), name: "Alice".to_string(), age: 99 };
    let found = users
        .find_or_insert(Criteria::new().with("name", "Alice"), replacement)
        .await
        .unwrap();
    assert_eq!(found.id, alice.id);
    assert_eq!(found.age, 30);

    let carol = User { id: Uuid::new(), name: "Carol".to_string(), age: 25 };
    let inserted = users
        .find_or_insert(Criteria::new().with("name", "Carol"), carol.clone())
        .await
        .unwrap();
    assert_eq!(inserted.id, carol.id);
    assert!(users.fetch(carol.id).await.unwrap().is_some());
}

#[tokio::test]
async fn typed_and_untyped_access_share_documents() {
    let store = store();
    let users = store.model::<User>();

    let alice = User { id: Uuid::new(), name: "Alice".to_string(), age: 30 };
    let record = users.save(&alice).await.unwrap();

    // The untyped handle sees the model's fields...
    assert_eq!(record.get_as::<i32>("age").await.unwrap(), Some(30));

    // ...and untyped writes show up on the next typed read.
    record.set("age", 31).await.unwrap();
    let fetched = users.fetch(alice.id).await.unwrap().unwrap();
    assert_eq!(fetched.age, 31);
}

#[derive(Debug, Clone, Serialize, Deserialize, Model)]
struct Widget {
    #[model(id)]
    key: Uuid,
    label: String,
}

#[tokio::test]
async fn derive_defaults_and_overrides() {
    // Default collection name: lowercased struct name plus "s".
    assert_eq!(Widget::collection_name(), "widgets");
    assert_eq!(User::collection_name(), "users");

    let widget = Widget { key: Uuid::new(), label: "gear".to_string() };
    assert_eq!(widget.id(), &widget.key);
}
