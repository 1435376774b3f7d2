mod common;

use axum::http::StatusCode;
use common::*;
use serde_json::json;

async fn two_cards(app: &mut axum::Router, token: &str) -> (i64, i64) {
    let set_id = create_set(app, token, "Biology").await;
    let a = create_card(app, token, set_id, "a").await;
    let b = create_card(app, token, set_id, "b").await;
    (a, b)
}

#[tokio::test]
async fn test_create_and_list_outgoing_links() {
    let mut app = create_test_app();
    let (token, _) = register(&mut app, "ada@example.com").await;
    let (a, b) = two_cards(&mut app, &token).await;

    let (status, link) = send(
        &mut app,
        "POST",
        &format!("/api/cards/{}/links", a),
        Some(&token),
        Some(json!({ "to_card_id": b, "link_type": "related" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(link["from_card_id"], a);
    assert_eq!(link["to_card_id"], b);
    assert_eq!(link["link_type"], "related");

    // Outgoing only: a sees the link, b does not
    let (_, links) = send(
        &mut app,
        "GET",
        &format!("/api/cards/{}/links", a),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(links.as_array().unwrap().len(), 1);

    let (_, links) = send(
        &mut app,
        "GET",
        &format!("/api/cards/{}/links", b),
        Some(&token),
        None,
    )
    .await;
    assert!(links.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_duplicate_link_returns_existing_row() {
    let mut app = create_test_app();
    let (token, _) = register(&mut app, "ada@example.com").await;
    let (a, b) = two_cards(&mut app, &token).await;

    let (_, first) = send(
        &mut app,
        "POST",
        &format!("/api/cards/{}/links", a),
        Some(&token),
        Some(json!({ "to_card_id": b })),
    )
    .await;

    let (status, second) = send(
        &mut app,
        "POST",
        &format!("/api/cards/{}/links", a),
        Some(&token),
        Some(json!({ "to_card_id": b })),
    )
    .await;

    // Idempotent create: same id, not an error, no second row
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first["link_id"], second["link_id"]);

    let (_, links) = send(
        &mut app,
        "GET",
        &format!("/api/cards/{}/links", a),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(links.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_create_link_without_target_is_bad_request() {
    let mut app = create_test_app();
    let (token, _) = register(&mut app, "ada@example.com").await;
    let (a, _) = two_cards(&mut app, &token).await;

    let (status, body) = send(
        &mut app,
        "POST",
        &format!("/api/cards/{}/links", a),
        Some(&token),
        Some(json!({})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "to_card_id is required");
}

#[tokio::test]
async fn test_create_link_to_missing_card_is_not_found() {
    let mut app = create_test_app();
    let (token, _) = register(&mut app, "ada@example.com").await;
    let (a, _) = two_cards(&mut app, &token).await;

    let (status, _) = send(
        &mut app,
        "POST",
        &format!("/api/cards/{}/links", a),
        Some(&token),
        Some(json!({ "to_card_id": 9999 })),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_create_link_across_users_is_forbidden() {
    let mut app = create_test_app();
    let (ada, _) = register(&mut app, "ada@example.com").await;
    let (bob, _) = register(&mut app, "bob@example.com").await;

    let ada_set = create_set(&mut app, &ada, "Ada's set").await;
    let ada_card = create_card(&mut app, &ada, ada_set, "hers").await;
    let bob_set = create_set(&mut app, &bob, "Bob's set").await;
    let bob_card = create_card(&mut app, &bob, bob_set, "his").await;

    // Bob owns the source but not the target
    let (status, _) = send(
        &mut app,
        "POST",
        &format!("/api/cards/{}/links", bob_card),
        Some(&bob),
        Some(json!({ "to_card_id": ada_card })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // And the other way around
    let (status, _) = send(
        &mut app,
        "POST",
        &format!("/api/cards/{}/links", ada_card),
        Some(&bob),
        Some(json!({ "to_card_id": bob_card })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_delete_link() {
    let mut app = create_test_app();
    let (token, _) = register(&mut app, "ada@example.com").await;
    let (a, b) = two_cards(&mut app, &token).await;

    let (_, link) = send(
        &mut app,
        "POST",
        &format!("/api/cards/{}/links", a),
        Some(&token),
        Some(json!({ "to_card_id": b })),
    )
    .await;
    let link_id = link["link_id"].as_i64().unwrap();

    let (status, body) = send(
        &mut app,
        "DELETE",
        &format!("/api/links/{}", link_id),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);

    let (status, body) = send(
        &mut app,
        "DELETE",
        &format!("/api/links/{}", link_id),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Link not found");
}

#[tokio::test]
async fn test_delete_foreign_link_is_forbidden() {
    let mut app = create_test_app();
    let (ada, _) = register(&mut app, "ada@example.com").await;
    let (bob, _) = register(&mut app, "bob@example.com").await;
    let (a, b) = two_cards(&mut app, &ada).await;

    let (_, link) = send(
        &mut app,
        "POST",
        &format!("/api/cards/{}/links", a),
        Some(&ada),
        Some(json!({ "to_card_id": b })),
    )
    .await;
    let link_id = link["link_id"].as_i64().unwrap();

    let (status, _) = send(
        &mut app,
        "DELETE",
        &format!("/api/links/{}", link_id),
        Some(&bob),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}
