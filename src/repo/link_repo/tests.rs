use crate::models::NewFlashcard;
use crate::repo;
use crate::repo::tests::{create_test_user, setup_test_db};
use crate::schema::flashcard_links;
use diesel::prelude::*;

fn setup_cards(pool: &crate::db::DbPool) -> (i32, i32, i32) {
    let user = create_test_user(pool, "owner@example.com");
    let set = repo::create_set(pool, user.user_id, "Biology".to_string(), None).unwrap();
    let mut ids = Vec::new();
    for front in ["a", "b", "c"] {
        let card = repo::create_card(
            pool,
            NewFlashcard::new(set.set_id, front.to_string(), "back".to_string(), None, None, None, None),
        )
        .unwrap();
        ids.push(card.card_id);
    }
    (ids[0], ids[1], ids[2])
}

#[test]
fn test_links_from_card_returns_outgoing_only() {
    let pool = setup_test_db();
    let (a, b, c) = setup_cards(&pool);

    repo::create_link(&pool, a, b, None).unwrap();
    repo::create_link(&pool, a, c, Some("related".to_string())).unwrap();
    repo::create_link(&pool, b, a, None).unwrap();

    let links = repo::links_from_card(&pool, a).unwrap();
    assert_eq!(links.len(), 2);
    assert!(links.iter().all(|l| l.from_card_id == a));

    // The incoming b -> a link is not in a's outgoing list
    assert!(!links.iter().any(|l| l.from_card_id == b));
}

#[test]
fn test_create_link_is_idempotent_per_ordered_pair() {
    let pool = setup_test_db();
    let (a, b, _) = setup_cards(&pool);

    let first = repo::create_link(&pool, a, b, Some("related".to_string())).unwrap();
    let second = repo::create_link(&pool, a, b, None).unwrap();

    // The existing link comes back unchanged, no second row appears
    assert_eq!(first.link_id, second.link_id);
    assert_eq!(second.link_type.as_deref(), Some("related"));

    let conn = &mut pool.get().unwrap();
    let total: i64 = flashcard_links::table.count().get_result(conn).unwrap();
    assert_eq!(total, 1);

    // The reverse direction is a different pair and gets its own row
    let reverse = repo::create_link(&pool, b, a, None).unwrap();
    assert_ne!(reverse.link_id, first.link_id);
}

#[test]
fn test_get_and_delete_link() {
    let pool = setup_test_db();
    let (a, b, _) = setup_cards(&pool);

    let link = repo::create_link(&pool, a, b, None).unwrap();

    assert!(repo::get_link(&pool, link.link_id).unwrap().is_some());
    assert!(repo::delete_link(&pool, link.link_id).unwrap());
    assert!(repo::get_link(&pool, link.link_id).unwrap().is_none());
    assert!(!repo::delete_link(&pool, link.link_id).unwrap());
}
