use crate::models::NewFlashcard;
use crate::repo;
use crate::repo::tests::{create_test_user, setup_test_db};

fn make_card(pool: &crate::db::DbPool, set_id: i32, front: &str) -> i32 {
    repo::create_card(
        pool,
        NewFlashcard::new(set_id, front.to_string(), "back".to_string(), None, None, None, None),
    )
    .unwrap()
    .card_id
}

#[test]
fn test_first_study_creates_row_with_count_one() {
    let pool = setup_test_db();
    let user = create_test_user(&pool, "owner@example.com");
    let set = repo::create_set(&pool, user.user_id, "Biology".to_string(), None).unwrap();
    let card_id = make_card(&pool, set.set_id, "cell");

    let row = repo::record_study(&pool, user.user_id, card_id, true).unwrap();

    assert_eq!(row.times_studied, 1);
    assert!(row.is_mastered);
}

#[test]
fn test_later_studies_increment_and_overwrite_mastery() {
    let pool = setup_test_db();
    let user = create_test_user(&pool, "owner@example.com");
    let set = repo::create_set(&pool, user.user_id, "Biology".to_string(), None).unwrap();
    let card_id = make_card(&pool, set.set_id, "cell");

    repo::record_study(&pool, user.user_id, card_id, true).unwrap();
    // Mastery is overwritten with the supplied value, not OR'd with prior
    // state: a card can be un-mastered again.
    let row = repo::record_study(&pool, user.user_id, card_id, false).unwrap();

    assert_eq!(row.times_studied, 2);
    assert!(!row.is_mastered);

    let row = repo::record_study(&pool, user.user_id, card_id, true).unwrap();
    assert_eq!(row.times_studied, 3);
    assert!(row.is_mastered);
}

#[test]
fn test_progress_is_per_user() {
    let pool = setup_test_db();
    let user = create_test_user(&pool, "owner@example.com");
    let other = create_test_user(&pool, "other@example.com");
    let set = repo::create_set(&pool, user.user_id, "Biology".to_string(), None).unwrap();
    let card_id = make_card(&pool, set.set_id, "cell");

    repo::record_study(&pool, user.user_id, card_id, true).unwrap();
    let row = repo::record_study(&pool, other.user_id, card_id, false).unwrap();

    // The second user starts from their own fresh row
    assert_eq!(row.times_studied, 1);
}

#[test]
fn test_summary_uses_floor_division() {
    let pool = setup_test_db();
    let user = create_test_user(&pool, "owner@example.com");
    let set = repo::create_set(&pool, user.user_id, "Biology".to_string(), None).unwrap();

    let cards: Vec<i32> = (0..3).map(|i| make_card(&pool, set.set_id, &format!("card {}", i))).collect();

    repo::record_study(&pool, user.user_id, cards[0], true).unwrap();
    repo::record_study(&pool, user.user_id, cards[1], true).unwrap();
    repo::record_study(&pool, user.user_id, cards[2], false).unwrap();

    let summary = repo::set_progress_summary(&pool, user.user_id, set.set_id).unwrap();

    assert_eq!(summary.mastered, 2);
    assert_eq!(summary.total, 3);
    // 2/3 floors to 66, it is not rounded to 67
    assert_eq!(summary.percentage, 66);
}

#[test]
fn test_summary_of_empty_set_is_zero() {
    let pool = setup_test_db();
    let user = create_test_user(&pool, "owner@example.com");
    let set = repo::create_set(&pool, user.user_id, "Empty".to_string(), None).unwrap();

    let summary = repo::set_progress_summary(&pool, user.user_id, set.set_id).unwrap();

    assert_eq!(summary.mastered, 0);
    assert_eq!(summary.total, 0);
    assert_eq!(summary.percentage, 0);
}

#[test]
fn test_summary_only_counts_callers_mastery() {
    let pool = setup_test_db();
    let user = create_test_user(&pool, "owner@example.com");
    let other = create_test_user(&pool, "other@example.com");
    let set = repo::create_set(&pool, user.user_id, "Biology".to_string(), None).unwrap();
    let card_id = make_card(&pool, set.set_id, "cell");

    repo::record_study(&pool, other.user_id, card_id, true).unwrap();

    let summary = repo::set_progress_summary(&pool, user.user_id, set.set_id).unwrap();
    assert_eq!(summary.mastered, 0);
    assert_eq!(summary.total, 1);
    assert_eq!(summary.percentage, 0);
}
