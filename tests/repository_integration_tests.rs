use std::{collections::HashSet, sync::Arc};

use bookstore_api::{
    models::BookDraft,
    repository::{BookRepository, InMemoryBookRepository},
};
use tokio::test;

// --- Test Data Helpers ---

fn draft(title: &str, author: &str, pages: i64) -> BookDraft {
    BookDraft {
        title: title.to_string(),
        author: author.to_string(),
        pages,
    }
}

// --- Tests ---

#[test]
async fn test_add_assigns_sequential_ids_and_keeps_order() {
    let repo = InMemoryBookRepository::new();

    let first = repo.add_book(draft("Dune", "Herbert", 412)).await;
    let second = repo.add_book(draft("Emma", "Austen", 474)).await;

    assert_eq!(first.id, 1);
    assert_eq!(second.id, 2);

    let titles: Vec<String> = repo
        .list_books()
        .await
        .into_iter()
        .map(|b| b.title)
        .collect();
    assert_eq!(titles, vec!["Dune", "Emma"]);
}

#[test]
async fn test_get_returns_stored_record_or_none() {
    let repo = InMemoryBookRepository::new();
    let stored = repo.add_book(draft("Dune", "Herbert", 412)).await;

    assert_eq!(repo.get_book(stored.id).await, Some(stored));
    assert_eq!(repo.get_book(99).await, None);
}

#[test]
async fn test_list_is_empty_initially() {
    let repo = InMemoryBookRepository::new();
    assert!(repo.list_books().await.is_empty());
}

#[test]
async fn test_replace_overwrites_fields_and_preserves_id() {
    let repo = InMemoryBookRepository::new();
    let stored = repo.add_book(draft("Dune", "Herbert", 412)).await;

    let updated = repo
        .replace_book(stored.id, draft("Dune Messiah", "F. Herbert", 256))
        .await
        .expect("book should exist");

    assert_eq!(updated.id, stored.id);
    assert_eq!(updated.title, "Dune Messiah");
    assert_eq!(updated.author, "F. Herbert");
    assert_eq!(updated.pages, 256);
    assert_eq!(repo.get_book(stored.id).await, Some(updated));
}

#[test]
async fn test_replace_unknown_id_is_none() {
    let repo = InMemoryBookRepository::new();
    assert!(repo.replace_book(7, draft("X", "Y", 1)).await.is_none());
    assert!(repo.list_books().await.is_empty());
}

#[test]
async fn test_remove_deletes_only_the_target() {
    let repo = InMemoryBookRepository::new();
    let keep = repo.add_book(draft("Keep", "A", 10)).await;
    let gone = repo.add_book(draft("Drop", "B", 20)).await;

    assert!(repo.remove_book(gone.id).await);
    assert!(!repo.remove_book(gone.id).await);
    assert_eq!(repo.get_book(gone.id).await, None);
    assert_eq!(repo.list_books().await, vec![keep]);
}

#[test]
async fn test_ids_are_not_reused_after_remove() {
    let repo = InMemoryBookRepository::new();
    let first = repo.add_book(draft("One", "A", 1)).await;
    let second = repo.add_book(draft("Two", "B", 2)).await;

    assert!(repo.remove_book(first.id).await);
    let third = repo.add_book(draft("Three", "C", 3)).await;

    assert_ne!(third.id, second.id);
    assert_eq!(third.id, 3);
    assert_eq!(repo.get_book(second.id).await.unwrap().title, "Two");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_inserts_get_unique_ids() {
    let repo = Arc::new(InMemoryBookRepository::new());

    let tasks: Vec<_> = (0..200)
        .map(|i| {
            let repo = Arc::clone(&repo);
            tokio::spawn(async move { repo.add_book(draft(&format!("Book {i}"), "Anon", 100)).await })
        })
        .collect();

    let mut ids = HashSet::new();
    for task in tasks {
        let book = task.await.unwrap();
        assert!(book.id > 0);
        assert!(ids.insert(book.id), "duplicate id {}", book.id);
    }

    assert_eq!(repo.list_books().await.len(), 200);
}
