use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::models::{Book, BookDraft};

/// BookRepository
///
/// The registry contract. Handlers only see this trait, so the in-memory
/// implementation can be swapped for a stub in tests.
///
/// **Send + Sync + async_trait** make `Arc<dyn BookRepository>` shareable
/// across axum's request tasks.
#[async_trait]
pub trait BookRepository: Send + Sync {
    /// Every stored book, in insertion order.
    async fn list_books(&self) -> Vec<Book>;
    async fn get_book(&self, id: i64) -> Option<Book>;
    /// Stores a new book under a freshly assigned id and returns it.
    async fn add_book(&self, draft: BookDraft) -> Book;
    /// Overwrites the mutable fields of `id`; `None` when it does not exist.
    async fn replace_book(&self, id: i64, draft: BookDraft) -> Option<Book>;
    /// Removes `id`; `false` when it does not exist.
    async fn remove_book(&self, id: i64) -> bool;
}

/// RepositoryState
///
/// The concrete type used to share the registry across the application state.
pub type RepositoryState = Arc<dyn BookRepository>;

/// InMemoryBookRepository
///
/// Process-lifetime registry. The book list and the id counter sit behind one
/// lock, so id assignment and insertion happen atomically: ids are unique and
/// never reused, even after removals or under concurrent inserts.
#[derive(Default)]
pub struct InMemoryBookRepository {
    shelf: RwLock<Shelf>,
}

#[derive(Default)]
struct Shelf {
    books: Vec<Book>,
    last_id: i64,
}

impl InMemoryBookRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BookRepository for InMemoryBookRepository {
    async fn list_books(&self) -> Vec<Book> {
        self.shelf.read().await.books.clone()
    }

    async fn get_book(&self, id: i64) -> Option<Book> {
        self.shelf
            .read()
            .await
            .books
            .iter()
            .find(|book| book.id == id)
            .cloned()
    }

    async fn add_book(&self, draft: BookDraft) -> Book {
        let mut shelf = self.shelf.write().await;
        shelf.last_id += 1;
        let book = Book::from_draft(shelf.last_id, draft);
        shelf.books.push(book.clone());
        book
    }

    async fn replace_book(&self, id: i64, draft: BookDraft) -> Option<Book> {
        let mut shelf = self.shelf.write().await;
        let book = shelf.books.iter_mut().find(|book| book.id == id)?;
        book.apply(draft);
        Some(book.clone())
    }

    async fn remove_book(&self, id: i64) -> bool {
        let mut shelf = self.shelf.write().await;
        match shelf.books.iter().position(|book| book.id == id) {
            Some(index) => {
                shelf.books.remove(index);
                true
            }
            None => false,
        }
    }
}
