use crate::{
    AppState,
    auth::{ADMIN_ROLE, Principal},
    error::{ApiError, ApiResult},
    extract::{BookId, Valid},
    models::{
        Book, BookRequest, ClaimsDebugResponse, LoginRequest, ProfileResponse, RegisterRequest,
        TokenResponse,
    },
};
use axum::{
    Json,
    extract::State,
    http::{StatusCode, header},
    response::IntoResponse,
};

/// Base path of the book resource, also used to build `Location` headers.
pub const BOOKS_PATH: &str = "/api/Books";

// --- Account Handlers ---

/// register
///
/// [Public Route] Demo registration. The payload is validated and the fixed
/// confirmation is returned; nothing is stored.
pub async fn register(Valid(request): Valid<RegisterRequest>) -> &'static str {
    tracing::info!(
        username = request.username.as_deref().unwrap_or_default(),
        "registration accepted"
    );
    "User registered successfully."
}

/// login
///
/// [Public Route] Exchanges the demo credential pair for a one-hour Admin
/// bearer token. Wrong credentials are a 401.
pub async fn login(
    State(state): State<AppState>,
    Valid(credentials): Valid<LoginRequest>,
) -> ApiResult<Json<TokenResponse>> {
    let token = state
        .tokens
        .login(&credentials.email, &credentials.password)?;

    tracing::info!(email = %credentials.email, "issued bearer token");
    Ok(Json(TokenResponse { token }))
}

/// profile
///
/// [Authenticated Route] Fixed demo profile for any verified caller.
pub async fn profile(_principal: Principal) -> Json<ProfileResponse> {
    Json(ProfileResponse {
        username: "testuser".to_string(),
        role: ADMIN_ROLE.to_string(),
    })
}

/// debug_claims
///
/// [Authenticated Route] Echoes the claims of the caller's principal.
pub async fn debug_claims(principal: Principal) -> Json<ClaimsDebugResponse> {
    Json(ClaimsDebugResponse {
        is_authenticated: true,
        claims: principal.claims,
    })
}

// --- Book Handlers ---

/// list_books
///
/// [Public Route] Every book, in insertion order.
pub async fn list_books(State(state): State<AppState>) -> Json<Vec<Book>> {
    Json(state.books.list_books().await)
}

/// get_book
///
/// [Public Route] A single book by id, or 404.
pub async fn get_book(
    State(state): State<AppState>,
    BookId(id): BookId,
) -> ApiResult<Json<Book>> {
    state
        .books
        .get_book(id)
        .await
        .map(Json)
        .ok_or_else(|| ApiError::not_found(format!("book {id}")))
}

/// create_book
///
/// [Admin Route] Validates and stores a new book. Responds 201 with the stored
/// record and a `Location` header pointing at it.
pub async fn create_book(
    State(state): State<AppState>,
    Valid(draft): Valid<BookRequest>,
) -> impl IntoResponse {
    let book = state.books.add_book(draft).await;
    tracing::info!(id = book.id, title = %book.title, "book created");

    let location = format!("{BOOKS_PATH}/{}", book.id);
    (StatusCode::CREATED, [(header::LOCATION, location)], Json(book))
}

/// update_book
///
/// [Admin Route] Replaces title, author and pages of an existing book. The id
/// is preserved; an unknown id is a 404.
pub async fn update_book(
    State(state): State<AppState>,
    BookId(id): BookId,
    Valid(draft): Valid<BookRequest>,
) -> ApiResult<Json<Book>> {
    match state.books.replace_book(id, draft).await {
        Some(book) => {
            tracing::info!(id, "book updated");
            Ok(Json(book))
        }
        None => Err(ApiError::not_found(format!("book {id}"))),
    }
}

/// delete_book
///
/// [Admin Route] Removes a book. 204 on success, 404 if it did not exist.
pub async fn delete_book(
    State(state): State<AppState>,
    BookId(id): BookId,
) -> ApiResult<StatusCode> {
    if state.books.remove_book(id).await {
        tracing::info!(id, "book deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::not_found(format!("book {id}")))
    }
}
