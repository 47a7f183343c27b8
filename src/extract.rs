//! Request extractors that report failures through `ApiError`.

use axum::{
    Json,
    extract::{FromRequest, FromRequestParts, Path, Request},
    http::request::Parts,
};
use serde::de::DeserializeOwned;

use crate::{error::ApiError, validation::Validate};

/// Valid
///
/// JSON body extractor that runs the payload's `Validate` impl before the
/// handler sees it. Malformed JSON and failed field checks both become a
/// 400 with per-field messages; a missing JSON content type becomes a 415.
///
/// `Valid<BookRequest>` yields the validated `BookDraft`.
pub struct Valid<T: Validate>(pub T::Output);

impl<S, T> FromRequest<S> for Valid<T>
where
    S: Send + Sync,
    T: Validate + DeserializeOwned + Send,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(payload) = Json::<T>::from_request(req, state).await?;
        Ok(Valid(payload.validate()?))
    }
}

/// BookId
///
/// `{id}` path segment. A non-integer id is a 400 rather than axum's plain
/// text rejection.
pub struct BookId(pub i64);

impl<S> FromRequestParts<S> for BookId
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(id) = Path::<i64>::from_request_parts(parts, state).await?;
        Ok(BookId(id))
    }
}
