use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::validation::{self, Validate, ValidationErrors};

/// Inclusive bounds for `Book::pages`.
pub const MIN_PAGES: i64 = 1;
pub const MAX_PAGES: i64 = 1000;

// --- Core Records ---

/// Book
///
/// A stored book record. The registry assigns `id` on insertion and never
/// changes it afterwards; the remaining fields are replaced wholesale on update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Book {
    pub id: i64,
    pub title: String,
    pub author: String,
    pub pages: i64,
}

impl Book {
    /// Builds a record from validated fields and a registry-assigned id.
    pub fn from_draft(id: i64, draft: BookDraft) -> Self {
        Self {
            id,
            title: draft.title,
            author: draft.author,
            pages: draft.pages,
        }
    }

    /// Overwrites every mutable field, leaving `id` untouched.
    pub fn apply(&mut self, draft: BookDraft) {
        self.title = draft.title;
        self.author = draft.author;
        self.pages = draft.pages;
    }
}

/// BookDraft
///
/// The validated mutable fields of a book. This is the only input the
/// registry accepts, so unchecked payloads cannot reach it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookDraft {
    pub title: String,
    pub author: String,
    pub pages: i64,
}

// --- Request Schemas (Input) ---

/// BookRequest
///
/// Inbound body for POST/PUT `/api/Books`. Every field is optional at the JSON
/// level so that missing fields produce field-level messages instead of a
/// generic deserialization error. A client-supplied `id` is ignored.
/// PascalCase keys (`Title`, `Pages`, ...) are accepted as well.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct BookRequest {
    #[serde(default, alias = "Id", skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default, alias = "Title", skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, alias = "Author", skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, alias = "Pages", skip_serializing_if = "Option::is_none")]
    pub pages: Option<i64>,
}

impl BookRequest {
    pub fn new(title: impl Into<String>, author: impl Into<String>, pages: i64) -> Self {
        Self {
            id: None,
            title: Some(title.into()),
            author: Some(author.into()),
            pages: Some(pages),
        }
    }
}

impl Validate for BookRequest {
    type Output = BookDraft;

    fn validate(self) -> Result<BookDraft, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let title = validation::required(&mut errors, "title", "Title", self.title);
        let author = validation::required(&mut errors, "author", "Author", self.author);
        // A missing page count behaves like 0 and fails the range check.
        let pages = validation::in_range(
            &mut errors,
            "pages",
            "Pages",
            self.pages.unwrap_or(0),
            MIN_PAGES,
            MAX_PAGES,
        );

        match (title, author, pages) {
            (Some(title), Some(author), Some(pages)) => errors.into_result(BookDraft {
                title,
                author,
                pages,
            }),
            _ => Err(errors),
        }
    }
}

/// LoginRequest
///
/// Credentials exchanged for a bearer token at POST `/api/Account/login`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct LoginRequest {
    #[serde(default, alias = "Email")]
    pub email: Option<String>,
    #[serde(default, alias = "Password")]
    pub password: Option<String>,
}

/// Validated login credentials.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl LoginRequest {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: Some(email.into()),
            password: Some(password.into()),
        }
    }
}

impl Validate for LoginRequest {
    type Output = Credentials;

    fn validate(self) -> Result<Credentials, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let email = validation::required(&mut errors, "email", "Email", self.email);
        validation::email(&mut errors, "email", "Email", email.as_deref());
        let password = validation::required(&mut errors, "password", "Password", self.password);

        match (email, password) {
            (Some(email), Some(password)) => {
                errors.into_result(Credentials { email, password })
            }
            _ => Err(errors),
        }
    }
}

/// RegisterRequest
///
/// Body of POST `/api/Account/register`. Registration is a demo endpoint: the
/// payload is validated and then discarded.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct RegisterRequest {
    #[serde(default, alias = "Username")]
    pub username: Option<String>,
    #[serde(default, alias = "Email")]
    pub email: Option<String>,
    #[serde(default, alias = "Password")]
    pub password: Option<String>,
    #[serde(default, alias = "ConfirmPassword")]
    pub confirm_password: Option<String>,
}

impl Validate for RegisterRequest {
    type Output = RegisterRequest;

    fn validate(self) -> Result<RegisterRequest, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let username =
            validation::required(&mut errors, "username", "Username", self.username.clone());
        validation::email(&mut errors, "email", "Email", self.email.as_deref());
        validation::min_length(&mut errors, "password", "Password", self.password.as_deref(), 6);
        validation::matches(
            &mut errors,
            "confirmPassword",
            "ConfirmPassword",
            self.confirm_password.as_deref(),
            "Password",
            self.password.as_deref(),
        );

        match username {
            Some(_) => errors.into_result(self),
            None => Err(errors),
        }
    }
}

// --- Response Schemas (Output) ---

/// TokenResponse
///
/// Output of a successful login.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TokenResponse {
    pub token: String,
}

/// ProfileResponse
///
/// Fixed demo profile returned to any authenticated caller.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ProfileResponse {
    pub username: String,
    pub role: String,
}

/// ClaimView
///
/// One `type`/`value` pair of the authenticated principal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ClaimView {
    #[serde(rename = "type")]
    pub claim_type: String,
    pub value: String,
}

/// ClaimsDebugResponse
///
/// Echo of the caller's principal (GET `/api/Account/debug-claims`).
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ClaimsDebugResponse {
    pub is_authenticated: bool,
    pub claims: Vec<ClaimView>,
}
