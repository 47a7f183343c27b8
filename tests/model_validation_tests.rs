use bookstore_api::{
    models::{Book, BookDraft, BookRequest, ClaimView, ClaimsDebugResponse, LoginRequest, RegisterRequest},
    validation::{Validate, ValidationErrors},
};

// --- Book payloads ---

#[test]
fn test_valid_book_request_becomes_draft() {
    let draft = BookRequest::new("T", "A", 200).validate().unwrap();
    assert_eq!(
        draft,
        BookDraft {
            title: "T".to_string(),
            author: "A".to_string(),
            pages: 200,
        }
    );
}

#[test]
fn test_client_supplied_id_is_ignored() {
    let request = BookRequest {
        id: Some(42),
        ..BookRequest::new("T", "A", 1)
    };
    let book = Book::from_draft(7, request.validate().unwrap());
    assert_eq!(book.id, 7);
}

#[test]
fn test_missing_title_is_reported() {
    let request = BookRequest {
        title: None,
        ..BookRequest::new("T", "A", 200)
    };

    let errors = request.validate().unwrap_err();
    assert_eq!(
        errors.get("title").unwrap(),
        ["The Title field is required.".to_string()]
    );
    assert!(errors.get("author").is_none());
}

#[test]
fn test_blank_author_is_reported() {
    let errors = BookRequest::new("T", "   ", 200).validate().unwrap_err();
    assert_eq!(
        errors.get("author").unwrap(),
        ["The Author field is required.".to_string()]
    );
}

#[test]
fn test_pages_bounds_are_inclusive() {
    for pages in [1, 1000] {
        assert!(BookRequest::new("T", "A", pages).validate().is_ok());
    }
    for pages in [0, -5, 1001] {
        let errors = BookRequest::new("T", "A", pages).validate().unwrap_err();
        assert_eq!(
            errors.get("pages").unwrap(),
            ["The field Pages must be between 1 and 1000.".to_string()]
        );
    }
}

#[test]
fn test_missing_pages_fails_range() {
    let request = BookRequest {
        pages: None,
        ..BookRequest::new("T", "A", 1)
    };
    assert!(request.validate().unwrap_err().get("pages").is_some());
}

#[test]
fn test_all_failures_are_collected() {
    let errors = BookRequest::default().validate().unwrap_err();
    let fields: Vec<&str> = errors.fields().collect();
    assert_eq!(fields, vec!["author", "pages", "title"]);
}

#[test]
fn test_book_request_accepts_partial_json() {
    let request: BookRequest = serde_json::from_str(r#"{"author":"A","pages":5}"#).unwrap();
    assert!(request.title.is_none());
    assert_eq!(request.pages, Some(5));
}

#[test]
fn test_book_request_accepts_pascal_case_keys() {
    let request: BookRequest =
        serde_json::from_str(r#"{"Title":"T","Author":"A","Pages":5}"#).unwrap();

    let draft = request.validate().unwrap();
    assert_eq!(draft.title, "T");
    assert_eq!(draft.author, "A");
    assert_eq!(draft.pages, 5);
}

// --- Account payloads ---

#[test]
fn test_login_request_requires_wellformed_email_and_password() {
    let ok = LoginRequest::new("admin@admin.de", "password").validate().unwrap();
    assert_eq!(ok.email, "admin@admin.de");

    let errors = LoginRequest::new("not-an-email", "").validate().unwrap_err();
    assert_eq!(
        errors.get("email").unwrap(),
        ["The Email field is not a valid e-mail address.".to_string()]
    );
    assert_eq!(
        errors.get("password").unwrap(),
        ["The Password field is required.".to_string()]
    );

    let errors = LoginRequest::default().validate().unwrap_err();
    assert_eq!(
        errors.get("email").unwrap(),
        ["The Email field is required.".to_string()]
    );
}

#[test]
fn test_register_request_rules() {
    let valid: RegisterRequest = serde_json::from_str(
        r#"{"username":"bob","email":"bob@example.com","password":"secret1","confirmPassword":"secret1"}"#,
    )
    .unwrap();
    assert!(valid.validate().is_ok());

    let invalid: RegisterRequest = serde_json::from_str(
        r#"{"email":"bob@@example.com","password":"short","confirmPassword":"other"}"#,
    )
    .unwrap();
    let errors = invalid.validate().unwrap_err();

    assert_eq!(
        errors.get("username").unwrap(),
        ["The Username field is required.".to_string()]
    );
    assert_eq!(
        errors.get("email").unwrap(),
        ["The Email field is not a valid e-mail address.".to_string()]
    );
    assert_eq!(
        errors.get("password").unwrap(),
        ["The field Password must be a string or array type with a minimum length of '6'.".to_string()]
    );
    assert_eq!(
        errors.get("confirmPassword").unwrap(),
        ["'ConfirmPassword' and 'Password' do not match.".to_string()]
    );
}

#[test]
fn test_account_requests_accept_pascal_case_keys() {
    let login: LoginRequest =
        serde_json::from_str(r#"{"Email":"admin@admin.de","Password":"password"}"#).unwrap();
    assert!(login.validate().is_ok());

    let register: RegisterRequest = serde_json::from_str(
        r#"{"Username":"bob","Password":"secret1","ConfirmPassword":"secret1"}"#,
    )
    .unwrap();
    assert_eq!(register.confirm_password.as_deref(), Some("secret1"));
    assert!(register.validate().is_ok());
}

#[test]
fn test_register_optional_fields_may_be_absent() {
    let request: RegisterRequest = serde_json::from_str(r#"{"username":"bob"}"#).unwrap();
    assert!(request.validate().is_ok());
}

// --- Serialization ---

#[test]
fn test_validation_errors_serialize_as_field_map() {
    let mut errors = ValidationErrors::new();
    errors.add("title", "The Title field is required.");
    errors.add("title", "second");

    let json = serde_json::to_value(&errors).unwrap();
    assert_eq!(
        json,
        serde_json::json!({ "title": ["The Title field is required.", "second"] })
    );
}

#[test]
fn test_claims_debug_response_json_shape() {
    let response = ClaimsDebugResponse {
        is_authenticated: true,
        claims: vec![ClaimView {
            claim_type: "role".to_string(),
            value: "Admin".to_string(),
        }],
    };

    let json = serde_json::to_string(&response).unwrap();
    assert!(json.contains(r#""isAuthenticated":true"#));
    assert!(json.contains(r#""type":"role""#));
    assert!(!json.contains("claim_type"));
}
