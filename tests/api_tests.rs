use bookstore_api::{
    AppConfig, AppState,
    auth::{DEMO_EMAIL, DEMO_PASSWORD},
    create_router,
    models::{Book, TokenResponse},
};
use reqwest::StatusCode;
use serde_json::json;
use tokio::net::TcpListener;

#[derive(Debug)]
pub struct TestApp {
    pub address: String,
}

async fn spawn_app() -> TestApp {
    let router = create_router(AppState::from_config(AppConfig::default()));

    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind port");
    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    TestApp { address }
}

async fn login(app: &TestApp, client: &reqwest::Client) -> String {
    let response = client
        .post(format!("{}/api/Account/login", app.address))
        .json(&json!({ "email": DEMO_EMAIL, "password": DEMO_PASSWORD }))
        .send()
        .await
        .expect("login fail");
    assert_eq!(response.status(), StatusCode::OK);
    response.json::<TokenResponse>().await.unwrap().token
}

#[tokio::test]
async fn test_health_check() {
    let app = spawn_app().await;
    let client = reqwest::Client::new();
    let response = client
        .get(format!("{}/health", app.address))
        .send()
        .await
        .expect("req fail");
    assert!(response.status().is_success());
}

#[tokio::test]
async fn test_login_with_wrong_password_is_rejected() {
    let app = spawn_app().await;
    let client = reqwest::Client::new();

    let response = client
        .post(format!("{}/api/Account/login", app.address))
        .json(&json!({ "email": DEMO_EMAIL, "password": "nope" }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_book_lifecycle() {
    let app = spawn_app().await;
    let client = reqwest::Client::new();
    let token = login(&app, &client).await;

    // 1. Create
    let created = client
        .post(format!("{}/api/Books", app.address))
        .bearer_auth(&token)
        .json(&json!({ "title": "T", "author": "A", "pages": 123 }))
        .send()
        .await
        .unwrap();
    assert_eq!(created.status(), StatusCode::CREATED);
    let location = created
        .headers()
        .get("location")
        .and_then(|v| v.to_str().ok())
        .unwrap()
        .to_string();
    let book: Book = created.json().await.unwrap();
    assert_eq!(location, format!("/api/Books/{}", book.id));

    // 2. Read anonymously
    let fetched: Book = client
        .get(format!("{}{}", app.address, location))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(fetched, book);

    // 3. Update
    let updated = client
        .put(format!("{}{}", app.address, location))
        .bearer_auth(&token)
        .json(&json!({ "title": "T2", "author": "A2", "pages": 321 }))
        .send()
        .await
        .unwrap();
    assert_eq!(updated.status(), StatusCode::OK);
    let updated: Book = updated.json().await.unwrap();
    assert_eq!(updated.id, book.id);
    assert_eq!(updated.title, "T2");

    let reread: Book = client
        .get(format!("{}{}", app.address, location))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(reread, updated);

    // 4. Delete
    let deleted = client
        .delete(format!("{}{}", app.address, location))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(deleted.status(), StatusCode::NO_CONTENT);

    let missing = client
        .get(format!("{}{}", app.address, location))
        .send()
        .await
        .unwrap();
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_list_returns_books_in_insertion_order() {
    let app = spawn_app().await;
    let client = reqwest::Client::new();
    let token = login(&app, &client).await;

    for title in ["First", "Second"] {
        let response = client
            .post(format!("{}/api/Books", app.address))
            .bearer_auth(&token)
            .json(&json!({ "title": title, "author": "A", "pages": 10 }))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let books: Vec<Book> = client
        .get(format!("{}/api/Books", app.address))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    let titles: Vec<&str> = books.iter().map(|b| b.title.as_str()).collect();
    assert_eq!(titles, vec!["First", "Second"]);
    assert_eq!(books[0].id, 1);
    assert_eq!(books[1].id, 2);
}
