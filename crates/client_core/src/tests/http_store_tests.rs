use super::*;

use axum::{
    extract::{Multipart, Path, State},
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    response::{IntoResponse, Response as AxumResponse},
    routing::{get, patch, post},
    Json, Router,
};
use tokio::{net::TcpListener, sync::Mutex};

use shared::error::ErrorCode;

#[derive(Clone, Default)]
struct ServerState {
    reject_login: bool,
    fail_list_with: Option<u16>,
    login_bodies: Arc<Mutex<Vec<String>>>,
    auth_headers: Arc<Mutex<Vec<Option<String>>>>,
    uploads: Arc<Mutex<Vec<(String, String)>>>,
    updates: Arc<Mutex<Vec<(String, String)>>>,
    user_payloads: Arc<Mutex<Vec<String>>>,
}

async fn handle_login(State(state): State<ServerState>, body: String) -> AxumResponse {
    state.login_bodies.lock().await.push(body);
    if state.reject_login {
        return (
            StatusCode::UNAUTHORIZED,
            Json(ApiError::new(ErrorCode::Unauthorized, "invalid credentials")),
        )
            .into_response();
    }
    Json(serde_json::json!({ "jwt": "jwt-token-1" })).into_response()
}

async fn handle_list_bills(State(state): State<ServerState>, headers: HeaderMap) -> AxumResponse {
    state.auth_headers.lock().await.push(
        headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned),
    );
    if let Some(status) = state.fail_list_with {
        let status = StatusCode::from_u16(status).expect("status");
        return (status, "backend exploded").into_response();
    }
    Json(vec![RawBill {
        id: "47qAXb6fIm2zOKkLzMro".to_owned(),
        date: Some("2004-04-04".to_owned()),
        status: Some("pending".to_owned()),
        ..RawBill::default()
    }])
    .into_response()
}

async fn handle_create_bill(
    State(state): State<ServerState>,
    mut multipart: Multipart,
) -> AxumResponse {
    let mut file_name = String::new();
    let mut email = String::new();
    while let Some(field) = multipart.next_field().await.expect("multipart field") {
        let name = field.name().unwrap_or_default().to_owned();
        if name == "file" {
            file_name = field.file_name().unwrap_or_default().to_owned();
            let _ = field.bytes().await;
        } else if name == "email" {
            email = field.text().await.unwrap_or_default();
        }
    }
    state.uploads.lock().await.push((file_name, email));
    Json(serde_json::json!({
        "fileUrl": "https://localhost/storage/fake.jpg",
        "key": "abc123",
    }))
    .into_response()
}

async fn handle_update_bill(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    body: String,
) -> StatusCode {
    state.updates.lock().await.push((id, body));
    StatusCode::NO_CONTENT
}

async fn handle_create_user(State(state): State<ServerState>, body: String) -> StatusCode {
    state.user_payloads.lock().await.push(body);
    StatusCode::CREATED
}

async fn spawn_store_server(state: ServerState) -> Result<Url> {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let app = Router::new()
        .route("/auth/login", post(handle_login))
        .route("/bills", get(handle_list_bills).post(handle_create_bill))
        .route("/bills/:id", patch(handle_update_bill))
        .route("/users", post(handle_create_user))
        .with_state(state);
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    Ok(Url::parse(&format!("http://{addr}/"))?)
}

#[tokio::test]
async fn login_resolves_the_jwt_and_attaches_it_to_bill_calls() {
    let state = ServerState::default();
    let base_url = spawn_store_server(state.clone()).await.expect("server");
    let store = HttpRemoteStore::new(base_url);

    let token = store
        .login(r#"{"email":"employee@test.tld","password":"secret"}"#)
        .await
        .expect("login");
    assert_eq!(token.jwt, "jwt-token-1");
    assert_eq!(
        state.login_bodies.lock().await.clone(),
        vec![r#"{"email":"employee@test.tld","password":"secret"}"#.to_owned()]
    );

    let bills = store.bills().list().await.expect("list");
    assert_eq!(bills.len(), 1);
    assert_eq!(bills[0].id, "47qAXb6fIm2zOKkLzMro");
    assert_eq!(
        state.auth_headers.lock().await.clone(),
        vec![Some("Bearer jwt-token-1".to_owned())]
    );
}

#[tokio::test]
async fn bill_calls_before_login_carry_no_authorization() {
    let state = ServerState::default();
    let base_url = spawn_store_server(state.clone()).await.expect("server");
    let store = HttpRemoteStore::new(base_url);

    store.bills().list().await.expect("list");

    assert_eq!(state.auth_headers.lock().await.clone(), vec![None]);
}

#[tokio::test]
async fn upload_resolves_file_url_and_allocated_key() {
    let state = ServerState::default();
    let base_url = spawn_store_server(state.clone()).await.expect("server");
    let store = HttpRemoteStore::new(base_url);

    let created = store
        .bills()
        .create(FileUpload {
            file_name: "fake.jpg".to_owned(),
            mime_type: Some("image/jpeg".to_owned()),
            bytes: b"dummy content".to_vec(),
            email: "employee@test.tld".to_owned(),
        })
        .await
        .expect("create");

    assert_eq!(created.file_url, "https://localhost/storage/fake.jpg");
    assert_eq!(created.key, "abc123");
    assert_eq!(
        state.uploads.lock().await.clone(),
        vec![("fake.jpg".to_owned(), "employee@test.tld".to_owned())]
    );
}

#[tokio::test]
async fn update_patches_the_selected_record() {
    let state = ServerState::default();
    let base_url = spawn_store_server(state.clone()).await.expect("server");
    let store = HttpRemoteStore::new(base_url);

    store
        .bills()
        .update(BillUpdate {
            data: r#"{"foo":"bar"}"#.to_owned(),
            selector: "1234".to_owned(),
        })
        .await
        .expect("update");

    assert_eq!(
        state.updates.lock().await.clone(),
        vec![("1234".to_owned(), r#"{"foo":"bar"}"#.to_owned())]
    );
}

#[tokio::test]
async fn account_creation_posts_the_caller_serialized_payload() {
    let state = ServerState::default();
    let base_url = spawn_store_server(state.clone()).await.expect("server");
    let store = HttpRemoteStore::new(base_url);

    store
        .users()
        .create(r#"{"type":"Employee","email":"a@b.c","password":"pw"}"#)
        .await
        .expect("create user");

    assert_eq!(
        state.user_payloads.lock().await.clone(),
        vec![r#"{"type":"Employee","email":"a@b.c","password":"pw"}"#.to_owned()]
    );
}

#[tokio::test]
async fn rejected_login_surfaces_the_error_envelope() {
    let state = ServerState {
        reject_login: true,
        ..ServerState::default()
    };
    let base_url = spawn_store_server(state).await.expect("server");
    let store = HttpRemoteStore::new(base_url);

    let err = store
        .login(r#"{"email":"a@b.c","password":"nope"}"#)
        .await
        .expect_err("rejected login");

    assert!(format!("{err:#}").contains("invalid credentials"));
}

#[tokio::test]
async fn plain_failures_surface_the_status_phrase() {
    for status in [404u16, 500] {
        let state = ServerState {
            fail_list_with: Some(status),
            ..ServerState::default()
        };
        let base_url = spawn_store_server(state).await.expect("server");
        let store = HttpRemoteStore::new(base_url);

        let err = store.bills().list().await.expect_err("failing list");
        assert!(format!("{err:#}").contains(&format!("Erreur {status}")));
    }
}
