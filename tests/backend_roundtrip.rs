use std::sync::{Arc, Mutex};

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;

use contact_book::api::models::{Contact, ContactDraft, Credentials};
use contact_book::api::{ApiClient, ApiError};
use contact_book::auth::{self, AuthError};
use contact_book::contacts::controller::DELETE_FAILED;
use contact_book::contacts::{ContactsController, Field, SubmitOutcome};
use contact_book::session::Session;

#[derive(Default)]
struct Store {
    users: Vec<(i64, Credentials)>,
    contacts: Vec<Contact>,
    next_id: i64,
}

#[derive(Clone, Default)]
struct Backend {
    store: Arc<Mutex<Store>>,
}

fn detail(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "detail": message }))).into_response()
}

fn owner(store: &Store, headers: &HeaderMap) -> Option<i64> {
    let token = headers
        .get("authorization")?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")?;
    let email = token.strip_prefix("token-")?;
    store
        .users
        .iter()
        .find(|(_, u)| u.email == email)
        .map(|(id, _)| *id)
}

fn collides(store: &Store, owner_id: i64, draft: &ContactDraft, skip: Option<i64>) -> bool {
    store.contacts.iter().any(|c| {
        c.owner_id == Some(owner_id)
            && c.id != skip
            && (c.email == draft.email || c.phone == draft.phone)
    })
}

async fn register(State(b): State<Backend>, Json(creds): Json<Credentials>) -> Response {
    let mut store = b.store.lock().unwrap();
    if store.users.iter().any(|(_, u)| u.email == creds.email) {
        return detail(StatusCode::BAD_REQUEST, "Email already registered");
    }
    let id = store.users.len() as i64 + 1;
    store.users.push((id, creds.clone()));
    Json(json!({ "id": id, "email": creds.email, "is_active": true })).into_response()
}

async fn login(State(b): State<Backend>, Json(creds): Json<Credentials>) -> Response {
    let store = b.store.lock().unwrap();
    if store.users.iter().any(|(_, u)| *u == creds) {
        Json(json!({ "access_token": format!("token-{}", creds.email), "token_type": "bearer" }))
            .into_response()
    } else {
        detail(StatusCode::UNAUTHORIZED, "Incorrect email or password")
    }
}

async fn list(State(b): State<Backend>, headers: HeaderMap) -> Response {
    let store = b.store.lock().unwrap();
    let Some(owner_id) = owner(&store, &headers) else {
        return detail(StatusCode::UNAUTHORIZED, "Invalid authentication credentials");
    };
    let mine: Vec<&Contact> = store
        .contacts
        .iter()
        .filter(|c| c.owner_id == Some(owner_id))
        .collect();
    Json(mine).into_response()
}

async fn create(State(b): State<Backend>, headers: HeaderMap, Json(draft): Json<ContactDraft>) -> Response {
    let mut store = b.store.lock().unwrap();
    let Some(owner_id) = owner(&store, &headers) else {
        return detail(StatusCode::UNAUTHORIZED, "Invalid authentication credentials");
    };
    if collides(&store, owner_id, &draft, None) {
        return detail(StatusCode::BAD_REQUEST, "Contact already exists");
    }
    store.next_id += 1;
    let contact = Contact {
        id: Some(store.next_id),
        first_name: draft.first_name,
        last_name: draft.last_name,
        email: draft.email,
        phone: draft.phone,
        address: draft.address,
        owner_id: Some(owner_id),
    };
    store.contacts.push(contact.clone());
    Json(contact).into_response()
}

async fn fetch(State(b): State<Backend>, headers: HeaderMap, Path(id): Path<i64>) -> Response {
    let store = b.store.lock().unwrap();
    let owner_id = owner(&store, &headers);
    match store
        .contacts
        .iter()
        .find(|c| c.id == Some(id) && c.owner_id == owner_id && owner_id.is_some())
    {
        Some(contact) => Json(contact.clone()).into_response(),
        None => detail(StatusCode::NOT_FOUND, "Contact not found"),
    }
}

async fn update(
    State(b): State<Backend>,
    headers: HeaderMap,
    Path(id): Path<i64>,
    Json(draft): Json<ContactDraft>,
) -> Response {
    let mut store = b.store.lock().unwrap();
    let Some(owner_id) = owner(&store, &headers) else {
        return detail(StatusCode::UNAUTHORIZED, "Invalid authentication credentials");
    };
    if collides(&store, owner_id, &draft, Some(id)) {
        return detail(StatusCode::BAD_REQUEST, "Contact already exists");
    }
    let Some(slot) = store
        .contacts
        .iter_mut()
        .find(|c| c.id == Some(id) && c.owner_id == Some(owner_id))
    else {
        return detail(StatusCode::NOT_FOUND, "Contact not found");
    };
    slot.first_name = draft.first_name;
    slot.last_name = draft.last_name;
    slot.email = draft.email;
    slot.phone = draft.phone;
    slot.address = draft.address;
    Json(slot.clone()).into_response()
}

async fn remove(State(b): State<Backend>, headers: HeaderMap, Path(id): Path<i64>) -> Response {
    let mut store = b.store.lock().unwrap();
    let owner_id = owner(&store, &headers);
    let before = store.contacts.len();
    store
        .contacts
        .retain(|c| !(c.id == Some(id) && c.owner_id == owner_id && owner_id.is_some()));
    if store.contacts.len() == before {
        return detail(StatusCode::NOT_FOUND, "Contact not found");
    }
    Json(json!({ "message": "Contact deleted successfully" })).into_response()
}

async fn spawn_backend() -> String {
    let app = Router::new()
        .route("/api/auth/register", post(register))
        .route("/api/auth/login", post(login))
        .route("/api/contacts", get(list).post(create))
        .route("/api/contacts/:id", get(fetch).put(update).delete(remove))
        .with_state(Backend::default());
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move { axum::serve(listener, app).await.expect("serve") });
    format!("http://{addr}")
}

fn creds(email: &str) -> Credentials {
    Credentials {
        email: email.into(),
        password: "Secr3t!pass".into(),
    }
}

async fn signed_in_client(base: &str, email: &str) -> ApiClient {
    let client = ApiClient::new(base, Session::in_memory()).expect("client");
    auth::register(&client, &creds(email)).await.expect("register");
    auth::sign_in(&client, &creds(email)).await.expect("login");
    client
}

fn fill(controller: &mut ContactsController<ApiClient>, email: &str, phone: &str) {
    let form = controller.form_mut().expect("form open");
    form.set_field(Field::FirstName, "Grace");
    form.set_field(Field::LastName, "Hopper");
    form.set_field(Field::Email, email);
    form.set_field(Field::Phone, phone);
    form.set_field(Field::Address, "7 Harbor Way");
}

#[tokio::test]
async fn create_then_delete_roundtrip() {
    let base = spawn_backend().await;
    let client = signed_in_client(&base, "grace@example.com").await;
    assert_eq!(client.session().token().as_deref(), Some("token-grace@example.com"));

    let mut controller = ContactsController::new(client.clone(), 10);
    controller.refresh().await.expect("initial list");
    assert!(controller.contacts().is_empty());

    controller.open_new();
    fill(&mut controller, "grace@example.com", "555-010-2000");
    let saved = match controller.submit().await {
        SubmitOutcome::Saved(contact) => contact,
        other => panic!("expected save, got {other:?}"),
    };
    let id = saved.id.expect("backend assigned id");
    assert!(controller.form().is_none());
    assert!(controller.contacts().iter().any(|c| c.id == Some(id)));

    let fetched = client.get_contact(id).await.expect("get one");
    assert_eq!(fetched.email, "grace@example.com");

    assert!(controller.open_edit(id));
    controller
        .form_mut()
        .expect("form open")
        .set_field(Field::Address, "8 Harbor Way");
    assert!(matches!(controller.submit().await, SubmitOutcome::Saved(_)));
    assert_eq!(controller.contacts()[0].address, "8 Harbor Way");

    controller.delete(id).await.expect("delete");
    assert!(controller.contacts().iter().all(|c| c.id != Some(id)));
    assert!(client.list_contacts().await.expect("list").is_empty());
}

#[tokio::test]
async fn backend_uniqueness_message_surfaces_when_local_list_is_stale() {
    let base = spawn_backend().await;
    let client = signed_in_client(&base, "ada@example.com").await;

    let mut controller = ContactsController::new(client.clone(), 10);
    controller.refresh().await.expect("initial list");

    // Another session adds the same contact after our list was fetched.
    let other = ApiClient::new(&base, Session::in_memory()).expect("client");
    auth::sign_in(&other, &creds("ada@example.com")).await.expect("login");
    other
        .create_contact(&ContactDraft {
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
            email: "dup@example.com".into(),
            phone: "5550003333".into(),
            address: "1 Analytical St".into(),
        })
        .await
        .expect("seed contact");

    controller.open_new();
    fill(&mut controller, "dup@example.com", "5550004444");
    let outcome = controller.submit().await;
    assert!(matches!(outcome, SubmitOutcome::Failed(ref e) if e.is_duplicate()));
    let form = controller.form().expect("form stays open");
    assert_eq!(form.duplicate_error(), Some("Contact already exists"));
    assert_eq!(form.draft().email, "dup@example.com");
}

#[tokio::test]
async fn requests_without_a_token_are_rejected() {
    let base = spawn_backend().await;
    let client = ApiClient::new(&base, Session::in_memory()).expect("client");
    match client.list_contacts().await {
        Err(ApiError::Rejected { status, .. }) => assert_eq!(status.as_u16(), 401),
        other => panic!("expected rejection, got {other:?}"),
    }
}

#[tokio::test]
async fn auth_failures_are_generic() {
    let base = spawn_backend().await;
    let client = signed_in_client(&base, "lin@example.com").await;
    client.session().sign_out().expect("sign out");

    let wrong = Credentials {
        email: "lin@example.com".into(),
        password: "Wr0ng!pass".into(),
    };
    assert!(matches!(
        auth::sign_in(&client, &wrong).await,
        Err(AuthError::InvalidCredentials)
    ));
    assert!(matches!(
        auth::sign_in(&client, &creds("nobody@example.com")).await,
        Err(AuthError::InvalidCredentials)
    ));
    assert!(!client.session().is_signed_in());

    assert!(matches!(
        auth::register(&client, &creds("lin@example.com")).await,
        Err(AuthError::RegistrationFailed)
    ));
}

#[tokio::test]
async fn failed_delete_keeps_list_and_sets_notice() {
    let base = spawn_backend().await;
    let client = signed_in_client(&base, "kay@example.com").await;
    let mut controller = ContactsController::new(client, 10);
    controller.open_new();
    fill(&mut controller, "kay@example.com", "5550005555");
    assert!(matches!(controller.submit().await, SubmitOutcome::Saved(_)));

    let err = controller.delete(9999).await.expect_err("missing contact");
    assert_eq!(err.detail(), Some("Contact not found"));
    assert_eq!(controller.contacts().len(), 1);
    assert_eq!(controller.notice(), Some(DELETE_FAILED));
}
