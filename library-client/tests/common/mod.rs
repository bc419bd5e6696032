// library-client/tests/common/mod.rs
// In-process library API for integration tests

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use axum::extract::State;
use axum::routing::{get, post, put};
use axum::Json;
use chrono::NaiveDate;
use http::{HeaderMap, StatusCode, header};
use parking_lot::Mutex;

use library_client::{AuthResponse, LoginRequest, ProfileUpdate, RegisterRequest, Role, User};
use shared::ErrorBody;

type Rejection = (StatusCode, Json<ErrorBody>);

fn reject(status: StatusCode, message: &str) -> Rejection {
    (
        status,
        Json(ErrorBody {
            message: Some(message.to_string()),
        }),
    )
}

#[derive(Debug, Default)]
struct Accounts {
    users: HashMap<String, (String, User)>,
    tokens: HashMap<String, String>,
    next_id: i64,
}

/// Handle to the running mock API
#[derive(Clone, Default)]
pub struct MockApi {
    accounts: Arc<Mutex<Accounts>>,
    issued: Arc<AtomicUsize>,
    me_calls: Arc<AtomicUsize>,
}

impl MockApi {
    /// Create an account directly on the server side
    pub fn add_user(&self, username: &str, password: &str, role: Role) -> User {
        let mut accounts = self.accounts.lock();
        accounts.next_id += 1;
        let ts = NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap();
        let user = User {
            id: accounts.next_id,
            username: username.to_string(),
            email: format!("{username}@library.test"),
            first_name: username.to_string(),
            last_name: "Tester".to_string(),
            phone_number: None,
            role,
            enabled: true,
            created_at: ts,
            updated_at: ts,
        };
        accounts
            .users
            .insert(username.to_string(), (password.to_string(), user.clone()));
        user
    }

    /// Issue a valid credential for an existing account
    pub fn issue_token(&self, username: &str) -> String {
        let n = self.issued.fetch_add(1, Ordering::SeqCst);
        let token = format!("token-{username}-{n}");
        self.accounts
            .lock()
            .tokens
            .insert(token.clone(), username.to_string());
        token
    }

    pub fn revoke_all(&self) {
        self.accounts.lock().tokens.clear();
    }

    /// Number of `GET /auth/me` requests served
    pub fn me_calls(&self) -> usize {
        self.me_calls.load(Ordering::SeqCst)
    }

    pub fn user(&self, username: &str) -> Option<User> {
        self.accounts.lock().users.get(username).map(|(_, u)| u.clone())
    }

    fn bearer_user(&self, headers: &HeaderMap) -> Option<User> {
        let token = headers
            .get(header::AUTHORIZATION)?
            .to_str()
            .ok()?
            .strip_prefix("Bearer ")?;
        let accounts = self.accounts.lock();
        let username = accounts.tokens.get(token)?;
        accounts.users.get(username).map(|(_, u)| u.clone())
    }
}

async fn login(
    State(api): State<MockApi>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, Rejection> {
    let user = {
        let accounts = api.accounts.lock();
        match accounts.users.get(&req.username) {
            Some((password, user)) if *password == req.password => user.clone(),
            _ => return Err(reject(StatusCode::UNAUTHORIZED, "Invalid username or password")),
        }
    };
    let token = api.issue_token(&user.username);
    Ok(Json(AuthResponse { user, token }))
}

async fn register(
    State(api): State<MockApi>,
    Json(req): Json<RegisterRequest>,
) -> Result<Json<AuthResponse>, Rejection> {
    if req.username.is_empty() {
        // bare rejection without a message
        return Err((StatusCode::BAD_REQUEST, Json(ErrorBody::default())));
    }
    if api.user(&req.username).is_some() {
        return Err(reject(StatusCode::BAD_REQUEST, "Username is already taken"));
    }
    let mut user = api.add_user(&req.username, &req.password, Role::Student);
    user.email = req.email;
    user.first_name = req.first_name;
    user.last_name = req.last_name;
    user.phone_number = Some(req.phone_number).filter(|p| !p.is_empty());
    api.accounts
        .lock()
        .users
        .insert(user.username.clone(), (req.password, user.clone()));
    let token = api.issue_token(&user.username);
    Ok(Json(AuthResponse { user, token }))
}

async fn me(State(api): State<MockApi>, headers: HeaderMap) -> Result<Json<User>, StatusCode> {
    api.me_calls.fetch_add(1, Ordering::SeqCst);
    api.bearer_user(&headers)
        .map(Json)
        .ok_or(StatusCode::UNAUTHORIZED)
}

async fn update_profile(
    State(api): State<MockApi>,
    headers: HeaderMap,
    Json(update): Json<ProfileUpdate>,
) -> Result<Json<User>, Rejection> {
    let Some(mut user) = api.bearer_user(&headers) else {
        return Err(reject(StatusCode::UNAUTHORIZED, "Authentication required"));
    };
    if let Some(email) = update.email {
        let taken = api
            .accounts
            .lock()
            .users
            .values()
            .any(|(_, other)| other.email == email && other.id != user.id);
        if taken {
            return Err(reject(StatusCode::BAD_REQUEST, "Email is already in use"));
        }
        user.email = email;
    }
    if let Some(first_name) = update.first_name {
        user.first_name = first_name;
    }
    if let Some(last_name) = update.last_name {
        user.last_name = last_name;
    }
    if let Some(phone_number) = update.phone_number {
        user.phone_number = Some(phone_number);
    }
    let mut accounts = api.accounts.lock();
    if let Some(entry) = accounts.users.get_mut(&user.username) {
        if let Some(password) = update.password.filter(|p| !p.is_empty()) {
            entry.0 = password;
        }
        entry.1 = user.clone();
    }
    Ok(Json(user))
}

/// Start the API on an ephemeral port; returns its base URL
pub async fn spawn_api() -> (String, MockApi) {
    let api = MockApi::default();
    api.add_user("admin", "admin123", Role::Admin);
    api.add_user("librarian", "librarian123", Role::Librarian);
    api.add_user("student", "student123", Role::Student);

    let app = axum::Router::new()
        .route("/api/auth/login", post(login))
        .route("/api/auth/register", post(register))
        .route("/api/auth/me", get(me))
        .route("/api/users/profile", put(update_profile))
        .with_state(api.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{addr}/api"), api)
}
