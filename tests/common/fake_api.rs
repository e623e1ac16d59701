//! In-process fake of the platform API.

#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde_json::{json, Value};
use tokio::net::TcpListener;

/// Shape the list endpoints answer with.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ListShape {
    #[default]
    Bare,
    Data,
    Nested,
}

/// A request captured by a mutation route.
#[derive(Debug, Clone)]
pub struct Captured {
    pub method: &'static str,
    pub path: String,
    pub headers: HeaderMap,
    pub body: Option<Value>,
}

#[derive(Debug, Default)]
pub struct FakeState {
    pub valid_tokens: HashSet<String>,
    /// Accept tokens at the probe but answer 401 on every other route.
    pub revoke_after_probe: bool,
    pub list_shape: ListShape,
    pub students: Vec<Value>,
    pub teachers: Vec<Value>,
    pub admins: Vec<Value>,
    pub courses: Vec<Value>,
    pub next_id: i64,
    /// Replaces the next mutation's normal reply.
    pub scripted_reply: Option<(StatusCode, Value)>,
    pub probe_calls: usize,
    pub list_calls: usize,
    pub captured: Vec<Captured>,
}

impl FakeState {
    pub fn with_token(token: &str) -> Self {
        Self {
            valid_tokens: [token.to_string()].into_iter().collect(),
            next_id: 100,
            ..Self::default()
        }
    }

    fn authorized(&self, headers: &HeaderMap) -> bool {
        headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .map(|token| self.valid_tokens.contains(token))
            .unwrap_or(false)
    }

    fn resource_authorized(&self, headers: &HeaderMap) -> bool {
        !self.revoke_after_probe && self.authorized(headers)
    }

    fn shaped(&self, items: Vec<Value>) -> Value {
        match self.list_shape {
            ListShape::Bare => Value::Array(items),
            ListShape::Data => json!({ "data": items }),
            ListShape::Nested => json!({ "data": { "data": items, "current_page": 1 } }),
        }
    }

    fn capture(
        &mut self,
        method: &'static str,
        path: String,
        headers: &HeaderMap,
        body: Option<Value>,
    ) {
        self.captured.push(Captured {
            method,
            path,
            headers: headers.clone(),
            body,
        });
    }
}

pub type Shared = Arc<Mutex<FakeState>>;

type Reply = (StatusCode, Json<Value>);

fn unauthenticated() -> Reply {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({ "message": "Unauthenticated." })),
    )
}

pub struct FakeApi {
    pub url: String,
    pub state: Shared,
}

impl FakeApi {
    pub async fn spawn(state: FakeState) -> Self {
        let state = Arc::new(Mutex::new(state));
        let app = router(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind fake API");
        let addr = listener.local_addr().expect("Failed to read local addr");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("Fake API crashed");
        });

        Self {
            url: format!("http://{}", addr),
            state,
        }
    }

    pub fn with<R>(&self, f: impl FnOnce(&mut FakeState) -> R) -> R {
        let mut state = self.state.lock().unwrap();
        f(&mut state)
    }
}

/// Account collections, served with identical routes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Roster {
    Students,
    Teachers,
    Admins,
}

impl Roster {
    const ALL: [Roster; 3] = [Roster::Students, Roster::Teachers, Roster::Admins];

    fn path(self) -> &'static str {
        match self {
            Self::Students => "/api/students",
            Self::Teachers => "/api/teachers",
            Self::Admins => "/api/admins",
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::Students => "Estudiante",
            Self::Teachers => "Docente",
            Self::Admins => "Administrador",
        }
    }

    /// Keys the server stores from a create body.
    fn fields(self) -> &'static [&'static str] {
        match self {
            Self::Students => &[
                "first_name",
                "last_name",
                "email",
                "dni",
                "phone_number",
                "status",
            ],
            Self::Teachers => &[
                "first_name",
                "last_name",
                "email",
                "dni",
                "phone_number",
                "specialty",
                "status",
            ],
            Self::Admins => &["name", "email", "phone_number", "status"],
        }
    }

    fn records(self, state: &mut FakeState) -> &mut Vec<Value> {
        match self {
            Self::Students => &mut state.students,
            Self::Teachers => &mut state.teachers,
            Self::Admins => &mut state.admins,
        }
    }
}

fn router(state: Shared) -> Router {
    let mut app = Router::new()
        .route("/api/user", get(whoami))
        .route("/api/pending-courses", get(list_courses))
        .route("/api/courses/{id}/approve", post(approve_course))
        .route("/api/courses/{id}/reject", post(reject_course))
        .route("/api/courses/bulk-approve", post(bulk_approve));

    for roster in Roster::ALL {
        let collection = get(move |state: State<Shared>, headers: HeaderMap| {
            list_people(roster, state, headers)
        })
        .post(
            move |state: State<Shared>, headers: HeaderMap, body: Json<Value>| {
                create_person(roster, state, headers, body)
            },
        );
        let member = put(
            move |state: State<Shared>, id: Path<i64>, headers: HeaderMap, body: Json<Value>| {
                update_person(roster, state, id, headers, body)
            },
        )
        .delete(
            move |state: State<Shared>, id: Path<i64>, headers: HeaderMap| {
                delete_person(roster, state, id, headers)
            },
        );

        app = app
            .route(roster.path(), collection)
            .route(&format!("{}/{{id}}", roster.path()), member);
    }

    app.with_state(state)
}

async fn whoami(State(state): State<Shared>, headers: HeaderMap) -> Reply {
    let mut state = state.lock().unwrap();
    state.probe_calls += 1;
    if !state.authorized(&headers) {
        return unauthenticated();
    }
    (
        StatusCode::OK,
        Json(json!({
            "data": {
                "id": 1,
                "name": "Rosa Admin",
                "role": "admin",
                "roles": ["admin", "reviewer"]
            }
        })),
    )
}

async fn list_people(roster: Roster, State(state): State<Shared>, headers: HeaderMap) -> Reply {
    let mut state = state.lock().unwrap();
    if !state.resource_authorized(&headers) {
        return unauthenticated();
    }
    state.list_calls += 1;
    let items = roster.records(&mut state).clone();
    (StatusCode::OK, Json(state.shaped(items)))
}

async fn create_person(
    roster: Roster,
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Reply {
    let mut state = state.lock().unwrap();
    if !state.resource_authorized(&headers) {
        return unauthenticated();
    }
    state.capture("POST", roster.path().to_string(), &headers, Some(body.clone()));
    if let Some((status, reply)) = state.scripted_reply.take() {
        return (status, Json(reply));
    }

    state.next_id += 1;
    let mut record = json!({ "id": state.next_id });
    for key in roster.fields() {
        record[*key] = body[*key].clone();
    }
    // The server normalizes emails, so the stored record differs from the
    // submitted one.
    record["email"] = json!(body["email"].as_str().unwrap_or_default().to_lowercase());
    roster.records(&mut state).push(record.clone());

    let message = format!("{} creado", roster.label());
    (
        StatusCode::CREATED,
        Json(json!({ "success": true, "message": message, "data": record })),
    )
}

async fn update_person(
    roster: Roster,
    State(state): State<Shared>,
    Path(id): Path<i64>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Reply {
    let mut state = state.lock().unwrap();
    if !state.resource_authorized(&headers) {
        return unauthenticated();
    }
    let path = format!("{}/{}", roster.path(), id);
    state.capture("PUT", path, &headers, Some(body.clone()));
    if let Some((status, reply)) = state.scripted_reply.take() {
        return (status, Json(reply));
    }

    let Some(record) = roster.records(&mut state).iter_mut().find(|r| r["id"] == id) else {
        let message = format!("{} no encontrado", roster.label());
        return (
            StatusCode::NOT_FOUND,
            Json(json!({ "success": false, "message": message })),
        );
    };
    for key in roster.fields().iter().filter(|key| **key != "dni") {
        record[*key] = body[*key].clone();
    }
    (StatusCode::OK, Json(json!({ "success": true })))
}

async fn delete_person(
    roster: Roster,
    State(state): State<Shared>,
    Path(id): Path<i64>,
    headers: HeaderMap,
) -> Reply {
    let mut state = state.lock().unwrap();
    if !state.resource_authorized(&headers) {
        return unauthenticated();
    }
    state.capture("DELETE", format!("{}/{}", roster.path(), id), &headers, None);
    if let Some((status, reply)) = state.scripted_reply.take() {
        return (status, Json(reply));
    }

    roster.records(&mut state).retain(|r| r["id"] != id);
    let message = format!("{} eliminado", roster.label());
    (StatusCode::OK, Json(json!({ "success": true, "message": message })))
}

async fn list_courses(State(state): State<Shared>, headers: HeaderMap) -> Reply {
    let mut state = state.lock().unwrap();
    if !state.resource_authorized(&headers) {
        return unauthenticated();
    }
    state.list_calls += 1;
    let items = state.courses.clone();
    (StatusCode::OK, Json(state.shaped(items)))
}

async fn approve_course(
    State(state): State<Shared>,
    Path(id): Path<i64>,
    headers: HeaderMap,
) -> Reply {
    let mut state = state.lock().unwrap();
    if !state.resource_authorized(&headers) {
        return unauthenticated();
    }
    state.capture("POST", format!("/api/courses/{}/approve", id), &headers, None);
    state.courses.retain(|c| c["id"] != id);
    (StatusCode::OK, Json(json!({ "success": true, "message": "Curso aprobado" })))
}

async fn reject_course(
    State(state): State<Shared>,
    Path(id): Path<i64>,
    headers: HeaderMap,
    body: String,
) -> Reply {
    let mut state = state.lock().unwrap();
    if !state.resource_authorized(&headers) {
        return unauthenticated();
    }
    let body = serde_json::from_str(&body).ok();
    state.capture("POST", format!("/api/courses/{}/reject", id), &headers, body);
    state.courses.retain(|c| c["id"] != id);
    (StatusCode::OK, Json(json!({ "success": true })))
}

async fn bulk_approve(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Reply {
    let mut state = state.lock().unwrap();
    if !state.resource_authorized(&headers) {
        return unauthenticated();
    }
    state.capture("POST", "/api/courses/bulk-approve".to_string(), &headers, Some(body.clone()));
    let ids: Vec<i64> = body["course_ids"]
        .as_array()
        .map(|ids| ids.iter().filter_map(Value::as_i64).collect())
        .unwrap_or_default();
    state.courses.retain(|c| !c["id"].as_i64().map(|id| ids.contains(&id)).unwrap_or(false));
    (
        StatusCode::OK,
        Json(json!({ "success": true, "message": format!("{} cursos aprobados", ids.len()) })),
    )
}
