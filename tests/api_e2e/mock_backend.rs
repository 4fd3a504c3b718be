//! Mock TestGenie backend for E2E tests.
//!
//! Starts an in-process HTTP server with the subset of the backend routes the
//! client uses and records every request it sees.

use std::collections::HashMap;
use std::net::TcpListener;
use std::sync::{Arc, Mutex};

use actix_web::{App, HttpRequest, HttpResponse, HttpServer, delete, get, post, put, web};
use serde_json::{Value, json};

/// Password the mock accepts for any email.
pub const VALID_PASSWORD: &str = "secret";

/// Token issued on successful login.
pub const ISSUED_TOKEN: &str = "mock-access-token";

/// A request as seen by the mock.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub authorization: Option<String>,
    pub content_type: Option<String>,
    pub body: Option<Value>,
}

/// Shared state for the mock backend.
#[derive(Default)]
pub struct MockState {
    pub projects: Vec<Value>,
    pub test_cases: HashMap<i64, Vec<Value>>,
    /// Served by `GET .../elements`; `None` makes the route fail with a 500
    pub elements: Option<Vec<Value>>,
    pub ai_body: Value,
    pub requests: Vec<RecordedRequest>,
    next_id: i64,
}

impl MockState {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }
}

type SharedState = web::Data<Arc<Mutex<MockState>>>;

fn record(state: &SharedState, req: &HttpRequest) {
    record_request(state, req, None);
}

fn record_body(state: &SharedState, req: &HttpRequest, body: &Value) {
    record_request(state, req, Some(body.clone()));
}

fn record_request(state: &SharedState, req: &HttpRequest, body: Option<Value>) {
    let header = |name: &str| {
        req.headers()
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };
    state.lock().unwrap().requests.push(RecordedRequest {
        method: req.method().to_string(),
        path: req.path().to_string(),
        authorization: header("authorization"),
        content_type: header("content-type"),
        body,
    });
}

fn not_found(what: &str) -> HttpResponse {
    HttpResponse::NotFound().json(json!({ "detail": format!("{} not found", what) }))
}

#[get("/api/health")]
async fn health(state: SharedState, req: HttpRequest) -> HttpResponse {
    record(&state, &req);
    HttpResponse::Ok().json(json!({
        "status": "OK",
        "message": "TestGenie API is running",
        "timestamp": "2025-01-01T00:00:00"
    }))
}

#[post("/api/auth/login")]
async fn login(state: SharedState, req: HttpRequest, body: web::Json<Value>) -> HttpResponse {
    record_body(&state, &req, &body);
    if body["password"] != VALID_PASSWORD {
        return HttpResponse::Unauthorized().json(json!({ "detail": "Invalid email or password" }));
    }
    HttpResponse::Ok().json(json!({
        "access_token": ISSUED_TOKEN,
        "token_type": "bearer",
        "user": {
            "id": 1,
            "email": body["email"],
            "full_name": "Admin",
            "created_at": "2025-01-01T00:00:00"
        }
    }))
}

#[get("/api/projects")]
async fn list_projects(state: SharedState, req: HttpRequest) -> HttpResponse {
    record(&state, &req);
    let projects = state.lock().unwrap().projects.clone();
    HttpResponse::Ok().json(projects)
}

#[post("/api/projects")]
async fn create_project(state: SharedState, req: HttpRequest, body: web::Json<Value>) -> HttpResponse {
    record_body(&state, &req, &body);
    if body["name"] == "Duplicate" {
        return HttpResponse::BadRequest().json(json!({ "detail": "Project already exists" }));
    }
    let mut state = state.lock().unwrap();
    let id = state.next_id();
    let project = json!({
        "id": id,
        "name": body["name"],
        "description": body["description"],
        "application_name": body["application_name"],
        "version": body["version"],
        "color": body["color"],
        "status": "healthy",
        "created_at": "2025-01-01T10:00:00.123456",
        "updated_at": null,
        "last_run": null,
        "owner_id": 1
    });
    state.projects.push(project.clone());
    HttpResponse::Ok().json(project)
}

/// Steps as the backend stores them, with ids derived from the case id.
fn stored_steps(case_id: i64, body: &Value) -> Vec<Value> {
    body["steps"]
        .as_array()
        .cloned()
        .unwrap_or_default()
        .into_iter()
        .map(|mut step| {
            step["id"] = json!(case_id * 100 + step["step_number"].as_i64().unwrap_or(0));
            step["created_at"] = json!("2025-01-01T10:00:00");
            step
        })
        .collect()
}

#[put("/api/projects/{id}")]
async fn update_project(
    state: SharedState,
    req: HttpRequest,
    path: web::Path<i64>,
    body: web::Json<Value>,
) -> HttpResponse {
    record_body(&state, &req, &body);
    let id = path.into_inner();
    let mut state = state.lock().unwrap();
    let Some(project) = state.projects.iter_mut().find(|p| p["id"] == id) else {
        return not_found("Project");
    };
    for field in ["name", "description", "application_name", "version", "color"] {
        if !body[field].is_null() {
            project[field] = body[field].clone();
        }
    }
    project["updated_at"] = json!("2025-02-01T09:30:00");
    HttpResponse::Ok().json(project.clone())
}

#[get("/api/projects/{id}")]
async fn get_project(state: SharedState, req: HttpRequest, path: web::Path<i64>) -> HttpResponse {
    record(&state, &req);
    let id = path.into_inner();
    let state = state.lock().unwrap();
    match state.projects.iter().find(|p| p["id"] == id) {
        Some(project) => HttpResponse::Ok().json(project),
        None => not_found("Project"),
    }
}

#[delete("/api/projects/{id}")]
async fn delete_project(state: SharedState, req: HttpRequest, path: web::Path<i64>) -> HttpResponse {
    record(&state, &req);
    let id = path.into_inner();
    let mut state = state.lock().unwrap();
    let before = state.projects.len();
    state.projects.retain(|p| p["id"] != id);
    if state.projects.len() == before {
        return not_found("Project");
    }
    HttpResponse::Ok().json(json!({ "message": "Project deleted successfully" }))
}

#[get("/api/projects/{id}/test-cases")]
async fn list_test_cases(state: SharedState, req: HttpRequest, path: web::Path<i64>) -> HttpResponse {
    record(&state, &req);
    let cases = state
        .lock()
        .unwrap()
        .test_cases
        .get(&path.into_inner())
        .cloned()
        .unwrap_or_default();
    HttpResponse::Ok().json(cases)
}

#[post("/api/projects/{id}/test-cases")]
async fn create_test_case(
    state: SharedState,
    req: HttpRequest,
    path: web::Path<i64>,
    body: web::Json<Value>,
) -> HttpResponse {
    record_body(&state, &req, &body);
    let project_id = path.into_inner();
    let mut state = state.lock().unwrap();
    let id = state.next_id();
    let steps = stored_steps(id, &body);
    let mut case = body.into_inner();
    case["id"] = json!(id);
    case["project_id"] = json!(project_id);
    case["created_by"] = json!("admin@superwise.ai");
    case["created_at"] = json!("2025-01-01T10:00:00");
    case["steps"] = json!(steps);
    state.test_cases.entry(project_id).or_default().push(case.clone());
    HttpResponse::Ok().json(case)
}

#[get("/api/projects/{project_id}/test-cases/{id}")]
async fn get_test_case(
    state: SharedState,
    req: HttpRequest,
    path: web::Path<(i64, i64)>,
) -> HttpResponse {
    record(&state, &req);
    let (project_id, id) = path.into_inner();
    let state = state.lock().unwrap();
    match state
        .test_cases
        .get(&project_id)
        .and_then(|cases| cases.iter().find(|c| c["id"] == id))
    {
        Some(case) => HttpResponse::Ok().json(case),
        None => not_found("Test case"),
    }
}

#[put("/api/projects/{project_id}/test-cases/{id}")]
async fn update_test_case(
    state: SharedState,
    req: HttpRequest,
    path: web::Path<(i64, i64)>,
    body: web::Json<Value>,
) -> HttpResponse {
    record_body(&state, &req, &body);
    let (project_id, id) = path.into_inner();
    let mut state = state.lock().unwrap();
    let cases = state.test_cases.entry(project_id).or_default();
    let Some(case) = cases.iter_mut().find(|c| c["id"] == id) else {
        return not_found("Test case");
    };
    let steps = stored_steps(id, &body);
    let created_at = case["created_at"].clone();
    let created_by = case["created_by"].clone();
    *case = body.into_inner();
    case["id"] = json!(id);
    case["project_id"] = json!(project_id);
    case["created_by"] = created_by;
    case["created_at"] = created_at;
    case["updated_at"] = json!("2025-02-01T09:30:00");
    case["steps"] = json!(steps);
    HttpResponse::Ok().json(case.clone())
}

#[delete("/api/projects/{project_id}/test-cases/{id}")]
async fn delete_test_case(
    state: SharedState,
    req: HttpRequest,
    path: web::Path<(i64, i64)>,
) -> HttpResponse {
    record(&state, &req);
    let (project_id, id) = path.into_inner();
    let mut state = state.lock().unwrap();
    let cases = state.test_cases.entry(project_id).or_default();
    let before = cases.len();
    cases.retain(|c| c["id"] != id);
    if cases.len() == before {
        return not_found("Test case");
    }
    HttpResponse::Ok().json(json!({ "message": "Test case deleted successfully" }))
}

/// Serves the seeded elements, or fails with a non-JSON body when none are seeded.
#[get("/api/projects/{id}/elements")]
async fn list_elements(state: SharedState, req: HttpRequest) -> HttpResponse {
    record(&state, &req);
    match state.lock().unwrap().elements.clone() {
        Some(elements) => HttpResponse::Ok().json(elements),
        None => HttpResponse::InternalServerError()
            .content_type("text/html")
            .body("<html><body>upstream exploded</body></html>"),
    }
}

#[post("/api/projects/{id}/elements")]
async fn create_element(state: SharedState, req: HttpRequest) -> HttpResponse {
    record(&state, &req);
    HttpResponse::UnprocessableEntity()
        .json(json!({ "detail": [{ "loc": ["body", "type"], "msg": "invalid element type" }] }))
}

#[get("/api/projects/{id}/ai-test-cases")]
async fn ai_test_cases(state: SharedState, req: HttpRequest) -> HttpResponse {
    record(&state, &req);
    let body = state.lock().unwrap().ai_body.clone();
    HttpResponse::Ok().json(body)
}

#[get("/api/projects/{id}/ai-test-plans")]
async fn ai_test_plans(state: SharedState, req: HttpRequest) -> HttpResponse {
    record(&state, &req);
    let body = state.lock().unwrap().ai_body.clone();
    HttpResponse::Ok().json(body)
}

/// Mock backend listening on an ephemeral port.
pub struct MockBackend {
    pub base_url: String,
    pub state: Arc<Mutex<MockState>>,
}

impl MockBackend {
    /// Start the mock on an ephemeral port.
    pub async fn start() -> Self {
        let state = Arc::new(Mutex::new(MockState::default()));

        let listener = TcpListener::bind("127.0.0.1:0").expect("failed to bind");
        let port = listener.local_addr().unwrap().port();
        let base_url = format!("http://127.0.0.1:{}", port);

        let state_data = state.clone();
        let server = HttpServer::new(move || {
            App::new()
                .app_data(web::Data::new(state_data.clone()))
                .service(health)
                .service(login)
                .service(list_projects)
                .service(create_project)
                .service(get_project)
                .service(update_project)
                .service(delete_project)
                .service(list_test_cases)
                .service(create_test_case)
                .service(get_test_case)
                .service(update_test_case)
                .service(delete_test_case)
                .service(list_elements)
                .service(create_element)
                .service(ai_test_cases)
                .service(ai_test_plans)
        })
        .workers(1)
        .listen(listener)
        .expect("failed to listen")
        .disable_signals()
        .run();

        // Lives as long as the test runtime
        tokio::spawn(server);

        MockBackend { base_url, state }
    }

    pub fn set_ai_body(&self, body: Value) {
        self.state.lock().unwrap().ai_body = body;
    }

    pub fn seed_project(&self, id: i64, name: &str) {
        let mut state = self.state.lock().unwrap();
        state.next_id = state.next_id.max(id);
        state.projects.push(json!({
            "id": id,
            "name": name,
            "description": "Seeded",
            "application_name": "WebApp",
            "version": "1.0.0",
            "color": "#123456",
            "status": "healthy",
            "created_at": "2025-01-01T10:00:00",
            "owner_id": 1
        }));
    }

    pub fn seed_element(&self, id: i64, name: &str) {
        self.state
            .lock()
            .unwrap()
            .elements
            .get_or_insert_with(Vec::new)
            .push(json!({
                "id": id,
                "name": name,
                "selector": format!("#{}", name.to_lowercase()),
                "type": "css",
                "status": "active",
                "project_id": 1,
                "created_at": "2025-01-01T10:00:00",
                "created_by": "admin@superwise.ai"
            }));
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.lock().unwrap().requests.clone()
    }

    pub fn last_request(&self) -> RecordedRequest {
        self.requests().pop().expect("no request recorded")
    }

    /// JSON body of the most recent request that carried one.
    pub fn last_body(&self) -> Option<Value> {
        self.requests().into_iter().rev().find_map(|r| r.body)
    }
}
