use std::{
    sync::Arc,
    time::Duration,
};

use axum::{
    extract::State,
    http::{
        header,
        HeaderMap,
        Method,
        StatusCode,
        Uri,
    },
    response::{
        Html,
        IntoResponse,
        Response,
    },
    routing::{
        get,
        post,
    },
    Json,
    Router,
};
use serde_json::{
    json,
    Value,
};
use teacher_portal::{
    core::{
        http::base_url,
        DeleteStudent,
        NewStudent,
        PortalError,
        UpdateMarks,
    },
    portal::{
        ActionDispatcher,
        ActionOutcome,
        PortalClient,
    },
};
use tokio::{
    net::TcpListener,
    sync::{
        oneshot,
        Mutex,
    },
};

#[derive(Debug, Clone)]
struct Recorded {
    method: Method,
    path: String,
    headers: HeaderMap,
    json: Value,
    form: String,
}

impl Recorded {
    fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|value| value.to_str().ok())
    }
}

/// What the JSON endpoints answer with.
#[derive(Debug, Clone)]
enum ApiMode {
    Json(Value),
    Html(&'static str),
}

#[derive(Clone)]
struct StubState {
    api: ApiMode,
    calls: Arc<Mutex<Vec<Recorded>>>,
}

struct PortalStub {
    address: String,
    calls: Arc<Mutex<Vec<Recorded>>>,
    shutdown: Option<oneshot::Sender<()>>,
}

impl PortalStub {
    async fn calls(&self) -> Vec<Recorded> {
        self.calls.lock().await.clone()
    }

    async fn stop(mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
    }
}

async fn spawn_stub(api: ApiMode) -> PortalStub {
    let calls = Arc::new(Mutex::new(Vec::new()));
    let state = StubState { api, calls: calls.clone() };
    let app = Router::new()
        .route("/api/update-marks/", post(api_call))
        .route("/api/delete-student/", post(api_call))
        .route("/api/add-student/", post(api_call))
        .route("/login/", get(login_page).post(login_submit))
        .route("/logout/", get(logout))
        .route("/", get(home))
        .with_state(state);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

    tokio::spawn(async move {
        let server = axum::serve(listener, app).with_graceful_shutdown(async {
            let _ = shutdown_rx.await;
        });
        let _ = server.await;
    });

    PortalStub { address: format!("http://{addr}/"), calls, shutdown: Some(shutdown_tx) }
}

async fn record(
    state: &StubState,
    method: Method,
    uri: &Uri,
    headers: HeaderMap,
    json: Value,
    form: String,
) {
    let mut guard = state.calls.lock().await;
    guard.push(Recorded { method, path: uri.path().to_string(), headers, json, form });
}

async fn api_call(
    State(state): State<StubState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    record(&state, method, &uri, headers, body, String::new()).await;
    match state.api {
        ApiMode::Json(reply) => Json(reply).into_response(),
        ApiMode::Html(page) => Html(page).into_response(),
    }
}

async fn login_page(
    State(state): State<StubState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
) -> Response {
    record(&state, method, &uri, headers, Value::Null, String::new()).await;
    ([(header::SET_COOKIE, "csrftoken=tok%3Dabc; Path=/")], Html("<form></form>")).into_response()
}

async fn login_submit(
    State(state): State<StubState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    form: String,
) -> Response {
    let accepted = form.contains("password=secret");
    record(&state, method, &uri, headers, Value::Null, form).await;
    if accepted {
        (
            StatusCode::FOUND,
            [(header::LOCATION, "/"), (header::SET_COOKIE, "sessionid=s1; Path=/")],
        )
            .into_response()
    } else {
        Html("<form>Please enter a correct username</form>").into_response()
    }
}

async fn logout(
    State(state): State<StubState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
) -> Response {
    record(&state, method, &uri, headers, Value::Null, String::new()).await;
    Html("<p>Signed out</p>").into_response()
}

const HOME: &str = r#"<table><tbody>
<tr data-student-id="1">
  <td>Yaman Bisen</td><td>Physics</td>
  <td><span class="marks-display">88</span></td>
  <td><button class="delete-student-btn" data-student-id="1"
      data-student-name="Yaman Bisen" data-subject="Physics"></button></td>
</tr>
</tbody></table>"#;

async fn home(headers: HeaderMap) -> Response {
    let signed_in = headers
        .get(header::COOKIE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|cookies| cookies.contains("sessionid=s1"));

    if signed_in {
        Html(HOME).into_response()
    } else {
        (StatusCode::FOUND, [(header::LOCATION, "/login/?next=/")]).into_response()
    }
}

fn dispatcher(address: &str, token: Option<&str>) -> ActionDispatcher {
    ActionDispatcher::new(
        reqwest::Client::new(),
        base_url(address).unwrap(),
        token.map(str::to_string),
    )
}

#[tokio::test]
async fn update_marks_posts_json_with_csrf_header() {
    let stub = spawn_stub(ApiMode::Json(
        json!({"success": true, "message": "Marks updated successfully"}),
    ))
    .await;

    let outcome = dispatcher(&stub.address, Some("tok123"))
        .update_marks(&UpdateMarks { student_id: "4".to_string(), marks: 90 })
        .await;

    match outcome {
        ActionOutcome::Succeeded(message) => assert_eq!(message, "Marks updated successfully"),
        other => panic!("unexpected outcome {other:?}"),
    }

    let calls = stub.calls().await;
    assert_eq!(calls.len(), 1);
    let request = &calls[0];
    assert_eq!(request.method, Method::POST);
    assert_eq!(request.path, "/api/update-marks/");
    assert_eq!(request.header("content-type"), Some("application/json"));
    assert_eq!(request.header("x-csrftoken"), Some("tok123"));
    assert_eq!(request.json, json!({"student_id": "4", "marks": 90}));
    stub.stop().await;
}

#[tokio::test]
async fn missing_token_sends_no_csrf_header() {
    let stub = spawn_stub(ApiMode::Json(json!({"success": true}))).await;

    let outcome = dispatcher(&stub.address, None)
        .delete_student(&DeleteStudent { student_id: "2".to_string() })
        .await;
    assert!(outcome.is_success());

    let calls = stub.calls().await;
    assert_eq!(calls[0].path, "/api/delete-student/");
    assert_eq!(calls[0].header("x-csrftoken"), None);
    assert_eq!(calls[0].json, json!({"student_id": "2"}));
    stub.stop().await;
}

#[tokio::test]
async fn server_rejection_carries_its_error_text() {
    let stub =
        spawn_stub(ApiMode::Json(json!({"success": false, "error": "Student not found"}))).await;

    let outcome = dispatcher(&stub.address, Some("tok"))
        .add_student(&NewStudent {
            name: "Asha".to_string(),
            subject: "Physics".to_string(),
            marks: 77,
        })
        .await;

    match outcome {
        ActionOutcome::Rejected(error) => assert_eq!(error, "Student not found"),
        other => panic!("unexpected outcome {other:?}"),
    }

    let calls = stub.calls().await;
    assert_eq!(calls[0].path, "/api/add-student/");
    assert_eq!(calls[0].json, json!({"name": "Asha", "subject": "Physics", "marks": 77}));
    stub.stop().await;
}

#[tokio::test]
async fn non_json_reply_is_a_transport_failure() {
    let stub = spawn_stub(ApiMode::Html("<h1>Server Error</h1>")).await;

    let outcome = dispatcher(&stub.address, Some("tok"))
        .update_marks(&UpdateMarks { student_id: "1".to_string(), marks: 50 })
        .await;

    match outcome {
        ActionOutcome::Failed(error) => assert!(error.is_transport()),
        other => panic!("unexpected outcome {other:?}"),
    }
    stub.stop().await;
}

#[tokio::test]
async fn login_reads_roster_and_csrf_cookie() {
    let stub = spawn_stub(ApiMode::Json(json!({"success": true}))).await;
    let client = PortalClient::new(&stub.address, Duration::from_secs(5)).unwrap();

    let roster = client.login("teacher1", "secret").await.unwrap();
    assert_eq!(roster.students.len(), 1);
    assert_eq!(roster.students[0].name, "Yaman Bisen");
    assert_eq!(roster.students[0].marks, 88);
    assert_eq!(roster.csrf_token.as_deref(), Some("tok=abc"));

    let calls = stub.calls().await;
    assert_eq!(calls[0].method, Method::GET);
    assert_eq!(calls[0].path, "/login/");
    let form = &calls[1];
    assert_eq!(form.method, Method::POST);
    assert_eq!(form.header("content-type"), Some("application/x-www-form-urlencoded"));
    assert!(form.form.contains("username=teacher1"));
    assert!(form.form.contains("csrfmiddlewaretoken=tok%3Dabc"));
    stub.stop().await;
}

#[tokio::test]
async fn wrong_password_is_reported() {
    let stub = spawn_stub(ApiMode::Json(json!({"success": true}))).await;
    let client = PortalClient::new(&stub.address, Duration::from_secs(5)).unwrap();

    match client.login("teacher1", "nope").await {
        Err(PortalError::Application(message)) => assert_eq!(message, "Invalid credentials"),
        other => panic!("unexpected result {other:?}"),
    }
    stub.stop().await;
}

#[tokio::test]
async fn roster_without_session_expires() {
    let stub = spawn_stub(ApiMode::Json(json!({"success": true}))).await;
    let client = PortalClient::new(&stub.address, Duration::from_secs(5)).unwrap();

    assert!(matches!(client.load_roster().await, Err(PortalError::SessionExpired)));
    stub.stop().await;
}

#[tokio::test]
async fn logout_calls_the_logout_page() {
    let stub = spawn_stub(ApiMode::Json(json!({"success": true}))).await;
    let client = PortalClient::new(&stub.address, Duration::from_secs(5)).unwrap();

    client.logout().await.unwrap();

    let calls = stub.calls().await;
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].method, Method::GET);
    assert_eq!(calls[0].path, "/logout/");
    stub.stop().await;
}
