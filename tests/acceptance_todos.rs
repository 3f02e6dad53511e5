use axum::body::to_bytes;
use axum::Router;
use serde_json::json;
use todo_api::http::routes::todos;
use todo_api::http::routing;
use todo_api::infrastructure::sqlite_service::SqliteTodoService;

async fn app() -> Router {
    // in-memory sqlite, one database per test
    let service = SqliteTodoService::connect("sqlite::memory:").await.unwrap();
    service.init().await.unwrap();
    routing::app(todos::router(todos::AppState { service }))
}

#[tokio::test]
async fn acceptance_create_read_update_delete() {
    let app = app().await;

    // create
    let res = request(&app, "POST", "/todos", Some(json!({ "subject": "Test", "description": "First" }))).await;
    assert_eq!(res.status(), 200);
    assert_eq!(res.headers()["content-type"], "application/json");
    let body = body_json(res).await;
    let id = body["todo"]["id"].as_i64().unwrap();
    assert!(id > 0);
    assert_eq!(body["todo"]["subject"], "Test");
    assert_eq!(body["todo"]["description"], "First");
    assert!(body["todo"]["created_at"].is_string());
    assert!(body["todo"]["updated_at"].is_string());

    // read back
    let res = request(&app, "GET", "/todos", None).await;
    assert_eq!(res.status(), 200);
    let body = body_json(res).await;
    assert_eq!(body["todos"][0]["id"].as_i64().unwrap(), id);

    // update
    let res = request(&app, "PUT", "/todos", Some(json!({ "id": id, "subject": "Test 2", "description": "Second" }))).await;
    assert_eq!(res.status(), 200);
    let body = body_json(res).await;
    assert_eq!(body["todo"]["id"].as_i64().unwrap(), id);
    assert_eq!(body["todo"]["subject"], "Test 2");

    // delete
    let res = request(&app, "DELETE", "/todos", Some(json!({ "ids": [id] }))).await;
    assert_eq!(res.status(), 200);
    assert_eq!(res.headers()["content-type"], "application/json");
    let body = body_json(res).await;
    assert_eq!(body, json!({}));

    // gone
    let res = request(&app, "GET", "/todos", None).await;
    let body = body_json(res).await;
    assert_eq!(body["todos"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn create_rejects_empty_subject_and_bad_body() {
    let app = app().await;

    let res = request(&app, "POST", "/todos", Some(json!({ "subject": "", "description": "x" }))).await;
    assert_eq!(res.status(), 400);

    // subject missing entirely defaults to empty
    let res = request(&app, "POST", "/todos", Some(json!({ "description": "x" }))).await;
    assert_eq!(res.status(), 400);

    let res = request_raw(&app, "POST", "/todos", "{not json").await;
    assert_eq!(res.status(), 400);

    // nothing was persisted
    let res = request(&app, "GET", "/todos", None).await;
    let body = body_json(res).await;
    assert_eq!(body["todos"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn read_paginates_newest_first() {
    let app = app().await;
    for i in 1..=7 {
        let res = request(&app, "POST", "/todos", Some(json!({ "subject": format!("todo {i}"), "description": "" }))).await;
        assert_eq!(res.status(), 200);
    }

    // default size is 5, newest first
    let res = request(&app, "GET", "/todos", None).await;
    assert_eq!(res.status(), 200);
    let body = body_json(res).await;
    let todos = body["todos"].as_array().unwrap();
    assert_eq!(todos.len(), 5);
    assert_eq!(todos[0]["subject"], "todo 7");
    let prev_id = todos[4]["id"].as_i64().unwrap();

    // strictly older window
    let res = request(&app, "GET", &format!("/todos?prev_id={prev_id}&size=5"), None).await;
    let body = body_json(res).await;
    let todos = body["todos"].as_array().unwrap();
    assert_eq!(todos.len(), 2);
    assert!(todos.iter().all(|t| t["id"].as_i64().unwrap() < prev_id));

    // explicit size
    let res = request(&app, "GET", "/todos?size=2", None).await;
    let body = body_json(res).await;
    assert_eq!(body["todos"].as_array().unwrap().len(), 2);

    // malformed parameters
    let res = request(&app, "GET", "/todos?size=abc", None).await;
    assert_eq!(res.status(), 400);
    let res = request(&app, "GET", "/todos?prev_id=1.5", None).await;
    assert_eq!(res.status(), 400);
}

#[tokio::test]
async fn update_validation_and_not_found() {
    let app = app().await;

    let res = request(&app, "PUT", "/todos", Some(json!({ "id": 0, "subject": "x", "description": "" }))).await;
    assert_eq!(res.status(), 400);

    let res = request(&app, "PUT", "/todos", Some(json!({ "id": 1, "subject": "", "description": "" }))).await;
    assert_eq!(res.status(), 400);

    let res = request(&app, "PUT", "/todos", Some(json!({ "id": 999999, "subject": "x", "description": "" }))).await;
    assert_eq!(res.status(), 404);
}

#[tokio::test]
async fn delete_validation_and_not_found() {
    let app = app().await;

    let res = request(&app, "DELETE", "/todos", Some(json!({ "ids": [] }))).await;
    assert_eq!(res.status(), 400);

    let res = request(&app, "DELETE", "/todos", Some(json!({ "ids": [999999] }))).await;
    assert_eq!(res.status(), 404);
}

async fn request(app: &Router, method: &str, path: &str, body: Option<serde_json::Value>) -> hyper::Response<axum::body::Body> {
    use axum::body::Body;
    use axum::http::{Method, Request};
    use tower::ServiceExt;

    let req = Request::builder().method(Method::from_bytes(method.as_bytes()).unwrap()).uri(path);
    let req = match body {
        Some(json) => req.header("content-type", "application/json").body(Body::from(json.to_string())).unwrap(),
        None => req.body(Body::empty()).unwrap(),
    };
    app.clone().oneshot(req).await.unwrap()
}

async fn request_raw(app: &Router, method: &str, path: &str, body: &str) -> hyper::Response<axum::body::Body> {
    use axum::body::Body;
    use axum::http::{Method, Request};
    use tower::ServiceExt;

    let req = Request::builder()
        .method(Method::from_bytes(method.as_bytes()).unwrap())
        .uri(path)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.clone().oneshot(req).await.unwrap()
}

async fn body_json(res: hyper::Response<axum::body::Body>) -> serde_json::Value {
    serde_json::from_slice(&to_bytes(res.into_body(), 1024 * 1024).await.unwrap()).unwrap()
}
