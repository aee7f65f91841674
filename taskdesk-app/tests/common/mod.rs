#![allow(dead_code)]

use mockito::{Mock, ServerGuard};
use serde_json::Value;
use taskdesk_app::surface::MemorySurface;
use taskdesk_app::{ApiClient, Controller};

pub const API_PREFIX: &str = "/api/v1";

pub fn api_path(path: &str) -> String {
    format!("{}{}", API_PREFIX, path)
}

pub fn client(server: &ServerGuard) -> ApiClient {
    ApiClient::new(format!("{}{}", server.url(), API_PREFIX))
}

pub fn controller(server: &ServerGuard) -> Controller<MemorySurface> {
    Controller::new(client(server), MemorySurface::new())
}

/// A mock answering `method path` once with a JSON body.
pub async fn mock_json(
    server: &mut ServerGuard,
    method: &str,
    path: &str,
    status: usize,
    body: Value,
) -> Mock {
    server
        .mock(method, api_path(path).as_str())
        .with_status(status)
        .with_header("content-type", "application/json")
        .with_body(body.to_string())
        .expect(1)
        .create_async()
        .await
}

pub fn project_json(id: i64, name: &str) -> Value {
    serde_json::json!({
        "id": id,
        "name": name,
        "description": format!("{} description", name),
        "created_at": "2024-05-01T10:00:00",
        "tasks": [],
        "team_members": []
    })
}

pub fn task_json(id: i64, title: &str) -> Value {
    serde_json::json!({
        "id": id,
        "title": title,
        "description": "desc",
        "status": "New",
        "priority": null,
        "required_skills": ["python"],
        "project_id": 1
    })
}

pub fn member_json(id: i64, name: &str, skills: &[&str]) -> Value {
    serde_json::json!({
        "id": id,
        "name": name,
        "email": format!("{}@example.com", name.to_lowercase()),
        "role": null,
        "skills": skills,
        "assigned_tasks": []
    })
}
