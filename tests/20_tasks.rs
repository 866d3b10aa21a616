mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};

async fn create_task(
    client: &reqwest::Client,
    base_url: &str,
    token: &str,
    payload: Value,
) -> Result<(StatusCode, Value)> {
    let res = client
        .post(format!("{}/tasks", base_url))
        .bearer_auth(token)
        .json(&payload)
        .send()
        .await?;
    let status = res.status();
    let body = res.json::<Value>().await?;
    Ok((status, body))
}

async fn list_tasks(client: &reqwest::Client, base_url: &str, token: &str) -> Result<Value> {
    let res = client
        .get(format!("{}/tasks", base_url))
        .bearer_auth(token)
        .send()
        .await?;
    anyhow::ensure!(res.status() == StatusCode::OK);
    Ok(res.json().await?)
}

#[tokio::test]
async fn task_lifecycle_end_to_end() -> Result<()> {
    let Some(server) = common::ensure_server().await? else {
        return Ok(());
    };
    let client = reqwest::Client::new();
    let email = common::unique_email("task-e2e");

    let signup = common::signup(&client, &server.base_url, "Ana", &email, "pw123").await?;
    let token = common::access_token(&signup);

    // Status omitted: defaults to Pending
    let (status, task) = create_task(
        &client,
        &server.base_url,
        &token,
        json!({ "title": "Buy milk" }),
    )
    .await?;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(task["status"], "Pending");
    assert_eq!(task["users"], json!([signup["user"]["id"]]));

    let tasks = list_tasks(&client, &server.base_url, &token).await?;
    let titles: Vec<&str> = tasks
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["title"].as_str().unwrap())
        .collect();
    assert!(titles.contains(&"Buy milk"));

    let res = client
        .delete(format!("{}/tasks/{}", server.base_url, task["id"]))
        .bearer_auth(&token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);

    let tasks = list_tasks(&client, &server.base_url, &token).await?;
    assert_eq!(tasks, json!([]));
    Ok(())
}

#[tokio::test]
async fn bogus_status_is_rejected_without_creating_a_row() -> Result<()> {
    let Some(server) = common::ensure_server().await? else {
        return Ok(());
    };
    let client = reqwest::Client::new();
    let email = common::unique_email("task-bogus");

    let signup = common::signup(&client, &server.base_url, "Ana", &email, "pw123").await?;
    let token = common::access_token(&signup);

    let (status, body) = create_task(
        &client,
        &server.base_url,
        &token,
        json!({ "title": "Nope", "status": "Bogus" }),
    )
    .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let message = body["error"].as_str().unwrap();
    assert!(message.contains("Bogus"));
    assert!(message.contains("Pending"));

    // No row was created
    let tasks = list_tasks(&client, &server.base_url, &token).await?;
    assert_eq!(tasks, json!([]));
    Ok(())
}

#[tokio::test]
async fn assigning_a_user_twice_keeps_one_membership_edge() -> Result<()> {
    let Some(server) = common::ensure_server().await? else {
        return Ok(());
    };
    let client = reqwest::Client::new();

    let ana = common::signup(
        &client,
        &server.base_url,
        "Ana",
        &common::unique_email("assign-a"),
        "pw123",
    )
    .await?;
    let bob = common::signup(
        &client,
        &server.base_url,
        "Bob",
        &common::unique_email("assign-b"),
        "pw123",
    )
    .await?;
    let ana_token = common::access_token(&ana);
    let bob_token = common::access_token(&bob);
    let bob_id = bob["user"]["id"].as_i64().unwrap();

    let (_, task) = create_task(
        &client,
        &server.base_url,
        &ana_token,
        json!({ "title": "Shared chores" }),
    )
    .await?;
    let task_id = task["id"].as_i64().unwrap();

    for _ in 0..2 {
        let res = client
            .post(format!("{}/tasks/{}/users", server.base_url, task_id))
            .bearer_auth(&ana_token)
            .json(&json!({ "userId": bob_id }))
            .send()
            .await?;
        assert_eq!(res.status(), StatusCode::OK);
    }

    let res = client
        .get(format!("{}/tasks/{}", server.base_url, task_id))
        .bearer_auth(&ana_token)
        .send()
        .await?;
    let task = res.json::<Value>().await?;
    let members: Vec<i64> = task["users"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_i64().unwrap())
        .collect();
    assert_eq!(members.iter().filter(|&&id| id == bob_id).count(), 1);

    // The task shows up in Bob's list, and unassigning removes it again
    let bobs = list_tasks(&client, &server.base_url, &bob_token).await?;
    assert!(bobs.as_array().unwrap().iter().any(|t| t["id"] == task_id));

    let res = client
        .delete(format!(
            "{}/tasks/{}/users/{}",
            server.base_url, task_id, bob_id
        ))
        .bearer_auth(&ana_token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);

    let bobs = list_tasks(&client, &server.base_url, &bob_token).await?;
    assert!(!bobs.as_array().unwrap().iter().any(|t| t["id"] == task_id));
    Ok(())
}

#[tokio::test]
async fn deleting_a_task_removes_it_from_every_members_list() -> Result<()> {
    let Some(server) = common::ensure_server().await? else {
        return Ok(());
    };
    let client = reqwest::Client::new();

    let ana = common::signup(
        &client,
        &server.base_url,
        "Ana",
        &common::unique_email("del-a"),
        "pw123",
    )
    .await?;
    let bob = common::signup(
        &client,
        &server.base_url,
        "Bob",
        &common::unique_email("del-b"),
        "pw123",
    )
    .await?;
    let ana_token = common::access_token(&ana);
    let bob_token = common::access_token(&bob);

    let (_, task) = create_task(
        &client,
        &server.base_url,
        &ana_token,
        json!({ "title": "Doomed" }),
    )
    .await?;
    let task_id = task["id"].as_i64().unwrap();

    client
        .post(format!("{}/tasks/{}/users", server.base_url, task_id))
        .bearer_auth(&ana_token)
        .json(&json!({ "userId": bob["user"]["id"] }))
        .send()
        .await?;

    let res = client
        .delete(format!("{}/tasks/{}", server.base_url, task_id))
        .bearer_auth(&ana_token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);

    for token in [&ana_token, &bob_token] {
        let tasks = list_tasks(&client, &server.base_url, token).await?;
        assert!(!tasks.as_array().unwrap().iter().any(|t| t["id"] == task_id));
    }

    // And the row itself is gone
    let res = client
        .get(format!("{}/tasks/{}", server.base_url, task_id))
        .bearer_auth(&ana_token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn partial_update_touches_only_supplied_fields() -> Result<()> {
    let Some(server) = common::ensure_server().await? else {
        return Ok(());
    };
    let client = reqwest::Client::new();
    let email = common::unique_email("task-patch");

    let signup = common::signup(&client, &server.base_url, "Ana", &email, "pw123").await?;
    let token = common::access_token(&signup);

    let (_, task) = create_task(
        &client,
        &server.base_url,
        &token,
        json!({
            "title": "Original",
            "description": "keep me",
            "category": "Home",
            "dateDue": "2025-06-01T12:00:00Z"
        }),
    )
    .await?;

    let res = client
        .put(format!("{}/tasks/{}", server.base_url, task["id"]))
        .bearer_auth(&token)
        .json(&json!({ "status": "Completed" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let updated = res.json::<Value>().await?;

    assert_eq!(updated["status"], "Completed");
    assert_eq!(updated["title"], "Original");
    assert_eq!(updated["description"], "keep me");
    assert_eq!(updated["category"], "Home");
    assert_eq!(updated["dateDue"], task["dateDue"]);
    Ok(())
}

#[tokio::test]
async fn update_with_invalid_enum_leaves_the_task_unchanged() -> Result<()> {
    let Some(server) = common::ensure_server().await? else {
        return Ok(());
    };
    let client = reqwest::Client::new();
    let email = common::unique_email("task-badenum");

    let signup = common::signup(&client, &server.base_url, "Ana", &email, "pw123").await?;
    let token = common::access_token(&signup);

    let (_, task) = create_task(
        &client,
        &server.base_url,
        &token,
        json!({ "title": "Stable" }),
    )
    .await?;

    let res = client
        .put(format!("{}/tasks/{}", server.base_url, task["id"]))
        .bearer_auth(&token)
        .json(&json!({ "title": "Changed", "category": "Chores" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = client
        .get(format!("{}/tasks/{}", server.base_url, task["id"]))
        .bearer_auth(&token)
        .send()
        .await?;
    let fetched = res.json::<Value>().await?;
    assert_eq!(fetched["title"], "Stable");
    Ok(())
}

#[tokio::test]
async fn status_filter_validates_and_matches_exactly() -> Result<()> {
    let Some(server) = common::ensure_server().await? else {
        return Ok(());
    };
    let client = reqwest::Client::new();
    let email = common::unique_email("task-filter");

    let signup = common::signup(&client, &server.base_url, "Ana", &email, "pw123").await?;
    let token = common::access_token(&signup);

    let (_, task) = create_task(
        &client,
        &server.base_url,
        &token,
        json!({ "title": "Filtered", "status": "In Progress" }),
    )
    .await?;

    let res = client
        .get(format!("{}/tasks/status", server.base_url))
        .query(&[("status", "In Progress")])
        .bearer_auth(&token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let matches = res.json::<Value>().await?;
    assert!(matches
        .as_array()
        .unwrap()
        .iter()
        .any(|t| t["id"] == task["id"]));

    let res = client
        .get(format!("{}/tasks/status", server.base_url))
        .query(&[("status", "Bogus")])
        .bearer_auth(&token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn date_filters_match_on_the_calendar_day() -> Result<()> {
    let Some(server) = common::ensure_server().await? else {
        return Ok(());
    };
    let client = reqwest::Client::new();
    let email = common::unique_email("task-date");

    let signup = common::signup(&client, &server.base_url, "Ana", &email, "pw123").await?;
    let token = common::access_token(&signup);

    let (_, task) = create_task(
        &client,
        &server.base_url,
        &token,
        json!({ "title": "Dated", "dateAssigned": "2031-03-09T15:30:00Z" }),
    )
    .await?;

    let res = client
        .get(format!("{}/tasks/dateAssigned", server.base_url))
        .query(&[("dateAssigned", "2031-03-09")])
        .bearer_auth(&token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let matches = res.json::<Value>().await?;
    assert!(matches
        .as_array()
        .unwrap()
        .iter()
        .any(|t| t["id"] == task["id"]));

    let res = client
        .get(format!("{}/tasks/dateAssigned", server.base_url))
        .query(&[("dateAssigned", "whenever")])
        .bearer_auth(&token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    Ok(())
}
