// This file is part of the product TaskSync.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

mod common;

use actix_web::{http::StatusCode, test};
use serde_json::{Value, json};

async fn count_items(harness: &common::TestHarness, list_id: &str) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM todos WHERE todo_list_id = ?")
        .bind(list_id)
        .fetch_one(harness.store.pool())
        .await
        .expect("count items")
}

#[actix_web::test]
async fn empty_task_is_rejected_without_a_row() {
    let harness = common::TestHarness::new().await;
    let app = test::init_service(common::build_test_app(harness.app_state())).await;
    let alice = common::register(&app, "Alice", "alice@x.com").await;
    let list_id = common::create_list(&app, &alice, json!({ "name": "Chores" })).await;

    let (status, body) = common::post(
        &app,
        &format!("/api/v1/list/{}/todo", list_id),
        &alice,
        json!({ "task": "   " }),
    )
    .await;
    common::assert_failure(status, &body, StatusCode::BAD_REQUEST);
    assert_eq!(count_items(&harness, &list_id).await, 0);
}

#[actix_web::test]
async fn item_lifecycle() {
    let harness = common::TestHarness::new().await;
    let app = test::init_service(common::build_test_app(harness.app_state())).await;
    let alice = common::register(&app, "Alice", "alice@x.com").await;
    let list_id = common::create_list(&app, &alice, json!({ "name": "Chores" })).await;

    let (status, body) = common::post(
        &app,
        &format!("/api/v1/list/{}/todo", list_id),
        &alice,
        json!({
            "task": "Take out bins",
            "priority": "high",
            "start_date": 1_700_000_000_000i64,
            "end_date": 1_700_086_400_000i64
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "Todo Created Successfully");
    assert_eq!(body["data"]["priority"], "high");
    assert_eq!(body["data"]["is_completed"], Value::Bool(false));
    let task_id = body["data"]["id"].as_str().expect("task id").to_string();
    let item_uri = format!("/api/v1/list/{}/todo/{}", list_id, task_id);

    let (status, body) = common::patch(
        &app,
        &item_uri,
        &alice,
        json!({ "is_completed": true, "name": "Take out recycling" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["is_completed"], Value::Bool(true));
    assert_eq!(body["data"]["task"], "Take out recycling");

    let (status, body) = common::get(&app, &item_uri, &alice).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["id"], Value::String(task_id.clone()));

    let (status, body) = common::get(&app, "/api/v1/lists", &alice).await;
    assert_eq!(status, StatusCode::OK);
    let chores = body["data"]
        .as_array()
        .expect("lists")
        .iter()
        .find(|list| list["id"] == Value::String(list_id.clone()))
        .cloned()
        .expect("chores list");
    assert_eq!(chores["todo_items_count"], 1);
    assert_eq!(chores["completed_count"], 1);

    let (status, _) = common::delete(&app, &item_uri, &alice).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) =
        common::get(&app, &format!("/api/v1/list/{}/todos", list_id), &alice).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], json!([]));

    let (status, body) = common::get(&app, &item_uri, &alice).await;
    common::assert_failure(status, &body, StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn item_validation_rules() {
    let harness = common::TestHarness::new().await;
    let app = test::init_service(common::build_test_app(harness.app_state())).await;
    let alice = common::register(&app, "Alice", "alice@x.com").await;
    let list_id = common::create_list(&app, &alice, json!({ "name": "Chores" })).await;
    let uri = format!("/api/v1/list/{}/todo", list_id);

    let (status, body) = common::post(
        &app,
        &uri,
        &alice,
        json!({ "task": "Paint", "priority": "someday" }),
    )
    .await;
    common::assert_failure(status, &body, StatusCode::BAD_REQUEST);

    let (status, body) = common::post(
        &app,
        &uri,
        &alice,
        json!({ "task": "Paint", "start_date": 2_000, "end_date": 1_000 }),
    )
    .await;
    common::assert_failure(status, &body, StatusCode::BAD_REQUEST);

    let (status, body) = common::post(&app, &uri, &alice, json!({ "task": "Paint" })).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["priority"], "normal");
    let item_uri = format!("{}/{}", uri, body["data"]["id"].as_str().expect("id"));

    let (status, body) = common::patch(&app, &item_uri, &alice, json!({ "task": "" })).await;
    common::assert_failure(status, &body, StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn item_dates_can_be_cleared_with_null() {
    let harness = common::TestHarness::new().await;
    let app = test::init_service(common::build_test_app(harness.app_state())).await;
    let alice = common::register(&app, "Alice", "alice@x.com").await;
    let list_id = common::create_list(&app, &alice, json!({ "name": "Chores" })).await;

    let (status, body) = common::post(
        &app,
        &format!("/api/v1/list/{}/todo", list_id),
        &alice,
        json!({ "task": "Dentist", "start_date": 1_000, "end_date": 2_000 }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let item_uri = format!(
        "/api/v1/list/{}/todo/{}",
        list_id,
        body["data"]["id"].as_str().expect("id")
    );

    // Omitted dates stay as they were.
    let (status, body) =
        common::patch(&app, &item_uri, &alice, json!({ "description": "6-monthly" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["start_date"], 1_000);
    assert_eq!(body["data"]["end_date"], 2_000);

    let (status, body) =
        common::patch(&app, &item_uri, &alice, json!({ "start_date": null })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["start_date"], Value::Null);
    assert_eq!(body["data"]["end_date"], 2_000);

    let (status, body) = common::patch(&app, &item_uri, &alice, json!({ "end_date": null })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["end_date"], Value::Null);

    let (_, body) = common::get(&app, &item_uri, &alice).await;
    assert_eq!(body["data"]["start_date"], Value::Null);
    assert_eq!(body["data"]["end_date"], Value::Null);
}

#[actix_web::test]
async fn items_are_gated_like_their_list() {
    let harness = common::TestHarness::new().await;
    let app = test::init_service(common::build_test_app(harness.app_state())).await;
    let alice = common::register(&app, "Alice", "alice@x.com").await;
    let mallory = common::register(&app, "Mallory", "mallory@x.com").await;
    let list_id = common::create_list(&app, &alice, json!({ "name": "Secret" })).await;

    let (status, body) = common::post(
        &app,
        &format!("/api/v1/list/{}/todo", list_id),
        &alice,
        json!({ "task": "Hidden" }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let task_id = body["data"]["id"].as_str().expect("id").to_string();

    let (status, body) =
        common::get(&app, &format!("/api/v1/list/{}/todos", list_id), &mallory).await;
    common::assert_failure(status, &body, StatusCode::NOT_FOUND);

    let (status, body) = common::get(
        &app,
        &format!("/api/v1/list/{}/todo/{}", list_id, task_id),
        &mallory,
    )
    .await;
    common::assert_failure(status, &body, StatusCode::NOT_FOUND);

    let (status, body) = common::post(
        &app,
        &format!("/api/v1/list/{}/todo", list_id),
        &mallory,
        json!({ "task": "Injected" }),
    )
    .await;
    common::assert_failure(status, &body, StatusCode::NOT_FOUND);
    assert_eq!(count_items(&harness, &list_id).await, 1);
}

#[actix_web::test]
async fn contributor_edits_items_but_cannot_delete_them() {
    let harness = common::TestHarness::new().await;
    let app = test::init_service(common::build_test_app(harness.app_state())).await;
    let alice = common::register(&app, "Alice", "alice@x.com").await;
    let bob = common::register(&app, "Bob", "bob@x.com").await;
    let group_id = common::create_group(&app, &alice, "Team").await;
    common::invite(&app, &group_id, &alice, &bob, "Contributor").await;
    let list_id = common::create_list(
        &app,
        &alice,
        json!({ "name": "Release", "group_id": group_id }),
    )
    .await;

    let (status, body) = common::post(
        &app,
        &format!("/api/v1/list/{}/todo", list_id),
        &bob,
        json!({ "task": "Write notes" }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let item_uri = format!(
        "/api/v1/list/{}/todo/{}",
        list_id,
        body["data"]["id"].as_str().expect("id")
    );

    let (status, _) = common::patch(&app, &item_uri, &bob, json!({ "is_completed": true })).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = common::delete(&app, &item_uri, &bob).await;
    common::assert_failure(status, &body, StatusCode::FORBIDDEN);

    let (status, _) = common::delete(&app, &item_uri, &alice).await;
    assert_eq!(status, StatusCode::OK);
}
