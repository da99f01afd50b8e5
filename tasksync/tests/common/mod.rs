// This file is part of the product TaskSync.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

#![allow(dead_code)]

use actix_http::Request;
use actix_web::body::MessageBody;
use actix_web::dev::{Service, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::http::{StatusCode, header};
use actix_web::{App, test, web};
use serde_json::{Value, json};
use tasksync::api;
use tasksync::app_state::AppState;
use tasksync::config::ValidatedConfig;
use tasksync::store::SqliteStore;
use tasksync::util::test_config;
use tasksync::util::test_fixtures::seeded_store;

pub const PASSWORD: &str = "Str0ng!Pass";

pub struct TestHarness {
    pub config: ValidatedConfig,
    pub store: SqliteStore,
    pub state: AppState,
}

/// A registered account as the API returned it.
#[derive(Debug, Clone)]
pub struct TestUser {
    pub id: String,
    pub name: String,
    pub email: String,
    pub token: String,
}

impl TestHarness {
    pub async fn new() -> Self {
        let config = test_config();
        let store = seeded_store().await;
        let state = AppState::new(config.clone(), store.clone()).expect("app state");
        Self {
            config,
            store,
            state,
        }
    }

    pub fn app_state(&self) -> AppState {
        self.state.clone()
    }
}

pub fn build_test_app(
    state: AppState,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .configure(move |cfg| api::configure(cfg, &state))
        .default_service(web::to(api::envelope::not_found))
}

/// Sends a request and decodes the envelope.
pub async fn send<S, B>(app: &S, req: Request) -> (StatusCode, Value)
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let resp = test::call_service(app, req).await;
    let status = resp.status();
    let body = test::read_body(resp).await;
    let json = serde_json::from_slice(&body).unwrap_or_else(|err| {
        panic!(
            "response body is not json ({}): {}",
            err,
            String::from_utf8_lossy(&body)
        )
    });
    (status, json)
}

pub fn bearer(req: test::TestRequest, token: &str) -> test::TestRequest {
    req.insert_header((header::AUTHORIZATION, format!("Bearer {}", token)))
}

pub async fn register<S, B>(app: &S, name: &str, email: &str) -> TestUser
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let req = test::TestRequest::post()
        .uri("/api/v1/register")
        .set_json(json!({ "name": name, "email": email, "password": PASSWORD }))
        .to_request();
    let (status, body) = send(app, req).await;
    assert_eq!(status, StatusCode::CREATED, "register failed: {}", body);
    TestUser {
        id: body["data"]["user"]["id"]
            .as_str()
            .expect("user id")
            .to_string(),
        name: name.to_string(),
        email: email.to_string(),
        token: body["data"]["token"].as_str().expect("token").to_string(),
    }
}

pub async fn get<S, B>(app: &S, uri: &str, user: &TestUser) -> (StatusCode, Value)
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let req = bearer(test::TestRequest::get().uri(uri), &user.token).to_request();
    send(app, req).await
}

pub async fn post<S, B>(app: &S, uri: &str, user: &TestUser, payload: Value) -> (StatusCode, Value)
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let req = bearer(test::TestRequest::post().uri(uri), &user.token)
        .set_json(payload)
        .to_request();
    send(app, req).await
}

pub async fn patch<S, B>(app: &S, uri: &str, user: &TestUser, payload: Value) -> (StatusCode, Value)
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let req = bearer(test::TestRequest::patch().uri(uri), &user.token)
        .set_json(payload)
        .to_request();
    send(app, req).await
}

pub async fn delete<S, B>(app: &S, uri: &str, user: &TestUser) -> (StatusCode, Value)
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let req = bearer(test::TestRequest::delete().uri(uri), &user.token).to_request();
    send(app, req).await
}

/// Creates a group owned by `owner` and returns its id.
pub async fn create_group<S, B>(app: &S, owner: &TestUser, name: &str) -> String
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let (status, body) = post(app, "/api/v1/groups/new", owner, json!({ "name": name })).await;
    assert_eq!(status, StatusCode::CREATED, "create group failed: {}", body);
    body["data"]["id"].as_str().expect("group id").to_string()
}

/// Invites `invitee` into `group_id` with the given role name.
pub async fn invite<S, B>(app: &S, group_id: &str, inviter: &TestUser, invitee: &TestUser, role: &str)
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let (status, body) = post(
        app,
        &format!("/api/v1/groups/{}/invite", group_id),
        inviter,
        json!({ "user_id": invitee.id, "role": role }),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "invite failed: {}", body);
}

/// Creates a list and returns its id.
pub async fn create_list<S, B>(app: &S, owner: &TestUser, payload: Value) -> String
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let (status, body) = post(app, "/api/v1/list", owner, payload).await;
    assert_eq!(status, StatusCode::CREATED, "create list failed: {}", body);
    body["data"]["id"].as_str().expect("list id").to_string()
}

pub fn assert_failure(status: StatusCode, body: &Value, expected: StatusCode) {
    assert_eq!(status, expected, "unexpected response: {}", body);
    assert_eq!(body["success"], Value::Bool(false));
    assert_eq!(body["status"].as_u64(), Some(expected.as_u16() as u64));
}
