// This file is part of the product TaskSync.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use actix_web::{HttpResponse, web};
use serde::Serialize;

use super::envelope::{created, ok};
use crate::error::DomainError;
use crate::iam::CurrentUser;
use crate::todos::{CreateItemRequest, ListService, UpdateItemRequest};

#[derive(Serialize)]
struct DeletedItem {
    list_id: String,
    task_id: String,
}

pub async fn list_items(
    user: CurrentUser,
    lists: web::Data<ListService>,
    path: web::Path<String>,
) -> Result<HttpResponse, DomainError> {
    let items = lists.list_items(&path, &user.0.id).await?;
    Ok(ok("Todos retrieved successfully", items))
}

pub async fn create_item(
    user: CurrentUser,
    lists: web::Data<ListService>,
    path: web::Path<String>,
    body: web::Json<CreateItemRequest>,
) -> Result<HttpResponse, DomainError> {
    let item = lists
        .create_item(&path, &user.0.id, body.into_inner())
        .await?;
    Ok(created("Todo Created Successfully", item))
}

pub async fn get_item(
    user: CurrentUser,
    lists: web::Data<ListService>,
    path: web::Path<(String, String)>,
) -> Result<HttpResponse, DomainError> {
    let (list_id, task_id) = path.into_inner();
    let item = lists.get_item(&list_id, &task_id, &user.0.id).await?;
    Ok(ok("Todo retrieved successfully", item))
}

pub async fn update_item(
    user: CurrentUser,
    lists: web::Data<ListService>,
    path: web::Path<(String, String)>,
    body: web::Json<UpdateItemRequest>,
) -> Result<HttpResponse, DomainError> {
    let (list_id, task_id) = path.into_inner();
    let item = lists
        .update_item(&list_id, &task_id, &user.0.id, body.into_inner())
        .await?;
    Ok(ok("Todo updated successfully", item))
}

pub async fn delete_item(
    user: CurrentUser,
    lists: web::Data<ListService>,
    path: web::Path<(String, String)>,
) -> Result<HttpResponse, DomainError> {
    let (list_id, task_id) = path.into_inner();
    lists.delete_item(&list_id, &task_id, &user.0.id).await?;
    Ok(ok("Todo deleted successfully", DeletedItem { list_id, task_id }))
}
