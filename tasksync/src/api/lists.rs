// This file is part of the product TaskSync.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use actix_web::{HttpResponse, web};
use serde::Serialize;

use super::envelope::{created, ok};
use crate::error::DomainError;
use crate::iam::CurrentUser;
use crate::todos::{
    CreateListRequest, ListService, ShareListRequest, UpdateListRequest, UserRef,
};

#[derive(Serialize)]
struct DeletedList {
    list_id: String,
}

#[derive(Serialize)]
struct ListShares {
    list_id: String,
    shared_with: Vec<UserRef>,
}

pub async fn list_lists(
    user: CurrentUser,
    lists: web::Data<ListService>,
) -> Result<HttpResponse, DomainError> {
    let summaries = lists.list_lists(&user.0.id).await?;
    Ok(ok("Todo Lists retrieved successfully", summaries))
}

pub async fn create_list(
    user: CurrentUser,
    lists: web::Data<ListService>,
    body: web::Json<CreateListRequest>,
) -> Result<HttpResponse, DomainError> {
    let list = lists.create_list(&user.0.id, body.into_inner()).await?;
    Ok(created("Todo List created successfully", list))
}

pub async fn get_list(
    user: CurrentUser,
    lists: web::Data<ListService>,
    path: web::Path<String>,
) -> Result<HttpResponse, DomainError> {
    let detail = lists.get_list(&path, &user.0.id).await?;
    Ok(ok("Todo List retrieved successfully", detail))
}

pub async fn update_list(
    user: CurrentUser,
    lists: web::Data<ListService>,
    path: web::Path<String>,
    body: web::Json<UpdateListRequest>,
) -> Result<HttpResponse, DomainError> {
    let list = lists
        .update_list(&path, &user.0.id, body.into_inner())
        .await?;
    Ok(ok("Todo List updated successfully", list))
}

pub async fn delete_list(
    user: CurrentUser,
    lists: web::Data<ListService>,
    path: web::Path<String>,
) -> Result<HttpResponse, DomainError> {
    let list_id = path.into_inner();
    lists.delete_list(&list_id, &user.0.id).await?;
    Ok(ok("Todo List deleted successfully", DeletedList { list_id }))
}

pub async fn share_list(
    user: CurrentUser,
    lists: web::Data<ListService>,
    path: web::Path<String>,
    body: web::Json<ShareListRequest>,
) -> Result<HttpResponse, DomainError> {
    let list_id = path.into_inner();
    let shared_with = lists
        .share_list(&list_id, &user.0.id, &body.user_id)
        .await?;
    Ok(ok(
        "Todo List shared successfully",
        ListShares {
            list_id,
            shared_with,
        },
    ))
}

pub async fn unshare_list(
    user: CurrentUser,
    lists: web::Data<ListService>,
    path: web::Path<(String, String)>,
) -> Result<HttpResponse, DomainError> {
    let (list_id, target_id) = path.into_inner();
    let shared_with = lists
        .unshare_list(&list_id, &user.0.id, &target_id)
        .await?;
    Ok(ok(
        "Todo List share removed successfully",
        ListShares {
            list_id,
            shared_with,
        },
    ))
}
