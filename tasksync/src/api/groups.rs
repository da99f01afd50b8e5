// This file is part of the product TaskSync.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use actix_web::{HttpResponse, web};
use serde::Serialize;

use super::envelope::{created, ok};
use crate::error::DomainError;
use crate::groups::{
    CreateGroupRequest, GroupService, InviteRequest, RoleMappingRequest, UpdateGroupRequest,
};
use crate::iam::CurrentUser;

#[derive(Serialize)]
struct DeletedGroup {
    group_id: String,
}

pub async fn list_groups(
    user: CurrentUser,
    groups: web::Data<GroupService>,
) -> Result<HttpResponse, DomainError> {
    let summaries = groups.list_user_groups(&user.0.id).await?;
    Ok(ok("User groups retrieved successfully", summaries))
}

pub async fn create_group(
    user: CurrentUser,
    groups: web::Data<GroupService>,
    body: web::Json<CreateGroupRequest>,
) -> Result<HttpResponse, DomainError> {
    let group = groups.create_group(&user.0.id, body.into_inner()).await?;
    Ok(created("New Group created successfully", group))
}

pub async fn get_group(
    user: CurrentUser,
    groups: web::Data<GroupService>,
    path: web::Path<String>,
) -> Result<HttpResponse, DomainError> {
    let detail = groups.get_group_detail(&path, &user.0.id).await?;
    Ok(ok("Group details retrieved successfully", detail))
}

pub async fn update_group(
    user: CurrentUser,
    groups: web::Data<GroupService>,
    path: web::Path<String>,
    body: web::Json<UpdateGroupRequest>,
) -> Result<HttpResponse, DomainError> {
    let group = groups
        .update_group(&path, &user.0.id, body.into_inner())
        .await?;
    Ok(ok("Group updated successfully", group))
}

pub async fn delete_group(
    user: CurrentUser,
    groups: web::Data<GroupService>,
    path: web::Path<String>,
) -> Result<HttpResponse, DomainError> {
    let group_id = path.into_inner();
    groups.delete_group(&group_id, &user.0.id).await?;
    Ok(ok("Group deleted successfully", DeletedGroup { group_id }))
}

pub async fn invite(
    user: CurrentUser,
    groups: web::Data<GroupService>,
    path: web::Path<String>,
    body: web::Json<InviteRequest>,
) -> Result<HttpResponse, DomainError> {
    let invitation = groups
        .invite_user(&path, &user.0.id, body.into_inner())
        .await?;
    Ok(ok("User invited to group successfully", invitation))
}

pub async fn create_role_mapping(
    user: CurrentUser,
    groups: web::Data<GroupService>,
    path: web::Path<String>,
    body: web::Json<RoleMappingRequest>,
) -> Result<HttpResponse, DomainError> {
    let mapping = groups
        .create_role_mapping(&path, &user.0.id, body.into_inner())
        .await?;
    Ok(ok("Role mapped successfully", mapping))
}

pub async fn my_role(
    user: CurrentUser,
    groups: web::Data<GroupService>,
    path: web::Path<String>,
) -> Result<HttpResponse, DomainError> {
    let mapping = groups.my_role(&path, &user.0.id).await?;
    Ok(ok("User group role mapping retrieved successfully", mapping))
}
