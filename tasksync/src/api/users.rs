// This file is part of the product TaskSync.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::envelope::{Envelope, ok};
use crate::error::DomainError;
use crate::iam::{AuthSession, CurrentUser, IdentityService, ProfileUpdate, User};

#[derive(Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    name: String,
    #[serde(default)]
    email: String,
    #[serde(default)]
    password: String,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    email: String,
    #[serde(default)]
    password: String,
}

#[derive(Deserialize)]
pub struct ChangePasswordRequest {
    #[serde(default)]
    current_password: String,
    #[serde(default)]
    new_password: String,
}

#[derive(Deserialize)]
pub struct ProfilePictureRequest {
    #[serde(default)]
    profile_picture: String,
}

#[derive(Serialize)]
struct AuthResponse {
    token: String,
    expiry: DateTime<Utc>,
    user: User,
}

#[derive(Serialize)]
struct UserIdResponse {
    user_id: String,
}

fn session_response(
    identity: &IdentityService,
    status: StatusCode,
    message: &str,
    session: AuthSession,
) -> HttpResponse {
    let cookie = identity.jwt_service().create_auth_cookie(&session.issued);
    let body = Envelope::ok(
        status,
        message,
        AuthResponse {
            token: session.issued.token,
            expiry: session.issued.expires_at,
            user: session.user,
        },
    );
    HttpResponse::build(status).cookie(cookie).json(body)
}

pub async fn register(
    identity: web::Data<IdentityService>,
    body: web::Json<RegisterRequest>,
) -> Result<HttpResponse, DomainError> {
    let session = identity
        .register(&body.name, &body.email, &body.password)
        .await?;
    Ok(session_response(
        &identity,
        StatusCode::CREATED,
        "Registration Successful",
        session,
    ))
}

pub async fn login(
    identity: web::Data<IdentityService>,
    body: web::Json<LoginRequest>,
) -> Result<HttpResponse, DomainError> {
    let session = identity.login(&body.email, &body.password).await?;
    Ok(session_response(
        &identity,
        StatusCode::ACCEPTED,
        "Login Successful",
        session,
    ))
}

pub async fn get_profile(
    user: CurrentUser,
    identity: web::Data<IdentityService>,
) -> Result<HttpResponse, DomainError> {
    let profile = identity.get_profile(&user.0.id).await?;
    Ok(ok("User profile retrieved successfully", profile))
}

pub async fn update_profile(
    user: CurrentUser,
    identity: web::Data<IdentityService>,
    body: web::Json<ProfileUpdate>,
) -> Result<HttpResponse, DomainError> {
    let profile = identity
        .update_profile(&user.0.id, body.into_inner())
        .await?;
    Ok(ok("User profile updated successfully", profile))
}

pub async fn change_password(
    user: CurrentUser,
    identity: web::Data<IdentityService>,
    body: web::Json<ChangePasswordRequest>,
) -> Result<HttpResponse, DomainError> {
    identity
        .change_password(&user.0.id, &body.current_password, &body.new_password)
        .await?;
    Ok(ok(
        "Password updated successfully",
        UserIdResponse {
            user_id: user.0.id,
        },
    ))
}

pub async fn update_profile_picture(
    user: CurrentUser,
    identity: web::Data<IdentityService>,
    body: web::Json<ProfilePictureRequest>,
) -> Result<HttpResponse, DomainError> {
    let profile = identity
        .update_profile_picture(&user.0.id, &body.profile_picture)
        .await?;
    Ok(ok("User profile picture updated successfully", profile))
}
