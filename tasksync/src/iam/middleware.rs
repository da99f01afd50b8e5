// This file is part of the product TaskSync.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use actix_web::dev::{Payload, Service, ServiceRequest, ServiceResponse, Transform, forward_ready};
use actix_web::http::header;
use actix_web::web::Data;
use actix_web::{Error, FromRequest, HttpMessage, HttpRequest};
use futures_util::future::LocalBoxFuture;
use std::future::{Ready, ready};
use std::rc::Rc;

use super::service::IdentityService;
use super::types::User;
use crate::authz::authenticated;
use crate::error::DomainError;

/// Why a request carrying credentials was not authenticated.
#[derive(Debug, Clone)]
pub struct AuthFailure(pub DomainError);

/// Trait to add authentication methods to HttpRequest
pub trait AuthRequest {
    fn user_info(&self) -> Option<User>;
    fn auth_failure(&self) -> Option<DomainError>;

    fn is_authenticated(&self) -> bool;
}

impl AuthRequest for HttpRequest {
    fn user_info(&self) -> Option<User> {
        self.extensions().get::<User>().cloned()
    }

    fn auth_failure(&self) -> Option<DomainError> {
        self.extensions()
            .get::<AuthFailure>()
            .map(|failure| failure.0.clone())
    }

    fn is_authenticated(&self) -> bool {
        self.user_info().is_some()
    }
}

/// Authenticated caller, extracted from request extensions.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

impl FromRequest for CurrentUser {
    type Error = DomainError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let result = match authenticated(req.user_info()) {
            Ok(user) => Ok(CurrentUser(user)),
            Err(access) => Err(req
                .auth_failure()
                .or_else(|| access.require("Request").err())
                .unwrap_or_else(|| {
                    DomainError::Unauthorized("Missing authorization header".to_string())
                })),
        };
        ready(result)
    }
}

/// Pull the token from `Authorization: Bearer`, falling back to the cookie.
fn extract_token(req: &ServiceRequest, cookie_name: &str) -> Option<String> {
    if let Some(value) = req.headers().get(header::AUTHORIZATION) {
        let value = value.to_str().ok()?.trim();
        let token = value
            .strip_prefix("Bearer ")
            .or_else(|| value.strip_prefix("bearer "))?
            .trim();
        return (!token.is_empty()).then(|| token.to_string());
    }
    req.cookie(cookie_name)
        .map(|cookie| cookie.value().to_string())
        .filter(|token| !token.is_empty())
}

// JWT Authentication Middleware
pub struct JwtAuthMiddlewareFactory;

impl<S, B> Transform<S, ServiceRequest> for JwtAuthMiddlewareFactory
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = JwtAuthMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(JwtAuthMiddleware {
            service: Rc::new(service),
        }))
    }
}

pub struct JwtAuthMiddleware<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for JwtAuthMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let identity = req.app_data::<Data<IdentityService>>().cloned();
        let service = self.service.clone();

        Box::pin(async move {
            if let Some(identity) = identity {
                let cookie_name = identity.jwt_service().cookie_name().to_string();
                if let Some(token) = extract_token(&req, &cookie_name) {
                    match identity.authenticate(&token).await {
                        Ok(user) => {
                            req.extensions_mut().insert(user);
                        }
                        Err(err) => {
                            log::debug!("Rejected credentials on {}: {}", req.path(), err);
                            req.extensions_mut().insert(AuthFailure(err));
                        }
                    }
                }
            } else {
                log::error!("IdentityService missing from app data");
            }

            service.call(req).await
        })
    }
}
