// This file is part of the product TaskSync.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use super::types::{Claims, JwtError};
use crate::config::ValidatedConfig;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use uuid::Uuid;

/// A freshly signed token and the instant it stops being valid.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

pub struct JwtService {
    secret: String,
    issuer: String,
    audience: String,
    expiration_hours: u64,
    cookie_name: String,
    is_localhost: bool,
}

impl JwtService {
    /// Create a new JwtService from configuration
    pub fn new(config: &ValidatedConfig) -> Result<Self, JwtError> {
        let jwt_config = &config.users.jwt;
        if jwt_config.secret.is_empty() {
            return Err(JwtError::ConfigurationError(
                "JWT secret is not configured".to_string(),
            ));
        }

        Ok(JwtService {
            secret: jwt_config.secret.clone(),
            issuer: jwt_config.issuer.clone(),
            audience: jwt_config.audience.clone(),
            expiration_hours: jwt_config.expiration_hours,
            cookie_name: jwt_config.cookie_name.clone(),
            is_localhost: is_loopback_host(&config.server.host),
        })
    }

    pub fn cookie_name(&self) -> &str {
        &self.cookie_name
    }

    /// Create a JWT token whose subject is the user id
    pub fn create_token(&self, user_id: &str, name: &str) -> Result<IssuedToken, JwtError> {
        let now = Utc::now();
        let expiration = now + Duration::hours(self.expiration_hours as i64);

        let claims = Claims {
            sub: user_id.to_string(),
            name: name.to_string(),
            iat: now.timestamp(),
            exp: expiration.timestamp(),
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
            jti: Uuid::new_v4().to_string(),
        };

        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.secret.as_ref()),
        )
        .map_err(|e| JwtError::TokenCreationError(e.to_string()))?;

        Ok(IssuedToken {
            token,
            expires_at: expiration,
        })
    }

    /// Verify a JWT token and return claims. Bad signatures, other
    /// algorithms and expired tokens all fail the same way.
    pub fn verify_token(&self, token: &str) -> Result<Claims, JwtError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&self.issuer]);
        validation.set_audience(&[&self.audience]);
        validation.leeway = 0;

        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_ref()),
            &validation,
        )
        .map_err(|e| JwtError::TokenVerificationError(e.to_string()))?;

        Ok(token_data.claims)
    }

    /// Create a secure HTTP-only cookie with the JWT token
    pub fn create_auth_cookie<'a>(&self, issued: &IssuedToken) -> actix_web::cookie::Cookie<'a> {
        let expires = match actix_web::cookie::time::OffsetDateTime::from_unix_timestamp(
            issued.expires_at.timestamp(),
        ) {
            Ok(val) => val,
            Err(e) => {
                log::error!(
                    "Failed to convert expiration timestamp for auth cookie: {}",
                    e
                );
                actix_web::cookie::time::OffsetDateTime::UNIX_EPOCH
            }
        };

        actix_web::cookie::Cookie::build(self.cookie_name.clone(), issued.token.clone())
            .path("/")
            .secure(!self.is_localhost)
            .http_only(true)
            .same_site(actix_web::cookie::SameSite::Lax)
            .max_age(actix_web::cookie::time::Duration::hours(
                self.expiration_hours as i64,
            ))
            .expires(expires)
            .finish()
    }
}

fn is_loopback_host(host: &str) -> bool {
    matches!(host.trim(), "localhost" | "127.0.0.1" | "::1")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::TestConfigBuilder;

    fn service() -> JwtService {
        JwtService::new(&TestConfigBuilder::new().build()).expect("jwt service")
    }

    #[test]
    fn issued_token_verifies_with_user_id_subject() {
        let service = service();
        let issued = service.create_token("user-1", "Alice").unwrap();
        let claims = service.verify_token(&issued.token).unwrap();

        assert_eq!(claims.sub, "user-1");
        assert_eq!(claims.name, "Alice");
        assert_eq!(claims.exp, issued.expires_at.timestamp());
        assert_eq!(claims.exp - claims.iat, 7 * 24 * 3600);
    }

    #[test]
    fn token_signed_with_other_secret_is_rejected() {
        let service = service();
        let other = JwtService::new(
            &TestConfigBuilder::new()
                .with_jwt_secret(&"z".repeat(40))
                .build(),
        )
        .unwrap();
        let issued = other.create_token("user-1", "Alice").unwrap();
        assert!(service.verify_token(&issued.token).is_err());
    }

    #[test]
    fn expired_token_is_rejected() {
        let service = service();
        let now = Utc::now();
        let claims = Claims {
            sub: "user-1".to_string(),
            name: "Alice".to_string(),
            iat: (now - Duration::hours(200)).timestamp(),
            exp: (now - Duration::hours(32)).timestamp(),
            iss: service.issuer.clone(),
            aud: service.audience.clone(),
            jti: "old".to_string(),
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(service.secret.as_ref()),
        )
        .unwrap();

        assert!(matches!(
            service.verify_token(&token),
            Err(JwtError::TokenVerificationError(_))
        ));
    }

    #[test]
    fn token_with_other_algorithm_is_rejected() {
        let service = service();
        let claims = Claims {
            sub: "user-1".to_string(),
            name: "Alice".to_string(),
            iat: Utc::now().timestamp(),
            exp: (Utc::now() + Duration::hours(1)).timestamp(),
            iss: service.issuer.clone(),
            aud: service.audience.clone(),
            jti: "alg".to_string(),
        };
        let token = encode(
            &Header::new(Algorithm::HS512),
            &claims,
            &EncodingKey::from_secret(service.secret.as_ref()),
        )
        .unwrap();

        assert!(service.verify_token(&token).is_err());
    }

    #[test]
    fn auth_cookie_is_http_only() {
        let service = service();
        let issued = service.create_token("user-1", "Alice").unwrap();
        let cookie = service.create_auth_cookie(&issued);

        assert_eq!(cookie.name(), "auth_session");
        assert_eq!(cookie.value(), issued.token);
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.secure(), Some(false));
    }
}
