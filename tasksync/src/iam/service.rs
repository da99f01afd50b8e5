// This file is part of the product TaskSync.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use actix_web::web;

use super::jwt::JwtService;
use super::password::{hash_password, verify_password};
use super::types::{AuthSession, ProfileUpdate, User, UserProfile};
use crate::config::{Argon2Params, ValidatedConfig};
use crate::error::{DomainError, DomainResult};
use crate::security::{
    normalize_email, require_text, validate_and_sanitize_user_name,
    validate_email_field, validate_password_policy,
};
use crate::store::{ListRow, SqliteStore, UserRow, new_id, now_millis};

pub const DEFAULT_LIST_NAME: &str = "DEFAULT";

const INVALID_CREDENTIALS: &str = "Invalid Login Credentials";
const MAX_PICTURE_CHARS: usize = 2048;

/// Registration, login and profile management.
pub struct IdentityService {
    store: SqliteStore,
    jwt_service: JwtService,
    password_params: Argon2Params,
    dummy_stored_hash: String,
}

impl IdentityService {
    pub fn new(config: &ValidatedConfig, store: SqliteStore) -> DomainResult<Self> {
        let jwt_service = JwtService::new(config)?;
        let password_params = config.users.password;
        let dummy_stored_hash = hash_password("dummy-password", &password_params)?;
        Ok(Self {
            store,
            jwt_service,
            password_params,
            dummy_stored_hash,
        })
    }

    pub fn jwt_service(&self) -> &JwtService {
        &self.jwt_service
    }

    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> DomainResult<AuthSession> {
        if name.trim().is_empty() || email.trim().is_empty() || password.is_empty() {
            return Err(DomainError::validation("Name, email and password are required"));
        }
        let name = validate_and_sanitize_user_name(name).map_err(DomainError::Validation)?;
        validate_email_field(email).map_err(DomainError::Validation)?;
        validate_password_policy(password).map_err(DomainError::Validation)?;
        let email = normalize_email(email);

        if self.store.find_user_by_email(&email).await?.is_some() {
            return Err(DomainError::conflict("Email is already registered"));
        }

        let password_hash = self.hash(password).await?;
        let now = now_millis();
        let user = UserRow {
            id: new_id(),
            name,
            email,
            password_hash,
            profile_picture: None,
            created_at: now,
            updated_at: now,
        };
        let default_list = ListRow {
            id: new_id(),
            name: DEFAULT_LIST_NAME.to_string(),
            description: String::new(),
            color: String::new(),
            owner_id: user.id.clone(),
            group_id: None,
            created_at: now,
            updated_at: now,
        };

        // A concurrent registration can still win the unique index.
        self.store
            .register_user(&user, &default_list)
            .await
            .map_err(|err| match err {
                DomainError::Conflict(_) => DomainError::conflict("Email is already registered"),
                other => other,
            })?;
        log::info!("Registered user {} ({})", user.id, user.email);

        let issued = self.jwt_service.create_token(&user.id, &user.name)?;
        Ok(AuthSession {
            user: User::from(&user),
            issued,
        })
    }

    pub async fn login(&self, email: &str, password: &str) -> DomainResult<AuthSession> {
        if email.trim().is_empty() || password.is_empty() {
            return Err(DomainError::validation("Email and password are required"));
        }
        let email = normalize_email(email);

        let Some(user) = self.store.find_user_by_email(&email).await? else {
            // Burn the same verification cost as a real account.
            let _ = self.verify(password, &self.dummy_stored_hash).await;
            log::warn!("Login attempt for unknown email {}", email);
            return Err(DomainError::not_found("User does not exist"));
        };

        if !self.verify(password, &user.password_hash).await? {
            log::warn!("Failed login for user {}", user.id);
            return Err(DomainError::Unauthorized(INVALID_CREDENTIALS.to_string()));
        }

        let issued = self.jwt_service.create_token(&user.id, &user.name)?;
        log::info!("User {} logged in", user.id);
        Ok(AuthSession {
            user: User::from(&user),
            issued,
        })
    }

    /// Resolve a bearer token to a live user.
    pub async fn authenticate(&self, token: &str) -> DomainResult<User> {
        let claims = self.jwt_service.verify_token(token)?;
        match self.store.find_user_by_id(&claims.sub).await? {
            Some(user) => Ok(User::from(&user)),
            None => {
                log::warn!("Token subject {} no longer exists", claims.sub);
                Err(DomainError::Unauthorized("Invalid/Expired Token".to_string()))
            }
        }
    }

    pub async fn change_password(
        &self,
        user_id: &str,
        current_password: &str,
        new_password: &str,
    ) -> DomainResult<()> {
        if current_password.is_empty() || new_password.is_empty() {
            return Err(DomainError::validation(
                "Current and new password are required",
            ));
        }
        let user = self.require_user(user_id).await?;
        if !self.verify(current_password, &user.password_hash).await? {
            log::warn!("Password change rejected for user {}", user_id);
            return Err(DomainError::Unauthorized(
                "Current password is incorrect".to_string(),
            ));
        }
        validate_password_policy(new_password).map_err(DomainError::Validation)?;

        let password_hash = self.hash(new_password).await?;
        self.store
            .update_user_password(user_id, &password_hash)
            .await?;
        log::info!("Password changed for user {}", user_id);
        Ok(())
    }

    pub async fn get_profile(&self, user_id: &str) -> DomainResult<UserProfile> {
        Ok(UserProfile::from(self.require_user(user_id).await?))
    }

    pub async fn update_profile(
        &self,
        user_id: &str,
        update: ProfileUpdate,
    ) -> DomainResult<UserProfile> {
        let user = self.require_user(user_id).await?;

        let name = match update.name {
            Some(name) => validate_and_sanitize_user_name(&name).map_err(DomainError::Validation)?,
            None => user.name.clone(),
        };
        let email = match update.email {
            Some(email) => {
                validate_email_field(&email).map_err(DomainError::Validation)?;
                let email = normalize_email(&email);
                if email != user.email
                    && let Some(other) = self.store.find_user_by_email(&email).await?
                    && other.id != user.id
                {
                    return Err(DomainError::conflict("Email is already registered"));
                }
                email
            }
            None => user.email.clone(),
        };

        self.store
            .update_user_profile(user_id, &name, &email)
            .await
            .map_err(|err| match err {
                DomainError::Conflict(_) => DomainError::conflict("Email is already registered"),
                other => other,
            })?;
        self.get_profile(user_id).await
    }

    pub async fn update_profile_picture(
        &self,
        user_id: &str,
        picture: &str,
    ) -> DomainResult<UserProfile> {
        let picture = require_text("Profile picture", picture, MAX_PICTURE_CHARS)
            .map_err(DomainError::Validation)?;
        self.require_user(user_id).await?;
        self.store.update_user_picture(user_id, &picture).await?;
        self.get_profile(user_id).await
    }

    async fn require_user(&self, user_id: &str) -> DomainResult<UserRow> {
        self.store
            .find_user_by_id(user_id)
            .await?
            .ok_or_else(|| DomainError::not_found("User not found"))
    }

    async fn hash(&self, password: &str) -> DomainResult<String> {
        let password = password.to_string();
        let params = self.password_params;
        let hashed = web::block(move || hash_password(&password, &params)).await??;
        Ok(hashed)
    }

    async fn verify(&self, password: &str, stored_hash: &str) -> DomainResult<bool> {
        let password = password.to_string();
        let stored_hash = stored_hash.to_string();
        let valid = web::block(move || verify_password(&password, &stored_hash)).await??;
        Ok(valid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::TestConfigBuilder;

    async fn service() -> IdentityService {
        let store = SqliteStore::open_in_memory().await.expect("store");
        IdentityService::new(&TestConfigBuilder::new().build(), store).expect("identity service")
    }

    #[actix_web::test]
    async fn register_creates_user_default_list_and_token() {
        let service = service().await;
        let session = service
            .register("Alice", "  Alice@X.com ", "Str0ng!Pw")
            .await
            .expect("register");

        assert_eq!(session.user.email, "alice@x.com");
        let claims = service
            .jwt_service()
            .verify_token(&session.issued.token)
            .expect("token");
        assert_eq!(claims.sub, session.user.id);

        let lists = service
            .store
            .lists_owned_by(&session.user.id)
            .await
            .expect("lists");
        assert_eq!(lists.len(), 1);
        assert_eq!(lists[0].name, DEFAULT_LIST_NAME);
    }

    #[actix_web::test]
    async fn register_rejects_duplicate_email_case_insensitively() {
        let service = service().await;
        service
            .register("Alice", "alice@x.com", "Str0ng!Pw")
            .await
            .expect("register");
        let err = service
            .register("Other", "ALICE@x.com", "Str0ng!Pw")
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
    }

    #[actix_web::test]
    async fn register_enforces_password_policy() {
        let service = service().await;
        let err = service
            .register("Alice", "alice@x.com", "weakpass")
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
        assert!(service.store.find_user_by_email("alice@x.com").await.unwrap().is_none());
    }

    #[actix_web::test]
    async fn login_distinguishes_unknown_user_from_wrong_password() {
        let service = service().await;
        service
            .register("Alice", "alice@x.com", "Str0ng!Pw")
            .await
            .expect("register");

        let unknown = service.login("bob@x.com", "Str0ng!Pw").await.unwrap_err();
        assert!(matches!(unknown, DomainError::NotFound(_)));

        let wrong = service.login("alice@x.com", "Wr0ng!Pw").await.unwrap_err();
        assert_eq!(wrong, DomainError::Unauthorized(INVALID_CREDENTIALS.to_string()));

        let session = service.login("ALICE@x.com", "Str0ng!Pw").await.expect("login");
        assert_eq!(session.user.name, "Alice");
    }

    #[actix_web::test]
    async fn change_password_requires_current_password() {
        let service = service().await;
        let session = service
            .register("Alice", "alice@x.com", "Str0ng!Pw")
            .await
            .expect("register");
        let id = &session.user.id;

        let err = service
            .change_password(id, "Wr0ng!Pw", "N3w!Passw")
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Unauthorized(_)));

        let err = service
            .change_password(id, "Str0ng!Pw", "short")
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));

        service
            .change_password(id, "Str0ng!Pw", "N3w!Passw")
            .await
            .expect("change");
        assert!(service.login("alice@x.com", "Str0ng!Pw").await.is_err());
        assert!(service.login("alice@x.com", "N3w!Passw").await.is_ok());
    }

    #[actix_web::test]
    async fn update_profile_rejects_taken_email() {
        let service = service().await;
        let alice = service
            .register("Alice", "alice@x.com", "Str0ng!Pw")
            .await
            .expect("alice");
        service
            .register("Bob", "bob@x.com", "Str0ng!Pw")
            .await
            .expect("bob");

        let err = service
            .update_profile(
                &alice.user.id,
                ProfileUpdate {
                    name: None,
                    email: Some("BOB@x.com".to_string()),
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));

        let profile = service
            .update_profile(
                &alice.user.id,
                ProfileUpdate {
                    name: Some("Alice Smith".to_string()),
                    email: None,
                },
            )
            .await
            .expect("update");
        assert_eq!(profile.name, "Alice Smith");
        assert_eq!(profile.email, "alice@x.com");
    }

    #[actix_web::test]
    async fn profile_picture_must_not_be_blank() {
        let service = service().await;
        let alice = service
            .register("Alice", "alice@x.com", "Str0ng!Pw")
            .await
            .expect("alice");

        assert!(matches!(
            service.update_profile_picture(&alice.user.id, "  ").await,
            Err(DomainError::Validation(_))
        ));
        let profile = service
            .update_profile_picture(&alice.user.id, "https://cdn.x.com/a.png")
            .await
            .expect("picture");
        assert_eq!(profile.profile_picture.as_deref(), Some("https://cdn.x.com/a.png"));
    }

    #[actix_web::test]
    async fn authenticate_rejects_token_of_unknown_user() {
        let service = service().await;
        let issued = service
            .jwt_service()
            .create_token("ghost", "Ghost")
            .expect("token");
        assert!(matches!(
            service.authenticate(&issued.token).await,
            Err(DomainError::Unauthorized(_))
        ));
        assert!(matches!(
            service.authenticate("not.a.token").await,
            Err(DomainError::Unauthorized(_))
        ));
    }
}
