// This file is part of the product TaskSync.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use actix_web::{HttpResponse, web};

use crate::app_state::AppState;
use crate::iam::JwtAuthMiddlewareFactory;

pub mod envelope;
mod groups;
mod items;
mod lists;
mod roles;
mod users;

pub const API_PREFIX: &str = "/api/v1";

/// Registers shared services and every `/api/v1` route.
///
/// The JWT middleware runs on the whole scope but only records the outcome;
/// handlers that need a caller take a `CurrentUser` and reject from there, so
/// the public routes share the scope without special casing.
pub fn configure(cfg: &mut web::ServiceConfig, state: &AppState) {
    cfg.app_data(state.config.clone())
        .app_data(state.identity.clone())
        .app_data(state.roles.clone())
        .app_data(state.lists.clone())
        .app_data(state.groups.clone())
        .app_data(envelope::json_config())
        .app_data(envelope::path_config())
        .service(
            web::scope(API_PREFIX)
                .wrap(JwtAuthMiddlewareFactory)
                .route("", web::get().to(index))
                .route("/", web::get().to(index))
                .route("/register", web::post().to(users::register))
                .route("/login", web::post().to(users::login))
                .route("/roles", web::get().to(roles::list_roles))
                .route("/roles/{role_id}", web::get().to(roles::get_role))
                .service(
                    web::resource("/user")
                        .route(web::get().to(users::get_profile))
                        .route(web::patch().to(users::update_profile)),
                )
                .route(
                    "/user/change-password",
                    web::patch().to(users::change_password),
                )
                .route(
                    "/user/profile-picture",
                    web::patch().to(users::update_profile_picture),
                )
                .route("/lists", web::get().to(lists::list_lists))
                .route("/list", web::post().to(lists::create_list))
                .service(
                    web::resource("/list/{list_id}")
                        .route(web::get().to(lists::get_list))
                        .route(web::patch().to(lists::update_list))
                        .route(web::delete().to(lists::delete_list)),
                )
                .route("/list/{list_id}/share", web::post().to(lists::share_list))
                .route(
                    "/list/{list_id}/share/{user_id}",
                    web::delete().to(lists::unshare_list),
                )
                .route("/list/{list_id}/todos", web::get().to(items::list_items))
                .route("/list/{list_id}/todo", web::post().to(items::create_item))
                .service(
                    web::resource("/list/{list_id}/todo/{task_id}")
                        .route(web::get().to(items::get_item))
                        .route(web::patch().to(items::update_item))
                        .route(web::delete().to(items::delete_item)),
                )
                .route("/groups", web::get().to(groups::list_groups))
                // Must precede `/groups/{group_id}`.
                .route("/groups/new", web::post().to(groups::create_group))
                .service(
                    web::resource("/groups/{group_id}")
                        .route(web::get().to(groups::get_group))
                        .route(web::patch().to(groups::update_group))
                        .route(web::delete().to(groups::delete_group)),
                )
                .route("/groups/{group_id}/invite", web::post().to(groups::invite))
                .route(
                    "/groups/{group_id}/role/mapping",
                    web::post().to(groups::create_role_mapping),
                )
                .route("/groups/{group_id}/role", web::get().to(groups::my_role)),
        );
}

async fn index() -> HttpResponse {
    envelope::ok("Public Route Access Successful", serde_json::json!({}))
}
