// This file is part of the product TaskSync.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use super::types::{
    CreateGroupRequest, GroupDetail, GroupListRef, GroupMember, GroupSummary, GroupView,
    Invitation, InviteRequest, MappingView, RoleMappingRequest, UpdateGroupRequest,
};
use crate::authz::{AccessGate, GroupAction, RoleName, RoleRegistry};
use crate::error::{DomainError, DomainResult};
use crate::security::{MAX_NAME_CHARS, require_text};
use crate::store::{GroupRow, MappingUpsert, SqliteStore, new_id, now_millis};
use crate::todos::UserRef;

const MAX_DESCRIPTION_CHARS: usize = 4096;

/// Group lifecycle and membership management.
#[derive(Clone)]
pub struct GroupService {
    store: SqliteStore,
    gate: AccessGate,
    registry: RoleRegistry,
}

impl GroupService {
    pub fn new(store: SqliteStore, gate: AccessGate, registry: RoleRegistry) -> Self {
        Self {
            store,
            gate,
            registry,
        }
    }

    /// Create a group; the creator receives the Owner role in the same transaction.
    pub async fn create_group(
        &self,
        owner_id: &str,
        request: CreateGroupRequest,
    ) -> DomainResult<GroupView> {
        let name = require_text("Name", &request.name, MAX_NAME_CHARS)
            .map_err(DomainError::Validation)?;
        let description = description_text(request.description)?;
        let owner_role = self.registry.seeded_role(RoleName::Owner).await?;

        let now = now_millis();
        let group = GroupRow {
            id: new_id(),
            name,
            description,
            owner_id: owner_id.to_string(),
            created_at: now,
            updated_at: now,
        };
        self.store
            .create_group_with_owner(&group, &owner_role.id)
            .await?;
        log::info!("User {} created group {}", owner_id, group.id);
        Ok(GroupView::from(group))
    }

    pub async fn list_user_groups(&self, user_id: &str) -> DomainResult<Vec<GroupSummary>> {
        let rows = self.store.groups_for_member(user_id).await?;
        Ok(rows.into_iter().map(GroupSummary::from).collect())
    }

    pub async fn get_group_detail(
        &self,
        group_id: &str,
        caller_id: &str,
    ) -> DomainResult<GroupDetail> {
        let group = self.authorize(caller_id, group_id, GroupAction::View).await?;
        let owner = self
            .store
            .find_user_by_id(&group.owner_id)
            .await?
            .map(|user| UserRef {
                id: user.id,
                name: user.name,
                email: user.email,
            });
        let members: Vec<GroupMember> = self
            .store
            .group_members(group_id)
            .await?
            .into_iter()
            .map(GroupMember::from)
            .collect();
        let todo_lists: Vec<GroupListRef> = self
            .store
            .group_lists(group_id)
            .await?
            .into_iter()
            .map(GroupListRef::from)
            .collect();

        Ok(GroupDetail {
            group: GroupView::from(group),
            owner,
            members_count: members.len(),
            todo_lists_count: todo_lists.len(),
            members,
            todo_lists,
        })
    }

    pub async fn update_group(
        &self,
        group_id: &str,
        caller_id: &str,
        request: UpdateGroupRequest,
    ) -> DomainResult<GroupView> {
        let group = self.authorize(caller_id, group_id, GroupAction::Edit).await?;
        let name = match request.name {
            Some(name) => {
                require_text("Name", &name, MAX_NAME_CHARS).map_err(DomainError::Validation)?
            }
            None => group.name,
        };
        let description = match request.description {
            Some(description) => description_text(Some(description))?,
            None => group.description,
        };

        self.store
            .update_group(group_id, &name, &description)
            .await?;
        self.store
            .find_group(group_id)
            .await?
            .map(GroupView::from)
            .ok_or_else(|| DomainError::not_found("Group not found"))
    }

    /// Tombstone the group and its mappings; its lists become standalone.
    pub async fn delete_group(&self, group_id: &str, caller_id: &str) -> DomainResult<()> {
        self.authorize(caller_id, group_id, GroupAction::Delete)
            .await?;
        self.store.delete_group(group_id).await?;
        log::info!("User {} deleted group {}", caller_id, group_id);
        Ok(())
    }

    pub async fn invite_user(
        &self,
        group_id: &str,
        inviter_id: &str,
        request: InviteRequest,
    ) -> DomainResult<Invitation> {
        self.authorize(inviter_id, group_id, GroupAction::Invite)
            .await?;

        let invitee_id = request.user_id.trim();
        if invitee_id.is_empty() {
            return Err(DomainError::validation("Invitee id is required"));
        }
        let role_name = match request.role.as_deref() {
            Some(role) if !role.trim().is_empty() => {
                role.parse::<RoleName>().map_err(DomainError::Validation)?
            }
            _ => RoleName::Viewer,
        };
        if !self.store.user_exists(invitee_id).await? {
            return Err(DomainError::validation("Invitee not found"));
        }
        if self.store.find_mapping(invitee_id, group_id).await?.is_some() {
            return Err(DomainError::conflict("User is already a member of this group"));
        }

        let role = self.registry.seeded_role(role_name).await?;
        let mapping = self
            .store
            .insert_mapping(invitee_id, group_id, &role.id)
            .await
            .map_err(|err| match err {
                DomainError::Conflict(_) => {
                    DomainError::conflict("User is already a member of this group")
                }
                other => other,
            })?;
        log::info!(
            "User {} invited {} to group {} as {}",
            inviter_id,
            invitee_id,
            group_id,
            role.name
        );

        Ok(Invitation {
            mapping_id: mapping.id,
            invitee_id: mapping.user_id,
            group_id: mapping.group_id,
            role: role.name,
        })
    }

    /// Set a member's role, creating the membership when absent.
    pub async fn create_role_mapping(
        &self,
        group_id: &str,
        caller_id: &str,
        request: RoleMappingRequest,
    ) -> DomainResult<MappingView> {
        let group = self
            .authorize(caller_id, group_id, GroupAction::ChangeRole)
            .await?;

        let user_id = request.user_id.trim();
        let role_id = request.role_id.trim();
        if user_id.is_empty() || role_id.is_empty() {
            return Err(DomainError::validation("User id and role id are required"));
        }
        let role = self
            .registry
            .find_role(role_id)
            .await?
            .ok_or_else(|| DomainError::validation("Role not found"))?;
        if !self.store.user_exists(user_id).await? {
            return Err(DomainError::validation("User not found"));
        }
        if user_id == group.owner_id && role.name != RoleName::Owner.as_str() {
            return Err(DomainError::validation(
                "The group owner's role cannot be changed",
            ));
        }

        let outcome = self.store.upsert_mapping(user_id, group_id, &role.id).await?;
        if let MappingUpsert::Replaced(_) = &outcome {
            log::info!(
                "User {} changed role of {} in group {} to {}",
                caller_id,
                user_id,
                group_id,
                role.name
            );
        } else {
            log::info!(
                "User {} added {} to group {} as {}",
                caller_id,
                user_id,
                group_id,
                role.name
            );
        }
        Ok(MappingView::new(outcome.into_row(), role.name))
    }

    /// The caller's own mapping in the group.
    pub async fn my_role(&self, group_id: &str, caller_id: &str) -> DomainResult<MappingView> {
        if self.store.find_group(group_id).await?.is_none() {
            return Err(DomainError::not_found("Group not found"));
        }
        let membership = self
            .gate
            .authority()
            .membership(caller_id, group_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Group not found"))?;
        Ok(MappingView::new(membership.mapping, membership.role_name))
    }

    async fn authorize(
        &self,
        caller_id: &str,
        group_id: &str,
        action: GroupAction,
    ) -> DomainResult<GroupRow> {
        self.gate
            .group_access(caller_id, group_id, action)
            .await?
            .require("Group")?;
        self.store
            .find_group(group_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Group not found"))
    }
}

fn description_text(value: Option<String>) -> DomainResult<String> {
    let value = value.map(|v| v.trim().to_string()).unwrap_or_default();
    if value.chars().count() > MAX_DESCRIPTION_CHARS {
        return Err(DomainError::validation(format!(
            "Description must be at most {} characters",
            MAX_DESCRIPTION_CHARS
        )));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::authz::{GroupAuthority, Permission};
    use crate::todos::{CreateListRequest, ListService};
    use crate::util::test_fixtures::{insert_test_user, seeded_store};

    struct Fixture {
        store: SqliteStore,
        authority: GroupAuthority,
        registry: RoleRegistry,
        groups: GroupService,
        lists: ListService,
        alice: String,
        bob: String,
        carol: String,
    }

    async fn fixture() -> Fixture {
        let store = seeded_store().await;
        let authority = GroupAuthority::new(store.clone());
        let gate = AccessGate::new(store.clone(), authority.clone());
        let registry = RoleRegistry::new(store.clone());
        let alice = insert_test_user(&store, "Alice", "alice@x.com").await;
        let bob = insert_test_user(&store, "Bob", "bob@x.com").await;
        let carol = insert_test_user(&store, "Carol", "carol@x.com").await;
        Fixture {
            groups: GroupService::new(store.clone(), gate.clone(), registry.clone()),
            lists: ListService::new(store.clone(), gate),
            store,
            authority,
            registry,
            alice,
            bob,
            carol,
        }
    }

    async fn team(fx: &Fixture) -> GroupView {
        fx.groups
            .create_group(
                &fx.alice,
                CreateGroupRequest {
                    name: "Team".to_string(),
                    description: None,
                },
            )
            .await
            .unwrap()
    }

    fn invite(user_id: &str, role: Option<&str>) -> InviteRequest {
        InviteRequest {
            user_id: user_id.to_string(),
            role: role.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn creator_becomes_owner_immediately() {
        let fx = fixture().await;
        let group = team(&fx).await;

        let mine = fx.groups.my_role(&group.id, &fx.alice).await.unwrap();
        assert_eq!(mine.role, "Owner");
        assert!(
            fx.authority
                .has_permission(&fx.alice, &group.id, Permission::DeleteList)
                .await
                .unwrap()
        );
    }

    #[tokio::test]
    async fn invite_defaults_to_viewer_and_rejects_duplicates() {
        let fx = fixture().await;
        let group = team(&fx).await;

        let invitation = fx
            .groups
            .invite_user(&group.id, &fx.alice, invite(&fx.bob, None))
            .await
            .unwrap();
        assert_eq!(invitation.role, "Viewer");
        assert_eq!(invitation.invitee_id, fx.bob);

        let again = fx
            .groups
            .invite_user(&group.id, &fx.alice, invite(&fx.bob, Some("contributor")))
            .await
            .unwrap_err();
        assert!(matches!(again, DomainError::Conflict(_)));

        let unknown = fx
            .groups
            .invite_user(&group.id, &fx.alice, invite("ghost", None))
            .await
            .unwrap_err();
        assert!(matches!(unknown, DomainError::Validation(_)));
    }

    #[tokio::test]
    async fn viewer_cannot_invite_and_stranger_sees_nothing() {
        let fx = fixture().await;
        let group = team(&fx).await;
        fx.groups
            .invite_user(&group.id, &fx.alice, invite(&fx.bob, None))
            .await
            .unwrap();

        assert!(matches!(
            fx.groups
                .invite_user(&group.id, &fx.bob, invite(&fx.carol, None))
                .await,
            Err(DomainError::Forbidden(_))
        ));
        assert!(matches!(
            fx.groups.get_group_detail(&group.id, &fx.carol).await,
            Err(DomainError::NotFound(_))
        ));
        assert!(matches!(
            fx.groups.my_role(&group.id, &fx.carol).await,
            Err(DomainError::NotFound(_))
        ));
        assert!(fx.groups.get_group_detail(&group.id, &fx.bob).await.is_ok());
    }

    #[tokio::test]
    async fn role_mapping_replaces_existing_role() {
        let fx = fixture().await;
        let group = team(&fx).await;
        fx.groups
            .invite_user(&group.id, &fx.alice, invite(&fx.bob, None))
            .await
            .unwrap();
        let contributor = fx.registry.seeded_role(RoleName::Contributor).await.unwrap();

        let mapping = fx
            .groups
            .create_role_mapping(
                &group.id,
                &fx.alice,
                RoleMappingRequest {
                    user_id: fx.bob.clone(),
                    role_id: contributor.id.clone(),
                },
            )
            .await
            .unwrap();
        assert_eq!(mapping.role, "Contributor");
        assert!(
            fx.authority
                .has_permission(&fx.bob, &group.id, Permission::Edit)
                .await
                .unwrap()
        );

        let (live,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM group_role_mappings WHERE user_id = ? AND group_id = ? AND deleted_at IS NULL",
        )
        .bind(&fx.bob)
        .bind(&group.id)
        .fetch_one(fx.store.pool())
        .await
        .unwrap();
        assert_eq!(live, 1);
    }

    #[tokio::test]
    async fn owner_role_cannot_be_demoted() {
        let fx = fixture().await;
        let group = team(&fx).await;
        let viewer = fx.registry.seeded_role(RoleName::Viewer).await.unwrap();

        let err = fx
            .groups
            .create_role_mapping(
                &group.id,
                &fx.alice,
                RoleMappingRequest {
                    user_id: fx.alice.clone(),
                    role_id: viewer.id,
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));

        let bad_role = fx
            .groups
            .create_role_mapping(
                &group.id,
                &fx.alice,
                RoleMappingRequest {
                    user_id: fx.bob.clone(),
                    role_id: "no-such-role".to_string(),
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(bad_role, DomainError::Validation(_)));
    }

    #[tokio::test]
    async fn contributor_edits_but_cannot_delete_group() {
        let fx = fixture().await;
        let group = team(&fx).await;
        fx.groups
            .invite_user(&group.id, &fx.alice, invite(&fx.bob, Some("Contributor")))
            .await
            .unwrap();

        let updated = fx
            .groups
            .update_group(
                &group.id,
                &fx.bob,
                UpdateGroupRequest {
                    name: None,
                    description: Some("Weekly planning".to_string()),
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.description, "Weekly planning");
        assert_eq!(updated.name, "Team");
        assert!(matches!(
            fx.groups.delete_group(&group.id, &fx.bob).await,
            Err(DomainError::Forbidden(_))
        ));
    }

    #[tokio::test]
    async fn delete_group_detaches_lists_and_drops_memberships() {
        let fx = fixture().await;
        let group = team(&fx).await;
        fx.groups
            .invite_user(&group.id, &fx.alice, invite(&fx.bob, None))
            .await
            .unwrap();
        let list = fx
            .lists
            .create_list(
                &fx.alice,
                CreateListRequest {
                    name: "Backlog".to_string(),
                    group_id: Some(group.id.clone()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        fx.groups.delete_group(&group.id, &fx.alice).await.unwrap();

        assert!(fx.groups.list_user_groups(&fx.alice).await.unwrap().is_empty());
        assert!(fx.authority.membership(&fx.bob, &group.id).await.unwrap().is_none());
        let detached = fx.lists.get_list(&list.id, &fx.alice).await.unwrap();
        assert!(detached.summary.group.is_none());
        assert!(matches!(
            fx.lists.get_list(&list.id, &fx.bob).await,
            Err(DomainError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn list_user_groups_includes_role_and_counts() {
        let fx = fixture().await;
        let group = team(&fx).await;
        fx.groups
            .invite_user(&group.id, &fx.alice, invite(&fx.bob, None))
            .await
            .unwrap();

        let mine = fx.groups.list_user_groups(&fx.alice).await.unwrap();
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].role.as_deref(), Some("Owner"));
        assert_eq!(mine[0].members_count, 2);

        let theirs = fx.groups.list_user_groups(&fx.bob).await.unwrap();
        assert_eq!(theirs[0].role.as_deref(), Some("Viewer"));
        assert_eq!(theirs[0].owner.id, fx.alice);
        assert_eq!(theirs[0].owner.email, "alice@x.com");

        let detail = fx.groups.get_group_detail(&group.id, &fx.bob).await.unwrap();
        assert_eq!(detail.members_count, 2);
        assert_eq!(detail.owner.map(|o| o.id), Some(fx.alice.clone()));
    }

    #[tokio::test]
    async fn group_name_is_required() {
        let fx = fixture().await;
        let err = fx
            .groups
            .create_group(&fx.alice, CreateGroupRequest::default())
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
        let (groups,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM todo_groups")
            .fetch_one(fx.store.pool())
            .await
            .unwrap();
        assert_eq!(groups, 0);
    }
}
