// This file is part of the product TaskSync.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use std::collections::HashMap;

use super::types::{
    CreateItemRequest, CreateListRequest, ListDetail, ListSummary, Priority, TodoItem,
    UpdateItemRequest, UpdateListRequest, UserRef,
};
use crate::authz::{AccessGate, ListAction};
use crate::error::{DomainError, DomainResult};
use crate::security::{MAX_NAME_CHARS, require_text};
use crate::store::{ListRow, SqliteStore, TodoRow, new_id, now_millis};

const MAX_TASK_CHARS: usize = 1024;
const MAX_DESCRIPTION_CHARS: usize = 4096;
const MAX_COLOR_CHARS: usize = 32;

/// Lifecycle of lists, their items and their shares.
#[derive(Clone)]
pub struct ListService {
    store: SqliteStore,
    gate: AccessGate,
}

impl ListService {
    pub fn new(store: SqliteStore, gate: AccessGate) -> Self {
        Self { store, gate }
    }

    pub async fn create_list(
        &self,
        owner_id: &str,
        request: CreateListRequest,
    ) -> DomainResult<ListSummary> {
        let name = require_text("Name", &request.name, MAX_NAME_CHARS)
            .map_err(DomainError::Validation)?;
        let description = optional_text(request.description, MAX_DESCRIPTION_CHARS, "Description")?;
        let color = optional_text(request.color, MAX_COLOR_CHARS, "Color")?;
        let group_id = request
            .group_id
            .map(|id| id.trim().to_string())
            .filter(|id| !id.is_empty());

        if let Some(group_id) = &group_id
            && !self.gate.authority().is_member(owner_id, group_id).await?
        {
            return Err(DomainError::validation("invalid group id"));
        }

        let now = now_millis();
        let list = ListRow {
            id: new_id(),
            name,
            description,
            color,
            owner_id: owner_id.to_string(),
            group_id,
            created_at: now,
            updated_at: now,
        };
        self.store.create_list(&list).await?;
        log::info!("User {} created list {}", owner_id, list.id);
        self.summary(&list.id).await
    }

    pub async fn list_lists(&self, owner_id: &str) -> DomainResult<Vec<ListSummary>> {
        let rows = self.store.lists_owned_by(owner_id).await?;
        let mut shares: HashMap<String, Vec<UserRef>> = HashMap::new();
        for share in self.store.shares_of_lists_owned_by(owner_id).await? {
            shares
                .entry(share.list_id.clone())
                .or_default()
                .push(UserRef::from(share));
        }
        Ok(rows
            .into_iter()
            .map(|row| {
                let shared_with = shares.remove(&row.id).unwrap_or_default();
                ListSummary::from(row).with_shares(shared_with)
            })
            .collect())
    }

    pub async fn get_list(&self, list_id: &str, caller_id: &str) -> DomainResult<ListDetail> {
        self.authorize(caller_id, list_id, ListAction::Read).await?;
        let summary = self.summary(list_id).await?;
        let todos = self
            .store
            .todos_in_list(list_id)
            .await?
            .into_iter()
            .map(TodoItem::from)
            .collect();
        Ok(ListDetail { summary, todos })
    }

    pub async fn update_list(
        &self,
        list_id: &str,
        caller_id: &str,
        request: UpdateListRequest,
    ) -> DomainResult<ListSummary> {
        let list = self.authorize(caller_id, list_id, ListAction::Update).await?;

        let name = match request.name {
            Some(name) => {
                require_text("Name", &name, MAX_NAME_CHARS).map_err(DomainError::Validation)?
            }
            None => list.name,
        };
        let description = match request.description {
            Some(description) => optional_text(Some(description), MAX_DESCRIPTION_CHARS, "Description")?,
            None => list.description,
        };
        let color = match request.color {
            Some(color) => optional_text(Some(color), MAX_COLOR_CHARS, "Color")?,
            None => list.color,
        };

        self.store
            .update_list(list_id, &name, &description, &color)
            .await?;
        self.summary(list_id).await
    }

    pub async fn delete_list(&self, list_id: &str, caller_id: &str) -> DomainResult<()> {
        self.authorize(caller_id, list_id, ListAction::Delete).await?;
        self.store.delete_list(list_id).await?;
        log::info!("User {} deleted list {}", caller_id, list_id);
        Ok(())
    }

    pub async fn share_list(
        &self,
        list_id: &str,
        caller_id: &str,
        target_user_id: &str,
    ) -> DomainResult<Vec<UserRef>> {
        let list = self
            .authorize(caller_id, list_id, ListAction::ManageShares)
            .await?;
        // Group lists are reached through membership; a share row would
        // only become live once the group is deleted.
        if list.group_id.is_some() {
            return Err(DomainError::validation("Group lists cannot be shared"));
        }
        let target_user_id = target_user_id.trim();
        if target_user_id.is_empty() {
            return Err(DomainError::validation("User id is required"));
        }
        if target_user_id == list.owner_id {
            return Err(DomainError::validation("Cannot share a list with its owner"));
        }
        if !self.store.user_exists(target_user_id).await? {
            return Err(DomainError::validation("User to share with does not exist"));
        }

        self.store.share_list(list_id, target_user_id).await?;
        log::info!("List {} shared with user {}", list_id, target_user_id);
        self.shared_with(list_id).await
    }

    pub async fn unshare_list(
        &self,
        list_id: &str,
        caller_id: &str,
        target_user_id: &str,
    ) -> DomainResult<Vec<UserRef>> {
        self.authorize(caller_id, list_id, ListAction::ManageShares)
            .await?;
        if !self.store.unshare_list(list_id, target_user_id).await? {
            return Err(DomainError::not_found("Share not found"));
        }
        log::info!("List {} no longer shared with user {}", list_id, target_user_id);
        self.shared_with(list_id).await
    }

    pub async fn list_items(&self, list_id: &str, caller_id: &str) -> DomainResult<Vec<TodoItem>> {
        self.authorize(caller_id, list_id, ListAction::Read).await?;
        let rows = self.store.todos_in_list(list_id).await?;
        Ok(rows.into_iter().map(TodoItem::from).collect())
    }

    pub async fn get_item(
        &self,
        list_id: &str,
        item_id: &str,
        caller_id: &str,
    ) -> DomainResult<TodoItem> {
        self.authorize(caller_id, list_id, ListAction::Read).await?;
        Ok(TodoItem::from(self.require_item(list_id, item_id).await?))
    }

    pub async fn create_item(
        &self,
        list_id: &str,
        caller_id: &str,
        request: CreateItemRequest,
    ) -> DomainResult<TodoItem> {
        self.authorize(caller_id, list_id, ListAction::CreateItem)
            .await?;

        let task = require_text("Task", &request.task, MAX_TASK_CHARS)
            .map_err(DomainError::Validation)?;
        let description = optional_text(request.description, MAX_DESCRIPTION_CHARS, "Description")?;
        let priority = match request.priority.as_deref() {
            Some(value) => value.parse::<Priority>()?,
            None => Priority::default(),
        };
        check_date_range(request.start_date, request.end_date)?;

        let now = now_millis();
        let todo = TodoRow {
            id: new_id(),
            todo_list_id: list_id.to_string(),
            task,
            description,
            is_completed: false,
            start_date: request.start_date,
            end_date: request.end_date,
            priority: priority.as_str().to_string(),
            created_at: now,
            updated_at: now,
        };
        self.store.insert_todo(&todo).await?;
        Ok(TodoItem::from(todo))
    }

    pub async fn update_item(
        &self,
        list_id: &str,
        item_id: &str,
        caller_id: &str,
        request: UpdateItemRequest,
    ) -> DomainResult<TodoItem> {
        self.authorize(caller_id, list_id, ListAction::UpdateItem)
            .await?;
        let mut todo = self.require_item(list_id, item_id).await?;

        if let Some(task) = request.task {
            todo.task =
                require_text("Task", &task, MAX_TASK_CHARS).map_err(DomainError::Validation)?;
        }
        if let Some(description) = request.description {
            todo.description = optional_text(Some(description), MAX_DESCRIPTION_CHARS, "Description")?;
        }
        if let Some(priority) = request.priority {
            todo.priority = priority.parse::<Priority>()?.as_str().to_string();
        }
        if let Some(is_completed) = request.is_completed {
            todo.is_completed = is_completed;
        }
        if let Some(start_date) = request.start_date {
            todo.start_date = start_date;
        }
        if let Some(end_date) = request.end_date {
            todo.end_date = end_date;
        }
        check_date_range(todo.start_date, todo.end_date)?;

        todo.updated_at = now_millis();
        self.store.update_todo(&todo).await?;
        Ok(TodoItem::from(todo))
    }

    pub async fn delete_item(
        &self,
        list_id: &str,
        item_id: &str,
        caller_id: &str,
    ) -> DomainResult<()> {
        self.authorize(caller_id, list_id, ListAction::DeleteItem)
            .await?;
        self.require_item(list_id, item_id).await?;
        self.store.delete_todo(list_id, item_id).await?;
        Ok(())
    }

    /// Load a live list and check the caller may perform `action` on it.
    async fn authorize(
        &self,
        caller_id: &str,
        list_id: &str,
        action: ListAction,
    ) -> DomainResult<ListRow> {
        let list = self
            .store
            .find_list(list_id)
            .await?
            .ok_or_else(|| DomainError::not_found("List not found"))?;
        self.gate
            .list_access(caller_id, &list, action)
            .await?
            .require("List")?;
        Ok(list)
    }

    async fn require_item(&self, list_id: &str, item_id: &str) -> DomainResult<TodoRow> {
        self.store
            .find_todo(list_id, item_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Todo item not found"))
    }

    async fn summary(&self, list_id: &str) -> DomainResult<ListSummary> {
        let row = self
            .store
            .list_summary(list_id)
            .await?
            .ok_or_else(|| DomainError::not_found("List not found"))?;
        Ok(ListSummary::from(row).with_shares(self.shared_with(list_id).await?))
    }

    async fn shared_with(&self, list_id: &str) -> DomainResult<Vec<UserRef>> {
        Ok(self
            .store
            .list_shared_with(list_id)
            .await?
            .into_iter()
            .map(UserRef::from)
            .collect())
    }
}

fn optional_text(value: Option<String>, max_chars: usize, label: &str) -> DomainResult<String> {
    let value = value.map(|v| v.trim().to_string()).unwrap_or_default();
    if value.chars().count() > max_chars {
        return Err(DomainError::validation(format!(
            "{} must be at most {} characters",
            label, max_chars
        )));
    }
    Ok(value)
}

fn check_date_range(start: Option<i64>, end: Option<i64>) -> DomainResult<()> {
    if let (Some(start), Some(end)) = (start, end)
        && end < start
    {
        return Err(DomainError::validation("End date must not be before start date"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::authz::{GroupAuthority, RoleName, RoleRegistry};
    use crate::store::GroupRow;
    use crate::util::test_fixtures::{insert_test_user, seeded_store};

    struct Fixture {
        store: SqliteStore,
        service: ListService,
        alice: String,
        bob: String,
    }

    async fn fixture() -> Fixture {
        let store = seeded_store().await;
        let gate = AccessGate::new(store.clone(), GroupAuthority::new(store.clone()));
        let alice = insert_test_user(&store, "Alice", "alice@x.com").await;
        let bob = insert_test_user(&store, "Bob", "bob@x.com").await;
        Fixture {
            service: ListService::new(store.clone(), gate),
            store,
            alice,
            bob,
        }
    }

    async fn group_owned_by(fx: &Fixture, owner_id: &str) -> String {
        let owner_role = RoleRegistry::new(fx.store.clone())
            .seeded_role(RoleName::Owner)
            .await
            .unwrap();
        let now = now_millis();
        let group = GroupRow {
            id: new_id(),
            name: "Team".to_string(),
            description: String::new(),
            owner_id: owner_id.to_string(),
            created_at: now,
            updated_at: now,
        };
        fx.store
            .create_group_with_owner(&group, &owner_role.id)
            .await
            .unwrap();
        group.id
    }

    fn named(name: &str) -> CreateListRequest {
        CreateListRequest {
            name: name.to_string(),
            ..Default::default()
        }
    }

    async fn count_rows(store: &SqliteStore, sql: &str) -> i64 {
        let (count,): (i64,) = sqlx::query_as(sql).fetch_one(store.pool()).await.unwrap();
        count
    }

    #[tokio::test]
    async fn create_list_in_group_round_trips_group_id() {
        let fx = fixture().await;
        let group_id = group_owned_by(&fx, &fx.alice).await;

        let created = fx
            .service
            .create_list(
                &fx.alice,
                CreateListRequest {
                    group_id: Some(group_id.clone()),
                    ..named("Sprint")
                },
            )
            .await
            .unwrap();
        let detail = fx.service.get_list(&created.id, &fx.alice).await.unwrap();
        assert_eq!(detail.summary.group.map(|g| g.id), Some(group_id));
    }

    #[tokio::test]
    async fn create_list_with_unknown_group_persists_nothing() {
        let fx = fixture().await;
        let err = fx
            .service
            .create_list(
                &fx.alice,
                CreateListRequest {
                    group_id: Some("no-such-group".to_string()),
                    ..named("Orphan")
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err, DomainError::validation("invalid group id"));
        assert_eq!(count_rows(&fx.store, "SELECT COUNT(*) FROM todo_lists").await, 0);
    }

    #[tokio::test]
    async fn create_list_requires_name() {
        let fx = fixture().await;
        let err = fx.service.create_list(&fx.alice, named("   ")).await.unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[tokio::test]
    async fn list_lists_returns_only_own_lists_newest_first() {
        let fx = fixture().await;
        fx.service.create_list(&fx.alice, named("First")).await.unwrap();
        fx.service.create_list(&fx.alice, named("Second")).await.unwrap();
        fx.service.create_list(&fx.bob, named("Bob's")).await.unwrap();

        let lists = fx.service.list_lists(&fx.alice).await.unwrap();
        let names: Vec<&str> = lists.iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, vec!["Second", "First"]);
    }

    #[tokio::test]
    async fn stranger_cannot_see_or_touch_standalone_list() {
        let fx = fixture().await;
        let list = fx.service.create_list(&fx.alice, named("Private")).await.unwrap();

        assert!(matches!(
            fx.service.get_list(&list.id, &fx.bob).await,
            Err(DomainError::NotFound(_))
        ));
        assert!(matches!(
            fx.service
                .update_list(&list.id, &fx.bob, UpdateListRequest::default())
                .await,
            Err(DomainError::NotFound(_))
        ));
        assert!(matches!(
            fx.service.delete_list(&list.id, &fx.bob).await,
            Err(DomainError::NotFound(_))
        ));
        assert!(fx.service.get_list(&list.id, &fx.alice).await.is_ok());
    }

    #[tokio::test]
    async fn sharing_grants_read_and_update_but_not_delete() {
        let fx = fixture().await;
        let list = fx.service.create_list(&fx.alice, named("Shared")).await.unwrap();
        let shared = fx.service.share_list(&list.id, &fx.alice, &fx.bob).await.unwrap();
        assert_eq!(shared.len(), 1);
        // Idempotent.
        fx.service.share_list(&list.id, &fx.alice, &fx.bob).await.unwrap();

        let detail = fx.service.get_list(&list.id, &fx.bob).await.unwrap();
        assert_eq!(detail.summary.shared_with_count, 1);
        fx.service
            .update_list(
                &list.id,
                &fx.bob,
                UpdateListRequest {
                    name: Some("Renamed".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert!(matches!(
            fx.service.delete_list(&list.id, &fx.bob).await,
            Err(DomainError::Forbidden(_))
        ));
        assert!(matches!(
            fx.service.share_list(&list.id, &fx.bob, &fx.alice).await,
            Err(DomainError::Forbidden(_))
        ));

        fx.service.unshare_list(&list.id, &fx.alice, &fx.bob).await.unwrap();
        assert!(matches!(
            fx.service.get_list(&list.id, &fx.bob).await,
            Err(DomainError::NotFound(_))
        ));
        assert!(matches!(
            fx.service.unshare_list(&list.id, &fx.alice, &fx.bob).await,
            Err(DomainError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn share_rejects_owner_and_unknown_user() {
        let fx = fixture().await;
        let list = fx.service.create_list(&fx.alice, named("Mine")).await.unwrap();
        assert!(matches!(
            fx.service.share_list(&list.id, &fx.alice, &fx.alice).await,
            Err(DomainError::Validation(_))
        ));
        assert!(matches!(
            fx.service.share_list(&list.id, &fx.alice, "ghost").await,
            Err(DomainError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn group_list_shares_are_refused_and_dropped_on_detach() {
        let fx = fixture().await;
        let group_id = group_owned_by(&fx, &fx.alice).await;
        let list = fx
            .service
            .create_list(
                &fx.alice,
                CreateListRequest {
                    group_id: Some(group_id.clone()),
                    ..named("Team list")
                },
            )
            .await
            .unwrap();

        assert_eq!(
            fx.service.share_list(&list.id, &fx.alice, &fx.bob).await,
            Err(DomainError::validation("Group lists cannot be shared"))
        );

        // A stray share row must not outlive the group.
        fx.store.share_list(&list.id, &fx.bob).await.unwrap();
        fx.store.delete_group(&group_id).await.unwrap();
        assert!(!fx.store.is_list_shared_with(&list.id, &fx.bob).await.unwrap());
        assert!(matches!(
            fx.service.get_list(&list.id, &fx.bob).await,
            Err(DomainError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn group_member_uses_list_but_viewer_cannot_delete_items() {
        let fx = fixture().await;
        let group_id = group_owned_by(&fx, &fx.alice).await;
        let viewer_role = RoleRegistry::new(fx.store.clone())
            .seeded_role(RoleName::Viewer)
            .await
            .unwrap();
        fx.store
            .insert_mapping(&fx.bob, &group_id, &viewer_role.id)
            .await
            .unwrap();
        let list = fx
            .service
            .create_list(
                &fx.alice,
                CreateListRequest {
                    group_id: Some(group_id),
                    ..named("Team list")
                },
            )
            .await
            .unwrap();

        let item = fx
            .service
            .create_item(
                &list.id,
                &fx.bob,
                CreateItemRequest {
                    task: "Write docs".to_string(),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert!(matches!(
            fx.service.delete_item(&list.id, &item.id, &fx.bob).await,
            Err(DomainError::Forbidden(_))
        ));
        assert!(matches!(
            fx.service.delete_list(&list.id, &fx.bob).await,
            Err(DomainError::Forbidden(_))
        ));
        fx.service.delete_item(&list.id, &item.id, &fx.alice).await.unwrap();
    }

    #[tokio::test]
    async fn empty_task_is_rejected_without_a_row() {
        let fx = fixture().await;
        let list = fx.service.create_list(&fx.alice, named("Chores")).await.unwrap();
        let err = fx
            .service
            .create_item(
                &list.id,
                &fx.alice,
                CreateItemRequest {
                    task: "  ".to_string(),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
        assert_eq!(count_rows(&fx.store, "SELECT COUNT(*) FROM todos").await, 0);
    }

    #[tokio::test]
    async fn item_update_validates_priority_and_dates() {
        let fx = fixture().await;
        let list = fx.service.create_list(&fx.alice, named("Chores")).await.unwrap();
        let item = fx
            .service
            .create_item(
                &list.id,
                &fx.alice,
                CreateItemRequest {
                    task: "Laundry".to_string(),
                    start_date: Some(2_000),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(item.priority, Priority::Normal);

        let bad_priority = UpdateItemRequest {
            priority: Some("someday".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            fx.service.update_item(&list.id, &item.id, &fx.alice, bad_priority).await,
            Err(DomainError::Validation(_))
        ));
        let bad_dates = UpdateItemRequest {
            end_date: Some(Some(1_000)),
            ..Default::default()
        };
        assert!(matches!(
            fx.service.update_item(&list.id, &item.id, &fx.alice, bad_dates).await,
            Err(DomainError::Validation(_))
        ));

        let updated = fx
            .service
            .update_item(
                &list.id,
                &item.id,
                &fx.alice,
                UpdateItemRequest {
                    is_completed: Some(true),
                    priority: Some("urgent".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert!(updated.is_completed);
        assert_eq!(updated.priority, Priority::Urgent);
        let summary = fx.service.list_lists(&fx.alice).await.unwrap();
        assert_eq!(summary[0].completed_count, 1);
    }

    #[tokio::test]
    async fn item_ids_are_scoped_to_their_list() {
        let fx = fixture().await;
        let first = fx.service.create_list(&fx.alice, named("First")).await.unwrap();
        let second = fx.service.create_list(&fx.alice, named("Second")).await.unwrap();
        let item = fx
            .service
            .create_item(
                &first.id,
                &fx.alice,
                CreateItemRequest {
                    task: "Only here".to_string(),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert!(matches!(
            fx.service.get_item(&second.id, &item.id, &fx.alice).await,
            Err(DomainError::NotFound(_))
        ));
        assert!(matches!(
            fx.service.delete_item(&second.id, &item.id, &fx.alice).await,
            Err(DomainError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn deleting_list_tombstones_its_items() {
        let fx = fixture().await;
        let list = fx.service.create_list(&fx.alice, named("Doomed")).await.unwrap();
        fx.service
            .create_item(
                &list.id,
                &fx.alice,
                CreateItemRequest {
                    task: "Gone soon".to_string(),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        fx.service.delete_list(&list.id, &fx.alice).await.unwrap();
        assert!(matches!(
            fx.service.get_list(&list.id, &fx.alice).await,
            Err(DomainError::NotFound(_))
        ));
        assert_eq!(
            count_rows(&fx.store, "SELECT COUNT(*) FROM todos WHERE deleted_at IS NOT NULL").await,
            1
        );
    }
}
