use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::user::models::NewUser;
use crate::domain::user::models::UserId;
use crate::domain::user::models::UserRecord;
use crate::domain::user::models::Username;
use crate::domain::user::ports::UserStore;
use crate::domain::user::ports::UserUpdate;
use crate::user::errors::UserError;

/// In-memory user store for development and tests.
///
/// Mirrors the PostgreSQL store: ids are assigned sequentially from 1,
/// usernames are unique, and updates are staged until commit.
#[derive(Clone, Default)]
pub struct InMemoryUserStore {
    state: Arc<RwLock<MemoryState>>,
}

#[derive(Default)]
struct MemoryState {
    users: BTreeMap<UserId, UserRecord>,
    last_id: i64,
}

impl MemoryState {
    fn username_taken(&self, username: &Username, except: Option<UserId>) -> bool {
        self.users
            .values()
            .any(|user| &user.username == username && Some(user.id) != except)
    }
}

fn duplicate_username(username: &Username) -> UserError {
    UserError::DatabaseError(format!(
        "duplicate key value violates unique constraint \"users_username_key\" ({})",
        username
    ))
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<UserRecord>, UserError> {
        let state = self.state.read().await;
        Ok(state
            .users
            .values()
            .find(|user| user.username.as_str() == username)
            .cloned())
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<UserRecord>, UserError> {
        let state = self.state.read().await;
        Ok(state.users.get(&id).cloned())
    }

    async fn create(&self, user: NewUser) -> Result<UserRecord, UserError> {
        let mut state = self.state.write().await;

        if state.username_taken(&user.username, None) {
            return Err(duplicate_username(&user.username));
        }

        state.last_id += 1;
        let record = UserRecord {
            id: UserId(state.last_id),
            username: user.username,
            password_hash: user.password_hash,
            is_admin: user.is_admin,
            removed: false,
        };
        state.users.insert(record.id, record.clone());

        Ok(record)
    }

    async fn soft_delete(&self, id: UserId) -> Result<bool, UserError> {
        let mut state = self.state.write().await;

        match state.users.get_mut(&id) {
            Some(user) if !user.is_admin => {
                user.removed = true;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn begin_update(&self, id: UserId) -> Result<Box<dyn UserUpdate>, UserError> {
        Ok(Box::new(InMemoryUserUpdate {
            state: Arc::clone(&self.state),
            id,
            username: None,
            password_hash: None,
            is_admin: None,
        }))
    }
}

/// Staged field writes, applied under one write lock at commit.
struct InMemoryUserUpdate {
    state: Arc<RwLock<MemoryState>>,
    id: UserId,
    username: Option<Username>,
    password_hash: Option<String>,
    is_admin: Option<bool>,
}

#[async_trait]
impl UserUpdate for InMemoryUserUpdate {
    async fn set_username(&mut self, username: &Username) -> Result<(), UserError> {
        if self
            .state
            .read()
            .await
            .username_taken(username, Some(self.id))
        {
            return Err(duplicate_username(username));
        }
        self.username = Some(username.clone());
        Ok(())
    }

    async fn set_password_hash(&mut self, password_hash: &str) -> Result<(), UserError> {
        self.password_hash = Some(password_hash.to_string());
        Ok(())
    }

    async fn set_admin(&mut self, is_admin: bool) -> Result<bool, UserError> {
        self.is_admin = Some(is_admin);
        Ok(self.state.read().await.users.contains_key(&self.id))
    }

    async fn commit(self: Box<Self>) -> Result<(), UserError> {
        let InMemoryUserUpdate {
            state,
            id,
            username,
            password_hash,
            is_admin,
        } = *self;
        let mut state = state.write().await;

        if let Some(username) = &username {
            if state.username_taken(username, Some(id)) {
                return Err(duplicate_username(username));
            }
        }

        let user = state.users.get_mut(&id).ok_or(UserError::NotFound(id.0))?;

        if let Some(username) = username {
            user.username = username;
        }
        if let Some(password_hash) = password_hash {
            user.password_hash = password_hash;
        }
        if let Some(is_admin) = is_admin {
            user.is_admin = is_admin;
        }

        Ok(())
    }

    async fn rollback(self: Box<Self>) -> Result<(), UserError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_user(username: &str, is_admin: bool) -> NewUser {
        NewUser {
            username: Username::new(username.to_string()).unwrap(),
            password_hash: "$2b$04$hash".to_string(),
            is_admin,
        }
    }

    #[tokio::test]
    async fn test_create_assigns_sequential_ids() {
        let store = InMemoryUserStore::new();

        let alice = store.create(new_user("alice", false)).await.unwrap();
        let bob = store.create(new_user("bob", false)).await.unwrap();

        assert_eq!(alice.id, UserId(1));
        assert_eq!(bob.id, UserId(2));
        assert!(!alice.removed);

        let found = store.find_by_username("bob").await.unwrap().unwrap();
        assert_eq!(found, bob);
        assert_eq!(store.find_by_id(UserId(1)).await.unwrap(), Some(alice));
    }

    #[tokio::test]
    async fn test_create_rejects_duplicate_username() {
        let store = InMemoryUserStore::new();
        store.create(new_user("alice", false)).await.unwrap();

        let result = store.create(new_user("alice", true)).await;
        assert!(matches!(result, Err(UserError::DatabaseError(_))));
    }

    #[tokio::test]
    async fn test_soft_delete_refuses_admin() {
        let store = InMemoryUserStore::new();
        let admin = store.create(new_user("root", true)).await.unwrap();
        let member = store.create(new_user("alice", false)).await.unwrap();

        assert!(!store.soft_delete(admin.id).await.unwrap());
        assert!(store.soft_delete(member.id).await.unwrap());
        assert!(!store.soft_delete(UserId(99)).await.unwrap());

        assert!(!store.find_by_id(admin.id).await.unwrap().unwrap().removed);
        assert!(store.find_by_id(member.id).await.unwrap().unwrap().removed);
    }

    #[tokio::test]
    async fn test_update_is_invisible_until_commit() {
        let store = InMemoryUserStore::new();
        let alice = store.create(new_user("alice", false)).await.unwrap();

        let mut update = store.begin_update(alice.id).await.unwrap();
        update
            .set_username(&Username::new("alicia".to_string()).unwrap())
            .await
            .unwrap();
        assert!(update.set_admin(true).await.unwrap());

        let before = store.find_by_id(alice.id).await.unwrap().unwrap();
        assert_eq!(before.username.as_str(), "alice");
        assert!(!before.is_admin);

        update.commit().await.unwrap();

        let after = store.find_by_id(alice.id).await.unwrap().unwrap();
        assert_eq!(after.username.as_str(), "alicia");
        assert!(after.is_admin);
    }

    #[tokio::test]
    async fn test_rollback_discards_writes() {
        let store = InMemoryUserStore::new();
        let alice = store.create(new_user("alice", false)).await.unwrap();

        let mut update = store.begin_update(alice.id).await.unwrap();
        update.set_password_hash("$2b$04$other").await.unwrap();
        update.rollback().await.unwrap();

        let after = store.find_by_id(alice.id).await.unwrap().unwrap();
        assert_eq!(after.password_hash, "$2b$04$hash");
    }

    #[tokio::test]
    async fn test_update_rejects_taken_username() {
        let store = InMemoryUserStore::new();
        store.create(new_user("alice", false)).await.unwrap();
        let bob = store.create(new_user("bob", false)).await.unwrap();

        let mut update = store.begin_update(bob.id).await.unwrap();
        let result = update
            .set_username(&Username::new("alice".to_string()).unwrap())
            .await;
        assert!(matches!(result, Err(UserError::DatabaseError(_))));
    }

    #[tokio::test]
    async fn test_set_admin_reports_missing_user() {
        let store = InMemoryUserStore::new();

        let mut update = store.begin_update(UserId(42)).await.unwrap();
        assert!(!update.set_admin(false).await.unwrap());
    }
}
