use async_trait::async_trait;
use axum_helpers::{Direction, Page, PageRequest};
use chrono::{DateTime, Utc};
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{UserError, UserResult};
use crate::models::{ROLE_ADMIN, ROLE_OPERATOR, Role, User, UserRecord, UserSort};

/// Repository trait for User persistence
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> UserResult<Option<User>>;

    /// Look up a user by normalized email
    async fn find_by_email(&self, email: &str) -> UserResult<Option<User>>;

    async fn find_all(&self, request: PageRequest<UserSort>) -> UserResult<Page<User>>;

    /// Roles among `ids` that exist; unknown ids are simply absent
    async fn find_roles(&self, ids: BTreeSet<Uuid>) -> UserResult<Vec<Role>>;

    /// Insert a user; `EmailTaken` if the email is already stored
    async fn create(&self, record: UserRecord, password_hash: String) -> UserResult<User>;

    /// Overwrite names, email and roles; `NotFound` if absent
    async fn update(&self, id: Uuid, record: UserRecord) -> UserResult<User>;

    async fn delete(&self, id: Uuid) -> UserResult<bool>;

    async fn exists(&self, id: Uuid) -> UserResult<bool>;
}

#[derive(Debug, Clone)]
struct StoredUser {
    id: Uuid,
    first_name: String,
    last_name: String,
    email: String,
    password_hash: String,
    role_ids: BTreeSet<Uuid>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Debug)]
struct UserStore {
    roles: HashMap<Uuid, Role>,
    users: HashMap<Uuid, StoredUser>,
}

impl Default for UserStore {
    fn default() -> Self {
        let roles = [(ROLE_OPERATOR, "ROLE_OPERATOR"), (ROLE_ADMIN, "ROLE_ADMIN")]
            .into_iter()
            .map(|(id, authority)| {
                (
                    id,
                    Role {
                        id,
                        authority: authority.to_string(),
                    },
                )
            })
            .collect();

        Self {
            roles,
            users: HashMap::new(),
        }
    }
}

impl UserStore {
    fn resolve(&self, ids: &BTreeSet<Uuid>) -> UserResult<()> {
        match ids.iter().find(|id| !self.roles.contains_key(id)) {
            Some(missing) => Err(UserError::RoleNotFound(*missing)),
            None => Ok(()),
        }
    }

    fn email_taken(&self, email: &str, except: Option<Uuid>) -> bool {
        self.users
            .values()
            .any(|u| u.email == email && Some(u.id) != except)
    }

    fn project(&self, stored: &StoredUser) -> User {
        let mut roles: Vec<Role> = stored
            .role_ids
            .iter()
            .filter_map(|id| self.roles.get(id))
            .cloned()
            .collect();
        roles.sort_by(|a, b| a.authority.cmp(&b.authority));

        User {
            id: stored.id,
            first_name: stored.first_name.clone(),
            last_name: stored.last_name.clone(),
            email: stored.email.clone(),
            password_hash: stored.password_hash.clone(),
            roles,
            created_at: stored.created_at,
            updated_at: stored.updated_at,
        }
    }
}

/// In-memory implementation of UserRepository (for development/testing)
///
/// Seeded with `ROLE_OPERATOR` and `ROLE_ADMIN` under their well-known ids.
#[derive(Debug, Default, Clone)]
pub struct InMemoryUserRepository {
    store: Arc<RwLock<UserStore>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_id(&self, id: Uuid) -> UserResult<Option<User>> {
        let store = self.store.read().await;
        Ok(store.users.get(&id).map(|u| store.project(u)))
    }

    async fn find_by_email(&self, email: &str) -> UserResult<Option<User>> {
        let store = self.store.read().await;
        let user = store
            .users
            .values()
            .find(|u| u.email == email)
            .map(|u| store.project(u));
        Ok(user)
    }

    async fn find_all(&self, request: PageRequest<UserSort>) -> UserResult<Page<User>> {
        let store = self.store.read().await;
        let mut users: Vec<&StoredUser> = store.users.values().collect();

        users.sort_by(|a, b| {
            let ordering = match request.sort {
                UserSort::Id => a.id.cmp(&b.id),
                UserSort::FirstName => a.first_name.cmp(&b.first_name),
                UserSort::LastName => a.last_name.cmp(&b.last_name),
                UserSort::Email => a.email.cmp(&b.email),
                UserSort::CreatedAt => a.created_at.cmp(&b.created_at),
            };
            let ordering = match request.direction {
                Direction::Asc => ordering,
                Direction::Desc => ordering.reverse(),
            };
            ordering.then_with(|| a.id.cmp(&b.id))
        });

        let projected = users.into_iter().map(|u| store.project(u)).collect();
        Ok(Page::slice(projected, &request))
    }

    async fn find_roles(&self, ids: BTreeSet<Uuid>) -> UserResult<Vec<Role>> {
        let store = self.store.read().await;
        Ok(ids
            .iter()
            .filter_map(|id| store.roles.get(id))
            .cloned()
            .collect())
    }

    async fn create(&self, record: UserRecord, password_hash: String) -> UserResult<User> {
        let mut store = self.store.write().await;

        if store.email_taken(&record.email, None) {
            return Err(UserError::EmailTaken);
        }
        store.resolve(&record.role_ids)?;

        let now = Utc::now();
        let stored = StoredUser {
            id: Uuid::now_v7(),
            first_name: record.first_name,
            last_name: record.last_name,
            email: record.email,
            password_hash,
            role_ids: record.role_ids,
            created_at: now,
            updated_at: now,
        };
        let user = store.project(&stored);
        store.users.insert(stored.id, stored);

        tracing::info!(user_id = %user.id, "Created user");
        Ok(user)
    }

    async fn update(&self, id: Uuid, record: UserRecord) -> UserResult<User> {
        let mut store = self.store.write().await;

        if !store.users.contains_key(&id) {
            return Err(UserError::NotFound(id));
        }
        if store.email_taken(&record.email, Some(id)) {
            return Err(UserError::EmailTaken);
        }
        store.resolve(&record.role_ids)?;

        let stored = store
            .users
            .get_mut(&id)
            .ok_or(UserError::NotFound(id))?;
        stored.first_name = record.first_name;
        stored.last_name = record.last_name;
        stored.email = record.email;
        stored.role_ids = record.role_ids;
        stored.updated_at = Utc::now();
        let stored = stored.clone();

        tracing::info!(user_id = %id, "Updated user");
        Ok(store.project(&stored))
    }

    async fn delete(&self, id: Uuid) -> UserResult<bool> {
        let mut store = self.store.write().await;
        let deleted = store.users.remove(&id).is_some();
        if deleted {
            tracing::info!(user_id = %id, "Deleted user");
        }
        Ok(deleted)
    }

    async fn exists(&self, id: Uuid) -> UserResult<bool> {
        let store = self.store.read().await;
        Ok(store.users.contains_key(&id))
    }
}
