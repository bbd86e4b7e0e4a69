use argon2::{
    Argon2,
    password_hash::{PasswordHasher, SaltString, rand_core::OsRng},
};
use axum_helpers::{Page, PageRequest};
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::error::{UserError, UserResult};
use crate::models::{
    CreateUser, UpdateUser, UserRecord, UserResponse, UserSort, normalize_email,
};
use crate::repository::UserRepository;

/// Service layer for User business logic
#[derive(Clone)]
pub struct UserService<R: UserRepository> {
    repository: Arc<R>,
}

impl<R: UserRepository> UserService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    pub async fn list(&self, request: PageRequest<UserSort>) -> UserResult<Page<UserResponse>> {
        let page = self.repository.find_all(request).await?;
        Ok(page.map(Into::into))
    }

    pub async fn get(&self, id: Uuid) -> UserResult<UserResponse> {
        let user = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or(UserError::NotFound(id))?;

        Ok(user.into())
    }

    /// Resolve the caller's own record from the authenticated subject email
    pub async fn me(&self, subject: &str) -> UserResult<UserResponse> {
        let user = self
            .repository
            .find_by_email(&normalize_email(subject))
            .await?
            .ok_or_else(|| UserError::UnknownSubject(subject.to_string()))?;

        Ok(user.into())
    }

    /// Create a user with a hashed password
    pub async fn create(&self, input: CreateUser) -> UserResult<UserResponse> {
        input.validate()?;
        let record = UserRecord::from(&input);

        if self.repository.find_by_email(&record.email).await?.is_some() {
            return Err(UserError::EmailTaken);
        }
        self.check_roles(&record).await?;

        let password_hash = hash_password(&input.password)?;
        let user = self.repository.create(record, password_hash).await?;
        Ok(user.into())
    }

    /// Overwrite names, email and roles; the password is kept
    pub async fn update(&self, id: Uuid, input: UpdateUser) -> UserResult<UserResponse> {
        input.validate()?;
        let record = UserRecord::from(&input);

        if !self.repository.exists(id).await? {
            return Err(UserError::NotFound(id));
        }
        let owner = self.repository.find_by_email(&record.email).await?;
        if owner.is_some_and(|owner| owner.id != id) {
            return Err(UserError::EmailTaken);
        }
        self.check_roles(&record).await?;

        let user = self.repository.update(id, record).await?;
        Ok(user.into())
    }

    pub async fn delete(&self, id: Uuid) -> UserResult<()> {
        if !self.repository.delete(id).await? {
            return Err(UserError::NotFound(id));
        }
        Ok(())
    }

    async fn check_roles(&self, record: &UserRecord) -> UserResult<()> {
        if record.role_ids.is_empty() {
            return Ok(());
        }

        let found = self.repository.find_roles(record.role_ids.clone()).await?;
        if let Some(missing) = record
            .role_ids
            .iter()
            .find(|id| !found.iter().any(|role| role.id == **id))
        {
            return Err(UserError::RoleNotFound(*missing));
        }
        Ok(())
    }
}

fn hash_password(password: &str) -> UserResult<String> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| UserError::PasswordHash(e.to_string()))
}
