use async_trait::async_trait;
use axum_helpers::{Direction, Page, PageRequest};
use chrono::Utc;
use database::postgres::{ConstraintViolation, constraint_violation};
use sea_orm::ActiveValue::Set;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    IntoActiveModel, ModelTrait, Order, PaginatorTrait, QueryFilter, QueryOrder, TransactionTrait,
};
use std::collections::BTreeSet;
use uuid::Uuid;

use crate::{
    entity::{role, user, user_role},
    error::{UserError, UserResult},
    models::{Role, User, UserRecord, UserSort},
    repository::UserRepository,
};

fn map_db_err(err: DbErr) -> UserError {
    match constraint_violation(&err) {
        // Only the email column carries a unique index on users
        Some(ConstraintViolation::Unique(_)) => UserError::EmailTaken,
        _ => UserError::Internal(format!("Database error: {}", err)),
    }
}

pub struct PgUserRepository {
    db: DatabaseConnection,
}

impl PgUserRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn load_roles<C: ConnectionTrait>(
        conn: &C,
        model: &user::Model,
    ) -> UserResult<Vec<role::Model>> {
        model
            .find_related(role::Entity)
            .order_by_asc(role::Column::Authority)
            .all(conn)
            .await
            .map_err(map_db_err)
    }

    async fn resolve_roles<C: ConnectionTrait>(
        conn: &C,
        ids: &BTreeSet<Uuid>,
    ) -> UserResult<Vec<role::Model>> {
        let found = role::Entity::find()
            .filter(role::Column::Id.is_in(ids.iter().copied()))
            .order_by_asc(role::Column::Authority)
            .all(conn)
            .await
            .map_err(map_db_err)?;

        let known: BTreeSet<Uuid> = found.iter().map(|r| r.id).collect();
        if let Some(missing) = ids.difference(&known).next() {
            return Err(UserError::RoleNotFound(*missing));
        }

        Ok(found)
    }

    async fn link_roles<C: ConnectionTrait>(
        conn: &C,
        user_id: Uuid,
        roles: &[role::Model],
    ) -> UserResult<()> {
        if roles.is_empty() {
            return Ok(());
        }

        let rows = roles.iter().map(|r| user_role::ActiveModel {
            user_id: Set(user_id),
            role_id: Set(r.id),
        });

        user_role::Entity::insert_many(rows)
            .exec_without_returning(conn)
            .await
            .map_err(map_db_err)?;

        Ok(())
    }

    async fn email_taken<C: ConnectionTrait>(
        conn: &C,
        email: &str,
        except: Option<Uuid>,
    ) -> UserResult<bool> {
        let mut query = user::Entity::find().filter(user::Column::Email.eq(email));
        if let Some(id) = except {
            query = query.filter(user::Column::Id.ne(id));
        }

        let count = query.count(conn).await.map_err(map_db_err)?;
        Ok(count > 0)
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn find_by_id(&self, id: Uuid) -> UserResult<Option<User>> {
        let Some(model) = user::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(map_db_err)?
        else {
            return Ok(None);
        };

        let roles = Self::load_roles(&self.db, &model).await?;
        Ok(Some(model.into_user(roles)))
    }

    async fn find_by_email(&self, email: &str) -> UserResult<Option<User>> {
        let Some(model) = user::Entity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(map_db_err)?
        else {
            return Ok(None);
        };

        let roles = Self::load_roles(&self.db, &model).await?;
        Ok(Some(model.into_user(roles)))
    }

    async fn find_all(&self, request: PageRequest<UserSort>) -> UserResult<Page<User>> {
        let column = match request.sort {
            UserSort::Id => user::Column::Id,
            UserSort::FirstName => user::Column::FirstName,
            UserSort::LastName => user::Column::LastName,
            UserSort::Email => user::Column::Email,
            UserSort::CreatedAt => user::Column::CreatedAt,
        };
        let order = match request.direction {
            Direction::Asc => Order::Asc,
            Direction::Desc => Order::Desc,
        };

        let paginator = user::Entity::find()
            .order_by(column, order)
            .order_by_asc(user::Column::Id)
            .paginate(&self.db, request.size);

        let totals = paginator.num_items_and_pages().await.map_err(map_db_err)?;
        let models = if request.is_past_end(totals.number_of_items) {
            Vec::new()
        } else {
            paginator
                .fetch_page(request.page)
                .await
                .map_err(map_db_err)?
        };

        let mut users = Vec::with_capacity(models.len());
        for model in models {
            let roles = Self::load_roles(&self.db, &model).await?;
            users.push(model.into_user(roles));
        }

        Ok(Page::new(
            users,
            request.page,
            request.size,
            totals.number_of_items,
        ))
    }

    async fn find_roles(&self, ids: BTreeSet<Uuid>) -> UserResult<Vec<Role>> {
        let roles = role::Entity::find()
            .filter(role::Column::Id.is_in(ids))
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(roles.into_iter().map(Into::into).collect())
    }

    async fn create(&self, record: UserRecord, password_hash: String) -> UserResult<User> {
        let txn = self.db.begin().await.map_err(map_db_err)?;

        if Self::email_taken(&txn, &record.email, None).await? {
            return Err(UserError::EmailTaken);
        }
        let roles = Self::resolve_roles(&txn, &record.role_ids).await?;

        let now = Utc::now();
        let active_model = user::ActiveModel {
            id: Set(Uuid::now_v7()),
            first_name: Set(record.first_name),
            last_name: Set(record.last_name),
            email: Set(record.email),
            password_hash: Set(password_hash),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        };

        let model = active_model.insert(&txn).await.map_err(map_db_err)?;
        Self::link_roles(&txn, model.id, &roles).await?;
        txn.commit().await.map_err(map_db_err)?;

        tracing::info!(user_id = %model.id, "Created user");
        Ok(model.into_user(roles))
    }

    async fn update(&self, id: Uuid, record: UserRecord) -> UserResult<User> {
        let txn = self.db.begin().await.map_err(map_db_err)?;

        let existing = user::Entity::find_by_id(id)
            .one(&txn)
            .await
            .map_err(map_db_err)?
            .ok_or(UserError::NotFound(id))?;
        if Self::email_taken(&txn, &record.email, Some(id)).await? {
            return Err(UserError::EmailTaken);
        }
        let roles = Self::resolve_roles(&txn, &record.role_ids).await?;

        let mut active_model = existing.into_active_model();
        active_model.first_name = Set(record.first_name);
        active_model.last_name = Set(record.last_name);
        active_model.email = Set(record.email);
        active_model.updated_at = Set(Utc::now().into());

        let model = active_model.update(&txn).await.map_err(map_db_err)?;

        user_role::Entity::delete_many()
            .filter(user_role::Column::UserId.eq(id))
            .exec(&txn)
            .await
            .map_err(map_db_err)?;
        Self::link_roles(&txn, id, &roles).await?;
        txn.commit().await.map_err(map_db_err)?;

        tracing::info!(user_id = %id, "Updated user");
        Ok(model.into_user(roles))
    }

    async fn delete(&self, id: Uuid) -> UserResult<bool> {
        let result = user::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(map_db_err)?;

        let deleted = result.rows_affected > 0;
        if deleted {
            tracing::info!(user_id = %id, "Deleted user");
        }
        Ok(deleted)
    }

    async fn exists(&self, id: Uuid) -> UserResult<bool> {
        let count = user::Entity::find_by_id(id)
            .count(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(count > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ROLE_ADMIN, ROLE_OPERATOR};
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn user_model(email: &str) -> user::Model {
        let now = Utc::now();
        user::Model {
            id: Uuid::now_v7(),
            first_name: "Maria".to_string(),
            last_name: "Brown".to_string(),
            email: email.to_string(),
            password_hash: "$argon2id$v=19$m=19456,t=2,p=1$c2FsdA$aGFzaA".to_string(),
            created_at: now.into(),
            updated_at: now.into(),
        }
    }

    fn role_model(id: Uuid, authority: &str) -> role::Model {
        role::Model {
            id,
            authority: authority.to_string(),
        }
    }

    #[tokio::test]
    async fn test_find_by_email_loads_roles() {
        let maria = user_model("maria@gmail.com");
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![maria.clone()]])
            .append_query_results([vec![
                role_model(ROLE_ADMIN, "ROLE_ADMIN"),
                role_model(ROLE_OPERATOR, "ROLE_OPERATOR"),
            ]])
            .into_connection();
        let repo = PgUserRepository::new(db);

        let user = repo.find_by_email("maria@gmail.com").await.unwrap().unwrap();
        assert_eq!(user.id, maria.id);
        assert!(user.has_authority("ROLE_ADMIN"));
        assert_eq!(user.roles.len(), 2);
    }

    #[tokio::test]
    async fn test_find_roles_maps_models() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![role_model(ROLE_OPERATOR, "ROLE_OPERATOR")]])
            .into_connection();
        let repo = PgUserRepository::new(db);

        let roles = repo.find_roles([ROLE_OPERATOR].into()).await.unwrap();
        assert_eq!(
            roles,
            vec![Role {
                id: ROLE_OPERATOR,
                authority: "ROLE_OPERATOR".to_string()
            }]
        );
    }

    #[tokio::test]
    async fn test_find_missing_user() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<user::Model>::new()])
            .into_connection();
        let repo = PgUserRepository::new(db);

        assert!(repo.find_by_id(Uuid::now_v7()).await.unwrap().is_none());
    }

    #[test]
    fn test_generic_db_errors_are_internal() {
        let err = map_db_err(DbErr::Custom("pool timed out".to_string()));
        assert!(matches!(err, UserError::Internal(msg) if msg.contains("pool timed out")));
    }
}
