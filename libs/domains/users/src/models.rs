use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::BTreeSet;
use strum::{Display, EnumString};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

/// Seeded `ROLE_OPERATOR` id
pub const ROLE_OPERATOR: Uuid = Uuid::from_u128(1);
/// Seeded `ROLE_ADMIN` id
pub const ROLE_ADMIN: Uuid = Uuid::from_u128(2);

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank").with_message(Cow::Borrowed("Required field")));
    }
    Ok(())
}

/// Authority granted to users
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Role {
    pub id: Uuid,
    #[schema(example = "ROLE_ADMIN")]
    pub authority: String,
}

/// Reference to an existing record by id; other fields are ignored
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Reference {
    pub id: Uuid,
}

/// User as stored, including the password hash
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    /// Argon2 PHC string
    pub password_hash: String,
    pub roles: Vec<Role>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn has_authority(&self, authority: &str) -> bool {
        self.roles.iter().any(|r| r.authority == authority)
    }
}

/// User response DTO (never carries the password)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub roles: Vec<Role>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            first_name: user.first_name,
            last_name: user.last_name,
            email: user.email,
            roles: user.roles,
        }
    }
}

/// DTO for creating a new user
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateUser {
    #[validate(custom(function = "not_blank"))]
    #[schema(example = "Maria")]
    pub first_name: String,
    #[serde(default)]
    #[schema(example = "Brown")]
    pub last_name: String,
    #[validate(email(message = "Enter a valid email"))]
    #[schema(example = "maria@gmail.com")]
    pub email: String,
    #[validate(length(min = 8, max = 128, message = "Password must be between 8 and 128 characters"))]
    #[schema(example = "s3cret-passw0rd")]
    pub password: String,
    #[serde(default)]
    pub roles: Vec<Reference>,
}

/// DTO for updating an existing user; the password is not changed here
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpdateUser {
    #[validate(custom(function = "not_blank"))]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[validate(email(message = "Enter a valid email"))]
    pub email: String,
    #[serde(default)]
    pub roles: Vec<Reference>,
}

/// Validated, normalized fields handed to the repository
#[derive(Debug, Clone, PartialEq)]
pub struct UserRecord {
    pub first_name: String,
    pub last_name: String,
    /// Trimmed and lower-cased
    pub email: String,
    pub role_ids: BTreeSet<Uuid>,
}

/// Normalizes an email for storage and comparison
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

impl From<&UpdateUser> for UserRecord {
    fn from(input: &UpdateUser) -> Self {
        Self {
            first_name: input.first_name.trim().to_string(),
            last_name: input.last_name.trim().to_string(),
            email: normalize_email(&input.email),
            role_ids: input.roles.iter().map(|r| r.id).collect(),
        }
    }
}

impl From<&CreateUser> for UserRecord {
    fn from(input: &CreateUser) -> Self {
        Self {
            first_name: input.first_name.trim().to_string(),
            last_name: input.last_name.trim().to_string(),
            email: normalize_email(&input.email),
            role_ids: input.roles.iter().map(|r| r.id).collect(),
        }
    }
}

/// Sortable user fields; `name` sorts by first name
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum UserSort {
    Id,
    #[default]
    #[strum(serialize = "name", serialize = "first_name")]
    FirstName,
    LastName,
    Email,
    CreatedAt,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn create_user(email: &str, password: &str) -> CreateUser {
        CreateUser {
            first_name: "Maria".to_string(),
            last_name: "Brown".to_string(),
            email: email.to_string(),
            password: password.to_string(),
            roles: vec![Reference { id: ROLE_OPERATOR }],
        }
    }

    #[test]
    fn test_valid_create_user() {
        assert!(create_user("maria@gmail.com", "123456789").validate().is_ok());
    }

    #[test]
    fn test_invalid_email_and_short_password() {
        let errors = create_user("not-an-email", "short").validate().unwrap_err();
        let field_errors = errors.field_errors();
        assert_eq!(
            field_errors["email"][0].message.as_deref(),
            Some("Enter a valid email")
        );
        assert!(field_errors.contains_key("password"));
    }

    #[test]
    fn test_record_normalizes_email_and_collapses_roles() {
        let mut input = create_user("  Maria@Gmail.COM ", "123456789");
        input.roles.push(Reference { id: ROLE_OPERATOR });

        let record = UserRecord::from(&input);
        assert_eq!(record.email, "maria@gmail.com");
        assert_eq!(record.role_ids.len(), 1);
    }

    #[test]
    fn test_response_omits_password() {
        let user = User {
            id: Uuid::now_v7(),
            first_name: "Alex".to_string(),
            last_name: "Green".to_string(),
            email: "alex@gmail.com".to_string(),
            password_hash: "$argon2id$v=19$...".to_string(),
            roles: vec![],
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let json = serde_json::to_value(UserResponse::from(user)).unwrap();
        assert!(json.get("password").is_none());
        assert!(json.get("password_hash").is_none());
    }

    #[test]
    fn test_name_sort_aliases_first_name() {
        assert_eq!(UserSort::from_str("name").unwrap(), UserSort::FirstName);
        assert_eq!(UserSort::from_str("first_name").unwrap(), UserSort::FirstName);
        assert!(UserSort::from_str("password_hash").is_err());
    }
}
