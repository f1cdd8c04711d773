use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use secrecy::{ExposeSecret, SecretString};
use uuid::Uuid;
use validator::ValidateEmail;

use crate::entities::{Role, RoleName, User};
use crate::errors_service::AccountServiceError;
use crate::password::{hash_password, PasswordHasher};
use crate::repository::errors::RepositoryError;
use crate::repository::models::{RoleRow, UserRow};
use crate::repository::traits::{AccountStore, AccountTransaction};

const MAX_USERNAME_LENGTH: usize = 255;

fn parse_uuid(s: &str) -> Result<Uuid, AccountServiceError> {
    Uuid::parse_str(s).map_err(|_| AccountServiceError::InvalidUuid(s.to_string()))
}

fn role_from_row(row: RoleRow) -> Role {
    Role::new(RoleName::from_stored(row.name))
}

fn user_from_row(row: UserRow, roles: Vec<RoleRow>) -> Result<User, AccountServiceError> {
    Ok(User {
        id: parse_uuid(&row.id)?,
        username: row.username,
        password_hash: row.password_hash,
        email: row.email,
        roles: roles.into_iter().map(role_from_row).collect::<BTreeSet<_>>(),
    })
}

fn validate_new_user(username: &str, email: &str, password: &SecretString) -> Result<(), AccountServiceError> {
    if username.trim().is_empty() {
        return Err(AccountServiceError::Validation(
            "username cannot be empty".to_string(),
        ));
    }
    if username.chars().count() > MAX_USERNAME_LENGTH {
        return Err(AccountServiceError::Validation(format!(
            "username cannot exceed {MAX_USERNAME_LENGTH} characters"
        )));
    }
    if !email.validate_email() {
        return Err(AccountServiceError::Validation(format!(
            "invalid email address: {email}"
        )));
    }
    if password.expose_secret().is_empty() {
        return Err(AccountServiceError::Validation(
            "password cannot be empty".to_string(),
        ));
    }
    Ok(())
}

/// Users, roles and their associations. Each operation opens one transaction
/// and commits it only on success. `add_new_user` hashes between two
/// transactions so the store is never held during bcrypt.
#[derive(Clone)]
pub struct AccountService {
    store: Arc<dyn AccountStore>,
    hasher: Arc<dyn PasswordHasher>,
}

impl fmt::Debug for AccountService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccountService").finish_non_exhaustive()
    }
}

impl AccountService {
    pub fn new<S, H>(store: S, hasher: H) -> Self
    where
        S: AccountStore + 'static,
        H: PasswordHasher + 'static,
    {
        Self {
            store: Arc::new(store),
            hasher: Arc::new(hasher),
        }
    }

    pub fn with_store(store: Arc<dyn AccountStore>, hasher: Arc<dyn PasswordHasher>) -> Self {
        Self { store, hasher }
    }

    pub fn hasher(&self) -> Arc<dyn PasswordHasher> {
        self.hasher.clone()
    }

    async fn load_user(
        tx: &mut dyn AccountTransaction,
        username: &str,
    ) -> Result<Option<User>, AccountServiceError> {
        match tx.find_user_by_username(username).await? {
            Some(row) => {
                let roles = tx.roles_for_user(&row.id).await?;
                Ok(Some(user_from_row(row, roles)?))
            }
            None => Ok(None),
        }
    }

    #[tracing::instrument(skip(self))]
    pub async fn add_new_role(&self, name: &str) -> Result<Role, AccountServiceError> {
        let name = RoleName::parse(name).map_err(AccountServiceError::Validation)?;

        let mut tx = self.store.begin().await?;
        if tx.find_role(&name).await?.is_some() {
            return Err(AccountServiceError::DuplicateEntity(format!("role {name}")));
        }
        let row = tx.insert_role(&name).await?;
        tx.commit().await?;

        tracing::info!(role = %name, "role created");
        Ok(role_from_row(row))
    }

    #[tracing::instrument(skip(self, password, confirm_password))]
    pub async fn add_new_user(
        &self,
        username: &str,
        password: &SecretString,
        email: &str,
        confirm_password: &SecretString,
    ) -> Result<User, AccountServiceError> {
        let username = username.trim();
        validate_new_user(username, email, password)?;

        let mut tx = self.store.begin().await?;
        let existing = tx.find_user_by_username(username).await?;
        tx.commit().await?;
        if existing.is_some() {
            return Err(AccountServiceError::DuplicateEntity(format!(
                "user {username}"
            )));
        }
        if password.expose_secret() != confirm_password.expose_secret() {
            return Err(AccountServiceError::Validation(
                "passwords do not match".to_string(),
            ));
        }

        // No transaction is open while hashing; a concurrent insert of the
        // same username is caught by the insert below.
        let password_hash = hash_password(self.hasher.clone(), password.clone()).await?;
        let row = UserRow {
            id: Uuid::new_v4().to_string(),
            username: username.to_string(),
            password_hash,
            email: email.to_string(),
        };
        let mut tx = self.store.begin().await?;
        tx.insert_user(&row).await.map_err(|e| match e {
            RepositoryError::UsernameAlreadyExists => {
                AccountServiceError::DuplicateEntity(format!("user {username}"))
            }
            other => other.into(),
        })?;
        tx.commit().await?;

        tracing::info!(user_id = %row.id, username = %row.username, "user created");
        user_from_row(row, vec![])
    }

    #[tracing::instrument(skip(self))]
    pub async fn add_role_to_user(
        &self,
        username: &str,
        role_name: &str,
    ) -> Result<(), AccountServiceError> {
        let mut tx = self.store.begin().await?;
        let (user, role) = Self::resolve_user_and_role(tx.as_mut(), username, role_name).await?;
        tx.add_role_to_user(&user.id, &role).await?;
        tx.commit().await?;

        tracing::info!(username = %user.username, role = %role, "role added to user");
        Ok(())
    }

    #[tracing::instrument(skip(self))]
    pub async fn remove_role_from_user(
        &self,
        username: &str,
        role_name: &str,
    ) -> Result<(), AccountServiceError> {
        let mut tx = self.store.begin().await?;
        let (user, role) = Self::resolve_user_and_role(tx.as_mut(), username, role_name).await?;
        tx.remove_role_from_user(&user.id, &role).await?;
        tx.commit().await?;

        tracing::info!(username = %user.username, role = %role, "role removed from user");
        Ok(())
    }

    /// Returns `Ok(None)` when there is no such user. Usernames are matched
    /// after trimming, as they are stored by `add_new_user`.
    #[tracing::instrument(skip(self))]
    pub async fn load_user_by_username(
        &self,
        username: &str,
    ) -> Result<Option<User>, AccountServiceError> {
        let mut tx = self.store.begin().await?;
        let user = Self::load_user(tx.as_mut(), username.trim()).await?;
        tx.commit().await?;
        Ok(user)
    }

    #[tracing::instrument(skip(self))]
    pub async fn find_role(&self, name: &str) -> Result<Option<Role>, AccountServiceError> {
        let Ok(name) = RoleName::parse(name) else {
            return Ok(None);
        };
        let mut tx = self.store.begin().await?;
        let role = tx.find_role(&name).await?;
        tx.commit().await?;
        Ok(role.map(role_from_row))
    }

    pub async fn list_roles(&self) -> Result<Vec<Role>, AccountServiceError> {
        let mut tx = self.store.begin().await?;
        let roles = tx.list_roles().await?;
        tx.commit().await?;
        Ok(roles.into_iter().map(role_from_row).collect())
    }

    async fn resolve_user_and_role(
        tx: &mut dyn AccountTransaction,
        username: &str,
        role_name: &str,
    ) -> Result<(UserRow, RoleName), AccountServiceError> {
        let username = username.trim();
        let user = tx
            .find_user_by_username(username)
            .await?
            .ok_or_else(|| AccountServiceError::NotFound(format!("user {username}")))?;

        let role = RoleName::parse(role_name)
            .map_err(|_| AccountServiceError::NotFound(format!("role {role_name}")))?;
        let role = tx
            .find_role(&role)
            .await?
            .map(|row| RoleName::from_stored(row.name))
            .ok_or_else(|| AccountServiceError::NotFound(format!("role {role_name}")))?;

        Ok((user, role))
    }
}
