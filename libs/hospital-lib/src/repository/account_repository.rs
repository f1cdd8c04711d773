use async_trait::async_trait;
use sqlx::{query, query_as, MySql, MySqlPool, Transaction};

use crate::entities::RoleName;
use crate::repository::errors::{map_sqlx_error, RepositoryError};
use crate::repository::models::{RoleRow, UserRow};
use crate::repository::traits::{AccountStore, AccountTransaction};

#[derive(Debug, Clone)]
pub struct MySqlAccountStore {
    pub pool: MySqlPool,
}

impl MySqlAccountStore {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AccountStore for MySqlAccountStore {
    async fn begin(&self) -> Result<Box<dyn AccountTransaction>, RepositoryError> {
        let tx = self.pool.begin().await.map_err(map_sqlx_error)?;
        Ok(Box::new(MySqlAccountTransaction { tx }))
    }
}

/// Rolled back by sqlx when dropped before `commit`.
pub struct MySqlAccountTransaction {
    tx: Transaction<'static, MySql>,
}

#[async_trait]
impl AccountTransaction for MySqlAccountTransaction {
    async fn find_role(&mut self, name: &RoleName) -> Result<Option<RoleRow>, RepositoryError> {
        let role = query_as::<_, RoleRow>(r#"SELECT name FROM roles WHERE name = ?"#)
            .bind(name.as_str())
            .fetch_optional(&mut *self.tx)
            .await
            .map_err(map_sqlx_error)?;
        Ok(role)
    }

    async fn insert_role(&mut self, name: &RoleName) -> Result<RoleRow, RepositoryError> {
        query(
            r#"
            INSERT INTO roles (name)
            VALUES (?)
            "#,
        )
        .bind(name.as_str())
        .execute(&mut *self.tx)
        .await
        .map_err(map_sqlx_error)?;

        Ok(RoleRow {
            name: name.as_str().to_string(),
        })
    }

    async fn list_roles(&mut self) -> Result<Vec<RoleRow>, RepositoryError> {
        let roles = query_as::<_, RoleRow>(r#"SELECT name FROM roles ORDER BY name"#)
            .fetch_all(&mut *self.tx)
            .await
            .map_err(map_sqlx_error)?;
        Ok(roles)
    }

    async fn find_user_by_username(
        &mut self,
        username: &str,
    ) -> Result<Option<UserRow>, RepositoryError> {
        let user = query_as::<_, UserRow>(
            r#"
            SELECT id, username, password_hash, email
            FROM users
            WHERE username = ?
            "#,
        )
        .bind(username)
        .fetch_optional(&mut *self.tx)
        .await
        .map_err(map_sqlx_error)?;
        Ok(user)
    }

    async fn insert_user(&mut self, user: &UserRow) -> Result<(), RepositoryError> {
        query(
            r#"
            INSERT INTO users (id, username, password_hash, email)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(&user.id)
        .bind(&user.username)
        .bind(&user.password_hash)
        .bind(&user.email)
        .execute(&mut *self.tx)
        .await
        .map_err(map_sqlx_error)?;
        Ok(())
    }

    async fn roles_for_user(&mut self, user_id: &str) -> Result<Vec<RoleRow>, RepositoryError> {
        let roles = query_as::<_, RoleRow>(
            r#"
            SELECT r.name
            FROM roles r
            INNER JOIN user_roles ur ON ur.role_name = r.name
            WHERE ur.user_id = ?
            ORDER BY r.name
            "#,
        )
        .bind(user_id)
        .fetch_all(&mut *self.tx)
        .await
        .map_err(map_sqlx_error)?;
        Ok(roles)
    }

    async fn add_role_to_user(
        &mut self,
        user_id: &str,
        role: &RoleName,
    ) -> Result<(), RepositoryError> {
        query(
            r#"
            INSERT IGNORE INTO user_roles (user_id, role_name)
            VALUES (?, ?)
            "#,
        )
        .bind(user_id)
        .bind(role.as_str())
        .execute(&mut *self.tx)
        .await
        .map_err(map_sqlx_error)?;
        Ok(())
    }

    async fn remove_role_from_user(
        &mut self,
        user_id: &str,
        role: &RoleName,
    ) -> Result<(), RepositoryError> {
        query(
            r#"
            DELETE FROM user_roles
            WHERE user_id = ? AND role_name = ?
            "#,
        )
        .bind(user_id)
        .bind(role.as_str())
        .execute(&mut *self.tx)
        .await
        .map_err(map_sqlx_error)?;
        Ok(())
    }

    async fn commit(self: Box<Self>) -> Result<(), RepositoryError> {
        let this = *self;
        this.tx.commit().await.map_err(map_sqlx_error)
    }
}
