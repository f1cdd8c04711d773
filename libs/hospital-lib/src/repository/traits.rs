use async_trait::async_trait;

use crate::entities::{Patient, PaginationParams, RoleName};
use crate::repository::errors::RepositoryError;
use crate::repository::models::{PatientRow, RoleRow, UserRow};

/// Entry point to the role and user tables. Every account operation runs in
/// the transaction returned by [`AccountStore::begin`].
#[async_trait]
pub trait AccountStore: Send + Sync {
    async fn begin(&self) -> Result<Box<dyn AccountTransaction>, RepositoryError>;
}

/// A unit of work over roles, users and their associations.
///
/// Dropping the transaction without calling [`AccountTransaction::commit`]
/// discards every change made through it.
#[async_trait]
pub trait AccountTransaction: Send {
    async fn find_role(&mut self, name: &RoleName) -> Result<Option<RoleRow>, RepositoryError>;
    async fn insert_role(&mut self, name: &RoleName) -> Result<RoleRow, RepositoryError>;
    async fn list_roles(&mut self) -> Result<Vec<RoleRow>, RepositoryError>;
    async fn find_user_by_username(
        &mut self,
        username: &str,
    ) -> Result<Option<UserRow>, RepositoryError>;
    async fn insert_user(&mut self, user: &UserRow) -> Result<(), RepositoryError>;
    async fn roles_for_user(&mut self, user_id: &str) -> Result<Vec<RoleRow>, RepositoryError>;
    /// Adding a role the user already has is not an error.
    async fn add_role_to_user(
        &mut self,
        user_id: &str,
        role: &RoleName,
    ) -> Result<(), RepositoryError>;
    async fn remove_role_from_user(
        &mut self,
        user_id: &str,
        role: &RoleName,
    ) -> Result<(), RepositoryError>;
    async fn commit(self: Box<Self>) -> Result<(), RepositoryError>;
}

#[async_trait]
pub trait PatientRepositoryTrait: Send + Sync {
    /// Patients whose name contains `keyword` (case-sensitive), in id order,
    /// together with the total number of matches.
    async fn find_by_keyword(
        &self,
        keyword: &str,
        pagination: PaginationParams,
    ) -> Result<(Vec<PatientRow>, u64), RepositoryError>;
    async fn find_all(&self) -> Result<Vec<PatientRow>, RepositoryError>;
    async fn find_by_id(&self, id: i64) -> Result<Option<PatientRow>, RepositoryError>;
    async fn insert(&self, patient: &Patient) -> Result<PatientRow, RepositoryError>;
    /// Returns `None` when no patient has the given id.
    async fn update(&self, id: i64, patient: &Patient) -> Result<Option<PatientRow>, RepositoryError>;
    /// Returns whether a record was removed.
    async fn delete_by_id(&self, id: i64) -> Result<bool, RepositoryError>;
    async fn count(&self) -> Result<u64, RepositoryError>;
}
