//! In-process stores used when no database is configured, and by the tests.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{Mutex, OwnedMutexGuard, RwLock};

use crate::entities::{Patient, PaginationParams, RoleName};
use crate::repository::errors::RepositoryError;
use crate::repository::models::{PatientRow, RoleRow, UserRow};
use crate::repository::traits::{AccountStore, AccountTransaction, PatientRepositoryTrait};

#[derive(Debug, Clone, Default)]
struct AccountData {
    roles: BTreeSet<String>,
    /// Keyed by username.
    users: BTreeMap<String, UserRow>,
    /// (user id, role name)
    user_roles: BTreeSet<(String, String)>,
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryAccountStore {
    data: Arc<Mutex<AccountData>>,
}

impl InMemoryAccountStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AccountStore for InMemoryAccountStore {
    async fn begin(&self) -> Result<Box<dyn AccountTransaction>, RepositoryError> {
        let guard = self.data.clone().lock_owned().await;
        let working = guard.clone();
        Ok(Box::new(InMemoryAccountTransaction { guard, working }))
    }
}

/// Holds the store lock for its whole lifetime, so transactions are serialised.
/// Changes go to `working` and are only written back on commit.
struct InMemoryAccountTransaction {
    guard: OwnedMutexGuard<AccountData>,
    working: AccountData,
}

#[async_trait]
impl AccountTransaction for InMemoryAccountTransaction {
    async fn find_role(&mut self, name: &RoleName) -> Result<Option<RoleRow>, RepositoryError> {
        Ok(self.working.roles.get(name.as_str()).map(|name| RoleRow {
            name: name.clone(),
        }))
    }

    async fn insert_role(&mut self, name: &RoleName) -> Result<RoleRow, RepositoryError> {
        if !self.working.roles.insert(name.as_str().to_string()) {
            return Err(RepositoryError::RoleAlreadyExists);
        }
        Ok(RoleRow {
            name: name.as_str().to_string(),
        })
    }

    async fn list_roles(&mut self) -> Result<Vec<RoleRow>, RepositoryError> {
        Ok(self
            .working
            .roles
            .iter()
            .map(|name| RoleRow { name: name.clone() })
            .collect())
    }

    async fn find_user_by_username(
        &mut self,
        username: &str,
    ) -> Result<Option<UserRow>, RepositoryError> {
        Ok(self.working.users.get(username).cloned())
    }

    async fn insert_user(&mut self, user: &UserRow) -> Result<(), RepositoryError> {
        if self.working.users.contains_key(&user.username) {
            return Err(RepositoryError::UsernameAlreadyExists);
        }
        self.working.users.insert(user.username.clone(), user.clone());
        Ok(())
    }

    async fn roles_for_user(&mut self, user_id: &str) -> Result<Vec<RoleRow>, RepositoryError> {
        Ok(self
            .working
            .user_roles
            .iter()
            .filter(|(owner, _)| owner == user_id)
            .map(|(_, role)| RoleRow { name: role.clone() })
            .collect())
    }

    async fn add_role_to_user(
        &mut self,
        user_id: &str,
        role: &RoleName,
    ) -> Result<(), RepositoryError> {
        self.working
            .user_roles
            .insert((user_id.to_string(), role.as_str().to_string()));
        Ok(())
    }

    async fn remove_role_from_user(
        &mut self,
        user_id: &str,
        role: &RoleName,
    ) -> Result<(), RepositoryError> {
        self.working
            .user_roles
            .remove(&(user_id.to_string(), role.as_str().to_string()));
        Ok(())
    }

    async fn commit(self: Box<Self>) -> Result<(), RepositoryError> {
        let InMemoryAccountTransaction { mut guard, working } = *self;
        *guard = working;
        Ok(())
    }
}

#[derive(Debug, Default)]
struct PatientData {
    next_id: i64,
    /// Keyed by id, which also gives insertion order.
    patients: BTreeMap<i64, PatientRow>,
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryPatientRepository {
    data: Arc<RwLock<PatientData>>,
}

impl InMemoryPatientRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn row_for(id: i64, patient: &Patient) -> PatientRow {
    PatientRow {
        id,
        name: patient.name.clone(),
        birth_date: patient.birth_date,
        sick: patient.sick,
        score: patient.score,
    }
}

#[async_trait]
impl PatientRepositoryTrait for InMemoryPatientRepository {
    async fn find_by_keyword(
        &self,
        keyword: &str,
        pagination: PaginationParams,
    ) -> Result<(Vec<PatientRow>, u64), RepositoryError> {
        let data = self.data.read().await;
        let matches: Vec<&PatientRow> = data
            .patients
            .values()
            .filter(|row| row.name.contains(keyword))
            .collect();

        let total = matches.len() as u64;
        let offset = usize::try_from(pagination.offset()).unwrap_or(usize::MAX);
        let limit = usize::try_from(pagination.limit()).unwrap_or(usize::MAX);
        let page = matches
            .into_iter()
            .skip(offset)
            .take(limit)
            .cloned()
            .collect();

        Ok((page, total))
    }

    async fn find_all(&self) -> Result<Vec<PatientRow>, RepositoryError> {
        Ok(self.data.read().await.patients.values().cloned().collect())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<PatientRow>, RepositoryError> {
        Ok(self.data.read().await.patients.get(&id).cloned())
    }

    async fn insert(&self, patient: &Patient) -> Result<PatientRow, RepositoryError> {
        let mut data = self.data.write().await;
        data.next_id += 1;
        let row = row_for(data.next_id, patient);
        data.patients.insert(row.id, row.clone());
        Ok(row)
    }

    async fn update(&self, id: i64, patient: &Patient) -> Result<Option<PatientRow>, RepositoryError> {
        let mut data = self.data.write().await;
        match data.patients.get_mut(&id) {
            Some(existing) => {
                *existing = row_for(id, patient);
                Ok(Some(existing.clone()))
            }
            None => Ok(None),
        }
    }

    async fn delete_by_id(&self, id: i64) -> Result<bool, RepositoryError> {
        Ok(self.data.write().await.patients.remove(&id).is_some())
    }

    async fn count(&self) -> Result<u64, RepositoryError> {
        Ok(self.data.read().await.patients.len() as u64)
    }
}
