use std::collections::BTreeSet;
use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

pub const MAX_ROLE_NAME_LENGTH: usize = 255;

pub const DEFAULT_PAGE_SIZE: u32 = 4;
pub const MAX_PAGE_SIZE: u32 = 100;

/// Role identifier. The name is the key of a role, there is no surrogate id.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RoleName(String);

impl RoleName {
    pub fn parse(name: &str) -> Result<Self, String> {
        let name = name.trim();
        if name.is_empty() {
            return Err("role name cannot be empty".to_string());
        }
        if name.chars().count() > MAX_ROLE_NAME_LENGTH {
            return Err(format!(
                "role name cannot exceed {MAX_ROLE_NAME_LENGTH} characters"
            ));
        }
        Ok(Self(name.to_string()))
    }

    /// Wraps a name read back from storage, where it was validated on insert.
    pub(crate) fn from_stored(name: String) -> Self {
        Self(name)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoleName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for RoleName {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<RoleName> for String {
    fn from(value: RoleName) -> Self {
        value.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Role {
    pub name: RoleName,
}

impl Role {
    pub fn new(name: RoleName) -> Self {
        Self { name }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub email: String,
    pub roles: BTreeSet<Role>,
}

impl User {
    pub fn has_role(&self, name: &RoleName) -> bool {
        self.roles.iter().any(|role| &role.name == name)
    }

    pub fn role_names(&self) -> BTreeSet<RoleName> {
        self.roles.iter().map(|role| role.name.clone()).collect()
    }
}

/// A patient record. `id` is `None` until the record has been stored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Validate)]
pub struct Patient {
    pub id: Option<i64>,
    #[validate(length(min = 4, max = 40, message = "name must be between 4 and 40 characters"))]
    pub name: String,
    pub birth_date: NaiveDate,
    pub sick: bool,
    #[validate(range(min = 1, message = "score must be at least 1"))]
    pub score: i32,
}

impl Patient {
    pub fn new(name: impl Into<String>, birth_date: NaiveDate, sick: bool, score: i32) -> Self {
        Self {
            id: None,
            name: name.into(),
            birth_date,
            sick,
            score,
        }
    }
}

/// Zero-based page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationParams {
    pub page: u32,
    pub page_size: u32,
}

impl Default for PaginationParams {
    fn default() -> Self {
        Self {
            page: 0,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl PaginationParams {
    pub fn new(page: Option<u32>, page_size: Option<u32>) -> Self {
        Self {
            page: page.unwrap_or(0),
            page_size: page_size
                .unwrap_or(DEFAULT_PAGE_SIZE)
                .clamp(1, MAX_PAGE_SIZE),
        }
    }

    pub fn offset(&self) -> u64 {
        u64::from(self.page) * u64::from(self.limit())
    }

    pub fn limit(&self) -> u32 {
        self.page_size.max(1)
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct PaginatedResult<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u32,
    pub page_size: u32,
    pub total_pages: u32,
}

impl<T> PaginatedResult<T> {
    pub fn new(items: Vec<T>, total: u64, pagination: PaginationParams) -> Self {
        let page_size = pagination.limit();
        let total_pages = total.div_ceil(u64::from(page_size));
        Self {
            items,
            total,
            page: pagination.page,
            page_size,
            total_pages: u32::try_from(total_pages).unwrap_or(u32::MAX),
        }
    }
}
