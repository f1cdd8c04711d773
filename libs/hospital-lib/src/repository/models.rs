use chrono::NaiveDate;
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct UserRow {
    pub id: String,
    pub username: String,
    pub password_hash: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, FromRow)]
pub struct RoleRow {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct PatientRow {
    pub id: i64,
    pub name: String,
    pub birth_date: NaiveDate,
    pub sick: bool,
    pub score: i32,
}
