use chrono::NaiveDate;
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use hospital_lib::{PaginatedResult, PaginationParams, Patient, Principal, Role, User};

#[derive(Debug, Deserialize, IntoParams)]
pub struct PatientSearchQuery {
    /// Case-sensitive substring of the patient name. Empty matches everyone.
    pub keyword: Option<String>,
    /// Zero-based page index
    pub page: Option<u32>,
    pub size: Option<u32>,
}

impl PatientSearchQuery {
    pub fn keyword(&self) -> &str {
        self.keyword.as_deref().unwrap_or("")
    }

    pub fn pagination(&self) -> PaginationParams {
        PaginationParams::new(self.page, self.size)
    }
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct PatientRequest {
    pub name: String,
    #[schema(value_type = String, format = Date, example = "2000-11-10")]
    pub birth_date: NaiveDate,
    #[serde(default)]
    pub sick: bool,
    pub score: i32,
}

impl PatientRequest {
    pub fn into_patient(self, id: Option<i64>) -> Patient {
        Patient {
            id,
            name: self.name,
            birth_date: self.birth_date,
            sick: self.sick,
            score: self.score,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct PatientResponse {
    pub id: i64,
    pub name: String,
    #[schema(value_type = String, format = Date)]
    pub birth_date: NaiveDate,
    pub sick: bool,
    pub score: i32,
}

impl From<Patient> for PatientResponse {
    fn from(patient: Patient) -> Self {
        PatientResponse {
            id: patient.id.unwrap_or_default(),
            name: patient.name,
            birth_date: patient.birth_date,
            sick: patient.sick,
            score: patient.score,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, ToSchema, Validate)]
pub struct CreateRoleRequest {
    #[validate(length(min = 1, max = 255, message = "role name must be between 1 and 255 characters"))]
    pub name: String,
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct RoleResponse {
    pub name: String,
}

impl From<Role> for RoleResponse {
    fn from(role: Role) -> Self {
        RoleResponse {
            name: role.name.into(),
        }
    }
}

#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct CreateUserRequest {
    #[validate(length(min = 1, max = 255, message = "username must be between 1 and 255 characters"))]
    pub username: String,
    #[schema(value_type = String, format = Password)]
    pub password: SecretString,
    #[schema(value_type = String, format = Password)]
    pub confirm_password: SecretString,
    #[validate(email(message = "invalid email address"))]
    pub email: String,
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct UserResponse {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub roles: Vec<String>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        UserResponse {
            id: user.id,
            username: user.username,
            email: user.email,
            roles: user.roles.into_iter().map(|r| r.name.into()).collect(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct PrincipalResponse {
    pub username: String,
    pub roles: Vec<String>,
}

impl From<Principal> for PrincipalResponse {
    fn from(principal: Principal) -> Self {
        PrincipalResponse {
            username: principal.username,
            roles: principal.roles.into_iter().map(String::from).collect(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct PaginatedResponse<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u32,
    pub page_size: u32,
    pub total_pages: u32,
}

impl<T, U> From<PaginatedResult<T>> for PaginatedResponse<U>
where
    U: From<T>,
{
    fn from(result: PaginatedResult<T>) -> Self {
        PaginatedResponse {
            items: result.items.into_iter().map(U::from).collect(),
            total: result.total,
            page: result.page,
            page_size: result.page_size,
            total_pages: result.total_pages,
        }
    }
}
