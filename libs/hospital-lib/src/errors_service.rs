use crate::password::PasswordHashError;
use crate::repository::errors::RepositoryError;

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum AccountServiceError {
    #[error("{0} already exists")]
    DuplicateEntity(String),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("{0} not found")]
    NotFound(String),

    #[error("invalid UUID in database: {0}")]
    InvalidUuid(String),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl From<RepositoryError> for AccountServiceError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::UsernameAlreadyExists => {
                AccountServiceError::DuplicateEntity("user".to_string())
            }
            RepositoryError::RoleAlreadyExists => {
                AccountServiceError::DuplicateEntity("role".to_string())
            }
            other => AccountServiceError::Internal(other.into()),
        }
    }
}

impl From<PasswordHashError> for AccountServiceError {
    fn from(err: PasswordHashError) -> Self {
        AccountServiceError::Internal(err.into())
    }
}

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum AuthenticationError {
    #[error("user {0} not found")]
    UserNotFound(String),

    #[error("bad credentials")]
    BadCredentials,

    #[error(transparent)]
    Account(#[from] AccountServiceError),
}

impl From<PasswordHashError> for AuthenticationError {
    fn from(err: PasswordHashError) -> Self {
        AuthenticationError::Account(err.into())
    }
}

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum PatientServiceError {
    #[error("validation error: {0}")]
    Validation(String),

    #[error("patient {0} not found")]
    NotFound(i64),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl From<RepositoryError> for PatientServiceError {
    fn from(err: RepositoryError) -> Self {
        PatientServiceError::Internal(err.into())
    }
}

impl From<validator::ValidationErrors> for PatientServiceError {
    fn from(errors: validator::ValidationErrors) -> Self {
        PatientServiceError::Validation(errors.to_string())
    }
}
