#[derive(Debug)]
pub enum RepositoryError {
    UsernameAlreadyExists,
    RoleAlreadyExists,
    Inconsistent(String),
    Sqlx(sqlx::Error),
}

impl std::fmt::Display for RepositoryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RepositoryError::UsernameAlreadyExists => write!(f, "username already exists"),
            RepositoryError::RoleAlreadyExists => write!(f, "role already exists"),
            RepositoryError::Inconsistent(msg) => write!(f, "inconsistent stored data: {msg}"),
            RepositoryError::Sqlx(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for RepositoryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RepositoryError::UsernameAlreadyExists => None,
            RepositoryError::RoleAlreadyExists => None,
            RepositoryError::Inconsistent(_) => None,
            RepositoryError::Sqlx(e) => Some(e),
        }
    }
}

impl From<sqlx::Error> for RepositoryError {
    fn from(value: sqlx::Error) -> Self {
        map_sqlx_error(value)
    }
}

fn extract_mysql_key_name(msg_lower: &str) -> Option<String> {
    let marker = "for key '";
    let start = msg_lower.find(marker)? + marker.len();
    let rest = msg_lower.get(start..)?;
    let end = rest.find('\'')?;
    rest.get(..end).map(str::to_string)
}

pub fn map_sqlx_error(err: sqlx::Error) -> RepositoryError {
    const USER_USERNAME_UNIQUE: &str = "user_username_unique";
    const ROLES_PRIMARY: &str = "roles.primary";

    if let sqlx::Error::Database(db_err) = &err {
        // MySQL reports duplicate keys as SQLSTATE 23000 with a message like
        // "Duplicate entry 'admin' for key 'users.user_username_unique'".
        let msg = db_err.message().to_lowercase();
        let is_duplicate_key = db_err.code().as_deref() == Some("23000")
            && msg.contains("duplicate entry")
            && msg.contains("for key");

        if is_duplicate_key {
            let key = extract_mysql_key_name(&msg).unwrap_or_default();

            if key.ends_with(USER_USERNAME_UNIQUE) {
                return RepositoryError::UsernameAlreadyExists;
            }

            if key.ends_with(ROLES_PRIMARY) {
                return RepositoryError::RoleAlreadyExists;
            }
        }
    }

    RepositoryError::Sqlx(err)
}
