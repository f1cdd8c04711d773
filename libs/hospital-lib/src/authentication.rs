//! Bridges account lookups to the principal consumed by endpoint role guards.

use std::collections::BTreeSet;
use std::sync::Arc;

use secrecy::SecretString;
use serde::Serialize;
use tokio::sync::OnceCell;

use crate::account_service::AccountService;
use crate::entities::RoleName;
use crate::errors_service::AuthenticationError;
use crate::password::{hash_password, verify_password};

/// The authenticated identity: username, stored hash and flattened role names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Principal {
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub roles: BTreeSet<RoleName>,
}

impl Principal {
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r.as_str() == role)
    }

    pub fn has_any_role(&self, roles: &[&str]) -> bool {
        roles.iter().any(|role| self.has_role(role))
    }
}

const DUMMY_PASSWORD: &str = "unknown-user-placeholder";

#[derive(Debug, Clone)]
pub struct Authenticator {
    accounts: AccountService,
    // Hash checked for unknown usernames, built once with the configured cost.
    dummy_hash: Arc<OnceCell<String>>,
}

impl Authenticator {
    pub fn new(accounts: AccountService) -> Self {
        Self {
            accounts,
            dummy_hash: Arc::new(OnceCell::new()),
        }
    }

    async fn dummy_hash(&self) -> Result<String, AuthenticationError> {
        let hash = self
            .dummy_hash
            .get_or_try_init(|| {
                hash_password(
                    self.accounts.hasher(),
                    SecretString::new(DUMMY_PASSWORD.to_string()),
                )
            })
            .await?;
        Ok(hash.clone())
    }

    #[tracing::instrument(skip(self))]
    pub async fn load_principal(&self, username: &str) -> Result<Principal, AuthenticationError> {
        let user = self
            .accounts
            .load_user_by_username(username)
            .await?
            .ok_or_else(|| AuthenticationError::UserNotFound(username.to_string()))?;

        Ok(Principal {
            roles: user.role_names(),
            username: user.username,
            password_hash: user.password_hash,
        })
    }

    /// Resolves the principal and checks `password` against its stored hash.
    ///
    /// An unknown username is still checked against a dummy hash before
    /// `UserNotFound` is returned, so both failures take a full verify.
    #[tracing::instrument(skip(self, password))]
    pub async fn authenticate(
        &self,
        username: &str,
        password: &SecretString,
    ) -> Result<Principal, AuthenticationError> {
        let principal = match self.load_principal(username).await {
            Ok(principal) => principal,
            Err(AuthenticationError::UserNotFound(name)) => {
                let hash = self.dummy_hash().await?;
                verify_password(self.accounts.hasher(), password.clone(), hash).await?;
                return Err(AuthenticationError::UserNotFound(name));
            }
            Err(e) => return Err(e),
        };
        let matches = verify_password(
            self.accounts.hasher(),
            password.clone(),
            principal.password_hash.clone(),
        )
        .await?;

        if !matches {
            tracing::warn!(username = %username, "password mismatch");
            return Err(AuthenticationError::BadCredentials);
        }
        Ok(principal)
    }
}
