use hospital_lib::{AccountService, Authenticator, PatientService};

use crate::error::is_prod_like;

#[derive(Clone, Debug)]
pub struct AppState {
    pub accounts: AccountService,
    pub patients: PatientService,
    pub authenticator: Authenticator,
    pub env: String,
}

impl AppState {
    pub fn new(accounts: AccountService, patients: PatientService, env: impl Into<String>) -> Self {
        Self {
            authenticator: Authenticator::new(accounts.clone()),
            accounts,
            patients,
            env: env.into(),
        }
    }

    pub fn is_prod_like(&self) -> bool {
        is_prod_like(&self.env)
    }
}
