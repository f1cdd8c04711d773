/// Default data initialization
///
/// Creates the default roles, accounts and sample patients. Every step checks
/// for existing data first, so running it again changes nothing.
use chrono::NaiveDate;
use secrecy::{ExposeSecret, SecretString};

use crate::account_service::AccountService;
use crate::entities::Patient;
use crate::errors_service::{AccountServiceError, PatientServiceError};
use crate::patient_service::PatientService;

pub const USER_ROLE: &str = "USER";
pub const ADMIN_ROLE: &str = "ADMIN";

pub const SEED_USER_PASSWORD: &str = "SEED_USER_PASSWORD";
pub const SEED_EMAIL_DOMAIN: &str = "SEED_EMAIL_DOMAIN";

#[derive(Debug, thiserror::Error)]
pub enum SeedError {
    #[error(transparent)]
    Account(#[from] AccountServiceError),

    #[error(transparent)]
    Patient(#[from] PatientServiceError),
}

/// Configuration for the seeding step
#[derive(Debug, Clone)]
pub struct SeedConfig {
    /// Password given to every seeded account
    pub password: SecretString,
    pub email_domain: String,
}

impl SeedConfig {
    /// Load seed configuration from environment variables
    pub fn from_env() -> Result<Self, String> {
        let password = std::env::var(SEED_USER_PASSWORD)
            .map_err(|_| format!("{SEED_USER_PASSWORD} environment variable not set"))?;

        if password.is_empty() {
            return Err(format!("{SEED_USER_PASSWORD} cannot be empty"));
        }

        let email_domain =
            std::env::var(SEED_EMAIL_DOMAIN).unwrap_or_else(|_| "example.com".to_string());

        Ok(Self {
            password: SecretString::new(password),
            email_domain,
        })
    }
}

/// What a seeding run actually created.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SeedReport {
    pub roles_created: usize,
    pub users_created: usize,
    pub patients_created: usize,
}

const SEED_ACCOUNTS: [(&str, &[&str]); 3] = [
    ("user1", &[USER_ROLE]),
    ("user2", &[USER_ROLE]),
    ("admin", &[USER_ROLE, ADMIN_ROLE]),
];

fn sample_patients() -> Vec<Patient> {
    let birth_date = NaiveDate::from_ymd_opt(2000, 11, 10).unwrap_or(NaiveDate::MIN);
    vec![
        Patient::new("mohamed", birth_date, true, 80),
        Patient::new("noura", birth_date, true, 80),
    ]
}

/// Seed roles, accounts and sample patients.
///
/// This function:
/// 1. Creates the `USER` and `ADMIN` roles when missing
/// 2. Creates `user1`, `user2` and `admin` when missing and grants their roles
/// 3. Inserts the sample patients only if there are no patients at all
pub async fn seed_defaults(
    accounts: &AccountService,
    patients: &PatientService,
    config: &SeedConfig,
) -> Result<SeedReport, SeedError> {
    let mut report = SeedReport::default();

    for role in [USER_ROLE, ADMIN_ROLE] {
        if accounts.find_role(role).await?.is_none() {
            accounts.add_new_role(role).await?;
            report.roles_created += 1;
        }
    }

    for (username, roles) in SEED_ACCOUNTS {
        if accounts.load_user_by_username(username).await?.is_some() {
            tracing::info!(username = %username, "seed user already exists");
        } else {
            let email = format!("{username}@{}", config.email_domain);
            let confirm = SecretString::new(config.password.expose_secret().clone());
            accounts
                .add_new_user(username, &config.password, &email, &confirm)
                .await?;
            report.users_created += 1;
        }

        // Granting is idempotent, so existing users are topped up as well.
        for role in roles {
            accounts.add_role_to_user(username, role).await?;
        }
    }

    if patients.count().await? == 0 {
        for patient in sample_patients() {
            patients.save(&patient).await?;
            report.patients_created += 1;
        }
    } else {
        tracing::info!("patients already present, skipping sample patients");
    }

    tracing::info!(
        roles_created = report.roles_created,
        users_created = report.users_created,
        patients_created = report.patients_created,
        "seeding finished"
    );
    Ok(report)
}
