use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use secrecy::SecretString;

use hospital_lib::password::{
    BcryptPasswordHasher, PasswordHashError, PasswordHasher, MIN_BCRYPT_COST,
};
use hospital_lib::repository::{InMemoryAccountStore, InMemoryPatientRepository};
use hospital_lib::{
    seed_defaults, AccountService, AuthenticationError, Authenticator, PatientService, SeedConfig,
    SeedReport, ADMIN_ROLE, USER_ROLE,
};

fn secret(value: &str) -> SecretString {
    SecretString::new(value.to_string())
}

fn accounts() -> AccountService {
    AccountService::new(
        InMemoryAccountStore::new(),
        BcryptPasswordHasher::new(MIN_BCRYPT_COST),
    )
}

fn seed_config() -> SeedConfig {
    SeedConfig {
        password: secret("1234"),
        email_domain: "gmail.com".to_string(),
    }
}

#[tokio::test]
async fn authenticate_accepts_the_right_password_only() {
    let accounts = accounts();
    accounts.add_new_role(USER_ROLE).await.unwrap();
    accounts
        .add_new_user("user1", &secret("1234"), "user1@gmail.com", &secret("1234"))
        .await
        .unwrap();
    accounts.add_role_to_user("user1", USER_ROLE).await.unwrap();
    let authenticator = Authenticator::new(accounts);

    let principal = authenticator.authenticate("user1", &secret("1234")).await.unwrap();
    assert_eq!(principal.username, "user1");
    assert!(principal.has_role(USER_ROLE));
    assert!(!principal.has_role(ADMIN_ROLE));

    let wrong = authenticator.authenticate("user1", &secret("wrong")).await;
    assert!(matches!(wrong, Err(AuthenticationError::BadCredentials)));
}

#[tokio::test]
async fn load_principal_fails_for_unknown_user() {
    let authenticator = Authenticator::new(accounts());

    match authenticator.load_principal("ghost").await {
        Err(AuthenticationError::UserNotFound(name)) => assert_eq!(name, "ghost"),
        other => panic!("expected UserNotFound, got {other:?}"),
    }
}

#[tokio::test]
async fn seeded_admin_holds_both_roles() {
    let accounts = accounts();
    let patients = PatientService::new(InMemoryPatientRepository::new());
    seed_defaults(&accounts, &patients, &seed_config()).await.unwrap();

    let authenticator = Authenticator::new(accounts);
    let admin = authenticator.authenticate("admin", &secret("1234")).await.unwrap();
    assert!(admin.has_role(USER_ROLE));
    assert!(admin.has_role(ADMIN_ROLE));
    assert!(admin.has_any_role(&[ADMIN_ROLE]));

    let user2 = authenticator.load_principal("user2").await.unwrap();
    assert!(user2.has_role(USER_ROLE));
    assert!(!user2.has_any_role(&[ADMIN_ROLE]));
}

#[tokio::test]
async fn seeding_twice_creates_nothing_new() {
    let accounts = accounts();
    let patients = PatientService::new(InMemoryPatientRepository::new());

    let first = seed_defaults(&accounts, &patients, &seed_config()).await.unwrap();
    assert_eq!(
        first,
        SeedReport {
            roles_created: 2,
            users_created: 3,
            patients_created: 2,
        }
    );

    let second = seed_defaults(&accounts, &patients, &seed_config()).await.unwrap();
    assert_eq!(second, SeedReport::default());

    assert_eq!(accounts.list_roles().await.unwrap().len(), 2);
    assert_eq!(patients.count().await.unwrap(), 2);
    let admin = accounts.load_user_by_username("admin").await.unwrap().unwrap();
    assert_eq!(admin.roles.len(), 2);
}

/// Counts verify calls made through the hasher.
struct CountingHasher {
    inner: BcryptPasswordHasher,
    verifies: Arc<AtomicUsize>,
}

impl PasswordHasher for CountingHasher {
    fn hash(&self, plaintext: &str) -> Result<String, PasswordHashError> {
        self.inner.hash(plaintext)
    }

    fn verify(&self, plaintext: &str, hash: &str) -> Result<bool, PasswordHashError> {
        self.verifies.fetch_add(1, Ordering::SeqCst);
        self.inner.verify(plaintext, hash)
    }
}

#[tokio::test]
async fn unknown_user_costs_a_password_verify_too() {
    let verifies = Arc::new(AtomicUsize::new(0));
    let accounts = AccountService::new(
        InMemoryAccountStore::new(),
        CountingHasher {
            inner: BcryptPasswordHasher::new(MIN_BCRYPT_COST),
            verifies: verifies.clone(),
        },
    );
    accounts
        .add_new_user("user1", &secret("1234"), "user1@gmail.com", &secret("1234"))
        .await
        .unwrap();
    let authenticator = Authenticator::new(accounts);

    let wrong = authenticator.authenticate("user1", &secret("nope")).await;
    assert!(matches!(wrong, Err(AuthenticationError::BadCredentials)));
    assert_eq!(verifies.load(Ordering::SeqCst), 1);

    for attempt in 1..=2 {
        match authenticator.authenticate("ghost", &secret("1234")).await {
            Err(AuthenticationError::UserNotFound(name)) => assert_eq!(name, "ghost"),
            other => panic!("expected UserNotFound, got {other:?}"),
        }
        assert_eq!(verifies.load(Ordering::SeqCst), 1 + attempt);
    }

    // Misses leave real accounts unaffected.
    assert!(authenticator.authenticate("user1", &secret("1234")).await.is_ok());
}
