use cucumber::World;

use hospital_lib::password::{BcryptPasswordHasher, MIN_BCRYPT_COST};
use hospital_lib::repository::{InMemoryAccountStore, InMemoryPatientRepository};
use hospital_lib::{
    AccountService, AccountServiceError, AuthenticationError, Authenticator, PaginatedResult,
    Patient, PatientService, PatientServiceError, Principal, User,
};

#[derive(Debug, World)]
#[world(init = Self::new)]
pub struct TestWorld {
    // Services over fresh in-memory stores
    pub accounts: AccountService,
    pub authenticator: Authenticator,
    pub patient_repo: InMemoryPatientRepository,
    pub patients: PatientService,

    // Results
    pub user_result: Option<Result<User, AccountServiceError>>,
    pub role_op_result: Option<Result<(), AccountServiceError>>,
    pub auth_result: Option<Result<Principal, AuthenticationError>>,
    pub save_result: Option<Result<Patient, PatientServiceError>>,
    pub delete_result: Option<Result<(), PatientServiceError>>,
    pub page_result: Option<Result<PaginatedResult<Patient>, PatientServiceError>>,
}

impl TestWorld {
    pub fn new() -> Self {
        let accounts = AccountService::new(
            InMemoryAccountStore::new(),
            BcryptPasswordHasher::new(MIN_BCRYPT_COST),
        );
        let patient_repo = InMemoryPatientRepository::new();
        Self {
            authenticator: Authenticator::new(accounts.clone()),
            accounts,
            patients: PatientService::new(patient_repo.clone()),
            patient_repo,
            user_result: None,
            role_op_result: None,
            auth_result: None,
            save_result: None,
            delete_result: None,
            page_result: None,
        }
    }
}
