pub mod account_repository;
pub mod patient_repository;
pub mod memory;
pub mod models;
pub mod errors;
pub mod traits;

pub use account_repository::{MySqlAccountStore, MySqlAccountTransaction};
pub use patient_repository::PatientRepository;
pub use memory::{InMemoryAccountStore, InMemoryPatientRepository};
pub use errors::RepositoryError;
