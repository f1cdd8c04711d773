pub mod given;
pub mod then_account;
pub mod then_patient;
pub mod when_account;
pub mod when_patient;
