pub mod create_patient;
pub mod create_role;
pub mod create_user;
pub mod delete_patient;
pub mod entities;
pub mod get_patient;
pub mod get_roles;
pub mod get_user;
pub mod health_check;
pub mod me;
pub mod routes;
pub mod search_patients;
pub mod update_patient;
pub mod user_roles;
