pub mod entities;
pub mod repository;
pub mod util;
pub mod password;
pub mod account_service;
pub mod authentication;
pub mod patient_service;
pub mod errors_service;
pub mod seed;

pub use entities::*;
pub use account_service::*;
pub use authentication::*;
pub use patient_service::*;
pub use errors_service::*;
pub use seed::*;
