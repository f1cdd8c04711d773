// apps/backcli/src/main.rs

use clap::{Arg, ArgAction, Command};
use std::process;

use hospital_lib::password::{BcryptPasswordHasher, DEFAULT_BCRYPT_COST};
use hospital_lib::repository::{MySqlAccountStore, PatientRepository};
use hospital_lib::util::{connect_with_retry, run_migrations};
use hospital_lib::{seed_defaults, AccountService, PatientService, SeedConfig};
use tracing_subscriber::EnvFilter;

const DATABASE_URL: &str = "DATABASE_URL";
const CONNECT_RETRIES: u32 = 10;

fn cli() -> Command {
    Command::new("backcli")
        .about("Hospital backend CLI utility")
        .arg(
            Arg::new("migrations")
                .long("migrations")
                .action(ArgAction::SetTrue)
                .help("Execute database migrations"),
        )
        .arg(
            Arg::new("seed")
                .long("seed")
                .action(ArgAction::SetTrue)
                .help("Create the default roles, accounts and sample patients when missing"),
        )
        .arg(
            Arg::new("bcrypt-cost")
                .long("bcrypt-cost")
                .value_parser(clap::value_parser!(u32))
                .help("bcrypt cost used for seeded passwords [default: bcrypt's default cost]"),
        )
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let matches = cli().get_matches();
    let migrations = matches.get_flag("migrations");
    let seed = matches.get_flag("seed");
    let bcrypt_cost = matches
        .get_one::<u32>("bcrypt-cost")
        .copied()
        .unwrap_or(DEFAULT_BCRYPT_COST);

    if !migrations && !seed {
        tracing::warn!("nothing to do, pass --migrations and/or --seed");
        return;
    }

    if let Err(e) = run(migrations, seed, bcrypt_cost).await {
        tracing::error!(error = %e, "backcli failed");
        process::exit(1);
    }
}

async fn run(migrations: bool, seed: bool, bcrypt_cost: u32) -> Result<(), Box<dyn std::error::Error>> {
    let db_url = std::env::var(DATABASE_URL)
        .map_err(|_| format!("{DATABASE_URL} must be set"))?;
    let pool = connect_with_retry(&db_url, CONNECT_RETRIES).await?;

    if migrations {
        tracing::info!("running hospital-lib migrations");
        run_migrations(&pool).await?;
    }

    if seed {
        let config = SeedConfig::from_env()?;
        let accounts = AccountService::new(
            MySqlAccountStore::new(pool.clone()),
            BcryptPasswordHasher::new(bcrypt_cost),
        );
        let patients = PatientService::new(PatientRepository::new(pool));
        let report = seed_defaults(&accounts, &patients, &config).await?;
        tracing::info!(
            roles = report.roles_created,
            users = report.users_created,
            patients = report.patients_created,
            "seed applied"
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_valid() {
        cli().debug_assert();
    }

    #[test]
    fn parses_flags() {
        let matches = cli()
            .try_get_matches_from(["backcli", "--migrations", "--seed", "--bcrypt-cost", "6"])
            .unwrap();
        assert!(matches.get_flag("migrations"));
        assert!(matches.get_flag("seed"));
        assert_eq!(matches.get_one::<u32>("bcrypt-cost"), Some(&6));
    }

    #[test]
    fn bcrypt_cost_defaults() {
        let matches = cli().try_get_matches_from(["backcli"]).unwrap();
        assert!(!matches.get_flag("seed"));
        assert!(matches.get_one::<u32>("bcrypt-cost").is_none());
    }
}
