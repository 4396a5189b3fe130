//! Command-line entry point.
//!
//! # Responsibility
//! - Wire configuration, logging, storage, the ViaCEP client and the employee
//!   service once per process.
//! - Map each subcommand onto one service operation and print JSON to stdout.

use clap::{Args, Parser, Subcommand};
use log::error;
use serde::Serialize;
use staffbook_core::db::open_db;
use staffbook_core::{
    core_version, init_logging, logging_status, AppConfig, Employee, EmployeeId, EmployeeService,
    SqliteAddressRepository, SqliteEmployeeRepository, ViaCepClient,
};
use std::error::Error;
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(
    name = "staffbook",
    version,
    about = "Employee records with postal addresses resolved once per postal code"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List every employee
    List,
    /// Show one employee by id
    Get { id: EmployeeId },
    /// Show one employee by personal code
    GetByCode { personal_code: String },
    /// Create an employee
    Insert(EmployeeArgs),
    /// Replace an existing employee
    Update {
        id: EmployeeId,
        #[command(flatten)]
        employee: EmployeeArgs,
    },
    /// Delete an employee by id
    Delete { id: EmployeeId },
    /// Print the core version
    Version,
}

#[derive(Debug, Args)]
struct EmployeeArgs {
    #[arg(long)]
    name: String,
    #[arg(long)]
    personal_code: String,
    /// Postal code of the employee's address, e.g. 20040-020
    #[arg(long)]
    postal_code: String,
}

impl From<EmployeeArgs> for Employee {
    fn from(args: EmployeeArgs) -> Self {
        Employee::new(args.name, args.personal_code, args.postal_code)
    }
}

fn main() -> ExitCode {
    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => report_failure(err.as_ref()),
    }
}

/// Prints the failure; the log record is only emitted once a logger exists.
fn report_failure(err: &dyn Error) -> ExitCode {
    if logging_status().is_some() {
        error!("event=cli_command module=cli status=error error={err}");
    }
    eprintln!("error: {err}");
    ExitCode::FAILURE
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    if matches!(cli.command, Command::Version) {
        return print_version();
    }

    let config = AppConfig::from_env()?;
    init_logging(config.log_level, config.log_dir.as_deref())?;

    let conn = open_db(&config.db_path)?;
    let service = EmployeeService::new(
        SqliteEmployeeRepository::try_new(&conn)?,
        SqliteAddressRepository::try_new(&conn)?,
        ViaCepClient::new(&config.postal),
    )
    .with_update_missing_policy(config.update_missing);

    match cli.command {
        Command::List => print_json(&service.list_employees()?),
        Command::Get { id } => print_json(&service.get_employee(id)?),
        Command::GetByCode { personal_code } => {
            print_json(&service.get_employee_by_personal_code(&personal_code)?)
        }
        Command::Insert(args) => print_json(&service.insert_employee(args.into())?),
        Command::Update { id, employee } => {
            print_json(&service.update_employee(id, employee.into())?)
        }
        Command::Delete { id } => {
            service.delete_employee(id)?;
            print_json(&serde_json::json!({ "deleted": id }))
        }
        Command::Version => print_version(),
    }
}

fn print_version() -> Result<(), Box<dyn Error>> {
    println!("staffbook_core version={}", core_version());
    Ok(())
}

fn print_json(value: &impl Serialize) -> Result<(), Box<dyn Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
