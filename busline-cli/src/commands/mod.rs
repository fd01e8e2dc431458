//! Command definitions and dispatch.

pub mod account;
pub mod book;
pub mod bookings;
pub mod routes;
pub mod seats;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::output::OutputFormat;
use crate::state::AppState;

/// Book bus tickets with gender-aware seat selection
#[derive(Debug, Parser)]
#[command(name = "busline", version, about, long_about = None)]
pub struct Cli {
    /// Directory holding default.toml and friends
    #[arg(short, long, default_value = "config")]
    pub config: PathBuf,

    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Create an account and sign in
    Signup(account::SignupArgs),
    /// Sign in
    Login(account::LoginArgs),
    /// Sign out
    Logout,
    /// Show the signed-in account
    Whoami,
    /// List served routes and cities
    Routes,
    /// Find buses for a route and date
    Search(routes::SearchArgs),
    /// Show the seat map of a bus for a journey date
    Seats(seats::SeatsArgs),
    /// Select seats, enter passengers and pay
    Book(book::BookArgs),
    /// List your bookings
    Bookings,
    /// Show or download a ticket
    Ticket(bookings::TicketArgs),
}

impl Cli {
    pub async fn execute(&self) -> anyhow::Result<()> {
        let state = AppState::load(&self.config)?;

        match &self.command {
            Commands::Signup(args) => account::signup(&state, args, self.format).await,
            Commands::Login(args) => account::login(&state, args, self.format).await,
            Commands::Logout => account::logout(&state).await,
            Commands::Whoami => account::whoami(&state, self.format).await,
            Commands::Routes => routes::list_routes(&state, self.format),
            Commands::Search(args) => routes::search(&state, args, self.format).await,
            Commands::Seats(args) => seats::execute(&state, args, self.format).await,
            Commands::Book(args) => book::execute(&state, args, self.format).await,
            Commands::Bookings => bookings::list(&state, self.format).await,
            Commands::Ticket(args) => bookings::ticket(&state, args, self.format).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_book() {
        let cli = Cli::parse_from([
            "busline", "--format", "json", "book", "bus-1", "--date", "2025-01-10",
            "--seats", "A1,B2", "--passengers", "people.json", "--method", "qr",
        ]);
        assert_eq!(cli.format, OutputFormat::Json);
        match cli.command {
            Commands::Book(args) => {
                assert_eq!(args.seats, vec!["A1", "B2"]);
                assert_eq!(args.method, book::MethodArg::Qr);
                assert!(args.upi_id.is_none());
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_upi_requires_id() {
        let result = Cli::try_parse_from([
            "busline", "book", "bus-1", "--date", "2025-01-10", "--seats", "A1",
            "--passengers", "people.json", "--method", "upi",
        ]);
        assert!(result.is_err());
    }
}
