use std::path::PathBuf;

use bozor_auth::Role;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "bozor")]
#[command(about = "Bozor CLI — inspect and check marketplace sessions")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Gate config file (TOML); BOZOR__* env vars override it
    #[arg(short, long, global = true, env = "BOZOR_CONFIG")]
    pub config: Option<PathBuf>,

    /// Session file holding tokens and the cached role snapshot
    #[arg(short, long, global = true, env = "BOZOR_SESSION_FILE")]
    pub session_file: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Store an access/refresh token pair issued by the backend
    Login(LoginArgs),
    /// Remove stored tokens and the cached snapshot
    Logout,
    /// Show the stored session
    Whoami,
    /// Run the authorization gate for a view requirement
    Check(CheckArgs),
    /// Manage CLI configuration
    Config(ConfigArgs),
}

#[derive(clap::Args)]
pub struct LoginArgs {
    /// Access token
    #[arg(long, env = "BOZOR_ACCESS_TOKEN")]
    pub access: String,
    /// Refresh token
    #[arg(long, env = "BOZOR_REFRESH_TOKEN")]
    pub refresh: String,
}

#[derive(clap::Args)]
pub struct CheckArgs {
    /// Role the view requires (BUYER or SELLER)
    #[arg(short, long, default_value = "BUYER")]
    pub role: Role,
    /// Do not require completed company onboarding
    #[arg(long)]
    pub no_company: bool,
    /// Print every gate state transition
    #[arg(long)]
    pub trace: bool,
}

#[derive(clap::Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show the effective gate config
    Show,
    /// Show resolved file locations
    Paths,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_check() {
        let cli = Cli::try_parse_from(["bozor", "check", "--role", "seller", "--no-company"])
            .unwrap();
        match cli.command {
            Commands::Check(args) => {
                assert_eq!(args.role, Role::Seller);
                assert!(args.no_company);
                assert!(!args.trace);
            }
            _ => panic!("expected check"),
        }
    }

    #[test]
    fn test_check_defaults_to_buyer() {
        let cli = Cli::try_parse_from(["bozor", "-vv", "check"]).unwrap();
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Commands::Check(args) => assert_eq!(args.role, Role::Buyer),
            _ => panic!("expected check"),
        }
    }

    #[test]
    fn test_rejects_unknown_role() {
        assert!(Cli::try_parse_from(["bozor", "check", "--role", "admin"]).is_err());
    }
}
