use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::api::{LocationType, RepairType, UserType};

#[derive(Parser, Debug)]
#[command(name = "dormlink")]
#[command(version)]
#[command(about = "Command-line client for the dormitory management backend", long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize configuration
    Init,
    /// Show or change the backend server address
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
    /// Log in and remember the session
    Login {
        #[arg(short, long)]
        username: String,
        #[arg(short, long, env = "DORMLINK_PASSWORD", hide_env_values = true)]
        password: String,
        #[arg(short = 't', long, value_enum, default_value_t = UserType::Student)]
        user_type: UserType,
    },
    /// Log out and forget all local state
    Logout,
    /// Create a new account
    Register {
        #[arg(long)]
        username: String,
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "")]
        email: String,
        #[arg(long, env = "DORMLINK_PASSWORD", hide_env_values = true)]
        password: String,
        #[arg(long)]
        confirm_password: String,
        #[arg(long)]
        phone: String,
        #[arg(short = 't', long, value_enum, default_value_t = RegisterRole::Student)]
        user_type: RegisterRole,
        /// Building a dorm manager is responsible for
        #[arg(long)]
        building: Option<String>,
        /// Invitation code required for dorm managers
        #[arg(long)]
        invitation_code: Option<String>,
    },
    /// Request a password reset
    ForgotPassword {
        #[arg(long)]
        email: String,
        #[arg(long)]
        name: String,
    },
    /// List dormitory buildings
    Buildings,
    /// Show the stored profile
    Whoami,
    /// Show student details and dormitory
    Info,
    /// Show the current dormitory and roommates
    Dorm,
    /// Upload a profile photo
    UploadPhoto {
        file: PathBuf,
    },
    /// Repair requests
    Repairs {
        #[command(subcommand)]
        action: RepairAction,
    },
    /// Visitor registrations
    Visitors {
        #[command(subcommand)]
        action: VisitorAction,
    },
    /// Dormitory change requests
    DormChanges {
        #[command(subcommand)]
        action: DormChangeAction,
    },
    /// Utility bills
    Bills {
        #[command(subcommand)]
        action: BillAction,
    },
    /// Show version information
    Version,
}

/// Roles that can sign themselves up
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RegisterRole {
    Student,
    DormManager,
}

impl From<RegisterRole> for UserType {
    fn from(role: RegisterRole) -> Self {
        match role {
            RegisterRole::Student => UserType::Student,
            RegisterRole::DormManager => UserType::DormManager,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Print the effective configuration
    Show,
    /// Print the server address in use
    GetServer,
    /// Save a new server address (e.g. http://192.168.1.10:5000/api)
    SetServer { url: String },
}

#[derive(Subcommand, Debug)]
pub enum RepairAction {
    List,
    Submit {
        #[arg(long)]
        title: String,
        #[arg(long)]
        content: String,
        #[arg(long)]
        location_detail: String,
        #[arg(long)]
        contact_phone: String,
        #[arg(long, value_enum, default_value_t = LocationType::Dorm)]
        location_type: LocationType,
        #[arg(long, value_enum, default_value_t = RepairType::Water)]
        repair_type: RepairType,
    },
}

#[derive(Subcommand, Debug)]
pub enum VisitorAction {
    List,
    Register {
        #[arg(long)]
        name: String,
        #[arg(long)]
        id_card: String,
        #[arg(long)]
        phone: String,
        #[arg(long)]
        dorm_number: String,
        #[arg(long)]
        purpose: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum DormChangeAction {
    List,
    Submit {
        #[arg(long)]
        target_dorm_id: Option<String>,
        #[arg(long)]
        reason: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum BillAction {
    List,
    Pay { bill_id: i64 },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_login_and_nested_actions() {
        let cli = Cli::try_parse_from([
            "dormlink", "login", "-u", "2021001", "-p", "pw", "-t", "dorm-manager",
        ])
        .unwrap();
        match cli.command {
            Commands::Login { username, user_type, .. } => {
                assert_eq!(username, "2021001");
                assert_eq!(user_type, UserType::DormManager);
            }
            other => panic!("unexpected command: {:?}", other),
        }

        let cli = Cli::try_parse_from(["dormlink", "-v", "bills", "pay", "12"]).unwrap();
        assert!(cli.verbose);
        assert!(matches!(cli.command, Commands::Bills { action: BillAction::Pay { bill_id: 12 } }));
    }

    #[test]
    fn test_register_rejects_admin_role() {
        let base = [
            "dormlink", "register", "--username", "u", "--name", "N", "--password", "pw",
            "--confirm-password", "pw", "--phone", "1",
        ];

        let admin = base.iter().copied().chain(["-t", "admin"]);
        assert!(Cli::try_parse_from(admin).is_err());

        let manager = base.iter().copied().chain(["-t", "dorm-manager"]);
        match Cli::try_parse_from(manager).unwrap().command {
            Commands::Register { user_type, .. } => {
                assert_eq!(UserType::from(user_type), UserType::DormManager)
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }
}
