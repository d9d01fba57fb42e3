/// CLI argument parsing and command handling - Gateway
mod args;
mod commands;

pub use args::{
    BillAction, Cli, Commands, ConfigAction, DormChangeAction, RegisterRole, RepairAction,
    VisitorAction,
};
pub use commands::{handle_command, handle_local_command, show_version, ConsoleNavigator};
