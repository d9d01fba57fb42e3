use anyhow::{Context, Result};
use colored::Colorize;
use serde::Serialize;
use serde_json::Value;

use super::args::{BillAction, Commands, ConfigAction, DormChangeAction, RepairAction, VisitorAction};
use crate::api::{
    DormChangeForm, Envelope, ForgotPasswordForm, LoginForm, RegisterForm, RepairForm, VisitorForm,
};
use crate::app::{init_config, AppState};
use crate::session::{Navigator, Route};

/// Navigator for a terminal: "redirecting" means telling the user where to go
pub struct ConsoleNavigator;

impl Navigator for ConsoleNavigator {
    fn redirect(&self, route: Route) {
        match route {
            Route::Login => eprintln!(
                "{} Not logged in. Run `dormlink login -u <username>` first.",
                "[AUTH]".yellow()
            ),
            other => eprintln!("{} Continue with `dormlink {}`", "[->]".yellow(), other),
        }
    }
}

/// Handle a command that needs no backend state
pub fn handle_local_command(command: &Commands) -> Result<Option<bool>> {
    match command {
        Commands::Init => {
            match init_config()? {
                Some(path) => println!("Created default configuration at: {}", path.display()),
                None => println!("Configuration already exists"),
            }
            Ok(Some(true))
        }
        Commands::Version => {
            show_version();
            Ok(Some(true))
        }
        _ => Ok(None),
    }
}

/// Handle a command against the backend. Returns false when the backend
/// reported an application-level failure or the login guard refused.
pub async fn handle_command(state: &AppState, command: Commands) -> Result<bool> {
    let service = &state.service;

    if is_protected(&command) && !state.guard(ConsoleNavigator).ensure_logged_in() {
        return Ok(false);
    }

    match command {
        Commands::Init | Commands::Version => Ok(true),
        Commands::Config { action } => handle_config(state, action),
        Commands::Login {
            username,
            password,
            user_type,
        } => {
            let form = LoginForm {
                username,
                password,
                user_type,
            };
            let envelope = service.login(&form).await?;
            Ok(report(&envelope, "Logged in", "Login failed"))
        }
        Commands::Logout => {
            service.logout().await?;
            println!("{} Logged out", "[OK]".green());
            ConsoleNavigator.redirect(Route::Login);
            Ok(true)
        }
        Commands::Register {
            username,
            name,
            email,
            password,
            confirm_password,
            phone,
            user_type,
            building,
            invitation_code,
        } => {
            let form = RegisterForm {
                username,
                name,
                email,
                password,
                confirm_password,
                user_type: user_type.into(),
                phone,
                responsible_building: building,
                invitation_code,
            };
            let envelope = service.register(form).await?;
            Ok(report(&envelope, "Registered", "Registration failed"))
        }
        Commands::ForgotPassword { email, name } => {
            let envelope = service
                .forgot_password(&ForgotPasswordForm { email, name })
                .await?;
            Ok(report(&envelope, "Request submitted", "Request failed"))
        }
        Commands::Buildings => {
            let envelope = service.buildings().await?;
            Ok(show_data(&envelope, "Failed to load buildings"))
        }
        Commands::Whoami => {
            let profile = state.session.profile().unwrap_or(Value::Null);
            print_json(&profile)?;
            Ok(true)
        }
        Commands::Info => {
            let (info, dorm) =
                futures::future::join(service.student_info(), service.student_dorm()).await;
            let info_ok = show_data(&info?, "Failed to load student info");
            let dorm_ok = show_data(&dorm?, "Failed to load dormitory");
            Ok(info_ok && dorm_ok)
        }
        Commands::Dorm => {
            let envelope = service.student_dorm().await?;
            Ok(show_data(&envelope, "Failed to load dormitory"))
        }
        Commands::UploadPhoto { file } => {
            let envelope = service
                .upload_photo(&file)
                .await
                .with_context(|| format!("Failed to upload {}", file.display()))?;
            Ok(report(&envelope, "Photo uploaded", "Upload failed"))
        }
        Commands::Repairs { action } => match action {
            RepairAction::List => Ok(show_data(&service.repairs().await?, "Failed to load repairs")),
            RepairAction::Submit {
                title,
                content,
                location_detail,
                contact_phone,
                location_type,
                repair_type,
            } => {
                let form = RepairForm {
                    title,
                    content,
                    location_detail,
                    contact_phone,
                    location_type,
                    repair_type,
                };
                let envelope = service.submit_repair(&form).await?;
                Ok(report(&envelope, "Repair submitted", "Submission failed"))
            }
        },
        Commands::Visitors { action } => match action {
            VisitorAction::List => {
                Ok(show_data(&service.visitors().await?, "Failed to load visitors"))
            }
            VisitorAction::Register {
                name,
                id_card,
                phone,
                dorm_number,
                purpose,
            } => {
                let form = VisitorForm {
                    name,
                    id_card,
                    phone,
                    dorm_number,
                    purpose,
                };
                let envelope = service.register_visitor(&form).await?;
                Ok(report(&envelope, "Visitor registered", "Registration failed"))
            }
        },
        Commands::DormChanges { action } => match action {
            DormChangeAction::List => Ok(show_data(
                &service.dorm_changes().await?,
                "Failed to load dorm change requests",
            )),
            DormChangeAction::Submit {
                target_dorm_id,
                reason,
            } => {
                let form = DormChangeForm::new(target_dorm_id, reason);
                let envelope = service.submit_dorm_change(&form).await?;
                Ok(report(&envelope, "Request submitted", "Submission failed"))
            }
        },
        Commands::Bills { action } => match action {
            BillAction::List => Ok(show_data(
                &service.utility_bills().await?,
                "Failed to load bills",
            )),
            BillAction::Pay { bill_id } => {
                let envelope = service.pay_bill(bill_id).await?;
                Ok(report(&envelope, "Payment successful", "Payment failed"))
            }
        },
    }
}

fn handle_config(state: &AppState, action: ConfigAction) -> Result<bool> {
    match action {
        ConfigAction::Show => {
            println!("{}", toml::to_string_pretty(&state.config)?);
            println!("# server address in use: {}", state.config_store.base_address());
        }
        ConfigAction::GetServer => {
            let source = if state.config_store.has_override() {
                "saved"
            } else {
                "default"
            };
            println!("{} ({})", state.config_store.base_address(), source);
        }
        ConfigAction::SetServer { url } => {
            state.config_store.set_base_address(url)?;
            println!(
                "{} Server address set to {}",
                "[OK]".green(),
                state.config_store.base_address()
            );
        }
    }
    Ok(true)
}

/// Commands that render content only a logged-in user should see
fn is_protected(command: &Commands) -> bool {
    matches!(
        command,
        Commands::Whoami
            | Commands::Info
            | Commands::Dorm
            | Commands::UploadPhoto { .. }
            | Commands::Repairs { .. }
            | Commands::Visitors { .. }
            | Commands::DormChanges { .. }
            | Commands::Bills { .. }
    )
}

/// Print a one-line outcome for a submission
fn report<T>(envelope: &Envelope<T>, success: &str, failure: &str) -> bool {
    if envelope.is_success() {
        println!("{} {}", "[OK]".green(), envelope.message_or(success));
        true
    } else {
        eprintln!("{} {}", "[ERROR]".red(), envelope.message_or(failure));
        false
    }
}

/// Print the envelope's data, or the failure message
fn show_data<T: Serialize>(envelope: &Envelope<T>, failure: &str) -> bool {
    if !envelope.is_success() {
        eprintln!("{} {}", "[ERROR]".red(), envelope.message_or(failure));
        return false;
    }
    match &envelope.data {
        Some(data) => print_json(data).is_ok(),
        None => true,
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Show version information
pub fn show_version() {
    println!("dormlink v{}", env!("CARGO_PKG_VERSION"));
    println!("   Command-line client for the dormitory management backend");
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_protected_commands() {
        assert!(is_protected(&Commands::Whoami));
        assert!(is_protected(&Commands::Bills {
            action: BillAction::List
        }));
        assert!(is_protected(&Commands::UploadPhoto {
            file: PathBuf::from("a.png")
        }));
        assert!(!is_protected(&Commands::Buildings));
        assert!(!is_protected(&Commands::Logout));
        assert!(!is_protected(&Commands::Config {
            action: ConfigAction::GetServer
        }));
    }

    #[test]
    fn test_report_uses_backend_message() {
        let ok: Envelope = Envelope {
            code: 200,
            msg: None,
            data: None,
        };
        assert!(report(&ok, "Done", "Failed"));

        let failed: Envelope = Envelope {
            code: 400,
            msg: Some("Reason is required".to_string()),
            data: None,
        };
        assert!(!report(&failed, "Done", "Failed"));
        assert!(!show_data(&failed, "Failed"));
    }
}
