use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_PAYMENT_METHOD;
use crate::utils::{DormError, Result};

/// Account role sent as `userType`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum UserType {
    Admin,
    Student,
    DormManager,
}

/// Where a repair is needed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum LocationType {
    Dorm,
    Teaching,
    Public,
}

/// What kind of repair is needed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum RepairType {
    Water,
    Furniture,
    Network,
    Other,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
    #[serde(rename = "userType")]
    pub user_type: UserType,
}

impl LoginForm {
    pub fn validate(&self) -> Result<()> {
        require("username", &self.username)?;
        require("password", &self.password)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RegisterForm {
    pub username: String,
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    #[serde(rename = "userType")]
    pub user_type: UserType,
    pub phone: String,
    /// Only sent for dorm managers
    #[serde(skip_serializing_if = "Option::is_none")]
    pub responsible_building: Option<String>,
    /// Only sent for dorm managers
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invitation_code: Option<String>,
}

impl RegisterForm {
    /// Only students and dorm managers can sign themselves up
    pub fn validate(&self) -> Result<()> {
        if self.user_type == UserType::Admin {
            return Err(DormError::InvalidField {
                field: "userType",
                reason: "admin accounts cannot be registered".to_string(),
            });
        }
        Ok(())
    }

    /// Drop the manager-only fields for any other role
    pub fn normalized(mut self) -> Self {
        if self.user_type != UserType::DormManager {
            self.responsible_building = None;
            self.invitation_code = None;
        }
        self
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ForgotPasswordForm {
    pub email: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RepairForm {
    pub title: String,
    pub content: String,
    pub location_detail: String,
    pub contact_phone: String,
    pub location_type: LocationType,
    pub repair_type: RepairType,
}

#[derive(Debug, Clone, Serialize)]
pub struct VisitorForm {
    pub name: String,
    pub id_card: String,
    pub phone: String,
    pub dorm_number: String,
    pub purpose: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct DormChangeForm {
    /// Serialized as `null` when no target is chosen
    pub target_dorm_id: Option<String>,
    pub reason: String,
}

impl DormChangeForm {
    pub fn new(target_dorm_id: Option<String>, reason: impl Into<String>) -> Self {
        Self {
            target_dorm_id: target_dorm_id.filter(|id| !id.is_empty()),
            reason: reason.into(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        require("reason", &self.reason)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PayBillForm {
    pub bill_id: i64,
    pub payment_method: String,
}

impl PayBillForm {
    pub fn new(bill_id: i64) -> Self {
        Self {
            bill_id,
            payment_method: DEFAULT_PAYMENT_METHOD.to_string(),
        }
    }
}

fn require(field: &'static str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(DormError::MissingField(field));
    }
    Ok(())
}
