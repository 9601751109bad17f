use std::fmt;

use serde::{Deserialize, Serialize};

/// Portal roles, stored as their SCREAMING_SNAKE wire form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    NpcAdmin,
    AgencyBuyer,
    SupplierUser,
    Auditor,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NpcAdmin => "NPC_ADMIN",
            Self::AgencyBuyer => "AGENCY_BUYER",
            Self::SupplierUser => "SUPPLIER_USER",
            Self::Auditor => "AUDITOR",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "NPC_ADMIN" => Some(Self::NpcAdmin),
            "AGENCY_BUYER" => Some(Self::AgencyBuyer),
            "SUPPLIER_USER" => Some(Self::SupplierUser),
            "AUDITOR" => Some(Self::Auditor),
            _ => None,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Account status; only ACTIVE accounts may authenticate or consume tokens
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserStatus {
    Active,
    Inactive,
    Suspended,
}

impl UserStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "ACTIVE",
            Self::Inactive => "INACTIVE",
            Self::Suspended => "SUSPENDED",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "ACTIVE" => Some(Self::Active),
            "INACTIVE" => Some(Self::Inactive),
            "SUSPENDED" => Some(Self::Suspended),
            _ => None,
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self, Self::Active)
    }
}

impl fmt::Display for UserStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AgencyType {
    Ministry,
    Authority,
    Soe,
    Provincial,
}

impl AgencyType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ministry => "MINISTRY",
            Self::Authority => "AUTHORITY",
            Self::Soe => "SOE",
            Self::Provincial => "PROVINCIAL",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "MINISTRY" => Some(Self::Ministry),
            "AUTHORITY" => Some(Self::Authority),
            "SOE" => Some(Self::Soe),
            "PROVINCIAL" => Some(Self::Provincial),
            _ => None,
        }
    }
}

impl fmt::Display for AgencyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum KycStatus {
    Pending,
    Verified,
    Rejected,
}

impl KycStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Verified => "VERIFIED",
            Self::Rejected => "REJECTED",
        }
    }
}

impl fmt::Display for KycStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
