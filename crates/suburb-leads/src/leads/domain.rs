use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifier wrapper for captured leads.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LeadId(pub String);

impl LeadId {
    /// Server-generated, globally unique, never reused.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}

impl fmt::Display for LeadId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Where the prospective seller sits in their buying journey.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BuyerType {
    #[serde(rename = "first-time")]
    FirstTime,
    #[serde(rename = "upgrading")]
    Upgrading,
    #[serde(rename = "investing")]
    Investing,
}

impl BuyerType {
    pub const fn label(self) -> &'static str {
        match self {
            BuyerType::FirstTime => "first-time",
            BuyerType::Upgrading => "upgrading",
            BuyerType::Investing => "investing",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "first-time" => Some(Self::FirstTime),
            "upgrading" => Some(Self::Upgrading),
            "investing" => Some(Self::Investing),
            _ => None,
        }
    }
}

/// Five ordered budget buckets, in millions of rand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum BudgetRange {
    #[serde(rename = "<1.5m")]
    Under1_5M,
    #[serde(rename = "1.5-3m")]
    From1_5To3M,
    #[serde(rename = "3-6m")]
    From3To6M,
    #[serde(rename = "6-10m")]
    From6To10M,
    #[serde(rename = "10m+")]
    Over10M,
}

impl BudgetRange {
    pub const fn label(self) -> &'static str {
        match self {
            BudgetRange::Under1_5M => "<1.5m",
            BudgetRange::From1_5To3M => "1.5-3m",
            BudgetRange::From3To6M => "3-6m",
            BudgetRange::From6To10M => "6-10m",
            BudgetRange::Over10M => "10m+",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "<1.5m" => Some(Self::Under1_5M),
            "1.5-3m" => Some(Self::From1_5To3M),
            "3-6m" => Some(Self::From3To6M),
            "6-10m" => Some(Self::From6To10M),
            "10m+" => Some(Self::Over10M),
            _ => None,
        }
    }
}

/// Horizon within which the lead intends to transact, in months.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Timeline {
    #[serde(rename = "0-3")]
    ZeroToThreeMonths,
    #[serde(rename = "3-6")]
    ThreeToSixMonths,
    #[serde(rename = "6-12")]
    SixToTwelveMonths,
    #[serde(rename = "12+")]
    OverTwelveMonths,
}

impl Timeline {
    pub const fn label(self) -> &'static str {
        match self {
            Timeline::ZeroToThreeMonths => "0-3",
            Timeline::ThreeToSixMonths => "3-6",
            Timeline::SixToTwelveMonths => "6-12",
            Timeline::OverTwelveMonths => "12+",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "0-3" => Some(Self::ZeroToThreeMonths),
            "3-6" => Some(Self::ThreeToSixMonths),
            "6-12" => Some(Self::SixToTwelveMonths),
            "12+" => Some(Self::OverTwelveMonths),
            _ => None,
        }
    }
}

/// Whether the lead already holds bond pre-approval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PreApproval {
    #[serde(rename = "yes")]
    Yes,
    #[serde(rename = "no")]
    No,
}

impl PreApproval {
    pub const fn label(self) -> &'static str {
        match self {
            PreApproval::Yes => "yes",
            PreApproval::No => "no",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "yes" => Some(Self::Yes),
            "no" => Some(Self::No),
            _ => None,
        }
    }
}

/// Workflow state tracked as the sales team works a lead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LeadStatus {
    #[serde(rename = "new")]
    New,
    #[serde(rename = "contacted")]
    Contacted,
    #[serde(rename = "closed")]
    Closed,
}

impl LeadStatus {
    pub const fn label(self) -> &'static str {
        match self {
            LeadStatus::New => "new",
            LeadStatus::Contacted => "contacted",
            LeadStatus::Closed => "closed",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "new" => Some(Self::New),
            "contacted" => Some(Self::Contacted),
            "closed" => Some(Self::Closed),
            _ => None,
        }
    }

    /// Transitions are deliberately unrestricted so the sales team can move a
    /// lead in any direction, including back to `new`. Any future state
    /// machine rule belongs here and nowhere else.
    pub const fn allows_transition_to(self, _next: LeadStatus) -> bool {
        true
    }
}

/// Raw form fields exactly as the valuation form posts them.
///
/// Enum-valued fields arrive as plain strings; the intake guard is the single
/// place that decides whether they are well-formed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeadForm {
    pub name: String,
    pub phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub buyer_type: String,
    pub budget_range: String,
    #[serde(default)]
    pub preferred_suburbs: Vec<String>,
    pub timeline: String,
    pub pre_approved: String,
    #[serde(default)]
    pub consent_given: bool,
}

/// Request-derived facts recorded alongside every lead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionProvenance {
    pub source_url: String,
    pub user_agent: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip_address: Option<String>,
}

/// Everything the presentation layer hands the core for one lead creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeadSubmission {
    pub form: LeadForm,
    pub provenance: SubmissionProvenance,
}

/// A captured prospective-seller contact record with consent metadata.
///
/// `consent_timestamp`, `consent_text_version`, and `consent_purpose` are
/// write-once: bound at creation and never updated retroactively.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lead {
    pub id: LeadId,
    pub name: String,
    pub phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub buyer_type: BuyerType,
    pub budget_range: BudgetRange,
    pub preferred_suburbs: Vec<String>,
    pub timeline: Timeline,
    pub pre_approved: PreApproval,
    pub consent_given: bool,
    pub consent_timestamp: DateTime<Utc>,
    pub consent_text_version: String,
    pub consent_purpose: String,
    pub source_url: String,
    pub user_agent: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip_address: Option<String>,
    pub created_at: DateTime<Utc>,
    pub status: LeadStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_agent_id: Option<String>,
}
