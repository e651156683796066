//! Entity records kept by the store.
//!
//! Field names serialize in camelCase to match the dashboard's wire format.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::collection::Record;
use super::error::{StoreError, StoreResult};
use super::visibility::Owned;

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("valid email regex"));

/// Loose e-mail shape check. Empty strings are accepted (field not filled in).
pub(crate) fn check_email(field: &str, email: &str) -> StoreResult<()> {
    if email.is_empty() || EMAIL_RE.is_match(email) {
        Ok(())
    } else {
        Err(StoreError::Validation(format!("{field} is not a valid e-mail address: {email}")))
    }
}

pub(crate) fn check_present(field: &str, value: &str) -> StoreResult<()> {
    if value.trim().is_empty() {
        Err(StoreError::Validation(format!("{field} must not be empty")))
    } else {
        Ok(())
    }
}

// ============================================================================
// Clients
// ============================================================================

/// Informational case status shown in client lists.
///
/// Maintained independently of the workflow's current stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ClientStatus {
    Initial,
    Assessment,
    Planning,
    Transition,
    Completed,
}

impl ClientStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Initial => "initial",
            Self::Assessment => "assessment",
            Self::Planning => "planning",
            Self::Transition => "transition",
            Self::Completed => "completed",
        }
    }
}

impl fmt::Display for ClientStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Phone, e-mail and postal address.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactInfo {
    pub phone: String,
    pub email: String,
    pub address: String,
}

/// How a family contact is related to the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Relationship {
    Spouse,
    Daughter,
    Son,
    Granddaughter,
    Grandson,
    Other,
}

/// A relative of the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FamilyContact {
    pub id: String,
    pub name: String,
    pub relationship: Relationship,
    pub phone: String,
    pub email: String,
}

/// A dated case note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientNote {
    pub id: String,
    pub date: NaiveDate,
    pub content: String,
    pub author: String,
}

/// A person receiving placement or care services.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    pub id: String,
    pub name: String,
    pub age: u32,
    pub status: ClientStatus,

    #[serde(default)]
    pub needs: Vec<String>,

    #[serde(default)]
    pub objectives: Vec<String>,

    pub contact_info: ContactInfo,

    #[serde(default)]
    pub family_contacts: Vec<FamilyContact>,

    #[serde(default)]
    pub notes: Vec<ClientNote>,

    /// Display name of the owning representative
    pub representative: String,

    /// User id of the owning representative, when known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub representative_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_meeting: Option<DateTime<Utc>>,
}

impl Client {
    /// Create a new client with the minimum required fields.
    pub fn new(name: impl Into<String>, representative: impl Into<String>) -> Self {
        Self {
            id: String::new(),
            name: name.into(),
            age: 0,
            status: ClientStatus::Initial,
            needs: Vec::new(),
            objectives: Vec::new(),
            contact_info: ContactInfo::default(),
            family_contacts: Vec::new(),
            notes: Vec::new(),
            representative: representative.into(),
            representative_id: None,
            next_meeting: None,
        }
    }
}

impl Record for Client {
    const KIND: &'static str = "Client";

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn validate(&self) -> StoreResult<()> {
        check_present("name", &self.name)?;
        check_present("representative", &self.representative)?;
        check_email("email", &self.contact_info.email)
    }
}

impl Owned for Client {
    fn owner_name(&self) -> &str {
        &self.representative
    }

    fn owner_id(&self) -> Option<&str> {
        self.representative_id.as_deref()
    }
}

// ============================================================================
// Users
// ============================================================================

/// Role of a dashboard user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UserRole {
    #[serde(rename = "Pathways Representative")]
    Representative,
    #[serde(rename = "Assisted Living Administrator")]
    AssistedLivingAdministrator,
    #[serde(rename = "Property Manager")]
    PropertyManager,
    #[serde(rename = "Admin")]
    Admin,
}

impl UserRole {
    pub const ALL: [Self; 4] =
        [Self::Representative, Self::AssistedLivingAdministrator, Self::PropertyManager, Self::Admin];

    /// Role name as shown in the dashboard.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Representative => "Pathways Representative",
            Self::AssistedLivingAdministrator => "Assisted Living Administrator",
            Self::PropertyManager => "Property Manager",
            Self::Admin => "Admin",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|role| role.as_str().eq_ignore_ascii_case(wanted))
            .or(match wanted.to_lowercase().as_str() {
                "representative" | "rep" => Some(Self::Representative),
                "administrator" => Some(Self::AssistedLivingAdministrator),
                "manager" => Some(Self::PropertyManager),
                _ => None,
            })
            .ok_or_else(|| StoreError::Validation(format!("Unknown role: {s}")))
    }
}

/// A dashboard user (representative, partner staff or admin).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    pub enabled: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_sign_in: Option<DateTime<Utc>>,

    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn new(name: impl Into<String>, email: impl Into<String>, role: UserRole) -> Self {
        Self {
            id: String::new(),
            name: name.into(),
            email: email.into(),
            role,
            enabled: true,
            last_sign_in: None,
            created_at: DateTime::<Utc>::default(),
        }
    }
}

impl Record for User {
    const KIND: &'static str = "User";

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn stamp_created(&mut self, now: DateTime<Utc>) {
        self.created_at = now;
    }

    fn validate(&self) -> StoreResult<()> {
        check_present("name", &self.name)?;
        check_present("email", &self.email)?;
        check_email("email", &self.email)
    }
}

// ============================================================================
// Companies & contacts
// ============================================================================

/// Kind of partner organization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CompanyType {
    #[serde(rename = "Assisted Living")]
    AssistedLiving,
    #[serde(rename = "Nursing Home")]
    NursingHome,
    #[serde(rename = "Home Care")]
    HomeCare,
    #[serde(rename = "Senior Community")]
    SeniorCommunity,
    #[serde(rename = "Medical Facility")]
    MedicalFacility,
    Other,
}

impl CompanyType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::AssistedLiving => "Assisted Living",
            Self::NursingHome => "Nursing Home",
            Self::HomeCare => "Home Care",
            Self::SeniorCommunity => "Senior Community",
            Self::MedicalFacility => "Medical Facility",
            Self::Other => "Other",
        }
    }
}

/// Company contact details.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyContactInfo {
    pub phone: String,
    pub email: String,
    pub address: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
}

/// A partner facility or provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    pub id: String,
    pub name: String,

    #[serde(rename = "type")]
    pub company_type: CompanyType,

    pub contact_info: CompanyContactInfo,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Company {
    pub fn new(name: impl Into<String>, company_type: CompanyType) -> Self {
        Self {
            id: String::new(),
            name: name.into(),
            company_type,
            contact_info: CompanyContactInfo::default(),
            notes: None,
            created_at: DateTime::<Utc>::default(),
            updated_at: DateTime::<Utc>::default(),
        }
    }
}

impl Record for Company {
    const KIND: &'static str = "Company";

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn stamp_created(&mut self, now: DateTime<Utc>) {
        self.created_at = now;
        self.updated_at = now;
    }

    fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now;
    }

    fn validate(&self) -> StoreResult<()> {
        check_present("name", &self.name)?;
        check_email("email", &self.contact_info.email)
    }
}

/// A person at a partner organization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    pub id: String,
    pub name: String,
    pub title: String,

    /// Company name. Not checked against the company collection.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,

    pub phone: String,
    pub email: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Contact {
    pub fn new(name: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: String::new(),
            name: name.into(),
            title: title.into(),
            company: None,
            phone: String::new(),
            email: String::new(),
            notes: None,
            created_at: DateTime::<Utc>::default(),
            updated_at: DateTime::<Utc>::default(),
        }
    }
}

impl Record for Contact {
    const KIND: &'static str = "Contact";

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn stamp_created(&mut self, now: DateTime<Utc>) {
        self.created_at = now;
        self.updated_at = now;
    }

    fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now;
    }

    fn validate(&self) -> StoreResult<()> {
        check_present("name", &self.name)?;
        check_email("email", &self.email)
    }
}

// ============================================================================
// Tasks
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskPriority {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskStatus {
    Pending,
    InProgress,
    Completed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskType {
    Meeting,
    Followup,
    Assessment,
    Documentation,
}

/// A case task assigned to a representative.
///
/// Unrelated to the checklist items inside a workflow stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub title: String,
    pub description: String,
    pub due_date: DateTime<Utc>,
    pub priority: TaskPriority,
    pub status: TaskStatus,

    #[serde(rename = "type")]
    pub task_type: TaskType,

    /// Name of the assigned representative
    pub assigned_to: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_name: Option<String>,
}

impl Task {
    pub fn new(
        title: impl Into<String>,
        task_type: TaskType,
        assigned_to: impl Into<String>,
        due_date: DateTime<Utc>,
    ) -> Self {
        Self {
            id: String::new(),
            title: title.into(),
            description: String::new(),
            due_date,
            priority: TaskPriority::Medium,
            status: TaskStatus::Pending,
            task_type,
            assigned_to: assigned_to.into(),
            client_id: None,
            client_name: None,
        }
    }

    /// Whether the task is past due and not yet completed.
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        self.status != TaskStatus::Completed && self.due_date < now
    }
}

impl Record for Task {
    const KIND: &'static str = "Task";

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn validate(&self) -> StoreResult<()> {
        check_present("title", &self.title)?;
        check_present("assignedTo", &self.assigned_to)
    }
}

impl Owned for Task {
    fn owner_name(&self) -> &str {
        &self.assigned_to
    }
}

// ============================================================================
// Meetings
// ============================================================================

/// A scheduled calendar event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Meeting {
    pub id: String,
    pub title: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Name of the representative running the meeting
    pub representative: String,
}

impl Meeting {
    pub fn new(
        title: impl Into<String>,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        representative: impl Into<String>,
    ) -> Self {
        Self {
            id: String::new(),
            title: title.into(),
            start,
            end,
            client_id: None,
            description: None,
            representative: representative.into(),
        }
    }

    /// Meeting length.
    pub fn duration(&self) -> chrono::Duration {
        self.end - self.start
    }
}

impl Record for Meeting {
    const KIND: &'static str = "Meeting";

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn validate(&self) -> StoreResult<()> {
        check_present("title", &self.title)?;
        if self.end < self.start {
            return Err(StoreError::Validation(format!(
                "Meeting ends before it starts ({} < {})",
                self.end, self.start
            )));
        }
        Ok(())
    }
}

impl Owned for Meeting {
    fn owner_name(&self) -> &str {
        &self.representative
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn test_role_parsing() {
        assert_eq!("Admin".parse::<UserRole>().unwrap(), UserRole::Admin);
        assert_eq!("admin".parse::<UserRole>().unwrap(), UserRole::Admin);
        assert_eq!(
            "Pathways Representative".parse::<UserRole>().unwrap(),
            UserRole::Representative
        );
        assert_eq!("rep".parse::<UserRole>().unwrap(), UserRole::Representative);
        assert!("janitor".parse::<UserRole>().is_err());
    }

    #[test]
    fn test_role_serialization() {
        let json = serde_json::to_string(&UserRole::PropertyManager).unwrap();
        assert_eq!(json, "\"Property Manager\"");
    }

    #[test]
    fn test_client_wire_format() {
        let mut client = Client::new("Alice Johnson", "John Robinson");
        client.status = ClientStatus::Assessment;
        let json = serde_json::to_value(&client).unwrap();

        assert_eq!(json["status"], "assessment");
        assert_eq!(json["representative"], "John Robinson");
        assert!(json.get("contactInfo").is_some());
        assert!(json.get("representativeId").is_none());
    }

    #[test]
    fn test_company_type_field_name() {
        let company = Company::new("Sunset Senior Living", CompanyType::AssistedLiving);
        let json = serde_json::to_value(&company).unwrap();
        assert_eq!(json["type"], "Assisted Living");
    }

    #[test]
    fn test_email_check() {
        assert!(check_email("email", "").is_ok());
        assert!(check_email("email", "alice@example.com").is_ok());
        assert!(check_email("email", "alice@").is_err());
        assert!(check_email("email", "not an email").is_err());
    }

    #[test]
    fn test_meeting_validation() {
        let start = Utc.with_ymd_and_hms(2025, 3, 15, 14, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2025, 3, 15, 15, 0, 0).unwrap();

        let meeting = Meeting::new("Alice Johnson", start, end, "John Robinson");
        assert!(meeting.validate().is_ok());
        assert_eq!(meeting.duration(), chrono::Duration::hours(1));

        let backwards = Meeting::new("Alice Johnson", end, start, "John Robinson");
        assert!(matches!(backwards.validate(), Err(StoreError::Validation(_))));
    }

    #[test]
    fn test_task_overdue() {
        let due = Utc.with_ymd_and_hms(2024, 3, 15, 14, 0, 0).unwrap();
        let mut task = Task::new("Initial Consultation", TaskType::Meeting, "John Robinson", due);

        let later = due + chrono::Duration::days(1);
        assert!(task.is_overdue(later));
        assert!(!task.is_overdue(due - chrono::Duration::days(1)));

        task.status = TaskStatus::Completed;
        assert!(!task.is_overdue(later));
    }

    #[test]
    fn test_task_status_wire_format() {
        let json = serde_json::to_string(&TaskStatus::InProgress).unwrap();
        assert_eq!(json, "\"in-progress\"");
    }
}
