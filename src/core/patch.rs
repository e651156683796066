//! Typed partial updates.
//!
//! Each patch lists exactly the fields its entity allows to change. Unset
//! fields (`None`) are left alone. The merged record is validated by the
//! collection before it is stored.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::Deserialize;

use super::collection::Patch;
use super::entities::{
    Client, ClientStatus, Company, CompanyContactInfo, CompanyType, Contact, ContactInfo, Meeting,
    Task, TaskPriority, TaskStatus, TaskType, User, UserRole,
};

/// Apply `Some` values from `$patch` onto `$target` field by field.
macro_rules! merge_fields {
    ($patch:ident => $target:ident: $($field:ident),+ $(,)?) => {
        $(
            if let Some(value) = $patch.$field {
                $target.$field = value;
            }
        )+
    };
}

macro_rules! none_set {
    ($patch:ident: $($field:ident),+ $(,)?) => {
        true $(&& $patch.$field.is_none())+
    };
}

/// Updatable client fields.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ClientPatch {
    pub name: Option<String>,
    pub age: Option<u32>,
    pub status: Option<ClientStatus>,
    pub needs: Option<Vec<String>>,
    pub objectives: Option<Vec<String>>,
    pub contact_info: Option<ContactInfo>,
    pub representative: Option<String>,
    pub representative_id: Option<String>,
    pub next_meeting: Option<DateTime<Utc>>,
}

impl Patch<Client> for ClientPatch {
    fn apply_to(self, target: &mut Client) {
        let patch = self;
        merge_fields!(patch => target: name, age, status, needs, objectives, contact_info, representative);
        if let Some(id) = patch.representative_id {
            target.representative_id = Some(id);
        }
        if let Some(at) = patch.next_meeting {
            target.next_meeting = Some(at);
        }
    }

    fn is_empty(&self) -> bool {
        let patch = self;
        none_set!(patch: name, age, status, needs, objectives, contact_info, representative,
            representative_id, next_meeting)
    }
}

/// Updatable user fields.
#[derive(Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UserPatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub role: Option<UserRole>,
    pub enabled: Option<bool>,

    /// Write-only. Accepted so credential changes parse, but never stored:
    /// users carry no credentials in this store.
    pub password: Option<String>,
}

impl fmt::Debug for UserPatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserPatch")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("role", &self.role)
            .field("enabled", &self.enabled)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl Patch<User> for UserPatch {
    fn apply_to(self, target: &mut User) {
        let patch = self;
        merge_fields!(patch => target: name, email, role, enabled);
    }

    fn is_empty(&self) -> bool {
        let patch = self;
        none_set!(patch: name, email, role, enabled, password)
    }
}

/// Updatable company fields.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CompanyPatch {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub company_type: Option<CompanyType>,
    pub contact_info: Option<CompanyContactInfo>,
    pub notes: Option<String>,
}

impl Patch<Company> for CompanyPatch {
    fn apply_to(self, target: &mut Company) {
        let patch = self;
        merge_fields!(patch => target: name, company_type, contact_info);
        if let Some(notes) = patch.notes {
            target.notes = Some(notes);
        }
    }

    fn is_empty(&self) -> bool {
        let patch = self;
        none_set!(patch: name, company_type, contact_info, notes)
    }
}

/// Updatable contact fields.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ContactPatch {
    pub name: Option<String>,
    pub title: Option<String>,
    pub company: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub notes: Option<String>,
}

impl Patch<Contact> for ContactPatch {
    fn apply_to(self, target: &mut Contact) {
        let patch = self;
        merge_fields!(patch => target: name, title, phone, email);
        if let Some(company) = patch.company {
            target.company = Some(company);
        }
        if let Some(notes) = patch.notes {
            target.notes = Some(notes);
        }
    }

    fn is_empty(&self) -> bool {
        let patch = self;
        none_set!(patch: name, title, company, phone, email, notes)
    }
}

/// Updatable task fields.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub due_date: Option<DateTime<Utc>>,
    pub priority: Option<TaskPriority>,
    pub status: Option<TaskStatus>,
    #[serde(rename = "type")]
    pub task_type: Option<TaskType>,
    pub assigned_to: Option<String>,
}

impl Patch<Task> for TaskPatch {
    fn apply_to(self, target: &mut Task) {
        let patch = self;
        merge_fields!(patch => target: title, description, due_date, priority, status, task_type,
            assigned_to);
    }

    fn is_empty(&self) -> bool {
        let patch = self;
        none_set!(patch: title, description, due_date, priority, status, task_type, assigned_to)
    }
}

/// Updatable meeting fields.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct MeetingPatch {
    pub title: Option<String>,
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
    pub description: Option<String>,
    pub client_id: Option<String>,
}

impl Patch<Meeting> for MeetingPatch {
    fn apply_to(self, target: &mut Meeting) {
        let patch = self;
        merge_fields!(patch => target: title, start, end);
        if let Some(description) = patch.description {
            target.description = Some(description);
        }
        if let Some(client_id) = patch.client_id {
            target.client_id = Some(client_id);
        }
    }

    fn is_empty(&self) -> bool {
        let patch = self;
        none_set!(patch: title, start, end, description, client_id)
    }
}
