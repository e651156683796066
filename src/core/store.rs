//! The entity store.
//!
//! Holds every collection plus the per-client workflows. Constructed once
//! per process (or per test) and passed to consumers by reference.

use chrono::{DateTime, Utc};

use super::collection::{generate_id, Collection, Patch, Record};
use super::entities::{Client, ClientNote, Company, Contact, Meeting, Task, User};
use super::error::{StoreError, StoreResult};
use super::fixtures;
use super::patch::ClientPatch;
use super::visibility::{Actor, ViewFilter};
use crate::workflow::{StageId, VersionedWorkflow, WorkflowRegistry};

/// Description given to meetings booked from a client's workflow.
pub const FIRST_MEETING_DESCRIPTION: &str = "Initial Consultation";

/// In-memory store of clients, partners, users, tasks, meetings and workflows.
///
/// Client records are only reachable through store methods so that deleting
/// a client also deletes its workflow.
#[derive(Debug, Default)]
pub struct Store {
    clients: Collection<Client>,
    users: Collection<User>,
    companies: Collection<Company>,
    contacts: Collection<Contact>,
    tasks: Collection<Task>,
    meetings: Collection<Meeting>,
    workflows: WorkflowRegistry,
}

impl Store {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store loaded with the reference data set.
    pub fn seeded() -> Self {
        let mut store = Self::new();
        fixtures::seed(&mut store);
        tracing::debug!(
            clients = store.clients.len(),
            users = store.users.len(),
            workflows = store.workflows.len(),
            "Seeded store"
        );
        store
    }

    // ------------------------------------------------------------------------
    // Clients
    // ------------------------------------------------------------------------

    pub fn clients(&self) -> &[Client] {
        self.clients.list()
    }

    pub fn client(&self, id: &str) -> StoreResult<&Client> {
        self.clients.get(id)
    }

    /// Clients the actor may see.
    pub fn visible_clients(&self, filter: &ViewFilter, actor: &Actor) -> Vec<&Client> {
        filter.visible(actor, self.clients.list())
    }

    pub fn create_client(&mut self, draft: Client) -> StoreResult<Client> {
        self.clients.create(draft)
    }

    pub fn update_client(&mut self, id: &str, patch: ClientPatch) -> StoreResult<Client> {
        self.clients.update(id, patch)
    }

    /// Delete a client together with its workflow.
    pub fn delete_client(&mut self, id: &str) -> StoreResult<Client> {
        let client = self.clients.delete(id)?;
        if self.workflows.remove(id).is_some() {
            tracing::debug!(client_id = id, "Removed workflow with client");
        }
        Ok(client)
    }

    /// Append a note to a client's case history.
    pub fn add_client_note(
        &mut self,
        client_id: &str,
        author: &str,
        content: &str,
    ) -> StoreResult<ClientNote> {
        if content.trim().is_empty() {
            return Err(StoreError::Validation("note content must not be empty".to_string()));
        }

        let mut notes = self.clients.get(client_id)?.notes.clone();
        let note = ClientNote {
            id: generate_id(),
            date: Utc::now().date_naive(),
            content: content.to_string(),
            author: author.to_string(),
        };
        notes.push(note.clone());
        self.clients.update(client_id, NotesPatch(notes))?;

        Ok(note)
    }

    // ------------------------------------------------------------------------
    // Workflows
    // ------------------------------------------------------------------------

    /// The client's workflow, created from the template on first access.
    pub fn workflow(&mut self, client_id: &str) -> StoreResult<&VersionedWorkflow> {
        self.clients.get(client_id)?;
        Ok(self.workflows.get_or_create(client_id))
    }

    /// Flip one checklist task of a client's workflow.
    ///
    /// Unknown stage or task ids leave the workflow unchanged.
    pub fn toggle_workflow_task(
        &mut self,
        client_id: &str,
        stage_id: &str,
        task_id: &str,
        expected_version: Option<u64>,
    ) -> StoreResult<VersionedWorkflow> {
        self.clients.get(client_id)?;
        tracing::info!(client_id, stage_id, task_id, "Toggling workflow task");
        Ok(self.workflows.toggle_task(client_id, stage_id, task_id, expected_version)?)
    }

    /// Set or clear the issue flag on a stage of a client's workflow.
    pub fn flag_workflow_issue(
        &mut self,
        client_id: &str,
        stage: StageId,
        has_issue: bool,
        expected_version: Option<u64>,
    ) -> StoreResult<VersionedWorkflow> {
        self.clients.get(client_id)?;
        Ok(self.workflows.set_issue(client_id, stage, has_issue, expected_version)?)
    }

    pub fn workflows(&self) -> &WorkflowRegistry {
        &self.workflows
    }

    pub(crate) fn workflows_mut(&mut self) -> &mut WorkflowRegistry {
        &mut self.workflows
    }

    pub(crate) fn clients_mut(&mut self) -> &mut Collection<Client> {
        &mut self.clients
    }

    // ------------------------------------------------------------------------
    // Other collections
    // ------------------------------------------------------------------------

    pub fn users(&self) -> &Collection<User> {
        &self.users
    }

    pub fn users_mut(&mut self) -> &mut Collection<User> {
        &mut self.users
    }

    /// Find a user by exact display name.
    pub fn user_by_name(&self, name: &str) -> Option<&User> {
        self.users.list().iter().find(|u| u.name == name)
    }

    pub fn companies(&self) -> &Collection<Company> {
        &self.companies
    }

    pub fn companies_mut(&mut self) -> &mut Collection<Company> {
        &mut self.companies
    }

    pub fn contacts(&self) -> &Collection<Contact> {
        &self.contacts
    }

    pub fn contacts_mut(&mut self) -> &mut Collection<Contact> {
        &mut self.contacts
    }

    /// Contacts whose company name matches exactly.
    pub fn contacts_at(&self, company: &str) -> Vec<&Contact> {
        self.contacts.list().iter().filter(|c| c.company.as_deref() == Some(company)).collect()
    }

    pub fn tasks(&self) -> &Collection<Task> {
        &self.tasks
    }

    pub fn tasks_mut(&mut self) -> &mut Collection<Task> {
        &mut self.tasks
    }

    pub fn meetings(&self) -> &Collection<Meeting> {
        &self.meetings
    }

    pub fn meetings_mut(&mut self) -> &mut Collection<Meeting> {
        &mut self.meetings
    }

    /// Meetings the actor may see, ordered by start time.
    pub fn visible_meetings(&self, filter: &ViewFilter, actor: &Actor) -> Vec<&Meeting> {
        let mut meetings = filter.visible(actor, self.meetings.list());
        meetings.sort_by_key(|m| m.start);
        meetings
    }

    /// Book a first meeting for a client with the client's representative.
    ///
    /// Also records the start as the client's next meeting. Either both
    /// records change or neither does.
    pub fn schedule_meeting_for(
        &mut self,
        client_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> StoreResult<Meeting> {
        let previous = self.clients.get(client_id)?.clone();

        let mut draft = Meeting::new(&previous.name, start, end, &previous.representative);
        draft.client_id = Some(previous.id.clone());
        draft.description = Some(FIRST_MEETING_DESCRIPTION.to_string());
        draft.validate()?;

        self.clients.update(
            client_id,
            ClientPatch { next_meeting: Some(start), ..ClientPatch::default() },
        )?;
        let meeting = match self.meetings.create(draft) {
            Ok(meeting) => meeting,
            Err(err) => {
                self.clients.insert(previous);
                return Err(err);
            }
        };

        tracing::info!(client_id, meeting_id = %meeting.id, "Scheduled meeting");
        Ok(meeting)
    }
}

/// Internal patch replacing a client's note list.
struct NotesPatch(Vec<ClientNote>);

impl Patch<Client> for NotesPatch {
    fn apply_to(self, target: &mut Client) {
        target.notes = self.0;
    }

    fn is_empty(&self) -> bool {
        false
    }
}
