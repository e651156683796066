//! Reference data loaded by [`Store::seeded`](super::Store::seeded).

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};

use super::entities::{
    Client, ClientNote, ClientStatus, Company, CompanyContactInfo, CompanyType, Contact,
    ContactInfo, FamilyContact, Meeting, Relationship, Task, TaskPriority, TaskType,
    User, UserRole,
};
use super::store::Store;
use crate::workflow::{ClientWorkflow, StageId};

fn at(year: i32, month: u32, day: u32, hour: u32, min: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, hour, min, 0).single().unwrap_or_default()
}

fn day(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default()
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(ToString::to_string).collect()
}

/// Load every fixture collection into `store`.
pub(crate) fn seed(store: &mut Store) {
    for user in users() {
        store.users_mut().insert(user);
    }
    for client in clients(store) {
        store.clients_mut().insert(client);
    }
    for workflow in workflows() {
        store.workflows_mut().insert(workflow);
    }
    for company in companies() {
        store.companies_mut().insert(company);
    }
    for contact in contacts() {
        store.contacts_mut().insert(contact);
    }
    for task in tasks() {
        store.tasks_mut().insert(task);
    }
    for meeting in meetings() {
        store.meetings_mut().insert(meeting);
    }
}

fn user(
    id: &str,
    name: &str,
    email: &str,
    role: UserRole,
    created: DateTime<Utc>,
    last_sign_in: DateTime<Utc>,
) -> User {
    User {
        id: id.to_string(),
        created_at: created,
        last_sign_in: Some(last_sign_in),
        ..User::new(name, email, role)
    }
}

/// The two sign-in accounts followed by the user directory.
fn users() -> Vec<User> {
    let signup = at(2024, 1, 1, 0, 0);
    vec![
        user("1", "Admin User", "admin@seniorpathways.com", UserRole::Admin, signup, signup),
        user(
            "2",
            "John Robinson",
            "john@seniorpathways.com",
            UserRole::Representative,
            signup,
            signup,
        ),
        user(
            "3",
            "John Doe",
            "john@example.com",
            UserRole::Representative,
            at(2024, 1, 1, 0, 0),
            at(2024, 2, 20, 10, 30),
        ),
        user(
            "4",
            "Jane Smith",
            "jane@example.com",
            UserRole::Admin,
            at(2024, 1, 2, 0, 0),
            at(2024, 2, 19, 15, 45),
        ),
        user(
            "5",
            "Sarah Johnson",
            "sarah@example.com",
            UserRole::Representative,
            at(2024, 1, 3, 0, 0),
            at(2024, 2, 21, 9, 15),
        ),
        user(
            "6",
            "Michael Brown",
            "michael@example.com",
            UserRole::AssistedLivingAdministrator,
            at(2024, 1, 4, 0, 0),
            at(2024, 2, 22, 14, 20),
        ),
        user(
            "7",
            "Emily Davis",
            "emily@example.com",
            UserRole::PropertyManager,
            at(2024, 1, 5, 0, 0),
            at(2024, 2, 23, 11, 30),
        ),
    ]
}

fn family(
    id: &str,
    name: &str,
    relationship: Relationship,
    phone: &str,
    email: &str,
) -> FamilyContact {
    FamilyContact {
        id: id.to_string(),
        name: name.to_string(),
        relationship,
        phone: phone.to_string(),
        email: email.to_string(),
    }
}

fn note(id: &str, date: NaiveDate, content: &str, author: &str) -> ClientNote {
    ClientNote { id: id.to_string(), date, content: content.to_string(), author: author.to_string() }
}

fn contact_info(phone: &str, email: &str, address: &str) -> ContactInfo {
    ContactInfo { phone: phone.to_string(), email: email.to_string(), address: address.to_string() }
}

/// Clients, with representative ids resolved against the seeded users.
fn clients(store: &Store) -> Vec<Client> {
    let rep_id = |name: &str| store.user_by_name(name).map(|u| u.id.clone());

    let mut alice = Client::new("Alice Johnson", "John Robinson");
    alice.id = "1".into();
    alice.status = ClientStatus::Assessment;
    alice.needs = strings(&["Downsizing", "Assisted Living Search"]);
    alice.objectives = strings(&["Find smaller home", "Close to family"]);
    alice.contact_info = contact_info("555-0123", "alice@example.com", "123 Main St");
    alice.family_contacts =
        vec![family("1", "Bob Johnson", Relationship::Son, "555-0124", "bob@example.com")];
    alice.notes = vec![note("1", day(2024, 2, 20), "Initial consultation completed", "John Robinson")];
    alice.next_meeting = Some(at(2024, 3, 15, 14, 0));

    let mut charles = Client::new("Charles Wilson", "John Robinson");
    charles.id = "2".into();
    charles.status = ClientStatus::Planning;
    charles.needs = strings(&["Memory Care", "Financial Planning"]);
    charles.objectives = strings(&["Find memory care facility", "Estate planning"]);
    charles.contact_info = contact_info("555-0125", "charles@example.com", "456 Oak St");
    charles.family_contacts =
        vec![family("2", "Mary Wilson", Relationship::Daughter, "555-0126", "mary@example.com")];
    charles.notes = vec![note("2", day(2024, 2, 22), "Facility tour scheduled", "John Robinson")];
    charles.next_meeting = Some(at(2024, 3, 20, 10, 0));

    let mut david = Client::new("David Brown", "Jane Smith");
    david.id = "3".into();
    david.status = ClientStatus::Transition;
    david.needs = strings(&["Home Care", "Transportation"]);
    david.objectives = strings(&["Arrange home care services", "Set up transportation schedule"]);
    david.contact_info = contact_info("555-0127", "david@example.com", "789 Pine St");
    david.family_contacts =
        vec![family("3", "Sarah Brown", Relationship::Daughter, "555-0128", "sarah@example.com")];
    david.notes = vec![note("3", day(2024, 2, 25), "Home care assessment scheduled", "Jane Smith")];
    david.next_meeting = Some(at(2024, 3, 18, 11, 0));

    let mut emma = Client::new("Emma Davis", "John Robinson");
    emma.id = "4".into();
    emma.status = ClientStatus::Initial;
    emma.needs = strings(&["Financial Assessment", "Legal Planning"]);
    emma.objectives = strings(&["Review retirement accounts", "Create power of attorney"]);
    emma.contact_info = contact_info("555-0129", "emma@example.com", "321 Maple St");
    emma.family_contacts =
        vec![family("4", "Tom Davis", Relationship::Son, "555-0130", "tom@example.com")];
    emma.notes = vec![note("4", day(2024, 2, 26), "Initial meeting scheduled", "John Robinson")];
    emma.next_meeting = Some(at(2024, 3, 22, 13, 0));

    let mut clients = vec![alice, charles, david, emma];
    for client in &mut clients {
        client.representative_id = rep_id(&client.representative);
    }
    clients
}

/// Seeded workflows for the four fixture clients.
///
/// Each workflow's current stage is intentionally independent of the client's
/// status field.
fn workflows() -> Vec<ClientWorkflow> {
    let alice = ClientWorkflow::new("1")
        .with_completed(StageId::Initial, &["1"])
        .with_issue(StageId::Initial, true);

    let charles = ClientWorkflow::starting_at("2", StageId::Assessment)
        .with_completed(StageId::Initial, &["1", "2", "3"])
        .with_completed(StageId::Assessment, &["4"]);

    let david = ClientWorkflow::starting_at("3", StageId::Transition)
        .with_completed(StageId::Initial, &["1", "2", "3"])
        .with_completed(StageId::Assessment, &["4", "5", "6"])
        .with_completed(StageId::Planning, &["7", "8", "9"])
        .with_completed(StageId::RevisedPlanning, &["10", "11", "12"])
        .with_completed(StageId::Transition, &["13"])
        .with_issue(StageId::Transition, true);

    let emma = ClientWorkflow::starting_at("4", StageId::Completed)
        .with_completed(StageId::Initial, &["1", "2", "3"])
        .with_completed(StageId::Assessment, &["4", "5", "6"])
        .with_completed(StageId::Planning, &["7", "8", "9"])
        .with_completed(StageId::RevisedPlanning, &["10", "11", "12"])
        .with_completed(StageId::Transition, &["13", "14", "15"])
        .with_completed(StageId::Completed, &["16", "17", "18"]);

    vec![alice, charles, david, emma]
}

fn company(
    id: &str,
    name: &str,
    company_type: CompanyType,
    contact_info: CompanyContactInfo,
    notes: &str,
    created: DateTime<Utc>,
    updated: DateTime<Utc>,
) -> Company {
    Company {
        id: id.to_string(),
        contact_info,
        notes: Some(notes.to_string()),
        created_at: created,
        updated_at: updated,
        ..Company::new(name, company_type)
    }
}

fn company_info(phone: &str, email: &str, address: &str, website: &str) -> CompanyContactInfo {
    CompanyContactInfo {
        phone: phone.to_string(),
        email: email.to_string(),
        address: address.to_string(),
        website: Some(website.to_string()),
    }
}

fn companies() -> Vec<Company> {
    vec![
        company(
            "1",
            "Sunset Senior Living",
            CompanyType::AssistedLiving,
            company_info("555-0101", "info@sunsetliving.com", "123 Care Lane", "www.sunsetliving.com"),
            "Premium assisted living facility with memory care unit",
            at(2024, 1, 1, 0, 0),
            at(2024, 2, 15, 0, 0),
        ),
        company(
            "2",
            "Golden Years Home Care",
            CompanyType::HomeCare,
            company_info(
                "555-0102",
                "contact@goldenyears.com",
                "456 Health Avenue",
                "www.goldenyearshc.com",
            ),
            "Specialized in-home care services with 24/7 availability",
            at(2024, 1, 5, 0, 0),
            at(2024, 2, 20, 0, 0),
        ),
        company(
            "3",
            "Evergreen Nursing Center",
            CompanyType::NursingHome,
            company_info(
                "555-0103",
                "info@evergreennursing.com",
                "789 Medical Drive",
                "www.evergreennursing.com",
            ),
            "Full-service nursing facility with rehabilitation services",
            at(2024, 1, 10, 0, 0),
            at(2024, 2, 25, 0, 0),
        ),
        company(
            "4",
            "Riverside Senior Community",
            CompanyType::SeniorCommunity,
            company_info(
                "555-0104",
                "welcome@riversidesenior.com",
                "321 River Road",
                "www.riversidesenior.com",
            ),
            "Active adult community with various amenities",
            at(2024, 1, 15, 0, 0),
            at(2024, 3, 1, 0, 0),
        ),
        company(
            "5",
            "Heritage Medical Center",
            CompanyType::MedicalFacility,
            company_info(
                "555-0105",
                "info@heritagemedical.com",
                "567 Wellness Way",
                "www.heritagemedical.com",
            ),
            "Comprehensive medical care facility specializing in senior health",
            at(2024, 1, 20, 0, 0),
            at(2024, 3, 5, 0, 0),
        ),
    ]
}

#[allow(clippy::too_many_arguments)]
fn contact(
    id: &str,
    name: &str,
    title: &str,
    company: &str,
    phone: &str,
    email: &str,
    notes: &str,
    (created, updated): (DateTime<Utc>, DateTime<Utc>),
) -> Contact {
    Contact {
        id: id.to_string(),
        company: Some(company.to_string()),
        phone: phone.to_string(),
        email: email.to_string(),
        notes: Some(notes.to_string()),
        created_at: created,
        updated_at: updated,
        ..Contact::new(name, title)
    }
}

fn contacts() -> Vec<Contact> {
    vec![
        contact(
            "1",
            "Jane Smith",
            "Facility Director",
            "Sunset Senior Living",
            "555-0102",
            "jane.smith@sunsetliving.com",
            "Primary contact for facility tours",
            (at(2024, 1, 1, 0, 0), at(2024, 2, 15, 0, 0)),
        ),
        contact(
            "2",
            "Michael Johnson",
            "Care Coordinator",
            "Golden Years Home Care",
            "555-0103",
            "michael.j@goldenyears.com",
            "Handles all new client assessments",
            (at(2024, 1, 5, 0, 0), at(2024, 2, 20, 0, 0)),
        ),
        contact(
            "3",
            "Sarah Williams",
            "Nursing Director",
            "Evergreen Nursing Center",
            "555-0104",
            "s.williams@evergreennursing.com",
            "Available for urgent care consultations",
            (at(2024, 1, 10, 0, 0), at(2024, 2, 25, 0, 0)),
        ),
        contact(
            "4",
            "Robert Davis",
            "Community Manager",
            "Riverside Senior Community",
            "555-0105",
            "r.davis@riversidesenior.com",
            "Manages all community events and activities",
            (at(2024, 1, 15, 0, 0), at(2024, 3, 1, 0, 0)),
        ),
        contact(
            "5",
            "Emily Chen",
            "Medical Director",
            "Heritage Medical Center",
            "555-0106",
            "e.chen@heritagemedical.com",
            "Specializes in geriatric care",
            (at(2024, 1, 20, 0, 0), at(2024, 3, 5, 0, 0)),
        ),
    ]
}

fn tasks() -> Vec<Task> {
    let consultation = Task {
        id: "1".into(),
        description: "First meeting with Alice Johnson".into(),
        priority: TaskPriority::High,
        client_id: Some("1".into()),
        client_name: Some("Alice Johnson".into()),
        ..Task::new("Initial Consultation", TaskType::Meeting, "John Robinson", at(2024, 3, 15, 14, 0))
    };

    let tour = Task {
        id: "2".into(),
        description: "Tour of Sunset Senior Living with Charles Wilson".into(),
        client_id: Some("2".into()),
        client_name: Some("Charles Wilson".into()),
        ..Task::new("Facility Tour", TaskType::Assessment, "John Robinson", at(2024, 3, 20, 10, 0))
    };

    vec![consultation, tour]
}

/// One-hour calendar meeting starting at `start`.
fn meeting(
    id: &str,
    title: &str,
    start: DateTime<Utc>,
    client_id: &str,
    description: &str,
    representative: &str,
) -> Meeting {
    Meeting {
        id: id.to_string(),
        client_id: Some(client_id.to_string()),
        description: Some(description.to_string()),
        ..Meeting::new(title, start, start + Duration::hours(1), representative)
    }
}

/// Calendar meetings. Clients `5` to `8` only exist on the calendar.
fn meetings() -> Vec<Meeting> {
    const JOHN: &str = "John Robinson";
    const JANE: &str = "Jane Smith";

    vec![
        meeting("1", "Alice Johnson", at(2025, 3, 15, 14, 0), "1", "Initial consultation", JOHN),
        meeting("2", "Charles Wilson", at(2025, 3, 20, 10, 0), "2", "Facility tour discussion", JOHN),
        meeting("3", "Emma Davis", at(2025, 3, 22, 13, 0), "4", "Financial planning review", JOHN),
        meeting("4", "David Brown", at(2025, 3, 18, 11, 0), "3", "Home care assessment", JANE),
        meeting("5", "Robert Martinez", at(2025, 3, 25, 9, 0), "5", "Memory care facility tour", JOHN),
        meeting("6", "Sarah Thompson", at(2025, 3, 27, 15, 0), "6", "Follow-up consultation", JOHN),
        meeting(
            "7",
            "Michael Lee",
            at(2025, 3, 19, 13, 30),
            "7",
            "Transportation services review",
            JANE,
        ),
        meeting("8", "Patricia Garcia", at(2025, 3, 21, 11, 0), "8", "Initial needs assessment", JOHN),
        meeting("9", "Jane Smith", at(2025, 4, 1, 11, 0), "8", "Initial needs assessment", JOHN),
    ]
}
