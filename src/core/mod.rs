//! Core types for Pathways.
//!
//! This module contains the entity records, the generic collection they are
//! kept in, the explicit [`Store`] object, role-based view filtering and
//! configuration.

mod collection;
mod config;
mod entities;
mod error;
mod fixtures;
mod patch;
mod store;
mod visibility;

pub use collection::{generate_id, Collection, Patch, Record};
pub use config::{
    ApiConfig, Config, GeneralConfig, StoreConfig, VisibilityConfig, LOCAL_CONFIG_FILE,
};
pub use entities::{
    Client, ClientNote, ClientStatus, Company, CompanyContactInfo, CompanyType, Contact,
    ContactInfo, FamilyContact, Meeting, Relationship, Task, TaskPriority, TaskStatus, TaskType,
    User, UserRole,
};
pub use error::{StoreError, StoreResult};
pub use patch::{ClientPatch, CompanyPatch, ContactPatch, MeetingPatch, TaskPatch, UserPatch};
pub use store::{Store, FIRST_MEETING_DESCRIPTION};
pub use visibility::{visible_to, Actor, OwnershipKey, Owned, ViewFilter};
