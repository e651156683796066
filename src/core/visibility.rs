//! Role-based view filtering.
//!
//! Administrators see every record. Everyone else sees only the records they
//! own. Ownership is matched either by display name (the dashboard's
//! behaviour) or by user id.

use serde::{Deserialize, Serialize};

use super::entities::User;

/// A record with an owning representative.
pub trait Owned {
    /// Display name of the owner.
    fn owner_name(&self) -> &str;

    /// User id of the owner, when the record tracks it.
    fn owner_id(&self) -> Option<&str> {
        None
    }
}

/// Who is looking at the data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    /// User id, if the actor is a known user
    #[serde(default)]
    pub id: Option<String>,

    /// Display name
    pub name: String,

    /// Role name, compared as a plain string
    pub role: String,
}

impl Actor {
    pub fn new(name: impl Into<String>, role: impl Into<String>) -> Self {
        Self { id: None, name: name.into(), role: role.into() }
    }

    /// Attach a user id.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }
}

impl From<&User> for Actor {
    fn from(user: &User) -> Self {
        Self { id: Some(user.id.clone()), name: user.name.clone(), role: user.role.to_string() }
    }
}

/// How record ownership is matched against the actor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OwnershipKey {
    /// Exact match of the owner name against the actor name.
    #[default]
    Name,
    /// Exact match of the owner id against the actor id.
    Id,
}

/// Narrows collections to what an actor may see.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewFilter {
    admin_role: String,
    key: OwnershipKey,
}

impl Default for ViewFilter {
    fn default() -> Self {
        Self::new("Admin", OwnershipKey::Name)
    }
}

impl ViewFilter {
    pub fn new(admin_role: impl Into<String>, key: OwnershipKey) -> Self {
        Self { admin_role: admin_role.into(), key }
    }

    /// Whether the actor holds the administrative role.
    pub fn is_admin(&self, actor: &Actor) -> bool {
        actor.role == self.admin_role
    }

    /// Whether a single record is visible to the actor.
    pub fn can_see<T: Owned>(&self, actor: &Actor, item: &T) -> bool {
        if self.is_admin(actor) {
            return true;
        }

        match self.key {
            OwnershipKey::Name => item.owner_name() == actor.name,
            OwnershipKey::Id => match (item.owner_id(), actor.id.as_deref()) {
                (Some(owner), Some(actor_id)) => owner == actor_id,
                _ => false,
            },
        }
    }

    /// The visible subset of `items`, in their original order.
    pub fn visible<'a, T: Owned>(&self, actor: &Actor, items: &'a [T]) -> Vec<&'a T> {
        if self.is_admin(actor) {
            return items.iter().collect();
        }
        items.iter().filter(|item| self.can_see(actor, *item)).collect()
    }
}

/// Filter with the default admin role and name matching.
pub fn visible_to<'a, T: Owned>(actor: &Actor, items: &'a [T]) -> Vec<&'a T> {
    ViewFilter::default().visible(actor, items)
}
