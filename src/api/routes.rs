//! API routes.
//!
//! Available endpoints:
//!
//! - `GET /` - Service information
//! - `GET /clients?visibleTo=&role=` - Clients visible to an actor
//! - `GET /clients/:id/workflow` - A client's workflow
//! - `POST /clients/:id/workflow/stages/:stage/tasks/:task/toggle` - Toggle a checklist task
//! - `GET /users`, `POST /users` - List or create users
//! - `GET /users/:id`, `PUT /users/:id`, `DELETE /users/:id` - One user
//! - `GET /meetings?visibleTo=&role=` - Meetings visible to an actor

/// Route: GET /
pub const ROOT: &str = "/";

/// Route: GET /clients
pub const CLIENTS: &str = "/clients";

/// Route: GET /clients/:id/workflow
pub const CLIENT_WORKFLOW: &str = "/clients/:id/workflow";

/// Route: POST /clients/:id/workflow/stages/:stage/tasks/:task/toggle
pub const TOGGLE_TASK: &str = "/clients/:id/workflow/stages/:stage/tasks/:task/toggle";

/// Route: GET|POST /users
pub const USERS: &str = "/users";

/// Route: GET|PUT|DELETE /users/:id
pub const USER: &str = "/users/:id";

/// Route: GET /meetings
pub const MEETINGS: &str = "/meetings";

/// A matched route with its path parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route<'a> {
    Root,
    Clients,
    ClientWorkflow { client_id: &'a str },
    ToggleTask { client_id: &'a str, stage_id: &'a str, task_id: &'a str },
    Users,
    User { id: &'a str },
    Meetings,
}

impl Route<'_> {
    /// Route pattern, for logs and errors.
    pub fn pattern(&self) -> &'static str {
        match self {
            Self::Root => ROOT,
            Self::Clients => CLIENTS,
            Self::ClientWorkflow { .. } => CLIENT_WORKFLOW,
            Self::ToggleTask { .. } => TOGGLE_TASK,
            Self::Users => USERS,
            Self::User { .. } => USER,
            Self::Meetings => MEETINGS,
        }
    }
}

/// Match decoded path segments against the route table.
pub fn match_route<'a>(segments: &[&'a str]) -> Option<Route<'a>> {
    let route = match *segments {
        [] => Route::Root,
        ["clients"] => Route::Clients,
        ["clients", client_id, "workflow"] => Route::ClientWorkflow { client_id },
        ["clients", client_id, "workflow", "stages", stage_id, "tasks", task_id, "toggle"] => {
            Route::ToggleTask { client_id, stage_id, task_id }
        }
        ["users"] => Route::Users,
        ["users", id] => Route::User { id },
        ["meetings"] => Route::Meetings,
        _ => return None,
    };
    Some(route)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_match_workflow_routes() {
        assert_eq!(
            match_route(&["clients", "7", "workflow"]),
            Some(Route::ClientWorkflow { client_id: "7" })
        );
        assert_eq!(
            match_route(&["clients", "7", "workflow", "stages", "initial", "tasks", "2", "toggle"]),
            Some(Route::ToggleTask { client_id: "7", stage_id: "initial", task_id: "2" })
        );
    }

    #[test]
    fn test_match_collection_routes() {
        assert_eq!(match_route(&[]), Some(Route::Root));
        assert_eq!(match_route(&["users", "3"]), Some(Route::User { id: "3" }));
        assert_eq!(match_route(&["meetings"]).map(|r| r.pattern()), Some(MEETINGS));
    }

    #[test]
    fn test_unknown_routes() {
        assert_eq!(match_route(&["clients", "7"]), None);
        assert_eq!(match_route(&["clients", "7", "workflow", "stages"]), None);
        assert_eq!(match_route(&["companies"]), None);
    }
}
