//! Role-based access: capability matrix, route table and the route guard.

mod capability;
mod guard;
mod routes;

pub use capability::{
    capabilities, default_route, is_allowed, permission, Action, Permission, Scope,
};
pub use guard::{GuardDecision, RoleMismatchPolicy, RouteGuard};
pub use routes::{Access, Route};
