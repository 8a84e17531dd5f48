// handlers/protected/mod.rs - Handlers behind the session middleware
//
// Every route here runs after `require_session`, so handlers can extract
// `Extension<SessionUser>` without checking for it.

pub mod meals;
pub mod metrics;

pub use meals::{meal_create, meal_delete, meal_get, meal_list, meal_update};
pub use metrics::metrics_get;
