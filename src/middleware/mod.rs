pub mod response;
pub mod session;

pub use response::{ApiResponse, NoContent};
pub use session::{require_session, SessionUser};
