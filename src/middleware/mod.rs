mod session;

pub use session::{require_user, CurrentUser, AUTH_COOKIE};
