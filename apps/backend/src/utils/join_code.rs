//! Session code generation.
//!
//! Session codes are the first eight hex digits of a v4 UUID, upper-cased:
//! short enough to read aloud or type on a phone. Uniqueness is enforced by
//! the registry, which retries on collision.

use uuid::Uuid;

/// Length of a session code.
pub const SESSION_CODE_LEN: usize = 8;

/// Generate a candidate session code.
///
/// ```
/// use hokm_backend::utils::join_code::{generate_session_code, SESSION_CODE_LEN};
///
/// let code = generate_session_code();
/// assert_eq!(code.len(), SESSION_CODE_LEN);
/// ```
pub fn generate_session_code() -> String {
    let mut code = Uuid::new_v4().simple().to_string();
    code.truncate(SESSION_CODE_LEN);
    code.make_ascii_uppercase();
    code
}
