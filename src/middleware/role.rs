//! Role-based permission check for the user resource.

use axum::http::Method;

use crate::middleware::auth::Identity;

/// Decides whether `caller` may perform `method` against the user identified
/// by `target_id`.
///
/// Regular callers may read and update only their own record and may never
/// change the `role` field; a Librarian may do anything. Deletion is
/// Librarian-only. The decision depends on nothing but the arguments.
pub fn authorize(
    method: &Method,
    caller: &Identity,
    target_id: i64,
    payload_has_role: bool,
) -> bool {
    let own_record = caller.id == target_id;
    let librarian = caller.role.is_librarian();

    match *method {
        Method::GET | Method::POST => own_record || librarian,
        Method::DELETE => librarian,
        Method::PATCH => librarian || (own_record && !payload_has_role),
        _ => false,
    }
}
