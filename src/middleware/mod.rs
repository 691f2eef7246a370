//! Request-processing middleware and extractors.
//!
//! - [`auth`]: bearer-token resolution to a caller identity
//! - [`role`]: the permission check for the user resource
//!
//! # Authentication flow
//!
//! 1. Client sends a request with `Bearer: <scheme> <token>`
//! 2. The [`auth::Caller`] extractor resolves the token to an [`auth::Identity`]
//!    (or rejects with 401; all failure causes collapse to one outcome)
//! 3. The handler calls [`role::authorize`] with the method, caller, target id,
//!    and whether the payload carries a `role` field
//! 4. Handler logic runs only on an allow decision

pub mod auth;
pub mod role;
