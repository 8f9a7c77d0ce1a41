//! Value Objects
//!
//! Immutable objects defined by their attributes rather than identity.

mod identifier;
mod message_role;
mod template_id;
mod user_id;

pub use message_role::*;
pub use template_id::*;
pub use user_id::*;
