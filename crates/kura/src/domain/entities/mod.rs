//! Domain Entities
//!
//! Pure domain models without infrastructure dependencies.
//! - Template: Prompt template aggregate root
//! - TemplateMessage: Ordered conversation turn
//! - TemplateArgument: Declared render-time parameter

mod template;
mod template_argument;
mod template_message;

pub use template::*;
pub use template_argument::*;
pub use template_message::*;
