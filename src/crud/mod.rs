//! List-Paginate-CRUD controller
//!
//! Everything between a key press and an HTTP request: list state with
//! stale-response protection, the pagination window, add/edit forms and
//! their validation, the delete confirmation slot, and the search
//! debounce. Nothing here performs I/O; operations return [`Command`]s.

pub mod command;
pub mod confirm;
pub mod debounce;
pub mod form;
pub mod list;
pub mod pagination;
pub mod section;
pub mod validation;

pub use command::{Command, LookupData, Purpose, Reply};
pub use form::{FormMode, FormPhase, FormState, FormTarget};
pub use section::SectionState;
