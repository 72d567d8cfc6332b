pub mod error;
pub mod member;
pub mod note;
pub mod project;
pub mod role;
pub mod task;

pub use error::CampError;
pub use project::{Project, ProjectStatus};
pub use role::Role;
pub use task::{Status, Task};
