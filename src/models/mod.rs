pub mod service_kind;
pub mod task;

pub use service_kind::ServiceKind;
pub use task::{FailureKind, Outcome, OutcomeStatus, Task};
