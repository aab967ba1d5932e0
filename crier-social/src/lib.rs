//! Platform posting workflows for Crier.
//!
//! Every platform runs the same linear control flow, so there is one generic
//! [`workflow::WorkflowEngine`] parameterized by a [`platform::PlatformSpec`]
//! data record: URL, login markers, selector candidate lists, and the number
//! of interposed confirmation clicks. Adding a platform means writing data,
//! not control flow.
//!
//! - [`store::SessionStore`]: platform → persistent profile directory
//! - [`login`]: closed-world authenticated/unauthenticated probing
//! - [`workflow::WorkflowEngine`]: the linear posting state machine
//! - [`publish::publish`]: launch, run, and tear down one posting session
//! - [`snapshot::SessionSnapshot`]: cookie/local-storage export for the
//!   manual login flow
pub mod login;
pub mod platform;
pub mod publish;
pub mod snapshot;
pub mod store;
pub mod workflow;

pub use platform::PlatformSpec;
pub use publish::publish;
pub use store::SessionStore;
pub use workflow::{Step, WorkflowEngine};
