//! Core trait abstractions.
//!
//! Every external collaborator sits behind one of these seams: the
//! inference endpoint, the session/document stores, and the message
//! bus. Implementations are injected where the application is wired
//! together; the pipeline never reaches for a process-wide instance.

pub mod ai;
pub mod bus;
pub mod store;

pub use ai::Inference;
pub use bus::{EventBus, ReceivedEvent};
pub use store::{DocumentStore, SessionService};
