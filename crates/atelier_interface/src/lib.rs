//! Collaborator traits for the Atelier generation lifecycle.
//!
//! A node controller talks to four collaborators, each behind a trait so
//! tests and hosts can substitute their own:
//!
//! - [`SessionProvider`] - who is signed in
//! - [`CreditLedger`] - balance and debits
//! - [`GenerationEndpoint`] - submit and status calls
//! - [`Notifier`] - transient user notifications
//!
//! In-memory implementations of the first, second and fourth live in
//! [`memory`].

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod memory;
mod traits;
mod types;

pub use memory::{InMemoryCreditLedger, RecordingNotifier, StaticSession, TracingNotifier};
pub use traits::{CreditLedger, GenerationEndpoint, Notifier, SessionProvider};
pub use types::{CreditDebit, JobStatus, JobStatusReport, Notification, NotificationLevel, Submission};
