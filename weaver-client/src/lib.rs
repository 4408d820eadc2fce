//! weaver-client library
//!
//! Workflow store and the HTTP backend it drives. The `weaver` binary is a
//! thin terminal front end over [`store::WorkflowStore`].

pub mod backend;
pub mod error;
pub mod http;
pub mod store;

pub use crate::backend::{ArchiveFile, WeaverBackend};
pub use crate::error::{ClientError, ClientResult};
pub use crate::http::HttpBackend;
pub use crate::store::{
    MixDownload, Notification, NotificationLevel, Step, WorkflowState, WorkflowStore,
};
