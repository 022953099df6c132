//! Trackboard: client-side state layer of a project and task tracker.
//!
//! The crate keeps two in-memory collections, projects and tasks, in sync
//! with a REST-like remote API. Mutations are applied optimistically and
//! rolled back when the server refuses them. Each project carries a task
//! count derived from the task collection, and users can impose a sort
//! order or a manual per-project task order that survives restarts.
//!
//! # Architecture
//!
//! Trackboard follows hexagonal architecture principles:
//!
//! - **Domain**: entity types and record normalisation, free of I/O
//! - **Ports**: trait interfaces for the remote API, preference storage and
//!   the cross-registry task-count ledger
//! - **Adapters**: in-memory and HTTP remotes, in-memory and JSON-file
//!   preference stores
//!
//! # Modules
//!
//! - [`project`]: project registry and the task-count ledger
//! - [`task`]: task registry, manual ordering and status changes
//! - [`ordering`]: sort preferences, comparator tables and drag resolution
//! - [`sync`]: retry policy, optimistic unit of work and keyed serialisation
//! - [`remote`]: remote collection port and adapters
//! - [`preferences`]: preference store port and adapters
//! - [`notification`]: transient status messages with auto-clear
//! - [`config`]: tracker configuration

pub mod config;
mod fs;
pub mod notification;
pub mod ordering;
pub mod preferences;
pub mod project;
pub mod remote;
pub mod sync;
pub mod task;
