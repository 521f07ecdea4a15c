//! Cask - a CLI for identifying and managing containers
//!
//! Cask talks to a containerd-style runtime and provides the container
//! identification and mutation commands built on top of it: resolving
//! ambiguous user references (IDs, ID prefixes, names), inspecting
//! containers, renaming them, and restarting them.
//!
//! # Architecture
//!
//! The codebase follows a strict layered architecture:
//!
//! - [`cli`] - Command-line interface layer (parses args, delegates to core)
//! - [`core`] - Reference resolution, batch execution, rename coordination,
//!   and the hosts metadata store
//! - [`runtime`] - Single interface for all runtime operations
//! - [`ui`] - User interaction utilities
//!
//! # Correctness Invariants
//!
//! Cask maintains the following invariants:
//!
//! 1. A reference resolves through a fixed precedence: exact ID, unambiguous
//!    ID prefix, exact name
//! 2. After a successful rename, the runtime name label and any hosts
//!    metadata record agree on the container's name
//! 3. Rename never creates a hosts metadata record where none existed
//! 4. Batch commands attempt every reference before reporting failures

pub mod cli;
pub mod core;
pub mod runtime;
pub mod ui;
