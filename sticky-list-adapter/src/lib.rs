//! Adapter utilities for the `sticky-list` crate.
//!
//! `sticky-list` provides the pure data operations (grouping, merging, diffing, pinning,
//! page gating). This crate wires them into the shape a list view needs:
//!
//! - A single-owner [`ListController`] holding the current sequence as an immutable snapshot
//! - Renderer and binder contracts ([`ListRenderer`], [`EntryBinder`])
//! - An async [`FetchSource`] for `load_more` (requires `std`)
//!
//! This crate is intentionally framework-agnostic (no ratatui/egui bindings).
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

#[macro_use]
mod macros;

mod bind;
mod controller;
#[cfg(feature = "std")]
mod fetch;
mod render;

#[cfg(test)]
mod tests;

pub use bind::{EntryBinder, bind_pinned, bind_range};
pub use controller::{ListController, PageProgress};
#[cfg(feature = "std")]
pub use fetch::FetchSource;
pub use render::{ListRenderer, NoopRenderer};
