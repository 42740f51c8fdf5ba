// SPDX-License-Identifier: MPL-2.0
//! `lightstage` is a headless media lightbox engine.
//!
//! It models the full orchestration of a gallery overlay — session
//! lifecycle, renderer dispatch with graceful degradation, toolbar
//! composition, fixed-point zoom and pan, keyboard and gesture routing,
//! and slideshow scheduling — without owning any widgets. The embedding
//! layer renders the typed [`stage::StageContent`] and resolved
//! [`toolbar::ResolvedToolbar`] however it likes and feeds events back in.
//!
//! Time never flows implicitly: the host passes `Instant` into every
//! time-sensitive call and drives deferred work through
//! [`overlay::Controller::tick`], which keeps the whole engine
//! deterministic under test.

#![doc(html_root_url = "https://docs.rs/lightstage/0.1.0")]

pub mod config;
pub mod error;
pub mod focus;
pub mod gesture;
pub mod hooks;
pub mod item;
pub mod keyboard;
pub mod overlay;
pub mod render;
pub mod safety;
pub mod session;
pub mod slideshow;
pub mod stage;
pub mod theme;
pub mod toolbar;
pub mod transform;

pub use error::{Error, RenderFailure, Result};
pub use item::{Item, ItemKind};
pub use overlay::{Controller, Phase};
pub use session::SessionOptions;
