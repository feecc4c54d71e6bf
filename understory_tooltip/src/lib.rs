// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_tooltip --heading-base-level=0

//! Understory Tooltip: the lifecycle of tooltip and popover instances.
//!
//! ## Overview
//!
//! An instance is attached to a host element whose first element child is the trigger.
//! It reads its configuration from the host's attributes and in-memory [`Properties`],
//! binds the trigger events implied by the configured [`TriggerModes`], and on show builds a
//! floating panel in a container, positions it on the next animation frame with
//! [`understory_placement`], and removes it on hide.
//!
//! ## Hosts
//!
//! Everything DOM-facing goes through the [`Dom`] trait. Hosts report what happens on their
//! side (listener callbacks, animation frames, mutation records) as [`HostEvent`]s passed to
//! [`Tooltip::handle`].
//!
//! - [`memory::MemoryDom`] is a headless arena host with explicit geometry, used by the tests
//!   and the demos.
//! - `web::WebTooltip` (feature `web`) drives an instance from a browser element with
//!   `web-sys`, `gloo` listeners and animation frames, and a `MutationObserver`.
//!
//! ## Modules
//!
//! - [`config`]: attribute and property resolution, [`TriggerModes`].
//! - [`container`]: container selector resolution.
//! - [`panel`]: panel construction and teardown.
//! - [`binder`]: trigger listeners.
//! - [`tooltip`]: the visibility state machine.
//!
//! ## Minimal usage
//!
//! ```
//! use kurbo::{Point, Rect, Size};
//! use understory_tooltip::memory::MemoryDom;
//! use understory_tooltip::{HostEvent, PanelKind, Tooltip, TriggerEvent, VisibilityState};
//!
//! let mut dom = MemoryDom::new(Size::new(1200.0, 800.0));
//! dom.set_intrinsic_size("tooltip", Size::new(140.0, 36.0));
//! let host = dom.append_element(dom.root(), "ui-tooltip");
//! dom.set_attr(host, "title", "Save changes");
//! let button = dom.append_element(host, "button");
//! dom.set_rect(button, Rect::from_origin_size((200.0, 300.0), (80.0, 40.0)));
//!
//! let mut tip = Tooltip::new(host, PanelKind::Tooltip);
//! tip.connect(&mut dom);
//!
//! tip.handle(&mut dom, HostEvent::Trigger(TriggerEvent::MouseEnter));
//! assert_eq!(tip.state(), VisibilityState::Visible);
//!
//! // Positioning waits for the next frame.
//! for id in dom.take_frames() {
//!     tip.handle(&mut dom, HostEvent::AnimationFrame(id));
//! }
//! let panel = tip.panel().unwrap();
//! assert_eq!(dom.position(*panel.root()), Some(Point::new(170.0, 254.0)));
//!
//! tip.handle(&mut dom, HostEvent::Trigger(TriggerEvent::MouseLeave));
//! assert!(tip.panel().is_none());
//! ```

pub mod binder;
pub mod config;
pub mod container;
pub mod dom;
pub mod memory;
pub mod panel;
pub mod tooltip;
#[cfg(feature = "web")]
pub mod web;

pub use binder::{TriggerBinder, TriggerEvent};
pub use config::{Config, Direction, Properties, TriggerModes};
pub use dom::{Dom, HostEvent, ListenerKind};
pub use panel::{PanelError, PanelHandle, PanelId, PanelKind};
pub use tooltip::{Tooltip, VisibilityState};
