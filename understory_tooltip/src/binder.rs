// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Trigger binding: which listeners go on the trigger element.
//!
//! | Mode | Events |
//! |---|---|
//! | `click` | `click` |
//! | `hover` | `mouseenter`, `mouseleave` |
//! | `focus` | `focus`, `blur` |
//! | `manual` | none |
//!
//! The trigger is the host's first element child. When the host reports a child-list
//! change, [`TriggerBinder::rebind`] moves the listeners to whatever is first now.

use tracing::{trace, warn};

use crate::config::TriggerModes;
use crate::dom::{Dom, ListenerKind};

/// A DOM event on the trigger element.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum TriggerEvent {
    /// `click`
    Click,
    /// `mouseenter`
    MouseEnter,
    /// `mouseleave`
    MouseLeave,
    /// `focus`
    Focus,
    /// `blur`
    Blur,
}

impl TriggerEvent {
    /// DOM event type.
    pub const fn dom_name(self) -> &'static str {
        match self {
            Self::Click => "click",
            Self::MouseEnter => "mouseenter",
            Self::MouseLeave => "mouseleave",
            Self::Focus => "focus",
            Self::Blur => "blur",
        }
    }

    /// Events implied by `modes`, in binding order. `MANUAL` implies none.
    pub fn for_modes(modes: TriggerModes) -> Vec<Self> {
        let mut events = Vec::new();
        if modes.contains(TriggerModes::MANUAL) {
            return events;
        }
        if modes.contains(TriggerModes::CLICK) {
            events.push(Self::Click);
        }
        if modes.contains(TriggerModes::HOVER) {
            events.extend([Self::MouseEnter, Self::MouseLeave]);
        }
        if modes.contains(TriggerModes::FOCUS) {
            events.extend([Self::Focus, Self::Blur]);
        }
        events
    }
}

/// Listeners on the current trigger element.
pub struct TriggerBinder<D: Dom> {
    trigger: Option<D::Node>,
    listeners: Vec<D::Listener>,
}

impl<D: Dom> core::fmt::Debug for TriggerBinder<D> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("TriggerBinder")
            .field("trigger", &self.trigger)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl<D: Dom> Default for TriggerBinder<D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D: Dom> TriggerBinder<D> {
    /// Create an unbound binder.
    pub fn new() -> Self {
        Self {
            trigger: None,
            listeners: Vec::new(),
        }
    }

    /// Current trigger element, bound or not (manual mode binds no listeners).
    pub fn trigger(&self) -> Option<&D::Node> {
        self.trigger.as_ref()
    }

    /// Number of live trigger listeners.
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Bind the listeners implied by `modes` to `trigger`, replacing any previous binding.
    pub fn bind(&mut self, dom: &mut D, trigger: D::Node, modes: TriggerModes) {
        self.unbind(dom);
        for event in TriggerEvent::for_modes(modes) {
            match dom.listen(ListenerKind::Trigger(&trigger, event)) {
                Some(listener) => self.listeners.push(listener),
                None => warn!(event = event.dom_name(), "host refused a trigger listener"),
            }
        }
        trace!(?trigger, listeners = self.listeners.len(), "bound trigger");
        self.trigger = Some(trigger);
    }

    /// Remove every listener and forget the trigger.
    pub fn unbind(&mut self, dom: &mut D) {
        for listener in self.listeners.drain(..) {
            dom.unlisten(listener);
        }
        self.trigger = None;
    }

    /// Bind to the host's current first element child, or unbind if it has none.
    pub fn rebind(&mut self, dom: &mut D, host: &D::Node, modes: TriggerModes) {
        match dom.first_element_child(host) {
            Some(trigger) => self.bind(dom, trigger, modes),
            None => self.unbind(dom),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryDom;
    use kurbo::Size;

    #[test]
    fn events_per_mode() {
        assert_eq!(
            TriggerEvent::for_modes(TriggerModes::default()),
            vec![
                TriggerEvent::MouseEnter,
                TriggerEvent::MouseLeave,
                TriggerEvent::Focus,
                TriggerEvent::Blur
            ]
        );
        assert_eq!(
            TriggerEvent::for_modes(TriggerModes::CLICK),
            vec![TriggerEvent::Click]
        );
        let manual = TriggerModes::MANUAL | TriggerModes::CLICK;
        assert!(TriggerEvent::for_modes(manual).is_empty());
    }

    #[test]
    fn bind_is_idempotent() {
        let mut dom = MemoryDom::new(Size::new(800.0, 600.0));
        let host = dom.append_element(dom.root(), "ui-tooltip");
        let button = dom.append_element(host, "button");
        let mut binder = TriggerBinder::<MemoryDom>::new();

        binder.bind(&mut dom, button, TriggerModes::default());
        binder.bind(&mut dom, button, TriggerModes::default());
        assert_eq!(binder.listener_count(), 4);
        assert_eq!(dom.live_listeners(), 4);
        assert_eq!(dom.listener_events(button).len(), 4);

        binder.unbind(&mut dom);
        binder.unbind(&mut dom);
        assert_eq!(dom.live_listeners(), 0);
        assert_eq!(dom.listeners_added(), dom.listeners_removed());
        assert!(binder.trigger().is_none());
    }

    #[test]
    fn manual_binds_nothing_but_tracks_trigger() {
        let mut dom = MemoryDom::new(Size::new(800.0, 600.0));
        let host = dom.append_element(dom.root(), "ui-tooltip");
        let button = dom.append_element(host, "button");
        let mut binder = TriggerBinder::<MemoryDom>::new();
        binder.rebind(&mut dom, &host, TriggerModes::MANUAL);
        assert_eq!(binder.trigger(), Some(&button));
        assert_eq!(dom.live_listeners(), 0);
    }

    #[test]
    fn rebind_follows_first_child() {
        let mut dom = MemoryDom::new(Size::new(800.0, 600.0));
        let host = dom.append_element(dom.root(), "ui-tooltip");
        let first = dom.append_element(host, "button");
        let mut binder = TriggerBinder::<MemoryDom>::new();
        binder.rebind(&mut dom, &host, TriggerModes::CLICK);
        assert_eq!(dom.listener_events(first), vec!["click"]);

        dom.detach(first);
        let second = dom.append_element(host, "a");
        binder.rebind(&mut dom, &host, TriggerModes::CLICK);
        assert_eq!(binder.trigger(), Some(&second));
        assert!(dom.listener_events(first).is_empty());
        assert_eq!(dom.listener_events(second), vec!["click"]);

        dom.detach(second);
        binder.rebind(&mut dom, &host, TriggerModes::CLICK);
        assert!(binder.trigger().is_none());
        assert_eq!(dom.live_listeners(), 0);
    }
}
