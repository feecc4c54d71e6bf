// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Visibility controller: the shown/hidden state machine and everything it owns.
//!
//! ## States
//!
//! `Hidden` (initial) and `Visible`.
//!
//! - `Hidden → Visible`: a trigger event allowed by the configured modes, or
//!   [`Tooltip::show`] in manual mode. The panel is built immediately and positioned on the
//!   next animation frame, once the host has laid it out.
//! - `Visible → Hidden`: pointer leave / blur (hover / focus), a second click, an outside
//!   click or a window scroll (click), or [`Tooltip::hide`] in manual mode. The panel is
//!   removed, a pending frame is cancelled, and document listeners are released.
//! - Requests that would not change the state do nothing.
//! - [`Tooltip::disconnect`] forces `Hidden` whatever the mode.
//!
//! ## Resources
//!
//! While visible in click mode the instance holds its own document click and window scroll
//! listeners. They are acquired on entering `Visible` and released on leaving it, exactly
//! once each. A frame that fires for a panel that is no longer current is ignored.

use kurbo::{Point, Rect};
use tracing::{debug, trace, warn};
use understory_placement::{
    Geometry, PlacementDecision, Side, arrow_offset, gap_correction, resolve,
};

use crate::binder::{TriggerBinder, TriggerEvent};
use crate::config::{Config, OBSERVED_ATTRIBUTES, Properties, TriggerModes};
use crate::container::resolve_container;
use crate::dom::{Dom, HostEvent, ListenerKind};
use crate::panel::{PanelFactory, PanelHandle, PanelId, PanelKind, render_content, root_class};

/// Arrow size used when the host cannot measure the arrow node.
pub const DEFAULT_ARROW_SIZE: f64 = 8.0;

/// Whether the panel is on screen.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub enum VisibilityState {
    /// No panel exists.
    #[default]
    Hidden,
    /// Exactly one panel exists.
    Visible,
}

/// One tooltip or popover instance attached to a host element.
pub struct Tooltip<D: Dom> {
    host: D::Node,
    properties: Properties,
    config: Config,
    state: VisibilityState,
    connected: bool,
    binder: TriggerBinder<D>,
    panels: PanelFactory,
    panel: Option<PanelHandle<D::Node>>,
    pending: Option<(PanelId, D::Frame)>,
    outside_click: Option<D::Listener>,
    scroll: Option<D::Listener>,
    placement: Option<PlacementDecision>,
}

impl<D: Dom> core::fmt::Debug for Tooltip<D> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Tooltip")
            .field("host", &self.host)
            .field("kind", &self.panels.kind())
            .field("state", &self.state)
            .field("connected", &self.connected)
            .field("binder", &self.binder)
            .field("panel", &self.panel)
            .field("pending", &self.pending.as_ref().map(|(id, _)| *id))
            .field("outside_click", &self.outside_click.is_some())
            .field("scroll", &self.scroll.is_some())
            .field("placement", &self.placement)
            .finish_non_exhaustive()
    }
}

impl<D: Dom> Tooltip<D> {
    /// Create a disconnected instance for `host`.
    pub fn new(host: D::Node, kind: PanelKind) -> Self {
        Self {
            host,
            properties: Properties::default(),
            config: Config::defaults(kind),
            state: VisibilityState::Hidden,
            connected: false,
            binder: TriggerBinder::new(),
            panels: PanelFactory::new(kind),
            panel: None,
            pending: None,
            outside_click: None,
            scroll: None,
            placement: None,
        }
    }

    /// Builder-style [`Properties`] for a not-yet-connected instance.
    pub fn with_properties(mut self, properties: Properties) -> Self {
        self.properties = properties;
        self
    }

    /// Host element.
    pub fn host(&self) -> &D::Node {
        &self.host
    }

    /// Current configuration snapshot.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// In-memory properties.
    pub fn properties(&self) -> &Properties {
        &self.properties
    }

    /// Current visibility.
    pub fn state(&self) -> VisibilityState {
        self.state
    }

    /// Whether the host is connected.
    pub fn is_connected(&self) -> bool {
        self.connected
    }

    /// Current trigger element.
    pub fn trigger(&self) -> Option<&D::Node> {
        self.binder.trigger()
    }

    /// The live panel, if visible.
    pub fn panel(&self) -> Option<&PanelHandle<D::Node>> {
        self.panel.as_ref()
    }

    /// Last placement written to the live panel.
    pub fn placement(&self) -> Option<PlacementDecision> {
        self.placement
    }

    /// Resolve the configuration and bind the trigger.
    pub fn connect(&mut self, dom: &mut D) {
        if self.connected {
            return;
        }
        self.connected = true;
        self.config = Config::resolve(dom, &self.host, &self.properties, self.panels.kind());
        self.binder
            .rebind(dom, &self.host, self.config.trigger_modes);
        debug!(host = ?self.host, modes = ?self.config.trigger_modes, "connected");
    }

    /// Hide synchronously and release every listener.
    pub fn disconnect(&mut self, dom: &mut D) {
        if !self.connected {
            return;
        }
        self.request_hide(dom);
        self.binder.unbind(dom);
        self.release_document_listeners(dom);
        self.connected = false;
        debug!(host = ?self.host, "disconnected");
    }

    /// Replace the in-memory properties and re-resolve.
    pub fn set_properties(&mut self, dom: &mut D, properties: Properties) {
        self.properties = properties;
        self.refresh(dom);
    }

    /// Show the panel. Only effective in manual mode.
    pub fn show(&mut self, dom: &mut D) {
        if !self.config.is_manual() {
            trace!("show() ignored outside manual mode");
            return;
        }
        self.request_show(dom);
    }

    /// Hide the panel. Only effective in manual mode.
    pub fn hide(&mut self, dom: &mut D) {
        if !self.config.is_manual() {
            trace!("hide() ignored outside manual mode");
            return;
        }
        self.request_hide(dom);
    }

    /// Deliver a host event.
    pub fn handle(&mut self, dom: &mut D, event: HostEvent<D::Node>) {
        if !self.connected {
            return;
        }
        match event {
            HostEvent::Trigger(event) => self.on_trigger(dom, event),
            HostEvent::OutsideClick(target) => self.on_outside_click(dom, target),
            HostEvent::Scroll => {
                if self.state == VisibilityState::Visible && self.drives(TriggerModes::CLICK) {
                    self.request_hide(dom);
                }
            }
            HostEvent::AnimationFrame(id) => {
                let current = matches!(&self.pending, Some((pending, _)) if *pending == id);
                if current {
                    self.pending = None;
                    self.position(dom, id);
                } else {
                    trace!(?id, "stale frame ignored");
                }
            }
            HostEvent::ChildrenChanged => {
                self.binder
                    .rebind(dom, &self.host, self.config.trigger_modes);
                self.reschedule(dom);
            }
            HostEvent::AttributeChanged(name) => {
                if OBSERVED_ATTRIBUTES.contains(&name.as_str()) {
                    self.refresh(dom);
                }
            }
        }
    }

    fn drives(&self, mode: TriggerModes) -> bool {
        self.config.trigger_modes.drives(mode)
    }

    fn on_trigger(&mut self, dom: &mut D, event: TriggerEvent) {
        match event {
            TriggerEvent::Click if self.drives(TriggerModes::CLICK) => match self.state {
                VisibilityState::Hidden => self.request_show(dom),
                VisibilityState::Visible => self.request_hide(dom),
            },
            TriggerEvent::MouseEnter if self.drives(TriggerModes::HOVER) => {
                self.request_show(dom);
            }
            TriggerEvent::MouseLeave if self.drives(TriggerModes::HOVER) => {
                self.request_hide(dom);
            }
            TriggerEvent::Focus if self.drives(TriggerModes::FOCUS) => self.request_show(dom),
            TriggerEvent::Blur if self.drives(TriggerModes::FOCUS) => self.request_hide(dom),
            _ => trace!(?event, "trigger event not bound to a mode"),
        }
    }

    fn on_outside_click(&mut self, dom: &mut D, target: Option<D::Node>) {
        if self.state != VisibilityState::Visible || !self.drives(TriggerModes::CLICK) {
            return;
        }
        let inside = target.is_some_and(|target| {
            self.binder
                .trigger()
                .is_some_and(|trigger| dom.contains(trigger, &target))
                || self
                    .panel
                    .as_ref()
                    .is_some_and(|panel| dom.contains(panel.root(), &target))
        });
        if !inside {
            self.request_hide(dom);
        }
    }

    fn request_show(&mut self, dom: &mut D) {
        if !self.connected || self.state == VisibilityState::Visible {
            return;
        }
        let container = resolve_container(dom, self.config.container_selector.as_deref());
        let side = self
            .config
            .effective_placement()
            .side()
            .unwrap_or(Side::Top);
        match self.panels.create(dom, &self.config, &container, side) {
            Ok(panel) => {
                let id = panel.id();
                self.panel = Some(panel);
                self.state = VisibilityState::Visible;
                self.sync_document_listeners(dom);
                self.schedule_position(dom, id);
                debug!(?id, "shown");
            }
            Err(err) => warn!(%err, "could not show panel"),
        }
    }

    fn request_hide(&mut self, dom: &mut D) {
        if self.state == VisibilityState::Hidden {
            return;
        }
        self.state = VisibilityState::Hidden;
        if let Some((_, frame)) = self.pending.take() {
            dom.cancel_frame(frame);
        }
        self.release_document_listeners(dom);
        if let Some(panel) = self.panel.take() {
            debug!(id = ?panel.id(), "hidden");
            self.panels.destroy(dom, panel);
        }
        self.placement = None;
    }

    /// Re-resolve after an attribute or property change.
    fn refresh(&mut self, dom: &mut D) {
        let config = Config::resolve(dom, &self.host, &self.properties, self.panels.kind());
        if config == self.config {
            return;
        }
        let modes_changed = config.trigger_modes != self.config.trigger_modes;
        let content_changed =
            config.content != self.config.content || config.use_html != self.config.use_html;
        let variant_changed = config.variant != self.config.variant;
        self.config = config;
        if !self.connected {
            return;
        }
        if modes_changed {
            self.binder
                .rebind(dom, &self.host, self.config.trigger_modes);
            self.sync_document_listeners(dom);
        }
        if let Some(panel) = &self.panel {
            if content_changed {
                render_content(dom, panel.content(), &self.config);
            }
            if variant_changed {
                self.panels.restyle(dom, panel, &self.config);
            }
        }
        self.reschedule(dom);
    }

    fn sync_document_listeners(&mut self, dom: &mut D) {
        let wanted = self.state == VisibilityState::Visible && self.drives(TriggerModes::CLICK);
        if !wanted {
            self.release_document_listeners(dom);
            return;
        }
        if self.outside_click.is_none() {
            self.outside_click = dom.listen(ListenerKind::OutsideClick);
            if self.outside_click.is_none() {
                warn!("host refused the outside-click listener");
            }
        }
        if self.scroll.is_none() {
            self.scroll = dom.listen(ListenerKind::Scroll);
            if self.scroll.is_none() {
                warn!("host refused the scroll listener");
            }
        }
    }

    fn release_document_listeners(&mut self, dom: &mut D) {
        if let Some(listener) = self.outside_click.take() {
            dom.unlisten(listener);
        }
        if let Some(listener) = self.scroll.take() {
            dom.unlisten(listener);
        }
    }

    fn reschedule(&mut self, dom: &mut D) {
        if let Some(id) = self.panel.as_ref().map(PanelHandle::id) {
            self.schedule_position(dom, id);
        }
    }

    fn schedule_position(&mut self, dom: &mut D, id: PanelId) {
        if let Some((_, frame)) = self.pending.take() {
            dom.cancel_frame(frame);
        }
        let frame = dom.request_frame(id);
        self.pending = Some((id, frame));
    }

    /// Measure, resolve, and write the placement of panel `id`.
    fn position(&mut self, dom: &mut D, id: PanelId) {
        let Some(panel) = self.panel.as_ref().filter(|panel| panel.id() == id) else {
            return;
        };
        let Some(trigger) = self.binder.trigger() else {
            debug!("no trigger element; positioning skipped");
            return;
        };
        let Some(trigger_rect) = dom.bounding_rect(trigger) else {
            debug!("trigger is not laid out; positioning skipped");
            return;
        };
        let Some(panel_rect) = dom.bounding_rect(panel.root()) else {
            debug!("panel is not laid out; positioning skipped");
            return;
        };
        let viewport = dom.viewport();
        let (container, scroll) = if *panel.container() == dom.document_root() {
            (
                Rect::from_origin_size(Point::ZERO, viewport),
                dom.window_scroll(),
            )
        } else {
            let Some(rect) = dom.bounding_rect(panel.container()) else {
                debug!("container is not laid out; positioning skipped");
                return;
            };
            (rect, dom.scroll_offset(panel.container()))
        };
        let geometry = Geometry {
            trigger: trigger_rect,
            panel: panel_rect.size(),
            container,
            scroll,
            viewport,
        };

        let mut decision = resolve(&geometry, self.config.effective_placement());
        dom.set_class_name(
            panel.root(),
            &root_class(self.panels.kind(), decision.side, &self.config),
        );
        dom.set_position(panel.root(), decision.origin());

        if let Some(rendered) = dom.bounding_rect(panel.root())
            && let Some(delta) = gap_correction(decision.side, trigger_rect, rendered)
        {
            decision.left += delta;
            dom.set_position(panel.root(), decision.origin());
        }

        if let Some(rendered) = dom.bounding_rect(panel.root()) {
            let arrow_size = dom
                .bounding_rect(panel.arrow())
                .map(|arrow| {
                    if decision.side.is_vertical() {
                        arrow.width()
                    } else {
                        arrow.height()
                    }
                })
                .filter(|size| *size > 0.0)
                .unwrap_or(DEFAULT_ARROW_SIZE);
            let offset = arrow_offset(decision.side, trigger_rect, rendered, arrow_size);
            dom.set_arrow_offset(panel.arrow(), decision.side, offset);
        }

        trace!(?decision, "positioned");
        self.placement = Some(decision);
    }
}
