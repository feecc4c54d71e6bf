// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Browser host built on `web-sys`.
//!
//! [`WebTooltip::attach`] wires a [`Tooltip`] to a host element:
//!
//! - trigger, document click and window scroll listeners are `gloo` [`EventListener`]s,
//! - deferred positioning uses `gloo` [`AnimationFrame`]s,
//! - a `MutationObserver` on the host reports child-list and attribute changes.
//!
//! Dropping a listener or frame handle removes it, so [`Dom::unlisten`] and
//! [`Dom::cancel_frame`] just drop.
//!
//! Callbacks never call into the instance directly. They push a [`HostEvent`] onto a shared
//! queue and drain it if the instance is not already borrowed; an event raised while the
//! instance is busy (a `blur` fired by removing a focused panel, say) is drained by whoever
//! holds the borrow.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::{Rc, Weak};

use gloo::events::EventListener;
use gloo::render::{AnimationFrame, request_animation_frame};
use kurbo::{Point, Rect, Size, Vec2};
use tracing::{debug, warn};
use understory_placement::Side;
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use web_sys::{
    Document, Element, HtmlElement, MutationObserver, MutationObserverInit, MutationRecord, Window,
};

use crate::config::Properties;
use crate::dom::{Dom, HostEvent, ListenerKind};
use crate::panel::{PanelId, PanelKind};
use crate::tooltip::{Tooltip, VisibilityState};

/// Errors raised while attaching to a browser element.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum WebError {
    /// There is no window or document.
    #[error("no window or document is available")]
    NoDocument,
    /// The mutation observer could not be created or started.
    #[error("could not observe the host element: {0}")]
    Observe(String),
}

type Backlog = Rc<RefCell<VecDeque<HostEvent<Element>>>>;

#[derive(Clone)]
struct Sink {
    inner: Weak<RefCell<Inner>>,
    backlog: Backlog,
}

impl core::fmt::Debug for Sink {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Sink")
            .field("queued", &self.backlog.borrow().len())
            .finish_non_exhaustive()
    }
}

impl Sink {
    fn deliver(&self, event: HostEvent<Element>) {
        self.backlog.borrow_mut().push_back(event);
        if let Some(shared) = self.inner.upgrade()
            && let Ok(mut inner) = shared.try_borrow_mut()
        {
            inner.drain(&self.backlog);
        }
    }
}

/// [`Dom`] over the browser document.
pub struct WebDom {
    window: Window,
    document: Document,
    root: Element,
    sink: Sink,
}

impl core::fmt::Debug for WebDom {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("WebDom")
            .field("root", &self.root.tag_name())
            .field("sink", &self.sink)
            .finish_non_exhaustive()
    }
}

impl WebDom {
    fn with_style(&self, node: &Element, f: impl FnOnce(&web_sys::CssStyleDeclaration)) {
        match node.dyn_ref::<HtmlElement>() {
            Some(element) => f(&element.style()),
            None => warn!(tag = %node.tag_name(), "cannot style a non-HTML element"),
        }
    }
}

fn set_px(style: &web_sys::CssStyleDeclaration, property: &str, value: f64) {
    if let Err(err) = style.set_property(property, &format!("{value}px")) {
        warn!(property, ?err, "could not set style");
    }
}

fn clear(style: &web_sys::CssStyleDeclaration, property: &str) {
    if let Err(err) = style.remove_property(property) {
        warn!(property, ?err, "could not clear style");
    }
}

impl Dom for WebDom {
    type Node = Element;
    type Listener = EventListener;
    type Frame = AnimationFrame;

    fn attribute(&self, node: &Element, name: &str) -> Option<String> {
        node.get_attribute(name)
    }

    fn has_attribute(&self, node: &Element, name: &str) -> bool {
        node.has_attribute(name)
    }

    fn first_element_child(&self, node: &Element) -> Option<Element> {
        node.first_element_child()
    }

    fn query_selector_all(&self, selector: &str) -> Vec<Element> {
        let Ok(list) = self.document.query_selector_all(selector) else {
            return Vec::new();
        };
        (0..list.length())
            .filter_map(|i| list.item(i))
            .filter_map(|node| node.dyn_into::<Element>().ok())
            .collect()
    }

    fn document_root(&self) -> Element {
        self.root.clone()
    }

    fn contains(&self, ancestor: &Element, node: &Element) -> bool {
        ancestor.contains(Some(node.as_ref()))
    }

    fn create_element(&mut self, tag: &str) -> Option<Element> {
        self.document.create_element(tag).ok()
    }

    fn set_attribute(&mut self, node: &Element, name: &str, value: &str) {
        if let Err(err) = node.set_attribute(name, value) {
            warn!(name, ?err, "could not set attribute");
        }
    }

    fn set_class_name(&mut self, node: &Element, value: &str) {
        node.set_class_name(value);
    }

    fn set_text_content(&mut self, node: &Element, text: &str) {
        node.set_text_content(Some(text));
    }

    fn set_inner_html(&mut self, node: &Element, html: &str) {
        node.set_inner_html(html);
    }

    fn append_child(&mut self, parent: &Element, child: &Element) -> bool {
        parent.append_child(child).is_ok()
    }

    fn remove(&mut self, node: &Element) {
        node.remove();
    }

    fn set_position(&mut self, node: &Element, origin: Point) {
        self.with_style(node, |style| {
            set_px(style, "top", origin.y);
            set_px(style, "left", origin.x);
        });
    }

    fn set_arrow_offset(&mut self, node: &Element, side: Side, offset: f64) {
        let (set, other) = if side.is_vertical() {
            ("left", "top")
        } else {
            ("top", "left")
        };
        self.with_style(node, |style| {
            set_px(style, set, offset);
            clear(style, other);
        });
    }

    fn bounding_rect(&self, node: &Element) -> Option<Rect> {
        if !node.is_connected() {
            return None;
        }
        let r = node.get_bounding_client_rect();
        Some(Rect::new(r.left(), r.top(), r.right(), r.bottom()))
    }

    fn viewport(&self) -> Size {
        let read = |v: Result<wasm_bindgen::JsValue, wasm_bindgen::JsValue>| {
            v.ok().and_then(|v| v.as_f64()).unwrap_or(0.0)
        };
        Size::new(
            read(self.window.inner_width()),
            read(self.window.inner_height()),
        )
    }

    fn scroll_offset(&self, node: &Element) -> Vec2 {
        Vec2::new(f64::from(node.scroll_left()), f64::from(node.scroll_top()))
    }

    fn window_scroll(&self) -> Vec2 {
        Vec2::new(
            self.window.scroll_x().unwrap_or(0.0),
            self.window.scroll_y().unwrap_or(0.0),
        )
    }

    fn listen(&mut self, kind: ListenerKind<'_, Element>) -> Option<EventListener> {
        let sink = self.sink.clone();
        let listener = match kind {
            ListenerKind::Trigger(node, event) => {
                EventListener::new(node, event.dom_name(), move |_| {
                    sink.deliver(HostEvent::Trigger(event));
                })
            }
            ListenerKind::OutsideClick => EventListener::new(&self.document, "click", move |e| {
                let target = e.target().and_then(|t| t.dyn_into::<Element>().ok());
                sink.deliver(HostEvent::OutsideClick(target));
            }),
            ListenerKind::Scroll => EventListener::new(&self.window, "scroll", move |_| {
                sink.deliver(HostEvent::Scroll);
            }),
        };
        Some(listener)
    }

    fn unlisten(&mut self, listener: EventListener) {
        drop(listener);
    }

    fn request_frame(&mut self, panel: PanelId) -> AnimationFrame {
        let sink = self.sink.clone();
        request_animation_frame(move |_| sink.deliver(HostEvent::AnimationFrame(panel)))
    }

    fn cancel_frame(&mut self, frame: AnimationFrame) {
        drop(frame);
    }
}

struct Inner {
    dom: WebDom,
    tooltip: Tooltip<WebDom>,
}

impl Inner {
    fn drain(&mut self, backlog: &RefCell<VecDeque<HostEvent<Element>>>) {
        loop {
            let next = backlog.borrow_mut().pop_front();
            let Some(event) = next else {
                break;
            };
            self.tooltip.handle(&mut self.dom, event);
        }
    }
}

/// A [`Tooltip`] attached to a browser element.
///
/// Connected on [`attach`](Self::attach), disconnected on drop.
pub struct WebTooltip {
    host: Element,
    inner: Rc<RefCell<Inner>>,
    backlog: Backlog,
    observer: MutationObserver,
    _on_mutation: Closure<dyn FnMut(js_sys::Array, MutationObserver)>,
}

impl core::fmt::Debug for WebTooltip {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let state = self
            .inner
            .try_borrow()
            .ok()
            .map(|inner| inner.tooltip.state());
        f.debug_struct("WebTooltip")
            .field("host", &self.host.tag_name())
            .field("state", &state)
            .finish_non_exhaustive()
    }
}

impl WebTooltip {
    /// Attach an instance of `kind` to `host` and connect it.
    pub fn attach(
        host: Element,
        kind: PanelKind,
        properties: Properties,
    ) -> Result<Self, WebError> {
        let window = web_sys::window().ok_or(WebError::NoDocument)?;
        let document = window.document().ok_or(WebError::NoDocument)?;
        let root = document
            .body()
            .map(Element::from)
            .or_else(|| document.document_element())
            .ok_or(WebError::NoDocument)?;

        let backlog: Backlog = Rc::default();
        let inner = Rc::new_cyclic(|weak| {
            let sink = Sink {
                inner: weak.clone(),
                backlog: backlog.clone(),
            };
            RefCell::new(Inner {
                dom: WebDom {
                    window,
                    document,
                    root,
                    sink,
                },
                tooltip: Tooltip::new(host.clone(), kind).with_properties(properties),
            })
        });

        let sink = inner.borrow().dom.sink.clone();
        let on_mutation = Closure::<dyn FnMut(js_sys::Array, MutationObserver)>::wrap(Box::new(
            move |records: js_sys::Array, _: MutationObserver| {
                for record in records.iter() {
                    let Ok(record) = record.dyn_into::<MutationRecord>() else {
                        continue;
                    };
                    match record.type_().as_str() {
                        "childList" => sink.deliver(HostEvent::ChildrenChanged),
                        "attributes" => {
                            if let Some(name) = record.attribute_name() {
                                sink.deliver(HostEvent::AttributeChanged(name));
                            }
                        }
                        _ => {}
                    }
                }
            },
        ));
        let observer = MutationObserver::new(on_mutation.as_ref().unchecked_ref())
            .map_err(|err| WebError::Observe(format!("{err:?}")))?;
        let options = MutationObserverInit::new();
        options.set_child_list(true);
        options.set_attributes(true);
        observer
            .observe_with_options(&host, &options)
            .map_err(|err| WebError::Observe(format!("{err:?}")))?;

        let this = Self {
            host,
            inner,
            backlog,
            observer,
            _on_mutation: on_mutation,
        };
        this.with(|tooltip, dom| tooltip.connect(dom));
        debug!(host = %this.host.tag_name(), ?kind, "attached");
        Ok(this)
    }

    /// Host element.
    pub fn host(&self) -> &Element {
        &self.host
    }

    /// Current visibility.
    pub fn state(&self) -> VisibilityState {
        self.with(|tooltip, _| tooltip.state())
    }

    /// Show the panel. Only effective in manual mode.
    pub fn show(&self) {
        self.with(|tooltip, dom| tooltip.show(dom));
    }

    /// Hide the panel. Only effective in manual mode.
    pub fn hide(&self) {
        self.with(|tooltip, dom| tooltip.hide(dom));
    }

    /// Replace the in-memory properties.
    pub fn set_properties(&self, properties: Properties) {
        self.with(|tooltip, dom| tooltip.set_properties(dom, properties));
    }

    fn with<R>(&self, f: impl FnOnce(&mut Tooltip<WebDom>, &mut WebDom) -> R) -> R {
        let mut guard = self.inner.borrow_mut();
        let Inner { dom, tooltip } = &mut *guard;
        let out = f(tooltip, dom);
        guard.drain(&self.backlog);
        out
    }
}

impl Drop for WebTooltip {
    fn drop(&mut self) {
        self.observer.disconnect();
        if let Ok(mut guard) = self.inner.try_borrow_mut() {
            let Inner { dom, tooltip } = &mut *guard;
            tooltip.disconnect(dom);
        }
        self.backlog.borrow_mut().clear();
    }
}
