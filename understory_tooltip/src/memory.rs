// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A headless, arena-backed [`Dom`] host.
//!
//! `MemoryDom` keeps a small element tree with attributes, text, and explicit geometry.
//! There is no layout engine: trigger rects are set with [`MemoryDom::set_rect`], and
//! positioned elements take their size from [`MemoryDom::set_intrinsic_size`], keyed by
//! their first class token. A [`layout skew`](MemoryDom::set_layout_skew) can offset every
//! positioned element to mimic border-box and rounding differences of a real engine.
//!
//! Listener registrations and frame requests are recorded, not dispatched: drive the
//! instance by passing [`HostEvent`](crate::HostEvent)s to
//! [`Tooltip::handle`](crate::Tooltip::handle), and use [`MemoryDom::take_frames`] to
//! collect the frames that are due.
//!
//! Selectors support a single `#id`, `.class`, or tag name.

use std::collections::BTreeMap;

use kurbo::{Point, Rect, Size, Vec2};
use understory_placement::Side;

use crate::dom::{Dom, ListenerKind};
use crate::panel::PanelId;

/// Element handle in a [`MemoryDom`].
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct ElementId(usize);

/// Listener handle in a [`MemoryDom`].
#[derive(Debug, Eq, PartialEq)]
pub struct MemoryListener(usize);

/// Frame handle in a [`MemoryDom`].
///
/// Carries the serial of its request, so a handle outliving its slot cancels nothing.
#[derive(Debug, Eq, PartialEq)]
pub struct MemoryFrame {
    slot: usize,
    serial: u64,
}

/// Where a recorded listener is attached.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ListenerTarget {
    /// An element.
    Element(ElementId),
    /// The document.
    Document,
    /// The window.
    Window,
}

#[derive(Clone, Debug, Default)]
struct Element {
    tag: String,
    attributes: BTreeMap<String, String>,
    text: String,
    html: Option<String>,
    parent: Option<ElementId>,
    children: Vec<ElementId>,
    rect: Option<Rect>,
    position: Option<Point>,
    arrow: Option<(Side, f64)>,
    scroll: Vec2,
}

/// Headless DOM host.
#[derive(Clone, Debug)]
pub struct MemoryDom {
    elements: Vec<Element>,
    viewport: Size,
    window_scroll: Vec2,
    intrinsic: BTreeMap<String, Size>,
    skew: Vec2,
    listeners: Vec<Option<(ListenerTarget, &'static str)>>,
    added: usize,
    removed: usize,
    frames: Vec<Option<(u64, PanelId)>>,
    frame_serial: u64,
    mutations: usize,
    refuse_elements: bool,
}

impl MemoryDom {
    /// Create a document whose root (`body`) fills a viewport of `viewport` size.
    pub fn new(viewport: Size) -> Self {
        Self {
            elements: vec![Element {
                tag: "body".into(),
                ..Element::default()
            }],
            viewport,
            window_scroll: Vec2::ZERO,
            intrinsic: BTreeMap::new(),
            skew: Vec2::ZERO,
            listeners: Vec::new(),
            added: 0,
            removed: 0,
            frames: Vec::new(),
            frame_serial: 0,
            mutations: 0,
            refuse_elements: false,
        }
    }

    /// The document root.
    pub fn root(&self) -> ElementId {
        ElementId(0)
    }

    /// Create an element and append it to `parent`.
    pub fn append_element(&mut self, parent: ElementId, tag: &str) -> ElementId {
        let id = self.alloc(tag);
        self.attach(parent, id);
        id
    }

    /// Detach an element from its parent.
    pub fn detach(&mut self, id: ElementId) {
        if let Some(parent) = self.elements[id.0].parent.take() {
            self.elements[parent.0].children.retain(|c| *c != id);
            self.mutations += 1;
        }
    }

    /// Set an attribute without going through [`Dom`].
    pub fn set_attr(&mut self, id: ElementId, name: &str, value: &str) {
        self.elements[id.0]
            .attributes
            .insert(name.to_owned(), value.to_owned());
    }

    /// Remove an attribute.
    pub fn remove_attr(&mut self, id: ElementId, name: &str) {
        self.elements[id.0].attributes.remove(name);
    }

    /// Attribute value.
    pub fn attr(&self, id: ElementId, name: &str) -> Option<String> {
        self.elements[id.0].attributes.get(name).cloned()
    }

    /// Class attribute, or the empty string.
    pub fn class_name(&self, id: ElementId) -> String {
        self.attr(id, "class").unwrap_or_default()
    }

    /// Text content set through [`Dom::set_text_content`].
    pub fn text(&self, id: ElementId) -> &str {
        &self.elements[id.0].text
    }

    /// Markup set through [`Dom::set_inner_html`].
    pub fn inner_html(&self, id: ElementId) -> Option<&str> {
        self.elements[id.0].html.as_deref()
    }

    /// Child elements in order.
    pub fn children(&self, id: ElementId) -> Vec<ElementId> {
        self.elements[id.0].children.clone()
    }

    /// Whether the element is attached to the document.
    pub fn is_connected(&self, id: ElementId) -> bool {
        let mut current = Some(id);
        while let Some(node) = current {
            if node == self.root() {
                return true;
            }
            current = self.elements[node.0].parent;
        }
        false
    }

    /// Connected elements whose class list contains `token`.
    pub fn find_by_class(&self, token: &str) -> Vec<ElementId> {
        (0..self.elements.len())
            .map(ElementId)
            .filter(|id| self.is_connected(*id) && self.has_class(*id, token))
            .collect()
    }

    /// Fix an element's viewport rect.
    pub fn set_rect(&mut self, id: ElementId, rect: Rect) {
        self.elements[id.0].rect = Some(rect);
    }

    /// Scroll offset of an element.
    pub fn set_scroll(&mut self, id: ElementId, scroll: Vec2) {
        self.elements[id.0].scroll = scroll;
    }

    /// Scroll offset of the window.
    pub fn set_window_scroll(&mut self, scroll: Vec2) {
        self.window_scroll = scroll;
    }

    /// Size of elements whose first class token is `class`.
    pub fn set_intrinsic_size(&mut self, class: &str, size: Size) {
        self.intrinsic.insert(class.to_owned(), size);
    }

    /// Offset added to every positioned element's rendered rect.
    pub fn set_layout_skew(&mut self, skew: Vec2) {
        self.skew = skew;
    }

    /// Make [`Dom::create_element`] fail.
    pub fn refuse_elements(&mut self, refuse: bool) {
        self.refuse_elements = refuse;
    }

    /// Position written through [`Dom::set_position`].
    pub fn position(&self, id: ElementId) -> Option<Point> {
        self.elements[id.0].position
    }

    /// Arrow offset written through [`Dom::set_arrow_offset`].
    pub fn arrow_offset(&self, id: ElementId) -> Option<(Side, f64)> {
        self.elements[id.0].arrow
    }

    /// Number of live listeners.
    pub fn live_listeners(&self) -> usize {
        self.listeners.iter().flatten().count()
    }

    /// Live listeners on `target`, by event type.
    pub fn listeners_on(&self, target: ListenerTarget) -> Vec<&'static str> {
        self.listeners
            .iter()
            .flatten()
            .filter(|(t, _)| *t == target)
            .map(|(_, event)| *event)
            .collect()
    }

    /// Live listeners on an element, by event type.
    pub fn listener_events(&self, id: ElementId) -> Vec<&'static str> {
        self.listeners_on(ListenerTarget::Element(id))
    }

    /// Total listeners ever added.
    pub fn listeners_added(&self) -> usize {
        self.added
    }

    /// Total listeners ever removed.
    pub fn listeners_removed(&self) -> usize {
        self.removed
    }

    /// Frames requested and not yet cancelled or taken, in request order.
    pub fn pending_frames(&self) -> Vec<PanelId> {
        let mut pending: Vec<_> = self.frames.iter().flatten().copied().collect();
        pending.sort_by_key(|(serial, _)| *serial);
        pending.into_iter().map(|(_, id)| id).collect()
    }

    /// Take every due frame; deliver each as [`HostEvent::AnimationFrame`](crate::HostEvent::AnimationFrame).
    pub fn take_frames(&mut self) -> Vec<PanelId> {
        let mut due: Vec<_> = self.frames.iter_mut().filter_map(Option::take).collect();
        due.sort_by_key(|(serial, _)| *serial);
        due.into_iter().map(|(_, id)| id).collect()
    }

    /// Count of tree, attribute, content, and style mutations made through [`Dom`].
    pub fn mutations(&self) -> usize {
        self.mutations
    }

    fn alloc(&mut self, tag: &str) -> ElementId {
        self.elements.push(Element {
            tag: tag.to_owned(),
            ..Element::default()
        });
        ElementId(self.elements.len() - 1)
    }

    fn attach(&mut self, parent: ElementId, child: ElementId) {
        self.detach(child);
        self.elements[child.0].parent = Some(parent);
        self.elements[parent.0].children.push(child);
        self.mutations += 1;
    }

    fn has_class(&self, id: ElementId, token: &str) -> bool {
        self.elements[id.0]
            .attributes
            .get("class")
            .is_some_and(|class| class.split_whitespace().any(|t| t == token))
    }

    fn intrinsic_size(&self, id: ElementId) -> Option<Size> {
        let class = self.elements[id.0].attributes.get("class")?;
        let first = class.split_whitespace().next()?;
        self.intrinsic.get(first).copied()
    }

    /// `None` if the selector is not a plain `#id`, `.class` or tag name.
    fn matches(&self, id: ElementId, selector: &str) -> Option<bool> {
        let element = &self.elements[id.0];
        let (name, hit) = if let Some(name) = selector.strip_prefix('#') {
            let id_attr = element.attributes.get("id");
            (name, id_attr.is_some_and(|v| v == name))
        } else if let Some(name) = selector.strip_prefix('.') {
            (name, self.has_class(id, name))
        } else {
            (selector, element.tag.eq_ignore_ascii_case(selector))
        };
        simple_name(name).then_some(hit)
    }

    /// Origin of the containing block of `id`, in viewport space, minus its scroll.
    fn containing_origin(&self, id: ElementId) -> Point {
        match self.elements[id.0].parent {
            Some(parent) if parent != self.root() => {
                let origin = self
                    .bounding_rect(&parent)
                    .map_or(Point::ZERO, |r| r.origin());
                origin - self.elements[parent.0].scroll
            }
            _ => Point::ZERO - self.window_scroll,
        }
    }
}

impl Dom for MemoryDom {
    type Node = ElementId;
    type Listener = MemoryListener;
    type Frame = MemoryFrame;

    fn attribute(&self, node: &ElementId, name: &str) -> Option<String> {
        self.attr(*node, name)
    }

    fn first_element_child(&self, node: &ElementId) -> Option<ElementId> {
        self.elements[node.0].children.first().copied()
    }

    fn query_selector_all(&self, selector: &str) -> Vec<ElementId> {
        let selector = selector.trim();
        let mut out = Vec::new();
        for id in (0..self.elements.len()).map(ElementId) {
            match self.matches(id, selector) {
                None => return Vec::new(),
                Some(true) if self.is_connected(id) => out.push(id),
                Some(_) => {}
            }
        }
        out
    }

    fn document_root(&self) -> ElementId {
        self.root()
    }

    fn contains(&self, ancestor: &ElementId, node: &ElementId) -> bool {
        let mut current = Some(*node);
        while let Some(id) = current {
            if id == *ancestor {
                return true;
            }
            current = self.elements[id.0].parent;
        }
        false
    }

    fn create_element(&mut self, tag: &str) -> Option<ElementId> {
        if self.refuse_elements {
            return None;
        }
        Some(self.alloc(tag))
    }

    fn set_attribute(&mut self, node: &ElementId, name: &str, value: &str) {
        self.set_attr(*node, name, value);
        self.mutations += 1;
    }

    fn set_class_name(&mut self, node: &ElementId, value: &str) {
        self.set_attribute(node, "class", value);
    }

    fn set_text_content(&mut self, node: &ElementId, text: &str) {
        let element = &mut self.elements[node.0];
        element.text = text.to_owned();
        element.html = None;
        self.mutations += 1;
    }

    fn set_inner_html(&mut self, node: &ElementId, html: &str) {
        let element = &mut self.elements[node.0];
        element.text.clear();
        element.html = Some(html.to_owned());
        self.mutations += 1;
    }

    fn append_child(&mut self, parent: &ElementId, child: &ElementId) -> bool {
        if self.contains(child, parent) {
            return false;
        }
        self.attach(*parent, *child);
        true
    }

    fn remove(&mut self, node: &ElementId) {
        self.detach(*node);
    }

    fn set_position(&mut self, node: &ElementId, origin: Point) {
        self.elements[node.0].position = Some(origin);
        self.mutations += 1;
    }

    fn set_arrow_offset(&mut self, node: &ElementId, side: Side, offset: f64) {
        self.elements[node.0].arrow = Some((side, offset));
        self.mutations += 1;
    }

    fn bounding_rect(&self, node: &ElementId) -> Option<Rect> {
        if !self.is_connected(*node) {
            return None;
        }
        if *node == self.root() {
            return Some(Rect::from_origin_size(
                Point::ZERO - self.window_scroll,
                self.viewport,
            ));
        }
        let element = &self.elements[node.0];
        if let Some(rect) = element.rect {
            return Some(rect);
        }
        let size = self.intrinsic_size(*node)?;
        let origin = match element.position {
            Some(position) => self.containing_origin(*node) + position.to_vec2() + self.skew,
            None => element
                .parent
                .and_then(|parent| self.bounding_rect(&parent))
                .map_or(Point::ZERO, |rect| rect.origin()),
        };
        Some(Rect::from_origin_size(origin, size))
    }

    fn viewport(&self) -> Size {
        self.viewport
    }

    fn scroll_offset(&self, node: &ElementId) -> Vec2 {
        self.elements[node.0].scroll
    }

    fn window_scroll(&self) -> Vec2 {
        self.window_scroll
    }

    fn listen(&mut self, kind: ListenerKind<'_, ElementId>) -> Option<MemoryListener> {
        let record = match kind {
            ListenerKind::Trigger(node, event) => {
                (ListenerTarget::Element(*node), event.dom_name())
            }
            ListenerKind::OutsideClick => (ListenerTarget::Document, "click"),
            ListenerKind::Scroll => (ListenerTarget::Window, "scroll"),
        };
        self.added += 1;
        Some(MemoryListener(occupy(&mut self.listeners, record)))
    }

    fn unlisten(&mut self, listener: MemoryListener) {
        if self.listeners[listener.0].take().is_some() {
            self.removed += 1;
        }
    }

    fn request_frame(&mut self, panel: PanelId) -> MemoryFrame {
        self.frame_serial += 1;
        let serial = self.frame_serial;
        MemoryFrame {
            slot: occupy(&mut self.frames, (serial, panel)),
            serial,
        }
    }

    fn cancel_frame(&mut self, frame: MemoryFrame) {
        if let Some(slot) = self.frames.get_mut(frame.slot)
            && matches!(slot, Some((serial, _)) if *serial == frame.serial)
        {
            *slot = None;
        }
    }
}

fn simple_name(s: &str) -> bool {
    let word = |c: char| c.is_ascii_alphanumeric() || c == '-' || c == '_';
    !s.is_empty() && s.chars().all(word)
}

/// Store `value` in the first vacant slot, growing only when none is free.
fn occupy<T>(slots: &mut Vec<Option<T>>, value: T) -> usize {
    match slots.iter().position(Option::is_none) {
        Some(index) => {
            slots[index] = Some(value);
            index
        }
        None => {
            slots.push(Some(value));
            slots.len() - 1
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::panel::{PanelFactory, PanelKind};

    fn panel_ids(dom: &mut MemoryDom, count: usize) -> Vec<PanelId> {
        let root = dom.root();
        let config = Config::defaults(PanelKind::Tooltip);
        let mut factory = PanelFactory::new(PanelKind::Tooltip);
        (0..count)
            .map(|_| {
                let panel = factory.create(dom, &config, &root, Side::Top).unwrap();
                let id = panel.id();
                factory.destroy(dom, panel);
                id
            })
            .collect()
    }

    #[test]
    fn listener_slots_are_reused() {
        let mut dom = MemoryDom::new(Size::new(800.0, 600.0));
        for _ in 0..100 {
            let click = dom.listen(ListenerKind::OutsideClick).unwrap();
            let scroll = dom.listen(ListenerKind::Scroll).unwrap();
            dom.unlisten(click);
            dom.unlisten(scroll);
        }
        assert_eq!(dom.listeners.len(), 2);
        assert_eq!(dom.listeners_added(), 200);
        assert_eq!(dom.listeners_removed(), 200);
        assert_eq!(dom.live_listeners(), 0);
    }

    #[test]
    fn frame_slots_are_reused_in_request_order() {
        let mut dom = MemoryDom::new(Size::new(800.0, 600.0));
        let ids = panel_ids(&mut dom, 3);
        for _ in 0..50 {
            let first = dom.request_frame(ids[0]);
            dom.cancel_frame(first);
            let _ = dom.request_frame(ids[1]);
            assert_eq!(dom.take_frames(), vec![ids[1]]);
        }
        assert_eq!(dom.frames.len(), 1);

        // Slot 0 is reused by the third request, after the second.
        let a = dom.request_frame(ids[0]);
        let _b = dom.request_frame(ids[1]);
        dom.cancel_frame(a);
        let _c = dom.request_frame(ids[2]);
        assert_eq!(dom.pending_frames(), vec![ids[1], ids[2]]);
    }

    #[test]
    fn stale_frame_handle_cancels_nothing() {
        let mut dom = MemoryDom::new(Size::new(800.0, 600.0));
        let ids = panel_ids(&mut dom, 2);
        let old = dom.request_frame(ids[0]);
        assert_eq!(dom.take_frames(), vec![ids[0]]);

        let _new = dom.request_frame(ids[1]);
        dom.cancel_frame(old);
        assert_eq!(dom.pending_frames(), vec![ids[1]]);
    }
}
