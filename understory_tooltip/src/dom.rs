// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Host abstraction: the DOM operations the engine needs, and the events a host reports back.
//!
//! ## Overview
//!
//! The engine never talks to a browser directly. A host implements [`Dom`] for its node type
//! and forwards whatever happens on its side (listener callbacks, animation frames, mutation
//! records) to [`Tooltip::handle`](crate::Tooltip::handle) as [`HostEvent`]s.
//!
//! Listener and frame handles are owned values. [`Dom::unlisten`] and [`Dom::cancel_frame`]
//! consume them, so a handle can be released at most once.

use core::fmt::Debug;

use kurbo::{Point, Rect, Size, Vec2};
use understory_placement::Side;

use crate::binder::TriggerEvent;
use crate::panel::PanelId;

/// What a listener is registered for.
#[derive(Debug)]
pub enum ListenerKind<'a, N> {
    /// A trigger event on the trigger element.
    Trigger(&'a N, TriggerEvent),
    /// Clicks anywhere in the document; reported as [`HostEvent::OutsideClick`].
    OutsideClick,
    /// Scrolling of the window; reported as [`HostEvent::Scroll`].
    Scroll,
}

/// Something that happened on the host side, delivered to [`Tooltip::handle`](crate::Tooltip::handle).
#[derive(Clone, Debug, PartialEq)]
pub enum HostEvent<N> {
    /// A bound trigger listener fired.
    Trigger(TriggerEvent),
    /// A document-level click, with its target element if there is one.
    OutsideClick(Option<N>),
    /// The window scrolled.
    Scroll,
    /// A frame requested with [`Dom::request_frame`] fired.
    AnimationFrame(PanelId),
    /// The host element's child list changed.
    ChildrenChanged,
    /// An attribute on the host element changed.
    AttributeChanged(String),
}

/// DOM operations used by the engine.
///
/// Coordinates follow the browser: [`bounding_rect`](Dom::bounding_rect) is in viewport
/// space, [`set_position`](Dom::set_position) is in the coordinate space of the node's
/// containing block.
pub trait Dom {
    /// Element handle.
    type Node: Clone + PartialEq + Debug;
    /// Registration handle returned by [`listen`](Dom::listen).
    type Listener;
    /// Scheduled callback returned by [`request_frame`](Dom::request_frame).
    type Frame;

    /// Attribute value, or `None` if the attribute is absent.
    fn attribute(&self, node: &Self::Node, name: &str) -> Option<String>;

    /// Whether the attribute is present, whatever its value.
    fn has_attribute(&self, node: &Self::Node, name: &str) -> bool {
        self.attribute(node, name).is_some()
    }

    /// First element child, ignoring text nodes.
    fn first_element_child(&self, node: &Self::Node) -> Option<Self::Node>;

    /// All elements in the document matching `selector`; empty for invalid selectors.
    fn query_selector_all(&self, selector: &str) -> Vec<Self::Node>;

    /// The default container for floating panels.
    fn document_root(&self) -> Self::Node;

    /// Whether `node` is `ancestor` or one of its descendants.
    fn contains(&self, ancestor: &Self::Node, node: &Self::Node) -> bool;

    /// Create a detached element, or `None` if the host refuses.
    fn create_element(&mut self, tag: &str) -> Option<Self::Node>;

    /// Set an attribute.
    fn set_attribute(&mut self, node: &Self::Node, name: &str, value: &str);

    /// Replace the class list.
    fn set_class_name(&mut self, node: &Self::Node, value: &str);

    /// Replace the contents with escaped text.
    fn set_text_content(&mut self, node: &Self::Node, text: &str);

    /// Replace the contents with trusted markup.
    fn set_inner_html(&mut self, node: &Self::Node, html: &str);

    /// Append `child` to `parent`. Returns `false` if the host refused.
    fn append_child(&mut self, parent: &Self::Node, child: &Self::Node) -> bool;

    /// Detach `node` from its parent. Detached nodes are left alone.
    fn remove(&mut self, node: &Self::Node);

    /// Write the node's `top`/`left` inline style.
    fn set_position(&mut self, node: &Self::Node, origin: Point);

    /// Write an arrow's offset along the panel edge facing the trigger.
    ///
    /// Vertical sides offset from the left, horizontal sides from the top.
    fn set_arrow_offset(&mut self, node: &Self::Node, side: Side, offset: f64);

    /// Rendered bounds in viewport space, or `None` if the node is not laid out.
    fn bounding_rect(&self, node: &Self::Node) -> Option<Rect>;

    /// Viewport size.
    fn viewport(&self) -> Size;

    /// Scroll offset of an element.
    fn scroll_offset(&self, node: &Self::Node) -> Vec2;

    /// Scroll offset of the window.
    fn window_scroll(&self) -> Vec2;

    /// Register a listener. Returns `None` if the host could not register it.
    fn listen(&mut self, kind: ListenerKind<'_, Self::Node>) -> Option<Self::Listener>;

    /// Remove a listener.
    fn unlisten(&mut self, listener: Self::Listener);

    /// Schedule [`HostEvent::AnimationFrame`] for `panel` on the next frame.
    fn request_frame(&mut self, panel: PanelId) -> Self::Frame;

    /// Cancel a scheduled frame.
    fn cancel_frame(&mut self, frame: Self::Frame);
}
