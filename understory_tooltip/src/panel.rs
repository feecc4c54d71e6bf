// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Panel construction and teardown.
//!
//! A panel is a root node holding an arrow node and a content node:
//!
//! ```text
//! <div class="tooltip tooltip-top fade show animated" role="tooltip" aria-live="assertive">
//!   <div class="tooltip-arrow"></div>
//!   <div class="tooltip-inner">…</div>
//! </div>
//! ```
//!
//! Panels are built on show and removed on hide; they are never reused.

use std::sync::LazyLock;

use regex::Regex;
use understory_placement::{Placement, Side};

use crate::config::{Config, TriggerModes};
use crate::dom::Dom;

/// Which widget a panel belongs to.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub enum PanelKind {
    /// Hover/focus tooltip.
    #[default]
    Tooltip,
    /// Click-toggled popover.
    Popover,
}

impl PanelKind {
    /// Class prefix, also the root's base class.
    pub const fn prefix(self) -> &'static str {
        match self {
            Self::Tooltip => "tooltip",
            Self::Popover => "popover",
        }
    }

    /// Class of the content node.
    pub const fn content_class(self) -> &'static str {
        match self {
            Self::Tooltip => "tooltip-inner",
            Self::Popover => "popover-body",
        }
    }

    /// Class of the arrow node.
    pub const fn arrow_class(self) -> &'static str {
        match self {
            Self::Tooltip => "tooltip-arrow",
            Self::Popover => "popover-arrow",
        }
    }

    /// Placement used when neither attribute nor property sets one.
    pub const fn default_placement(self) -> Placement {
        match self {
            Self::Tooltip => Placement::Top,
            Self::Popover => Placement::Right,
        }
    }

    /// Trigger modes used when neither attribute nor property sets any.
    pub const fn default_triggers(self) -> TriggerModes {
        match self {
            Self::Tooltip => TriggerModes::HOVER.union(TriggerModes::FOCUS),
            Self::Popover => TriggerModes::CLICK,
        }
    }
}

/// Generation of a panel, unique per [`PanelFactory`].
///
/// Deferred work is keyed by this id so it can tell whether its panel is still current.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct PanelId(u64);

impl PanelId {
    /// Raw generation number.
    pub const fn get(self) -> u64 {
        self.0
    }
}

/// Errors raised while materializing a panel.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum PanelError {
    /// The host could not create an element.
    #[error("host could not create a `{0}` element")]
    CreateElement(&'static str),
    /// The host could not append the panel to its container.
    #[error("host could not attach the panel to its container")]
    Attach,
}

/// A live panel.
///
/// Exactly one exists per visible instance. Consumed by [`PanelFactory::destroy`].
#[derive(Debug, PartialEq)]
pub struct PanelHandle<N> {
    id: PanelId,
    root: N,
    arrow: N,
    content: N,
    container: N,
}

impl<N> PanelHandle<N> {
    /// Generation of this panel.
    pub fn id(&self) -> PanelId {
        self.id
    }

    /// Root node carrying role, classes and position.
    pub fn root(&self) -> &N {
        &self.root
    }

    /// Arrow node.
    pub fn arrow(&self) -> &N {
        &self.arrow
    }

    /// Content node.
    pub fn content(&self) -> &N {
        &self.content
    }

    /// Container the root was appended to.
    pub fn container(&self) -> &N {
        &self.container
    }
}

/// Whether content should be rendered as markup even without `data-html`.
///
/// Matches anything that looks like an opening or closing tag. This is permissive: text
/// such as `a <b> c` is treated as markup.
pub fn looks_like_markup(content: &str) -> bool {
    static TAG: LazyLock<Option<Regex>> =
        LazyLock::new(|| Regex::new(r"(?i)</?[a-z][\s\S]*>").ok());
    TAG.as_ref().is_some_and(|re| re.is_match(content))
}

/// Class list of the panel root for `side`.
pub fn root_class(kind: PanelKind, side: Side, config: &Config) -> String {
    let prefix = kind.prefix();
    let mut class = format!("{prefix} {prefix}-{side} fade show");
    if config.animate {
        class.push_str(" animated");
    }
    for token in config.custom_class.split_whitespace() {
        class.push(' ');
        class.push_str(token);
    }
    class
}

fn part_class(base: &str, variant: Option<&str>) -> String {
    match variant {
        Some(variant) => format!("{base} {base}-{}", variant.trim()),
        None => base.to_owned(),
    }
}

/// Builds and destroys panels for one instance.
#[derive(Debug)]
pub struct PanelFactory {
    kind: PanelKind,
    next: u64,
}

impl PanelFactory {
    /// Create a factory for `kind`.
    pub fn new(kind: PanelKind) -> Self {
        Self { kind, next: 0 }
    }

    /// Kind of panels this factory builds.
    pub fn kind(&self) -> PanelKind {
        self.kind
    }

    /// Build a panel for `config` and append it to `container`.
    ///
    /// The root is classed for `side`; positioning may re-class it after a flip.
    pub fn create<D: Dom>(
        &mut self,
        dom: &mut D,
        config: &Config,
        container: &D::Node,
        side: Side,
    ) -> Result<PanelHandle<D::Node>, PanelError> {
        let root = dom
            .create_element("div")
            .ok_or(PanelError::CreateElement("div"))?;
        let arrow = dom
            .create_element("div")
            .ok_or(PanelError::CreateElement("div"))?;
        let content = dom
            .create_element("div")
            .ok_or(PanelError::CreateElement("div"))?;

        dom.set_class_name(&root, &root_class(self.kind, side, config));
        dom.set_attribute(&root, "role", "tooltip");
        dom.set_attribute(&root, "aria-live", "assertive");
        self.style_parts(dom, &arrow, &content, config);
        render_content(dom, &content, config);

        if !(dom.append_child(&root, &arrow)
            && dom.append_child(&root, &content)
            && dom.append_child(container, &root))
        {
            dom.remove(&root);
            return Err(PanelError::Attach);
        }

        self.next += 1;
        Ok(PanelHandle {
            id: PanelId(self.next),
            root,
            arrow,
            content,
            container: container.clone(),
        })
    }

    /// Re-apply the arrow and content classes of a live panel after a variant change.
    pub fn restyle<D: Dom>(&self, dom: &mut D, handle: &PanelHandle<D::Node>, config: &Config) {
        self.style_parts(dom, &handle.arrow, &handle.content, config);
    }

    /// Remove the panel from its container.
    pub fn destroy<D: Dom>(&self, dom: &mut D, handle: PanelHandle<D::Node>) {
        dom.remove(&handle.root);
    }

    fn style_parts<D: Dom>(
        &self,
        dom: &mut D,
        arrow: &D::Node,
        content: &D::Node,
        config: &Config,
    ) {
        let variant = config.variant.as_deref();
        dom.set_class_name(arrow, &part_class(self.kind.arrow_class(), variant));
        dom.set_class_name(content, &part_class(self.kind.content_class(), variant));
    }
}

/// Fill `content` from `config`, as markup or as escaped text.
pub fn render_content<D: Dom>(dom: &mut D, content: &D::Node, config: &Config) {
    if config.use_html || looks_like_markup(&config.content) {
        dom.set_inner_html(content, &config.content);
    } else {
        dom.set_text_content(content, &config.content);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryDom;
    use kurbo::Size;

    fn config(content: &str) -> Config {
        Config {
            content: content.into(),
            ..Config::defaults(PanelKind::Tooltip)
        }
    }

    #[test]
    fn markup_heuristic() {
        assert!(looks_like_markup("<b>bold</b>"));
        assert!(looks_like_markup("line<BR>"));
        assert!(looks_like_markup("a <b> c"));
        assert!(!looks_like_markup("a < b"));
        assert!(!looks_like_markup("plain text"));
        assert!(!looks_like_markup("1 <2> 3"));
    }

    #[test]
    fn builds_expected_structure() {
        let mut dom = MemoryDom::new(Size::new(800.0, 600.0));
        let root = dom.root();
        let mut factory = PanelFactory::new(PanelKind::Tooltip);
        let cfg = Config {
            custom_class: " wide  shadow ".into(),
            variant: Some("dark".into()),
            ..config("Hello")
        };
        let panel = factory.create(&mut dom, &cfg, &root, Side::Bottom).unwrap();

        assert_eq!(
            dom.class_name(*panel.root()),
            "tooltip tooltip-bottom fade show animated wide shadow"
        );
        assert_eq!(dom.attr(*panel.root(), "role").as_deref(), Some("tooltip"));
        assert_eq!(
            dom.attr(*panel.root(), "aria-live").as_deref(),
            Some("assertive")
        );
        assert_eq!(
            dom.class_name(*panel.arrow()),
            "tooltip-arrow tooltip-arrow-dark"
        );
        assert_eq!(
            dom.class_name(*panel.content()),
            "tooltip-inner tooltip-inner-dark"
        );
        assert_eq!(dom.text(*panel.content()), "Hello");
        assert_eq!(dom.inner_html(*panel.content()), None);
        assert_eq!(dom.children(root), vec![*panel.root()]);
        assert_eq!(
            dom.children(*panel.root()),
            vec![*panel.arrow(), *panel.content()]
        );
        assert_eq!(panel.container(), &root);
    }

    #[test]
    fn markup_content_uses_inner_html() {
        let mut dom = MemoryDom::new(Size::new(800.0, 600.0));
        let root = dom.root();
        let mut factory = PanelFactory::new(PanelKind::Popover);

        let panel = factory
            .create(&mut dom, &config("<em>hi</em>"), &root, Side::Top)
            .unwrap();
        assert_eq!(dom.inner_html(*panel.content()), Some("<em>hi</em>"));
        assert_eq!(dom.class_name(*panel.content()), "popover-body");

        let html = Config {
            use_html: true,
            animate: false,
            ..config("x & y")
        };
        let panel = factory.create(&mut dom, &html, &root, Side::Left).unwrap();
        assert_eq!(dom.inner_html(*panel.content()), Some("x & y"));
        assert_eq!(
            dom.class_name(*panel.root()),
            "popover popover-left fade show"
        );
    }

    #[test]
    fn ids_increase_and_destroy_detaches() {
        let mut dom = MemoryDom::new(Size::new(800.0, 600.0));
        let root = dom.root();
        let mut factory = PanelFactory::new(PanelKind::Tooltip);
        let (a, b) = (config("a"), config("b"));
        let a = factory.create(&mut dom, &a, &root, Side::Top).unwrap();
        let b = factory.create(&mut dom, &b, &root, Side::Top).unwrap();
        assert!(b.id() > a.id());
        assert_eq!(b.id().get(), a.id().get() + 1);

        let a_root = *a.root();
        factory.destroy(&mut dom, a);
        assert!(!dom.is_connected(a_root));
        assert_eq!(dom.children(root), vec![*b.root()]);
    }

    #[test]
    fn refused_creation_is_an_error() {
        let mut dom = MemoryDom::new(Size::new(800.0, 600.0));
        let root = dom.root();
        dom.refuse_elements(true);
        let mut factory = PanelFactory::new(PanelKind::Tooltip);
        let err = factory
            .create(&mut dom, &config("a"), &root, Side::Top)
            .unwrap_err();
        assert_eq!(err, PanelError::CreateElement("div"));
        assert!(dom.children(root).is_empty());
    }
}
