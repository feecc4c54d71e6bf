// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Configuration: attributes over properties over defaults.
//!
//! Every aspect is read from the host's markup attribute first, then from the in-memory
//! [`Properties`], then from a per-kind default. [`Config::resolve`] is a pure function of
//! the host's attributes and the properties; it is consulted fresh whenever either changes.
//!
//! | Attribute | Property | Default |
//! |---|---|---|
//! | `data-placement` | [`Properties::placement`] | `top` (tooltip), `right` (popover) |
//! | `data-trigger` | [`Properties::trigger`] | `hover focus` (tooltip), `click` (popover) |
//! | `data-html` (presence) | [`Properties::html`] | off |
//! | `data-original-title`, then `title` | [`Properties::message`] | empty |
//! | `data-animation` (`"false"` disables) | [`Properties::animation`] | on |
//! | `data-container` | [`Properties::container`] | document root |
//! | `data-custom-class` | [`Properties::custom_class`] | none |
//! | `data-variant` | [`Properties::variant`] | none |
//! | `dir` (`rtl` mirrors left/right) | none | `ltr` |

use bitflags::bitflags;
use understory_placement::Placement;

use crate::dom::Dom;
use crate::panel::PanelKind;

/// Attribute names read by [`Config::resolve`].
pub mod attr {
    /// Requested placement.
    pub const PLACEMENT: &str = "data-placement";
    /// Space-separated trigger modes.
    pub const TRIGGER: &str = "data-trigger";
    /// Presence enables markup content.
    pub const HTML: &str = "data-html";
    /// Content, highest precedence.
    pub const ORIGINAL_TITLE: &str = "data-original-title";
    /// Content, second precedence.
    pub const TITLE: &str = "title";
    /// `"false"` disables the fade animation.
    pub const ANIMATION: &str = "data-animation";
    /// Container selector.
    pub const CONTAINER: &str = "data-container";
    /// Extra class tokens for the panel root.
    pub const CUSTOM_CLASS: &str = "data-custom-class";
    /// Color variant.
    pub const VARIANT: &str = "data-variant";
    /// Text direction.
    pub const DIR: &str = "dir";
}

/// Attributes whose changes require re-resolving the configuration.
pub const OBSERVED_ATTRIBUTES: &[&str] = &[
    attr::PLACEMENT,
    attr::TRIGGER,
    attr::HTML,
    attr::ORIGINAL_TITLE,
    attr::TITLE,
    attr::ANIMATION,
    attr::CONTAINER,
    attr::CUSTOM_CLASS,
    attr::VARIANT,
    attr::DIR,
];

bitflags! {
    /// Input modalities that show and hide a panel.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct TriggerModes: u8 {
        /// Pointer enter shows, pointer leave hides.
        const HOVER  = 0b0000_0001;
        /// Focus shows, blur hides.
        const FOCUS  = 0b0000_0010;
        /// Click toggles; outside clicks and scrolling hide.
        const CLICK  = 0b0000_0100;
        /// Only [`Tooltip::show`](crate::Tooltip::show) and [`Tooltip::hide`](crate::Tooltip::hide) change visibility.
        const MANUAL = 0b0000_1000;
    }
}

impl TriggerModes {
    /// Parse a whitespace-separated list such as `"hover focus"`.
    ///
    /// Unknown tokens are dropped, so the result may be empty.
    pub fn parse(s: &str) -> Self {
        s.split_whitespace()
            .filter_map(|token| match token {
                "hover" => Some(Self::HOVER),
                "focus" => Some(Self::FOCUS),
                "click" => Some(Self::CLICK),
                "manual" => Some(Self::MANUAL),
                _ => None,
            })
            .fold(Self::empty(), |acc, mode| acc | mode)
    }

    /// Whether trigger events drive visibility for `mode`.
    ///
    /// `MANUAL` disables every trigger-driven transition.
    pub fn drives(self, mode: Self) -> bool {
        !self.contains(Self::MANUAL) && self.intersects(mode)
    }
}

impl Default for TriggerModes {
    fn default() -> Self {
        Self::HOVER | Self::FOCUS
    }
}

/// Text direction of the host.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub enum Direction {
    /// Left to right.
    #[default]
    Ltr,
    /// Right to left: left and right placements are mirrored.
    Rtl,
}

/// In-memory configuration, overridden by markup attributes.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Properties {
    /// Requested placement.
    pub placement: Option<Placement>,
    /// Trigger modes; an empty set counts as unset.
    pub trigger: Option<TriggerModes>,
    /// Render the content as markup.
    pub html: Option<bool>,
    /// Fade the panel in.
    pub animation: Option<bool>,
    /// Container selector.
    pub container: Option<String>,
    /// Extra class tokens for the panel root.
    pub custom_class: Option<String>,
    /// Color variant.
    pub variant: Option<String>,
    /// Panel content.
    pub message: Option<String>,
}

/// Resolved configuration snapshot for one instance.
#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    /// Requested placement, before mirroring.
    pub placement: Placement,
    /// Trigger modes; never empty.
    pub trigger_modes: TriggerModes,
    /// Render the content as markup.
    pub use_html: bool,
    /// Fade the panel in.
    pub animate: bool,
    /// Container selector, if any.
    pub container_selector: Option<String>,
    /// Extra class tokens for the panel root.
    pub custom_class: String,
    /// Color variant.
    pub variant: Option<String>,
    /// Panel content.
    pub content: String,
    /// Text direction of the host.
    pub direction: Direction,
}

impl Config {
    /// Defaults for `kind` with no attributes and no properties.
    pub fn defaults(kind: PanelKind) -> Self {
        Self {
            placement: kind.default_placement(),
            trigger_modes: kind.default_triggers(),
            use_html: false,
            animate: true,
            container_selector: None,
            custom_class: String::new(),
            variant: None,
            content: String::new(),
            direction: Direction::Ltr,
        }
    }

    /// Resolve the configuration of `host`.
    ///
    /// Malformed values never fail: an unknown placement or a trigger list with no known
    /// tokens falls through to the next source.
    pub fn resolve<D: Dom>(dom: &D, host: &D::Node, props: &Properties, kind: PanelKind) -> Self {
        let read = |name: &str| dom.attribute(host, name);
        let defaults = Self::defaults(kind);

        let placement = read(attr::PLACEMENT)
            .and_then(|v| v.parse().ok())
            .or(props.placement)
            .unwrap_or(defaults.placement);

        let trigger_modes = read(attr::TRIGGER)
            .map(|v| TriggerModes::parse(&v))
            .filter(|modes| !modes.is_empty())
            .or(props.trigger.filter(|modes| !modes.is_empty()))
            .unwrap_or(defaults.trigger_modes);

        let use_html = dom.has_attribute(host, attr::HTML) || props.html.unwrap_or(false);

        let animate = match read(attr::ANIMATION) {
            Some(v) => v.trim() != "false",
            None => props.animation.unwrap_or(defaults.animate),
        };

        let container_selector = read(attr::CONTAINER)
            .or_else(|| props.container.clone())
            .filter(|s| !s.trim().is_empty());

        let custom_class = read(attr::CUSTOM_CLASS)
            .or_else(|| props.custom_class.clone())
            .unwrap_or_default();

        let variant = read(attr::VARIANT)
            .or_else(|| props.variant.clone())
            .filter(|s| !s.trim().is_empty());

        let content = read(attr::ORIGINAL_TITLE)
            .filter(|s| !s.is_empty())
            .or_else(|| read(attr::TITLE).filter(|s| !s.is_empty()))
            .or_else(|| props.message.clone())
            .unwrap_or_default();

        let direction = match read(attr::DIR) {
            Some(v) if v.trim().eq_ignore_ascii_case("rtl") => Direction::Rtl,
            _ => Direction::Ltr,
        };

        Self {
            placement,
            trigger_modes,
            use_html,
            animate,
            container_selector,
            custom_class,
            variant,
            content,
            direction,
        }
    }

    /// Placement to hand to the resolver, mirrored for right-to-left hosts.
    pub fn effective_placement(&self) -> Placement {
        match self.direction {
            Direction::Ltr => self.placement,
            Direction::Rtl => self.placement.mirrored(),
        }
    }

    /// Whether only the public API may change visibility.
    pub fn is_manual(&self) -> bool {
        self.trigger_modes.contains(TriggerModes::MANUAL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryDom;
    use kurbo::Size;

    fn host() -> (MemoryDom, crate::memory::ElementId) {
        let mut dom = MemoryDom::new(Size::new(800.0, 600.0));
        let host = dom.append_element(dom.root(), "ui-tooltip");
        (dom, host)
    }

    #[test]
    fn parse_drops_unknown_tokens() {
        assert_eq!(
            TriggerModes::parse("  hover   click bogus "),
            TriggerModes::HOVER | TriggerModes::CLICK
        );
        assert!(TriggerModes::parse("nope never").is_empty());
        assert!(TriggerModes::parse("").is_empty());
    }

    #[test]
    fn manual_disables_driving() {
        let modes = TriggerModes::CLICK | TriggerModes::MANUAL;
        assert!(!modes.drives(TriggerModes::CLICK));
        assert!(TriggerModes::CLICK.drives(TriggerModes::CLICK));
        assert!(!TriggerModes::HOVER.drives(TriggerModes::FOCUS));
    }

    #[test]
    fn defaults_per_kind() {
        let (dom, host) = host();
        let c = Config::resolve(&dom, &host, &Properties::default(), PanelKind::Tooltip);
        assert_eq!(c, Config::defaults(PanelKind::Tooltip));
        assert_eq!(c.placement, Placement::Top);
        assert_eq!(c.trigger_modes, TriggerModes::HOVER | TriggerModes::FOCUS);
        assert!(c.animate);

        let p = Config::resolve(&dom, &host, &Properties::default(), PanelKind::Popover);
        assert_eq!(p.placement, Placement::Right);
        assert_eq!(p.trigger_modes, TriggerModes::CLICK);
    }

    #[test]
    fn attributes_win_over_properties() {
        let (mut dom, host) = host();
        let props = Properties {
            placement: Some(Placement::Left),
            trigger: Some(TriggerModes::CLICK),
            animation: Some(true),
            container: Some("#from-prop".into()),
            variant: Some("dark".into()),
            message: Some("from property".into()),
            ..Properties::default()
        };
        let c = Config::resolve(&dom, &host, &props, PanelKind::Tooltip);
        assert_eq!(c.placement, Placement::Left);
        assert_eq!(c.trigger_modes, TriggerModes::CLICK);
        assert_eq!(c.content, "from property");
        assert_eq!(c.container_selector.as_deref(), Some("#from-prop"));

        dom.set_attr(host, attr::PLACEMENT, "bottom");
        dom.set_attr(host, attr::TRIGGER, "manual");
        dom.set_attr(host, attr::ANIMATION, "false");
        dom.set_attr(host, attr::CONTAINER, "#from-attr");
        dom.set_attr(host, attr::VARIANT, "light");
        dom.set_attr(host, attr::TITLE, "from title");
        let c = Config::resolve(&dom, &host, &props, PanelKind::Tooltip);
        assert_eq!(c.placement, Placement::Bottom);
        assert_eq!(c.trigger_modes, TriggerModes::MANUAL);
        assert!(!c.animate);
        assert_eq!(c.container_selector.as_deref(), Some("#from-attr"));
        assert_eq!(c.variant.as_deref(), Some("light"));
        assert_eq!(c.content, "from title");

        dom.set_attr(host, attr::ORIGINAL_TITLE, "from original");
        let c = Config::resolve(&dom, &host, &props, PanelKind::Tooltip);
        assert_eq!(c.content, "from original");
    }

    #[test]
    fn malformed_values_fall_through() {
        let (mut dom, host) = host();
        dom.set_attr(host, attr::PLACEMENT, "sideways");
        dom.set_attr(host, attr::TRIGGER, "wiggle");
        let props = Properties {
            trigger: Some(TriggerModes::empty()),
            ..Properties::default()
        };
        let c = Config::resolve(&dom, &host, &props, PanelKind::Tooltip);
        assert_eq!(c.placement, Placement::Top);
        assert_eq!(c.trigger_modes, TriggerModes::default());
        assert!(!c.trigger_modes.is_empty());
    }

    #[test]
    fn html_presence_and_rtl_mirroring() {
        let (mut dom, host) = host();
        dom.set_attr(host, attr::HTML, "");
        dom.set_attr(host, attr::PLACEMENT, "left");
        dom.set_attr(host, attr::DIR, "RTL");
        let c = Config::resolve(&dom, &host, &Properties::default(), PanelKind::Tooltip);
        assert!(c.use_html);
        assert_eq!(c.direction, Direction::Rtl);
        assert_eq!(c.effective_placement(), Placement::Right);
    }

    #[test]
    fn resolve_is_idempotent() {
        let (mut dom, host) = host();
        dom.set_attr(host, attr::TRIGGER, "click focus");
        dom.set_attr(host, attr::CUSTOM_CLASS, "wide shadow");
        let props = Properties::default();
        let a = Config::resolve(&dom, &host, &props, PanelKind::Tooltip);
        let b = Config::resolve(&dom, &host, &props, PanelKind::Tooltip);
        assert_eq!(a, b);
    }
}
