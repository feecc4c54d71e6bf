// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Container resolution for floating panels.

use tracing::debug;

use crate::dom::Dom;

/// Element that receives the floating panel.
///
/// A selector that matches exactly one element selects it. Anything else (no selector,
/// no match, several matches, an invalid selector) falls back to [`Dom::document_root`].
pub fn resolve_container<D: Dom>(dom: &D, selector: Option<&str>) -> D::Node {
    if let Some(selector) = selector.map(str::trim).filter(|s| !s.is_empty()) {
        let mut matches = dom.query_selector_all(selector);
        if matches.len() == 1
            && let Some(found) = matches.pop()
        {
            return found;
        }
        debug!(
            selector,
            matches = matches.len(),
            "container selector is not unique; using the document root"
        );
    }
    dom.document_root()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryDom;
    use kurbo::Size;

    #[test]
    fn unique_match_wins() {
        let mut dom = MemoryDom::new(Size::new(800.0, 600.0));
        let root = dom.root();
        let scroller = dom.append_element(root, "div");
        dom.set_attr(scroller, "id", "scroller");
        assert_eq!(resolve_container(&dom, Some("#scroller")), scroller);
        assert_eq!(resolve_container(&dom, Some("  #scroller ")), scroller);
    }

    #[test]
    fn falls_back_to_document_root() {
        let mut dom = MemoryDom::new(Size::new(800.0, 600.0));
        let root = dom.root();
        let a = dom.append_element(root, "section");
        let b = dom.append_element(root, "section");
        dom.set_attr(a, "class", "pane");
        dom.set_attr(b, "class", "pane");

        assert_eq!(resolve_container(&dom, None), root);
        assert_eq!(resolve_container(&dom, Some("")), root);
        assert_eq!(resolve_container(&dom, Some("#missing")), root);
        assert_eq!(resolve_container(&dom, Some(".pane")), root);
        assert_eq!(resolve_container(&dom, Some("[[invalid")), root);
    }

    #[test]
    fn detached_elements_do_not_match() {
        let mut dom = MemoryDom::new(Size::new(800.0, 600.0));
        let root = dom.root();
        let detached = dom.append_element(root, "div");
        dom.set_attr(detached, "id", "gone");
        dom.detach(detached);
        assert_eq!(resolve_container(&dom, Some("#gone")), root);
    }
}
