//! Retained view tree for the widget
//!
//! The widget renders into a small `ViewNode` tree. Surfaces receive the
//! first tree on mount and `Patch` lists (see [`crate::diff`]) afterwards.

use serde::{Deserialize, Serialize};

use crate::action::{Action, ACTION_ATTR};
use crate::config::WidgetConfig;
use crate::diff::Patch;

/// A node of the view tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewNode {
    Element {
        tag: String,
        attrs: Vec<(String, String)>,
        children: Vec<ViewNode>,
    },
    Text(String),
}

impl ViewNode {
    pub fn element(tag: &str) -> Self {
        Self::Element {
            tag: tag.to_string(),
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn text(content: impl Into<String>) -> Self {
        Self::Text(content.into())
    }

    /// Builder: add an attribute (element nodes only)
    #[must_use]
    pub fn attr(mut self, name: &str, value: &str) -> Self {
        if let Self::Element { attrs, .. } = &mut self {
            attrs.push((name.to_string(), value.to_string()));
        }
        self
    }

    /// Builder: add a child (element nodes only)
    #[must_use]
    pub fn child(mut self, node: Self) -> Self {
        if let Self::Element { children, .. } = &mut self {
            children.push(node);
        }
        self
    }

    pub fn children(&self) -> &[Self] {
        match self {
            Self::Element { children, .. } => children,
            Self::Text(_) => &[],
        }
    }

    pub fn get_attr(&self, name: &str) -> Option<&str> {
        match self {
            Self::Element { attrs, .. } => attrs
                .iter()
                .find(|(k, _)| k == name)
                .map(|(_, v)| v.as_str()),
            Self::Text(_) => None,
        }
    }

    /// Concatenated text content of this subtree
    pub fn text_content(&self) -> String {
        match self {
            Self::Text(s) => s.clone(),
            Self::Element { children, .. } => children.iter().map(Self::text_content).collect(),
        }
    }

    /// Node at a child-index path (empty path is `self`)
    pub fn at(&self, path: &[usize]) -> Option<&Self> {
        path.iter().try_fold(self, |node, &i| node.children().get(i))
    }

    fn at_mut(&mut self, path: &[usize]) -> Option<&mut Self> {
        path.iter().try_fold(self, |node, &i| match node {
            Self::Element { children, .. } => children.get_mut(i),
            Self::Text(_) => None,
        })
    }

    /// Apply a patch list produced by [`crate::diff::diff`].
    /// Patches addressing a missing node are skipped; returns how many applied.
    pub fn apply(&mut self, patches: &[Patch]) -> usize {
        let mut applied = 0;
        for patch in patches {
            let Some(target) = self.at_mut(patch.path()) else {
                continue;
            };
            let ok = match (patch, target) {
                (Patch::SetText { text, .. }, Self::Text(current)) => {
                    current.clone_from(text);
                    true
                }
                (Patch::SetAttr { name, value, .. }, Self::Element { attrs, .. }) => {
                    match attrs.iter_mut().find(|(k, _)| k == name) {
                        Some((_, v)) => v.clone_from(value),
                        None => attrs.push((name.clone(), value.clone())),
                    }
                    true
                }
                (Patch::RemoveAttr { name, .. }, Self::Element { attrs, .. }) => {
                    attrs.retain(|(k, _)| k != name);
                    true
                }
                (Patch::Replace { node, .. }, target) => {
                    *target = node.clone();
                    true
                }
                (Patch::Append { node, .. }, Self::Element { children, .. }) => {
                    children.push(node.clone());
                    true
                }
                (Patch::Truncate { len, .. }, Self::Element { children, .. }) => {
                    children.truncate(*len);
                    true
                }
                _ => false,
            };
            if ok {
                applied += 1;
            }
        }
        applied
    }
}

/// Path of the "Suprise goes to N" text node inside [`render`]'s output
pub const LABEL_PATH: &[usize] = &[0];

/// Render the widget for the given number. Pure: same input, same tree.
///
/// ```text
/// <div>
///   Suprise goes to {n}
///   <br>
///   <button data-action="trigger">Go!</button>
/// </div>
/// ```
pub fn render(number: Option<i64>, config: &WidgetConfig) -> ViewNode {
    let shown = number.map_or_else(|| config.placeholder.clone(), |n| n.to_string());
    ViewNode::element("div")
        .child(ViewNode::text(format!("{} {shown}", config.label)))
        .child(ViewNode::element("br"))
        .child(
            ViewNode::element("button")
                .attr(ACTION_ATTR, Action::Trigger.as_str())
                .child(ViewNode::text(config.button_text.as_str())),
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_absent_uses_placeholder() {
        let config = WidgetConfig::default();
        let view = render(None, &config);
        assert_eq!(view.at(LABEL_PATH), Some(&ViewNode::text("Suprise goes to ")));
    }

    #[test]
    fn test_render_number() {
        let view = render(Some(42), &WidgetConfig::default());
        assert_eq!(view.text_content(), "Suprise goes to 42Go!");
        let button = view.at(&[2]).unwrap();
        assert_eq!(button.get_attr(ACTION_ATTR), Some("trigger"));
    }

    #[test]
    fn test_render_is_idempotent() {
        let config = WidgetConfig::default();
        assert_eq!(render(Some(7), &config), render(Some(7), &config));
        assert_eq!(render(None, &config), render(None, &config));
    }

    #[test]
    fn test_root_is_bare_div() {
        let view = render(Some(1), &WidgetConfig::default());
        match &view {
            ViewNode::Element { tag, attrs, children } => {
                assert_eq!(tag, "div");
                assert!(attrs.is_empty());
                assert_eq!(children.len(), 3);
            }
            ViewNode::Text(_) => panic!("root must be an element"),
        }
    }

    #[test]
    fn test_at_out_of_range() {
        let view = render(None, &WidgetConfig::default());
        assert!(view.at(&[9]).is_none());
        assert!(view.at(&[0, 0]).is_none());
    }

    #[test]
    fn test_apply_skips_missing_path() {
        let mut view = render(None, &WidgetConfig::default());
        let applied = view.apply(&[Patch::SetText {
            path: vec![5],
            text: "x".into(),
        }]);
        assert_eq!(applied, 0);
    }
}
