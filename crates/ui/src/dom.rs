//! DOM-backed `Surface`: builds real nodes from `ViewNode`s and applies
//! patches by walking child-index paths from the widget root.

use surprise_core::{Patch, Surface, ViewNode};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{window, Document, Element, Node};

#[derive(Debug, thiserror::Error)]
pub enum DomError {
    #[error("widget is not mounted")]
    NotMounted,
    #[error("no DOM node at path {0:?}")]
    MissingNode(Vec<usize>),
    #[error("DOM node at path {0:?} is not an element")]
    NotElement(Vec<usize>),
    #[error("DOM call failed: {0}")]
    Js(String),
}

impl From<JsValue> for DomError {
    fn from(value: JsValue) -> Self {
        Self::Js(value.as_string().unwrap_or_else(|| format!("{value:?}")))
    }
}

impl From<DomError> for JsValue {
    fn from(err: DomError) -> Self {
        Self::from_str(&err.to_string())
    }
}

/// Get document helper
pub fn get_document() -> Option<Document> {
    window().and_then(|w| w.document())
}

pub struct DomSurface {
    document: Document,
    parent: Node,
    root: Option<Node>,
}

impl DomSurface {
    /// The widget root is appended to `parent` on mount
    pub fn new(document: Document, parent: Node) -> Self {
        Self {
            document,
            parent,
            root: None,
        }
    }

    pub const fn root(&self) -> Option<&Node> {
        self.root.as_ref()
    }

    fn build(&self, view: &ViewNode) -> Result<Node, DomError> {
        match view {
            ViewNode::Text(text) => Ok(self.document.create_text_node(text).into()),
            ViewNode::Element {
                tag,
                attrs,
                children,
            } => {
                let el = self.document.create_element(tag)?;
                for (name, value) in attrs {
                    el.set_attribute(name, value)?;
                }
                for child in children {
                    el.append_child(&self.build(child)?)?;
                }
                Ok(el.into())
            }
        }
    }

    fn resolve(&self, path: &[usize]) -> Result<Node, DomError> {
        let root = self.root.clone().ok_or(DomError::NotMounted)?;
        path.iter().try_fold(root, |node, &i| {
            u32::try_from(i)
                .ok()
                .and_then(|i| node.child_nodes().item(i))
                .ok_or_else(|| DomError::MissingNode(path.to_vec()))
        })
    }

    fn element(&self, path: &[usize]) -> Result<Element, DomError> {
        self.resolve(path)?
            .dyn_into::<Element>()
            .map_err(|_| DomError::NotElement(path.to_vec()))
    }

    fn apply_one(&mut self, patch: &Patch) -> Result<(), DomError> {
        match patch {
            Patch::SetText { path, text } => {
                self.resolve(path)?.set_text_content(Some(text));
            }
            Patch::SetAttr { path, name, value } => {
                self.element(path)?.set_attribute(name, value)?;
            }
            Patch::RemoveAttr { path, name } => {
                self.element(path)?.remove_attribute(name)?;
            }
            Patch::Replace { path, node } => {
                let old = self.resolve(path)?;
                let new = self.build(node)?;
                let parent = old
                    .parent_node()
                    .ok_or_else(|| DomError::MissingNode(path.to_vec()))?;
                parent.replace_child(&new, &old)?;
                if path.is_empty() {
                    self.root = Some(new);
                }
            }
            Patch::Append { path, node } => {
                let target = self.resolve(path)?;
                target.append_child(&self.build(node)?)?;
            }
            Patch::Truncate { path, len } => {
                let target = self.resolve(path)?;
                let len = u32::try_from(*len).unwrap_or(u32::MAX);
                while target.child_nodes().length() > len {
                    match target.last_child() {
                        Some(last) => {
                            target.remove_child(&last)?;
                        }
                        None => break,
                    }
                }
            }
        }
        Ok(())
    }
}

impl Surface for DomSurface {
    type Error = DomError;

    fn mount(&mut self, view: &ViewNode) -> Result<(), Self::Error> {
        let node = self.build(view)?;
        self.parent.append_child(&node)?;
        self.root = Some(node);
        Ok(())
    }

    fn apply(&mut self, patches: &[Patch]) -> Result<(), Self::Error> {
        patches.iter().try_for_each(|patch| self.apply_one(patch))
    }
}
