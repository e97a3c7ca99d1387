//! Structural diff between two view trees

use serde::{Deserialize, Serialize};

use crate::view::ViewNode;

/// One edit against the previously rendered tree.
/// `path` is the child-index path from the root to the target node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Patch {
    SetText { path: Vec<usize>, text: String },
    SetAttr { path: Vec<usize>, name: String, value: String },
    RemoveAttr { path: Vec<usize>, name: String },
    Replace { path: Vec<usize>, node: ViewNode },
    Append { path: Vec<usize>, node: ViewNode },
    Truncate { path: Vec<usize>, len: usize },
}

impl Patch {
    pub fn path(&self) -> &[usize] {
        match self {
            Self::SetText { path, .. }
            | Self::SetAttr { path, .. }
            | Self::RemoveAttr { path, .. }
            | Self::Replace { path, .. }
            | Self::Append { path, .. }
            | Self::Truncate { path, .. } => path,
        }
    }
}

/// Compute the patches that turn `old` into `new`
pub fn diff(old: &ViewNode, new: &ViewNode) -> Vec<Patch> {
    let mut patches = Vec::new();
    let mut path = Vec::new();
    diff_node(old, new, &mut path, &mut patches);
    patches
}

fn diff_node(old: &ViewNode, new: &ViewNode, path: &mut Vec<usize>, out: &mut Vec<Patch>) {
    match (old, new) {
        (ViewNode::Text(a), ViewNode::Text(b)) => {
            if a != b {
                out.push(Patch::SetText {
                    path: path.clone(),
                    text: b.clone(),
                });
            }
        }
        (
            ViewNode::Element {
                tag: old_tag,
                attrs: old_attrs,
                children: old_children,
            },
            ViewNode::Element {
                tag: new_tag,
                attrs: new_attrs,
                children: new_children,
            },
        ) if old_tag == new_tag => {
            for (name, value) in new_attrs {
                let unchanged = old_attrs.iter().any(|(k, v)| k == name && v == value);
                if !unchanged {
                    out.push(Patch::SetAttr {
                        path: path.clone(),
                        name: name.clone(),
                        value: value.clone(),
                    });
                }
            }
            for (name, _) in old_attrs {
                if !new_attrs.iter().any(|(k, _)| k == name) {
                    out.push(Patch::RemoveAttr {
                        path: path.clone(),
                        name: name.clone(),
                    });
                }
            }

            for (i, (a, b)) in old_children.iter().zip(new_children).enumerate() {
                path.push(i);
                diff_node(a, b, path, out);
                path.pop();
            }
            if old_children.len() > new_children.len() {
                out.push(Patch::Truncate {
                    path: path.clone(),
                    len: new_children.len(),
                });
            }
            for node in new_children.iter().skip(old_children.len()) {
                out.push(Patch::Append {
                    path: path.clone(),
                    node: node.clone(),
                });
            }
        }
        _ => out.push(Patch::Replace {
            path: path.clone(),
            node: new.clone(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WidgetConfig;
    use crate::view::{render, LABEL_PATH};

    fn list(items: &[&str]) -> ViewNode {
        items
            .iter()
            .fold(ViewNode::element("ul"), |ul, item| {
                ul.child(ViewNode::element("li").child(ViewNode::text(*item)))
            })
    }

    #[test]
    fn test_identical_trees_produce_nothing() {
        let config = WidgetConfig::default();
        let view = render(Some(3), &config);
        assert!(diff(&view, &view.clone()).is_empty());
    }

    #[test]
    fn test_number_change_is_single_text_patch() {
        let config = WidgetConfig::default();
        let patches = diff(&render(Some(3), &config), &render(Some(650), &config));
        assert_eq!(
            patches,
            vec![Patch::SetText {
                path: LABEL_PATH.to_vec(),
                text: "Suprise goes to 650".into(),
            }]
        );
    }

    #[test]
    fn test_first_draw_from_placeholder() {
        let config = WidgetConfig::default();
        let old = render(None, &config);
        let new = render(Some(0), &config);
        let patches = diff(&old, &new);
        assert_eq!(patches.len(), 1);
        assert_eq!(patches[0].path(), LABEL_PATH);
    }

    #[test]
    fn test_tag_change_replaces() {
        let old = ViewNode::element("div").child(ViewNode::element("span"));
        let new = ViewNode::element("div").child(ViewNode::element("em"));
        assert_eq!(
            diff(&old, &new),
            vec![Patch::Replace {
                path: vec![0],
                node: ViewNode::element("em"),
            }]
        );
    }

    #[test]
    fn test_attr_changes() {
        let old = ViewNode::element("button")
            .attr("class", "idle")
            .attr("disabled", "");
        let new = ViewNode::element("button").attr("class", "busy");
        let patches = diff(&old, &new);
        assert_eq!(
            patches,
            vec![
                Patch::SetAttr {
                    path: vec![],
                    name: "class".into(),
                    value: "busy".into(),
                },
                Patch::RemoveAttr {
                    path: vec![],
                    name: "disabled".into(),
                },
            ]
        );
    }

    #[test]
    fn test_children_grow_and_shrink() {
        let short = list(&["a"]);
        let long = list(&["a", "b", "c"]);

        let grow = diff(&short, &long);
        assert_eq!(grow.len(), 2);
        assert!(grow.iter().all(|p| matches!(p, Patch::Append { .. })));

        let shrink = diff(&long, &short);
        assert_eq!(
            shrink,
            vec![Patch::Truncate {
                path: vec![],
                len: 1,
            }]
        );
    }

    #[test]
    fn test_apply_reaches_new_tree() {
        let pairs = [
            (list(&["a", "b", "c"]), list(&["x"])),
            (list(&["a"]), list(&["a", "y", "z"])),
            (ViewNode::text("t"), list(&["a"])),
            (
                render(None, &WidgetConfig::default()),
                render(Some(1), &WidgetConfig::default()),
            ),
        ];
        for (old, new) in pairs {
            let mut patched = old.clone();
            patched.apply(&diff(&old, &new));
            assert_eq!(patched, new);
        }
    }

    #[test]
    fn test_patch_serializes_with_op_tag() {
        let patch = Patch::Truncate {
            path: vec![1],
            len: 0,
        };
        let json = serde_json::to_value(&patch).unwrap();
        assert_eq!(json["op"], "truncate");
        assert_eq!(json["len"], 0);
    }
}
