//! Where rendered frames go

use std::convert::Infallible;
use std::fmt;

use crate::diff::Patch;
use crate::view::ViewNode;

/// A display target that reconciles itself with the widget's view tree
pub trait Surface {
    type Error: fmt::Display;

    /// Show the first frame
    fn mount(&mut self, view: &ViewNode) -> Result<(), Self::Error>;

    /// Bring the displayed frame up to date
    fn apply(&mut self, patches: &[Patch]) -> Result<(), Self::Error>;
}

/// Keeps the displayed frame as a `ViewNode`; used headless and in tests
#[derive(Debug, Default, Clone)]
pub struct MemorySurface {
    tree: Option<ViewNode>,
    updates: usize,
}

impl MemorySurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// The currently displayed tree, if mounted
    pub fn tree(&self) -> Option<&ViewNode> {
        self.tree.as_ref()
    }

    /// Number of `apply` calls that changed something
    pub const fn updates(&self) -> usize {
        self.updates
    }
}

impl Surface for MemorySurface {
    type Error = Infallible;

    fn mount(&mut self, view: &ViewNode) -> Result<(), Self::Error> {
        self.tree = Some(view.clone());
        Ok(())
    }

    fn apply(&mut self, patches: &[Patch]) -> Result<(), Self::Error> {
        if let Some(tree) = &mut self.tree {
            if tree.apply(patches) > 0 {
                self.updates += 1;
            }
        }
        Ok(())
    }
}
