//! Recursive compartment listing.
//!
//! The walk is depth-first and pre-order: a compartment is visited before any
//! of its descendants, and siblings keep the order the API returned them in.
//! Pending work is held on an explicit stack, so deep hierarchies never grow
//! the call stack.

use serde::Serialize;
use tracing::debug;

use crate::error::Result;
use crate::oci::{Compartment, IdentityApi, collect_pages};

/// A compartment and its depth below the walk root.
#[derive(Debug, Clone, Serialize)]
pub struct CompartmentNode {
    /// Depth, 0 for direct children of the root.
    pub depth: usize,
    /// The compartment itself.
    #[serde(flatten)]
    pub compartment: Compartment,
}

/// Walks a compartment hierarchy through the identity API.
#[derive(Debug)]
pub struct CompartmentWalker<'a, I: ?Sized> {
    identity: &'a I,
}

impl<'a, I: IdentityApi + ?Sized> CompartmentWalker<'a, I> {
    /// Creates a walker.
    #[must_use]
    pub const fn new(identity: &'a I) -> Self {
        Self { identity }
    }

    /// Visits every compartment below `root_id`, returning the visit count.
    ///
    /// Each scope is listed to its last page before any of its children is
    /// visited.
    ///
    /// # Errors
    ///
    /// The first failed listing aborts the walk and is returned.
    pub async fn walk<F>(&self, root_id: &str, mut visit: F) -> Result<usize>
    where
        F: FnMut(&Compartment, usize),
    {
        let mut stack: Vec<(Compartment, usize)> = Vec::new();
        self.push_children(&mut stack, root_id, 0).await?;

        let mut visited = 0;
        while let Some((compartment, depth)) = stack.pop() {
            visit(&compartment, depth);
            visited += 1;
            self.push_children(&mut stack, &compartment.id, depth + 1)
                .await?;
        }

        debug!("Visited {visited} compartments under {root_id}");
        Ok(visited)
    }

    /// Collects the walk into a list in visit order.
    ///
    /// # Errors
    ///
    /// Same as [`walk`](Self::walk).
    pub async fn collect(&self, root_id: &str) -> Result<Vec<CompartmentNode>> {
        let mut nodes = Vec::new();
        self.walk(root_id, |compartment, depth| {
            nodes.push(CompartmentNode {
                depth,
                compartment: compartment.clone(),
            });
        })
        .await?;
        Ok(nodes)
    }

    async fn push_children(
        &self,
        stack: &mut Vec<(Compartment, usize)>,
        parent_id: &str,
        depth: usize,
    ) -> Result<()> {
        let identity = self.identity;
        let children = collect_pages(move |page| identity.list_compartments(parent_id, page)).await?;
        // reversed so the first child is popped first
        stack.extend(children.into_iter().rev().map(|c| (c, depth)));
        Ok(())
    }
}
