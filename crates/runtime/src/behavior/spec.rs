//! Serializable behavior tree descriptors.
//!
//! Instantiated trees hold closures and cannot be serialized, so persistence
//! works on [`TreeSpec`]: a structural mirror of the node enum whose leaves
//! are names. Instantiation resolves each name through the leaf registry and
//! fails on unknown names, so a stored descriptor from an older build is
//! rejected loudly instead of silently degrading.

use behavior_tree::{builder, Node, Policy};
use serde::{Deserialize, Serialize};

use crate::agent::TickCtx;
use crate::error::{Result, RuntimeError};

use super::leaf_by_name;

/// Declarative description of a behavior tree.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum TreeSpec {
    Sequence(Vec<TreeSpec>),
    Selector(Vec<TreeSpec>),
    Parallel {
        success: Policy,
        failure: Policy,
        children: Vec<TreeSpec>,
    },
    Invert(Box<TreeSpec>),
    Repeat {
        limit: u32,
        child: Box<TreeSpec>,
    },
    Succeed(Box<TreeSpec>),
    Timeout {
        budget_ms: u64,
        child: Box<TreeSpec>,
    },
    /// A named leaf, resolved through the leaf registry.
    Leaf(String),
}

impl TreeSpec {
    /// Shorthand for a named leaf.
    pub fn leaf(name: impl Into<String>) -> Self {
        Self::Leaf(name.into())
    }

    /// Builds an executable tree from this descriptor.
    pub fn instantiate(&self) -> Result<Node<TickCtx>> {
        Ok(match self {
            Self::Sequence(children) => builder::sequence(instantiate_all(children)?),
            Self::Selector(children) => builder::selector(instantiate_all(children)?),
            Self::Parallel {
                success,
                failure,
                children,
            } => builder::parallel(*success, *failure, instantiate_all(children)?),
            Self::Invert(child) => builder::invert(child.instantiate()?),
            Self::Repeat { limit, child } => builder::repeat(*limit, child.instantiate()?),
            Self::Succeed(child) => builder::succeed(child.instantiate()?),
            Self::Timeout { budget_ms, child } => {
                builder::timeout(*budget_ms, child.instantiate()?)
            }
            Self::Leaf(name) => {
                leaf_by_name(name).ok_or_else(|| RuntimeError::UnknownLeaf(name.clone()))?
            }
        })
    }
}

fn instantiate_all(specs: &[TreeSpec]) -> Result<Vec<Node<TickCtx>>> {
    specs.iter().map(TreeSpec::instantiate).collect()
}
