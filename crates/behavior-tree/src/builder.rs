//! Builder utilities for ergonomic behavior tree construction.
//!
//! This module provides helper functions to reduce boilerplate when building
//! behavior trees. Instead of writing verbose
//! `Node::Sequence(Sequence::new(vec![...]))`, you can use shorter functions
//! like `sequence(vec![...])`.

use crate::composite::{Parallel, Policy, Selector, Sequence};
use crate::decorator::{Invert, Repeat, Succeed, Timeout};
use crate::leaf::{Action, Condition};
use crate::node::Node;
use crate::status::Status;

/// Creates a sequence node.
#[inline]
pub fn sequence<C>(children: Vec<Node<C>>) -> Node<C> {
    Node::Sequence(Sequence::new(children))
}

/// Creates a selector node.
#[inline]
pub fn selector<C>(children: Vec<Node<C>>) -> Node<C> {
    Node::Selector(Selector::new(children))
}

/// Creates a parallel node with the given success and failure policies.
#[inline]
pub fn parallel<C>(success: Policy, failure: Policy, children: Vec<Node<C>>) -> Node<C> {
    Node::Parallel(Parallel::new(success, failure, children))
}

/// Creates an inverter node.
#[inline]
pub fn invert<C>(child: Node<C>) -> Node<C> {
    Node::Invert(Invert::new(child))
}

/// Creates a repeat node allowing up to `limit` failed attempts.
#[inline]
pub fn repeat<C>(limit: u32, child: Node<C>) -> Node<C> {
    Node::Repeat(Repeat::new(limit, child))
}

/// Creates an always-succeed node.
#[inline]
pub fn succeed<C>(child: Node<C>) -> Node<C> {
    Node::Succeed(Succeed::new(child))
}

/// Creates a timeout node with the given budget in milliseconds.
#[inline]
pub fn timeout<C>(budget_ms: u64, child: Node<C>) -> Node<C> {
    Node::Timeout(Timeout::new(budget_ms, child))
}

/// Creates a named action leaf.
#[inline]
pub fn action<C>(name: &'static str, run: impl FnMut(&mut C) -> Status + Send + 'static) -> Node<C> {
    Node::Action(Action::new(name, run))
}

/// Creates a named condition leaf.
#[inline]
pub fn condition<C>(
    name: &'static str,
    test: impl FnMut(&mut C) -> bool + Send + 'static,
) -> Node<C> {
    Node::Condition(Condition::new(name, test))
}
