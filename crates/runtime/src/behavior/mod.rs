//! Behavior tree leaves, descriptors, and presets.
//!
//! Leaves are the only place where the tree touches the decision subsystems.
//! Every leaf has a stable name; [`leaf_by_name`] is the registry that
//! [`TreeSpec`] instantiation resolves through, so a descriptor file and the
//! running binary agree on what each name means.

pub mod actions;
pub mod conditions;
pub mod presets;
pub mod spec;

use behavior_tree::Node;

use crate::agent::TickCtx;

pub use spec::TreeSpec;

/// Resolves a leaf name to a fresh node instance.
pub fn leaf_by_name(name: &str) -> Option<Node<TickCtx>> {
    Some(match name {
        "has-target" => conditions::has_target(),
        "target-in-range" => conditions::target_in_range(),
        "health-low" => conditions::health_low(),
        "is-moving" => conditions::is_moving(),
        "select-target" => actions::select_target(),
        "attack-target" => actions::attack_target(),
        "chase-target" => actions::chase_target(),
        "clear-target" => actions::clear_target(),
        "find-path-to-target" => actions::find_path_to_target(),
        "patrol-step" => actions::patrol_step(),
        "explore-step" => actions::explore_step(),
        "return-to-post" => actions::return_to_post(),
        "flee" => actions::flee(),
        "idle" => actions::idle(),
        _ => return None,
    })
}
