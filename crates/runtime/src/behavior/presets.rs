//! Ready-made tree descriptors.
//!
//! Three archetypes cover the common agent roles. All of them are plain
//! [`TreeSpec`] values, so a caller can take one as a starting point and
//! splice in extra branches before instantiating.

use super::TreeSpec;

/// Aggressive roamer: flees when wounded, fights whatever it finds, patrols
/// around its spawn point otherwise.
pub fn skirmisher() -> TreeSpec {
    TreeSpec::Selector(vec![
        TreeSpec::Sequence(vec![TreeSpec::leaf("health-low"), TreeSpec::leaf("flee")]),
        engage_branch(),
        TreeSpec::leaf("select-target"),
        TreeSpec::leaf("patrol-step"),
    ])
}

/// Stationary guard: fights intruders, then walks back to its post.
pub fn sentinel() -> TreeSpec {
    TreeSpec::Selector(vec![
        engage_branch(),
        TreeSpec::leaf("select-target"),
        TreeSpec::leaf("return-to-post"),
    ])
}

/// Peaceful explorer: runs from danger, wanders otherwise.
pub fn wanderer() -> TreeSpec {
    TreeSpec::Selector(vec![
        TreeSpec::Sequence(vec![TreeSpec::leaf("health-low"), TreeSpec::leaf("flee")]),
        TreeSpec::leaf("explore-step"),
    ])
}

/// Shared combat branch: with a target, attack in range or close distance.
/// The chase is capped so an unreachable target cannot pin the tree forever.
fn engage_branch() -> TreeSpec {
    TreeSpec::Sequence(vec![
        TreeSpec::leaf("has-target"),
        TreeSpec::Selector(vec![
            TreeSpec::leaf("attack-target"),
            TreeSpec::Timeout {
                budget_ms: 5000,
                child: Box::new(TreeSpec::leaf("chase-target")),
            },
        ]),
    ])
}
