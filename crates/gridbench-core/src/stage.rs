//! Stage registry
//!
//! Stages are pure descriptors; all mutable state lives in the
//! [`Environment`](crate::env::Environment). Every command resolves its tags
//! here before touching a gateway, so prerequisite violations surface before
//! any side effect.

use crate::error::{Error, Result};
use std::collections::BTreeSet;

pub const PROVIDE: &str = "provide";
pub const INVENTORY: &str = "inventory";
pub const SCAFFOLD: &str = "scaffold";
pub const OPENSTACK: &str = "openstack";
pub const STRESS: &str = "stress";
pub const RALLY: &str = "rally";
pub const EMULATE: &str = "emulate";
pub const BACKUP: &str = "backup";
pub const DESTROY: &str = "destroy";

/// A named unit of orchestration work.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stage {
    pub name: &'static str,
    /// Token used for selection on the command line.
    pub tag: &'static str,
    /// Tags that must have run earlier, in this invocation or a previous one.
    pub requires: &'static [&'static str],
}

/// Canonical execution order. Selection never reorders this.
pub const STAGES: &[Stage] = &[
    Stage {
        name: "claim resources",
        tag: PROVIDE,
        requires: &[],
    },
    Stage {
        name: "render inventory",
        tag: INVENTORY,
        requires: &[PROVIDE],
    },
    Stage {
        name: "deploy scaffolding",
        tag: SCAFFOLD,
        requires: &[PROVIDE, INVENTORY],
    },
    Stage {
        name: "configure openstack",
        tag: OPENSTACK,
        requires: &[SCAFFOLD],
    },
    Stage {
        name: "run sysbench",
        tag: STRESS,
        requires: &[SCAFFOLD],
    },
    Stage {
        name: "benchmark openstack",
        tag: RALLY,
        requires: &[OPENSTACK],
    },
    Stage {
        name: "emulate network",
        tag: EMULATE,
        requires: &[INVENTORY],
    },
    Stage {
        name: "backup",
        tag: BACKUP,
        requires: &[],
    },
    Stage {
        name: "destroy",
        tag: DESTROY,
        requires: &[],
    },
];

pub fn find(tag: &str) -> Option<&'static Stage> {
    STAGES.iter().find(|stage| stage.tag == tag)
}

/// Expand `requested` into stages in canonical order.
///
/// The caller's tag order selects, it does not schedule. A prerequisite is
/// satisfied when it resolves earlier in the returned sequence or appears in
/// `completed`, the persisted record of stages run by previous invocations.
pub fn resolve(
    requested: &[String],
    completed: &BTreeSet<String>,
) -> Result<Vec<&'static Stage>> {
    let mut wanted: BTreeSet<&str> = BTreeSet::new();
    for tag in requested {
        if find(tag).is_none() {
            return Err(Error::UnknownTag(tag.clone()));
        }
        wanted.insert(tag.as_str());
    }

    let mut seen: BTreeSet<&str> = BTreeSet::new();
    let mut plan = Vec::new();
    for stage in STAGES {
        if !wanted.contains(stage.tag) {
            continue;
        }
        for req in stage.requires {
            if !seen.contains(req) && !completed.contains(*req) {
                return Err(Error::MissingPrerequisite {
                    stage: stage.tag.to_string(),
                    missing: req.to_string(),
                });
            }
        }
        seen.insert(stage.tag);
        plan.push(stage);
    }
    Ok(plan)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(plan: &[&Stage]) -> Vec<String> {
        plan.iter().map(|s| s.tag.to_string()).collect()
    }

    #[test]
    fn resolve_returns_canonical_order_regardless_of_request_order() {
        let requested: Vec<String> = ["scaffold", "provide", "inventory"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let plan = resolve(&requested, &BTreeSet::new()).unwrap();
        assert_eq!(tags(&plan), vec!["provide", "inventory", "scaffold"]);
    }

    #[test]
    fn resolve_deduplicates_repeated_tags() {
        let requested: Vec<String> = ["provide", "provide", "inventory"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let plan = resolve(&requested, &BTreeSet::new()).unwrap();
        assert_eq!(tags(&plan), vec!["provide", "inventory"]);
    }

    #[test]
    fn resolve_is_idempotent() {
        let requested: Vec<String> = ["scaffold", "inventory", "provide"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let once = tags(&resolve(&requested, &BTreeSet::new()).unwrap());
        let twice = tags(&resolve(&once, &BTreeSet::new()).unwrap());
        assert_eq!(once, twice);
    }

    #[test]
    fn unknown_tag_is_rejected() {
        let requested = vec!["teleport".to_string()];
        assert!(matches!(
            resolve(&requested, &BTreeSet::new()),
            Err(Error::UnknownTag(tag)) if tag == "teleport"
        ));
    }

    #[test]
    fn missing_prerequisite_is_rejected() {
        let requested = vec![SCAFFOLD.to_string()];
        assert!(matches!(
            resolve(&requested, &BTreeSet::new()),
            Err(Error::MissingPrerequisite { stage, missing })
                if stage == "scaffold" && missing == "provide"
        ));
    }

    #[test]
    fn completed_stages_satisfy_prerequisites() {
        let completed: BTreeSet<String> = ["provide", "inventory"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let plan = resolve(&[SCAFFOLD.to_string()], &completed).unwrap();
        assert_eq!(tags(&plan), vec!["scaffold"]);
    }

    #[test]
    fn rally_needs_openstack_not_just_scaffold() {
        let completed: BTreeSet<String> = ["provide", "inventory", "scaffold"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert!(matches!(
            resolve(&[RALLY.to_string()], &completed),
            Err(Error::MissingPrerequisite { missing, .. }) if missing == "openstack"
        ));
    }

    #[test]
    fn backup_and_destroy_have_no_prerequisites() {
        for tag in [BACKUP, DESTROY] {
            let plan = resolve(&[tag.to_string()], &BTreeSet::new()).unwrap();
            assert_eq!(tags(&plan), vec![tag.to_string()]);
        }
    }
}
