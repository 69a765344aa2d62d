//! Optional object capabilities probed before configuration.
//!
//! Not every content object supports every configuration step: only
//! container-like objects accept containment constraints, and some types
//! carry no navigation behavior at all. The materializer asks the store an
//! explicit `supports` question instead of calling blindly and suppressing
//! failures, so skipping an unsupported step is a designed branch.

/// Optional behavior a materialized object may or may not support.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ObjectCapability {
    /// Object exposes a navigation-exclusion flag.
    NavigationExclusion,
    /// Object can constrain which content types it contains.
    ConstrainedContainment,
}

impl ObjectCapability {
    /// Stable string id used in diagnostics and journals.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NavigationExclusion => "navigation_exclusion",
            Self::ConstrainedContainment => "constrained_containment",
        }
    }

    /// User-facing short description.
    pub fn description(self) -> &'static str {
        match self {
            Self::NavigationExclusion => {
                "Object can be hidden from navigation listings via an exclusion flag."
            }
            Self::ConstrainedContainment => {
                "Object is a container that can restrict the content types added inside it."
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::ObjectCapability;

    #[test]
    fn capability_string_ids_are_stable() {
        assert_eq!(
            ObjectCapability::NavigationExclusion.as_str(),
            "navigation_exclusion"
        );
        assert_eq!(
            ObjectCapability::ConstrainedContainment.as_str(),
            "constrained_containment"
        );
    }

    #[test]
    fn exposes_user_facing_descriptions() {
        assert!(ObjectCapability::NavigationExclusion
            .description()
            .contains("navigation"));
        assert!(ObjectCapability::ConstrainedContainment
            .description()
            .contains("container"));
    }
}
