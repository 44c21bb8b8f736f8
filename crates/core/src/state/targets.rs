//! Named numeric expectations on a snapshot

use converge_domain::FieldSource;

/// Target values for named snapshot fields, e.g. memory and volume after a
/// resize
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldTargets {
    targets: Vec<(String, i64)>,
}

impl FieldTargets {
    /// No targets
    pub fn new() -> Self {
        Self::default()
    }

    /// Require `name` to equal `value`
    #[must_use]
    pub fn expect(mut self, name: impl Into<String>, value: i64) -> Self {
        self.targets.push((name.into(), value));
        self
    }

    /// True when no target was added
    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    /// Target field names in insertion order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.targets.iter().map(|(name, _)| name.as_str())
    }

    /// True when every target field is present and equal
    pub fn is_satisfied_by<S: FieldSource + ?Sized>(&self, snapshot: &S) -> bool {
        self.targets.iter().all(|(name, want)| snapshot.field(name) == Some(*want))
    }

    /// One line per unmet target, e.g. `memory is 4, want 8`
    pub fn mismatches<S: FieldSource + ?Sized>(&self, snapshot: &S) -> Vec<String> {
        self.targets
            .iter()
            .filter_map(|(name, want)| match snapshot.field(name) {
                Some(have) if have == *want => None,
                Some(have) => Some(format!("{name} is {have}, want {want}")),
                None => Some(format!("{name} is missing, want {want}")),
            })
            .collect()
    }

    /// Awaiting description for timeout messages
    pub fn awaiting(&self) -> String {
        let names: Vec<&str> = self.names().collect();
        if names.is_empty() {
            "waiting for the resource to reach target".to_string()
        } else {
            format!("waiting for {} to reach target", names.join("/"))
        }
    }
}

#[cfg(test)]
mod tests {
    use converge_domain::ResourceSnapshot;

    use super::*;

    #[test]
    fn test_awaiting_names_fields_in_order() {
        let targets = FieldTargets::new().expect("memory", 8).expect("volume", 200);
        assert_eq!(targets.awaiting(), "waiting for memory/volume to reach target");
        assert_eq!(FieldTargets::new().awaiting(), "waiting for the resource to reach target");
    }

    #[test]
    fn test_satisfaction_and_mismatches() {
        let targets = FieldTargets::new().expect("memory", 8).expect("volume", 200);
        let before = ResourceSnapshot::new("cmgo-1", "running").with_field("memory", 4);
        let after = ResourceSnapshot::new("cmgo-1", "running")
            .with_field("memory", 8)
            .with_field("volume", 200);

        assert!(!targets.is_satisfied_by(&before));
        assert_eq!(
            targets.mismatches(&before),
            vec!["memory is 4, want 8".to_string(), "volume is missing, want 200".to_string()]
        );
        assert!(targets.is_satisfied_by(&after));
        assert!(targets.mismatches(&after).is_empty());
    }

    #[test]
    fn test_empty_targets_are_always_satisfied() {
        let snapshot = ResourceSnapshot::new("cmgo-1", "running");
        assert!(FieldTargets::new().is_satisfied_by(&snapshot));
    }
}
