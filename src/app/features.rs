use std::collections::HashMap;
use std::sync::RwLock;

/// Feature name guarding the notification-creation pathway.
pub const NOTIFICATIONS: &str = "notifications";

/// Runtime on/off switches for named capabilities. An explicitly constructed,
/// injected instance; unknown features read as disabled.
pub struct FeatureGate {
    toggles: RwLock<HashMap<String, bool>>,
}

impl FeatureGate {
    pub fn new(notifications_enabled: bool) -> Self {
        let mut toggles = HashMap::new();
        toggles.insert(NOTIFICATIONS.to_string(), notifications_enabled);
        Self {
            toggles: RwLock::new(toggles),
        }
    }

    pub fn is_enabled(&self, feature: &str) -> bool {
        self.toggles
            .read()
            .expect("feature lock poisoned")
            .get(feature)
            .copied()
            .unwrap_or(false)
    }

    pub fn enable(&self, feature: &str) {
        self.toggles
            .write()
            .expect("feature lock poisoned")
            .insert(feature.to_string(), true);
    }

    pub fn disable(&self, feature: &str) {
        self.toggles
            .write()
            .expect("feature lock poisoned")
            .insert(feature.to_string(), false);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggles_flip_and_persist() {
        let gate = FeatureGate::new(true);
        assert!(gate.is_enabled(NOTIFICATIONS));

        gate.disable(NOTIFICATIONS);
        assert!(!gate.is_enabled(NOTIFICATIONS));

        gate.enable(NOTIFICATIONS);
        assert!(gate.is_enabled(NOTIFICATIONS));
    }

    #[test]
    fn unknown_feature_is_disabled() {
        let gate = FeatureGate::new(true);
        assert!(!gate.is_enabled("reports"));
    }
}
