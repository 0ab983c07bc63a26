use serde::{Deserialize, Serialize};

/// When the passive overlay is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum VisibilityMode {
    #[default]
    Always,
    WhenMuted,
    WhenUnmuted,
}

impl VisibilityMode {
    pub const ALL: [VisibilityMode; 3] = [
        VisibilityMode::Always,
        VisibilityMode::WhenMuted,
        VisibilityMode::WhenUnmuted,
    ];

    pub fn label(self) -> &'static str {
        match self {
            VisibilityMode::Always => "Always",
            VisibilityMode::WhenMuted => "When Muted",
            VisibilityMode::WhenUnmuted => "When Unmuted",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisibilityPolicy {
    pub enabled: bool,
    pub mode: VisibilityMode,
}

impl Default for VisibilityPolicy {
    fn default() -> Self {
        Self {
            enabled: true,
            mode: VisibilityMode::Always,
        }
    }
}

impl VisibilityPolicy {
    pub fn should_show(&self, muted: bool) -> bool {
        if !self.enabled {
            return false;
        }
        match self.mode {
            VisibilityMode::Always => true,
            VisibilityMode::WhenMuted => muted,
            VisibilityMode::WhenUnmuted => !muted,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy(mode: VisibilityMode) -> VisibilityPolicy {
        VisibilityPolicy {
            enabled: true,
            mode,
        }
    }

    #[test]
    fn when_muted() {
        assert!(policy(VisibilityMode::WhenMuted).should_show(true));
        assert!(!policy(VisibilityMode::WhenMuted).should_show(false));
    }

    #[test]
    fn when_unmuted() {
        assert!(!policy(VisibilityMode::WhenUnmuted).should_show(true));
        assert!(policy(VisibilityMode::WhenUnmuted).should_show(false));
    }

    #[test]
    fn always_ignores_mute_state() {
        assert!(policy(VisibilityMode::Always).should_show(true));
        assert!(policy(VisibilityMode::Always).should_show(false));
    }

    #[test]
    fn disabled_overlay_never_shows() {
        let p = VisibilityPolicy {
            enabled: false,
            mode: VisibilityMode::Always,
        };
        assert!(!p.should_show(true));
        assert!(!p.should_show(false));
    }

    #[test]
    fn persisted_names() {
        let json = serde_json::to_string(&VisibilityMode::WhenMuted).expect("json");
        assert_eq!(json, "\"WhenMuted\"");
    }
}
