// Container models: the daemon listing projection and the display record

use serde::{Deserialize, Serialize};

/// Identifiers longer than this are cut for display.
pub const SHORT_ID_LEN: usize = 12;

/// One entry of the daemon's running-container listing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListedContainer {
    pub id: String,
    /// Name aliases as reported by the daemon, e.g. `["/web"]`.
    pub names: Vec<String>,
    /// Coarse lifecycle state ("running").
    pub state: Option<String>,
    /// Free-text status ("Up 3 minutes").
    pub status: Option<String>,
}

impl ListedContainer {
    /// Identifier truncated to [`SHORT_ID_LEN`] characters when longer.
    pub fn short_id(&self) -> String {
        if self.id.chars().count() > SHORT_ID_LEN {
            self.id.chars().take(SHORT_ID_LEN).collect()
        } else {
            self.id.clone()
        }
    }

    /// First alias with its leading `/` removed; falls back to the short id.
    pub fn display_name(&self) -> String {
        match self.names.first() {
            Some(name) => name.strip_prefix('/').unwrap_or(name).to_string(),
            None => self.short_id(),
        }
    }

    /// Free-text status when present and non-empty, otherwise the coarse state.
    pub fn display_status(&self) -> String {
        self.status
            .as_deref()
            .filter(|s| !s.is_empty())
            .or(self.state.as_deref())
            .unwrap_or_default()
            .to_string()
    }
}

/// Display-ready row, rebuilt from scratch every poll cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainerRecord {
    pub id: String,
    pub name: String,
    pub status: String,
    pub cpu_percent: String,
    pub memory: String,
    /// `"<read> / <write>"`
    pub block_io: String,
    /// `"↓<rx> ↑<tx>"`
    pub network: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listed(id: &str, name: &str) -> ListedContainer {
        ListedContainer {
            id: id.into(),
            names: vec![name.into()],
            ..Default::default()
        }
    }

    #[test]
    fn short_id_truncates_long_ids_to_twelve() {
        let c = listed("0123456789abcdef0123", "/x");
        assert_eq!(c.short_id(), "0123456789ab");
        assert_eq!(c.short_id().len(), SHORT_ID_LEN);
    }

    #[test]
    fn short_id_keeps_short_ids() {
        assert_eq!(listed("abc", "/x").short_id(), "abc");
        assert_eq!(listed("0123456789ab", "/x").short_id(), "0123456789ab");
    }

    #[test]
    fn display_name_strips_only_the_leading_separator() {
        assert_eq!(listed("a", "/web").display_name(), "web");
        assert_eq!(listed("a", "/stack/db").display_name(), "stack/db");
        assert_eq!(listed("a", "plain").display_name(), "plain");
    }

    #[test]
    fn display_name_without_aliases_uses_short_id() {
        let c = ListedContainer {
            id: "0123456789abcdef".into(),
            ..Default::default()
        };
        assert_eq!(c.display_name(), "0123456789ab");
    }

    #[test]
    fn display_status_prefers_free_text() {
        let mut c = ListedContainer {
            state: Some("running".into()),
            status: Some("Up 5 minutes".into()),
            ..Default::default()
        };
        assert_eq!(c.display_status(), "Up 5 minutes");
        c.status = Some(String::new());
        assert_eq!(c.display_status(), "running");
        c.status = None;
        assert_eq!(c.display_status(), "running");
        c.state = None;
        assert_eq!(c.display_status(), "");
    }

    #[test]
    fn record_serializes_camel_case() {
        let r = ContainerRecord {
            id: "abc".into(),
            name: "web".into(),
            status: "Up".into(),
            cpu_percent: "1.0%".into(),
            memory: "1.0 MB".into(),
            block_io: "0 B / 0 B".into(),
            network: "↓0 B ↑0 B".into(),
        };
        let json = serde_json::to_string(&r).unwrap();
        assert!(json.contains("\"cpuPercent\""));
        assert!(json.contains("\"blockIo\""));
    }
}
