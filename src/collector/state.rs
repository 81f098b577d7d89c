//! Domain lifecycle state mapping.

use serde::Serialize;

/// Normalized domain lifecycle state.
///
/// The label set is a stable contract with downstream consumers; a raw
/// numeric code must never leak into output. `from_code` is total: every
/// input maps to a label, unrecognized codes to `unknown`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DomainState {
    NoState,
    Running,
    Blocked,
    Paused,
    Shutdown,
    Shutoff,
    Crashed,
    Pmsuspended,
    Unknown,
}

impl DomainState {
    /// Map a libvirt lifecycle state code to its label.
    pub fn from_code(code: u32) -> Self {
        match code {
            0 => Self::NoState,
            1 => Self::Running,
            2 => Self::Blocked,
            3 => Self::Paused,
            4 => Self::Shutdown,
            5 => Self::Shutoff,
            6 => Self::Crashed,
            7 => Self::Pmsuspended,
            _ => Self::Unknown,
        }
    }

    /// The lowercase label emitted in events.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NoState => "no_state",
            Self::Running => "running",
            Self::Blocked => "blocked",
            Self::Paused => "paused",
            Self::Shutdown => "shutdown",
            Self::Shutoff => "shutoff",
            Self::Crashed => "crashed",
            Self::Pmsuspended => "pmsuspended",
            Self::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for DomainState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recognized_codes_map_to_fixed_labels() {
        let expected = [
            (0, "no_state"),
            (1, "running"),
            (2, "blocked"),
            (3, "paused"),
            (4, "shutdown"),
            (5, "shutoff"),
            (6, "crashed"),
            (7, "pmsuspended"),
        ];
        for (code, label) in expected {
            assert_eq!(DomainState::from_code(code).as_str(), label);
        }
    }

    #[test]
    fn test_unrecognized_codes_map_to_unknown() {
        for code in [8, 9, 42, 255, u32::MAX] {
            assert_eq!(DomainState::from_code(code), DomainState::Unknown);
        }
    }

    #[test]
    fn test_serializes_as_label() {
        let json = serde_json::to_string(&DomainState::Pmsuspended).unwrap();
        assert_eq!(json, "\"pmsuspended\"");
    }
}
