use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Estado de ciclo de vida de una instancia.
///
/// Transiciones válidas:
/// - `Running` -> `Running` (cada salto no terminal)
/// - `Running` -> `End` | `Terminated` | `Reverted`
///
/// Los demás estados son terminales: ninguna operación los abandona.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InstanceStatus {
    Running,
    End,
    Terminated,
    Reverted,
}

impl InstanceStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, InstanceStatus::Running)
    }

    pub fn can_transition_to(&self, _next: InstanceStatus) -> bool {
        matches!(self, InstanceStatus::Running)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            InstanceStatus::Running => "running",
            InstanceStatus::End => "end",
            InstanceStatus::Terminated => "terminated",
            InstanceStatus::Reverted => "reverted",
        }
    }
}

impl fmt::Display for InstanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InstanceStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "running" => Ok(InstanceStatus::Running),
            "end" => Ok(InstanceStatus::End),
            "terminated" => Ok(InstanceStatus::Terminated),
            "reverted" => Ok(InstanceStatus::Reverted),
            other => Err(format!("unknown instance status '{other}'")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_running_can_move() {
        use InstanceStatus::*;
        for next in [Running, End, Terminated, Reverted] {
            assert!(Running.can_transition_to(next));
            for terminal in [End, Terminated, Reverted] {
                assert!(!terminal.can_transition_to(next));
                assert!(terminal.is_terminal());
            }
        }
        assert!(!Running.is_terminal());
    }

    #[test]
    fn tags_parse_back() {
        assert_eq!("reverted".parse::<InstanceStatus>(), Ok(InstanceStatus::Reverted));
        assert!("paused".parse::<InstanceStatus>().is_err());
    }
}
