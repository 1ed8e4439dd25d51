use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Where an applied wallpaper should end up.
///
/// `External` does not apply anything itself; it prepares the file and hands
/// it off to another application via the chooser flow.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ApplyMode {
    Home,
    Lock,
    Both,
    External,
}

impl ApplyMode {
    /// Stable integer encoding used in the `apply_option` result field.
    pub fn as_int(&self) -> i64 {
        match self {
            ApplyMode::Home => 0,
            ApplyMode::Lock => 1,
            ApplyMode::Both => 2,
            ApplyMode::External => 3,
        }
    }

    pub fn from_int(value: i64) -> Option<Self> {
        match value {
            0 => Some(ApplyMode::Home),
            1 => Some(ApplyMode::Lock),
            2 => Some(ApplyMode::Both),
            3 => Some(ApplyMode::External),
            _ => None,
        }
    }

    pub fn is_external(&self) -> bool {
        matches!(self, ApplyMode::External)
    }
}

impl fmt::Display for ApplyMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApplyMode::Home => write!(f, "home"),
            ApplyMode::Lock => write!(f, "lock"),
            ApplyMode::Both => write!(f, "both"),
            ApplyMode::External => write!(f, "external"),
        }
    }
}

impl FromStr for ApplyMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "home" => Ok(ApplyMode::Home),
            "lock" => Ok(ApplyMode::Lock),
            "both" => Ok(ApplyMode::Both),
            "external" => Ok(ApplyMode::External),
            other => Err(format!("Unknown apply mode: {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_int_roundtrip() {
        for mode in [
            ApplyMode::Home,
            ApplyMode::Lock,
            ApplyMode::Both,
            ApplyMode::External,
        ] {
            assert_eq!(ApplyMode::from_int(mode.as_int()), Some(mode));
        }
        assert_eq!(ApplyMode::from_int(-1), None);
        assert_eq!(ApplyMode::from_int(42), None);
    }

    #[test]
    fn test_parse() {
        assert_eq!("External".parse::<ApplyMode>(), Ok(ApplyMode::External));
        assert!("desktop".parse::<ApplyMode>().is_err());
    }
}
