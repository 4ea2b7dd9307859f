use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The renderer modes the sandbox can switch between.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RendererKind {
    Debug,
    Deferred,
    Forward,
}

impl RendererKind {
    /// Every mode, in menu order.
    pub const ALL: [RendererKind; 3] = [Self::Debug, Self::Deferred, Self::Forward];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Deferred => "deferred",
            Self::Forward => "forward",
        }
    }
}

impl fmt::Display for RendererKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown renderer kind '{0}' (expected debug, deferred or forward)")]
pub struct UnknownRendererKind(pub String);

impl FromStr for RendererKind {
    type Err = UnknownRendererKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "debug" => Ok(Self::Debug),
            "deferred" => Ok(Self::Deferred),
            "forward" => Ok(Self::Forward),
            other => Err(UnknownRendererKind(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!("Forward".parse::<RendererKind>(), Ok(RendererKind::Forward));
        assert_eq!(" deferred ".parse::<RendererKind>(), Ok(RendererKind::Deferred));
    }

    #[test]
    fn parse_rejects_unknown() {
        let err = "raytraced".parse::<RendererKind>().unwrap_err();
        assert!(err.to_string().contains("raytraced"));
    }

    #[test]
    fn display_round_trips_through_parse() {
        for kind in RendererKind::ALL {
            assert_eq!(kind.to_string().parse::<RendererKind>(), Ok(kind));
        }
    }
}
