use scenebox_render::RendererKind;
use std::fmt;
use std::str::FromStr;

/// A high-level request to the sandbox.
///
/// The render loop consumes actions, never raw key or menu events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SandboxAction {
    /// Render one frame with the active mode.
    RenderFrame,
    /// Discard the active handle and use another mode from now on.
    SwitchMode(RendererKind),
    /// Initialize the active renderer.
    Initialize,
    /// Collect diagnostics from the active renderer.
    Diagnose,
    /// Resize the render target.
    Resize { width: u32, height: u32 },
    /// Tear down every renderer.
    Shutdown,
    /// No-op (used for input mapping that hasn't been bound yet).
    Noop,
}

/// Errors from parsing action tokens.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ActionParseError {
    #[error("unknown action '{0}'")]
    UnknownAction(String),
    #[error("action '{action}' needs an argument")]
    MissingArgument { action: String },
    #[error("invalid argument '{arg}' for action '{action}'")]
    InvalidArgument { action: String, arg: String },
}

impl FromStr for SandboxAction {
    type Err = ActionParseError;

    /// Tokens: `frame`, `switch:<mode>`, `init`, `diag`, `resize:<w>x<h>`,
    /// `shutdown`, `noop`.
    fn from_str(token: &str) -> Result<Self, Self::Err> {
        let token = token.trim();
        let (name, arg) = match token.split_once(':') {
            Some((name, arg)) => (name, Some(arg.trim())),
            None => (token, None),
        };
        let need_arg = || {
            arg.filter(|a| !a.is_empty())
                .ok_or_else(|| ActionParseError::MissingArgument {
                    action: name.to_string(),
                })
        };
        let invalid = |arg: &str| ActionParseError::InvalidArgument {
            action: name.to_string(),
            arg: arg.to_string(),
        };

        match name {
            "frame" => Ok(Self::RenderFrame),
            "init" => Ok(Self::Initialize),
            "diag" => Ok(Self::Diagnose),
            "shutdown" => Ok(Self::Shutdown),
            "noop" => Ok(Self::Noop),
            "switch" => {
                let arg = need_arg()?;
                arg.parse().map(Self::SwitchMode).map_err(|_| invalid(arg))
            }
            "resize" => {
                let arg = need_arg()?;
                let (w, h) = arg.split_once('x').ok_or_else(|| invalid(arg))?;
                let width = w.parse().map_err(|_| invalid(arg))?;
                let height = h.parse().map_err(|_| invalid(arg))?;
                Ok(Self::Resize { width, height })
            }
            other => Err(ActionParseError::UnknownAction(other.to_string())),
        }
    }
}

impl fmt::Display for SandboxAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RenderFrame => f.write_str("frame"),
            Self::SwitchMode(kind) => write!(f, "switch:{kind}"),
            Self::Initialize => f.write_str("init"),
            Self::Diagnose => f.write_str("diag"),
            Self::Resize { width, height } => write!(f, "resize:{width}x{height}"),
            Self::Shutdown => f.write_str("shutdown"),
            Self::Noop => f.write_str("noop"),
        }
    }
}

/// Parse a comma-separated list of action tokens. Empty entries are skipped.
pub fn parse_script(script: &str) -> Result<Vec<SandboxAction>, ActionParseError> {
    script
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::parse::<SandboxAction>)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simple_tokens() {
        assert_eq!("frame".parse::<SandboxAction>(), Ok(SandboxAction::RenderFrame));
        assert_eq!(" diag ".parse::<SandboxAction>(), Ok(SandboxAction::Diagnose));
        assert_eq!("noop".parse::<SandboxAction>(), Ok(SandboxAction::Noop));
    }

    #[test]
    fn switch_takes_a_mode() {
        assert_eq!(
            "switch:deferred".parse::<SandboxAction>(),
            Ok(SandboxAction::SwitchMode(RendererKind::Deferred))
        );
        assert_eq!(
            "switch".parse::<SandboxAction>(),
            Err(ActionParseError::MissingArgument {
                action: "switch".into()
            })
        );
        assert!(matches!(
            "switch:raytraced".parse::<SandboxAction>(),
            Err(ActionParseError::InvalidArgument { .. })
        ));
    }

    #[test]
    fn resize_parses_dimensions() {
        assert_eq!(
            "resize:1920x1080".parse::<SandboxAction>(),
            Ok(SandboxAction::Resize {
                width: 1920,
                height: 1080
            })
        );
        assert!("resize:1920".parse::<SandboxAction>().is_err());
        assert!("resize:axb".parse::<SandboxAction>().is_err());
    }

    #[test]
    fn unknown_token_rejected() {
        assert_eq!(
            "explode".parse::<SandboxAction>(),
            Err(ActionParseError::UnknownAction("explode".into()))
        );
    }

    #[test]
    fn script_parses_in_order() {
        let actions = parse_script("init, frame,,switch:forward,frame").unwrap();
        assert_eq!(
            actions,
            vec![
                SandboxAction::Initialize,
                SandboxAction::RenderFrame,
                SandboxAction::SwitchMode(RendererKind::Forward),
                SandboxAction::RenderFrame,
            ]
        );
    }

    #[test]
    fn display_matches_token_syntax() {
        let actions = [
            SandboxAction::SwitchMode(RendererKind::Debug),
            SandboxAction::Resize {
                width: 640,
                height: 480,
            },
            SandboxAction::Shutdown,
        ];
        for action in actions {
            assert_eq!(action.to_string().parse::<SandboxAction>(), Ok(action));
        }
    }
}
