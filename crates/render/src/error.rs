//! Failure classes a renderer visit can produce.

/// Result of a renderer operation.
pub type RenderResult<T> = Result<T, RenderFailure>;

/// A failed renderer operation.
///
/// There are exactly two classes. The dispatch layer passes both through
/// untouched; the render loop decides what to do with them.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RenderFailure {
    /// The rendering operation could not complete (resource exhaustion,
    /// shader link failure, device loss). The caller may retry, skip the
    /// frame or switch modes.
    #[error("engine error: {0}")]
    Engine(String),

    /// A precondition of the renderer was violated by the caller, e.g.
    /// rendering before initialization. Not retryable.
    #[error("contract violation: {0}")]
    ContractViolation(String),
}

/// Coarse classification used by failure policies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureClass {
    Engine,
    Contract,
}

impl RenderFailure {
    pub fn engine(msg: impl Into<String>) -> Self {
        Self::Engine(msg.into())
    }

    pub fn contract(msg: impl Into<String>) -> Self {
        Self::ContractViolation(msg.into())
    }

    pub fn class(&self) -> FailureClass {
        match self {
            Self::Engine(_) => FailureClass::Engine,
            Self::ContractViolation(_) => FailureClass::Contract,
        }
    }

    /// Only engine errors may be retried.
    pub fn is_retryable(&self) -> bool {
        self.class() == FailureClass::Engine
    }

    /// The message without the class prefix.
    pub fn message(&self) -> &str {
        match self {
            Self::Engine(msg) | Self::ContractViolation(msg) => msg,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_prefixes_are_stable() {
        assert_eq!(
            RenderFailure::engine("out of memory").to_string(),
            "engine error: out of memory"
        );
        assert_eq!(
            RenderFailure::contract("not initialized").to_string(),
            "contract violation: not initialized"
        );
    }

    #[test]
    fn classification() {
        let engine = RenderFailure::engine("x");
        let contract = RenderFailure::contract("y");
        assert_eq!(engine.class(), FailureClass::Engine);
        assert_eq!(contract.class(), FailureClass::Contract);
        assert!(engine.is_retryable());
        assert!(!contract.is_retryable());
    }

    #[test]
    fn message_strips_class() {
        assert_eq!(RenderFailure::contract("not initialized").message(), "not initialized");
    }
}
