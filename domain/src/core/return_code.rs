//! Completion codes of a toy run

/// Completion code returned by every toy and by the process itself
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ReturnCode {
    /// Only usage was printed
    Help,
    /// The toy played well
    #[default]
    Success,
    /// The toy failed, or the run never reached the toy
    Failure,
}

impl ReturnCode {
    /// Process exit code for this completion
    pub fn code(self) -> i32 {
        match self {
            ReturnCode::Help => -2,
            ReturnCode::Success => 0,
            ReturnCode::Failure => 1,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            ReturnCode::Help => "help",
            ReturnCode::Success => "success",
            ReturnCode::Failure => "failure",
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ReturnCode::Success)
    }
}

impl std::fmt::Display for ReturnCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_distinct() {
        assert_eq!(ReturnCode::Success.code(), 0);
        assert_eq!(ReturnCode::Failure.code(), 1);
        assert!(ReturnCode::Help.code() < 0);
    }

    #[test]
    fn test_default_is_success() {
        assert!(ReturnCode::default().is_success());
        assert!(!ReturnCode::Help.is_success());
    }
}
