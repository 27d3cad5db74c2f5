use crate::errors::types::Error;
use std::fmt;

/// Where an infrastructure error happened
#[derive(Debug, Clone)]
pub struct ErrorContext {
    /// Component where the error occurred
    pub component: String,
    /// Operation that was being performed
    pub operation: String,
    /// Additional context information
    pub details: Option<String>,
}

impl ErrorContext {
    /// Create a new error context
    pub fn new<S: Into<String>, T: Into<String>>(component: S, operation: T) -> Self {
        ErrorContext {
            component: component.into(),
            operation: operation.into(),
            details: None,
        }
    }

    /// Add details to the context
    pub fn with_details<S: Into<String>>(mut self, details: S) -> Self {
        self.details = Some(details.into());
        self
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "in component '{}' during operation '{}'", self.component, self.operation)?;
        if let Some(details) = &self.details {
            write!(f, " ({})", details)?;
        }
        Ok(())
    }
}

/// Extension trait for attaching an [`ErrorContext`] to a failed result
pub trait ErrorExt<T> {
    /// Annotate the error (if any) with `ctx`
    fn context(self, ctx: ErrorContext) -> std::result::Result<T, Error>;

    /// Shorthand for a context with just component and operation
    fn with_context<S: Into<String>, U: Into<String>>(
        self,
        component: S,
        operation: U,
    ) -> std::result::Result<T, Error>;
}

impl<T> ErrorExt<T> for std::result::Result<T, Error> {
    fn context(self, ctx: ErrorContext) -> std::result::Result<T, Error> {
        self.map_err(|err| match err {
            // Keep the variant for config errors so callers can still match on it
            Error::Config(msg) => Error::Config(format!("{} [{}]", msg, ctx)),
            other => Error::Custom(format!("{} [{}]", other, ctx)),
        })
    }

    fn with_context<S: Into<String>, U: Into<String>>(
        self,
        component: S,
        operation: U,
    ) -> std::result::Result<T, Error> {
        self.context(ErrorContext::new(component, operation))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_display_with_details() {
        let ctx = ErrorContext::new("config", "load").with_details("client.toml");
        assert_eq!(
            ctx.to_string(),
            "in component 'config' during operation 'load' (client.toml)"
        );
    }

    #[test]
    fn test_config_errors_keep_their_variant() {
        let result: std::result::Result<(), Error> = Err(Error::Config("bad key".into()));
        let err = result.with_context("config", "parse").unwrap_err();
        assert!(matches!(err, Error::Config(ref msg) if msg.contains("bad key")));
    }

    #[test]
    fn test_other_errors_become_custom() {
        let result: std::result::Result<(), Error> = Err(Error::Io("denied".into()));
        let err = result.with_context("config", "read").unwrap_err();
        assert!(matches!(err, Error::Custom(ref msg) if msg.contains("denied") && msg.contains("read")));
    }

    #[test]
    fn test_ok_passes_through() {
        let result: std::result::Result<u8, Error> = Ok(7);
        assert_eq!(result.with_context("x", "y").unwrap(), 7);
    }
}
