// Project imports
use crate::detection::types::DetectMethod;

/// Endpoint table entry of a detection protocol.
///
/// Either one fixed value independent of the method, or a genuine
/// primary/alternative pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    Constant(String),
    Switchable {
        primary: String,
        alternative: String,
    },
}

impl Endpoint {
    pub fn constant(value: impl Into<String>) -> Self {
        Endpoint::Constant(value.into())
    }

    pub fn switchable(primary: impl Into<String>, alternative: impl Into<String>) -> Self {
        Endpoint::Switchable {
            primary: primary.into(),
            alternative: alternative.into(),
        }
    }

    /// Resolves the endpoint value for the given method.
    ///
    /// The coordinator always supplies `Primary` or `Alternative`;
    /// resolving with `Unspecified` is a caller error and falls back to
    /// the primary value.
    pub fn resolve(&self, method: DetectMethod) -> &str {
        match self {
            Endpoint::Constant(value) => value,
            Endpoint::Switchable {
                primary,
                alternative,
            } => match method {
                DetectMethod::Alternative => alternative,
                DetectMethod::Primary => primary,
                DetectMethod::Unspecified => {
                    debug_assert!(false, "endpoint resolved with an unspecified method");
                    primary
                }
            },
        }
    }

    /// True iff a non-empty alternative value was configured.
    pub fn has_alternative(&self) -> bool {
        match self {
            Endpoint::Constant(_) => false,
            Endpoint::Switchable { alternative, .. } => !alternative.is_empty(),
        }
    }
}
