use thiserror::Error;
use kube::error::Error as KubeError;

#[derive(Error, Debug)]
pub enum Error {
    /// The completion handler json does not have the expected shape
    #[error("malformed completion handler: {0}")]
    MalformedInput(#[from] MalformedInputError),
    /// More than one completion handler kind was declared
    #[error("you must provide just 1 completion handler, provided {count}")]
    Multiplicity { count: usize },
    /// Binding translation errors
    #[error("binding translation failed: {0}")]
    Translation(#[from] TranslationError),
    /// Generated source encoding errors
    #[error("unable to serialize generated source: {0}")]
    Serialization(#[from] serde_yaml::Error),
    /// An error annotated with what was being attempted
    #[error("{context}: {source}")]
    Context {
        context: &'static str,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    pub fn context(self, context: &'static str) -> Error {
        Error::Context { context, source: Box::new(self) }
    }

    /// The innermost error, skipping any context wrappers.
    pub fn root(&self) -> &Error {
        match self {
            Error::Context { source, .. } => source.root(),
            err => err,
        }
    }

    pub fn is_malformed_input(&self) -> bool {
        matches!(self.root(), Error::MalformedInput(_))
    }
}

#[derive(Error, Debug)]
pub enum MalformedInputError {
    #[error("invalid json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("expected a json object, found {0}")]
    NotAnObject(&'static str),
    #[error("unknown completion handler type {0:?}")]
    UnknownType(String),
    #[error("parameter {0:?} must be a string, number or boolean")]
    NestedParameter(String),
}

#[derive(Error, Debug)]
pub enum TranslationError {
    #[error("endpoint missing ref and uri, expected at least one")]
    EmptyEndpoint,
    #[error("no binding provider can handle endpoint {0}")]
    UnsupportedEndpoint(String),
    #[error("referenced {kind} {name:?} not found in namespace {namespace:?}")]
    ReferenceNotFound {
        kind: String,
        name: String,
        namespace: String,
    },
    #[error("reference is missing a name")]
    ReferenceMustHaveName,
    #[error("invalid endpoint properties: {0}")]
    InvalidProperties(#[from] MalformedInputError),
    #[error("Error: {0}")]
    KubeError(#[from] KubeError),
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn root_skips_context() {
        let err = Error::Multiplicity { count: 2 }
            .context("could not parse completion handler")
            .context("reconcile");
        assert!(matches!(err.root(), Error::Multiplicity { count: 2 }));
        assert_eq!(
            err.to_string(),
            "reconcile: could not parse completion handler: you must provide just 1 completion handler, provided 2"
        );
    }

    #[test]
    fn malformed_input_through_context() {
        let err = Error::from(MalformedInputError::UnknownType("retry".into()))
            .context("could not parse completion handler");
        assert!(err.is_malformed_input());
        assert!(!Error::Multiplicity { count: 3 }.is_malformed_input());
    }
}
