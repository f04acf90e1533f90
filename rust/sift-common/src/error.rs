use thiserror::Error;

#[derive(Debug, Error)]
#[error(transparent)]
pub struct Error(Box<ErrorKind>);

impl Error {
    pub fn kind(&self) -> &ErrorKind {
        self.0.as_ref()
    }

    pub fn into_kind(self) -> ErrorKind {
        *self.0
    }

    pub fn invalid_arg(name: impl Into<String>, message: impl Into<String>) -> Error {
        Error(
            ErrorKind::InvalidArgument {
                name: name.into(),
                message: message.into(),
            }
            .into(),
        )
    }

    pub fn invalid_operation(name: impl Into<String>) -> Error {
        Error(ErrorKind::InvalidOperation { name: name.into() }.into())
    }

    /// Query text that could not be parsed. `query` is the complete input as
    /// the caller supplied it.
    pub fn query_syntax(query: impl Into<String>, message: impl Into<String>) -> Error {
        Error(
            ErrorKind::QuerySyntax {
                query: query.into(),
                message: message.into(),
            }
            .into(),
        )
    }

    /// A well-formed query tree that breaks an evaluation contract.
    pub fn invalid_query(message: impl Into<String>) -> Error {
        Error(
            ErrorKind::InvalidQuery {
                message: message.into(),
            }
            .into(),
        )
    }

    pub fn is_query_syntax(&self) -> bool {
        matches!(self.kind(), ErrorKind::QuerySyntax { .. })
    }

    pub fn is_invalid_query(&self) -> bool {
        matches!(self.kind(), ErrorKind::InvalidQuery { .. })
    }
}

#[derive(Debug, Error)]
pub enum ErrorKind {
    #[error("invalid argument {name}: {message}")]
    InvalidArgument { name: String, message: String },

    #[error("invalid operation {name}")]
    InvalidOperation { name: String },

    #[error("unable to parse query input '{query}': {message}")]
    QuerySyntax { query: String, message: String },

    #[error("invalid query: {message}")]
    InvalidQuery { message: String },
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Self {
        Error(kind.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_syntax_names_input() {
        let err = Error::query_syntax("word~1a", "invalid fuzziness '1a'");
        assert!(err.is_query_syntax());
        assert_eq!(
            err.to_string(),
            "unable to parse query input 'word~1a': invalid fuzziness '1a'"
        );
    }

    #[test]
    fn test_into_kind() {
        let err = Error::invalid_query("mustNot leaf 'x' is not prohibited");
        assert!(err.is_invalid_query());
        assert!(matches!(err.into_kind(), ErrorKind::InvalidQuery { .. }));
    }
}
