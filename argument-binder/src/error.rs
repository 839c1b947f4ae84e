use std::ffi::{OsStr, OsString};
use std::fmt;

/// A boxed error as returned by converters and setters.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// The error type of this crate.
///
/// Errors are cheap to move around (the payload is boxed) and carry a
/// [`kind`](Self::kind), the [`Param`] they relate to, the offending value
/// and an optional source error.  The regular `Display` output is a short
/// message, the alternate form (`{:#}`) also includes the value and the
/// source.
pub struct Error {
    repr: Box<ErrorRepr>,
}

impl Error {
    pub(crate) fn new(kind: ErrorKind) -> Error {
        Error {
            repr: Box::new(ErrorRepr {
                kind,
                param: None,
                value: None,
                source: None,
            }),
        }
    }

    /// Creates a declaration error.
    pub(crate) fn config(message: impl Into<String>) -> Error {
        Error::new(ErrorKind::Config).with_value(ErrorValue::String(message.into()))
    }

    pub(crate) fn with_param(mut self, param: Param) -> Error {
        self.repr.param = Some(param);
        self
    }

    /// Attaches a param unless one is already set.
    pub(crate) fn or_param(mut self, param: Param) -> Error {
        if self.repr.param.is_none() {
            self.repr.param = Some(param);
        }
        self
    }

    pub(crate) fn with_value(mut self, value: ErrorValue) -> Error {
        self.repr.value = Some(value);
        self
    }

    pub(crate) fn with_string_value(self, value: impl Into<String>) -> Error {
        self.with_value(ErrorValue::String(value.into()))
    }

    pub(crate) fn with_source(mut self, source: BoxError) -> Error {
        self.repr.source = Some(source);
        self
    }

    /// Returns the kind of error.
    pub fn kind(&self) -> ErrorKind {
        self.repr.kind
    }

    /// Returns the parameter that caused the error.
    pub fn param(&self) -> Option<&Param> {
        self.repr.param.as_ref()
    }

    /// Returns the offending value as raw os string.
    pub fn raw_value(&self) -> Option<&OsStr> {
        match self.repr.value.as_ref()? {
            ErrorValue::String(s) => Some(OsStr::new(s)),
            ErrorValue::OsString(s) => Some(s),
        }
    }

    /// Returns the offending value if it's valid unicode.
    ///
    /// For declaration errors this is the message.
    pub fn value(&self) -> Option<&str> {
        match self.repr.value.as_ref()? {
            ErrorValue::String(s) => Some(s),
            ErrorValue::OsString(s) => s.to_str(),
        }
    }

    /// Values are missing if neither a value nor a reason was recorded.
    fn has_detail(&self) -> bool {
        self.repr.value.is_some() || self.repr.source.is_some()
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let param = self.param();
        let positional = matches!(param, None | Some(Param::Positional));
        match self.kind() {
            ErrorKind::Config => {
                return write!(f, "invalid declaration: {}", self.value().unwrap_or_default())
            }
            ErrorKind::UnknownArgument => match param {
                Some(p) if !positional => write!(f, "unexpected option '{}'", p)?,
                _ => write!(f, "unexpected argument")?,
            },
            ErrorKind::InvalidValue => match (param, self.has_detail()) {
                (Some(p), true) if !positional => write!(f, "invalid value for '{}'", p)?,
                (Some(p), false) if !positional => write!(f, "missing value for '{}'", p)?,
                (_, true) => write!(f, "invalid parameter")?,
                (_, false) => write!(f, "missing value")?,
            },
            ErrorKind::InvalidUnicode => match param {
                Some(p) if !positional => {
                    write!(f, "argument for '{}' contains invalid unicode", p)?
                }
                _ => write!(f, "argument contains invalid unicode")?,
            },
            ErrorKind::DuplicateArgument => match param {
                Some(p) => write!(f, "option '{}' specified more than once", p)?,
                None => write!(f, "option specified more than once")?,
            },
            ErrorKind::MissingRequired => match param {
                Some(p) if !positional => write!(f, "missing required option '{}'", p)?,
                _ => write!(f, "missing required parameters")?,
            },
        }
        if f.alternate() {
            match self.repr.value {
                Some(ErrorValue::String(ref s)) => write!(f, ": {:?}", s)?,
                Some(ErrorValue::OsString(ref s)) => write!(f, ": {:?}", s)?,
                None => {}
            }
            if let Some(ref source) = self.repr.source {
                write!(f, " ({})", source)?;
            }
        }
        Ok(())
    }
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Error")
            .field("kind", &self.kind())
            .field("param", &self.param())
            .field("raw_value", &self.raw_value())
            .field("source", &self.repr.source)
            .finish()
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self.repr.source {
            Some(ref source) => Some(&**source),
            None => None,
        }
    }
}

pub(crate) enum ErrorValue {
    String(String),
    OsString(OsString),
}

struct ErrorRepr {
    kind: ErrorKind,
    param: Option<Param>,
    value: Option<ErrorValue>,
    source: Option<BoxError>,
}

/// Categorizes an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ErrorKind {
    /// The declaration of the options is broken.
    ///
    /// This is a programming error (duplicate names, bad bounds and similar)
    /// and is only ever returned when building a registry.
    Config,
    /// An option was not recognized and unknown arguments are rejected.
    UnknownArgument,
    /// A value failed to convert, was missing, was given to an option that
    /// does not take one, or exceeded the maximum number of values.
    InvalidValue,
    /// An argument that had to be inspected is not valid unicode.
    InvalidUnicode,
    /// An option that rejects collisions was given more than once.
    DuplicateArgument,
    /// A required option was never given, or a multi-value option or the
    /// parameters got fewer values than their minimum.
    MissingRequired,
}

/// Identifies the option (or the positional parameters) an error is about.
///
/// While scanning this is the name as the user spelled it.  Errors raised
/// when finalizing name the option by its canonical short name if it has
/// one and by its canonical long name otherwise.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Param {
    /// A single character option (`-x`)
    Short(char),
    /// A long option (`--name`)
    Long(String),
    /// A slash style option (`/name` or `/x`)
    Slash(String),
    /// The positional parameters
    Positional,
}

impl Param {
    /// Is this a specific short option?
    pub fn is_short(&self, c: char) -> bool {
        matches!(self, Param::Short(r) if *r == c)
    }

    /// Is this a specific long option?
    pub fn is_long(&self, name: &str) -> bool {
        matches!(self, Param::Long(s) if s == name)
    }

    /// Is this the positional parameters?
    pub fn is_positional(&self) -> bool {
        matches!(self, Param::Positional)
    }
}

impl fmt::Display for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Param::Short(c) => write!(f, "-{}", c),
            Param::Long(name) => write!(f, "--{}", name),
            Param::Slash(name) => write!(f, "/{}", name),
            Param::Positional => write!(f, "<parameters>"),
        }
    }
}

/// Source error for values beyond an option's maximum.
#[derive(Debug, thiserror::Error)]
#[error("at most {max} value(s) accepted")]
pub struct TooManyValues {
    pub max: usize,
}

/// Source error for values short of an option's minimum.
#[derive(Debug, thiserror::Error)]
#[error("expected at least {min} value(s), got {got}")]
pub struct NotEnoughValues {
    pub min: usize,
    pub got: usize,
}

/// Source error for values handed to options that take none.
#[derive(Debug, thiserror::Error)]
#[error("option does not accept a value")]
pub struct UnexpectedValue;

pub(crate) fn os_string_into_string(s: OsString) -> Result<String, Error> {
    s.into_string()
        .map_err(|s| Error::new(ErrorKind::InvalidUnicode).with_value(ErrorValue::OsString(s)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alternate_display() {
        let err = Error::new(ErrorKind::InvalidValue)
            .with_param(Param::Long("count".into()))
            .with_string_value("many")
            .with_source("not a number".into());
        assert_eq!(err.to_string(), "invalid value for '--count'");
        assert_eq!(
            format!("{:#}", err),
            "invalid value for '--count': \"many\" (not a number)"
        );
    }

    #[test]
    fn test_or_param_keeps_existing() {
        let err = Error::new(ErrorKind::DuplicateArgument)
            .with_param(Param::Short('x'))
            .or_param(Param::Long("extra".into()));
        assert_eq!(err.param(), Some(&Param::Short('x')));
        assert_eq!(err.to_string(), "option '-x' specified more than once");
    }

    #[test]
    fn test_config_message() {
        let err = Error::config("duplicate option name 'foo'");
        assert_eq!(err.kind(), ErrorKind::Config);
        assert_eq!(
            err.to_string(),
            "invalid declaration: duplicate option name 'foo'"
        );
    }
}
