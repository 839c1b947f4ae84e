use std::ffi::OsString;

use crate::error::{Error, ErrorKind, Param, UnexpectedValue};
use crate::lexer::Lexer;
use crate::registry::{Registry, Unknown};

/// Walks a command line and feeds the registry's handlers.
pub(crate) struct Scanner<'a, 'it, T> {
    registry: &'a mut Registry<T>,
    bag: &'a mut T,
    lexer: Lexer<'it>,
}

impl<'a, 'it, T> Scanner<'a, 'it, T> {
    pub fn new<I, S>(registry: &'a mut Registry<T>, bag: &'a mut T, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        I::IntoIter: 'it,
        S: Into<OsString> + 'it,
    {
        let lexer = Lexer::new(args, registry.settings.syntax);
        Scanner {
            registry,
            bag,
            lexer,
        }
    }

    pub fn run(mut self) -> Result<(), Error> {
        while let Some(param) = self.lexer.next_param()? {
            tracing::trace!(%param, mode = ?self.lexer.mode(), "scanned parameter");
            match param {
                Param::Positional => {
                    if let Some(value) = self.lexer.positional()? {
                        self.positional(value)?;
                    }
                }
                Param::Long(ref name) => {
                    let inline = self.lexer.inline_value()?;
                    match self.registry.lookup_long(name) {
                        Some(index) => {
                            let inline = inline.filter(|value| !value.is_empty());
                            self.assign(index, &param, inline, false)?;
                        }
                        None => {
                            let raw = match inline {
                                Some(value) => format!("--{}={}", name, value),
                                None => format!("--{}", name),
                            };
                            self.unknown(&param, raw)?;
                        }
                    }
                }
                Param::Short(c) => match self.registry.lookup_short(c) {
                    Some(index) => self.assign(index, &param, None, true)?,
                    None => {
                        let rest = self.lexer.inline_value()?.unwrap_or_default();
                        self.unknown(&param, format!("-{}{}", c, rest))?;
                    }
                },
                Param::Slash(ref name) => {
                    let inline = self.lexer.inline_value()?;
                    let mut chars = name.chars();
                    let index = match (chars.next(), chars.next()) {
                        (Some(c), None) => self
                            .registry
                            .lookup_short(c)
                            .map(|index| (index, true))
                            .or_else(|| self.registry.lookup_long(name).map(|i| (i, false))),
                        _ => self.registry.lookup_long(name).map(|index| (index, false)),
                    };
                    match index {
                        Some((index, from_next)) => {
                            let inline = inline.filter(|value| !value.is_empty());
                            self.assign(index, &param, inline, from_next)?;
                        }
                        None => {
                            let raw = match inline {
                                Some(value) => format!("/{}={}", name, value),
                                None => format!("/{}", name),
                            };
                            self.unknown(&param, raw)?;
                        }
                    }
                }
            }
        }
        Ok(())
    }

    /// Hands an occurrence of an option to its handler.
    ///
    /// `inline` is the value attached to the option itself.  If the handler
    /// takes a value and `from_next` is set, the value may also come from the
    /// rest of a short option chain or the next argument.
    fn assign(
        &mut self,
        index: usize,
        param: &Param,
        inline: Option<String>,
        from_next: bool,
    ) -> Result<(), Error> {
        let handler = &mut self.registry.entries[index].handler;
        let value = if handler.takes_value() {
            // an empty value counts as omitted, wherever it came from
            let value = match inline {
                Some(value) => Some(value),
                None if from_next => self.lexer.value()?.filter(|value| !value.is_empty()),
                None => None,
            };
            if value.is_none() {
                return Err(Error::new(ErrorKind::InvalidValue).with_param(param.clone()));
            }
            value
        } else if let Some(value) = inline {
            return Err(Error::new(ErrorKind::InvalidValue)
                .with_param(param.clone())
                .with_string_value(value)
                .with_source(Box::new(UnexpectedValue)));
        } else {
            None
        };
        handler
            .accept(self.bag, value.as_deref())
            .map_err(|err| err.or_param(param.clone()))
    }

    /// Applies the unknown option policy to an undeclared option.
    fn unknown(&mut self, param: &Param, raw: String) -> Result<(), Error> {
        match self.registry.settings.on_unknown {
            Unknown::Throw => Err(Error::new(ErrorKind::UnknownArgument)
                .with_param(param.clone())
                .with_string_value(raw)),
            Unknown::Ignore => {
                tracing::debug!(arg = %raw, "ignoring unknown option");
                Ok(())
            }
            Unknown::PlaceInParameters => self.positional(raw),
        }
    }

    /// Hands a positional argument to the parameters handler.
    fn positional(&mut self, value: String) -> Result<(), Error> {
        let Some(index) = self.registry.parameters else {
            return match self.registry.settings.on_unknown {
                Unknown::Ignore => {
                    tracing::debug!(arg = %value, "ignoring positional argument");
                    Ok(())
                }
                Unknown::Throw | Unknown::PlaceInParameters => {
                    Err(Error::new(ErrorKind::UnknownArgument)
                        .with_param(Param::Positional)
                        .with_string_value(value))
                }
            };
        };
        self.registry.entries[index]
            .handler
            .accept(self.bag, Some(&value))
            .map_err(|err| err.or_param(Param::Positional))
    }
}
