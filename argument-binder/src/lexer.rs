use std::ffi::{OsStr, OsString};
use std::mem::replace;
use std::str::{from_utf8, from_utf8_unchecked};

use crate::error::{os_string_into_string, Error, ErrorKind, ErrorValue, Param};
use crate::registry::Syntax;

/// An internal state indicator for the lexer.
enum State {
    Default,
    ExplicitOptionValue,
    ShortOptChain(usize),
    ArgPause,
}

/// The scan mode.
///
/// Once the bare `--` terminator was seen under dash syntax everything
/// that follows is positional.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Mode {
    Scanning,
    Terminated,
}

/// Splits a command line into parameters and values.
///
/// Like a getopt style parser this always pauses just before a value: after
/// a [`Param`] was returned the caller decides if a value is to be read
/// ([`inline_value`](Self::inline_value) for `--name=value`,
/// [`value`](Self::value) for option values that may come from the next
/// argument, [`positional`](Self::positional) for positional arguments).
/// Values that are not picked up are discarded by the next call to
/// [`next_param`](Self::next_param).
pub(crate) struct Lexer<'it> {
    args: Box<dyn Iterator<Item = OsString> + 'it>,
    current_arg: Option<OsString>,
    state: State,
    mode: Mode,
    syntax: Syntax,
}

impl<'it> Lexer<'it> {
    pub fn new<I, S>(args: I, syntax: Syntax) -> Lexer<'it>
    where
        I: IntoIterator<Item = S>,
        I::IntoIter: 'it,
        S: Into<OsString> + 'it,
    {
        let mut args = args.into_iter().map(Into::into);
        Lexer {
            current_arg: args.next(),
            args: Box::new(args),
            state: State::Default,
            mode: Mode::Scanning,
            syntax,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Parses the next parameter.
    ///
    /// Returns `Ok(None)` once the command line is exhausted.
    pub fn next_param(&mut self) -> Result<Option<Param>, Error> {
        loop {
            let arg = match self.state {
                State::Default => match self.current_arg.as_deref() {
                    Some(arg) => arg,
                    None => return Ok(None),
                },
                State::ArgPause | State::ExplicitOptionValue => {
                    self.next_arg_and_reset_state();
                    continue;
                }
                State::ShortOptChain(ref mut pos) => {
                    let arg = match self.current_arg.as_deref() {
                        Some(arg) => arg,
                        None => return Ok(None),
                    };
                    return match os_str_char_at(arg, *pos)? {
                        None => {
                            self.next_arg_and_reset_state();
                            continue;
                        }
                        Some(ch) => {
                            *pos += ch.len_utf8();
                            if *pos >= arg.len() {
                                self.next_arg_and_reset_state();
                            }
                            Ok(Some(Param::Short(ch)))
                        }
                    };
                }
            };

            if self.mode == Mode::Terminated {
                return Ok(Some(self.pause_for_arg()));
            }

            let arg_bytes = arg.as_encoded_bytes();
            if self.syntax.contains(Syntax::DASHES) {
                if arg_bytes == b"--" {
                    tracing::trace!("reached end of options");
                    self.mode = Mode::Terminated;
                    self.next_arg_and_reset_state();
                    continue;
                } else if arg_bytes.starts_with(b"--") {
                    let name = self.split_named(2)?;
                    return Ok(Some(Param::Long(name)));
                } else if arg_bytes.len() > 1 && arg_bytes[0] == b'-' {
                    self.state = State::ShortOptChain(1);
                    continue;
                }
            }
            if self.syntax.contains(Syntax::SLASHES) && looks_like_slash_option(arg_bytes) {
                let name = self.split_named(1)?;
                return Ok(Some(Param::Slash(name)));
            }
            return Ok(Some(self.pause_for_arg()));
        }
    }

    /// Returns the explicitly attached value of the current option.
    ///
    /// This is the `value` in `--name=value` and `/name=value` or the rest of
    /// a short option chain (`value` in `-xvalue`).
    pub fn inline_value(&mut self) -> Result<Option<String>, Error> {
        match self.state {
            State::Default | State::ArgPause => Ok(None),
            State::ExplicitOptionValue => self
                .next_arg_and_reset_state()
                .map(os_string_into_string)
                .transpose(),
            State::ShortOptChain(pos) => {
                let arg = match self.next_arg_and_reset_state() {
                    Some(arg) => arg,
                    None => return Ok(None),
                };
                // short options are only ever read by valid characters, so
                // the prefix is known to be good.
                let (_, rest) = os_str_split_utf8_prefix(&arg, pos)?;
                os_string_into_string(rest.to_owned()).map(Some)
            }
        }
    }

    /// Returns the value for the current option.
    ///
    /// If there is no attached value the next argument is taken as value,
    /// no matter what it looks like.
    pub fn value(&mut self) -> Result<Option<String>, Error> {
        match self.inline_value()? {
            Some(value) => Ok(Some(value)),
            None => self
                .next_arg_and_reset_state()
                .map(os_string_into_string)
                .transpose(),
        }
    }

    /// Returns the positional argument the lexer paused on.
    pub fn positional(&mut self) -> Result<Option<String>, Error> {
        match self.state {
            State::ArgPause => self
                .next_arg_and_reset_state()
                .map(os_string_into_string)
                .transpose(),
            State::Default | State::ExplicitOptionValue | State::ShortOptChain(_) => Ok(None),
        }
    }

    /// Returns `true` if the lexer reached the end.
    #[cfg(test)]
    pub fn finished(&self) -> bool {
        self.current_arg.is_none()
    }

    /// Moves ahead one argument and resets the internal state.
    fn next_arg_and_reset_state(&mut self) -> Option<OsString> {
        self.state = State::Default;
        replace(&mut self.current_arg, self.args.next())
    }

    fn pause_for_arg(&mut self) -> Param {
        self.state = State::ArgPause;
        Param::Positional
    }

    /// Splits off the name of a named option after a prefix of the given
    /// length.  If a value is attached with `=` the lexer pauses in front
    /// of it.
    fn split_named(&mut self, prefix: usize) -> Result<String, Error> {
        let Some(arg) = self.current_arg.as_deref() else {
            return Ok(String::new());
        };
        let arg_bytes = arg.as_encoded_bytes();
        if let Some(ind) = arg_bytes.iter().position(|&b| b == b'=') {
            let (name, arg_value) = os_str_split_utf8_prefix(arg, ind + 1)?;
            let name = name[prefix..name.len() - 1].to_string();
            self.current_arg = Some(arg_value.to_owned());
            self.state = State::ExplicitOptionValue;
            Ok(name)
        } else {
            let mut name = match self.next_arg_and_reset_state() {
                Some(arg) => os_string_into_string(arg)?,
                None => String::new(),
            };
            name.drain(..prefix);
            Ok(name)
        }
    }
}

/// Is this a valid option name?
///
/// Names consist of alphanumerics, underscores and dashes.
pub(crate) fn is_valid_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_alphanumeric() || c == '_' || c == '-')
}

/// Checks for `/name` or `/name=value`.
fn looks_like_slash_option(arg: &[u8]) -> bool {
    let Some(rest) = arg.strip_prefix(b"/") else {
        return false;
    };
    let name = match rest.iter().position(|&b| b == b'=') {
        Some(ind) => &rest[..ind],
        None => rest,
    };
    from_utf8(name).map_or(false, is_valid_name)
}

/// Gets a single unicode character at an offset in the OsStr.
fn os_str_char_at(s: &OsStr, idx: usize) -> Result<Option<char>, Error> {
    let prefix = match s.as_encoded_bytes().get(idx..) {
        Some(b) => b.get(..4).unwrap_or(b),
        None => return Ok(None),
    };
    let prefix = match from_utf8(prefix) {
        Ok(prefix) => prefix,
        Err(err) => match err.valid_up_to() {
            0 => {
                return Err(Error::new(ErrorKind::InvalidUnicode)
                    .with_value(ErrorValue::OsString(s.into())))
            }
            // SAFETY: up to the given byte, we know the utf-8 is valid
            n => unsafe { from_utf8_unchecked(&prefix[..n]) },
        },
    };
    Ok(prefix.chars().next())
}

/// Splits a OsStr at a point into a prefix that is utf-8, and the rest.
fn os_str_split_utf8_prefix(s: &OsStr, point: usize) -> Result<(&str, &OsStr), Error> {
    let b = s.as_encoded_bytes();
    let s1 = from_utf8(&b[..point]).map_err(|_| {
        Error::new(ErrorKind::InvalidUnicode).with_value(ErrorValue::OsString(s.into()))
    })?;
    let s2 = &b[point..];
    // SAFETY: because s1 is valid utf-8 as checked per from_utf8, we
    // can safely restore the rest of the OsStr as OsStr.
    Ok((s1, unsafe { OsStr::from_encoded_bytes_unchecked(s2) }))
}
