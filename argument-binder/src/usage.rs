//! Rendering of the usage text.
use std::fmt;
use std::path::Path;

use crate::declare::HelpCategory;
use crate::registry::{Entry, Registry, Syntax};

/// Formats the usage of a [`Registry`].
///
/// Created by [`Registry::usage`].  The text starts with the configured
/// intro (or a generic `Usage:` line naming the program), followed by one
/// entry per option with its names and the word wrapped help text, and
/// ends with the configured epilog.
///
/// ```
/// use argument_binder::{Arg, Error, Registry};
///
/// #[derive(Default)]
/// struct Opts {
///     verbose: bool,
/// }
///
/// fn main() -> Result<(), Error> {
///     let registry = Registry::builder()
///         .option(
///             Arg::flag("verbose", |o: &mut Opts| &mut o.verbose)
///                 .short('v')
///                 .help("talk more"),
///         )
///         .build()?;
///     let usage = registry.usage().program("demo").width(40).to_string();
///     assert_eq!(
///         usage,
///         "Usage: demo [OPTION] [...] parameters ...\n\n   -v, --verbose  talk more\n"
///     );
///     Ok(())
/// }
/// ```
pub struct Usage<'r, T> {
    registry: &'r Registry<T>,
    program: Option<String>,
    width: usize,
    category: HelpCategory,
    show_aliases: bool,
}

impl<'r, T> Usage<'r, T> {
    pub(crate) fn new(registry: &'r Registry<T>) -> Usage<'r, T> {
        Usage {
            registry,
            program: None,
            width: 80,
            category: HelpCategory::Basic,
            show_aliases: registry.settings.usage_show_aliases,
        }
    }

    /// Sets the program name.
    ///
    /// Defaults to the file name of the running executable.
    pub fn program(mut self, name: impl Into<String>) -> Self {
        self.program = Some(name.into());
        self
    }

    /// Sets the maximum line width.  Defaults to 80.
    pub fn width(mut self, width: usize) -> Self {
        self.width = width;
        self
    }

    /// Shows all options up to the given category.
    pub fn category(mut self, category: HelpCategory) -> Self {
        self.category = category;
        self
    }

    /// Also lists short and long aliases.
    ///
    /// Defaults to the registry's `usage_show_aliases` setting.
    pub fn show_aliases(mut self, yes: bool) -> Self {
        self.show_aliases = yes;
        self
    }

    /// Renders the names of an option, like `-n NAME, --name=NAME`.
    fn arg_text(&self, entry: &Entry<T>) -> String {
        let meta = &entry.meta;
        let takes_value = entry.handler.takes_value();
        let var = meta
            .help_var
            .clone()
            .unwrap_or_else(|| entry.handler.help_var())
            .to_uppercase();
        let dashes = self.registry.settings.usage_syntax == Syntax::DASHES;

        let short_count = if self.show_aliases { meta.shorts.len() } else { 1 };
        let long_count = if self.show_aliases { meta.aliases.len() } else { 0 };
        let mut names = Vec::new();
        for c in meta.shorts.iter().take(short_count) {
            let prefix = if dashes { "-" } else { "/" };
            if takes_value {
                names.push(format!("{}{} {}", prefix, c, var));
            } else {
                names.push(format!("{}{}", prefix, c));
            }
        }
        for name in std::iter::once(&meta.name).chain(meta.aliases.iter().take(long_count)) {
            let prefix = if dashes { "--" } else { "/" };
            if takes_value {
                names.push(format!("{}{}={}", prefix, name, var));
            } else {
                names.push(format!("{}{}", prefix, name));
            }
        }
        if entry.handler.accepts_multiple() {
            names.push("...".into());
        }
        format!("   {}", names.join(", "))
    }

    fn program_name(&self) -> String {
        if let Some(ref program) = self.program {
            return program.clone();
        }
        std::env::args_os()
            .next()
            .as_deref()
            .map(Path::new)
            .and_then(|x| x.file_name())
            .and_then(|x| x.to_str())
            .unwrap_or_default()
            .to_string()
    }
}

/// Sort key of an option in the usage: the canonical short name if there
/// is one, else the long name.
fn primary_name<T>(entry: &Entry<T>) -> String {
    match entry.meta.shorts.first() {
        Some(c) => c.to_string(),
        None => entry.meta.name.clone(),
    }
}

impl<T> fmt::Display for Usage<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let settings = &self.registry.settings;
        match settings.usage_intro {
            Some(ref intro) if !intro.is_empty() => write!(f, "{}", intro)?,
            _ => {
                let params = self
                    .registry
                    .parameters
                    .and_then(|index| self.registry.entries[index].meta.help_var.as_deref())
                    .unwrap_or("parameters");
                write!(
                    f,
                    "Usage: {} [OPTION] [...] {} ...",
                    self.program_name(),
                    params
                )?
            }
        }
        write!(f, "\n\n")?;

        let mut options = self
            .registry
            .entries
            .iter()
            .filter(|entry| !entry.positional && entry.meta.category <= self.category)
            .map(|entry| (primary_name(entry), self.arg_text(entry), &entry.meta.help))
            .collect::<Vec<_>>();
        options.sort_by(|a, b| a.0.cmp(&b.0));

        let max_line = self.width * 3 / 5;
        let max_arg = options
            .iter()
            .map(|(_, arg, _)| arg.chars().count() + 2)
            .filter(|&len| len <= max_line)
            .fold(self.width / 4, usize::max);

        for (_, arg, help) in &options {
            let mut line = arg.clone();
            let arg_len = arg.chars().count();
            if arg_len + 2 > max_arg {
                writeln!(f, "{}", line)?;
                line.clear();
            }
            let mut col = line.chars().count();
            for word in help.split_whitespace() {
                let word_len = word.chars().count();
                if col < max_arg {
                    line.extend(std::iter::repeat(' ').take(max_arg - col));
                    col = max_arg;
                } else if col > max_arg && col + 1 + word_len > self.width {
                    writeln!(f, "{}", line)?;
                    line = " ".repeat(max_arg);
                    col = max_arg;
                } else if col > max_arg {
                    line.push(' ');
                    col += 1;
                }
                line.push_str(word);
                col += word_len;
            }
            if !line.is_empty() {
                writeln!(f, "{}", line)?;
            }
        }

        if let Some(ref epilog) = settings.usage_epilog {
            write!(f, "\n{}\n", epilog)?;
        }
        Ok(())
    }
}
