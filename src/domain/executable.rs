//! Value types describing one unit of work for the execution engine.

use std::collections::BTreeMap;
use std::path::PathBuf;

/// How the child's standard streams are wired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StdioMode {
    /// Share the parent's stdin/stdout/stderr.
    #[default]
    Inherit,
    /// Capture stdout/stderr into the result.
    Pipe,
    /// Discard all output.
    Ignore,
}

/// Text encoding used to decode captured output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextEncoding {
    /// UTF-8, invalid sequences replaced.
    #[default]
    Utf8,
    /// ISO-8859-1, one byte per char.
    Latin1,
}

impl TextEncoding {
    pub fn decode(self, bytes: &[u8]) -> String {
        match self {
            TextEncoding::Utf8 => String::from_utf8_lossy(bytes).into_owned(),
            TextEncoding::Latin1 => bytes.iter().map(|&b| b as char).collect(),
        }
    }
}

/// Overrides applied when spawning a command.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SpawnOptions {
    pub stdio: StdioMode,
    pub encoding: Option<TextEncoding>,
    pub cwd: Option<PathBuf>,
    pub env: BTreeMap<String, String>,
}

impl SpawnOptions {
    pub fn piped() -> Self {
        Self { stdio: StdioMode::Pipe, ..Self::default() }
    }

    pub fn with_encoding(mut self, encoding: TextEncoding) -> Self {
        self.encoding = Some(encoding);
        self
    }

    pub fn with_cwd(mut self, cwd: impl Into<PathBuf>) -> Self {
        self.cwd = Some(cwd.into());
        self
    }

    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }
}

/// A program with an explicit argument list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
    pub options: Option<SpawnOptions>,
}

impl Invocation {
    pub fn new<I, S>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self { program: program.into(), args: args.into_iter().map(Into::into).collect(), options: None }
    }

    pub fn with_options(mut self, options: SpawnOptions) -> Self {
        self.options = Some(options);
        self
    }

    /// Single command line, `program arg1 arg2 ...`.
    pub fn command_line(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Value of one concurrent group entry. Groups cannot nest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GroupEntry {
    /// Command line passed to the runner verbatim.
    Line(String),
    /// Program and arguments, serialized as `program arg1 arg2 ...`.
    Invocation(Invocation),
}

impl GroupEntry {
    pub fn command_line(&self) -> String {
        match self {
            GroupEntry::Line(line) => line.clone(),
            GroupEntry::Invocation(invocation) => invocation.command_line(),
        }
    }

    fn is_empty(&self) -> bool {
        match self {
            GroupEntry::Line(line) => line.is_empty(),
            GroupEntry::Invocation(invocation) => invocation.program.is_empty(),
        }
    }
}

impl From<&str> for GroupEntry {
    fn from(line: &str) -> Self {
        GroupEntry::Line(line.to_string())
    }
}

impl From<String> for GroupEntry {
    fn from(line: String) -> Self {
        GroupEntry::Line(line)
    }
}

impl From<Invocation> for GroupEntry {
    fn from(invocation: Invocation) -> Self {
        GroupEntry::Invocation(invocation)
    }
}

/// Named commands meant to run at the same time through the concurrent runner.
///
/// Entries keep insertion order; that order drives names, colors and commands
/// handed to the runner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandGroup {
    entries: Vec<(String, Option<GroupEntry>)>,
    kill_others_on_fail: bool,
}

impl Default for CommandGroup {
    fn default() -> Self {
        Self { entries: Vec::new(), kill_others_on_fail: true }
    }
}

impl CommandGroup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entry. Absent entries are kept here and dropped at execution.
    pub fn entry<E: Into<GroupEntry>>(mut self, name: impl Into<String>, entry: Option<E>) -> Self {
        let name = name.into();
        let entry = entry.map(Into::into);
        match self.entries.iter_mut().find(|(existing, _)| *existing == name) {
            Some(slot) => slot.1 = entry,
            None => self.entries.push((name, entry)),
        }
        self
    }

    /// Shorthand for a present entry.
    pub fn with<E: Into<GroupEntry>>(self, name: impl Into<String>, entry: E) -> Self {
        self.entry(name, Some(entry))
    }

    pub fn kill_others_on_fail(mut self, enabled: bool) -> Self {
        self.kill_others_on_fail = enabled;
        self
    }

    pub fn kills_others_on_fail(&self) -> bool {
        self.kill_others_on_fail
    }

    /// Entries that survive pruning of absent and empty values, in order.
    pub fn present_entries(&self) -> Vec<(&str, &GroupEntry)> {
        self.entries
            .iter()
            .filter_map(|(name, entry)| match entry {
                Some(entry) if !entry.is_empty() => Some((name.as_str(), entry)),
                _ => None,
            })
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.present_entries().is_empty()
    }
}

/// One thing to run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Executable {
    /// Bare program name, inherited stdio.
    Command(String),
    /// Program with arguments and optional spawn overrides.
    CommandWithOptions(Invocation),
    /// Concurrent group.
    Group(CommandGroup),
}

impl Executable {
    pub fn command(program: impl Into<String>) -> Self {
        Executable::Command(program.into())
    }

    pub fn with_args<I, S>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Executable::CommandWithOptions(Invocation::new(program, args))
    }

    pub fn with_options<I, S>(program: impl Into<String>, args: I, options: SpawnOptions) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Executable::CommandWithOptions(Invocation::new(program, args).with_options(options))
    }

    pub fn group(group: CommandGroup) -> Self {
        Executable::Group(group)
    }
}

impl From<&str> for Executable {
    fn from(program: &str) -> Self {
        Executable::command(program)
    }
}

impl From<Invocation> for Executable {
    fn from(invocation: Invocation) -> Self {
        Executable::CommandWithOptions(invocation)
    }
}

impl From<CommandGroup> for Executable {
    fn from(group: CommandGroup) -> Self {
        Executable::Group(group)
    }
}
