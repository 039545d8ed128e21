//! Route pattern compilation.
//!
//! [`compile`] turns a [`Pattern`] into a [`CompiledPattern`]: an anchored
//! [`Regex`] plus the ordered list of [`ParamSpec`]s that says which
//! parameter each capture binds to.
//!
//! # Syntax
//!
//! | Pattern           | Meaning                                                 |
//! |-------------------|---------------------------------------------------------|
//! | `/users`          | literal segment                                         |
//! | `/users/:id`      | named parameter, one segment (no `/`)                   |
//! | `/users/:id?`     | optional parameter, slash included                      |
//! | `/:name.:ext`     | parameter after a literal dot, captures no `.` or `/`   |
//! | `/post/:id(\d+)`  | parameter with a custom capture                         |
//! | `/files/*`        | zero or more of anything, positional slot               |
//! | `/files/+`        | one or more of anything, positional slot                |
//! | `/(v\d)`          | `/(` opens a non-capturing group that includes the `/`  |
//! | `["/a", "/b"]`    | alternation, compiled as `(/a\|/b)`                     |
//!
//! Other characters are regex syntax (`|`, `?`, `[...]`, `{m,n}`, `\`
//! escapes) except `/` and `.`, which always match literally. Unless strict,
//! a trailing slash is optional. Matching is case-insensitive unless
//! `case_sensitive` is set.
//!
//! Alternation members are not scanned separately: `:name` inside them is
//! compiled as part of the joined string, so a name that appears in several
//! members keeps the value of its last slot.
//!
//! # Example
//!
//! ```
//! use waypoint_router::{compile, ParamKey};
//!
//! let pattern = compile("/user/:id/:tab?", false, false).unwrap();
//! let keys: Vec<_> = pattern.keys().iter().map(|k| (k.key.clone(), k.optional)).collect();
//! assert_eq!(keys, vec![
//!     (ParamKey::Name("id".into()), false),
//!     (ParamKey::Name("tab".into()), true),
//! ]);
//! assert!(pattern.is_match("/user/5"));
//! assert!(pattern.is_match("/USER/5/posts/"));
//! ```

use crate::error::{Result, RouterError};
use crate::params::ParamSpec;
use crate::trace_log;
use regex::{Regex, RegexBuilder};
use std::fmt;

/// Default class for a parameter: anything up to the next `/`.
const SEGMENT_CLASS: &str = "[^/]+?";
/// Class for a parameter introduced by a literal `.`: stops at `/` and `.`.
const FORMAT_CLASS: &str = "[^/.]+?";

/// A route pattern before compilation.
#[derive(Debug, Clone)]
pub enum Pattern {
    /// Path syntax (see the module docs).
    Path(String),
    /// Alternatives joined into one group.
    Alternatives(Vec<String>),
    /// A ready-made matcher, used as is.
    Regex(Regex),
}

impl Pattern {
    /// The pattern text the router reports in its route context.
    pub fn source(&self) -> String {
        match self {
            Pattern::Path(path) => path.clone(),
            Pattern::Alternatives(items) => format!("({})", items.join("|")),
            Pattern::Regex(regex) => regex.as_str().to_string(),
        }
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source())
    }
}

impl From<&str> for Pattern {
    fn from(path: &str) -> Self {
        Self::Path(path.to_string())
    }
}

impl From<String> for Pattern {
    fn from(path: String) -> Self {
        Self::Path(path)
    }
}

impl From<&String> for Pattern {
    fn from(path: &String) -> Self {
        Self::Path(path.clone())
    }
}

impl From<Vec<String>> for Pattern {
    fn from(items: Vec<String>) -> Self {
        Self::Alternatives(items)
    }
}

impl From<Vec<&str>> for Pattern {
    fn from(items: Vec<&str>) -> Self {
        Self::Alternatives(items.into_iter().map(String::from).collect())
    }
}

impl<const N: usize> From<[&str; N]> for Pattern {
    fn from(items: [&str; N]) -> Self {
        Self::Alternatives(items.iter().map(|s| (*s).to_string()).collect())
    }
}

impl From<Regex> for Pattern {
    fn from(regex: Regex) -> Self {
        Self::Regex(regex)
    }
}

/// How captures of a compiled pattern map onto its slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SlotLayout {
    /// Slot `i` is the named group [`slot_group(i)`](slot_group).
    Named,
    /// Every capture group is a positional slot (pre-built matchers).
    Positional,
}

/// Name of the regex group that carries slot `index`.
pub(crate) fn slot_group(index: usize) -> String {
    format!("__wp{}", index)
}

/// A compiled route pattern.
///
/// Cheap to clone; the regex is reference-counted internally.
#[derive(Debug, Clone)]
pub struct CompiledPattern {
    source: String,
    regex: Regex,
    keys: Vec<ParamSpec>,
    pub(crate) layout: SlotLayout,
}

impl CompiledPattern {
    /// The pattern as written.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// The anchored matcher.
    pub fn regex(&self) -> &Regex {
        &self.regex
    }

    /// The parameter plan, in declaration order. Empty for pre-built
    /// matchers.
    pub fn keys(&self) -> &[ParamSpec] {
        &self.keys
    }

    /// Test a path without extracting parameters.
    pub fn is_match(&self, path: &str) -> bool {
        self.regex.is_match(path)
    }
}

/// Compile a pattern into a matcher and its parameter plan.
///
/// Fails only when the generated regex is invalid (for example an unclosed
/// group written by the caller).
pub fn compile(
    pattern: impl Into<Pattern>,
    case_sensitive: bool,
    strict: bool,
) -> Result<CompiledPattern> {
    let pattern = pattern.into();
    let source = pattern.source();

    let text = match pattern {
        Pattern::Regex(regex) => {
            return Ok(CompiledPattern {
                source,
                regex,
                keys: Vec::new(),
                layout: SlotLayout::Positional,
            });
        }
        Pattern::Path(path) => path,
        Pattern::Alternatives(items) => format!("({})", items.join("|")),
    };

    let mut text = text;
    if !strict {
        text.push_str("/?");
    }

    let (body, keys) = Translator::new(&text).run();
    let anchored = format!("^(?:{})$", body);
    trace_log!("Compiled pattern '{}' into '{}'", source, anchored);

    let regex = RegexBuilder::new(&anchored)
        .case_insensitive(!case_sensitive)
        .build()
        .map_err(|err| RouterError::invalid_pattern(source.clone(), err))?;

    Ok(CompiledPattern {
        source,
        regex,
        keys,
        layout: SlotLayout::Named,
    })
}

/// A `[/][.]:name[(capture)][?]` occurrence.
struct ParamToken {
    slash: bool,
    format: bool,
    name: String,
    capture: Option<String>,
    optional: bool,
    end: usize,
}

/// Single left-to-right pass from pattern text to regex text.
///
/// Parameters are recognised before separators are escaped, and text the
/// translator generates is never fed back through the escaping step.
struct Translator {
    chars: Vec<char>,
    out: String,
    keys: Vec<ParamSpec>,
    unnamed: usize,
}

impl Translator {
    fn new(text: &str) -> Self {
        Self {
            chars: text.chars().collect(),
            out: String::with_capacity(text.len() * 2),
            keys: Vec::new(),
            unnamed: 0,
        }
    }

    fn run(mut self) -> (String, Vec<ParamSpec>) {
        let mut i = 0;
        while i < self.chars.len() {
            if let Some(token) = self.param_at(i) {
                i = token.end;
                self.push_param(token);
                continue;
            }

            let c = self.chars[i];
            match c {
                '/' if self.peek(i + 1) == Some('(') && self.peek(i + 2) != Some('?') => {
                    self.out.push_str("(?:/");
                    i += 2;
                }
                '/' => {
                    self.out.push('/');
                    i += 1;
                }
                '.' => {
                    self.out.push_str("\\.");
                    i += 1;
                }
                '+' => {
                    self.push_positional(".+");
                    i += 1;
                }
                '*' => {
                    self.push_positional(".*");
                    i += 1;
                }
                '\\' => {
                    self.out.push('\\');
                    if let Some(next) = self.peek(i + 1) {
                        self.out.push(next);
                    }
                    i += 2;
                }
                '(' if self.peek(i + 1) == Some('?') => {
                    self.out.push_str("(?");
                    i += 2;
                    // keep `(?:x)` from reading as a parameter named `x`
                    if self.peek(i) == Some(':') {
                        self.out.push(':');
                        i += 1;
                    }
                }
                '(' => {
                    let group = slot_group(self.keys.len());
                    self.out.push_str(&format!("(?P<{}>", group));
                    self.keys.push(ParamSpec::positional(self.unnamed));
                    self.unnamed += 1;
                    i += 1;
                }
                '[' => i = self.copy_class(i),
                _ => {
                    self.out.push(c);
                    i += 1;
                }
            }
        }
        (self.out, self.keys)
    }

    fn peek(&self, i: usize) -> Option<char> {
        self.chars.get(i).copied()
    }

    fn param_at(&self, start: usize) -> Option<ParamToken> {
        let mut i = start;
        let slash = self.peek(i) == Some('/');
        if slash {
            i += 1;
        }
        let format = self.peek(i) == Some('.');
        if format {
            i += 1;
        }
        if self.peek(i) != Some(':') {
            return None;
        }
        i += 1;

        let name_start = i;
        while self.peek(i).is_some_and(is_word_char) {
            i += 1;
        }
        if i == name_start {
            return None;
        }
        let name: String = self.chars[name_start..i].iter().collect();

        let mut capture = None;
        if self.peek(i) == Some('(') {
            if let Some(close) = self.closing_paren(i) {
                capture = Some(self.chars[i + 1..close].iter().collect());
                i = close + 1;
            }
        }

        let optional = self.peek(i) == Some('?');
        if optional {
            i += 1;
        }

        Some(ParamToken {
            slash,
            format,
            name,
            capture,
            optional,
            end: i,
        })
    }

    /// Index of the `)` balancing the `(` at `open`, honouring `\` escapes
    /// and bracket classes.
    fn closing_paren(&self, open: usize) -> Option<usize> {
        let mut depth = 0usize;
        let mut in_class = false;
        let mut i = open;
        while i < self.chars.len() {
            match self.chars[i] {
                '\\' => i += 1,
                '[' => in_class = true,
                ']' => in_class = false,
                '(' if !in_class => depth += 1,
                ')' if !in_class => {
                    depth -= 1;
                    if depth == 0 {
                        return Some(i);
                    }
                }
                _ => {}
            }
            i += 1;
        }
        None
    }

    fn push_param(&mut self, token: ParamToken) {
        let slash = if token.slash { "/" } else { "" };
        let format = if token.format { "\\." } else { "" };
        let class = token.capture.as_deref().unwrap_or(if token.format {
            FORMAT_CLASS
        } else {
            SEGMENT_CLASS
        });
        let group = slot_group(self.keys.len());

        if token.optional {
            self.out.push_str(&format!(
                "(?:{}{}(?P<{}>{}))?",
                slash, format, group, class
            ));
        } else {
            self.out
                .push_str(&format!("{}(?:{}(?P<{}>{}))", slash, format, group, class));
        }
        self.keys.push(ParamSpec::named(token.name, token.optional));
    }

    fn push_positional(&mut self, class: &str) {
        let group = slot_group(self.keys.len());
        self.out.push_str(&format!("(?P<{}>{})", group, class));
        self.keys.push(ParamSpec::positional(self.unnamed));
        self.unnamed += 1;
    }

    /// Copy a `[...]` class verbatim; returns the index after it.
    fn copy_class(&mut self, open: usize) -> usize {
        let mut i = open;
        while i < self.chars.len() {
            let c = self.chars[i];
            self.out.push(c);
            if c == '\\' {
                if let Some(next) = self.peek(i + 1) {
                    self.out.push(next);
                }
                i += 2;
                continue;
            }
            i += 1;
            if c == ']' && i - 1 > open {
                break;
            }
        }
        i
    }
}

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}
