//! Event DSL parser for headless mode.
//!
//! A script is a list of `kind:value` events separated by commas or
//! newlines, e.g. `type:re,wait:400ms,key:down,assert:state:selected=0`.

use super::HeadlessState;
use crate::cli::ScreenSize;
use crate::error::{Result, SearchError};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::cmp::Ordering;
use std::fmt;
use std::time::Duration;

/// Named keys. The first spelling of a code is the one printed back.
const KEY_NAMES: &[(&str, KeyCode)] = &[
    ("enter", KeyCode::Enter),
    ("return", KeyCode::Enter),
    ("esc", KeyCode::Esc),
    ("escape", KeyCode::Esc),
    ("tab", KeyCode::Tab),
    ("backspace", KeyCode::Backspace),
    ("bs", KeyCode::Backspace),
    ("delete", KeyCode::Delete),
    ("del", KeyCode::Delete),
    ("up", KeyCode::Up),
    ("down", KeyCode::Down),
    ("left", KeyCode::Left),
    ("right", KeyCode::Right),
    ("home", KeyCode::Home),
    ("end", KeyCode::End),
    ("space", KeyCode::Char(' ')),
];

const MODIFIER_NAMES: &[(&str, KeyModifiers)] = &[
    ("ctrl", KeyModifiers::CONTROL),
    ("alt", KeyModifiers::ALT),
    ("shift", KeyModifiers::SHIFT),
];

/// Operator of a state assertion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    Eq,
    Ge,
    Le,
    Gt,
    Lt,
}

impl Comparison {
    /// Longest spellings first so `>=` is not read as `>`.
    const ALL: [(&'static str, Comparison); 5] = [
        (">=", Self::Ge),
        ("<=", Self::Le),
        (">", Self::Gt),
        ("<", Self::Lt),
        ("=", Self::Eq),
    ];

    fn symbol(self) -> &'static str {
        Self::ALL
            .iter()
            .find(|(_, op)| *op == self)
            .map_or("=", |(symbol, _)| *symbol)
    }

    /// Numbers compare numerically; anything else only supports `=`.
    fn holds(self, actual: &str, expected: &str) -> bool {
        match (actual.parse::<i64>(), expected.parse::<i64>()) {
            (Ok(a), Ok(e)) => self.accepts(a.cmp(&e)),
            _ => self == Self::Eq && actual == expected,
        }
    }

    fn accepts(self, ordering: Ordering) -> bool {
        match self {
            Self::Eq => ordering.is_eq(),
            Self::Ge => ordering.is_ge(),
            Self::Le => ordering.is_le(),
            Self::Gt => ordering.is_gt(),
            Self::Lt => ordering.is_lt(),
        }
    }
}

/// A check against the rendered screen or the widget state.
#[derive(Debug, Clone, PartialEq)]
pub enum Assertion {
    /// Screen contains text, ignoring case.
    Contains(String),
    /// Screen contains text, case-sensitive.
    ContainsExact(String),
    /// Screen does not contain text, ignoring case.
    NotContains(String),
    /// Screen matches a regex.
    Matches(String),
    /// A [`HeadlessState`] field compared against a value.
    State {
        field: String,
        cmp: Comparison,
        value: String,
    },
}

impl Assertion {
    pub fn check(&self, screen: &str, state: &HeadlessState) -> bool {
        match self {
            Self::Contains(text) => screen.to_lowercase().contains(&text.to_lowercase()),
            Self::ContainsExact(text) => screen.contains(text.as_str()),
            Self::NotContains(text) => !screen.to_lowercase().contains(&text.to_lowercase()),
            Self::Matches(pattern) => {
                regex::Regex::new(pattern).is_ok_and(|re| re.is_match(screen))
            }
            Self::State { field, cmp, value } => state
                .field(field)
                .is_some_and(|actual| cmp.holds(&actual, value)),
        }
    }
}

impl fmt::Display for Assertion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Contains(t) => write!(f, "contains:{t}"),
            Self::ContainsExact(t) => write!(f, "contains-exact:{t}"),
            Self::NotContains(t) => write!(f, "not-contains:{t}"),
            Self::Matches(p) => write!(f, "matches:{p}"),
            Self::State { field, cmp, value } => {
                write!(f, "state:{field}{}{value}", cmp.symbol())
            }
        }
    }
}

/// One step of a headless script.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Key(KeyEvent),
    /// Text typed one keystroke per character.
    Type(String),
    /// Left click at (column, row).
    Click(u16, u16),
    /// Let time pass while applying controller events.
    Wait(Duration),
    Resize(u16, u16),
    /// Named marker; only logged.
    Snapshot(String),
    Assert(Assertion),
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Key(key) => {
                f.write_str("key:")?;
                for (name, modifier) in MODIFIER_NAMES {
                    if key.modifiers.contains(*modifier) {
                        write!(f, "{name}+")?;
                    }
                }
                match key.code {
                    KeyCode::Char(c) if c != ' ' => write!(f, "{c}"),
                    code => {
                        let name = KEY_NAMES
                            .iter()
                            .find(|(_, known)| *known == code)
                            .map_or("unknown", |(name, _)| *name);
                        f.write_str(name)
                    }
                }
            }
            Self::Type(text) => write!(f, "type:{text}"),
            Self::Click(column, row) => write!(f, "click:{column}:{row}"),
            Self::Wait(d) => write!(f, "wait:{}ms", d.as_millis()),
            Self::Resize(w, h) => write!(f, "resize:{w}x{h}"),
            Self::Snapshot(name) => write!(f, "snapshot:{name}"),
            Self::Assert(assertion) => write!(f, "assert:{assertion}"),
        }
    }
}

/// Expands typed text into plain key presses.
pub fn keystrokes(text: &str) -> impl Iterator<Item = KeyEvent> + '_ {
    text.chars()
        .map(|c| KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE))
}

/// Parser for the event DSL.
#[derive(Debug, Default)]
pub struct EventParser;

impl EventParser {
    pub fn new() -> Self {
        Self
    }

    /// Parses a whole script. Lines starting with `#` are comments.
    pub fn parse_all(&self, input: &str) -> Result<Vec<Event>> {
        input
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .flat_map(|line| line.split(','))
            .filter(|part| !part.trim().is_empty())
            .map(|part| self.parse_one(part))
            .collect()
    }

    /// Parses a single `kind:value` event.
    pub fn parse_one(&self, input: &str) -> Result<Event> {
        let input = input.trim();
        let (kind, value) = input.split_once(':').ok_or_else(|| {
            SearchError::config(format!("Invalid event '{input}'. Expected kind:value"))
        })?;

        match kind.trim().to_lowercase().as_str() {
            "key" => parse_key(value.trim()),
            // Leading spaces are part of typed text.
            "type" => Ok(Event::Type(value.to_string())),
            "click" => parse_click(value.trim()),
            "wait" => parse_wait(value.trim()).map(Event::Wait),
            "resize" => {
                let size: ScreenSize = value.trim().parse().map_err(SearchError::config)?;
                Ok(Event::Resize(size.width, size.height))
            }
            "snapshot" => Ok(Event::Snapshot(value.trim().to_string())),
            "assert" => parse_assert(value.trim()).map(Event::Assert),
            other => Err(SearchError::config(format!(
                "Unknown event type '{other}'. Valid types: key, type, click, wait, resize, snapshot, assert"
            ))),
        }
    }
}

/// `enter`, `ctrl+n`, `shift+tab`, or any single character.
fn parse_key(value: &str) -> Result<Event> {
    let (key, modifier_names) = match value.rsplit_once('+') {
        // A bare "+" is the plus key.
        Some((mods, key)) if !key.is_empty() => (key, Some(mods)),
        _ => (value, None),
    };

    let mut modifiers = KeyModifiers::NONE;
    for name in modifier_names.into_iter().flat_map(|m| m.split('+')) {
        let name = match name.to_lowercase().as_str() {
            "control" => "ctrl".to_string(),
            other => other.to_string(),
        };
        let (_, modifier) = MODIFIER_NAMES
            .iter()
            .find(|(known, _)| *known == name)
            .ok_or_else(|| {
                SearchError::config(format!("Unknown modifier '{name}'. Valid: ctrl, alt, shift"))
            })?;
        modifiers |= *modifier;
    }

    let lowered = key.to_lowercase();
    let code = match KEY_NAMES.iter().find(|(name, _)| *name == lowered) {
        Some((_, code)) => *code,
        None => {
            let mut chars = key.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => KeyCode::Char(c),
                _ => {
                    return Err(SearchError::config(format!(
                        "Unknown key '{key}'. Use a single character or a name like enter, esc, up, down"
                    )))
                }
            }
        }
    };

    Ok(Event::Key(KeyEvent::new(code, modifiers)))
}

/// `COLUMN:ROW`, zero-based screen cells.
fn parse_click(value: &str) -> Result<Event> {
    let invalid = || SearchError::config(format!("Invalid click '{value}'. Expected COLUMN:ROW"));
    let (column, row) = value.split_once(':').ok_or_else(invalid)?;
    let column = column.trim().parse().map_err(|_| invalid())?;
    let row = row.trim().parse().map_err(|_| invalid())?;
    Ok(Event::Click(column, row))
}

/// `400ms`, `2s`, or a bare number of milliseconds.
fn parse_wait(value: &str) -> Result<Duration> {
    let value = value.to_lowercase();
    let invalid = || SearchError::config(format!("Invalid duration '{value}'"));

    let (number, scale): (&str, u64) = if let Some(ms) = value.strip_suffix("ms") {
        (ms, 1)
    } else if let Some(secs) = value.strip_suffix('s') {
        (secs, 1000)
    } else {
        (value.as_str(), 1)
    };
    let millis: u64 = number.trim().parse().map_err(|_| invalid())?;
    Ok(Duration::from_millis(millis.saturating_mul(scale)))
}

/// `contains:react`, `not-contains:No results`, `state:selected=0`, ...
fn parse_assert(value: &str) -> Result<Assertion> {
    let (kind, rest) = value.split_once(':').ok_or_else(|| {
        SearchError::config(format!(
            "Invalid assertion '{value}'. Expected assert:kind:value"
        ))
    })?;
    let rest = rest.trim().to_string();

    match kind.trim().to_lowercase().as_str() {
        "contains" => Ok(Assertion::Contains(rest)),
        "contains-exact" => Ok(Assertion::ContainsExact(rest)),
        "not-contains" => Ok(Assertion::NotContains(rest)),
        "matches" => Ok(Assertion::Matches(rest)),
        "state" => parse_state_assertion(&rest),
        other => Err(SearchError::config(format!(
            "Unknown assertion type '{other}'. Valid types: contains, contains-exact, not-contains, matches, state"
        ))),
    }
}

/// `field<op>value` where op is one of `= >= <= > <`.
fn parse_state_assertion(value: &str) -> Result<Assertion> {
    let invalid = || {
        SearchError::config(format!(
            "Invalid state assertion '{value}'. Expected field=value or field>=value"
        ))
    };

    let at = value.find(['<', '>', '=']).ok_or_else(invalid)?;
    let (field, tail) = value.split_at(at);
    let (symbol, cmp) = Comparison::ALL
        .into_iter()
        .find(|(symbol, _)| tail.starts_with(*symbol))
        .ok_or_else(invalid)?;

    let field = field.trim();
    if field.is_empty() {
        return Err(invalid());
    }

    Ok(Assertion::State {
        field: field.to_string(),
        cmp,
        value: tail[symbol.len()..].trim().to_string(),
    })
}
