//! Command surface syntax: `<op, arg1, arg2, ...>`.
//!
//! Whitespace is tolerated around the brackets and commas; arguments may not
//! be empty and may not contain `<`, `>` or `,`.

use std::sync::LazyLock;

use regex::Regex;

use super::action::Op;
use super::entities::Param;

static COMMAND_SYNTAX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^<\s*[^,<>][^,<>]*(\s*,\s*[^,<>][^,<>]*)*>$").expect("command syntax pattern")
});

/// A syntactically valid command with the acting agent's name inserted as the
/// first parameter.
///
/// The operation is kept as a lowercased string rather than an
/// [`Op`](super::action::Op): an unknown operation name is a feasibility
/// failure, not a parse failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedCommand {
    pub op: String,
    /// Parameter names; `params[0]` is the acting agent.
    pub params: Vec<String>,
}

/// A command whose parameters have been resolved against the world's entity
/// maps. `params[0]` is the acting agent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedCommand {
    pub op: String,
    pub params: Vec<Param>,
}

impl ResolvedCommand {
    /// The operation, when the name is one of the known nine.
    pub fn op_kind(&self) -> Option<Op> {
        Op::from_str(&self.op)
    }

    /// The acting agent's name, when the first parameter resolved to one.
    pub fn acting_agent(&self) -> Option<&str> {
        match self.params.first() {
            Some(Param::Agent(name)) => Some(name),
            _ => None,
        }
    }
}

/// Whether a command string matches the surface syntax.
pub fn is_valid_command(text: &str) -> bool {
    COMMAND_SYNTAX.is_match(text)
}

/// Split a syntactically valid command into its elements, lowercase the
/// operation name and insert the acting agent as the first parameter.
///
/// Callers must validate with [`is_valid_command`] first.
pub fn parse_command(agent_name: &str, text: &str) -> ParsedCommand {
    let inner = text
        .trim_start_matches('<')
        .trim_end_matches('>')
        .trim();
    let mut elements = inner.split(',').map(str::trim);
    let op = elements.next().unwrap_or_default().to_lowercase();
    let mut params = vec![agent_name.to_string()];
    params.extend(elements.map(ToString::to_string));
    ParsedCommand { op, params }
}
