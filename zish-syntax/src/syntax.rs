// This file is part of zish, a POSIX-compatible shell.
// Copyright (C) 2026 zish developers
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! Shell language abstract syntax
//!
//! This module defines the types that make up the syntax tree: words and
//! their units, parameter expansions, redirections, and the command
//! hierarchy from simple commands up to lists. All types are immutable
//! after parsing except here-document contents, which are filled in when
//! the lexer reaches the line after the redirection operator.
//!
//! Every type implements `Display`, producing source form. The result is
//! used where the shell shows a command to the user, notably in job
//! reports.

use crate::source::Location;
use std::cell::OnceCell;
use std::rc::Rc;

mod impl_display;

/// Special parameter
///
/// Each special parameter is a single character with a shell-defined
/// meaning.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum SpecialParam {
    /// `@` (all positional parameters)
    At,
    /// `*` (all positional parameters)
    Asterisk,
    /// `#` (number of positional parameters)
    Number,
    /// `?` (exit status of the last command)
    Question,
    /// `-` (active shell options)
    Hyphen,
    /// `$` (process ID of the shell)
    Dollar,
    /// `!` (process ID of the last asynchronous command)
    Exclamation,
    /// `0` (name of the shell or shell script)
    Zero,
}

impl SpecialParam {
    /// Returns the character that spells the special parameter.
    #[must_use]
    pub const fn as_char(self) -> char {
        use SpecialParam::*;
        match self {
            At => '@',
            Asterisk => '*',
            Number => '#',
            Question => '?',
            Hyphen => '-',
            Dollar => '$',
            Exclamation => '!',
            Zero => '0',
        }
    }

    /// Converts a character to the special parameter it spells.
    #[must_use]
    pub const fn from_char(c: char) -> Option<SpecialParam> {
        use SpecialParam::*;
        match c {
            '@' => Some(At),
            '*' => Some(Asterisk),
            '#' => Some(Number),
            '?' => Some(Question),
            '-' => Some(Hyphen),
            '$' => Some(Dollar),
            '!' => Some(Exclamation),
            '0' => Some(Zero),
            _ => None,
        }
    }
}

/// Type of a parameter
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ParamType {
    /// Named parameter (a variable)
    Variable,
    /// Special parameter
    Special(SpecialParam),
    /// Positional parameter, indexed from 1
    Positional(usize),
}

/// Parameter appearing in a parameter expansion
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Param {
    /// Raw string form of the parameter (`foo`, `@`, `0`, `12`, …)
    pub id: String,

    /// Type of the parameter, precomputed from `id` by the parser
    pub r#type: ParamType,
}

impl Param {
    /// Creates a named parameter.
    pub fn variable<S: Into<String>>(id: S) -> Param {
        Param {
            id: id.into(),
            r#type: ParamType::Variable,
        }
    }

    /// Classifies a raw parameter string.
    ///
    /// A string of digits is a positional parameter (except the single
    /// digit `0`, which is special), a single special character is a
    /// special parameter, and anything else is a variable name.
    #[must_use]
    pub fn from_id(id: String) -> Param {
        let r#type = if id == "0" {
            ParamType::Special(SpecialParam::Zero)
        } else if id.chars().all(|c| c.is_ascii_digit()) && !id.is_empty() {
            ParamType::Positional(id.parse().unwrap_or(usize::MAX))
        } else if let [c] = id.chars().collect::<Vec<char>>()[..] {
            match SpecialParam::from_char(c) {
                Some(special) => ParamType::Special(special),
                None => ParamType::Variable,
            }
        } else {
            ParamType::Variable
        };
        Param { id, r#type }
    }
}

/// Flag that specifies how the value is substituted in a [switch](Switch)
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SwitchType {
    /// Alter an existing value, if any (`+`)
    Alter,
    /// Substitute a missing value with a default (`-`)
    Default,
    /// Assign a default to the variable if the value is missing (`=`)
    Assign,
    /// Error out if the value is missing (`?`)
    Error,
}

/// Condition that triggers a [switch](Switch)
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SwitchCondition {
    /// Without a colon: the switch applies if the parameter is unset.
    Unset,
    /// With a colon: the switch applies if the parameter is unset or
    /// empty.
    UnsetOrEmpty,
}

/// Parameter expansion modifier that conditionally substitutes the value
///
/// Examples: `+foo`, `:-bar`, `:=baz`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Switch {
    /// How the value is substituted
    pub r#type: SwitchType,
    /// When the substitution applies
    pub condition: SwitchCondition,
    /// Word that substitutes the parameter value
    pub word: Word,
}

/// Which side of the value a [trim](Trim) removes
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TrimSide {
    /// Beginning of the value (`#`)
    Prefix,
    /// End of the value (`%`)
    Suffix,
}

/// Pattern matching strategy in a [trim](Trim)
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TrimLength {
    /// Remove the shortest match.
    Shortest,
    /// Remove the longest match.
    Longest,
}

/// Parameter expansion modifier that removes a prefix or suffix
///
/// Examples: `#foo`, `##bar*`, `%%baz*`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Trim {
    /// Which side of the value is removed
    pub side: TrimSide,
    /// How much of the value is removed
    pub length: TrimLength,
    /// Pattern matched against the expanded value
    pub pattern: Word,
}

/// Attribute that modifies a parameter expansion
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Modifier {
    /// No modifier
    None,
    /// `#` prefix (`${#foo}`)
    Length,
    /// `+`, `-`, `=` or `?` suffix, optionally preceded by `:`
    Switch(Switch),
    /// `#`, `##`, `%` or `%%` suffix
    Trim(Trim),
}

/// Parameter expansion enclosed in braces
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BracedParam {
    /// Parameter to be expanded
    pub param: Param,
    /// Modifier
    pub modifier: Modifier,
    /// Position of this parameter expansion in the source code
    pub location: Location,
}

/// Element of [`TextUnit::Backquote`]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BackquoteUnit {
    /// Literal single character
    Literal(char),
    /// Backslash-escaped single character
    Backslashed(char),
}

/// Element of a [`Text`], i.e., something that can be expanded
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum TextUnit {
    /// Literal single character
    Literal(char),
    /// Backslash-escaped single character
    Backslashed(char),
    /// Parameter expansion that is not enclosed in braces
    RawParam {
        /// Parameter to be expanded
        param: Param,
        /// Position of this parameter expansion in the source code
        location: Location,
    },
    /// Parameter expansion that is enclosed in braces
    BracedParam(BracedParam),
    /// Command substitution of the form `$(…)`
    CommandSubst {
        /// Command string parsed and executed when the substitution is
        /// expanded
        ///
        /// Reference-counted so that the string is shared with the
        /// subshell that executes it.
        content: Rc<str>,
        /// Position of this command substitution in the source code
        location: Location,
    },
    /// Command substitution of the form `` `…` ``
    Backquote {
        /// Command string parsed and executed when the substitution is
        /// expanded
        content: Vec<BackquoteUnit>,
        /// Position of this command substitution in the source code
        location: Location,
    },
    /// Arithmetic expansion
    Arith {
        /// Expression to be evaluated
        content: Text,
        /// Position of this arithmetic expansion in the source code
        location: Location,
    },
}

pub use TextUnit::*;

/// String that may contain some expansions
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Text(pub Vec<TextUnit>);

impl Text {
    /// Creates a text of literal characters.
    pub fn from_literal_chars<I: IntoIterator<Item = char>>(chars: I) -> Text {
        Text(chars.into_iter().map(Literal).collect())
    }
}

/// Element of a [`Word`], i.e., text with quotes and tilde expansion
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum WordUnit {
    /// Unquoted [`TextUnit`] as a word unit
    Unquoted(TextUnit),
    /// String surrounded with a pair of single quotations
    SingleQuote(String),
    /// Text surrounded with a pair of double quotations
    DoubleQuote(Text),
    /// Tilde expansion
    ///
    /// The value does not contain the initial tilde.
    Tilde(String),
}

pub use WordUnit::*;

/// Token that may involve expansions and quotes
///
/// A word is a sequence of [word unit](WordUnit)s.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Word {
    /// Word units that constitute the word
    pub units: Vec<WordUnit>,
    /// Position of the word in the source code
    pub location: Location,
}

impl Word {
    /// Creates an empty word.
    #[must_use]
    pub fn empty(location: Location) -> Word {
        Word {
            units: Vec::new(),
            location,
        }
    }

    /// Returns the word value if it consists solely of unquoted literal
    /// characters.
    #[must_use]
    pub fn to_string_if_literal(&self) -> Option<String> {
        self.units
            .iter()
            .map(|unit| match unit {
                Unquoted(Literal(c)) => Some(*c),
                _ => None,
            })
            .collect()
    }

    /// Returns the word value with quotes removed, and whether any part of
    /// the word was quoted.
    ///
    /// Expansions are rendered in their source form; this function is
    /// meant for contexts like here-document delimiters where expansions
    /// do not occur.
    #[must_use]
    pub fn unquote(&self) -> (String, bool) {
        let mut value = String::new();
        let mut is_quoted = false;
        for unit in &self.units {
            match unit {
                Unquoted(Literal(c)) => value.push(*c),
                Unquoted(Backslashed(c)) => {
                    value.push(*c);
                    is_quoted = true;
                }
                Unquoted(other) => value.push_str(&other.to_string()),
                SingleQuote(body) => {
                    value.push_str(body);
                    is_quoted = true;
                }
                DoubleQuote(text) => {
                    for text_unit in &text.0 {
                        match text_unit {
                            Literal(c) | Backslashed(c) => value.push(*c),
                            other => value.push_str(&other.to_string()),
                        }
                    }
                    is_quoted = true;
                }
                Tilde(name) => {
                    value.push('~');
                    value.push_str(name);
                }
            }
        }
        (value, is_quoted)
    }

    /// Converts a leading `~name` prefix into a [`Tilde`](WordUnit::Tilde)
    /// unit.
    ///
    /// The prefix ends at the first unquoted `/` or the end of the word.
    /// Any quoted character or expansion in the prefix cancels the tilde.
    pub fn parse_tilde_front(&mut self) {
        self.units = parse_tilde(std::mem::take(&mut self.units), false);
    }

    /// Like [`parse_tilde_front`](Self::parse_tilde_front), but also
    /// recognizes tildes following unquoted colons, as in assignment
    /// values such as `PATH=~/bin:~you/bin`.
    pub fn parse_tilde_everywhere(&mut self) {
        self.units = parse_tilde(std::mem::take(&mut self.units), true);
    }
}

fn parse_tilde(units: Vec<WordUnit>, everywhere: bool) -> Vec<WordUnit> {
    let mut result = Vec::with_capacity(units.len());
    let mut candidate = true;
    let mut i = 0;
    while i < units.len() {
        if candidate && units[i] == Unquoted(Literal('~')) {
            let mut name = String::new();
            let mut j = i + 1;
            let mut literal = true;
            while j < units.len() {
                match &units[j] {
                    Unquoted(Literal(c)) if *c == '/' || (everywhere && *c == ':') => break,
                    Unquoted(Literal(c)) => {
                        name.push(*c);
                        j += 1;
                    }
                    _ => {
                        literal = false;
                        break;
                    }
                }
            }
            if literal {
                result.push(Tilde(name));
                candidate = false;
                i = j;
                continue;
            }
        }
        candidate = everywhere && units[i] == Unquoted(Literal(':'));
        result.push(units[i].clone());
        i += 1;
    }
    result
}

/// Assignment word
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Assign {
    /// Name of the variable to assign to
    pub name: String,
    /// Value assigned to the variable
    pub value: Word,
    /// Location of the whole assignment word
    pub location: Location,
}

/// Tests whether a string is a valid variable name.
#[must_use]
pub fn is_name(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Converts a word to an assignment if it has the form `name=value`.
///
/// The name must be a non-empty sequence of unquoted literal characters
/// forming a valid identifier. On failure the original word is returned.
impl TryFrom<Word> for Assign {
    type Error = Word;

    fn try_from(word: Word) -> Result<Assign, Word> {
        let mut name = String::new();
        for (index, unit) in word.units.iter().enumerate() {
            match unit {
                Unquoted(Literal('=')) => {
                    if !is_name(&name) {
                        break;
                    }
                    let mut value = Word {
                        units: word.units[index + 1..].to_vec(),
                        location: word.location,
                    };
                    value.parse_tilde_everywhere();
                    return Ok(Assign {
                        name,
                        value,
                        location: word.location,
                    });
                }
                Unquoted(Literal(c)) => name.push(*c),
                _ => break,
            }
        }
        Err(word)
    }
}

/// File descriptor number
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Fd(pub i32);

impl Fd {
    /// File descriptor for the standard input
    pub const STDIN: Fd = Fd(0);
    /// File descriptor for the standard output
    pub const STDOUT: Fd = Fd(1);
    /// File descriptor for the standard error
    pub const STDERR: Fd = Fd(2);
}

impl From<i32> for Fd {
    fn from(raw: i32) -> Fd {
        Fd(raw)
    }
}

/// Redirection operators other than here-documents
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RedirOp {
    /// `<` (open a file for input)
    FileIn,
    /// `<>` (open a file for input and output)
    FileInOut,
    /// `>` (open a file for output; truncate or fail if existing)
    FileOut,
    /// `>>` (open a file for output; append if existing)
    FileAppend,
    /// `>|` (open a file for output; always truncate if existing)
    FileClobber,
    /// `<&` (copy or close a file descriptor for input)
    FdIn,
    /// `>&` (copy or close a file descriptor for output)
    FdOut,
    /// `<<<` (here-string)
    String,
}

/// Here-document
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct HereDoc {
    /// Token that marks the end of the content
    pub delimiter: Word,

    /// Whether leading tab characters are removed from each content line
    /// and the delimiter line (`<<-`)
    pub remove_tabs: bool,

    /// Content of the here-document
    ///
    /// The operator and the content are parsed at different times, so the
    /// content is filled into this cell when the lexer reaches the line
    /// that follows the redirection. A quoted delimiter makes the content
    /// all literal. When accessing a parsed here-document, the cell can be
    /// unwrapped safely.
    pub content: OnceCell<Text>,
}

/// Part of a redirection that defines the nature of the resulting file
/// descriptor
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum RedirBody {
    /// Normal redirection
    Normal {
        /// Operator
        operator: RedirOp,
        /// Operand word
        operand: Word,
    },
    /// Here-document
    HereDoc(Rc<HereDoc>),
}

impl RedirBody {
    /// Returns the operand word of the redirection.
    #[must_use]
    pub fn operand(&self) -> &Word {
        match self {
            RedirBody::Normal { operand, .. } => operand,
            RedirBody::HereDoc(here_doc) => &here_doc.delimiter,
        }
    }
}

/// Redirection
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Redir {
    /// File descriptor modified by this redirection
    pub fd: Option<Fd>,
    /// Nature of the resulting file descriptor
    pub body: RedirBody,
}

impl Redir {
    /// Computes the file descriptor modified by this redirection.
    ///
    /// Without an explicit `fd`, input operators default to standard input
    /// and output operators to standard output.
    #[must_use]
    pub fn fd_or_default(&self) -> Fd {
        use RedirOp::*;
        self.fd.unwrap_or(match &self.body {
            RedirBody::Normal { operator, .. } => match operator {
                FileIn | FileInOut | FdIn | String => Fd::STDIN,
                FileOut | FileAppend | FileClobber | FdOut => Fd::STDOUT,
            },
            RedirBody::HereDoc(_) => Fd::STDIN,
        })
    }
}

/// Command that involves assignments, redirections, and word expansions
///
/// A valid simple command contains at least one assignment, redirection,
/// or word; the parser does not produce empty simple commands.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct SimpleCommand {
    /// Assignments
    pub assigns: Vec<Assign>,
    /// Command name and arguments
    pub words: Vec<Word>,
    /// Redirections
    pub redirs: Rc<Vec<Redir>>,
}

impl SimpleCommand {
    /// Returns true if the command has no content at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.assigns.is_empty() && self.words.is_empty() && self.redirs.is_empty()
    }
}

/// `elif … then …` clause of an `if` command
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ElifThen {
    /// Condition commands
    pub condition: List,
    /// Commands run when the condition succeeds
    pub body: List,
}

/// Branch of a `case` compound command
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CaseItem {
    /// Patterns matched against the subject word
    ///
    /// A syntactically valid case item has at least one pattern.
    pub patterns: Vec<Word>,
    /// Commands executed when a pattern matches
    pub body: List,
}

/// Command that contains other commands
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum CompoundCommand {
    /// Brace group, executed in the current shell environment
    Grouping(List),
    /// Commands executed in a subshell
    Subshell {
        /// Commands to execute
        body: Rc<List>,
        /// Position of the opening parenthesis
        location: Location,
    },
    /// For loop
    For {
        /// Name of the iteration variable
        name: Word,
        /// Words iterated over; positional parameters if absent
        values: Option<Vec<Word>>,
        /// Loop body
        body: List,
    },
    /// While loop
    While {
        /// Loop condition
        condition: List,
        /// Loop body
        body: List,
    },
    /// Until loop
    Until {
        /// Loop condition
        condition: List,
        /// Loop body
        body: List,
    },
    /// If conditional construct
    If {
        /// Main condition
        condition: List,
        /// Commands run when the condition succeeds
        body: List,
        /// `elif` clauses
        elifs: Vec<ElifThen>,
        /// `else` clause
        r#else: Option<List>,
    },
    /// Case conditional construct
    Case {
        /// Word matched against the patterns
        subject: Word,
        /// Branches
        items: Vec<CaseItem>,
    },
}

/// Compound command with redirections
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FullCompoundCommand {
    /// The main part
    pub command: CompoundCommand,
    /// Redirections
    pub redirs: Vec<Redir>,
}

/// Function definition command
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FunctionDefinition {
    /// Function name
    pub name: String,
    /// Function body
    ///
    /// Reference-counted because the body outlives the definition command:
    /// it is stored in the function table when the definition is executed.
    pub body: Rc<FullCompoundCommand>,
    /// Position of the function name
    pub location: Location,
}

/// Element of a pipe sequence
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Command {
    /// Simple command
    Simple(SimpleCommand),
    /// Compound command
    Compound(FullCompoundCommand),
    /// Function definition command
    Function(FunctionDefinition),
}

/// Commands separated by `|`
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Pipeline {
    /// Elements of the pipeline
    ///
    /// A valid pipeline has at least one command. The commands are
    /// reference-counted so subshells can execute them without cloning.
    pub commands: Vec<Rc<Command>>,
    /// Whether the pipeline begins with a `!`
    pub negation: bool,
}

/// Connective between pipelines in an [and-or list](AndOrList)
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum AndOr {
    /// `&&`
    AndThen,
    /// `||`
    OrElse,
}

/// Pipelines separated by `&&` and `||`
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AndOrList {
    /// First pipeline
    pub first: Pipeline,
    /// Remaining pipelines, each with the connective preceding it
    pub rest: Vec<(AndOr, Pipeline)>,
}

/// Element of a [`List`]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Item {
    /// Main part of this item
    ///
    /// Reference-counted so an asynchronous item can be executed without
    /// cloning.
    pub and_or: Rc<AndOrList>,
    /// Location of the `&` operator, if this item is asynchronous
    pub async_flag: Option<Location>,
}

/// Sequence of [and-or lists](AndOrList) separated by `;` or `&`
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct List(pub Vec<Item>);

#[cfg(test)]
mod tests {
    use super::*;

    fn literal_word(s: &str) -> Word {
        Word {
            units: s.chars().map(|c| Unquoted(Literal(c))).collect(),
            location: Location::dummy(),
        }
    }

    #[test]
    fn param_classification() {
        assert_eq!(Param::from_id("foo".to_string()).r#type, ParamType::Variable);
        assert_eq!(
            Param::from_id("0".to_string()).r#type,
            ParamType::Special(SpecialParam::Zero)
        );
        assert_eq!(
            Param::from_id("12".to_string()).r#type,
            ParamType::Positional(12)
        );
        assert_eq!(
            Param::from_id("@".to_string()).r#type,
            ParamType::Special(SpecialParam::At)
        );
    }

    #[test]
    fn word_to_string_if_literal() {
        assert_eq!(literal_word("abc").to_string_if_literal().as_deref(), Some("abc"));

        let mut quoted = literal_word("abc");
        quoted.units.push(SingleQuote("x".to_string()));
        assert_eq!(quoted.to_string_if_literal(), None);
    }

    #[test]
    fn tilde_at_word_start() {
        let mut word = literal_word("~foo/bar");
        word.parse_tilde_front();
        assert_eq!(word.units[0], Tilde("foo".to_string()));
        assert_eq!(word.units[1], Unquoted(Literal('/')));
    }

    #[test]
    fn tilde_without_name() {
        let mut word = literal_word("~/x");
        word.parse_tilde_front();
        assert_eq!(word.units[0], Tilde(String::new()));
    }

    #[test]
    fn no_tilde_in_word_middle() {
        let mut word = literal_word("a~b");
        word.parse_tilde_front();
        assert_eq!(word.to_string_if_literal().as_deref(), Some("a~b"));
    }

    #[test]
    fn quoted_tilde_is_not_expanded() {
        let mut word = Word {
            units: vec![Unquoted(Backslashed('~')), Unquoted(Literal('x'))],
            location: Location::dummy(),
        };
        word.parse_tilde_front();
        assert_eq!(word.units[0], Unquoted(Backslashed('~')));
    }

    #[test]
    fn tilde_after_colon_in_assignment_value() {
        let mut word = literal_word("~a:~b");
        word.parse_tilde_everywhere();
        assert_eq!(
            word.units,
            [
                Tilde("a".to_string()),
                Unquoted(Literal(':')),
                Tilde("b".to_string()),
            ]
        );
    }

    #[test]
    fn assignment_from_word() {
        let assign = Assign::try_from(literal_word("x=5")).unwrap();
        assert_eq!(assign.name, "x");
        assert_eq!(assign.value.to_string_if_literal().as_deref(), Some("5"));
    }

    #[test]
    fn assignment_requires_valid_name() {
        assert!(Assign::try_from(literal_word("=x")).is_err());
        assert!(Assign::try_from(literal_word("1a=x")).is_err());
        assert!(Assign::try_from(literal_word("no_equal_sign")).is_err());
    }

    #[test]
    fn redir_default_fd() {
        let input = Redir {
            fd: None,
            body: RedirBody::Normal {
                operator: RedirOp::FileIn,
                operand: literal_word("file"),
            },
        };
        assert_eq!(input.fd_or_default(), Fd::STDIN);

        let append = Redir {
            fd: None,
            body: RedirBody::Normal {
                operator: RedirOp::FileAppend,
                operand: literal_word("file"),
            },
        };
        assert_eq!(append.fd_or_default(), Fd::STDOUT);
    }

    #[test]
    fn is_name_classification() {
        assert!(is_name("foo"));
        assert!(is_name("_foo9"));
        assert!(!is_name(""));
        assert!(!is_name("9foo"));
        assert!(!is_name("foo-bar"));
    }
}
