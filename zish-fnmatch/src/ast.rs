// This file is part of zish, a POSIX-compatible shell.
// Copyright (C) 2026 zish developers

//! Abstract syntax of patterns
//!
//! A pattern is parsed into an [`Ast`], a sequence of [`Atom`]s. Parsing
//! never fails on malformed bracket expressions: an unmatched `[` is taken
//! as a literal character, as POSIX requires.

use crate::Error;
use crate::PatternChar;
use std::ops::RangeInclusive;

/// Smallest component of a bracket expression
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum BracketAtom {
    /// Literal character
    Char(char),
    /// Character class (`[:digit:]`)
    CharClass(String),
}

/// Bracket expression component
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum BracketItem {
    /// Single atom
    Atom(BracketAtom),
    /// Character range (e.g. `a-z`)
    Range(RangeInclusive<char>),
}

/// Bracket expression
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Bracket {
    /// Whether the expression starts with `!` or `^`
    ///
    /// A complemented bracket expression matches the characters *not*
    /// contained in it.
    pub complement: bool,

    /// Content of the bracket expression
    pub items: Vec<BracketItem>,
}

/// Pattern component
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Atom {
    /// Literal character
    Char(char),
    /// Pattern matching any single character (`?`)
    AnyChar,
    /// Pattern matching any character sequence (`*`)
    AnyString,
    /// Bracket expression
    Bracket(Bracket),
}

impl Atom {
    /// Parses a single atom.
    ///
    /// Returns the atom and the iterator advanced past it, or `None` at the
    /// end of the pattern. If a `[` does not begin a valid bracket
    /// expression, it is returned as a literal `Char` and the iterator is
    /// advanced by one character only.
    fn parse<I>(mut i: I) -> Result<Option<(Self, I)>, Error>
    where
        I: Iterator<Item = PatternChar> + Clone,
    {
        let Some(pc) = i.next() else {
            return Ok(None);
        };
        let atom = match pc {
            PatternChar::Normal('?') => Atom::AnyChar,
            PatternChar::Normal('*') => Atom::AnyString,
            PatternChar::Normal('[') => {
                if let Some((bracket, j)) = Bracket::parse(i.clone())? {
                    return Ok(Some((Atom::Bracket(bracket), j)));
                }
                Atom::Char('[')
            }
            pc => Atom::Char(pc.char_value()),
        };
        Ok(Some((atom, i)))
    }
}

impl Bracket {
    /// Parses a bracket expression, starting after the opening `[`.
    ///
    /// Returns `None` if no closing `]` is found, in which case the caller
    /// treats the `[` as a literal character.
    fn parse<I>(mut i: I) -> Result<Option<(Self, I)>, Error>
    where
        I: Iterator<Item = PatternChar> + Clone,
    {
        let mut complement = false;
        let mut atoms = Vec::<(BracketAtom, bool)>::new();

        if let Some(PatternChar::Normal('!' | '^')) = i.clone().next() {
            complement = true;
            i.next();
        }

        loop {
            let Some(pc) = i.next() else {
                return Ok(None);
            };
            match pc {
                // A `]` is literal when it is the first atom.
                PatternChar::Normal(']') if !atoms.is_empty() => break,
                PatternChar::Normal('[') => {
                    if let Some((class, j)) = parse_char_class(i.clone())? {
                        atoms.push((BracketAtom::CharClass(class), false));
                        i = j;
                    } else {
                        atoms.push((BracketAtom::Char('['), false));
                    }
                }
                PatternChar::Normal('-') => atoms.push((BracketAtom::Char('-'), true)),
                pc => atoms.push((BracketAtom::Char(pc.char_value()), false)),
            }
        }

        Ok(Some((
            Bracket {
                complement,
                items: make_items(atoms)?,
            },
            i,
        )))
    }
}

/// Parses a `[:class:]` construct, starting after the inner `[`.
///
/// Returns `None` if the construct is not a character class, so the caller
/// falls back to a literal `[`.
fn parse_char_class<I>(mut i: I) -> Result<Option<(String, I)>, Error>
where
    I: Iterator<Item = PatternChar> + Clone,
{
    match i.next() {
        Some(PatternChar::Normal(':')) => {}
        _ => return Ok(None),
    }
    let mut name = String::new();
    loop {
        match i.next() {
            Some(PatternChar::Normal(':')) => break,
            Some(pc) if pc.char_value().is_ascii_alphabetic() => name.push(pc.char_value()),
            _ => return Ok(None),
        }
    }
    match i.next() {
        Some(PatternChar::Normal(']')) => {}
        _ => return Ok(None),
    }
    Ok(Some((name, i)))
}

/// Folds raw bracket atoms into items, recognizing ranges.
///
/// The boolean flag marks an unescaped `-` that may act as a range
/// separator. A `-` at the start or end of the expression is literal.
fn make_items(atoms: Vec<(BracketAtom, bool)>) -> Result<Vec<BracketItem>, Error> {
    let mut items = Vec::with_capacity(atoms.len());
    let mut iter = atoms.into_iter().peekable();
    while let Some((atom, _)) = iter.next() {
        let is_range_start = matches!(atom, BracketAtom::Char(_))
            && matches!(iter.peek(), Some((BracketAtom::Char('-'), true)));
        if is_range_start {
            let mut ahead = iter.clone();
            ahead.next(); // the '-'
            if let Some((BracketAtom::Char(end), _)) = ahead.peek().cloned() {
                let BracketAtom::Char(start) = atom else {
                    unreachable!()
                };
                if start > end {
                    return Err(Error::ReversedRange(start, end));
                }
                items.push(BracketItem::Range(start..=end));
                ahead.next();
                iter = ahead;
                continue;
            }
        }
        items.push(BracketItem::Atom(atom));
    }
    Ok(items)
}

/// Abstract syntax tree for a whole pattern
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Ast {
    /// Content of the pattern
    pub atoms: Vec<Atom>,
}

impl Ast {
    /// Parses a pattern.
    pub fn new<I>(pattern: I) -> Result<Self, Error>
    where
        I: IntoIterator<Item = PatternChar>,
        <I as IntoIterator>::IntoIter: Clone,
    {
        let mut atoms = Vec::new();
        let mut i = pattern.into_iter();
        while let Some((atom, j)) = Atom::parse(i)? {
            atoms.push(atom);
            i = j;
        }
        Ok(Ast { atoms })
    }

    /// Returns the literal string value if the pattern contains no
    /// wildcards.
    #[must_use]
    pub fn to_literal(&self) -> Option<String> {
        self.atoms
            .iter()
            .map(|atom| match atom {
                Atom::Char(c) => Some(*c),
                _ => None,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::without_escape;

    fn parse(pattern: &str) -> Ast {
        Ast::new(without_escape(pattern)).unwrap()
    }

    #[test]
    fn empty_pattern() {
        assert_eq!(parse("").atoms, []);
    }

    #[test]
    fn literal_characters() {
        assert_eq!(parse("ab").atoms, [Atom::Char('a'), Atom::Char('b')]);
    }

    #[test]
    fn wildcards() {
        assert_eq!(parse("?*").atoms, [Atom::AnyChar, Atom::AnyString]);
    }

    #[test]
    fn escaped_wildcards_are_literal() {
        use crate::with_escape;
        let ast = Ast::new(with_escape(r"\*\?")).unwrap();
        assert_eq!(ast.atoms, [Atom::Char('*'), Atom::Char('?')]);
    }

    #[test]
    fn simple_bracket_expression() {
        assert_eq!(
            parse("[ab]").atoms,
            [Atom::Bracket(Bracket {
                complement: false,
                items: vec![
                    BracketItem::Atom(BracketAtom::Char('a')),
                    BracketItem::Atom(BracketAtom::Char('b')),
                ],
            })]
        );
    }

    #[test]
    fn unclosed_bracket_is_literal() {
        assert_eq!(
            parse("[ab").atoms,
            [Atom::Char('['), Atom::Char('a'), Atom::Char('b')]
        );
    }

    #[test]
    fn bracket_complement() {
        assert_eq!(
            parse("[!x]").atoms,
            [Atom::Bracket(Bracket {
                complement: true,
                items: vec![BracketItem::Atom(BracketAtom::Char('x'))],
            })]
        );
        assert_eq!(
            parse("[^x]").atoms,
            [Atom::Bracket(Bracket {
                complement: true,
                items: vec![BracketItem::Atom(BracketAtom::Char('x'))],
            })]
        );
    }

    #[test]
    fn initial_close_bracket_is_literal_member() {
        assert_eq!(
            parse("[]a]").atoms,
            [Atom::Bracket(Bracket {
                complement: false,
                items: vec![
                    BracketItem::Atom(BracketAtom::Char(']')),
                    BracketItem::Atom(BracketAtom::Char('a')),
                ],
            })]
        );
    }

    #[test]
    fn character_range() {
        assert_eq!(
            parse("[a-z]").atoms,
            [Atom::Bracket(Bracket {
                complement: false,
                items: vec![BracketItem::Range('a'..='z')],
            })]
        );
    }

    #[test]
    fn dash_at_boundary_is_literal() {
        assert_eq!(
            parse("[-a]").atoms,
            [Atom::Bracket(Bracket {
                complement: false,
                items: vec![
                    BracketItem::Atom(BracketAtom::Char('-')),
                    BracketItem::Atom(BracketAtom::Char('a')),
                ],
            })]
        );
        assert_eq!(
            parse("[a-]").atoms,
            [Atom::Bracket(Bracket {
                complement: false,
                items: vec![
                    BracketItem::Atom(BracketAtom::Char('a')),
                    BracketItem::Atom(BracketAtom::Char('-')),
                ],
            })]
        );
    }

    #[test]
    fn character_class() {
        assert_eq!(
            parse("[[:upper:]]").atoms,
            [Atom::Bracket(Bracket {
                complement: false,
                items: vec![BracketItem::Atom(BracketAtom::CharClass("upper".to_string()))],
            })]
        );
    }

    #[test]
    fn negated_character_class() {
        assert_eq!(
            parse("[![:alpha:]]").atoms,
            [Atom::Bracket(Bracket {
                complement: true,
                items: vec![BracketItem::Atom(BracketAtom::CharClass("alpha".to_string()))],
            })]
        );
    }

    #[test]
    fn literal_detection() {
        assert_eq!(parse("abc").to_literal(), Some("abc".to_string()));
        assert_eq!(parse("a*c").to_literal(), None);
        assert_eq!(parse("[ab]").to_literal(), None);
    }
}
