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

//! Implementations of `Display` for the syntax types
//!
//! Formatting a syntax node yields the node in source form. The result is
//! a valid re-parsable representation, except that here-document contents
//! are omitted; only the operator and delimiter are shown.

use super::*;
use std::fmt::{Display, Formatter, Result, Write};

impl Display for SpecialParam {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        f.write_char(self.as_char())
    }
}

impl Display for Param {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        self.id.fmt(f)
    }
}

impl Display for SwitchType {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        use SwitchType::*;
        f.write_char(match self {
            Alter => '+',
            Default => '-',
            Assign => '=',
            Error => '?',
        })
    }
}

impl Display for SwitchCondition {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        match self {
            SwitchCondition::Unset => Ok(()),
            SwitchCondition::UnsetOrEmpty => f.write_char(':'),
        }
    }
}

impl Display for Switch {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        write!(f, "{}{}{}", self.condition, self.r#type, self.word)
    }
}

impl Display for TrimSide {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        match self {
            TrimSide::Prefix => f.write_char('#'),
            TrimSide::Suffix => f.write_char('%'),
        }
    }
}

impl Display for Trim {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        self.side.fmt(f)?;
        if self.length == TrimLength::Longest {
            self.side.fmt(f)?;
        }
        self.pattern.fmt(f)
    }
}

impl Display for BracedParam {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        match &self.modifier {
            Modifier::None => write!(f, "${{{}}}", self.param),
            Modifier::Length => write!(f, "${{#{}}}", self.param),
            Modifier::Switch(switch) => write!(f, "${{{}{}}}", self.param, switch),
            Modifier::Trim(trim) => write!(f, "${{{}{}}}", self.param, trim),
        }
    }
}

impl Display for BackquoteUnit {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        match self {
            BackquoteUnit::Literal(c) => f.write_char(*c),
            BackquoteUnit::Backslashed(c) => write!(f, "\\{c}"),
        }
    }
}

impl Display for TextUnit {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        match self {
            Literal(c) => f.write_char(*c),
            Backslashed(c) => write!(f, "\\{c}"),
            RawParam { param, .. } => write!(f, "${param}"),
            BracedParam(param) => param.fmt(f),
            CommandSubst { content, .. } => write!(f, "$({content})"),
            Backquote { content, .. } => {
                f.write_char('`')?;
                content.iter().try_for_each(|unit| unit.fmt(f))?;
                f.write_char('`')
            }
            Arith { content, .. } => write!(f, "$(({content}))"),
        }
    }
}

impl Display for Text {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        self.0.iter().try_for_each(|unit| unit.fmt(f))
    }
}

impl Display for WordUnit {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        match self {
            Unquoted(unit) => unit.fmt(f),
            SingleQuote(body) => write!(f, "'{body}'"),
            DoubleQuote(text) => write!(f, "\"{text}\""),
            Tilde(name) => write!(f, "~{name}"),
        }
    }
}

impl Display for Word {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        self.units.iter().try_for_each(|unit| unit.fmt(f))
    }
}

impl Display for Assign {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        write!(f, "{}={}", self.name, self.value)
    }
}

impl Display for Fd {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        self.0.fmt(f)
    }
}

impl Display for RedirOp {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        use RedirOp::*;
        f.write_str(match self {
            FileIn => "<",
            FileInOut => "<>",
            FileOut => ">",
            FileAppend => ">>",
            FileClobber => ">|",
            FdIn => "<&",
            FdOut => ">&",
            String => "<<<",
        })
    }
}

impl Display for Redir {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        if let Some(fd) = self.fd {
            fd.fmt(f)?;
        }
        match &self.body {
            RedirBody::Normal { operator, operand } => write!(f, "{operator}{operand}"),
            RedirBody::HereDoc(here_doc) => {
                let operator = if here_doc.remove_tabs { "<<-" } else { "<<" };
                write!(f, "{operator}{}", here_doc.delimiter)
            }
        }
    }
}

impl Display for SimpleCommand {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        let mut first = true;
        let mut separate = move |f: &mut Formatter<'_>| {
            if first {
                first = false;
                Ok(())
            } else {
                f.write_char(' ')
            }
        };
        for assign in &self.assigns {
            separate(f)?;
            assign.fmt(f)?;
        }
        for word in &self.words {
            separate(f)?;
            word.fmt(f)?;
        }
        for redir in self.redirs.iter() {
            separate(f)?;
            redir.fmt(f)?;
        }
        Ok(())
    }
}

/// Writes a list followed by an appropriate separator.
///
/// A synchronous tail gets `"; "` appended; an asynchronous one already
/// ends with `&`, which separates by itself.
fn write_list_body(f: &mut Formatter<'_>, list: &List) -> Result {
    list.fmt(f)?;
    if list.0.last().is_some_and(|item| item.async_flag.is_none()) {
        f.write_str(";")?;
    }
    f.write_char(' ')
}

impl Display for CaseItem {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        f.write_char('(')?;
        let mut first = true;
        for pattern in &self.patterns {
            if !first {
                f.write_str(" | ")?;
            }
            first = false;
            pattern.fmt(f)?;
        }
        f.write_str(") ")?;
        if !self.body.0.is_empty() {
            write_list_body(f, &self.body)?;
        }
        f.write_str(";;")
    }
}

impl Display for CompoundCommand {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        use CompoundCommand::*;
        match self {
            Grouping(list) => {
                f.write_str("{ ")?;
                write_list_body(f, list)?;
                f.write_str("}")
            }
            Subshell { body, .. } => {
                f.write_char('(')?;
                body.fmt(f)?;
                f.write_char(')')
            }
            For { name, values, body } => {
                write!(f, "for {name}")?;
                if let Some(values) = values {
                    f.write_str(" in")?;
                    for value in values {
                        write!(f, " {value}")?;
                    }
                    f.write_char(';')?;
                }
                f.write_str(" do ")?;
                write_list_body(f, body)?;
                f.write_str("done")
            }
            While { condition, body } => {
                f.write_str("while ")?;
                write_list_body(f, condition)?;
                f.write_str("do ")?;
                write_list_body(f, body)?;
                f.write_str("done")
            }
            Until { condition, body } => {
                f.write_str("until ")?;
                write_list_body(f, condition)?;
                f.write_str("do ")?;
                write_list_body(f, body)?;
                f.write_str("done")
            }
            If {
                condition,
                body,
                elifs,
                r#else,
            } => {
                f.write_str("if ")?;
                write_list_body(f, condition)?;
                f.write_str("then ")?;
                write_list_body(f, body)?;
                for elif in elifs {
                    f.write_str("elif ")?;
                    write_list_body(f, &elif.condition)?;
                    f.write_str("then ")?;
                    write_list_body(f, &elif.body)?;
                }
                if let Some(r#else) = r#else {
                    f.write_str("else ")?;
                    write_list_body(f, r#else)?;
                }
                f.write_str("fi")
            }
            Case { subject, items } => {
                write!(f, "case {subject} in")?;
                for item in items {
                    write!(f, " {item}")?;
                }
                f.write_str(" esac")
            }
        }
    }
}

impl Display for FullCompoundCommand {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        self.command.fmt(f)?;
        for redir in &self.redirs {
            write!(f, " {redir}")?;
        }
        Ok(())
    }
}

impl Display for FunctionDefinition {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        write!(f, "{}() {}", self.name, self.body)
    }
}

impl Display for Command {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        match self {
            Command::Simple(command) => command.fmt(f),
            Command::Compound(command) => command.fmt(f),
            Command::Function(definition) => definition.fmt(f),
        }
    }
}

impl Display for Pipeline {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        if self.negation {
            f.write_str("! ")?;
        }
        let mut first = true;
        for command in &self.commands {
            if !first {
                f.write_str(" | ")?;
            }
            first = false;
            command.fmt(f)?;
        }
        Ok(())
    }
}

impl Display for AndOr {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        match self {
            AndOr::AndThen => f.write_str("&&"),
            AndOr::OrElse => f.write_str("||"),
        }
    }
}

impl Display for AndOrList {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        self.first.fmt(f)?;
        for (condition, pipeline) in &self.rest {
            write!(f, " {condition} {pipeline}")?;
        }
        Ok(())
    }
}

impl Display for List {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        let mut first = true;
        for item in &self.0 {
            if !first {
                f.write_char(' ')?;
            }
            first = false;
            item.and_or.fmt(f)?;
            if item.async_flag.is_some() {
                f.write_char('&')?;
            } else if !std::ptr::eq(item, self.0.last().unwrap()) {
                f.write_char(';')?;
            }
        }
        Ok(())
    }
}
