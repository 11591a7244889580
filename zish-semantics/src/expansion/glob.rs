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

//! Pathname expansion
//!
//! Each field is compiled into per-component patterns and matched against
//! the directory tree. Quoted characters and hard-expansion results never
//! act as wildcards. Matching filenames are substituted in lexicographic
//! order; if nothing matches, the field is left as is (minus quoting).
//! The `noglob` option (`Glob` off) disables the whole phase.

use super::attr::{AttrChar, AttrField};
use zish_env::option::{Glob, Off};
use zish_env::semantics::Field;
use zish_env::Env;
use zish_fnmatch::{Config, Pattern, PatternChar};

/// Performs pathname expansion on a field.
pub fn glob_field(env: &mut Env, field: AttrField) -> Vec<Field> {
    if env.options.get(Glob) == Off {
        return vec![field.remove_quotes_and_strip()];
    }

    // Split into slash-separated components, keeping attributes.
    let components: Vec<Vec<AttrChar>> = field
        .chars
        .split(|c| c.value == '/' && !c.is_quoting)
        .map(<[AttrChar]>::to_vec)
        .collect();

    let any_wildcard = components
        .iter()
        .any(|component| compile(component).is_some_and(|p| p.as_literal().is_none()));
    if !any_wildcard {
        return vec![field.remove_quotes_and_strip()];
    }

    let absolute = components
        .first()
        .is_some_and(|component| component.is_empty());
    let mut candidates: Vec<String> = vec![if absolute {
        "/".to_string()
    } else {
        String::new()
    }];

    for component in &components {
        if component.is_empty() {
            continue;
        }
        let literal: String = component
            .iter()
            .filter(|c| !c.is_quoting)
            .map(|c| c.value)
            .collect();
        let pattern = match compile(component) {
            Some(pattern) => pattern,
            None => return vec![field.remove_quotes_and_strip()],
        };
        if pattern.as_literal().is_some() {
            for candidate in &mut candidates {
                push_component(candidate, &literal);
            }
            continue;
        }

        let mut next = Vec::new();
        for candidate in &candidates {
            let directory = if candidate.is_empty() { "." } else { candidate };
            let Ok(entries) = std::fs::read_dir(directory) else {
                continue;
            };
            let mut names: Vec<String> = entries
                .filter_map(|entry| entry.ok())
                .filter_map(|entry| entry.file_name().into_string().ok())
                .filter(|name| pattern.is_match(name))
                .collect();
            names.sort_unstable();
            for name in names {
                let mut path = candidate.clone();
                push_component(&mut path, &name);
                next.push(path);
            }
        }
        candidates = next;
        if candidates.is_empty() {
            break;
        }
    }

    // Literal trailing components may name nothing; require existence.
    candidates.retain(|path| std::fs::symlink_metadata(path).is_ok());
    candidates.sort_unstable();

    if candidates.is_empty() {
        vec![field.remove_quotes_and_strip()]
    } else {
        let origin = field.origin;
        candidates
            .into_iter()
            .map(|value| Field { value, origin })
            .collect()
    }
}

fn push_component(path: &mut String, component: &str) {
    if !path.is_empty() && !path.ends_with('/') {
        path.push('/');
    }
    path.push_str(component);
}

/// Compiles one pattern component, or `None` if it is malformed.
fn compile(component: &[AttrChar]) -> Option<Pattern> {
    let chars: Vec<PatternChar> = component
        .iter()
        .filter(|c| !c.is_quoting)
        .map(|c| {
            if c.is_quoted || c.origin == super::attr::Origin::HardExpansion {
                PatternChar::Literal(c.value)
            } else {
                PatternChar::Normal(c.value)
            }
        })
        .collect();
    let mut config = Config::default();
    config.anchor_begin = true;
    config.anchor_end = true;
    config.literal_period = true;
    Pattern::parse_with_config(chars, config).ok()
}

#[cfg(test)]
mod tests {
    use super::super::attr::Origin;
    use super::*;
    use std::fs::File;
    use zish_env::system::RealSystem;
    use zish_syntax::source::Location;

    fn literal_field(s: &str) -> AttrField {
        AttrField {
            chars: s.chars().map(AttrChar::literal).collect(),
            origin: Location::dummy(),
        }
    }

    fn values(fields: Vec<Field>) -> Vec<String> {
        fields.into_iter().map(|f| f.value).collect()
    }

    #[test]
    fn non_pattern_field_is_untouched() {
        let mut env = Env::new(RealSystem);
        let result = glob_field(&mut env, literal_field("plain"));
        assert_eq!(values(result), ["plain"]);
    }

    #[test]
    fn unmatched_pattern_stays_literal() {
        let mut env = Env::new(RealSystem);
        let result = glob_field(&mut env, literal_field("/nonexistent-zish-test/*.xyz"));
        assert_eq!(values(result), ["/nonexistent-zish-test/*.xyz"]);
    }

    #[test]
    fn matches_are_sorted() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["b.txt", "a.txt", "c.log"] {
            File::create(dir.path().join(name)).unwrap();
        }
        let mut env = Env::new(RealSystem);
        let pattern = format!("{}/*.txt", dir.path().display());
        let result = glob_field(&mut env, literal_field(&pattern));
        assert_eq!(
            values(result),
            [
                format!("{}/a.txt", dir.path().display()),
                format!("{}/b.txt", dir.path().display()),
            ]
        );
    }

    #[test]
    fn noglob_disables_expansion() {
        let mut env = Env::new(RealSystem);
        env.options.set(Glob, Off);
        let result = glob_field(&mut env, literal_field("*"));
        assert_eq!(values(result), ["*"]);
    }

    #[test]
    fn quoted_wildcards_do_not_match() {
        let dir = tempfile::tempdir().unwrap();
        File::create(dir.path().join("x")).unwrap();
        let mut env = Env::new(RealSystem);
        let mut chars: Vec<AttrChar> = format!("{}/", dir.path().display())
            .chars()
            .map(AttrChar::literal)
            .collect();
        chars.push(AttrChar {
            value: '*',
            origin: Origin::Literal,
            is_quoted: true,
            is_quoting: false,
        });
        let field = AttrField {
            chars,
            origin: Location::dummy(),
        };
        let result = glob_field(&mut env, field);
        assert_eq!(values(result), [format!("{}/*", dir.path().display())]);
    }

    #[test]
    fn hidden_files_require_literal_period() {
        let dir = tempfile::tempdir().unwrap();
        File::create(dir.path().join(".hidden")).unwrap();
        File::create(dir.path().join("visible")).unwrap();
        let mut env = Env::new(RealSystem);
        let pattern = format!("{}/*", dir.path().display());
        let result = glob_field(&mut env, literal_field(&pattern));
        assert_eq!(values(result), [format!("{}/visible", dir.path().display())]);
    }
}
