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

//! End-to-end tests driving the `zish` binary with `-c` scripts

#![cfg(unix)]

use std::process::{Command, Output};

fn run(script: &str) -> Output {
    Command::new(env!("CARGO_BIN_EXE_zish"))
        .arg("-c")
        .arg(script)
        .output()
        .expect("the shell must start")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn arithmetic_assignment() {
    let output = run("x=5; echo $((x += 3)); echo $x");
    assert_eq!(stdout(&output), "8\n8\n");
    assert_eq!(output.status.code(), Some(0));
}

#[test]
fn and_or_list() {
    let output = run("false && echo a || echo b");
    assert_eq!(stdout(&output), "b\n");
    assert_eq!(output.status.code(), Some(0));
}

#[test]
fn for_loop() {
    let output = run("for f in a b c; do echo \"<$f>\"; done");
    assert_eq!(stdout(&output), "<a>\n<b>\n<c>\n");
    assert_eq!(output.status.code(), Some(0));
}

#[test]
fn exit_trap() {
    let output = run("trap 'echo bye' EXIT; true");
    assert_eq!(stdout(&output), "bye\n");
    assert_eq!(output.status.code(), Some(0));
}

#[test]
fn readonly_violation_exits() {
    let output = run("readonly X=1; X=2; echo nope");
    assert_eq!(stdout(&output), "");
    assert!(stderr(&output).contains("readonly variable"));
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn background_job_is_listed() {
    let output = run("sleep 0.1 & jobs");
    let listing = stdout(&output);
    assert!(listing.contains("[1]"), "listing: {listing}");
    assert!(listing.contains("sleep 0.1"), "listing: {listing}");
    assert_eq!(output.status.code(), Some(0));
}

#[test]
fn case_with_character_class() {
    let output = run("case A in [[:upper:]]) echo yes;; *) echo no;; esac");
    assert_eq!(stdout(&output), "yes\n");
}

#[test]
fn pipeline_status_and_negation() {
    let output = run("! echo x | grep -q y");
    assert_eq!(output.status.code(), Some(0));
}

#[test]
fn command_substitution_and_splitting() {
    let output = run("set -- $(printf 'a b c'); echo $#");
    assert_eq!(stdout(&output), "3\n");
}

#[test]
fn here_document() {
    let output = run("x=5; cat <<EOF\nvalue: $x\nEOF");
    assert_eq!(stdout(&output), "value: 5\n");
}

#[test]
fn here_document_with_quoted_delimiter() {
    let output = run("x=5; cat <<'EOF'\nvalue: $x\nEOF");
    assert_eq!(stdout(&output), "value: $x\n");
}

#[test]
fn here_string_with_read() {
    let output = run("IFS=: read a b c <<<\"one:two:three\"; echo \"$a/$b/$c\"");
    assert_eq!(stdout(&output), "one/two/three\n");
}

#[test]
fn printf_preserves_bytes() {
    let output = run("x='a\\tb %s'; printf '%s\\n' \"$x\"");
    assert_eq!(stdout(&output), "a\\tb %s\n");
}

#[test]
fn parameter_defaults() {
    let output = run("unset x; echo ${x:-fallback}; x=set; echo ${x:-fallback}");
    assert_eq!(stdout(&output), "fallback\nset\n");
}

#[test]
fn pattern_trims() {
    let output = run("x=a.b.c; echo ${x#*.} ${x##*.} ${x%.*} ${x%%.*}");
    assert_eq!(stdout(&output), "b.c c a.b a\n");
}

#[test]
fn positional_parameters_in_functions() {
    let output = run("f() { echo $#: $1; }; f one two; echo $#");
    assert_eq!(stdout(&output), "2: one\n0\n");
}

#[test]
fn break_in_nested_loops() {
    let output = run("for i in 1 2; do for j in a b; do echo $i$j; break 2; done; done");
    assert_eq!(stdout(&output), "1a\n");
}

#[test]
fn subshell_isolation() {
    let output = run("x=outer; (x=inner; echo $x); echo $x");
    assert_eq!(stdout(&output), "inner\nouter\n");
}

#[test]
fn exit_status_of_unknown_command() {
    let output = run("no-such-command-zish 2>/dev/null; echo $?");
    assert_eq!(stdout(&output), "127\n");
}

#[test]
fn noclobber_and_force_redirect() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("file");
    std::fs::write(&path, "original").unwrap();
    let path = path.to_str().unwrap();
    let script = format!(
        "set -C; echo x > {path} 2>/dev/null; echo status=$?; echo y >| {path}; echo status=$?"
    );
    let output = run(&script);
    assert!(stdout(&output).contains("status=1\nstatus=0\n"), "{}", stdout(&output));
    assert_eq!(std::fs::read_to_string(path).unwrap(), "y\n");
}

#[test]
fn errexit_stops_execution() {
    let output = run("set -e; false; echo unreachable");
    assert_eq!(stdout(&output), "");
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn syntax_error_status() {
    let output = run("echo )");
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn glob_expansion() {
    let dir = tempfile::tempdir().unwrap();
    for name in ["one.txt", "two.txt", "other.log"] {
        std::fs::write(dir.path().join(name), "").unwrap();
    }
    let script = format!("cd {}; echo *.txt", dir.path().display());
    let output = run(&script);
    assert_eq!(stdout(&output), "one.txt two.txt\n");
}
