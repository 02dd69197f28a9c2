//! Pre-parse split of the command line into clap arguments and template
//! variables.
//!
//! Options clap knows about stay in the argument list. Every other
//! `--name value` / `--name=value` pair is removed and returned as a variable,
//! so clap never sees it. An extra option with no value (end of input or
//! followed by another `--option`) is bound to `"true"`.
//!
//! Known options that take their value with `=` (`--dry-run`,
//! `--removeTitle`) also accept it as the next argument when that argument is
//! a boolean word: `--dry-run true` is passed on as `--dry-run=true`.

use std::collections::HashSet;
use std::ffi::OsString;

use clap::Command;
use notegen_core::vars::VarsMap;
use tracing::debug;

pub fn split_vars<I>(args: I, cmd: &Command) -> (Vec<OsString>, VarsMap)
where
    I: IntoIterator<Item = OsString>,
{
    let known = known_long_names(cmd);
    let equals_only = equals_only_names(cmd);
    let mut argv = Vec::new();
    let mut vars = VarsMap::new();

    let mut iter = args.into_iter().peekable();
    // binary name
    argv.extend(iter.next());

    while let Some(arg) = iter.next() {
        let Some(s) = arg.to_str() else {
            argv.push(arg);
            continue;
        };

        if s == "--" {
            argv.push(arg);
            argv.extend(iter);
            break;
        }

        let Some(body) = s.strip_prefix("--") else {
            argv.push(arg);
            continue;
        };

        let (name, inline) = match body.split_once('=') {
            Some((n, v)) => (n, Some(v)),
            None => (body, None),
        };

        if known.contains(name) {
            let takes_next = inline.is_none() && equals_only.contains(name);
            match iter.next_if(|next| takes_next && is_boolish(next)) {
                Some(value) => {
                    let mut folded = arg;
                    folded.push("=");
                    folded.push(value);
                    argv.push(folded);
                }
                None => argv.push(arg),
            }
            continue;
        }

        if !is_var_name(name) {
            argv.push(arg);
            continue;
        }

        let value = match inline {
            Some(v) => v.to_string(),
            None => match iter.next_if(|next| !next.to_string_lossy().starts_with("--")) {
                Some(next) => next.to_string_lossy().into_owned(),
                None => "true".to_string(),
            },
        };

        let var = camel_case(name);
        debug!("template variable {var} = {value:?}");
        vars.insert(var, value);
    }

    (argv, vars)
}

fn known_long_names(cmd: &Command) -> HashSet<String> {
    let mut names: HashSet<String> =
        ["help", "version"].into_iter().map(String::from).collect();
    for arg in cmd.get_arguments() {
        if let Some(long) = arg.get_long() {
            names.insert(long.to_string());
        }
        for alias in arg.get_all_aliases().unwrap_or_default() {
            names.insert(alias.to_string());
        }
    }
    names
}

/// Long names (and aliases) of options whose value must be attached with `=`.
fn equals_only_names(cmd: &Command) -> HashSet<String> {
    let mut names = HashSet::new();
    for arg in cmd.get_arguments().filter(|a| a.is_require_equals_set()) {
        names.extend(arg.get_long().map(String::from));
        names.extend(arg.get_all_aliases().unwrap_or_default().into_iter().map(String::from));
    }
    names
}

fn is_boolish(arg: &OsString) -> bool {
    arg.to_str().is_some_and(|s| {
        matches!(
            s.to_ascii_lowercase().as_str(),
            "true" | "false" | "yes" | "no" | "on" | "off" | "1" | "0"
        )
    })
}

fn is_var_name(name: &str) -> bool {
    name.starts_with(|c: char| c.is_ascii_alphabetic() || c == '_')
        && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

/// `project-name` -> `projectName`; other names are kept as they are.
fn camel_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut upper = false;
    for c in name.chars() {
        if c == '-' {
            upper = true;
        } else if upper {
            out.push(c.to_ascii_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}
