//! CLI argument parsing

use crate::{CaseSensitivity, EnumeratorKind, SearchOptions, TerminationPolicy};
use std::str::FromStr;
use std::time::Duration;

#[derive(Debug, Clone, Default)]
pub struct SearchArgs {
    pub names: Vec<String>,
    pub roots: Vec<String>,
    pub workers: Option<usize>,
    pub max_depth: Option<u16>,
    pub follow_links: bool,
    pub ignore_case: bool,
    pub case_sensitive: bool,
    pub enumerator: Option<String>,
    pub eager_exit: bool,
    pub json: bool,
    pub quiet: bool,
    pub progress_interval_secs: Option<u64>,
}

impl SearchArgs {
    /// Roots to search; the current directory when none were given.
    #[must_use]
    pub fn effective_roots(&self) -> Vec<String> {
        if self.roots.is_empty() {
            vec![".".to_string()]
        } else {
            self.roots.clone()
        }
    }

    /// Translate parsed flags into search options (notifiers left unset).
    pub fn to_options(&self) -> Result<SearchOptions, String> {
        let mut opts = SearchOptions {
            max_depth: self.max_depth,
            follow_links: self.follow_links,
            ..SearchOptions::default()
        };

        if let Some(workers) = self.workers {
            opts.max_workers = workers;
        }

        if self.ignore_case {
            opts.case_sensitivity = CaseSensitivity::Insensitive;
        } else if self.case_sensitive {
            opts.case_sensitivity = CaseSensitivity::Sensitive;
        }

        if let Some(label) = self.enumerator.as_deref() {
            opts.enumerator = Some(EnumeratorKind::from_str(label)?);
        }

        if self.eager_exit {
            opts.termination = TerminationPolicy::eager();
        }

        if let Some(secs) = self.progress_interval_secs {
            opts.progress_interval = Duration::from_secs(secs);
        }

        Ok(opts)
    }
}

fn take_value<'a>(args: &'a [String], i: &mut usize, flag: &str) -> Result<&'a str, String> {
    *i += 1;
    args.get(*i)
        .map(String::as_str)
        .ok_or_else(|| format!("{flag} requires a value"))
}

/// Parse command line arguments (`args[0]` is the program name)
pub fn parse_args(args: &[String]) -> Result<SearchArgs, String> {
    let args = args.get(1..).unwrap_or_default();
    let mut search = SearchArgs::default();
    let mut positional_only = false;
    let mut i = 0;

    while i < args.len() {
        let arg = args[i].as_str();

        if positional_only || !arg.starts_with('-') || arg == "-" {
            search.names.push(arg.to_string());
            i += 1;
            continue;
        }

        match arg {
            "--" => positional_only = true,
            "--root" | "-r" => {
                let value = take_value(args, &mut i, "--root")?;
                search.roots.push(value.to_string());
            }
            "--workers" | "-j" => {
                let value = take_value(args, &mut i, "--workers")?;
                let workers: usize = value
                    .parse()
                    .map_err(|_| "--workers must be a number".to_string())?;
                if workers == 0 {
                    return Err("--workers must be greater than zero".to_string());
                }
                search.workers = Some(workers);
            }
            "--max-depth" => {
                let value = take_value(args, &mut i, "--max-depth")?;
                search.max_depth = Some(
                    value
                        .parse()
                        .map_err(|_| "--max-depth must be a number".to_string())?,
                );
            }
            "--follow-links" | "-L" => search.follow_links = true,
            "--ignore-case" | "-i" => search.ignore_case = true,
            "--case-sensitive" => search.case_sensitive = true,
            "--enumerator" => {
                let value = take_value(args, &mut i, "--enumerator")?;
                search.enumerator = Some(value.to_string());
            }
            "--eager-exit" => search.eager_exit = true,
            "--json" => search.json = true,
            "--quiet" | "-q" => search.quiet = true,
            "--progress-interval" => {
                let value = take_value(args, &mut i, "--progress-interval")?;
                let secs: u64 = value
                    .parse()
                    .map_err(|_| "--progress-interval must be a positive integer".to_string())?;
                if secs == 0 {
                    return Err("--progress-interval must be greater than zero".to_string());
                }
                search.progress_interval_secs = Some(secs);
            }
            _ => return Err(format!("Unknown option: {arg}")),
        }
        i += 1;
    }

    if search.ignore_case && search.case_sensitive {
        return Err("--ignore-case and --case-sensitive are mutually exclusive".to_string());
    }

    if search.names.is_empty() {
        return Err("Missing required argument: NAME".to_string());
    }

    Ok(search)
}
