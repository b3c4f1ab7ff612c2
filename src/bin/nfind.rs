//! nfind - Main binary entry point

use nfind::cli::args::{SearchArgs, parse_args};
use nfind::cli::output::{LineStream, format_json, format_stats_line};
use nfind::models::ProgressSnapshot;
use std::process;
use std::sync::Arc;

fn main() {
    // Initialize logger (controlled by RUST_LOG environment variable)
    // Example: RUST_LOG=debug nfind Cargo.toml --root ~/src
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_help();
        process::exit(2);
    }

    match args[1].as_str() {
        "--help" | "-h" => {
            print_help();
            return;
        }
        "--version" | "-v" => {
            print_version();
            return;
        }
        _ => {}
    }

    let search_args = match parse_args(&args) {
        Ok(a) => a,
        Err(e) => {
            eprintln!("Error: {e}");
            eprintln!("Use --help for usage information");
            process::exit(2);
        }
    };

    process::exit(handle_search(&search_args));
}

fn handle_search(args: &SearchArgs) -> i32 {
    let mut opts = match args.to_options() {
        Ok(opts) => opts,
        Err(e) => {
            eprintln!("Error: {e}");
            return 2;
        }
    };

    // Text mode streams matches as they are found; JSON waits for the summary.
    if !args.json {
        let stream = LineStream::new(std::io::stdout());
        opts.match_notifier = Some(Arc::new(move |path: &str| {
            stream.write_line(path);
        }));
    }

    if !args.quiet {
        opts.progress_notifier = Some(Arc::new(|snapshot: &ProgressSnapshot| {
            #[allow(clippy::cast_precision_loss)]
            let elapsed_secs = snapshot.timestamp_ms as f64 / 1000.0;
            eprintln!(
                "[{elapsed_secs:6.1}s] {} directories, {} entries, {} matches",
                snapshot.directories_scanned, snapshot.entries_seen, snapshot.matches_found
            );
        }));
    }

    let roots = args.effective_roots();
    let summary = match nfind::search(args.names.as_slice(), roots.as_slice(), &opts) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error: {e}");
            return match e {
                nfind::Error::InvalidInput(_) => 2,
                _ => 4,
            };
        }
    };

    if args.json {
        println!("{}", format_json(&summary));
    }

    if !args.quiet {
        for error in &summary.errors {
            eprintln!("Skipped {} ({}): {}", error.path, error.code, error.message);
        }
        eprintln!("{}", format_stats_line(&summary));
    }

    if !summary.is_exhaustive() {
        3
    } else if summary.matches.is_empty() {
        1
    } else {
        0
    }
}

fn print_help() {
    println!("nfind - Find files by exact name using native directory enumeration");
    println!();
    println!("USAGE:");
    println!("    nfind [OPTIONS] <NAME>... [--root <DIR>]...");
    println!();
    println!("OPTIONS:");
    println!("    -r, --root <DIR>          Directory to search (repeatable, default: current directory)");
    println!("    -j, --workers <N>         Worker threads (default: logical CPU count)");
    println!("    --max-depth <N>           Match files at most N levels below a root");
    println!("    -L, --follow-links        Descend into symbolic links and junctions");
    println!("    -i, --ignore-case         Compare names case-insensitively");
    println!("    --case-sensitive          Compare names case-sensitively");
    println!("    --enumerator <NAME>       Backend: posix|windows|portable (default: native)");
    println!("    --eager-exit              Let idle workers exit as soon as the queue looks empty");
    println!("    --json                    Emit machine-readable output");
    println!("    --progress-interval <S>   Emit progress updates every S seconds (default: 2)");
    println!("    -q, --quiet               Suppress progress and diagnostics");
    println!("    -h, --help                Show this help message");
    println!("    -v, --version             Show version information");
    println!();
    println!("EXIT STATUS:");
    println!("    0 matches found, 1 no match, 2 usage error, 3 some directories skipped, 4 failure");
    println!();
    println!("EXAMPLES:");
    println!("    nfind Cargo.toml --root ~/src");
    println!("    nfind hosts services --root /etc --root /usr/local/etc -j 16");
    println!("    nfind desktop.ini -r \\\\server\\share --json");
}

fn print_version() {
    const VERSION: &str = env!("CARGO_PKG_VERSION");
    const GIT_HASH: &str = env!("NFIND_GIT_HASH");
    const GIT_DATE: &str = env!("NFIND_GIT_DATE");
    const BUILD_TARGET: &str = env!("NFIND_BUILD_TARGET");

    println!("nfind {VERSION}");
    println!("Commit: {GIT_HASH} ({GIT_DATE})");
    println!("Target: {BUILD_TARGET}");

    #[cfg(debug_assertions)]
    println!("Build: debug");
    #[cfg(not(debug_assertions))]
    println!("Build: release");
}
