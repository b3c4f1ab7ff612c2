//! Unit tests for CLI argument parsing
#[cfg(test)]
mod tests {
	use nfind::cli::args::parse_args;
	use nfind::{CaseSensitivity, EnumeratorKind, TerminationPolicy};
	use std::time::Duration;

	fn make_args(raw: &[&str]) -> Vec<String> {
		raw.iter().map(|s| s.to_string()).collect()
	}

	#[test]
	fn parse_names_and_roots() {
		let argv = make_args(&[
			"nfind",
			"Cargo.toml",
			"--root",
			"/src",
			"-r",
			"/work",
			"README.md",
		]);

		let parsed = parse_args(&argv).expect("parse search args");
		assert_eq!(parsed.names, vec!["Cargo.toml", "README.md"]);
		assert_eq!(parsed.roots, vec!["/src", "/work"]);
		assert_eq!(parsed.effective_roots(), vec!["/src", "/work"]);
	}

	#[test]
	fn defaults_to_current_directory() {
		let parsed = parse_args(&make_args(&["nfind", "x"])).unwrap();
		assert_eq!(parsed.effective_roots(), vec!["."]);

		let opts = parsed.to_options().unwrap();
		assert!(opts.max_workers >= 1);
		assert_eq!(opts.termination, TerminationPolicy::Counted);
		assert!(opts.enumerator.is_none());
	}

	#[test]
	fn parse_tuning_flags() {
		let argv = make_args(&[
			"nfind",
			"hosts",
			"-j",
			"12",
			"--max-depth",
			"3",
			"-L",
			"--enumerator",
			"portable",
			"--eager-exit",
			"--progress-interval",
			"5",
			"--json",
			"-q",
		]);

		let parsed = parse_args(&argv).unwrap();
		assert!(parsed.json);
		assert!(parsed.quiet);

		let opts = parsed.to_options().unwrap();
		assert_eq!(opts.max_workers, 12);
		assert_eq!(opts.max_depth, Some(3));
		assert!(opts.follow_links);
		assert_eq!(opts.enumerator, Some(EnumeratorKind::Portable));
		assert_eq!(opts.termination, TerminationPolicy::eager());
		assert_eq!(opts.progress_interval, Duration::from_secs(5));
	}

	#[test]
	fn parse_case_flags() {
		let insensitive = parse_args(&make_args(&["nfind", "-i", "x"])).unwrap();
		assert_eq!(
			insensitive.to_options().unwrap().case_sensitivity,
			CaseSensitivity::Insensitive
		);

		let sensitive = parse_args(&make_args(&["nfind", "--case-sensitive", "x"])).unwrap();
		assert_eq!(
			sensitive.to_options().unwrap().case_sensitivity,
			CaseSensitivity::Sensitive
		);

		let err = parse_args(&make_args(&["nfind", "-i", "--case-sensitive", "x"])).unwrap_err();
		assert!(err.contains("mutually exclusive"));
	}

	#[test]
	fn double_dash_allows_dash_prefixed_names() {
		let parsed = parse_args(&make_args(&["nfind", "--", "-weird-name", "--json"])).unwrap();
		assert_eq!(parsed.names, vec!["-weird-name", "--json"]);
		assert!(!parsed.json);
	}

	#[test]
	fn rejects_bad_input() {
		let cases: &[(&[&str], &str)] = &[
			(&["nfind"], "Missing required argument"),
			(&["nfind", "--root", "/tmp"], "Missing required argument"),
			(&["nfind", "x", "--root"], "--root requires a value"),
			(&["nfind", "x", "--workers", "0"], "greater than zero"),
			(&["nfind", "x", "--workers", "many"], "must be a number"),
			(&["nfind", "x", "--progress-interval", "0"], "greater than zero"),
			(&["nfind", "x", "--bogus"], "Unknown option: --bogus"),
		];

		for (argv, expected) in cases {
			let err = parse_args(&make_args(argv)).unwrap_err();
			assert!(err.contains(expected), "{argv:?}: {err}");
		}
	}

	#[test]
	fn unknown_enumerator_fails_when_building_options() {
		let parsed = parse_args(&make_args(&["nfind", "x", "--enumerator", "fat32"])).unwrap();
		let err = parsed.to_options().unwrap_err();
		assert!(err.contains("unknown enumerator"));
	}
}
