use super::*;

fn run_args(args: &[&str]) -> RunArgs {
    let cli = Cli::try_parse_from(args).expect("expected valid cli args");
    match cli.command {
        Commands::Run(args) => args,
    }
}

#[test]
fn run_defaults_to_report_profile() {
    let args = run_args(&["mcscrape", "run"]);
    assert_eq!(args.profile, RunProfile::Report);
    assert!(args.symbols.is_none());
    assert!(args.output.is_none());
    assert!(!args.dry_run);
}

#[test]
fn parses_profile_and_paths() {
    let args = run_args(&[
        "mcscrape",
        "run",
        "--profile",
        "swot-api",
        "--symbols",
        "nifty50.csv",
        "--output",
        "out/swot.txt",
    ]);
    assert_eq!(args.profile, RunProfile::SwotApi);
    assert_eq!(args.symbols, Some(PathBuf::from("nifty50.csv")));
    assert_eq!(args.output, Some(PathBuf::from("out/swot.txt")));
}

#[test]
fn parses_dry_run() {
    let args = run_args(&["mcscrape", "run", "--profile", "insights-api", "--dry-run"]);
    assert_eq!(args.profile, RunProfile::InsightsApi);
    assert!(args.dry_run);
}

#[test]
fn rejects_unknown_profile() {
    let err = Cli::try_parse_from(["mcscrape", "run", "--profile", "csv"]).unwrap_err();
    assert!(err.to_string().contains("unknown profile"), "got: {err}");
}

#[test]
fn subcommand_is_required() {
    assert!(Cli::try_parse_from(["mcscrape"]).is_err());
}
