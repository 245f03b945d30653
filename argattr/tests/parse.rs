use argattr::{Config, Error, MandatoryPolicy, Outcome, Parser, Request, ScanStyle};

#[derive(Debug, Default)]
struct Options {
    alpha: bool,
    bravo: bool,
    charlie: bool,
    config: String,
}

fn parse_with(
    config: Config,
    mandatory_config: bool,
    options: &mut Options,
    args: &[&str],
) -> (Result<Outcome, Error>, Vec<String>) {
    let mut parser = Parser::with_config("demo", "1.2.3", config);
    parser.add('a', "alpha", "first flag", &mut options.alpha).unwrap();
    parser.add('b', "bravo", "second flag", &mut options.bravo).unwrap();
    parser.add('C', "charlie", "third flag", &mut options.charlie).unwrap();
    if mandatory_config {
        parser.add_mandatory('c', "config", "configuration file", &mut options.config).unwrap();
    } else {
        parser.add('c', "config", "configuration file", &mut options.config).unwrap();
    }
    let result = parser.parse(args);
    (result, parser.free().to_vec())
}

fn parse(options: &mut Options, args: &[&str]) -> Result<Outcome, Error> {
    parse_with(Config::default(), false, options, args).0
}

#[test]
fn no_arguments() {
    let mut options = Options::default();
    assert_eq!(Ok(Outcome::Continue), parse(&mut options, &[]));
    assert!(!options.alpha);
    assert!(!options.bravo);
    assert!(!options.charlie);
    assert_eq!("", options.config);
}

#[test]
fn short_and_long_flags() {
    let mut options = Options::default();
    assert_eq!(Ok(Outcome::Continue), parse(&mut options, &["-a", "--bravo"]));
    assert!(options.alpha);
    assert!(options.bravo);
    assert!(!options.charlie);
}

#[test]
fn clustered_flags() {
    let mut options = Options::default();
    assert_eq!(Ok(Outcome::Continue), parse(&mut options, &["-aC"]));
    assert!(options.alpha);
    assert!(!options.bravo);
    assert!(options.charlie);
}

#[test]
fn repeated_flag() {
    let mut options = Options::default();
    assert_eq!(Ok(Outcome::Continue), parse(&mut options, &["-a", "--alpha", "-a"]));
    assert!(options.alpha);
}

#[test]
fn value_forms() {
    for args in [
        &["--config=demo.conf"][..],
        &["--config", "demo.conf"][..],
        &["-c", "demo.conf"][..],
        &["-cdemo.conf"][..],
    ] {
        let mut options = Options::default();
        assert_eq!(Ok(Outcome::Continue), parse(&mut options, args));
        assert_eq!("demo.conf", options.config, "args={:?}", args);
    }
}

#[test]
fn last_value_wins() {
    let mut options = Options::default();
    assert_eq!(
        Ok(Outcome::Continue),
        parse(&mut options, &["-c", "first", "--config=second", "-cthird"])
    );
    assert_eq!("third", options.config);
}

#[test]
fn value_with_spaces_and_unicode() {
    let mut options = Options::default();
    assert_eq!(
        Ok(Outcome::Continue),
        parse(&mut options, &["--config", "my files/r\u{e9}sum\u{e9}.conf"])
    );
    assert_eq!("my files/r\u{e9}sum\u{e9}.conf", options.config);
}

#[test]
fn help_short_and_long() {
    for arg in ["-h", "--help"] {
        let mut options = Options::default();
        assert_eq!(
            Ok(Outcome::ExitRequested(Request::Help)),
            parse(&mut options, &[arg])
        );
    }
}

#[test]
fn version_short_and_long() {
    for arg in ["-v", "--version"] {
        let mut options = Options::default();
        assert_eq!(
            Ok(Outcome::ExitRequested(Request::Version)),
            parse(&mut options, &[arg])
        );
    }
}

#[test]
fn help_stops_dispatch() {
    let mut options = Options::default();
    assert_eq!(
        Ok(Outcome::ExitRequested(Request::Help)),
        parse(&mut options, &["-a", "--help", "-b", "-v"])
    );
    assert!(options.alpha);
    assert!(!options.bravo);
}

#[test]
fn help_wins_over_missing_mandatory() {
    let mut options = Options::default();
    let (result, _) = parse_with(Config::default(), true, &mut options, &["--help"]);
    assert_eq!(Ok(Outcome::ExitRequested(Request::Help)), result);
}

#[test]
fn unknown_short_option() {
    let mut options = Options::default();
    let err = parse(&mut options, &["-a", "-z"]).unwrap_err();
    assert!(matches!(err, Error::UnknownOption { .. }), "err={:?}", err);
    assert_eq!("error:  unknown option", err.report());
    // options ahead of the mistake stay applied
    assert!(options.alpha);
}

#[test]
fn help_before_unknown_option() {
    let mut options = Options::default();
    assert_eq!(
        Ok(Outcome::ExitRequested(Request::Help)),
        parse(&mut options, &["--help", "-z"])
    );
}

#[test]
fn version_before_missing_value() {
    let mut options = Options::default();
    assert_eq!(
        Ok(Outcome::ExitRequested(Request::Version)),
        parse(&mut options, &["-v", "--config"])
    );
}

#[test]
fn unknown_option_before_help() {
    let mut options = Options::default();
    let err = parse(&mut options, &["-z", "--help"]).unwrap_err();
    assert!(matches!(err, Error::UnknownOption { .. }), "err={:?}", err);
}

#[test]
fn cluster_applies_in_typed_order() {
    let mut options = Options::default();
    assert_eq!(
        Ok(Outcome::ExitRequested(Request::Help)),
        parse(&mut options, &["-ah"])
    );
    assert!(options.alpha);

    let mut options = Options::default();
    assert_eq!(
        Ok(Outcome::ExitRequested(Request::Help)),
        parse(&mut options, &["-ha"])
    );
    assert!(!options.alpha);
}

#[test]
fn cluster_ending_in_value_option() {
    // config is registered after alpha and charlie but typed between them
    let mut options = Options::default();
    assert_eq!(
        Ok(Outcome::Continue),
        parse(&mut options, &["-Cac", "demo.conf", "-b"])
    );
    assert!(options.alpha);
    assert!(options.bravo);
    assert!(options.charlie);
    assert_eq!("demo.conf", options.config);

    let mut options = Options::default();
    assert_eq!(
        Ok(Outcome::ExitRequested(Request::Version)),
        parse(&mut options, &["-ac", "demo.conf", "-vb"])
    );
    assert!(options.alpha);
    assert!(!options.bravo);
    assert_eq!("demo.conf", options.config);
}

#[test]
fn value_that_looks_like_help() {
    let mut options = Options::default();
    assert_eq!(
        Ok(Outcome::Continue),
        parse(&mut options, &["--config", "-h", "-a"])
    );
    assert_eq!("-h", options.config);
    assert!(options.alpha);
}

#[test]
fn unknown_long_option() {
    let mut options = Options::default();
    let err = parse(&mut options, &["--zulu"]).unwrap_err();
    assert!(matches!(err, Error::UnknownOption { .. }), "err={:?}", err);
}

#[test]
fn missing_value() {
    for args in [&["--config"][..], &["-a", "-c"][..]] {
        let mut options = Options::default();
        let err = parse(&mut options, args).unwrap_err();
        assert!(matches!(err, Error::MissingValue { .. }), "err={:?}", err);
        assert_eq!("error:  option needs a value", err.report());
    }
}

#[test]
fn flag_given_a_value() {
    let mut options = Options::default();
    let err = parse(&mut options, &["--alpha=yes"]).unwrap_err();
    assert!(matches!(err, Error::UnexpectedValue { .. }), "err={:?}", err);
    assert!(!options.alpha);
}

#[test]
fn mandatory_enforced() {
    let mut options = Options::default();
    let (result, _) = parse_with(Config::default(), true, &mut options, &["-a"]);
    assert_eq!(
        Err(Error::MissingMandatory {
            long_name: "config".to_string()
        }),
        result
    );
    // options applied before the check stay applied
    assert!(options.alpha);
}

#[test]
fn mandatory_satisfied() {
    let mut options = Options::default();
    let (result, _) = parse_with(
        Config::default(),
        true,
        &mut options,
        &["--config", "demo.conf"],
    );
    assert_eq!(Ok(Outcome::Continue), result);
    assert_eq!("demo.conf", options.config);
}

#[test]
fn mandatory_advisory() {
    let mut options = Options::default();
    let config = Config::default().with_mandatory_policy(MandatoryPolicy::Advisory);
    let (result, _) = parse_with(config, true, &mut options, &["-b"]);
    assert_eq!(Ok(Outcome::Continue), result);
    assert!(options.bravo);
    assert_eq!("", options.config);
}

#[test]
fn free_arguments_permute() {
    let mut options = Options::default();
    let (result, free) = parse_with(
        Config::default(),
        false,
        &mut options,
        &["input.txt", "-a", "output.txt"],
    );
    assert_eq!(Ok(Outcome::Continue), result);
    assert!(options.alpha);
    assert_eq!(vec!["input.txt", "output.txt"], free);
}

#[test]
fn free_arguments_stop_at_first() {
    let mut options = Options::default();
    let config = Config::default().with_scan_style(ScanStyle::StopAtFirstFree);
    let (result, free) = parse_with(config, false, &mut options, &["input.txt", "-a"]);
    assert_eq!(Ok(Outcome::Continue), result);
    assert!(!options.alpha);
    assert_eq!(vec!["input.txt", "-a"], free);
}

#[test]
fn double_dash_ends_options() {
    let mut options = Options::default();
    let (result, free) = parse_with(Config::default(), false, &mut options, &["-b", "--", "-a"]);
    assert_eq!(Ok(Outcome::Continue), result);
    assert!(!options.alpha);
    assert!(options.bravo);
    assert_eq!(vec!["-a"], free);
}

#[test]
fn version_text() {
    let parser = Parser::new("demo", "1.2.3");
    assert_eq!("demo.exe (version: v1.2.3)", parser.version());
    let parser = Parser::with_config("demo", "1.2.3", Config::default().with_executable_suffix(""));
    assert_eq!("demo (version: v1.2.3)", parser.version());
}

#[test]
fn parse_or_exit_returns_on_success() {
    let mut alpha = false;
    {
        let mut parser = Parser::new("demo", "1.2.3");
        parser.add('a', "alpha", "first flag", &mut alpha).unwrap();
        parser.parse_or_exit(["--alpha"]);
    }
    assert!(alpha);
}
