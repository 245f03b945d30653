#![doc = include_str!("../README.md")]

use std::ffi::OsStr;
use std::io::Write;

use log::{debug, trace, warn};

pub mod registry;
pub mod usage;

pub use registry::{Attr, Destination, LongSpec, Registry};

/////////////////////////////////////////////// Error //////////////////////////////////////////////

/// An error encountered while parsing the command line.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum Error {
    /// An option that takes a value appeared without one.
    #[error("option needs a value")]
    MissingValue { option: String },
    /// An option that was never registered appeared.
    #[error("unknown option")]
    UnknownOption { option: String },
    /// A flag was given a value, as in `--flag=value`.
    #[error("option does not take a value")]
    UnexpectedValue { option: String },
    /// A mandatory option did not appear.
    #[error("missing mandatory option: --{long_name}")]
    MissingMandatory { long_name: String },
    /// Any other failure reported by the scanner.
    #[error("{0}")]
    Scan(String),
}

impl Error {
    /// The line to show the user, e.g. `"error:  unknown option"`.
    pub fn report(&self) -> String {
        format!("error:  {}", self)
    }
}

impl From<getopts::Fail> for Error {
    fn from(fail: getopts::Fail) -> Self {
        match fail {
            getopts::Fail::ArgumentMissing(option) => Error::MissingValue { option },
            getopts::Fail::UnrecognizedOption(option) => Error::UnknownOption { option },
            getopts::Fail::UnexpectedArgument(option) => Error::UnexpectedValue { option },
            other => Error::Scan(other.to_string()),
        }
    }
}

/// A misuse of [Parser::add] or [Registry::add].
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum RegistrationError {
    #[error("invalid short name {short_name:?}")]
    InvalidShortName { short_name: char },
    #[error("invalid long name {long_name:?}")]
    InvalidLongName { long_name: String },
    #[error("short name -{short_name} is already registered for --{existing}")]
    DuplicateShortName { short_name: char, existing: String },
    #[error("long name --{long_name} is already registered")]
    DuplicateLongName { long_name: String },
}

////////////////////////////////////////////// Outcome /////////////////////////////////////////////

/// Something the user asked of the program rather than of its options.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Request {
    Help,
    Version,
}

impl Request {
    /// The code the program should exit with after honoring the request.
    pub fn exit_code(&self) -> i32 {
        0
    }
}

/// The result of a successful [Parser::parse].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Outcome {
    /// Every option was applied; carry on.
    Continue,
    /// The user asked for help or the version.  Options that preceded the request on the command
    /// line have been applied; the rest have not.
    ExitRequested(Request),
}

impl Outcome {
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            Outcome::Continue => None,
            Outcome::ExitRequested(request) => Some(request.exit_code()),
        }
    }
}

////////////////////////////////////////////// Config //////////////////////////////////////////////

/// How free arguments interact with options.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum ScanStyle {
    /// Options may appear anywhere, before or after free arguments.
    #[default]
    Permute,
    /// The first free argument ends option processing.
    StopAtFirstFree,
}

impl From<ScanStyle> for getopts::ParsingStyle {
    fn from(style: ScanStyle) -> Self {
        match style {
            ScanStyle::Permute => getopts::ParsingStyle::FloatingFrees,
            ScanStyle::StopAtFirstFree => getopts::ParsingStyle::StopAtFirstFree,
        }
    }
}

/// What to do when a mandatory option is absent.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum MandatoryPolicy {
    /// Fail the parse with [Error::MissingMandatory].
    #[default]
    Enforce,
    /// Only mark the option in the usage text.
    Advisory,
}

/// Knobs for a [Parser].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Config {
    /// Appended to the program name in usage and version text.
    pub executable_suffix: String,
    pub scan_style: ScanStyle,
    pub mandatory: MandatoryPolicy,
}

impl Config {
    pub fn with_executable_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.executable_suffix = suffix.into();
        self
    }

    pub fn with_scan_style(mut self, scan_style: ScanStyle) -> Self {
        self.scan_style = scan_style;
        self
    }

    pub fn with_mandatory_policy(mut self, mandatory: MandatoryPolicy) -> Self {
        self.mandatory = mandatory;
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            executable_suffix: ".exe".to_string(),
            scan_style: ScanStyle::default(),
            mandatory: MandatoryPolicy::default(),
        }
    }
}

////////////////////////////////////////////// Parser //////////////////////////////////////////////

/// A command-line parser that writes into destinations borrowed for `'a`.
///
/// Register every option before calling [Parser::parse].  The destinations stay borrowed until
/// the parser is dropped, so read them after the parser's last use.
#[derive(Debug)]
pub struct Parser<'a> {
    name: String,
    version: String,
    config: Config,
    registry: Registry<'a>,
    free: Vec<String>,
}

impl<'a> Parser<'a> {
    pub fn new(program_name: impl Into<String>, program_version: impl Into<String>) -> Self {
        Self::with_config(program_name, program_version, Config::default())
    }

    pub fn with_config(
        program_name: impl Into<String>,
        program_version: impl Into<String>,
        config: Config,
    ) -> Self {
        Self {
            name: program_name.into(),
            version: program_version.into(),
            config,
            registry: Registry::new(),
            free: Vec::new(),
        }
    }

    /// Register an optional option.  A `&mut bool` destination makes a flag; a `&mut String`
    /// destination makes an option that takes a value.
    pub fn add(
        &mut self,
        short_name: char,
        long_name: &str,
        description: &str,
        destination: impl Into<Destination<'a>>,
    ) -> Result<(), RegistrationError> {
        self.registry.add(short_name, long_name, description, destination, false)
    }

    /// Register an option that must appear on the command line.
    pub fn add_mandatory(
        &mut self,
        short_name: char,
        long_name: &str,
        description: &str,
        destination: impl Into<Destination<'a>>,
    ) -> Result<(), RegistrationError> {
        self.registry.add(short_name, long_name, description, destination, true)
    }

    pub fn registry(&self) -> &Registry<'a> {
        &self.registry
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The program name as shown to the user, suffix included.
    pub fn program(&self) -> String {
        format!("{}{}", self.name, self.config.executable_suffix)
    }

    /// Free arguments left over from the last successful parse.  They are not interpreted.
    pub fn free(&self) -> &[String] {
        &self.free
    }

    pub fn write_usage<W: Write>(&self, out: &mut W) -> std::io::Result<()> {
        usage::write_usage(out, &self.program(), &self.registry)
    }

    pub fn usage(&self) -> String {
        let mut out = Vec::new();
        // SAFETY(argattr):  Writing to a Vec never fails.
        self.write_usage(&mut out).unwrap();
        String::from_utf8_lossy(&out).into_owned()
    }

    pub fn print_usage(&self) {
        print!("{}", self.usage());
    }

    /// The version line, e.g. `"demo.exe (version: v1.0.0)"`.
    pub fn version(&self) -> String {
        format!("{} (version: v{})", self.program(), self.version)
    }

    pub fn print_version(&self) {
        println!("{}", self.version());
    }

    /// Print the text for `request` to stdout and return the code to exit with.
    pub fn respond(&self, request: Request) -> i32 {
        match request {
            Request::Help => self.print_usage(),
            Request::Version => self.print_version(),
        }
        request.exit_code()
    }

    /// Parse `args`, which should not include the program name.
    ///
    /// Arguments are scanned left to right and each option is applied as soon as its word has
    /// been scanned; options clustered in one word (`-ab`) apply in the order they were typed.
    /// A value option given more than once keeps the last value.  Scanning stops at the first
    /// help or version request, or at the first error, leaving earlier options applied.  A
    /// missing mandatory option is detected after every option has been applied.
    pub fn parse<I, S>(&mut self, args: I) -> Result<Outcome, Error>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let args = decode_args(args);
        let mut opts = getopts::Options::new();
        opts.parsing_style(self.config.scan_style.into());
        self.registry.add_opts(&mut opts);
        debug!(
            "scanning {} arguments with short spec {:?}",
            args.len(),
            self.registry.short_spec()
        );

        // Occurrences of each option applied so far.
        let mut applied = vec![0usize; self.registry.len()];
        let mut free = Vec::new();
        // First word of the option currently being scanned; an option that takes a value may
        // span two words.
        let mut unit_start = 0;
        for end in 1..=args.len() {
            let matches = match opts.parse(&args[..end]) {
                Ok(matches) => matches,
                Err(getopts::Fail::ArgumentMissing(_)) if end < args.len() => {
                    continue;
                }
                Err(fail) => {
                    return Err(fail.into());
                }
            };
            let word = &args[unit_start];
            let mut events: Vec<(usize, usize, Option<String>)> = Vec::new();
            for (index, attr) in self.registry.iter().enumerate() {
                let offset = cluster_offset(word, attr.short_name());
                if attr.takes_value() {
                    let values = matches.opt_strs(attr.long_name());
                    for value in values.into_iter().skip(applied[index]) {
                        events.push((offset, index, Some(value)));
                    }
                } else {
                    for _ in applied[index]..matches.opt_count(attr.long_name()) {
                        events.push((offset, index, None));
                    }
                }
            }
            events.sort_by_key(|(offset, _, _)| *offset);
            for (_, index, value) in events {
                applied[index] += 1;
                if let Some(request) = self.registry.dispatch(index, value) {
                    return Ok(Outcome::ExitRequested(request));
                }
            }
            unit_start = end;
            free = matches.free;
        }

        if self.config.mandatory == MandatoryPolicy::Enforce {
            for (attr, count) in self.registry.iter().zip(applied) {
                if attr.is_mandatory() && count == 0 {
                    return Err(Error::MissingMandatory {
                        long_name: attr.long_name().to_string(),
                    });
                }
            }
        }
        for arg in free.iter() {
            trace!("ignoring free argument {:?}", arg);
        }
        self.free = free;
        Ok(Outcome::Continue)
    }

    /// Parse the process's own arguments.
    pub fn parse_env(&mut self) -> Result<Outcome, Error> {
        self.parse(std::env::args_os().skip(1))
    }

    /// Parse `args` and exit the process on help, version, or error.  Returns only when parsing
    /// succeeded and the program should continue.
    pub fn parse_or_exit<I, S>(&mut self, args: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        match self.parse(args) {
            Ok(Outcome::Continue) => {}
            Ok(Outcome::ExitRequested(request)) => {
                std::process::exit(self.respond(request));
            }
            Err(err) => {
                eprintln!("{}", err.report());
                std::process::exit(1);
            }
        }
    }
}

// Where `short_name` sits within a `-abc` cluster.  Words that are not clusters yield one option
// at most, so they all sort the same.
fn cluster_offset(word: &str, short_name: char) -> usize {
    word.strip_prefix('-')
        .filter(|cluster| !cluster.starts_with('-'))
        .and_then(|cluster| cluster.find(short_name))
        .unwrap_or(0)
}

fn decode_args<I, S>(args: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    args.into_iter()
        .map(|arg| {
            let arg = arg.as_ref();
            match arg.to_str() {
                Some(arg) => arg.to_string(),
                None => {
                    let decoded = arg.to_string_lossy().into_owned();
                    warn!("argument {:?} is not valid UTF-8; decoded as {:?}", arg, decoded);
                    decoded
                }
            }
        })
        .collect()
}

/////////////////////////////////////////////// tests //////////////////////////////////////////////
