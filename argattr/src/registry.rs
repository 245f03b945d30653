//! The registry of options a [crate::Parser] knows about.

use log::debug;

use crate::{RegistrationError, Request};

//////////////////////////////////////////// Destination ///////////////////////////////////////////

/// The caller-owned storage an option writes into.
///
/// The kind of destination decides whether the option takes a value:  flags bind to a `bool`,
/// value options bind to a `String`.
#[derive(Debug)]
pub enum Destination<'a> {
    /// Set to true when the option appears.
    Flag(&'a mut bool),
    /// Overwritten with the option's argument each time the option appears.
    Value(&'a mut String),
}

impl Destination<'_> {
    /// True if options bound to this destination consume an argument.
    pub fn takes_value(&self) -> bool {
        matches!(self, Destination::Value(_))
    }
}

impl<'a> From<&'a mut bool> for Destination<'a> {
    fn from(flag: &'a mut bool) -> Self {
        Destination::Flag(flag)
    }
}

impl<'a> From<&'a mut String> for Destination<'a> {
    fn from(value: &'a mut String) -> Self {
        Destination::Value(value)
    }
}

/////////////////////////////////////////////// Attr ///////////////////////////////////////////////

#[derive(Debug)]
enum Target<'a> {
    Builtin(Request),
    Bound(Destination<'a>),
}

/// One registered option.
#[derive(Debug)]
pub struct Attr<'a> {
    short_name: char,
    long_name: String,
    description: String,
    mandatory: bool,
    target: Target<'a>,
}

impl Attr<'_> {
    /// The single character of the `-c` form.
    pub fn short_name(&self) -> char {
        self.short_name
    }

    /// The word of the `--word` form.
    pub fn long_name(&self) -> &str {
        &self.long_name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn is_mandatory(&self) -> bool {
        self.mandatory
    }

    /// True if the option consumes an argument.
    pub fn takes_value(&self) -> bool {
        match &self.target {
            Target::Builtin(_) => false,
            Target::Bound(destination) => destination.takes_value(),
        }
    }

    /// The request this option makes of the program, if it is one of the built-ins.
    pub fn request(&self) -> Option<Request> {
        match &self.target {
            Target::Builtin(request) => Some(*request),
            Target::Bound(_) => None,
        }
    }

    // Returns the request to hand back to the caller, if any.
    fn dispatch(&mut self, value: Option<String>) -> Option<Request> {
        match &mut self.target {
            Target::Builtin(request) => Some(*request),
            Target::Bound(Destination::Flag(flag)) => {
                **flag = true;
                None
            }
            Target::Bound(Destination::Value(slot)) => {
                if let Some(value) = value {
                    **slot = value;
                }
                None
            }
        }
    }
}

///////////////////////////////////////////// LongSpec /////////////////////////////////////////////

/// One row of the long-option table handed to the scanner.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct LongSpec<'r> {
    pub name: &'r str,
    pub takes_value: bool,
    /// The short character the long form dispatches as.
    pub code: char,
}

///////////////////////////////////////////// Registry /////////////////////////////////////////////

/// An insertion-ordered list of options.  Every registry starts with `-h, --help` and
/// `-v, --version`.
#[derive(Debug)]
pub struct Registry<'a> {
    attrs: Vec<Attr<'a>>,
}

impl<'a> Registry<'a> {
    pub fn new() -> Self {
        let builtin = |short_name: char, long_name: &str, description: &str, request| Attr {
            short_name,
            long_name: long_name.to_string(),
            description: description.to_string(),
            mandatory: false,
            target: Target::Builtin(request),
        };
        Self {
            attrs: vec![
                builtin('h', "help", "display the program help", Request::Help),
                builtin('v', "version", "display the program version", Request::Version),
            ],
        }
    }

    /// Append an option bound to `destination`.
    ///
    /// The short name must be a printable ASCII character other than `-`, `:`, and `=`.  The long
    /// name must be at least two characters, must not begin with `-`, and must not contain `=` or
    /// whitespace.  Neither name may already be registered.
    pub fn add(
        &mut self,
        short_name: char,
        long_name: &str,
        description: &str,
        destination: impl Into<Destination<'a>>,
        mandatory: bool,
    ) -> Result<(), RegistrationError> {
        if !short_name.is_ascii_graphic() || ['-', ':', '='].contains(&short_name) {
            return Err(RegistrationError::InvalidShortName { short_name });
        }
        if long_name.chars().count() < 2
            || long_name.starts_with('-')
            || long_name.chars().any(|c| c == '=' || c.is_whitespace())
        {
            return Err(RegistrationError::InvalidLongName {
                long_name: long_name.to_string(),
            });
        }
        if let Some(existing) = self.find_short(short_name) {
            return Err(RegistrationError::DuplicateShortName {
                short_name,
                existing: existing.long_name.clone(),
            });
        }
        if self.find_long(long_name).is_some() {
            return Err(RegistrationError::DuplicateLongName {
                long_name: long_name.to_string(),
            });
        }
        self.attrs.push(Attr {
            short_name,
            long_name: long_name.to_string(),
            description: description.to_string(),
            mandatory,
            target: Target::Bound(destination.into()),
        });
        Ok(())
    }

    /// Iterate the options in the order they were registered.
    pub fn iter(&self) -> std::slice::Iter<'_, Attr<'a>> {
        self.attrs.iter()
    }

    pub fn len(&self) -> usize {
        self.attrs.len()
    }

    /// Always false, because the built-ins cannot be removed.
    pub fn is_empty(&self) -> bool {
        self.attrs.is_empty()
    }

    pub fn find_short(&self, short_name: char) -> Option<&Attr<'a>> {
        self.attrs.iter().find(|a| a.short_name == short_name)
    }

    pub fn find_long(&self, long_name: &str) -> Option<&Attr<'a>> {
        self.attrs.iter().find(|a| a.long_name == long_name)
    }

    /// The getopt(3)-style short option string, e.g. `"hvc:"`.
    pub fn short_spec(&self) -> String {
        let mut spec = String::with_capacity(self.attrs.len() * 2);
        for attr in self.attrs.iter() {
            spec.push(attr.short_name);
            if attr.takes_value() {
                spec.push(':');
            }
        }
        spec
    }

    /// The getopt_long(3)-style long option table.
    pub fn long_spec(&self) -> Vec<LongSpec<'_>> {
        self.attrs
            .iter()
            .map(|attr| LongSpec {
                name: &attr.long_name,
                takes_value: attr.takes_value(),
                code: attr.short_name,
            })
            .collect()
    }

    /// Describe every option to the scanner.
    pub(crate) fn add_opts(&self, opts: &mut getopts::Options) {
        for attr in self.attrs.iter() {
            let short = attr.short_name.to_string();
            if attr.takes_value() {
                opts.optmulti(&short, &attr.long_name, &attr.description, "VALUE");
            } else {
                opts.optflagmulti(&short, &attr.long_name, &attr.description);
            }
        }
    }

    pub(crate) fn dispatch(&mut self, index: usize, value: Option<String>) -> Option<Request> {
        let attr = &mut self.attrs[index];
        debug!("dispatching -{}, --{}", attr.short_name, attr.long_name);
        attr.dispatch(value)
    }
}

impl Default for Registry<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'r, 'a> IntoIterator for &'r Registry<'a> {
    type Item = &'r Attr<'a>;
    type IntoIter = std::slice::Iter<'r, Attr<'a>>;

    fn into_iter(self) -> Self::IntoIter {
        self.attrs.iter()
    }
}

/////////////////////////////////////////////// tests //////////////////////////////////////////////
