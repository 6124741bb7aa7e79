//! Node-style semantic versioning engine.
//!
//! Parses versions, orders them by SemVer 2.0 precedence and evaluates
//! node-semver range expressions against them. Repeated parses of identical
//! literals can be memoized through an [`Engine`] carrying a [`ParseCache`].

use std::cmp::{self, Ordering};
use std::fmt;
use std::sync::Arc;

use miette::{Diagnostic, SourceSpan};
use serde::{
    de::{self, Deserialize, Deserializer, Visitor},
    ser::{Serialize, Serializer},
};
use thiserror::Error;

use nom::branch::alt;
use nom::bytes::complete::{tag, take_while, take_while1};
use nom::character::complete::{digit0, digit1, one_of};
use nom::combinator::{all_consuming, map, opt, recognize};
use nom::error::{context, ContextError, ErrorKind, ParseError};
use nom::multi::separated_list1;
use nom::sequence::{pair, preceded, tuple};
use nom::{Err, IResult};

pub use cache::{CacheStats, ParseCache, DEFAULT_CAPACITY};
pub use engine::{Engine, VersionArg};
pub use range::{Comparator, ComparatorSet, Operator, Range};

mod cache;
mod engine;
mod range;

/// JavaScript's
/// [MAX_SAFE_INTEGER](https://developer.mozilla.org/en-US/docs/Web/JavaScript/Reference/Global_Objects/Number/MAX_SAFE_INTEGER).
/// This is used to determine the maximum value for integer components in a
/// JS-compatible way.
pub const MAX_SAFE_INTEGER: u64 = 9_007_199_254_740_991;

/// Maximum length of a semver string.
pub const MAX_LENGTH: usize = 256;

/**
Semver version or range parsing error wrapper.

This wrapper is used to hold some parsing-related metadata, as well as
a more specific [SemverErrorKind].
*/
#[derive(Debug, Clone, Error, Eq, PartialEq)]
#[error("{kind}")]
pub struct SemverError {
    input: String,
    span: SourceSpan,
    context: Option<&'static str>,
    kind: SemverErrorKind,
}

impl Diagnostic for SemverError {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        self.kind().code()
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match self.context {
            Some(ctx) => Some(Box::new(format!("while parsing {}", ctx))),
            None => self.kind().help(),
        }
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        Some(&self.input)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = miette::LabeledSpan> + '_>> {
        Some(Box::new(std::iter::once(
            miette::LabeledSpan::new_with_span(Some("here".into()), self.span),
        )))
    }
}

impl SemverError {
    /// Returns the input that was given to the parser.
    pub fn input(&self) -> &str {
        &self.input
    }

    /// Returns the SourceSpan of the error.
    pub fn span(&self) -> &SourceSpan {
        &self.span
    }

    /// Returns the (0-based) byte offset where the parsing error happened.
    pub fn offset(&self) -> usize {
        self.span.offset()
    }

    /// Returns the more specific [SemverErrorKind] for this error.
    ///
    /// This value can also be fetched through [std::error::Error::source],
    /// but that would require downcasting to match types.
    pub fn kind(&self) -> &SemverErrorKind {
        &self.kind
    }

    /// Returns the grammar production that was being parsed when the error
    /// happened, if the parser recorded one.
    pub fn context(&self) -> Option<&'static str> {
        self.context
    }

    /// Returns the (0-indexed) line and column number where the parsing error
    /// happened.
    pub fn location(&self) -> (usize, usize) {
        let prefix = &self.input.as_bytes()[..self.offset()];

        let line_number = bytecount::count(prefix, b'\n');

        let line_begin = prefix
            .iter()
            .rev()
            .position(|&b| b == b'\n')
            .map(|pos| self.offset() - pos)
            .unwrap_or(0);

        let line = self.input[line_begin..]
            .lines()
            .next()
            .unwrap_or(&self.input[line_begin..])
            .trim_end();

        let column_number = self.input[self.offset()..].as_ptr() as usize - line.as_ptr() as usize;

        (line_number, column_number)
    }

    pub(crate) fn from_nom(
        input: &str,
        err: Err<SemverParseError<&str>>,
        fallback: SemverErrorKind,
    ) -> Self {
        match err {
            Err::Error(e) | Err::Failure(e) => SemverError {
                input: input.into(),
                span: (e.input.as_ptr() as usize - input.as_ptr() as usize, 0).into(),
                context: e.context,
                kind: e.kind.unwrap_or(fallback),
            },
            Err::Incomplete(_) => SemverError {
                input: input.into(),
                span: (input.len().saturating_sub(1), 0).into(),
                context: None,
                kind: SemverErrorKind::IncompleteInput,
            },
        }
    }
}

/**
The specific kind of error that occurred. Usually wrapped in a [SemverError].
*/
#[derive(Debug, Clone, Error, Eq, Diagnostic, PartialEq)]
pub enum SemverErrorKind {
    /**
    Semver strings overall can't be longer than [MAX_LENGTH]. This is a
    restriction coming from the JavaScript `semver`.
    */
    #[error("Semver string can't be longer than {} characters.", MAX_LENGTH)]
    #[diagnostic(code(semver_engine::too_long))]
    MaxLengthError,

    /**
    Input was not a `major.minor.patch[-prerelease][+build]` version.
    */
    #[error("Invalid version format.")]
    #[diagnostic(
        code(semver_engine::invalid_version),
        help("expected major.minor.patch[-prerelease][+build], e.g. 1.2.3-beta.1")
    )]
    InvalidVersionFormat,

    /**
    A numeric component or numeric pre-release identifier was larger than
    [MAX_SAFE_INTEGER].
    */
    #[error(
        "Numeric component {0} is larger than JavaScript's Number.MAX_SAFE_INTEGER ({}).",
        MAX_SAFE_INTEGER
    )]
    #[diagnostic(code(semver_engine::numeric_overflow))]
    NumericOverflow(String),

    /**
    Input was not a valid range expression.
    */
    #[error("Invalid range format.")]
    #[diagnostic(
        code(semver_engine::invalid_range),
        help("ranges look like `^1.2.3`, `>=1.0.0 <2.0.0` or `1.x || 2.x`")
    )]
    InvalidRangeFormat,

    /**
    A comparator used an operator other than `<`, `<=`, `>`, `>=` or `=`.
    */
    #[error("Unknown comparator operator `{0}`.")]
    #[diagnostic(
        code(semver_engine::invalid_operator),
        help("valid operators are <, <=, >, >= and =")
    )]
    InvalidComparatorOperator(String),

    /**
    A parser asked for more input than it was given. Every grammar here
    works on complete input, so this is not raised by the parsers in this
    crate.
    */
    #[error("Incomplete input to semver parser.")]
    #[diagnostic(code(semver_engine::incomplete_input))]
    IncompleteInput,
}

#[derive(Debug)]
pub(crate) struct SemverParseError<I> {
    pub(crate) input: I,
    pub(crate) context: Option<&'static str>,
    pub(crate) kind: Option<SemverErrorKind>,
}

impl<I> ParseError<I> for SemverParseError<I> {
    fn from_error_kind(input: I, _kind: ErrorKind) -> Self {
        Self {
            input,
            context: None,
            kind: None,
        }
    }

    fn append(_input: I, _kind: ErrorKind, other: Self) -> Self {
        other
    }
}

impl<I> ContextError<I> for SemverParseError<I> {
    fn add_context(_input: I, ctx: &'static str, mut other: Self) -> Self {
        other.context.get_or_insert(ctx);
        other
    }
}

/**
Flags controlling how strictly input is read and how ranges treat
pre-release versions.
*/
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Options {
    /// Accept leading `v`/`=`, surrounding whitespace, leading zeros and a
    /// missing `-` before the pre-release.
    pub loose: bool,
    /// Let ranges match pre-release versions without an explicit
    /// pre-release comparator on the same `major.minor.patch`.
    pub include_prerelease: bool,
}

impl Options {
    pub const fn new() -> Self {
        Options {
            loose: false,
            include_prerelease: false,
        }
    }

    pub const fn with_loose(mut self, loose: bool) -> Self {
        self.loose = loose;
        self
    }

    pub const fn with_include_prerelease(mut self, include_prerelease: bool) -> Self {
        self.include_prerelease = include_prerelease;
        self
    }
}

/**
An Identifier type for build and prerelease metadata.
*/
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Identifier {
    /// An identifier that's solely numbers.
    Numeric(u64),
    /// An identifier with letters and numbers.
    AlphaNumeric(String),
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Identifier::Numeric(n) => write!(f, "{}", n),
            Identifier::AlphaNumeric(s) => write!(f, "{}", s),
        }
    }
}

/**
A semantic version, conformant to the [semver spec](https://semver.org/spec/v2.0.0.html).

Ordering, equality and hashing only look at `major`, `minor`, `patch` and
`pre_release`. Build metadata, the raw input and the parse options are
carried along for rendering and diagnostics.
*/
#[derive(Clone, Debug)]
pub struct Version {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
    pub pre_release: Vec<Identifier>,
    pub build: Vec<String>,
    raw: Option<Arc<str>>,
    options: Options,
}

impl Version {
    /// Creates a release version with no pre-release or build metadata.
    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        Version {
            major,
            minor,
            patch,
            pre_release: Vec::new(),
            build: Vec::new(),
            raw: None,
            options: Options::default(),
        }
    }

    /// True if this [Version] has a non-empty pre-release.
    pub fn is_prerelease(&self) -> bool {
        !self.pre_release.is_empty()
    }

    /// The input this version was parsed from, if it was parsed at all.
    pub fn raw(&self) -> Option<&str> {
        self.raw.as_deref()
    }

    /// The options this version was parsed with.
    pub fn options(&self) -> Options {
        self.options
    }

    /// True if this [Version] satisfies the given [Range].
    pub fn satisfies(&self, range: &Range) -> bool {
        range.satisfies(self)
    }

    /**
    Three-way SemVer comparison against either another [Version] or a
    version string. Strings are parsed with this version's options, and a
    malformed string is reported instead of being ordered.
    */
    pub fn compare<V: VersionArg + ?Sized>(&self, other: &V) -> Result<Ordering, SemverError> {
        let other = other.resolve(&Engine::uncached(), self.options)?;
        Ok(self.cmp(&other))
    }

    /// Parse a semver string into a [Version] using the strict grammar.
    pub fn parse<S: AsRef<str>>(input: S) -> Result<Version, SemverError> {
        parse_version(input.as_ref(), Options::default())
    }

    /// Parse a semver string into a [Version] with the given [Options].
    pub fn parse_with<S: AsRef<str>>(input: S, options: Options) -> Result<Version, SemverError> {
        parse_version(input.as_ref(), options)
    }

    pub(crate) fn without_build(self) -> Self {
        Version {
            build: Vec::new(),
            ..self
        }
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.major == other.major
            && self.minor == other.minor
            && self.patch == other.patch
            && self.pre_release == other.pre_release
    }
}

impl Eq for Version {}

impl std::hash::Hash for Version {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.major.hash(state);
        self.minor.hash(state);
        self.patch.hash(state);
        self.pre_release.hash(state);
    }
}

impl cmp::PartialOrd for Version {
    fn partial_cmp(&self, other: &Version) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl cmp::Ord for Version {
    fn cmp(&self, other: &Version) -> Ordering {
        match self.major.cmp(&other.major) {
            Ordering::Equal => {}
            order => return order,
        }
        match self.minor.cmp(&other.minor) {
            Ordering::Equal => {}
            order => return order,
        }
        match self.patch.cmp(&other.patch) {
            Ordering::Equal => {}
            order => return order,
        }

        // A release outranks any of its pre-releases. Otherwise identifiers
        // compare pairwise (numeric < alphanumeric) and a shorter prefix
        // sorts first, which is exactly slice ordering.
        match (self.is_prerelease(), other.is_prerelease()) {
            (false, false) => Ordering::Equal,
            (false, true) => Ordering::Greater,
            (true, false) => Ordering::Less,
            (true, true) => self.pre_release.cmp(&other.pre_release),
        }
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)?;
        for (i, ident) in self.pre_release.iter().enumerate() {
            f.write_str(if i == 0 { "-" } else { "." })?;
            write!(f, "{}", ident)?;
        }
        for (i, ident) in self.build.iter().enumerate() {
            f.write_str(if i == 0 { "+" } else { "." })?;
            f.write_str(ident)?;
        }
        Ok(())
    }
}

impl std::str::FromStr for Version {
    type Err = SemverError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Version::parse(s)
    }
}

impl From<(u64, u64, u64)> for Version {
    fn from(tuple: (u64, u64, u64)) -> Self {
        let (major, minor, patch) = tuple;
        Version::new(major, minor, patch)
    }
}

impl From<(u64, u64, u64, u64)> for Version {
    fn from(tuple: (u64, u64, u64, u64)) -> Self {
        let (major, minor, patch, pre_release) = tuple;
        Version {
            pre_release: vec![Identifier::Numeric(pre_release)],
            ..Version::new(major, minor, patch)
        }
    }
}

impl Serialize for Version {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Version {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct VersionVisitor;

        impl<'de> Visitor<'de> for VersionVisitor {
            type Value = Version;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a semver version as a string")
            }

            fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                Version::parse(v).map_err(de::Error::custom)
            }
        }

        deserializer.deserialize_str(VersionVisitor)
    }
}

/// Parse a version with the strict grammar, without any caching.
pub fn parse<S: AsRef<str>>(input: S) -> Result<Version, SemverError> {
    Version::parse(input)
}

/**
Compare two versions, each given as a [Version] or a string. Strings are
parsed strictly; a malformed one is returned as an error rather than ordered.
*/
pub fn compare<A, B>(a: &A, b: &B) -> Result<Ordering, SemverError>
where
    A: VersionArg + ?Sized,
    B: VersionArg + ?Sized,
{
    Engine::uncached().compare(a, b, Options::default())
}

/// Parse `range` and check whether `version` satisfies it.
pub fn satisfies<V: VersionArg + ?Sized>(version: &V, range: &str) -> Result<bool, SemverError> {
    Engine::uncached().satisfies(version, range, Options::default())
}

pub(crate) fn parse_version(input: &str, options: Options) -> Result<Version, SemverError> {
    if input.len() > MAX_LENGTH {
        // Point at the first whole character past the limit.
        let start = (0..=MAX_LENGTH)
            .rev()
            .find(|&i| input.is_char_boundary(i))
            .unwrap_or(0);
        return Err(SemverError {
            input: input.into(),
            span: (start, input.len() - start).into(),
            context: None,
            kind: SemverErrorKind::MaxLengthError,
        });
    }

    let trimmed = if options.loose { input.trim() } else { input };

    match all_consuming(version(options.loose))(trimmed) {
        Ok((_, version)) => Ok(Version {
            raw: Some(input.into()),
            options,
            ..version
        }),
        Err(err) => Err(SemverError::from_nom(
            input,
            err,
            SemverErrorKind::InvalidVersionFormat,
        )),
    }
}

// ---- Parser ----

/*
Grammar from https://semver.org/spec/v2.0.0.html#backusnaur-form-grammar-for-valid-semver-versions

version    ::= core ( '-' pre )? ( '+' build )?
core       ::= nr '.' nr '.' nr
nr         ::= '0' | ['1'-'9'] ( ['0'-'9'] ) *
pre        ::= pre-part ( '.' pre-part ) *
pre-part   ::= nr | [-0-9A-Za-z]+
build      ::= part ( '.' part ) *
part       ::= [-0-9A-Za-z]+

Loose mode:
* leading `v`, `V`, `=` and whitespace are skipped: ` v1.2.3 ` -> 1.2.3
* leading zeros are accepted: 01.02.03 -> 1.2.3
* the pre-release dash is optional: 1.2.3beta -> 1.2.3-beta
*/

fn version<'a>(
    loose: bool,
) -> impl FnMut(&'a str) -> IResult<&'a str, Version, SemverParseError<&'a str>> {
    move |input| {
        let (input, _) = if loose {
            loose_prefix(input)?
        } else {
            (input, ())
        };
        let (input, (major, minor, patch)) = version_core(loose)(input)?;
        let (input, (pre_release, build)) = extras(loose)(input)?;
        Ok((
            input,
            Version {
                pre_release,
                build,
                ..Version::new(major, minor, patch)
            },
        ))
    }
}

fn loose_prefix(input: &str) -> IResult<&str, (), SemverParseError<&str>> {
    map(
        take_while(|c: char| matches!(c, 'v' | 'V' | '=' | ' ' | '\t')),
        |_| (),
    )(input)
}

fn version_core<'a>(
    loose: bool,
) -> impl FnMut(&'a str) -> IResult<&'a str, (u64, u64, u64), SemverParseError<&'a str>> {
    move |input| {
        context(
            "version core",
            tuple((
                number(loose),
                preceded(tag("."), number(loose)),
                preceded(tag("."), number(loose)),
            )),
        )(input)
    }
}

pub(crate) fn extras<'a>(
    loose: bool,
) -> impl FnMut(&'a str) -> IResult<&'a str, (Vec<Identifier>, Vec<String>), SemverParseError<&'a str>>
{
    move |input| {
        map(
            tuple((opt(pre_release(loose)), opt(build))),
            |(pre, build)| (pre.unwrap_or_default(), build.unwrap_or_default()),
        )(input)
    }
}

fn pre_release<'a>(
    loose: bool,
) -> impl FnMut(&'a str) -> IResult<&'a str, Vec<Identifier>, SemverParseError<&'a str>> {
    move |input| {
        let (input, dash) = dash(input)?;
        if dash.is_none() && !loose {
            return Err(Err::Error(SemverParseError::from_error_kind(
                input,
                ErrorKind::Tag,
            )));
        }
        context(
            "pre-release version",
            separated_list1(tag("."), pre_release_identifier(loose)),
        )(input)
    }
}

fn dash(input: &str) -> IResult<&str, Option<&str>, SemverParseError<&str>> {
    opt(tag("-"))(input)
}

fn build(input: &str) -> IResult<&str, Vec<String>, SemverParseError<&str>> {
    context(
        "build metadata",
        preceded(
            tag("+"),
            separated_list1(tag("."), map(identifier_chars, String::from)),
        ),
    )(input)
}

fn identifier_chars(input: &str) -> IResult<&str, &str, SemverParseError<&str>> {
    take_while1(|c: char| c.is_ascii_alphanumeric() || c == '-')(input)
}

fn pre_release_identifier<'a>(
    loose: bool,
) -> impl FnMut(&'a str) -> IResult<&'a str, Identifier, SemverParseError<&'a str>> {
    move |input| {
        let (rest, raw) = identifier_chars(input)?;
        if !raw.bytes().all(|b| b.is_ascii_digit()) {
            return Ok((rest, Identifier::AlphaNumeric(raw.into())));
        }
        if !loose && raw.len() > 1 && raw.starts_with('0') {
            return Err(Err::Failure(SemverParseError {
                input,
                context: Some("numeric pre-release identifier without leading zeros"),
                kind: Some(SemverErrorKind::InvalidVersionFormat),
            }));
        }
        let value = safe_integer(input, raw)?;
        Ok((rest, Identifier::Numeric(value)))
    }
}

/// A numeric component. Strict mode rejects leading zeros; loose mode takes
/// any run of digits.
pub(crate) fn number<'a>(
    loose: bool,
) -> impl FnMut(&'a str) -> IResult<&'a str, u64, SemverParseError<&'a str>> {
    move |input| {
        let (rest, raw) = digits(loose, input)?;
        let value = safe_integer(input, raw)?;
        Ok((rest, value))
    }
}

fn digits(loose: bool, input: &str) -> IResult<&str, &str, SemverParseError<&str>> {
    if loose {
        digit1(input)
    } else {
        alt((tag("0"), recognize(pair(one_of("123456789"), digit0))))(input)
    }
}

fn safe_integer<'a>(
    input: &'a str,
    digits: &'a str,
) -> Result<u64, Err<SemverParseError<&'a str>>> {
    match digits.parse::<u64>() {
        Ok(value) if value <= MAX_SAFE_INTEGER => Ok(value),
        _ => Err(Err::Failure(SemverParseError {
            input,
            context: None,
            kind: Some(SemverErrorKind::NumericOverflow(digits.into())),
        })),
    }
}
