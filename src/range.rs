use std::cmp::Ordering;
use std::convert::Infallible;
use std::fmt;

use serde::{
    de::{self, Deserialize, Deserializer, Visitor},
    ser::{Serialize, Serializer},
};

use nom::branch::alt;
use nom::bytes::complete::{tag, take_while1};
use nom::character::complete::{multispace0, multispace1, space0};
use nom::combinator::{all_consuming, consumed, eof, map, opt, peek};
use nom::error::context;
use nom::multi::{separated_list0, separated_list1};
use nom::sequence::{delimited, preceded, terminated, tuple};
use nom::{Err, IResult};

use crate::cache::ParseCache;
use crate::engine::{Engine, VersionArg};
use crate::{
    extras, number, Identifier, Options, SemverError, SemverErrorKind, SemverParseError, Version,
    MAX_LENGTH,
};

/// Comparison operator of a single [Comparator].
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Operator {
    Exact,
    GreaterThan,
    GreaterThanEquals,
    LessThan,
    LessThanEquals,
}

impl Operator {
    fn admits(self, ordering: Ordering) -> bool {
        use Operator::*;
        match self {
            Exact => ordering == Ordering::Equal,
            GreaterThan => ordering == Ordering::Greater,
            GreaterThanEquals => ordering != Ordering::Less,
            LessThan => ordering == Ordering::Less,
            LessThanEquals => ordering != Ordering::Greater,
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use Operator::*;
        match self {
            Exact => write!(f, ""),
            GreaterThan => write!(f, ">"),
            GreaterThanEquals => write!(f, ">="),
            LessThan => write!(f, "<"),
            LessThanEquals => write!(f, "<="),
        }
    }
}

/// One inequality constraint: an [Operator] applied to a [Version].
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct Comparator {
    operator: Operator,
    version: Version,
}

impl Comparator {
    pub fn new(operator: Operator, version: Version) -> Self {
        Comparator { operator, version }
    }

    pub fn operator(&self) -> Operator {
        self.operator
    }

    pub fn version(&self) -> &Version {
        &self.version
    }

    /// True if `version` compares to this comparator's operand the way the
    /// operator demands. Pre-release exclusion is a [Range] concern and is
    /// not applied here.
    pub fn matches(&self, version: &Version) -> bool {
        self.operator.admits(version.cmp(&self.version))
    }

    fn same_release_prerelease(&self, version: &Version) -> bool {
        self.version.is_prerelease()
            && self.version.major == version.major
            && self.version.minor == version.minor
            && self.version.patch == version.patch
    }
}

impl fmt::Display for Comparator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.operator, self.version)
    }
}

/// Comparators that must all hold. An empty set admits every release.
#[derive(Debug, Clone, Default, Eq, PartialEq, Hash)]
pub struct ComparatorSet(Vec<Comparator>);

impl ComparatorSet {
    pub fn comparators(&self) -> &[Comparator] {
        &self.0
    }

    /// True if this set has no comparators, i.e. came from `*` or an empty
    /// segment.
    pub fn is_any(&self) -> bool {
        self.0.is_empty()
    }

    fn satisfies(&self, version: &Version, include_prerelease: bool) -> bool {
        if !self.0.iter().all(|c| c.matches(version)) {
            return false;
        }

        // A pre-release only gets in when some comparator names a
        // pre-release of the same major.minor.patch.
        if version.is_prerelease() && !include_prerelease {
            return self.0.iter().any(|c| c.same_release_prerelease(version));
        }

        true
    }

    fn interval(&self) -> Interval<'_> {
        self.0
            .iter()
            .fold(Interval::unbounded(), |interval, c| interval.tighten(c))
    }
}

impl fmt::Display for ComparatorSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return write!(f, "*");
        }
        for (i, comparator) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{}", comparator)?;
        }
        Ok(())
    }
}

// Lower/upper edges of the versions a ComparatorSet admits, ignoring the
// pre-release rule.
#[derive(Debug, Clone, Copy)]
enum Edge<'a> {
    Unbounded,
    Including(&'a Version),
    Excluding(&'a Version),
}

impl<'a> Edge<'a> {
    fn version(self) -> Option<&'a Version> {
        match self {
            Edge::Unbounded => None,
            Edge::Including(v) | Edge::Excluding(v) => Some(v),
        }
    }

    fn is_excluding(self) -> bool {
        matches!(self, Edge::Excluding(_))
    }

    // Whether `self` cuts off more than `other` from the side given by
    // `towards` (Greater for lower edges, Less for upper edges).
    fn tighter_than(self, other: Edge<'a>, towards: Ordering) -> bool {
        match (self.version(), other.version()) {
            (None, _) => false,
            (Some(_), None) => true,
            (Some(a), Some(b)) => match a.cmp(b) {
                Ordering::Equal => self.is_excluding() && !other.is_excluding(),
                order => order == towards,
            },
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Interval<'a> {
    lower: Edge<'a>,
    upper: Edge<'a>,
}

impl<'a> Interval<'a> {
    fn unbounded() -> Self {
        Interval {
            lower: Edge::Unbounded,
            upper: Edge::Unbounded,
        }
    }

    fn raise(mut self, edge: Edge<'a>) -> Self {
        if edge.tighter_than(self.lower, Ordering::Greater) {
            self.lower = edge;
        }
        self
    }

    fn cap(mut self, edge: Edge<'a>) -> Self {
        if edge.tighter_than(self.upper, Ordering::Less) {
            self.upper = edge;
        }
        self
    }

    fn tighten(self, comparator: &'a Comparator) -> Self {
        use Operator::*;
        let v = &comparator.version;
        match comparator.operator {
            GreaterThan => self.raise(Edge::Excluding(v)),
            GreaterThanEquals => self.raise(Edge::Including(v)),
            LessThan => self.cap(Edge::Excluding(v)),
            LessThanEquals => self.cap(Edge::Including(v)),
            Exact => self.raise(Edge::Including(v)).cap(Edge::Including(v)),
        }
    }

    fn intersect(self, other: Interval<'a>) -> Self {
        self.raise(other.lower).cap(other.upper)
    }

    fn is_empty(self) -> bool {
        // 0.0.0-0 is the lowest version there is.
        let floor = Version::from((0, 0, 0, 0));
        let lower = match self.lower {
            Edge::Unbounded => Edge::Including(&floor),
            edge => edge,
        };
        match (lower.version(), self.upper.version()) {
            (Some(low), Some(high)) => match low.cmp(high) {
                Ordering::Greater => true,
                Ordering::Equal => lower.is_excluding() || self.upper.is_excluding(),
                Ordering::Less => false,
            },
            _ => false,
        }
    }
}

/**
Node-style semver range.

A range is a union of [ComparatorSet]s: a version satisfies it if it
satisfies every comparator of at least one set. Shorthands such as `^1.2.3`,
`~1.2`, `1.x` or `1.0.0 - 2.0.0` are expanded into explicit comparators at
parse time.

For details on supported syntax, see https://github.com/npm/node-semver#advanced-range-syntax
*/
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct Range {
    sets: Vec<ComparatorSet>,
    options: Options,
}

impl Range {
    /**
    Parse a range from a string.
    */
    pub fn parse<S: AsRef<str>>(input: S) -> Result<Self, SemverError> {
        parse_range(input.as_ref(), Options::default(), None)
    }

    /**
    Parse a range from a string with the given [Options]. `include_prerelease`
    is remembered and applied by [Range::satisfies].
    */
    pub fn parse_with<S: AsRef<str>>(input: S, options: Options) -> Result<Self, SemverError> {
        parse_range(input.as_ref(), options, None)
    }

    /**
    Creates a new range that matches any version.
    */
    pub fn any() -> Self {
        Range {
            sets: vec![ComparatorSet::default()],
            options: Options::default(),
        }
    }

    /**
    Creates a new range that matches no version at all.
    */
    pub fn none() -> Self {
        Range {
            sets: Vec::new(),
            options: Options::default(),
        }
    }

    pub fn sets(&self) -> &[ComparatorSet] {
        &self.sets
    }

    pub fn options(&self) -> Options {
        self.options
    }

    /**
    Returns true if `version` is satisfied by this range.
    */
    pub fn satisfies(&self, version: &Version) -> bool {
        self.sets
            .iter()
            .any(|set| set.satisfies(version, self.options.include_prerelease))
    }

    /**
    Like [Range::satisfies], but also takes version strings, parsed with this
    range's options. A string that isn't a version never satisfies.
    */
    pub fn test<V: VersionArg + ?Sized>(&self, version: &V) -> bool {
        version
            .resolve(&Engine::uncached(), self.options)
            .map(|version| self.satisfies(&version))
            .unwrap_or(false)
    }

    /**
    Returns true if some version is admitted by both this range and `other`.
    The pre-release exclusion rule is not taken into account.
    */
    pub fn intersects(&self, other: &Range) -> bool {
        self.sets.iter().any(|this| {
            other
                .sets
                .iter()
                .any(|that| !this.interval().intersect(that.interval()).is_empty())
        })
    }

    /**
    Returns the lowest version that satisfies this range, if any.
    */
    pub fn min_version(&self) -> Option<Version> {
        let zero = Version::new(0, 0, 0);
        if self.satisfies(&zero) {
            return Some(zero);
        }
        let zero = Version::from((0, 0, 0, 0));
        if self.satisfies(&zero) {
            return Some(zero);
        }

        let mut minimum: Option<Version> = None;
        for set in &self.sets {
            let mut set_minimum: Option<Version> = None;
            for comparator in set.comparators() {
                let candidate = match comparator.operator {
                    Operator::GreaterThan => successor(&comparator.version),
                    Operator::GreaterThanEquals | Operator::Exact => comparator.version.clone(),
                    Operator::LessThan | Operator::LessThanEquals => continue,
                };
                if set_minimum.as_ref().map_or(true, |m| candidate > *m) {
                    set_minimum = Some(candidate);
                }
            }
            if let Some(candidate) = set_minimum {
                if minimum.as_ref().map_or(true, |m| candidate < *m) {
                    minimum = Some(candidate);
                }
            }
        }

        minimum.filter(|version| self.satisfies(version))
    }

    /**
    Returns the highest of `versions` that satisfies this range.
    */
    pub fn max_satisfying<'v, I>(&self, versions: I) -> Option<&'v Version>
    where
        I: IntoIterator<Item = &'v Version>,
    {
        versions.into_iter().filter(|v| self.satisfies(v)).max()
    }

    /**
    Returns the lowest of `versions` that satisfies this range.
    */
    pub fn min_satisfying<'v, I>(&self, versions: I) -> Option<&'v Version>
    where
        I: IntoIterator<Item = &'v Version>,
    {
        versions.into_iter().filter(|v| self.satisfies(v)).min()
    }
}

// The smallest version greater than `version` that `>version` can produce.
fn successor(version: &Version) -> Version {
    let mut next = version.clone().without_build();
    if next.is_prerelease() {
        next.pre_release.push(Identifier::Numeric(0));
    } else {
        next.patch += 1;
    }
    next
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.sets.is_empty() {
            return write!(f, "<0.0.0-0");
        }
        for (i, set) in self.sets.iter().enumerate() {
            if i > 0 {
                write!(f, "||")?;
            }
            write!(f, "{}", set)?;
        }
        Ok(())
    }
}

impl std::str::FromStr for Range {
    type Err = SemverError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Range::parse(s)
    }
}

impl Serialize for Range {
    fn serialize<S>(&self, serializer: S) -> ::std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Range {
    fn deserialize<D>(deserializer: D) -> ::std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct RangeVisitor;

        impl<'de> Visitor<'de> for RangeVisitor {
            type Value = Range;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a semver range as a string")
            }

            fn visit_str<E>(self, v: &str) -> ::std::result::Result<Self::Value, E>
            where
                E: de::Error,
            {
                Range::parse(v).map_err(de::Error::custom)
            }
        }

        deserializer.deserialize_str(RangeVisitor)
    }
}

pub(crate) fn parse_range(
    input: &str,
    options: Options,
    cache: Option<&ParseCache>,
) -> Result<Range, SemverError> {
    match all_consuming(range_set)(input.trim()) {
        Ok((_, sets)) => {
            let expander = Expander {
                cache,
                options: options.with_loose(true),
            };
            let sets = sets
                .into_iter()
                .map(|set| {
                    ComparatorSet(
                        set.into_iter()
                            .flat_map(|shorthand| expander.expand(shorthand))
                            .collect(),
                    )
                })
                .collect();
            Ok(Range { sets, options })
        }
        Err(err) => Err(SemverError::from_nom(
            input,
            err,
            SemverErrorKind::InvalidRangeFormat,
        )),
    }
}

// ---- Parser ----

/*
Grammar from https://github.com/npm/node-semver#range-grammar

range-set  ::= range ( logical-or range ) *
logical-or ::= ( ' ' ) * '||' ( ' ' ) *
range      ::= hyphen | simple ( ' ' simple ) * | ''
hyphen     ::= partial ' - ' partial
simple     ::= primitive | partial | tilde | caret
primitive  ::= ( '<' | '>' | '>=' | '<=' | '=' ) partial
partial    ::= xr ( '.' xr ( '.' xr qualifier ? )? )?
xr         ::= 'x' | 'X' | '*' | nr
nr         ::= '0' | ['1'-'9'] ( ['0'-'9'] ) *
tilde      ::= '~' partial
caret      ::= '^' partial
qualifier  ::= ( '-' pre )? ( '+' build )?
pre        ::= parts
build      ::= parts
parts      ::= part ( '.' part ) *
part       ::= nr | [-0-9A-Za-z]+

Operands are always read loosely: `>=v1.2.3`, `> 01.02.03` and `~1.2.3beta`
are accepted. Anything else that doesn't fit fails the whole range.
*/

// A version with possibly-missing components, as written in a range.
#[derive(Debug, Clone)]
struct Partial<'a> {
    raw: &'a str,
    major: Option<u64>,
    minor: Option<u64>,
    patch: Option<u64>,
    pre_release: Vec<Identifier>,
    build: Vec<String>,
}

impl Partial<'_> {
    fn is_complete(&self) -> bool {
        self.major.is_some() && self.minor.is_some() && self.patch.is_some()
    }

    fn into_version(self, options: Options) -> Version {
        let version = Version {
            pre_release: self.pre_release,
            build: self.build,
            ..Version::new(
                self.major.unwrap_or(0),
                self.minor.unwrap_or(0),
                self.patch.unwrap_or(0),
            )
        };
        Version {
            raw: Some(self.raw.into()),
            options,
            ..version
        }
    }
}

#[derive(Debug, Clone)]
enum Shorthand<'a> {
    Primitive(Operator, Partial<'a>),
    Wildcard(Partial<'a>),
    Tilde(Partial<'a>),
    Caret(Partial<'a>),
    Hyphen(Partial<'a>, Partial<'a>),
}

// range-set ::= range ( logical-or range ) *
fn range_set(input: &str) -> IResult<&str, Vec<Vec<Shorthand<'_>>>, SemverParseError<&str>> {
    separated_list1(logical_or, range)(input)
}

// logical-or ::= ( ' ' ) * '||' ( ' ' ) *
fn logical_or(input: &str) -> IResult<&str, (), SemverParseError<&str>> {
    map(delimited(multispace0, tag("||"), multispace0), |_| ())(input)
}

fn range(input: &str) -> IResult<&str, Vec<Shorthand<'_>>, SemverParseError<&str>> {
    separated_list0(multispace1, simple)(input)
}

fn boundary(input: &str) -> IResult<&str, &str, SemverParseError<&str>> {
    peek(alt((multispace1, tag("||"), eof)))(input)
}

// simple ::= primitive | partial | tilde | caret
fn simple(input: &str) -> IResult<&str, Shorthand<'_>, SemverParseError<&str>> {
    alt((
        terminated(hyphen, boundary),
        terminated(primitive, boundary),
        terminated(partial, boundary),
        terminated(tilde, boundary),
        terminated(caret, boundary),
    ))(input)
}

// primitive  ::= ( '<' | '>' | '>=' | '<=' | '=' ) partial
fn primitive(input: &str) -> IResult<&str, Shorthand<'_>, SemverParseError<&str>> {
    context(
        "operation range (ex: >= 1.2.3)",
        map(
            tuple((operation, preceded(space0, partial_version))),
            |(operation, partial)| Shorthand::Primitive(operation, partial),
        ),
    )(input)
}

fn operation(input: &str) -> IResult<&str, Operator, SemverParseError<&str>> {
    use Operator::*;
    let (rest, token) = operator_chars(input)?;
    let operation = match token {
        ">=" => GreaterThanEquals,
        ">" => GreaterThan,
        "=" => Exact,
        "<=" => LessThanEquals,
        "<" => LessThan,
        _ => {
            return Err(Err::Failure(SemverParseError {
                input,
                context: None,
                kind: Some(SemverErrorKind::InvalidComparatorOperator(token.into())),
            }))
        }
    };
    Ok((rest, operation))
}

fn operator_chars(input: &str) -> IResult<&str, &str, SemverParseError<&str>> {
    take_while1(|c: char| matches!(c, '<' | '>' | '=' | '!'))(input)
}

fn partial(input: &str) -> IResult<&str, Shorthand<'_>, SemverParseError<&str>> {
    context(
        "plain version range (ex: 1.2)",
        map(partial_version, |partial| {
            if partial.is_complete() {
                Shorthand::Primitive(Operator::Exact, partial)
            } else {
                Shorthand::Wildcard(partial)
            }
        }),
    )(input)
}

// partial ::= xr ( '.' xr ( '.' xr qualifier ? )? )?
// xr      ::= 'x' | 'X' | '*' | nr
// nr      ::= '0' | ['1'-'9'] ( ['0'-'9'] ) *
// NOTE: Loose mode means nr is actually just `['0'-'9']`.
fn partial_version(input: &str) -> IResult<&str, Partial<'_>, SemverParseError<&str>> {
    map(
        consumed(partial_components),
        |(raw, (major, minor, patch, (pre_release, build)))| Partial {
            raw,
            major,
            minor,
            patch,
            pre_release,
            build,
        },
    )(input)
}

type Components = (
    Option<u64>,
    Option<u64>,
    Option<u64>,
    (Vec<Identifier>, Vec<String>),
);

fn partial_components(input: &str) -> IResult<&str, Components, SemverParseError<&str>> {
    let (input, _) = opt(alt((tag("v"), tag("V"))))(input)?;
    let (input, _) = space0(input)?;
    let (input, major) = component(input)?;
    let (input, minor) = opt(preceded(tag("."), component))(input)?;
    let (input, patch) = if minor.is_some() {
        opt(preceded(tag("."), component))(input)?
    } else {
        (input, None)
    };
    let (input, extras) = if patch.is_some() {
        extras(true)(input)?
    } else {
        (input, (Vec::new(), Vec::new()))
    };
    Ok((input, (major, minor.flatten(), patch.flatten(), extras)))
}

fn component(input: &str) -> IResult<&str, Option<u64>, SemverParseError<&str>> {
    alt((map(x_or_asterisk, |_| None), map(number(true), Some)))(input)
}

fn x_or_asterisk(input: &str) -> IResult<&str, (), SemverParseError<&str>> {
    map(alt((tag("x"), tag("X"), tag("*"))), |_| ())(input)
}

fn tilde_gt(input: &str) -> IResult<&str, Option<&str>, SemverParseError<&str>> {
    map(
        tuple((tag("~"), space0, opt(tag(">")), space0)),
        |(_, _, gt, _)| gt,
    )(input)
}

fn tilde(input: &str) -> IResult<&str, Shorthand<'_>, SemverParseError<&str>> {
    context(
        "tilde version range (ex: ~1.2.3)",
        map(preceded(tilde_gt, partial_version), Shorthand::Tilde),
    )(input)
}

fn caret(input: &str) -> IResult<&str, Shorthand<'_>, SemverParseError<&str>> {
    context(
        "caret version range (ex: ^1.2.3)",
        map(
            preceded(tuple((tag("^"), space0)), partial_version),
            Shorthand::Caret,
        ),
    )(input)
}

// hyphen ::= partial ' - ' partial
fn hyphen(input: &str) -> IResult<&str, Shorthand<'_>, SemverParseError<&str>> {
    context(
        "hyphenated version range (ex: 1.2 - 2)",
        map(
            tuple((partial_version, multispace1, tag("-"), multispace1, partial_version)),
            |(lower, _, _, _, upper)| Shorthand::Hyphen(lower, upper),
        ),
    )(input)
}

// ---- Expansion ----

// Turns each shorthand into the explicit comparators it stands for. Complete
// operands are read through the version cache when one is available.
struct Expander<'c> {
    cache: Option<&'c ParseCache>,
    options: Options,
}

fn gte<V: Into<Version>>(version: V) -> Comparator {
    Comparator::new(Operator::GreaterThanEquals, version.into())
}

fn lt<V: Into<Version>>(version: V) -> Comparator {
    Comparator::new(Operator::LessThan, version.into())
}

impl Expander<'_> {
    // Lower bound synthesized from a partial operand. With
    // `include_prerelease` it starts at the `-0` pre-release so that
    // pre-releases of the floor itself are admitted.
    fn floor(&self, major: u64, minor: u64, patch: u64) -> Comparator {
        if self.options.include_prerelease {
            gte((major, minor, patch, 0))
        } else {
            gte((major, minor, patch))
        }
    }

    // The operand as a full version, build metadata dropped. Only complete
    // operands are cached, under exactly the key a loose parse of the same
    // text would use.
    fn operand(&self, partial: Partial<'_>) -> Version {
        let options = self.options;
        let version = match self.cache {
            Some(cache) if partial.is_complete() && partial.raw.len() <= MAX_LENGTH => {
                let raw = partial.raw;
                cache
                    .versions()
                    .get_or_try_insert_with(raw, options, || {
                        Ok::<_, Infallible>(partial.into_version(options))
                    })
                    .unwrap_or_else(|never| match never {})
            }
            _ => partial.into_version(options),
        };
        version.without_build()
    }

    fn expand(&self, shorthand: Shorthand<'_>) -> Vec<Comparator> {
        match shorthand {
            Shorthand::Primitive(operator, partial) => self.primitive(operator, partial),
            Shorthand::Wildcard(partial) => self.wildcard(partial),
            Shorthand::Tilde(partial) => self.tilde(partial),
            Shorthand::Caret(partial) => self.caret(partial),
            Shorthand::Hyphen(lower, upper) => self.hyphen(lower, upper),
        }
    }

    fn wildcard(&self, partial: Partial<'_>) -> Vec<Comparator> {
        match (partial.major, partial.minor, partial.patch) {
            (None, _, _) => vec![],
            (Some(major), None, _) => vec![self.floor(major, 0, 0), lt((major + 1, 0, 0, 0))],
            (Some(major), Some(minor), None) => {
                vec![self.floor(major, minor, 0), lt((major, minor + 1, 0, 0))]
            }
            (Some(_), Some(_), Some(_)) => {
                vec![Comparator::new(Operator::Exact, self.operand(partial))]
            }
        }
    }

    fn primitive(&self, operator: Operator, partial: Partial<'_>) -> Vec<Comparator> {
        use Operator::*;
        match (operator, partial.major, partial.minor) {
            _ if partial.is_complete() => vec![Comparator::new(operator, self.operand(partial))],
            (GreaterThan, None, _) | (LessThan, None, _) => vec![lt((0, 0, 0, 0))],
            (_, None, _) => vec![],
            (Exact, _, _) => self.wildcard(partial),
            (GreaterThanEquals, Some(major), minor) => {
                vec![self.floor(major, minor.unwrap_or(0), 0)]
            }
            (GreaterThan, Some(major), None) => vec![self.floor(major + 1, 0, 0)],
            (GreaterThan, Some(major), Some(minor)) => vec![self.floor(major, minor + 1, 0)],
            (LessThan, Some(major), minor) => vec![lt((major, minor.unwrap_or(0), 0, 0))],
            (LessThanEquals, Some(major), None) => vec![lt((major + 1, 0, 0, 0))],
            (LessThanEquals, Some(major), Some(minor)) => vec![lt((major, minor + 1, 0, 0))],
        }
    }

    fn tilde(&self, partial: Partial<'_>) -> Vec<Comparator> {
        match (partial.major, partial.minor, partial.patch) {
            (None, _, _) => vec![],
            (Some(major), None, _) => vec![self.floor(major, 0, 0), lt((major + 1, 0, 0, 0))],
            (Some(major), Some(minor), None) => {
                vec![self.floor(major, minor, 0), lt((major, minor + 1, 0, 0))]
            }
            (Some(major), Some(minor), Some(_)) => {
                vec![gte(self.operand(partial)), lt((major, minor + 1, 0, 0))]
            }
        }
    }

    // Allows changes that keep the left-most non-zero component.
    fn caret(&self, partial: Partial<'_>) -> Vec<Comparator> {
        match (partial.major, partial.minor, partial.patch) {
            (None, _, _) => vec![],
            (Some(major), None, _) => vec![self.floor(major, 0, 0), lt((major + 1, 0, 0, 0))],
            (Some(0), Some(minor), None) => vec![self.floor(0, minor, 0), lt((0, minor + 1, 0, 0))],
            (Some(major), Some(minor), None) => {
                vec![self.floor(major, minor, 0), lt((major + 1, 0, 0, 0))]
            }
            (Some(major), Some(minor), Some(patch)) => {
                let upper = match (major, minor, patch) {
                    (0, 0, patch) => (0, 0, patch + 1, 0),
                    (0, minor, _) => (0, minor + 1, 0, 0),
                    (major, _, _) => (major + 1, 0, 0, 0),
                };
                vec![gte(self.operand(partial)), lt(upper)]
            }
        }
    }

    fn hyphen(&self, lower: Partial<'_>, upper: Partial<'_>) -> Vec<Comparator> {
        let mut comparators = Vec::with_capacity(2);

        match (lower.major, lower.minor) {
            (None, _) => {}
            _ if lower.is_complete() => comparators.push(gte(self.operand(lower))),
            (Some(major), minor) => comparators.push(self.floor(major, minor.unwrap_or(0), 0)),
        }

        match (upper.major, upper.minor, upper.patch) {
            (None, _, _) => {}
            (Some(major), None, _) => comparators.push(lt((major + 1, 0, 0, 0))),
            (Some(major), Some(minor), None) => comparators.push(lt((major, minor + 1, 0, 0))),
            (Some(_), Some(_), Some(_)) => comparators.push(Comparator::new(
                Operator::LessThanEquals,
                self.operand(upper),
            )),
        }

        comparators
    }
}

macro_rules! create_tests_for {
    ($func:ident $($name:ident => $version_range:expr , { $x:ident => $allows:expr, $y:ident => $denies:expr$(,)? }),+ ,$(,)?) => {

        #[cfg(test)]
        mod $func {
        use super::*;

            $(
                #[test]
                fn $name() {
                    let version_range = Range::parse($version_range).unwrap();

                    let allows: Vec<Range> = $allows.iter().map(|v| Range::parse(v).unwrap()).collect();
                    for version in &allows {
                        assert!(version_range.$func(version), "should have allowed: {}", version);
                    }

                    let ranges: Vec<Range> = $denies.iter().map(|v| Range::parse(v).unwrap()).collect();
                    for version in &ranges {
                        assert!(!version_range.$func(version), "should have denied: {}", version);
                    }
                }
            )+
        }
    }
}

create_tests_for! {
    // The function we are testing:
    intersects

    greater_than_eq_123   => ">=1.2.3", {
        allows => ["<=1.2.4", "3.0.0", "<2", ">=3", ">3.0.0"],
        denies => ["<=1.2.0", "1.0.0", "<1", "<1.2"],
    },

    greater_than_123   => ">1.2.3", {
        allows => ["<=1.2.4", "3.0.0", "<2", ">=3", ">3.0.0"],
        denies => ["<=1.2.3", "1.0.0", "<1", "<1.2"],
    },

    eq_123   => "1.2.3", {
        allows => ["1.2.3", "1 - 2", "^1.2.0", "<=1.2"],
        denies => ["<1.2.3", "1.0.0", "<=1.1", ">4.5.6", ">5"],
    },

    lt_eq_123  => "<=1.2.3", {
        allows => ["<=1.2.0", "<1.0.0", "1.0.0", ">1.0.0", ">=1.2.0"],
        denies => ["4.5.6", ">2.0.0", ">=2.0.0"],
    },

    lt_123  => "<1.2.3", {
        allows => ["<=2.2.0", "<2.0.0", "1.0.0", ">1.0.0", ">=1.2.0"],
        denies => ["2.0.0", ">1.8.0", ">=1.8.0", "1.2.3"],
    },

    between_two_and_eight => "2 - 8", {
        allows => ["2.2.3", "4 - 10", ">4", ">4.0.0", "<=4.0.0", "<9.1.2"],
        denies => [">10", "10 - 11", "0 - 1"],
    },

    eq_123_or_gt_400  => "1.2.3 || >4", {
        allows => [ "1.2.3", ">3", "5.x", "5.2.x", ">=8.2.1", "2 - 7", "2.0 || 5.6.7"],
        denies => [ "1.9.4 || 2 - 3"],
    },

    any => "*", {
        allows => ["1.2.3", "<0.0.1", ">=99.0.0", "*"],
        denies => ["<0.0.0-0"],
    },
}

#[cfg(test)]
mod satisfies_ranges_tests {
    use super::*;

    macro_rules! refute {
        ($e:expr) => {
            assert!(!$e)
        };
        ($e:expr, $msg:expr) => {
            assert!(!$e, $msg)
        };
    }

    fn v(input: &str) -> Version {
        Version::parse(input).unwrap()
    }

    #[test]
    fn primitive_operators() {
        // (range, admitted, rejected)
        let cases = vec![
            (">=1.2.3", vec!["1.2.3", "1.2.4", "2.2.3"], vec!["0.2.3", "1.1.3", "1.2.2"]),
            (">1.2.3", vec!["1.2.4", "9.0.0"], vec!["1.2.3", "1.2.2", "0.9.9"]),
            ("=1.2.3", vec!["1.2.3"], vec!["1.2.2", "1.2.4"]),
            ("<1.2.3", vec!["0.2.3", "1.1.3", "1.2.2"], vec!["1.2.3", "1.2.4"]),
            ("<=1.2.3", vec!["0.2.3", "1.2.3"], vec!["1.2.4", "2.0.0"]),
            ("1", vec!["1.0.0", "1.2.2", "1.99.99"], vec!["0.2.3", "2.0.0", "2.7.3"]),
        ];

        for (range, admitted, rejected) in cases {
            let parsed = Range::parse(range).unwrap();
            for version in admitted {
                assert!(parsed.satisfies(&v(version)), "{} should admit {}", range, version);
            }
            for version in rejected {
                assert!(!parsed.satisfies(&v(version)), "{} should reject {}", range, version);
            }
        }
    }

    #[test]
    fn caret_boundaries() {
        let caret = Range::parse("^1.2.3").unwrap();
        assert!(caret.satisfies(&v("1.2.4")));
        assert!(caret.satisfies(&v("1.9.0")));
        refute!(caret.satisfies(&v("1.2.2")));
        refute!(caret.satisfies(&v("2.0.0")));

        let caret = Range::parse("^0.2.3").unwrap();
        assert!(caret.satisfies(&v("0.2.4")));
        refute!(caret.satisfies(&v("0.3.0")));

        let caret = Range::parse("^0.0.3").unwrap();
        assert!(caret.satisfies(&v("0.0.3")));
        refute!(caret.satisfies(&v("0.0.4")));
    }

    #[test]
    fn tilde_boundaries() {
        let tilde = Range::parse("~1.2.3").unwrap();
        assert!(tilde.satisfies(&v("1.2.9")));
        refute!(tilde.satisfies(&v("1.3.0")));

        let tilde = Range::parse("~1.2").unwrap();
        assert!(tilde.satisfies(&v("1.2.0")));
        refute!(tilde.satisfies(&v("1.3.0")));

        let tilde = Range::parse("~1").unwrap();
        assert!(tilde.satisfies(&v("1.9.9")));
        refute!(tilde.satisfies(&v("2.0.0")));
    }

    #[test]
    fn hyphen_boundaries() {
        let hyphen = Range::parse("1.2.3 - 2.3").unwrap();

        refute!(hyphen.satisfies(&v("1.2.2")));
        assert!(hyphen.satisfies(&v("1.2.3")));
        assert!(hyphen.satisfies(&v("2.3.9")));
        refute!(hyphen.satisfies(&v("2.4.0")));
    }

    #[test]
    fn or_union() {
        let range = Range::parse("1.x || 2.x").unwrap();

        assert!(range.satisfies(&v("1.0.0")));
        assert!(range.satisfies(&v("2.5.0")));
        refute!(range.satisfies(&v("3.0.0")));
        refute!(range.satisfies(&v("0.9.9")));
    }

    #[test]
    fn empty_range_and_empty_set() {
        assert!(Range::parse("").unwrap().satisfies(&v("9.9.9")));
        assert!(Range::parse("*").unwrap().satisfies(&v("0.0.0")));
        assert!(Range::any().satisfies(&v("1.2.3")));
        refute!(Range::none().satisfies(&v("1.2.3")));
        refute!(Range::parse(">*").unwrap().satisfies(&v("0.0.0")));
    }

    #[test]
    fn pre_release_version() {
        let range = Range::parse("^2").unwrap();

        refute!(range.satisfies(&v("2.0.0-alpha.0")), "below");
        refute!(range.satisfies(&v("2.1.0-alpha.0")), "above but pre-release");
    }

    #[test]
    fn pre_releases_are_excluded_by_default() {
        refute!(Range::parse(">=1.0.0").unwrap().satisfies(&v("1.2.3-beta.1")));
        refute!(Range::parse("*").unwrap().satisfies(&v("1.2.3-beta.1")));
        refute!(Range::parse("1.x").unwrap().satisfies(&v("1.2.3-beta.1")));
        assert!(Range::parse(">=1.2.3-alpha").unwrap().satisfies(&v("1.2.3-beta.1")));
        refute!(Range::parse(">=1.2.2-alpha").unwrap().satisfies(&v("1.2.3-beta.1")));
    }

    #[test]
    fn pre_release_in_another_set_does_not_count() {
        let range = Range::parse(">=1.0.0 || 1.2.3-alpha").unwrap();

        refute!(range.satisfies(&v("1.2.3-beta")));
        assert!(range.satisfies(&v("1.2.3-alpha")));
    }

    #[test]
    fn include_prerelease_lifts_the_exclusion() {
        let options = Options::new().with_include_prerelease(true);

        let range = Range::parse_with(">=1.0.0", options).unwrap();
        assert!(range.satisfies(&v("1.2.3-beta.1")));

        let range = Range::parse_with("^1.2.3", options).unwrap();
        assert!(range.satisfies(&v("1.5.0-rc.1")));
        refute!(range.satisfies(&v("2.0.0-rc.1")), "next major's pre-releases stay out");

        let range = Range::parse_with("*", options).unwrap();
        assert!(range.satisfies(&v("0.0.1-alpha")));
    }

    #[test]
    fn include_prerelease_lowers_partial_floors() {
        let options = Options::new().with_include_prerelease(true);
        let cases = vec![
            ("1.x", ">=1.0.0-0 <2.0.0-0", "1.0.0-beta"),
            ("~1.2", ">=1.2.0-0 <1.3.0-0", "1.2.0-rc.1"),
            ("^1.2", ">=1.2.0-0 <2.0.0-0", "1.2.0-rc.1"),
            (">=1.2", ">=1.2.0-0", "1.2.0-rc.1"),
            (">1", ">=2.0.0-0", "2.0.0-alpha"),
            ("1.2 - 2", ">=1.2.0-0 <3.0.0-0", "1.2.0-alpha"),
        ];

        for (input, rendered, pre) in cases {
            let range = Range::parse_with(input, options).unwrap();
            assert_eq!(range.to_string(), rendered);
            assert!(range.satisfies(&v(pre)), "{} should admit {}", input, pre);
            refute!(
                Range::parse(input).unwrap().satisfies(&v(pre)),
                "floors stay release versions without the option"
            );
        }

        // Complete operands keep their own pre-release, or none.
        let range = Range::parse_with("^1.2.3", options).unwrap();
        assert_eq!(range.to_string(), ">=1.2.3 <2.0.0-0");
        refute!(range.satisfies(&v("1.2.3-rc.1")));
    }

    #[test]
    fn pre_release_range() {
        let range = Range::parse("^1.2.3-rc.4").unwrap();

        refute!(range.satisfies(&v("1.2.2")), "below");
        assert!(range.satisfies(&v("1.2.3")), "equal non-prerelease");
        assert!(range.satisfies(&v("1.2.4")), "above");
    }

    #[test]
    fn pre_release_version_and_range() {
        let range = Range::parse("^1.2.3-rc.4").unwrap();

        refute!(range.satisfies(&v("1.2.3-rc.3")), "below");
        assert!(range.satisfies(&v("1.2.3-rc.4")), "equal");
        assert!(range.satisfies(&v("1.2.3-rc.5")), "above");
        refute!(range.satisfies(&v("1.2.4-rc.6")), "above patch but pre-release");
    }

    #[test]
    fn build_metadata_does_not_matter() {
        let range = Range::parse("1.2.3+build").unwrap();

        assert!(range.satisfies(&v("1.2.3")));
        assert!(range.satisfies(&v("1.2.3+other")));
    }

    #[test]
    fn test_accepts_strings() {
        let range = Range::parse("^1.2.0").unwrap();

        assert!(range.test("1.2.3"));
        assert!(range.test(&v("1.3.0")));
        refute!(range.test("2.0.0"));
        refute!(range.test("not-a-version"));
    }

    #[test]
    fn test_uses_the_range_options() {
        let range = Range::parse_with("^1.2.0", Options::new().with_loose(true)).unwrap();

        assert!(range.test("v1.2.3"));
        refute!(Range::parse("^1.2.0").unwrap().test("v1.2.3"));
    }

    #[test]
    fn version_satisfies() {
        assert!(v("1.2.4").satisfies(&Range::parse("^1.2.3").unwrap()));
        assert!(crate::satisfies("1.2.4", "~1.2.3").unwrap());
        assert!(crate::satisfies("1.2.4", ">=1.2.3 <").is_err());
    }
}


#[cfg(test)]
mod satisfying {
    use super::*;

    fn versions() -> Vec<Version> {
        ["1.2.3", "1.2.4", "1.3.0-beta", "1.3.0", "2.0.0", "0.9.0"]
            .iter()
            .map(|s| Version::parse(s).unwrap())
            .collect()
    }

    #[test]
    fn max_and_min() {
        let versions = versions();
        let range = Range::parse("^1.2.3").unwrap();

        assert_eq!(range.max_satisfying(&versions), Some(&versions[3]));
        assert_eq!(range.min_satisfying(&versions), Some(&versions[0]));
    }

    #[test]
    fn nothing_matches() {
        let versions = versions();
        let range = Range::parse(">=3").unwrap();

        assert_eq!(range.max_satisfying(&versions), None);
        assert_eq!(range.min_satisfying(&versions), None);
    }
}

#[cfg(test)]
mod errors {
    use super::*;

    use pretty_assertions::assert_eq;

    fn kind(input: &str) -> SemverErrorKind {
        Range::parse(input)
            .expect_err(input)
            .kind()
            .clone()
    }

    #[test]
    fn malformed_ranges() {
        for input in &[
            ">=1.2.3 <",
            "not-a-version",
            "1.2.3 foo",
            "foo 1.2.3",
            "~1.y 1.2.3",
            "1.2.3.4",
            "^",
            "~",
            "1 -2",
            "1.2.3 -",
            ">=1.2.3<2",
            "1.2beta4",
            "1.2.3 ||| 2",
        ] {
            assert_eq!(kind(input), SemverErrorKind::InvalidRangeFormat, "{:?}", input);
        }
    }

    #[test]
    fn bad_operators() {
        let samples = vec![
            ("=>1.2.3", "=>"),
            ("!=1.2.3", "!="),
            ("==1.2.3", "=="),
            ("1.0.0 <>2.0.0", "<>"),
            ("<<1", "<<"),
        ];
        for (input, operator) in samples {
            assert_eq!(
                kind(input),
                SemverErrorKind::InvalidComparatorOperator(operator.into()),
                "{:?}",
                input
            );
        }
    }

    #[test]
    fn overflowing_operand() {
        assert_eq!(
            kind(">=9007199254740992"),
            SemverErrorKind::NumericOverflow("9007199254740992".into())
        );
    }

    #[test]
    fn error_points_at_the_problem() {
        let err = Range::parse(">=1.0.0 <>2.0.0").unwrap_err();

        assert_eq!(err.offset(), 8);
        assert_eq!(err.input(), ">=1.0.0 <>2.0.0");
    }
}

/// https://github.com/npm/node-semver/blob/master/test/fixtures/range-parse.js
#[cfg(test)]
mod tests {
    use super::*;
    use serde_derive::{Deserialize, Serialize};

    use pretty_assertions::assert_eq;

    macro_rules! range_parse_tests {
        ($($name:ident => $vals:expr),+ ,$(,)?) => {
            $(
                #[test]
                fn $name() {
                    let [input, expected] = $vals;

                    let parsed = Range::parse(input).expect("unable to parse");

                    assert_eq!(expected, parsed.to_string());
                }
            )+
        }

    }

    range_parse_tests![
        //       [input,   parsed and then `to_string`ed]
        exact => ["1.0.0", "1.0.0"],
        exact_with_operator => ["=1.0.0", "1.0.0"],
        major_minor_patch_range => ["1.0.0 - 2.0.0", ">=1.0.0 <=2.0.0"],
        only_major_versions =>  ["1 - 2", ">=1.0.0 <3.0.0-0"],
        only_major_and_minor => ["1.0 - 2.0", ">=1.0.0 <2.1.0-0"],
        mixed_major_minor => ["1.2 - 3.4.5", ">=1.2.0 <=3.4.5"],
        mixed_major_minor_2 => ["1.2.3 - 3.4", ">=1.2.3 <3.5.0-0"],
        minor_minor_range => ["1.2 - 3.4", ">=1.2.0 <3.5.0-0"],
        hyphen_to_anything => ["1.2.3 - *", ">=1.2.3"],
        hyphen_from_anything => ["* - 2", "<3.0.0-0"],
        single_sided_only_major => ["1", ">=1.0.0 <2.0.0-0"],
        single_sided_lower_equals_bound =>  [">=1.0.0", ">=1.0.0"],
        single_sided_lower_equals_bound_2 => [">=0.1.97", ">=0.1.97"],
        single_sided_lower_bound => [">1.0.0", ">1.0.0"],
        single_sided_upper_equals_bound => ["<=2.0.0", "<=2.0.0"],
        single_sided_upper_equals_bound_with_minor => ["<=2.0", "<2.1.0-0"],
        single_sided_upper_equals_bound_only_major => ["<=2", "<3.0.0-0"],
        single_sided_upper_bound => ["<2.0.0", "<2.0.0"],
        major_and_minor => ["2.3", ">=2.3.0 <2.4.0-0"],
        major_dot_x => ["2.x", ">=2.0.0 <3.0.0-0"],
        x_and_asterisk_version => ["2.x.x", ">=2.0.0 <3.0.0-0"],
        patch_x => ["1.2.x", ">=1.2.0 <1.3.0-0"],
        minor_asterisk_patch_asterisk => ["2.*.*", ">=2.0.0 <3.0.0-0"],
        patch_asterisk => ["1.2.*", ">=1.2.0 <1.3.0-0"],
        caret_zero => ["^0", ">=0.0.0 <1.0.0-0"],
        caret_zero_minor => ["^0.1", ">=0.1.0 <0.2.0-0"],
        caret_one => ["^1.0", ">=1.0.0 <2.0.0-0"],
        caret_minor => ["^1.2", ">=1.2.0 <2.0.0-0"],
        caret_patch => ["^0.0.1", ">=0.0.1 <0.0.2-0"],
        caret_with_patch =>   ["^0.1.2", ">=0.1.2 <0.2.0-0"],
        caret_with_patch_2 => ["^1.2.3", ">=1.2.3 <2.0.0-0"],
        caret_x => ["^1.x", ">=1.0.0 <2.0.0-0"],
        caret_any => ["^*", "*"],
        tilde_one => ["~1", ">=1.0.0 <2.0.0-0"],
        tilde_minor => ["~1.0", ">=1.0.0 <1.1.0-0"],
        tilde_minor_2 => ["~2.4", ">=2.4.0 <2.5.0-0"],
        tilde_with_greater_than_patch => ["~>3.2.1", ">=3.2.1 <3.3.0-0"],
        tilde_major_minor_zero => ["~1.1.0", ">=1.1.0 <1.2.0-0"],
        grater_than_equals_one => [">=1", ">=1.0.0"],
        greater_than_one => [">1", ">=2.0.0"],
        less_than_one => ["<1", "<1.0.0-0"],
        less_than_one_dot_two => ["<1.2", "<1.2.0-0"],
        greater_than_one_dot_two => [">1.2", ">=1.3.0"],
        greater_than_with_prerelease => [">1.1.0-beta-10", ">1.1.0-beta-10"],
        either_one_version_or_the_other => ["0.1.20 || 1.2.4", "0.1.20||1.2.4"],
        either_one_version_range_or_another => [">=0.2.3 || <0.0.1", ">=0.2.3||<0.0.1"],
        either_x_version_works => ["1.2.x || 2.x", ">=1.2.0 <1.3.0-0||>=2.0.0 <3.0.0-0"],
        either_asterisk_version_works => ["1.2.* || 2.*", ">=1.2.0 <1.3.0-0||>=2.0.0 <3.0.0-0"],
        one_two_three_or_greater_than_four => ["1.2.3 || >4", "1.2.3||>=5.0.0"],
        any_version_asterisk => ["*", "*"],
        any_version_x => ["x", "*"],
        any_version_empty => ["", "*"],
        any_version_blank => ["   ", "*"],
        empty_alternative => ["1.2.3 ||", "1.2.3||*"],
        greater_than_any => [">*", "<0.0.0-0"],
        greater_than_equals_any => [">=*", "*"],
        beta          => ["^0.0.1-beta", ">=0.0.1-beta <0.0.2-0"],
        beta_tilde => ["~1.2.3-beta", ">=1.2.3-beta <1.3.0-0"],
        beta_4        => ["^1.2.3-beta.4", ">=1.2.3-beta.4 <2.0.0-0"],
        pre_release_on_both => ["1.0.0-alpha - 2.0.0-beta", ">=1.0.0-alpha <=2.0.0-beta"],
        single_sided_lower_bound_with_pre_release => [">1.0.0-alpha", ">1.0.0-alpha"],
        space_separated1 => [">=1.2.3 <4.5.6", ">=1.2.3 <4.5.6"],
        build_is_dropped => ["^1.2.3+build.5", ">=1.2.3 <2.0.0-0"],
        leading_v => [">=v1.2.3", ">=1.2.3"],
        loose1 => [">01.02.03", ">1.2.3"],
        loose2 => ["~1.2.3beta", ">=1.2.3-beta <1.3.0-0"],
        caret_weird => ["^ 1.2 ^ 1", ">=1.2.0 <2.0.0-0 >=1.0.0 <2.0.0-0"],
    ];

    #[test]
    fn operator_whitespace() {
        for input in &[">= 1.0.0", ">=   1.0.0", ">\t1.0.0", "  >=1.0.0  "] {
            let compact: String = input.chars().filter(|c| !c.is_whitespace()).collect();
            assert_eq!(Range::parse(input).unwrap().to_string(), compact);
        }
        for (input, expected) in &[
            ("^ 1", ">=1.0.0 <2.0.0-0"),
            ("~> 1", ">=1.0.0 <2.0.0-0"),
            ("~ 1.0", ">=1.0.0 <1.1.0-0"),
            ("<=  2.0.0", "<=2.0.0"),
            ("  1.2.3  ||  2.0.0  ", "1.2.3||2.0.0"),
            (">=1.2.3\n<2.0.0", ">=1.2.3 <2.0.0"),
            ("1.x\n||\r\n2.x", ">=1.0.0 <2.0.0-0||>=2.0.0 <3.0.0-0"),
            ("1.2.3\n-\n2.0.0", ">=1.2.3 <=2.0.0"),
        ] {
            assert_eq!(Range::parse(input).unwrap().to_string(), *expected);
        }
    }

    #[test]
    fn none_renders_as_impossible_range() {
        assert_eq!(Range::none().to_string(), "<0.0.0-0");
        assert!(!Range::parse(&Range::none().to_string())
            .unwrap()
            .satisfies(&Version::new(0, 0, 0)));
    }

    #[test]
    fn rendering_reparses_to_the_same_range() {
        for input in &["^1.2.3", "~1.2 || >=3.0.0-rc.1", "1 - 2", "*", "1.2.x <1.2.5"] {
            let range = Range::parse(input).unwrap();
            assert_eq!(Range::parse(range.to_string()).unwrap(), range);
        }
    }

    #[test]
    fn sets_and_comparators_are_exposed() {
        let range = Range::parse(">=1.2.3 <2.0.0 || *").unwrap();

        assert_eq!(range.sets().len(), 2);
        let first = range.sets()[0].comparators();
        assert_eq!(first[0].operator(), Operator::GreaterThanEquals);
        assert_eq!(first[0].version(), &Version::new(1, 2, 3));
        assert_eq!(first[1].operator(), Operator::LessThan);
        assert!(range.sets()[1].is_any());
        assert!(first[0].matches(&Version::new(1, 5, 0)));
    }

    #[derive(Serialize, Deserialize, Eq, PartialEq)]
    struct WithVersionReq {
        req: Range,
    }

    #[test]
    fn read_version_req_from_string() {
        let v: WithVersionReq = serde_json::from_str(r#"{"req":"^1.2.3"}"#).unwrap();

        assert_eq!(v.req, "^1.2.3".parse().unwrap(),);
    }

    #[test]
    fn serialize_a_versionreq_to_string() {
        let output = serde_json::to_string(&WithVersionReq {
            req: Range {
                sets: vec![ComparatorSet(vec![lt(Version::new(1, 2, 3))])],
                options: Options::default(),
            },
        })
        .unwrap();
        let expected: String = r#"{"req":"<1.2.3"}"#.into();

        assert_eq!(output, expected);
    }
}
