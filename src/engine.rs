use std::borrow::Cow;
use std::cmp::Ordering;
use std::sync::Arc;

use crate::cache::ParseCache;
use crate::{parse_version, range, Options, Range, SemverError, Version};

/**
Entry point for parsing with an optional [ParseCache].

Cloning an `Engine` shares its cache. Engines built with [Engine::uncached]
always parse from scratch, which is also what the free functions and the
`parse` constructors on [Version] and [Range] do.

```
use semver_engine::{Engine, Options};

let engine = Engine::new();
let version = engine.parse("1.2.4", Options::default()).unwrap();
let range = engine.parse_range("^1.2.3", Options::default()).unwrap();
assert!(range.satisfies(&version));
```
*/
#[derive(Debug, Clone)]
pub struct Engine {
    cache: Option<Arc<ParseCache>>,
}

impl Engine {
    /// An engine with its own [ParseCache] of default capacity.
    pub fn new() -> Self {
        Self::with_cache(Arc::new(ParseCache::new()))
    }

    /// An engine memoizing into `cache`, which may be shared with others.
    pub fn with_cache(cache: Arc<ParseCache>) -> Self {
        Engine { cache: Some(cache) }
    }

    pub fn uncached() -> Self {
        Engine { cache: None }
    }

    pub fn cache(&self) -> Option<&ParseCache> {
        self.cache.as_deref()
    }

    /// Parse a version, consulting the cache first.
    pub fn parse(&self, input: &str, options: Options) -> Result<Version, SemverError> {
        match self.cache() {
            Some(cache) => cache
                .versions()
                .get_or_try_insert_with(input, options, || parse_version(input, options)),
            None => parse_version(input, options),
        }
    }

    /// Parse a range, consulting the cache first. Operands of a freshly
    /// parsed range go through the version table as well.
    pub fn parse_range(&self, input: &str, options: Options) -> Result<Range, SemverError> {
        match self.cache() {
            Some(cache) => cache.ranges().get_or_try_insert_with(input, options, || {
                range::parse_range(input, options, Some(cache))
            }),
            None => range::parse_range(input, options, None),
        }
    }

    /// Three-way SemVer comparison of two versions or version strings.
    pub fn compare<A, B>(&self, a: &A, b: &B, options: Options) -> Result<Ordering, SemverError>
    where
        A: VersionArg + ?Sized,
        B: VersionArg + ?Sized,
    {
        let a = a.resolve(self, options)?;
        let b = b.resolve(self, options)?;
        Ok(a.as_ref().cmp(b.as_ref()))
    }

    /// Whether `version` satisfies the range expression `range`.
    pub fn satisfies<V>(&self, version: &V, range: &str, options: Options) -> Result<bool, SemverError>
    where
        V: VersionArg + ?Sized,
    {
        let range = self.parse_range(range, options)?;
        let version = version.resolve(self, options)?;
        Ok(range.satisfies(&version))
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

/**
Anything that can stand in for a [Version] argument: an already parsed
[Version], or a string that still has to go through the parser.
*/
pub trait VersionArg {
    fn resolve<'v>(&'v self, engine: &Engine, options: Options) -> Result<Cow<'v, Version>, SemverError>;
}

impl VersionArg for Version {
    fn resolve<'v>(&'v self, _engine: &Engine, _options: Options) -> Result<Cow<'v, Version>, SemverError> {
        Ok(Cow::Borrowed(self))
    }
}

impl VersionArg for str {
    fn resolve<'v>(&'v self, engine: &Engine, options: Options) -> Result<Cow<'v, Version>, SemverError> {
        engine.parse(self, options).map(Cow::Owned)
    }
}

impl VersionArg for String {
    fn resolve<'v>(&'v self, engine: &Engine, options: Options) -> Result<Cow<'v, Version>, SemverError> {
        self.as_str().resolve(engine, options)
    }
}

impl<T: VersionArg + ?Sized> VersionArg for &T {
    fn resolve<'v>(&'v self, engine: &Engine, options: Options) -> Result<Cow<'v, Version>, SemverError> {
        (**self).resolve(engine, options)
    }
}
