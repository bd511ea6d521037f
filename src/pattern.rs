use crate::Error;
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // A run of separators behaves as a single one, so collapse them up front.
    static ref SLASH_RUN_RE: Regex = Regex::new(r"/{2,}").unwrap();
    // One scan finds every parameter or wildcard marker: an optional separator
    // or dot prefix, then `:name` with an optional `+`, or a bare `*` with an
    // optional separator prefix. Matching the greedy `+` in the same pass
    // guarantees a greedy marker is never re-read as a plain named one.
    static ref MARKER_RE: Regex = Regex::new(r"([/.])?:([0-9A-Za-z_]+)(\+)?|(/)?\*").unwrap();
}

/// Options applied to every route registered through one router instance.
#[derive(Debug, Clone, Copy)]
pub struct RouteOptions {
    /// Match path case-sensitively. Defaults to `false`.
    pub sensitive: bool,
    /// Accept one optional trailing slash, so `/users` also matches
    /// `/users/`. Defaults to `true`.
    pub trailing: bool,
}

impl Default for RouteOptions {
    fn default() -> RouteOptions {
        RouteOptions {
            sensitive: false,
            trailing: true,
        }
    }
}

/// How a declared route parameter captures its value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    /// `:name`: exactly one path segment, never crossing a separator.
    Named,
    /// `:name+`: the remainder of the path, separators included.
    Greedy,
}

/// A compiled route pattern: an anchored regex plus the ordered parameter
/// schema derived from the pattern text.
///
/// Immutable after compilation, so a `Matcher` is safe to test concurrently
/// against paths of independent requests.
#[derive(Debug)]
pub struct Matcher {
    regex: Regex,
    params: Vec<(String, ParamKind)>,
}

impl Matcher {
    /// Compiles a route pattern into a [`Matcher`].
    ///
    /// A pattern consists of literal segments, named parameters (`:name`),
    /// greedy parameters (`:name+`) and wildcards (`*`). Compilation only
    /// fails when the rewritten expression is rejected by the regex engine.
    pub fn compile(pattern: &str, options: RouteOptions) -> Result<Matcher, Error> {
        let normalized = normalize(pattern);
        let (body, params) = rewrite(&normalized);

        let mut re_str = String::with_capacity(body.len() + 8);
        re_str.push_str(if options.sensitive { "(?s)^" } else { "(?si)^" });
        re_str.push_str(&body);
        if options.trailing {
            re_str.push_str("/?");
        }
        re_str.push('$');

        let regex = Regex::new(re_str.as_str())
            .map_err(|e| Error::new(format!("could not compile the route pattern {:?}: {}", pattern, e)))?;

        Ok(Matcher { regex, params })
    }

    /// Tests a concrete request path without extracting captures.
    pub fn is_match(&self, path: &str) -> bool {
        self.regex.is_match(path)
    }

    /// Runs the matcher against a path. Returns `None` when the path doesn't
    /// satisfy the pattern, otherwise the raw captured substrings in schema
    /// order. A capture may be absent or empty when a greedy parameter
    /// consumed nothing.
    pub fn captures<'p>(&self, path: &'p str) -> Option<Vec<Option<&'p str>>> {
        let caps = self.regex.captures(path)?;
        Some(
            (1..=self.params.len())
                .map(|i| caps.get(i).map(|m| m.as_str()))
                .collect(),
        )
    }

    /// The ordered parameter schema declared by the pattern. Wildcards don't
    /// declare a parameter and so never appear here.
    pub fn params(&self) -> &[(String, ParamKind)] {
        &self.params
    }
}

fn normalize(pattern: &str) -> String {
    let collapsed = SLASH_RUN_RE.replace_all(pattern, "/");
    match collapsed.strip_suffix('/') {
        Some(rest) => rest.to_string(),
        None => collapsed.into_owned(),
    }
}

/// Rewrites a normalized pattern into a regex body and collects the parameter
/// schema. Literal chunks go through `regex::escape`, so a literal dot only
/// matches itself and substituted capture groups are never re-interpreted.
fn rewrite(pattern: &str) -> (String, Vec<(String, ParamKind)>) {
    let mut out = String::with_capacity(pattern.len() + 16);
    let mut params = Vec::new();
    let mut last = 0;

    for caps in MARKER_RE.captures_iter(pattern) {
        let whole = caps.get(0).unwrap();
        out.push_str(&regex::escape(&pattern[last..whole.start()]));
        last = whole.end();

        if let Some(name) = caps.get(2) {
            let prefix = caps.get(1).map(|p| p.as_str());
            if let Some(p) = prefix {
                out.push_str(&regex::escape(p));
            }
            if caps.get(3).is_some() {
                // Greedy: zero or more characters, separators included.
                out.push_str("(.*)");
                params.push((name.as_str().to_owned(), ParamKind::Greedy));
            } else {
                // Named: one or more non-separator characters. A dot-prefixed
                // parameter also excludes the dot, for extension-style
                // segments like `:file.:ext`.
                out.push_str(if prefix == Some(".") { "([^/.]+)" } else { "([^/]+)" });
                params.push((name.as_str().to_owned(), ParamKind::Named));
            }
        } else {
            // Wildcard: the preceding separator plus everything after it is
            // optional, so a trailing `/*` matches the bare prefix too.
            out.push_str(if caps.get(4).is_some() { "(?:/.*)?" } else { "(?:.*)?" });
        }
    }

    out.push_str(&regex::escape(&pattern[last..]));
    (out, params)
}
