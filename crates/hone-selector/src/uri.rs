//! URL decomposition and shortening.
//!
//! Selectors built from `href`/`src` values only stay readable when the
//! URL is abbreviated to a meaningful tail ("report.pdf", "deque.com/");
//! [`friendly_uri_end`] applies the heuristics deciding whether such a
//! tail exists at all. Splitting is deliberately lenient: relative URLs,
//! bare fragments and scheme-less strings all decompose without error.

use once_cell::sync::Lazy;
use regex::Regex;

/// Index files make meaningless selector fragments; matched unanchored so
/// any "index"-ish tail is rejected.
static INDEX_FILE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"index(\.[a-zA-Z]{2,4})?").expect("valid pattern"));

/// Pieces of one URL. Delimiters stay with their piece the way the
/// splitter found them: query keeps `?`, hash keeps `#`, port keeps `:`;
/// the protocol is bare ("https").
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UriPieces {
    pub original: String,
    pub protocol: String,
    pub domain: String,
    pub port: String,
    pub path: String,
    pub query: String,
    pub hash: String,
}

/// Split a relative or absolute URL into its pieces.
///
/// Order matters: hash first, then query, then protocol and authority, so
/// a `#` or `?` embedded in a fragment never misparses the rest.
pub fn parse_uri(url: &str) -> UriPieces {
    let original = url.to_string();
    let mut rest = url;
    let mut protocol = "";
    let mut domain = "";
    let mut port = "";
    let mut query = "";
    let mut hash = "";

    if let Some(i) = rest.find('#') {
        hash = &rest[i..];
        rest = &rest[..i];
    }
    if let Some(i) = rest.find('?') {
        query = &rest[i..];
        rest = &rest[..i];
    }

    if let Some(i) = rest.find("://") {
        protocol = &rest[..i];
        rest = &rest[i + 3..];
        (domain, rest) = split_authority(rest);
    } else if let Some(stripped) = rest.strip_prefix("//") {
        rest = stripped;
        (domain, rest) = split_authority(rest);
    }

    domain = domain.strip_prefix("www.").unwrap_or(domain);
    if let Some(i) = domain.find(':') {
        port = &domain[i..];
        domain = &domain[..i];
    }

    UriPieces {
        original,
        protocol: protocol.to_string(),
        domain: domain.to_string(),
        port: port.to_string(),
        path: rest.to_string(),
        query: query.to_string(),
        hash: hash.to_string(),
    }
}

/// Split "host/rest-of-path"; with no slash the whole thing is the host
fn split_authority(s: &str) -> (&str, &str) {
    match s.find('/') {
        Some(i) => (&s[..i], &s[i..]),
        None => (s, ""),
    }
}

/// Options for [`friendly_uri_end`]
#[derive(Debug, Clone, Default)]
pub struct FriendlyUriOptions {
    /// Domain of the page the URL appears on; a differing link domain is
    /// distinctive enough to use as the fragment
    pub current_domain: Option<String>,
    /// Longest acceptable fragment, in characters (0 means the default 25)
    pub max_length: usize,
}

impl FriendlyUriOptions {
    fn max(&self) -> usize {
        if self.max_length == 0 { 25 } else { self.max_length }
    }
}

/// Abbreviate a URL to a short human-readable tail, or `None` when no
/// readable tail exists. `None` means "skip this feature", never an error.
pub fn friendly_uri_end(uri: &str, options: &FriendlyUriOptions) -> Option<String> {
    if chars(uri) <= 1
        || uri.starts_with("data:")
        || uri.starts_with("javascript:")
        || uri.contains('?')
    {
        return None;
    }

    let max = options.max();
    let pieces = parse_uri(uri);
    let path = pieces.path.as_str();

    // tail after the last '/', ignoring one trailing slash
    let probe = &path.as_bytes()[..path.len().saturating_sub(2)];
    let path_end = match probe.iter().rposition(|&b| b == b'/') {
        Some(i) => &path[i + 1..],
        None => path,
    };

    if !pieces.hash.is_empty() {
        if !path_end.is_empty() && chars(path_end) + chars(&pieces.hash) <= max {
            return Some(format!("{path_end}{}", pieces.hash));
        }
        if chars(path_end) < 2 && chars(&pieces.hash) > 2 && chars(&pieces.hash) <= max {
            return Some(pieces.hash);
        }
        return None;
    }

    // bare domain: '' or '/' path
    if !pieces.domain.is_empty() && chars(&pieces.domain) < max && chars(path) <= 1 {
        return Some(format!("{}{path}", pieces.domain));
    }

    // a link pointing off-site reads best as domain/path
    if path == format!("/{path_end}")
        && !pieces.domain.is_empty()
        && options
            .current_domain
            .as_deref()
            .is_some_and(|current| current != pieces.domain)
        && chars(&pieces.domain) + chars(path) <= max
    {
        return Some(format!("{}{path}", pieces.domain));
    }

    let last_dot = path_end.rfind('.');
    let len = chars(path_end);
    let acceptable = (last_dot.is_none() || last_dot.is_some_and(|i| i > 1))
        && (last_dot.is_some() || len > 2)
        && len <= max
        && !INDEX_FILE.is_match(path_end)
        && !mostly_numeric(path_end);

    acceptable.then(|| path_end.to_string())
}

/// Percent-encode the characters `encodeURI` would, leaving URI structure
/// (`/?:@#` and friends) intact
pub fn encode_uri(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            'A'..='Z' | 'a'..='z' | '0'..='9' => result.push(c),
            ';' | ',' | '/' | '?' | ':' | '@' | '&' | '=' | '+' | '$' | '-' | '_' | '.' | '!'
            | '~' | '*' | '\'' | '(' | ')' | '#' => result.push(c),
            _ => {
                let mut buf = [0u8; 4];
                for byte in c.encode_utf8(&mut buf).as_bytes() {
                    result.push_str(&format!("%{byte:02X}"));
                }
            }
        }
    }
    result
}

/// At least half the characters are digits - likely a database id
fn mostly_numeric(s: &str) -> bool {
    let total = chars(s);
    total != 0 && s.chars().filter(char::is_ascii_digit).count() * 2 >= total
}

fn chars(s: &str) -> usize {
    s.chars().count()
}
