//! PFN decomposition into prefix, directory path and file name.

use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, CONTROLS};
use std::path::PathBuf;

use crate::config::RseAttributes;
use crate::protocol::ProtocolError;

/// A PFN split against the attributes of the protocol instance that parsed it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedPfn {
    pub scheme: String,
    pub hostname: String,
    pub port: u16,
    /// Normalized attribute prefix (leading and trailing `/`).
    pub prefix: String,
    /// Directory between prefix and name; starts with `/`, ends with `/` unless it is `/`.
    pub path: String,
    pub name: String,
}

impl ParsedPfn {
    /// `prefix/path/name`. Redundant separators are left in place; the OS collapses them.
    pub fn to_local_path(&self) -> PathBuf {
        PathBuf::from([self.prefix.as_str(), self.path.as_str(), self.name.as_str()].join("/"))
    }
}

/// Characters escaped when a path goes into a PFN. `/` stays literal; `\\` is
/// escaped because special schemes such as `file` read it as a separator.
const PFN_PATH: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'\\')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Percent-encode `path` for use in a PFN; [`parse_pfn`] decodes it again.
pub fn encode_pfn_path(path: &str) -> String {
    utf8_percent_encode(path, PFN_PATH).to_string()
}

fn collapse_slashes(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_slash = false;
    for c in s.chars() {
        if c == '/' {
            if prev_slash {
                continue;
            }
            prev_slash = true;
        } else {
            prev_slash = false;
        }
        out.push(c);
    }
    out
}

/// Collapses `//` and makes sure the prefix starts and ends with `/`.
pub fn normalize_prefix(prefix: &str) -> String {
    let mut p = collapse_slashes(prefix);
    if !p.starts_with('/') {
        p.insert(0, '/');
    }
    if !p.ends_with('/') {
        p.push('/');
    }
    p
}

fn unsupported(pfn: &str, reason: impl Into<String>) -> ProtocolError {
    ProtocolError::FileNameNotSupported {
        pfn: pfn.to_string(),
        reason: reason.into(),
    }
}

/// Parse `pfn` and check it against `attrs`.
///
/// Fails with `FileNameNotSupported` if the string is not a URL, names a
/// different host or port, lies outside the prefix, or has no file name.
/// An attribute hostname of `localhost` (or empty) accepts any host, since
/// file URLs usually carry none.
pub fn parse_pfn(attrs: &RseAttributes, pfn: &str) -> Result<ParsedPfn, ProtocolError> {
    let url = url::Url::parse(pfn).map_err(|e| unsupported(pfn, format!("not a URL: {e}")))?;

    let scheme = url.scheme().to_string();
    let hostname = url.host_str().unwrap_or("").to_string();
    let port = url.port().unwrap_or(0);

    let decoded = percent_decode_str(url.path())
        .decode_utf8()
        .map_err(|_| unsupported(pfn, "path is not valid UTF-8"))?;
    let path = collapse_slashes(&decoded);
    let prefix = normalize_prefix(&attrs.prefix);

    let host_wildcard = attrs.hostname.is_empty() || attrs.hostname == "localhost";
    if !host_wildcard && attrs.hostname != hostname {
        return Err(unsupported(
            pfn,
            format!("invalid hostname: provided '{}', expected '{}'", hostname, attrs.hostname),
        ));
    }
    if url.port().is_some() && port != attrs.port {
        return Err(unsupported(
            pfn,
            format!("invalid port: provided '{}', expected '{}'", port, attrs.port),
        ));
    }
    let Some(rest) = path.strip_prefix(prefix.as_str()) else {
        return Err(unsupported(
            pfn,
            format!("invalid prefix: provided '{}', expected '{}'", path, prefix),
        ));
    };

    let (dir, name) = match rest.rsplit_once('/') {
        Some((dir, name)) => (dir, name),
        None => ("", rest),
    };
    if name.is_empty() {
        return Err(unsupported(pfn, "missing file name"));
    }

    let mut dir = dir.to_string();
    if !dir.starts_with('/') {
        dir.insert(0, '/');
    }
    if dir != "/" && !dir.ends_with('/') {
        dir.push('/');
    }

    Ok(ParsedPfn {
        scheme,
        hostname,
        port,
        prefix,
        path: dir,
        name: name.to_string(),
    })
}
