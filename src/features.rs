use serde_json::{json, Map, Value};
use std::collections::HashMap;
use std::sync::LazyLock;

static IP_HOST: LazyLock<regex::Regex> = LazyLock::new(|| {
    regex::Regex::new(r"^((25[0-5]|2[0-4][0-9]|[01]?[0-9][0-9]?)(\.|$)){4}").unwrap()
});

const SUSPICIOUS_TLDS: &[&str] = &[
    "zip", "xyz", "top", "gq", "work", "tk", "ml", "cf", "ru", "click", "country", "stream",
    "download", "men", "party", "loan", "kim", "mom", "date", "racing", "science", "study",
    "buzz",
];

const SHORTENERS: &[&str] = &[
    "bit.ly", "goo.gl", "t.co", "tinyurl.com", "ow.ly", "is.gd", "buff.ly", "adf.ly", "bit.do",
    "mcaf.ee",
];

/// Second-level labels that act as part of the public suffix under a
/// two-letter country code, e.g. `co.uk`.
const SECOND_LEVEL_SUFFIXES: &[&str] = &["co", "com", "org", "net", "ac", "gov", "edu"];

const RESERVED_CHARS: &[char] = &[';', '_', '~', '!', '*', '(', ')', ','];

#[derive(Clone, Debug, Default, PartialEq)]
pub struct UrlFeatures {
    pub url_len: usize,
    pub host_len: usize,
    pub path_len: usize,
    pub num_dots: usize,
    pub num_hyphens: usize,
    pub num_at: usize,
    pub num_qm: usize,
    pub num_pct: usize,
    pub num_eq: usize,
    pub num_slash: usize,
    pub num_digits: usize,
    pub digit_ratio: f64,
    pub entropy: f64,
    pub is_https: bool,
    pub has_ip_host: bool,
    pub num_subdomains: usize,
    pub suspicious_tld: bool,
    pub shortener: bool,
    pub starts_with_https: bool,
    pub has_double_slash_in_path: bool,
    pub num_params: usize,
    pub path_depth: usize,
    pub num_period_in_path: usize,
    pub num_reserved: usize,
}

impl UrlFeatures {
    /// Feature map in the fixed model order. Flags are emitted as 0/1.
    pub fn to_map(&self) -> Map<String, Value> {
        let flag = |b: bool| json!(u8::from(b));
        let entries = [
            ("url_len", json!(self.url_len)),
            ("host_len", json!(self.host_len)),
            ("path_len", json!(self.path_len)),
            ("num_dots", json!(self.num_dots)),
            ("num_hyphens", json!(self.num_hyphens)),
            ("num_at", json!(self.num_at)),
            ("num_qm", json!(self.num_qm)),
            ("num_pct", json!(self.num_pct)),
            ("num_eq", json!(self.num_eq)),
            ("num_slash", json!(self.num_slash)),
            ("num_digits", json!(self.num_digits)),
            ("digit_ratio", json!(self.digit_ratio)),
            ("entropy", json!(self.entropy)),
            ("is_https", flag(self.is_https)),
            ("has_ip_host", flag(self.has_ip_host)),
            ("num_subdomains", json!(self.num_subdomains)),
            ("suspicious_tld", flag(self.suspicious_tld)),
            ("shortener", flag(self.shortener)),
            ("starts_with_https", flag(self.starts_with_https)),
            ("has_double_slash_in_path", flag(self.has_double_slash_in_path)),
            ("num_params", json!(self.num_params)),
            ("path_depth", json!(self.path_depth)),
            ("num_period_in_path", json!(self.num_period_in_path)),
            ("num_reserved", json!(self.num_reserved)),
        ];
        entries
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect()
    }
}

pub fn shannon_entropy(s: &str) -> f64 {
    let data = s.as_bytes();
    if data.is_empty() {
        return 0.0;
    }
    let mut counts: HashMap<u8, usize> = HashMap::new();
    for &b in data {
        *counts.entry(b).or_insert(0) += 1;
    }
    let len = data.len() as f64;
    counts
        .values()
        .map(|&c| {
            let p = c as f64 / len;
            -p * p.log2()
        })
        .sum()
}

pub fn has_ip(host: &str) -> bool {
    IP_HOST.is_match(host)
}

/// Registered domain split of a host name.
struct HostParts {
    subdomain: String,
    domain: String,
    tld: String,
}

fn split_host(host: &str) -> HostParts {
    if has_ip(host) || !host.contains('.') {
        return HostParts {
            subdomain: String::new(),
            domain: host.to_string(),
            tld: String::new(),
        };
    }

    let labels: Vec<&str> = host.split('.').collect();
    let n = labels.len();
    let last = labels[n - 1];
    let suffix_len = if n >= 3 && last.len() == 2 && SECOND_LEVEL_SUFFIXES.contains(&labels[n - 2])
    {
        2
    } else {
        1
    };
    let domain_start = n - suffix_len - 1;

    HostParts {
        subdomain: labels[..domain_start].join("."),
        domain: labels[domain_start..].join("."),
        tld: last.to_string(),
    }
}

/// A URL split into its components the way a generic URL splitter sees it:
/// no normalization, no percent-encoding, no port validation.
#[derive(Debug, PartialEq)]
struct UrlParts<'a> {
    scheme: &'a str,
    netloc: &'a str,
    path: &'a str,
    params: &'a str,
    query: &'a str,
    fragment: &'a str,
}

impl<'a> UrlParts<'a> {
    /// Returns `None` for an unbalanced `[`/`]` in the authority.
    fn split(url: &'a str) -> Option<Self> {
        let (scheme, mut rest) = match url.split_once(':') {
            Some((scheme, rest))
                if !scheme.is_empty()
                    && scheme
                        .chars()
                        .all(|c| c.is_ascii_alphanumeric() || "+-.".contains(c)) =>
            {
                (scheme, rest)
            }
            _ => ("", url),
        };

        let mut netloc = "";
        if let Some(after) = rest.strip_prefix("//") {
            let end = after.find(['/', '?', '#']).unwrap_or(after.len());
            netloc = &after[..end];
            rest = &after[end..];
            if netloc.contains('[') != netloc.contains(']') {
                return None;
            }
        }

        let (rest, fragment) = rest.split_once('#').unwrap_or((rest, ""));
        let (path, query) = rest.split_once('?').unwrap_or((rest, ""));

        // Params only attach to the last path segment.
        let last_segment = path.rfind('/').unwrap_or(0);
        let (path, params) = match path[last_segment..].find(';') {
            Some(offset) => {
                let i = last_segment + offset;
                (&path[..i], &path[i + 1..])
            }
            None => (path, ""),
        };

        Some(Self {
            scheme,
            netloc,
            path,
            params,
            query,
            fragment,
        })
    }

    /// Lowercased host: the authority without credentials or port.
    fn hostname(&self) -> String {
        let host = self
            .netloc
            .rsplit_once('@')
            .map(|(_, h)| h)
            .unwrap_or(self.netloc);
        let host = match host.strip_prefix('[') {
            Some(bracketed) => bracketed.split(']').next().unwrap_or(""),
            None => host.split(':').next().unwrap_or(""),
        };
        host.to_lowercase()
    }

    /// Reassembled URL. Empty query and fragment markers are dropped.
    fn to_url_string(&self) -> String {
        let mut out = String::new();
        if !self.scheme.is_empty() {
            out.push_str(self.scheme);
            out.push(':');
        }
        out.push_str("//");
        out.push_str(self.netloc);
        if !self.path.is_empty() && !self.path.starts_with('/') {
            out.push('/');
        }
        out.push_str(self.path);
        if !self.params.is_empty() {
            out.push(';');
            out.push_str(self.params);
        }
        if !self.query.is_empty() {
            out.push('?');
            out.push_str(self.query);
        }
        if !self.fragment.is_empty() {
            out.push('#');
            out.push_str(self.fragment);
        }
        out
    }
}

/// Compute the URL features. Input without a scheme is treated as `http://`.
/// A URL with an unbalanced IPv6 bracket yields all-zero features.
pub fn extract(url: &str) -> UrlFeatures {
    let raw: String = url.chars().filter(|c| !matches!(*c, '\t' | '\r' | '\n')).collect();
    let raw = if raw.starts_with("http://") || raw.starts_with("https://") {
        raw
    } else {
        format!("http://{}", raw)
    };

    let parts = match UrlParts::split(&raw) {
        Some(p) => p,
        None => {
            tracing::debug!("[phishguard] Unparseable URL {:?}", raw);
            return UrlFeatures::default();
        }
    };

    let full = parts.to_url_string();
    let host = parts.hostname();
    let path = parts.path;
    let query = parts.query;
    let host_parts = split_host(&host);

    let count = |c: char| full.matches(c).count();
    let url_len = full.chars().count();
    let num_digits = full.chars().filter(|c| c.is_ascii_digit()).count();
    let num_subdomains = if host_parts.subdomain.is_empty() {
        0
    } else {
        host_parts.subdomain.matches('.').count() + 1
    };

    UrlFeatures {
        url_len,
        host_len: host.len(),
        path_len: path.len(),
        num_dots: count('.'),
        num_hyphens: count('-'),
        num_at: count('@'),
        num_qm: count('?'),
        num_pct: count('%'),
        num_eq: count('='),
        num_slash: count('/'),
        num_digits,
        digit_ratio: num_digits as f64 / url_len.max(1) as f64,
        entropy: shannon_entropy(&full),
        is_https: parts.scheme == "https",
        has_ip_host: has_ip(&host),
        num_subdomains,
        suspicious_tld: SUSPICIOUS_TLDS.contains(&host_parts.tld.as_str()),
        shortener: SHORTENERS.contains(&host_parts.domain.as_str()),
        starts_with_https: full.to_lowercase().starts_with("https"),
        has_double_slash_in_path: path.trim_matches('/').contains("//"),
        num_params: if query.is_empty() {
            0
        } else {
            query.matches('&').count() + 1
        },
        path_depth: path.split('/').filter(|p| !p.is_empty()).count(),
        num_period_in_path: path.matches('.').count(),
        num_reserved: full.chars().filter(|c| RESERVED_CHARS.contains(c)).count(),
    }
}
