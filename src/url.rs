//! URL decomposition for configuration values.
//!
//! This is a delimiter scanner, not a URI grammar. The value is read strictly
//! left to right:
//!
//! ```text
//! [scheme://][user[:password]@]host[:port][/path][?query][#fragment]
//! /path[?query][#fragment]
//! ```
//!
//! Components borrow from the value they were parsed from. Components that
//! would be empty are `None`.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UrlError {
    #[error("value is empty")]
    Empty,

    #[error("invalid port '{0}'")]
    InvalidPort(String),

    #[cfg(feature = "url")]
    #[error("invalid percent-encoding in '{0}'")]
    InvalidEncoding(String),
}

/// A URL split into its components.
///
/// ```
/// let url = vconf::Url::parse("zk://host2:123/1").unwrap();
/// assert_eq!(url.scheme, Some("zk"));
/// assert_eq!(url.host, Some("host2"));
/// assert_eq!(url.port, Some(123));
/// assert_eq!(url.path, Some("/1"));
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Url<'a> {
    pub scheme: Option<&'a str>,
    pub user: Option<&'a str>,
    pub password: Option<&'a str>,
    pub host: Option<&'a str>,
    /// `None` when the value names no port.
    pub port: Option<u16>,
    pub path: Option<&'a str>,
    pub query: Option<&'a str>,
    pub fragment: Option<&'a str>,
}

fn non_empty(s: &str) -> Option<&str> {
    (!s.is_empty()).then_some(s)
}

impl<'a> Url<'a> {
    pub fn parse(value: &'a str) -> Result<Self, UrlError> {
        if value.is_empty() {
            return Err(UrlError::Empty);
        }

        let mut url = Url::default();
        if value.starts_with('/') {
            url.set_path(value);
            return Ok(url);
        }

        let mut rest = value;
        if let Some((scheme, after)) = rest.split_once("://") {
            url.scheme = non_empty(scheme);
            rest = after;
        }

        if let Some((user_info, after)) = rest.split_once('@') {
            match user_info.split_once(':') {
                Some((user, password)) => {
                    url.user = non_empty(user);
                    url.password = non_empty(password);
                }
                None => url.user = non_empty(user_info),
            }
            rest = after;
        }

        url.set_authority(rest)?;
        Ok(url)
    }

    /// `host[:port][/path...]`
    fn set_authority(&mut self, s: &'a str) -> Result<(), UrlError> {
        if let Some((host, after)) = s.split_once(':') {
            self.host = non_empty(host);
            let end = after.find('/').unwrap_or(after.len());
            let (port, path) = after.split_at(end);
            self.port = Some(parse_port(port)?);
            self.set_path(path);
        } else if let Some(slash) = s.find('/') {
            let (host, path) = s.split_at(slash);
            self.host = non_empty(host);
            self.set_path(path);
        } else {
            self.host = non_empty(s);
        }
        Ok(())
    }

    /// `path[?query][#fragment]`
    fn set_path(&mut self, s: &'a str) {
        match s.split_once('?') {
            Some((path, tail)) => {
                self.path = non_empty(path);
                match tail.split_once('#') {
                    Some((query, fragment)) => {
                        self.query = non_empty(query);
                        self.fragment = non_empty(fragment);
                    }
                    None => self.query = non_empty(tail),
                }
            }
            None => match s.split_once('#') {
                Some((path, fragment)) => {
                    self.path = non_empty(path);
                    self.fragment = non_empty(fragment);
                }
                None => self.path = non_empty(s),
            },
        }
    }
}

/// Decimal, non-zero, up to the first `/`.
fn parse_port(s: &str) -> Result<u16, UrlError> {
    let invalid = || UrlError::InvalidPort(s.to_string());
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }
    match s.parse::<u16>() {
        Ok(0) | Err(_) => Err(invalid()),
        Ok(port) => Ok(port),
    }
}

#[cfg(feature = "url")]
mod decoding {
    use std::borrow::Cow;

    use percent_encoding::percent_decode_str;

    use super::{Url, UrlError};

    fn decode(part: Option<&str>) -> Result<Option<Cow<'_, str>>, UrlError> {
        part.map(|s| {
            percent_decode_str(s)
                .decode_utf8()
                .map_err(|_| UrlError::InvalidEncoding(s.to_string()))
        })
        .transpose()
    }

    /// Percent-decoded views of the raw components.
    impl<'a> Url<'a> {
        pub fn decoded_user(&self) -> Result<Option<Cow<'a, str>>, UrlError> {
            decode(self.user)
        }

        pub fn decoded_password(&self) -> Result<Option<Cow<'a, str>>, UrlError> {
            decode(self.password)
        }

        pub fn decoded_path(&self) -> Result<Option<Cow<'a, str>>, UrlError> {
            decode(self.path)
        }

        pub fn decoded_query(&self) -> Result<Option<Cow<'a, str>>, UrlError> {
            decode(self.query)
        }

        pub fn decoded_fragment(&self) -> Result<Option<Cow<'a, str>>, UrlError> {
            decode(self.fragment)
        }
    }

}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scheme_host_path() {
        let url = Url::parse("zk://host/1/2/3").unwrap();
        assert_eq!(
            url,
            Url {
                scheme: Some("zk"),
                host: Some("host"),
                path: Some("/1/2/3"),
                ..Url::default()
            }
        );
    }

    #[test]
    fn host_port_path() {
        let url = Url::parse("host2:123/1").unwrap();
        assert_eq!(url.host, Some("host2"));
        assert_eq!(url.port, Some(123));
        assert_eq!(url.path, Some("/1"));
        assert_eq!(url.scheme, None);
    }

    #[test]
    fn host_only() {
        let url = Url::parse("host3").unwrap();
        assert_eq!(
            url,
            Url {
                host: Some("host3"),
                ..Url::default()
            }
        );
    }

    #[test]
    fn host_port_no_path() {
        let url = Url::parse("host5:123").unwrap();
        assert_eq!(url.host, Some("host5"));
        assert_eq!(url.port, Some(123));
        assert_eq!(url.path, None);
    }

    #[test]
    fn absolute_path_only() {
        let url = Url::parse("/var/run/app.sock").unwrap();
        assert_eq!(url.host, None);
        assert_eq!(url.path, Some("/var/run/app.sock"));
    }

    #[test]
    fn user_and_password() {
        let url = Url::parse("mysql://root:secret@db:3306/app").unwrap();
        assert_eq!(url.scheme, Some("mysql"));
        assert_eq!(url.user, Some("root"));
        assert_eq!(url.password, Some("secret"));
        assert_eq!(url.host, Some("db"));
        assert_eq!(url.port, Some(3306));
        assert_eq!(url.path, Some("/app"));
    }

    #[test]
    fn user_without_password_and_no_scheme() {
        let url = Url::parse("admin@host/x").unwrap();
        assert_eq!(url.user, Some("admin"));
        assert_eq!(url.password, None);
        assert_eq!(url.host, Some("host"));
        assert_eq!(url.path, Some("/x"));
    }

    #[test]
    fn query_and_fragment() {
        let url = Url::parse("http://h/p?a=1&b=2#top").unwrap();
        assert_eq!(url.path, Some("/p"));
        assert_eq!(url.query, Some("a=1&b=2"));
        assert_eq!(url.fragment, Some("top"));
    }

    #[test]
    fn fragment_without_query() {
        let url = Url::parse("/p#frag").unwrap();
        assert_eq!(url.path, Some("/p"));
        assert_eq!(url.query, None);
        assert_eq!(url.fragment, Some("frag"));
    }

    #[test]
    fn first_question_mark_splits_before_hash() {
        let url = Url::parse("/p#frag?tail").unwrap();
        assert_eq!(url.path, Some("/p#frag"));
        assert_eq!(url.query, Some("tail"));
        assert_eq!(url.fragment, None);
    }

    #[test]
    fn query_without_fragment() {
        let url = Url::parse("h:80/p?q").unwrap();
        assert_eq!(url.port, Some(80));
        assert_eq!(url.query, Some("q"));
        assert_eq!(url.fragment, None);
    }

    #[test]
    fn empty_value() {
        assert_eq!(Url::parse(""), Err(UrlError::Empty));
    }

    #[test]
    fn zero_port_rejected() {
        assert_eq!(
            Url::parse("host:0/x"),
            Err(UrlError::InvalidPort("0".into()))
        );
    }

    #[test]
    fn missing_port_rejected() {
        assert!(matches!(Url::parse("host:"), Err(UrlError::InvalidPort(_))));
        assert!(matches!(Url::parse("host:/x"), Err(UrlError::InvalidPort(_))));
    }

    #[test]
    fn port_with_garbage_rejected() {
        assert!(matches!(Url::parse("host:12ab"), Err(UrlError::InvalidPort(_))));
        assert!(matches!(Url::parse("host:80?x"), Err(UrlError::InvalidPort(_))));
    }

    #[test]
    fn port_out_of_range_rejected() {
        assert!(matches!(Url::parse("host:70000"), Err(UrlError::InvalidPort(_))));
        assert_eq!(Url::parse("host:65535").unwrap().port, Some(65535));
    }
}
