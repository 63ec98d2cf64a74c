//! Cookie jar store.
//!
//! Reads a request `Cookie:` header and produces `Set-Cookie` lines, so a
//! web front end can keep the snapshot in the browser.

use std::collections::BTreeMap;

use super::SnapshotStore;
use crate::error::Result;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CookieJar {
    cookies: BTreeMap<String, String>,
    /// Names written since the jar was built, in write order.
    dirty: Vec<String>,
}

impl CookieJar {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse `name=value; other=value`. Pairs without `=` are skipped; a
    /// repeated name keeps its first value.
    pub fn from_header(header: &str) -> Self {
        let mut cookies = BTreeMap::new();
        for pair in header.split(';') {
            let Some((name, value)) = pair.split_once('=') else {
                continue;
            };
            let name = name.trim();
            if name.is_empty() {
                continue;
            }
            cookies
                .entry(name.to_string())
                .or_insert_with(|| unquote(value.trim()).to_string());
        }
        Self {
            cookies,
            dirty: Vec::new(),
        }
    }

    /// The request header form of every cookie in the jar.
    pub fn header(&self) -> String {
        self.cookies
            .iter()
            .map(|(name, value)| format!("{name}={value}"))
            .collect::<Vec<_>>()
            .join("; ")
    }

    /// One `Set-Cookie` value per cookie written through the store.
    pub fn set_cookie_headers(&self) -> Vec<String> {
        self.dirty
            .iter()
            .filter_map(|name| {
                self.cookies
                    .get(name)
                    .map(|value| format!("{name}={value}; Path=/"))
            })
            .collect()
    }

    pub fn get_raw(&self, name: &str) -> Option<&str> {
        self.cookies.get(name).map(String::as_str)
    }
}

impl SnapshotStore for CookieJar {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.cookies.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.cookies.insert(key.to_string(), value.to_string());
        if !self.dirty.iter().any(|name| name == key) {
            self.dirty.push(key.to_string());
        }
        Ok(())
    }
}

fn unquote(value: &str) -> &str {
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .unwrap_or(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::Snapshot;
    use crate::storage::{load_snapshot, save_snapshot};

    #[test]
    fn parses_request_header() {
        let jar = CookieJar::from_header("level=3; currentXp=\"40\";challengesCompleted=7; junk");
        assert_eq!(jar.get_raw("level"), Some("3"));
        assert_eq!(jar.get_raw("currentXp"), Some("40"));
        assert_eq!(jar.get_raw("challengesCompleted"), Some("7"));
        assert_eq!(jar.get_raw("junk"), None);
    }

    #[test]
    fn malformed_cookies_load_defaults() {
        let jar = CookieJar::from_header("level=abc; currentXp=");
        assert_eq!(load_snapshot(&jar).unwrap(), Snapshot::default());
    }

    #[test]
    fn first_duplicate_wins() {
        let jar = CookieJar::from_header("level=2; level=9");
        assert_eq!(jar.get_raw("level"), Some("2"));
    }

    #[test]
    fn writes_become_set_cookie_lines() {
        let mut jar = CookieJar::from_header("theme=dark");
        save_snapshot(
            &mut jar,
            &Snapshot {
                level: 2,
                current_xp: 10,
                challenges_completed: 1,
            },
        )
        .unwrap();
        assert_eq!(
            jar.set_cookie_headers(),
            vec![
                "level=2; Path=/".to_string(),
                "currentXp=10; Path=/".to_string(),
                "challengesCompleted=1; Path=/".to_string(),
            ]
        );
        assert_eq!(
            jar.header(),
            "challengesCompleted=1; currentXp=10; level=2; theme=dark"
        );
    }
}
