//! Identifier and username remapping between the two services.

use crate::config::UserMapEntry;
use std::collections::HashMap;

/// Source milestone ID to destination milestone ID.
///
/// Grows by one entry per destination milestone created during a run and is
/// never edited afterwards.
#[derive(Debug, Default)]
pub struct IdentifierMap {
    entries: Vec<(u64, u64)>,
}

impl IdentifierMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records that `source` was created on the destination as `destination`.
    pub fn record_mapping(&mut self, source: u64, destination: u64) {
        self.entries.push((source, destination));
    }

    /// Destination ID for `source`, if one was recorded. The latest
    /// recording for a source ID wins.
    pub fn lookup(&self, source: u64) -> Option<u64> {
        self.entries
            .iter()
            .rev()
            .find(|(from, _)| *from == source)
            .map(|(_, to)| *to)
    }

    /// Destination ID for `source`, or `source` itself when unmapped.
    pub fn resolve(&self, source: u64) -> u64 {
        self.lookup(source).unwrap_or(source)
    }
}

/// Maps source usernames to destination usernames.
#[derive(Debug, Clone, Default)]
pub struct UserMapper {
    users: HashMap<String, String>,
}

impl UserMapper {
    /// Builds a mapper from configured pairs. Later duplicates win.
    pub fn new(entries: &[UserMapEntry]) -> Self {
        let users = entries
            .iter()
            .map(|e| (e.from.clone(), e.to.clone()))
            .collect();
        Self { users }
    }

    /// Exact, case-sensitive lookup; unknown names map to themselves.
    pub fn map<'a>(&'a self, username: &'a str) -> &'a str {
        self.users.get(username).map_or(username, String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(from: &str, to: &str) -> UserMapEntry {
        UserMapEntry {
            from: from.to_string(),
            to: to.to_string(),
        }
    }

    #[test]
    fn test_resolve_passes_through_until_recorded() {
        let mut map = IdentifierMap::new();
        assert_eq!(map.resolve(17), 17);
        assert_eq!(map.lookup(17), None);

        map.record_mapping(17, 3);
        assert_eq!(map.resolve(17), 3);
        assert_eq!(map.resolve(17), 3);
        assert_eq!(map.resolve(18), 18);
    }

    #[test]
    fn test_latest_recorded_mapping_wins() {
        let mut map = IdentifierMap::new();
        map.record_mapping(5, 1);
        map.record_mapping(5, 2);
        assert_eq!(map.resolve(5), 2);
        assert_eq!(map.lookup(5), Some(2));
    }

    #[test]
    fn test_user_mapper_maps_configured_names() {
        let mapper = UserMapper::new(&[entry("jdoe", "john"), entry("asmith", "anna")]);
        assert_eq!(mapper.map("jdoe"), "john");
        assert_eq!(mapper.map("asmith"), "anna");
    }

    #[test]
    fn test_user_mapper_identity_on_miss() {
        let mapper = UserMapper::new(&[entry("jdoe", "john")]);
        assert_eq!(mapper.map("someone"), "someone");
        assert_eq!(mapper.map("JDOE"), "JDOE");
        assert_eq!(UserMapper::default().map("x"), "x");
    }

    #[test]
    fn test_user_mapper_last_duplicate_wins() {
        let mapper = UserMapper::new(&[entry("jdoe", "john"), entry("jdoe", "johnny")]);
        assert_eq!(mapper.map("jdoe"), "johnny");
    }
}
