//! Styleable member ownership
//!
//! A member symbol `<array>_<attr>` belongs to the styleable array with the
//! longest name that, followed by `_`, prefixes the member name. Array names
//! may themselves contain `_` (`View_Layout`), so the lookup goes through a
//! radix trie keyed by `<array>_`.

use radix_trie::{Trie, TrieCommon};

/// Longest-prefix index from member names to their styleable array
#[derive(Debug, Default)]
pub struct StyleableOwners {
    trie: Trie<String, String>,
}

impl StyleableOwners {
    /// Index the given array names
    pub fn new<'a>(arrays: impl IntoIterator<Item = &'a str>) -> Self {
        let mut owners = Self::default();
        for array in arrays {
            owners.insert(array);
        }
        owners
    }

    /// Add one array name
    pub fn insert(&mut self, array: &str) {
        self.trie.insert(format!("{array}_"), array.to_string());
    }

    /// Whether no array was indexed
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.trie.is_empty()
    }

    /// Owning array and attribute suffix of `member`
    ///
    /// Returns `None` when no array prefixes the name or the suffix would be
    /// empty.
    #[must_use]
    pub fn owner<'m>(&self, member: &'m str) -> Option<(&str, &'m str)> {
        let array = self.trie.get_ancestor(member)?.value()?;
        let suffix = &member[array.len() + 1..];
        if suffix.is_empty() {
            return None;
        }
        Some((array.as_str(), suffix))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn longest_prefix_wins() {
        let owners = StyleableOwners::new(["View", "View_Layout"]);
        assert_eq!(owners.owner("View_Layout_gravity"), Some(("View_Layout", "gravity")));
        assert_eq!(owners.owner("View_background"), Some(("View", "background")));
    }

    #[test]
    fn platform_suffix_is_kept_verbatim() {
        let owners = StyleableOwners::new(["TextAppearance"]);
        assert_eq!(
            owners.owner("TextAppearance_android_textSize"),
            Some(("TextAppearance", "android_textSize"))
        );
    }

    #[test]
    fn unowned_members() {
        let owners = StyleableOwners::new(["View"]);
        assert_eq!(owners.owner("Viewport_x"), None);
        assert_eq!(owners.owner("View_"), None);
        assert_eq!(owners.owner("View"), None);
        assert!(StyleableOwners::default().is_empty());
    }
}
