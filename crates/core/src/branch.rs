//! Branch directory
//!
//! The analytics backend stores branches under their database names
//! (`siruseri`, `T Nagar`, ...). Everything shown to a user goes through the
//! directory to get the display name (`New York`, ...).

use serde::{Deserialize, Serialize};

/// One branch of the network
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BranchProfile {
    /// Key used in footfall records (`siruseri`)
    pub key: String,
    /// Name shown to users (`New York`)
    pub display_name: String,
    /// Branch code (`ABC001`)
    #[serde(default)]
    pub code: String,
    /// Market segment (`IT Hub`)
    #[serde(default)]
    pub kind: String,
    /// Other database spellings (`T Nagar`), matched case-insensitively
    #[serde(default)]
    pub aliases: Vec<String>,
}

impl BranchProfile {
    pub fn new(
        key: impl Into<String>,
        display_name: impl Into<String>,
        code: impl Into<String>,
        kind: impl Into<String>,
    ) -> Self {
        Self {
            key: key.into(),
            display_name: display_name.into(),
            code: code.into(),
            kind: kind.into(),
            aliases: Vec::new(),
        }
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.aliases.push(alias.into());
        self
    }

    /// Whether `name` is this branch's key or one of its aliases
    pub fn matches(&self, name: &str) -> bool {
        let name = name.trim();
        self.key.eq_ignore_ascii_case(name) || self.aliases.iter().any(|a| a.eq_ignore_ascii_case(name))
    }

    /// Canonical database spelling (first alias, else the key)
    pub fn database_name(&self) -> &str {
        self.aliases.first().map(String::as_str).unwrap_or(&self.key)
    }
}

/// Ordered set of branch profiles
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BranchDirectory {
    profiles: Vec<BranchProfile>,
}

impl Default for BranchDirectory {
    fn default() -> Self {
        Self::new(Self::default_profiles())
    }
}

impl BranchDirectory {
    pub fn new(profiles: Vec<BranchProfile>) -> Self {
        Self { profiles }
    }

    /// The three-branch network of ABC Bank
    pub fn default_profiles() -> Vec<BranchProfile> {
        vec![
            BranchProfile::new("siruseri", "New York", "ABC001", "IT Hub").with_alias("Siruseri"),
            BranchProfile::new("tnagar", "Washington DC", "ABC002", "Commercial").with_alias("T Nagar"),
            BranchProfile::new("navalur", "New Jersey", "ABC003", "Residential").with_alias("Navalur"),
        ]
    }

    pub fn profiles(&self) -> &[BranchProfile] {
        &self.profiles
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    /// Profile for a key, alias or display name
    pub fn find(&self, name: &str) -> Option<&BranchProfile> {
        self.profiles
            .iter()
            .find(|p| p.matches(name) || p.display_name.eq_ignore_ascii_case(name.trim()))
    }

    /// Display name for a database name; unknown names pass through unchanged
    pub fn display_name(&self, name: &str) -> String {
        self.profiles
            .iter()
            .find(|p| p.matches(name))
            .map(|p| p.display_name.clone())
            .unwrap_or_else(|| name.to_string())
    }

    /// Database name for a display name; unknown names pass through unchanged
    pub fn database_name(&self, display_name: &str) -> String {
        self.profiles
            .iter()
            .find(|p| p.display_name == display_name)
            .map(|p| p.database_name().to_string())
            .unwrap_or_else(|| display_name.to_string())
    }

    /// Replace every database spelling in free text with its display name
    pub fn swap_names_in_text(&self, text: &str) -> String {
        let mut swapped = text.to_string();
        for profile in &self.profiles {
            let mut needles: Vec<&str> = profile.aliases.iter().map(String::as_str).collect();
            needles.push(&profile.key);
            // Longest first so "T Nagar" is replaced before a shorter alias could split it
            needles.sort_by_key(|n| std::cmp::Reverse(n.len()));
            for needle in needles {
                swapped = replace_ignore_ascii_case(&swapped, needle, &profile.display_name);
            }
        }
        swapped
    }

    /// Order branch keys: directory order first, unknown keys after in sorted order
    pub fn ordered_keys<'a, I>(&self, keys: I) -> Vec<String>
    where
        I: IntoIterator<Item = &'a String>,
    {
        let mut unknown: Vec<String> = Vec::new();
        let mut known: Vec<(usize, String)> = Vec::new();
        for key in keys {
            match self.profiles.iter().position(|p| p.matches(key)) {
                Some(index) => known.push((index, key.clone())),
                None => unknown.push(key.clone()),
            }
        }
        known.sort();
        unknown.sort();
        known.into_iter().map(|(_, k)| k).chain(unknown).collect()
    }
}

fn replace_ignore_ascii_case(haystack: &str, needle: &str, replacement: &str) -> String {
    if needle.is_empty() {
        return haystack.to_string();
    }
    let lower_haystack = haystack.to_ascii_lowercase();
    let lower_needle = needle.to_ascii_lowercase();

    let mut result = String::with_capacity(haystack.len());
    let mut cursor = 0;
    while let Some(offset) = lower_haystack[cursor..].find(&lower_needle) {
        let start = cursor + offset;
        result.push_str(&haystack[cursor..start]);
        result.push_str(replacement);
        cursor = start + needle.len();
    }
    result.push_str(&haystack[cursor..]);
    result
}
