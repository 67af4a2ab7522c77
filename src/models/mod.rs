use serde::{Deserialize, Serialize};

/// Wildcard group name accepted by a [`GroupRule`]
pub const WILDCARD_GROUP: &str = "*";

/// One playlist item: the `#EXTINF` descriptor line, its stream URL and the
/// tag values extracted from the descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    #[serde(rename = "extinf")]
    pub metadata_line: String,
    pub url: String,
    #[serde(default)]
    pub group: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub logo: String,
}

impl Entry {
    /// Create an entry with empty derived fields. The parser populates them.
    pub fn new(metadata_line: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            metadata_line: metadata_line.into(),
            url: url.into(),
            group: String::new(),
            name: String::new(),
            id: String::new(),
            logo: String::new(),
        }
    }

    /// Copy of this entry moved into another group
    pub fn with_group(&self, group: &str) -> Self {
        Self {
            group: group.to_string(),
            ..self.clone()
        }
    }
}

/// Ordered sequence of entries, in order of appearance in the source text.
/// Duplicates are preserved.
pub type Playlist = Vec<Entry>;

/// A rule set selecting entries by group and name pattern, renaming the group
/// of every selected entry to `new_group_name`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSpec {
    #[serde(default)]
    pub new_group_name: String,
    #[serde(default)]
    pub groups: Vec<GroupRule>,
}

impl FilterSpec {
    pub fn new(new_group_name: impl Into<String>, groups: Vec<GroupRule>) -> Self {
        Self {
            new_group_name: new_group_name.into(),
            groups,
        }
    }

    /// A spec without rules selects nothing
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

/// One clause of a [`FilterSpec`].
///
/// A rule without `group_name` never matches. A rule without `name_matches`
/// accepts any name in the matched group.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupRule {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name_matches: Option<Vec<String>>,
}

impl GroupRule {
    /// Rule accepting every entry of `group_name`
    pub fn group(group_name: impl Into<String>) -> Self {
        Self {
            group_name: Some(group_name.into()),
            name_matches: None,
        }
    }

    /// Rule accepting entries of `group_name` whose name matches any pattern
    pub fn group_with_names<I, S>(group_name: impl Into<String>, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            group_name: Some(group_name.into()),
            name_matches: Some(patterns.into_iter().map(Into::into).collect()),
        }
    }

    /// Whether this rule's group clause accepts `group`
    pub fn matches_group(&self, group: &str) -> bool {
        match self.group_name.as_deref() {
            Some(WILDCARD_GROUP) => true,
            Some(name) => name == group,
            None => false,
        }
    }
}
