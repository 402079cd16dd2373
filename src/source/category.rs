//! The fixed set of news sections a reader can switch between.

use std::fmt;

/// A news section.  [`Category::All`] means "no filter"; every other variant
/// maps one-to-one onto a provider-side category tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Category {
    #[default]
    All,
    Top,
    Business,
    Technology,
    Science,
    Health,
    Sports,
    Entertainment,
    World,
    Politics,
}

impl Category {
    /// Every category, in tab order.
    pub const ALL: [Category; 10] = [
        Category::All,
        Category::Top,
        Category::Business,
        Category::Technology,
        Category::Science,
        Category::Health,
        Category::Sports,
        Category::Entertainment,
        Category::World,
        Category::Politics,
    ];

    /// The provider tag sent as the `category` query parameter, or `None`
    /// when the request should be unfiltered.
    pub fn provider_tag(self) -> Option<&'static str> {
        match self {
            Category::All => None,
            Category::Top => Some("top"),
            Category::Business => Some("business"),
            Category::Technology => Some("technology"),
            Category::Science => Some("science"),
            Category::Health => Some("health"),
            Category::Sports => Some("sports"),
            Category::Entertainment => Some("entertainment"),
            Category::World => Some("world"),
            Category::Politics => Some("politics"),
        }
    }

    /// Short label for the tab bar.
    pub fn label(self) -> &'static str {
        match self {
            Category::All => "All",
            Category::Top => "Top",
            Category::Business => "Business",
            Category::Technology => "Technology",
            Category::Science => "Science",
            Category::Health => "Health",
            Category::Sports => "Sports",
            Category::Entertainment => "Entertainment",
            Category::World => "World",
            Category::Politics => "Politics",
        }
    }

    /// Case-insensitive lookup by label or provider tag.
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL
            .into_iter()
            .find(|c| c.label().eq_ignore_ascii_case(name))
    }

    /// Like [`from_name`](Self::from_name), but an unknown name degrades to
    /// the unfiltered feed instead of failing.
    pub fn from_name_or_all(name: &str) -> Self {
        Self::from_name(name).unwrap_or_else(|| {
            tracing::debug!(name, "Unknown category, using unfiltered feed");
            Category::All
        })
    }

    /// Position of this category in [`Category::ALL`].
    pub fn index(self) -> usize {
        Self::ALL.iter().position(|c| *c == self).unwrap_or(0)
    }

    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn previous(self) -> Self {
        let len = Self::ALL.len();
        Self::ALL[(self.index() + len - 1) % len]
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
