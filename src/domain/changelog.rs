use std::fmt;

/// One of the six fixed changelog buckets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Additions,
    Changes,
    Bugfixes,
    Deprecations,
    Removals,
    Breaking,
}

impl Category {
    /// All categories in declaration order
    pub const ALL: [Category; 6] = [
        Category::Additions,
        Category::Changes,
        Category::Bugfixes,
        Category::Deprecations,
        Category::Removals,
        Category::Breaking,
    ];

    /// Subsection heading that feeds this category
    pub fn heading(&self) -> &'static str {
        match self {
            Category::Additions => "### Additions",
            Category::Changes => "### Changes",
            Category::Bugfixes => "### Fixes",
            Category::Deprecations => "### Deprecated",
            Category::Removals => "### Removed",
            Category::Breaking => "### Breaking Changes",
        }
    }

    /// Title used when rendering
    pub fn title(&self) -> &'static str {
        match self {
            Category::Additions => "Additions",
            Category::Changes => "Changes",
            Category::Bugfixes => "Bugfixes",
            Category::Deprecations => "Deprecations",
            Category::Removals => "Removals",
            Category::Breaking => "Breaking Changes",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// A block of description text attributed to one merge/pull request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangelogEntry {
    /// Collected lines, each terminated by a newline
    pub description: String,
    /// Markdown link back to the request, `[<label> #<id>](<url>)`
    pub link: String,
}

impl ChangelogEntry {
    /// Create an entry, formatting the link from its parts
    pub fn new(description: impl Into<String>, label: &str, request_id: &str, url: &str) -> Self {
        ChangelogEntry {
            description: description.into(),
            link: format!("[{} #{}]({})", label, request_id, url),
        }
    }
}

/// The changelog for one release, filled in request discovery order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Changelog {
    pub version: String,
    pub additions: Vec<ChangelogEntry>,
    pub changes: Vec<ChangelogEntry>,
    pub bugfixes: Vec<ChangelogEntry>,
    pub deprecations: Vec<ChangelogEntry>,
    pub removals: Vec<ChangelogEntry>,
    pub breaking: Vec<ChangelogEntry>,
}

impl Changelog {
    /// Create an empty changelog for a release label
    pub fn new(version: impl Into<String>) -> Self {
        Changelog {
            version: version.into(),
            ..Default::default()
        }
    }

    pub fn entries(&self, category: Category) -> &[ChangelogEntry] {
        match category {
            Category::Additions => &self.additions,
            Category::Changes => &self.changes,
            Category::Bugfixes => &self.bugfixes,
            Category::Deprecations => &self.deprecations,
            Category::Removals => &self.removals,
            Category::Breaking => &self.breaking,
        }
    }

    fn entries_mut(&mut self, category: Category) -> &mut Vec<ChangelogEntry> {
        match category {
            Category::Additions => &mut self.additions,
            Category::Changes => &mut self.changes,
            Category::Bugfixes => &mut self.bugfixes,
            Category::Deprecations => &mut self.deprecations,
            Category::Removals => &mut self.removals,
            Category::Breaking => &mut self.breaking,
        }
    }

    /// Append an entry to the end of a category
    pub fn push(&mut self, category: Category, entry: ChangelogEntry) {
        self.entries_mut(category).push(entry);
    }

    /// Total number of entries across all categories
    pub fn len(&self) -> usize {
        Category::ALL.iter().map(|c| self.entries(*c).len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
