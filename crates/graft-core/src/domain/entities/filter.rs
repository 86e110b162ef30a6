use std::path::Path;

use glob::{MatchOptions, Pattern};

use crate::domain::error::DomainError;

/// A glob predicate over a source entry's absolute path.
///
/// `*` also matches path separators, so `*.ts` selects every TypeScript file
/// of the tree and `*/bin/*` everything below any `bin` directory.
#[derive(Debug, Clone)]
pub struct PathFilter {
    pattern: Pattern,
    case_sensitive: bool,
}

impl PathFilter {
    pub fn new(pattern: &str, case_sensitive: bool) -> Result<Self, DomainError> {
        let pattern = Pattern::new(pattern).map_err(|e| DomainError::InvalidPattern {
            pattern: pattern.to_string(),
            reason: e.msg.to_string(),
        })?;
        Ok(Self {
            pattern,
            case_sensitive,
        })
    }

    pub fn matches(&self, path: &Path) -> bool {
        let options = MatchOptions {
            case_sensitive: self.case_sensitive,
            require_literal_separator: false,
            require_literal_leading_dot: false,
        };
        self.pattern.matches_path_with(path, options)
    }

    pub fn as_str(&self) -> &str {
        self.pattern.as_str()
    }

    pub fn is_case_sensitive(&self) -> bool {
        self.case_sensitive
    }
}

/// Inclusion/exclusion rules applied to every walked entry.
///
/// With no include patterns everything is included; with no exclude patterns
/// nothing is excluded. Each filter carries its own case sensitivity: by
/// default include patterns match case-sensitively and exclude patterns
/// case-insensitively (see [`EntryFilter::include`] / [`EntryFilter::exclude`]).
#[derive(Debug, Clone, Default)]
pub struct EntryFilter {
    include: Vec<PathFilter>,
    exclude: Vec<PathFilter>,
}

impl EntryFilter {
    pub const DEFAULT_INCLUDE_CASE_SENSITIVE: bool = true;
    pub const DEFAULT_EXCLUDE_CASE_SENSITIVE: bool = false;

    /// Accept everything.
    pub fn all() -> Self {
        Self::default()
    }

    /// Add an include pattern with the default (case-sensitive) matching.
    pub fn include(self, pattern: &str) -> Result<Self, DomainError> {
        self.include_with(pattern, Self::DEFAULT_INCLUDE_CASE_SENSITIVE)
    }

    /// Add an exclude pattern with the default (case-insensitive) matching.
    pub fn exclude(self, pattern: &str) -> Result<Self, DomainError> {
        self.exclude_with(pattern, Self::DEFAULT_EXCLUDE_CASE_SENSITIVE)
    }

    pub fn include_with(mut self, pattern: &str, case_sensitive: bool) -> Result<Self, DomainError> {
        self.include.push(PathFilter::new(pattern, case_sensitive)?);
        Ok(self)
    }

    pub fn exclude_with(mut self, pattern: &str, case_sensitive: bool) -> Result<Self, DomainError> {
        self.exclude.push(PathFilter::new(pattern, case_sensitive)?);
        Ok(self)
    }

    /// Whether the entry at `path` takes part in the merge.
    pub fn admits(&self, path: &Path) -> bool {
        let included = self.include.is_empty() || self.include.iter().any(|f| f.matches(path));
        included && !self.exclude.iter().any(|f| f.matches(path))
    }

    pub fn includes(&self) -> &[PathFilter] {
        &self.include
    }

    pub fn excludes(&self) -> &[PathFilter] {
        &self.exclude
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_filter_admits_everything() {
        assert!(EntryFilter::all().admits(Path::new("/src/anything.bin")));
    }

    #[test]
    fn include_restricts_to_matching_paths() {
        let filter = EntryFilter::all().include("*.ts").unwrap();
        assert!(filter.admits(Path::new("/payload/scripts/app.ts")));
        assert!(!filter.admits(Path::new("/payload/scripts/app.js")));
    }

    #[test]
    fn exclude_wins_over_include() {
        let filter = EntryFilter::all()
            .include("*.ts")
            .unwrap()
            .exclude("*.d.ts")
            .unwrap();
        assert!(filter.admits(Path::new("/p/app.ts")));
        assert!(!filter.admits(Path::new("/p/types.d.ts")));
    }

    // Include is case-sensitive and exclude case-insensitive unless the
    // caller asks otherwise.
    #[test]
    fn default_case_sensitivity_differs_per_filter() {
        let include = EntryFilter::all().include("*.TS").unwrap();
        assert!(!include.admits(Path::new("/p/app.ts")));

        let exclude = EntryFilter::all().exclude("*/OBJ/*").unwrap();
        assert!(!exclude.admits(Path::new("/p/obj/cache.bin")));
    }

    #[test]
    fn case_sensitivity_is_configurable_per_filter() {
        let include = EntryFilter::all().include_with("*.TS", false).unwrap();
        assert!(include.admits(Path::new("/p/app.ts")));

        let exclude = EntryFilter::all().exclude_with("*/OBJ/*", true).unwrap();
        assert!(exclude.admits(Path::new("/p/obj/cache.bin")));
    }

    #[test]
    fn invalid_pattern_is_reported() {
        let err = EntryFilter::all().include("[").unwrap_err();
        assert!(matches!(err, DomainError::InvalidPattern { .. }));
    }
}
