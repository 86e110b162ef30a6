use super::DomainError;
use serde::{Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::path::{Component, Path, PathBuf};

/// A normalized, project-relative path used to address manifest entries.
///
/// Invariants, enforced at construction:
/// - forward-slash delimited, whatever separator the input used
/// - no leading/trailing separators, no empty or `.` segments
/// - never escapes the project root (`..` is rejected)
///
/// Equality, hashing and ordering use the lower-cased form, so
/// `Scripts/App.ts` and `scripts\app.ts` are the same logical path. The
/// original casing is kept for display and for writing the manifest.
#[derive(Debug, Clone)]
pub struct LogicalPath {
    display: String,
    key: String,
}

impl LogicalPath {
    /// The project root (empty logical path).
    pub fn root() -> Self {
        Self {
            display: String::new(),
            key: String::new(),
        }
    }

    /// Parse a user or manifest supplied path.
    ///
    /// Accepts `/` and `\` interchangeably; `/`, `""` and `.` all denote the
    /// root.
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        let mut segments = Vec::new();
        for segment in raw.split(['/', '\\']) {
            match segment {
                "" | "." => continue,
                ".." => {
                    return Err(DomainError::InvalidLogicalPath {
                        path: raw.to_string(),
                        reason: "'..' would escape the project root".into(),
                    });
                }
                s => segments.push(s),
            }
        }
        Ok(Self::from_segments(&segments))
    }

    /// Build a logical path from a relative filesystem path.
    pub fn from_relative(path: &Path) -> Result<Self, DomainError> {
        let mut segments = Vec::new();
        for component in path.components() {
            match component {
                Component::Normal(s) => segments.push(s.to_string_lossy().into_owned()),
                Component::CurDir => continue,
                _ => {
                    return Err(DomainError::InvalidLogicalPath {
                        path: path.display().to_string(),
                        reason: "expected a path relative to the source root".into(),
                    });
                }
            }
        }
        let segments: Vec<&str> = segments.iter().map(String::as_str).collect();
        Ok(Self::from_segments(&segments))
    }

    fn from_segments(segments: &[&str]) -> Self {
        Self::from_display(segments.join("/"))
    }

    /// `display` must already be normalized. Lower-casing can change byte
    /// lengths, so the key is always derived, never sliced.
    fn from_display(display: String) -> Self {
        let key = display
            .split('/')
            .map(str::to_lowercase)
            .collect::<Vec<_>>()
            .join("/");
        Self { display, key }
    }

    pub fn is_root(&self) -> bool {
        self.display.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.display
    }

    /// Lower-cased form used as the membership key everywhere.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Append `other` below this path.
    pub fn join(&self, other: &LogicalPath) -> LogicalPath {
        match (self.is_root(), other.is_root()) {
            (true, _) => other.clone(),
            (_, true) => self.clone(),
            _ => Self {
                display: format!("{}/{}", self.display, other.display),
                key: format!("{}/{}", self.key, other.key),
            },
        }
    }

    /// Append a single file or directory name.
    pub fn child(&self, name: &str) -> Result<LogicalPath, DomainError> {
        if name.is_empty() || name.contains(['/', '\\']) || name == "." || name == ".." {
            return Err(DomainError::InvalidLogicalPath {
                path: name.to_string(),
                reason: "expected a single path segment".into(),
            });
        }
        Ok(self.join(&Self::from_segments(&[name])))
    }

    /// Containing directory; `None` only for the root itself.
    pub fn parent(&self) -> Option<LogicalPath> {
        if self.is_root() {
            return None;
        }
        Some(match self.display.rfind('/') {
            Some(idx) => Self::from_display(self.display[..idx].to_string()),
            None => Self::root(),
        })
    }

    /// Last segment of the path.
    pub fn file_name(&self) -> Option<&str> {
        if self.is_root() {
            return None;
        }
        self.display.rsplit('/').next()
    }

    /// Text after the final `.` of the last segment, if any.
    pub fn suffix(&self) -> Option<&str> {
        let name = self.file_name()?;
        name.rfind('.').map(|idx| &name[idx + 1..])
    }

    /// Relative filesystem path for joining onto a physical root.
    pub fn to_path_buf(&self) -> PathBuf {
        self.display.split('/').filter(|s| !s.is_empty()).collect()
    }

    /// Render with the separator a manifest expects (`\` for MSBuild).
    pub fn to_manifest_string(&self, separator: char) -> String {
        if separator == '/' {
            self.display.clone()
        } else {
            self.display.replace('/', &separator.to_string())
        }
    }
}

impl PartialEq for LogicalPath {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for LogicalPath {}

impl Hash for LogicalPath {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key.hash(state);
    }
}

impl PartialOrd for LogicalPath {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for LogicalPath {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key.cmp(&other.key)
    }
}

impl fmt::Display for LogicalPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}", self.display)
    }
}

impl Serialize for LogicalPath {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.display)
    }
}

impl TryFrom<&str> for LogicalPath {
    type Error = DomainError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ---------------------------------------------------------------------
    // Normalization
    // ---------------------------------------------------------------------

    #[test]
    fn separators_and_redundant_segments_are_normalized() {
        let p = LogicalPath::parse("\\Scripts//./app.ts/").unwrap();
        assert_eq!(p.as_str(), "Scripts/app.ts");
        assert_eq!(p.key(), "scripts/app.ts");
    }

    #[test]
    fn slash_dot_and_empty_are_root() {
        for raw in ["/", "", ".", "\\"] {
            assert!(LogicalPath::parse(raw).unwrap().is_root(), "{raw:?}");
        }
    }

    #[test]
    fn parent_dir_segments_are_rejected() {
        assert!(LogicalPath::parse("a/../../etc").is_err());
    }

    #[test]
    fn equality_ignores_case_and_separator() {
        let a = LogicalPath::parse("Scripts/App.TS").unwrap();
        let b = LogicalPath::parse("scripts\\app.ts").unwrap();
        assert_eq!(a, b);
        // Display keeps the original casing.
        assert_eq!(a.as_str(), "Scripts/App.TS");
    }

    #[test]
    fn from_relative_path() {
        let p = LogicalPath::from_relative(Path::new("emptydir/nested")).unwrap();
        assert_eq!(p.as_str(), "emptydir/nested");
        assert!(LogicalPath::from_relative(Path::new("/abs")).is_err());
    }

    // ---------------------------------------------------------------------
    // Navigation
    // ---------------------------------------------------------------------

    #[test]
    fn join_with_root_is_identity() {
        let root = LogicalPath::root();
        let p = LogicalPath::parse("a/b").unwrap();
        assert_eq!(root.join(&p), p);
        assert_eq!(p.join(&root), p);
        assert_eq!(
            LogicalPath::parse("web").unwrap().join(&p).as_str(),
            "web/a/b"
        );
    }

    #[test]
    fn parent_walks_up_to_root() {
        let p = LogicalPath::parse("a/b/c.txt").unwrap();
        let parent = p.parent().unwrap();
        assert_eq!(parent.as_str(), "a/b");
        let top = LogicalPath::parse("c.txt").unwrap().parent().unwrap();
        assert!(top.is_root());
        assert!(LogicalPath::root().parent().is_none());
    }

    #[test]
    fn parent_survives_case_folding_that_changes_length() {
        // 'İ' is 2 bytes, its lower case "i\u{307}" is 3.
        let p = LogicalPath::parse("İ/x.txt").unwrap();
        assert_eq!(p.key(), "i\u{307}/x.txt");
        let parent = p.parent().unwrap();
        assert_eq!(parent.as_str(), "İ");
        assert_eq!(parent.key(), "i\u{307}");

        let nested = LogicalPath::parse("Ⱥb/İİ/c.ts").unwrap();
        let parent = nested.parent().unwrap();
        assert_eq!(parent.as_str(), "Ⱥb/İİ");
        assert_eq!(parent, LogicalPath::parse("ⱥB/i\u{307}i\u{307}").unwrap());
        assert_eq!(parent.parent().unwrap().key(), "ⱥb");
    }

    #[test]
    fn join_key_matches_parsed_key() {
        let joined = LogicalPath::parse("Ⱥb")
            .unwrap()
            .join(&LogicalPath::parse("İ/c.ts").unwrap());
        let parsed = LogicalPath::parse("Ⱥb/İ/c.ts").unwrap();
        assert_eq!(joined.key(), parsed.key());
        assert_eq!(joined.as_str(), "Ⱥb/İ/c.ts");
        assert_eq!(joined.file_name(), Some("c.ts"));
        assert_eq!(joined.suffix(), Some("ts"));
    }

    #[test]
    fn suffix_is_text_after_final_dot() {
        let suffix = |s: &str| LogicalPath::parse(s).unwrap().suffix().map(str::to_owned);
        assert_eq!(suffix("a/b.d.ts").as_deref(), Some("ts"));
        assert_eq!(suffix("Makefile"), None);
        assert_eq!(suffix("dir.v2/Makefile"), None);
        assert_eq!(suffix("trailing.").as_deref(), Some(""));
    }

    #[test]
    fn child_rejects_nested_names() {
        let root = LogicalPath::root();
        assert!(root.child("readme.txt").is_ok());
        assert!(root.child("a/b").is_err());
        assert!(root.child("").is_err());
    }

    #[test]
    fn manifest_string_uses_requested_separator() {
        let p = LogicalPath::parse("Scripts/lib/app.ts").unwrap();
        assert_eq!(p.to_manifest_string('\\'), "Scripts\\lib\\app.ts");
        assert_eq!(p.to_manifest_string('/'), "Scripts/lib/app.ts");
        assert_eq!(p.to_string(), "/Scripts/lib/app.ts");
    }
}
