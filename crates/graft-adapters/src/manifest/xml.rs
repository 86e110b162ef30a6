//! MSBuild-style XML manifest backed by xmltree.

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use graft_core::{
    application::{ApplicationError, ports::ManifestDocument},
    domain::{EntryKind, LogicalPath, ManifestEntry},
    error::GraftResult,
};
use tracing::{debug, instrument, trace};
use xmltree::{Element, EmitterConfig, XMLNode};

use super::query::{QueryError, QueryPath, child_elements};

/// Separator MSBuild writes in `Include` attributes.
pub const DEFAULT_INCLUDE_SEPARATOR: char = '\\';

const ITEM_GROUP: &str = "ItemGroup";
const INCLUDE: &str = "Include";

/// A loaded project manifest.
///
/// Items live in `ItemGroup` elements below the root; the element's local
/// name is the entry kind and its `Include` attribute the logical path. The
/// root's default namespace is kept on save, and elements added here are
/// placed in it.
#[derive(Debug, Clone)]
pub struct XmlManifest {
    location: PathBuf,
    root: Element,
    separator: char,
}

impl XmlManifest {
    /// Load and parse the manifest at `path`.
    ///
    /// # Errors
    ///
    /// `NotFound` if the file does not exist, `ManifestError` if it is not
    /// well-formed XML.
    #[instrument(skip_all, fields(path = %path.display()))]
    pub fn load(path: &Path) -> GraftResult<Self> {
        let file = File::open(path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => ApplicationError::not_found("manifest", path),
            _ => ApplicationError::filesystem(path, format!("Failed to open manifest: {e}")),
        })?;
        Self::from_reader(path, BufReader::new(file))
    }

    /// Parse manifest text; `location` is where [`save`](Self::save) writes.
    pub fn parse(location: impl Into<PathBuf>, xml: &str) -> GraftResult<Self> {
        Self::from_reader(&location.into(), xml.as_bytes())
    }

    fn from_reader<R: Read>(location: &Path, reader: R) -> GraftResult<Self> {
        let mut root = Element::parse(reader).map_err(|e| ApplicationError::ManifestError {
            path: location.to_path_buf(),
            reason: e.to_string(),
        })?;
        strip_whitespace(&mut root);
        debug!(
            root = %root.name,
            namespace = root.namespace.as_deref().unwrap_or("-"),
            "Manifest parsed"
        );
        Ok(Self {
            location: location.to_path_buf(),
            root,
            separator: DEFAULT_INCLUDE_SEPARATOR,
        })
    }

    /// Separator used when writing `Include` attributes.
    pub fn with_separator(mut self, separator: char) -> Self {
        self.separator = separator;
        self
    }

    pub fn root(&self) -> &Element {
        &self.root
    }

    /// Namespace the root element lives in, if any.
    pub fn default_namespace(&self) -> Option<&str> {
        self.root.namespace.as_deref()
    }

    /// First element matching `expr`. No match is `Ok(None)`.
    pub fn query_single(&self, expr: &str) -> Result<Option<&Element>, QueryError> {
        Ok(self.query_all(expr)?.into_iter().next())
    }

    /// Every element matching `expr`, in document order.
    pub fn query_all(&self, expr: &str) -> Result<Vec<&Element>, QueryError> {
        Ok(QueryPath::parse(expr)?.select(&self.root))
    }

    /// `ItemGroup` elements directly below the root.
    pub fn item_groups(&self) -> Vec<&Element> {
        child_elements(&self.root)
            .filter(|e| e.name == ITEM_GROUP)
            .collect()
    }

    /// Append `entry` to the `group`-th item group (see
    /// [`item_groups`](Self::item_groups)).
    pub fn append_to_group(&mut self, group: usize, entry: &ManifestEntry) -> GraftResult<()> {
        let index = self
            .item_group_positions()
            .get(group)
            .copied()
            .ok_or_else(|| ApplicationError::ManifestError {
                path: self.location.clone(),
                reason: format!("no item group #{group}"),
            })?;
        self.push_item(index, entry);
        Ok(())
    }

    /// Write the document to `path`.
    pub fn save_to(&self, path: &Path) -> GraftResult<()> {
        let file = File::create(path)
            .map_err(|e| ApplicationError::filesystem(path, format!("Failed to write manifest: {e}")))?;
        let mut writer = BufWriter::new(file);
        self.write(&mut writer, path)?;
        writer
            .flush()
            .map_err(|e| ApplicationError::filesystem(path, format!("Failed to write manifest: {e}")))?;
        debug!(path = %path.display(), "Manifest saved");
        Ok(())
    }

    /// Serialized document text.
    pub fn to_xml_string(&self) -> GraftResult<String> {
        let mut buffer = Vec::new();
        self.write(&mut buffer, &self.location)?;
        String::from_utf8(buffer).map_err(|e| {
            ApplicationError::ManifestError {
                path: self.location.clone(),
                reason: e.to_string(),
            }
            .into()
        })
    }

    // -------------------------------------------------------------------------
    // Internal Helpers
    // -------------------------------------------------------------------------

    fn write<W: Write>(&self, writer: W, path: &Path) -> GraftResult<()> {
        let config = EmitterConfig::new()
            .perform_indent(true)
            .indent_string("  ");
        self.root
            .write_with_config(writer, config)
            .map_err(|e| {
                ApplicationError::ManifestError {
                    path: path.to_path_buf(),
                    reason: e.to_string(),
                }
                .into()
            })
    }

    /// Positions of the `ItemGroup` elements within the root's children.
    fn item_group_positions(&self) -> Vec<usize> {
        self.root
            .children
            .iter()
            .enumerate()
            .filter_map(|(i, node)| match node {
                XMLNode::Element(e) if e.name == ITEM_GROUP => Some(i),
                _ => None,
            })
            .collect()
    }

    /// Group already holding items of `kind`, or a new one at the end.
    fn group_for(&mut self, kind: &EntryKind) -> usize {
        let existing = self.item_group_positions().into_iter().find(|&i| {
            matches!(&self.root.children[i], XMLNode::Element(group)
                if child_elements(group).any(|item| item.name == kind.as_str()))
        });
        if let Some(index) = existing {
            return index;
        }

        trace!(kind = %kind, "Adding item group");
        let group = self.new_element(ITEM_GROUP);
        self.root.children.push(XMLNode::Element(group));
        self.root.children.len() - 1
    }

    fn push_item(&mut self, group_index: usize, entry: &ManifestEntry) {
        let mut item = self.new_element(entry.kind.as_str());
        item.attributes.insert(
            INCLUDE.to_string(),
            entry.include.to_manifest_string(self.separator),
        );
        if let Some(XMLNode::Element(group)) = self.root.children.get_mut(group_index) {
            group.children.push(XMLNode::Element(item));
        }
    }

    fn new_element(&self, name: &str) -> Element {
        let mut element = Element::new(name);
        if self.root.prefix.is_none() {
            element.namespace = self.root.namespace.clone();
        }
        element
    }
}

impl ManifestDocument for XmlManifest {
    fn location(&self) -> &Path {
        &self.location
    }

    fn entries(&self) -> Vec<ManifestEntry> {
        let mut entries = Vec::new();
        for group in self.item_groups() {
            for item in child_elements(group) {
                let Some(include) = item.attributes.get(INCLUDE) else {
                    continue;
                };
                let Ok(kind) = item.name.parse::<EntryKind>() else {
                    continue;
                };
                match LogicalPath::parse(include) {
                    Ok(path) if !path.is_root() => entries.push(ManifestEntry::new(kind, path)),
                    Ok(_) => {}
                    Err(e) => trace!(include = %include, error = %e, "Ignoring item"),
                }
            }
        }
        entries
    }

    fn append_entry(&mut self, entry: &ManifestEntry) -> GraftResult<()> {
        let group = self.group_for(&entry.kind);
        self.push_item(group, entry);
        Ok(())
    }

    fn save(&mut self) -> GraftResult<()> {
        let location = self.location.clone();
        self.save_to(&location)
    }
}

fn strip_whitespace(element: &mut Element) {
    element
        .children
        .retain(|node| !matches!(node, XMLNode::Text(text) if text.trim().is_empty()));
    for child in &mut element.children {
        if let XMLNode::Element(e) = child {
            strip_whitespace(e);
        }
    }
}
