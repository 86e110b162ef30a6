//! Project Service - establishes the project a merge writes into.
//!
//! A project is a target directory plus its manifest. It is created by
//! copying a template tree, or reused when the target already holds the
//! expected manifest.

use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument};

use crate::{
    application::{
        ApplicationError,
        ports::{Filesystem, ManifestDocument, ManifestStore},
    },
    domain::DomainError,
    error::GraftResult,
};

/// Default bound for [`ProjectService::locate_payload_root`].
pub const DEFAULT_LOCATE_DEPTH: usize = 8;

/// Parameters for creating (or reusing) a project.
#[derive(Debug, Clone)]
pub struct InitRequest {
    pub template_dir: PathBuf,
    pub target_dir: PathBuf,
    /// Renames the manifest to `<name>.<extension>`.
    pub project_name: Option<String>,
    /// Manifest file extension, without the dot (`csproj`).
    pub manifest_extension: String,
}

impl InitRequest {
    pub fn new(
        template_dir: impl Into<PathBuf>,
        target_dir: impl Into<PathBuf>,
        manifest_extension: impl Into<String>,
    ) -> Self {
        Self {
            template_dir: template_dir.into(),
            target_dir: target_dir.into(),
            project_name: None,
            manifest_extension: manifest_extension.into(),
        }
    }

    pub fn project_name(mut self, name: impl Into<String>) -> Self {
        self.project_name = Some(name.into());
        self
    }
}

/// An established project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    pub root: PathBuf,
    pub manifest_path: PathBuf,
    /// The manifest was already there; no template was copied.
    pub reused: bool,
    /// Template files copied into the target.
    pub copied: usize,
}

pub struct ProjectService {
    filesystem: Box<dyn Filesystem>,
    manifests: Box<dyn ManifestStore>,
}

impl ProjectService {
    pub fn new(filesystem: Box<dyn Filesystem>, manifests: Box<dyn ManifestStore>) -> Self {
        Self {
            filesystem,
            manifests,
        }
    }

    /// Create the project at `request.target_dir` from the template, or
    /// reuse it if the expected manifest is already there.
    ///
    /// # Errors
    ///
    /// - `NotFound` when the template directory or its manifest is missing
    /// - `AlreadyExists` when the target holds a different manifest
    #[instrument(
        skip_all,
        fields(
            template = %request.template_dir.display(),
            target = %request.target_dir.display()
        )
    )]
    pub fn initialize(&self, request: &InitRequest) -> GraftResult<Project> {
        let ext = request.manifest_extension.as_str();
        if !self.filesystem.is_dir(&request.template_dir) {
            return Err(
                ApplicationError::not_found("template directory", &request.template_dir).into(),
            );
        }
        let template_manifest = self.single_manifest(&request.template_dir, ext)?;
        let template_name = file_name(&template_manifest);
        let manifest_name = match &request.project_name {
            Some(name) => format!("{name}.{ext}"),
            None => template_name.clone(),
        };
        let manifest_path = request.target_dir.join(&manifest_name);

        if self.filesystem.is_dir(&request.target_dir) {
            let existing = self.manifests_in(&request.target_dir, ext)?;
            if existing
                .iter()
                .any(|p| file_name(p).eq_ignore_ascii_case(&manifest_name))
            {
                info!(manifest = %manifest_path.display(), "Reusing existing project");
                self.manifests.open(&manifest_path)?;
                return Ok(Project {
                    root: request.target_dir.clone(),
                    manifest_path,
                    reused: true,
                    copied: 0,
                });
            }
            if let Some(other) = existing.into_iter().next() {
                return Err(ApplicationError::AlreadyExists {
                    path: other,
                    reason: format!("target already holds a manifest other than '{manifest_name}'"),
                }
                .into());
            }
        }

        let copied = self.copy_template(&request.template_dir, &request.target_dir)?;
        if manifest_name != template_name {
            self.filesystem
                .rename(&request.target_dir.join(&template_name), &manifest_path)?;
        }
        self.manifests.open(&manifest_path)?;

        info!(copied, manifest = %manifest_path.display(), "Project created");
        Ok(Project {
            root: request.target_dir.clone(),
            manifest_path,
            reused: false,
            copied,
        })
    }

    /// Open an existing project, locating its manifest unless given.
    pub fn open(
        &self,
        project_dir: &Path,
        manifest: Option<&Path>,
        manifest_extension: &str,
    ) -> GraftResult<Project> {
        if !self.filesystem.is_dir(project_dir) {
            return Err(ApplicationError::not_found("project directory", project_dir).into());
        }
        let manifest_path = match manifest {
            Some(path) if self.filesystem.exists(path) => path.to_path_buf(),
            Some(path) => return Err(ApplicationError::not_found("project manifest", path).into()),
            None => self.single_manifest(project_dir, manifest_extension)?,
        };
        Ok(Project {
            root: project_dir.to_path_buf(),
            manifest_path,
            reused: true,
            copied: 0,
        })
    }

    pub fn open_manifest(&self, project: &Project) -> GraftResult<Box<dyn ManifestDocument>> {
        self.manifests.open(&project.manifest_path)
    }

    /// Find the directory an extracted payload really starts at.
    ///
    /// Descends while a directory holds a single subdirectory and nothing
    /// else, at most `max_depth` times. A directory with files or with
    /// several subdirectories qualifies.
    ///
    /// # Errors
    ///
    /// `StructuralInconsistency` naming the last directory visited when an
    /// empty directory is reached or the bound is exceeded.
    #[instrument(skip(self, dir), fields(dir = %dir.display()))]
    pub fn locate_payload_root(&self, dir: &Path, max_depth: usize) -> GraftResult<PathBuf> {
        if !self.filesystem.is_dir(dir) {
            return Err(ApplicationError::not_found("payload directory", dir).into());
        }

        let mut current = dir.to_path_buf();
        for depth in 0..=max_depth {
            let entries = self.filesystem.read_dir(&current)?;
            if entries.is_empty() {
                return Err(DomainError::StructuralInconsistency {
                    path: current.display().to_string(),
                    reason: "payload directory is empty".into(),
                }
                .into());
            }

            let mut dirs = entries.iter().filter(|e| e.is_dir());
            let only_child = match (dirs.next(), dirs.next()) {
                (Some(child), None) if entries.len() == 1 => Some(child),
                _ => None,
            };
            match only_child {
                Some(child) => {
                    debug!(depth, next = %child.path.display(), "Descending");
                    current = child.path.clone();
                }
                None => {
                    info!(root = %current.display(), depth, "Payload root located");
                    return Ok(current);
                }
            }
        }

        Err(DomainError::StructuralInconsistency {
            path: current.display().to_string(),
            reason: format!("no directory with content within {max_depth} levels"),
        }
        .into())
    }

    // -------------------------------------------------------------------------
    // Internal Helpers
    // -------------------------------------------------------------------------

    fn manifests_in(&self, dir: &Path, ext: &str) -> GraftResult<Vec<PathBuf>> {
        Ok(self
            .filesystem
            .read_dir(dir)?
            .into_iter()
            .filter(|e| !e.is_dir() && has_extension(&e.path, ext))
            .map(|e| e.path)
            .collect())
    }

    fn single_manifest(&self, dir: &Path, ext: &str) -> GraftResult<PathBuf> {
        let mut found = self.manifests_in(dir, ext)?;
        match found.len() {
            0 => Err(ApplicationError::not_found(format!("*.{ext} project manifest"), dir).into()),
            1 => Ok(found.remove(0)),
            n => Err(DomainError::StructuralInconsistency {
                path: dir.display().to_string(),
                reason: format!("found {n} *.{ext} manifests, expected one"),
            }
            .into()),
        }
    }

    /// Copy the template tree, never replacing existing files.
    fn copy_template(&self, template: &Path, target: &Path) -> GraftResult<usize> {
        self.filesystem.create_dir_all(target)?;
        let walk = self.filesystem.walk(template)?;
        if let Some(bad) = walk.unreadable.first() {
            return Err(ApplicationError::filesystem(&bad.path, &bad.reason).into());
        }

        let mut copied = 0;
        for entry in walk.entries.iter().filter(|e| !e.is_dir()) {
            let destination = target.join(&entry.relative);
            if self.filesystem.exists(&destination) {
                debug!(path = %destination.display(), "Keeping existing file");
                continue;
            }
            self.filesystem.copy_file(&entry.path, &destination)?;
            copied += 1;
        }
        for entry in walk.entries.iter().filter(|e| e.is_dir()) {
            self.filesystem.create_dir_all(&target.join(&entry.relative))?;
        }
        Ok(copied)
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn has_extension(path: &Path, ext: &str) -> bool {
    path.extension()
        .is_some_and(|e| e.to_string_lossy().eq_ignore_ascii_case(ext))
}
