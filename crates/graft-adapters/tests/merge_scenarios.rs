//! End-to-end merges against a real filesystem and XML manifest.

use std::fs;
use std::path::Path;

use graft_adapters::{InMemoryManifest, LocalFilesystem, MemoryFilesystem, XmlManifestStore};
use graft_core::{
    application::{
        InitRequest, MergeRequest, MergeService, ProjectService,
        ports::{ManifestDocument, ManifestStore},
    },
    domain::{EntryFilter, LogicalPath, PathClassifier, PlaceholderPolicy},
};
use tempfile::TempDir;

const EMPTY_PROJECT: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<Project ToolsVersion="12.0" xmlns="http://schemas.microsoft.com/developer/msbuild/2003">
  <PropertyGroup>
    <RootNamespace>Shop</RootNamespace>
  </PropertyGroup>
</Project>
"#;

struct Fixture {
    _tmp: TempDir,
    source: std::path::PathBuf,
    project: std::path::PathBuf,
    manifest: std::path::PathBuf,
}

fn fixture() -> Fixture {
    let tmp = TempDir::new().unwrap();
    let source = tmp.path().join("payload");
    fs::create_dir_all(source.join("emptydir")).unwrap();
    fs::write(source.join("a.ts"), "export const a = 1;").unwrap();
    fs::write(source.join("b.resx"), "<root />").unwrap();
    fs::write(source.join("c.xyz"), "xyz").unwrap();

    let project = tmp.path().join("Shop");
    fs::create_dir_all(&project).unwrap();
    let manifest = project.join("Shop.csproj");
    fs::write(&manifest, EMPTY_PROJECT).unwrap();

    Fixture {
        _tmp: tmp,
        source,
        project,
        manifest,
    }
}

fn merge(fx: &Fixture, request: MergeRequest) -> graft_core::application::MergeReport {
    let service = MergeService::new(Box::new(LocalFilesystem::new()), PathClassifier::default());
    let mut manifest = XmlManifestStore::new().open(&fx.manifest).unwrap();
    service.merge(&request, manifest.as_mut()).unwrap()
}

fn manifest_entries(path: &Path) -> Vec<String> {
    let manifest = XmlManifestStore::new().open(path).unwrap();
    let mut rendered: Vec<String> = manifest.entries().iter().map(ToString::to_string).collect();
    rendered.sort();
    rendered
}

#[test]
fn materialized_placeholder_scenario() {
    let fx = fixture();
    merge(&fx, MergeRequest::new(&fx.source, &fx.project));

    assert_eq!(
        manifest_entries(&fx.manifest),
        vec![
            "Content:/c.xyz",
            "Content:/emptydir/readme.txt",
            "EmbeddedResource:/b.resx",
            "TypeScriptCompile:/a.ts",
        ]
    );
    assert!(fx.project.join("emptydir/readme.txt").is_file());
    let text = fs::read_to_string(&fx.manifest).unwrap();
    assert!(text.contains(r#"xmlns="http://schemas.microsoft.com/developer/msbuild/2003""#));
    assert!(text.contains(r#"Include="emptydir\readme.txt""#));
}

#[test]
fn folder_marker_scenario() {
    let fx = fixture();
    merge(
        &fx,
        MergeRequest::new(&fx.source, &fx.project).placeholders(PlaceholderPolicy::Folder),
    );

    assert_eq!(
        manifest_entries(&fx.manifest),
        vec![
            "Content:/c.xyz",
            "EmbeddedResource:/b.resx",
            "Folder:/emptydir",
            "TypeScriptCompile:/a.ts",
        ]
    );
    let emptydir = fx.project.join("emptydir");
    assert!(emptydir.is_dir());
    assert_eq!(fs::read_dir(emptydir).unwrap().count(), 0);
}

#[test]
fn rerun_is_idempotent_and_leaves_manifest_untouched() {
    let fx = fixture();
    let request = MergeRequest::new(&fx.source, &fx.project);
    merge(&fx, request.clone());
    let first = fs::read_to_string(&fx.manifest).unwrap();

    let second = merge(&fx, request);

    assert_eq!(second.new_entry_count(), 0);
    assert!(second.copied.is_empty());
    assert_eq!(second.skipped.len(), 3);
    assert!(!second.manifest_saved);
    assert_eq!(fs::read_to_string(&fx.manifest).unwrap(), first);
}

#[test]
fn overwrite_policy_on_real_files() {
    let fx = fixture();
    fs::write(fx.project.join("c.xyz"), "A").unwrap();
    fs::write(fx.source.join("c.xyz"), "B").unwrap();

    merge(&fx, MergeRequest::new(&fx.source, &fx.project));
    assert_eq!(fs::read_to_string(fx.project.join("c.xyz")).unwrap(), "A");

    merge(&fx, MergeRequest::new(&fx.source, &fx.project).overwrite(true));
    assert_eq!(fs::read_to_string(fx.project.join("c.xyz")).unwrap(), "B");
}

#[test]
fn logical_root_and_exclude_filter() {
    let fx = fixture();
    let request = MergeRequest::new(&fx.source, &fx.project)
        .logical_root(LogicalPath::parse("wwwroot").unwrap())
        .filter(EntryFilter::all().exclude("*.RESX").unwrap());

    merge(&fx, request);

    let entries = manifest_entries(&fx.manifest);
    assert!(entries.contains(&"TypeScriptCompile:/wwwroot/a.ts".to_string()));
    assert!(!entries.iter().any(|e| e.contains("b.resx")));
    assert!(fx.project.join("wwwroot/a.ts").is_file());
}

#[test]
fn project_initialization_then_merge() {
    let tmp = TempDir::new().unwrap();
    let template = tmp.path().join("template");
    fs::create_dir_all(template.join("Properties")).unwrap();
    fs::write(template.join("Template.csproj"), EMPTY_PROJECT).unwrap();
    fs::write(template.join("Properties/AssemblyInfo.cs"), "// info").unwrap();
    let payload = tmp.path().join("extract/package");
    fs::create_dir_all(payload.join("content/css")).unwrap();
    fs::write(payload.join("content/css/site.css"), "body {}").unwrap();
    fs::write(payload.join("content/index.html"), "<html></html>").unwrap();
    let target = tmp.path().join("out");

    let projects = ProjectService::new(
        Box::new(LocalFilesystem::new()),
        Box::new(XmlManifestStore::new()),
    );
    let project = projects
        .initialize(&InitRequest::new(&template, &target, "csproj").project_name("Shop"))
        .unwrap();
    assert!(target.join("Shop.csproj").is_file());
    assert!(!target.join("Template.csproj").exists());

    let source = projects
        .locate_payload_root(&tmp.path().join("extract"), 8)
        .unwrap();
    assert_eq!(source, payload.join("content"));

    let mut manifest = projects.open_manifest(&project).unwrap();
    MergeService::new(Box::new(LocalFilesystem::new()), PathClassifier::default())
        .merge(&MergeRequest::new(&source, &project.root), manifest.as_mut())
        .unwrap();

    assert_eq!(
        manifest_entries(&project.manifest_path),
        vec!["Content:/css/site.css", "Content:/index.html"]
    );

    // Same request again reuses the project.
    let again = projects
        .initialize(&InitRequest::new(&template, &target, "csproj").project_name("Shop"))
        .unwrap();
    assert!(again.reused);
}

#[test]
fn memory_adapters_drive_the_same_merge() {
    let fs = MemoryFilesystem::new();
    fs.write_file("/src/a.ts", "a").unwrap();
    graft_core::application::ports::Filesystem::create_dir_all(&fs, Path::new("/src/empty"))
        .unwrap();
    let mut manifest = InMemoryManifest::new("/p/App.csproj");

    let report = MergeService::new(Box::new(fs.clone()), PathClassifier::default())
        .merge(&MergeRequest::new("/src", "/p"), &mut manifest)
        .unwrap();

    assert_eq!(
        manifest.rendered(),
        vec!["Content:/empty/readme.txt", "TypeScriptCompile:/a.ts"]
    );
    assert_eq!(manifest.saves(), 1);
    assert_eq!(report.placeholders.len(), 1);
    assert_eq!(fs.read_file(Path::new("/p/a.ts")).as_deref(), Some("a"));
}
