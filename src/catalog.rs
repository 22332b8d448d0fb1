//! Building menu trees from a TOML description or a folder of loops.

use std::collections::{HashMap, HashSet};
use std::fs;
use std::num::NonZeroU32;
use std::path::{Path, PathBuf};
use std::time::Duration;

use indextree::NodeId;
use jwalk::WalkDir;
use serde::Deserialize;
use tracing::{info, warn};

use crate::error::CatalogError;
use crate::node::{Category, ContentLeaf, Lifespan, MenuNode, Rgba, DEFAULT_LENGTH_UNITS};
use crate::tree::MenuTree;

/// Extensions picked up by [`scan_directory`]
pub const AUDIO_EXTENSIONS: [&str; 6] = ["wav", "aif", "aiff", "flac", "mp3", "ogg"];

/// Colour of a root that does not name one
pub const DEFAULT_ROOT_COLOR: Rgba = Rgba::rgb(59, 130, 246);

/// Menu shipped with the binaries when no catalog is given.
pub const SAMPLE_CATALOG: &str = r##"
[root]
label = "Loops"
color = "#3b82f6"

[[root.children]]
label = "Drums"
category = "drums"

[[root.children.children]]
label = "Kick 8"
content = "drums/kick.wav"
length = 8

[[root.children.children]]
label = "Hats"
content = "drums/hats.wav"
lifespan_ms = 4000

[[root.children]]
label = "Bass"
category = "bass"

[[root.children.children]]
label = "Sub"
content = "bass/sub.wav"

[[root.children.children]]
label = "Acid"
content = "bass/acid.wav"
length = 2

[[root.children.children]]
label = "Wobble"
content = "bass/wobble.wav"

[[root.children]]
label = "Lead"
category = "lead"

[[root.children.children]]
label = "Vox"
content = "lead/vox.wav"

[[root.children.children]]
label = "Arp"
category = "lead"

[[root.children.children.children]]
label = "Arp up"
content = "lead/arp_up.wav"

[[root.children.children.children]]
label = "Arp down"
content = "lead/arp_down.wav"
"##;

/// Declarative catalog file
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogSpec {
    pub ring_width: Option<f32>,
    pub root: CatalogEntry,
}

/// One node of a catalog file; entries without children are leaves.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CatalogEntry {
    #[serde(default)]
    pub label: String,
    pub category: Option<Category>,
    pub color: Option<Rgba>,
    pub content: Option<PathBuf>,
    pub length: Option<u32>,
    pub lifespan_ms: Option<u64>,
    #[serde(default)]
    pub children: Vec<CatalogEntry>,
}

/// A built tree plus the ring width the catalog asked for, if any.
#[derive(Debug, Clone)]
pub struct Catalog {
    pub tree: MenuTree,
    pub ring_width: Option<f32>,
}

/// Display colour for a category, as used when a catalog gives none.
pub fn category_color(category: Category, is_leaf: bool) -> Rgba {
    let saturation = if is_leaf { 0.75 } else { 0.45 };
    Rgba::from_hsv(category.hue_degrees(), saturation, 0.95)
}

impl CatalogSpec {
    pub fn from_toml_str(raw: &str) -> Result<Self, CatalogError> {
        Ok(toml::from_str(raw)?)
    }

    pub fn build(&self) -> Result<Catalog, CatalogError> {
        let root = &self.root;
        let root_node = MenuNode::new(
            root.category.unwrap_or_default(),
            root.color.unwrap_or(DEFAULT_ROOT_COLOR),
        )
        .with_label(root.label.clone());

        let mut tree = MenuTree::new(root_node);
        let root_id = tree.root();
        for child in &root.children {
            add_entry(&mut tree, root_id, child)?;
        }

        info!(nodes = tree.node_count(), depth = tree.max_depth(root_id), "catalog built");
        Ok(Catalog {
            tree,
            ring_width: self.ring_width,
        })
    }
}

fn add_entry(tree: &mut MenuTree, parent: NodeId, entry: &CatalogEntry) -> Result<(), CatalogError> {
    if let (Some(content), false) = (&entry.content, entry.children.is_empty()) {
        warn!(label = %entry.label, content = %content.display(), "entry has children, ignoring its content");
    }
    if entry.children.is_empty() {
        let leaf = entry_leaf(entry)?;
        let color = entry.color.unwrap_or_else(|| category_color(leaf.category, true));
        tree.add_child(parent, MenuNode::leaf(entry.label.clone(), color, leaf));
        return Ok(());
    }

    let category = entry.category.unwrap_or_default();
    let color = entry.color.unwrap_or_else(|| category_color(category, false));
    let id = tree.add_child(parent, MenuNode::new(category, color).with_label(entry.label.clone()));
    for child in &entry.children {
        add_entry(tree, id, child)?;
    }
    Ok(())
}

fn entry_leaf(entry: &CatalogEntry) -> Result<ContentLeaf, CatalogError> {
    let content = entry.content.clone().unwrap_or_default();
    let category = entry.category.unwrap_or_else(|| Category::from_path(&content));
    let length = NonZeroU32::new(entry.length.unwrap_or(DEFAULT_LENGTH_UNITS)).ok_or_else(|| {
        CatalogError::InvalidLength {
            label: entry.label.clone(),
        }
    })?;
    let lifespan = match entry.lifespan_ms {
        Some(ms) => Lifespan::Finite(Duration::from_millis(ms)),
        None => Lifespan::Infinite,
    };

    Ok(ContentLeaf::new(content, category)
        .with_length(length)
        .with_lifespan(lifespan))
}

pub fn load_catalog(path: &Path) -> Result<Catalog, CatalogError> {
    let raw = fs::read_to_string(path).map_err(|source| CatalogError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    CatalogSpec::from_toml_str(&raw)?.build()
}

pub fn sample_catalog() -> Result<Catalog, CatalogError> {
    CatalogSpec::from_toml_str(SAMPLE_CATALOG)?.build()
}

/// Catalog file or loop folder, whichever `path` is.
pub fn load_menu(path: &Path) -> Result<Catalog, CatalogError> {
    if path.is_dir() {
        Ok(Catalog {
            tree: scan_directory(path)?,
            ring_width: None,
        })
    } else {
        load_catalog(path)
    }
}

fn is_audio(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|ext| AUDIO_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

fn display_name(path: &Path, fallback: &str) -> String {
    path.file_stem()
        .and_then(|n| n.to_str())
        .unwrap_or(fallback)
        .to_string()
}

/// Build a menu from a folder of loops. Folders become internal nodes and
/// audio files become leaves whose content is the file's absolute path;
/// folders without audio anywhere below them are dropped. Entries are
/// visited in sorted order.
pub fn scan_directory(root: &Path) -> Result<MenuTree, CatalogError> {
    let metadata = fs::metadata(root).map_err(|source| CatalogError::Io {
        path: root.to_path_buf(),
        source,
    })?;
    if !metadata.is_dir() {
        return Err(CatalogError::Walk {
            path: root.to_path_buf(),
            message: "not a directory".into(),
        });
    }
    let root = fs::canonicalize(root).map_err(|source| CatalogError::Io {
        path: root.to_path_buf(),
        source,
    })?;
    let root = root.as_path();

    let mut dirs = Vec::new();
    let mut files = Vec::new();
    for entry in WalkDir::new(root).sort(true).skip_hidden(true) {
        match entry {
            Ok(entry) if entry.depth == 0 => {}
            Ok(entry) => {
                let path = entry.path();
                if entry.file_type.is_dir() {
                    dirs.push(path);
                } else if is_audio(&path) {
                    files.push(path);
                }
            }
            Err(err) => warn!(error = %err, "skipping unreadable entry"),
        }
    }

    if files.is_empty() {
        return Err(CatalogError::EmptyCatalog(root.to_path_buf()));
    }

    // Folders that lead to at least one loop
    let mut useful: HashSet<PathBuf> = HashSet::new();
    for file in &files {
        for ancestor in file.ancestors().skip(1) {
            if ancestor == root || !useful.insert(ancestor.to_path_buf()) {
                break;
            }
        }
    }
    let pruned = dirs.iter().filter(|d| !useful.contains(*d)).count();

    let root_label = display_name(root, "/");
    let mut tree = MenuTree::new(MenuNode::new(Category::None, DEFAULT_ROOT_COLOR).with_label(root_label));
    let mut path_to_node: HashMap<PathBuf, NodeId> = HashMap::new();
    path_to_node.insert(root.to_path_buf(), tree.root());

    // Sorting puts every parent before its children
    let mut paths: Vec<(PathBuf, bool)> = dirs
        .into_iter()
        .filter(|d| useful.contains(d))
        .map(|d| (d, true))
        .chain(files.into_iter().map(|f| (f, false)))
        .collect();
    paths.sort();

    for (path, is_dir) in paths {
        let Some(parent) = path.parent().and_then(|p| path_to_node.get(p)).copied() else {
            warn!(path = %path.display(), "no parent in catalog, skipping");
            continue;
        };
        let relative = path.strip_prefix(root).unwrap_or(&path);
        let category = Category::from_path(relative);

        if is_dir {
            let label = path
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or("")
                .to_string();
            let node = MenuNode::new(category, category_color(category, false)).with_label(label);
            let id = tree.add_child(parent, node);
            path_to_node.insert(path, id);
        } else {
            let label = display_name(&path, "");
            let leaf = ContentLeaf::new(path.as_path(), category);
            tree.add_child(parent, MenuNode::leaf(label, category_color(category, true), leaf));
        }
    }

    info!(
        root = %root.display(),
        nodes = tree.node_count(),
        pruned,
        "loop folder scanned"
    );
    Ok(tree)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(tree: &MenuTree, id: NodeId) -> Vec<String> {
        tree.children(id)
            .map(|c| tree.node(c).unwrap().label().to_string())
            .collect()
    }

    #[test]
    fn test_toml_builds_declared_shape() {
        let catalog = sample_catalog().unwrap();
        let tree = &catalog.tree;
        let root = tree.root();

        assert_eq!(labels(tree, root), vec!["Drums", "Bass", "Lead"]);
        assert_eq!(tree.max_depth(root), 3);
        assert_eq!(tree.node(root).unwrap().color(), Rgba::rgb(0x3b, 0x82, 0xf6));
        assert!(catalog.ring_width.is_none());

        let drums = tree.children(root).next().unwrap();
        assert_eq!(tree.node(drums).unwrap().category(), Category::Drums);
        let kick = tree.children(drums).next().unwrap();
        let payload = tree.node(kick).unwrap().payload().unwrap();
        assert_eq!(payload.length.get(), 8);
        assert_eq!(payload.category, Category::Drums);
        assert_eq!(payload.lifespan, Lifespan::Infinite);

        let hats = tree.children(drums).nth(1).unwrap();
        let payload = tree.node(hats).unwrap().payload().unwrap();
        assert_eq!(payload.length.get(), DEFAULT_LENGTH_UNITS);
        assert_eq!(payload.lifespan, Lifespan::Finite(Duration::from_millis(4000)));
    }

    #[test]
    fn test_zero_length_rejected() {
        let raw = r#"
ring_width = 90.0
[root]
label = "r"
[[root.children]]
label = "broken"
content = "a.wav"
length = 0
"#;
        let spec = CatalogSpec::from_toml_str(raw).unwrap();
        assert_eq!(spec.ring_width, Some(90.0));
        assert!(matches!(spec.build(), Err(CatalogError::InvalidLength { label }) if label == "broken"));
    }

    #[test]
    fn test_entry_with_children_is_internal() {
        let raw = r#"
[root]
label = "r"
[[root.children]]
label = "mixed"
content = "ignored.wav"
[[root.children.children]]
label = "inner"
content = "inner.wav"
"#;
        let catalog = CatalogSpec::from_toml_str(raw).unwrap().build().unwrap();
        let tree = &catalog.tree;
        let mixed = tree.children(tree.root()).next().unwrap();
        assert!(tree.node(mixed).unwrap().payload().is_none());
        assert_eq!(labels(tree, mixed), vec!["inner"]);
    }

    #[test]
    fn test_bad_toml_and_missing_file() {
        assert!(matches!(CatalogSpec::from_toml_str("[root"), Err(CatalogError::Parse(_))));

        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            load_catalog(&dir.path().join("nope.toml")),
            Err(CatalogError::Io { .. })
        ));
    }

    #[test]
    fn test_load_catalog_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("menu.toml");
        fs::write(&path, SAMPLE_CATALOG).unwrap();
        let catalog = load_catalog(&path).unwrap();
        assert_eq!(catalog.tree.node_count(), 13);
    }

    #[test]
    fn test_scan_directory() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("Drums/Kicks")).unwrap();
        fs::create_dir_all(root.join("Bass")).unwrap();
        fs::create_dir_all(root.join("Empty/Deeper")).unwrap();
        fs::write(root.join("Drums/Kicks/808.wav"), b"").unwrap();
        fs::write(root.join("Drums/snare.WAV"), b"").unwrap();
        fs::write(root.join("Drums/notes.txt"), b"").unwrap();
        fs::write(root.join("Bass/sub.flac"), b"").unwrap();
        fs::write(root.join("Empty/Deeper/readme.md"), b"").unwrap();

        let tree = scan_directory(root).unwrap();
        let root_id = tree.root();
        assert_eq!(labels(&tree, root_id), vec!["Bass", "Drums"]);

        let drums = tree.children(root_id).nth(1).unwrap();
        assert_eq!(tree.node(drums).unwrap().category(), Category::Drums);
        assert_eq!(labels(&tree, drums), vec!["Kicks", "snare"]);

        let kicks = tree.children(drums).next().unwrap();
        let kick = tree.children(kicks).next().unwrap();
        let node = tree.node(kick).unwrap();
        assert_eq!(node.label(), "808");
        assert_eq!(node.category(), Category::Drums);
        let expected = root.canonicalize().unwrap().join("Drums/Kicks/808.wav");
        assert_eq!(node.payload().unwrap().content, expected);
        assert!(node.payload().unwrap().content.is_absolute());

        // root, Bass, sub, Drums, Kicks, 808, snare
        assert_eq!(tree.node_count(), 7);
    }

    #[test]
    fn test_load_menu_picks_source() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("loops/bass")).unwrap();
        fs::write(dir.path().join("loops/bass/sub.ogg"), b"").unwrap();
        let path = dir.path().join("menu.toml");
        fs::write(&path, SAMPLE_CATALOG).unwrap();

        let scanned = load_menu(&dir.path().join("loops")).unwrap();
        assert_eq!(scanned.tree.node_count(), 3);
        let parsed = load_menu(&path).unwrap();
        assert_eq!(parsed.tree.node_count(), 13);
    }

    #[test]
    fn test_scan_empty_directory() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("readme.txt"), b"").unwrap();
        assert!(matches!(scan_directory(dir.path()), Err(CatalogError::EmptyCatalog(_))));

        let file = dir.path().join("readme.txt");
        assert!(matches!(scan_directory(&file), Err(CatalogError::Walk { .. })));
    }
}
