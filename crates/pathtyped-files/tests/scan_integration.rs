//! Integration tests for scanning real resource folders.

use pathtyped_core::{Entry, MapNode, Node};
use pathtyped_files::{DefinitionFile, Scanner};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn touch(root: &Path, relative: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, relative).unwrap();
}

fn count_leaves(map: &MapNode) -> (usize, usize) {
    let mut files = 0;
    let mut dirs = 0;
    for (_, entry) in map.iter() {
        match entry {
            Entry::Raw(_) => files += 1,
            Entry::Node(Node::Map(inner)) => {
                dirs += 1;
                let (f, d) = count_leaves(inner);
                files += f;
                dirs += d;
            }
            other => panic!("unexpected entry {other:?}"),
        }
    }
    (files, dirs)
}

#[test]
fn test_one_leaf_per_file_one_map_per_directory() {
    let temp = TempDir::new().unwrap();
    for file in [
        "audio/bgm/underwater1.ogg",
        "audio/bgm/underwater2.ogg",
        "audio/sfx/jump.wav",
        "fonts/monogram.ttf",
        "images/fallback.png",
        "images/player/sheet.png",
        "script.txt",
        "__pycache__/ignored.pyc",
    ] {
        touch(temp.path(), file);
    }

    let tree = Scanner::new("__.*__").unwrap().scan(temp.path()).unwrap();
    let (files, dirs) = count_leaves(&tree);
    assert_eq!(files, 7);
    assert_eq!(dirs, 6);
    assert!(!tree.contains_key("__pycache__"));
}

#[test]
fn test_rescan_is_identical() {
    let temp = TempDir::new().unwrap();
    touch(temp.path(), "b/2.txt");
    touch(temp.path(), "a/1.txt");
    touch(temp.path(), "c.txt");

    let scanner = Scanner::new("").unwrap();
    assert_eq!(
        scanner.scan(temp.path()).unwrap(),
        scanner.scan(temp.path()).unwrap()
    );
}

#[cfg(unix)]
#[test]
fn test_symlinked_directory_is_followed() {
    let temp = TempDir::new().unwrap();
    let outside = TempDir::new().unwrap();
    touch(outside.path(), "linked.txt");
    std::os::unix::fs::symlink(outside.path(), temp.path().join("shared")).unwrap();

    let tree = Scanner::new("").unwrap().scan(temp.path()).unwrap();
    let shared = tree
        .get("shared")
        .and_then(Entry::as_node)
        .and_then(Node::as_map)
        .unwrap();
    assert!(shared.contains_key("linked.txt"));
}

#[cfg(unix)]
#[test]
fn test_symlink_loop_is_io_error() {
    let temp = TempDir::new().unwrap();
    fs::create_dir(temp.path().join("dir")).unwrap();
    std::os::unix::fs::symlink(temp.path(), temp.path().join("dir/back")).unwrap();

    let err = Scanner::new("").unwrap().scan(temp.path()).unwrap_err();
    assert!(err.is_io_error());
}

#[test]
fn test_definition_round_trip_through_disk() {
    let temp = TempDir::new().unwrap();
    let definition = DefinitionFile::new("from defaults import *", temp.path().join("definition.py"));

    definition
        .write("# 727f97830786b604adfb9431d39bb6c6\n# body\n")
        .unwrap();
    assert!(definition.exists());
    assert_eq!(
        definition.read_integrity().unwrap(),
        "727f97830786b604adfb9431d39bb6c6"
    );
}
