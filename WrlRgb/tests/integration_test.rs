use std::fs;
use std::path::{Path, PathBuf};

use pretty_assertions::assert_eq;
use tempfile::{TempDir, tempdir};
use wrlrgb::prelude::*;

const SCENE: &str = "#VRML V2.0 utf8\n\
\n\
DEF Box1 Transform {\n\
  children Shape {\n\
    appearance Appearance { material Material { diffuseColor 0.5 0.5 0.5 } }\n\
    geometry Box { size 1 1 1 }\n\
  }\n\
}\n\
DEF Cone2 Transform {\n\
  children Shape {\n\
    appearance Appearance { material Material { diffuseColor 0.1 0.2 0.3 } }\n\
  }\n\
}\n";

/// Route library logs through the test harness; repeated calls are no-ops.
fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();
}

fn scene_in(dir: &TempDir, name: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, SCENE).unwrap();
    path
}

fn config_in(dir: &TempDir, name: &str, nodes: &[(&str, f32, f32, f32)]) -> PathBuf {
    let nodes: Vec<ColorNode> = nodes
        .iter()
        .map(|&(n, r, g, b)| ColorNode::with_rgb(n, r, g, b).unwrap())
        .collect();
    let path = dir.path().join(name);
    write_config(&nodes, "test", &path).unwrap();
    path
}

fn file_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<_> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

#[test]
fn test_extract_then_verify() {
    let dir = tempdir().unwrap();
    let doc = scene_in(&dir, "scene.wrl");
    let extractor = Extractor::default();

    let config = extractor.extract(&doc, None).unwrap();
    let parsed = read_config(&config).unwrap();
    assert_eq!(parsed.source_file(), Some(doc.display().to_string().as_str()));
    assert_eq!(parsed.nodes.len(), 2);
    assert_eq!(parsed.nodes[0].name(), "Box1");
    assert_eq!(parsed.nodes[1].name(), "Cone2");
    assert!(extractor.verify(&doc, &config).unwrap());
}

#[test]
fn test_replace_then_rollback_restores_document() {
    init_logging();
    let dir = tempdir().unwrap();
    let doc = scene_in(&dir, "scene.wrl");
    let night = config_in(&dir, "night.txt", &[("Box1", 0.0, 0.0, 0.25), ("Cone2", 0.1, 0.1, 0.1)]);
    let settings = Settings::default();

    Replacer::new(settings.clone()).replace(&doc, &night).unwrap();
    let replaced = fs::read_to_string(&doc).unwrap();
    assert!(replaced.starts_with("#VRML V2.0 utf8\n\n#START V001\n"));
    assert!(replaced.contains("diffuseColor 0 0 0.25 }"));
    assert!(Extractor::new(settings.clone()).verify(&doc, &night).unwrap());

    RollbackEngine::new(settings).rollback(&doc).unwrap();
    assert_eq!(fs::read_to_string(&doc).unwrap(), SCENE);
    assert_eq!(file_names(dir.path()), vec!["night.txt", "scene.wrl"]);
}

#[test]
fn test_replace_then_rollback_restores_unnamed_node() {
    init_logging();
    let original = "#VRML V2.0 utf8\nDEF Mat Material { diffuseColor 0.2 0.3 0.4 }\n";
    let dir = tempdir().unwrap();
    let doc = dir.path().join("mat.wrl");
    fs::write(&doc, original).unwrap();
    let white = config_in(&dir, "white.txt", &[("Mat", 1.0, 1.0, 1.0)]);
    let settings = Settings::default();

    let nodes = Extractor::new(settings.clone()).extract_nodes(&doc).unwrap();
    assert_eq!(nodes[0].name(), "");

    Replacer::new(settings.clone()).replace(&doc, &white).unwrap();
    let replaced = fs::read_to_string(&doc).unwrap();
    assert!(replaced.contains("#NODE - 0.2 0.3 0.4\n"));
    assert!(replaced.contains("diffuseColor 1 1 1 }"));

    RollbackEngine::new(settings).rollback(&doc).unwrap();
    assert_eq!(fs::read_to_string(&doc).unwrap(), original);
    assert_eq!(file_names(dir.path()), vec!["mat.wrl", "white.txt"]);
}

#[test]
fn test_rollback_walks_back_one_generation_at_a_time() {
    let dir = tempdir().unwrap();
    let doc = scene_in(&dir, "scene.wrl");
    let first = config_in(&dir, "first.txt", &[("Box1", 1.0, 0.0, 0.0), ("Cone2", 0.0, 1.0, 0.0)]);
    let second = config_in(&dir, "second.txt", &[("Box1", 0.0, 0.0, 1.0), ("Cone2", 1.0, 1.0, 1.0)]);
    let settings = Settings::default();
    let replacer = Replacer::new(settings.clone());
    let engine = RollbackEngine::new(settings.clone());
    let extractor = Extractor::new(settings);

    replacer.replace(&doc, &first).unwrap();
    let after_first = fs::read_to_string(&doc).unwrap();
    replacer.replace(&doc, &second).unwrap();
    assert!(extractor.verify(&doc, &second).unwrap());

    engine.rollback(&doc).unwrap();
    assert_eq!(fs::read_to_string(&doc).unwrap(), after_first);
    assert!(extractor.verify(&doc, &first).unwrap());

    engine.rollback(&doc).unwrap();
    assert_eq!(fs::read_to_string(&doc).unwrap(), SCENE);

    let err = engine.rollback(&doc).unwrap_err();
    assert!(matches!(err, Error::NothingToRollback { .. }));
}

#[test]
fn test_replace_with_matching_colors_is_refused() {
    let dir = tempdir().unwrap();
    let doc = scene_in(&dir, "scene.wrl");
    let same = config_in(&dir, "same.txt", &[("Other", 0.5, 0.5, 0.5), ("Names", 0.1, 0.2, 0.3)]);

    let err = Replacer::default().replace(&doc, &same).unwrap_err();
    assert!(matches!(err, Error::NodesAlreadyMatch { .. }));
    assert_eq!(fs::read_to_string(&doc).unwrap(), SCENE);
    assert_eq!(file_names(dir.path()), vec!["same.txt", "scene.wrl"]);
}

#[test]
fn test_rollback_without_snapshot_leaves_no_trace() {
    let dir = tempdir().unwrap();
    let doc = scene_in(&dir, "scene.wrl");

    let err = RollbackEngine::default().rollback(&doc).unwrap_err();
    assert!(matches!(err, Error::NothingToRollback { .. }));
    assert_eq!(err.class(), ErrorClass::Domain);
    assert_eq!(fs::read_to_string(&doc).unwrap(), SCENE);
    assert_eq!(file_names(dir.path()), vec!["scene.wrl"]);
}

#[test]
fn test_replace_with_fewer_records_leaves_rest() {
    let dir = tempdir().unwrap();
    let doc = scene_in(&dir, "scene.wrl");
    let one = config_in(&dir, "one.txt", &[("Box1", 1.0, 1.0, 1.0)]);

    Replacer::default().replace(&doc, &one).unwrap();
    let nodes = Extractor::default().extract_nodes(&doc).unwrap();
    assert_eq!(nodes[0], ColorNode::with_rgb("", 1.0, 1.0, 1.0).unwrap());
    assert_eq!(nodes[1], ColorNode::with_rgb("", 0.1, 0.2, 0.3).unwrap());
}

#[test]
fn test_wrong_header_is_rejected_everywhere() {
    let dir = tempdir().unwrap();
    let doc = dir.path().join("old.wrl");
    fs::write(&doc, SCENE.replace("V2.0", "V1.0")).unwrap();
    let config = config_in(&dir, "c.txt", &[("Box1", 1.0, 1.0, 1.0)]);

    assert!(matches!(Extractor::default().extract_nodes(&doc), Err(Error::NotAVrmlFile { .. })));
    assert!(matches!(Replacer::default().replace(&doc, &config), Err(Error::NotAVrmlFile { .. })));
    assert!(matches!(RollbackEngine::default().rollback(&doc), Err(Error::NotAVrmlFile { .. })));
}

#[test]
fn test_no_color_nodes() {
    let dir = tempdir().unwrap();
    let doc = dir.path().join("empty.wrl");
    fs::write(&doc, "#VRML V2.0 utf8\nDEF Box1 Transform { }\n").unwrap();

    let err = Extractor::default().extract_nodes(&doc).unwrap_err();
    assert!(matches!(err, Error::NoRgbValuesFound { .. }));
}

#[test]
fn test_directory_batch_processes_recognized_files() {
    let dir = tempdir().unwrap();
    for name in ["a.wrl", "b.wrl", "c.wrl"] {
        scene_in(&dir, name);
    }
    fs::write(dir.path().join("readme.txt"), "not a scene").unwrap();

    let batch = Batch::new(Settings::default(), dir.path(), Operation::Extract { config: None }).unwrap();
    assert_eq!(batch.inputs().len(), 3);

    let result = batch.run(|_, _, _| {});
    assert_eq!(result.success_count, 3);
    assert_eq!(result.fail_count, 0);
    assert_eq!(result.outcomes.len(), 3);
    assert_eq!(
        file_names(dir.path()),
        vec![
            "a.wrl",
            "a.wrl_rgb_nodes.txt",
            "b.wrl",
            "b.wrl_rgb_nodes.txt",
            "c.wrl",
            "c.wrl_rgb_nodes.txt",
            "readme.txt",
        ]
    );
}

#[test]
fn test_batch_verify_reports_each_file() {
    let dir = tempdir().unwrap();
    let docs = dir.path().join("docs");
    fs::create_dir(&docs).unwrap();
    fs::write(docs.join("a.wrl"), SCENE).unwrap();
    fs::write(docs.join("b.wrl"), SCENE.replace("0.1 0.2 0.3", "0.9 0.9 0.9")).unwrap();
    fs::write(docs.join("c.wrl"), "garbage").unwrap();
    let config = Extractor::default().extract(docs.join("a.wrl"), Some(dir.path().join("a.txt").as_path())).unwrap();

    let batch = Batch::new(Settings::default(), &docs, Operation::Verify { config }).unwrap();
    let result = batch.run(|_, _, _| {});
    let outcomes: Vec<_> = result
        .outcomes
        .iter()
        .map(|o| match &o.result {
            Ok(Outcome::Verified { matched }) => Some(*matched),
            _ => None,
        })
        .collect();
    assert_eq!(outcomes, vec![Some(true), Some(false), None]);
    assert_eq!(result.fail_count, 1);
}

#[test]
fn test_custom_suffixes_from_settings() {
    let dir = tempdir().unwrap();
    let doc = scene_in(&dir, "scene.wrl");
    let settings = Settings::from_toml("config_suffix = \".colors\"\n").unwrap();

    let config = Extractor::new(settings).extract(&doc, None).unwrap();
    assert_eq!(config, dir.path().join("scene.wrl.colors"));
}
