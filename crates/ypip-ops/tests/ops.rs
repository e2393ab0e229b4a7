use std::path::PathBuf;
use std::sync::Arc;

use ypip_core::config::GlobalConfig;
use ypip_ops::ops_resolve::{self, ResolveOptions};
use ypip_ops::ops_tree::{self, TreeOptions};
use ypip_sources::fetch::MemoryFetcher;
use ypip_util::errors::YpipError;

const APP: &str = "git+https://github.com/org/app.git@v1#egg=app";

fn fetcher() -> Arc<MemoryFetcher> {
    Arc::new(MemoryFetcher::new().with_body(
        "https://raw.githubusercontent.com/org/app/v1/requirements.txt",
        "numpy==1.2.3\nscipy>=1.0\n",
    ))
}

fn project() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("requirements.txt"),
        format!("{APP}\nrequests\n"),
    )
    .unwrap();
    dir
}

#[test]
fn resolves_default_requirements_file() {
    let dir = project();
    let result = ops_resolve::resolve_with(
        dir.path(),
        &ResolveOptions::default(),
        &GlobalConfig::default(),
        fetcher(),
    )
    .unwrap();

    assert_eq!(
        ops_resolve::render(&result, false).unwrap(),
        format!("{APP}\nrequests\nnumpy==1.2.3\nscipy>=1.0\n")
    );
}

#[test]
fn json_output_lists_requirements_and_conflicts() {
    let dir = project();
    let opts = ResolveOptions {
        requirements: vec!["numpy==1.3".to_string()],
        files: vec![PathBuf::from("requirements.txt")],
        collect_conflicts: true,
        ..Default::default()
    };
    let mut config = GlobalConfig::default();
    opts.apply(&mut config);
    let result = ops_resolve::resolve_with(dir.path(), &opts, &config, fetcher()).unwrap();

    let json: serde_json::Value =
        serde_json::from_str(&ops_resolve::render(&result, true).unwrap()).unwrap();
    assert_eq!(json["requirements"][0], "numpy==1.3");
    assert_eq!(json["conflicts"][0]["identity"], "numpy");
    assert_eq!(json["conflicts"][0]["existing"], "numpy==1.3");
    assert_eq!(json["conflicts"][0]["incoming"], "numpy==1.2.3");
}

#[test]
fn conflict_fails_fast_by_default() {
    let dir = project();
    let opts = ResolveOptions {
        requirements: vec!["numpy==1.3".to_string(), "-r requirements.txt".to_string()],
        ..Default::default()
    };
    let err = ops_resolve::resolve_with(dir.path(), &opts, &GlobalConfig::default(), fetcher())
        .err()
        .unwrap();
    assert!(matches!(err, YpipError::Conflict { .. }));
}

#[test]
fn tree_views() {
    let dir = project();
    let result = ops_resolve::resolve_with(
        dir.path(),
        &ResolveOptions::default(),
        &GlobalConfig::default(),
        fetcher(),
    )
    .unwrap();

    let tree = ops_tree::render(&result, &TreeOptions::default());
    assert_eq!(
        tree,
        format!(
            "-r requirements.txt\n\
             └── requirements.txt\n\
             \x20   ├── {APP}\n\
             \x20   │   ├── numpy==1.2.3\n\
             \x20   │   └── scipy>=1.0\n\
             \x20   └── requests\n"
        )
    );

    let shallow = ops_tree::render(
        &result,
        &TreeOptions {
            depth: Some(2),
            ..Default::default()
        },
    );
    assert!(shallow.contains(APP));
    assert!(!shallow.contains("numpy"));

    let why = ops_tree::render(
        &result,
        &TreeOptions {
            why: Some("numpy".to_string()),
            ..Default::default()
        },
    );
    assert_eq!(
        why,
        format!("Path to numpy:\n-r requirements.txt\n  requirements.txt\n    {APP}\n      numpy==1.2.3\n")
    );

    let inverted = ops_tree::render(
        &result,
        &TreeOptions {
            inverted: Some("app".to_string()),
            ..Default::default()
        },
    );
    assert!(inverted.starts_with(&format!("{APP}\n└── requirements.txt\n")));

    let missing = ops_tree::render(
        &result,
        &TreeOptions {
            why: Some("pandas".to_string()),
            ..Default::default()
        },
    );
    assert_eq!(missing, "Package 'pandas' not found in the graph.\n");
}
