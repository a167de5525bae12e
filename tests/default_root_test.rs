//! Default Root Tests
//!
//! Contexts built without `.root(..)` land under `experiments/` in the
//! working directory. Kept in its own test binary because it changes the
//! process working directory.

use std::path::Path;
use tempfile::TempDir;
use trueno_experiment::experiment::DEFAULT_ROOT;
use trueno_experiment::{ExperimentConfig, ExperimentContext};

#[test]
fn test_new_uses_experiments_under_working_directory() {
    let cwd = TempDir::new().unwrap();
    std::env::set_current_dir(cwd.path()).unwrap();

    let mut ctx = ExperimentContext::new(ExperimentConfig::new(), Some("exp1")).unwrap();
    assert_eq!(DEFAULT_ROOT, "experiments");
    assert_eq!(ctx.dir(), Path::new("experiments").join("exp1"));
    assert!(cwd.path().join("experiments").join("exp1").is_dir());

    ctx.record_metric("loss", 0.5, Some(0));
    ctx.persist_results().unwrap();
    assert!(cwd.path().join("experiments/exp1/results.json").is_file());

    let unnamed = ExperimentContext::new(ExperimentConfig::new(), None).unwrap();
    assert_eq!(unnamed.dir().parent(), Some(Path::new("experiments")));
    assert!(unnamed.dir().is_dir());
}
