use std::{fs, path::PathBuf};

use tempfile::tempdir;

use philly_cli::{Args, Stage, run};

/// Collects all .philly files from a directory
fn collect_philly_files(dir: PathBuf) -> Vec<PathBuf> {
    let mut files = if let Ok(entries) = fs::read_dir(&dir) {
        entries
            .flatten()
            .map(|entry| entry.path())
            .filter(|path| {
                path.is_file() && path.extension().and_then(|s| s.to_str()) == Some("philly")
            })
            .collect()
    } else {
        Vec::new()
    };

    files.sort();
    files
}

/// Demos live at the workspace root, not in the crate
fn demos_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .unwrap()
        .parent()
        .unwrap()
        .join("demos")
}

fn strict_args(input: &PathBuf, stage: Option<Stage>) -> Args {
    Args {
        input: input.to_string_lossy().to_string(),
        stage,
        config: None,
        strict: true,
        log_level: "off".to_string(),
    }
}

#[test]
fn e2e_smoke_test_valid_demos() {
    let valid_demos = collect_philly_files(demos_path());

    assert!(!valid_demos.is_empty(), "No valid demos found in demos/");

    let mut failed_demos = Vec::new();

    for demo_path in &valid_demos {
        for stage in [None, Some(Stage::Print), Some(Stage::Lex), Some(Stage::Parse)] {
            let mut out = Vec::new();
            if let Err(e) = run(&strict_args(demo_path, stage), &mut out) {
                failed_demos.push((demo_path.clone(), stage, e));
            }
        }
    }

    if !failed_demos.is_empty() {
        eprintln!("\nValid demos that failed:");
        for (path, stage, err) in &failed_demos {
            eprintln!("  - {} ({stage:?}): {err}", path.display());
        }
        panic!("{} valid demo run(s) failed unexpectedly", failed_demos.len());
    }

    println!("✅ All {} valid demos passed", valid_demos.len());
}

#[test]
fn e2e_smoke_test_error_demos() {
    let error_demos = collect_philly_files(demos_path().join("errors"));

    assert!(
        !error_demos.is_empty(),
        "No error demos found in demos/errors/"
    );

    let mut unexpectedly_succeeded = Vec::new();

    for demo_path in &error_demos {
        let mut out = Vec::new();
        if run(&strict_args(demo_path, None), &mut out).is_ok() {
            unexpectedly_succeeded.push(demo_path.clone());
        }
    }

    if !unexpectedly_succeeded.is_empty() {
        eprintln!("\nError demos that unexpectedly succeeded:");
        for path in &unexpectedly_succeeded {
            eprintln!("  - {}", path.display());
        }
        panic!(
            "{} error demo(s) succeeded unexpectedly",
            unexpectedly_succeeded.len()
        );
    }

    println!("✅ All {} error demos failed as expected", error_demos.len());
}

#[test]
fn e2e_stages_write_expected_output() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let input = temp_dir.path().join("main.philly");
    fs::write(&input, "jawn x := 1").unwrap();

    let render = |stage| {
        let mut out = Vec::new();
        run(&strict_args(&input, stage), &mut out).expect("Run failed");
        String::from_utf8(out).unwrap()
    };

    assert_eq!(render(None), "const x = 1");
    assert_eq!(render(Some(Stage::Print)), "jawn x := 1");
    assert_eq!(render(Some(Stage::Lex)), "[VAR, 'x', '1', EOF]\n");
    assert_eq!(
        render(Some(Stage::Parse)),
        "[\n  {type: VAR, var: 'x', val: '1'},\n]\n"
    );
}

#[test]
fn e2e_config_file_is_applied() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let input = temp_dir.path().join("main.philly");
    let config = temp_dir.path().join("philly.toml");
    fs::write(&input, "maybe) {").unwrap();
    fs::write(&config, "[output]\nfinal_newline = true\n").unwrap();

    let mut args = Args {
        input: input.to_string_lossy().to_string(),
        stage: None,
        config: Some(config.to_string_lossy().to_string()),
        strict: false,
        log_level: "off".to_string(),
    };

    let mut out = Vec::new();
    run(&args, &mut out).expect("Lenient run should succeed");
    assert_eq!(String::from_utf8(out).unwrap(), "Math.random() < 0.5) {\n");

    fs::write(&config, "[parser]\nstrict = true\n").unwrap();
    let mut out = Vec::new();
    assert!(run(&args, &mut out).is_err());

    args.config = None;
    args.strict = true;
    assert!(run(&args, &mut Vec::new()).is_err());
}

#[test]
fn e2e_missing_input_is_io_error() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let input = temp_dir.path().join("absent.philly");

    let err = run(&strict_args(&input, None), &mut Vec::new()).unwrap_err();
    assert!(matches!(err, philly::PhillyError::Io(_)));
}
