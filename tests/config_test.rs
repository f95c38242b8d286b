use cppctx::config::*;
use cppctx::errors::CppCtxError;
use std::fs;
use tempfile::TempDir;

#[test]
fn test_default_config_has_cpp_patterns() {
    let config = CppCtxConfig::default();
    assert!(config.include.iter().any(|p| p == "**/*.cpp"));
    assert!(config.include.iter().any(|p| p == "**/*.h"));
    assert_eq!(config.exclude, vec![".git/**".to_string(), ".cppctx/**".to_string()]);
    assert!(!config.skip_hidden);
    assert!(!config.call_suffix_boundary);
    assert_eq!(config.ignore_names.len(), 19);
    assert_eq!(config.max_visited, 10_000);
    assert_eq!(config.suffix_policy, SuffixPolicy::First);
}

#[test]
fn test_save_and_load_config() {
    let dir = TempDir::new().unwrap();
    let config = CppCtxConfig {
        root_dir: dir.path().to_string_lossy().to_string(),
        max_visited: 5,
        suffix_policy: SuffixPolicy::Unique,
        skip_files_with_syntax_errors: true,
        skip_hidden: true,
        call_suffix_boundary: true,
        ..CppCtxConfig::default()
    };
    save_config(dir.path(), &config).unwrap();
    assert!(get_config_path(dir.path()).exists());
    assert!(!get_config_path(dir.path()).with_extension("tmp").exists());

    let loaded = load_config(dir.path()).unwrap();
    assert_eq!(config, loaded);
}

#[test]
fn test_missing_config_uses_defaults() {
    let dir = TempDir::new().unwrap();
    let loaded = load_config(dir.path()).unwrap();
    assert_eq!(loaded.include, CppCtxConfig::default().include);
    assert_eq!(loaded.root_dir, dir.path().to_string_lossy());
}

#[test]
fn test_partial_config_fills_defaults() {
    let dir = TempDir::new().unwrap();
    fs::create_dir_all(get_cppctx_dir(dir.path())).unwrap();
    fs::write(
        get_config_path(dir.path()),
        r#"{ "max_depth": 3, "suffix_policy": "unique" }"#,
    )
    .unwrap();
    let loaded = load_config(dir.path()).unwrap();
    assert_eq!(loaded.max_depth, 3);
    assert_eq!(loaded.suffix_policy, SuffixPolicy::Unique);
    assert_eq!(loaded.max_visited, 10_000);
}

#[test]
fn test_malformed_config_is_an_error() {
    let dir = TempDir::new().unwrap();
    fs::create_dir_all(get_cppctx_dir(dir.path())).unwrap();
    fs::write(get_config_path(dir.path()), "{ not json").unwrap();
    assert!(matches!(
        load_config(dir.path()),
        Err(CppCtxError::Config { .. })
    ));
}

#[test]
fn test_should_include_file() {
    let config = CppCtxConfig::default();
    assert!(should_include_file("src/main.cpp", &config));
    assert!(should_include_file("main.cpp", &config));
    assert!(should_include_file("include/bird.h", &config));
    assert!(!should_include_file("src/Legacy.CPP", &config));
    assert!(!should_include_file("src/bird.hpp", &config));
    assert!(should_include_file("build/generated.cpp", &config));
    assert!(should_include_file("third_party/lib/x.cpp", &config));
    assert!(should_include_file("out/ui_main.h", &config));
    assert!(should_include_file(".hidden/a.cpp", &config));
    assert!(!should_include_file(".git/hooks/x.cpp", &config));
    assert!(!should_include_file(".cppctx/config.cpp", &config));
}

#[test]
fn test_cppctx_dir_location() {
    let dir = TempDir::new().unwrap();
    assert!(get_cppctx_dir(dir.path()).ends_with(".cppctx"));
    assert!(get_config_path(dir.path()).ends_with(".cppctx/config.json"));
}

#[test]
fn test_exclude_wins_over_include() {
    let config = CppCtxConfig {
        exclude: vec!["vendor/**".to_string()],
        ..CppCtxConfig::default()
    };
    assert!(!should_include_file("vendor/zlib/inflate.cpp", &config));
    assert!(should_include_file("src/vendor.cpp", &config));
}

#[test]
fn test_config_without_newer_fields_still_loads() {
    let dir = TempDir::new().unwrap();
    fs::create_dir_all(get_cppctx_dir(dir.path())).unwrap();
    fs::write(
        get_config_path(dir.path()),
        r#"{ "root_dir": "", "exclude": ["build/**"] }"#,
    )
    .unwrap();
    let loaded = load_config(dir.path()).unwrap();
    assert_eq!(loaded.exclude, vec!["build/**".to_string()]);
    assert!(!loaded.skip_hidden);
    assert!(!loaded.call_suffix_boundary);
    assert_eq!(loaded.root_dir, dir.path().to_string_lossy());
}
