// tests/config_test.rs
use nsv::config::{load_config, Config, Options};
use nsv::error::NsvError;
use std::io::Write;
use std::path::PathBuf;
use tempfile::NamedTempFile;

fn write_config(content: &str) -> NamedTempFile {
    let mut temp_file = NamedTempFile::new().unwrap();
    temp_file.write_all(content.as_bytes()).unwrap();
    temp_file.flush().unwrap();
    temp_file
}

#[test]
fn test_load_default_config() {
    let config = Config::default();
    assert!(!config.show);
    assert_eq!(config.format, None);
    assert_eq!(config.path, None);
    assert_eq!(config.prerelease.default_label, "beta");
}

#[test]
fn test_load_from_file() {
    let temp_file = write_config(
        r#"
show = true
format = "v{{.Version}}"
path = "src/search"

[prerelease]
default_label = "rc"
"#,
    );

    let config = load_config(Some(temp_file.path().to_str().unwrap())).unwrap();
    assert!(config.show);
    assert_eq!(config.format.as_deref(), Some("v{{.Version}}"));
    assert_eq!(config.path.as_deref(), Some("src/search"));
    assert_eq!(config.prerelease.default_label, "rc");
}

#[test]
fn test_empty_file_uses_defaults() {
    let temp_file = write_config("");
    let config = load_config(Some(temp_file.path().to_str().unwrap())).unwrap();
    assert_eq!(config, Config::default());
}

#[test]
fn test_invalid_toml_is_config_error() {
    let temp_file = write_config("show = [unterminated");
    let err = load_config(Some(temp_file.path().to_str().unwrap())).unwrap_err();
    assert!(matches!(err, NsvError::Config(_)));
    assert!(err.to_string().contains("cannot parse"));
}

#[test]
fn test_missing_custom_file_is_error() {
    let err = load_config(Some("/nonexistent/nsv.toml")).unwrap_err();
    assert!(matches!(err, NsvError::Config(_)));
    assert!(err.to_string().contains("cannot read"));
}

#[test]
fn test_options_from_loaded_config() {
    let temp_file = write_config(
        r#"
path = "src/processor"

[prerelease]
default_label = "alpha"
"#,
    );

    let config = load_config(Some(temp_file.path().to_str().unwrap())).unwrap();
    let options = Options::from_config(&config).unwrap();
    assert!(!options.show);
    assert_eq!(options.format, None);
    assert_eq!(options.path, Some(PathBuf::from("src/processor")));
    assert_eq!(options.prerelease_label, "alpha");
}

#[test]
fn test_invalid_label_in_file() {
    let temp_file = write_config("[prerelease]\ndefault_label = \"beta.1\"\n");
    let config = load_config(Some(temp_file.path().to_str().unwrap())).unwrap();
    assert!(matches!(
        Options::from_config(&config),
        Err(NsvError::Config(_))
    ));
}
