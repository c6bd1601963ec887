use std::fs;
use std::path::Path;

use sib_cli::config::{
    ConfigError, ConfigFile, ConnectionOverrides, load_config, parse_config, resolve_connection,
};
use tempfile::TempDir;

#[test]
fn reads_wfs_table() {
    let config = parse_config(
        Path::new("sibtools.toml"),
        "[wfs]\nurl = \"http://localhost:8380/publicWFS/WFS\"\nusername = \"sib\"\npassword = \"geheim\"\n",
    )
    .unwrap();
    assert_eq!(config.wfs.url, "http://localhost:8380/publicWFS/WFS");
    assert_eq!(config.wfs.username.as_deref(), Some("sib"));
    assert_eq!(config.wfs.password.as_deref(), Some("geheim"));
}

#[test]
fn overrides_win_over_file() {
    let file = parse_config(
        Path::new("sibtools.toml"),
        "[wfs]\nurl = \"http://alt/WFS\"\nusername = \"sib\"\n",
    )
    .unwrap();
    let config = resolve_connection(
        file,
        ConnectionOverrides {
            url: Some("http://neu/WFS".to_string()),
            password: Some("pw".to_string()),
            ..ConnectionOverrides::default()
        },
    )
    .unwrap();
    assert_eq!(config.url, "http://neu/WFS");
    assert_eq!(config.username.as_deref(), Some("sib"));
    assert_eq!(config.password.as_deref(), Some("pw"));
}

#[test]
fn missing_url_is_an_error() {
    let err = resolve_connection(ConfigFile::default(), ConnectionOverrides::default()).unwrap_err();
    assert!(matches!(err, ConfigError::MissingUrl));
}

#[test]
fn named_config_must_exist() {
    let dir = TempDir::new().unwrap();
    let err = load_config(Some(dir.path().join("fehlt.toml").as_path())).unwrap_err();
    assert!(matches!(err, ConfigError::Read { .. }));
}

#[test]
fn invalid_config_names_the_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("sibtools.toml");
    fs::write(&path, "[wfs]\nurl = 5\n").unwrap();
    let err = load_config(Some(path.as_path())).unwrap_err();
    assert!(matches!(err, ConfigError::Parse { .. }));
    assert!(err.to_string().contains("sibtools.toml"));
}
