use anyhow::Result;
use dataproc_url::config::Config;
use std::fs;
use tempfile::tempdir;

#[test]
fn test_missing_file_gives_defaults() -> Result<()> {
    let dir = tempdir()?;
    let config = Config::load_from(&dir.path().join("config.toml"))?;

    assert_eq!(config, Config::default());
    Ok(())
}

#[test]
fn test_save_and_load_round_trip() -> Result<()> {
    let dir = tempdir()?;
    let path = dir.path().join("config.toml");

    let mut config = Config::default();
    config.set_value("project_id", "pid")?;
    config.set_value("region", "us-central1")?;
    config.set_value("verbosity", "2")?;
    config.set_value("api.timeout_seconds", "12")?;
    config.save_to(&path)?;

    let content = fs::read_to_string(&path)?;
    assert!(content.contains("project_id = \"pid\""));
    assert!(content.contains("[api]"));

    let loaded = Config::load_from(&path)?;
    assert_eq!(loaded, config);
    assert_eq!(loaded.verbosity, Some(2));
    Ok(())
}

#[test]
fn test_partial_file_fills_in_defaults() -> Result<()> {
    let dir = tempdir()?;
    let path = dir.path().join("config.toml");
    fs::write(&path, "region = \"europe-west1\"\n")?;

    let config = Config::load_from(&path)?;
    assert_eq!(config.region.as_deref(), Some("europe-west1"));
    assert!(config.project_id.is_none());
    assert_eq!(config.api.endpoint, "https://dataproc.googleapis.com");
    Ok(())
}

#[test]
fn test_unparseable_file_falls_back_to_defaults() -> Result<()> {
    let dir = tempdir()?;
    let path = dir.path().join("config.toml");
    fs::write(&path, "this is = = not toml")?;

    assert_eq!(Config::load_from(&path)?, Config::default());
    Ok(())
}

#[test]
fn test_partial_api_table_keeps_other_settings() -> Result<()> {
    let dir = tempdir()?;
    let path = dir.path().join("config.toml");
    fs::write(
        &path,
        "project_id = \"pid\"\nregion = \"us-central1\"\n\n[api]\nendpoint = \"http://localhost:8080\"\n",
    )?;

    let config = Config::load_from(&path)?;
    assert_eq!(config.project_id.as_deref(), Some("pid"));
    assert_eq!(config.region.as_deref(), Some("us-central1"));
    assert_eq!(config.api.endpoint, "http://localhost:8080");
    assert_eq!(config.api.timeout_seconds, 30);
    Ok(())
}
