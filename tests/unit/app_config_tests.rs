/*!
 * Tests for application configuration functionality
 */

use anyhow::Result;
use polyedit::app_config::{Config, LogLevel, Profile, ProviderKind};
use crate::common;

/// A missing config file is created with the sample profiles
#[test]
fn test_load_or_create_withMissingFile_shouldWriteDefaults() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("conf.json");

    let config = Config::load_or_create(&path)?;
    assert!(path.exists());
    assert_eq!(config, Config::default());
    assert_eq!(config.active_profile, "Profile 1");

    let reloaded = Config::load_or_create(&path)?;
    assert_eq!(reloaded, config);
    Ok(())
}

/// Saved profile edits survive a reload
#[test]
fn test_save_withEditedProfile_shouldPersistChanges() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("conf.json");

    let mut config = Config::default();
    config.log_level = LogLevel::Debug;
    let profile = config.profile_mut("Profile 2").expect("sample profile");
    profile.api_key = "sk-ant-123".to_string();
    profile.temperature = Some(0.3);
    config.active_profile = "Profile 2".to_string();
    config.save(&path)?;

    let loaded = Config::load_or_create(&path)?;
    let active = loaded.active().expect("active profile");
    assert_eq!(active.provider, ProviderKind::Anthropic);
    assert!(active.has_credentials());
    assert_eq!(active.temperature, Some(0.3));
    assert_eq!(loaded.log_level, LogLevel::Debug);
    Ok(())
}

/// A broken config file is reported, not replaced
#[test]
fn test_load_or_create_withInvalidJson_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(temp_dir.path(), "conf.json", "{ not json")?;
    assert!(Config::load_or_create(&path).is_err());
    assert_eq!(std::fs::read_to_string(&path)?, "{ not json");
    Ok(())
}

#[test]
fn test_validate_withBadProfiles_shouldFail() {
    let mut config = Config::default();
    config.profiles.push(Profile::new("Profile 1", ProviderKind::OpenAI));
    assert!(config.validate().is_err());

    let mut config = Config::default();
    config.active_profile = "missing".to_string();
    assert!(config.validate().is_err());

    let mut config = Config::default();
    config.profiles[0].endpoint = "ftp://example.com".to_string();
    assert!(config.validate().is_err());

    let mut config = Config::default();
    config.profiles[0].temperature = Some(3.5);
    assert!(config.validate().is_err());
}

#[test]
fn test_provider_kind_fromStr_shouldAcceptDisplayNames() {
    assert_eq!("openai".parse::<ProviderKind>().unwrap(), ProviderKind::OpenAI);
    assert_eq!("Anthropic".parse::<ProviderKind>().unwrap(), ProviderKind::Anthropic);
    assert!("ollama".parse::<ProviderKind>().is_err());
    assert_eq!(ProviderKind::Anthropic.to_lowercase_string(), "anthropic");
}
