//! Tests for the layered configuration.

use guildmirror_core::{MirrorConfig, WellKnownRole};
use std::time::Duration;

#[test]
fn test_bundled_defaults() {
    let config = MirrorConfig::bundled().unwrap();

    assert_eq!(config.discord.api_base, "https://discord.com/api/v10");
    assert_eq!(config.discord.token_env, "DISCORD_TOKEN");
    assert_eq!(config.pacing.guild_delay(), Duration::from_secs(10));
    assert_eq!(config.pacing.role_delay(), Duration::from_secs(2));
    assert_eq!(config.pacing.node_delay(), Duration::from_secs(5));
    assert_eq!(config.pacing.member_delay(), Duration::from_secs(1));
    assert_eq!(config.repair.default_category, "The Aether");
    assert!(!config.logging.json);
}

#[test]
fn test_role_labels() {
    let config = MirrorConfig::bundled().unwrap();

    assert_eq!(config.roles.label(WellKnownRole::Admin), "Admin");
    assert_eq!(config.roles.label(WellKnownRole::Moderator), "Moderator");
    assert_eq!(config.roles.label(WellKnownRole::Builder), "Builder");
    assert_eq!(config.roles.label(WellKnownRole::Everyone), "@everyone");
}

#[test]
fn test_config_from_file_overrides_defaults() {
    use std::io::Write;
    use tempfile::Builder;

    let mut temp_file = Builder::new().suffix(".toml").tempfile().unwrap();
    writeln!(
        temp_file,
        r#"
[pacing]
between_nodes = 0
between_members = 250

[roles]
builder = "Architect"
everyone = "Everybody"

[repair]
default_category = "Limbo"
"#
    )
    .unwrap();

    let config = MirrorConfig::from_file(temp_file.path()).unwrap();

    assert_eq!(config.pacing.node_delay(), Duration::ZERO);
    assert_eq!(config.pacing.member_delay(), Duration::from_millis(250));
    // Untouched values keep their bundled defaults
    assert_eq!(config.pacing.guild_delay(), Duration::from_secs(10));
    assert_eq!(config.roles.label(WellKnownRole::Builder), "Architect");
    assert_eq!(config.roles.label(WellKnownRole::Admin), "Admin");
    // The everyone role keeps its reserved name whatever the file says
    assert_eq!(
        config.roles.label(WellKnownRole::Everyone),
        WellKnownRole::EVERYONE_NAME
    );
    assert_eq!(config.repair.default_category, "Limbo");
}

#[test]
fn test_config_from_missing_file_fails() {
    let result = MirrorConfig::from_file("/definitely/not/here/guildmirror.toml");
    assert!(result.is_err());
}
