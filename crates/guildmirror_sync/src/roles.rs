//! Role resolution by label.

use guildmirror_core::{RemoteRole, RolesConfig, WellKnownRole};
use guildmirror_directory::DirectoryClient;
use guildmirror_error::{RoleError, RoleErrorKind, RoleResult};
use std::sync::Arc;
use tracing::{debug, instrument};

/// Upper-cases the first letter of every word, leaving the rest untouched.
///
/// ```
/// use guildmirror_sync::title_case;
///
/// assert_eq!(title_case("admin"), "Admin");
/// assert_eq!(title_case("game master"), "Game Master");
/// assert_eq!(title_case("ADMIN"), "ADMIN");
/// ```
pub fn title_case(label: &str) -> String {
    let mut out = String::with_capacity(label.len());
    let mut at_word_start = true;
    for c in label.chars() {
        if at_word_start && c.is_alphabetic() {
            out.extend(c.to_uppercase());
        } else {
            out.push(c);
        }
        at_word_start = !c.is_alphanumeric();
    }
    out
}

/// Finds the role with exactly this name.
pub fn match_role<'a>(roles: &'a [RemoteRole], name: &str) -> Option<&'a RemoteRole> {
    roles.iter().find(|r| r.name == name)
}

/// Maps human-readable role labels to remote role ids.
#[derive(Clone)]
pub struct RoleResolver {
    directory: Arc<dyn DirectoryClient>,
    labels: RolesConfig,
}

impl RoleResolver {
    /// Resolver over a directory with the configured labels.
    pub fn new(directory: Arc<dyn DirectoryClient>, labels: RolesConfig) -> Self {
        Self { directory, labels }
    }

    /// Configured labels.
    pub fn labels(&self) -> &RolesConfig {
        &self.labels
    }

    /// Id of the role named like `label` once title-cased.
    ///
    /// # Errors
    ///
    /// [`RoleErrorKind::NotFound`] if no role carries the name, or a
    /// directory error if roles cannot be listed.
    #[instrument(skip(self))]
    pub async fn resolve(&self, guild_id: &str, label: &str) -> RoleResult<String> {
        self.lookup(guild_id, &title_case(label)).await
    }

    /// Id of one of the four well-known roles.
    ///
    /// The everyone role is matched by [`WellKnownRole::EVERYONE_NAME`]
    /// as-is, never by a configured label.
    pub async fn resolve_well_known(
        &self,
        guild_id: &str,
        role: WellKnownRole,
    ) -> RoleResult<String> {
        if role.is_implicit() {
            self.lookup(guild_id, WellKnownRole::EVERYONE_NAME).await
        } else {
            self.resolve(guild_id, self.labels.label(role)).await
        }
    }

    async fn lookup(&self, guild_id: &str, name: &str) -> RoleResult<String> {
        let roles = self.directory.list_roles(guild_id).await?;
        match match_role(&roles, name) {
            Some(role) => {
                debug!(guild_id, name, role_id = %role.id, "Resolved role");
                Ok(role.id.clone())
            }
            None => Err(RoleError::new(RoleErrorKind::NotFound {
                guild_id: guild_id.to_string(),
                label: name.to_string(),
            })),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_case_words() {
        assert_eq!(title_case(""), "");
        assert_eq!(title_case("builder"), "Builder");
        assert_eq!(title_case("head  builder"), "Head  Builder");
        assert_eq!(title_case("mod-squad"), "Mod-Squad");
        assert_eq!(title_case("eVENT staff"), "EVENT Staff");
    }

    #[test]
    fn match_is_exact() {
        let roles = vec![RemoteRole::new("1", "Admins"), RemoteRole::new("2", "Admin")];
        assert_eq!(match_role(&roles, "Admin").map(|r| r.id.as_str()), Some("2"));
        assert!(match_role(&roles, "admin").is_none());
    }
}
