//! Text summaries of mirrored guilds, formatted as chat code blocks.

use guildmirror_core::DirectoryGroup;
use std::fmt::Write;

/// Details of one guild.
pub fn tenant_summary(group: &DirectoryGroup) -> String {
    let mut out = String::from("```\n");
    let _ = writeln!(out, "Name: {}", group.name);
    let _ = writeln!(out, "ID: {}", group.id);
    let _ = writeln!(out, "Icon: {}\n", group.icon);
    let _ = writeln!(out, "OwnerID: {}", group.owner_id);
    let _ = writeln!(out, "AdminID: {}", group.admin_role_id);
    let _ = writeln!(out, "ModeratorID: {}", group.moderator_role_id);
    let _ = writeln!(out, "EveryoneID: {}", group.everyone_role_id);
    let _ = writeln!(out, "BuilderID: {}\n", group.builder_role_id);
    let _ = writeln!(out, "User Count: {}", group.member_ids.len());
    let _ = writeln!(out, "Role Count: {}", group.role_ids.len());
    out.push_str("\n```\n");
    out
}

/// Guild count followed by one `name: id` line per guild.
pub fn deployment_summary(groups: &[DirectoryGroup]) -> String {
    let mut out = String::from("\n```\n");
    let _ = writeln!(out, "Guild Count: {}\n", groups.len());
    for group in groups {
        let _ = writeln!(out, "{}: {}", group.name, group.id);
    }
    out.push_str("```\n");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tenant_lines() {
        let mut group = DirectoryGroup::new("1");
        group.name = "Keep".into();
        group.admin_role_id = "7".into();
        group.add_member("42");
        group.add_role("7");
        group.add_role("8");

        let text = tenant_summary(&group);
        assert!(text.starts_with("```\nName: Keep\nID: 1\n"));
        assert!(text.contains("AdminID: 7\n"));
        assert!(text.contains("User Count: 1\nRole Count: 2\n"));
        assert!(text.ends_with("\n```\n"));
    }

    #[test]
    fn deployment_lines() {
        let mut keep = DirectoryGroup::new("1");
        keep.name = "Keep".into();
        let mut tower = DirectoryGroup::new("2");
        tower.name = "Tower".into();

        assert_eq!(
            deployment_summary(&[keep, tower]),
            "\n```\nGuild Count: 2\n\nKeep: 1\nTower: 2\n```\n"
        );
    }
}
