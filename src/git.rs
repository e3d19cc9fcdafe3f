//! Git command lines for the commit, tag and push steps.
//!
//! Messages passed in are expected to be shell-escaped already (see
//! [crate::editor::shell_escape]); they are wrapped in double quotes here.

use crate::editor::shell_escape;

pub fn add_all() -> String {
    "git add -A".to_string()
}

pub fn commit(message: &str) -> String {
    format!("git commit -m \"{}\"", message)
}

/// Tag name for a version, e.g. `v1.2.4`.
pub fn tag_name(prefix: &str, version: &str) -> String {
    format!("{}{}", prefix, version)
}

/// Annotated tag carrying the commit message.
pub fn annotated_tag(name: &str, message: &str) -> String {
    format!("git tag -a \"{}\" -m \"{}\"", shell_escape(name), message)
}

/// Pushes the current branch, plus annotated tags when one was created.
pub fn push(follow_tags: bool) -> String {
    if follow_tags {
        "git push --follow-tags".to_string()
    } else {
        "git push".to_string()
    }
}

/// The full git sequence for one release, in execution order.
pub fn release_commands(message: &str, tag: Option<&str>, push_after: bool) -> Vec<String> {
    let mut commands = vec![add_all(), commit(message)];
    if let Some(name) = tag {
        commands.push(annotated_tag(name, message));
    }
    if push_after {
        commands.push(push(tag.is_some()));
    }
    commands
}
