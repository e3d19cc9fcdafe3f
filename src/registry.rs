//! Registry publish command line.

use crate::config::RegistryConfig;
use crate::version::ReleaseKind;

/// Options forwarded to the registry client.
#[derive(Debug, Clone, PartialEq)]
pub struct PublishOptions<'a> {
    pub registry: &'a RegistryConfig,
    pub public_access: bool,
    pub kind: &'a ReleaseKind,
    /// One-time password; empty or `None` forwards nothing
    pub otp: Option<&'a str>,
}

/// Builds e.g. `npm publish --registry=https://registry.npmjs.org/ --tag beta`.
///
/// Pre-release kinds publish under a dist-tag named after the kind so they
/// never move the default `latest` channel.
pub fn publish_command(options: &PublishOptions<'_>) -> String {
    let mut parts = vec![
        options.registry.client.clone(),
        "publish".to_string(),
        format!("--registry={}", options.registry.url),
    ];

    if options.public_access {
        parts.push("--access public".to_string());
    }

    if let Some(tag) = options.kind.dist_tag() {
        parts.push(format!("--tag {}", tag));
    }

    if let Some(otp) = options.otp.filter(|code| !code.is_empty()) {
        parts.push(format!("--otp={}", otp));
    }

    parts.join(" ")
}
