pub const APP_NAME: &str = "Bake Sale Planner";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");
pub const GIT_TAG: Option<&str> = option_env!("GIT_TAG");

/// Version string for the About card and HTTP user agents: the git tag when
/// the build had one, otherwise the crate version.
pub fn version_label() -> String {
    if let Some(tag) = GIT_TAG {
        tag.to_string()
    } else {
        format!("v{APP_VERSION}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_falls_back_to_crate_version() {
        let label = version_label();
        assert!(!label.is_empty());
        if GIT_TAG.is_none() {
            assert_eq!(label, format!("v{APP_VERSION}"));
        }
    }
}
