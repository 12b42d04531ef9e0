//! Azure resource naming rules.
//!
//! Validation happens at declaration time so a bad name fails the run before
//! the engine ever sees the graph.

use std::sync::OnceLock;

use regex::Regex;

use crate::error::{AzureError, AzureResult};

fn storage_account_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[a-z0-9]{3,24}$").unwrap())
}

fn dns_name_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[a-z0-9][a-z0-9-]{0,61}[a-z0-9]$").unwrap())
}

fn resource_group_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[\w\-\.\(\)]{1,90}$").unwrap())
}

/// Storage account names: 3-24 lowercase letters and digits.
pub fn validate_storage_account_name(name: &str) -> AzureResult<()> {
    if storage_account_re().is_match(name) {
        Ok(())
    } else {
        Err(AzureError::InvalidName {
            name: name.to_string(),
            reason: "must be 3-24 lowercase letters and digits".to_string(),
        })
    }
}

/// DNS-exposed names (SQL servers, web apps): lowercase alphanumeric and
/// hyphens, 2-63 characters, no leading or trailing hyphen.
pub fn validate_dns_name(name: &str) -> AzureResult<()> {
    if dns_name_re().is_match(name) {
        Ok(())
    } else {
        Err(AzureError::InvalidName {
            name: name.to_string(),
            reason: "must be 2-63 lowercase alphanumeric characters or hyphens".to_string(),
        })
    }
}

/// Resource group names: up to 90 word characters, hyphens, periods, parens.
pub fn validate_resource_group_name(name: &str) -> AzureResult<()> {
    if resource_group_re().is_match(name) {
        Ok(())
    } else {
        Err(AzureError::InvalidName {
            name: name.to_string(),
            reason: "must be 1-90 alphanumerics, underscores, hyphens, periods or parentheses"
                .to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_valid_storage_account_names() {
        assert!(validate_storage_account_name("wwwcontainer").is_ok());
        assert!(validate_storage_account_name("abc").is_ok());
    }

    #[test]
    fn rejects_bad_storage_account_names() {
        assert!(validate_storage_account_name("ab").is_err());
        assert!(validate_storage_account_name("Has-Caps").is_err());
        assert!(validate_storage_account_name("waytoolongforanazurestorageaccount").is_err());
    }

    #[test]
    fn dns_names_reject_edge_hyphens() {
        assert!(validate_dns_name("pulumiserver").is_ok());
        assert!(validate_dns_name("web-app-1").is_ok());
        assert!(validate_dns_name("-leading").is_err());
        assert!(validate_dns_name("trailing-").is_err());
    }

    #[test]
    fn resource_group_names_allow_dots_and_parens() {
        assert!(validate_resource_group_name("pulumi").is_ok());
        assert!(validate_resource_group_name("team.rg(prod)").is_ok());
        assert!(validate_resource_group_name("").is_err());
    }
}
