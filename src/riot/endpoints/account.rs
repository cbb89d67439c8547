use crate::error::AppError;
use crate::riot::client::RiotClient;
use crate::riot::region::Platform;
use crate::riot::types::{AccountRef, RiotApiResponse};

/// Build the resolution URL for a caller supplied lookup path
/// (e.g. `/lol/summoner/v4/summoners/by-name/{name}`).
/// The lookup is always rooted under the platform host.
pub fn account_url(platform: Platform, lookup: &str) -> Result<String, AppError> {
    let lookup = lookup.trim();

    if lookup.is_empty() || lookup == "/" {
        return Err(AppError::InvalidRequest("accountLookup must not be empty".into()));
    }
    if lookup.contains("://") || lookup.chars().any(char::is_control) {
        return Err(AppError::InvalidRequest(format!(
            "accountLookup must be a path, got '{lookup}'"
        )));
    }

    let separator = if lookup.starts_with('/') { "" } else { "/" };
    Ok(format!("{}{}{}", platform.base_url(), separator, lookup))
}

impl RiotClient {
    /// Resolve an account from a full resolution URL built by [`account_url`].
    /// Uses platform routing (euw1, na1, kr, etc.)
    pub async fn get_account(&self, url: &str) -> RiotApiResponse<AccountRef> {
        self.get(url).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_is_appended_to_platform_host() {
        let url = account_url(Platform::NA1, "/lol/summoner/v4/summoners/by-name/Tester").unwrap();
        assert_eq!(
            url,
            "https://na1.api.riotgames.com/lol/summoner/v4/summoners/by-name/Tester"
        );
    }

    #[test]
    fn lookup_without_leading_slash_cannot_change_host() {
        let url = account_url(Platform::EUW1, "@evil.example/steal").unwrap();
        assert_eq!(url, "https://euw1.api.riotgames.com/@evil.example/steal");
    }

    #[test]
    fn empty_or_absolute_lookups_are_rejected() {
        for lookup in ["", "   ", "/", "https://evil.example/x", "/a\nb"] {
            assert!(
                matches!(account_url(Platform::NA1, lookup), Err(AppError::InvalidRequest(_))),
                "{lookup:?} should be rejected"
            );
        }
    }
}
