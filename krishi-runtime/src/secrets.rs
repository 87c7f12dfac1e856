use anyhow::Context;

/// Keyring service name. Part of each stored credential's identity, so
/// renaming it strands keys saved by earlier versions.
const SERVICE: &str = "krishi";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecretKey {
    SarvamApiKey,
    OpenRouterApiKey,
}

impl SecretKey {
    fn user(self) -> &'static str {
        match self {
            SecretKey::SarvamApiKey => "sarvam_api_key",
            SecretKey::OpenRouterApiKey => "openrouter_api_key",
        }
    }

    fn env_var(self) -> &'static str {
        match self {
            SecretKey::SarvamApiKey => "SARVAM_API_KEY",
            SecretKey::OpenRouterApiKey => "OPENROUTER_API_KEY",
        }
    }
}

pub fn set_secret(key: SecretKey, value: &str) -> anyhow::Result<()> {
    let entry = keyring::Entry::new(SERVICE, key.user()).context("create keyring entry")?;
    entry.set_password(value).context("set secret")
}

/// Environment wins over the keyring so deployments without a desktop
/// keychain (containers, CI) can still supply keys.
pub fn get_secret(key: SecretKey) -> anyhow::Result<Option<String>> {
    if let Ok(v) = std::env::var(key.env_var())
        && !v.trim().is_empty()
    {
        return Ok(Some(v));
    }

    let entry = keyring::Entry::new(SERVICE, key.user()).context("create keyring entry")?;
    match entry.get_password() {
        Ok(v) => Ok(Some(v)),
        Err(keyring::Error::NoEntry) => Ok(None),
        Err(e) => Err(anyhow::Error::new(e)).context("get secret"),
    }
}

pub fn delete_secret(key: SecretKey) -> anyhow::Result<()> {
    let entry = keyring::Entry::new(SERVICE, key.user()).context("create keyring entry")?;
    match entry.delete_credential() {
        Ok(()) => Ok(()),
        Err(keyring::Error::NoEntry) => Ok(()),
        Err(e) => Err(anyhow::Error::new(e)).context("delete secret"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Tests never touch the real keychain; only the name mappings are
    // checked, since those are what stored credentials are keyed by.
    #[test]
    fn entry_and_env_names_are_stable() {
        assert_eq!(SecretKey::SarvamApiKey.user(), "sarvam_api_key");
        assert_eq!(SecretKey::SarvamApiKey.env_var(), "SARVAM_API_KEY");
        assert_eq!(SecretKey::OpenRouterApiKey.user(), "openrouter_api_key");
        assert_eq!(SecretKey::OpenRouterApiKey.env_var(), "OPENROUTER_API_KEY");
    }
}
