use anyhow::{Context, Result};
use keyring::Entry;

const SERVICE_NAME: &str = "athletics-browser";

/// Keychain storage for login passwords, scoped to one API server.
///
/// The same username on two deployments gets two separate entries, so
/// pointing `--api-url` at a staging server never offers the production
/// password.
pub struct CredentialStore {
    server: String,
}

impl CredentialStore {
    pub fn new(base_url: &str) -> Self {
        Self {
            server: server_label(base_url),
        }
    }

    /// Keychain account for `username`, e.g. `jdoe@stats.example.org:8443`.
    pub fn account_name(&self, username: &str) -> String {
        format!("{}@{}", username, self.server)
    }

    fn entry(&self, username: &str) -> Result<Entry> {
        Entry::new(SERVICE_NAME, &self.account_name(username))
            .context("Failed to create keyring entry")
    }

    /// Store username and password in the OS keychain
    pub fn store(&self, username: &str, password: &str) -> Result<()> {
        self.entry(username)?
            .set_password(password)
            .context("Failed to store password in keychain")?;
        Ok(())
    }

    /// Retrieve password for a username from the OS keychain
    pub fn get_password(&self, username: &str) -> Result<String> {
        self.entry(username)?
            .get_password()
            .context("Failed to retrieve password from keychain")
    }

    /// Delete stored credentials for a username
    pub fn delete(&self, username: &str) -> Result<()> {
        self.entry(username)?
            .delete_credential()
            .context("Failed to delete credential from keychain")?;
        Ok(())
    }

    /// Check if credentials exist for a username
    pub fn has_credentials(&self, username: &str) -> bool {
        self.entry(username)
            .and_then(|entry| entry.get_password().map_err(Into::into))
            .is_ok()
    }
}

/// Host and explicit port of `base_url`; an unparsable URL is used as given.
fn server_label(base_url: &str) -> String {
    let trimmed = base_url.trim().trim_end_matches('/');
    match reqwest::Url::parse(trimmed) {
        Ok(url) => match (url.host_str(), url.port()) {
            (Some(host), Some(port)) => format!("{}:{}", host, port),
            (Some(host), None) => host.to_string(),
            (None, _) => trimmed.to_string(),
        },
        Err(_) => trimmed.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_account_is_scoped_to_server() {
        let prod = CredentialStore::new("https://stats.example.org");
        let staging = CredentialStore::new("http://127.0.0.1:5000/");
        assert_eq!(prod.account_name("jdoe"), "jdoe@stats.example.org");
        assert_eq!(staging.account_name("jdoe"), "jdoe@127.0.0.1:5000");
    }

    #[test]
    fn test_default_port_and_path_are_ignored() {
        let store = CredentialStore::new("https://Stats.Example.org:443/api/");
        assert_eq!(store.account_name("jdoe"), "jdoe@stats.example.org");
    }

    #[test]
    fn test_unparsable_url_is_used_verbatim() {
        let store = CredentialStore::new("stats-box/");
        assert_eq!(store.account_name("jdoe"), "jdoe@stats-box");
    }
}
