// ── Credential resolution ──
//
// Passwords resolve through a chain: environment variable → OS keyring →
// plaintext settings field. Keyring entries are keyed by host + site so
// multiple records against the same instance stay distinct.

use secrecy::SecretString;
use url::Url;

use crate::SettingsError;
use crate::settings::SiteEntry;

const KEYRING_SERVICE: &str = "medialift";

/// Environment variable consulted before the keyring.
pub const PASSWORD_ENV: &str = "MEDIALIFT_PASSWORD";

/// Keyring account name for a site: `{host}/{site}`.
///
/// Falls back to the raw URL string when it doesn't parse — resolution
/// must still work for records typed in by hand.
fn keyring_account(site_url: &str, site: &str) -> String {
    let host = Url::parse(site_url)
        .ok()
        .and_then(|u| u.host_str().map(ToOwned::to_owned))
        .unwrap_or_else(|| site_url.to_owned());
    format!("{host}/{site}")
}

/// Resolve a site's password from the credential chain.
pub fn resolve_password(entry: &SiteEntry) -> Result<SecretString, SettingsError> {
    // 1. Environment
    if let Ok(pw) = std::env::var(PASSWORD_ENV) {
        return Ok(SecretString::from(pw));
    }

    // 2. System keyring
    let account = keyring_account(&entry.site_url, &entry.site);
    if let Ok(keyring_entry) = keyring::Entry::new(KEYRING_SERVICE, &account) {
        if let Ok(pw) = keyring_entry.get_password() {
            return Ok(SecretString::from(pw));
        }
    }

    // 3. Plaintext in the settings file
    if let Some(ref pw) = entry.password {
        return Ok(SecretString::from(pw.clone()));
    }

    Err(SettingsError::NoCredentials {
        site: entry.site_url.clone(),
    })
}

/// Store a site's password in the OS keyring.
pub fn store_password(site_url: &str, site: &str, password: &str) -> Result<(), SettingsError> {
    let account = keyring_account(site_url, site);
    let entry = keyring::Entry::new(KEYRING_SERVICE, &account)?;
    entry.set_password(password)?;
    Ok(())
}

/// Remove a site's password from the OS keyring. Missing entries are
/// fine — the record may never have had one stored.
pub fn forget_password(site_url: &str, site: &str) -> Result<(), SettingsError> {
    let account = keyring_account(site_url, site);
    let entry = keyring::Entry::new(KEYRING_SERVICE, &account)?;
    match entry.delete_credential() {
        Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
        Err(err) => Err(err.into()),
    }
}
