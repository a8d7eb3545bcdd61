//! Credential Store
//!
//! Persists the remember-me credentials in browser local storage under
//! three fixed keys. Storage failures (unavailable, full, blocked) are
//! logged and swallowed: save and clear degrade to no-ops, load degrades
//! to absent. Nothing here ever propagates an error.

const KEY_USERNAME: &str = "senseview_username";
const KEY_PASSWORD: &str = "senseview_password";
const KEY_REMEMBER: &str = "senseview_remember";

/// Credentials read back from local storage
#[derive(Clone, PartialEq, Eq)]
pub struct StoredCredentials {
    pub username: String,
    pub password: String,
    pub remember: bool,
}

fn local_storage() -> Option<web_sys::Storage> {
    web_sys::window()?.local_storage().ok().flatten()
}

/// Persist credentials and set the remember flag
pub fn save(username: &str, password: &str) {
    let Some(storage) = local_storage() else {
        web_sys::console::warn_1(&"Local storage unavailable, credentials not saved".into());
        return;
    };

    let result = storage
        .set_item(KEY_USERNAME, username)
        .and_then(|_| storage.set_item(KEY_PASSWORD, password))
        .and_then(|_| storage.set_item(KEY_REMEMBER, "true"));

    if let Err(e) = result {
        web_sys::console::warn_1(&format!("Failed to save credentials: {:?}", e).into());
    }
}

/// Read saved credentials. Returns them only when the remember flag is set
/// and both fields are present.
pub fn load() -> Option<StoredCredentials> {
    let storage = local_storage()?;

    let remember = storage.get_item(KEY_REMEMBER).ok().flatten()? == "true";
    if !remember {
        return None;
    }

    let username = storage.get_item(KEY_USERNAME).ok().flatten()?;
    let password = storage.get_item(KEY_PASSWORD).ok().flatten()?;

    Some(StoredCredentials {
        username,
        password,
        remember: true,
    })
}

/// Remove all three keys unconditionally
pub fn clear() {
    let Some(storage) = local_storage() else {
        return;
    };

    let result = storage
        .remove_item(KEY_USERNAME)
        .and_then(|_| storage.remove_item(KEY_PASSWORD))
        .and_then(|_| storage.remove_item(KEY_REMEMBER));

    if let Err(e) = result {
        web_sys::console::warn_1(&format!("Failed to clear saved credentials: {:?}", e).into());
    }
}
