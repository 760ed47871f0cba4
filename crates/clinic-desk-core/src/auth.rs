//! Admin password gate.
//!
//! A single shared secret, stored in plaintext in `admin_config.json` and
//! compared with plain string equality. No hashing, lockout, or rate
//! limiting; this is a front-desk convenience gate, not an authentication
//! system.

use serde::{Deserialize, Serialize};

use crate::store::{DataFile, JsonStore, StoreResult};

const DEFAULT_PASSWORD: &str = "1234";

/// Persisted admin configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AdminConfig {
    pub admin_password: String,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            admin_password: DEFAULT_PASSWORD.to_string(),
        }
    }
}

impl AdminConfig {
    /// Load from the store, writing the default config on first run.
    pub fn load(store: &JsonStore) -> StoreResult<Self> {
        store.load_or_init(DataFile::AdminConfig, Self::default())
    }

    pub fn check_password(&self, input: &str) -> bool {
        input == self.admin_password
    }
}

/// Session-scoped unlock flags. The admin panel and the earnings view are
/// gated independently; unlocking one does not unlock the other.
#[derive(Debug, Default)]
pub struct AuthSession {
    admin_unlocked: bool,
    earnings_unlocked: bool,
}

impl AuthSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn admin_unlocked(&self) -> bool {
        self.admin_unlocked
    }

    pub fn earnings_unlocked(&self) -> bool {
        self.earnings_unlocked
    }

    /// Try to unlock the admin panel; returns whether the password matched.
    pub fn unlock_admin(&mut self, config: &AdminConfig, input: &str) -> bool {
        if config.check_password(input) {
            self.admin_unlocked = true;
        } else {
            tracing::warn!("failed admin unlock attempt");
        }
        self.admin_unlocked
    }

    /// Try to unlock the earnings view; returns whether the password matched.
    pub fn unlock_earnings(&mut self, config: &AdminConfig, input: &str) -> bool {
        if config.check_password(input) {
            self.earnings_unlocked = true;
        } else {
            tracing::warn!("failed earnings unlock attempt");
        }
        self.earnings_unlocked
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_password() {
        let config = AdminConfig::default();
        assert!(config.check_password("1234"));
        assert!(!config.check_password("4321"));
    }

    #[test]
    fn test_first_run_writes_default() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::open(dir.path().join("data")).unwrap();
        let config = AdminConfig::load(&store).unwrap();
        assert_eq!(config.admin_password, "1234");
        assert!(store.path(DataFile::AdminConfig).exists());
    }

    #[test]
    fn test_gates_are_independent() {
        let config = AdminConfig::default();
        let mut session = AuthSession::new();

        assert!(!session.unlock_admin(&config, "wrong"));
        assert!(!session.admin_unlocked());

        assert!(session.unlock_admin(&config, "1234"));
        assert!(session.admin_unlocked());
        assert!(!session.earnings_unlocked());

        assert!(session.unlock_earnings(&config, "1234"));
        assert!(session.earnings_unlocked());
    }
}
