//! Simulator instance state: credential registry and per-account stores.

use std::sync::Arc;

use dashmap::DashMap;

use crate::config::SimulatorConfig;
use crate::store::TargetStore;

/// One credential pair and the targets it owns.
///
/// Accounts are namespaces: names are unique within an account but two
/// accounts can each own a target called `x`.
#[derive(Debug)]
pub struct Account {
    pub access_key: String,
    pub secret_key: String,
    pub store: TargetStore,
}

/// One in-memory service instance.
///
/// Everything is owned by the instance; no process-wide state, so a test can
/// run several simulators side by side with different configs.
pub struct Simulator {
    pub config: SimulatorConfig,
    accounts: DashMap<String, Arc<Account>>,
}

/// Shared handle passed to the axum handlers.
pub type AppState = Arc<Simulator>;

impl Simulator {
    pub fn new(config: SimulatorConfig) -> Self {
        Self {
            config,
            accounts: DashMap::new(),
        }
    }

    /// Register a credential pair with an empty target namespace.
    pub fn register_account(
        &self,
        access_key: impl Into<String>,
        secret_key: impl Into<String>,
    ) -> Arc<Account> {
        let access_key = access_key.into();
        let account = Arc::new(Account {
            access_key: access_key.clone(),
            secret_key: secret_key.into(),
            store: TargetStore::new(),
        });
        self.accounts.insert(access_key, account.clone());
        account
    }

    /// Register an account with freshly generated random credentials.
    pub fn register_random_account(&self) -> Arc<Account> {
        let access_key = uuid::Uuid::new_v4().simple().to_string();
        let secret_key = uuid::Uuid::new_v4().simple().to_string();
        self.register_account(access_key, secret_key)
    }

    /// Resolve an access key to its account, if registered.
    pub fn account(&self, access_key: &str) -> Option<Arc<Account>> {
        self.accounts.get(access_key).map(|a| a.clone())
    }
}
