//! Observable state containers.
//!
//! Each domain gets its own [`Store`], constructed explicitly and handed to
//! whoever needs it through [`AppStores`]. Values are display mirrors of
//! backend state, so concurrent writers resolve by last write wins.

use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};

use thiserror::Error;
use tokio::sync::watch;

use crate::state::{AirdropState, MiningState, NodeState, SetupState, UiState, WalletState};

#[derive(Debug, Error)]
#[error("store `{0}` was dropped")]
pub struct StoreClosed(pub &'static str);

struct StoreInner<T> {
    name: &'static str,
    tx: watch::Sender<T>,
    version: AtomicU64,
}

pub struct Store<T> {
    inner: Arc<StoreInner<T>>,
}

impl<T> Clone for Store<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: Clone> Store<T> {
    pub fn new(name: &'static str, initial: T) -> Self {
        let (tx, _) = watch::channel(initial);
        Self {
            inner: Arc::new(StoreInner {
                name,
                tx,
                version: AtomicU64::new(0),
            }),
        }
    }

    pub fn get(&self) -> T {
        self.inner.tx.borrow().clone()
    }

    /// Reads a slice of the current value without cloning the whole state.
    pub fn read<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.inner.tx.borrow())
    }

    pub fn set(&self, value: T) {
        self.inner.tx.send_replace(value);
        self.bump();
    }

    pub fn update(&self, f: impl FnOnce(&mut T)) {
        self.inner.tx.send_modify(f);
        self.bump();
    }

    /// Applies `f` and notifies subscribers only when it reports a change.
    pub fn update_if(&self, f: impl FnOnce(&mut T) -> bool) -> bool {
        let changed = self.inner.tx.send_if_modified(f);
        if changed {
            self.bump();
        }
        changed
    }

    pub fn subscribe(&self) -> StoreSubscription<T> {
        StoreSubscription {
            name: self.inner.name,
            rx: self.inner.tx.subscribe(),
        }
    }

    /// Number of mutations applied since construction.
    pub fn version(&self) -> u64 {
        self.inner.version.load(Ordering::Relaxed)
    }

    fn bump(&self) {
        self.inner.version.fetch_add(1, Ordering::Relaxed);
    }
}

pub struct StoreSubscription<T> {
    name: &'static str,
    rx: watch::Receiver<T>,
}

impl<T: Clone> StoreSubscription<T> {
    pub fn current(&self) -> T {
        self.rx.borrow().clone()
    }

    /// Waits for the next mutation and returns the value it left behind.
    pub async fn changed(&mut self) -> Result<T, StoreClosed> {
        self.rx
            .changed()
            .await
            .map_err(|_| StoreClosed(self.name))?;
        Ok(self.rx.borrow_and_update().clone())
    }
}

/// One store per domain mirrored from the backend.
#[derive(Clone)]
pub struct AppStores {
    pub mining: Store<MiningState>,
    pub wallet: Store<WalletState>,
    pub node: Store<NodeState>,
    pub ui: Store<UiState>,
    pub setup: Store<SetupState>,
    pub airdrop: Store<AirdropState>,
}

impl AppStores {
    pub fn new() -> Self {
        Self {
            mining: Store::new("mining", MiningState::default()),
            wallet: Store::new("wallet", WalletState::default()),
            node: Store::new("node", NodeState::default()),
            ui: Store::new("ui", UiState::default()),
            setup: Store::new("setup", SetupState::default()),
            airdrop: Store::new("airdrop", AirdropState::default()),
        }
    }

    /// Sum of every store's mutation counter.
    pub fn total_version(&self) -> u64 {
        self.mining.version()
            + self.wallet.version()
            + self.node.version()
            + self.ui.version()
            + self.setup.version()
            + self.airdrop.version()
    }

    pub fn snapshot(&self) -> StoresSnapshot {
        StoresSnapshot {
            mining: self.mining.get(),
            wallet: self.wallet.get(),
            node: self.node.get(),
            ui: self.ui.get(),
            setup: self.setup.get(),
            airdrop: self.airdrop.get(),
        }
    }
}

impl Default for AppStores {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct StoresSnapshot {
    pub mining: MiningState,
    pub wallet: WalletState,
    pub node: NodeState,
    pub ui: UiState,
    pub setup: SetupState,
    pub airdrop: AirdropState,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_and_update_bump_version() {
        let store = Store::new("counter", 0u32);
        assert_eq!(store.version(), 0);

        store.set(4);
        store.update(|value| *value += 1);

        assert_eq!(store.get(), 5);
        assert_eq!(store.version(), 2);
    }

    #[test]
    fn update_if_without_change_leaves_version_alone() {
        let store = Store::new("counter", 7u32);
        assert!(!store.update_if(|_| false));
        assert_eq!(store.version(), 0);

        assert!(store.update_if(|value| {
            *value = 8;
            true
        }));
        assert_eq!(store.get(), 8);
        assert_eq!(store.version(), 1);
    }

    #[test]
    fn clones_share_the_same_value() {
        let store = Store::new("shared", String::from("a"));
        let other = store.clone();
        other.set("b".into());
        assert_eq!(store.get(), "b");
        assert_eq!(store.read(|value| value.len()), 1);
    }

    #[tokio::test]
    async fn subscribers_observe_mutations() {
        let store = Store::new("watched", 1u64);
        let mut subscription = store.subscribe();
        assert_eq!(subscription.current(), 1);

        store.set(2);
        assert_eq!(subscription.changed().await.expect("changed"), 2);
    }

    #[tokio::test]
    async fn subscription_reports_closed_store() {
        let store = Store::new("dropped", 1u64);
        let mut subscription = store.subscribe();
        drop(store);

        let err = subscription.changed().await.expect_err("closed");
        assert_eq!(err.0, "dropped");
    }

    #[test]
    fn fresh_app_stores_have_no_mutations() {
        let stores = AppStores::new();
        assert_eq!(stores.total_version(), 0);
        assert!(stores.snapshot().node.block_height.is_none());
    }
}
