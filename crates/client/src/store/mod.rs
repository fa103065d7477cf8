//! Local reactive store.
//!
//! Five independent slices (session, cart, wishlist, orders, ui) live under a
//! single lock and change only through [`Store::dispatch`]. Every reducer is
//! synchronous, so an action is applied atomically and the last action to
//! land wins.
//!
//! The session, cart, wishlist and ui slices are written to a
//! [`KeyValueStorage`] after each dispatch that touches them and restored
//! by [`Store::rehydrate`]. Orders and the hydrated flag are never persisted.

mod cart;
mod orders;
mod persist;
mod session;
mod ui;
mod wishlist;

use std::sync::Arc;

use parking_lot::RwLock;
use secrecy::SecretString;
use serde::de::DeserializeOwned;
use shopx_core::UserId;
use tracing::{debug, warn};

use crate::error::ShopxError;

pub use cart::{CartAction, CartState};
pub use orders::{OrdersAction, OrdersState};
pub use persist::{FileStorage, KeyValueStorage, MemoryStorage, PersistKey};
pub use session::{SessionAction, SessionState};
pub use ui::{ThemePreference, UiAction, UiState};
pub use wishlist::{WishlistAction, WishlistState};

use session::PersistedSession;
use ui::PersistedUi;

/// Snapshot of every slice.
#[derive(Debug, Clone, Default)]
pub struct StoreState {
    pub session: SessionState,
    pub cart: CartState,
    pub wishlist: WishlistState,
    pub orders: OrdersState,
    pub ui: UiState,
}

/// An action addressed to one slice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Session(SessionAction),
    Cart(CartAction),
    Wishlist(WishlistAction),
    Orders(OrdersAction),
    Ui(UiAction),
}

impl From<SessionAction> for Action {
    fn from(action: SessionAction) -> Self {
        Self::Session(action)
    }
}

impl From<CartAction> for Action {
    fn from(action: CartAction) -> Self {
        Self::Cart(action)
    }
}

impl From<WishlistAction> for Action {
    fn from(action: WishlistAction) -> Self {
        Self::Wishlist(action)
    }
}

impl From<OrdersAction> for Action {
    fn from(action: OrdersAction) -> Self {
        Self::Orders(action)
    }
}

impl From<UiAction> for Action {
    fn from(action: UiAction) -> Self {
        Self::Ui(action)
    }
}

/// Shared handle to the store. Cheap to clone.
#[derive(Clone)]
pub struct Store {
    inner: Arc<StoreInner>,
}

struct StoreInner {
    state: RwLock<StoreState>,
    storage: Box<dyn KeyValueStorage>,
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store")
            .field("state", &*self.inner.state.read())
            .finish_non_exhaustive()
    }
}

impl Store {
    /// Create an empty, not yet hydrated store.
    pub fn new(storage: impl KeyValueStorage + 'static) -> Self {
        Self {
            inner: Arc::new(StoreInner {
                state: RwLock::new(StoreState::default()),
                storage: Box::new(storage),
            }),
        }
    }

    /// Store backed by a fresh [`MemoryStorage`].
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(MemoryStorage::new())
    }

    /// Apply an action and persist the slice it touched.
    pub fn dispatch(&self, action: impl Into<Action>) {
        let action = action.into();
        debug!(?action, "dispatch");

        let mut state = self.inner.state.write();
        let touched = match action {
            Action::Session(action) => {
                let persist = !matches!(action, SessionAction::SetHydrated(_));
                state.session.apply(action);
                persist.then_some(PersistKey::Session)
            }
            Action::Cart(action) => {
                state.cart.apply(action);
                Some(PersistKey::Cart)
            }
            Action::Wishlist(action) => {
                state.wishlist.apply(action);
                Some(PersistKey::Wishlist)
            }
            Action::Orders(action) => {
                state.orders.apply(action);
                None
            }
            Action::Ui(action) => {
                state.ui.apply(action);
                Some(PersistKey::Ui)
            }
        };

        if let Some(key) = touched {
            self.persist(&state, key);
        }
    }

    /// Apply several actions in order.
    pub fn dispatch_all<I>(&self, actions: I)
    where
        I: IntoIterator,
        I::Item: Into<Action>,
    {
        for action in actions {
            self.dispatch(action);
        }
    }

    fn persist(&self, state: &StoreState, key: PersistKey) {
        let encoded = match key {
            PersistKey::Session => serde_json::to_string(&state.session.to_persisted()),
            PersistKey::Cart => serde_json::to_string(&state.cart),
            PersistKey::Wishlist => serde_json::to_string(&state.wishlist),
            PersistKey::Ui => serde_json::to_string(&state.ui.to_persisted()),
        };
        let result = encoded
            .map_err(ShopxError::from)
            .and_then(|json| self.inner.storage.set(key.as_str(), &json));
        if let Err(e) = result {
            warn!(key = key.as_str(), error = %e, "Failed to persist store slice");
        }
    }

    /// Restore persisted slices, then mark the store hydrated.
    ///
    /// Missing keys leave the slice at its default. Unreadable or corrupt
    /// entries are logged and also fall back to the default.
    pub fn rehydrate(&self) {
        let session: Option<PersistedSession> = self.load(PersistKey::Session);
        let cart: Option<CartState> = self.load(PersistKey::Cart);
        let wishlist: Option<WishlistState> = self.load(PersistKey::Wishlist);
        let ui: Option<PersistedUi> = self.load(PersistKey::Ui);

        {
            let mut state = self.inner.state.write();
            if let Some(session) = session {
                state.session.restore(session);
            }
            state.cart = cart.unwrap_or_default();
            state.wishlist = wishlist.unwrap_or_default();
            if let Some(ui) = ui {
                state.ui.restore(ui);
            }
        }

        self.dispatch(SessionAction::SetHydrated(true));
        debug!("Store rehydrated");
    }

    fn load<T: DeserializeOwned>(&self, key: PersistKey) -> Option<T> {
        let raw = match self.inner.storage.get(key.as_str()) {
            Ok(raw) => raw?,
            Err(e) => {
                warn!(key = key.as_str(), error = %e, "Failed to read persisted slice");
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(key = key.as_str(), error = %e, "Discarding corrupt persisted slice");
                None
            }
        }
    }

    /// Read from the current state under the lock.
    pub fn read<R>(&self, f: impl FnOnce(&StoreState) -> R) -> R {
        f(&self.inner.state.read())
    }

    /// Clone of the whole state.
    #[must_use]
    pub fn snapshot(&self) -> StoreState {
        self.read(Clone::clone)
    }

    #[must_use]
    pub fn session(&self) -> SessionState {
        self.read(|s| s.session.clone())
    }

    #[must_use]
    pub fn cart(&self) -> CartState {
        self.read(|s| s.cart.clone())
    }

    #[must_use]
    pub fn wishlist(&self) -> WishlistState {
        self.read(|s| s.wishlist.clone())
    }

    #[must_use]
    pub fn orders(&self) -> OrdersState {
        self.read(|s| s.orders.clone())
    }

    #[must_use]
    pub fn ui(&self) -> UiState {
        self.read(|s| s.ui.clone())
    }

    #[must_use]
    pub fn is_hydrated(&self) -> bool {
        self.read(|s| s.session.hydrated)
    }

    #[must_use]
    pub fn bearer_token(&self) -> Option<SecretString> {
        self.read(|s| s.session.token.clone())
    }

    #[must_use]
    pub fn current_user_id(&self) -> Option<UserId> {
        self.read(|s| s.session.user_id().cloned())
    }
}
