//! # storefront-sync
//!
//! Per-domain stores that pull storefront data from a remote and reconcile
//! it into the local cache.
//!
//! ## Layout
//!
//! - [`remote`]: the traits a transport implements, one per domain
//! - [`reconcile`]: the merge rules every write goes through
//! - [`pagination`]: page bookkeeping for list syncs
//! - [`stores`]: one store per domain, each with its own staging context
//! - [`StoresManager`]: builds every store from the shared config
//! - [`Dispatcher`]: routes UI actions to stores and delivers results on the
//!   storage main context
//!
//! ## Example
//!
//! ```ignore
//! let storage = StorageManager::open(config.database_file(&paths))?;
//! let stores = Arc::new(StoresManager::new(storage, remotes, &config));
//!
//! let synced = stores.orders().synchronize_all_orders(site_id, &filter).await?;
//! ```

mod dispatch;
mod error;
mod manager;
pub mod pagination;
pub mod reconcile;
pub mod remote;
pub mod stores;

pub use dispatch::{
    Action, AttributeTermAction, Completion, CouponAction, Dispatcher, MetaDataAction,
    OrderAction, OrderNoteAction, ProductAction, RefundAction, ShipmentAction, StatsAction,
};
pub use error::{
    AttributeTermError, ProductUpdateError, StoreError, StoreResult, INVALID_SKU_CODE,
};
pub use manager::StoresManager;
pub use pagination::{has_next_page, PageOutcome, FIRST_PAGE};
pub use reconcile::{reconcile, ReconcileOptions, ReconcileReport, Strategy, Upsertable};
pub use remote::{OrderListFilter, RemoteError, RemoteResult, Remotes};
pub use stores::{
    AttributeTermStore, CouponStore, MetaDataStore, OrderNoteStore, OrderStore, ProductStore,
    RefundStore, ShipmentStore, StatsStore,
};

#[cfg(test)]
mod tests;
