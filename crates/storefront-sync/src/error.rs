//! Error types for the sync stores.

use storefront_model::{CouponKey, OrderKey};
use storefront_storage::StorageError;
use thiserror::Error;

use crate::remote::RemoteError;

/// Error returned by every store operation.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The remote call failed. Passed through untouched.
    #[error(transparent)]
    Remote(#[from] RemoteError),

    /// The local cache could not be reached.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// The remote confirmed deleting a different coupon than the one asked for.
    #[error("remote deleted coupon {actual}, expected {expected}")]
    UnexpectedCouponDeleted {
        expected: CouponKey,
        actual: CouponKey,
    },

    /// A local-only operation targeted an order that is not cached.
    #[error("order {0} is not stored locally")]
    OrderNotFoundInStorage(OrderKey),
}

impl StoreError {
    /// True when the remote reported the resource as gone.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Remote(RemoteError::NotFound))
    }

    pub fn remote(&self) -> Option<&RemoteError> {
        match self {
            Self::Remote(error) => Some(error),
            _ => None,
        }
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Remote error code sent back when a product SKU is already taken.
pub const INVALID_SKU_CODE: &str = "product_invalid_sku";

/// Error returned by `ProductStore::update_product`.
#[derive(Debug, Error)]
pub enum ProductUpdateError {
    #[error("the SKU is already used by another product")]
    InvalidSku,

    #[error(transparent)]
    Unknown(StoreError),
}

impl From<StoreError> for ProductUpdateError {
    fn from(error: StoreError) -> Self {
        match error.remote().and_then(RemoteError::code) {
            Some(INVALID_SKU_CODE) => Self::InvalidSku,
            _ => Self::Unknown(error),
        }
    }
}

/// Error returned by `AttributeTermStore::synchronize_all_terms`.
#[derive(Debug, Error)]
pub enum AttributeTermError {
    #[error("failed to synchronize attribute terms on page {page_number}: {source}")]
    TermsSynchronization {
        page_number: u32,
        #[source]
        source: StoreError,
    },
}
