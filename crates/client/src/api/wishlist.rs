//! Wishlist reads and edits.

use shopx_core::normalize::normalize_wishlist;
use shopx_core::{ProductId, UserId, Wishlist};
use tracing::instrument;

use super::{CachedQuery, Mutation, ShopxApi, missing};
use crate::cache::{CacheValue, Tag, TagKind};
use crate::error::Result;
use crate::graphql::{
    AddToWishlist, AddToWishlistData, GetWishlist, GetWishlistData, RemoveFromWishlist,
    RemoveFromWishlistData, UserProductVariables, UserVariables,
};
use crate::store::{Store, WishlistAction};
use crate::transport::Transport;

impl CachedQuery for GetWishlist {
    type Output = Wishlist;

    const USER_SCOPED: bool = true;

    fn normalize(data: GetWishlistData) -> Self::Output {
        normalize_wishlist(&data.get_wishlist)
    }

    fn provides(_output: &Self::Output) -> Vec<Tag> {
        vec![Tag::current(TagKind::Wishlist)]
    }

    fn into_cache(output: Self::Output) -> CacheValue {
        CacheValue::Wishlist(output)
    }

    fn from_cache(value: CacheValue) -> Option<Self::Output> {
        match value {
            CacheValue::Wishlist(wishlist) => Some(wishlist),
            _ => None,
        }
    }

    fn on_success(store: &Store, output: &Self::Output) {
        store.dispatch(WishlistAction::Set(output.products.clone()));
    }
}

impl Mutation for AddToWishlist {
    type Output = Wishlist;

    fn normalize(data: AddToWishlistData) -> Result<Wishlist> {
        if data.add_to_wishlist.is_null() {
            return Err(missing::<Self>());
        }
        Ok(normalize_wishlist(&data.add_to_wishlist))
    }

    fn invalidates() -> Vec<Tag> {
        vec![Tag::current(TagKind::Wishlist)]
    }
}

impl Mutation for RemoveFromWishlist {
    type Output = Wishlist;

    fn normalize(data: RemoveFromWishlistData) -> Result<Wishlist> {
        if data.remove_from_wishlist.is_null() {
            return Err(missing::<Self>());
        }
        Ok(normalize_wishlist(&data.remove_from_wishlist))
    }

    fn invalidates() -> Vec<Tag> {
        vec![Tag::current(TagKind::Wishlist)]
    }
}

impl<T: Transport> ShopxApi<T> {
    /// Fetch a user's wishlist and write it into the wishlist slice.
    ///
    /// # Errors
    ///
    /// Returns [`crate::ShopxError::NotHydrated`] before rehydration,
    /// otherwise any request error.
    #[instrument(skip(self, user_id), fields(user_id = %user_id))]
    pub async fn get_wishlist(&self, user_id: &UserId) -> Result<Wishlist> {
        self.query::<GetWishlist>(UserVariables::new(user_id.clone()))
            .await
    }

    /// # Errors
    ///
    /// Returns any request error.
    #[instrument(skip(self, user_id, product_id), fields(user_id = %user_id, product_id = %product_id))]
    pub async fn add_to_wishlist(&self, user_id: &UserId, product_id: &ProductId) -> Result<Wishlist> {
        self.mutate::<AddToWishlist>(UserProductVariables {
            user_id: user_id.clone(),
            product_id: product_id.clone(),
        })
        .await
    }

    /// # Errors
    ///
    /// Returns any request error.
    #[instrument(skip(self, user_id, product_id), fields(user_id = %user_id, product_id = %product_id))]
    pub async fn remove_from_wishlist(
        &self,
        user_id: &UserId,
        product_id: &ProductId,
    ) -> Result<Wishlist> {
        self.mutate::<RemoveFromWishlist>(UserProductVariables {
            user_id: user_id.clone(),
            product_id: product_id.clone(),
        })
        .await
    }
}
