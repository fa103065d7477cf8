//! Products, product detail and categories.

use shopx_core::normalize::{normalize_categories, normalize_product_detail, normalize_products};
use shopx_core::{Category, Product, ProductDetail, ProductId};
use tracing::instrument;

use super::{CachedQuery, ShopxApi};
use crate::cache::{CacheValue, Tag, TagId, TagKind};
use crate::error::Result;
use crate::graphql::{
    GetCategories, GetCategoriesData, GetProductDetail, GetProductDetailData,
    GetProductDetailVariables, GetProducts, GetProductsData, GetProductsVariables, NoVariables,
};
use crate::transport::Transport;

impl CachedQuery for GetProducts {
    type Output = Vec<Product>;

    fn normalize(data: GetProductsData) -> Self::Output {
        normalize_products(&data.get_products)
    }

    fn provides(output: &Self::Output) -> Vec<Tag> {
        output
            .iter()
            .map(|p| Tag::entity(TagKind::Product, p.id.as_str()))
            .chain([Tag::list(TagKind::Product)])
            .collect()
    }

    fn into_cache(output: Self::Output) -> CacheValue {
        CacheValue::Products(output)
    }

    fn from_cache(value: CacheValue) -> Option<Self::Output> {
        match value {
            CacheValue::Products(products) => Some(products),
            _ => None,
        }
    }
}

impl CachedQuery for GetProductDetail {
    type Output = ProductDetail;

    fn normalize(data: GetProductDetailData) -> Self::Output {
        normalize_product_detail(&data.product, &data.reviews)
    }

    fn provides(output: &Self::Output) -> Vec<Tag> {
        vec![match &output.product {
            Some(product) => Tag::entity(TagKind::Product, product.id.as_str()),
            None => Tag::new(TagKind::Product, TagId::Unknown),
        }]
    }

    fn into_cache(output: Self::Output) -> CacheValue {
        CacheValue::ProductDetail(Box::new(output))
    }

    fn from_cache(value: CacheValue) -> Option<Self::Output> {
        match value {
            CacheValue::ProductDetail(detail) => Some(*detail),
            _ => None,
        }
    }
}

impl CachedQuery for GetCategories {
    type Output = Vec<Category>;

    fn normalize(data: GetCategoriesData) -> Self::Output {
        normalize_categories(&data.get_categories)
    }

    fn provides(_output: &Self::Output) -> Vec<Tag> {
        vec![Tag::list(TagKind::Category)]
    }

    fn into_cache(output: Self::Output) -> CacheValue {
        CacheValue::Categories(output)
    }

    fn from_cache(value: CacheValue) -> Option<Self::Output> {
        match value {
            CacheValue::Categories(categories) => Some(categories),
            _ => None,
        }
    }
}

impl<T: Transport> ShopxApi<T> {
    /// List products, optionally filtered by category and name.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn get_products(&self, filter: GetProductsVariables) -> Result<Vec<Product>> {
        self.query::<GetProducts>(filter).await
    }

    /// Fetch a product with its reviews. A missing product yields
    /// `product: None`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, id), fields(product_id = %id))]
    pub async fn get_product_detail(&self, id: &ProductId) -> Result<ProductDetail> {
        self.query::<GetProductDetail>(GetProductDetailVariables { id: id.clone() })
            .await
    }

    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn get_categories(&self) -> Result<Vec<Category>> {
        self.query::<GetCategories>(NoVariables {}).await
    }
}
