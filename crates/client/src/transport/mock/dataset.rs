//! Fixture data served by the mock fallback.

use std::collections::HashMap;

use parking_lot::Mutex;
use rust_decimal::Decimal;
use shopx_core::{
    Address, AddressId, AuthPayload, Cart, CartItem, Category, CategoryId, CmsPage, CmsPageId,
    CmsStatus, Product, ProductId, ProductImage, Review, ReviewId, User, UserContext, UserId,
    UserRole, Wishlist,
};

use crate::graphql::GetProductsVariables;

pub const DEMO_USER_ID: &str = "demo-user";
pub const DEMO_USER_EMAIL: &str = "demo@shopx.app";

const BASE_UPDATED_AT: &str = "2024-04-18T10:00:00.000Z";

/// In-memory catalog plus per-user carts and wishlists.
///
/// The catalog is fixed once built. Carts and wishlists change as mocked
/// mutations are answered, so repeated reads stay consistent with earlier
/// writes. Users other than the demo user start with an empty cart and
/// wishlist.
#[derive(Debug)]
pub struct MockDataset {
    categories: Vec<Category>,
    products: Vec<Product>,
    reviews: Vec<Review>,
    addresses: Vec<Address>,
    cms_pages: Vec<CmsPage>,
    demo_user: User,
    carts: Mutex<HashMap<UserId, Vec<CartItem>>>,
    wishlists: Mutex<HashMap<UserId, Vec<Product>>>,
}

impl Default for MockDataset {
    fn default() -> Self {
        Self::new()
    }
}

impl MockDataset {
    /// The seeded fixture catalog.
    #[must_use]
    pub fn new() -> Self {
        let products = seed_products();
        let demo_user = User {
            id: UserId::from(DEMO_USER_ID),
            email: DEMO_USER_EMAIL.to_string(),
            name: Some("Demo User".to_string()),
            role: UserRole::Customer,
        };

        let seeded = |id: &str| products.iter().find(|p| p.id == id).cloned();
        let demo_cart: Vec<CartItem> = [("prod-aurora-watch", 1), ("prod-nexa-lamp", 2)]
            .into_iter()
            .filter_map(|(id, quantity)| seeded(id).map(|product| CartItem { product, quantity }))
            .collect();
        let demo_wishlist: Vec<Product> = ["prod-lumen-headphones", "prod-atelier-jacket"]
            .into_iter()
            .filter_map(seeded)
            .collect();

        Self {
            categories: seed_categories(),
            reviews: seed_reviews(),
            addresses: seed_addresses(),
            cms_pages: seed_cms_pages(),
            carts: Mutex::new(HashMap::from([(demo_user.id.clone(), demo_cart)])),
            wishlists: Mutex::new(HashMap::from([(demo_user.id.clone(), demo_wishlist)])),
            demo_user,
            products,
        }
    }

    /// Add a product to the catalog, replacing any product with the same id.
    #[must_use]
    pub fn with_product(mut self, product: Product) -> Self {
        self.products.retain(|p| p.id != product.id);
        self.products.push(product);
        self
    }

    #[must_use]
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// Catalog filtered by category and name, then paginated.
    #[must_use]
    pub fn products(&self, filter: &GetProductsVariables) -> Vec<Product> {
        let name = filter
            .name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(str::to_lowercase);
        let offset = filter.offset.map_or(0, |o| o as usize);
        let limit = filter.limit.map_or(usize::MAX, |l| l as usize);

        self.products
            .iter()
            .filter(|p| {
                filter
                    .category_id
                    .as_ref()
                    .is_none_or(|category| p.in_category(category))
            })
            .filter(|p| {
                name.as_ref()
                    .is_none_or(|needle| p.name.to_lowercase().contains(needle.as_str()))
            })
            .skip(offset)
            .take(limit)
            .cloned()
            .collect()
    }

    #[must_use]
    pub fn product(&self, id: &ProductId) -> Option<Product> {
        self.products.iter().find(|p| &p.id == id).cloned()
    }

    #[must_use]
    pub fn reviews_for(&self, id: &ProductId) -> Vec<Review> {
        self.reviews
            .iter()
            .filter(|r| &r.product_id == id)
            .cloned()
            .collect()
    }

    #[must_use]
    pub fn cart(&self, user_id: &UserId) -> Cart {
        let carts = self.carts.lock();
        let items = carts.get(user_id).cloned().unwrap_or_default();
        build_cart(user_id, items)
    }

    /// Increment the line for `product_id`. Unknown products and a zero
    /// quantity leave the cart unchanged.
    pub fn add_to_cart(&self, user_id: &UserId, product_id: &ProductId, quantity: u32) -> Cart {
        let product = self.product(product_id);
        let mut carts = self.carts.lock();
        let items = carts.entry(user_id.clone()).or_default();

        if let Some(product) = product
            && quantity > 0
        {
            match items.iter_mut().find(|line| &line.product.id == product_id) {
                Some(line) => line.quantity = line.quantity.saturating_add(quantity),
                None => items.push(CartItem { product, quantity }),
            }
        }

        build_cart(user_id, items.clone())
    }

    pub fn remove_from_cart(&self, user_id: &UserId, product_id: &ProductId) -> Cart {
        let mut carts = self.carts.lock();
        let items = carts.entry(user_id.clone()).or_default();
        items.retain(|line| &line.product.id != product_id);
        build_cart(user_id, items.clone())
    }

    pub fn clear_cart(&self, user_id: &UserId) -> Cart {
        self.carts.lock().insert(user_id.clone(), Vec::new());
        Cart::empty(user_id.clone())
    }

    #[must_use]
    pub fn wishlist(&self, user_id: &UserId) -> Wishlist {
        let products = self
            .wishlists
            .lock()
            .get(user_id)
            .cloned()
            .unwrap_or_default();
        Wishlist {
            user_id: user_id.clone(),
            products,
        }
    }

    pub fn add_to_wishlist(&self, user_id: &UserId, product_id: &ProductId) -> Wishlist {
        let product = self.product(product_id);
        let mut wishlists = self.wishlists.lock();
        let products = wishlists.entry(user_id.clone()).or_default();
        if let Some(product) = product
            && !products.iter().any(|p| &p.id == product_id)
        {
            products.push(product);
        }
        Wishlist {
            user_id: user_id.clone(),
            products: products.clone(),
        }
    }

    pub fn remove_from_wishlist(&self, user_id: &UserId, product_id: &ProductId) -> Wishlist {
        let mut wishlists = self.wishlists.lock();
        let products = wishlists.entry(user_id.clone()).or_default();
        products.retain(|p| &p.id != product_id);
        Wishlist {
            user_id: user_id.clone(),
            products: products.clone(),
        }
    }

    /// Demo addresses re-owned by `user_id`.
    #[must_use]
    pub fn addresses(&self, user_id: &UserId) -> Vec<Address> {
        self.addresses
            .iter()
            .map(|address| Address {
                user_id: user_id.clone(),
                ..address.clone()
            })
            .collect()
    }

    /// Demo user, re-identified as `user_id`.
    #[must_use]
    pub fn user(&self, user_id: &UserId) -> User {
        User {
            id: user_id.clone(),
            ..self.demo_user.clone()
        }
    }

    #[must_use]
    pub fn user_context(&self, user_id: &UserId) -> UserContext {
        UserContext {
            user: self.user(user_id),
            cart: self.cart(user_id),
            wishlist: self.wishlist(user_id),
            addresses: self.addresses(user_id),
        }
    }

    /// Session for the demo user signed in under `email`.
    #[must_use]
    pub fn auth_payload(&self, email: &str, name: Option<&str>) -> AuthPayload {
        let mut user = self.demo_user.clone();
        if !email.trim().is_empty() {
            user.email = email.trim().to_string();
        }
        if let Some(name) = name.filter(|n| !n.trim().is_empty()) {
            user.name = Some(name.trim().to_string());
        }
        AuthPayload {
            token: format!("mock-token-{}", user.id),
            user,
        }
    }

    #[must_use]
    pub fn cms_page(&self, slug: &str) -> Option<CmsPage> {
        self.cms_pages.iter().find(|page| page.slug == slug).cloned()
    }

    #[must_use]
    pub fn cms_pages(&self) -> &[CmsPage] {
        &self.cms_pages
    }
}

fn build_cart(user_id: &UserId, items: Vec<CartItem>) -> Cart {
    let mut cart = Cart {
        items,
        ..Cart::empty(user_id.clone())
    };
    cart.recompute_total();
    cart
}

fn seed_categories() -> Vec<Category> {
    [
        (
            "cat-electronics",
            "Electronice",
            "Gadgeturi premium pentru un stil de viata conectat.",
        ),
        ("cat-fashion", "Fashion", "Imbracaminte si accesorii minimaliste."),
        (
            "cat-home",
            "Smart Home",
            "Dispozitive inteligente pentru confort zilnic.",
        ),
    ]
    .into_iter()
    .map(|(id, name, description)| Category {
        id: CategoryId::from(id),
        name: name.to_string(),
        description: Some(description.to_string()),
    })
    .collect()
}

fn seed_products() -> Vec<Product> {
    [
        (
            "prod-aurora-watch",
            "Ceas inteligent Aurora X",
            Decimal::new(34999, 2),
            "Monitorizare avansata a sanatatii cu autonomie de 3 zile.",
            "cat-electronics",
            "photo-1524592094714-0f0654e20314",
            "aurora-watch.jpg",
        ),
        (
            "prod-lumen-headphones",
            "Castile wireless Lumen Air",
            Decimal::new(17999, 2),
            "Sunet imersiv si anulare activa a zgomotului.",
            "cat-electronics",
            "photo-1516116216624-53e697fedbea",
            "lumen-headphones.jpg",
        ),
        (
            "prod-nexa-lamp",
            "Veioza inteligenta Nexa Glow",
            Decimal::new(12999, 2),
            "Iluminare adaptiva cu control vocal si scenarii presetate.",
            "cat-home",
            "photo-1481278403982-f2d9f387cdcc",
            "nexa-lamp.jpg",
        ),
        (
            "prod-atelier-jacket",
            "Jacheta Atelier CloudShell",
            Decimal::new(249, 0),
            "Haina impermeabila cu finisaj mat si captuseala termica.",
            "cat-fashion",
            "photo-1483985988355-763728e1935b",
            "atelier-jacket.jpg",
        ),
    ]
    .into_iter()
    .map(
        |(id, name, price, description, category, photo, filename)| Product {
            id: ProductId::from(id),
            name: name.to_string(),
            price,
            description: Some(description.to_string()),
            category_id: Some(CategoryId::from(category)),
            category: None,
            image: Some(ProductImage {
                url: format!(
                    "https://images.unsplash.com/{photo}?auto=format&fit=crop&w=800&q=80"
                ),
                filename: Some(filename.to_string()),
                mime_type: Some("image/jpeg".to_string()),
                updated_at: Some(BASE_UPDATED_AT.to_string()),
            }),
        },
    )
    .collect()
}

fn seed_reviews() -> Vec<Review> {
    vec![
        Review {
            id: ReviewId::from("rev-aurora-1"),
            product_id: ProductId::from("prod-aurora-watch"),
            user_id: UserId::from(DEMO_USER_ID),
            rating: 5,
            review_text: Some("Autonomie excelenta si aplicatie intuitiva.".to_string()),
            created_at: "2024-03-22T09:00:00.000Z".to_string(),
        },
        Review {
            id: ReviewId::from("rev-lumen-1"),
            product_id: ProductId::from("prod-lumen-headphones"),
            user_id: UserId::from(DEMO_USER_ID),
            rating: 4,
            review_text: Some(
                "Sunet de calitate, dar as fi vrut o baterie mai incapatoare.".to_string(),
            ),
            created_at: "2024-02-14T12:30:00.000Z".to_string(),
        },
    ]
}

fn seed_addresses() -> Vec<Address> {
    [
        ("addr-demo-1", "Strada Academiei 10", "Bucuresti", "010011"),
        ("addr-demo-2", "Strada Bratei 5", "Cluj-Napoca", "400129"),
    ]
    .into_iter()
    .map(|(id, street, city, postal_code)| Address {
        id: AddressId::from(id),
        user_id: UserId::from(DEMO_USER_ID),
        street: street.to_string(),
        city: city.to_string(),
        postal_code: postal_code.to_string(),
        country: "Romania".to_string(),
    })
    .collect()
}

fn seed_cms_pages() -> Vec<CmsPage> {
    [
        (
            "cms-shipping",
            "politica-de-livrare",
            "Politica de livrare",
            "Afla cum livram produsele ShopX in toata tara.",
            "Livram produsele in 1-3 zile lucratoare prin curier rapid. Toate comenzile peste 400 RON beneficiaza de transport gratuit.",
            "2024-01-11T08:00:00.000Z",
            BASE_UPDATED_AT,
        ),
        (
            "cms-returns",
            "politica-de-retur",
            "Politica de retur",
            "Retur facil in 30 de zile, fara batai de cap.",
            "Acceptam retururi in 30 de zile pentru produse in stare impecabila. Solicita returul din contul tau sau scrie-ne pe support@shopx.app.",
            "2024-01-15T08:30:00.000Z",
            "2024-04-02T16:45:00.000Z",
        ),
        (
            "cms-about",
            "despre-shopx",
            "Despre ShopX",
            "ShopX combina designul atent cu tehnologia moderna.",
            "Suntem o echipa din Bucuresti pasionata de ecommerce. Selectam produse curate, cu utilitate reala, de la branduri independente europene.",
            "2024-01-05T07:15:00.000Z",
            "2024-03-01T12:20:00.000Z",
        ),
    ]
    .into_iter()
    .map(
        |(id, slug, title, excerpt, body, published_at, updated_at)| CmsPage {
            id: CmsPageId::from(id),
            slug: slug.to_string(),
            title: title.to_string(),
            excerpt: Some(excerpt.to_string()),
            body: body.to_string(),
            status: CmsStatus::Published,
            published_at: Some(published_at.to_string()),
            updated_at: updated_at.to_string(),
        },
    )
    .collect()
}
