//! GraphQL documents for every operation the client issues.

macro_rules! product_fields {
    () => {
        "id name price description categoryId image { url }"
    };
}

macro_rules! full_product_fields {
    () => {
        "id name price description categoryId image { url filename mimeType updatedAt }"
    };
}

macro_rules! cart_fields {
    () => {
        concat!("userId total items { quantity product { ", product_fields!(), " } }")
    };
}

macro_rules! wishlist_fields {
    () => {
        concat!("userId products { ", product_fields!(), " }")
    };
}

macro_rules! user_fields {
    () => {
        "id email name role"
    };
}

macro_rules! cms_fields {
    () => {
        "id slug title excerpt body status updatedAt publishedAt"
    };
}

pub const GET_PRODUCTS: &str = concat!(
    "query GetProducts($limit: Int, $offset: Int, $name: String, $categoryId: ID) { ",
    "getProducts(limit: $limit, offset: $offset, name: $name, categoryId: $categoryId) { ",
    full_product_fields!(),
    " } }"
);

pub const GET_PRODUCT_DETAIL: &str = concat!(
    "query GetProductDetail($id: ID!) { ",
    "product: getProductById(id: $id) { ",
    full_product_fields!(),
    " } ",
    "reviews: getReviews(productId: $id) { id userId rating reviewText createdAt } }"
);

pub const GET_CATEGORIES: &str = "query GetCategories { getCategories { id name description } }";

pub const GET_CART: &str = concat!(
    "query GetCart($userId: ID!) { getCart(userId: $userId) { ",
    cart_fields!(),
    " } }"
);

pub const ADD_TO_CART: &str = concat!(
    "mutation AddToCart($userId: ID!, $productId: ID!, $quantity: Int!) { ",
    "addToCart(userId: $userId, item: { productId: $productId, quantity: $quantity }) { ",
    cart_fields!(),
    " } }"
);

pub const REMOVE_FROM_CART: &str = concat!(
    "mutation RemoveFromCart($userId: ID!, $productId: ID!) { ",
    "removeFromCart(userId: $userId, productId: $productId) { ",
    cart_fields!(),
    " } }"
);

pub const CLEAR_CART: &str = concat!(
    "mutation ClearCart($userId: ID!) { clearCart(userId: $userId) { ",
    cart_fields!(),
    " } }"
);

pub const GET_WISHLIST: &str = concat!(
    "query GetWishlist($userId: ID!) { getWishlist(userId: $userId) { ",
    wishlist_fields!(),
    " } }"
);

pub const ADD_TO_WISHLIST: &str = concat!(
    "mutation AddToWishlist($userId: ID!, $productId: ID!) { ",
    "addToWishlist(userId: $userId, productId: $productId) { ",
    wishlist_fields!(),
    " } }"
);

pub const REMOVE_FROM_WISHLIST: &str = concat!(
    "mutation RemoveFromWishlist($userId: ID!, $productId: ID!) { ",
    "removeFromWishlist(userId: $userId, productId: $productId) { ",
    wishlist_fields!(),
    " } }"
);

pub const REGISTER: &str = concat!(
    "mutation Register($email: String!, $password: String!, $name: String) { ",
    "register(email: $email, password: $password, name: $name) { token user { ",
    user_fields!(),
    " } } }"
);

pub const LOGIN: &str = concat!(
    "mutation Login($email: String!, $password: String!) { ",
    "login(email: $email, password: $password) { token user { ",
    user_fields!(),
    " } } }"
);

pub const LOGOUT: &str = "mutation Logout { logout }";

pub const REDEEM_IMPERSONATION: &str = concat!(
    "mutation RedeemImpersonation($token: String!) { ",
    "redeemImpersonation(token: $token) { token user { ",
    user_fields!(),
    " } } }"
);

pub const GET_USER_CONTEXT: &str = concat!(
    "query GetUserContext($userId: ID!) { getUserContext(userId: $userId) { ",
    "user { ",
    user_fields!(),
    " } cart { ",
    cart_fields!(),
    " } wishlist { ",
    wishlist_fields!(),
    " } addresses { id userId street city postalCode country } } }"
);

pub const GET_ORDERS: &str = concat!(
    "query GetOrders($userId: ID!) { getOrders(userId: $userId) { ",
    "id userId total status createdAt updatedAt products { productId quantity price } } }"
);

pub const UPDATE_USER_PROFILE: &str = concat!(
    "mutation UpdateUserProfile($input: UpdateUserProfileInput!) { ",
    "updateUserProfile(input: $input) { user { ",
    user_fields!(),
    " } message } }"
);

pub const CHANGE_USER_PASSWORD: &str = concat!(
    "mutation ChangeUserPassword($currentPassword: String!, $newPassword: String!) { ",
    "changeUserPassword(currentPassword: $currentPassword, newPassword: $newPassword) }"
);

pub const CREATE_ORDER: &str = concat!(
    "mutation CreateOrder($userId: ID!, $products: [OrderProductInput!]!) { ",
    "createOrder(userId: $userId, products: $products) { ",
    "id userId total status products { quantity productId price } } }"
);

pub const ADD_ADDRESS: &str = concat!(
    "mutation AddAddress($userId: ID!, $street: String!, $city: String!, ",
    "$postalCode: String!, $country: String!) { ",
    "addAddress(userId: $userId, street: $street, city: $city, ",
    "postalCode: $postalCode, country: $country) { id userId street city postalCode country } }"
);

pub const GET_ADDRESSES: &str = concat!(
    "query GetAddresses($userId: ID!) { getAddresses(userId: $userId) { ",
    "id userId street city postalCode country } }"
);

pub const CREATE_PAYMENT: &str = concat!(
    "mutation CreatePayment($orderId: ID!, $amount: Float!, $method: String!) { ",
    "createPayment(orderId: $orderId, amount: $amount, method: $method) { ",
    "id orderId amount status method } }"
);

pub const GET_CMS_PAGE: &str = concat!(
    "query GetCmsPage($slug: String!) { getCmsPage(slug: $slug) { ",
    cms_fields!(),
    " } }"
);

pub const GET_CMS_PAGES: &str = concat!("query GetCmsPages { getCmsPages { ", cms_fields!(), " } }");
