//! Authentication, the user-context aggregate and profile management.

use shopx_core::normalize::{normalize_auth_payload, normalize_profile_update, normalize_user_context};
use shopx_core::{AuthPayload, Email, ProfileUpdate, UserContext};
use tracing::{info, instrument, warn};

use super::{CachedQuery, Mutation, ShopxApi, missing};
use crate::cache::{CacheValue, Tag, TagKind};
use crate::error::{Result, ShopxError};
use crate::graphql::{
    ChangeUserPassword, ChangeUserPasswordData, ChangeUserPasswordVariables, GetUserContext,
    GetUserContextData, Login, LoginData, LoginVariables, Logout, LogoutData, NoVariables,
    RedeemImpersonation, RedeemImpersonationData, RedeemImpersonationVariables, Register,
    RegisterData, RegisterVariables, UpdateUserProfile, UpdateUserProfileData,
    UpdateUserProfileInput, UpdateUserProfileVariables, UserVariables,
};
use crate::store::{Action, CartAction, OrdersAction, SessionAction, Store, WishlistAction};
use crate::transport::Transport;

fn session_tags() -> Vec<Tag> {
    vec![
        Tag::current(TagKind::Session),
        Tag::current(TagKind::Cart),
        Tag::current(TagKind::Wishlist),
    ]
}

/// Replace the session and drop the previous user's cart and wishlist.
fn start_session(store: &Store, payload: &AuthPayload) {
    store.dispatch_all([
        Action::from(SessionAction::Set(payload.clone())),
        Action::from(CartAction::Clear),
        Action::from(WishlistAction::Clear),
    ]);
}

fn end_session(store: &Store) {
    store.dispatch_all([
        Action::from(SessionAction::Clear),
        Action::from(CartAction::Clear),
        Action::from(WishlistAction::Clear),
        Action::from(OrdersAction::Clear),
    ]);
}

fn auth_payload<M: Mutation>(value: &serde_json::Value) -> Result<AuthPayload> {
    normalize_auth_payload(value).ok_or_else(missing::<M>)
}

fn validate_credentials(email: &str, password: &str) -> Result<Email> {
    let email = Email::parse(email).map_err(|e| ShopxError::validation(e.to_string()))?;
    if password.is_empty() {
        return Err(ShopxError::validation("password cannot be empty"));
    }
    Ok(email)
}

impl Mutation for Register {
    type Output = AuthPayload;

    fn normalize(data: RegisterData) -> Result<AuthPayload> {
        auth_payload::<Self>(&data.register)
    }

    fn invalidates() -> Vec<Tag> {
        vec![Tag::current(TagKind::Session)]
    }
}

impl Mutation for Login {
    type Output = AuthPayload;

    fn normalize(data: LoginData) -> Result<AuthPayload> {
        auth_payload::<Self>(&data.login)
    }

    fn invalidates() -> Vec<Tag> {
        session_tags()
    }

    fn on_success(store: &Store, output: &AuthPayload) {
        start_session(store, output);
    }
}

impl Mutation for Logout {
    type Output = bool;

    fn normalize(data: LogoutData) -> Result<bool> {
        data.logout.as_bool().ok_or_else(missing::<Self>)
    }

    fn invalidates() -> Vec<Tag> {
        session_tags()
    }

    fn on_success(store: &Store, _output: &bool) {
        end_session(store);
    }
}

impl Mutation for RedeemImpersonation {
    type Output = AuthPayload;

    fn normalize(data: RedeemImpersonationData) -> Result<AuthPayload> {
        auth_payload::<Self>(&data.redeem_impersonation)
    }

    fn invalidates() -> Vec<Tag> {
        vec![Tag::current(TagKind::Session)]
    }

    fn on_success(store: &Store, output: &AuthPayload) {
        start_session(store, output);
    }
}

impl CachedQuery for GetUserContext {
    type Output = Option<UserContext>;

    const USER_SCOPED: bool = true;

    fn normalize(data: GetUserContextData) -> Self::Output {
        normalize_user_context(&data.get_user_context)
    }

    fn provides(_output: &Self::Output) -> Vec<Tag> {
        session_tags()
    }

    fn into_cache(output: Self::Output) -> CacheValue {
        CacheValue::UserContext(output.map(Box::new))
    }

    fn from_cache(value: CacheValue) -> Option<Self::Output> {
        match value {
            CacheValue::UserContext(context) => Some(context.map(|c| *c)),
            _ => None,
        }
    }

    fn on_success(store: &Store, output: &Self::Output) {
        let Some(context) = output else {
            return;
        };
        store.dispatch_all([
            Action::from(SessionAction::UpdateUser(context.user.clone())),
            Action::from(CartAction::Set(context.cart.clone())),
            Action::from(WishlistAction::Set(context.wishlist.products.clone())),
        ]);
    }
}

impl Mutation for UpdateUserProfile {
    type Output = ProfileUpdate;

    fn normalize(data: UpdateUserProfileData) -> Result<ProfileUpdate> {
        if data.update_user_profile.is_null() {
            return Err(missing::<Self>());
        }
        Ok(normalize_profile_update(&data.update_user_profile))
    }

    fn invalidates() -> Vec<Tag> {
        vec![Tag::current(TagKind::Session)]
    }

    fn on_success(store: &Store, output: &ProfileUpdate) {
        if let Some(user) = &output.user {
            store.dispatch(SessionAction::UpdateUser(user.clone()));
        }
    }
}

impl Mutation for ChangeUserPassword {
    type Output = bool;

    fn normalize(data: ChangeUserPasswordData) -> Result<bool> {
        data.change_user_password
            .as_bool()
            .ok_or_else(missing::<Self>)
    }

    fn invalidates() -> Vec<Tag> {
        Vec::new()
    }
}

impl<T: Transport> ShopxApi<T> {
    /// Create an account. Does not sign in.
    ///
    /// # Errors
    ///
    /// Returns a validation error for a malformed email or an empty
    /// password, otherwise any request error.
    #[instrument(skip(self, password, name))]
    pub async fn register(
        &self,
        email: &str,
        password: &str,
        name: Option<String>,
    ) -> Result<AuthPayload> {
        let email = validate_credentials(email, password)?;
        self.mutate::<Register>(RegisterVariables {
            email: email.into_inner(),
            password: password.to_string(),
            name,
        })
        .await
    }

    /// Sign in and replace the session. The previous user's cart and
    /// wishlist are dropped from the store and the cache.
    ///
    /// # Errors
    ///
    /// Returns a validation error for a malformed email or an empty
    /// password, otherwise any request error.
    #[instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthPayload> {
        let email = validate_credentials(email, password)?;
        let payload = self
            .mutate::<Login>(LoginVariables {
                email: email.into_inner(),
                password: password.to_string(),
            })
            .await?;
        info!(user_id = %payload.user.id, "Signed in");
        Ok(payload)
    }

    /// Sign out.
    ///
    /// Session, cart, wishlist and orders are cleared whether or not the
    /// server call succeeds.
    ///
    /// # Errors
    ///
    /// Returns the request error after local state has been cleared.
    #[instrument(skip(self))]
    pub async fn logout(&self) -> Result<bool> {
        match self.mutate::<Logout>(NoVariables {}).await {
            Ok(acknowledged) => Ok(acknowledged),
            Err(e) => {
                warn!(error = %e, "Logout request failed, clearing local session anyway");
                end_session(self.store());
                self.invalidate(&Logout::invalidates()).await;
                Err(e)
            }
        }
    }

    /// Exchange a support impersonation token for a session.
    ///
    /// # Errors
    ///
    /// Returns a validation error for an empty token, otherwise any request
    /// error.
    #[instrument(skip(self, token))]
    pub async fn redeem_impersonation(&self, token: &str) -> Result<AuthPayload> {
        let token = token.trim();
        if token.is_empty() {
            return Err(ShopxError::validation("impersonation token cannot be empty"));
        }
        self.mutate::<RedeemImpersonation>(RedeemImpersonationVariables {
            token: token.to_string(),
        })
        .await
    }

    /// Fetch user, cart, wishlist and addresses in one round trip and write
    /// them into the store. `None` when the server has no such user.
    ///
    /// # Errors
    ///
    /// Returns [`ShopxError::NotHydrated`] before rehydration, otherwise any
    /// request error.
    #[instrument(skip(self, user_id), fields(user_id = %user_id))]
    pub async fn get_user_context(
        &self,
        user_id: &shopx_core::UserId,
    ) -> Result<Option<UserContext>> {
        self.query::<GetUserContext>(UserVariables::new(user_id.clone()))
            .await
    }

    /// Load the user context for the signed-in user at startup.
    ///
    /// Skipped with `Ok(None)` until the store is rehydrated or while signed
    /// out.
    ///
    /// # Errors
    ///
    /// Returns any request error.
    pub async fn bootstrap_user_context(&self) -> Result<Option<UserContext>> {
        if !self.store().is_hydrated() {
            return Ok(None);
        }
        let Some(user_id) = self.store().current_user_id() else {
            return Ok(None);
        };
        self.get_user_context(&user_id).await
    }

    /// # Errors
    ///
    /// Returns a validation error for an empty current password or a
    /// malformed new email, otherwise any request error.
    #[instrument(skip(self, input))]
    pub async fn update_user_profile(&self, input: UpdateUserProfileInput) -> Result<ProfileUpdate> {
        if input.current_password.is_empty() {
            return Err(ShopxError::validation("current password cannot be empty"));
        }
        let email = input
            .email
            .as_deref()
            .map(Email::parse)
            .transpose()
            .map_err(|e| ShopxError::validation(e.to_string()))?;
        self.mutate::<UpdateUserProfile>(UpdateUserProfileVariables {
            input: UpdateUserProfileInput {
                email: email.map(Email::into_inner),
                ..input
            },
        })
        .await
    }

    /// # Errors
    ///
    /// Returns a validation error when either password is empty, otherwise
    /// any request error.
    #[instrument(skip_all)]
    pub async fn change_user_password(
        &self,
        current_password: &str,
        new_password: &str,
    ) -> Result<bool> {
        if current_password.is_empty() || new_password.is_empty() {
            return Err(ShopxError::validation("passwords cannot be empty"));
        }
        self.mutate::<ChangeUserPassword>(ChangeUserPasswordVariables {
            current_password: current_password.to_string(),
            new_password: new_password.to_string(),
        })
        .await
    }
}
