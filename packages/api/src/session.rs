//! # Session: the current user, the query cache and the stored token
//!
//! [`Session`] is the session store the views are given through context. It
//! owns three things and keeps them consistent:
//!
//! - the backend client (any [`MarketplaceApi`]),
//! - the [`TokenStore`] holding the access token,
//! - the [`QueryCache`] holding the current user and listing results.
//!
//! ## Current user
//!
//! | Call | Behaviour |
//! |------|-----------|
//! | [`load_user`](Session::load_user) | Serves a fresh cached user, otherwise fetches. |
//! | [`refetch_user`](Session::refetch_user) | Always fetches. |
//! | [`login_with_token`](Session::login_with_token) | Stores a new token, invalidates everything, fetches. |
//! | [`sign_in`](Session::sign_in) | Confirms a callback token with the auth provider, then logs in with it. |
//! | [`logout`](Session::logout) | Clears the token, drops the cached user, invalidates everything. |
//! | [`maintain`](Session::maintain) | Periodic tick: collects expired entries, refetches a stale user. |
//!
//! The current user entry is pinned in the cache for the session's lifetime,
//! so garbage collection never signs out a member whose token is still stored.
//!
//! Without a token no request is made and the user resolves to `None`. A
//! `401` means the token went stale: it is cleared and the user resolves to
//! `None` without an error. Any other failure is retried
//! [`CachePolicy::retry`](store::CachePolicy) times, then leaves the user absent
//! and returns the error.
//!
//! ## Epoch
//!
//! Every logout or login bumps an epoch. A fetch remembers the epoch it started
//! in and drops its result if the epoch moved while it was awaiting, so a
//! response that arrives after logout cannot repopulate the cache.
//!
//! ## Listings
//!
//! [`listings`](Session::listings), [`listing`](Session::listing),
//! [`create`](Session::create) and [`delete`](Session::delete) go through the
//! same cache. Mutations never patch cached lists; they invalidate the list
//! key and the caller refetches.

use std::cell::{Cell, RefCell};
use std::future::Future;
use std::rc::Rc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use store::{is_owner, QueryCache, QueryKey, Resource, TokenStore, User};

use crate::auth::AuthClient;
use crate::client::MarketplaceApi;
use crate::error::ApiError;

/// Snapshot of the session for rendering.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SessionState {
    pub user: Option<User>,
    pub is_loading: bool,
    /// Message of the last failed user fetch.
    pub error: Option<String>,
}

impl SessionState {
    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    pub fn user_id(&self) -> Option<&str> {
        self.user.as_ref().map(|u| u.id.as_str())
    }
}

struct Inner<A, T> {
    api: A,
    tokens: T,
    cache: QueryCache,
    epoch: Cell<u64>,
    last_error: RefCell<Option<String>>,
}

/// Shared handle to the session. Clones refer to the same session.
pub struct Session<A, T> {
    inner: Rc<Inner<A, T>>,
}

impl<A, T> Clone for Session<A, T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<A, T> PartialEq for Session<A, T> {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl<A: MarketplaceApi, T: TokenStore> Session<A, T> {
    pub fn new(api: A, tokens: T, cache: QueryCache) -> Self {
        cache.pin(&QueryKey::current_user());
        Self {
            inner: Rc::new(Inner {
                api,
                tokens,
                cache,
                epoch: Cell::new(0),
                last_error: RefCell::new(None),
            }),
        }
    }

    pub fn api(&self) -> &A {
        &self.inner.api
    }

    pub fn cache(&self) -> &QueryCache {
        &self.inner.cache
    }

    pub fn tokens(&self) -> &T {
        &self.inner.tokens
    }

    /// The cached current user, if any.
    pub fn user(&self) -> Option<User> {
        self.inner.cache.get(&QueryKey::current_user())
    }

    pub fn is_authenticated(&self) -> bool {
        self.user().is_some()
    }

    /// True while the user is being fetched, and while a stored token has not
    /// been resolved to a user or an error yet.
    pub fn is_loading(&self) -> bool {
        let key = QueryKey::current_user();
        if self.inner.cache.is_fetching(&key) {
            return true;
        }
        self.inner.tokens.load().is_some()
            && !self.inner.cache.contains(&key)
            && self.inner.last_error.borrow().is_none()
    }

    pub fn last_error(&self) -> Option<String> {
        self.inner.last_error.borrow().clone()
    }

    pub fn state(&self) -> SessionState {
        SessionState {
            user: self.user(),
            is_loading: self.is_loading(),
            error: self.last_error(),
        }
    }

    /// Resolve the current user, serving a fresh cache entry when there is one.
    pub async fn load_user(&self) -> Result<Option<User>, ApiError> {
        let key = QueryKey::current_user();
        if self.inner.cache.is_fresh(&key) {
            if let Some(user) = self.inner.cache.get::<User>(&key) {
                return Ok(Some(user));
            }
        }
        self.fetch_user().await
    }

    /// Evict expired entries, then refetch the user if a token is stored and
    /// the cached user has gone stale. Returns how many entries were evicted.
    pub async fn maintain(&self) -> Result<usize, ApiError> {
        let evicted = self.inner.cache.collect_garbage();
        let key = QueryKey::current_user();
        let cache = &self.inner.cache;
        if self.inner.tokens.load().is_some() && !cache.is_fresh(&key) && !cache.is_fetching(&key)
        {
            tracing::debug!("Cached user is stale, refetching");
            self.load_user().await?;
        }
        Ok(evicted)
    }

    /// Fetch the current user, bypassing freshness.
    pub async fn refetch_user(&self) -> Result<Option<User>, ApiError> {
        self.fetch_user().await
    }

    /// Adopt a token from the auth callback and resolve its user.
    pub async fn login_with_token(&self, token: &str) -> Result<Option<User>, ApiError> {
        self.bump_epoch();
        self.inner.tokens.save(token);
        self.inner.last_error.borrow_mut().take();
        self.inner.cache.invalidate_all();
        tracing::info!("Signed in, loading profile");
        self.fetch_user().await
    }

    /// Adopt a callback token only if the auth provider still recognises it.
    /// An expired token is reported as a callback error and never stored.
    pub async fn sign_in(
        &self,
        auth: &AuthClient,
        access_token: &str,
    ) -> Result<Option<User>, ApiError> {
        match auth.get_session(access_token).await? {
            Some(account) => {
                tracing::info!("Auth provider confirmed account {}", account.id);
                self.login_with_token(access_token).await
            }
            None => Err(ApiError::AuthCallback(
                "the sign-in link has expired".to_string(),
            )),
        }
    }

    /// Forget the token and every authenticated result.
    pub fn logout(&self) {
        self.bump_epoch();
        self.inner.tokens.clear();
        self.inner.last_error.borrow_mut().take();
        self.inner.cache.remove(&QueryKey::current_user());
        self.inner.cache.invalidate_all();
        tracing::info!("Signed out");
    }

    /// All entries of collection `R`, from cache when fresh unless `force`.
    pub async fn listings<R: Resource>(&self, force: bool) -> Result<Vec<R>, ApiError> {
        let key = QueryKey::list(R::PATH);
        self.query(&key, force, || self.inner.api.list::<R>()).await
    }

    /// A single entry of collection `R`, from cache when fresh.
    pub async fn listing<R: Resource>(&self, id: &str) -> Result<R, ApiError> {
        let key = QueryKey::item(R::PATH, id);
        self.query(&key, false, || self.inner.api.get::<R>(id)).await
    }

    /// Create an entry and mark the collection stale.
    pub async fn create<R: Resource>(&self, draft: &R::Draft) -> Result<R, ApiError> {
        let created = self.inner.api.create::<R>(draft).await?;
        self.inner.cache.invalidate(&QueryKey::list(R::PATH));
        tracing::info!("Created {} {}", R::NAME, created.id());
        Ok(created)
    }

    /// Delete an entry the current user owns and mark the collection stale.
    /// The cached list keeps the entry until the caller refetches.
    pub async fn delete<R: Resource>(&self, listing: &R) -> Result<(), ApiError> {
        let user = self.user();
        if !is_owner(user.as_ref().map(|u| u.id.as_str()), listing) {
            return Err(ApiError::Forbidden(format!(
                "only the owner can delete this {}",
                R::NAME
            )));
        }
        self.inner.api.delete::<R>(listing.id()).await?;
        self.inner.cache.invalidate(&QueryKey::list(R::PATH));
        self.inner.cache.remove(&QueryKey::item(R::PATH, listing.id()));
        tracing::info!("Deleted {} {}", R::NAME, listing.id());
        Ok(())
    }

    async fn fetch_user(&self) -> Result<Option<User>, ApiError> {
        let key = QueryKey::current_user();
        let cache = &self.inner.cache;

        if self.inner.tokens.load().is_none() {
            cache.remove(&key);
            return Ok(None);
        }

        let epoch = self.inner.epoch.get();
        cache.begin_fetch(&key);
        let result = self.with_retry(|| self.inner.api.current_user()).await;

        if self.inner.epoch.get() != epoch {
            tracing::debug!("Discarding user fetched before the session changed");
            cache.end_fetch(&key);
            return Ok(self.user());
        }

        let outcome = match result {
            Ok(user) => {
                self.inner.last_error.borrow_mut().take();
                if let Err(e) = cache.set(&key, &user) {
                    tracing::warn!("Failed to cache current user: {}", e);
                }
                Ok(Some(user))
            }
            Err(e) if e.is_unauthorized() => {
                tracing::info!("Stored token rejected, treating as signed out");
                self.inner.tokens.clear();
                self.inner.last_error.borrow_mut().take();
                cache.remove(&key);
                Ok(None)
            }
            Err(e) => {
                tracing::error!("Failed to load current user: {}", e);
                *self.inner.last_error.borrow_mut() = Some(e.to_string());
                cache.remove(&key);
                Err(e)
            }
        };
        cache.end_fetch(&key);
        outcome
    }

    async fn query<V, F, Fut>(&self, key: &QueryKey, force: bool, op: F) -> Result<V, ApiError>
    where
        V: Serialize + DeserializeOwned,
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<V, ApiError>>,
    {
        let cache = &self.inner.cache;
        if !force && cache.is_fresh(key) {
            if let Some(value) = cache.get::<V>(key) {
                return Ok(value);
            }
        }

        let epoch = self.inner.epoch.get();
        cache.begin_fetch(key);
        let result = self.with_retry(op).await;
        if let Ok(value) = &result {
            if self.inner.epoch.get() == epoch {
                if let Err(e) = cache.set(key, value) {
                    tracing::warn!("Failed to cache {}: {}", key, e);
                }
            }
        }
        cache.end_fetch(key);
        result
    }

    async fn with_retry<V, F, Fut>(&self, mut op: F) -> Result<V, ApiError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<V, ApiError>>,
    {
        let retries = self.inner.cache.policy().retry;
        let mut attempt = 0;
        loop {
            match op().await {
                Ok(value) => return Ok(value),
                Err(e) if attempt < retries && e.is_retryable() => {
                    attempt += 1;
                    tracing::warn!("Request failed ({}), retrying", e);
                }
                Err(e) => return Err(e),
            }
        }
    }

    fn bump_epoch(&self) {
        self.inner.epoch.set(self.inner.epoch.get() + 1);
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use std::collections::VecDeque;
    use std::time::Duration;
    use store::{CachePolicy, ManualClock, MemoryTokenStore, NewRide, ProfileUpdate, Ride};

    /// Scripted backend. Queued results are returned in order; once the queue
    /// is empty the default user is returned.
    #[derive(Clone, Default)]
    pub(crate) struct FakeApi {
        pub user_results: Rc<RefCell<VecDeque<Result<User, ApiError>>>>,
        pub update_results: Rc<RefCell<VecDeque<Result<User, ApiError>>>>,
        pub rides: Rc<RefCell<Vec<Ride>>>,
        pub user_calls: Rc<Cell<u32>>,
        pub update_calls: Rc<Cell<u32>>,
        pub list_calls: Rc<Cell<u32>>,
        pub delete_calls: Rc<Cell<u32>>,
        /// Runs while a user request is in flight, before it resolves.
        pub during_user_call: Rc<RefCell<Option<Box<dyn Fn()>>>>,
    }

    pub(crate) fn user(name: &str) -> User {
        User {
            id: "u1".to_string(),
            username: name.to_string(),
            department: "Mathematics".to_string(),
            email: "ada@uni.edu".to_string(),
            avatar_url: None,
        }
    }

    pub(crate) fn ride(id: &str, driver: &str) -> Ride {
        Ride {
            id: id.to_string(),
            origin: "Campus".to_string(),
            destination: "Airport".to_string(),
            departure_time: Utc.with_ymd_and_hms(2026, 10, 20, 8, 0, 0).unwrap(),
            seats_available: 3,
            price: 4.0,
            notes: None,
            driver_id: driver.to_string(),
            driver_name: None,
            created_at: Utc.with_ymd_and_hms(2026, 10, 1, 0, 0, 0).unwrap(),
            updated_at: None,
        }
    }

    pub(crate) fn server_error() -> ApiError {
        ApiError::Status {
            status: 500,
            message: "boom".to_string(),
        }
    }

    impl MarketplaceApi for FakeApi {
        async fn current_user(&self) -> Result<User, ApiError> {
            self.user_calls.set(self.user_calls.get() + 1);
            let hook = self.during_user_call.borrow_mut().take();
            if let Some(hook) = hook {
                hook();
            }
            self.user_results
                .borrow_mut()
                .pop_front()
                .unwrap_or_else(|| Ok(user("ada")))
        }

        async fn update_profile(&self, update: &ProfileUpdate) -> Result<User, ApiError> {
            self.update_calls.set(self.update_calls.get() + 1);
            self.update_results.borrow_mut().pop_front().unwrap_or_else(|| {
                Ok(User {
                    username: update.username.clone(),
                    department: update.department.clone(),
                    ..user("ada")
                })
            })
        }

        async fn list<R: Resource>(&self) -> Result<Vec<R>, ApiError> {
            self.list_calls.set(self.list_calls.get() + 1);
            let value = serde_json::to_value(&*self.rides.borrow())?;
            Ok(serde_json::from_value(value)?)
        }

        async fn get<R: Resource>(&self, id: &str) -> Result<R, ApiError> {
            let rides = self.rides.borrow();
            let ride = rides
                .iter()
                .find(|r| r.id == id)
                .ok_or_else(|| ApiError::NotFound(id.to_string()))?;
            Ok(serde_json::from_value(serde_json::to_value(ride)?)?)
        }

        async fn create<R: Resource>(&self, draft: &R::Draft) -> Result<R, ApiError> {
            let mut value = serde_json::to_value(draft)?;
            value["id"] = serde_json::json!("new");
            value["driver_id"] = serde_json::json!("u1");
            value["created_at"] = serde_json::json!("2026-10-18T12:00:00Z");
            Ok(serde_json::from_value(value)?)
        }

        async fn delete<R: Resource>(&self, id: &str) -> Result<(), ApiError> {
            self.delete_calls.set(self.delete_calls.get() + 1);
            self.rides.borrow_mut().retain(|r| r.id != id);
            Ok(())
        }
    }

    pub(crate) fn session_with(
        api: FakeApi,
        token: Option<&str>,
    ) -> (Session<FakeApi, MemoryTokenStore>, ManualClock) {
        let clock = ManualClock::new(Utc.with_ymd_and_hms(2026, 10, 18, 12, 0, 0).unwrap());
        let cache = QueryCache::with_clock(CachePolicy::default(), clock.clone());
        let tokens = match token {
            Some(t) => MemoryTokenStore::with_token(t),
            None => MemoryTokenStore::new(),
        };
        (Session::new(api, tokens, cache), clock)
    }

    #[tokio::test]
    async fn test_no_token_means_logged_out_without_request() {
        let api = FakeApi::default();
        let (session, _) = session_with(api.clone(), None);

        assert!(!session.is_loading());
        assert_eq!(session.load_user().await.unwrap(), None);
        assert_eq!(api.user_calls.get(), 0);
        assert!(!session.is_authenticated());
        assert!(session.state().error.is_none());
    }

    #[tokio::test]
    async fn test_load_user_caches_for_stale_time() {
        let api = FakeApi::default();
        let (session, clock) = session_with(api.clone(), Some("t"));
        assert!(session.is_loading());

        let user = session.load_user().await.unwrap().unwrap();
        assert_eq!(user.username, "ada");
        assert!(session.is_authenticated());
        assert!(!session.is_loading());

        session.load_user().await.unwrap();
        assert_eq!(api.user_calls.get(), 1);

        clock.advance(Duration::from_secs(5 * 60));
        session.load_user().await.unwrap();
        assert_eq!(api.user_calls.get(), 2);
    }

    #[tokio::test]
    async fn test_collection_keeps_signed_in_user() {
        let api = FakeApi::default();
        api.rides.borrow_mut().push(ride("mine", "u1"));
        let (session, clock) = session_with(api.clone(), Some("t"));
        session.load_user().await.unwrap();
        let rides = session.listings::<Ride>(false).await.unwrap();

        clock.advance(Duration::from_secs(11 * 60));
        // Only the ride list goes
        assert_eq!(session.cache().collect_garbage(), 1);

        let state = session.state();
        assert!(state.is_authenticated());
        assert!(!state.is_loading);
        assert_eq!(api.user_calls.get(), 1);
        session.delete(&rides[0]).await.unwrap();
    }

    #[tokio::test]
    async fn test_maintain_refetches_only_stale_user() {
        let api = FakeApi::default();
        let (session, clock) = session_with(api.clone(), Some("t"));
        session.load_user().await.unwrap();

        clock.advance(Duration::from_secs(60));
        session.maintain().await.unwrap();
        assert_eq!(api.user_calls.get(), 1);

        clock.advance(Duration::from_secs(10 * 60));
        session.maintain().await.unwrap();
        assert_eq!(api.user_calls.get(), 2);
        assert!(session.cache().is_fresh(&QueryKey::current_user()));
        assert!(session.is_authenticated());
    }

    #[tokio::test]
    async fn test_maintain_without_token_makes_no_request() {
        let api = FakeApi::default();
        let (session, clock) = session_with(api.clone(), None);
        clock.advance(Duration::from_secs(11 * 60));
        assert_eq!(session.maintain().await.unwrap(), 0);
        assert_eq!(api.user_calls.get(), 0);
    }

    #[tokio::test]
    async fn test_refetch_user_always_requests() {
        let api = FakeApi::default();
        let (session, _) = session_with(api.clone(), Some("t"));
        session.load_user().await.unwrap();
        session.refetch_user().await.unwrap();
        assert_eq!(api.user_calls.get(), 2);
    }

    #[tokio::test]
    async fn test_failed_fetch_is_retried_once() {
        let api = FakeApi::default();
        api.user_results
            .borrow_mut()
            .extend([Err(server_error()), Err(server_error()), Ok(user("late"))]);
        let (session, _) = session_with(api.clone(), Some("t"));

        let err = session.load_user().await.unwrap_err();
        assert!(matches!(err, ApiError::Status { status: 500, .. }));
        assert_eq!(api.user_calls.get(), 2);

        let state = session.state();
        assert!(state.user.is_none());
        assert!(!state.is_loading);
        assert!(state.error.unwrap().contains("boom"));
    }

    #[tokio::test]
    async fn test_single_failure_recovers_on_retry() {
        let api = FakeApi::default();
        api.user_results.borrow_mut().push_back(Err(server_error()));
        let (session, _) = session_with(api.clone(), Some("t"));

        assert!(session.load_user().await.unwrap().is_some());
        assert_eq!(api.user_calls.get(), 2);
        assert!(session.last_error().is_none());
    }

    #[tokio::test]
    async fn test_rejected_token_is_logged_out_not_error() {
        let api = FakeApi::default();
        api.user_results.borrow_mut().push_back(Err(ApiError::Unauthorized));
        let (session, _) = session_with(api.clone(), Some("stale"));

        assert_eq!(session.load_user().await.unwrap(), None);
        assert_eq!(api.user_calls.get(), 1);
        assert!(session.tokens().load().is_none());
        assert!(session.state().error.is_none());
        assert!(!session.is_loading());
    }

    #[tokio::test]
    async fn test_logout_clears_token_and_user() {
        let api = FakeApi::default();
        api.rides.borrow_mut().push(ride("r1", "u1"));
        let (session, _) = session_with(api.clone(), Some("t"));
        session.load_user().await.unwrap();
        session.listings::<Ride>(false).await.unwrap();
        assert!(session.is_authenticated());

        session.logout();

        assert!(!session.is_authenticated());
        assert!(session.tokens().load().is_none());
        assert!(session.user().is_none());
        assert!(!session.cache().is_fresh(&QueryKey::list(Ride::PATH)));
        assert!(!session.is_loading());
    }

    #[tokio::test]
    async fn test_fetch_finishing_after_logout_is_discarded() {
        let api = FakeApi::default();
        let (session, _) = session_with(api.clone(), Some("t"));

        let other = session.clone();
        let fetch = session.refetch_user();
        // Log out before the fetch is polled to completion
        other.logout();
        // The token is gone, so the fetch resolves without a request
        assert_eq!(fetch.await.unwrap(), None);
        assert!(session.user().is_none());

        // A logout landing while the request is in flight
        session.tokens().save("t");
        let during = session.clone();
        *api.during_user_call.borrow_mut() = Some(Box::new(move || during.logout()));
        assert_eq!(session.refetch_user().await.unwrap(), None);
        assert_eq!(api.user_calls.get(), 1);
        assert!(session.user().is_none());
        assert!(session.tokens().load().is_none());
        assert!(!session.cache().is_fetching(&QueryKey::current_user()));
    }

    #[tokio::test]
    async fn test_login_with_token_fetches_user() {
        let api = FakeApi::default();
        let (session, _) = session_with(api.clone(), None);

        let user = session.login_with_token("fresh").await.unwrap();
        assert_eq!(user.unwrap().username, "ada");
        assert_eq!(session.tokens().load().as_deref(), Some("fresh"));
        assert!(session.is_authenticated());
    }

    #[tokio::test]
    async fn test_sign_in_checks_token_with_auth_provider() {
        use store::AuthConfig;
        use wiremock::matchers::{header, method, path};
        use wiremock::{Mock, MockServer, ResponseTemplate};

        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/auth/v1/user"))
            .and(header("authorization", "Bearer good"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({ "id": "a1" })),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/auth/v1/user"))
            .and(header("authorization", "Bearer expired"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;
        let auth = AuthClient::new(AuthConfig {
            url: server.uri(),
            anon_key: "anon".to_string(),
            ..AuthConfig::default()
        });

        let api = FakeApi::default();
        let (session, _) = session_with(api.clone(), None);

        let err = session.sign_in(&auth, "expired").await.unwrap_err();
        assert!(matches!(err, ApiError::AuthCallback(_)));
        assert!(session.tokens().load().is_none());
        assert_eq!(api.user_calls.get(), 0);

        let user = session.sign_in(&auth, "good").await.unwrap();
        assert_eq!(user.unwrap().username, "ada");
        assert_eq!(session.tokens().load().as_deref(), Some("good"));
    }

    #[tokio::test]
    async fn test_listings_are_cached_and_invalidated_by_create() {
        let api = FakeApi::default();
        api.rides.borrow_mut().push(ride("r1", "u1"));
        let (session, _) = session_with(api.clone(), Some("t"));

        assert_eq!(session.listings::<Ride>(false).await.unwrap().len(), 1);
        session.listings::<Ride>(false).await.unwrap();
        assert_eq!(api.list_calls.get(), 1);

        let draft = NewRide {
            origin: "Campus".to_string(),
            destination: "Beach".to_string(),
            departure_time: Utc.with_ymd_and_hms(2026, 10, 25, 9, 0, 0).unwrap(),
            seats_available: 2,
            price: 0.0,
            notes: None,
        };
        let created = session.create::<Ride>(&draft).await.unwrap();
        assert_eq!(created.destination, "Beach");
        assert!(!session.cache().is_fresh(&QueryKey::list(Ride::PATH)));

        session.listings::<Ride>(false).await.unwrap();
        assert_eq!(api.list_calls.get(), 2);

        session.listings::<Ride>(true).await.unwrap();
        assert_eq!(api.list_calls.get(), 3);
    }

    #[tokio::test]
    async fn test_delete_requires_ownership() {
        let api = FakeApi::default();
        api.rides
            .borrow_mut()
            .extend([ride("mine", "u1"), ride("theirs", "u2")]);
        let (session, _) = session_with(api.clone(), Some("t"));
        session.load_user().await.unwrap();
        let rides = session.listings::<Ride>(false).await.unwrap();

        let err = session.delete(&rides[1]).await.unwrap_err();
        assert!(matches!(err, ApiError::Forbidden(_)));
        assert_eq!(api.delete_calls.get(), 0);

        session.delete(&rides[0]).await.unwrap();
        assert_eq!(api.delete_calls.get(), 1);

        // No optimistic removal: the cached list still has both until refetch
        let cached: Vec<Ride> = session.cache().get(&QueryKey::list(Ride::PATH)).unwrap();
        assert_eq!(cached.len(), 2);
        assert_eq!(session.listings::<Ride>(false).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_listing_by_id() {
        let api = FakeApi::default();
        api.rides.borrow_mut().push(ride("r9", "u3"));
        let (session, _) = session_with(api, Some("t"));

        let found = session.listing::<Ride>("r9").await.unwrap();
        assert_eq!(found.driver_id, "u3");
        assert!(matches!(
            session.listing::<Ride>("missing").await,
            Err(ApiError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_cache_events_reach_subscribers() {
        let api = FakeApi::default();
        let (session, _) = session_with(api, Some("t"));
        let count = Rc::new(Cell::new(0));
        let sink = count.clone();
        let key = QueryKey::current_user();
        let sub = session.cache().subscribe(move |event| {
            if event.affects(&key) {
                sink.set(sink.get() + 1);
            }
        });

        session.load_user().await.unwrap();
        // FetchStarted, Updated, FetchFinished
        assert_eq!(count.get(), 3);

        session.cache().unsubscribe(sub);
        session.logout();
        assert_eq!(count.get(), 3);
    }
}
