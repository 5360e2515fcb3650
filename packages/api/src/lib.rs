//! # API crate: remote data access and the session service for Campus Market
//!
//! This crate sits between the views in `ui` and the two remote services the
//! marketplace talks to: the REST backend holding users and listings, and the
//! hosted auth provider that signs members in.
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`client`] | [`ApiClient`], the bearer-authenticated HTTP client, and the [`MarketplaceApi`] trait the session is generic over |
//! | [`auth`] | [`AuthClient`] for the auth provider: authorize url, callback parsing, session lookup, sign-out |
//! | [`session`] | [`Session`], the injected session store: current user, query cache, token, logout |
//! | [`profile`] | Profile edit form validation, dialog state and the submit-then-refetch flow |
//! | [`error`] | [`ApiError`], the error taxonomy shared by every call |
//!
//! ## Data flow
//!
//! A view calls a [`Session`] method, the session calls its [`MarketplaceApi`],
//! and the result is written to (or invalidated in) the [`store::QueryCache`].
//! The cache emits a [`store::CacheEvent`] and the subscribed provider in `ui`
//! re-renders whatever depends on it.

pub mod auth;
pub mod client;
pub mod error;
pub mod profile;
pub mod session;

pub use auth::{AuthClient, AuthUser, CallbackTokens, OAuthProvider};
pub use client::{ApiClient, MarketplaceApi};
pub use error::ApiError;
pub use profile::{submit_profile, ProfileDialog, ProfileError, ProfileForm};
pub use session::{Session, SessionState};

pub use store::{ProfileUpdate, User};
