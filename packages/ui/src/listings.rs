//! Hooks that load and mutate listing collections through the session.

use dioxus::prelude::*;
use store::{Listing, Resource};

use crate::session::{use_session, SessionHandle};
use crate::toast::{push_toast, Toasts, ToastLevel};

/// Reactive view over one listing collection.
pub struct Listings<R: 'static> {
    pub items: Signal<Vec<R>>,
    pub loading: Signal<bool>,
    pub error: Signal<Option<String>>,
    reload: Signal<u32>,
}

impl<R: 'static> Clone for Listings<R> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<R: 'static> Copy for Listings<R> {}

impl<R: 'static> Listings<R> {
    /// Refetch from the backend, ignoring the cache.
    pub fn refresh(&mut self) {
        *self.reload.write() += 1;
    }
}

/// Load collection `R` on mount, from cache when fresh.
pub fn use_listings<R: Resource>() -> Listings<R> {
    let handle = use_session();
    let mut items = use_signal(Vec::<R>::new);
    let mut loading = use_signal(|| true);
    let mut error = use_signal(|| None::<String>);
    let reload = use_signal(|| 0u32);

    let _ = use_resource(move || {
        let handle = handle.clone();
        let force = reload() > 0;
        async move {
            loading.set(true);
            match handle.session().listings::<R>(force).await {
                Ok(fetched) => {
                    items.set(fetched);
                    error.set(None);
                }
                Err(e) => {
                    tracing::error!("Failed to load {} listings: {}", R::NAME, e);
                    error.set(Some(e.to_string()));
                }
            }
            loading.set(false);
        }
    });

    Listings {
        items,
        loading,
        error,
        reload,
    }
}

/// Mark `busy` before any task is spawned, so a second click in the same
/// frame sees it. Returns false when a request is already running.
fn claim(busy: &mut Signal<bool>) -> bool {
    if *busy.peek() {
        return false;
    }
    busy.set(true);
    true
}

/// Delete `listing` and report the outcome. `on_deleted` receives the id so
/// the parent list can refetch; nothing is removed optimistically. Returns
/// false without sending anything while `busy` is set.
pub fn delete_listing<R: Resource>(
    handle: SessionHandle,
    mut toasts: Signal<Toasts>,
    mut busy: Signal<bool>,
    listing: R,
    on_deleted: EventHandler<String>,
) -> bool {
    if !claim(&mut busy) {
        return false;
    }
    spawn(async move {
        let result = handle.session().delete(&listing).await;
        busy.set(false);
        match result {
            Ok(()) => {
                push_toast(&mut toasts, ToastLevel::Success, format!("Deleted {}", R::NAME));
                on_deleted.call(listing.id().to_string());
            }
            Err(e) => {
                push_toast(
                    &mut toasts,
                    ToastLevel::Error,
                    format!("Failed to delete {}: {e}", R::NAME),
                );
            }
        }
    });
    true
}

/// Create a listing from `draft`, then hand the created entry to `on_created`.
/// Returns false without sending anything while `busy` is set.
pub fn create_listing<R: Resource>(
    handle: SessionHandle,
    mut toasts: Signal<Toasts>,
    mut busy: Signal<bool>,
    draft: R::Draft,
    on_created: EventHandler<R>,
) -> bool
where
    R::Draft: 'static,
{
    if !claim(&mut busy) {
        return false;
    }
    spawn(async move {
        let result = handle.session().create::<R>(&draft).await;
        busy.set(false);
        match result {
            Ok(created) => {
                push_toast(&mut toasts, ToastLevel::Success, format!("Posted {}", R::NAME));
                on_created.call(created);
            }
            Err(e) => {
                push_toast(
                    &mut toasts,
                    ToastLevel::Error,
                    format!("Failed to post {}: {e}", R::NAME),
                );
            }
        }
    });
    true
}
