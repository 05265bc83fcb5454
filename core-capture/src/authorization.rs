//! Photo library authorization checks.
//!
//! The authorization state is read from the [`PhotoLibrary`] on every call
//! and never cached; the user can revoke access between sessions.

use bridge_traits::{AuthorizationState, PhotoLibrary};
use core_runtime::events::{CaptureEvent, CoreEvent, EventBus, PermissionEvent};
use std::sync::Arc;
use tracing::{debug, info, warn};

pub struct AuthorizationGate {
    library: Arc<dyn PhotoLibrary>,
    event_bus: EventBus,
}

impl AuthorizationGate {
    pub fn new(library: Arc<dyn PhotoLibrary>, event_bus: EventBus) -> Self {
        Self { library, event_bus }
    }

    /// Returns whether gallery persistence may proceed.
    ///
    /// `false` unless the caller asked for it and the library is
    /// `Authorized`. A failed status read counts as not authorized.
    pub async fn check_and_maybe_downgrade(&self, requested_save_to_gallery: bool) -> bool {
        if !requested_save_to_gallery {
            return false;
        }

        let state = match self.library.authorization_status().await {
            Ok(state) => state,
            Err(e) => {
                warn!(error = %e, "Failed to read photo library authorization; not saving to gallery");
                self.downgraded("unknown");
                return false;
            }
        };

        if state.is_authorized() {
            return true;
        }

        info!(authorization = %state, "Photo library not authorized; not saving to gallery");
        self.downgraded(state.as_str());
        false
    }

    /// Prompt for access if the user has not been asked yet.
    ///
    /// Fire-and-forget: outcomes are logged and published as
    /// [`PermissionEvent`]s, never returned.
    pub async fn request_permission(&self) {
        let state = match self.library.authorization_status().await {
            Ok(state) => state,
            Err(e) => {
                warn!(error = %e, "Failed to read photo library authorization");
                return;
            }
        };

        let resolved = match state {
            AuthorizationState::NotDetermined => {
                self.publish(PermissionEvent::Prompted);
                match self.library.request_authorization().await {
                    Ok(resolved) => resolved,
                    Err(e) => {
                        warn!(error = %e, "Photo library authorization request failed");
                        return;
                    }
                }
            }
            other => other,
        };

        if resolved.is_authorized() {
            debug!("Application can access photo library assets");
        } else {
            debug!(authorization = %resolved, "Application can not access photo library assets");
        }

        self.publish(PermissionEvent::StatusResolved {
            state: resolved.as_str().to_string(),
            authorized: resolved.is_authorized(),
        });
    }

    fn downgraded(&self, authorization: &str) {
        let _ = self
            .event_bus
            .emit(CoreEvent::Capture(CaptureEvent::GallerySaveDowngraded {
                authorization: authorization.to_string(),
            }));
    }

    fn publish(&self, event: PermissionEvent) {
        let _ = self.event_bus.emit(CoreEvent::Permission(event));
    }
}
