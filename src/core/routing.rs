use crate::models::{ApplicationStatus, AuthState, Role, Route};

/// Pick the landing route for a session
///
/// Every guard in the client asks this one function instead of
/// re-deriving the redirect from role and status flags.
pub fn resolve_destination(state: &AuthState) -> Route {
    if !state.authenticated {
        return Route::Login;
    }

    match state.role {
        None => Route::RoleSelection,
        Some(Role::Admin) => Route::AdminDashboard,
        Some(Role::Founder) => {
            if state.onboarding_complete {
                Route::FounderDashboard
            } else {
                Route::FounderOnboarding
            }
        }
        Some(Role::Provider) => resolve_provider(state),
    }
}

fn resolve_provider(state: &AuthState) -> Route {
    match state.application_status {
        None | Some(ApplicationStatus::Draft) => Route::ProviderApplication,
        Some(ApplicationStatus::Submitted) | Some(ApplicationStatus::UnderReview) => {
            Route::ApplicationPending
        }
        Some(ApplicationStatus::Rejected) => Route::ApplicationRejected,
        Some(ApplicationStatus::Approved) if !state.onboarding_complete => Route::ProviderOnboarding,
        Some(ApplicationStatus::Approved) => Route::ProviderDashboard,
    }
}
