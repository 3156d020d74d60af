//! Jobs domain state

use crate::JobsRepositories;

/// Application state for the Jobs domain
///
/// Authentication runs in front of the router, so handlers only need the
/// repositories.
#[derive(Clone)]
pub struct JobsState {
    pub repos: JobsRepositories,
}
