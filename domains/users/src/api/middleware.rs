//! Users domain state

use crate::UsersRepositories;
use jobtrack_auth::{AuthBackend, PasswordHasher};

/// Application state for the Users domain
#[derive(Clone)]
pub struct UsersState {
    pub repos: UsersRepositories,
    /// Issues tokens after register and login
    pub auth: AuthBackend,
    pub hasher: PasswordHasher,
}
