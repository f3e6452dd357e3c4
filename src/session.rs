//! Session authenticator: validates a provider's credential once per run.

use crate::contract::{AccountInfo, StorageProvider};
use tracing::{error, info};

/// A provider whose credential passed the identity check.
///
/// Created once by [`authenticate`] and only ever used by shared reference.
#[derive(Debug)]
pub struct Session<P> {
    provider: P,
    account: AccountInfo,
}

impl<P: StorageProvider> Session<P> {
    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn account(&self) -> &AccountInfo {
        &self.account
    }
}

/// Verifies the provider with one identity-check call.
///
/// Returns `None` (after reporting the error) when the check fails; the
/// caller is expected to stop the run.
pub async fn authenticate<P: StorageProvider>(provider: P) -> Option<Session<P>> {
    match provider.current_account().await {
        Ok(account) => {
            info!(
                account_id = %account.account_id,
                email = account.email.as_deref().unwrap_or("<unknown>"),
                "Authenticated storage session"
            );
            println!("Successfully authenticated to Dropbox");
            Some(Session { provider, account })
        }
        Err(e) => {
            error!(error = %e, "Identity check failed");
            eprintln!("Authentication error: {e}");
            None
        }
    }
}
