use async_trait::async_trait;

use crate::domain::{Address, User};
use crate::user_actor::UserError;

/// What the order ledger needs from the user registry.
///
/// The ledger holds this as a trait object bound once by `Initialize`. The
/// registry checks the caller's `MANAGER` grant on every debit, so the ledger
/// address must be granted that role before any payment goes through.
#[async_trait]
pub trait ScoreLedger: Send + Sync {
    /// Address of the registry component.
    fn address(&self) -> Address;

    /// Returns the stored user or the zero-valued record.
    async fn get_user(&self, id: u64) -> Result<User, UserError>;

    async fn user_exists(&self, id: u64) -> Result<bool, UserError> {
        Ok(self.get_user(id).await?.exists())
    }

    /// Atomically checks and subtracts `amount` from the user's score.
    async fn debit_score(&self, caller: Address, id: u64, amount: u64) -> Result<User, UserError>;
}
