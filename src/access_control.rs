//! Per-component role table.
//!
//! Each component owns one `AccessControl` and checks it at the start of every
//! mutating handler. Every role is administered by [`Role::DEFAULT_ADMIN`].

use std::collections::{HashMap, HashSet};

use thiserror::Error;
use tracing::{debug, info};

use crate::domain::{Address, Role};
use crate::events::RoleEvent;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum AccessError {
    #[error("AccessControl: account {account} is missing role {role}")]
    MissingRole { account: Address, role: Role },
    #[error("AccessControl: can only renounce roles for self")]
    CanOnlyRenounceForSelf,
}

#[derive(Debug, Clone, Default)]
pub struct AccessControl {
    members: HashMap<Role, HashSet<Address>>,
}

impl AccessControl {
    /// Table for a freshly deployed component: the deployer holds both
    /// `DEFAULT_ADMIN` and `MANAGER`.
    pub fn with_deployer(deployer: Address) -> Self {
        let mut access = Self::default();
        access.insert(Role::DEFAULT_ADMIN, deployer);
        access.insert(Role::manager(), deployer);
        access
    }

    pub fn has_role(&self, role: Role, account: Address) -> bool {
        self.members
            .get(&role)
            .is_some_and(|holders| holders.contains(&account))
    }

    pub fn check_role(&self, role: Role, account: Address) -> Result<(), AccessError> {
        if self.has_role(role, account) {
            Ok(())
        } else {
            debug!(%account, %role, "Access denied");
            Err(AccessError::MissingRole { account, role })
        }
    }

    pub fn role_admin(&self, _role: Role) -> Role {
        Role::DEFAULT_ADMIN
    }

    /// Grants `role` to `account`. Returns `None` when it was already held.
    pub fn grant_role(
        &mut self,
        sender: Address,
        role: Role,
        account: Address,
    ) -> Result<Option<RoleEvent>, AccessError> {
        self.check_role(self.role_admin(role), sender)?;
        if !self.insert(role, account) {
            return Ok(None);
        }
        info!(%role, %account, "Role granted");
        Ok(Some(RoleEvent::RoleGranted {
            role,
            account,
            sender,
        }))
    }

    pub fn revoke_role(
        &mut self,
        sender: Address,
        role: Role,
        account: Address,
    ) -> Result<Option<RoleEvent>, AccessError> {
        self.check_role(self.role_admin(role), sender)?;
        Ok(self.remove(sender, role, account))
    }

    /// Drops a role from the sender itself; `account` must equal `sender`.
    pub fn renounce_role(
        &mut self,
        sender: Address,
        role: Role,
        account: Address,
    ) -> Result<Option<RoleEvent>, AccessError> {
        if sender != account {
            return Err(AccessError::CanOnlyRenounceForSelf);
        }
        Ok(self.remove(sender, role, account))
    }

    fn insert(&mut self, role: Role, account: Address) -> bool {
        self.members.entry(role).or_default().insert(account)
    }

    fn remove(&mut self, sender: Address, role: Role, account: Address) -> Option<RoleEvent> {
        let removed = self
            .members
            .get_mut(&role)
            .is_some_and(|holders| holders.remove(&account));
        removed.then(|| {
            info!(%role, %account, "Role revoked");
            RoleEvent::RoleRevoked {
                role,
                account,
                sender,
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn owner() -> Address {
        "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266".parse().unwrap()
    }

    fn manager() -> Address {
        "0x70997970c51812dc3a010c7d01b50e0d17dc79c8".parse().unwrap()
    }

    fn player() -> Address {
        "0x3c44cdddb6a900fa2b585dd299e03d12fa4293bc".parse().unwrap()
    }

    #[test]
    fn deployer_holds_admin_and_manager() {
        let access = AccessControl::with_deployer(owner());
        assert!(access.has_role(Role::DEFAULT_ADMIN, owner()));
        assert!(access.has_role(Role::manager(), owner()));
        assert!(!access.has_role(Role::manager(), player()));
    }

    #[test]
    fn only_admin_can_grant() {
        let mut access = AccessControl::with_deployer(owner());
        access
            .grant_role(owner(), Role::manager(), manager())
            .unwrap();

        let err = access
            .grant_role(manager(), Role::manager(), player())
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "AccessControl: account 0x70997970c51812dc3a010c7d01b50e0d17dc79c8 is missing role \
             0x0000000000000000000000000000000000000000000000000000000000000000"
        );
        assert!(!access.has_role(Role::manager(), player()));
    }

    #[test]
    fn granting_twice_emits_once() {
        let mut access = AccessControl::with_deployer(owner());
        let first = access.grant_role(owner(), Role::manager(), player()).unwrap();
        let second = access.grant_role(owner(), Role::manager(), player()).unwrap();
        assert!(first.is_some());
        assert!(second.is_none());
    }

    #[test]
    fn renounce_only_for_self() {
        let mut access = AccessControl::with_deployer(owner());
        access.grant_role(owner(), Role::manager(), player()).unwrap();

        assert_eq!(
            access.renounce_role(owner(), Role::manager(), player()),
            Err(AccessError::CanOnlyRenounceForSelf)
        );
        assert!(access
            .renounce_role(player(), Role::manager(), player())
            .unwrap()
            .is_some());
        assert!(!access.has_role(Role::manager(), player()));
    }

    #[test]
    fn revoke_removes_role() {
        let mut access = AccessControl::with_deployer(owner());
        access.grant_role(owner(), Role::manager(), manager()).unwrap();
        let event = access.revoke_role(owner(), Role::manager(), manager()).unwrap();
        assert!(matches!(event, Some(RoleEvent::RoleRevoked { .. })));
        assert!(!access.has_role(Role::manager(), manager()));
    }
}
