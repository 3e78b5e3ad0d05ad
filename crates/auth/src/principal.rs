use gatekeep_core::AccountId;

use crate::claims::SessionClaims;
use crate::{Account, Denial, Role};

/// The authenticated party asking for a change.
///
/// Built from the requester's own freshly loaded account, so the role and the
/// root flag reflect the store rather than whatever a token once said.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Requester {
    pub id: AccountId,
    pub role: Role,
    pub is_root_admin: bool,
}

impl Requester {
    pub fn of(account: &Account) -> Self {
        Self {
            id: account.id,
            role: account.role,
            is_root_admin: account.is_root_admin,
        }
    }

    /// Requester as asserted by session claims.
    ///
    /// Tokens never carry the root flag, so a requester built this way is
    /// never root. A role string outside the known set is `Unauthorized`.
    pub fn from_claims(claims: &SessionClaims) -> Result<Self, Denial> {
        let role = claims.role.parse::<Role>().map_err(|_| Denial::Unauthorized)?;
        Ok(Self {
            id: claims.sub,
            role,
            is_root_admin: false,
        })
    }

    pub fn is_self(&self, target: &Account) -> bool {
        self.id == target.id
    }
}
