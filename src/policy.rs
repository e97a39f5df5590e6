use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Accountant,
    Teacher,
    Canteen,
    Librarian,
    Student,
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "accountant" => Ok(Role::Accountant),
            "teacher" => Ok(Role::Teacher),
            "canteen" => Ok(Role::Canteen),
            "librarian" => Ok(Role::Librarian),
            "student" => Ok(Role::Student),
            other => Err(other.to_string()),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Admin => write!(f, "admin"),
            Role::Accountant => write!(f, "accountant"),
            Role::Teacher => write!(f, "teacher"),
            Role::Canteen => write!(f, "canteen"),
            Role::Librarian => write!(f, "librarian"),
            Role::Student => write!(f, "student"),
        }
    }
}

/// Authenticated identity forwarded by the upstream gateway. The ledger
/// never authenticates; it only authorizes.
#[derive(Clone, Debug)]
pub struct Actor {
    pub user_id: String,
    pub role: Role,
    pub school_id: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    ViewWallet,
    ViewTransactions,
    Recharge,
    Deduct,
    SetStatus,
}

/// Capability check the ledger engine consults before touching a wallet.
/// Injected so the engine stays testable without a full auth stack.
pub trait AccessPolicy: Send + Sync {
    fn allows(&self, actor: &Actor, action: Action, student_id: &str) -> bool;
}

/// Role gates from the wallet API contract: students may read their own
/// wallet only; staff roles are scoped by action.
pub struct RoleAccessPolicy;

impl AccessPolicy for RoleAccessPolicy {
    fn allows(&self, actor: &Actor, action: Action, student_id: &str) -> bool {
        match action {
            Action::ViewWallet | Action::ViewTransactions => match actor.role {
                Role::Admin | Role::Accountant | Role::Teacher => true,
                Role::Student => actor.user_id == student_id,
                Role::Canteen | Role::Librarian => false,
            },
            Action::Recharge => matches!(actor.role, Role::Admin | Role::Accountant),
            Action::Deduct => matches!(
                actor.role,
                Role::Admin | Role::Accountant | Role::Canteen | Role::Librarian
            ),
            Action::SetStatus => matches!(actor.role, Role::Admin),
        }
    }
}
