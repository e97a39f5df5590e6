mod storage_tests;

use crate::logger::in_memory::InMemoryAuditLogger;
use crate::policy::{Actor, Role, RoleAccessPolicy};
use crate::service::LedgerService;
use crate::storage::in_memory::InMemoryWalletStore;
use std::time::Duration;

pub const SCHOOL: &str = "school-1";

pub type LedgerServiceUnderTest =
    LedgerService<InMemoryWalletStore, RoleAccessPolicy, InMemoryAuditLogger>;

pub fn create_test_service() -> LedgerServiceUnderTest {
    let _ = env_logger::try_init();
    LedgerService::new(
        InMemoryWalletStore::new(),
        RoleAccessPolicy,
        InMemoryAuditLogger::new(),
        Duration::from_secs(5),
    )
}

pub fn actor(role: Role, user_id: &str) -> Actor {
    Actor {
        user_id: user_id.to_string(),
        role,
        school_id: SCHOOL.to_string(),
    }
}
