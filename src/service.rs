use crate::constants::{
    DEFAULT_PAGE_SIZE, MAX_CAS_RETRIES, MAX_PAGE_SIZE, WALLET_CREATED, WALLET_CREDITED,
    WALLET_DEBITED, WALLET_STATUS_CHANGED,
};
use crate::error::WalletError;
use crate::logger::AuditLogger;
use crate::models::transaction::{TxCategory, TxKind, WalletTransaction};
use crate::models::wallet::{Wallet, WalletStatus};
use crate::policy::{AccessPolicy, Action, Actor};
use crate::storage::WalletStore;
use crate::txid::new_tx_id;
use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::time::{Duration, Instant};
use utoipa::ToSchema;

#[derive(Serialize, Deserialize, Debug, Clone, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BalanceSummary {
    pub balance: i64,
    pub status: WalletStatus,
    #[schema(value_type = String, example = "2024-06-01T12:34:56Z")]
    pub last_updated: DateTime<Utc>,
}

#[derive(Serialize, Deserialize, Debug, Clone, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TransactionPage {
    pub items: Vec<WalletTransaction>,
    pub total: u64,
    pub total_pages: u64,
    pub current_page: u64,
}

/// The ledger engine. Serializes concurrent operations on the same wallet
/// through the store's compare-and-swap: load a snapshot, validate against
/// it, compute the new aggregate, submit with the loaded version, retry
/// from a fresh load on a mismatch. Nothing persists until a swap lands,
/// so a failed or timed-out operation leaves no partial transaction.
pub struct LedgerService<S: WalletStore, P: AccessPolicy, L: AuditLogger> {
    storage: S,
    policy: P,
    audit: L,
    op_timeout: Duration,
}

impl<S: WalletStore, P: AccessPolicy, L: AuditLogger> LedgerService<S, P, L> {
    pub fn new(storage: S, policy: P, audit: L, op_timeout: Duration) -> Self {
        info!("Initializing LedgerService");
        LedgerService {
            storage,
            policy,
            audit,
            op_timeout,
        }
    }

    fn authorize(&self, actor: &Actor, action: Action, student_id: &str) -> Result<(), WalletError> {
        if !self.policy.allows(actor, action, student_id) {
            warn!(
                "User {} ({}) denied {:?} on student {}",
                actor.user_id, actor.role, action, student_id
            );
            return Err(WalletError::NotAuthorized(actor.user_id.clone()));
        }
        Ok(())
    }

    async fn log_and_audit(
        &self,
        action: &str,
        details: serde_json::Value,
        actor: &Actor,
    ) -> Result<(), WalletError> {
        self.audit
            .log_action(action, details, Some(&actor.user_id))
            .await
    }

    // WALLET LIFECYCLE

    /// Returns the wallet for (school, student), creating it with defaults
    /// on first access. Idempotent.
    pub async fn get_or_create_wallet(
        &self,
        school_id: &str,
        student_id: &str,
        actor: &Actor,
    ) -> Result<Wallet, WalletError> {
        self.authorize(actor, Action::ViewWallet, student_id)?;

        if let Some(wallet) = self.storage.load(school_id, student_id).await? {
            return Ok(wallet);
        }

        let wallet = self.storage.create_if_absent(school_id, student_id).await?;
        info!("Created wallet for student {} in school {}", student_id, school_id);
        if let Err(e) = self
            .log_and_audit(
                WALLET_CREATED,
                json!({ "schoolId": school_id, "studentId": student_id }),
                actor,
            )
            .await
        {
            warn!("Audit log failed after wallet creation for {}: {}", student_id, e);
        }
        Ok(wallet)
    }

    /// Moves the wallet through the allowed status table. Never touches
    /// balance or history; the absence of a wallet is a hard error here.
    pub async fn set_status(
        &self,
        school_id: &str,
        student_id: &str,
        new_status: WalletStatus,
        actor: &Actor,
    ) -> Result<Wallet, WalletError> {
        self.authorize(actor, Action::SetStatus, student_id)?;
        info!(
            "User {} setting wallet status of student {} to {}",
            actor.user_id, student_id, new_status
        );

        let deadline = Instant::now() + self.op_timeout;
        for attempt in 1..=MAX_CAS_RETRIES {
            if Instant::now() >= deadline {
                return Err(WalletError::Timeout(format!(
                    "set_status for student {student_id}"
                )));
            }

            let wallet = self
                .storage
                .load(school_id, student_id)
                .await?
                .ok_or_else(|| WalletError::WalletNotFound(student_id.to_string()))?;

            if !wallet.status.can_transition_to(new_status) {
                warn!(
                    "Rejected status transition {} -> {} for student {}",
                    wallet.status, new_status, student_id
                );
                return Err(WalletError::InvalidStatusTransition {
                    from: wallet.status,
                    to: new_status,
                });
            }

            let version = wallet.version;
            let old_status = wallet.status;
            let mut next = wallet;
            next.status = new_status;
            next.updated_at = Utc::now();
            let mut snapshot = next.clone();
            // Mirror the version bump the store applies on accept.
            snapshot.version = version + 1;

            if self.storage.compare_and_swap(next, version).await? {
                // Committed; audit failures are logged, not surfaced.
                if let Err(e) = self
                    .log_and_audit(
                        WALLET_STATUS_CHANGED,
                        json!({
                            "schoolId": school_id,
                            "studentId": student_id,
                            "from": old_status,
                            "to": new_status,
                        }),
                        actor,
                    )
                    .await
                {
                    warn!("Audit log failed after status change for {}: {}", student_id, e);
                }
                debug!("Status of wallet for student {} is now {}", student_id, new_status);
                return Ok(snapshot);
            }
            warn!(
                "CAS conflict on set_status for student {} (attempt {})",
                student_id, attempt
            );
        }
        Err(WalletError::ConcurrencyConflict(student_id.to_string()))
    }

    // LEDGER OPERATIONS

    /// Appends a credit transaction and returns `(new_balance, tx_id)`.
    /// Crediting a student without a wallet opens one first; recharge is a
    /// documented lazy-creation path.
    pub async fn credit(
        &self,
        school_id: &str,
        student_id: &str,
        amount: i64,
        category: TxCategory,
        description: Option<String>,
        reference_id: Option<String>,
        actor: &Actor,
    ) -> Result<(i64, String), WalletError> {
        self.authorize(actor, Action::Recharge, student_id)?;
        info!(
            "User {} crediting {} to student {} ({:?})",
            actor.user_id, amount, student_id, category
        );
        self.apply_transaction(
            school_id,
            student_id,
            TxKind::Credit,
            amount,
            category,
            description,
            reference_id,
            actor,
        )
        .await
    }

    /// Appends a debit transaction and returns `(new_balance, tx_id)`.
    /// The sufficient-balance check and the mutation are evaluated against
    /// the same snapshot the CAS validates, so two debits can never both
    /// spend the same funds.
    pub async fn debit(
        &self,
        school_id: &str,
        student_id: &str,
        amount: i64,
        category: TxCategory,
        description: Option<String>,
        reference_id: Option<String>,
        actor: &Actor,
    ) -> Result<(i64, String), WalletError> {
        self.authorize(actor, Action::Deduct, student_id)?;
        info!(
            "User {} debiting {} from student {} ({:?})",
            actor.user_id, amount, student_id, category
        );
        self.apply_transaction(
            school_id,
            student_id,
            TxKind::Debit,
            amount,
            category,
            description,
            reference_id,
            actor,
        )
        .await
    }

    #[allow(clippy::too_many_arguments)]
    async fn apply_transaction(
        &self,
        school_id: &str,
        student_id: &str,
        kind: TxKind,
        amount: i64,
        category: TxCategory,
        description: Option<String>,
        reference_id: Option<String>,
        actor: &Actor,
    ) -> Result<(i64, String), WalletError> {
        if amount <= 0 {
            warn!("Rejected non-positive amount {} for student {}", amount, student_id);
            return Err(WalletError::InvalidAmount(amount));
        }

        let deadline = Instant::now() + self.op_timeout;
        for attempt in 1..=MAX_CAS_RETRIES {
            if Instant::now() >= deadline {
                return Err(WalletError::Timeout(format!(
                    "{kind:?} of {amount} for student {student_id}"
                )));
            }

            let wallet = match kind {
                // A debit against a wallet that was never opened is a hard
                // not-found, not an auto-create.
                TxKind::Debit => self
                    .storage
                    .load(school_id, student_id)
                    .await?
                    .ok_or_else(|| WalletError::WalletNotFound(student_id.to_string()))?,
                TxKind::Credit => self.storage.create_if_absent(school_id, student_id).await?,
            };

            if wallet.status != WalletStatus::Active {
                warn!(
                    "Rejected {:?} on {} wallet of student {}",
                    kind, wallet.status, student_id
                );
                return Err(WalletError::WalletNotActive(wallet.status));
            }
            if kind == TxKind::Debit && wallet.balance < amount {
                warn!(
                    "Insufficient balance for student {}: have {}, requested {}",
                    student_id, wallet.balance, amount
                );
                return Err(WalletError::InsufficientBalance {
                    balance: wallet.balance,
                    requested: amount,
                });
            }

            let balance_after = match kind {
                TxKind::Credit => {
                    wallet.balance.checked_add(amount).ok_or_else(|| {
                        warn!(
                            "Credit of {} would overflow balance {} for student {}",
                            amount, wallet.balance, student_id
                        );
                        WalletError::BalanceOverflow {
                            balance: wallet.balance,
                            amount,
                        }
                    })?
                }
                // Bounded below by the sufficient-balance check.
                TxKind::Debit => wallet.balance - amount,
            };

            let version = wallet.version;
            let mut next = wallet;
            let now = Utc::now();
            let tx = WalletTransaction {
                tx_id: new_tx_id(),
                seq: next.next_seq(),
                kind,
                category,
                amount,
                description: description.clone(),
                reference_id: reference_id.clone(),
                date: now,
                balance_after,
                performed_by: actor.user_id.clone(),
            };
            let tx_id = tx.tx_id.clone();
            let new_balance = tx.balance_after;
            next.balance = new_balance;
            next.updated_at = now;
            next.transactions.push(tx);

            match self.storage.compare_and_swap(next, version).await {
                Ok(true) => {
                    let action = match kind {
                        TxKind::Credit => WALLET_CREDITED,
                        TxKind::Debit => WALLET_DEBITED,
                    };
                    // The swap already committed; an audit failure must not
                    // report the operation as failed.
                    if let Err(e) = self
                        .log_and_audit(
                            action,
                            json!({
                                "schoolId": school_id,
                                "studentId": student_id,
                                "txId": tx_id,
                                "amount": amount,
                                "category": category,
                                "newBalance": new_balance,
                            }),
                            actor,
                        )
                        .await
                    {
                        warn!("Audit log failed after committed {:?} ({}): {}", kind, tx_id, e);
                    }
                    debug!(
                        "{:?} of {} applied for student {}, balance now {}",
                        kind, amount, student_id, new_balance
                    );
                    return Ok((new_balance, tx_id));
                }
                Ok(false) => {
                    warn!(
                        "CAS conflict on {:?} for student {} (attempt {})",
                        kind, student_id, attempt
                    );
                }
                // A fresh id is generated on the next attempt.
                Err(WalletError::TxIdCollision(id)) => {
                    warn!("Transaction id collision on {} (attempt {})", id, attempt);
                }
                Err(e) => return Err(e),
            }
        }
        Err(WalletError::ConcurrencyConflict(student_id.to_string()))
    }

    // QUERIES

    /// Current balance, status, and last-updated instant. Lazily opens the
    /// wallet on first read, mirroring `get_or_create_wallet`.
    pub async fn get_balance(
        &self,
        school_id: &str,
        student_id: &str,
        actor: &Actor,
    ) -> Result<BalanceSummary, WalletError> {
        let wallet = self.get_or_create_wallet(school_id, student_id, actor).await?;
        Ok(BalanceSummary {
            balance: wallet.balance,
            status: wallet.status,
            last_updated: wallet.updated_at,
        })
    }

    /// Paginated history, newest first by sequence number. The whole
    /// wallet record is read in one snapshot, so a transaction mid-append
    /// is never observable.
    pub async fn get_transactions(
        &self,
        school_id: &str,
        student_id: &str,
        page: Option<u64>,
        page_size: Option<u64>,
        actor: &Actor,
    ) -> Result<TransactionPage, WalletError> {
        self.authorize(actor, Action::ViewTransactions, student_id)?;

        let wallet = self
            .storage
            .load(school_id, student_id)
            .await?
            .ok_or_else(|| WalletError::WalletNotFound(student_id.to_string()))?;

        let page = page.unwrap_or(1).max(1);
        let page_size = page_size.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE);

        let total = wallet.transactions.len() as u64;
        let total_pages = total.div_ceil(page_size);
        // `page` is caller-controlled; saturate so an absurd value is just
        // an out-of-range (empty) page instead of an overflow.
        let skip = (page - 1).saturating_mul(page_size);
        let items: Vec<WalletTransaction> = wallet
            .transactions
            .iter()
            .rev()
            .skip(usize::try_from(skip).unwrap_or(usize::MAX))
            .take(page_size as usize)
            .cloned()
            .collect();

        debug!(
            "History page {} ({} items of {}) for student {}",
            page,
            items.len(),
            total,
            student_id
        );
        Ok(TransactionPage {
            items,
            total,
            total_pages,
            current_page: page,
        })
    }

    /// Audit trail of applied mutations.
    pub async fn get_audit_logs(&self) -> Result<Vec<crate::models::audit::AppLog>, WalletError> {
        self.audit.get_logs().await
    }
}
