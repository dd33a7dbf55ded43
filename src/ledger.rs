//! In-memory system of record.
//!
//! Holds every admin, customer, card, loan, deposit and transaction behind a
//! single `tokio::sync::RwLock`. Services take a read guard for queries and a
//! write guard for mutations, so each mutation is atomic with respect to
//! every other request.

use std::collections::BTreeMap;
use std::sync::Arc;

use tokio::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::modules::admins::model::Admin;
use crate::modules::cards::model::Card;
use crate::modules::deposits::model::Deposit;
use crate::modules::loans::model::Loan;
use crate::modules::transactions::model::Transaction;
use crate::modules::users::model::User;

/// Monotonic id sequence. Ids are never reused after a delete.
#[derive(Debug, Default)]
pub struct Sequence(i64);

impl Sequence {
    pub fn next(&mut self) -> i64 {
        self.0 += 1;
        self.0
    }
}

#[derive(Debug, Default)]
pub struct Tables {
    pub admins: BTreeMap<i64, Admin>,
    pub users: BTreeMap<i64, User>,
    pub deposits: BTreeMap<i64, Deposit>,
    pub loans: BTreeMap<i64, Loan>,
    pub cards: BTreeMap<i64, Card>,
    pub transactions: BTreeMap<i64, Transaction>,
    pub admin_ids: Sequence,
    pub user_ids: Sequence,
    pub deposit_ids: Sequence,
    pub loan_ids: Sequence,
    pub card_ids: Sequence,
    pub transaction_ids: Sequence,
}

impl Tables {
    pub fn username_of(&self, user_id: i64) -> Option<&str> {
        self.users.get(&user_id).map(|u| u.username.as_str())
    }

    pub fn admin_by_username(&self, username: &str) -> Option<&Admin> {
        self.admins.values().find(|a| a.username == username)
    }

    pub fn admin_exists_with(&self, username: &str, email: &str, except: Option<i64>) -> bool {
        self.admins
            .values()
            .filter(|a| Some(a.id) != except)
            .any(|a| a.username == username || a.email.eq_ignore_ascii_case(email))
    }

    pub fn insert_admin(&mut self, mut admin: Admin) -> Admin {
        admin.id = self.admin_ids.next();
        self.admins.insert(admin.id, admin.clone());
        admin
    }

    pub fn insert_user(&mut self, mut user: User) -> User {
        user.id = self.user_ids.next();
        self.users.insert(user.id, user.clone());
        user
    }

    pub fn insert_deposit(&mut self, mut deposit: Deposit) -> Deposit {
        deposit.id = self.deposit_ids.next();
        self.deposits.insert(deposit.id, deposit.clone());
        deposit
    }

    pub fn insert_loan(&mut self, mut loan: Loan) -> Loan {
        loan.id = self.loan_ids.next();
        self.loans.insert(loan.id, loan.clone());
        loan
    }

    pub fn insert_card(&mut self, mut card: Card) -> Card {
        card.id = self.card_ids.next();
        self.cards.insert(card.id, card.clone());
        card
    }

    pub fn insert_transaction(&mut self, mut transaction: Transaction) -> Transaction {
        transaction.id = self.transaction_ids.next();
        self.transactions.insert(transaction.id, transaction.clone());
        transaction
    }
}

/// Shared handle to the [`Tables`].
#[derive(Clone, Debug, Default)]
pub struct Ledger {
    tables: Arc<RwLock<Tables>>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn read(&self) -> RwLockReadGuard<'_, Tables> {
        self.tables.read().await
    }

    pub async fn write(&self) -> RwLockWriteGuard<'_, Tables> {
        self.tables.write().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::fixtures;

    #[test]
    fn test_sequence_never_reuses_ids() {
        let mut seq = Sequence::default();
        assert_eq!(seq.next(), 1);
        assert_eq!(seq.next(), 2);
    }

    #[tokio::test]
    async fn test_insert_assigns_ids() {
        let ledger = Ledger::new();
        let mut tables = ledger.write().await;
        let first = tables.insert_user(fixtures::user("ada"));
        let second = tables.insert_user(fixtures::user("grace"));
        tables.users.remove(&second.id);
        let third = tables.insert_user(fixtures::user("linus"));

        assert_eq!(first.id, 1);
        assert_eq!(third.id, 3);
        assert_eq!(tables.username_of(first.id), Some("ada"));
        assert_eq!(tables.username_of(second.id), None);
    }

    #[tokio::test]
    async fn test_admin_uniqueness_check() {
        let ledger = Ledger::new();
        let mut tables = ledger.write().await;
        let admin = tables.insert_admin(fixtures::admin("root", vaultdesk_core::AdminRole::SuperAdmin));

        assert!(tables.admin_exists_with("root", "other@example.com", None));
        assert!(tables.admin_exists_with("other", "ROOT@example.com", None));
        assert!(!tables.admin_exists_with("root", "root@example.com", Some(admin.id)));
    }
}
