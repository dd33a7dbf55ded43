//! Cache namespaces of the admin API and the invalidation plan of each mutation.
//!
//! Read routes pick their namespace here; mutations pick their plan from
//! [`invalidate`]. Keeping both sides in one file makes it easy to check that
//! every cached namespace has a mutation that clears it.

/// Namespaces for admin accounts.
pub mod admins {
    pub const LIST: &str = "admins";

    pub fn by_id(admin_id: i64) -> String {
        format!("admin:{admin_id}")
    }
}

/// Namespaces for customer accounts.
pub mod users {
    pub const LIST: &str = "users";

    pub fn by_id(user_id: i64) -> String {
        format!("user:{user_id}")
    }

    pub fn deposits(user_id: i64) -> String {
        format!("user_deposits:{user_id}")
    }
}

/// Namespaces for loans.
pub mod loans {
    pub const LIST: &str = "loans";

    pub fn by_id(loan_id: i64) -> String {
        format!("loan:{loan_id}")
    }
}

/// Namespaces for cards.
pub mod cards {
    pub const LIST: &str = "cards";

    pub fn by_id(card_id: i64) -> String {
        format!("card:{card_id}")
    }
}

/// Namespaces for transactions.
pub mod transactions {
    pub const LIST: &str = "transactions";
    /// Parent of every per-transaction detail namespace.
    pub const DETAILS: &str = "transaction";

    pub fn by_id(transaction_id: i64) -> String {
        format!("{DETAILS}:{transaction_id}")
    }
}

pub mod analytics {
    pub const SUMMARY: &str = "analytics:summary";
}

/// Invalidation plans, one per mutation.
pub mod invalidate {
    use super::{admins, analytics, cards, loans, transactions, users};
    use crate::invalidation::Invalidation;

    pub fn admin_registered() -> Vec<Invalidation> {
        vec![Invalidation::namespace(admins::LIST)]
    }

    /// Self-update, update by another admin, and deletion.
    pub fn admin_changed(admin_id: i64) -> Vec<Invalidation> {
        vec![
            Invalidation::namespace(admins::by_id(admin_id)),
            Invalidation::namespace(admins::LIST),
        ]
    }

    /// Update and status toggle.
    pub fn user_changed(user_id: i64) -> Vec<Invalidation> {
        vec![
            Invalidation::namespace(users::by_id(user_id)),
            Invalidation::namespace(users::LIST),
            Invalidation::namespace(analytics::SUMMARY),
        ]
    }

    /// Deletion drops the user's deposits from every transaction view, and
    /// detail responses embed the owner's username.
    pub fn user_deleted(user_id: i64) -> Vec<Invalidation> {
        vec![
            Invalidation::namespace(users::by_id(user_id)),
            Invalidation::namespace(users::LIST),
            Invalidation::namespace(users::deposits(user_id)),
            Invalidation::namespace(transactions::LIST),
            Invalidation::tree(transactions::DETAILS),
            Invalidation::namespace(analytics::SUMMARY),
        ]
    }

    pub fn deposit_created(user_id: i64) -> Vec<Invalidation> {
        vec![
            Invalidation::namespace(users::by_id(user_id)),
            Invalidation::namespace(users::LIST),
            Invalidation::namespace(users::deposits(user_id)),
            Invalidation::namespace(transactions::LIST),
            Invalidation::namespace(analytics::SUMMARY),
        ]
    }

    /// Approval and rejection.
    pub fn loan_decided(loan_id: i64) -> Vec<Invalidation> {
        vec![
            Invalidation::namespace(loans::by_id(loan_id)),
            Invalidation::namespace(loans::LIST),
            Invalidation::namespace(analytics::SUMMARY),
        ]
    }

    /// Block, unblock and limit/expiry updates.
    pub fn card_changed(card_id: i64) -> Vec<Invalidation> {
        vec![
            Invalidation::namespace(cards::by_id(card_id)),
            Invalidation::namespace(cards::LIST),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::invalidation::{Invalidation, Target};
    use crate::keys::{KeyDeriver, QueryParams};

    fn prefixes(plan: &[Invalidation], keys: &KeyDeriver) -> Vec<String> {
        plan.iter()
            .flat_map(|inv| inv.targets(keys))
            .map(|target| match target {
                Target::Exact(key) | Target::Prefix(key) => key,
            })
            .collect()
    }

    #[test]
    fn test_entity_namespaces() {
        assert_eq!(admins::by_id(42), "admin:42");
        assert_eq!(users::by_id(3), "user:3");
        assert_eq!(users::deposits(3), "user_deposits:3");
        assert_eq!(loans::by_id(8), "loan:8");
        assert_eq!(cards::by_id(5), "card:5");
        assert_eq!(transactions::by_id(11), "transaction:11");
    }

    #[test]
    fn test_admin_changed_targets_detail_and_listing() {
        let keys = KeyDeriver::new("app");
        assert_eq!(
            prefixes(&invalidate::admin_changed(42), &keys),
            vec!["app:admin:42|".to_string(), "app:admins|".to_string()]
        );
    }

    #[test]
    fn test_user_changed_does_not_touch_other_users() {
        let keys = KeyDeriver::new("app");
        let plan = prefixes(&invalidate::user_changed(4), &keys);
        let other = keys.derive(&users::by_id(42), None, &QueryParams::new());
        assert!(plan.iter().all(|p| !other.as_str().starts_with(p.as_str())));
    }

    #[test]
    fn test_deposit_created_covers_dependent_views() {
        let keys = KeyDeriver::new("app");
        let plan = prefixes(&invalidate::deposit_created(9), &keys);
        for ns in [
            users::by_id(9),
            users::LIST.to_string(),
            users::deposits(9),
            transactions::LIST.to_string(),
            analytics::SUMMARY.to_string(),
        ] {
            let key = keys.derive(&ns, Some(1), &QueryParams::new().with("page", 1));
            assert!(
                plan.iter().any(|p| key.as_str().starts_with(p.as_str())),
                "{ns} not invalidated"
            );
        }
    }

    #[test]
    fn test_user_deleted_covers_deposits_and_transaction_views() {
        let keys = KeyDeriver::new("app");
        let plan = prefixes(&invalidate::user_deleted(9), &keys);
        let params = QueryParams::new().with("page", 1);
        for key in [
            keys.derive(&users::by_id(9), Some(1), &QueryParams::new()),
            keys.derive(users::LIST, Some(1), &params),
            keys.derive(&users::deposits(9), Some(2), &params),
            keys.derive(transactions::LIST, Some(1), &params),
            keys.derive(&transactions::by_id(11), Some(1), &QueryParams::new()),
            keys.derive(&transactions::by_id(250), None, &QueryParams::new()),
            keys.derive(analytics::SUMMARY, Some(1), &QueryParams::new()),
        ] {
            assert!(
                plan.iter().any(|p| key.as_str().starts_with(p.as_str())),
                "{} not invalidated",
                key.as_str()
            );
        }

        let other = keys.derive(&users::deposits(90), Some(1), &params);
        assert!(plan.iter().all(|p| !other.as_str().starts_with(p.as_str())));
    }

    #[test]
    fn test_loan_and_card_plans() {
        let keys = KeyDeriver::new("app");
        assert_eq!(
            prefixes(&invalidate::loan_decided(8), &keys),
            vec![
                "app:loan:8|".to_string(),
                "app:loans|".to_string(),
                "app:analytics:summary|".to_string(),
            ]
        );
        assert_eq!(
            prefixes(&invalidate::card_changed(5), &keys),
            vec!["app:card:5|".to_string(), "app:cards|".to_string()]
        );
        assert_eq!(
            prefixes(&invalidate::admin_registered(), &keys),
            vec!["app:admins|".to_string()]
        );
    }
}
