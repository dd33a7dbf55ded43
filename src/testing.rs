//! Fixtures and an in-process application for tests.
//!
//! Compiled for unit tests and, through the `test-utils` feature, for the
//! integration tests under `tests/`.

use axum::Router;
use vaultdesk_auth::create_access_token;
use vaultdesk_cache::ResponseCache;
use vaultdesk_config::{CorsConfig, RateLimitConfig};
use vaultdesk_core::AdminRole;

use crate::ledger::Ledger;
use crate::modules::admins::model::Admin;
use crate::router::init_router;
use crate::state::AppState;

/// Lowest cost bcrypt accepts.
pub const TEST_BCRYPT_COST: u32 = 4;

pub mod fixtures {
    use chrono::{Days, Utc};
    use vaultdesk_auth::hash_password;
    use vaultdesk_config::JwtConfig;
    use vaultdesk_core::AdminRole;

    use super::TEST_BCRYPT_COST;
    use crate::modules::admins::model::Admin;
    use crate::modules::cards::model::{Card, CardStatus, CardType};
    use crate::modules::loans::model::{Loan, LoanStatus};
    use crate::modules::transactions::model::{Transaction, TransactionStatus, TransactionType};
    use crate::modules::users::model::{AccountType, User};

    /// Password of every fixture admin.
    pub const PASSWORD: &str = "correct-horse-battery";

    pub fn jwt_config() -> JwtConfig {
        JwtConfig {
            secret: "test-secret-key-at-least-32-characters-long".to_string(),
            access_token_expiry: 3600,
            refresh_token_expiry: 604800,
        }
    }

    pub fn admin(name: &str, role: AdminRole) -> Admin {
        let now = Utc::now();
        Admin {
            id: 0,
            username: name.to_string(),
            email: format!("{name}@example.com"),
            password_hash: hash_password(PASSWORD, TEST_BCRYPT_COST).expect("hash fixture password"),
            role,
            created_at: now,
            updated_at: now,
        }
    }

    /// Active savings customer holding 1000.00.
    pub fn user(name: &str) -> User {
        let now = Utc::now();
        User {
            id: 0,
            username: name.to_string(),
            email: format!("{name}@example.com"),
            full_name: format!("{name} Example"),
            account_type: AccountType::Savings,
            balance: 1000.0,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    /// Pending one-year loan.
    pub fn loan(user_id: i64, amount: f64) -> Loan {
        let now = Utc::now();
        Loan {
            id: 0,
            user_id,
            loan_type_id: 1,
            loan_amount: amount,
            interest_rate: 5.0,
            monthly_installment: (amount * 1.05 / 12.0 * 100.0).round() / 100.0,
            due_date: now.date_naive() + Days::new(365),
            status: LoanStatus::Pending,
            decided_by: None,
            decided_at: None,
            created_at: now,
        }
    }

    pub fn card(user_id: i64) -> Card {
        let now = Utc::now();
        Card {
            id: 0,
            user_id,
            card_number: "4111111111111234".to_string(),
            card_type: CardType::Debit,
            expiry_date: now.date_naive() + Days::new(3 * 365),
            status: CardStatus::Active,
            pin_hash: String::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn transaction(user_id: i64, amount: f64, transaction_type: TransactionType) -> Transaction {
        Transaction {
            id: 0,
            user_id,
            receiver_id: None,
            amount,
            transaction_type,
            status: TransactionStatus::Completed,
            created_at: Utc::now(),
        }
    }
}

/// Application state backed by an empty ledger and an in-memory cache.
pub struct TestApp {
    pub state: AppState,
}

impl Default for TestApp {
    fn default() -> Self {
        Self::new()
    }
}

impl TestApp {
    /// Rate limiting is off; see [`TestApp::with_rate_limits`].
    pub fn new() -> Self {
        Self::with_rate_limits(RateLimitConfig::disabled())
    }

    pub fn with_rate_limits(rate_limit_config: RateLimitConfig) -> Self {
        Self {
            state: AppState {
                ledger: Ledger::new(),
                cache: ResponseCache::in_memory(),
                jwt_config: fixtures::jwt_config(),
                cors_config: CorsConfig::default(),
                rate_limit_config,
                password_cost: TEST_BCRYPT_COST,
            },
        }
    }

    pub fn router(&self) -> Router {
        init_router(self.state.clone())
    }

    /// Inserts an admin whose password is [`fixtures::PASSWORD`].
    pub async fn seed_admin(&self, name: &str, role: AdminRole) -> Admin {
        self.state
            .ledger
            .write()
            .await
            .insert_admin(fixtures::admin(name, role))
    }

    pub fn token_for(&self, admin: &Admin) -> String {
        create_access_token(admin.id, &admin.username, admin.role, &self.state.jwt_config)
            .expect("sign test token")
    }
}
