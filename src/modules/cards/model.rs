use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use vaultdesk_cache::{QueryParams, ToQueryParams};
use vaultdesk_core::PageParams;
use vaultdesk_core::pagination::deserialize_optional_i64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardType {
    Debit,
    Credit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardStatus {
    Active,
    Blocked,
}

/// Stored card record. Exposed to clients as [`CardView`].
#[derive(Debug, Clone, PartialEq)]
pub struct Card {
    pub id: i64,
    pub user_id: i64,
    pub card_number: String,
    pub card_type: CardType,
    pub expiry_date: NaiveDate,
    pub status: CardStatus,
    pub pin_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Card as returned by the API: masked number, no PIN.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardView {
    pub card_id: i64,
    pub user_id: i64,
    pub card_number: String,
    pub card_type: CardType,
    pub expiry_date: NaiveDate,
    pub status: CardStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

pub fn mask_card_number(number: &str) -> String {
    let digits: Vec<char> = number.chars().filter(char::is_ascii_digit).collect();
    let last4: String = digits[digits.len().saturating_sub(4)..].iter().collect();
    format!("**** **** **** {last4}")
}

impl From<&Card> for CardView {
    fn from(card: &Card) -> Self {
        Self {
            card_id: card.id,
            user_id: card.user_id,
            card_number: mask_card_number(&card.card_number),
            card_type: card.card_type,
            expiry_date: card.expiry_date,
            status: card.status,
            created_at: card.created_at,
            updated_at: card.updated_at,
        }
    }
}

fn validate_pin(pin: &str) -> Result<(), ValidationError> {
    if pin.len() == 4 && pin.chars().all(|c| c.is_ascii_digit()) {
        Ok(())
    } else {
        Err(ValidationError::new("pin").with_message("pin must be exactly 4 digits".into()))
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateCardDto {
    pub card_type: Option<CardType>,
    pub expiry_date: Option<NaiveDate>,
    #[validate(custom(function = "validate_pin"))]
    pub pin: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CardFilterParams {
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub page: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub per_page: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub user_id: Option<i64>,
}

impl CardFilterParams {
    pub fn pagination(&self) -> PageParams {
        PageParams {
            page: self.page,
            per_page: self.per_page,
        }
    }
}

impl ToQueryParams for CardFilterParams {
    fn to_query_params(&self) -> QueryParams {
        let page = self.pagination();
        QueryParams::new()
            .with("page", page.page())
            .with("per_page", page.per_page())
            .with("user_id", self.user_id)
    }
}
