use anyhow::anyhow;
use chrono::Utc;

use vaultdesk_auth::hash_password;
use vaultdesk_core::{AppError, PaginatedResponse};

use crate::ledger::Ledger;
use crate::modules::cards::model::{CardFilterParams, CardStatus, CardView, UpdateCardDto};

fn card_not_found() -> AppError {
    AppError::not_found(anyhow!("Card not found"))
}

pub struct CardService;

impl CardService {
    pub async fn list_cards(
        ledger: &Ledger,
        filters: &CardFilterParams,
    ) -> Result<PaginatedResponse<CardView>, AppError> {
        let tables = ledger.read().await;
        let cards: Vec<CardView> = tables
            .cards
            .values()
            .filter(|c| filters.user_id.is_none_or(|id| c.user_id == id))
            .map(CardView::from)
            .collect();

        let page = filters.pagination();
        Ok(PaginatedResponse::new(
            "Cards retrieved successfully",
            page.slice(&cards),
            page.page(),
            page.per_page(),
            cards.len() as i64,
        ))
    }

    pub async fn get_card(ledger: &Ledger, card_id: i64) -> Result<CardView, AppError> {
        ledger
            .read()
            .await
            .cards
            .get(&card_id)
            .map(CardView::from)
            .ok_or_else(card_not_found)
    }

    pub async fn set_status(
        ledger: &Ledger,
        card_id: i64,
        status: CardStatus,
    ) -> Result<CardView, AppError> {
        let mut tables = ledger.write().await;
        let card = tables.cards.get_mut(&card_id).ok_or_else(card_not_found)?;

        if card.status == status {
            let message = match status {
                CardStatus::Blocked => "Card is already blocked",
                CardStatus::Active => "Card is not blocked",
            };
            return Err(AppError::bad_request(anyhow!(message)));
        }

        card.status = status;
        card.updated_at = Utc::now();
        Ok(CardView::from(&*card))
    }

    pub async fn update_card(
        ledger: &Ledger,
        card_id: i64,
        dto: UpdateCardDto,
        cost: u32,
    ) -> Result<CardView, AppError> {
        if !ledger.read().await.cards.contains_key(&card_id) {
            return Err(card_not_found());
        }

        let pin_hash = dto
            .pin
            .as_deref()
            .map(|pin| hash_password(pin, cost))
            .transpose()?;

        let mut tables = ledger.write().await;
        let card = tables.cards.get_mut(&card_id).ok_or_else(card_not_found)?;
        if let Some(card_type) = dto.card_type {
            card.card_type = card_type;
        }
        if let Some(expiry_date) = dto.expiry_date {
            card.expiry_date = expiry_date;
        }
        if let Some(pin_hash) = pin_hash {
            card.pin_hash = pin_hash;
        }
        card.updated_at = Utc::now();
        Ok(CardView::from(&*card))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use vaultdesk_auth::verify_password;

    use crate::modules::cards::model::CardType;
    use crate::testing::fixtures;

    async fn ledger_with_card() -> (Ledger, i64) {
        let ledger = Ledger::new();
        let card_id = {
            let mut tables = ledger.write().await;
            let user = tables.insert_user(fixtures::user("ada"));
            tables.insert_card(fixtures::card(user.id)).id
        };
        (ledger, card_id)
    }

    #[tokio::test]
    async fn test_block_and_unblock() {
        let (ledger, card_id) = ledger_with_card().await;

        let card = CardService::set_status(&ledger, card_id, CardStatus::Blocked)
            .await
            .unwrap();
        assert_eq!(card.status, CardStatus::Blocked);

        let err = CardService::set_status(&ledger, card_id, CardStatus::Blocked)
            .await
            .unwrap_err();
        assert_eq!(err.error.to_string(), "Card is already blocked");

        CardService::set_status(&ledger, card_id, CardStatus::Active)
            .await
            .unwrap();
        let err = CardService::set_status(&ledger, card_id, CardStatus::Active)
            .await
            .unwrap_err();
        assert_eq!(err.error.to_string(), "Card is not blocked");
    }

    #[tokio::test]
    async fn test_update_hashes_pin() {
        let (ledger, card_id) = ledger_with_card().await;
        let dto = UpdateCardDto {
            card_type: Some(CardType::Credit),
            expiry_date: None,
            pin: Some("9876".to_string()),
        };
        let view = CardService::update_card(&ledger, card_id, dto, 4).await.unwrap();
        assert_eq!(view.card_type, CardType::Credit);

        let tables = ledger.read().await;
        assert!(verify_password("9876", &tables.cards[&card_id].pin_hash));
    }

    #[tokio::test]
    async fn test_views_are_masked() {
        let (ledger, card_id) = ledger_with_card().await;
        let view = CardService::get_card(&ledger, card_id).await.unwrap();
        assert!(view.card_number.starts_with("**** "));

        let err = CardService::get_card(&ledger, 404).await.unwrap_err();
        assert_eq!(err.status, StatusCode::NOT_FOUND);
    }
}
