use sistema911_model::{BankAccount, BankAccountUpdate, NewBankAccount};

use super::{check, ApiClient};
use crate::endpoints::{self, BANK_ACCOUNTS};
use crate::error::ApiError;
use crate::transport::Method;

impl ApiClient {
    pub async fn get_bank_accounts(&self) -> Result<Vec<BankAccount>, ApiError> {
        self.get_list(BANK_ACCOUNTS).await
    }

    pub async fn get_bank_account(&self, id: &str) -> Result<BankAccount, ApiError> {
        self.get_one(&endpoints::item(BANK_ACCOUNTS, id)).await
    }

    pub async fn create_bank_account(&self, input: &NewBankAccount) -> Result<BankAccount, ApiError> {
        check(input.validate())?;
        self.send(Method::Post, BANK_ACCOUNTS, input).await
    }

    pub async fn update_bank_account(
        &self,
        id: &str,
        update: &BankAccountUpdate,
    ) -> Result<BankAccount, ApiError> {
        check(update.validate())?;
        self.send(Method::Put, &endpoints::item(BANK_ACCOUNTS, id), update)
            .await
    }

    pub async fn delete_bank_account(&self, id: &str) -> Result<(), ApiError> {
        self.delete_at(&endpoints::item(BANK_ACCOUNTS, id)).await
    }
}
