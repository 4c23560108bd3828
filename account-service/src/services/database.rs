//! MongoDB adapters for the store seams.
//!
//! Two collections: `accounts` (unique on username and email) and
//! `confirmation_codes` (unique on email, so re-issuing a code replaces the
//! previous one in place).

use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use mongodb::bson::doc;
use mongodb::options::{
    FindOneAndReplaceOptions, FindOneAndUpdateOptions, IndexOptions, ReturnDocument,
};
use mongodb::{Client, Collection, IndexModel};

use crate::models::{Account, ConfirmationCode};
use crate::services::clock::truncate_subsec;
use crate::services::error::ServiceError;
use crate::services::store::{AccountStore, AccountUpdate, ConfirmationCodeStore};

#[derive(Clone)]
pub struct MongoDb {
    db: mongodb::Database,
}

impl MongoDb {
    pub async fn connect(uri: &str, database: &str) -> Result<Self, ServiceError> {
        let client = Client::with_uri_str(uri).await?;
        Ok(Self {
            db: client.database(database),
        })
    }

    pub fn accounts(&self) -> Collection<Account> {
        self.db.collection("accounts")
    }

    pub fn confirmation_codes(&self) -> Collection<ConfirmationCode> {
        self.db.collection("confirmation_codes")
    }

    /// Create the unique indexes the uniqueness invariants rely on.
    pub async fn initialize_indexes(&self) -> Result<(), ServiceError> {
        let unique = |keys| {
            IndexModel::builder()
                .keys(keys)
                .options(IndexOptions::builder().unique(true).build())
                .build()
        };

        self.accounts()
            .create_index(unique(doc! { "username": 1 }), None)
            .await?;
        self.accounts()
            .create_index(unique(doc! { "email": 1 }), None)
            .await?;
        self.accounts()
            .create_index(
                IndexModel::builder()
                    .keys(doc! { "reset_token_hash": 1 })
                    .build(),
                None,
            )
            .await?;
        self.confirmation_codes()
            .create_index(unique(doc! { "email": 1 }), None)
            .await?;

        Ok(())
    }
}

#[async_trait]
impl AccountStore for MongoDb {
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, ServiceError> {
        Ok(self.accounts().find_one(doc! { "email": email }, None).await?)
    }

    async fn find_by_reset_token(
        &self,
        token_hash: &str,
    ) -> Result<Option<Account>, ServiceError> {
        Ok(self
            .accounts()
            .find_one(doc! { "reset_token_hash": token_hash }, None)
            .await?)
    }

    async fn username_taken(&self, username: &str) -> Result<bool, ServiceError> {
        let count = self
            .accounts()
            .count_documents(doc! { "username": username }, None)
            .await?;
        Ok(count > 0)
    }

    async fn email_taken(&self, email: &str) -> Result<bool, ServiceError> {
        let count = self
            .accounts()
            .count_documents(doc! { "email": email }, None)
            .await?;
        Ok(count > 0)
    }

    async fn insert(&self, account: &Account) -> Result<(), ServiceError> {
        self.accounts().insert_one(account, None).await?;
        Ok(())
    }

    async fn update_by_id(
        &self,
        id: &str,
        update: AccountUpdate,
    ) -> Result<Option<Account>, ServiceError> {
        let mut set = doc! {};
        if let Some(status) = update.status {
            set.insert("status", status.as_str());
        }
        if let Some(password_hash) = update.password_hash {
            set.insert("password_hash", password_hash);
        }
        if let Some(reset_token_hash) = update.reset_token_hash {
            set.insert("reset_token_hash", reset_token_hash);
        }
        if let Some(issued_at) = update.reset_token_issued_at {
            // Same RFC 3339 representation serde writes for the model fields.
            set.insert(
                "reset_token_issued_at",
                issued_at.to_rfc3339_opts(SecondsFormat::Secs, true),
            );
        }
        if let Some(code_id) = update.confirmation_code_id {
            set.insert("confirmation_code_id", code_id);
        }

        let options = FindOneAndUpdateOptions::builder()
            .return_document(ReturnDocument::After)
            .build();

        Ok(self
            .accounts()
            .find_one_and_update(doc! { "_id": id }, doc! { "$set": set }, options)
            .await?)
    }

    async fn ping(&self) -> Result<(), ServiceError> {
        self.db.run_command(doc! { "ping": 1 }, None).await?;
        Ok(())
    }
}

#[async_trait]
impl ConfirmationCodeStore for MongoDb {
    async fn find_by_email(&self, email: &str) -> Result<Option<ConfirmationCode>, ServiceError> {
        Ok(self
            .confirmation_codes()
            .find_one(doc! { "email": email }, None)
            .await?)
    }

    async fn store_for_email(&self, code: &str, email: &str) -> Result<(), ServiceError> {
        let record = ConfirmationCode::new(
            code.to_string(),
            email.to_string(),
            truncate_subsec(Utc::now()),
        );

        // Upsert keyed by email: a re-issued code replaces the previous one.
        let options = FindOneAndReplaceOptions::builder().upsert(true).build();
        self.confirmation_codes()
            .find_one_and_replace(doc! { "email": email }, &record, options)
            .await?;

        // Keep the back-reference on the account in step with the live code.
        self.accounts()
            .update_one(
                doc! { "email": email },
                doc! { "$set": { "confirmation_code_id": &record.id } },
                None,
            )
            .await?;

        Ok(())
    }
}
