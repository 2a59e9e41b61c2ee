use async_trait::async_trait;
use chrono::Utc;
use futures_util::StreamExt;
use mongodb::{
    bson::{doc, oid::ObjectId},
    options::UpdateOptions,
    Database,
};
use parking_lot::RwLock;

use crate::{
    error::GatewayError,
    models::{PushSubscription, SubscriptionKeys},
};

/// Push subscriptions, unique per (user, endpoint).
#[async_trait]
pub trait SubscriptionRepo: Send + Sync {
    /// Inserts, or refreshes the keys of an existing (user, endpoint) pair.
    async fn upsert(&self, user_id: ObjectId, endpoint: &str, keys: SubscriptionKeys) -> Result<(), GatewayError>;
    /// Returns how many subscriptions were removed.
    async fn remove(&self, user_id: ObjectId, endpoint: &str) -> Result<u64, GatewayError>;
    async fn list_for_user(&self, user_id: ObjectId) -> Result<Vec<PushSubscription>, GatewayError>;
    async fn delete(&self, id: ObjectId) -> Result<(), GatewayError>;
}

pub struct MongoSubscriptionRepo {
    db: Database,
}

impl MongoSubscriptionRepo {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    fn collection(&self) -> mongodb::Collection<PushSubscription> {
        self.db.collection::<PushSubscription>("push_subscriptions")
    }
}

#[async_trait]
impl SubscriptionRepo for MongoSubscriptionRepo {
    async fn upsert(&self, user_id: ObjectId, endpoint: &str, keys: SubscriptionKeys) -> Result<(), GatewayError> {
        let opts = UpdateOptions::builder().upsert(true).build();

        self.collection()
            .update_one(
                doc! { "user_id": user_id, "endpoint": endpoint },
                doc! {
                    "$set": { "keys": { "p256dh": &keys.p256dh, "auth": &keys.auth } },
                    "$setOnInsert": { "created_at": Utc::now().timestamp() },
                },
                opts,
            )
            .await?;

        Ok(())
    }

    async fn remove(&self, user_id: ObjectId, endpoint: &str) -> Result<u64, GatewayError> {
        let res = self
            .collection()
            .delete_many(doc! { "user_id": user_id, "endpoint": endpoint }, None)
            .await?;

        Ok(res.deleted_count)
    }

    async fn list_for_user(&self, user_id: ObjectId) -> Result<Vec<PushSubscription>, GatewayError> {
        let mut cursor = self
            .collection()
            .find(doc! { "user_id": user_id }, None)
            .await?;

        let mut items = Vec::new();
        while let Some(res) = cursor.next().await {
            items.push(res?);
        }

        Ok(items)
    }

    async fn delete(&self, id: ObjectId) -> Result<(), GatewayError> {
        self.collection().delete_one(doc! { "_id": id }, None).await?;
        Ok(())
    }
}

#[derive(Default)]
pub struct MemorySubscriptionRepo {
    items: RwLock<Vec<PushSubscription>>,
}

impl MemorySubscriptionRepo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn all(&self) -> Vec<PushSubscription> {
        self.items.read().clone()
    }
}

#[async_trait]
impl SubscriptionRepo for MemorySubscriptionRepo {
    async fn upsert(&self, user_id: ObjectId, endpoint: &str, keys: SubscriptionKeys) -> Result<(), GatewayError> {
        let mut items = self.items.write();

        match items
            .iter_mut()
            .find(|s| s.user_id == user_id && s.endpoint == endpoint)
        {
            Some(existing) => existing.keys = keys,
            None => items.push(PushSubscription {
                id: ObjectId::new(),
                user_id,
                endpoint: endpoint.to_string(),
                keys,
                created_at: Utc::now().timestamp(),
            }),
        }

        Ok(())
    }

    async fn remove(&self, user_id: ObjectId, endpoint: &str) -> Result<u64, GatewayError> {
        let mut items = self.items.write();
        let before = items.len();
        items.retain(|s| !(s.user_id == user_id && s.endpoint == endpoint));
        Ok((before - items.len()) as u64)
    }

    async fn list_for_user(&self, user_id: ObjectId) -> Result<Vec<PushSubscription>, GatewayError> {
        Ok(self
            .items
            .read()
            .iter()
            .filter(|s| s.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn delete(&self, id: ObjectId) -> Result<(), GatewayError> {
        self.items.write().retain(|s| s.id != id);
        Ok(())
    }
}
