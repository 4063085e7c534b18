pub mod collection;
#[cfg(test)]
pub mod memory;
pub mod store;

pub use collection::MongoCollection;
pub use store::DocumentStore;

use crate::config::AppConfig;
use crate::models::ModelRegistry;
use mongodb::bson::Document;
use mongodb::{Client, Collection, Database};
use std::error::Error;
use std::sync::Arc;
use std::time::Duration;

#[derive(Clone)]
pub struct MongoDB {
    db: Database,
}

impl MongoDB {
    pub async fn new(config: &AppConfig) -> Result<Self, Box<dyn Error>> {
        let mut client_options = mongodb::options::ClientOptions::parse(&config.mongodb_uri).await?;

        client_options.app_name = Some("itinerary-service".to_string());
        client_options.max_pool_size = Some(20);
        client_options.min_pool_size = Some(2);
        client_options.max_idle_time = Some(Duration::from_secs(300));
        client_options.connect_timeout = Some(Duration::from_secs(5));
        client_options.server_selection_timeout = Some(Duration::from_secs(5));

        let client = Client::with_options(client_options)?;
        let db = client.database(&config.database_name);

        // Test connection
        db.list_collection_names().await?;

        let mongodb = Self { db };
        mongodb.ensure_indexes(config).await?;

        Ok(mongodb)
    }

    async fn ensure_indexes(&self, config: &AppConfig) -> Result<(), Box<dyn Error>> {
        use mongodb::bson::doc;
        use mongodb::options::IndexOptions;
        use mongodb::IndexModel;

        log::info!("🔧 Creating database indexes...");

        let users = self.collection::<Document>(&config.users_collection);
        let email_index = IndexModel::builder()
            .keys(doc! { "Email": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();

        match users.create_index(email_index).await {
            Ok(_) => log::info!("   ✅ Index created: {}(Email)", config.users_collection),
            Err(e) => log::debug!("   ℹ️  Index already exists: {}", e),
        }

        log::info!("✅ Database indexes ready");

        Ok(())
    }

    pub fn collection<T: Send + Sync>(&self, name: &str) -> Collection<T> {
        self.db.collection(name)
    }

    /// Model-aware wrapper over the named collection.
    pub fn mongo_collection(&self, name: &str, registry: Arc<ModelRegistry>) -> MongoCollection {
        MongoCollection::new(
            self.db.name(),
            name,
            Arc::new(self.collection::<Document>(name)),
            registry,
        )
    }
}
