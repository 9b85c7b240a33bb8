pub mod connection;
pub mod entities;
pub mod repositories;
pub mod store;

pub use store::SqlGameStore;

use sea_orm::{DatabaseConnection, DbErr};

pub struct DatabaseManager {
    connection: DatabaseConnection,
}

impl DatabaseManager {
    /// Connect to `database_url` and run pending migrations.
    pub async fn connect(database_url: &str) -> Result<Self, DbErr> {
        let connection = connection::connect_and_migrate(database_url).await?;
        Ok(Self { connection })
    }

    pub fn get_connection(&self) -> &DatabaseConnection {
        &self.connection
    }

    pub fn store(&self) -> SqlGameStore {
        SqlGameStore::new(self.connection.clone())
    }
}
