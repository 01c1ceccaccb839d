use sea_orm_migration::prelude::*;

mod m20240101_000001_init;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![Box::new(m20240101_000001_init::Migration)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm_migration::sea_orm::{ConnectOptions, Database};

    #[tokio::test]
    async fn applies_and_reverts_on_sqlite() {
        let mut opt = ConnectOptions::new("sqlite::memory:".to_owned());
        opt.max_connections(1);
        let db = Database::connect(opt).await.unwrap();
        Migrator::up(&db, None).await.unwrap();
        let manager = SchemaManager::new(&db);
        assert!(manager.has_table("venue").await.unwrap());
        assert!(manager.has_table("artist").await.unwrap());
        assert!(manager.has_table("show").await.unwrap());

        Migrator::down(&db, None).await.unwrap();
        assert!(!manager.has_table("show").await.unwrap());
    }
}
