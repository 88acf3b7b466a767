//! SeaORM-backed persistence gateway (SQLite file or Postgres).

use async_trait::async_trait;
use sea_orm::{
    ColumnTrait, ConnectOptions, ConnectionTrait, Database, DatabaseConnection,
    DbErr, EntityTrait, QueryFilter, Schema, Set, SqlErr,
};
use sea_orm::sea_query::OnConflict;

use common::DatabaseConfig;
use domain::{App, User};

use super::entities::admin::{self, Entity as AdminEntity};
use super::entities::app::{self, Entity as AppEntity};
use super::entities::user::{self, Entity as UserEntity};
use super::{AppProvider, StorageError, StorageResult, UserProvider, UserSaver};

/// Relational storage for users, apps and admin grants.
#[derive(Clone)]
pub struct SqlStorage {
    db: DatabaseConnection,
}

impl SqlStorage {
    /// Wrap an existing connection.
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Open a connection pool and make sure the tables exist.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, DbErr> {
        let mut options = ConnectOptions::new(config.url.clone());
        options
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .sqlx_logging(false);

        let db = Database::connect(options).await?;
        let storage = Self::new(db);
        storage.ensure_schema().await?;
        tracing::info!("Database connected and schema ensured");

        Ok(storage)
    }

    /// Create the tables from the entity definitions when they are missing.
    /// Existing tables are left untouched.
    pub async fn ensure_schema(&self) -> Result<(), DbErr> {
        let backend = self.db.get_database_backend();
        let schema = Schema::new(backend);

        let mut statements = [
            schema.create_table_from_entity(UserEntity),
            schema.create_table_from_entity(AppEntity),
            schema.create_table_from_entity(AdminEntity),
        ];
        for statement in statements.iter_mut() {
            statement.if_not_exists();
            self.db.execute(backend.build(&*statement)).await?;
        }

        Ok(())
    }

    /// Get a reference to the database connection.
    pub fn connection(&self) -> &DatabaseConnection {
        &self.db
    }

    /// Register a new application. Fails with `AppExists` on a taken name.
    pub async fn save_app(&self, name: &str, secret: &[u8]) -> StorageResult<i32> {
        let active_model = app::ActiveModel {
            name: Set(name.to_string()),
            secret: Set(secret.to_vec()),
            ..Default::default()
        };

        match AppEntity::insert(active_model).exec(&self.db).await {
            Ok(result) => Ok(result.last_insert_id),
            Err(e) if is_unique_violation(&e) => Err(StorageError::AppExists),
            Err(e) => Err(StorageError::Database(e)),
        }
    }

    /// Grant admin rights to an existing user. Granting twice is a no-op.
    pub async fn grant_admin(&self, user_id: i64) -> StorageResult<()> {
        self.find_user_by_id(user_id).await?;

        let grant = admin::ActiveModel {
            user_id: Set(user_id),
        };

        // A concurrent grant for the same user leaves zero rows inserted
        AdminEntity::insert(grant)
            .on_conflict(
                OnConflict::column(admin::Column::UserId)
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await?;

        Ok(())
    }

    async fn find_user_by_id(&self, user_id: i64) -> StorageResult<user::Model> {
        UserEntity::find_by_id(user_id)
            .one(&self.db)
            .await?
            .ok_or(StorageError::UserNotFound)
    }
}

fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}

#[async_trait]
impl UserSaver for SqlStorage {
    async fn save_user(&self, email: &str, pass_hash: &[u8]) -> StorageResult<i64> {
        let active_model = user::ActiveModel {
            email: Set(email.to_string()),
            pass_hash: Set(pass_hash.to_vec()),
            ..Default::default()
        };

        match UserEntity::insert(active_model).exec(&self.db).await {
            Ok(result) => Ok(result.last_insert_id),
            Err(e) if is_unique_violation(&e) => Err(StorageError::UserExists),
            Err(e) => Err(StorageError::Database(e)),
        }
    }
}

#[async_trait]
impl UserProvider for SqlStorage {
    async fn user(&self, email: &str) -> StorageResult<User> {
        UserEntity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await?
            .map(User::from)
            .ok_or(StorageError::UserNotFound)
    }

    async fn is_admin(&self, user_id: i64) -> StorageResult<bool> {
        self.find_user_by_id(user_id).await?;

        let grant = AdminEntity::find_by_id(user_id).one(&self.db).await?;
        Ok(grant.is_some())
    }
}

#[async_trait]
impl AppProvider for SqlStorage {
    async fn app(&self, app_id: i32) -> StorageResult<App> {
        AppEntity::find_by_id(app_id)
            .one(&self.db)
            .await?
            .map(App::from)
            .ok_or(StorageError::AppNotFound)
    }
}
