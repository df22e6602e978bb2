use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use async_trait::async_trait;
use chrono::NaiveDateTime;
use sqlx::{Pool, Postgres};
use sqlx::postgres::PgPoolOptions;
use crate::domain::{Counter, CounterError};
use super::{CounterStorage, Datastore, StorageResult};

const NAME: &str = "postgresql";

pub const DEFAULT_MAX_CONNECTIONS: u32 = 10;

const READ_TIMEOUT: Duration = Duration::from_secs(5);
const WRITE_TIMEOUT: Duration = Duration::from_secs(10);
const CLOSE_TIMEOUT: Duration = Duration::from_secs(5);

// duplicate_table, and unique_violation on pg_type when two sessions race to create it
const TABLE_RACE_CODES: [&str; 2] = ["42P07", "23505"];
const NUMERIC_OUT_OF_RANGE_CODE: &str = "22003";

const TABLE_EXISTENCE_QUERY: &str = "SELECT EXISTS (
        SELECT FROM information_schema.tables
        WHERE table_schema = $1 AND table_name = $2
    )";
const TABLE_CREATION_STATEMENT: &str = "CREATE TABLE counter (
        uuid varchar(36) PRIMARY KEY,
        name varchar(64) NOT NULL,
        count integer NOT NULL,
        date timestamp NOT NULL DEFAULT CURRENT_TIMESTAMP
    )";

pub struct PostgresDatastore {
    max_connections: u32,
}

impl PostgresDatastore {
    pub fn new(max_connections: u32) -> Self {
        Self { max_connections }
    }

    async fn connect(&self, params: &str) -> StorageResult<Pool<Postgres>> {
        let pool = PgPoolOptions::new()
            .max_connections(self.max_connections)
            .acquire_timeout(READ_TIMEOUT)
            .connect(params);
        with_timeout("connect", READ_TIMEOUT, pool).await
    }
}

#[async_trait]
impl Datastore for PostgresDatastore {
    fn name(&self) -> &'static str {
        NAME
    }

    async fn init(&self, params: &str) -> StorageResult<Arc<dyn CounterStorage>> {
        let init = async {
            let pool = self.connect(params).await?;
            bootstrap(&pool).await?;
            Ok::<_, CounterError>(pool)
        };
        let pool = init.await
            .map_err(|source| CounterError::Init { datastore: NAME, source: Box::new(source) })?;
        Ok(Arc::new(PostgresStorage { pool }))
    }
}

async fn bootstrap(pool: &Pool<Postgres>) -> StorageResult<()> {
    let exists_query = sqlx::query_scalar::<_, bool>(TABLE_EXISTENCE_QUERY)
        .bind("public")
        .bind("counter")
        .fetch_one(pool);
    if with_timeout("check table existence", READ_TIMEOUT, exists_query).await? {
        log::info!("the counter table already exists");
        return Ok(())
    }

    log::info!("the counter table doesn't exist, creating...");
    let create_table = sqlx::query(TABLE_CREATION_STATEMENT).execute(pool);
    match with_timeout("create table", READ_TIMEOUT, create_table).await {
        Ok(_) => log::info!("the counter table was created successfully"),
        Err(err) if has_code(&err, &TABLE_RACE_CODES) => {
            log::info!("the counter table has been created concurrently: {err}")
        }
        Err(err) => return Err(err),
    };
    Ok(())
}

fn has_code(err: &CounterError, codes: &[&str]) -> bool {
    match err {
        CounterError::Storage { source: sqlx::Error::Database(db_err) } => db_err.code()
            .is_some_and(|code| codes.iter().any(|expected| *expected == code)),
        _ => false,
    }
}

async fn with_timeout<T, F>(operation: &'static str, budget: Duration, fut: F) -> StorageResult<T>
where F: Future<Output = Result<T, sqlx::Error>>
{
    tokio::time::timeout(budget, fut)
        .await
        .map_err(|_| CounterError::Timeout { operation, budget })?
        .map_err(CounterError::from)
}

/// The `date` column holds UTC time without a zone.
#[derive(sqlx::FromRow)]
struct CounterRow {
    uuid: String,
    name: String,
    count: i32,
    date: NaiveDateTime,
}

impl From<CounterRow> for Counter {
    fn from(row: CounterRow) -> Self {
        Self {
            uuid: row.uuid,
            name: row.name,
            count: row.count,
            created_at: row.date.and_utc(),
        }
    }
}

#[derive(Clone)]
pub struct PostgresStorage {
    pool: Pool<Postgres>,
}

#[async_trait]
impl CounterStorage for PostgresStorage {
    fn name(&self) -> &'static str {
        NAME
    }

    async fn terminate(&self) -> StorageResult<()> {
        tokio::time::timeout(CLOSE_TIMEOUT, self.pool.close())
            .await
            .map_err(|_| CounterError::Teardown { datastore: NAME })
    }

    async fn get(&self, uuid: &str) -> StorageResult<Counter> {
        let query = sqlx::query_as::<_, CounterRow>("SELECT uuid, name, count, date FROM counter WHERE uuid = $1")
            .bind(uuid)
            .fetch_optional(&self.pool);
        with_timeout("get", READ_TIMEOUT, query).await?
            .map(Counter::from)
            .ok_or_else(|| CounterError::not_found(uuid))
    }

    async fn create(&self, counter: Counter) -> StorageResult<Counter> {
        let query = sqlx::query_as::<_, CounterRow>(
                "INSERT INTO counter (uuid, name, count, date) VALUES ($1, $2, $3, $4)
                    ON CONFLICT (uuid) DO NOTHING
                    RETURNING uuid, name, count, date")
            .bind(&counter.uuid)
            .bind(&counter.name)
            .bind(counter.count)
            .bind(counter.created_at.naive_utc())
            .fetch_optional(&self.pool);
        with_timeout("create", WRITE_TIMEOUT, query).await?
            .map(Counter::from)
            .ok_or_else(|| CounterError::already_exists(&counter.uuid))
    }

    async fn update(&self, counter: Counter) -> StorageResult<Counter> {
        let query = sqlx::query_as::<_, CounterRow>(
                "UPDATE counter SET count = $2, name = $3, date = $4 WHERE uuid = $1
                    RETURNING uuid, name, count, date")
            .bind(&counter.uuid)
            .bind(counter.count)
            .bind(&counter.name)
            .bind(counter.created_at.naive_utc())
            .fetch_optional(&self.pool);
        with_timeout("update", WRITE_TIMEOUT, query).await?
            .map(Counter::from)
            .ok_or_else(|| CounterError::not_found(&counter.uuid))
    }

    async fn increment(&self, uuid: &str) -> StorageResult<Counter> {
        let query = sqlx::query_as::<_, CounterRow>(
                "UPDATE counter SET count = count + 1 WHERE uuid = $1
                    RETURNING uuid, name, count, date")
            .bind(uuid)
            .fetch_optional(&self.pool);
        match with_timeout("increment", WRITE_TIMEOUT, query).await {
            Ok(row) => row.map(Counter::from).ok_or_else(|| CounterError::not_found(uuid)),
            Err(err) if has_code(&err, &[NUMERIC_OUT_OF_RANGE_CODE]) => Err(CounterError::overflow(uuid)),
            Err(err) => Err(err),
        }
    }
}
