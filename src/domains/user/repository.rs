use async_trait::async_trait;
use sqlx::{PgExecutor, PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use super::model::{user_already_exists, user_not_found, ListOptions, User, UserList};
use crate::{error::Error, utils::clock::SharedClock};

const SELECT_USERS: &str =
  "SELECT id, first_name, last_name, nickname, email, encoded_password, country, created_at, updated_at FROM users";

const UPSERT_USER: &str = r#"
  INSERT INTO users (id, first_name, last_name, nickname, email, encoded_password, country, created_at, updated_at)
  VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $8)
  ON CONFLICT (id) DO UPDATE SET
    first_name = EXCLUDED.first_name,
    last_name = EXCLUDED.last_name,
    nickname = EXCLUDED.nickname,
    encoded_password = EXCLUDED.encoded_password,
    country = EXCLUDED.country,
    updated_at = EXCLUDED.updated_at
"#;

/// Persistence contract for users.
///
/// `save` is an upsert keyed by id: an empty id gets a fresh one, an existing
/// row keeps its id, email and `created_at`. Every operation that targets a
/// single row reports a missing row as `NotFound`.
#[async_trait]
pub trait UserRepository: Send + Sync {
  async fn list(&self, opts: &ListOptions) -> Result<UserList, Error>;
  async fn get(&self, id: &str) -> Result<User, Error>;
  async fn save(&self, user: User) -> Result<User, Error>;
  async fn delete(&self, id: &str) -> Result<(), Error>;
}

pub struct SqlxUserRepository {
  pool: PgPool,
  clock: SharedClock,
}

impl SqlxUserRepository {
  pub fn new(pool: PgPool, clock: SharedClock) -> Self {
    Self { pool, clock }
  }
}

/// Escapes LIKE metacharacters so the search term matches literally.
fn like_pattern(search: &str) -> String {
  let mut pattern = String::with_capacity(search.len() + 2);
  pattern.push('%');
  for c in search.chars() {
    if matches!(c, '\\' | '%' | '_') {
      pattern.push('\\');
    }
    pattern.push(c);
  }
  pattern.push('%');
  pattern
}

fn push_filters(builder: &mut QueryBuilder<'_, Postgres>, opts: &ListOptions) {
  let mut keyword = " WHERE ";

  if !opts.country.is_empty() {
    builder.push(keyword).push("country = ").push_bind(opts.country.clone());
    keyword = " AND ";
  }

  if !opts.search.is_empty() {
    builder.push(keyword).push("email LIKE ").push_bind(like_pattern(&opts.search));
  }
}

/// Byte-wise email order, matching the in-memory store regardless of database collation.
fn page_query(opts: &ListOptions, per_page: u64) -> QueryBuilder<'static, Postgres> {
  let mut builder = QueryBuilder::<Postgres>::new(SELECT_USERS);
  push_filters(&mut builder, opts);
  builder
    .push(" ORDER BY email COLLATE \"C\" ASC LIMIT ")
    .push_bind(to_i64(per_page.saturating_add(1)))
    .push(" OFFSET ")
    .push_bind(to_i64(opts.offset()));
  builder
}

fn to_i64(value: u64) -> i64 {
  i64::try_from(value).unwrap_or(i64::MAX)
}

pub async fn find_by_id_with_executor<'e, E>(executor: E, id: &str) -> Result<Option<User>, sqlx::Error>
where
  E: PgExecutor<'e>,
{
  let mut builder = QueryBuilder::<Postgres>::new(SELECT_USERS);
  builder.push(" WHERE id = ").push_bind(id.to_string());

  builder.build_query_as::<User>().fetch_optional(executor).await
}

#[async_trait]
impl UserRepository for SqlxUserRepository {
  async fn list(&self, opts: &ListOptions) -> Result<UserList, Error> {
    let per_page = opts.effective_per_page();

    let count = async {
      let mut builder = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM users");
      push_filters(&mut builder, opts);
      builder.build_query_scalar::<i64>().fetch_one(&self.pool).await
    };

    let page = async {
      let mut builder = page_query(opts, per_page);
      builder.build_query_as::<User>().fetch_all(&self.pool).await
    };

    let (total, users) = tokio::try_join!(count, page).map_err(|e| {
      tracing::error!(error = %e, page = opts.page, per_page, "unable to list users");
      Error::from(e)
    })?;

    Ok(UserList::from_lookahead(
      users,
      u64::try_from(total).unwrap_or_default(),
      opts.page,
      per_page,
    ))
  }

  async fn get(&self, id: &str) -> Result<User, Error> {
    find_by_id_with_executor(&self.pool, id)
      .await
      .map_err(|e| {
        tracing::error!(error = %e, user_id = id, "unable to get user");
        Error::from(e)
      })?
      .ok_or_else(|| user_not_found(id))
  }

  async fn save(&self, mut user: User) -> Result<User, Error> {
    if user.id.is_empty() {
      user.id = Uuid::new_v4().to_string();
    }

    let now = self.clock.now();

    sqlx::query(UPSERT_USER)
      .bind(&user.id)
      .bind(&user.first_name)
      .bind(&user.last_name)
      .bind(&user.nickname)
      .bind(&user.email)
      .bind(&user.encoded_password)
      .bind(&user.country)
      .bind(now)
      .execute(&self.pool)
      .await
      .map_err(|e| {
        let unique_violation = e
          .as_database_error()
          .map(|db| db.is_unique_violation())
          .unwrap_or(false);
        if unique_violation {
          return user_already_exists(&user.email).with_source(e);
        }
        tracing::error!(error = %e, user_id = %user.id, "unable to save user");
        Error::from(e)
      })?;

    self.get(&user.id).await
  }

  async fn delete(&self, id: &str) -> Result<(), Error> {
    let result = sqlx::query("DELETE FROM users WHERE id = $1")
      .bind(id)
      .execute(&self.pool)
      .await
      .map_err(|e| {
        tracing::error!(error = %e, user_id = id, "unable to delete user");
        Error::from(e)
      })?;

    if result.rows_affected() == 0 {
      return Err(user_not_found(id));
    }

    Ok(())
  }
}
