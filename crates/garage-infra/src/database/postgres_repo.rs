//! PostgreSQL repository implementations.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use sea_orm::sea_query::{Expr, Func};
use sea_orm::{
    ColumnTrait, Condition, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, TransactionTrait,
};
use uuid::Uuid;

use garage_core::domain::{
    Category, CategoryWithCount, Page, PostDetails, PostQuery, ReplyDetails, User,
};
use garage_core::error::RepoError;
use garage_core::ports::{
    CategoryRepository, ChatLogRepository, PostRepository, ReplyRepository, UserRepository,
};

use super::entity::category::{self, Entity as CategoryEntity};
use super::entity::chat_log::Entity as ChatLogEntity;
use super::entity::post::{self, Entity as PostEntity};
use super::entity::reply::{self, Entity as ReplyEntity};
use super::entity::user::{self, Entity as UserEntity};
use super::postgres_base::{PostgresBaseRepository, map_db_err};

/// PostgreSQL user repository.
pub type PostgresUserRepository = PostgresBaseRepository<UserEntity>;

/// PostgreSQL category repository.
pub type PostgresCategoryRepository = PostgresBaseRepository<CategoryEntity>;

/// PostgreSQL post repository.
pub type PostgresPostRepository = PostgresBaseRepository<PostEntity>;

/// PostgreSQL reply repository.
pub type PostgresReplyRepository = PostgresBaseRepository<ReplyEntity>;

/// PostgreSQL chat log repository.
pub type PostgresChatLogRepository = PostgresBaseRepository<ChatLogEntity>;

/// Mask an email for logging to avoid PII in logs.
pub(crate) fn mask_email(email: &str) -> String {
    match email.split_once('@') {
        Some((local, domain)) => match local.chars().next() {
            Some(first) if local.chars().count() > 1 => format!("{first}***@{domain}"),
            _ => format!("***@{domain}"),
        },
        None => "***".to_string(),
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        tracing::debug!(user_email = %mask_email(email), "Finding user by email");

        let result = UserEntity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.map(Into::into))
    }

    async fn recent(&self, limit: u64) -> Result<Vec<User>, RepoError> {
        let result = UserEntity::find()
            .order_by_desc(user::Column::CreatedAt)
            .limit(limit)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }
}

#[async_trait]
impl CategoryRepository for PostgresCategoryRepository {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Category>, RepoError> {
        let result = CategoryEntity::find()
            .filter(category::Column::Slug.eq(slug))
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.map(Into::into))
    }

    async fn list_with_counts(&self) -> Result<Vec<CategoryWithCount>, RepoError> {
        let categories = CategoryEntity::find()
            .order_by_asc(category::Column::Name)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        let counts: HashMap<Uuid, i64> = PostEntity::find()
            .select_only()
            .column(post::Column::CategoryId)
            .column_as(Expr::col(post::Column::Id).count(), "count")
            .filter(post::Column::Status.eq(post::Status::Published))
            .group_by(post::Column::CategoryId)
            .into_tuple::<(Uuid, i64)>()
            .all(&self.db)
            .await
            .map_err(map_db_err)?
            .into_iter()
            .collect();

        Ok(categories
            .into_iter()
            .map(|model| {
                let post_count = counts.get(&model.id).copied().unwrap_or(0) as u64;
                CategoryWithCount {
                    category: model.into(),
                    post_count,
                }
            })
            .collect())
    }
}

/// Reply counts for a set of posts.
async fn reply_counts<C: ConnectionTrait>(
    db: &C,
    post_ids: Vec<Uuid>,
) -> Result<HashMap<Uuid, u64>, RepoError> {
    let rows = ReplyEntity::find()
        .select_only()
        .column(reply::Column::PostId)
        .column_as(Expr::col(reply::Column::Id).count(), "count")
        .filter(reply::Column::PostId.is_in(post_ids))
        .group_by(reply::Column::PostId)
        .into_tuple::<(Uuid, i64)>()
        .all(db)
        .await
        .map_err(map_db_err)?;

    Ok(rows.into_iter().map(|(id, n)| (id, n as u64)).collect())
}

async fn users_by_id<C: ConnectionTrait>(
    db: &C,
    ids: HashSet<Uuid>,
) -> Result<HashMap<Uuid, User>, RepoError> {
    let users = UserEntity::find()
        .filter(user::Column::Id.is_in(ids))
        .all(db)
        .await
        .map_err(map_db_err)?;

    Ok(users
        .into_iter()
        .map(|m| {
            let user: User = m.into();
            (user.id, user)
        })
        .collect())
}

/// Attach author, category and reply count to each post, preserving order.
async fn load_post_details<C: ConnectionTrait>(
    db: &C,
    posts: Vec<post::Model>,
) -> Result<Vec<PostDetails>, RepoError> {
    if posts.is_empty() {
        return Ok(Vec::new());
    }

    let users = users_by_id(db, posts.iter().map(|p| p.user_id).collect()).await?;

    let category_ids: HashSet<Uuid> = posts.iter().map(|p| p.category_id).collect();
    let categories: HashMap<Uuid, Category> = CategoryEntity::find()
        .filter(category::Column::Id.is_in(category_ids))
        .all(db)
        .await
        .map_err(map_db_err)?
        .into_iter()
        .map(|m| (m.id, m.into()))
        .collect();

    let counts = reply_counts(db, posts.iter().map(|p| p.id).collect()).await?;

    Ok(posts
        .into_iter()
        .filter_map(|model| {
            let author = users.get(&model.user_id)?;
            let category = categories.get(&model.category_id)?;
            let reply_count = counts.get(&model.id).copied().unwrap_or(0);
            Some(PostDetails {
                user: author.summary(),
                category: category.summary(),
                reply_count,
                post: model.into(),
            })
        })
        .collect())
}

/// `%term%` for a case-insensitive LIKE, with the term's own wildcards escaped
/// so it matches literally.
fn contains_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.to_lowercase().chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

fn published_filter(query: &PostQuery) -> Condition {
    let mut condition = Condition::all().add(post::Column::Status.eq(post::Status::Published));

    if let Some(category_id) = query.category_id {
        condition = condition.add(post::Column::CategoryId.eq(category_id));
    }

    if let Some(term) = query.search.as_deref() {
        let pattern = contains_pattern(term);
        condition = condition.add(
            Condition::any()
                .add(Expr::expr(Func::lower(Expr::col(post::Column::Title))).like(pattern.clone()))
                .add(Expr::expr(Func::lower(Expr::col(post::Column::Content))).like(pattern)),
        );
    }

    condition
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn list_published(&self, query: &PostQuery) -> Result<Page<PostDetails>, RepoError> {
        let condition = published_filter(query);

        let total = PostEntity::find()
            .filter(condition.clone())
            .count(&self.db)
            .await
            .map_err(map_db_err)?;

        let models = PostEntity::find()
            .filter(condition)
            .order_by_desc(post::Column::CreatedAt)
            .offset(query.offset())
            .limit(query.limit)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(Page {
            items: load_post_details(&self.db, models).await?,
            page: query.page,
            limit: query.limit,
            total,
        })
    }

    async fn find_published_details(&self, id: Uuid) -> Result<Option<PostDetails>, RepoError> {
        let Some(model) = PostEntity::find_by_id(id)
            .filter(post::Column::Status.eq(post::Status::Published))
            .one(&self.db)
            .await
            .map_err(map_db_err)?
        else {
            return Ok(None);
        };

        Ok(load_post_details(&self.db, vec![model]).await?.pop())
    }

    async fn delete_with_replies(&self, id: Uuid) -> Result<(), RepoError> {
        let txn = self.db.begin().await.map_err(map_db_err)?;

        let replies = ReplyEntity::delete_many()
            .filter(reply::Column::PostId.eq(id))
            .exec(&txn)
            .await
            .map_err(map_db_err)?;

        let result = PostEntity::delete_by_id(id)
            .exec(&txn)
            .await
            .map_err(map_db_err)?;

        if result.rows_affected == 0 {
            // dropping the transaction rolls it back
            return Err(RepoError::NotFound);
        }

        txn.commit().await.map_err(map_db_err)?;

        tracing::debug!(post_id = %id, replies = replies.rows_affected, "Post and replies deleted");
        Ok(())
    }
}

#[async_trait]
impl ReplyRepository for PostgresReplyRepository {
    async fn list_for_post(&self, post_id: Uuid) -> Result<Vec<ReplyDetails>, RepoError> {
        let models = ReplyEntity::find()
            .filter(reply::Column::PostId.eq(post_id))
            .order_by_desc(reply::Column::IsBestAnswer)
            .order_by_asc(reply::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        let users = users_by_id(&self.db, models.iter().map(|r| r.user_id).collect()).await?;

        Ok(models
            .into_iter()
            .filter_map(|model| {
                let author = users.get(&model.user_id)?;
                Some(ReplyDetails {
                    user: author.summary(),
                    reply: model.into(),
                })
            })
            .collect())
    }

    async fn mark_best_answer(&self, post_id: Uuid, reply_id: Uuid) -> Result<(), RepoError> {
        let txn = self.db.begin().await.map_err(map_db_err)?;

        ReplyEntity::update_many()
            .col_expr(reply::Column::IsBestAnswer, Expr::value(false))
            .filter(reply::Column::PostId.eq(post_id))
            .exec(&txn)
            .await
            .map_err(map_db_err)?;

        let result = ReplyEntity::update_many()
            .col_expr(reply::Column::IsBestAnswer, Expr::value(true))
            .filter(reply::Column::Id.eq(reply_id))
            .filter(reply::Column::PostId.eq(post_id))
            .exec(&txn)
            .await
            .map_err(map_db_err)?;

        if result.rows_affected == 0 {
            return Err(RepoError::NotFound);
        }

        txn.commit().await.map_err(map_db_err)?;
        Ok(())
    }
}

impl ChatLogRepository for PostgresChatLogRepository {}
