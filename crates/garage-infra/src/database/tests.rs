#[cfg(test)]
mod tests {
    use crate::database::entity::{post, user};
    use crate::database::postgres_repo::{
        PostgresPostRepository, PostgresReplyRepository, PostgresUserRepository,
    };
    use garage_core::domain::{Post, PostStatus, UserRole};
    use garage_core::error::RepoError;
    use garage_core::ports::{BaseRepository, PostRepository, ReplyRepository, UserRepository};
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    fn exec(rows_affected: u64) -> MockExecResult {
        MockExecResult {
            last_insert_id: 0,
            rows_affected,
        }
    }

    #[tokio::test]
    async fn test_find_post_by_id() {
        let post_id = uuid::Uuid::new_v4();
        let now = chrono::Utc::now();

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![post::Model {
                id: post_id,
                user_id: uuid::Uuid::new_v4(),
                category_id: uuid::Uuid::new_v4(),
                title: "オイル漏れの原因".to_owned(),
                content: "エンジン下部から漏れています".to_owned(),
                image_url: None,
                status: post::Status::Draft,
                created_at: now.into(),
                updated_at: now.into(),
            }]])
            .into_connection();

        let repo = PostgresPostRepository::new(db);

        let result: Option<Post> = repo.find_by_id(post_id).await.unwrap();

        let post = result.unwrap();
        assert_eq!(post.title, "オイル漏れの原因");
        assert_eq!(post.id, post_id);
        assert_eq!(post.status, PostStatus::Draft);
    }

    #[tokio::test]
    async fn test_find_user_by_email_maps_role() {
        let now = chrono::Utc::now();

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![user::Model {
                id: uuid::Uuid::new_v4(),
                name: "佐藤".to_owned(),
                email: "sato@example.com".to_owned(),
                password_hash: "hash".to_owned(),
                role: user::Role::Moderator,
                profile: None,
                created_at: now.into(),
                updated_at: now.into(),
            }]])
            .into_connection();

        let repo = PostgresUserRepository::new(db);
        let found = repo.find_by_email("sato@example.com").await.unwrap().unwrap();

        assert_eq!(found.role, UserRole::Moderator);
    }

    #[tokio::test]
    async fn test_delete_missing_post_is_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results(vec![exec(0), exec(0)])
            .into_connection();

        let repo = PostgresPostRepository::new(db);
        let err = repo.delete_with_replies(uuid::Uuid::new_v4()).await.unwrap_err();

        assert!(matches!(err, RepoError::NotFound));
    }

    #[tokio::test]
    async fn test_mark_best_answer_clears_then_sets() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results(vec![exec(3), exec(1)])
            .into_connection();

        let repo = PostgresReplyRepository::new(db);
        repo.mark_best_answer(uuid::Uuid::new_v4(), uuid::Uuid::new_v4())
            .await
            .unwrap();
    }
}
