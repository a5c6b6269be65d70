//! Forum use cases driven end to end over the in-memory repositories.

use std::sync::Arc;

use garage_core::DomainError;
use garage_core::domain::{Post, PostStatus, User, UserRole};
use garage_core::ports::BaseRepository;
use garage_core::services::{
    AccountService, Actor, ForumRepositories, ForumService, ListPosts, NewPost, Registration,
};
use garage_infra::{Argon2PasswordService, InMemoryDatabase, JwtConfig, JwtTokenService};

struct Forum {
    repos: ForumRepositories,
    forum: ForumService,
    accounts: AccountService,
}

async fn forum() -> Forum {
    let repos = InMemoryDatabase::seeded().await.repositories();
    let accounts = AccountService::new(
        repos.users.clone(),
        Arc::new(Argon2PasswordService::new()),
        Arc::new(JwtTokenService::new(JwtConfig {
            secret: "integration-secret".to_string(),
            ..JwtConfig::default()
        })),
    );
    Forum {
        forum: ForumService::new(repos.clone()),
        repos,
        accounts,
    }
}

async fn member(f: &Forum, email: &str, role: UserRole) -> Actor {
    let user = User::new("整備士".to_string(), email.to_string(), "hash".to_string(), role);
    let user = f.repos.users.insert(user).await.unwrap();
    Actor {
        user_id: user.id,
        role,
    }
}

fn question(title: &str) -> NewPost {
    NewPost {
        title: title.to_string(),
        content: "症状の詳細です".to_string(),
        category: "engine".to_string(),
        image_url: None,
    }
}

#[tokio::test]
async fn register_then_login() {
    let f = forum().await;

    let session = f
        .accounts
        .register(Registration {
            name: "鈴木".to_string(),
            email: "suzuki@example.com".to_string(),
            password: "secret1".to_string(),
            ..Registration::default()
        })
        .await
        .unwrap();
    assert_eq!(session.user.role, UserRole::User);
    assert!(!session.access_token.is_empty());

    let again = f
        .accounts
        .register(Registration {
            name: "鈴木".to_string(),
            email: "suzuki@example.com".to_string(),
            password: "secret1".to_string(),
            ..Registration::default()
        })
        .await;
    assert!(matches!(again, Err(DomainError::Duplicate(_))));

    assert!(f.accounts.login("suzuki@example.com", "secret1").await.is_ok());
    assert!(matches!(
        f.accounts.login("suzuki@example.com", "wrong").await,
        Err(DomainError::InvalidCredentials)
    ));
}

#[tokio::test]
async fn deleting_a_post_removes_its_replies() {
    let f = forum().await;
    let author = member(&f, "author@example.com", UserRole::User).await;
    let helper = member(&f, "helper@example.com", UserRole::User).await;

    let post = f.forum.create_post(author, question("異音がする")).await.unwrap();
    let keep = f.forum.create_post(author, question("別の質問")).await.unwrap();
    for _ in 0..3 {
        f.forum
            .create_reply(helper, post.post.id, "ベルトを確認".to_string())
            .await
            .unwrap();
    }
    f.forum
        .create_reply(helper, keep.post.id, "残る回答".to_string())
        .await
        .unwrap();

    f.forum.delete_post(author, post.post.id).await.unwrap();

    assert_eq!(f.repos.replies.count().await.unwrap(), 1);
    assert!(matches!(
        f.forum.get_post(post.post.id).await,
        Err(DomainError::NotFound { .. })
    ));
}

#[tokio::test]
async fn only_owner_or_staff_can_delete() {
    let f = forum().await;
    let author = member(&f, "author@example.com", UserRole::User).await;
    let stranger = member(&f, "stranger@example.com", UserRole::User).await;
    let moderator = member(&f, "mod@example.com", UserRole::Moderator).await;

    let post = f.forum.create_post(author, question("質問")).await.unwrap();

    assert!(matches!(
        f.forum.delete_post(stranger, post.post.id).await,
        Err(DomainError::Forbidden(_))
    ));
    f.forum.delete_post(moderator, post.post.id).await.unwrap();
}

#[tokio::test]
async fn replying_to_missing_or_draft_post_is_not_found() {
    let f = forum().await;
    let author = member(&f, "author@example.com", UserRole::User).await;

    let missing = f
        .forum
        .create_reply(author, uuid::Uuid::new_v4(), "回答".to_string())
        .await;
    assert!(matches!(missing, Err(DomainError::NotFound { .. })));

    let engine = f.repos.categories.find_by_slug("engine").await.unwrap().unwrap();
    let draft = Post::new(author.user_id, engine.id, "下書き".into(), "本文".into())
        .with_status(PostStatus::Draft);
    let draft = f.repos.posts.insert(draft).await.unwrap();

    let result = f.forum.create_reply(author, draft.id, "回答".to_string()).await;
    assert!(matches!(result, Err(DomainError::NotFound { .. })));
}

#[tokio::test]
async fn best_answer_is_unique_and_listed_first() {
    let f = forum().await;
    let author = member(&f, "author@example.com", UserRole::User).await;
    let helper = member(&f, "helper@example.com", UserRole::User).await;

    let post = f.forum.create_post(author, question("CVTの異音")).await.unwrap();
    let first = f
        .forum
        .create_reply(helper, post.post.id, "フルード交換".to_string())
        .await
        .unwrap();
    let second = f
        .forum
        .create_reply(helper, post.post.id, "ベアリング点検".to_string())
        .await
        .unwrap();

    f.forum
        .mark_best_answer(author, post.post.id, first.reply.id)
        .await
        .unwrap();
    f.forum
        .mark_best_answer(author, post.post.id, second.reply.id)
        .await
        .unwrap();

    let replies = f.forum.list_replies(post.post.id).await.unwrap();
    assert_eq!(replies.iter().filter(|r| r.reply.is_best_answer).count(), 1);
    assert_eq!(replies[0].reply.id, second.reply.id);

    assert!(matches!(
        f.forum
            .mark_best_answer(helper, post.post.id, first.reply.id)
            .await,
        Err(DomainError::Forbidden(_))
    ));
}

#[tokio::test]
async fn listing_filters_by_category_and_search() {
    let f = forum().await;
    let author = member(&f, "author@example.com", UserRole::User).await;

    f.forum.create_post(author, question("オイル漏れ")).await.unwrap();
    f.forum
        .create_post(
            author,
            NewPost {
                category: "diagnosis".to_string(),
                ..question("診断機の選び方")
            },
        )
        .await
        .unwrap();

    let engine = f
        .forum
        .list_posts(ListPosts {
            category: Some("engine".to_string()),
            ..ListPosts::default()
        })
        .await
        .unwrap();
    assert_eq!(engine.total, 1);

    let unknown_category = f
        .forum
        .list_posts(ListPosts {
            category: Some("nope".to_string()),
            ..ListPosts::default()
        })
        .await
        .unwrap();
    assert_eq!(unknown_category.total, 2);

    let search = f
        .forum
        .list_posts(ListPosts {
            search: Some("診断機".to_string()),
            ..ListPosts::default()
        })
        .await
        .unwrap();
    assert_eq!(search.total, 1);
    assert_eq!(search.items[0].category.slug, "diagnosis");

    let categories = f.forum.list_categories().await.unwrap();
    let counted: u64 = categories.iter().map(|c| c.post_count).sum();
    assert_eq!(counted, 2);
}

#[tokio::test]
async fn unknown_category_is_rejected_on_create() {
    let f = forum().await;
    let author = member(&f, "author@example.com", UserRole::User).await;

    let result = f
        .forum
        .create_post(
            author,
            NewPost {
                category: "nope".to_string(),
                ..question("質問")
            },
        )
        .await;
    assert!(matches!(result, Err(DomainError::Validation(msg)) if msg == "無効なカテゴリです"));
}

#[tokio::test]
async fn stats_are_for_staff_and_count_published_posts() {
    let f = forum().await;
    let user = member(&f, "user@example.com", UserRole::User).await;
    let moderator = member(&f, "mod@example.com", UserRole::Moderator).await;
    let admin = member(&f, "admin@example.com", UserRole::Admin).await;

    let post = f.forum.create_post(user, question("質問")).await.unwrap();
    f.forum
        .create_reply(moderator, post.post.id, "回答".to_string())
        .await
        .unwrap();

    let engine = f.repos.categories.find_by_slug("engine").await.unwrap().unwrap();
    let draft = Post::new(user.user_id, engine.id, "下書き".into(), "本文".into())
        .with_status(PostStatus::Draft);
    f.repos.posts.insert(draft).await.unwrap();

    assert!(matches!(
        f.forum.stats(user).await,
        Err(DomainError::Forbidden(_))
    ));

    let stats = f.forum.stats(admin).await.unwrap();
    assert_eq!(stats.user_count, 3);
    assert_eq!(stats.post_count, 1);
    assert_eq!(stats.reply_count, 1);
    assert_eq!(stats.avg_replies_per_post, 1.0);
    assert_eq!(stats.recent_posts.len(), 1);

    let stats = f.forum.stats(moderator).await.unwrap();
    assert_eq!(stats.post_count, 1);
}
