#[cfg(test)]
mod integration_tests {
    use crate::cli::commands::seed::seed_database;
    use crate::schemas::HealthResponse;
    use crate::test_utils::test_utils::{
        init_test_tracing, setup_test_app, setup_test_db, write_fixture,
    };
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use model::entities::prelude::*;
    use sea_orm::{EntityTrait, ModelTrait};
    use seeding::{SeedOutcome, SeedSummary};

    const SEED_DATA: &str = r#"[
        {"model": "users.user", "pk": 1, "fields": {"username": "jake", "email": "jake@x.io", "password": "pw", "bio": "", "image": null}},
        {"model": "articles.tag", "pk": "dragons", "fields": {"id": "dragons", "name": "dragons"}},
        {"model": "articles.article", "pk": 1, "fields": {"title": "T", "description": "D", "body": "B", "slug": "t", "created_at": "2020-01-01T00:00:00Z", "updated_at": "2020-01-01T00:00:00Z"}}
    ]"#;

    #[tokio::test]
    async fn test_health_check_on_empty_store() {
        let db = setup_test_db().await;
        let server = TestServer::new(setup_test_app(db)).unwrap();

        let response = server.get("/health").await;

        response.assert_status(StatusCode::OK);
        let body: HealthResponse = response.json();
        assert_eq!(body.status, "healthy");
        assert_eq!(body.database, "connected");
        assert_eq!((body.users, body.tags, body.articles), (0, 0, 0));
    }

    #[tokio::test]
    async fn test_seeded_store_is_visible_over_http() {
        let _guard = init_test_tracing();
        let db = setup_test_db().await;
        let path = write_fixture("health_after_seed", SEED_DATA);

        let outcome = seed_database(&db, &path).await.unwrap();
        assert_eq!(
            outcome,
            SeedOutcome::Seeded(SeedSummary { users: 1, tags: 1, articles: 1, skipped: 0 })
        );

        let server = TestServer::new(setup_test_app(db)).unwrap();
        let body: HealthResponse = server.get("/health").await.json();
        assert_eq!((body.users, body.tags, body.articles), (1, 1, 1));
    }

    #[tokio::test]
    async fn test_end_to_end_seed_against_sqlite() {
        let db = setup_test_db().await;
        let path = write_fixture("end_to_end", SEED_DATA);

        seed_database(&db, &path).await.unwrap();

        let jake = User::find().one(&db).await.unwrap().unwrap();
        assert_eq!(jake.username, "jake");
        assert_eq!(jake.image, "");
        assert_ne!(jake.password_hash, "pw");
        assert!(seeding::Argon2Hasher.verify("pw", &jake.password_hash).unwrap());

        let tag = Tag::find_by_id("dragons".to_string()).one(&db).await.unwrap();
        assert!(tag.is_some());

        let articles = jake.find_related(Article).all(&db).await.unwrap();
        assert_eq!(articles.len(), 1);
        assert_eq!(articles[0].slug, "t");
    }

    #[tokio::test]
    async fn test_startup_seeding_runs_once() {
        let db = setup_test_db().await;
        let path = write_fixture("runs_once", SEED_DATA);

        seed_database(&db, &path).await.unwrap();
        let second = seed_database(&db, &path).await.unwrap();

        assert_eq!(second, SeedOutcome::AlreadySeeded);
        assert_eq!(User::find().all(&db).await.unwrap().len(), 1);
        assert_eq!(Article::find().all(&db).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_missing_seed_file_does_not_block_startup() {
        let db = setup_test_db().await;
        let path = std::env::temp_dir().join("conduit-host-no-such-seed-data.json");

        let outcome = seed_database(&db, &path).await.unwrap();

        assert_eq!(outcome, SeedOutcome::MissingFixture);
        assert!(User::find().one(&db).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_broken_seed_file_aborts_startup() {
        let db = setup_test_db().await;
        let path = write_fixture("broken", "[{\"model\": \"users.user\",");

        let err = seed_database(&db, &path).await.unwrap_err();

        assert!(err.to_string().contains("Failed to seed"));
        assert!(err.downcast_ref::<seeding::SeedError>().is_some());
    }

    #[tokio::test]
    async fn test_bundled_seed_data() {
        let db = setup_test_db().await;
        let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("seed-data.json");

        let outcome = seed_database(&db, &path).await.unwrap();

        assert_eq!(
            outcome,
            SeedOutcome::Seeded(SeedSummary { users: 2, tags: 2, articles: 2, skipped: 0 })
        );
        let jake = User::find().one(&db).await.unwrap().unwrap();
        let articles = jake.find_related(Article).all(&db).await.unwrap();
        assert_eq!(articles.len(), 2);
    }
}
