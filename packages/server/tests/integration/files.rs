use ::common::storage::ContentHash;
use sea_orm::{EntityTrait, PaginatorTrait};
use uuid::Uuid;

use plagcheck_server::entity::file_record;

use crate::common::{MAX_FILE_SIZE, TestApp, file_part, routes};

fn sha256_hex(data: &[u8]) -> String {
    ContentHash::compute(data).to_hex()
}

async fn record_count(app: &TestApp) -> u64 {
    file_record::Entity::find().count(&app.db).await.unwrap()
}

mod upload {
    use super::*;

    #[tokio::test]
    async fn student_upload_returns_record() {
        let app = TestApp::spawn().await;
        let student = Uuid::new_v4();
        let token = app.student_token(student);

        let res = app.upload(&token, "essay.txt", b"hello world").await;

        assert_eq!(res.status, 201);
        assert!(res.body["id"].as_i64().is_some());
        assert_eq!(res.body["student_id"].as_str().unwrap(), student.to_string());
        assert_eq!(res.body["filename"].as_str().unwrap(), "essay.txt");
        assert_eq!(res.body["size"].as_i64().unwrap(), 11);
        assert_eq!(
            res.body["content_hash"].as_str().unwrap(),
            sha256_hex(b"hello world")
        );
        assert!(res.body.get("location").is_none());
    }

    #[tokio::test]
    async fn blob_lands_at_sharded_location() {
        let app = TestApp::spawn().await;
        let token = app.student_token(Uuid::new_v4());

        app.upload_ok(&token, "a.txt", b"abc").await;

        let hash = sha256_hex(b"abc");
        let expected = app
            .storage_root()
            .join(&hash[..2])
            .join(&hash[2..4])
            .join(format!("{hash}.dat"));
        assert_eq!(std::fs::read(expected).unwrap(), b"abc");
    }

    #[tokio::test]
    async fn identical_uploads_share_one_blob() {
        let app = TestApp::spawn().await;
        let content = b"the same essay, word for word";

        for _ in 0..3 {
            let token = app.student_token(Uuid::new_v4());
            app.upload_ok(&token, "essay.txt", content).await;
        }

        assert_eq!(app.blob_files().len(), 1);
        assert_eq!(record_count(&app).await, 3);
    }

    #[tokio::test]
    async fn empty_file_is_accepted() {
        let app = TestApp::spawn().await;
        let token = app.student_token(Uuid::new_v4());

        let res = app.upload(&token, "empty.txt", b"").await;

        assert_eq!(res.status, 201);
        assert_eq!(res.body["size"].as_i64().unwrap(), 0);
        assert_eq!(
            res.body["content_hash"].as_str().unwrap(),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[tokio::test]
    async fn short_body_is_rejected_without_side_effects() {
        let app = TestApp::spawn().await;
        let token = app.student_token(Uuid::new_v4());

        let res = app
            .upload_declared(&token, "essay.txt", b"only nine", Some(12))
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
        assert_eq!(record_count(&app).await, 0);
        assert!(app.blob_files().is_empty());
        assert_eq!(app.staging_files(), 0);
    }

    #[tokio::test]
    async fn long_body_is_rejected_without_side_effects() {
        let app = TestApp::spawn().await;
        let token = app.student_token(Uuid::new_v4());

        let res = app
            .upload_declared(&token, "essay.txt", b"more than four", Some(4))
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
        assert_eq!(record_count(&app).await, 0);
        assert!(app.blob_files().is_empty());
    }

    #[tokio::test]
    async fn oversize_declaration_is_rejected() {
        let app = TestApp::spawn().await;
        let token = app.student_token(Uuid::new_v4());

        let res = app
            .upload_declared(&token, "big.bin", b"tiny", Some(MAX_FILE_SIZE + 1))
            .await;

        assert_eq!(res.status, 413);
        assert_eq!(res.body["code"], "PAYLOAD_TOO_LARGE");
        assert_eq!(record_count(&app).await, 0);
        assert!(app.blob_files().is_empty());
    }

    #[tokio::test]
    async fn file_at_the_limit_is_accepted() {
        let app = TestApp::spawn().await;
        let token = app.student_token(Uuid::new_v4());
        let content = vec![b'x'; MAX_FILE_SIZE as usize];

        let res = app.upload(&token, "limit.bin", &content).await;

        assert_eq!(res.status, 201);
        assert_eq!(res.body["size"].as_i64().unwrap(), MAX_FILE_SIZE as i64);
    }

    #[tokio::test]
    async fn missing_size_is_rejected() {
        let app = TestApp::spawn().await;
        let token = app.student_token(Uuid::new_v4());

        let res = app
            .upload_declared(&token, "essay.txt", b"content", None)
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn path_like_filename_is_rejected() {
        let app = TestApp::spawn().await;
        let token = app.student_token(Uuid::new_v4());

        let res = app.upload(&token, "../escape.txt", b"content").await;

        assert_eq!(res.status, 400);
        assert_eq!(record_count(&app).await, 0);
    }

    #[tokio::test]
    async fn dotfile_names_are_accepted() {
        let app = TestApp::spawn().await;
        let token = app.student_token(Uuid::new_v4());

        let res = app.upload(&token, ".gitignore", b"target/\n").await;

        assert_eq!(res.status, 201, "upload failed: {:?}", res.body);
        assert_eq!(res.body["filename"].as_str().unwrap(), ".gitignore");
    }

    #[tokio::test]
    async fn teacher_cannot_upload() {
        let app = TestApp::spawn().await;
        let token = app.teacher_token();

        let res = app.upload(&token, "essay.txt", b"content").await;

        assert_eq!(res.status, 403);
        assert_eq!(res.body["code"], "PERMISSION_DENIED");
    }

    #[tokio::test]
    async fn upload_requires_token() {
        let app = TestApp::spawn().await;

        let res = app.upload("not-a-jwt", "essay.txt", b"content").await;

        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"], "TOKEN_INVALID");
    }

    #[tokio::test]
    async fn fields_after_the_first_file_are_ignored() {
        let app = TestApp::spawn().await;
        let token = app.student_token(Uuid::new_v4());
        let form = reqwest::multipart::Form::new()
            .text("size", "3")
            .part("file", file_part("a.txt", b"one"))
            .part("file", file_part("b.txt", b"two"));

        let res = app.upload_form(&token, form).await;

        assert_eq!(res.status, 201, "upload failed: {:?}", res.body);
        assert_eq!(res.body["filename"].as_str().unwrap(), "a.txt");
        assert_eq!(
            res.body["content_hash"].as_str().unwrap(),
            sha256_hex(b"one")
        );
        assert_eq!(record_count(&app).await, 1);
        assert_eq!(app.blob_files().len(), 1);
    }

    #[tokio::test]
    async fn concurrent_identical_uploads_publish_once() {
        let app = TestApp::spawn().await;
        let content = b"everyone submits this".to_vec();
        let tokens: Vec<String> = (0..8).map(|_| app.student_token(Uuid::new_v4())).collect();

        let results = futures::future::join_all(
            tokens
                .iter()
                .map(|token| app.upload(token, "copy.txt", &content)),
        )
        .await;

        for res in &results {
            assert_eq!(res.status, 201, "upload failed: {:?}", res.body);
            assert_eq!(
                res.body["content_hash"].as_str().unwrap(),
                sha256_hex(&content)
            );
        }
        assert_eq!(app.blob_files().len(), 1);
        assert_eq!(record_count(&app).await, 8);
        assert_eq!(app.staging_files(), 0);
    }
}

mod download {
    use super::*;

    #[tokio::test]
    async fn owner_gets_exact_bytes() {
        let app = TestApp::spawn().await;
        let token = app.student_token(Uuid::new_v4());
        let content: Vec<u8> = (0..=255u8).cycle().take(10_000).collect();
        let id = app.upload_ok(&token, "data.bin", &content).await;

        let res = app.get_with_token(&routes::file(id), &token).await;

        assert_eq!(res.status, 200);
        assert_eq!(res.bytes, content);
        assert_eq!(res.header("content-length"), Some("10000"));
        assert!(
            res.header("content-disposition")
                .unwrap()
                .starts_with("attachment; filename=\"data.bin\"")
        );
        let etag = format!("\"{}\"", sha256_hex(&content));
        assert_eq!(res.header("etag"), Some(etag.as_str()));
    }

    #[tokio::test]
    async fn teacher_can_download_any_file() {
        let app = TestApp::spawn().await;
        let student = app.student_token(Uuid::new_v4());
        let id = app.upload_ok(&student, "essay.txt", b"my essay").await;

        let res = app.get_with_token(&routes::file(id), &app.teacher_token()).await;

        assert_eq!(res.status, 200);
        assert_eq!(res.bytes, b"my essay");
    }

    #[tokio::test]
    async fn other_student_is_denied() {
        let app = TestApp::spawn().await;
        let owner = app.student_token(Uuid::new_v4());
        let other = app.student_token(Uuid::new_v4());
        let id = app.upload_ok(&owner, "essay.txt", b"mine").await;

        let res = app.get_with_token(&routes::file(id), &other).await;

        assert_eq!(res.status, 403);
    }

    #[tokio::test]
    async fn matching_etag_returns_not_modified() {
        let app = TestApp::spawn().await;
        let token = app.student_token(Uuid::new_v4());
        let id = app.upload_ok(&token, "essay.txt", b"cached").await;
        let etag = format!("\"{}\"", sha256_hex(b"cached"));

        let res = app
            .get_with_headers(&routes::file(id), &token, &[("If-None-Match", &etag)])
            .await;

        assert_eq!(res.status, 304);
        assert!(res.bytes.is_empty());
    }

    #[tokio::test]
    async fn unknown_id_is_not_found() {
        let app = TestApp::spawn().await;

        let res = app
            .get_with_token(&routes::file(9999), &app.teacher_token())
            .await;

        assert_eq!(res.status, 404);
        assert_eq!(res.body["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn missing_token_is_rejected() {
        let app = TestApp::spawn().await;

        let res = app.get_without_token(&routes::file(1)).await;

        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"], "TOKEN_MISSING");
    }

    #[tokio::test]
    async fn missing_blob_is_reported_as_not_found() {
        let app = TestApp::spawn().await;
        let token = app.student_token(Uuid::new_v4());
        let id = app.upload_ok(&token, "essay.txt", b"soon gone").await;
        for blob in app.blob_files() {
            std::fs::remove_file(blob).unwrap();
        }

        let res = app.get_with_token(&routes::file(id), &token).await;

        assert_eq!(res.status, 404);
    }
}

mod listing {
    use super::*;

    #[tokio::test]
    async fn student_files_are_in_upload_order() {
        let app = TestApp::spawn().await;
        let student = Uuid::new_v4();
        let token = app.student_token(student);
        let other = app.student_token(Uuid::new_v4());

        let first = app.upload_ok(&token, "one.txt", b"1").await;
        app.upload_ok(&other, "noise.txt", b"noise").await;
        let second = app.upload_ok(&token, "two.txt", b"2").await;
        let third = app.upload_ok(&token, "one.txt", b"1").await;

        let res = app
            .get_with_token(&routes::student_files(&student.to_string()), &token)
            .await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["total"].as_u64().unwrap(), 3);
        let ids: Vec<i64> = res.body["files"]
            .as_array()
            .unwrap()
            .iter()
            .map(|f| f["id"].as_i64().unwrap())
            .collect();
        assert_eq!(ids, vec![first, second, third]);
    }

    #[tokio::test]
    async fn unknown_student_has_no_files() {
        let app = TestApp::spawn().await;

        let res = app
            .get_with_token(
                &routes::student_files(&Uuid::new_v4().to_string()),
                &app.teacher_token(),
            )
            .await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["total"].as_u64().unwrap(), 0);
        assert!(res.body["files"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn student_cannot_list_another_student() {
        let app = TestApp::spawn().await;
        let token = app.student_token(Uuid::new_v4());

        let res = app
            .get_with_token(&routes::student_files(&Uuid::new_v4().to_string()), &token)
            .await;

        assert_eq!(res.status, 403);
    }

    #[tokio::test]
    async fn malformed_student_id_is_rejected() {
        let app = TestApp::spawn().await;

        let res = app
            .get_with_token(&routes::student_files("not-a-uuid"), &app.teacher_token())
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn files_by_hash_lists_every_upload() {
        let app = TestApp::spawn().await;
        let a = app.student_token(Uuid::new_v4());
        let b = app.student_token(Uuid::new_v4());
        let first = app.upload_ok(&a, "x.txt", b"shared").await;
        app.upload_ok(&a, "y.txt", b"different").await;
        let second = app.upload_ok(&b, "z.txt", b"shared").await;

        let res = app
            .get_with_token(
                &routes::files_by_hash(&sha256_hex(b"shared")),
                &app.teacher_token(),
            )
            .await;

        assert_eq!(res.status, 200);
        let ids: Vec<i64> = res.body["files"]
            .as_array()
            .unwrap()
            .iter()
            .map(|f| f["id"].as_i64().unwrap())
            .collect();
        assert_eq!(ids, vec![first, second]);
    }

    #[tokio::test]
    async fn files_by_hash_rejects_malformed_hash() {
        let app = TestApp::spawn().await;

        let res = app
            .get_with_token(&routes::files_by_hash("xyz"), &app.teacher_token())
            .await;

        assert_eq!(res.status, 400);
    }

    #[tokio::test]
    async fn files_by_hash_is_teacher_only() {
        let app = TestApp::spawn().await;
        let token = app.student_token(Uuid::new_v4());

        let res = app
            .get_with_token(&routes::files_by_hash(&sha256_hex(b"x")), &token)
            .await;

        assert_eq!(res.status, 403);
    }
}

mod health {
    use super::*;

    #[tokio::test]
    async fn health_needs_no_token() {
        let app = TestApp::spawn().await;

        let res = app.get_without_token(routes::HEALTH).await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["status"], "OK");
    }
}
