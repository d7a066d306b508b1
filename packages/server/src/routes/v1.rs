use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::config::AppConfig;
use crate::handlers;
use crate::state::AppState;

pub fn routes(config: &AppConfig) -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .nest("/files", file_routes(config))
        .nest("/students", student_routes())
        .nest("/analysis", analysis_routes())
}

fn file_routes(config: &AppConfig) -> OpenApiRouter<AppState> {
    let upload = OpenApiRouter::new()
        .routes(routes!(handlers::file::upload_file))
        .layer(handlers::file::upload_body_limit(config.storage.max_file_size));

    let read = OpenApiRouter::new()
        .routes(routes!(handlers::file::download_file))
        .routes(routes!(handlers::file::list_files_by_hash));

    upload.merge(read)
}

fn student_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new().routes(routes!(handlers::file::list_student_files))
}

fn analysis_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::analysis::check_plagiarism))
        .routes(routes!(handlers::analysis::word_cloud))
}
