use axum::{Router, extract::DefaultBodyLimit, routing::get};
use deployment::Deployment;
use tower_http::{services::ServeDir, trace::TraceLayer};
use utils::assets::SCHOOL_IMAGES_DIR;

use crate::{DeploymentImpl, routes};

/// Room for the text fields and multipart framing on top of the image itself.
const FORM_OVERHEAD_BYTES: u64 = 64 * 1024;

fn upload_body_limit(max_image_bytes: u64) -> usize {
    usize::try_from(max_image_bytes.saturating_add(FORM_OVERHEAD_BYTES)).unwrap_or(usize::MAX)
}

pub fn router(deployment: DeploymentImpl) -> Router {
    let body_limit = upload_body_limit(deployment.config().images.max_size_bytes);
    let images_dir = deployment.school().images().images_dir().to_path_buf();

    let api_routes = Router::new()
        .merge(routes::schools::router())
        .layer(DefaultBodyLimit::max(body_limit));

    Router::new()
        .route("/health", get(routes::health::health_check))
        .nest("/api", api_routes)
        .nest_service(&format!("/{SCHOOL_IMAGES_DIR}"), ServeDir::new(images_dir))
        .layer(TraceLayer::new_for_http())
        .with_state(deployment)
}
