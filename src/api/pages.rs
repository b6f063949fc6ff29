//! HTML pages of the web tool.

use std::path::PathBuf;

use actix_files::NamedFile;
use actix_web::{HttpRequest, HttpResponse, web};
use tracing::warn;

use crate::config::Config;
use crate::error::{AppError, AppResult};

/// Route path -> page file.
pub const PAGES: &[(&str, &str)] = &[
    ("/", "main.html"),
    ("/dashboard", "dashboard.html"),
    ("/upload", "upload.html"),
    ("/classify", "classify.html"),
    ("/report", "report.html"),
    ("/settings", "settings.html"),
    ("/contact", "contact.html"),
];

fn page_for(path: &str) -> Option<&'static str> {
    PAGES
        .iter()
        .find(|(route, _)| *route == path)
        .map(|(_, file)| *file)
}

async fn render_page(req: HttpRequest, config: web::Data<Config>) -> AppResult<HttpResponse> {
    let file = page_for(req.path())
        .ok_or_else(|| AppError::NotFound(format!("Page {}", req.path())))?;
    let path: PathBuf = config.pages_dir.join(file);

    let page = NamedFile::open_async(&path).await.map_err(|e| {
        warn!(page = %path.display(), error = %e, "Page file missing");
        AppError::NotFound(format!("Page {}", req.path()))
    })?;

    Ok(page.use_last_modified(true).into_response(&req))
}

/// Configure page routes and, when configured, the static asset directory.
pub fn configure_routes(cfg: &mut web::ServiceConfig, static_dir: Option<PathBuf>) {
    for (route, _) in PAGES {
        cfg.service(web::resource(*route).route(web::get().to(render_page)));
    }

    if let Some(dir) = static_dir {
        cfg.service(actix_files::Files::new("/static", dir));
    }
}
