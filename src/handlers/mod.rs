pub mod draw;
pub mod entry;
pub mod winner;

use actix_web::web;

/// 路由配置 (全部挂在 /draws 下)
pub fn draw_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/draws")
            .route("", web::post().to(draw::create_draw))
            .route("/{id}", web::get().to(draw::get_draw))
            .route("/{id}", web::patch().to(draw::update_draw))
            .route("/{id}/rules", web::put().to(draw::upsert_rules))
            .route("/{id}/source", web::put().to(draw::upsert_source))
            .route("/{id}/ready", web::post().to(draw::mark_ready))
            .route("/{id}/freeze", web::post().to(draw::freeze))
            .route("/{id}/sync", web::post().to(entry::sync_draw))
            .route("/{id}/snapshot", web::get().to(entry::latest_snapshot))
            .route("/{id}/entries", web::get().to(entry::list_entries))
            .route("/{id}/draw", web::post().to(winner::run_draw))
            .route("/{id}/winners", web::get().to(winner::list_winners))
            .route("/{id}/publish", web::post().to(winner::publish)),
    );
}
