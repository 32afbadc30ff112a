use actix_web::{App, HttpServer, middleware::Logger, web};
use chrono::Local; // timestamp in log lines
use env_logger::{Env, Target};
use std::io::Write; // for env_logger custom formatter

use giveaway_backend::{
    config::Config,
    database::{create_pool, run_migrations},
    external::{CommentSources, FacebookApi, InstagramApi, RendererClient},
    handlers,
    middlewares::create_cors,
    services::{DrawService, PublishService, SyncService, WinnerService},
    swagger::swagger_config,
};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .format(|buf, record| {
            let ts = Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%:z");
            let level = record.level().as_str().to_ascii_lowercase();
            let msg_json = serde_json::to_string(&format!("{}", record.args()))
                .unwrap_or_else(|_| "\"<invalid utf8>\"".to_string());
            writeln!(
                buf,
                "{{\"timestamp\":\"{}\",\"level\":\"{}\",\"message\":{},\"target\":\"{}\"}}",
                ts,
                level,
                msg_json,
                record.target(),
            )
        })
        .target(Target::Stdout)
        .init();

    // 加载配置
    let config = Config::from_toml().expect("Failed to load configuration file");

    // 创建数据库连接池
    let pool = create_pool(&config.database)
        .await
        .expect("Failed to create database connection pool");

    // 运行数据库迁移
    run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");

    // 外部客户端
    let comment_sources = CommentSources {
        facebook: FacebookApi::new(config.facebook.clone()),
        instagram: InstagramApi::new(config.instagram.clone()),
    };
    let renderer = RendererClient::new(config.renderer.clone());

    // 创建服务
    let draw_service = DrawService::new(pool.clone());
    let sync_service = SyncService::new(pool.clone(), comment_sources);
    let winner_service = WinnerService::new(pool.clone());
    let publish_service = PublishService::new(pool.clone(), winner_service.clone(), renderer);

    // 启动HTTP服务器
    log::info!(
        "Starting HTTP server at {}:{}",
        config.server.host,
        config.server.port
    );

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(create_cors())
            .app_data(web::Data::new(draw_service.clone()))
            .app_data(web::Data::new(sync_service.clone()))
            .app_data(web::Data::new(winner_service.clone()))
            .app_data(web::Data::new(publish_service.clone()))
            .configure(swagger_config)
            .service(web::scope("/api/v1").configure(handlers::draw_config))
    })
    .bind((config.server.host.as_str(), config.server.port))?
    .run()
    .await
}
