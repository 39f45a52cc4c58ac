use crate::api::middleware::{AdminAuth, NonceGuard};
use crate::api::services::{admin_v1_routes, legacy_routes};
use crate::config::get_config;
use crate::services::{
    AnalyticsService, BulkProcessor, LinkStore, PresetStore, QrGenerator, SettingsService,
    TemplateStore, UrlShortener, UtmGenerator,
};
use crate::storage::{SeaOrmStorage, StorageFactory};
use crate::system::event::EventBus;
use actix_web::web;
use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::{debug, info};

/// 事件历史保留条数
const EVENT_HISTORY_SIZE: usize = 100;

/// 启动后共享的全部服务
#[derive(Clone)]
pub struct StartupContext {
    pub storage: Arc<SeaOrmStorage>,
    pub events: Arc<EventBus>,
    pub settings: Arc<SettingsService>,
    pub presets: Arc<PresetStore>,
    pub templates: Arc<TemplateStore>,
    pub links: Arc<LinkStore>,
    pub bulk: Arc<BulkProcessor>,
    pub shortener: Arc<UrlShortener>,
    pub qr: Arc<QrGenerator>,
    pub analytics: Arc<AnalyticsService>,
    pub route_config: RouteConfig,
}

#[derive(Clone, Debug)]
pub struct RouteConfig {
    pub admin_prefix: String,
}

impl StartupContext {
    /// 在已连接的存储上组装服务并注册事件处理器
    pub async fn build(storage: Arc<SeaOrmStorage>) -> Result<Self> {
        let config = get_config();

        let settings = Arc::new(SettingsService::new(storage.clone()));
        settings
            .ensure_defaults()
            .await
            .context("Failed to write default settings")?;

        let presets = Arc::new(PresetStore::new(storage.clone()));
        let templates = Arc::new(TemplateStore::new(storage.clone()));
        let links = Arc::new(LinkStore::new(
            storage.clone(),
            storage.clone(),
            presets.clone(),
        ));

        let events = Arc::new(EventBus::new(EVENT_HISTORY_SIZE));
        events.register_handler(Arc::new(UtmGenerator::new(settings.clone(), links.clone())));
        debug!("UTM generator registered on event bus");

        let bulk = Arc::new(BulkProcessor::new(
            settings.clone(),
            storage.clone(),
            links.clone(),
            events.clone(),
        ));
        let shortener = Arc::new(UrlShortener::new(
            settings.clone(),
            config.integrations.shortener_cache_ttl_secs,
        ));
        let qr = Arc::new(QrGenerator::new(&config.integrations));
        let analytics = Arc::new(AnalyticsService::new(settings.clone()));

        Ok(Self {
            storage,
            events,
            settings,
            presets,
            templates,
            links,
            bulk,
            shortener,
            qr,
            analytics,
            route_config: RouteConfig {
                admin_prefix: config.server.admin_prefix.clone(),
            },
        })
    }

    /// 注册 app_data 与路由
    pub fn configure(&self, cfg: &mut web::ServiceConfig) {
        cfg.app_data(web::Data::new(self.storage.clone()))
            .app_data(web::Data::new(self.events.clone()))
            .app_data(web::Data::new(self.settings.clone()))
            .app_data(web::Data::new(self.presets.clone()))
            .app_data(web::Data::new(self.templates.clone()))
            .app_data(web::Data::new(self.links.clone()))
            .app_data(web::Data::new(self.bulk.clone()))
            .app_data(web::Data::new(self.shortener.clone()))
            .app_data(web::Data::new(self.qr.clone()))
            .app_data(web::Data::new(self.analytics.clone()))
            .service(
                web::scope(&self.route_config.admin_prefix)
                    .wrap(NonceGuard)
                    .wrap(AdminAuth)
                    .service(admin_v1_routes())
                    .service(legacy_routes()),
            );
    }
}

/// 准备服务器启动的上下文
/// 包括存储、服务和路由配置等
pub async fn prepare_server_startup() -> Result<StartupContext> {
    let start_time = std::time::Instant::now();
    debug!("Starting pre-startup processing...");

    let storage = StorageFactory::create()
        .await
        .context("Failed to create storage backend")?;
    info!(
        "Using storage backend: {}",
        storage.get_backend_config().storage_type
    );

    let context = StartupContext::build(storage).await?;

    info!(
        "Pre-startup processing completed in {} ms",
        start_time.elapsed().as_millis()
    );
    Ok(context)
}
