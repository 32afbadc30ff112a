use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    #[serde(default)]
    pub facebook: FacebookConfig,
    #[serde(default)]
    pub instagram: InstagramConfig,
    #[serde(default)]
    pub renderer: RendererConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

/// Facebook Graph API 配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FacebookConfig {
    pub base_url: String,
    /// 单页评论数量
    pub page_size: u32,
}

impl Default for FacebookConfig {
    fn default() -> Self {
        FacebookConfig {
            base_url: "https://graph.facebook.com/v19.0".to_string(),
            page_size: 100,
        }
    }
}

/// Instagram Graph API 配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstagramConfig {
    pub base_url: String,
    pub access_token: String,
    pub page_size: u32,
}

impl Default for InstagramConfig {
    fn default() -> Self {
        InstagramConfig {
            base_url: "https://graph.facebook.com/v19.0".to_string(),
            access_token: String::new(),
            page_size: 100,
        }
    }
}

/// 渲染/发布协作方 (异步产出结果视频)
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct RendererConfig {
    pub base_url: String,
    pub api_key: String,
}

impl Config {
    pub fn from_toml() -> Result<Self, Box<dyn std::error::Error>> {
        let config_path = env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
        use std::io::ErrorKind;

        // 尝试读取配置文件，如果不存在则完全依赖环境变量
        let config_result = std::fs::read_to_string(&config_path);

        let mut config: Config = match config_result {
            Ok(config_str) => {
                // 有配置文件：先解析再用环境变量覆盖
                toml::from_str(&config_str).map_err(|e| format!("解析配置文件失败: {e}"))?
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                // 无配置文件：使用环境变量与默认值构建
                fn get_env(name: &str) -> Option<String> {
                    env::var(name).ok()
                }
                fn get_env_parse<T: std::str::FromStr>(name: &str, default: T) -> T {
                    env::var(name)
                        .ok()
                        .and_then(|v| v.parse::<T>().ok())
                        .unwrap_or(default)
                }

                // 数据库 URL 在无配置文件时必须提供
                let database_url = get_env("DATABASE_URL")
                    .ok_or("缺少 DATABASE_URL 环境变量，且未找到配置文件 config.toml")?;

                Config {
                    server: ServerConfig {
                        host: get_env("SERVER_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
                        port: get_env_parse("SERVER_PORT", 8080u16),
                    },
                    database: DatabaseConfig {
                        url: database_url,
                        max_connections: get_env_parse("DB_MAX_CONNECTIONS", 10u32),
                    },
                    facebook: FacebookConfig {
                        base_url: get_env("FACEBOOK_GRAPH_BASE_URL")
                            .unwrap_or_else(|| FacebookConfig::default().base_url),
                        page_size: get_env_parse("FACEBOOK_PAGE_SIZE", 100u32),
                    },
                    instagram: InstagramConfig {
                        base_url: get_env("INSTAGRAM_GRAPH_BASE_URL")
                            .unwrap_or_else(|| InstagramConfig::default().base_url),
                        access_token: get_env("INSTAGRAM_ACCESS_TOKEN").unwrap_or_default(),
                        page_size: get_env_parse("INSTAGRAM_PAGE_SIZE", 100u32),
                    },
                    renderer: RendererConfig {
                        base_url: get_env("RENDERER_BASE_URL").unwrap_or_default(),
                        api_key: get_env("RENDERER_API_KEY").unwrap_or_default(),
                    },
                }
            }
            Err(e) => {
                return Err(format!("无法读取配置文件 {config_path}: {e}").into());
            }
        };

        // 环境变量覆盖（即便文件存在时也覆盖）
        if let Ok(v) = env::var("SERVER_HOST") {
            config.server.host = v;
        }
        if let Ok(v) = env::var("SERVER_PORT")
            && let Ok(p) = v.parse()
        {
            config.server.port = p;
        }
        if let Ok(v) = env::var("DATABASE_URL") {
            config.database.url = v;
        }
        if let Ok(v) = env::var("DB_MAX_CONNECTIONS")
            && let Ok(mc) = v.parse()
        {
            config.database.max_connections = mc;
        }
        if let Ok(v) = env::var("FACEBOOK_GRAPH_BASE_URL") {
            config.facebook.base_url = v;
        }
        if let Ok(v) = env::var("FACEBOOK_PAGE_SIZE")
            && let Ok(n) = v.parse()
        {
            config.facebook.page_size = n;
        }
        if let Ok(v) = env::var("INSTAGRAM_GRAPH_BASE_URL") {
            config.instagram.base_url = v;
        }
        if let Ok(v) = env::var("INSTAGRAM_ACCESS_TOKEN") {
            config.instagram.access_token = v;
        }
        if let Ok(v) = env::var("INSTAGRAM_PAGE_SIZE")
            && let Ok(n) = v.parse()
        {
            config.instagram.page_size = n;
        }
        if let Ok(v) = env::var("RENDERER_BASE_URL") {
            config.renderer.base_url = v;
        }
        if let Ok(v) = env::var("RENDERER_API_KEY") {
            config.renderer.api_key = v;
        }

        Ok(config)
    }
}
