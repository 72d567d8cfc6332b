use std::path::PathBuf;

use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[command(name = "camp", about = "Terminal client for Project Camp")]
pub struct Config {
    /// API server URL
    #[arg(long, env = "CAMP_SERVER_URL", default_value = "http://127.0.0.1:8000")]
    pub server_url: String,

    /// API key sent as a bearer token
    #[arg(long, env = "CAMP_API_KEY")]
    pub api_key: Option<String>,

    /// Open this project directly instead of the project list
    #[arg(long)]
    pub project: Option<String>,

    /// Where to write logs; the terminal itself is taken by the UI
    #[arg(long, env = "CAMP_LOG_FILE", default_value = "camp.log")]
    pub log_file: PathBuf,

    /// Path of the demo video, relative to the server URL
    #[arg(long, default_value = "/Demo.mp4")]
    pub demo_url: String,
}

impl Config {
    /// API key with empty values treated as unset.
    pub fn api_key(&self) -> Option<String> {
        self.api_key.clone().filter(|k| !k.is_empty())
    }

    /// Absolute URL of the demo video.
    pub fn demo_link(&self) -> String {
        if self.demo_url.starts_with("http://") || self.demo_url.starts_with("https://") {
            self.demo_url.clone()
        } else {
            format!(
                "{}/{}",
                self.server_url.trim_end_matches('/'),
                self.demo_url.trim_start_matches('/')
            )
        }
    }
}
