//! 天气工具：wttr.in 按城市名查询
//!
//! GET https://wttr.in/{city}?format=%C+%t，返回一行人类可读的当前天气；
//! 任何失败（含 HTTP 客户端初始化）都渲染为描述性文本返回，不上抛。

use async_trait::async_trait;
use reqwest::Client;

use crate::tools::ToolCapability;

/// 天气能力：无共享状态，相同城市重复调用互不影响
pub struct WeatherTool {
    timeout_secs: u64,
}

impl WeatherTool {
    pub fn new(timeout_secs: u64) -> Self {
        Self { timeout_secs }
    }

    /// 客户端按调用构建：初始化失败走 errors-as-data 路径而非回退丢配置
    fn client(&self) -> Result<Client, String> {
        Client::builder()
            .timeout(std::time::Duration::from_secs(self.timeout_secs))
            .user_agent("mantis-agent/0.1")
            .build()
            .map_err(|e| format!("http client init: {e}"))
    }

    async fn fetch(&self, city: &str) -> Result<String, String> {
        let url = format!("https://wttr.in/{}?format=%C+%t", city.to_lowercase());
        let resp = self
            .client()?
            .get(&url)
            .send()
            .await
            .map_err(|e| format!("request failed: {e}"))?;
        if !resp.status().is_success() {
            return Err(format!("HTTP {}", resp.status()));
        }
        let body = resp.text().await.map_err(|e| format!("read body: {e}"))?;
        Ok(body.trim().to_string())
    }
}

#[async_trait]
impl ToolCapability for WeatherTool {
    fn name(&self) -> &'static str {
        "weather-by-city"
    }

    fn description(&self) -> &'static str {
        "weather-by-city(city: string): Returns the current weather conditions for the given city name."
    }

    async fn invoke(&self, input: &str) -> String {
        let city = input.trim();
        if city.is_empty() {
            return "Weather lookup failed: empty city name.".to_string();
        }
        tracing::info!(city = %city, "weather tool fetch");
        match self.fetch(city).await {
            Ok(conditions) => format!("The weather in {city} is currently: {conditions}"),
            Err(e) => format!("Weather lookup failed for '{city}': {e}"),
        }
    }
}
