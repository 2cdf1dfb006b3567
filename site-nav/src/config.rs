use serde::{Deserialize, Serialize};

/// 页面骨架中各部件的选择器
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct NavConfig {
    pub header: String,
    pub site_title: String,
    pub menu_button: String,
    pub nav: String,
    pub nav_links: String,
    pub anchors: String,
    pub sections: String,
    pub hero_video: String,
    pub steps: String,
    /// 没有 hash 时默认高亮的链接
    pub default_href: String,
}

impl Default for NavConfig {
    fn default() -> Self {
        Self {
            header: "header".to_string(),
            site_title: ".site-title".to_string(),
            menu_button: ".menu-button".to_string(),
            nav: ".head-right".to_string(),
            nav_links: ".head-right a".to_string(),
            anchors: r##"a[href^="#"]"##.to_string(),
            sections: "section".to_string(),
            hero_video: ".hero-video".to_string(),
            steps: ".step".to_string(),
            default_href: "#home".to_string(),
        }
    }
}

impl NavConfig {
    /// 解析 JSON 覆盖项，未出现的字段保持默认
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let config = NavConfig::from_json(r#"{"nav": ".main-nav", "nav_links": ".main-nav a"}"#).unwrap();
        assert_eq!(config.nav, ".main-nav");
        assert_eq!(config.menu_button, ".menu-button");
        assert_eq!(config.default_href, "#home");
    }

    #[test]
    fn wrong_type_is_rejected() {
        assert!(NavConfig::from_json(r#"{"steps": false}"#).is_err());
    }
}
