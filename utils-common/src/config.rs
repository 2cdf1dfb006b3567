use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// 视图配置 - 视图读写的页面元素和固定提示文案
///
/// 默认值与站点现有页面结构一致，`mount` 时可传入 JSON 覆盖其中部分字段。
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ViewConfig {
    /// 数据文件地址
    pub data_url: String,
    /// 卡片网格容器
    pub grid_id: String,
    /// 数量标签（仅文章视图）
    pub count_id: Option<String>,
    /// 详情弹窗
    pub overlay_id: String,
    /// 弹窗关闭按钮
    pub close_id: String,
    /// 弹窗显示时使用的 display 值
    pub overlay_display: String,
    /// 文本输入框：文章为搜索词，菜谱为自定义食材
    pub text_input_id: String,
    /// 文本输入框旁的提交按钮
    pub text_button_id: String,
    /// 额外的"查找"按钮（仅菜谱视图）
    pub apply_button_id: Option<String>,
    /// 排序下拉框
    pub sort_id: String,
    /// 标签复选框选择器
    pub checkbox_selector: String,
    /// 自定义标签追加到的列表（仅菜谱视图）
    pub custom_list_selector: Option<String>,
    /// 自定义标签的 class（仅菜谱视图）
    pub custom_item_class: Option<String>,
    /// 详情槽位 -> 元素ID
    pub detail_slots: BTreeMap<String, String>,
    /// 提示文案使用的 class
    pub message_class: String,
    /// 无结果提示
    pub empty_message: String,
    /// 加载失败提示
    pub error_message: String,
}

fn slots(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs
        .iter()
        .map(|(slot, id)| (slot.to_string(), id.to_string()))
        .collect()
}

impl ViewConfig {
    /// 文章页默认配置
    pub fn articles() -> Self {
        Self {
            data_url: "assets/articles.json".to_string(),
            grid_id: "articles-grid".to_string(),
            count_id: Some("articles-count".to_string()),
            overlay_id: "article-modal".to_string(),
            close_id: "close-article-modal".to_string(),
            overlay_display: "flex".to_string(),
            text_input_id: "article-search".to_string(),
            text_button_id: "search-article-btn".to_string(),
            apply_button_id: None,
            sort_id: "article-sort".to_string(),
            checkbox_selector: ".filter-item input".to_string(),
            custom_list_selector: None,
            custom_item_class: None,
            detail_slots: slots(&[
                ("title", "article-modal-title"),
                ("image", "article-modal-image"),
                ("author", "article-modal-author"),
                ("date", "article-modal-date"),
                ("read_time", "article-modal-read-time"),
                ("category", "article-modal-category"),
                ("content", "article-modal-content"),
            ]),
            message_class: "no-articles".to_string(),
            empty_message: "No articles found matching your criteria.".to_string(),
            error_message: "Error loading articles. Please try again later.".to_string(),
        }
    }

    /// 菜谱页默认配置
    pub fn recipes() -> Self {
        Self {
            data_url: "assets/recipes.json".to_string(),
            grid_id: "recipe-grid".to_string(),
            count_id: None,
            overlay_id: "recipe-modal".to_string(),
            close_id: "close-modal".to_string(),
            overlay_display: "block".to_string(),
            text_input_id: "ingredient-search".to_string(),
            text_button_id: "add-ingredient-btn".to_string(),
            apply_button_id: Some("find-recipes-btn".to_string()),
            sort_id: "sort-select".to_string(),
            checkbox_selector: ".ingredient-item input".to_string(),
            custom_list_selector: Some(".category:last-child .ingredient-list".to_string()),
            custom_item_class: Some("ingredient-item".to_string()),
            detail_slots: slots(&[
                ("title", "modal-title"),
                ("image", "modal-image"),
                ("country", "country"),
                ("cook_time", "cook-time"),
                ("servings", "servings"),
                ("ingredients", "modal-ingredients"),
                ("instructions", "modal-instructions"),
            ]),
            message_class: "no-recipes".to_string(),
            empty_message: "No recipes found with your selected ingredients.".to_string(),
            error_message: "Error loading recipes. Please try again later.".to_string(),
        }
    }

    /// 用 JSON 对象中出现的字段覆盖当前配置
    pub fn with_overrides(self, json: &str) -> Result<Self, serde_json::Error> {
        let overrides: serde_json::Value = serde_json::from_str(json)?;
        let mut merged = serde_json::to_value(&self)?;

        if let (Some(target), Some(source)) = (merged.as_object_mut(), overrides.as_object()) {
            for (key, value) in source {
                target.insert(key.clone(), value.clone());
            }
        }

        serde_json::from_value(merged)
    }

    /// 槽位对应的元素ID
    pub fn slot_id(&self, slot: &str) -> Option<&str> {
        self.detail_slots.get(slot).map(String::as_str)
    }
}
