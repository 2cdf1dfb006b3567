use wasm_bindgen::prelude::*;
use std::cmp::Ordering;
use utils_common::text::{contains_lowercase, escape_html, leading_integer, parse_publish_date};
use utils_common::{Article, Card, Catalog, GridSurface, ViewConfig};

// 导出模块
pub mod controller;
pub mod models;
pub mod view;

pub use controller::{ArticleController, ArticleSurface};
pub use models::{ArticleQuery, ArticleSort, CategorySelection, ALL_CATEGORIES};

#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

/// 初始化函数 - 设置错误处理
#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
}

/// 版本信息
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// 文章卡片的 class
pub const CARD_CLASS: &str = "article-card";
/// "阅读文章"按钮的 class
pub const ACTION_CLASS: &str = "read-article-btn";

/// 文章过滤器 - 筛选与排序，不接触页面
pub struct ArticleFilter;

impl ArticleFilter {
    /// 按搜索词和分类筛选，保持目录原有顺序
    pub fn filter_articles<'a>(articles: &'a [Article], query: &ArticleQuery) -> Vec<&'a Article> {
        articles
            .iter()
            .filter(|article| Self::matches_text(article, query.text()))
            .filter(|article| query.categories.matches(&article.category))
            .collect()
    }

    // 搜索词出现在标题、摘要、正文或作者中任意一处即可
    fn matches_text(article: &Article, needle: &str) -> bool {
        if needle.is_empty() {
            return true;
        }
        [&article.title, &article.description, &article.content, &article.author]
            .iter()
            .any(|field| contains_lowercase(field, needle))
    }

    /// 对筛选结果排序（稳定排序），不改动目录本身
    pub fn sort_articles(articles: &mut [&Article], sort: Option<ArticleSort>) {
        match sort {
            Some(ArticleSort::Newest) => {
                articles.sort_by(|a, b| Self::compare_dates(b, a));
            }
            Some(ArticleSort::Oldest) => {
                articles.sort_by(|a, b| Self::compare_dates(a, b));
            }
            Some(ArticleSort::ReadTime) => {
                articles.sort_by(|a, b| {
                    leading_integer(&b.read_time).cmp(&leading_integer(&a.read_time))
                });
            }
            None => {}
        }
    }

    // 无法解析的日期视为最早
    fn compare_dates(a: &Article, b: &Article) -> Ordering {
        parse_publish_date(&a.publish_date).cmp(&parse_publish_date(&b.publish_date))
    }
}

/// 当前应显示的文章：先筛选，再排序
pub fn visible_articles<'a>(
    catalog: &'a Catalog<Article>,
    query: &ArticleQuery,
    sort: Option<ArticleSort>,
) -> Vec<&'a Article> {
    let mut visible = ArticleFilter::filter_articles(catalog.entries(), query);
    ArticleFilter::sort_articles(&mut visible, sort);
    visible
}

/// 生成一张文章卡片
pub fn article_card(article: &Article) -> Card {
    let title = escape_html(&article.title);
    let inner_html = format!(
        r#"
      <div class="article-image">
        <img src="{image}" alt="{title}">
      </div>
      <div class="article-content">
        <span class="article-category">{category}</span>
        <h3>{title}</h3>
        <p class="article-desc">{description}</p>
        <div class="article-meta">
          <span class="article-author">By {author}</span>
          <span class="article-date">{date}</span>
          <span class="article-read-time">{read_time}</span>
        </div>
        <button class="{action}" data-id="{id}">Read Article</button>
      </div>
    "#,
        image = escape_html(&article.image),
        title = title,
        category = escape_html(&article.category),
        description = escape_html(&article.description),
        author = escape_html(&article.author),
        date = escape_html(&article.publish_date),
        read_time = escape_html(&article.read_time),
        action = ACTION_CLASS,
        id = article.id,
    );

    Card {
        id: article.id,
        class_name: CARD_CLASS,
        inner_html,
    }
}

/// 渲染文章网格：每次整体重建卡片和按钮绑定
pub fn render_articles<S: GridSurface>(surface: &mut S, articles: &[&Article], config: &ViewConfig) {
    surface.clear();
    surface.set_count(articles.len());

    if articles.is_empty() {
        surface.show_message(&config.message_class, &config.empty_message);
        return;
    }

    for article in articles {
        surface.append_card(&article_card(article));
    }

    let ids: Vec<u32> = articles.iter().map(|article| article.id).collect();
    surface.bind_open_actions(ACTION_CLASS, &ids);
}
