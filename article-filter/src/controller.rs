use utils_common::detail::{close_detail, open_detail};
use utils_common::logging;
use utils_common::{Article, Catalog, CatalogError, DetailSurface, GridSurface, LoadState, MemorySurface, ViewConfig};

use crate::models::{ArticleQuery, ArticleSort, CategorySelection};
use crate::{render_articles, visible_articles};

/// 文章页展示面：网格、详情弹窗，以及分类复选框
pub trait ArticleSurface: GridSurface + DetailSurface {
    /// 让分类复选框与当前选择一致
    fn reflect_categories(&mut self, selection: &CategorySelection);
}

impl ArticleSurface for MemorySurface {
    fn reflect_categories(&mut self, _selection: &CategorySelection) {}
}

/// 文章页状态 - 目录、筛选条件、排序方式，以及唯一的展示面
///
/// 每个输入事件都会完整地重新执行 筛选 -> 排序 -> 渲染。
pub struct ArticleController<S: ArticleSurface> {
    state: LoadState<Article>,
    query: ArticleQuery,
    sort: Option<ArticleSort>,
    config: ViewConfig,
    surface: S,
}

impl<S: ArticleSurface> ArticleController<S> {
    pub fn new(config: ViewConfig, surface: S, sort: Option<ArticleSort>) -> Self {
        Self {
            state: LoadState::Pending,
            query: ArticleQuery::default(),
            sort,
            config,
            surface,
        }
    }

    /// 加载数据文件内容，成功后显示全部文章
    pub fn load(&mut self, data: &[u8]) -> Result<usize, CatalogError> {
        match Catalog::<Article>::from_payload(data) {
            Ok(catalog) => {
                let count = catalog.len();
                logging::log(&format!("已加载 {} 篇文章", count));
                self.state = LoadState::Ready(catalog);
                self.refresh();
                Ok(count)
            }
            Err(e) => {
                self.fail_load(&e.to_string());
                Err(e)
            }
        }
    }

    /// 数据获取失败：显示固定错误提示，计数标签保持不变
    pub fn fail_load(&mut self, reason: &str) {
        logging::error(&format!("Error loading articles: {}", reason));
        self.state = LoadState::Failed(reason.to_string());
        self.surface.clear();
        self.surface.show_message(&self.config.message_class, &self.config.error_message);
    }

    /// 当前应显示的文章
    pub fn visible(&self) -> Vec<&Article> {
        match self.state.catalog() {
            Some(catalog) => visible_articles(catalog, &self.query, self.sort),
            None => Vec::new(),
        }
    }

    /// 重新筛选、排序并渲染；数据未就绪时不做任何事
    pub fn refresh(&mut self) {
        let Some(catalog) = self.state.catalog() else {
            return;
        };
        let visible = visible_articles(catalog, &self.query, self.sort);
        render_articles(&mut self.surface, &visible, &self.config);
    }

    pub fn set_query(&mut self, text: &str) {
        self.query.set_text(text);
        self.refresh();
    }

    /// 分类复选框变化
    pub fn toggle_category(&mut self, value: &str, checked: bool) {
        self.query.categories.toggle(value, checked);
        self.surface.reflect_categories(&self.query.categories);
        self.refresh();
    }

    /// 排序下拉框变化
    pub fn set_sort(&mut self, value: &str) {
        self.sort = ArticleSort::from_value(value);
        self.refresh();
    }

    /// 分类复选框变化，同时采用搜索框中尚未提交的文字；只刷新一次
    pub fn toggle_category_with_text(&mut self, text: &str, value: &str, checked: bool) {
        self.query.set_text(text);
        self.toggle_category(value, checked);
    }

    /// 排序下拉框变化，同时采用搜索框中尚未提交的文字；只刷新一次
    pub fn set_sort_with_text(&mut self, text: &str, value: &str) {
        self.query.set_text(text);
        self.set_sort(value);
    }

    pub fn open_detail(&mut self, id: u32) -> bool {
        open_detail(self.state.catalog(), id, &mut self.surface)
    }

    pub fn close_detail(&mut self) {
        close_detail(&mut self.surface);
    }

    pub fn categories(&self) -> &CategorySelection {
        &self.query.categories
    }

    pub fn state(&self) -> &LoadState<Article> {
        &self.state
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }
}
