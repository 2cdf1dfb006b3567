use rand::Rng;
use utils_common::detail::{close_detail, open_detail};
use utils_common::logging;
use utils_common::{Catalog, CatalogError, DetailSurface, GridSurface, LoadState, MemorySurface, Recipe, ViewConfig};

use crate::models::{CustomIngredient, IngredientSelection, RecipeSort};
use crate::{render_recipes, visible_recipes};

/// 菜谱页展示面：网格、详情弹窗，以及食材列表
pub trait RecipeSurface: GridSurface + DetailSurface {
    /// 在食材列表末尾追加一个未勾选的自定义食材
    fn append_ingredient(&mut self, ingredient: &CustomIngredient);
    /// 清空自定义食材输入框
    fn clear_ingredient_input(&mut self);
}

impl RecipeSurface for MemorySurface {
    fn append_ingredient(&mut self, _ingredient: &CustomIngredient) {}

    fn clear_ingredient_input(&mut self) {}
}

/// 菜谱页状态
///
/// 匹配度占位值的随机源由调用方注入。
pub struct RecipeController<S: RecipeSurface, R: Rng> {
    state: LoadState<Recipe>,
    selection: IngredientSelection,
    sort: Option<RecipeSort>,
    config: ViewConfig,
    surface: S,
    rng: R,
}

impl<S: RecipeSurface, R: Rng> RecipeController<S, R> {
    pub fn new(
        config: ViewConfig,
        surface: S,
        selection: IngredientSelection,
        sort: Option<RecipeSort>,
        rng: R,
    ) -> Self {
        Self {
            state: LoadState::Pending,
            selection,
            sort,
            config,
            surface,
            rng,
        }
    }

    /// 加载数据文件内容，成功后显示全部菜谱
    pub fn load(&mut self, data: &[u8]) -> Result<usize, CatalogError> {
        match Catalog::<Recipe>::from_payload(data) {
            Ok(catalog) => {
                let count = catalog.len();
                logging::log(&format!("已加载 {} 个菜谱", count));
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

    pub fn fail_load(&mut self, reason: &str) {
        logging::error(&format!("Error loading recipes: {}", reason));
        self.state = LoadState::Failed(reason.to_string());
        self.surface.clear();
        self.surface.show_message(&self.config.message_class, &self.config.error_message);
    }

    /// 当前应显示的菜谱
    pub fn visible(&self) -> Vec<&Recipe> {
        match self.state.catalog() {
            Some(catalog) => visible_recipes(catalog, self.selection.selected(), self.sort),
            None => Vec::new(),
        }
    }

    /// 重新筛选、排序并渲染；数据未就绪时不做任何事
    pub fn refresh(&mut self) {
        let Some(catalog) = self.state.catalog() else {
            return;
        };
        let selected = self.selection.selected();
        let visible = visible_recipes(catalog, selected, self.sort);
        render_recipes(&mut self.surface, &visible, selected, &mut self.rng, &self.config);
    }

    /// 食材复选框变化，立即刷新
    pub fn toggle_ingredient(&mut self, value: &str, checked: bool) {
        self.selection.toggle(value, checked);
        self.refresh();
    }

    pub fn set_sort(&mut self, value: &str) {
        self.sort = RecipeSort::from_value(value);
        self.refresh();
    }

    /// 添加自定义食材，成功时清空输入框；不触发刷新
    pub fn add_custom_ingredient(&mut self, input: &str) -> Option<CustomIngredient> {
        let custom = self.selection.add_custom(input)?;
        self.surface.append_ingredient(&custom);
        self.surface.clear_ingredient_input();
        Some(custom)
    }

    pub fn open_detail(&mut self, id: u32) -> bool {
        open_detail(self.state.catalog(), id, &mut self.surface)
    }

    pub fn close_detail(&mut self) {
        close_detail(&mut self.surface);
    }

    pub fn selection(&self) -> &IngredientSelection {
        &self.selection
    }

    pub fn state(&self) -> &LoadState<Recipe> {
        &self.state
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }
}
