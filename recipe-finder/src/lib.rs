use wasm_bindgen::prelude::*;
use rand::Rng;
use utils_common::text::{escape_html, leading_integer};
use utils_common::{Card, Catalog, GridSurface, Recipe, ViewConfig};

pub mod controller;
pub mod models;
pub mod view;

pub use controller::{RecipeController, RecipeSurface};
pub use models::{CustomIngredient, IngredientSelection, RecipeSort};

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

pub const CARD_CLASS: &str = "recipe-card";
/// "Cook Now" 按钮的 class
pub const ACTION_CLASS: &str = "view-recipe-btn";

/// 未选择食材时匹配度占位值的范围
pub const PLACEHOLDER_SCORE: std::ops::RangeInclusive<u8> = 60..=100;

/// 菜谱查找 - 食材筛选、排序和匹配度
pub struct RecipeFinder;

impl RecipeFinder {
    /// 任意一个已选食材是任意一种配料的子串（不区分大小写）即保留；未选食材时全部保留
    pub fn filter_recipes<'a>(recipes: &'a [Recipe], selected: &[String]) -> Vec<&'a Recipe> {
        if selected.is_empty() {
            return recipes.iter().collect();
        }

        let wanted: Vec<String> = selected.iter().map(|s| s.to_lowercase()).collect();
        recipes
            .iter()
            .filter(|recipe| {
                let ingredients = Self::lowercase_ingredients(recipe);
                wanted
                    .iter()
                    .any(|w| ingredients.iter().any(|ingredient| ingredient.contains(w.as_str())))
            })
            .collect()
    }

    /// 按烹饪时长升序（稳定排序）；时长无法解析时按 0 处理
    pub fn sort_recipes(recipes: &mut [&Recipe], sort: Option<RecipeSort>) {
        if let Some(RecipeSort::CookTime) = sort {
            recipes.sort_by_key(|recipe| leading_integer(&recipe.cook_time));
        }
    }

    /// 已选食材的匹配比例，0 到 100，向下取整；未选食材时为 None
    pub fn ingredient_match(recipe: &Recipe, selected: &[String]) -> Option<u8> {
        if selected.is_empty() {
            return None;
        }

        let ingredients = Self::lowercase_ingredients(recipe);
        let matched = selected
            .iter()
            .filter(|s| {
                let s = s.to_lowercase();
                ingredients.iter().any(|ingredient| ingredient.contains(s.as_str()))
            })
            .count();

        Some((matched * 100 / selected.len()).min(100) as u8)
    }

    /// 卡片上显示的匹配度
    ///
    /// 未选食材时给出 60 到 100 之间的随机占位值，每次渲染重新生成，不代表真实匹配程度。
    pub fn match_score<R: Rng>(recipe: &Recipe, selected: &[String], rng: &mut R) -> u8 {
        Self::ingredient_match(recipe, selected).unwrap_or_else(|| rng.gen_range(PLACEHOLDER_SCORE))
    }

    fn lowercase_ingredients(recipe: &Recipe) -> Vec<String> {
        recipe.ingredients.iter().map(|i| i.to_lowercase()).collect()
    }
}

/// 当前应显示的菜谱：先筛选，再排序
pub fn visible_recipes<'a>(
    catalog: &'a Catalog<Recipe>,
    selected: &[String],
    sort: Option<RecipeSort>,
) -> Vec<&'a Recipe> {
    let mut visible = RecipeFinder::filter_recipes(catalog.entries(), selected);
    RecipeFinder::sort_recipes(&mut visible, sort);
    visible
}

/// 生成一张菜谱卡片
pub fn recipe_card(recipe: &Recipe, score: u8) -> Card {
    let inner_html = format!(
        r#"
      <div class="recipe-image">
        <img src="{image}" alt="{name}">
      </div>
      <div class="recipe-content">
        <h3>{name}</h3>
        <p class="recipe-desc">{description}</p>
        <div class="recipe-meta">
          <span class="cooking-time">{cook_time}</span>
          <span class="matches">{score}% match</span>
        </div>
        <button class="{action}" data-id="{id}">Cook Now</button>
      </div>
    "#,
        image = escape_html(&recipe.image),
        name = escape_html(&recipe.name),
        description = escape_html(&recipe.description),
        cook_time = escape_html(&recipe.cook_time),
        score = score,
        action = ACTION_CLASS,
        id = recipe.id,
    );

    Card {
        id: recipe.id,
        class_name: CARD_CLASS,
        inner_html,
    }
}

/// 渲染菜谱网格，匹配度在每次渲染时重新计算
pub fn render_recipes<S: GridSurface, R: Rng>(
    surface: &mut S,
    recipes: &[&Recipe],
    selected: &[String],
    rng: &mut R,
    config: &ViewConfig,
) {
    surface.clear();

    if recipes.is_empty() {
        surface.show_message(&config.message_class, &config.empty_message);
        return;
    }

    for recipe in recipes {
        let score = RecipeFinder::match_score(recipe, selected, rng);
        surface.append_card(&recipe_card(recipe, score));
    }

    let ids: Vec<u32> = recipes.iter().map(|recipe| recipe.id).collect();
    surface.bind_open_actions(ACTION_CLASS, &ids);
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use utils_common::MemorySurface;

    fn recipe(id: u32, cook_time: &str, ingredients: &[&str]) -> Recipe {
        Recipe {
            id,
            name: format!("Recipe {}", id),
            cook_time: cook_time.to_string(),
            ingredients: ingredients.iter().map(|i| i.to_string()).collect(),
            ..Default::default()
        }
    }

    fn ids(recipes: &[&Recipe]) -> Vec<u32> {
        recipes.iter().map(|r| r.id).collect()
    }

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn filter_matches_substrings_case_insensitively() {
        let catalog = vec![
            recipe(1, "10 min", &["2 Eggs", "Milk"]),
            recipe(2, "20 min", &["Flour"]),
            recipe(3, "30 min", &["Chicken breast"]),
        ];
        assert_eq!(ids(&RecipeFinder::filter_recipes(&catalog, &strings(&["egg"]))), vec![1]);
        assert_eq!(
            ids(&RecipeFinder::filter_recipes(&catalog, &strings(&["CHICKEN", "flour"]))),
            vec![2, 3]
        );
        assert!(RecipeFinder::filter_recipes(&catalog, &strings(&["tofu"])).is_empty());
        assert_eq!(ids(&RecipeFinder::filter_recipes(&catalog, &[])), vec![1, 2, 3]);
    }

    #[test]
    fn score_is_the_floored_match_ratio() {
        let r = recipe(1, "10 min", &["egg", "whole milk", "butter"]);
        assert_eq!(RecipeFinder::ingredient_match(&r, &strings(&["egg"])), Some(100));
        assert_eq!(RecipeFinder::ingredient_match(&r, &strings(&["egg", "milk", "rice"])), Some(66));
        assert_eq!(RecipeFinder::ingredient_match(&r, &strings(&["rice"])), Some(0));
        assert_eq!(RecipeFinder::ingredient_match(&r, &[]), None);
    }

    #[test]
    fn visible_recipe_can_score_low() {
        let catalog = vec![recipe(1, "10 min", &["egg"])];
        let selected = strings(&["egg", "basil", "lime", "rice"]);
        assert_eq!(RecipeFinder::filter_recipes(&catalog, &selected).len(), 1);
        assert_eq!(RecipeFinder::ingredient_match(&catalog[0], &selected), Some(25));
    }

    #[test]
    fn placeholder_score_stays_in_range() {
        let r = recipe(1, "10 min", &["egg"]);
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            let score = RecipeFinder::match_score(&r, &[], &mut rng);
            assert!(PLACEHOLDER_SCORE.contains(&score));
        }
    }

    #[test]
    fn cook_time_sort_is_ascending_and_idempotent() {
        let catalog = vec![
            recipe(1, "45 min", &[]),
            recipe(2, "15 min", &[]),
            recipe(3, "quick", &[]),
            recipe(4, "15 minutes", &[]),
        ];
        let mut visible: Vec<&Recipe> = catalog.iter().collect();
        RecipeFinder::sort_recipes(&mut visible, Some(RecipeSort::CookTime));
        assert_eq!(ids(&visible), vec![3, 2, 4, 1]);

        let once = ids(&visible);
        RecipeFinder::sort_recipes(&mut visible, Some(RecipeSort::CookTime));
        assert_eq!(ids(&visible), once);
    }

    #[test]
    fn render_shows_score_on_each_card() {
        let catalog = vec![recipe(1, "10 min", &["egg", "milk"])];
        let visible: Vec<&Recipe> = catalog.iter().collect();
        let mut surface = MemorySurface::new();
        let mut rng = StdRng::seed_from_u64(1);

        render_recipes(&mut surface, &visible, &strings(&["milk", "rice"]), &mut rng, &ViewConfig::recipes());
        assert_eq!(surface.card_ids(), vec![1]);
        assert!(surface.cards[0].inner_html.contains("50% match"));
        assert!(surface.cards[0].inner_html.contains(r#"data-id="1""#));
        assert_eq!(surface.count, None);
    }
}
