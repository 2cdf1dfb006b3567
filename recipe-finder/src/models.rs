use serde::{Deserialize, Serialize};

/// 食材选择 - 页面上全部可选食材，以及当前勾选的食材
///
/// 没有"全部"选项，未勾选任何食材即不筛选。
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct IngredientSelection {
    /// 可选食材的值，按出现顺序
    options: Vec<String>,
    /// 已勾选的食材，按勾选顺序
    selected: Vec<String>,
}

/// 新增的自定义食材
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomIngredient {
    /// 复选框的值（小写）
    pub value: String,
    /// 显示文字（保留输入时的大小写）
    pub label: String,
}

impl IngredientSelection {
    pub fn with_options<I, T>(options: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        let mut selection = Self::default();
        for option in options {
            let option = option.into();
            if !selection.options.contains(&option) {
                selection.options.push(option);
            }
        }
        selection
    }

    /// 复选框勾选状态变化
    pub fn toggle(&mut self, value: &str, checked: bool) {
        if checked {
            if !self.selected.iter().any(|s| s == value) {
                self.selected.push(value.to_string());
            }
        } else {
            self.selected.retain(|s| s != value);
        }
    }

    /// 添加自定义食材；输入为空或食材已存在时返回 None
    ///
    /// 新食材不会自动勾选。
    pub fn add_custom(&mut self, input: &str) -> Option<CustomIngredient> {
        let label = input.trim();
        if label.is_empty() {
            return None;
        }

        let value = label.to_lowercase();
        if self.options.contains(&value) {
            return None;
        }
        self.options.push(value.clone());

        Some(CustomIngredient {
            value,
            label: label.to_string(),
        })
    }

    pub fn selected(&self) -> &[String] {
        &self.selected
    }

    pub fn options(&self) -> &[String] {
        &self.options
    }
}

/// 排序方式，对应排序下拉框的值
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecipeSort {
    /// "time" - 烹饪时长升序
    CookTime,
}

impl RecipeSort {
    /// 其它值保持原有顺序
    pub fn from_value(value: &str) -> Option<Self> {
        match value {
            "time" => Some(RecipeSort::CookTime),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_tracks_checked_values() {
        let mut selection = IngredientSelection::with_options(["egg", "milk"]);
        selection.toggle("egg", true);
        selection.toggle("milk", true);
        selection.toggle("egg", true);
        assert_eq!(selection.selected(), ["egg", "milk"]);
        selection.toggle("egg", false);
        assert_eq!(selection.selected(), ["milk"]);
    }

    #[test]
    fn custom_ingredient_is_trimmed_and_case_folded() {
        let mut selection = IngredientSelection::with_options(["egg"]);
        let custom = selection.add_custom("  Smoked Paprika ").unwrap();
        assert_eq!(custom.value, "smoked paprika");
        assert_eq!(custom.label, "Smoked Paprika");
        assert!(selection.selected().is_empty());
        assert_eq!(selection.options(), ["egg", "smoked paprika"]);
    }

    #[test]
    fn blank_or_known_custom_ingredient_is_ignored() {
        let mut selection = IngredientSelection::with_options(["egg"]);
        assert_eq!(selection.add_custom("   "), None);
        assert_eq!(selection.add_custom("EGG"), None);
        assert_eq!(selection.options(), ["egg"]);
    }

    #[test]
    fn sort_values() {
        assert_eq!(RecipeSort::from_value("time"), Some(RecipeSort::CookTime));
        assert_eq!(RecipeSort::from_value("default"), None);
    }
}
