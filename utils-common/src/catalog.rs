use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::compression;
use crate::models::Entity;

/// 目录加载与查询错误
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("解析数据失败: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("读取快照失败: {0}")]
    Snapshot(#[from] std::io::Error),
    #[error("数据缺少 `{0}` 列表字段")]
    MissingCollection(&'static str),
    #[error("条目ID重复: {0}")]
    DuplicateId(u32),
    #[error("未找到ID为 {0} 的条目")]
    NotFound(u32),
}

/// 快照文件内容 - 记录列表字段名，防止把菜谱快照当成文章加载
#[derive(Serialize, Deserialize, Debug)]
pub struct CatalogSnapshot<E> {
    pub collection: String,
    pub entries: Vec<E>,
}

/// 目录 - 启动时加载一次，之后只读
#[derive(Debug, Clone)]
pub struct Catalog<E: Entity> {
    entries: Vec<E>,
}

impl<E: Entity> Catalog<E> {
    /// 由条目列表构建目录，ID必须唯一
    pub fn from_entries(entries: Vec<E>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::with_capacity(entries.len());
        for entry in &entries {
            if !seen.insert(entry.id()) {
                return Err(CatalogError::DuplicateId(entry.id()));
            }
        }
        Ok(Self { entries })
    }

    /// 从数据文件内容加载：JSON 文档或压缩快照
    pub fn from_payload(data: &[u8]) -> Result<Self, CatalogError> {
        if compression::is_snapshot(data) {
            let snapshot: CatalogSnapshot<E> = compression::from_snapshot(data)?;
            if snapshot.collection != E::COLLECTION {
                return Err(CatalogError::MissingCollection(E::COLLECTION));
            }
            return Self::from_entries(snapshot.entries);
        }

        let mut document: serde_json::Value = serde_json::from_slice(data)?;
        let list = document
            .get_mut(E::COLLECTION)
            .filter(|value| value.is_array())
            .map(serde_json::Value::take)
            .ok_or(CatalogError::MissingCollection(E::COLLECTION))?;

        Self::from_entries(serde_json::from_value(list)?)
    }

    /// 生成可写入文件的压缩快照
    pub fn to_snapshot(&self) -> Result<Vec<u8>, CatalogError> {
        let snapshot = CatalogSnapshot {
            collection: E::COLLECTION.to_string(),
            entries: self.entries.clone(),
        };
        Ok(compression::to_snapshot(&snapshot)?)
    }

    pub fn find_by_id(&self, id: u32) -> Result<&E, CatalogError> {
        self.entries
            .iter()
            .find(|entry| entry.id() == id)
            .ok_or(CatalogError::NotFound(id))
    }

    /// 按原始顺序的全部条目
    pub fn entries(&self) -> &[E] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// 目录加载状态
#[derive(Debug)]
pub enum LoadState<E: Entity> {
    /// 数据尚未返回
    Pending,
    Ready(Catalog<E>),
    /// 加载失败，不保留任何部分数据
    Failed(String),
}

impl<E: Entity> Default for LoadState<E> {
    fn default() -> Self {
        LoadState::Pending
    }
}

impl<E: Entity> LoadState<E> {
    pub fn catalog(&self) -> Option<&Catalog<E>> {
        match self {
            LoadState::Ready(catalog) => Some(catalog),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Article, Recipe};

    const RECIPES: &str = r#"{"recipes": [
        {"id": 2, "name": "B", "cookTime": "30 min", "ingredients": ["flour", "egg"]},
        {"id": 1, "name": "A", "cookTime": "10 min", "ingredients": ["egg", "milk"]}
    ]}"#;

    #[test]
    fn loads_json_in_source_order() {
        let catalog = Catalog::<Recipe>::from_payload(RECIPES.as_bytes()).unwrap();
        let ids: Vec<u32> = catalog.entries().iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![2, 1]);
        assert_eq!(catalog.find_by_id(1).unwrap().name, "A");
    }

    #[test]
    fn unknown_id_is_not_found() {
        let catalog = Catalog::<Recipe>::from_payload(RECIPES.as_bytes()).unwrap();
        assert!(matches!(catalog.find_by_id(99), Err(CatalogError::NotFound(99))));
    }

    #[test]
    fn missing_collection_fails_the_load() {
        let err = Catalog::<Article>::from_payload(RECIPES.as_bytes()).unwrap_err();
        assert!(matches!(err, CatalogError::MissingCollection("articles")));
    }

    #[test]
    fn malformed_json_fails_the_load() {
        let err = Catalog::<Recipe>::from_payload(b"{\"recipes\": [").unwrap_err();
        assert!(matches!(err, CatalogError::Parse(_)));
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let data = r#"{"recipes": [{"id": 3}, {"id": 3}]}"#;
        let err = Catalog::<Recipe>::from_payload(data.as_bytes()).unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateId(3)));
    }

    #[test]
    fn snapshot_loads_like_json() {
        let catalog = Catalog::<Recipe>::from_payload(RECIPES.as_bytes()).unwrap();
        let snapshot = catalog.to_snapshot().unwrap();
        let restored = Catalog::<Recipe>::from_payload(&snapshot).unwrap();
        assert_eq!(restored.entries(), catalog.entries());

        assert!(Catalog::<Article>::from_payload(&snapshot).is_err());
    }
}
