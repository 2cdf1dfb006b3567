pub mod catalog;
pub mod compression;
pub mod config;
pub mod detail;
pub mod dom;
pub mod logging;
pub mod models;
pub mod surface;
pub mod text;

// 重新导出常用类型，方便直接使用
pub use catalog::{Catalog, CatalogError, LoadState};
pub use config::ViewConfig;
pub use models::{Article, Entity, Recipe};
pub use surface::{Card, DetailSurface, DetailValue, GridSurface, MemorySurface};
