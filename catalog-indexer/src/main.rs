use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;
use clap::{Arg, ArgAction, Command};
use walkdir::WalkDir;

use utils_common::text::{parse_leading_integer, parse_publish_date};
use utils_common::{Article, Catalog, Entity, Recipe};

/// 数据文件中的目录类型，由顶层列表字段决定
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CatalogKind {
    Articles,
    Recipes,
}

impl CatalogKind {
    fn detect(document: &serde_json::Value) -> Option<Self> {
        if document.get(Article::COLLECTION).map_or(false, |v| v.is_array()) {
            Some(CatalogKind::Articles)
        } else if document.get(Recipe::COLLECTION).map_or(false, |v| v.is_array()) {
            Some(CatalogKind::Recipes)
        } else {
            None
        }
    }

    fn name(&self) -> &'static str {
        match self {
            CatalogKind::Articles => Article::COLLECTION,
            CatalogKind::Recipes => Recipe::COLLECTION,
        }
    }
}

/// 单个数据文件的检查结果
#[derive(Debug)]
struct FileReport {
    kind: CatalogKind,
    entries: usize,
    /// 不影响加载的数据问题
    warnings: Vec<String>,
    /// 分组统计：文章按分类，菜谱按国家
    groups: BTreeMap<String, usize>,
    snapshot: Vec<u8>,
}

// 主函数
fn main() {
    let matches = Command::new("目录数据检查工具")
        .version(env!("CARGO_PKG_VERSION"))
        .about("检查文章和菜谱数据文件，并生成压缩快照")
        .arg(Arg::new("source")
            .short('s')
            .long("source")
            .value_name("SOURCE_DIR")
            .help("数据文件目录")
            .required(true))
        .arg(Arg::new("output")
            .short('o')
            .long("output")
            .value_name("OUTPUT_DIR")
            .help("快照输出目录")
            .required_unless_present("check"))
        .arg(Arg::new("verbose")
            .short('v')
            .long("verbose")
            .help("显示每个文件的详细信息")
            .action(ArgAction::SetTrue))
        .arg(Arg::new("check")
            .short('c')
            .long("check")
            .help("只检查，不写入快照")
            .action(ArgAction::SetTrue))
        .get_matches();

    let Some(source_dir) = matches.get_one::<String>("source") else {
        eprintln!("错误: 缺少数据文件目录");
        std::process::exit(1);
    };
    let verbose = matches.get_flag("verbose");
    let check_only = matches.get_flag("check");
    let output_dir = if check_only {
        None
    } else {
        matches.get_one::<String>("output").map(String::as_str)
    };

    let source_path = Path::new(source_dir);
    if !source_path.is_dir() {
        eprintln!("错误: 数据目录不存在或不是有效目录 '{}'", source_dir);
        std::process::exit(1);
    }

    if let Some(output_dir) = output_dir {
        if let Err(e) = fs::create_dir_all(output_dir) {
            eprintln!("错误: 无法创建输出目录 '{}': {}", output_dir, e);
            std::process::exit(1);
        }
    }

    println!("开始检查数据文件...");
    println!("数据目录: {}", source_dir);
    if let Some(output_dir) = output_dir {
        println!("输出目录: {}", output_dir);
    }

    match index_catalogs(source_path, output_dir.map(Path::new), verbose) {
        Ok(0) => {
            eprintln!("错误: 没有找到目录数据文件");
            std::process::exit(1);
        }
        Ok(count) => println!("完成，共处理 {} 个数据文件 ({})", count, Utc::now().format("%Y-%m-%d %H:%M:%S UTC")),
        Err(e) => {
            eprintln!("错误: {}", e);
            std::process::exit(1);
        }
    }
}

// 检查目录下全部数据文件，返回处理的文件数；任何一个文件无法加载即失败
fn index_catalogs(source_dir: &Path, output_dir: Option<&Path>, verbose: bool) -> Result<usize, String> {
    let start_time = std::time::Instant::now();
    let files = scan_json_files(source_dir)?;
    if verbose {
        println!("找到 {} 个 JSON 文件", files.len());
    }

    let mut processed = 0;
    let mut failures = Vec::new();

    for path in &files {
        let data = fs::read(path).map_err(|e| format!("无法读取文件 {}: {}", path.display(), e))?;
        let report = match inspect_payload(&data) {
            Ok(Some(report)) => report,
            Ok(None) => {
                if verbose {
                    println!("跳过 {}: 不是目录数据文件", path.display());
                }
                continue;
            }
            Err(e) => {
                eprintln!("加载失败 {}: {}", path.display(), e);
                failures.push(path.display().to_string());
                continue;
            }
        };
        processed += 1;

        println!("{}: {} 个{}", path.display(), report.entries, report.kind.name());
        for warning in &report.warnings {
            println!("  警告: {}", warning);
        }
        if verbose {
            for (group, count) in &report.groups {
                println!("  {}: {}", if group.is_empty() { "(未分组)" } else { group.as_str() }, count);
            }
        }

        if let Some(output_dir) = output_dir {
            let target = snapshot_path(output_dir, path);
            fs::write(&target, &report.snapshot)
                .map_err(|e| format!("无法写入快照 {}: {}", target.display(), e))?;
            if verbose {
                println!("  快照: {} ({} 字节)", target.display(), report.snapshot.len());
            }
        }
    }

    if !failures.is_empty() {
        return Err(format!("{} 个文件无法加载: {}", failures.len(), failures.join(", ")));
    }

    if verbose {
        println!("耗时: {:.2}秒", start_time.elapsed().as_secs_f32());
    }
    Ok(processed)
}

// 递归查找 .json 文件，按路径排序
fn scan_json_files(dir: &Path) -> Result<Vec<PathBuf>, String> {
    let mut files = Vec::new();
    for entry in WalkDir::new(dir) {
        let entry = entry.map_err(|e| format!("遍历目录时出错: {}", e))?;
        if entry.file_type().is_file() && entry.path().extension().map_or(false, |ext| ext == "json") {
            files.push(entry.into_path());
        }
    }
    files.sort();
    Ok(files)
}

fn snapshot_path(output_dir: &Path, source: &Path) -> PathBuf {
    let stem = source
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "catalog".to_string());
    output_dir.join(format!("{}.bin", stem))
}

// 按页面加载时的规则载入数据，再补充检查排序用到的字段
fn inspect_payload(data: &[u8]) -> Result<Option<FileReport>, String> {
    let document: serde_json::Value =
        serde_json::from_slice(data).map_err(|e| format!("JSON 格式错误: {}", e))?;
    let Some(kind) = CatalogKind::detect(&document) else {
        return Ok(None);
    };

    let report = match kind {
        CatalogKind::Articles => {
            let catalog = Catalog::<Article>::from_payload(data).map_err(|e| e.to_string())?;
            FileReport {
                kind,
                entries: catalog.len(),
                warnings: article_warnings(catalog.entries()),
                groups: group_counts(catalog.entries().iter().map(|a| a.category.as_str())),
                snapshot: catalog.to_snapshot().map_err(|e| e.to_string())?,
            }
        }
        CatalogKind::Recipes => {
            let catalog = Catalog::<Recipe>::from_payload(data).map_err(|e| e.to_string())?;
            FileReport {
                kind,
                entries: catalog.len(),
                warnings: recipe_warnings(catalog.entries()),
                groups: group_counts(catalog.entries().iter().map(|r| r.country.as_str())),
                snapshot: catalog.to_snapshot().map_err(|e| e.to_string())?,
            }
        }
    };
    Ok(Some(report))
}

// 日期和阅读时长无法解析的文章在页面上会排到最后
fn article_warnings(articles: &[Article]) -> Vec<String> {
    let mut warnings = Vec::new();
    for article in articles {
        if parse_publish_date(&article.publish_date).is_none() {
            warnings.push(format!("文章 {} 的发布日期无法解析: {:?}", article.id, article.publish_date));
        }
        if parse_leading_integer(&article.read_time).is_none() {
            warnings.push(format!("文章 {} 的阅读时长无法解析: {:?}", article.id, article.read_time));
        }
    }
    warnings
}

fn recipe_warnings(recipes: &[Recipe]) -> Vec<String> {
    let mut warnings = Vec::new();
    for recipe in recipes {
        if parse_leading_integer(&recipe.cook_time).is_none() {
            warnings.push(format!("菜谱 {} 的烹饪时长无法解析: {:?}", recipe.id, recipe.cook_time));
        }
        if recipe.ingredients.is_empty() {
            warnings.push(format!("菜谱 {} 没有食材，任何食材筛选都不会命中", recipe.id));
        }
    }
    warnings
}

fn group_counts<'a>(keys: impl Iterator<Item = &'a str>) -> BTreeMap<String, usize> {
    let mut groups = BTreeMap::new();
    for key in keys {
        *groups.entry(key.to_string()).or_insert(0) += 1;
    }
    groups
}
