//! 文件扫描 - 业务能力层
//!
//! 递归扫描输入目录，找出与服务类型匹配的文件，并切分成固定大小的批次。
//! 扫描是惰性的：一批处理完之前不会继续遍历目录。

use crate::models::ServiceKind;
use crate::services::output_path::OUTPUT_SUFFIX;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use walkdir::WalkDir;

/// 惰性地列出 `root` 下所有可被 `kind` 处理的文件
///
/// 本客户端自己写出的 `*.dataseer.tei.xml` 不会被当作输入。
///
/// # 参数
/// - `root`: 输入根目录
/// - `kind`: 目标服务
/// - `verbose`: 是否打印每个找到的文件名
pub fn discover(root: &Path, kind: ServiceKind, verbose: bool) -> impl Iterator<Item = PathBuf> {
    WalkDir::new(root)
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!("⚠️ 无法访问目录项: {}", e);
                None
            }
        })
        // 符号链接指向的文件同样算作输入
        .filter(|entry| entry.path().is_file())
        .filter(move |entry| {
            let name = entry.file_name().to_string_lossy();
            kind.accepts(&name) && !name.ends_with(OUTPUT_SUFFIX)
        })
        .map(move |entry| {
            if verbose {
                info!("Dataseer - {}", entry.file_name().to_string_lossy());
            }
            entry.into_path()
        })
}

/// 按固定大小分批的迭代器，最后一批可能不满
pub struct Batches<I> {
    inner: I,
    size: usize,
}

impl<I: Iterator> Iterator for Batches<I> {
    type Item = Vec<I::Item>;

    fn next(&mut self) -> Option<Self::Item> {
        let batch: Vec<I::Item> = self.inner.by_ref().take(self.size).collect();
        if batch.is_empty() {
            None
        } else {
            Some(batch)
        }
    }
}

/// 将任意迭代器切分成最多 `size` 个元素的批次
pub fn batches<I: IntoIterator>(items: I, size: usize) -> Batches<I::IntoIter> {
    Batches {
        inner: items.into_iter(),
        size: size.max(1),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn touch(root: &Path, relative: &str) -> PathBuf {
        let path = root.join(relative);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, b"x").unwrap();
        path
    }

    #[test]
    fn test_discover_pdf_recurses_and_filters() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        let expected: HashSet<PathBuf> = [
            touch(root, "a.pdf"),
            touch(root, "nested/b.pdf.gz"),
            touch(root, "nested/deeper/c.pdf"),
        ]
        .into_iter()
        .collect();
        touch(root, "nested/d.tei.xml");
        touch(root, "notes.txt");

        let found: HashSet<PathBuf> = discover(root, ServiceKind::Pdf, false).collect();

        assert_eq!(found, expected);
    }

    #[test]
    fn test_discover_tei_ignores_pdf() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        let tei = touch(root, "x/paper.tei.xml");
        touch(root, "x/paper.pdf");
        touch(root, "x/paper.xml");

        let found: Vec<PathBuf> = discover(root, ServiceKind::Tei, true).collect();

        assert_eq!(found, vec![tei]);
    }

    #[test]
    fn test_discover_skips_previous_outputs() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        let tei = touch(root, "paper.tei.xml");
        touch(root, "paper.dataseer.tei.xml");

        let found: Vec<PathBuf> = discover(root, ServiceKind::Tei, false).collect();

        assert_eq!(found, vec![tei]);
    }

    #[cfg(unix)]
    #[test]
    fn test_discover_follows_symlinked_files() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        let target = touch(root, "store/original.pdf");
        let link = root.join("linked.pdf");
        std::os::unix::fs::symlink(&target, &link).unwrap();

        let found: HashSet<PathBuf> = discover(root, ServiceKind::Pdf, false).collect();

        assert_eq!(found, HashSet::from([target, link]));
    }

    #[test]
    fn test_batches_cover_every_item_exactly_once() {
        let items: Vec<usize> = (0..25).collect();

        let all: Vec<Vec<usize>> = batches(items.clone(), 10).collect();

        assert_eq!(all.len(), 3);
        assert_eq!(all[0].len(), 10);
        assert_eq!(all[1].len(), 10);
        assert_eq!(all[2].len(), 5);
        assert_eq!(all.concat(), items);
    }

    #[test]
    fn test_batches_of_discovered_files_partition_the_set() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        let mut expected = HashSet::new();
        for i in 0..7 {
            expected.insert(touch(root, &format!("d{}/f{}.pdf", i % 3, i)));
        }

        let mut seen = HashSet::new();
        for batch in batches(discover(root, ServiceKind::Pdf, false), 3) {
            assert!(batch.len() <= 3);
            for path in batch {
                assert!(seen.insert(path), "同一文件出现在多个批次中");
            }
        }

        assert_eq!(seen, expected);
    }

    #[test]
    fn test_empty_input_yields_no_batch() {
        assert_eq!(batches(Vec::<u8>::new(), 4).count(), 0);
        // 批大小为 0 时按 1 处理
        assert_eq!(batches(vec![1, 2], 0).count(), 2);
    }
}
