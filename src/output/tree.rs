//! Tree renderer
//!
//! `TreeRenderer` turns a walk into indented tree-art lines, one entry per
//! line, formatted through the configured template.

use std::fmt;

use crate::error::Result;
use crate::escape::escape_filename;
use crate::fs::{Backend, EntryInfo, EntryKind};
use crate::hash::{Algorithm, HashEngine};
use crate::stats::TreeStats;
use crate::tree::{TreeWalker, Visit, WalkerConfig};

use super::config::OutputConfig;
use super::template::{Field, FieldValues, Template};

const CONNECTOR_MID: &str = "├── ";
const CONNECTOR_LAST: &str = "└── ";
const CONTINUE_MID: &str = "│   ";
const CONTINUE_LAST: &str = "    ";

/// One output line: tree-art prefix plus the formatted entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeLine {
    pub prefix: String,
    pub text: String,
    /// Kind of the entry on this line; `None` for the statistics footer.
    pub kind: Option<EntryKind>,
}

impl TreeLine {
    fn plain(text: String) -> Self {
        Self {
            prefix: String::new(),
            text,
            kind: None,
        }
    }
}

impl fmt::Display for TreeLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.prefix, self.text)
    }
}

/// Renders trees for one run. Hashes are shared across every `lines` call.
pub struct TreeRenderer<'a> {
    walker: TreeWalker<'a>,
    hasher: Option<HashEngine<'a>>,
    template: Template,
    config: OutputConfig,
}

impl<'a> TreeRenderer<'a> {
    /// Build a renderer. The template and the algorithm name are validated
    /// here, before anything is read.
    pub fn new(
        backend: &'a dyn Backend,
        walker_config: &WalkerConfig,
        config: OutputConfig,
        algorithm: &str,
    ) -> Result<Self> {
        let template = Template::parse(&config.template)?;
        let algorithm = Algorithm::from_name(algorithm)?;
        let walker = TreeWalker::new(backend, walker_config);
        let hasher = template
            .uses(Field::Hash)
            .then(|| HashEngine::with_algorithm(&walker, algorithm));
        Ok(Self {
            walker,
            hasher,
            template,
            config,
        })
    }

    /// The hash engine, present only when the template shows hashes.
    pub fn hasher(&self) -> Option<&HashEngine<'a>> {
        self.hasher.as_ref()
    }

    /// Lazily render the tree rooted at `path`.
    pub fn lines<'r>(&'r mut self, path: &str) -> TreeLines<'r, 'a> {
        let want_size = self.template.uses_size();
        TreeLines {
            root: path.to_string(),
            walker: &self.walker,
            hasher: self.hasher.as_mut(),
            template: &self.template,
            config: &self.config,
            want_size,
            visit: None,
            open: Vec::new(),
            stats: TreeStats::new(),
            phase: Phase::Root,
        }
    }

    /// Render the whole tree into a `\n`-joined string.
    pub fn render_to_string(&mut self, path: &str) -> Result<String> {
        let mut out = String::new();
        for line in self.lines(path) {
            out.push_str(&line?.to_string());
            out.push('\n');
        }
        Ok(out)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Root,
    Entries,
    Stats,
    Done,
}

/// Iterator over rendered lines. Finite and not restartable; ends after the
/// first error.
pub struct TreeLines<'r, 'a> {
    root: String,
    walker: &'r TreeWalker<'a>,
    hasher: Option<&'r mut HashEngine<'a>>,
    template: &'r Template,
    config: &'r OutputConfig,
    want_size: bool,
    visit: Option<Visit<'r, 'a>>,
    /// For each open ancestor level, whether it was the last sibling.
    open: Vec<bool>,
    stats: TreeStats,
    phase: Phase,
}

impl TreeLines<'_, '_> {
    /// Counts of entries rendered so far.
    pub fn stats(&self) -> TreeStats {
        self.stats
    }

    fn format_entry(
        &mut self,
        path: &str,
        info: &EntryInfo,
        name_override: Option<&str>,
    ) -> Result<String> {
        let hash = match self.hasher.as_mut() {
            Some(hasher) => Some(hasher.hash_entry(path, info)?),
            None => None,
        };
        let escaped;
        let name = match name_override {
            Some(name) => name,
            None => {
                escaped = escape_filename(&info.name);
                escaped.as_str()
            }
        };
        let size = if self.want_size && !info.kind.is_dir() {
            info.size
        } else {
            None
        };
        Ok(self.template.render(&FieldValues {
            name,
            path,
            kind: info.kind.label(),
            size,
            hash: hash.as_deref(),
        }))
    }

    fn root_line(&mut self) -> Result<TreeLine> {
        let walker = self.walker;
        let root = self.root.clone();
        let info = walker.backend().get_info(&root)?;
        let text = self.format_entry(&root, &info, Some(&root))?;
        self.visit = Some(walker.visit(
            &root,
            &info,
            self.config.max_depth,
            self.want_size,
        ));
        Ok(TreeLine {
            prefix: String::new(),
            text,
            kind: Some(info.kind),
        })
    }

    fn entry_line(&mut self) -> Option<Result<TreeLine>> {
        let visited = match self.visit.as_mut()?.next()? {
            Ok(visited) => visited,
            Err(e) => return Some(Err(e)),
        };
        self.stats.record(visited.info.kind);

        self.open.truncate(visited.depth.saturating_sub(1));
        let mut prefix: String = self
            .open
            .iter()
            .map(|&last| if last { CONTINUE_LAST } else { CONTINUE_MID })
            .collect();
        prefix.push_str(if visited.is_last {
            CONNECTOR_LAST
        } else {
            CONNECTOR_MID
        });
        self.open.push(visited.is_last);

        Some(
            self.format_entry(&visited.path, &visited.info, None)
                .map(|text| TreeLine {
                    prefix,
                    text,
                    kind: Some(visited.info.kind),
                }),
        )
    }
}

impl Iterator for TreeLines<'_, '_> {
    type Item = Result<TreeLine>;

    fn next(&mut self) -> Option<Self::Item> {
        let item = match self.phase {
            Phase::Root => {
                self.phase = Phase::Entries;
                Some(self.root_line())
            }
            Phase::Entries => match self.entry_line() {
                Some(item) => Some(item),
                None if self.config.print_stats => {
                    self.phase = Phase::Stats;
                    self.visit = None;
                    Some(Ok(TreeLine::plain(String::new())))
                }
                None => {
                    self.phase = Phase::Done;
                    None
                }
            },
            Phase::Stats => {
                self.phase = Phase::Done;
                Some(Ok(TreeLine::plain(self.stats.to_string())))
            }
            Phase::Done => None,
        };
        if matches!(item, Some(Err(_))) {
            self.phase = Phase::Done;
        }
        item
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::MemoryFs;

    fn render(fs: &MemoryFs, root: &str, config: OutputConfig) -> String {
        render_with(fs, root, &WalkerConfig::default(), config)
    }

    fn render_with(
        fs: &MemoryFs,
        root: &str,
        walker_config: &WalkerConfig,
        config: OutputConfig,
    ) -> String {
        let mut renderer = TreeRenderer::new(fs, walker_config, config, "sha256").unwrap();
        renderer.render_to_string(root).unwrap()
    }

    fn sample() -> MemoryFs {
        let mut fs = MemoryFs::new();
        fs.add_file("proj/README", "readme")
            .add_file("proj/src/main.rs", "fn main() {}")
            .add_file("proj/src/lib.rs", "")
            .add_dir("proj/docs");
        fs
    }

    #[test]
    fn test_basic_tree() {
        let out = render(&sample(), "proj", OutputConfig::default());
        assert_eq!(
            out,
            "proj\n\
             ├── docs\n\
             ├── src\n\
             │   ├── lib.rs\n\
             │   └── main.rs\n\
             └── README\n\
             \n\
             2 directories, 3 files\n"
        );
    }

    #[test]
    fn test_last_branch_uses_blank_continuation() {
        let mut fs = MemoryFs::new();
        fs.add_file("r/a/b/c", "").add_file("r/a/d", "");
        let out = render(
            &fs,
            "r",
            OutputConfig {
                print_stats: false,
                ..Default::default()
            },
        );
        assert_eq!(out, "r\n└── a\n    ├── b\n    │   └── c\n    └── d\n");
    }

    #[test]
    fn test_files_first_display_order() {
        let out = render_with(
            &sample(),
            "proj",
            &WalkerConfig {
                dirs_first: false,
                ..Default::default()
            },
            OutputConfig {
                print_stats: false,
                ..Default::default()
            },
        );
        let names: Vec<&str> = out.lines().skip(1).collect();
        assert_eq!(names[0], "├── README");
        assert_eq!(names[1], "├── docs");
    }

    #[test]
    fn test_max_depth_limits_listing_and_stats() {
        let out = render(
            &sample(),
            "proj",
            OutputConfig {
                max_depth: Some(1),
                ..Default::default()
            },
        );
        assert_eq!(
            out,
            "proj\n├── docs\n├── src\n└── README\n\n2 directories, 1 files\n"
        );
    }

    #[test]
    fn test_max_depth_zero_shows_root_only() {
        let out = render(
            &sample(),
            "proj",
            OutputConfig {
                max_depth: Some(0),
                ..Default::default()
            },
        );
        assert_eq!(out, "proj\n\n0 directories, 0 files\n");
    }

    #[test]
    fn test_root_name_is_literal_path() {
        let mut fs = MemoryFs::new();
        fs.add_file("my dir/a b", "");
        let out = render(
            &fs,
            "./my dir/",
            OutputConfig {
                template: "<{name}|{path}>".to_string(),
                print_stats: false,
                ..Default::default()
            },
        );
        assert_eq!(out, "<./my dir/|./my dir/>\n└── <a\\ b|my dir/a b>\n");
    }

    #[test]
    fn test_template_with_hash_and_size() {
        let mut fs = MemoryFs::new();
        fs.add_file("d/x", vec![0u8; 2048]).add_dir("d/sub");
        let mut renderer = TreeRenderer::new(
            &fs,
            &WalkerConfig::default(),
            OutputConfig {
                template: "{type:.1} {hash:.6} {size:>10} {name}".to_string(),
                print_stats: false,
                ..Default::default()
            },
            "sha256",
        )
        .unwrap();
        let out = renderer.render_to_string("d").unwrap();

        let mut engine = HashEngine::with_algorithm(
            &TreeWalker::new(&fs, &WalkerConfig::default()),
            Algorithm::Sha256,
        );
        let x_hash = engine.hash("d/x").unwrap();
        let sub_hash = engine.hash("d/sub").unwrap();
        let d_hash = engine.hash("d").unwrap();

        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], format!("d {}          - d", &d_hash[..6]));
        assert_eq!(lines[1], format!("├── d {}          - sub", &sub_hash[..6]));
        assert_eq!(lines[2], format!("└── f {} 2048.0000b x", &x_hash[..6]));
    }

    #[test]
    fn test_hash_not_computed_unless_shown() {
        let fs = sample();
        let mut renderer =
            TreeRenderer::new(&fs, &WalkerConfig::default(), OutputConfig::default(), "sha256")
                .unwrap();
        renderer.render_to_string("proj").unwrap();
        assert!(renderer.hasher().is_none());
        assert_eq!(fs.reads(), 0);
    }

    #[test]
    fn test_each_file_read_once_while_rendering_hashes() {
        let fs = sample();
        let mut renderer = TreeRenderer::new(
            &fs,
            &WalkerConfig::default(),
            OutputConfig {
                template: "{hash} {name}".to_string(),
                ..Default::default()
            },
            "sha256",
        )
        .unwrap();
        renderer.render_to_string("proj").unwrap();
        assert_eq!(fs.reads(), 3);
        // root + 2 dirs + 3 files
        assert_eq!(renderer.hasher().unwrap().cache().len(), 6);
    }

    #[test]
    fn test_hash_ignores_max_depth() {
        let fs = sample();
        let template = "{hash}".to_string();
        let full = render(
            &fs,
            "proj",
            OutputConfig {
                template: template.clone(),
                ..Default::default()
            },
        );
        let shallow = render(
            &fs,
            "proj",
            OutputConfig {
                template,
                max_depth: Some(1),
                ..Default::default()
            },
        );
        assert_eq!(full.lines().next(), shallow.lines().next());
    }

    #[test]
    fn test_filters_hide_entries() {
        let out = render_with(
            &sample(),
            "proj",
            &WalkerConfig {
                excludes: vec!["proj/src/*".to_string()],
                ..Default::default()
            },
            OutputConfig::default(),
        );
        assert!(!out.contains("main.rs"));
        assert!(out.contains("└── README"));
        assert!(out.ends_with("2 directories, 1 files\n"));
    }

    #[test]
    fn test_link_listed_but_not_hashable() {
        let mut fs = MemoryFs::new();
        fs.add_file("r/real", "x").add_link("r/alias", "real");
        let plain = render(&fs, "r", OutputConfig::default());
        assert!(plain.contains("alias"));
        assert!(plain.ends_with("0 directories, 2 files\n"));

        let mut renderer = TreeRenderer::new(
            &fs,
            &WalkerConfig::default(),
            OutputConfig {
                template: "{hash}".to_string(),
                ..Default::default()
            },
            "sha256",
        )
        .unwrap();
        let lines: Vec<Result<TreeLine>> = renderer.lines("r").collect();
        assert!(matches!(
            lines.last(),
            Some(Err(crate::error::Error::UnsupportedKind { .. }))
        ));
    }

    #[test]
    fn test_missing_root_is_an_error() {
        let fs = MemoryFs::new();
        let mut renderer =
            TreeRenderer::new(&fs, &WalkerConfig::default(), OutputConfig::default(), "sha256")
                .unwrap();
        let mut lines = renderer.lines("nope");
        assert!(matches!(lines.next(), Some(Err(_))));
        assert!(lines.next().is_none());
    }

    #[test]
    fn test_file_root() {
        let out = render(&sample(), "proj/README", OutputConfig::default());
        assert_eq!(out, "proj/README\n\n0 directories, 0 files\n");
    }

    #[test]
    fn test_lines_can_be_rerun() {
        let fs = sample();
        let mut renderer =
            TreeRenderer::new(&fs, &WalkerConfig::default(), OutputConfig::default(), "sha256")
                .unwrap();
        let first = renderer.render_to_string("proj").unwrap();
        let second = renderer.render_to_string("proj").unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_stats_accessor() {
        let fs = sample();
        let mut renderer =
            TreeRenderer::new(&fs, &WalkerConfig::default(), OutputConfig::default(), "sha256")
                .unwrap();
        let mut lines = renderer.lines("proj");
        for line in lines.by_ref() {
            line.unwrap();
        }
        assert_eq!(
            lines.stats(),
            TreeStats {
                count_dir: 2,
                count_file: 3
            }
        );
    }

    #[test]
    fn test_invalid_configuration_fails_early() {
        let fs = MemoryFs::new();
        let bad_template = OutputConfig {
            template: "{what}".to_string(),
            ..Default::default()
        };
        assert!(TreeRenderer::new(&fs, &WalkerConfig::default(), bad_template, "sha256").is_err());
        assert!(
            TreeRenderer::new(&fs, &WalkerConfig::default(), OutputConfig::default(), "nope")
                .is_err()
        );
        assert_eq!(fs.listings(), 0);
    }
}
