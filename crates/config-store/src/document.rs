//! Configuration document: load with default-merge, save

use std::path::{Path, PathBuf};

use config_tree::{SectionId, SectionRef, SectionTree, Value, merge_defaults};

use crate::engine::DocumentEngine;
use crate::yaml::YamlEngine;
use crate::{Error, Result, io};

/// Which file a load read its content from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadSource {
    /// The document's own file
    Primary,
    /// The defaults file, because the primary file did not exist
    Defaults,
}

/// Outcome of [`ConfigDocument::load_with`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadReport {
    pub source: LoadSource,
    /// Whether the content was merged against the defaults file
    pub merged: bool,
    /// Default paths missing from the loaded file that were filled in
    pub backfilled: Vec<String>,
    /// Loaded paths with no counterpart in the defaults, left out of the tree
    pub discarded: Vec<String>,
    /// Nodes dropped while decoding because their parent was missing
    pub dropped: Vec<String>,
    /// Whether persisting the loaded tree to the primary file succeeded
    pub saved: bool,
}

/// A configuration file backed by a section tree.
///
/// The file is optional until loaded: when it does not exist, the defaults
/// file seeds it and the result is written back.
#[derive(Debug)]
pub struct ConfigDocument {
    file: PathBuf,
    defaults: Option<PathBuf>,
    engine: Box<dyn DocumentEngine>,
    tree: SectionTree,
}

impl ConfigDocument {
    /// Create a document for `file` using the YAML engine and no defaults.
    pub fn new(file: impl Into<PathBuf>) -> Self {
        Self {
            file: file.into(),
            defaults: None,
            engine: Box::new(YamlEngine::new()),
            tree: SectionTree::new(),
        }
    }

    pub fn with_defaults(mut self, defaults: impl Into<PathBuf>) -> Self {
        self.defaults = Some(defaults.into());
        self
    }

    pub fn with_engine(mut self, engine: impl DocumentEngine + 'static) -> Self {
        self.engine = Box::new(engine);
        self
    }

    pub fn file(&self) -> &Path {
        &self.file
    }

    pub fn defaults(&self) -> Option<&Path> {
        self.defaults.as_deref()
    }

    pub fn tree(&self) -> &SectionTree {
        &self.tree
    }

    pub fn tree_mut(&mut self) -> &mut SectionTree {
        &mut self.tree
    }

    /// The document root, for path lookups and typed getters.
    pub fn root(&self) -> SectionRef<'_> {
        self.tree.root()
    }

    pub fn set(&mut self, path: &str, values: Vec<Value>) -> Result<()> {
        Ok(self.tree.set(SectionTree::ROOT, path, values)?)
    }

    pub fn set_or_create(&mut self, path: &str, values: Vec<Value>) -> Result<SectionId> {
        Ok(self.tree.set_or_create(SectionTree::ROOT, path, values)?)
    }

    pub fn set_value(&mut self, path: &str, value: Value, position: usize) -> Result<()> {
        Ok(self.tree.set_value(SectionTree::ROOT, path, value, position)?)
    }

    /// Load the document, merging it against the defaults file.
    pub fn load(&mut self) -> Result<LoadReport> {
        self.load_with(true)
    }

    /// Load the document and write it back to the primary file.
    ///
    /// Reads the primary file, or the defaults file when the primary does
    /// not exist. With `copy_defaults` and a defaults file configured, the
    /// result keeps exactly the defaults' paths in the defaults' order,
    /// taking values from the loaded file where present. The in-memory tree
    /// is replaced either way.
    pub fn load_with(&mut self, copy_defaults: bool) -> Result<LoadReport> {
        let (source, path) = self.source()?;
        tracing::debug!(
            path = %path.display(),
            engine = self.engine.name(),
            ?source,
            "Loading configuration"
        );
        let loaded = self.engine.parse(&path)?;

        let mut report = LoadReport {
            source,
            merged: false,
            backfilled: Vec::new(),
            discarded: Vec::new(),
            dropped: Vec::new(),
            saved: false,
        };

        let nodes = match self.defaults.as_deref() {
            Some(defaults) if copy_defaults => {
                // Decode and flatten so the defaults are in canonical tree order.
                let defaults = SectionTree::from_nodes(self.engine.parse(defaults)?).nodes();
                let merged = merge_defaults(&defaults, &loaded);
                report.merged = true;
                report.backfilled = merged.backfilled;
                report.discarded = merged.discarded;
                merged.nodes
            }
            _ => loaded,
        };

        let mut tree = SectionTree::new();
        report.dropped = tree.decode(nodes).dropped;
        self.tree = tree;

        report.saved = self.save();
        Ok(report)
    }

    fn source(&self) -> Result<(LoadSource, PathBuf)> {
        if self.file.exists() {
            return Ok((LoadSource::Primary, self.file.clone()));
        }
        match &self.defaults {
            Some(defaults) if defaults.exists() => Ok((LoadSource::Defaults, defaults.clone())),
            _ => Err(Error::NoSource {
                path: self.file.clone(),
            }),
        }
    }

    /// Save to the document's own file.
    pub fn save(&self) -> bool {
        self.save_to(&self.file)
    }

    /// Save to `path`, reporting success.
    ///
    /// Failures are logged; use [`try_save_to`](Self::try_save_to) to get
    /// the error.
    pub fn save_to(&self, path: &Path) -> bool {
        match self.try_save_to(path) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Failed to save configuration");
                false
            }
        }
    }

    pub fn try_save_to(&self, path: &Path) -> Result<()> {
        io::ensure_file(path)?;
        let nodes = self.tree.nodes();
        self.engine.compose(path, &nodes)?;
        tracing::debug!(path = %path.display(), nodes = nodes.len(), "Saved configuration");
        Ok(())
    }
}
