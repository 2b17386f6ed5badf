//! Batch driver: one [`AssetRecord`] per input path, in input order.

use crate::config::ScanConfig;
use crate::error::{Result, ScanError};
use crate::ignore::IgnoreRules;
use crate::kind::KindHierarchy;
use crate::traverse::ObjectGraphTraverser;
use assetscope_api::{AssetId, AssetKind, AssetRecord, Host, ObjectRef, ProgressSink};
use rayon::prelude::*;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Instant;
use tracing::{debug, info, warn};

/// A scan that did not complete. Its record is still part of the output.
#[derive(Debug)]
pub struct ScanFailure {
    pub index: usize,
    pub path: String,
    pub error: ScanError,
}

#[derive(Debug, Default)]
pub struct BuildOutput {
    pub records: Vec<AssetRecord>,
    pub failures: Vec<ScanFailure>,
}

impl BuildOutput {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

pub struct AssetGraphBuilder<H: Host + ?Sized> {
    host: Arc<H>,
    config: ScanConfig,
    kinds: KindHierarchy,
    rules: IgnoreRules,
    /// The host has a single active scene container.
    scene_lock: Mutex<()>,
}

impl<H: Host + ?Sized> AssetGraphBuilder<H> {
    pub fn new(host: Arc<H>, config: ScanConfig) -> Result<Self> {
        config.validate()?;
        let kinds = KindHierarchy::new(&host.kind_decls());
        let rules = IgnoreRules::compile(&config.ignore, &kinds);
        debug!("Builder ready: {} declared kinds", kinds.len());

        Ok(Self {
            host,
            config,
            kinds,
            rules,
            scene_lock: Mutex::new(()),
        })
    }

    /// Scan every path, hand the ordered records to `on_complete`, then
    /// close the progress sink. Returns the failures met along the way.
    pub fn build<F>(
        &self,
        paths: &[String],
        progress: &dyn ProgressSink,
        on_complete: F,
    ) -> Vec<ScanFailure>
    where
        F: FnOnce(Vec<AssetRecord>),
    {
        let BuildOutput { records, failures } = self.run(paths, progress);
        on_complete(records);
        progress.finish();
        failures
    }

    pub fn scan(&self, paths: &[String], progress: &dyn ProgressSink) -> BuildOutput {
        let output = self.run(paths, progress);
        progress.finish();
        output
    }

    fn run(&self, paths: &[String], progress: &dyn ProgressSink) -> BuildOutput {
        let start = Instant::now();
        let total = paths.len();
        let started = AtomicUsize::new(0);

        let scan_at = |index: usize, path: &String| {
            let position = started.fetch_add(1, Ordering::SeqCst);
            progress.report(path, position as f32 / total as f32);
            self.scan_one(index, path)
        };

        let parallel = self.config.jobs > 1 && total > 1;
        let results: Vec<(AssetRecord, Option<ScanFailure>)> = if parallel {
            match rayon::ThreadPoolBuilder::new()
                .num_threads(self.config.jobs)
                .build()
            {
                Ok(pool) => pool.install(|| {
                    paths
                        .par_iter()
                        .enumerate()
                        .map(|(i, p)| scan_at(i, p))
                        .collect()
                }),
                Err(e) => {
                    warn!("Failed to start worker pool, scanning sequentially: {}", e);
                    paths.iter().enumerate().map(|(i, p)| scan_at(i, p)).collect()
                }
            }
        } else {
            paths.iter().enumerate().map(|(i, p)| scan_at(i, p)).collect()
        };

        let mut output = BuildOutput {
            records: Vec::with_capacity(total),
            failures: Vec::new(),
        };
        for (record, failure) in results {
            output.records.push(record);
            output.failures.extend(failure);
        }

        info!(
            "Scanned {} assets ({} failed) in {:?}",
            total,
            output.failures.len(),
            start.elapsed()
        );
        output
    }

    fn scan_one(&self, index: usize, path: &str) -> (AssetRecord, Option<ScanFailure>) {
        let id = self.host.path_to_id(path).unwrap_or_else(|| {
            debug!("No id for {}", path);
            AssetId::new("")
        });
        let mut record = AssetRecord::new(path, id);
        let kind = self.config.suffixes.classify(path);
        debug!("Scanning {} as {:?}", path, kind);

        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            self.scan_kind(kind, path, &mut record)
        }));
        let error = match outcome {
            Ok(Ok(())) => None,
            Ok(Err(e)) => Some(e),
            Err(payload) => Some(ScanError::Panic(panic_message(payload.as_ref()))),
        };

        let failure = error.map(|error| {
            warn!("Scan of {} incomplete: {}", path, error);
            ScanFailure {
                index,
                path: path.to_string(),
                error,
            }
        });
        (record, failure)
    }

    fn scan_kind(&self, kind: AssetKind, path: &str, record: &mut AssetRecord) -> Result<()> {
        match kind {
            AssetKind::Structure => self.scan_structure(path, record),
            AssetKind::Scene => self.scan_scene(path, record),
            AssetKind::StateMachine => {
                let container = self.load(path)?;
                self.traverser().traverse_state_machine(container, record);
                Ok(())
            }
            AssetKind::Generic => {
                let asset = self.load(path)?;
                self.traverser().traverse(asset, record, false)
            }
        }
    }

    fn scan_structure(&self, path: &str, record: &mut AssetRecord) -> Result<()> {
        let structure = self.load(path)?;
        let instance = self
            .host
            .instantiate(structure)
            .map_err(|source| ScanError::Instantiate {
                path: path.to_string(),
                source,
            })?;
        let _guard = InstanceGuard {
            host: self.host.as_ref(),
            instance,
        };

        self.traverser().traverse_hierarchy(instance, record, false)
    }

    fn scan_scene(&self, path: &str, record: &mut AssetRecord) -> Result<()> {
        let _scene = self.scene_lock.lock().unwrap_or_else(PoisonError::into_inner);
        if !self.host.open_container(path) {
            return Err(ScanError::ContainerOpen(path.to_string()));
        }

        let traverser = self.traverser();
        for node in self.host.top_level_nodes() {
            traverser.traverse_hierarchy(node, record, true)?;
        }
        Ok(())
    }

    fn load(&self, path: &str) -> Result<ObjectRef> {
        self.host.load_asset(path).map_err(|source| ScanError::Load {
            path: path.to_string(),
            source,
        })
    }

    fn traverser(&self) -> ObjectGraphTraverser<'_, H> {
        ObjectGraphTraverser::new(
            self.host.as_ref(),
            &self.kinds,
            &self.rules,
            &self.config.scripts,
        )
    }
}

/// Releases a transient instance on every exit path, unwinding included.
struct InstanceGuard<'a, H: Host + ?Sized> {
    host: &'a H,
    instance: ObjectRef,
}

impl<H: Host + ?Sized> Drop for InstanceGuard<'_, H> {
    fn drop(&mut self) {
        self.host.release(self.instance);
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
