//! Concurrent batches: fragment imports and image downloads.
//!
//! Both run one scoped worker per unit of work. Workers report on a channel
//! sized to the batch, so none of them blocks once the caller has stopped
//! listening after the first error.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::sync::mpsc;
use std::thread;

use codelab_common::net::{HttpClient, decode_data_url};
use codelab_model::{Codelab, ContentNode};
use tracing::debug;

use crate::error::LoadError;
use crate::fetch::Loader;

impl<C: HttpClient> Loader<C> {
    /// Fetch and parse every import under `codelab`'s steps concurrently,
    /// then splice each fragment into its import and re-index the codelab.
    ///
    /// Nothing is spliced unless every import loads.
    ///
    /// # Errors
    ///
    /// Returns the first [`LoadError::Import`] reported by a worker.
    pub fn resolve_imports(&self, codelab: &mut Codelab) -> Result<(), LoadError> {
        let mut imports = codelab.imports_mut();
        if imports.is_empty() {
            return Ok(());
        }
        debug!(imports = imports.len(), "resolving imports");

        let sources: Vec<String> = imports
            .iter()
            .map(|import| import.source_url.clone())
            .collect();
        let fragments = fan_out(&sources, |url| {
            self.load_fragment(url).map_err(|source| LoadError::Import {
                url: url.clone(),
                source: Box::new(source),
            })
        })?;
        for (import, nodes) in imports.iter_mut().zip(fragments) {
            import.resolved_children = nodes;
        }
        codelab.reindex();
        Ok(())
    }

    /// Fetch a fragment without metadata and parse it.
    ///
    /// # Errors
    ///
    /// Returns the fetch or parse error.
    pub fn load_fragment(&self, url: &str) -> Result<Vec<ContentNode>, LoadError> {
        let resource = self.fetch_remote(url, true)?;
        let source_type = resource.source_type;
        self.parsers.parse_fragment(source_type, &resource.into_bytes()?)
    }

    /// Download every image of `images` (file name to source URL) into
    /// `dir`, concurrently.
    ///
    /// `dir` is created when missing. Sources may be `data:` URLs. File
    /// names must be distinct, which the map guarantees.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::Io`] if `dir` cannot be created, otherwise the
    /// first [`LoadError::Image`] reported by a worker.
    pub fn download_images(
        &self,
        dir: &Path,
        images: &BTreeMap<String, String>,
    ) -> Result<(), LoadError> {
        if images.is_empty() {
            return Ok(());
        }
        fs::create_dir_all(dir).map_err(|source| LoadError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
        debug!(images = images.len(), dir = %dir.display(), "downloading images");

        let jobs: Vec<(&String, &String)> = images.iter().collect();
        let _ = fan_out(&jobs, |(name, url)| {
            self.download_image(&dir.join(name), url)
                .map_err(|source| LoadError::Image {
                    url: (*url).clone(),
                    source: Box::new(source),
                })
        })?;
        Ok(())
    }

    fn download_image(&self, dst: &Path, url: &str) -> Result<(), LoadError> {
        let bytes = if url.starts_with("data:") {
            decode_data_url(url)?
        } else {
            self.client.get(url, self.config.image_retries)?.bytes(url)?
        };
        fs::write(dst, bytes).map_err(|source| LoadError::Io {
            path: dst.to_path_buf(),
            source,
        })
    }
}

/// Run `work` on every item in its own scoped thread.
///
/// Results come back in item order whatever order the workers finish in.
/// The first error received is returned; the remaining workers still run
/// to completion before this returns.
fn fan_out<I, T, F>(items: &[I], work: F) -> Result<Vec<T>, LoadError>
where
    I: Sync,
    T: Send,
    F: Fn(&I) -> Result<T, LoadError> + Sync,
{
    let (tx, rx) = mpsc::sync_channel(items.len());
    thread::scope(|scope| {
        for (index, item) in items.iter().enumerate() {
            let tx = tx.clone();
            let work = &work;
            let _ = scope.spawn(move || {
                let _ = tx.send((index, work(item)));
            });
        }
        drop(tx);

        let mut results: Vec<Option<T>> =
            std::iter::repeat_with(|| None).take(items.len()).collect();
        for (index, result) in &rx {
            results[index] = Some(result?);
        }
        Ok(results.into_iter().flatten().collect())
    })
}
