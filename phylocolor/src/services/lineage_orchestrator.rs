//! Lineage resolution
//!
//! Tiers, first hit wins:
//! 1. sentinel "unknown" spellings → [`Lineage::Unclassified`] (uncached)
//! 2. session cache (normalized, lower-cased key)
//! 3. exact reference match
//! 4. reference match on the first token, reported as `species_inferred`
//! 5. remote resolver, when allowed
//!
//! Every outcome of tiers 3–5, including a miss, is cached so that a name is
//! never sent to the remote service twice in one session.

use super::name_normalizer::{genus_token, normalize};
use super::ncbi_client::RemoteLineageResolver;
use super::session_cache::SessionCache;
use super::unclassified::is_unclassified;
use crate::db::ReferenceDatabase;
use crate::models::{Lineage, LineageSource, ResolvedLineage};
use std::sync::Arc;
use tracing::{debug, warn};

/// A resolved lineage plus the warning raised while resolving it, if any
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineageOutcome {
    pub lineage: Lineage,
    pub warning: Option<String>,
}

#[derive(Clone)]
pub struct LineageOrchestrator {
    reference: Arc<ReferenceDatabase>,
    cache: SessionCache,
    remote: Option<Arc<dyn RemoteLineageResolver>>,
}

impl LineageOrchestrator {
    pub fn new(
        reference: Arc<ReferenceDatabase>,
        cache: SessionCache,
        remote: Option<Arc<dyn RemoteLineageResolver>>,
    ) -> Self {
        Self {
            reference,
            cache,
            remote,
        }
    }

    pub fn cache(&self) -> &SessionCache {
        &self.cache
    }

    pub fn reference(&self) -> &ReferenceDatabase {
        &self.reference
    }

    /// Whether a remote resolver is configured at all
    pub fn has_remote(&self) -> bool {
        self.remote.is_some()
    }

    pub async fn resolve(&self, raw: &str, allow_remote: bool) -> Lineage {
        self.resolve_with_warning(raw, allow_remote).await.lineage
    }

    /// Resolve one name; never fails, the worst case is [`Lineage::Unresolved`]
    pub async fn resolve_with_warning(&self, raw: &str, allow_remote: bool) -> LineageOutcome {
        if is_unclassified(raw) {
            debug!(taxon = %raw, "Sentinel unclassified name");
            return LineageOutcome {
                lineage: Lineage::Unclassified,
                warning: None,
            };
        }

        let normalized = normalize(raw);
        let key = normalized.to_lowercase();

        // Held until the result is stored: one remote lookup per key
        let mut cache = self.cache.lock().await;
        if let Some(hit) = cache.get(&key) {
            debug!(taxon = %normalized, "Session cache hit");
            return LineageOutcome {
                lineage: hit.clone(),
                warning: None,
            };
        }

        let mut warning = None;
        let lineage = match self.resolve_locally(&normalized) {
            Some(lineage) => lineage,
            None => match (&self.remote, allow_remote) {
                // e.g. a bare "g__" prefix; nothing to search for
                _ if normalized.is_empty() => Lineage::Unresolved,
                (Some(remote), true) => match remote.resolve(&normalized).await {
                    Some(found) => Lineage::Resolved(found),
                    None => {
                        let message = format!(
                            "Could not resolve lineage for '{}' via {}",
                            normalized,
                            remote.name()
                        );
                        warn!("{}", message);
                        warning = Some(message);
                        Lineage::Unresolved
                    }
                },
                _ => Lineage::Unresolved,
            },
        };

        LineageOutcome {
            lineage: cache.insert(key, lineage),
            warning,
        }
    }

    /// Exact reference match, then the genus token
    fn resolve_locally(&self, normalized: &str) -> Option<Lineage> {
        if let Some(row) = self.reference.lookup(normalized) {
            return Some(Lineage::Resolved(ResolvedLineage {
                phylum: row.phylum.clone(),
                rank: Some(row.rank.clone()),
                superkingdom: row.superkingdom.clone(),
                source: LineageSource::Reference,
            }));
        }

        let genus = genus_token(normalized).filter(|g| *g != normalized)?;
        let row = self.reference.lookup(genus)?;
        debug!(taxon = %normalized, genus = %genus, "Lineage inferred from genus");
        Some(Lineage::Inferred {
            phylum: row.phylum.clone(),
            superkingdom: row.superkingdom.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::ReferenceRow;
    use crate::models::SPECIES_INFERRED_RANK;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingRemote {
        calls: AtomicUsize,
        answer: Option<ResolvedLineage>,
    }

    #[async_trait]
    impl RemoteLineageResolver for CountingRemote {
        fn name(&self) -> &'static str {
            "counting"
        }

        async fn resolve(&self, _name: &str) -> Option<ResolvedLineage> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.answer.clone()
        }
    }

    fn reference() -> Arc<ReferenceDatabase> {
        Arc::new(ReferenceDatabase::from_rows(vec![
            ReferenceRow::new("Bacteroides", "genus", "Bacteroidota", Some("Bacteria")),
            ReferenceRow::new("Escherichia", "genus", "Pseudomonadota", Some("Bacteria")),
            ReferenceRow::new("Escherichia coli", "species", "Pseudomonadota", Some("Bacteria")),
        ]))
    }

    fn orchestrator(remote: Option<Arc<CountingRemote>>) -> LineageOrchestrator {
        LineageOrchestrator::new(
            reference(),
            SessionCache::new(),
            remote.map(|r| r as Arc<dyn RemoteLineageResolver>),
        )
    }

    #[tokio::test]
    async fn test_exact_match_beats_genus() {
        let orch = orchestrator(None);
        let lineage = orch.resolve("s__Escherichia_coli", false).await;
        assert_eq!(lineage.rank(), Some("species"));
    }

    #[tokio::test]
    async fn test_genus_inference() {
        let orch = orchestrator(None);
        let lineage = orch.resolve("Bacteroides fragilis", false).await;
        assert_eq!(lineage.rank(), Some(SPECIES_INFERRED_RANK));
        assert_eq!(lineage.phylum(), Some("Bacteroidota"));
        assert_eq!(lineage.superkingdom(), Some("Bacteria"));
    }

    #[tokio::test]
    async fn test_sentinel_is_not_cached() {
        let orch = orchestrator(None);
        assert_eq!(orch.resolve("Unknown", true).await, Lineage::Unclassified);
        assert!(orch.cache().is_empty().await);
    }

    #[tokio::test]
    async fn test_remote_called_once_for_miss() {
        let remote = Arc::new(CountingRemote {
            calls: AtomicUsize::new(0),
            answer: None,
        });
        let orch = orchestrator(Some(remote.clone()));

        let first = orch.resolve_with_warning("Notarealgenus", true).await;
        let second = orch.resolve_with_warning("notarealgenus", true).await;

        assert_eq!(first.lineage, Lineage::Unresolved);
        assert!(first.warning.is_some());
        assert_eq!(second.lineage, Lineage::Unresolved);
        assert!(second.warning.is_none());
        assert_eq!(remote.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_remote_skipped_when_disallowed() {
        let remote = Arc::new(CountingRemote {
            calls: AtomicUsize::new(0),
            answer: None,
        });
        let orch = orchestrator(Some(remote.clone()));

        let outcome = orch.resolve_with_warning("Notarealgenus", false).await;
        assert_eq!(outcome.lineage, Lineage::Unresolved);
        assert!(outcome.warning.is_none());
        assert_eq!(remote.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_remote_not_consulted_for_local_hit() {
        let remote = Arc::new(CountingRemote {
            calls: AtomicUsize::new(0),
            answer: None,
        });
        let orch = orchestrator(Some(remote.clone()));

        orch.resolve("Bacteroides", true).await;
        orch.resolve("Bacteroides ovatus", true).await;
        assert_eq!(remote.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_remote_hit_adopted_and_cached() {
        let found = ResolvedLineage {
            phylum: "Ascomycota".into(),
            rank: Some("genus".into()),
            superkingdom: Some("Fungi".into()),
            source: LineageSource::Remote,
        };
        let remote = Arc::new(CountingRemote {
            calls: AtomicUsize::new(0),
            answer: Some(found.clone()),
        });
        let orch = orchestrator(Some(remote.clone()));

        assert_eq!(
            orch.resolve("Saccharomyces", true).await,
            Lineage::Resolved(found.clone())
        );
        assert_eq!(
            orch.resolve("g__Saccharomyces", true).await,
            Lineage::Resolved(found)
        );
        assert_eq!(remote.calls.load(Ordering::SeqCst), 1);
    }
}
