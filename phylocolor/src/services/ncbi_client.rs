//! NCBI Taxonomy client (remote lineage fallback)
//!
//! Two E-utilities calls per name:
//! 1. `esearch.fcgi?db=taxonomy&term=<name>` → numeric TaxId
//! 2. `efetch.fcgi?db=taxonomy&id=<id>&retmode=xml` → classification record
//!
//! Responses are parsed into [`TaxonDocument`] (queried taxon plus its ordered
//! ancestor chain) before any field is picked out. Every failure is turned
//! into "no match" at the [`RemoteLineageResolver`] boundary.

use crate::models::{LineageSource, ResolvedLineage};
use async_trait::async_trait;
use phylocolor_common::config::RemoteConfig;
use quick_xml::events::Event;
use quick_xml::reader::Reader;
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, info};

const USER_AGENT: &str = concat!("phylocolor/", env!("CARGO_PKG_VERSION"));
const TOOL_NAME: &str = "phylocolor";

/// Remote lookup errors (never escape the resolver trait)
#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    #[error("API error {0}: {1}")]
    Api(u16, String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("No match for {0}")]
    NoMatch(String),
}

/// Looks up a lineage for a normalized name outside the local tables.
///
/// Implementations return `None` for "no match" and for any failure.
#[async_trait]
pub trait RemoteLineageResolver: Send + Sync {
    /// Resolver name for logs
    fn name(&self) -> &'static str;

    async fn resolve(&self, name: &str) -> Option<ResolvedLineage>;
}

/// One ancestor of the queried taxon
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ancestor {
    pub name: String,
    pub rank: String,
}

/// Typed view of an efetch taxonomy record
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaxonDocument {
    pub scientific_name: Option<String>,
    pub rank: Option<String>,
    /// Root first
    pub ancestors: Vec<Ancestor>,
}

impl TaxonDocument {
    fn ancestor_with_rank(&self, ranks: &[&str]) -> Option<&str> {
        self.ancestors
            .iter()
            .find(|a| ranks.iter().any(|r| a.rank.eq_ignore_ascii_case(r)))
            .map(|a| a.name.as_str())
    }

    fn own_name_if_rank(&self, rank: &str) -> Option<&str> {
        match (&self.scientific_name, &self.rank) {
            (Some(name), Some(r)) if r.eq_ignore_ascii_case(rank) => Some(name),
            _ => None,
        }
    }

    /// Phylum, own rank and superkingdom; `None` unless a phylum is present
    pub fn to_lineage(&self) -> Option<ResolvedLineage> {
        let phylum = self
            .ancestor_with_rank(&["phylum"])
            .or_else(|| self.own_name_if_rank("phylum"))?;

        // NCBI relabelled "superkingdom" as "domain" in 2025
        let superkingdom = self
            .ancestor_with_rank(&["superkingdom", "domain"])
            .or_else(|| {
                self.ancestors
                    .iter()
                    .find(|a| a.rank.eq_ignore_ascii_case("kingdom") && a.name == "Fungi")
                    .map(|_| "Fungi")
            });

        Some(ResolvedLineage {
            phylum: phylum.to_string(),
            rank: self.rank.clone(),
            superkingdom: superkingdom.map(str::to_string),
            source: LineageSource::Remote,
        })
    }
}

fn element_name(name: quick_xml::name::QName<'_>) -> String {
    String::from_utf8_lossy(name.as_ref()).into_owned()
}

fn parse_error(reader: &Reader<&[u8]>, e: impl std::fmt::Display) -> RemoteError {
    RemoteError::Parse(format!("XML error at {}: {}", reader.buffer_position(), e))
}

/// TaxIds listed in an esearch response, in document order
pub fn parse_search_ids(xml: &str) -> Result<Vec<String>, RemoteError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut path: Vec<String> = Vec::new();
    let mut ids = Vec::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => path.push(element_name(e.name())),
            Ok(Event::End(_)) => {
                path.pop();
            }
            Ok(Event::Text(t)) => {
                if path.len() >= 2 && path[path.len() - 2] == "IdList" && path[path.len() - 1] == "Id" {
                    let text = t.unescape().map_err(|e| parse_error(&reader, e))?;
                    ids.push(text.trim().to_string());
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(parse_error(&reader, e)),
            _ => {}
        }
    }

    Ok(ids)
}

/// First `TaxaSet/Taxon` record of an efetch response
pub fn parse_taxon_document(xml: &str) -> Result<TaxonDocument, RemoteError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut path: Vec<String> = Vec::new();
    let mut doc = TaxonDocument::default();
    let mut seen_taxon = false;
    let mut ancestor_name: Option<String> = None;
    let mut ancestor_rank: Option<String> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                let name = element_name(e.name());
                if path.len() == 1 && name == "Taxon" {
                    seen_taxon = true;
                }
                path.push(name);
            }
            Ok(Event::End(_)) => {
                let depth = path.len();
                let closed = path.pop().unwrap_or_default();

                // End of the first top-level record
                if depth == 2 && closed == "Taxon" {
                    break;
                }
                if depth == 4 && closed == "Taxon" && path[2] == "LineageEx" {
                    if let Some(name) = ancestor_name.take() {
                        doc.ancestors.push(Ancestor {
                            name,
                            rank: ancestor_rank.take().unwrap_or_default(),
                        });
                    }
                    ancestor_rank = None;
                }
            }
            Ok(Event::Text(t)) => {
                if !seen_taxon || path.len() < 3 {
                    continue;
                }
                let text = t
                    .unescape()
                    .map_err(|e| parse_error(&reader, e))?
                    .trim()
                    .to_string();
                let leaf = path[path.len() - 1].as_str();

                match path.len() {
                    3 => match leaf {
                        "ScientificName" => doc.scientific_name = Some(text),
                        "Rank" => doc.rank = Some(text),
                        _ => {}
                    },
                    5 if path[2] == "LineageEx" && path[3] == "Taxon" => match leaf {
                        "ScientificName" => ancestor_name = Some(text),
                        "Rank" => ancestor_rank = Some(text),
                        _ => {}
                    },
                    _ => {}
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(parse_error(&reader, e)),
            _ => {}
        }
    }

    if !seen_taxon {
        return Err(RemoteError::Parse("no Taxon record in response".to_string()));
    }

    Ok(doc)
}

/// Enforces a minimum interval between consecutive requests
struct RateLimiter {
    last_request: Mutex<Option<Instant>>,
    min_interval: Duration,
}

impl RateLimiter {
    fn new(min_interval_ms: u64) -> Self {
        Self {
            last_request: Mutex::new(None),
            min_interval: Duration::from_millis(min_interval_ms),
        }
    }

    /// Wait if necessary to comply with rate limit
    async fn wait(&self) {
        let mut last = self.last_request.lock().await;

        if let Some(last_time) = *last {
            let elapsed = last_time.elapsed();
            if elapsed < self.min_interval {
                let wait_time = self.min_interval - elapsed;
                debug!("Rate limiting: waiting {:?}", wait_time);
                tokio::time::sleep(wait_time).await;
            }
        }

        *last = Some(Instant::now());
    }
}

/// NCBI Entrez E-utilities client
pub struct NcbiTaxonomyClient {
    http_client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    email: Option<String>,
    rate_limiter: Arc<RateLimiter>,
}

impl NcbiTaxonomyClient {
    pub fn new(config: &RemoteConfig) -> Result<Self, RemoteError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| RemoteError::Network(e.to_string()))?;

        Ok(Self {
            http_client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone().filter(|k| !k.trim().is_empty()),
            email: config.email.clone().filter(|e| !e.trim().is_empty()),
            rate_limiter: Arc::new(RateLimiter::new(config.min_delay_ms)),
        })
    }

    async fn get(&self, endpoint: &str, params: &[(&str, &str)]) -> Result<String, RemoteError> {
        self.rate_limiter.wait().await;

        let url = format!("{}/{}", self.base_url, endpoint);
        let mut query: Vec<(&str, &str)> = params.to_vec();
        query.push(("tool", TOOL_NAME));
        if let Some(key) = &self.api_key {
            query.push(("api_key", key.as_str()));
        }
        if let Some(email) = &self.email {
            query.push(("email", email.as_str()));
        }

        debug!(url = %url, params = ?params, "Querying NCBI E-utilities");

        let response = self
            .http_client
            .get(&url)
            .query(&query)
            .send()
            .await
            .map_err(|e| RemoteError::Network(e.to_string()))?;

        let status = response.status();

        if status.as_u16() == 429 {
            return Err(RemoteError::RateLimitExceeded);
        }

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(RemoteError::Api(status.as_u16(), error_text));
        }

        response
            .text()
            .await
            .map_err(|e| RemoteError::Network(e.to_string()))
    }

    /// Search by scientific name; first TaxId
    pub async fn search_taxon_id(&self, name: &str) -> Result<String, RemoteError> {
        let body = self
            .get("esearch.fcgi", &[("db", "taxonomy"), ("term", name)])
            .await?;

        parse_search_ids(&body)?
            .into_iter()
            .find(|id| !id.is_empty())
            .ok_or_else(|| RemoteError::NoMatch(name.to_string()))
    }

    /// Full classification record for a TaxId
    pub async fn fetch_taxon(&self, taxon_id: &str) -> Result<TaxonDocument, RemoteError> {
        let body = self
            .get(
                "efetch.fcgi",
                &[("db", "taxonomy"), ("id", taxon_id), ("retmode", "xml")],
            )
            .await?;

        parse_taxon_document(&body)
    }

    /// Search, then fetch; a record without a phylum is a miss
    pub async fn fetch_lineage(&self, name: &str) -> Result<ResolvedLineage, RemoteError> {
        let taxon_id = self.search_taxon_id(name).await?;
        let doc = self.fetch_taxon(&taxon_id).await?;

        doc.to_lineage()
            .ok_or_else(|| RemoteError::NoMatch(name.to_string()))
    }
}

#[async_trait]
impl RemoteLineageResolver for NcbiTaxonomyClient {
    fn name(&self) -> &'static str {
        "NCBI Taxonomy"
    }

    async fn resolve(&self, name: &str) -> Option<ResolvedLineage> {
        match self.fetch_lineage(name).await {
            Ok(lineage) => {
                info!(
                    taxon = %name,
                    phylum = %lineage.phylum,
                    rank = ?lineage.rank,
                    "Resolved lineage from NCBI Taxonomy"
                );
                Some(lineage)
            }
            Err(e) => {
                debug!(taxon = %name, error = %e, "NCBI Taxonomy lookup failed");
                None
            }
        }
    }
}
