//! Static reference taxonomy table
//!
//! Built offline from a bulk taxonomy dump; at runtime it is only read.
//! Rows are kept in load order (preview sampling depends on it) and indexed
//! by lower-cased `Name` for case-insensitive exact lookup.

use phylocolor_common::{Error, Result};
use sqlx::SqlitePool;
use std::collections::{BTreeSet, HashMap};
use std::path::Path;
use tracing::{debug, info, warn};

/// One row of the reference table
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct ReferenceRow {
    pub name: String,
    pub rank: String,
    pub genus: Option<String>,
    pub family: Option<String>,
    pub order_name: Option<String>,
    pub class: Option<String>,
    pub phylum: String,
    pub superkingdom: Option<String>,
}

impl ReferenceRow {
    /// Row with only the columns resolution reads
    pub fn new(
        name: impl Into<String>,
        rank: impl Into<String>,
        phylum: impl Into<String>,
        superkingdom: Option<&str>,
    ) -> Self {
        Self {
            name: name.into(),
            rank: rank.into(),
            genus: None,
            family: None,
            order_name: None,
            class: None,
            phylum: phylum.into(),
            superkingdom: superkingdom.map(str::to_string),
        }
    }
}

const SELECT_REFERENCE_ROWS: &str = r#"
    SELECT Name AS name,
           Rank AS rank,
           Genus AS genus,
           Family AS family,
           "Order" AS order_name,
           Class AS class,
           Phylum AS phylum,
           Superkingdom AS superkingdom
    FROM taxonomy_reference
    ORDER BY rowid
"#;

/// Immutable name → row index
#[derive(Debug, Default)]
pub struct ReferenceDatabase {
    rows: Vec<ReferenceRow>,
    index: HashMap<String, usize>,
}

impl ReferenceDatabase {
    /// Build from in-memory rows.
    ///
    /// Rows with an empty phylum are skipped; a repeated name (ignoring case)
    /// keeps the first row.
    pub fn from_rows(rows: impl IntoIterator<Item = ReferenceRow>) -> Self {
        let mut kept = Vec::new();
        let mut index = HashMap::new();
        let mut missing_phylum = 0usize;
        let mut duplicates = 0usize;

        for row in rows {
            if row.phylum.trim().is_empty() {
                missing_phylum += 1;
                continue;
            }
            let key = row.name.trim().to_lowercase();
            if index.contains_key(&key) {
                duplicates += 1;
                continue;
            }
            index.insert(key, kept.len());
            kept.push(row);
        }

        if missing_phylum > 0 {
            warn!("Skipped {} reference rows without a phylum", missing_phylum);
        }
        if duplicates > 0 {
            warn!("Skipped {} duplicate reference names", duplicates);
        }

        Self { rows: kept, index }
    }

    /// Load the `taxonomy_reference` table from a SQLite file (read-only)
    pub async fn load_sqlite(db_path: &Path) -> Result<Self> {
        let pool = connect_readonly(db_path).await?;
        let rows: Vec<ReferenceRow> = sqlx::query_as(SELECT_REFERENCE_ROWS)
            .fetch_all(&pool)
            .await?;
        pool.close().await;

        let db = Self::from_rows(rows);
        info!(
            rows = db.len(),
            path = %db_path.display(),
            "Reference taxonomy loaded"
        );
        Ok(db)
    }

    /// Case-insensitive exact match on `Name`
    pub fn lookup(&self, name: &str) -> Option<&ReferenceRow> {
        let row = self
            .index
            .get(&name.to_lowercase())
            .map(|&i| &self.rows[i]);
        debug!(name = %name, hit = row.is_some(), "Reference lookup");
        row
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Distinct phyla, sorted
    pub fn phyla(&self) -> Vec<&str> {
        self.rows
            .iter()
            .map(|r| r.phylum.as_str())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Up to `limit` genus-rank rows of `phylum` (case-insensitive), in table order
    pub fn genera_for_phylum(&self, phylum: &str, limit: usize) -> Vec<&ReferenceRow> {
        self.rows
            .iter()
            .filter(|r| r.rank.eq_ignore_ascii_case("genus") && r.phylum.eq_ignore_ascii_case(phylum))
            .take(limit)
            .collect()
    }
}

/// Open a SQLite file with no write access
async fn connect_readonly(db_path: &Path) -> Result<SqlitePool> {
    if !db_path.exists() {
        return Err(Error::NotFound(format!(
            "Reference database not found: {}",
            db_path.display()
        )));
    }

    // mode=ro + immutable=1: SQLite never writes, not even journal state
    let db_url = format!("sqlite://{}?mode=ro&immutable=1", db_path.display());
    Ok(SqlitePool::connect(&db_url).await?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ReferenceDatabase {
        ReferenceDatabase::from_rows(vec![
            ReferenceRow::new("Bacteroides", "genus", "Bacteroidota", Some("Bacteria")),
            ReferenceRow::new("Prevotella", "genus", "Bacteroidota", Some("Bacteria")),
            ReferenceRow::new("Bacteroidaceae", "family", "Bacteroidota", Some("Bacteria")),
            ReferenceRow::new("Faecalibacterium", "genus", "Bacillota", Some("Bacteria")),
            ReferenceRow::new("BACTEROIDES", "genus", "Other", Some("Bacteria")),
            ReferenceRow::new("Orphan", "genus", "  ", None),
        ])
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        let db = sample();
        assert_eq!(db.lookup("bacteroides").unwrap().phylum, "Bacteroidota");
        assert_eq!(db.lookup("BACTEROIDES").unwrap().name, "Bacteroides");
        assert!(db.lookup("Bacteroides fragilis").is_none());
    }

    #[test]
    fn test_duplicates_and_empty_phylum_skipped() {
        let db = sample();
        assert_eq!(db.len(), 4);
        assert!(db.lookup("Orphan").is_none());
    }

    #[test]
    fn test_phyla_sorted_distinct() {
        assert_eq!(sample().phyla(), vec!["Bacillota", "Bacteroidota"]);
    }

    #[test]
    fn test_genera_for_phylum_filters_rank_and_limit() {
        let db = sample();
        let names: Vec<_> = db
            .genera_for_phylum("bacteroidota", 10)
            .iter()
            .map(|r| r.name.as_str())
            .collect();
        assert_eq!(names, vec!["Bacteroides", "Prevotella"]);
        assert_eq!(db.genera_for_phylum("Bacteroidota", 1).len(), 1);
        assert!(db.genera_for_phylum("Bacteroidota", 0).is_empty());
    }

    #[tokio::test]
    async fn test_missing_file_is_not_found() {
        let result = ReferenceDatabase::load_sqlite(Path::new("/nonexistent/ref.db")).await;
        assert!(matches!(result, Err(Error::NotFound(_))));
    }
}
