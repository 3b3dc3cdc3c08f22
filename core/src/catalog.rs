use crate::error::SearchError;
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

lazy_static! {
    static ref PRICE_RE: Regex = Regex::new(r"\d+(?:\.\d+)?").expect("valid regex");
}

/// One catalog entry. Only `wine` and `review` matter to the search core; the
/// rest is passed through to callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WineRecord {
    pub wine: String,
    #[serde(default)]
    pub review: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub price: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub varietal: String,
    #[serde(default)]
    pub appellation: String,
    #[serde(default)]
    pub country: String,
}

// Prices show up as "$24", 24 or null depending on the export.
fn lenient_text<'de, D: Deserializer<'de>>(de: D) -> Result<String, D::Error> {
    Ok(match serde_json::Value::deserialize(de)? {
        serde_json::Value::Null => String::new(),
        serde_json::Value::String(s) => s,
        other => other.to_string(),
    })
}

impl WineRecord {
    pub fn new(wine: impl Into<String>, review: impl Into<String>) -> Self {
        Self {
            wine: wine.into(),
            review: review.into(),
            price: String::new(),
            category: String::new(),
            varietal: String::new(),
            appellation: String::new(),
            country: String::new(),
        }
    }

    /// First number in the price text, ignoring thousands separators.
    pub fn price_value(&self) -> Option<f64> {
        let cleaned = self.price.replace(',', "");
        PRICE_RE.find(&cleaned).and_then(|m| m.as_str().parse().ok())
    }
}

/// A `(wine, review)` pair as consumed by the index builder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub wine: String,
    pub review: String,
}

impl Document {
    pub fn new(wine: impl Into<String>, review: impl Into<String>) -> Self {
        Self { wine: wine.into(), review: review.into() }
    }
}

/// Supplies the document collection to the index cache and resolves reviews
/// by wine name.
pub trait CorpusSource: Send + Sync {
    /// The full collection, in the order ordinals are assigned.
    fn documents(&self) -> Result<Vec<Document>, SearchError>;

    fn review(&self, wine: &str) -> Option<String>;
}

/// Structured filters applied outside the similarity core.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WineFilter {
    pub category: Option<String>,
    pub country: Option<String>,
    pub varietal: Option<String>,
    /// Compared against the first comma-separated part of the appellation.
    pub appellation: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    /// Explicit allow list of wine names (case-insensitive).
    pub wines: Option<Vec<String>>,
}

impl WineFilter {
    pub fn matches(&self, rec: &WineRecord) -> bool {
        if !eq_ci(&self.category, &rec.category) || !eq_ci(&self.country, &rec.country) || !eq_ci(&self.varietal, &rec.varietal) {
            return false;
        }
        if let Some(want) = &self.appellation {
            let region = rec.appellation.split(',').next().unwrap_or("").trim();
            if !region.eq_ignore_ascii_case(want.trim()) {
                return false;
            }
        }
        if self.min_price.is_some() || self.max_price.is_some() {
            let Some(price) = rec.price_value() else { return false };
            if self.min_price.is_some_and(|min| price < min) || self.max_price.is_some_and(|max| price > max) {
                return false;
            }
        }
        if let Some(names) = &self.wines {
            let wine = rec.wine.trim();
            if !wine.is_empty() && !names.iter().any(|n| n.trim().to_lowercase() == wine.to_lowercase()) {
                return false;
            }
        }
        true
    }
}

fn eq_ci(want: &Option<String>, have: &str) -> bool {
    match want {
        Some(w) => w.to_lowercase() == have.to_lowercase(),
        None => true,
    }
}

/// In-memory wine catalog, read-only after loading.
#[derive(Debug, Default)]
pub struct Catalog {
    records: Vec<WineRecord>,
    by_name: HashMap<String, usize>,
}

impl Catalog {
    /// Build from records; a repeated wine name keeps its first record.
    pub fn from_records(records: Vec<WineRecord>) -> Self {
        let mut catalog = Catalog::default();
        for rec in records {
            if catalog.by_name.contains_key(&rec.wine) {
                tracing::warn!(wine = %rec.wine, "duplicate catalog entry skipped");
                continue;
            }
            catalog.by_name.insert(rec.wine.clone(), catalog.records.len());
            catalog.records.push(rec);
        }
        catalog
    }

    /// Load from a `.json`/`.jsonl` file or a directory of them.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, SearchError> {
        let path = path.as_ref();
        let mut files: Vec<PathBuf> = Vec::new();
        if path.is_dir() {
            for entry in WalkDir::new(path).sort_by_file_name().into_iter().filter_map(|e| e.ok()) {
                let p = entry.path();
                if p.is_file() && matches!(p.extension().and_then(|s| s.to_str()), Some("json" | "jsonl")) {
                    files.push(p.to_path_buf());
                }
            }
        } else if path.is_file() {
            files.push(path.to_path_buf());
        } else {
            return Err(SearchError::Catalog(format!("no such catalog: {}", path.display())));
        }

        let mut records = Vec::new();
        for file in files {
            if file.extension().and_then(|s| s.to_str()) == Some("jsonl") {
                read_jsonl(&file, &mut records)?;
            } else {
                read_json(&file, &mut records)?;
            }
        }
        tracing::info!(path = %path.display(), records = records.len(), "catalog loaded");
        Ok(Self::from_records(records))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, wine: &str) -> Option<&WineRecord> {
        self.by_name.get(wine).map(|&i| &self.records[i])
    }

    pub fn records(&self) -> &[WineRecord] {
        &self.records
    }

    /// Wine names containing `input` (case-insensitive), in catalog order.
    pub fn suggest_wines(&self, input: &str, limit: usize) -> Vec<String> {
        let needle = input.trim().to_lowercase();
        self.records
            .iter()
            .filter(|r| r.wine.to_lowercase().contains(&needle))
            .take(limit)
            .map(|r| r.wine.clone())
            .collect()
    }

    /// Distinct varietals containing `input` (case-insensitive).
    pub fn suggest_varietals(&self, input: &str, limit: usize) -> Vec<String> {
        let needle = input.trim().to_lowercase();
        distinct(
            self.records
                .iter()
                .map(|r| r.varietal.as_str())
                .filter(|v| !v.is_empty() && v.to_lowercase().contains(&needle)),
            limit,
        )
    }

    /// Distinct regions (first comma-separated part of the appellation) whose
    /// appellation contains `input`, optionally scoped to one country.
    /// A country of `"all"` means no scope.
    pub fn suggest_regions(&self, country: Option<&str>, input: &str, limit: usize) -> Vec<String> {
        let needle = input.trim().to_lowercase();
        let country = country.map(str::trim).filter(|c| !c.is_empty() && !c.eq_ignore_ascii_case("all"));
        distinct(
            self.records
                .iter()
                .filter(|r| country.map_or(true, |c| r.country.to_lowercase() == c.to_lowercase()))
                .filter(|r| r.appellation.to_lowercase().contains(&needle))
                .filter_map(|r| r.appellation.split(',').next().map(str::trim).filter(|s| !s.is_empty())),
            limit,
        )
    }

    /// Records passing `filter`, in catalog order.
    pub fn filter<'a>(&'a self, filter: &'a WineFilter) -> impl Iterator<Item = &'a WineRecord> + 'a {
        self.records.iter().filter(move |r| filter.matches(r))
    }
}

impl CorpusSource for Catalog {
    fn documents(&self) -> Result<Vec<Document>, SearchError> {
        Ok(self.records.iter().map(|r| Document::new(r.wine.clone(), r.review.clone())).collect())
    }

    fn review(&self, wine: &str) -> Option<String> {
        self.get(wine).map(|r| r.review.clone())
    }
}

fn distinct<'a>(values: impl Iterator<Item = &'a str>, limit: usize) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for v in values {
        if out.len() >= limit {
            break;
        }
        if !out.iter().any(|o| o == v) {
            out.push(v.to_string());
        }
    }
    out
}

fn read_jsonl(file: &Path, out: &mut Vec<WineRecord>) -> Result<(), SearchError> {
    let reader = BufReader::new(File::open(file)?);
    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        out.push(serde_json::from_str(&line)?);
    }
    Ok(())
}

fn read_json(file: &Path, out: &mut Vec<WineRecord>) -> Result<(), SearchError> {
    let reader = BufReader::new(File::open(file)?);
    let json: serde_json::Value = serde_json::from_reader(reader)?;
    match json {
        serde_json::Value::Array(arr) => {
            for v in arr {
                out.push(serde_json::from_value(v)?);
            }
        }
        serde_json::Value::Object(_) => out.push(serde_json::from_value(json)?),
        _ => return Err(SearchError::Catalog(format!("{}: expected an object or array", file.display()))),
    }
    Ok(())
}
