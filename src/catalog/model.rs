use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Record identifier as handed out by the content store: either numeric or an
/// opaque string.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash)]
#[serde(untagged)]
pub enum Id {
  Number(u64),
  Text(String),
}

impl fmt::Display for Id {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    match *self {
      Id::Number(n) => write!(f, "{}", n),
      Id::Text(ref s) => write!(f, "{}", s),
    }
  }
}

impl From<&str> for Id {
  fn from(s: &str) -> Id {
    Id::Text(s.to_owned())
  }
}

impl From<u64> for Id {
  fn from(n: u64) -> Id {
    Id::Number(n)
  }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Tag {
  pub id: Id,
  pub name: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Project {
  pub id: Id,
  pub title: String,
  pub slug: String,
  #[serde(default)]
  pub excerpt: String,
  pub description: Option<String>,
  pub image_url: Option<String>,
  #[serde(default)]
  pub tags: Vec<Tag>,
  pub demo_url: Option<String>,
  pub repo_url: Option<String>,
  #[serde(default)]
  pub featured: bool,
  pub created_at: DateTime<Utc>,
  pub updated_at: Option<DateTime<Utc>>,
}

impl Project {
  pub fn description(&self) -> &str {
    self.description.as_deref().unwrap_or(&self.excerpt)
  }

  /// Drops repeated tag ids, keeping the first occurrence in place.
  pub fn dedup_tags(&mut self) {
    let mut seen: HashSet<Id> = HashSet::new();
    self.tags.retain(|t| seen.insert(t.id.clone()));
  }
}

/// One slice of the catalog. `page` is the page actually served, which differs
/// from the requested one when the request was clamped.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Page {
  pub results: Vec<Project>,
  pub count: usize,
  pub page: u32,
  pub next: Option<u32>,
  pub previous: Option<u32>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub error: Option<String>,
}

impl Page {
  pub fn empty_with_error(message: String) -> Page {
    Page {
      results: vec![],
      count: 0,
      page: 1,
      next: None,
      previous: None,
      error: Some(message),
    }
  }

  /// A single unpaginated batch.
  pub fn batch(results: Vec<Project>) -> Page {
    Page {
      count: results.len(),
      results,
      page: 1,
      next: None,
      previous: None,
      error: None,
    }
  }
}
