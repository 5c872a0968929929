use crate::errors::AppError;
use regex::Regex;

pub const DEFAULT_IMAGE_ENDPOINT: &str = "https://cdn.sanity.io";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageSpec {
  pub width: u32,
  pub height: u32,
  /// Crop mode understood by the image CDN, e.g. `crop` or `max`.
  pub fit: &'static str,
}

/// Size every catalog card image is delivered at.
pub const CARD_IMAGE: ImageSpec = ImageSpec {
  width: 800,
  height: 450,
  fit: "crop",
};

/// Turns asset references like `image-<id>-<w>x<h>-<format>` into CDN URLs.
#[derive(Debug, Clone)]
pub struct ImageUrlBuilder {
  base: String,
  project_id: String,
  dataset: String,
  pattern: Regex,
}

impl ImageUrlBuilder {
  pub fn new(base: Option<&str>, project_id: &str, dataset: &str) -> Result<ImageUrlBuilder, AppError> {
    Ok(ImageUrlBuilder {
      base: base.unwrap_or(DEFAULT_IMAGE_ENDPOINT).trim_end_matches('/').to_owned(),
      project_id: project_id.to_owned(),
      dataset: dataset.to_owned(),
      pattern: Regex::new(r"^image-(?P<id>[A-Za-z0-9]+)-(?P<dims>\d+x\d+)-(?P<format>[a-z0-9]+)$")?,
    })
  }

  pub fn url(&self, reference: &str, spec: &ImageSpec) -> Result<String, AppError> {
    let caps = self
      .pattern
      .captures(reference)
      .ok_or_else(|| AppError::UpstreamError(format!("Malformed image reference {}", reference)))?;
    Ok(format!(
      "{}/images/{}/{}/{}-{}.{}?w={}&h={}&fit={}",
      self.base,
      self.project_id,
      self.dataset,
      &caps["id"],
      &caps["dims"],
      &caps["format"],
      spec.width,
      spec.height,
      spec.fit
    ))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn builder() -> ImageUrlBuilder {
    ImageUrlBuilder::new(None, "abcd1234", "production").unwrap()
  }

  #[test]
  fn test_card_image_url() {
    let url = builder().url("image-Tb9Ew8CXIwaY6R1kjMvI0uRR-2000x3000-jpg", &CARD_IMAGE).unwrap();
    assert_eq!(
      url,
      "https://cdn.sanity.io/images/abcd1234/production/Tb9Ew8CXIwaY6R1kjMvI0uRR-2000x3000.jpg?w=800&h=450&fit=crop"
    );
  }

  #[test]
  fn test_custom_spec_and_base() {
    let builder = ImageUrlBuilder::new(Some("http://localhost:9000/"), "p", "staging").unwrap();
    let spec = ImageSpec {
      width: 64,
      height: 64,
      fit: "max",
    };
    let url = builder.url("image-abc123-10x20-png", &spec).unwrap();
    assert_eq!(url, "http://localhost:9000/images/p/staging/abc123-10x20.png?w=64&h=64&fit=max");
  }

  #[test]
  fn test_malformed_reference() {
    assert!(builder().url("file-abc-pdf", &CARD_IMAGE).is_err());
    assert!(builder().url("image-abc-jpg", &CARD_IMAGE).is_err());
  }
}
