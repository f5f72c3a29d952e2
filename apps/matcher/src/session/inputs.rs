//! Pending per-mode input. Every operation here is total: nothing fails, out-of-range
//! or empty input is simply ignored.

use bytes::Bytes;

/// An image picked by the user, held in memory until submission.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageFile {
    pub name: String,
    pub content_type: String,
    pub bytes: Bytes,
}

impl ImageFile {
    pub fn new(
        name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: impl Into<Bytes>,
    ) -> Self {
        Self {
            name: name.into(),
            content_type: content_type.into(),
            bytes: bytes.into(),
        }
    }
}

/// User-editable similarity cutoff, kept as typed and coerced only when a request is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Threshold(String);

impl Threshold {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn raw(&self) -> &str {
        &self.0
    }

    /// Numeric value with browser number-input coercion: blank is `0`, signed decimal
    /// and exponent forms, `Infinity`, and unsigned `0x`/`0o`/`0b` integers parse, and
    /// anything else is `NaN`. Never clamped.
    pub fn value(&self) -> f64 {
        let trimmed = self.0.trim();
        if trimmed.is_empty() {
            return 0.0;
        }

        if let Some(value) = parse_radix_integer(trimmed) {
            return value;
        }

        let (negative, unsigned) = match trimmed.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
        };
        if unsigned == "Infinity" {
            return if negative {
                f64::NEG_INFINITY
            } else {
                f64::INFINITY
            };
        }

        // `f64::from_str` also takes `inf` and `nan` spellings; keep to digits.
        let numeric = trimmed
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | '.' | 'e' | 'E'));
        if !numeric {
            return f64::NAN;
        }
        trimmed.parse::<f64>().unwrap_or(f64::NAN)
    }
}

fn parse_radix_integer(text: &str) -> Option<f64> {
    let (radix, digits) = match text.get(..2)? {
        "0x" | "0X" => (16, &text[2..]),
        "0o" | "0O" => (8, &text[2..]),
        "0b" | "0B" => (2, &text[2..]),
        _ => return None,
    };
    if digits.is_empty() {
        return Some(f64::NAN);
    }
    let value = digits.chars().try_fold(0.0f64, |acc, c| {
        c.to_digit(radix).map(|d| acc * f64::from(radix) + f64::from(d))
    });
    Some(value.unwrap_or(f64::NAN))
}

impl Default for Threshold {
    fn default() -> Self {
        Self::new("0.8")
    }
}

/// Accumulated inputs for all modes. Fields are shared between modes the way the
/// console shares them: the resume scratch text doubles as the multi-text entry box,
/// and the resume image list serves both image modes.
#[derive(Debug, Clone, Default)]
pub struct InputAccumulator {
    resume_text: String,
    job_text: String,
    resume_texts: Vec<String>,
    resume_images: Vec<ImageFile>,
    job_image: Option<ImageFile>,
}

impl InputAccumulator {
    pub fn resume_text(&self) -> &str {
        &self.resume_text
    }

    pub fn job_text(&self) -> &str {
        &self.job_text
    }

    pub fn resume_texts(&self) -> &[String] {
        &self.resume_texts
    }

    pub fn resume_images(&self) -> &[ImageFile] {
        &self.resume_images
    }

    pub fn job_image(&self) -> Option<&ImageFile> {
        self.job_image.as_ref()
    }

    pub fn set_resume_text(&mut self, text: impl Into<String>) {
        self.resume_text = text.into();
    }

    pub fn set_job_text(&mut self, text: impl Into<String>) {
        self.job_text = text.into();
    }

    /// Appends the trimmed text to the multi-text list and clears the scratch field.
    /// Blank input is a no-op and leaves the scratch field untouched.
    pub fn add_resume_text(&mut self, text: &str) {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return;
        }
        self.resume_texts.push(trimmed.to_string());
        self.resume_text.clear();
    }

    /// Commits whatever is in the scratch field ("add then clear the box").
    pub fn commit_resume_text(&mut self) {
        let scratch = self.resume_text.clone();
        self.add_resume_text(&scratch);
    }

    /// Replaces the resume image list wholesale.
    pub fn set_resume_images(&mut self, images: Vec<ImageFile>) {
        self.resume_images = images;
    }

    /// Appends after the existing entries, preserving order.
    pub fn append_resume_images(&mut self, images: impl IntoIterator<Item = ImageFile>) {
        self.resume_images.extend(images);
    }

    /// Removes one entry by position. Out-of-range indices are ignored.
    pub fn remove_resume_image(&mut self, index: usize) -> Option<ImageFile> {
        if index < self.resume_images.len() {
            Some(self.resume_images.remove(index))
        } else {
            None
        }
    }

    pub fn set_job_image(&mut self, image: Option<ImageFile>) {
        self.job_image = image;
    }

    pub fn clear_all(&mut self) {
        *self = Self::default();
    }
}
