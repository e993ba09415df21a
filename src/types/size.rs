use serde::{Deserialize, Serialize};

/// Largest export edge in pixels. Bounds the raster allocation for a single export.
pub const MAX_EXPORT_SIZE: u32 = 4096;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SizeRange {
    pub min: u32,
    pub max: u32,
}

impl Default for SizeRange {
    fn default() -> Self {
        Self { min: 100, max: 1000 }
    }
}

impl SizeRange {
    /// Caps `max` at [`MAX_EXPORT_SIZE`] and falls back to the default range when
    /// the configured one is unusable.
    pub fn validated(self) -> Self {
        let max = if self.max > MAX_EXPORT_SIZE {
            log::warn!(
                "Size range maximum {} exceeds {MAX_EXPORT_SIZE}, capping",
                self.max
            );
            MAX_EXPORT_SIZE
        } else {
            self.max
        };
        if self.min == 0 || self.min > max {
            log::warn!(
                "Ignoring invalid size range {}..={}, using default",
                self.min,
                self.max
            );
            Self::default()
        } else {
            Self { min: self.min, max }
        }
    }

    pub fn clamp(&self, value: Option<i64>) -> u32 {
        match value {
            None => self.min,
            Some(v) => v.clamp(self.min as i64, self.max as i64) as u32,
        }
    }

    pub fn contains(&self, value: i64) -> bool {
        value >= self.min as i64 && value <= self.max as i64
    }

    pub fn fill_fraction(&self, value: u32) -> f32 {
        if self.max == self.min {
            return 0.0;
        }
        (value.saturating_sub(self.min)) as f32 / (self.max - self.min) as f32
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SizeSource {
    Slider,
    Field,
}

/// Parses the text of the numeric field. Like a browser number input read with
/// `parseInt`, a leading integer is accepted and trailing junk is ignored.
pub fn parse_size_input(input: &str) -> Option<i64> {
    let s = input.trim();
    let digits_start = usize::from(s.starts_with(['-', '+']));
    let digits_len = s[digits_start..]
        .bytes()
        .take_while(|b| b.is_ascii_digit())
        .count();
    if digits_len == 0 {
        return None;
    }
    let end = digits_start + digits_len;
    // Saturate absurd lengths instead of failing; they clamp to max anyway.
    s[..end].parse::<i64>().ok().or_else(|| {
        if s.starts_with('-') {
            Some(i64::MIN)
        } else {
            Some(i64::MAX)
        }
    })
}

/// The export size, shown through two linked controls: a slider and a numeric field.
#[derive(Clone, Debug)]
pub struct LinkedSize {
    range: SizeRange,
    pub slider: u32,
    pub field: String,
    fill: f32,
}

impl LinkedSize {
    pub fn new(range: SizeRange, initial: u32) -> Self {
        let range = range.validated();
        let mut size = Self {
            range,
            slider: range.min,
            field: range.min.to_string(),
            fill: 0.0,
        };
        size.set_size(Some(initial as i64), SizeSource::Slider);
        size
    }

    pub fn range(&self) -> SizeRange {
        self.range
    }

    pub fn value(&self) -> u32 {
        self.slider
    }

    pub fn fill_fraction(&self) -> f32 {
        self.fill
    }

    /// Clamps `value` into range, mirrors it into the other control and updates
    /// the fill indicator. Returns the clamped value.
    pub fn set_size(&mut self, value: Option<i64>, source: SizeSource) -> u32 {
        let clamped = self.range.clamp(value);
        // Both controls take the canonical clamped value, whichever one was edited.
        self.slider = clamped;
        self.field = clamped.to_string();
        log::trace!("Size {clamped} set from {source:?}");
        self.fill = self.range.fill_fraction(clamped);
        clamped
    }

    /// Applies the current text of the numeric field.
    pub fn commit_field(&mut self) -> u32 {
        let parsed = parse_size_input(&self.field);
        self.set_size(parsed, SizeSource::Field)
    }

    /// Applies the current slider position.
    pub fn commit_slider(&mut self) -> u32 {
        self.set_size(Some(self.slider as i64), SizeSource::Slider)
    }

    /// Stepper buttons. Steps landing outside the range are ignored.
    pub fn step(&mut self, delta: i64) -> bool {
        let next = self.slider as i64 + delta;
        if !self.range.contains(next) {
            return false;
        }
        self.set_size(Some(next), SizeSource::Slider);
        true
    }

    pub fn set_range(&mut self, range: SizeRange) {
        self.range = range.validated();
        self.commit_slider();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn size() -> LinkedSize {
        LinkedSize::new(SizeRange { min: 100, max: 1000 }, 300)
    }

    #[test]
    fn test_clamp_from_either_control() {
        for source in [SizeSource::Slider, SizeSource::Field] {
            for (input, expected) in [(50, 100), (100, 100), (640, 640), (1000, 1000), (5000, 1000)] {
                let mut s = size();
                s.field = input.to_string();
                let v = s.set_size(Some(input), source);
                assert_eq!(v, expected);
                assert_eq!(s.slider, expected);
                assert_eq!(s.field, expected.to_string());
            }
        }
    }

    #[test]
    fn test_non_numeric_field_goes_to_min() {
        let mut s = size();
        s.field = "abc".to_string();
        assert_eq!(s.commit_field(), 100);
        assert_eq!(s.slider, 100);
        assert_eq!(s.field, "100");
    }

    #[test]
    fn test_parse_size_input() {
        assert_eq!(parse_size_input(" 250 "), Some(250));
        assert_eq!(parse_size_input("12px"), Some(12));
        assert_eq!(parse_size_input("-5"), Some(-5));
        assert_eq!(parse_size_input(""), None);
        assert_eq!(parse_size_input("px12"), None);
        assert_eq!(parse_size_input("99999999999999999999999"), Some(i64::MAX));
    }

    #[test]
    fn test_fill_fraction() {
        let mut s = size();
        s.set_size(Some(100), SizeSource::Slider);
        assert_eq!(s.fill_fraction(), 0.0);
        s.set_size(Some(550), SizeSource::Slider);
        assert!((s.fill_fraction() - 0.5).abs() < f32::EPSILON);
        s.set_size(Some(1000), SizeSource::Field);
        assert_eq!(s.fill_fraction(), 1.0);

        let flat = SizeRange { min: 10, max: 10 };
        assert_eq!(flat.fill_fraction(10), 0.0);
    }

    #[test]
    fn test_step_stays_in_range() {
        let mut s = LinkedSize::new(SizeRange { min: 100, max: 1000 }, 995);
        assert!(!s.step(10));
        assert_eq!(s.value(), 995);
        assert!(s.step(-10));
        assert_eq!(s.value(), 985);
        assert_eq!(s.field, "985");
    }

    #[test]
    fn test_field_text_is_normalized() {
        let mut s = size();
        s.field = " 0250".to_string();
        assert_eq!(s.commit_field(), 250);
        assert_eq!(s.field, "250");

        s.field = "640px".to_string();
        assert_eq!(s.commit_field(), 640);
        assert_eq!(s.field, "640");
        assert_eq!(s.slider, 640);
    }

    #[test]
    fn test_oversized_range_is_capped() {
        let range = SizeRange { min: 100, max: 4_000_000_000 }.validated();
        assert_eq!(range, SizeRange { min: 100, max: MAX_EXPORT_SIZE });

        let mut s = LinkedSize::new(SizeRange { min: 100, max: 4_000_000_000 }, 300);
        s.field = "4000000000".to_string();
        assert_eq!(s.commit_field(), MAX_EXPORT_SIZE);

        // A minimum above the cap leaves nothing usable.
        let range = SizeRange { min: 5000, max: 9000 }.validated();
        assert_eq!(range, SizeRange::default());
    }

    #[test]
    fn test_invalid_range_falls_back() {
        let s = LinkedSize::new(SizeRange { min: 500, max: 10 }, 300);
        assert_eq!(s.range(), SizeRange::default());
        assert_eq!(s.value(), 300);
    }
}
