use mime::Mime;

/// Parsed `Accept` header
///
/// Entries that fail to parse are ignored. Weights are clamped to `0.0..=1.0`.
#[derive(Debug, Clone)]
pub(crate) struct AcceptHeader {
    media_ranges: Vec<MediaRange>,
}

#[derive(Debug, Clone, PartialEq)]
struct MediaRange {
    media_type: Mime,
    weight: f32,
}

impl AcceptHeader {
    pub(crate) fn parse(header: &str) -> Self {
        let media_ranges = header.split(',').filter_map(Self::parse_single).collect();
        Self { media_ranges }
    }

    fn parse_single(part: &str) -> Option<MediaRange> {
        let part = part.trim();
        if part.is_empty() {
            return None;
        }

        let mut params = part.split(';');
        let media_type = params.next()?.trim().parse::<Mime>().ok()?;
        let weight = params
            .find_map(|p| p.trim().strip_prefix("q=")?.parse::<f32>().ok())
            .unwrap_or(1.0)
            .clamp(0.0, 1.0);

        Some(MediaRange { media_type, weight })
    }

    /// Whether the client lists `essence` (e.g. `text/html`) by name with a
    /// non-zero weight.
    ///
    /// Wildcards such as `*/*` do not count: curl and friends send them on
    /// every request.
    pub(crate) fn accepts_explicit(&self, essence: &str) -> bool {
        self.media_ranges
            .iter()
            .any(|r| r.weight > 0.0 && r.media_type.essence_str() == essence)
    }
}
