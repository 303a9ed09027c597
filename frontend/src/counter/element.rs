use super::error::CounterError;

/// Opaque handle for a display element known to a [`CounterBoard`](super::CounterBoard).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(pub u32);

/// What gets appended to the final value of a counter.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SuffixRule {
    #[default]
    None,
    Always(String),
    /// Append `suffix` unless the target equals `except`.
    UnlessTarget { suffix: String, except: u64 },
}

impl SuffixRule {
    pub fn suffix_for(&self, target: u64) -> Option<&str> {
        match self {
            SuffixRule::None => None,
            SuffixRule::Always(suffix) => Some(suffix.as_str()),
            SuffixRule::UnlessTarget { suffix, except } if *except != target => Some(suffix.as_str()),
            SuffixRule::UnlessTarget { .. } => None,
        }
    }
}

/// Raw counter markup, as read from the page before parsing.
#[derive(Debug, Clone, PartialEq)]
pub struct CounterSource {
    pub id: ElementId,
    pub raw_target: Option<String>,
    pub suffix: SuffixRule,
}

impl CounterSource {
    pub fn new(id: ElementId, raw_target: Option<&str>) -> Self {
        Self {
            id,
            raw_target: raw_target.map(str::to_owned),
            suffix: SuffixRule::None,
        }
    }

    pub fn with_suffix(mut self, suffix: SuffixRule) -> Self {
        self.suffix = suffix;
        self
    }
}

/// A counter with its target parsed and suffix resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackedElement {
    id: ElementId,
    start: u64,
    target: u64,
    suffix: Option<String>,
    duration_ms: u32,
}

impl TrackedElement {
    pub fn new(id: ElementId, target: u64, duration_ms: u32) -> Self {
        Self {
            id,
            start: 0,
            target,
            suffix: None,
            duration_ms,
        }
    }

    /// Parses the target once; the suffix rule is resolved against it here
    /// so ticks never touch the markup again.
    pub fn parse(source: &CounterSource, duration_ms: u32) -> Result<Self, CounterError> {
        let raw = source
            .raw_target
            .as_deref()
            .map(str::trim)
            .filter(|raw| !raw.is_empty())
            .ok_or(CounterError::MissingTarget)?;
        let target = raw
            .parse::<u64>()
            .map_err(|_| CounterError::UnparsableTarget { raw: raw.to_string() })?;

        let suffix = source.suffix.suffix_for(target).map(str::to_owned);
        Ok(Self {
            suffix,
            ..Self::new(source.id, target, duration_ms)
        })
    }

    pub fn with_start(mut self, start: u64) -> Self {
        self.start = start;
        self
    }

    pub fn with_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = Some(suffix.into());
        self
    }

    pub fn id(&self) -> ElementId {
        self.id
    }

    pub fn start(&self) -> u64 {
        self.start
    }

    pub fn target(&self) -> u64 {
        self.target
    }

    pub fn suffix(&self) -> Option<&str> {
        self.suffix.as_deref()
    }

    pub fn duration_ms(&self) -> u32 {
        self.duration_ms
    }

    pub fn start_text(&self) -> String {
        self.start.to_string()
    }

    /// Literal target plus suffix, written on the last tick.
    pub fn final_text(&self) -> String {
        match &self.suffix {
            Some(suffix) => format!("{}{}", self.target, suffix),
            None => self.target.to_string(),
        }
    }
}
