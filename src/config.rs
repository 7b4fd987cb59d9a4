use bitflags::bitflags;

pub const DEFAULT_MAX_SIZE_DOWN_ITERATIONS: usize = 3;

bitflags! {
    /// Passes that emit per-node `tracing` output.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct TraceFlags: u8 {
        const SIZE_UP = 1 << 0;
        const SIZE_DOWN = 1 << 1;
        const POSITION = 1 << 2;
        const SCENE_POS = 1 << 3;
    }
}

impl TraceFlags {
    /// Parses a comma separated list such as `size_up,position` or `all`.
    /// Unknown names are ignored.
    pub fn parse(value: &str) -> Self {
        let mut flags = TraceFlags::empty();
        for name in value.split(',').map(str::trim) {
            flags |= match name.to_ascii_lowercase().as_str() {
                "all" | "1" | "true" => TraceFlags::all(),
                "size_up" => TraceFlags::SIZE_UP,
                "size_down" => TraceFlags::SIZE_DOWN,
                "position" => TraceFlags::POSITION,
                "scene_pos" => TraceFlags::SCENE_POS,
                _ => TraceFlags::empty(),
            };
        }
        flags
    }
}

/// Settings threaded through every layout pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutConfig {
    /// Upper bound on SizeDown passes per layout cycle.
    pub max_size_down_iterations: usize,
    pub trace: TraceFlags,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            max_size_down_iterations: DEFAULT_MAX_SIZE_DOWN_ITERATIONS,
            trace: TraceFlags::empty(),
        }
    }
}

impl LayoutConfig {
    /// Reads `LAYKIT_TRACE_LAYOUT` and `LAYKIT_MAX_ITERATIONS`.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(value) = std::env::var("LAYKIT_TRACE_LAYOUT") {
            config.trace = TraceFlags::parse(&value);
        }
        if let Some(max) = std::env::var("LAYKIT_MAX_ITERATIONS")
            .ok()
            .and_then(|value| value.trim().parse::<usize>().ok())
        {
            config = config.with_max_iterations(max);
        }
        config
    }

    pub fn with_trace(mut self, trace: TraceFlags) -> Self {
        self.trace = trace;
        self
    }

    pub fn with_max_iterations(mut self, max: usize) -> Self {
        self.max_size_down_iterations = max.max(1);
        self
    }

    pub fn traces(&self, flag: TraceFlags) -> bool {
        self.trace.contains(flag)
    }
}
