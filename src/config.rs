use std::time::Duration;

/// How long a single `input` poll waits for a line before checking the stop
/// flag again.
pub const DEFAULT_INPUT_TIMEOUT: Duration = Duration::from_secs(1);

/// Settings of an evaluation context.
///
/// # Example
/// ```
/// use std::time::Duration;
///
/// use bloc::config::Config;
///
/// let config = Config::default().with_seed(7);
/// assert_eq!(config.seed, Some(7));
/// assert_eq!(config.input_timeout, Duration::from_secs(1));
///
/// let quick = config.with_input_timeout(Duration::from_millis(50));
/// assert_eq!(quick.input_timeout, Duration::from_millis(50));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Seed of the `random` generator. `None` seeds from the operating
    /// system.
    pub seed:          Option<u64>,
    /// Poll interval of `input`.
    pub input_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self { seed:          None,
               input_timeout: DEFAULT_INPUT_TIMEOUT, }
    }
}

impl Config {
    /// Fixes the seed of the `random` generator.
    #[must_use]
    pub const fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Changes the poll interval of `input`.
    #[must_use]
    pub const fn with_input_timeout(mut self, timeout: Duration) -> Self {
        self.input_timeout = timeout;
        self
    }
}
