//! Backend extensions.
//!
//! Extensions are optional capabilities handed to [`Backend::build`]. The only
//! extension so far is the [logger](logger).
//!
//! [`Backend::build`]: crate::Backend::build

pub mod logger;

use logger::{LogFacade, LogLevel, LoggerExt};

/// Extensions to build a backend with.
#[derive(Debug)]
pub struct ExtensionsBuilder<L> {
    pub logger: L,
}

impl Default for ExtensionsBuilder<LoggerExt<LogFacade>> {
    fn default() -> Self {
        Self {
            logger: LoggerExt::new(LogLevel::default(), LogFacade),
        }
    }
}

impl<L> ExtensionsBuilder<L> {
    /// Replaces the logger extension.
    #[must_use]
    pub fn logger<L2>(self, logger: L2) -> ExtensionsBuilder<L2> {
        ExtensionsBuilder { logger }
    }
}
