/*!
Per-category log switches.

Every message the generator emits belongs to one [LogCategory]. A [LogContext] is built once
from the command line and handed to the components that report, so a category can be switched
on or off without touching the global `log` level. Messages of an enabled category are passed to
the `log` facade with the category as target (for example `mrtgen::io`), where the usual level
filtering applies.
*/
use bitflags::bitflags;

bitflags! {
    /// Set of enabled categories.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct LogCategories: u8 {
        const NORMAL = 0x1;
        const ERROR = 0x2;
        const BGP = 0x4;
        const IO = 0x8;
    }
}

/// Log categories selectable with `--logging`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum LogCategory {
    /// Progress and configuration summaries
    Normal,
    /// Failures
    Error,
    /// Per-route encoding details
    Bgp,
    /// Write buffer and flush activity
    Io,
}

impl LogCategory {
    pub const ALL: [LogCategory; 4] = [
        LogCategory::Normal,
        LogCategory::Error,
        LogCategory::Bgp,
        LogCategory::Io,
    ];

    pub const fn name(&self) -> &'static str {
        match self {
            LogCategory::Normal => "normal",
            LogCategory::Error => "error",
            LogCategory::Bgp => "bgp",
            LogCategory::Io => "io",
        }
    }

    /// `log` target the category's messages are emitted under.
    pub const fn target(&self) -> &'static str {
        match self {
            LogCategory::Normal => "mrtgen::normal",
            LogCategory::Error => "mrtgen::error",
            LogCategory::Bgp => "mrtgen::bgp",
            LogCategory::Io => "mrtgen::io",
        }
    }

    const fn flag(&self) -> LogCategories {
        match self {
            LogCategory::Normal => LogCategories::NORMAL,
            LogCategory::Error => LogCategories::ERROR,
            LogCategory::Bgp => LogCategories::BGP,
            LogCategory::Io => LogCategories::IO,
        }
    }
}

/// Enabled log categories, threaded explicitly through the generator and encoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogContext {
    enabled: LogCategories,
}

impl Default for LogContext {
    /// `normal` and `error` are on by default.
    fn default() -> Self {
        LogContext {
            enabled: LogCategories::NORMAL | LogCategories::ERROR,
        }
    }
}

impl LogContext {
    /// A context with nothing enabled.
    pub fn silent() -> Self {
        LogContext {
            enabled: LogCategories::empty(),
        }
    }

    /// Default categories plus the given ones.
    pub fn with_categories<'a, I>(categories: I) -> Self
    where
        I: IntoIterator<Item = &'a LogCategory>,
    {
        let mut ctx = LogContext::default();
        for category in categories {
            ctx.enable(*category);
        }
        ctx
    }

    pub fn enable(&mut self, category: LogCategory) {
        self.enabled.insert(category.flag());
    }

    pub fn disable(&mut self, category: LogCategory) {
        self.enabled.remove(category.flag());
    }

    #[inline]
    pub fn is_enabled(&self, category: LogCategory) -> bool {
        self.enabled.contains(category.flag())
    }
}

/// Logs through the `log` facade if the category is enabled in the given [LogContext].
///
/// ```
/// use mrtgen::log_category;
/// use mrtgen::logging::LogContext;
///
/// let ctx = LogContext::default();
/// log_category!(ctx, Normal, info, "generated {} routes", 10);
/// ```
#[macro_export]
macro_rules! log_category {
    ($ctx:expr, $category:ident, $level:ident, $($arg:tt)+) => {
        if $ctx.is_enabled($crate::logging::LogCategory::$category) {
            ::log::$level!(
                target: $crate::logging::LogCategory::$category.target(),
                $($arg)+
            );
        }
    };
}
