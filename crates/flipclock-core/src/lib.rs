//! flipclock core: the clock model with no window or GPU attached.
//!
//! Time never comes from a global clock here. Wall time is read through
//! [`time::WallClock`] and scheduling takes caller-supplied [`std::time::Instant`]s,
//! so everything can run on simulated time.

pub mod controls;
pub mod flip;
pub mod format;
pub mod model;
pub mod platform;
pub mod prefs;
pub mod theme;
pub mod time;
pub mod timer;
pub mod transition;
pub mod view;

pub use controls::ControlsVisibility;
pub use flip::{DigitGroup, FlipController, FlipPhase, FlipState};
pub use format::{DisplayFormat, FormattedTime, Meridiem};
pub use model::{ClockModel, Command, DisplayState};
pub use platform::{PlatformError, PlatformSurface};
pub use prefs::{JsonFileBackend, MemoryBackend, PreferenceBackend, PreferenceError, Preferences};
pub use theme::{Palette, Rgb8, Theme, ThemeRegistry};
pub use time::{ManualClock, SystemClock, TickSource, TimeSample, WallClock};
pub use timer::{TimerHandle, TimerId, TimerQueue};
pub use transition::{PaletteFade, ViewEnter};
pub use view::ClockView;
