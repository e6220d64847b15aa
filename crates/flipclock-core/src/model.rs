//! The clock's message loop.
//!
//! [`ClockModel`] owns every timer and routes expired ids to their owner. The
//! window layer only forwards input as [`Command`]s, calls
//! [`advance`](ClockModel::advance) when the next deadline passes, and paints
//! [`display_state`](ClockModel::display_state).

use std::time::Instant;

use crate::controls::ControlsVisibility;
use crate::flip::{DigitGroup, FlipController, FlipState, FlipTimer};
use crate::format::{DisplayFormat, FormattedTime, format};
use crate::platform::PlatformSurface;
use crate::prefs::{PreferenceBackend, Preferences};
use crate::theme::{Palette, Theme, ThemeRegistry};
use crate::time::{TickSource, TimeSample, WallClock};
use crate::timer::{Expired, TimerQueue};
use crate::transition::{PaletteFade, ViewEnter};
use crate::view::ClockView;

/// User intents, already decoupled from the input device.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Command {
    ToggleFormat,
    CycleTheme,
    ToggleView,
    ToggleFullscreen,
    ExitFullscreen,
    /// Pointer or key activity with no other effect.
    Activity,
}

/// Per-frame snapshot for the painters.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayState {
    pub time: FormattedTime,
    pub view: ClockView,

    /// Present only while the digital view is mounted.
    pub hours: Option<FlipState>,
    pub minutes: Option<FlipState>,

    pub theme: Theme,
    /// Colours to paint with; blends toward `theme.palette` after a change.
    pub palette: Palette,
    /// Enter animation of `view`, eased, `1.0` once settled.
    pub view_enter: f32,
    pub use_24_hour: bool,
    pub controls_visible: bool,
    pub controls_opacity: f32,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
enum Routed {
    Nowhere,
    Changed,
    FlipCompleted,
}

#[derive(Debug)]
struct DigitalView {
    hours: FlipController,
    minutes: FlipController,
}

impl DigitalView {
    fn mount(time: &FormattedTime) -> Self {
        Self {
            hours: FlipController::new(DigitGroup::Hours, time.hours_text.clone()),
            minutes: FlipController::new(DigitGroup::Minutes, time.minutes_text.clone()),
        }
    }
}

pub struct ClockModel<C, B> {
    queue: TimerQueue,
    ticks: TickSource<C>,
    prefs: Preferences<B>,
    themes: ThemeRegistry,
    theme_index: usize,
    view: ClockView,
    format: DisplayFormat,
    sample: TimeSample,
    formatted: FormattedTime,
    digital: Option<DigitalView>,
    controls: ControlsVisibility,
    palette: PaletteFade,
    view_enter: ViewEnter,
    started: bool,
}

impl<C: WallClock, B: PreferenceBackend> ClockModel<C, B> {
    pub fn new(clock: C, prefs: Preferences<B>, themes: ThemeRegistry) -> Self {
        let sample = clock.now();
        let format_pref = DisplayFormat::default();
        let palette = PaletteFade::new(themes.get(0).palette);
        Self {
            queue: TimerQueue::new(),
            ticks: TickSource::new(clock),
            prefs,
            themes,
            theme_index: 0,
            view: ClockView::default(),
            format: format_pref,
            sample,
            formatted: format(sample, format_pref),
            digital: None,
            controls: ControlsVisibility::default(),
            palette,
            view_enter: ViewEnter::default(),
            started: false,
        }
    }

    /// Loads preferences, applies the theme, mounts the view and starts ticking.
    pub fn start(&mut self, now: Instant, surface: &mut dyn PlatformSurface) {
        self.theme_index = self.themes.resolve(self.prefs.theme_index());
        self.view = self.prefs.view();
        self.format = DisplayFormat {
            use_24_hour: self.prefs.use_24_hour(),
        };
        let theme = self.themes.get(self.theme_index);
        surface.apply_palette(theme);
        self.palette.settle(theme.palette);

        self.sample = self.ticks.sample();
        self.formatted = format(self.sample, self.format);
        self.mount_view();
        self.view_enter.restart(now);

        self.ticks.activate(&self.queue, now);
        self.controls.show(&self.queue, now);
        self.started = true;

        log::info!(
            "clock started: view={}, theme={}, 24h={}",
            self.view,
            self.theme().name,
            self.format.use_24_hour
        );
    }

    /// Cancels every timer. The model can be started again.
    pub fn stop(&mut self) {
        self.ticks.deactivate();
        self.digital = None;
        self.controls.dispose();
        self.started = false;
        log::info!("clock stopped");
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    pub fn handle(&mut self, command: Command, now: Instant, surface: &mut dyn PlatformSurface) {
        self.controls.show(&self.queue, now);

        match command {
            Command::Activity => {}
            Command::ToggleFormat => {
                self.format = self.format.toggled();
                self.prefs.set_use_24_hour(self.format.use_24_hour);
                self.refresh(now);
            }
            Command::CycleTheme => {
                self.theme_index = self.themes.next_index(self.theme_index);
                self.prefs.set_theme_index(self.theme_index);
                let theme = self.themes.get(self.theme_index);
                surface.apply_palette(theme);
                self.palette.retarget(theme.palette, now);
                log::info!("theme: {}", theme.name);
            }
            Command::ToggleView => {
                self.view = self.view.toggled();
                self.prefs.set_view(self.view);
                self.mount_view();
                self.view_enter.restart(now);
                log::info!("view: {}", self.view);
            }
            Command::ToggleFullscreen => {
                let result = if surface.is_fullscreen() {
                    surface.exit_fullscreen()
                } else {
                    surface.request_fullscreen()
                };
                if let Err(e) = result {
                    log::error!("fullscreen toggle failed: {e}");
                }
            }
            Command::ExitFullscreen => {
                if surface.is_fullscreen() {
                    if let Err(e) = surface.exit_fullscreen() {
                        log::error!("leaving fullscreen failed: {e}");
                    }
                }
            }
        }
    }

    /// Fires every timer due at `now`. Returns `true` if anything visible changed.
    ///
    /// Timers scheduled while dispatching are picked up in the same call when
    /// they are already due, so a late wake-up catches up completely. Flips
    /// completing in the same call produce a single announcement.
    pub fn advance(&mut self, now: Instant, surface: &mut dyn PlatformSurface) -> bool {
        let mut changed = false;
        let mut completed = false;
        loop {
            let expired = self.queue.poll(now);
            if expired.is_empty() {
                break;
            }
            for e in expired {
                match self.dispatch(e) {
                    Routed::Nowhere => {}
                    Routed::Changed => changed = true,
                    Routed::FlipCompleted => {
                        changed = true;
                        completed = true;
                    }
                }
            }
        }
        if completed {
            self.announce(surface);
        }
        changed
    }

    fn dispatch(&mut self, expired: Expired) -> Routed {
        if let Some(sample) = self.ticks.on_timer(&self.queue, expired) {
            self.sample = sample;
            self.refresh(expired.deadline);
            return Routed::Changed;
        }

        if self.controls.on_timer(expired) {
            return Routed::Changed;
        }

        let Some(digital) = self.digital.as_mut() else {
            log::trace!("{} expired with no owner", expired.id);
            return Routed::Nowhere;
        };

        let mut routed = Routed::Nowhere;
        for controller in [&mut digital.hours, &mut digital.minutes] {
            match controller.on_timer(&self.queue, expired) {
                FlipTimer::Ignored => {}
                FlipTimer::Advanced => routed = Routed::Changed,
                FlipTimer::Completed => routed = Routed::FlipCompleted,
            }
        }
        routed
    }

    /// Re-formats the last sample and feeds the flip controllers.
    fn refresh(&mut self, at: Instant) {
        self.formatted = format(self.sample, self.format);
        if let Some(digital) = self.digital.as_mut() {
            digital.hours.deliver(&self.queue, &self.formatted.hours_text, at);
            digital.minutes.deliver(&self.queue, &self.formatted.minutes_text, at);
        }
    }

    fn mount_view(&mut self) {
        self.digital = match self.view {
            ClockView::Digital => Some(DigitalView::mount(&self.formatted)),
            ClockView::Analogue => None,
        };
    }

    fn announce(&self, surface: &mut dyn PlatformSurface) {
        let Some(digital) = self.digital.as_ref() else {
            return;
        };
        let text = match self.formatted.meridiem {
            Some(m) => format!("{}:{} {m}", digital.hours.announced(), digital.minutes.announced()),
            None => format!("{}:{}", digital.hours.announced(), digital.minutes.announced()),
        };
        surface.announce(&text);
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.queue.next_deadline()
    }

    /// Whether frames must keep coming regardless of timers.
    pub fn is_animating(&self, now: Instant) -> bool {
        let flipping = self
            .digital
            .as_ref()
            .is_some_and(|d| d.hours.is_animating() || d.minutes.is_animating());
        flipping
            || self.controls.is_fading(now)
            || self.palette.is_animating(now)
            || self.view_enter.is_animating(now)
    }

    pub fn display_state(&self, now: Instant) -> DisplayState {
        DisplayState {
            time: self.formatted.clone(),
            view: self.view,
            hours: self.digital.as_ref().map(|d| d.hours.state(now)),
            minutes: self.digital.as_ref().map(|d| d.minutes.state(now)),
            theme: *self.theme(),
            palette: self.palette.palette(now),
            view_enter: self.view_enter.progress(now),
            use_24_hour: self.format.use_24_hour,
            controls_visible: self.controls.is_visible(),
            controls_opacity: self.controls.opacity(now),
        }
    }

    pub fn theme(&self) -> &Theme {
        self.themes.get(self.theme_index)
    }

    pub fn theme_index(&self) -> usize {
        self.theme_index
    }

    pub fn view(&self) -> ClockView {
        self.view
    }

    pub fn display_format(&self) -> DisplayFormat {
        self.format
    }

    pub fn sample(&self) -> TimeSample {
        self.sample
    }

    pub fn formatted(&self) -> &FormattedTime {
        &self.formatted
    }

    pub fn controls_visible(&self) -> bool {
        self.controls.is_visible()
    }

    pub fn preferences(&self) -> &Preferences<B> {
        &self.prefs
    }

    /// Number of pending timers.
    pub fn pending_timers(&self) -> usize {
        self.queue.len()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::flip::FlipPhase;
    use crate::platform::PlatformError;
    use crate::prefs::{MemoryBackend, VIEW_KEY};
    use crate::time::ManualClock;

    #[derive(Default)]
    struct Surface {
        palettes: Vec<&'static str>,
        fullscreen: bool,
        reject: bool,
        announcements: Vec<String>,
    }

    impl PlatformSurface for Surface {
        fn apply_palette(&mut self, theme: &Theme) {
            self.palettes.push(theme.name);
        }
        fn is_fullscreen(&self) -> bool {
            self.fullscreen
        }
        fn request_fullscreen(&mut self) -> Result<(), PlatformError> {
            if self.reject {
                return Err(PlatformError::FullscreenRejected("denied".into()));
            }
            self.fullscreen = true;
            Ok(())
        }
        fn exit_fullscreen(&mut self) -> Result<(), PlatformError> {
            self.fullscreen = false;
            Ok(())
        }
        fn announce(&mut self, text: &str) {
            self.announcements.push(text.to_owned());
        }
    }

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    fn at(h: u8, m: u8, s: u8, ms: u16) -> TimeSample {
        TimeSample::new(h, m, s, ms).unwrap()
    }

    fn model(clock: &ManualClock, backend: MemoryBackend) -> ClockModel<ManualClock, MemoryBackend> {
        ClockModel::new(clock.clone(), Preferences::new(backend), ThemeRegistry::builtin())
    }

    #[test]
    fn start_applies_stored_preferences() {
        let clock = ManualClock::new(at(9, 30, 0, 0));
        let mut m = model(&clock, MemoryBackend::new().with_value(VIEW_KEY, "digital"));
        let mut s = Surface::default();
        m.start(Instant::now(), &mut s);

        assert_eq!(m.view(), ClockView::Digital);
        assert_eq!(s.palettes, vec!["Dark"]);
        assert!(m.controls_visible());
        let d = m.display_state(Instant::now());
        assert_eq!(d.hours.map(|h| h.settled), Some("09".to_owned()));
    }

    #[test]
    fn minute_rollover_flips_and_announces() {
        let clock = ManualClock::new(at(9, 59, 59, 0));
        let mut m = model(&clock, MemoryBackend::new().with_value(VIEW_KEY, "digital"));
        let mut s = Surface::default();
        let t0 = Instant::now();
        m.start(t0, &mut s);

        clock.set(at(10, 0, 0, 0));
        assert!(m.advance(t0 + ms(1000), &mut s));
        let d = m.display_state(t0 + ms(1000));
        let hours = d.hours.unwrap();
        assert_eq!(hours.phase, FlipPhase::FlippingOut);
        assert_eq!((hours.previous.as_str(), hours.settled.as_str()), ("09", "10"));
        assert!(m.is_animating(t0 + ms(1000)));

        m.advance(t0 + ms(1300), &mut s);
        assert_eq!(s.announcements, vec!["10:00 AM".to_owned()]);
        let d = m.display_state(t0 + ms(1300));
        assert_eq!(d.hours.unwrap().phase, FlipPhase::Idle);
    }

    #[test]
    fn leaving_digital_cancels_flip_timers() {
        let clock = ManualClock::new(at(9, 59, 59, 0));
        let mut m = model(&clock, MemoryBackend::new().with_value(VIEW_KEY, "digital"));
        let mut s = Surface::default();
        let t0 = Instant::now();
        m.start(t0, &mut s);

        clock.set(at(10, 0, 0, 0));
        m.advance(t0 + ms(1000), &mut s);
        let with_flips = m.pending_timers();
        m.handle(Command::ToggleView, t0 + ms(1050), &mut s);
        assert_eq!(m.pending_timers(), with_flips - 2);

        m.advance(t0 + ms(1400), &mut s);
        assert!(s.announcements.is_empty());
        assert_eq!(m.preferences().backend().raw(VIEW_KEY), Some("analogue"));
    }

    #[test]
    fn toggle_format_flips_hours_only() {
        let clock = ManualClock::new(at(15, 4, 0, 0));
        let mut m = model(&clock, MemoryBackend::new().with_value(VIEW_KEY, "digital"));
        let mut s = Surface::default();
        let t0 = Instant::now();
        m.start(t0, &mut s);
        assert_eq!(m.formatted().hours_text, "03");

        m.handle(Command::ToggleFormat, t0, &mut s);
        let d = m.display_state(t0);
        assert_eq!(d.time.hours_text, "15");
        assert_eq!(d.hours.unwrap().phase, FlipPhase::FlippingOut);
        assert_eq!(d.minutes.unwrap().phase, FlipPhase::Idle);
    }

    #[test]
    fn cycle_theme_wraps_and_persists() {
        let clock = ManualClock::default();
        let mut m = model(&clock, MemoryBackend::new());
        let mut s = Surface::default();
        let t0 = Instant::now();
        m.start(t0, &mut s);
        for _ in 0..5 {
            m.handle(Command::CycleTheme, t0, &mut s);
        }
        assert_eq!(m.theme_index(), 0);
        assert_eq!(
            s.palettes,
            vec!["Dark", "Light", "Calm Blue", "Warm Sunset", "Mint Green", "Dark"]
        );
        assert_eq!(m.preferences().backend().raw("clockThemeIndex"), Some("0"));
    }

    #[test]
    fn theme_change_cross_fades_the_palette() {
        let clock = ManualClock::default();
        let mut m = model(&clock, MemoryBackend::new());
        let mut s = Surface::default();
        let t0 = Instant::now();
        m.start(t0, &mut s);
        let dark = m.theme().palette;
        assert_eq!(m.display_state(t0).palette, dark);

        let t1 = t0 + ms(2000);
        m.handle(Command::CycleTheme, t1, &mut s);
        let light = m.theme().palette;
        assert_eq!(m.display_state(t1).palette, dark);
        assert_eq!(m.display_state(t1).theme.palette, light);
        assert!(m.is_animating(t1 + ms(250)));
        assert_eq!(m.display_state(t1 + ms(500)).palette, light);
    }

    #[test]
    fn mounting_a_view_plays_its_enter_animation() {
        let clock = ManualClock::default();
        let mut m = model(&clock, MemoryBackend::new());
        let mut s = Surface::default();
        let t0 = Instant::now();
        m.start(t0, &mut s);
        assert_eq!(m.display_state(t0).view_enter, 0.0);
        assert_eq!(m.display_state(t0 + ms(500)).view_enter, 1.0);

        let t1 = t0 + ms(2000);
        m.handle(Command::ToggleView, t1, &mut s);
        assert!(m.is_animating(t1));
        assert_eq!(m.display_state(t1).view_enter, 0.0);
        assert!(!m.is_animating(t1 + ms(600)));
    }

    #[test]
    fn fullscreen_errors_are_contained() {
        let clock = ManualClock::default();
        let mut m = model(&clock, MemoryBackend::new());
        let mut s = Surface {
            reject: true,
            ..Surface::default()
        };
        let t0 = Instant::now();
        m.start(t0, &mut s);
        m.handle(Command::ToggleFullscreen, t0, &mut s);
        assert!(!s.fullscreen);

        s.reject = false;
        m.handle(Command::ToggleFullscreen, t0, &mut s);
        assert!(s.fullscreen);
        m.handle(Command::ExitFullscreen, t0, &mut s);
        assert!(!s.fullscreen);
    }

    #[test]
    fn stop_clears_all_timers() {
        let clock = ManualClock::default();
        let mut m = model(&clock, MemoryBackend::new());
        let mut s = Surface::default();
        m.start(Instant::now(), &mut s);
        assert!(m.next_deadline().is_some());
        m.stop();
        assert_eq!(m.next_deadline(), None);
        assert!(!m.is_started());
    }
}
