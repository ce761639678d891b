//! Timer controller: the work/break state machine
//!
//! The controller owns the settings and the countdown. It is mutated only
//! through its operations, one at a time, and pushes a full event to every
//! observer after each change. Nothing here returns an error: input is
//! coerced, and collaborator failures are logged and skipped.

use std::{sync::Arc, time::Instant};
use tracing::{debug, info, warn};

use super::{
    Clock, Phase, Settings, SettingsUpdate, Snapshot, TimerEvent, TimerObserver, TimerState,
};
use crate::services::{
    break_start_message, work_start_message, BreakBoard, BreakDisplay, LogNotifier, Notifier,
};

pub struct TimerController {
    settings: Settings,
    timer: TimerState,
    clock: Arc<dyn Clock>,
    observers: Vec<Box<dyn TimerObserver>>,
    break_display: Box<dyn BreakDisplay>,
    notifier: Box<dyn Notifier>,
}

impl TimerController {
    /// Paused at the start of a work phase with default settings
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        let settings = Settings::default();
        let timer = TimerState::new(&settings, clock.now());
        Self {
            settings,
            timer,
            clock,
            observers: Vec::new(),
            break_display: Box::new(BreakBoard::default()),
            notifier: Box::new(LogNotifier),
        }
    }

    pub fn with_notifier(mut self, notifier: Box<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    pub fn with_break_display(mut self, display: Box<dyn BreakDisplay>) -> Self {
        self.break_display = display;
        self
    }

    /// Register an observer for all future events
    pub fn subscribe(&mut self, observer: Box<dyn TimerObserver>) {
        self.observers.push(observer);
    }

    pub fn start(&mut self) {
        if self.timer.running {
            return;
        }
        self.timer.running = true;
        self.timer.last_tick_at = self.clock.now();
        info!("Timer started ({} phase, {}ms left)", self.timer.phase, self.timer.remaining_ms);
        self.emit(TimerEvent::RunningChanged { running: true });
    }

    pub fn pause(&mut self) {
        if !self.timer.running {
            return;
        }
        self.timer.running = false;
        info!("Timer paused ({} phase, {}ms left)", self.timer.phase, self.timer.remaining_ms);
        self.emit(TimerEvent::RunningChanged { running: false });
    }

    /// Stop and rewind to the beginning of a work phase
    pub fn reset(&mut self) {
        self.pause();
        self.timer.enter(Phase::Work, &self.settings);
        self.close_break_display();
        info!("Timer reset");
        self.emit(TimerEvent::PhaseChanged(self.snapshot()));
    }

    /// Jump straight into `phase` as if the countdown had run out
    pub fn skip_to_phase(&mut self, phase: Phase) {
        info!("Skipping to {} phase", phase);
        self.enter_phase(phase);
    }

    pub fn skip_to_break(&mut self) {
        self.skip_to_phase(Phase::Break);
    }

    pub fn skip_to_work(&mut self) {
        self.skip_to_phase(Phase::Work);
    }

    /// Merge a partial settings change.
    ///
    /// Remaining time is cut down to a shortened phase but never topped up
    /// when the phase gets longer.
    pub fn update_settings(&mut self, update: &SettingsUpdate) {
        self.settings = self.settings.merge(update);
        self.timer.clamp_to(&self.settings);
        info!(
            "Settings updated: work={}min, break={}s, auto_start_next={}",
            self.settings.work_minutes, self.settings.break_seconds, self.settings.auto_start_next
        );
        self.emit(TimerEvent::SettingsChanged {
            settings: self.settings,
        });
        self.emit(TimerEvent::Tick(self.snapshot()));
    }

    /// Heartbeat: advance the countdown by the time since the last pulse
    pub fn on_pulse(&mut self, now: Instant) {
        if !self.timer.running {
            self.timer.last_tick_at = now;
            return;
        }

        let elapsed = now.saturating_duration_since(self.timer.last_tick_at);
        let elapsed_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX);
        self.timer.last_tick_at = now;

        if elapsed_ms >= self.timer.remaining_ms {
            self.timer.remaining_ms = 0;
            self.enter_phase(self.timer.phase.next());
            return;
        }

        self.timer.remaining_ms -= elapsed_ms;
        self.emit(TimerEvent::Tick(self.snapshot()));
    }

    pub fn state(&self) -> Snapshot {
        self.snapshot()
    }

    pub fn settings(&self) -> Settings {
        self.settings
    }

    pub fn is_break_display_open(&self) -> bool {
        self.break_display.is_open()
    }

    fn snapshot(&self) -> Snapshot {
        Snapshot::new(&self.timer, &self.settings)
    }

    fn enter_phase(&mut self, phase: Phase) {
        self.timer.enter(phase, &self.settings);
        info!("Entered {} phase ({}ms)", phase, self.timer.remaining_ms);
        self.emit(TimerEvent::PhaseChanged(self.snapshot()));

        match phase {
            Phase::Break => {
                if let Err(e) = self.break_display.open() {
                    warn!("Break display unavailable: {}", e);
                }
                let (title, body) = break_start_message(self.settings.break_seconds);
                self.send_notification(&title, &body);
            }
            Phase::Work => {
                self.close_break_display();
                let (title, body) = work_start_message();
                self.send_notification(&title, &body);
            }
        }

        if !self.settings.auto_start_next && self.timer.running {
            self.timer.running = false;
            info!("Auto start disabled, waiting for manual start");
            self.emit(TimerEvent::RunningChanged { running: false });
        }
    }

    fn close_break_display(&mut self) {
        if let Err(e) = self.break_display.close() {
            warn!("Failed to close break display: {}", e);
        }
    }

    fn send_notification(&self, title: &str, body: &str) {
        if let Err(e) = self.notifier.notify(title, body) {
            debug!("Notification dropped: {}", e);
        }
    }

    fn emit(&mut self, event: TimerEvent) {
        for observer in &mut self.observers {
            if let Err(e) = observer.notify(&event) {
                debug!("Observer failed to handle {}: {}", event.name(), e);
            }
        }

        if let Some(snapshot) = event.snapshot() {
            if let Err(e) = self.break_display.update(snapshot) {
                debug!("Break display failed to handle {}: {}", event.name(), e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::ManualClock;
    use std::{sync::Mutex, time::Duration};

    #[derive(Clone, Default)]
    struct Recorder {
        events: Arc<Mutex<Vec<TimerEvent>>>,
    }

    impl Recorder {
        fn take(&self) -> Vec<TimerEvent> {
            std::mem::take(&mut *self.events.lock().unwrap())
        }
    }

    impl TimerObserver for Recorder {
        fn notify(&mut self, event: &TimerEvent) -> Result<(), String> {
            self.events.lock().unwrap().push(event.clone());
            Ok(())
        }
    }

    struct Broken;

    impl TimerObserver for Broken {
        fn notify(&mut self, _event: &TimerEvent) -> Result<(), String> {
            Err("window destroyed".to_string())
        }
    }

    impl Notifier for Broken {
        fn notify(&self, _title: &str, _body: &str) -> Result<(), String> {
            Err("notifications not permitted".to_string())
        }
    }

    impl BreakDisplay for Broken {
        fn open(&mut self) -> Result<(), String> {
            Err("no display".to_string())
        }
        fn close(&mut self) -> Result<(), String> {
            Err("no display".to_string())
        }
        fn is_open(&self) -> bool {
            false
        }
    }

    #[derive(Clone, Default)]
    struct Inbox {
        messages: Arc<Mutex<Vec<String>>>,
    }

    impl Notifier for Inbox {
        fn notify(&self, title: &str, _body: &str) -> Result<(), String> {
            self.messages.lock().unwrap().push(title.to_string());
            Ok(())
        }
    }

    fn controller() -> (TimerController, ManualClock, Recorder) {
        let clock = ManualClock::new();
        let recorder = Recorder::default();
        let mut controller = TimerController::new(Arc::new(clock.clone()));
        controller.subscribe(Box::new(recorder.clone()));
        (controller, clock, recorder)
    }

    /// Pulse every 200ms until `total_ms` has passed
    fn run_for(controller: &mut TimerController, clock: &ManualClock, total_ms: u64) {
        let mut left = total_ms;
        while left > 0 {
            let step = left.min(200);
            controller.on_pulse(clock.advance_ms(step));
            left -= step;
        }
    }

    #[test]
    fn starts_paused_in_work() {
        let (controller, _, _) = controller();
        let state = controller.state();
        assert_eq!(state.phase, Phase::Work);
        assert_eq!(state.remaining_ms, 1_200_000);
        assert!(!state.running);
    }

    #[test]
    fn start_and_pause_are_idempotent() {
        let (mut controller, _, recorder) = controller();

        controller.start();
        controller.start();
        assert!(controller.state().running);
        assert_eq!(recorder.take(), vec![TimerEvent::RunningChanged { running: true }]);

        controller.pause();
        controller.pause();
        assert!(!controller.state().running);
        assert_eq!(recorder.take(), vec![TimerEvent::RunningChanged { running: false }]);
    }

    #[test]
    fn pulses_while_paused_do_not_decay() {
        let (mut controller, clock, recorder) = controller();
        for _ in 0..50 {
            controller.on_pulse(clock.advance_ms(10_000));
        }
        assert_eq!(controller.state().remaining_ms, 1_200_000);
        assert!(recorder.take().is_empty());
    }

    #[test]
    fn time_paused_is_not_credited_after_resume() {
        let (mut controller, clock, _) = controller();
        controller.start();
        controller.on_pulse(clock.advance_ms(1_000));
        controller.pause();
        controller.on_pulse(clock.advance_ms(60_000));
        controller.start();
        controller.on_pulse(clock.advance_ms(500));
        assert_eq!(controller.state().remaining_ms, 1_200_000 - 1_500);
    }

    #[test]
    fn running_pulse_emits_tick() {
        let (mut controller, clock, recorder) = controller();
        controller.start();
        recorder.take();

        controller.on_pulse(clock.advance_ms(200));
        let events = recorder.take();
        assert_eq!(events.len(), 1);
        match &events[0] {
            TimerEvent::Tick(snapshot) => assert_eq!(snapshot.remaining_ms, 1_199_800),
            other => panic!("expected tick, got {:?}", other),
        }
    }

    #[test]
    fn reset_returns_to_paused_work() {
        let (mut controller, clock, _) = controller();
        controller.start();
        run_for(&mut controller, &clock, 1_200_000 + 3_000);
        assert_eq!(controller.state().phase, Phase::Break);
        assert!(controller.is_break_display_open());

        controller.reset();
        let state = controller.state();
        assert_eq!(state.phase, Phase::Work);
        assert_eq!(state.remaining_ms, state.settings.work_duration_ms());
        assert!(!state.running);
        assert!(!controller.is_break_display_open());
    }

    #[test]
    fn overshooting_pulse_transitions_exactly_once() {
        let (mut controller, clock, recorder) = controller();
        controller.start();
        run_for(&mut controller, &clock, 1_200_000 - 500);
        assert_eq!(controller.state().remaining_ms, 500);
        recorder.take();

        controller.on_pulse(clock.advance_ms(600));

        let state = controller.state();
        assert_eq!(state.phase, Phase::Break);
        assert_eq!(state.remaining_ms, 20_000);

        let events = recorder.take();
        assert_eq!(events.len(), 1);
        assert!(matches!(events[0], TimerEvent::PhaseChanged(_)));
    }

    #[test]
    fn full_cycle_with_auto_start() {
        let (mut controller, clock, _) = controller();
        controller.start();

        run_for(&mut controller, &clock, 20 * 60 * 1000);
        let state = controller.state();
        assert_eq!(state.phase, Phase::Break);
        assert_eq!(state.remaining_ms, 20_000);
        assert!(state.running);

        run_for(&mut controller, &clock, 20_000);
        let state = controller.state();
        assert_eq!(state.phase, Phase::Work);
        assert_eq!(state.remaining_ms, 1_200_000);
        assert!(state.running);
    }

    #[test]
    fn without_auto_start_the_cycle_pauses_on_break() {
        let (mut controller, clock, recorder) = controller();
        controller.update_settings(&SettingsUpdate::default().auto_start_next(false));
        controller.start();
        recorder.take();

        run_for(&mut controller, &clock, 20 * 60 * 1000);
        let state = controller.state();
        assert_eq!(state.phase, Phase::Break);
        assert!(!state.running);
        assert!(controller.is_break_display_open());

        let events = recorder.take();
        assert!(matches!(events.last(), Some(TimerEvent::RunningChanged { running: false })));

        run_for(&mut controller, &clock, 60_000);
        assert_eq!(controller.state().remaining_ms, 20_000);

        controller.start();
        run_for(&mut controller, &clock, 5_000);
        assert_eq!(controller.state().remaining_ms, 15_000);
    }

    #[test]
    fn pulse_from_the_past_credits_no_time() {
        let (mut controller, clock, _) = controller();
        controller.start();
        let now = clock.advance_ms(1_000);
        controller.on_pulse(now);
        assert_eq!(controller.state().remaining_ms, 1_199_000);

        controller.on_pulse(now - Duration::from_millis(500));
        assert_eq!(controller.state().remaining_ms, 1_199_000);
        assert_eq!(controller.state().phase, Phase::Work);
    }

    #[test]
    fn without_auto_start_the_cycle_pauses_on_return_to_work() {
        let (mut controller, clock, _) = controller();
        controller.update_settings(&SettingsUpdate::default().auto_start_next(false));
        controller.skip_to_break();
        assert!(controller.is_break_display_open());

        controller.start();
        run_for(&mut controller, &clock, 20_000 + 400);

        let state = controller.state();
        assert_eq!(state.phase, Phase::Work);
        assert_eq!(state.remaining_ms, 1_200_000);
        assert!(!state.running);
        assert!(!controller.is_break_display_open());
    }

    #[test]
    fn shortening_work_clamps_remaining_time() {
        let (mut controller, clock, _) = controller();
        controller.start();
        run_for(&mut controller, &clock, 200_000);
        assert_eq!(controller.state().remaining_ms, 1_000_000);

        controller.update_settings(&SettingsUpdate::default().work_minutes(5));
        assert_eq!(controller.state().remaining_ms, 300_000);
    }

    #[test]
    fn lengthening_work_keeps_remaining_time() {
        let (mut controller, clock, _) = controller();
        controller.start();
        run_for(&mut controller, &clock, 200_000);

        controller.update_settings(&SettingsUpdate::default().work_minutes(60));
        assert_eq!(controller.state().remaining_ms, 1_000_000);
        assert_eq!(controller.settings().work_minutes, 60);
    }

    #[test]
    fn settings_update_emits_settings_then_tick() {
        let (mut controller, _, recorder) = controller();
        controller.update_settings(&SettingsUpdate::default().break_seconds(30));

        let events = recorder.take();
        assert_eq!(events.len(), 2);
        assert!(matches!(events[0], TimerEvent::SettingsChanged { settings } if settings.break_seconds == 30));
        assert!(matches!(&events[1], TimerEvent::Tick(s) if s.settings.break_seconds == 30));
    }

    #[test]
    fn skip_to_break_ignores_prior_remaining_time() {
        let (mut controller, clock, _) = controller();
        controller.start();
        run_for(&mut controller, &clock, 123_400);

        controller.skip_to_break();
        let state = controller.state();
        assert_eq!(state.phase, Phase::Break);
        assert_eq!(state.remaining_ms, 20_000);
        assert!(controller.is_break_display_open());

        controller.skip_to_work();
        assert_eq!(controller.state().phase, Phase::Work);
        assert!(!controller.is_break_display_open());
    }

    #[test]
    fn skip_honors_auto_start_rule() {
        let (mut controller, _, _) = controller();
        controller.update_settings(&SettingsUpdate::default().auto_start_next(false));
        controller.start();

        controller.skip_to_phase(Phase::Break);
        assert!(!controller.state().running);
    }

    #[test]
    fn transitions_notify_the_user() {
        let clock = ManualClock::new();
        let inbox = Inbox::default();
        let mut controller = TimerController::new(Arc::new(clock)).with_notifier(Box::new(inbox.clone()));

        controller.skip_to_break();
        controller.skip_to_work();
        assert_eq!(
            *inbox.messages.lock().unwrap(),
            vec!["Time for a break".to_string(), "Break is over".to_string()]
        );
    }

    #[test]
    fn broken_collaborators_do_not_stop_the_timer() {
        let clock = ManualClock::new();
        let mut controller = TimerController::new(Arc::new(clock.clone()))
            .with_notifier(Box::new(Broken))
            .with_break_display(Box::new(Broken));
        controller.subscribe(Box::new(Broken));

        controller.start();
        controller.on_pulse(clock.advance_ms(1_200_000));
        assert_eq!(controller.state().phase, Phase::Break);

        controller.on_pulse(clock.advance_ms(20_000));
        assert_eq!(controller.state().phase, Phase::Work);
        assert!(controller.state().running);
    }
}
