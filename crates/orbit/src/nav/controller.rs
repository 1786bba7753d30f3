//! ```text
//!   Closed --open()--> Opening --animation--> Open
//!     ^                                        |
//!     +---animation--- Closing <---close()-----+
//! ```

use super::geometry::{self, HitTarget, Point};
use super::input::{Key, KeyAction, PointerEvent, PointerSource, PressTarget};
use super::item::{ItemId, NavigationItem};
use super::state::{EventKind, MenuPhase, NavigationEvent, NavigationState};
use super::subscribers::{Subscribers, Subscription};
use super::timer::{Clock, SystemClock, TimerKind, Timers};
use crate::config::{ConfigError, NavigationConfig, NavigationConfigPatch};
use std::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FocusStep {
    Next,
    Previous,
    First,
    Last,
}

pub struct NavigationController {
    config: NavigationConfig,
    state: NavigationState,
    timers: Timers,
    subscribers: Subscribers,
    clock: Box<dyn Clock>,
    /// Deadline of the timer being fired, so follow-up timers chain from it.
    firing_at: Option<Instant>,
    destroyed: bool,
}

impl Default for NavigationController {
    fn default() -> Self {
        Self::new()
    }
}

impl NavigationController {
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }

    pub fn with_clock(clock: impl Clock + 'static) -> Self {
        Self {
            config: NavigationConfig::default(),
            state: NavigationState::default(),
            timers: Timers::default(),
            subscribers: Subscribers::default(),
            clock: Box::new(clock),
            firing_at: None,
            destroyed: false,
        }
    }

    /// Merges `patch` over the current config. An invalid result changes
    /// nothing. References to removed items are dropped.
    pub fn configure(&mut self, patch: NavigationConfigPatch) -> Result<(), ConfigError> {
        if !self.alive("configure") {
            return Ok(());
        }

        let next = self.config.merged(patch);
        if let Err(e) = next.validate() {
            log::warn!("Rejected navigation config: {}", e);
            return Err(e);
        }

        self.config = next;
        self.drop_stale_references();
        log::debug!("Navigation configured with {} items", self.config.items.len());
        self.emit(EventKind::Configure, None);
        Ok(())
    }

    pub fn config(&self) -> &NavigationConfig {
        &self.config
    }

    pub fn state(&self) -> NavigationState {
        self.state.clone()
    }

    pub fn phase(&self) -> MenuPhase {
        self.state.phase
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    pub fn subscribe(&self, callback: impl FnMut(&NavigationEvent) + 'static) -> Subscription {
        let subscription = self.subscribers.subscribe(callback);
        if self.destroyed {
            log::debug!("subscribe after destroy, callback will never run");
            subscription.unsubscribe();
        }
        subscription
    }

    // --- transitions -----------------------------------------------------

    pub fn open(&mut self) -> bool {
        if !self.alive("open") {
            return false;
        }
        self.cancel_auto_close();

        if self.state.phase != MenuPhase::Closed {
            log::debug!("open ignored while {}", self.state.phase);
            return false;
        }

        self.begin_animation(MenuPhase::Opening, MenuPhase::Open);
        self.emit(EventKind::Open, None);
        true
    }

    pub fn close(&mut self) -> bool {
        if !self.alive("close") {
            return false;
        }
        self.cancel_auto_close();

        if self.state.phase != MenuPhase::Open {
            log::debug!("close ignored while {}", self.state.phase);
            return false;
        }

        self.begin_animation(MenuPhase::Closing, MenuPhase::Closed);
        self.emit(EventKind::Close, None);
        true
    }

    pub fn toggle(&mut self) -> bool {
        if self.state.phase == MenuPhase::Open {
            self.close()
        } else {
            self.open()
        }
    }

    pub fn navigate(&mut self, id: &ItemId) -> bool {
        if !self.alive("navigate") {
            return false;
        }

        let Some(item) = self.config.item(id).cloned() else {
            log::warn!("Ignoring navigation to unknown item '{}'", id);
            return false;
        };
        if item.disabled {
            log::warn!("Ignoring navigation to disabled item '{}'", id);
            return false;
        }

        self.state.active_item = Some(item.id.clone());

        if self.config.auto_close {
            let deadline = self.now() + self.config.close_delay;
            self.timers.schedule(TimerKind::AutoClose, deadline);
        } else {
            self.cancel_auto_close();
        }

        self.emit(EventKind::Navigate, Some(item));
        true
    }

    pub fn set_hovered_item(&mut self, id: Option<ItemId>) -> bool {
        if !self.alive("set_hovered_item") {
            return false;
        }
        let Some(item) = self.lookup_optional(id.as_ref(), "hover") else {
            return false;
        };

        self.state.hovered_item = id;
        self.emit(EventKind::Hover, item);
        true
    }

    pub fn set_focused_item(&mut self, id: Option<ItemId>) -> bool {
        if !self.alive("set_focused_item") {
            return false;
        }
        let Some(item) = self.lookup_optional(id.as_ref(), "focus") else {
            return false;
        };

        self.state.focused_item = id;
        self.emit(EventKind::Focus, item);
        true
    }

    // --- input -----------------------------------------------------------

    pub fn handle_key(&mut self, key: Key) -> bool {
        if !self.alive("handle_key") {
            return false;
        }
        if !self.config.enable_keyboard {
            log::debug!("Keyboard disabled, ignoring {}", key);
            return false;
        }

        let entered_keyboard_mode = !self.state.keyboard_mode;
        self.state.keyboard_mode = true;

        let handled = match key.action() {
            KeyAction::FocusNext => self.move_focus(FocusStep::Next),
            KeyAction::FocusPrevious => self.move_focus(FocusStep::Previous),
            KeyAction::FocusFirst => self.move_focus(FocusStep::First),
            KeyAction::FocusLast => self.move_focus(FocusStep::Last),
            KeyAction::Dismiss => self.state.is_open && self.close(),
            KeyAction::Activate => self.activate_focused(),
        };

        if !handled && entered_keyboard_mode {
            self.emit(EventKind::Modality, None);
        }
        handled
    }

    pub fn handle_pointer(&mut self, event: PointerEvent) -> bool {
        if !self.alive("handle_pointer") {
            return false;
        }
        if let PointerEvent::Press {
            source: PointerSource::Touch,
            ..
        } = &event
            && !self.config.enable_touch
        {
            log::debug!("Touch disabled, ignoring tap");
            return false;
        }

        let left_keyboard_mode = self.state.keyboard_mode;
        self.state.keyboard_mode = false;

        let handled = match event {
            PointerEvent::Hover(target) => {
                self.state.hovered_item != target && self.set_hovered_item(target)
            }
            PointerEvent::Press { target, .. } => match target {
                PressTarget::Item(id) => self.navigate(&id),
                PressTarget::Center => self.toggle(),
                PressTarget::Outside => self.state.is_open && self.close(),
            },
        };

        if !handled && left_keyboard_mode {
            self.emit(EventKind::Modality, None);
        }
        handled
    }

    pub fn hover_at(&mut self, point: Point) -> bool {
        let target = match self.hit_test(point) {
            HitTarget::Item(id) => Some(id),
            HitTarget::Center | HitTarget::Outside => None,
        };
        self.handle_pointer(PointerEvent::Hover(target))
    }

    pub fn press_at(&mut self, point: Point, source: PointerSource) -> bool {
        let target = self.hit_test(point).into();
        self.handle_pointer(PointerEvent::Press { target, source })
    }

    // --- layout ----------------------------------------------------------

    pub fn get_item_position(&self, position: usize) -> Point {
        geometry::radial_position(
            position,
            self.config.items.len(),
            self.config.radius,
            self.config.start_angle,
        )
    }

    pub fn layout(&self) -> Vec<(NavigationItem, Point)> {
        self.config
            .items
            .iter()
            .map(|item| (item.clone(), self.get_item_position(item.position)))
            .collect()
    }

    pub fn hit_test(&self, point: Point) -> HitTarget {
        geometry::hit_test(
            point,
            &self.config.items,
            self.config.radius,
            self.config.center_size,
            self.config.item_size,
            self.config.start_angle,
        )
    }

    // --- timers ----------------------------------------------------------

    pub fn next_deadline(&self) -> Option<Instant> {
        (!self.destroyed)
            .then(|| self.timers.next_deadline())
            .flatten()
    }

    pub fn tick(&mut self) {
        if self.destroyed {
            return;
        }
        let now = self.clock.now();
        while let Some((kind, deadline)) = self.timers.pop_due(now) {
            log::trace!("{} timer fired", kind);
            self.firing_at = Some(deadline);
            match kind {
                TimerKind::Animation => self.finish_animation(),
                TimerKind::AutoClose => self.auto_close(),
            }
        }
        self.firing_at = None;
    }

    pub fn destroy(&mut self) {
        if self.destroyed {
            return;
        }
        self.timers.cancel_all();
        self.subscribers.clear();
        self.destroyed = true;
        log::info!("Navigation controller destroyed");
    }

    // --- internals -------------------------------------------------------

    fn now(&self) -> Instant {
        self.firing_at.unwrap_or_else(|| self.clock.now())
    }

    fn alive(&self, action: &str) -> bool {
        if self.destroyed {
            log::debug!("{} called after destroy", action);
        }
        !self.destroyed
    }

    fn cancel_auto_close(&mut self) {
        if self.timers.cancel(TimerKind::AutoClose) {
            log::debug!("Pending auto-close cancelled");
        }
    }

    fn auto_close(&mut self) {
        if self.state.phase == MenuPhase::Opening
            && let Some(settles_at) = self.timers.get(TimerKind::Animation)
        {
            log::debug!("Auto-close deferred until the menu is open");
            self.timers.schedule(TimerKind::AutoClose, settles_at);
            return;
        }
        self.close();
    }

    fn begin_animation(&mut self, during: MenuPhase, after: MenuPhase) {
        let duration = self.config.animation_duration;
        if duration.is_zero() {
            self.timers.cancel(TimerKind::Animation);
            self.settle_into(after);
            return;
        }
        self.state.set_phase(during);
        let deadline = self.now() + duration;
        self.timers.schedule(TimerKind::Animation, deadline);
    }

    fn finish_animation(&mut self) {
        let target = match self.state.phase {
            MenuPhase::Opening => MenuPhase::Open,
            MenuPhase::Closing => MenuPhase::Closed,
            phase => {
                log::debug!("Stray animation timer while {}", phase);
                return;
            }
        };
        self.settle_into(target);
        self.emit(EventKind::Settle, None);
    }

    fn settle_into(&mut self, phase: MenuPhase) {
        self.state.set_phase(phase);
        if phase == MenuPhase::Closed {
            self.state.hovered_item = None;
            self.state.focused_item = None;
        }
    }

    /// `None` means an unknown id.
    fn lookup_optional(
        &self,
        id: Option<&ItemId>,
        what: &str,
    ) -> Option<Option<NavigationItem>> {
        match id {
            None => Some(None),
            Some(id) => match self.config.item(id) {
                Some(item) => Some(Some(item.clone())),
                None => {
                    log::warn!("Ignoring {} on unknown item '{}'", what, id);
                    None
                }
            },
        }
    }

    fn move_focus(&mut self, step: FocusStep) -> bool {
        if !self.state.is_open {
            return false;
        }

        let mut ring: Vec<&NavigationItem> = self
            .config
            .items
            .iter()
            .filter(|item| item.is_selectable())
            .collect();
        if ring.is_empty() {
            return false;
        }
        ring.sort_by_key(|item| item.position);

        let len = ring.len();
        let current = self
            .state
            .focused_item
            .as_ref()
            .and_then(|id| ring.iter().position(|item| &item.id == id));

        let next = match (step, current) {
            (FocusStep::Next, Some(i)) => (i + 1) % len,
            (FocusStep::Next, None) | (FocusStep::First, _) => 0,
            (FocusStep::Previous, Some(i)) => (i + len - 1) % len,
            (FocusStep::Previous, None) | (FocusStep::Last, _) => len - 1,
        };

        let id = ring[next].id.clone();
        self.set_focused_item(Some(id))
    }

    fn activate_focused(&mut self) -> bool {
        if self.state.phase == MenuPhase::Closed {
            return self.open();
        }
        match self.state.focused_item.clone() {
            Some(id) if self.state.is_open => self.navigate(&id),
            _ => false,
        }
    }

    fn drop_stale_references(&mut self) {
        let config = &self.config;
        for slot in [
            &mut self.state.active_item,
            &mut self.state.hovered_item,
            &mut self.state.focused_item,
        ] {
            if slot.as_ref().is_some_and(|id| config.item(id).is_none()) {
                *slot = None;
            }
        }
    }

    fn emit(&self, kind: EventKind, item: Option<NavigationItem>) {
        let event = NavigationEvent {
            kind,
            item,
            state: self.state.clone(),
            timestamp: self.clock.unix_millis(),
        };
        self.subscribers.dispatch(&event);
    }
}
