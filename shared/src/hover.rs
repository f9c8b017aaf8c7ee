//! Hover-driven popup state.
//!
//! Marker and popup are visually adjacent but separate hit-test targets, so
//! leaving either one only *schedules* a close. The scheduled close carries a
//! [`CloseTicket`]; when the grace period elapses the ticket is checked against
//! the current state and dropped if anything happened in between. This is a
//! debounce on the single-threaded event loop, not a synchronization primitive.

pub type MarkerIndex = usize;

/// What the caller must do to the map after an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HoverCommand {
    Open(MarkerIndex),
    Close(MarkerIndex),
}

/// A deferred close, valid only while nothing has touched the hover state since.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CloseTicket {
    pub marker: MarkerIndex,
    epoch: u64,
}

#[derive(Debug, Default)]
pub struct HoverState {
    open: Option<MarkerIndex>,
    pointer_in_popup: bool,
    epoch: u64,
}

impl HoverState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open_marker(&self) -> Option<MarkerIndex> {
        self.open
    }

    pub fn pointer_in_popup(&self) -> bool {
        self.pointer_in_popup
    }

    pub fn marker_enter(&mut self, marker: MarkerIndex) -> Vec<HoverCommand> {
        self.epoch += 1;
        let mut commands = Vec::with_capacity(2);
        match self.open {
            Some(current) if current == marker => return commands,
            Some(current) => commands.push(HoverCommand::Close(current)),
            None => {}
        }
        self.pointer_in_popup = false;
        self.open = Some(marker);
        commands.push(HoverCommand::Open(marker));
        commands
    }

    pub fn marker_leave(&mut self, marker: MarkerIndex) -> Option<CloseTicket> {
        self.ticket_for(marker)
    }

    pub fn popup_enter(&mut self, marker: MarkerIndex) {
        if self.open == Some(marker) {
            self.epoch += 1;
            self.pointer_in_popup = true;
        }
    }

    pub fn popup_leave(&mut self, marker: MarkerIndex) -> Option<CloseTicket> {
        if self.open != Some(marker) {
            return None;
        }
        self.pointer_in_popup = false;
        self.ticket_for(marker)
    }

    /// Resolve a scheduled close. Stale tickets are no-ops.
    pub fn grace_elapsed(&mut self, ticket: CloseTicket) -> Option<HoverCommand> {
        if self.open != Some(ticket.marker) || self.epoch != ticket.epoch || self.pointer_in_popup
        {
            return None;
        }
        self.reset();
        Some(HoverCommand::Close(ticket.marker))
    }

    pub fn background_click(&mut self) -> Option<HoverCommand> {
        let open = self.open?;
        self.reset();
        Some(HoverCommand::Close(open))
    }

    /// The map opened a popup on its own (e.g. a tap on a touch screen).
    /// Keeps the single-open invariant by closing whichever popup was recorded.
    pub fn popup_opened(&mut self, marker: MarkerIndex) -> Option<HoverCommand> {
        if self.open == Some(marker) {
            return None;
        }
        let previous = self.open.replace(marker);
        self.pointer_in_popup = false;
        self.epoch += 1;
        previous.map(HoverCommand::Close)
    }

    /// The map closed a popup on its own.
    pub fn popup_closed(&mut self, marker: MarkerIndex) {
        if self.open == Some(marker) {
            self.reset();
        }
    }

    fn ticket_for(&self, marker: MarkerIndex) -> Option<CloseTicket> {
        (self.open == Some(marker)).then_some(CloseTicket {
            marker,
            epoch: self.epoch,
        })
    }

    fn reset(&mut self) {
        self.open = None;
        self.pointer_in_popup = false;
        self.epoch += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use HoverCommand::{Close, Open};

    /// Replays commands and tracks which popups are open, like the map would.
    #[derive(Default)]
    struct FakeMap {
        open: Vec<MarkerIndex>,
    }

    impl FakeMap {
        fn apply(&mut self, commands: impl IntoIterator<Item = HoverCommand>) {
            for command in commands {
                match command {
                    Open(m) => {
                        if !self.open.contains(&m) {
                            self.open.push(m);
                        }
                    }
                    Close(m) => self.open.retain(|o| *o != m),
                }
            }
        }
    }

    #[test]
    fn entering_marker_opens_its_popup() {
        let mut state = HoverState::new();
        assert_eq!(state.marker_enter(3), vec![Open(3)]);
        assert_eq!(state.open_marker(), Some(3));
    }

    #[test]
    fn entering_another_marker_closes_previous() {
        let mut state = HoverState::new();
        state.marker_enter(1);
        assert_eq!(state.marker_enter(2), vec![Close(1), Open(2)]);
        assert_eq!(state.open_marker(), Some(2));
    }

    #[test]
    fn leaving_marker_closes_after_grace() {
        let mut state = HoverState::new();
        state.marker_enter(1);
        let ticket = state.marker_leave(1).unwrap();
        assert_eq!(state.grace_elapsed(ticket), Some(Close(1)));
        assert_eq!(state.open_marker(), None);
    }

    #[test]
    fn moving_into_popup_keeps_it_open() {
        let mut state = HoverState::new();
        state.marker_enter(1);
        let ticket = state.marker_leave(1).unwrap();
        state.popup_enter(1);
        assert_eq!(state.grace_elapsed(ticket), None);
        assert_eq!(state.open_marker(), Some(1));
        assert!(state.pointer_in_popup());
    }

    #[test]
    fn leaving_popup_closes_after_grace() {
        let mut state = HoverState::new();
        state.marker_enter(1);
        state.marker_leave(1);
        state.popup_enter(1);
        let ticket = state.popup_leave(1).unwrap();
        assert!(!state.pointer_in_popup());
        assert_eq!(state.grace_elapsed(ticket), Some(Close(1)));
    }

    #[test]
    fn returning_to_marker_from_popup_keeps_it_open() {
        let mut state = HoverState::new();
        state.marker_enter(1);
        state.popup_enter(1);
        let ticket = state.popup_leave(1).unwrap();
        assert!(state.marker_enter(1).is_empty());
        assert_eq!(state.grace_elapsed(ticket), None);
        assert_eq!(state.open_marker(), Some(1));
    }

    #[test]
    fn reentering_same_marker_within_grace_keeps_it_open() {
        let mut state = HoverState::new();
        state.marker_enter(1);
        let ticket = state.marker_leave(1).unwrap();
        state.marker_enter(1);
        assert_eq!(state.grace_elapsed(ticket), None);
        assert_eq!(state.open_marker(), Some(1));
    }

    #[test]
    fn stale_ticket_for_replaced_marker_is_ignored() {
        let mut state = HoverState::new();
        state.marker_enter(1);
        let ticket = state.marker_leave(1).unwrap();
        state.marker_enter(2);
        assert_eq!(state.grace_elapsed(ticket), None);
        assert_eq!(state.open_marker(), Some(2));
    }

    #[test]
    fn background_click_closes_everything() {
        let mut state = HoverState::new();
        assert_eq!(state.background_click(), None);
        state.marker_enter(4);
        state.popup_enter(4);
        assert_eq!(state.background_click(), Some(Close(4)));
        assert_eq!(state.open_marker(), None);
        assert!(!state.pointer_in_popup());
    }

    #[test]
    fn popup_events_for_other_markers_are_ignored() {
        let mut state = HoverState::new();
        state.marker_enter(1);
        state.popup_enter(2);
        assert!(!state.pointer_in_popup());
        assert_eq!(state.popup_leave(2), None);
        assert_eq!(state.marker_leave(2), None);
    }

    #[test]
    fn popup_flag_resets_when_switching_markers() {
        let mut state = HoverState::new();
        state.marker_enter(1);
        state.popup_enter(1);
        state.marker_enter(2);
        assert!(!state.pointer_in_popup());
        let ticket = state.marker_leave(2).unwrap();
        assert_eq!(state.grace_elapsed(ticket), Some(Close(2)));
    }

    #[test]
    fn externally_opened_popup_takes_over() {
        let mut state = HoverState::new();
        assert_eq!(state.popup_opened(1), None);
        assert_eq!(state.open_marker(), Some(1));
        assert_eq!(state.popup_opened(2), Some(Close(1)));
        assert_eq!(state.popup_opened(2), None);
        assert_eq!(state.open_marker(), Some(2));
    }

    #[test]
    fn external_close_clears_record() {
        let mut state = HoverState::new();
        state.marker_enter(1);
        state.popup_closed(2);
        assert_eq!(state.open_marker(), Some(1));
        state.popup_closed(1);
        assert_eq!(state.open_marker(), None);
    }

    #[test]
    fn at_most_one_popup_open_for_any_sequence() {
        // Deterministic pseudo-random event stream over four markers.
        let mut state = HoverState::new();
        let mut map = FakeMap::default();
        let mut pending: Vec<CloseTicket> = Vec::new();
        let mut seed: u64 = 0x9E37_79B9_7F4A_7C15;
        for _ in 0..5_000 {
            seed ^= seed << 13;
            seed ^= seed >> 7;
            seed ^= seed << 17;
            let marker = (seed % 4) as MarkerIndex;
            match (seed >> 8) % 7 {
                0 => map.apply(state.marker_enter(marker)),
                1 => pending.extend(state.marker_leave(marker)),
                2 => state.popup_enter(marker),
                3 => pending.extend(state.popup_leave(marker)),
                4 => map.apply(state.background_click()),
                5 => {
                    if !pending.is_empty() {
                        let ticket = pending.remove(((seed >> 16) as usize) % pending.len());
                        map.apply(state.grace_elapsed(ticket));
                    }
                }
                6 if seed & 2 == 0 => {
                    map.apply([Open(marker)]);
                    map.apply(state.popup_opened(marker));
                }
                _ => {
                    let open = map.open.first().copied();
                    if let Some(open) = open.filter(|_| seed & 1 == 0) {
                        map.open.retain(|o| *o != open);
                        state.popup_closed(open);
                    }
                }
            }
            assert!(map.open.len() <= 1, "more than one popup open");
            assert_eq!(map.open.first().copied(), state.open_marker());
        }
    }
}
