//! Integration Tests für die Schieberegister-Bank
//!
//! Diese Tests laufen auf dem Host (x86_64) und nutzen MockShiftPins

use esp_core::{
    InvalidLineError, LiftRelay, LiftRelays, LiftTable, OutputMap, OutputState, RelayCommand,
    ShiftRegisterBank, ShiftRegisterPins,
};

// ============================================================================
// Mock Shift Pins
// ============================================================================

/// Eine Flanke auf einer der drei Leitungen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinEvent {
    Data(bool),
    ShiftClock(bool),
    Latch(bool),
}

/// Zeichnet jede Pin-Änderung auf und dekodiert daraus die Bytes
///
/// Simuliert die 74HC595-Kette: Bits werden bei steigender SRCLK-Flanke
/// übernommen, bei steigender RCLK-Flanke ist ein Frame fertig.
#[derive(Default)]
pub struct MockShiftPins {
    pub events: Vec<PinEvent>,
    /// Ein Eintrag pro Latch-Zyklus, Bytes in Sende-Reihenfolge
    pub frames: Vec<Vec<u8>>,
    /// Bei steigender SRCLK-Flanke war RCLK HIGH (Glitch auf den Ausgängen)
    pub shifted_while_latched: bool,
    data: bool,
    clock: bool,
    latch: bool,
    bits: Vec<bool>,
}

impl MockShiftPins {
    pub fn new() -> Self {
        Self {
            latch: true,
            ..Self::default()
        }
    }

    pub fn last_frame(&self) -> Option<&[u8]> {
        self.frames.last().map(Vec::as_slice)
    }
}

impl ShiftRegisterPins for MockShiftPins {
    fn set_data(&mut self, high: bool) {
        self.events.push(PinEvent::Data(high));
        self.data = high;
    }

    fn set_shift_clock(&mut self, high: bool) {
        self.events.push(PinEvent::ShiftClock(high));
        if high && !self.clock {
            if self.latch {
                self.shifted_while_latched = true;
            }
            self.bits.push(self.data);
        }
        self.clock = high;
    }

    fn set_latch(&mut self, high: bool) {
        self.events.push(PinEvent::Latch(high));
        if high && !self.latch {
            let bytes = self
                .bits
                .chunks(8)
                .map(|chunk| chunk.iter().fold(0u8, |acc, &bit| (acc << 1) | u8::from(bit)))
                .collect();
            self.frames.push(bytes);
            self.bits.clear();
        }
        self.latch = high;
    }
}

type TwoChipBank = ShiftRegisterBank<MockShiftPins, 2>;

fn two_chip_bank() -> TwoChipBank {
    ShiftRegisterBank::new(MockShiftPins::new())
}

// ============================================================================
// Tests: MockShiftPins
// ============================================================================

#[test]
fn test_mock_starts_without_frames() {
    let bank = two_chip_bank();
    assert!(bank.pins().events.is_empty());
    assert_eq!(bank.pins().last_frame(), None);
}

// ============================================================================
// Tests: Bit-Zustand
// ============================================================================

#[test]
fn test_set_line_on_touches_only_that_bit() {
    for line in 0..16 {
        let mut bank = two_chip_bank();
        bank.set_state(OutputState::from_bits(0xA5A5)).unwrap();
        let before = bank.state().bits();

        bank.set_line(line, true).unwrap();

        let after = bank.state().bits();
        assert!(bank.state().is_on(line));
        assert_eq!(after & !(1 << line), before & !(1 << line));
    }
}

#[test]
fn test_set_line_off_clears_exactly_that_bit() {
    for line in 0..16 {
        let mut bank = two_chip_bank();
        bank.set_state(OutputState::from_bits(0xFFFF)).unwrap();

        bank.set_line(line, false).unwrap();

        assert_eq!(bank.state().bits(), 0xFFFF & !(1 << line));
    }
}

#[test]
fn test_invalid_lines_leave_state_and_bus_untouched() {
    let mut bank = two_chip_bank();
    bank.set_line(4, true).unwrap();
    let events_before = bank.pins().events.len();

    for line in [16, 17, 31, 32, 200, 255] {
        let result = bank.set_line(line, true);
        assert_eq!(
            result,
            Err(InvalidLineError {
                requested: line,
                valid: 0..16,
            })
        );
        assert_eq!(bank.state().bits(), 1 << 4);
    }
    assert_eq!(bank.pins().events.len(), events_before);
}

#[test]
fn test_invalid_line_error_message() {
    let mut bank = two_chip_bank();
    let err = bank.set_line(42, false).unwrap_err();
    assert_eq!(err.to_string(), "line 42 outside valid range 0..16");
}

#[test]
fn test_set_line_is_idempotent() {
    let mut once = two_chip_bank();
    once.set_line(9, true).unwrap();

    let mut twice = two_chip_bank();
    twice.set_line(9, true).unwrap();
    twice.set_line(9, true).unwrap();

    assert_eq!(once.state(), twice.state());
    assert_eq!(once.pins().last_frame(), twice.pins().last_frame());
}

#[test]
fn test_set_line_scenario() {
    let mut bank = two_chip_bank();
    assert_eq!(bank.state().bits(), 0);

    bank.set_line(3, true).unwrap();
    assert_eq!(bank.state().bits(), 8);

    bank.set_line(10, true).unwrap();
    assert_eq!(bank.state().bits(), 0x408);

    let state = bank.set_line(3, false).unwrap();
    assert_eq!(state.bits(), 0x400);
    assert_eq!(bank.state().bits(), 0x400);
}

// ============================================================================
// Tests: Bus-Protokoll
// ============================================================================

#[test]
fn test_byte_order_high_line() {
    let mut bank = two_chip_bank();
    bank.set_line(15, true).unwrap();
    assert_eq!(bank.pins().last_frame(), Some(&[0x80, 0x00][..]));
}

#[test]
fn test_byte_order_low_line() {
    let mut bank = two_chip_bank();
    bank.set_line(0, true).unwrap();
    assert_eq!(bank.pins().last_frame(), Some(&[0x00, 0x01][..]));
}

#[test]
fn test_byte_order_three_chips() {
    let mut bank: ShiftRegisterBank<MockShiftPins, 3> =
        ShiftRegisterBank::new(MockShiftPins::new());
    bank.set_line(23, true).unwrap();
    bank.set_line(8, true).unwrap();
    bank.set_line(1, true).unwrap();
    assert_eq!(bank.pins().last_frame(), Some(&[0x80, 0x01, 0x02][..]));
}

#[test]
fn test_latch_low_for_whole_shift() {
    let mut bank = two_chip_bank();
    bank.set_line(12, true).unwrap();

    let events = &bank.pins().events;
    assert_eq!(events.first(), Some(&PinEvent::Latch(false)));
    assert_eq!(events.last(), Some(&PinEvent::Latch(true)));

    let latch_events = events
        .iter()
        .filter(|e| matches!(e, PinEvent::Latch(_)))
        .count();
    assert_eq!(latch_events, 2);
    assert!(!bank.pins().shifted_while_latched);
}

#[test]
fn test_one_frame_per_write() {
    let mut bank = two_chip_bank();
    bank.set_line(1, true).unwrap();
    bank.set_line(2, true).unwrap();
    bank.set_line(1, false).unwrap();

    let frames = &bank.pins().frames;
    assert_eq!(frames.len(), 3);
    assert_eq!(frames[0], vec![0x00, 0x02]);
    assert_eq!(frames[1], vec![0x00, 0x06]);
    assert_eq!(frames[2], vec![0x00, 0x04]);
}

#[test]
fn test_shift_clock_idles_low() {
    let mut bank = two_chip_bank();
    bank.set_line(5, true).unwrap();

    let clock_edges: Vec<_> = bank
        .pins()
        .events
        .iter()
        .filter_map(|e| match e {
            PinEvent::ShiftClock(level) => Some(*level),
            _ => None,
        })
        .collect();
    assert_eq!(clock_edges.len(), 32);
    assert_eq!(clock_edges.last(), Some(&false));
}

// ============================================================================
// Tests: refresh(), set_state(), clear()
// ============================================================================

#[test]
fn test_refresh_repeats_last_frame() {
    let mut bank = two_chip_bank();
    bank.set_line(10, true).unwrap();
    bank.set_line(3, true).unwrap();
    let last = bank.pins().last_frame().map(<[u8]>::to_vec);

    bank.refresh();

    let frames = &bank.pins().frames;
    assert_eq!(frames.len(), 3);
    assert_eq!(Some(frames[2].clone()), last);
    assert_eq!(frames[2], vec![0x04, 0x08]);
    assert_eq!(bank.state().bits(), 0x408);
}

#[test]
fn test_refresh_on_fresh_bank_pushes_all_off() {
    let mut bank = two_chip_bank();
    bank.refresh();
    assert_eq!(bank.pins().last_frame(), Some(&[0x00, 0x00][..]));
}

#[test]
fn test_set_state_single_frame() {
    let mut bank = two_chip_bank();
    bank.set_state(OutputState::from_bits(0xBEEF)).unwrap();
    assert_eq!(bank.pins().frames.len(), 1);
    assert_eq!(bank.pins().last_frame(), Some(&[0xBE, 0xEF][..]));
}

#[test]
fn test_set_state_out_of_width() {
    let mut bank = two_chip_bank();
    let err = bank
        .set_state(OutputState::from_bits(0x8000_0000))
        .unwrap_err();
    assert_eq!(err.requested, 31);
    assert!(bank.pins().events.is_empty());
}

#[test]
fn test_clear_switches_everything_off() {
    let mut bank = two_chip_bank();
    bank.set_line(0, true).unwrap();
    bank.set_line(15, true).unwrap();

    bank.clear();

    assert_eq!(bank.state(), OutputState::ALL_OFF);
    assert_eq!(bank.pins().last_frame(), Some(&[0x00, 0x00][..]));
}

// ============================================================================
// Tests: RelayCommand auf der Bank
// ============================================================================

#[test]
fn test_relay_commands_sequence() {
    let mut bank = two_chip_bank();
    bank.apply(RelayCommand::SetLine { line: 14, on: true }).unwrap();
    bank.apply(RelayCommand::SetLine { line: 13, on: true }).unwrap();
    assert_eq!(bank.state().bits(), 0x6000);

    let err = bank
        .apply(RelayCommand::SetLine { line: 99, on: true })
        .unwrap_err();
    assert_eq!(err.requested, 99);
    assert_eq!(bank.state().bits(), 0x6000);
    assert_eq!(bank.pins().frames.len(), 2);

    bank.apply(RelayCommand::AllOff).unwrap();
    assert_eq!(bank.state(), OutputState::ALL_OFF);
    assert_eq!(bank.pins().frames.len(), 3);
}

#[test]
fn test_relay_command_refresh_resends_same_frame() {
    let mut bank = two_chip_bank();
    bank.apply(RelayCommand::SetLine { line: 10, on: true }).unwrap();
    bank.apply(RelayCommand::SetLine { line: 3, on: true }).unwrap();

    let state = bank.apply(RelayCommand::Refresh).unwrap();

    let frames = &bank.pins().frames;
    assert_eq!(state.bits(), 0x408);
    assert_eq!(frames.len(), 3);
    assert_eq!(frames[2], frames[1]);
    assert_eq!(frames[2], vec![0x04, 0x08]);
}

#[test]
fn test_relay_command_all_off_sends_zero_frame() {
    let mut bank = two_chip_bank();
    bank.apply(RelayCommand::SetLine { line: 0, on: true }).unwrap();
    bank.apply(RelayCommand::SetLine { line: 15, on: true }).unwrap();

    let state = bank.apply(RelayCommand::AllOff).unwrap();

    assert_eq!(state, OutputState::ALL_OFF);
    assert_eq!(bank.pins().last_frame(), Some(&[0x00, 0x00][..]));
    assert!(!bank.pins().shifted_while_latched);
}

// ============================================================================
// Tests: Lift-Tabelle auf der Bank
// ============================================================================

static OUTPUTS: [u8; 16] = [0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15];
static LIFTS: [LiftRelays; 5] = [
    LiftRelays::new(15, 14, 13),
    LiftRelays::new(12, 11, 10),
    LiftRelays::new(9, 8, 0),
    LiftRelays::new(1, 2, 3),
    LiftRelays::new(4, 5, 6),
];

#[test]
fn test_lift_table_drives_expected_lines() {
    let map = OutputMap::new(&OUTPUTS);
    let table = LiftTable {
        controller_id: "con1",
        lift_begin: 0,
        lifts: &LIFTS,
    };
    map.validate(16).unwrap();
    table.validate(&map).unwrap();

    let mut bank = two_chip_bank();
    let up = table.line_for(&map, 0, LiftRelay::Up).unwrap();
    bank.set_line(up, true).unwrap();
    assert_eq!(bank.pins().last_frame(), Some(&[0x80, 0x00][..]));

    let lock = table.line_for(&map, 2, LiftRelay::Lock).unwrap();
    bank.set_line(lock, true).unwrap();
    assert_eq!(bank.pins().last_frame(), Some(&[0x80, 0x01][..]));
}
