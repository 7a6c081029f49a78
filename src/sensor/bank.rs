// src/sensor/bank.rs

use crate::common::hal_traits::{FirmwareTimer, SensorBus};
use crate::common::slot::{SlotIndex, SLOT_COUNT};
use crate::common::types::{ReadOutcome, SensorFault};

/// State of one sensor slot.
///
/// The last outcome carries the reading itself, so a failed read always
/// replaces the previous values instead of leaving them behind.
#[derive(Debug, Copy, Clone, PartialEq)]
struct SensorSlot {
    present: bool,
    last: ReadOutcome,
}

impl SensorSlot {
    const EMPTY: SensorSlot = SensorSlot {
        present: false,
        last: Err(SensorFault::Connect),
    };
}

/// The four sensor slots and the bus they are read through.
#[derive(Debug)]
pub struct SensorBank<BUS> {
    bus: BUS,
    slots: [SensorSlot; SLOT_COUNT],
    bitmask: u8,
}

impl<BUS: SensorBus> SensorBank<BUS> {
    /// Creates a bank with every slot absent. Call [`detect`](Self::detect)
    /// before serving any command.
    pub fn new(bus: BUS) -> Self {
        SensorBank {
            bus,
            slots: [SensorSlot::EMPTY; SLOT_COUNT],
            bitmask: 0,
        }
    }

    /// Configures every line, waits `settle_ms` for the sensors to power up,
    /// then reads each slot once. A slot is present iff that read succeeded.
    pub fn detect<T: FirmwareTimer>(&mut self, timer: &mut T, settle_ms: u32) {
        for slot in SlotIndex::all() {
            self.bus.configure(slot);
        }
        timer.delay_ms(settle_ms);

        self.bitmask = 0;
        for slot in SlotIndex::all() {
            let outcome = self.bus.read(slot);
            let entry = &mut self.slots[slot.as_usize()];
            entry.present = outcome.is_ok();
            entry.last = outcome;
            if entry.present {
                self.bitmask |= slot.mask();
            } else {
                debug!("slot {} not detected: {}", slot, crate::common::types::error_message(&outcome));
            }
        }
        info!("sensor detection done, bitmask {}", self.bitmask);
    }

    /// Reads one slot. Absent slots fail with `Connect` without touching the bus.
    pub fn read(&mut self, slot: SlotIndex) -> ReadOutcome {
        let entry = &mut self.slots[slot.as_usize()];
        if !entry.present {
            return Err(SensorFault::Connect);
        }
        let outcome = self.bus.read(slot);
        entry.last = outcome;
        if let Err(fault) = outcome {
            warn!("read of slot {} failed: {:?}", slot, fault);
        }
        outcome
    }

    /// Outcome of the most recent read of `slot` (detection included).
    pub fn last_outcome(&self, slot: SlotIndex) -> ReadOutcome {
        self.slots[slot.as_usize()].last
    }

    pub fn is_present(&self, slot: SlotIndex) -> bool {
        self.slots[slot.as_usize()].present
    }

    /// Bit `i` set iff slot `i` was present at the last detection.
    pub fn presence_bitmask(&self) -> u8 {
        self.bitmask
    }

    pub fn present_count(&self) -> u8 {
        self.bitmask.count_ones() as u8
    }

    /// Present slots in ascending order.
    pub fn present_slots(&self) -> impl Iterator<Item = SlotIndex> {
        let bitmask = self.bitmask;
        SlotIndex::all().filter(move |slot| bitmask & slot.mask() != 0)
    }

    pub fn bus(&self) -> &BUS {
        &self.bus
    }

    pub fn bus_mut(&mut self) -> &mut BUS {
        &mut self.bus
    }

    /// Gives the bus back.
    pub fn release(self) -> BUS {
        self.bus
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::common::types::Reading;

    /// Sensor bus answering from a per-slot script, counting reads.
    #[derive(Debug, Default)]
    pub(crate) struct ScriptedBus {
        pub outcomes: [Option<ReadOutcome>; SLOT_COUNT],
        pub reads: [u32; SLOT_COUNT],
        pub configured: [bool; SLOT_COUNT],
    }

    impl ScriptedBus {
        /// Slots listed in `readings` answer with that reading; the rest time out.
        pub(crate) fn with(readings: &[(u8, Reading)]) -> Self {
            let mut bus = ScriptedBus::default();
            for (slot, reading) in readings {
                bus.outcomes[*slot as usize] = Some(Ok(*reading));
            }
            bus
        }

        pub(crate) fn set(&mut self, slot: u8, outcome: ReadOutcome) {
            self.outcomes[slot as usize] = Some(outcome);
        }

        pub(crate) fn total_reads(&self) -> u32 {
            self.reads.iter().sum()
        }
    }

    impl SensorBus for ScriptedBus {
        fn configure(&mut self, slot: SlotIndex) {
            self.configured[slot.as_usize()] = true;
        }

        fn read(&mut self, slot: SlotIndex) -> ReadOutcome {
            self.reads[slot.as_usize()] += 1;
            self.outcomes[slot.as_usize()].unwrap_or(Err(SensorFault::Timeout))
        }
    }

    #[derive(Debug, Default)]
    pub(crate) struct DelayLog {
        pub now: u32,
        pub total_delay: u32,
    }

    impl FirmwareTimer for DelayLog {
        fn delay_ms(&mut self, ms: u32) {
            self.total_delay += ms;
            self.now = self.now.wrapping_add(ms);
        }

        fn now_ms(&self) -> u32 {
            self.now
        }
    }

    fn slot(i: u8) -> SlotIndex {
        SlotIndex::new(i).unwrap()
    }

    fn detected(bus: ScriptedBus) -> SensorBank<ScriptedBus> {
        let mut bank = SensorBank::new(bus);
        bank.detect(&mut DelayLog::default(), 2_000);
        bank
    }

    #[test]
    fn test_detect_sets_presence_and_bitmask() {
        let bus = ScriptedBus::with(&[(0, Reading::new(20.0, 50.0)), (2, Reading::new(21.0, 51.0))]);
        let mut bank = SensorBank::new(bus);
        let mut timer = DelayLog::default();
        bank.detect(&mut timer, 2_000);

        assert_eq!(timer.total_delay, 2_000);
        assert_eq!(bank.bus().configured, [true; SLOT_COUNT]);
        assert_eq!(bank.bus().reads, [1, 1, 1, 1]);
        assert_eq!(bank.presence_bitmask(), 0b0101);
        assert_eq!(bank.present_count(), 2);
        assert!(bank.is_present(slot(0)));
        assert!(!bank.is_present(slot(1)));
        let present: heapless::Vec<u8, 4> = bank.present_slots().map(|s| s.as_u8()).collect();
        assert_eq!(present.as_slice(), &[0, 2]);
    }

    #[test]
    fn test_read_absent_slot_skips_bus() {
        let mut bank = detected(ScriptedBus::with(&[(1, Reading::new(20.0, 50.0))]));
        let before = bank.bus().total_reads();
        assert_eq!(bank.read(slot(3)), Err(SensorFault::Connect));
        assert_eq!(bank.bus().total_reads(), before);
    }

    #[test]
    fn test_failed_read_replaces_last_reading() {
        let mut bank = detected(ScriptedBus::with(&[(1, Reading::new(20.0, 50.0))]));
        assert_eq!(bank.last_outcome(slot(1)), Ok(Reading::new(20.0, 50.0)));

        bank.bus_mut().set(1, Err(SensorFault::Checksum));
        assert_eq!(bank.read(slot(1)), Err(SensorFault::Checksum));
        assert_eq!(bank.last_outcome(slot(1)), Err(SensorFault::Checksum));

        bank.bus_mut().set(1, Ok(Reading::new(22.5, 48.0)));
        assert_eq!(bank.read(slot(1)), Ok(Reading::new(22.5, 48.0)));
        assert_eq!(bank.last_outcome(slot(1)), Ok(Reading::new(22.5, 48.0)));
    }

    #[test]
    fn test_presence_fixed_after_detection() {
        let mut bank = detected(ScriptedBus::with(&[(2, Reading::new(20.0, 50.0))]));
        bank.bus_mut().set(2, Err(SensorFault::Timeout));
        bank.bus_mut().set(0, Ok(Reading::new(1.0, 2.0)));
        let _ = bank.read(slot(2));
        let _ = bank.read(slot(0));
        assert!(bank.is_present(slot(2)));
        assert!(!bank.is_present(slot(0)));
        assert_eq!(bank.presence_bitmask(), 0b0100);
    }
}
