use std::collections::BTreeMap;

// --- SimulatedInput for debugging ---
/// Scripted input bytes keyed by the millisecond they arrive at.
pub struct SimulatedInput {
    events: BTreeMap<u64, Vec<u8>>,
}

impl SimulatedInput {
    pub fn new(events: BTreeMap<u64, Vec<u8>>) -> Self {
        SimulatedInput { events }
    }

    /// Parses a script like `"100:dd 250:  900:w"`: each entry is
    /// `millis:bytes`. Malformed entries are skipped.
    pub fn from_script(script: &str) -> Self {
        let mut events: BTreeMap<u64, Vec<u8>> = BTreeMap::new();
        for entry in script.split_whitespace() {
            let Some((at, bytes)) = entry.split_once(':') else {
                continue;
            };
            let Ok(at) = at.parse::<u64>() else {
                continue;
            };
            // "_" stands for the fire key, which whitespace splitting would eat.
            events
                .entry(at)
                .or_default()
                .extend(bytes.bytes().map(|b| if b == b'_' { b' ' } else { b }));
        }
        SimulatedInput { events }
    }

    /// Removes and returns every byte scheduled at or before `now`, in order.
    pub fn poll(&mut self, now: u64) -> Vec<u8> {
        let later = self.events.split_off(&(now + 1));
        let due = std::mem::replace(&mut self.events, later);
        due.into_values().flatten().collect()
    }

    pub fn next_event_at(&self) -> Option<u64> {
        self.events.keys().next().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn script_bytes_arrive_in_time_order() {
        let mut input = SimulatedInput::from_script("300:w 100:dd 100:_ bogus x:y");
        assert_eq!(input.next_event_at(), Some(100));
        assert!(input.poll(99).is_empty());
        assert_eq!(input.poll(250), b"dd ".to_vec());
        assert_eq!(input.poll(1000), b"w".to_vec());
        assert!(input.is_empty());
    }
}
